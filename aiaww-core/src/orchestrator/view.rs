//! Read model handed to the presentation layer.

use serde::Serialize;

use super::merge::DisplayModel;
use super::notification::NotificationView;

/// Title shown before any name has been accepted.
pub const DEFAULT_TITLE: &str = "Recipe Name";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewState<'a> {
    pub display: DisplayModel<'a>,
    pub input_text: &'a str,
    pub committed_name: Option<&'a str>,
    pub recipe_loading: bool,
    pub image_loading: bool,
    pub image_enabled: bool,
    /// Prompt the current cycle sent to the image service.
    pub image_prompt: Option<&'a str>,
    pub notification: NotificationView<'a>,
}

impl ViewState<'_> {
    pub fn title(&self) -> &str {
        self.committed_name.unwrap_or(DEFAULT_TITLE)
    }

    pub fn cook_time_label(&self) -> String {
        format!("{} min", self.display.recipe.time_to_cook)
    }
}
