//! Recipe orchestrator.
//!
//! A synchronous state machine that owns all session state. Handlers never
//! perform I/O: accepting a name or finishing the recipe stage returns a
//! [`Command`] describing the request to issue, and the caller feeds the
//! result back through `on_recipe_completed` / `on_image_completed`.
//!
//! Every request is tagged with the [`CycleId`] of the submission that
//! started it. A completion is applied only while its stage is still pending
//! for that same cycle; anything else is a [`StaleResponse`] and leaves state
//! untouched.

mod input;
mod merge;
mod notification;
mod stage;
mod view;

pub use input::accept;
pub use merge::{merge, placeholder_recipe, DisplayModel};
pub use notification::{NotificationChannel, NotificationTicket, NotificationView};
pub use stage::StageState;
pub use view::{ViewState, DEFAULT_TITLE};

use std::error::Error as _;
use std::fmt;

use serde::Serialize;

use crate::error::{GenerationError, OrchestratorError, StaleResponse};
use crate::types::{GeneratedImage, Recipe};

/// Identity of one generation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CycleId(u64);

impl CycleId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An outbound request the caller must issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GenerateRecipe { cycle: CycleId, prompt: String },
    GenerateImage { cycle: CycleId, prompt: String },
}

impl Command {
    pub fn cycle(&self) -> CycleId {
        match self {
            Command::GenerateRecipe { cycle, .. } | Command::GenerateImage { cycle, .. } => *cycle,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Command::GenerateRecipe { prompt, .. } | Command::GenerateImage { prompt, .. } => prompt,
        }
    }
}

#[derive(Debug)]
pub struct RecipeOrchestrator {
    input_text: String,
    committed_name: Option<String>,
    current_cycle: Option<CycleId>,
    cycles_started: u64,
    recipe: StageState<Recipe>,
    image: StageState<GeneratedImage>,
    image_prompt: Option<String>,
    image_enabled: bool,
    notifications: NotificationChannel,
}

impl Default for RecipeOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeOrchestrator {
    /// Fresh session state: nothing generated, image generation on.
    pub fn new() -> Self {
        Self::with_image_generation(true)
    }

    pub fn with_image_generation(enabled: bool) -> Self {
        Self {
            input_text: String::new(),
            committed_name: None,
            current_cycle: None,
            cycles_started: 0,
            recipe: StageState::Idle,
            image: StageState::Idle,
            image_prompt: None,
            image_enabled: enabled,
            notifications: NotificationChannel::new(),
        }
    }

    /// The user edited the name field.
    pub fn on_input_change(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
    }

    /// Submit `text` as the dish name.
    pub fn on_submit_name(&mut self, text: &str) -> Result<Command, OrchestratorError> {
        self.input_text = text.to_string();
        self.submit(text)
    }

    /// Submit whatever is currently in the name field.
    pub fn on_submit(&mut self) -> Result<Command, OrchestratorError> {
        let raw = self.input_text.clone();
        self.submit(&raw)
    }

    fn submit(&mut self, raw: &str) -> Result<Command, OrchestratorError> {
        let request = match accept(raw) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!("rejected blank recipe name");
                self.notifications.notify(e.to_string());
                return Err(e);
            }
        };

        self.cycles_started += 1;
        let cycle = CycleId(self.cycles_started);
        self.current_cycle = Some(cycle);
        self.committed_name = Some(request.name.clone());
        self.recipe = StageState::Pending { cycle };
        self.image = StageState::Idle;
        self.image_prompt = None;
        self.notifications.dismiss();

        tracing::info!(%cycle, name = %request.name, "starting recipe cycle");
        debug_assert!(self.invariants_hold());

        Ok(Command::GenerateRecipe {
            cycle,
            prompt: request.name,
        })
    }

    /// Apply the outcome of a recipe request.
    ///
    /// Returns the image request to issue when image generation is enabled
    /// at this moment and the recipe succeeded.
    pub fn on_recipe_completed(
        &mut self,
        cycle: CycleId,
        result: Result<Recipe, GenerationError>,
    ) -> Result<Option<Command>, StaleResponse> {
        if self.recipe.pending_cycle() != Some(cycle) {
            return Err(self.stale(cycle));
        }

        let next = match result {
            Ok(recipe) => {
                tracing::info!(
                    %cycle,
                    ingredients = recipe.ingredients.len(),
                    steps = recipe.instructions.len(),
                    "recipe generated"
                );

                let next = if self.image_enabled {
                    let prompt = recipe.visual_description.clone();
                    self.image = StageState::Pending { cycle };
                    self.image_prompt = Some(prompt.clone());
                    Some(Command::GenerateImage { cycle, prompt })
                } else {
                    tracing::debug!(%cycle, "image generation disabled, skipping image stage");
                    None
                };

                self.recipe = StageState::Succeeded(recipe);
                next
            }
            Err(e) => {
                let err = OrchestratorError::RecipeGeneration(e);
                let detail = err.source().map(|s| s.to_string()).unwrap_or_default();
                tracing::warn!(%cycle, error = %detail, "recipe generation failed");

                self.recipe = StageState::Failed(detail);
                self.notifications.notify(err.to_string());
                None
            }
        };

        debug_assert!(self.invariants_hold());
        Ok(next)
    }

    /// Apply the outcome of an image request.
    pub fn on_image_completed(
        &mut self,
        cycle: CycleId,
        result: Result<GeneratedImage, GenerationError>,
    ) -> Result<(), StaleResponse> {
        if self.image.pending_cycle() != Some(cycle) {
            return Err(self.stale(cycle));
        }

        match result {
            Ok(image) => {
                tracing::info!(%cycle, source = ?image.source(), "image generated");
                self.image = StageState::Succeeded(image);
            }
            Err(e) => {
                let err = OrchestratorError::ImageGeneration(e);
                let detail = err.source().map(|s| s.to_string()).unwrap_or_default();
                tracing::warn!(%cycle, error = %detail, "image generation failed");

                self.image = StageState::Failed(detail);
                self.notifications.notify(err.to_string());
            }
        }

        debug_assert!(self.invariants_hold());
        Ok(())
    }

    /// Flip the image toggle. Only affects cycles whose recipe succeeds
    /// afterwards; a request already in flight is left alone.
    pub fn on_toggle_image_generation(&mut self, enabled: bool) {
        if self.image_enabled != enabled {
            tracing::debug!(enabled, "image generation toggled");
        }
        self.image_enabled = enabled;
    }

    pub fn on_dismiss_notification(&mut self) {
        self.notifications.dismiss();
    }

    /// Auto-expiry timer fired for `ticket`.
    pub fn on_notification_expired(&mut self, ticket: NotificationTicket) -> bool {
        self.notifications.expire(ticket)
    }

    pub fn view(&self) -> ViewState<'_> {
        ViewState {
            display: merge(self.recipe.value(), self.image.value()),
            input_text: &self.input_text,
            committed_name: self.committed_name.as_deref(),
            recipe_loading: self.recipe.is_pending(),
            image_loading: self.image.is_pending(),
            image_enabled: self.image_enabled,
            image_prompt: self.image_prompt.as_deref(),
            notification: self.notifications.view(),
        }
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        self.recipe.value()
    }

    pub fn image(&self) -> Option<&GeneratedImage> {
        self.image.value()
    }

    pub fn recipe_stage(&self) -> &StageState<Recipe> {
        &self.recipe
    }

    pub fn image_stage(&self) -> &StageState<GeneratedImage> {
        &self.image
    }

    pub fn current_cycle(&self) -> Option<CycleId> {
        self.current_cycle
    }

    pub fn image_enabled(&self) -> bool {
        self.image_enabled
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    fn stale(&self, received: CycleId) -> StaleResponse {
        let stale = StaleResponse {
            received,
            current: self.current_cycle,
        };
        tracing::debug!(%stale, "discarding stale response");
        stale
    }

    /// The image stage only runs after its own cycle's recipe succeeded.
    fn invariants_hold(&self) -> bool {
        match self.image.pending_cycle() {
            Some(cycle) => {
                self.current_cycle == Some(cycle) && self.recipe.value().is_some()
            }
            None => true,
        }
    }
}
