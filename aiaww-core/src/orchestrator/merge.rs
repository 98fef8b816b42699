//! Display model merger.

use std::sync::LazyLock;

use serde::Serialize;

use crate::types::{Amount, GeneratedImage, Ingredient, Recipe};

/// Recipe shown before anything has been generated.
static PLACEHOLDER_RECIPE: LazyLock<Recipe> = LazyLock::new(|| Recipe {
    ingredients: (1..=4)
        .map(|n| Ingredient {
            name: format!("Ingredient {}", n),
            amount: Amount::Number(0.0),
            unit: "grams".to_string(),
        })
        .collect(),
    instructions: [
        "Step 1: Do something",
        "Step 2: Do something else",
        "Step 3: Continue doing things",
        "Step 4: Almost there",
        "Step 5: Finished",
    ]
    .into_iter()
    .map(String::from)
    .collect(),
    time_to_cook: "0".to_string(),
    visual_description: String::new(),
});

pub fn placeholder_recipe() -> &'static Recipe {
    &PLACEHOLDER_RECIPE
}

/// What the presentation layer renders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayModel<'a> {
    pub recipe: &'a Recipe,
    /// Absent when not generated, disabled, still loading, or failed.
    pub image: Option<&'a GeneratedImage>,
    pub is_placeholder: bool,
}

/// Pick the generated recipe and image, or the placeholder when no recipe
/// has been generated. An image without a recipe is never shown.
pub fn merge<'a>(
    recipe: Option<&'a Recipe>,
    image: Option<&'a GeneratedImage>,
) -> DisplayModel<'a> {
    match recipe {
        Some(recipe) => DisplayModel {
            recipe,
            image,
            is_placeholder: false,
        },
        None => DisplayModel {
            recipe: placeholder_recipe(),
            image: None,
            is_placeholder: true,
        },
    }
}
