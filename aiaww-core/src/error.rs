use thiserror::Error;

use crate::orchestrator::CycleId;

/// Error returned by a generation service call.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Service returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::RequestFailed(e.to_string())
    }
}

/// Failures that end up in front of the user.
///
/// The `Display` text of each variant is the exact message shown by the
/// notification channel.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Please enter a recipe name.")]
    EmptyName,

    #[error("There was a problem loading the Recipe, please try another name")]
    RecipeGeneration(#[source] GenerationError),

    #[error("There was a problem loading the Image")]
    ImageGeneration(#[source] GenerationError),
}

/// A completion that arrived for a cycle which is no longer current.
///
/// Never shown to the user; the completion is dropped without touching state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Discarded response for cycle {received} (current cycle: {current:?})")]
pub struct StaleResponse {
    pub received: CycleId,
    pub current: Option<CycleId>,
}
