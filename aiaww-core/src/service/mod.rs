//! Generation service boundary.
//!
//! The orchestrator never talks to the network itself. It asks a
//! [`GenerationService`] for a recipe or an image and gets a typed result
//! back, which keeps the HTTP transport swappable for a scripted fake in
//! tests and offline demos.

mod fake;
mod http;

pub use fake::{FakeGenerationService, ServiceCall};
pub use http::{HttpGenerationService, IMAGE_PATH, RECIPE_PATH};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, ServiceKind};
use crate::error::GenerationError;
use crate::types::{GeneratedImage, Recipe};

/// The two generation calls a cycle can make.
///
/// Implementations must be stateless with respect to cycles: staleness is
/// decided by the orchestrator, never by the service.
#[async_trait]
pub trait GenerationService: Send + Sync + fmt::Debug {
    /// Generate a recipe for a dish name.
    async fn generate_recipe(&self, prompt: &str) -> Result<Recipe, GenerationError>;

    /// Generate an image from a natural-language description.
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GenerationError>;

    /// Short name for logs (e.g., "http", "fake").
    fn service_name(&self) -> &'static str;
}

/// Build the service selected by the configuration.
pub fn create_service(config: &AppConfig) -> Result<Arc<dyn GenerationService>, GenerationError> {
    match config.service {
        ServiceKind::Http => Ok(Arc::new(HttpGenerationService::from_config(config)?)),
        ServiceKind::Fake => Ok(Arc::new(FakeGenerationService::demo())),
    }
}
