pub mod config;
pub mod error;
pub mod orchestrator;
pub mod service;
pub mod session;
pub mod types;

pub use config::{AppConfig, ConfigError, ServiceKind};
pub use error::{GenerationError, OrchestratorError, StaleResponse};
pub use orchestrator::{
    merge, placeholder_recipe, Command, CycleId, DisplayModel, NotificationTicket,
    RecipeOrchestrator, StageState, ViewState,
};
pub use service::{
    create_service, FakeGenerationService, GenerationService, HttpGenerationService, ServiceCall,
};
pub use session::{Event, Session, SessionConfig};
pub use types::{Amount, GeneratedImage, GenerationRequest, ImageSource, Ingredient, Recipe};
