//! HTTP generation service.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::GenerationService;
use crate::config::AppConfig;
use crate::error::GenerationError;
use crate::types::{GeneratedImage, ImageResponse, Recipe, RecipeResponse};

/// Path of the recipe endpoint, relative to the base URL.
pub const RECIPE_PATH: &str = "api/gpt/generate-recipe";

/// Path of the image endpoint, relative to the base URL.
pub const IMAGE_PATH: &str = "api/dalle/generate-image";

/// Generation service backed by the AIaww HTTP API.
#[derive(Debug)]
pub struct HttpGenerationService {
    base_url: Url,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct PromptBody<'a> {
    prompt: &'a str,
}

/// Error body the API may send with a non-2xx status.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(alias = "message")]
    error: String,
}

impl HttpGenerationService {
    /// Create a service with a default client. `base_url` should end in `/`;
    /// see [`crate::config::parse_base_url`].
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GenerationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: config.api_base_url.clone(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, GenerationError> {
        self.base_url
            .join(path)
            .map_err(|e| GenerationError::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))
    }

    async fn post_prompt<T: DeserializeOwned>(
        &self,
        path: &str,
        prompt: &str,
    ) -> Result<T, GenerationError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "posting generation request");

        let response = self
            .client
            .post(url)
            .json(&PromptBody { prompt })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ServiceErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(GenerationError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| GenerationError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn generate_recipe(&self, prompt: &str) -> Result<Recipe, GenerationError> {
        let response: RecipeResponse = self.post_prompt(RECIPE_PATH, prompt).await?;
        Ok(response.recipe)
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GenerationError> {
        let response: ImageResponse = self.post_prompt(IMAGE_PATH, prompt).await?;
        Ok(response.image)
    }

    fn service_name(&self) -> &'static str {
        "http"
    }
}
