//! Fake generation service for tests and offline demos.
//!
//! Replies are matched by checking whether the prompt contains a registered
//! substring, so tests run without network access. Every call is recorded so
//! tests can assert how many requests a cycle issued.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::GenerationService;
use crate::error::GenerationError;
use crate::types::{Amount, GeneratedImage, Ingredient, Recipe};

/// A call received by the fake service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Recipe(String),
    Image(String),
}

#[derive(Debug)]
struct Rule<T> {
    /// Lowercased prompt substring.
    pattern: String,
    reply: Result<T, String>,
    delay: Duration,
}

/// A scripted generation service.
///
/// Rules are checked in registration order; the first whose pattern is found
/// in the prompt (case-insensitive) wins. Without a match the default reply
/// is used, or the call fails.
#[derive(Debug, Default)]
pub struct FakeGenerationService {
    recipe_rules: Vec<Rule<Recipe>>,
    image_rules: Vec<Rule<GeneratedImage>>,
    default_recipe: Option<Recipe>,
    default_image: Option<GeneratedImage>,
    calls: Mutex<Vec<ServiceCall>>,
}

impl FakeGenerationService {
    /// Create a fake with no replies registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to recipe prompts containing `prompt_contains` with `recipe`.
    pub fn with_recipe(self, prompt_contains: &str, recipe: Recipe) -> Self {
        self.with_delayed_recipe(prompt_contains, Ok(recipe), Duration::ZERO)
    }

    /// Fail recipe prompts containing `prompt_contains`.
    pub fn with_recipe_error(self, prompt_contains: &str, message: &str) -> Self {
        self.with_delayed_recipe(prompt_contains, Err(message.to_string()), Duration::ZERO)
    }

    /// Reply to recipe prompts after waiting `delay`.
    pub fn with_delayed_recipe(
        mut self,
        prompt_contains: &str,
        reply: Result<Recipe, String>,
        delay: Duration,
    ) -> Self {
        self.recipe_rules.push(Rule {
            pattern: prompt_contains.to_lowercase(),
            reply,
            delay,
        });
        self
    }

    /// Reply to image prompts containing `prompt_contains` with `image`.
    pub fn with_image(self, prompt_contains: &str, image: GeneratedImage) -> Self {
        self.with_delayed_image(prompt_contains, Ok(image), Duration::ZERO)
    }

    /// Fail image prompts containing `prompt_contains`.
    pub fn with_image_error(self, prompt_contains: &str, message: &str) -> Self {
        self.with_delayed_image(prompt_contains, Err(message.to_string()), Duration::ZERO)
    }

    /// Reply to image prompts after waiting `delay`.
    pub fn with_delayed_image(
        mut self,
        prompt_contains: &str,
        reply: Result<GeneratedImage, String>,
        delay: Duration,
    ) -> Self {
        self.image_rules.push(Rule {
            pattern: prompt_contains.to_lowercase(),
            reply,
            delay,
        });
        self
    }

    /// Set the recipe returned when no rule matches.
    pub fn with_default_recipe(mut self, recipe: Recipe) -> Self {
        self.default_recipe = Some(recipe);
        self
    }

    /// Set the image returned when no rule matches.
    pub fn with_default_image(mut self, image: GeneratedImage) -> Self {
        self.default_image = Some(image);
        self
    }

    /// A fake that answers every prompt, for running the CLI offline.
    pub fn demo() -> Self {
        Self::new()
            .with_default_recipe(demo_recipe())
            .with_default_image(GeneratedImage::new(
                "https://images.aiaww.app/demo/pancakes.png",
            ))
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn recipe_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ServiceCall::Recipe(_)))
            .count()
    }

    pub fn image_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ServiceCall::Image(_)))
            .count()
    }

    fn record(&self, call: ServiceCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }
}

async fn reply<T: Clone>(
    kind: &str,
    rules: &[Rule<T>],
    default: Option<&T>,
    prompt: &str,
) -> Result<T, GenerationError> {
    let prompt_lower = prompt.to_lowercase();

    if let Some(rule) = rules.iter().find(|r| prompt_lower.contains(&r.pattern)) {
        if !rule.delay.is_zero() {
            tokio::time::sleep(rule.delay).await;
        }
        return rule.reply.clone().map_err(GenerationError::RequestFailed);
    }

    match default {
        Some(value) => Ok(value.clone()),
        None => Err(GenerationError::RequestFailed(format!(
            "FakeGenerationService: No {} response configured for prompt (first 100 chars): {}",
            kind,
            prompt.chars().take(100).collect::<String>()
        ))),
    }
}

#[async_trait]
impl GenerationService for FakeGenerationService {
    async fn generate_recipe(&self, prompt: &str) -> Result<Recipe, GenerationError> {
        self.record(ServiceCall::Recipe(prompt.to_string()));
        reply(
            "recipe",
            &self.recipe_rules,
            self.default_recipe.as_ref(),
            prompt,
        )
        .await
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GenerationError> {
        self.record(ServiceCall::Image(prompt.to_string()));
        reply(
            "image",
            &self.image_rules,
            self.default_image.as_ref(),
            prompt,
        )
        .await
    }

    fn service_name(&self) -> &'static str {
        "fake"
    }
}

fn demo_recipe() -> Recipe {
    let ingredient = |name: &str, amount: f64, unit: &str| Ingredient {
        name: name.to_string(),
        amount: Amount::Number(amount),
        unit: unit.to_string(),
    };

    Recipe {
        ingredients: vec![
            ingredient("flour", 200.0, "grams"),
            ingredient("milk", 300.0, "ml"),
            ingredient("eggs", 2.0, "pieces"),
            ingredient("butter", 30.0, "grams"),
        ],
        instructions: vec![
            "Whisk flour, milk and eggs into a smooth batter".to_string(),
            "Rest the batter for 10 minutes".to_string(),
            "Melt a little butter in a hot pan".to_string(),
            "Cook each pancake until golden on both sides".to_string(),
        ],
        time_to_cook: "25".to_string(),
        visual_description: "A stack of golden pancakes with melting butter on a white plate"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(description: &str) -> Recipe {
        Recipe {
            ingredients: vec![],
            instructions: vec![],
            time_to_cook: "10".to_string(),
            visual_description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_fake_service_matching() {
        let service = FakeGenerationService::new().with_recipe("taco", recipe("tacos"));
        let result = service.generate_recipe("Fish Tacos").await.unwrap();
        assert_eq!(result.visual_description, "tacos");
    }

    #[tokio::test]
    async fn test_fake_service_first_rule_wins() {
        let service = FakeGenerationService::new()
            .with_recipe("soup", recipe("first"))
            .with_recipe("tomato", recipe("second"));
        let result = service.generate_recipe("tomato soup").await.unwrap();
        assert_eq!(result.visual_description, "first");
    }

    #[tokio::test]
    async fn test_fake_service_no_match() {
        let service = FakeGenerationService::new();
        let result = service.generate_image("anything").await;
        assert!(matches!(result, Err(GenerationError::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_fake_service_error_rule() {
        let service = FakeGenerationService::new().with_image_error("stew", "quota exceeded");
        let err = service.generate_image("a pot of stew").await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed: quota exceeded");
    }

    #[tokio::test]
    async fn test_fake_service_records_calls() {
        let service = FakeGenerationService::demo();
        service.generate_recipe("Pancakes").await.unwrap();
        service.generate_image("pancake stack").await.unwrap();

        assert_eq!(
            service.calls(),
            vec![
                ServiceCall::Recipe("Pancakes".to_string()),
                ServiceCall::Image("pancake stack".to_string()),
            ]
        );
        assert_eq!(service.recipe_calls(), 1);
        assert_eq!(service.image_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fake_service_delay() {
        let service = FakeGenerationService::new().with_delayed_image(
            "slow",
            Ok(GeneratedImage::new("https://img/slow.png")),
            Duration::from_secs(5),
        );

        let start = tokio::time::Instant::now();
        service.generate_image("slow one").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
