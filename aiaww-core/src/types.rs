use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A validated dish name, ready to be sent to the recipe service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub name: String,
}

/// Quantity of an ingredient. The recipe service sends either a number or a
/// free-form string such as "1/2".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{}", n),
            Amount::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: Amount,
    #[serde(default)]
    pub unit: String,
}

/// A generated recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecipeWire")]
pub struct Recipe {
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    /// Minutes, kept as the service wrote it.
    pub time_to_cook: String,
    /// Natural-language description used as the image prompt.
    pub visual_description: String,
}

/// Recipe as the service sends it. The description arrives as
/// `visual_discription_of_image`, `visual_description`, or both; the
/// correctly spelled key wins.
#[derive(Deserialize)]
struct RecipeWire {
    ingredients: Vec<Ingredient>,
    instructions: Vec<String>,
    #[serde(deserialize_with = "string_or_number")]
    time_to_cook: String,
    visual_description: Option<String>,
    visual_discription_of_image: Option<String>,
}

impl TryFrom<RecipeWire> for Recipe {
    type Error = &'static str;

    fn try_from(wire: RecipeWire) -> Result<Self, Self::Error> {
        let visual_description = wire
            .visual_description
            .or(wire.visual_discription_of_image)
            .ok_or("missing field `visual_description`")?;

        Ok(Self {
            ingredients: wire.ingredients,
            instructions: wire.instructions,
            time_to_cook: wire.time_to_cook,
            visual_description,
        })
    }
}

/// Opaque reference to a generated image: a URL or an encoded payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedImage(String);

/// How a [`GeneratedImage`] reference should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    DataUrl,
    RemoteUrl,
}

impl GeneratedImage {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn source(&self) -> ImageSource {
        if self.0.starts_with("data:") {
            ImageSource::DataUrl
        } else {
            ImageSource::RemoteUrl
        }
    }
}

impl fmt::Display for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of the recipe service response.
#[derive(Debug, Deserialize)]
pub struct RecipeResponse {
    pub recipe: Recipe,
}

/// Body of the image service response.
#[derive(Debug, Deserialize)]
pub struct ImageResponse {
    pub image: GeneratedImage,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recipe_accepts_service_spelling() {
        let value = json!({
            "ingredients": [
                {"name": "tortillas", "amount": 8, "unit": "pieces"},
                {"name": "lime", "amount": "1/2"}
            ],
            "instructions": ["Warm the tortillas", "Fill and serve"],
            "time_to_cook": 20,
            "visual_discription_of_image": "Three tacos on a wooden board"
        });

        let recipe: Recipe = serde_json::from_value(value).unwrap();
        assert_eq!(recipe.visual_description, "Three tacos on a wooden board");
        assert_eq!(recipe.time_to_cook, "20");
        assert_eq!(recipe.ingredients[0].amount, Amount::Number(8.0));
        assert_eq!(recipe.ingredients[1].amount, Amount::Text("1/2".to_string()));
        assert_eq!(recipe.ingredients[1].unit, "");
    }

    #[test]
    fn test_recipe_accepts_corrected_spelling() {
        let value = json!({
            "ingredients": [],
            "instructions": [],
            "time_to_cook": "45",
            "visual_description": "A bowl of soup"
        });

        let recipe: Recipe = serde_json::from_value(value).unwrap();
        assert_eq!(recipe.visual_description, "A bowl of soup");
        assert_eq!(recipe.time_to_cook, "45");
    }

    #[test]
    fn test_recipe_with_both_spellings_prefers_corrected() {
        let value = json!({
            "ingredients": [{"name": "flour", "amount": 200, "unit": "grams"}],
            "instructions": ["Mix", "Bake"],
            "time_to_cook": 35,
            "visual_description": "A golden loaf on a rack",
            "visual_discription_of_image": "A loaf of bread"
        });

        let recipe: Recipe = serde_json::from_value(value).unwrap();
        assert_eq!(recipe.visual_description, "A golden loaf on a rack");
        assert_eq!(recipe.time_to_cook, "35");
    }

    #[test]
    fn test_recipe_without_description_is_rejected() {
        let value = json!({
            "ingredients": [],
            "instructions": [],
            "time_to_cook": "45"
        });

        assert!(serde_json::from_value::<Recipe>(value).is_err());
    }

    #[test]
    fn test_amount_display() {
        assert_eq!(Amount::Number(0.0).to_string(), "0");
        assert_eq!(Amount::Number(1.5).to_string(), "1.5");
        assert_eq!(Amount::Text("a pinch".to_string()).to_string(), "a pinch");
    }

    #[test]
    fn test_image_source() {
        assert_eq!(
            GeneratedImage::new("data:image/png;base64,AAAA").source(),
            ImageSource::DataUrl
        );
        assert_eq!(
            GeneratedImage::new("https://images.example.com/a.png").source(),
            ImageSource::RemoteUrl
        );
    }

    #[test]
    fn test_image_response() {
        let response: ImageResponse =
            serde_json::from_value(json!({"image": "https://img.example.com/1.png"})).unwrap();
        assert_eq!(response.image.as_str(), "https://img.example.com/1.png");
    }
}
