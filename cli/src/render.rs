//! Terminal rendering of the session view.

use std::fmt::Write as _;

use anyhow::Result;

use aiaww_core::{GeneratedImage, ImageSource, ViewState};

pub fn print_help() {
    println!("Type a dish name and press enter to generate a recipe.");
    println!("  :image on|off   toggle image generation");
    println!("  :dismiss        hide the current message");
    println!("  :help           show this help");
    println!("  :quit           exit");
}

pub fn print_view(view: &ViewState<'_>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(view)?);
    } else {
        print!("{}", render_text(view));
    }
    Ok(())
}

pub fn render_text(view: &ViewState<'_>) -> String {
    let mut out = String::new();
    let recipe = view.display.recipe;

    let _ = writeln!(out);
    let _ = writeln!(out, "== {} ({}) ==", view.title(), view.cook_time_label());

    if view.recipe_loading {
        let _ = writeln!(out, "[generating recipe...]");
    }
    let _ = writeln!(out, "Image: {}", image_line(view));

    let _ = writeln!(out, "Ingredients:");
    for ingredient in &recipe.ingredients {
        let quantity = format!("{} {}", ingredient.amount, ingredient.unit);
        let _ = writeln!(out, "  - {}: {}", ingredient.name, quantity.trim_end());
    }

    let _ = writeln!(out, "Instructions:");
    for step in &recipe.instructions {
        let _ = writeln!(out, "  - {}", step);
    }

    if view.notification.visible {
        let _ = writeln!(out, "[!] {}", view.notification.message);
    }

    out
}

fn image_line(view: &ViewState<'_>) -> String {
    if view.image_loading {
        return "generating...".to_string();
    }

    match (view.display.image, view.image_prompt) {
        (Some(image), Some(prompt)) => format!("{} (prompt: \"{}\")", describe(image), prompt),
        (Some(image), None) => describe(image),
        (None, _) if !view.image_enabled => "off".to_string(),
        (None, _) => "none".to_string(),
    }
}

fn describe(image: &GeneratedImage) -> String {
    match image.source() {
        ImageSource::RemoteUrl => image.as_str().to_string(),
        ImageSource::DataUrl => format!("<embedded image, {} bytes>", image.as_str().len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiaww_core::{Amount, Ingredient, Recipe, RecipeOrchestrator};

    fn soup() -> Recipe {
        Recipe {
            ingredients: vec![Ingredient {
                name: "lentils".to_string(),
                amount: Amount::Number(200.0),
                unit: "grams".to_string(),
            }],
            instructions: vec!["Simmer the lentils".to_string()],
            time_to_cook: "40".to_string(),
            visual_description: "a bowl of lentil soup".to_string(),
        }
    }

    #[test]
    fn test_render_placeholder() {
        let orchestrator = RecipeOrchestrator::new();
        let text = render_text(&orchestrator.view());

        assert!(text.contains("== Recipe Name (0 min) =="));
        assert!(text.contains("  - Ingredient 1: 0 grams"));
        assert!(text.contains("  - Step 5: Finished"));
        assert!(text.contains("Image: none"));
    }

    #[test]
    fn test_render_generated_recipe() {
        let mut orchestrator = RecipeOrchestrator::new();
        let cycle = orchestrator.on_submit_name("Lentil Soup").unwrap().cycle();
        orchestrator.on_recipe_completed(cycle, Ok(soup())).unwrap();

        let text = render_text(&orchestrator.view());
        assert!(text.contains("== Lentil Soup (40 min) =="));
        assert!(text.contains("Image: generating..."));

        orchestrator
            .on_image_completed(cycle, Ok(GeneratedImage::new("https://img/soup.png")))
            .unwrap();
        let text = render_text(&orchestrator.view());
        assert!(text.contains("Image: https://img/soup.png (prompt: \"a bowl of lentil soup\")"));
        assert!(text.contains("  - lentils: 200 grams"));
    }

    #[test]
    fn test_render_notification_and_disabled_image() {
        let mut orchestrator = RecipeOrchestrator::with_image_generation(false);
        orchestrator.on_submit_name(" ").unwrap_err();

        let text = render_text(&orchestrator.view());
        assert!(text.contains("Image: off"));
        assert!(text.contains("[!] Please enter a recipe name."));
    }
}
