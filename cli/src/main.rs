mod render;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use aiaww_core::{
    create_service, AppConfig, Event, ServiceKind, Session, SessionConfig, ViewState,
};

/// Base URL used when running offline with `--fake` and nothing else is set.
const OFFLINE_BASE_URL: &str = "http://localhost/";

#[derive(Parser)]
#[command(name = "aiaww")]
#[command(about = "Generate a recipe and a picture from a dish name", long_about = None)]
struct Cli {
    /// Base URL of the generation API (default: $AIAWW_API_BASE_URL)
    #[arg(long)]
    api_base_url: Option<String>,

    /// Start with image generation turned off
    #[arg(long)]
    no_image: bool,

    /// Use the built-in fake service instead of the HTTP API
    #[arg(long)]
    fake: bool,

    /// Print the view as JSON instead of text
    #[arg(long)]
    json: bool,
}

/// A line typed by the user.
#[derive(Debug, PartialEq, Eq)]
enum UserCommand {
    Submit(String),
    Image(bool),
    Dismiss,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> UserCommand {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return UserCommand::Submit(line.to_string());
    };

    match command.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["image", "on"] => UserCommand::Image(true),
        ["image", "off"] => UserCommand::Image(false),
        ["dismiss"] => UserCommand::Dismiss,
        ["help"] => UserCommand::Help,
        ["quit"] | ["q"] => UserCommand::Quit,
        _ => UserCommand::Unknown(trimmed.to_string()),
    }
}

/// Whatever woke the session loop up.
enum Input {
    Line(Option<String>),
    Event(Event),
}

/// Logs go to stderr so they don't interleave with the rendered view.
fn init_telemetry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let base_url = cli
        .api_base_url
        .clone()
        .or_else(|| std::env::var("AIAWW_API_BASE_URL").ok());

    let mut config = match base_url {
        Some(url) => AppConfig::from_env_with_base_url(&url)?,
        None if cli.fake => AppConfig::from_env_with_base_url(OFFLINE_BASE_URL)?,
        None => AppConfig::from_env().context("pass --api-base-url or use --fake")?,
    };

    if cli.fake {
        config.service = ServiceKind::Fake;
    }
    if cli.no_image {
        config.image_generation_enabled = false;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let service = create_service(&config).context("Failed to create generation service")?;
    tracing::info!(
        service = service.service_name(),
        base_url = %config.api_base_url,
        "session started"
    );

    let mut session = Session::new(service, SessionConfig::from(&config));
    let stdin = BufReader::new(tokio::io::stdin());

    render::print_help();
    let json = cli.json;
    run(&mut session, stdin, |view| render::print_view(view, json)).await
}

/// Drive the session from `input` until `:quit`, or until input ends and
/// every outstanding request has come back.
async fn run<R>(
    session: &mut Session,
    input: R,
    mut render: impl FnMut(&ViewState<'_>) -> Result<()>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut input_open = true;

    render(&session.view())?;

    loop {
        if !input_open && session.in_flight() == 0 {
            break;
        }

        let input = tokio::select! {
            line = lines.next_line(), if input_open => {
                Input::Line(line.context("Failed to read stdin")?)
            }
            Some(event) = session.next_event() => Input::Event(event),
            else => break,
        };

        match input {
            Input::Line(None) => {
                input_open = false;
                if session.in_flight() > 0 {
                    tracing::debug!(
                        in_flight = session.in_flight(),
                        "input closed, waiting for outstanding requests"
                    );
                }
                continue;
            }
            Input::Line(Some(line)) => match parse_command(&line) {
                UserCommand::Submit(name) => {
                    session.set_input(name);
                    if let Err(e) = session.submit() {
                        tracing::debug!(error = %e, "submission rejected");
                    }
                }
                UserCommand::Image(enabled) => session.toggle_image_generation(enabled),
                UserCommand::Dismiss => session.dismiss_notification(),
                UserCommand::Help => {
                    render::print_help();
                    continue;
                }
                UserCommand::Quit => break,
                UserCommand::Unknown(command) => {
                    eprintln!("Unknown command: {} (try :help)", command);
                    continue;
                }
            },
            Input::Event(event) => session.apply(event),
        }

        render(&session.view())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use aiaww_core::{Amount, FakeGenerationService, GeneratedImage, Ingredient, Recipe};

    fn tacos() -> Recipe {
        Recipe {
            ingredients: vec![Ingredient {
                name: "corn tortillas".to_string(),
                amount: Amount::Number(8.0),
                unit: "pieces".to_string(),
            }],
            instructions: vec!["Warm the tortillas".to_string()],
            time_to_cook: "25".to_string(),
            visual_description: "three tacos on a board".to_string(),
        }
    }

    fn quiet_session(fake: FakeGenerationService) -> Session {
        Session::new(
            Arc::new(fake),
            SessionConfig {
                notification_auto_hide: None,
                image_generation_enabled: true,
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_of_input_waits_for_slow_responses() {
        let fake = FakeGenerationService::new()
            .with_delayed_recipe("tacos", Ok(tacos()), Duration::from_secs(1))
            .with_delayed_image(
                "tacos",
                Ok(GeneratedImage::new("https://img/tacos.png")),
                Duration::from_secs(1),
            );
        let mut session = quiet_session(fake);
        let mut labels = Vec::new();

        run(&mut session, BufReader::new(&b"Tacos\n"[..]), |view| {
            labels.push(view.cook_time_label());
            Ok(())
        })
        .await
        .unwrap();

        let view = session.view();
        assert_eq!(session.in_flight(), 0);
        assert!(!view.recipe_loading);
        assert!(!view.image_loading);
        assert_eq!(view.display.recipe, &tacos());
        assert_eq!(
            view.display.image.map(|i| i.as_str()),
            Some("https://img/tacos.png")
        );
        // Initial view, submission, recipe, image.
        assert_eq!(labels.len(), 4);
        assert_eq!(labels.last().map(String::as_str), Some("25 min"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_does_not_wait() {
        let fake = FakeGenerationService::new().with_delayed_recipe(
            "tacos",
            Ok(tacos()),
            Duration::from_secs(60),
        );
        let mut session = quiet_session(fake);

        run(&mut session, BufReader::new(&b"Tacos\n:quit\n"[..]), |_| Ok(()))
            .await
            .unwrap();

        assert_eq!(session.in_flight(), 1);
        assert!(session.view().recipe_loading);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command(":image on"), UserCommand::Image(true));
        assert_eq!(parse_command("  :image   off "), UserCommand::Image(false));
        assert_eq!(parse_command(":dismiss"), UserCommand::Dismiss);
        assert_eq!(parse_command(":q"), UserCommand::Quit);
        assert_eq!(
            parse_command(":image maybe"),
            UserCommand::Unknown(":image maybe".to_string())
        );
    }

    #[test]
    fn test_plain_text_is_submitted_verbatim() {
        assert_eq!(
            parse_command(" Pad Thai "),
            UserCommand::Submit(" Pad Thai ".to_string())
        );
        assert_eq!(parse_command(""), UserCommand::Submit(String::new()));
    }
}
