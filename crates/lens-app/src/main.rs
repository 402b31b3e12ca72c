use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lens_config::RecognitionMode;
use lens_ollama::Recognizer;
use lens_types::Language;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod controller;
mod events;
mod profile;
mod state;
mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::events::install_model::{handle_install, refresh_model_status};
use self::events::recognize_image::handle_recognize_image;
use self::events::test_service::handle_service_test;
use self::events::update_config::{ConfigUpdate, handle_config_update};
use self::profile::ProfileStore;
use self::state::AppState;

#[derive(Parser)]
#[command(name = "lens", version, about = "OCR through an Ollama vision model")]
struct Cli {
    /// Profile to load and save settings in
    #[arg(long, global = true, default_value = "main")]
    profile: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract text from an image file
    Recognize {
        image: PathBuf,
        /// Language hint; the model detects language itself
        #[arg(long, default_value = "auto")]
        language: String,
    },
    /// Show whether the configured model is installed
    Models,
    /// Pull the configured model
    Install {
        /// Pull even if the model looks installed or the server is unknown
        #[arg(long)]
        force: bool,
    },
    /// Recognize a built-in test image and save the settings if it works
    Test,
    /// Show or edit settings
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    Name { value: String },
    Model { value: String },
    Host { value: String },
    /// text, formula or table; resets the prompt
    Mode { value: RecognitionMode },
    Prompt { value: String },
}

impl ConfigAction {
    fn into_update(self) -> Option<ConfigUpdate> {
        match self {
            ConfigAction::Show => None,
            ConfigAction::Name { value } => Some(ConfigUpdate::InstanceName(value)),
            ConfigAction::Model { value } => Some(ConfigUpdate::Model(value)),
            ConfigAction::Host { value } => Some(ConfigUpdate::RequestPath(value)),
            ConfigAction::Mode { value } => Some(ConfigUpdate::Mode(value)),
            ConfigAction::Prompt { value } => Some(ConfigUpdate::Prompt(value)),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = ProfileStore::user_default()?;
    store.init()?;
    let mut config = store
        .load(&cli.profile)
        .with_context(|| format!("Failed to load profile {}", cli.profile))?;
    // Environment wins over the saved profile on every start
    config.apply_env();

    let state = Arc::new(AppState::new(config, store, cli.profile));
    let mut controller = AppController::new(state.clone());
    controller.spawn_ui();

    let result = run(cli.command, state, &controller).await;
    controller.finish().await?;
    result
}

async fn run(
    command: Command,
    state: Arc<AppState>,
    controller: &AppController,
) -> anyhow::Result<()> {
    let tx = controller.sender();

    match command {
        Command::Recognize { image, language } => {
            let language = Language::from_key(&language)
                .with_context(|| format!("Unknown language: {language}"))?;
            handle_recognize_image(state, &image, language, &tx).await?;
        }
        Command::Models => {
            refresh_model_status(&state, &tx).await?;
        }
        Command::Install { force } => {
            let mut install = tokio::spawn(handle_install(
                state.clone(),
                force,
                controller.cancel_token(),
                tx.clone(),
            ));

            let cancelled = tokio::select! {
                result = &mut install => {
                    result??;
                    false
                }
                _ = signal::ctrl_c() => true,
            };

            if cancelled {
                tracing::info!("Cancelling pull");
                controller.shutdown();
                install.await??;
            }
        }
        Command::Test => {
            if !handle_service_test(state, &tx).await? {
                anyhow::bail!("Service test failed; settings not saved");
            }
        }
        Command::Config { action } => match action.and_then(ConfigAction::into_update) {
            None => {
                let config = state.config.read().await;
                let metadata = state.recognizer.metadata();
                println!("service: {} ({})", metadata.name, metadata.icon);
                println!("{}", serde_json::to_string_pretty(&config.service)?);
                println!("chat host: {}", config.service.host());
                println!("models host: {}", config.service.client_host());
            }
            Some(update) => handle_config_update(state, update).await?,
        },
    }

    Ok(())
}
