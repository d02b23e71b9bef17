//! Prompt-driven session: search, pick, show, repeat.

use anyhow::{Context, Result};
use inquire::{Confirm, InquireError, Select, Text};
use meteo_core::{
    App, AppState, Config, LocationChosen, SearchController, WeatherProvider,
    provider_from_config, search::MIN_QUERY_CHARS,
};
use std::{fmt, io, sync::Arc};
use tokio::task::JoinHandle;
use tracing::info;

use crate::render;

/// Entry in the suggestion picker; remembers its position in the controller's list.
struct Choice {
    index: usize,
    label: String,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

pub async fn run(config: &Config) -> Result<()> {
    let provider = provider_from_config(config)?;
    let app = App::new(Arc::clone(&provider));

    println!("🌤️ Weather Forecast");
    println!("Get accurate weather information for any city worldwide\n");

    while let Some(chosen) = pick_location(&provider, config).await? {
        let name = chosen.display_name.clone();
        let Some(handle) = app.select_location(chosen) else {
            continue;
        };

        println!("⏳ Loading weather data for {name}... (Ctrl+C to cancel)");
        if !finish_load(&app, handle, tokio::signal::ctrl_c()).await? {
            println!("Cancelled loading {name}.");
            continue;
        }

        let again = match app.state() {
            state @ AppState::Success { .. } => {
                if let Some(view) = state.view() {
                    print!("{}", render::forecast(&view));
                }
                confirm("📍 Search another location?").await?
            }
            AppState::Error { message } => {
                eprintln!("❌ Error: {message}");
                confirm("🔄 Try again?").await?
            }
            AppState::Idle | AppState::Loading { .. } => true,
        };

        app.reset();
        if !again {
            break;
        }
    }

    println!("\n{}", render::ATTRIBUTION);
    Ok(())
}

/// Wait for the forecast task, or abandon it when `cancel` fires first.
/// Returns `false` when the load was abandoned and the app is back to `Idle`.
async fn finish_load<F>(app: &App, handle: JoinHandle<()>, cancel: F) -> Result<bool>
where
    F: Future<Output = io::Result<()>>,
{
    tokio::select! {
        joined = handle => {
            joined.context("forecast task failed")?;
            Ok(true)
        }
        signal = cancel => {
            signal.context("failed to listen for Ctrl+C")?;
            info!("forecast load cancelled");
            app.hard_reset();
            Ok(false)
        }
    }
}

/// Ask for a city until the user picks a match. `None` when they quit.
async fn pick_location(
    provider: &Arc<dyn WeatherProvider>,
    config: &Config,
) -> Result<Option<LocationChosen>> {
    let mut search = SearchController::new(Arc::clone(provider), config.debounce());

    loop {
        let Some(query) = prompt_query().await? else {
            return Ok(None);
        };

        search.input(query.as_str());
        search.settle().await;

        let state = search.snapshot();
        if let Some(message) = state.error {
            eprintln!("❌ {message}");
            continue;
        }

        let suggestions = search.visible_suggestions();
        if suggestions.is_empty() {
            if query.chars().count() < MIN_QUERY_CHARS {
                println!("Type at least {MIN_QUERY_CHARS} characters to see suggestions.");
            } else {
                println!("No places found for '{query}'.");
            }
            continue;
        }

        let choices = suggestions
            .iter()
            .enumerate()
            .map(|(index, place)| Choice { index, label: render::suggestion(place) })
            .collect::<Vec<_>>();

        let picked = tokio::task::spawn_blocking(move || {
            Select::new("Choose a location:", choices).prompt_skippable()
        })
        .await
        .context("location picker failed")??;

        if let Some(choice) = picked {
            if let Some(chosen) = search.select(choice.index) {
                return Ok(Some(chosen));
            }
        }
    }
}

async fn prompt_query() -> Result<Option<String>> {
    let answer = tokio::task::spawn_blocking(|| {
        Text::new("City:")
            .with_help_message("Enter city name (e.g., London, New York, Tokyo). Esc to quit.")
            .prompt()
    })
    .await
    .context("search prompt failed")?;

    match answer {
        Ok(query) => Ok(Some(query)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn confirm(message: &'static str) -> Result<bool> {
    let answer = tokio::task::spawn_blocking(move || {
        Confirm::new(message).with_default(true).prompt_skippable()
    })
    .await
    .context("confirmation prompt failed")??;

    Ok(answer.unwrap_or(false))
}
