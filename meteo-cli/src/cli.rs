use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use meteo_core::{
    App, AppState, Config, SearchController, provider_from_config, search::MIN_QUERY_CHARS,
};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "7-day weather forecast for any city")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides this).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for a city, pick a match and show its forecast. The default.
    Interactive,

    /// List places matching a name.
    Search {
        /// City name, e.g. "London".
        query: String,
    },

    /// Show the forecast for a place.
    Show {
        /// City name, e.g. "London".
        query: String,

        /// Which match to use, as numbered by `meteo search`.
        #[arg(long, default_value_t = 1)]
        pick: usize,
    },

    /// Edit endpoints, timeouts and search behaviour.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command.unwrap_or(Command::Interactive) {
            Command::Interactive => interactive::run(&config).await,
            Command::Search { query } => search(&config, &query).await,
            Command::Show { query, pick } => show(&config, &query, pick).await,
            Command::Configure => {
                tokio::task::spawn_blocking(move || configure(config))
                    .await
                    .context("configuration prompt failed")?
            }
        }
    }
}

/// Run one settled lookup through the same controller the interactive mode uses.
async fn lookup(config: &Config, query: &str) -> Result<SearchController> {
    if query.trim().chars().count() < MIN_QUERY_CHARS {
        bail!("Type at least {MIN_QUERY_CHARS} characters to search");
    }

    let provider = provider_from_config(config)?;
    let mut search = SearchController::new(provider, config.debounce());
    search.input(query.trim());
    search.settle().await;

    if let Some(message) = search.snapshot().error {
        bail!(message);
    }

    Ok(search)
}

async fn search(config: &Config, query: &str) -> Result<()> {
    let search = lookup(config, query).await?;
    let places = search.snapshot().suggestions;

    if places.is_empty() {
        println!("No places found for '{query}'.");
        return Ok(());
    }

    for (i, place) in places.iter().enumerate() {
        println!("{:>2}. {}", i + 1, render::suggestion(place));
    }

    Ok(())
}

async fn show(config: &Config, query: &str, pick: usize) -> Result<()> {
    let mut search = lookup(config, query).await?;
    let found = search.snapshot().suggestions.len();

    let chosen = match pick {
        0 => bail!("--pick starts at 1"),
        1 => search.submit(),
        n => search.select(n - 1),
    }
    .ok_or_else(|| match found {
        0 => anyhow!("No places found for '{query}'."),
        n => anyhow!("Only {n} place(s) match '{query}'; run `meteo search {query}` to list them."),
    })?;

    let app = App::new(provider_from_config(config)?);
    let handle = app
        .select_location(chosen)
        .ok_or_else(|| anyhow!("a forecast is already loading"))?;
    handle.await.context("forecast task failed")?;

    match app.state() {
        state @ AppState::Success { .. } => {
            if let Some(view) = state.view() {
                print!("{}", render::forecast(&view));
                println!("{}", render::ATTRIBUTION);
            }
            Ok(())
        }
        AppState::Error { message } => bail!(message),
        other => bail!("unexpected state after loading: {other:?}"),
    }
}

fn configure(mut config: Config) -> Result<()> {
    config.endpoints.geocoding = Text::new("Geocoding endpoint:")
        .with_default(&config.endpoints.geocoding)
        .prompt()?;

    config.endpoints.forecast = Text::new("Forecast endpoint:")
        .with_default(&config.endpoints.forecast)
        .prompt()?;

    config.http.timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.http.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    config.search.debounce_ms = CustomType::<u64>::new("Search debounce (milliseconds):")
        .with_default(config.search.debounce_ms)
        .with_error_message("Please enter a whole number of milliseconds")
        .prompt()?;

    config.validate()?;
    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}
