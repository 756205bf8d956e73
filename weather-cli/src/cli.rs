use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::Password;
use tokio::io::{AsyncBufReadExt, BufReader};
use weather_core::{Config, SearchController, client_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup by city name")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the provider API key.
    Configure {
        /// API key; prompted for when omitted.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Look up current conditions for a city.
    Show {
        /// City name.
        city: String,

        /// Skip the five-day forecast.
        #[arg(long)]
        no_forecast: bool,
    },

    /// Read city names from stdin, searching as you type.
    ///
    /// Each line counts as an input change and is debounced; a blank line
    /// submits the current text immediately.
    Watch,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { api_key } => configure(api_key),
            Command::Show { city, no_forecast } => show(&city, no_forecast).await,
            Command::Watch => watch().await,
        }
    }
}

fn configure(api_key: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("API key:")
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    config.upsert_api_key(api_key);
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

fn controller(config: &Config) -> anyhow::Result<SearchController> {
    let client = client_from_config(config)?;
    Ok(SearchController::new(client, config.search.clone()))
}

async fn show(city: &str, no_forecast: bool) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if no_forecast {
        config.search.forecast = false;
    }

    let controller = controller(&config)?;
    controller.set_query(city);
    controller.search().await;

    let state = controller.snapshot();
    if let Some(message) = &state.error {
        return Err(anyhow!("{message}"));
    }

    print!("{}", render::format_state(&state));
    Ok(())
}

async fn watch() -> anyhow::Result<()> {
    let config = Config::load()?;
    let controller = controller(&config)?;

    let mut updates = controller.subscribe();
    let mut printer = render::SettledPrinter::default();

    eprintln!("Type a city name (Ctrl-D to quit).");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line.context("Failed to read stdin")? {
                Some(line) if line.trim().is_empty() => controller.search().await,
                Some(line) => controller.handle_input_change(&line),
                None => break,
            },
            Ok(()) = updates.changed() => {
                let state = updates.borrow_and_update().clone();
                if let Some(out) = printer.next(&state) {
                    print!("{out}");
                }
            }
        }
    }

    // Input ended: run whatever lookup is still pending before exiting.
    controller.flush().await;
    if let Some(out) = printer.next(&controller.snapshot()) {
        print!("{out}");
    }

    Ok(())
}
