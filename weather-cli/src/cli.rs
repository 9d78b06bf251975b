use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{InquireError, Text};
use tracing::debug;
use weather_core::{
    Config, SourceId, WeatherPresenter,
    source::{default_source_from_config, source_from_config},
};

use crate::{configure, view};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup screen for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure a mock source and make it the default.
    Configure {
        /// Source short name, "random" or "fixed".
        source: String,
    },

    /// Show the weather for a city.
    Show {
        /// City name.
        #[arg(value_parser = parse_city)]
        city: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Print the final presenter state as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Look up cities one after another until an empty name is entered.
    Interactive {
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Per-invocation overrides of the configured source.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Source to use instead of the configured default.
    #[arg(long)]
    source: Option<String>,

    /// Seed for the random source.
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated lookup latency in milliseconds.
    #[arg(long)]
    latency_ms: Option<u64>,
}

impl SourceArgs {
    fn presenter(&self) -> anyhow::Result<WeatherPresenter> {
        let mut config = Config::load()?;

        if let Some(seed) = self.seed {
            config.mock.seed = Some(seed);
        }
        if let Some(latency_ms) = self.latency_ms {
            config.mock.latency_ms = latency_ms;
        }

        let source = match &self.source {
            Some(name) => source_from_config(SourceId::try_from(name.as_str())?, &config)?,
            None => default_source_from_config(&config)?,
        };
        debug!(?source, "source ready");

        Ok(WeatherPresenter::new(Arc::from(source)))
    }
}

fn parse_city(value: &str) -> Result<String, String> {
    let city = value.trim();
    if city.is_empty() {
        Err("city name must not be empty".to_string())
    } else {
        Ok(city.to_string())
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { source } => {
                let id = SourceId::try_from(source.as_str())?;
                let mut config = Config::load()?;

                configure::prompt(id, &mut config)?;
                config.save()?;

                println!(
                    "Saved '{id}' as the default source in {}",
                    Config::config_file_path()?.display()
                );
            }
            Command::Show { city, source, json } => {
                let presenter = source.presenter()?;

                if json {
                    presenter.fetch(&city).await;
                    let state = presenter.state();
                    let out = serde_json::to_string_pretty(&state)
                        .context("Failed to serialize presenter state")?;
                    println!("{out}");
                } else {
                    view::follow_fetch(&presenter, &city, &mut std::io::stdout()).await?;
                }
            }
            Command::Interactive { source } => {
                let presenter = source.presenter()?;

                loop {
                    let prompt = Text::new("City:").with_help_message("empty or Esc to quit");
                    let input = match prompt.prompt_skippable() {
                        Ok(input) => input,
                        Err(InquireError::OperationInterrupted) => break,
                        Err(err) => return Err(err.into()),
                    };

                    let Some(city) = input.as_deref().and_then(|s| parse_city(s).ok()) else {
                        break;
                    };

                    view::follow_fetch(&presenter, &city, &mut std::io::stdout()).await?;
                }
            }
        }

        Ok(())
    }
}
