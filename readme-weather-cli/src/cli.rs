use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use std::path::{Path, PathBuf};

use readme_weather_core::{
    Config, ReadmeUpdater, UpdateOptions, WeatherSource, WeatherUpdatePayload,
    source_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "readme-weather",
    version,
    about = "Keep the weather section of a README up to date"
)]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set location, timezone and README path.
    Configure,

    /// Fetch current conditions and print them.
    Show,

    /// Fetch current conditions and rewrite the README section.
    Update {
        /// README to update; defaults to the configured path.
        #[arg(long)]
        readme: Option<PathBuf>,

        /// Rewrite even if the section is unchanged (same as FORCE_UPDATE=true).
        #[arg(long)]
        force: bool,
    },

    /// Rewrite the README section from a payload JSON file, without fetching.
    Apply {
        /// JSON file holding a weather payload.
        #[arg(long)]
        payload: PathBuf,

        /// README to update; defaults to the configured path.
        #[arg(long)]
        readme: Option<PathBuf>,

        /// Rewrite even if the section is unchanged (same as FORCE_UPDATE=true).
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config_path = match &self.config {
            Some(path) => path.clone(),
            None => Config::config_file_path()?,
        };
        let config = Config::load_from(&config_path)?;

        match self.command {
            Command::Configure => configure(config, &config_path)?,
            Command::Show => {
                let payload = source_from_config(&config)?.fetch().await?;
                print_payload(&payload);
            }
            Command::Update { readme, force } => {
                let payload = source_from_config(&config)?.fetch().await?;
                apply(&config, &payload, readme.as_deref(), force).await?;
            }
            Command::Apply {
                payload,
                readme,
                force,
            } => {
                let raw = tokio::fs::read_to_string(&payload)
                    .await
                    .with_context(|| format!("Failed to read payload file: {}", payload.display()))?;
                let payload: WeatherUpdatePayload = serde_json::from_str(&raw)
                    .with_context(|| format!("Failed to parse payload file: {}", payload.display()))?;
                apply(&config, &payload, readme.as_deref(), force).await?;
            }
        }

        Ok(())
    }
}

async fn apply(
    config: &Config,
    payload: &WeatherUpdatePayload,
    readme: Option<&Path>,
    force: bool,
) -> Result<()> {
    let mut options = UpdateOptions::from_env();
    options.force |= force;
    if options.ci {
        tracing::info!("Running under CI");
    }

    let updater = ReadmeUpdater::from_config(config)?.with_options(options);
    let target = readme.unwrap_or(config.readme.path.as_path());

    if updater.update(payload, Some(target)).await {
        println!("Updated {}", target.display());
    } else {
        println!("No changes written to {}", target.display());
    }

    Ok(())
}

fn print_payload(payload: &WeatherUpdatePayload) {
    println!("Weather:     {}", payload.description());
    println!("Temperature: {}°C", payload.temperature_c());
    println!("Humidity:    {}%", payload.humidity_pct());
    println!("Sunrise:     {}", payload.sunrise_local());
    println!("Sunset:      {}", payload.sunset_local());
    println!("Icon:        {}", payload.icon());
}

fn configure(mut config: Config, path: &Path) -> Result<()> {
    config.location.latitude = CustomType::<f64>::new("Latitude:")
        .with_default(config.location.latitude)
        .prompt()?;
    config.location.longitude = CustomType::<f64>::new("Longitude:")
        .with_default(config.location.longitude)
        .prompt()?;
    config.location.timezone = Text::new("Timezone (IANA name):")
        .with_default(&config.location.timezone)
        .prompt()?;
    config.location.tz()?;

    let readme = config.readme.path.display().to_string();
    config.readme.path = PathBuf::from(
        Text::new("README path:")
            .with_default(&readme)
            .prompt()?,
    );

    config.save_to(path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
