use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Select, Text};
use weather_core::{
    Config, Coordinates, DisplayState, FavoritesStore, FileStore, FixedLocator, Orchestrator,
    Units, provider::gateway_from_config,
};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the OpenWeather API key, default units and home position.
    Configure,

    /// Show current weather and forecast for a city.
    Show {
        /// City name, e.g. "London" or "Springfield, IL".
        city: String,

        /// Unit system: metric or imperial. Defaults to the configured one.
        #[arg(long)]
        units: Option<Units>,

        /// Add the displayed location to favorites.
        #[arg(long)]
        favorite: bool,
    },

    /// Show weather for your current position.
    Here {
        /// Latitude; overrides the configured home position.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude; overrides the configured home position.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        #[arg(long)]
        units: Option<Units>,
    },

    /// Suggest city names matching a partial query.
    Suggest {
        query: String,
    },

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Start an interactive session.
    Interactive {
        #[arg(long)]
        units: Option<Units>,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// List favorite cities.
    List,
    /// Add a city to favorites.
    Add { city: String },
    /// Remove a city from favorites.
    Remove { city: String },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Show { city, units, favorite } => {
                let orch = orchestrator(&config, units, config.home)?;
                present(&orch.search(&city).await)?;

                if favorite {
                    if let Some(name) = orch.displayed_location() {
                        let mut favorites = load_favorites()?;
                        if favorites.add(&name)? {
                            println!("Added {name} to favorites.");
                        } else {
                            println!("{name} is already a favorite.");
                        }
                    }
                }
                Ok(())
            }
            Command::Here { lat, lon, units } => {
                let position = match (lat, lon) {
                    (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
                    _ => config.home,
                };
                let orch = orchestrator(&config, units, position)?;
                present(&orch.use_current_location().await)
            }
            Command::Suggest { query } => {
                let orch = orchestrator(&config, None, None)?;
                for suggestion in orch.suggestions(&query).await {
                    println!("{suggestion}");
                }
                Ok(())
            }
            Command::Favorites { action } => favorites(action),
            Command::Interactive { units } => {
                let orch = orchestrator(&config, units, config.home)?;
                interactive::run(&orch, load_favorites()?).await
            }
        }
    }
}

fn orchestrator(
    config: &Config,
    units: Option<Units>,
    position: Option<Coordinates>,
) -> Result<Orchestrator> {
    let gateway = gateway_from_config(config)?;
    Ok(Orchestrator::new(
        gateway,
        Box::new(FixedLocator::new(position)),
        units.unwrap_or(config.units),
        config.day_boundary,
    ))
}

fn load_favorites() -> Result<FavoritesStore<FileStore>> {
    let dir = Config::data_dir()?;
    Ok(FavoritesStore::load(FileStore::new(dir)))
}

fn favorites(action: FavoritesAction) -> Result<()> {
    let mut favorites = load_favorites()?;

    match action {
        FavoritesAction::List => {
            if favorites.list().is_empty() {
                println!("No favorite cities yet.");
            }
            for city in favorites.list() {
                println!("{city}");
            }
        }
        FavoritesAction::Add { city } => {
            if favorites.add(&city)? {
                println!("Added {} to favorites.", city.trim());
            } else {
                println!("{} is already a favorite.", city.trim());
            }
        }
        FavoritesAction::Remove { city } => {
            if favorites.remove(&city)? {
                println!("Removed {} from favorites.", city.trim());
            } else {
                println!("{} is not a favorite.", city.trim());
            }
        }
    }

    Ok(())
}

fn configure(mut config: Config) -> Result<()> {
    let api_key = Text::new("OpenWeather API key:")
        .with_initial_value(config.api_key.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key);

    let options = vec![Units::Metric, Units::Imperial];
    let start = options.iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Default units:", options)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;

    let set_home = Confirm::new("Set a home position for `weather here`?")
        .with_default(config.home.is_some())
        .prompt()
        .context("Failed to read answer")?;
    config.home = if set_home {
        let latitude = CustomType::<f64>::new("Latitude:")
            .prompt()
            .context("Failed to read latitude")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .prompt()
            .context("Failed to read longitude")?;
        Some(Coordinates { latitude, longitude })
    } else {
        None
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Print a lookup result; an error state fails the command instead.
fn present(display: &DisplayState) -> Result<()> {
    match display {
        DisplayState::Error(message) => bail!("{message}"),
        other => {
            print!("{}", render::display(other));
            Ok(())
        }
    }
}
