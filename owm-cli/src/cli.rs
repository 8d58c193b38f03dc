use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use serde::Serialize;

use owm_core::model::road_risk::TrackPoint;
use owm_core::{Config, Coordinates, Language, OpenWeatherMapClient, UnitSystem, client_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "owm", version, about = "OpenWeatherMap command-line client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Unit system: standard, metric or imperial. Defaults to the configured one.
    #[arg(long, global = true)]
    pub units: Option<UnitSystem>,

    /// Language code for condition descriptions, e.g. "de".
    #[arg(long, global = true)]
    pub lang: Option<Language>,

    /// Print the mapped result as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default preferences.
    Configure,

    /// Current weather for a city.
    Current {
        city: String,

        /// Two-letter country code to disambiguate the city.
        #[arg(long)]
        country: Option<String>,
    },

    /// Five-day forecast in three-hour steps.
    Forecast {
        city: String,

        /// Number of entries to fetch (1-40).
        #[arg(long)]
        count: Option<u32>,

        /// Only show the entry closest to this RFC 3339 time.
        #[arg(long)]
        at: Option<String>,
    },

    /// Air pollution at a point.
    Air {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lon: f64,

        /// Hourly forecast instead of current readings.
        #[arg(long)]
        forecast: bool,
    },

    /// Look up coordinates for a place name, e.g. "London,GB".
    Geocode {
        name: String,

        /// Maximum number of matches (1-5).
        #[arg(long, default_value_t = 5)]
        limit: u8,
    },

    /// Road conditions at a point, now.
    RoadRisk {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
}

/// Preferences resolved from flags and the stored configuration.
struct Output {
    units: UnitSystem,
    language: Option<Language>,
    json: bool,
}

impl Output {
    fn print<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text(value));
        }
        Ok(())
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config),
            command => {
                let output = Output {
                    units: self.units.unwrap_or_else(|| config.units_or_default()),
                    language: self.lang.or(config.language),
                    json: self.json,
                };
                tracing::debug!(units = %output.units, language = ?output.language, "resolved preferences");

                let client = client_from_config(&config)?;
                execute(command, &client, &output).await
            }
        }
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    let systems = vec![UnitSystem::Standard, UnitSystem::Metric, UnitSystem::Imperial];
    let current = config.units_or_default();
    let units = Select::new("Default units:", systems.clone())
        .with_starting_cursor(systems.iter().position(|u| *u == current).unwrap_or(0))
        .prompt()?;

    let languages = Language::all().to_vec();
    let current = config.language.unwrap_or_default();
    let language = Select::new("Default language:", languages.clone())
        .with_starting_cursor(languages.iter().position(|l| *l == current).unwrap_or(0))
        .prompt()?;

    config.set_api_key(api_key.trim().to_string());
    config.units = Some(units);
    config.language = Some(language);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn execute(command: Command, client: &OpenWeatherMapClient, output: &Output) -> anyhow::Result<()> {
    match command {
        Command::Configure => configure(&mut Config::load()?),

        Command::Current { city, country } => {
            let requester = client.current_weather();
            let request = match country.as_deref() {
                Some(country) => requester.by_city_name_and_country(&city, country)?,
                None => requester.by_city_name(&city)?,
            };
            let request = request.unit_system(output.units);
            let request = match output.language {
                Some(language) => request.language(language),
                None => request,
            };

            let weather = request.retrieve_async().as_model().await?;
            output.print(&weather, |w| render::weather(w, output.units))
        }

        Command::Forecast { city, count, at } => {
            let at = at.as_deref().map(parse_time).transpose()?;

            let mut request = client
                .forecast_5day_3hour()
                .by_city_name(&city)?
                .unit_system(output.units);
            if let Some(count) = count {
                request = request.count(count)?;
            }
            if let Some(language) = output.language {
                request = request.language(language);
            }

            let forecast = request.retrieve_async().as_model().await?;
            match at {
                Some(at) => {
                    let entry = forecast
                        .closest_to(at)
                        .with_context(|| format!("no forecast entries for {city}"))?;
                    output.print(entry, |e| render::forecast_entry(e, output.units))
                }
                None => output.print(&forecast, |f| render::forecast(f, output.units)),
            }
        }

        Command::Air { lat, lon, forecast } => {
            let coordinates = Coordinates::new(lat, lon)?;
            let requester = client.air_pollution();
            let details = if forecast {
                requester.forecast().by_coordinates(coordinates).retrieve_async().as_model().await?
            } else {
                requester.current().by_coordinates(coordinates).retrieve_async().as_model().await?
            };
            output.print(&details, render::air_pollution)
        }

        Command::Geocode { name, limit } => {
            let places = client
                .geocoding()
                .direct()
                .by_location_name(&name)?
                .limit(limit)?
                .retrieve_async()
                .as_model()
                .await?;
            output.print(&places, |p| render::places(p))
        }

        Command::RoadRisk { lat, lon } => {
            let point = TrackPoint::new(Coordinates::new(lat, lon)?, Utc::now());
            let records = client
                .road_risk()
                .by_track_points(vec![point])?
                .retrieve_async()
                .as_model()
                .await?;
            output.print(&records, |r| render::road_risk(r, output.units))
        }
    }
}

fn parse_time(value: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("invalid time '{value}', expected RFC 3339 like 2026-10-17T12:00:00Z"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["owm", "current", "Minsk", "--units", "metric", "--lang", "de", "--json"])
            .unwrap();

        assert_eq!(cli.units, Some(UnitSystem::Metric));
        assert_eq!(cli.lang, Some(Language::German));
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Current { ref city, country: None } if city == "Minsk"));
    }

    #[test]
    fn accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["owm", "air", "-33.86", "151.2", "--forecast"]).unwrap();

        match cli.command {
            Command::Air { lat, lon, forecast } => {
                assert_eq!(lat, -33.86);
                assert_eq!(lon, 151.2);
                assert!(forecast);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_unit_system() {
        assert!(Cli::try_parse_from(["owm", "current", "Minsk", "--units", "kelvin"]).is_err());
    }

    #[test]
    fn parses_rfc3339_times() {
        let t = parse_time("2026-10-17T12:00:00+02:00").unwrap();

        assert_eq!(t.to_rfc3339(), "2026-10-17T10:00:00+00:00");
        assert!(parse_time("tomorrow").is_err());
    }
}
