//! Command-line interface parsing for Skycast
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a [`StartupConfig`] describing how the first location is resolved.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::data::Coordinates;
use crate::location::{resolve_from_text, LocationQuery};

/// Error types for CLI argument parsing
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// Only one of --lat / --lon was given
    #[error("--lat and --lon must be given together")]
    IncompleteCoordinates,

    /// Coordinates outside the valid range
    #[error("Invalid coordinates: latitude {lat} must be within ±90 and longitude {lon} within ±180")]
    CoordinatesOutOfRange { lat: f64, lon: f64 },

    /// --location was given but contains no words
    #[error("--location must not be blank")]
    EmptyLocation,
}

/// Skycast - current weather and forecast in your terminal
#[derive(Parser, Debug)]
#[command(name = "skycast")]
#[command(about = "Terminal weather dashboard with current conditions and forecast")]
#[command(version)]
pub struct Cli {
    /// Look up this place at startup instead of using geolocation
    ///
    /// Examples:
    ///   skycast --location "new york"
    ///   skycast --location paris --once
    #[arg(long, value_name = "PLACE")]
    pub location: Option<String>,

    /// Latitude to use as the device position (requires --lon)
    #[arg(long, allow_negative_numbers = true, value_name = "DEGREES")]
    pub lat: Option<f64>,

    /// Longitude to use as the device position (requires --lat)
    #[arg(long, allow_negative_numbers = true, value_name = "DEGREES")]
    pub lon: Option<f64>,

    /// Do not look up the device position at startup
    #[arg(long)]
    pub no_geolocate: bool,

    /// Path to an alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the weather once as plain text instead of starting the dashboard
    #[arg(long)]
    pub once: bool,
}

/// Where the device position comes from at startup
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PositionChoice {
    /// Ask the IP lookup service
    #[default]
    Lookup,
    /// Use coordinates given on the command line
    Fixed(Coordinates),
    /// Geolocation is turned off
    Denied,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartupConfig {
    /// Place typed on the command line; skips geolocation when set
    pub initial_search: Option<LocationQuery>,
    /// Position source used when geolocating
    pub position: PositionChoice,
    /// Alternate config file
    pub config_path: Option<PathBuf>,
    /// Run the pipeline once and print plain text
    pub once: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if coordinates or location are invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_search = match &cli.location {
            None => None,
            Some(text) => {
                let query = resolve_from_text(text);
                if query.is_empty() {
                    return Err(CliError::EmptyLocation);
                }
                Some(query)
            }
        };

        let position = match (cli.lat, cli.lon) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                    return Err(CliError::CoordinatesOutOfRange { lat, lon });
                }
                PositionChoice::Fixed(Coordinates::new(lat, lon))
            }
            (Some(_), None) | (None, Some(_)) => return Err(CliError::IncompleteCoordinates),
            (None, None) if cli.no_geolocate => PositionChoice::Denied,
            (None, None) => PositionChoice::Lookup,
        };

        Ok(StartupConfig {
            initial_search,
            position,
            config_path: cli.config.clone(),
            once: cli.once,
        })
    }
}
