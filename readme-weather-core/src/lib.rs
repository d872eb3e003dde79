//! Core library for the `readme-weather` CLI.
//!
//! This crate defines:
//! - Configuration handling (location, target README, provider)
//! - The Open-Meteo client and WMO code mapping
//! - The format-preserving README section updater
//!
//! It is used by `readme-weather-cli`, but can also be driven from other binaries or jobs.

pub mod config;
pub mod model;
pub mod provider;
pub mod readme;
pub mod wmo;

pub use config::{Config, LocationConfig, ProviderConfig, ReadmeConfig};
pub use model::{Icon, IconKind, LocalTime, PayloadError, WeatherUpdatePayload};
pub use provider::{FetchError, WeatherClient, WeatherSource, source_from_config};
pub use readme::{ReadmeUpdater, SectionMarkers, UpdateOptions};
