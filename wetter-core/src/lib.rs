//! Core library for the `wetter` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The forecast-service abstraction and its Open-Meteo implementation
//! - Shared domain models and the search state they flow into
//!
//! It is used by `wetter-cli`, but the controller is UI-agnostic and can back
//! other front ends as well.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;

pub use config::Config;
pub use controller::{SearchController, lookup};
pub use error::{GENERIC_ERROR_MESSAGE, LookupError};
pub use model::{DayForecast, GeocodeMatch, SearchState};
pub use provider::{ForecastService, OpenMeteoProvider};
