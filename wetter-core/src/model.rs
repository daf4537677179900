use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// First geocoding hit for a free-text place name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Aggregated metrics for one forecast day.
///
/// A metric is `None` when the service has no value for that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    /// Calendar date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
}

/// Everything the search view displays.
///
/// The city name and the forecast always belong to the same completed lookup:
/// a failure empties both together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub city_text: String,
    pub forecast: Vec<DayForecast>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl SearchState {
    /// Back to the initial state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// A lookup is in flight. Text and the previous forecast stay visible.
    pub fn submit_started(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    /// Stores the forecast and replaces the typed text with the canonical name.
    pub fn submit_succeeded(&mut self, place: GeocodeMatch, forecast: Vec<DayForecast>) {
        self.forecast = forecast;
        self.city_text = place.name;
        self.is_loading = false;
    }

    pub fn submit_failed(&mut self, err: &LookupError) {
        self.error_message = Some(err.display_message());
        self.forecast.clear();
        self.city_text.clear();
        self.is_loading = false;
    }

    pub fn has_forecast(&self) -> bool {
        !self.forecast.is_empty()
    }
}
