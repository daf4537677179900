//! The search flow: input, geocoding, forecast, display state.

use tracing::{info, warn};

use crate::{
    error::LookupError,
    model::{DayForecast, GeocodeMatch, SearchState},
    provider::ForecastService,
};

/// Resolve `city` and fetch its daily forecast.
///
/// The forecast request is only issued after the geocoder answered with a match.
pub async fn lookup<S>(
    service: &S,
    city: &str,
) -> Result<(GeocodeMatch, Vec<DayForecast>), LookupError>
where
    S: ForecastService + ?Sized,
{
    let place = service.geocode(city).await?.ok_or(LookupError::NotFound)?;
    let forecast = service.daily_forecast(&place).await?;
    Ok((place, forecast))
}

/// Owns the search state and drives it through the forecast service.
#[derive(Debug)]
pub struct SearchController<S> {
    service: S,
    state: SearchState,
}

impl<S: ForecastService> SearchController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: SearchState::default(),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Input edit; touches nothing but the text.
    pub fn set_city_text(&mut self, text: impl Into<String>) {
        self.state.city_text = text.into();
    }

    /// Whether the search action is enabled for the current text.
    pub fn can_submit(&self) -> bool {
        !self.state.city_text.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.state.clear();
    }

    /// Search for `city_text`. Blank input is ignored without any request.
    ///
    /// On failure city text and forecast are both emptied. Every outcome,
    /// including one for a stale search, is applied as it arrives.
    pub async fn submit(&mut self, city_text: &str) {
        if city_text.trim().is_empty() {
            return;
        }

        self.state.submit_started();

        match lookup(&self.service, city_text).await {
            Ok((place, forecast)) => {
                info!(query = city_text, place = %place.name, days = forecast.len(), "forecast loaded");
                self.state.submit_succeeded(place, forecast);
            }
            Err(err) => {
                warn!(query = city_text, error = %err, "lookup failed");
                self.state.submit_failed(&err);
            }
        }
    }

    /// Search for whatever is currently in the input.
    pub async fn submit_current(&mut self) {
        let text = self.state.city_text.clone();
        self.submit(&text).await;
    }
}
