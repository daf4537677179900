use crate::{
    error::LookupError,
    model::{DayForecast, GeocodeMatch},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;

pub use openmeteo::OpenMeteoProvider;

/// The two remote lookups a search needs, in the order they are issued.
#[async_trait]
pub trait ForecastService: Send + Sync + Debug {
    /// Resolve a free-text place name. Only the first match is returned.
    async fn geocode(&self, name: &str) -> Result<Option<GeocodeMatch>, LookupError>;

    /// Daily forecast for the given place, ordered by ascending date.
    async fn daily_forecast(&self, place: &GeocodeMatch) -> Result<Vec<DayForecast>, LookupError>;
}

#[async_trait]
impl<S: ForecastService + ?Sized> ForecastService for Box<S> {
    async fn geocode(&self, name: &str) -> Result<Option<GeocodeMatch>, LookupError> {
        (**self).geocode(name).await
    }

    async fn daily_forecast(&self, place: &GeocodeMatch) -> Result<Vec<DayForecast>, LookupError> {
        (**self).daily_forecast(place).await
    }
}
