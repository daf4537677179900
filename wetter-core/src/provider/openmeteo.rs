use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    config::Config,
    error::LookupError,
    model::{DayForecast, GeocodeMatch},
};

use super::ForecastService;

/// Daily variables requested from the forecast endpoint, in this order.
pub const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,windspeed_10m_max";

const GEOCODER: &str = "Open-Meteo Geocoding";
const FORECASTER: &str = "Open-Meteo Forecast";

/// Open-Meteo geocoding and forecast client. Needs no API key.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
    language: String,
    timezone: String,
    forecast_days: Option<u8>,
}

impl OpenMeteoProvider {
    pub fn from_config(config: &Config) -> Result<Self, LookupError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
            language: config.language.clone(),
            timezone: config.timezone.clone(),
            forecast_days: config.forecast_days,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, LookupError> {
        debug!(service, url, ?query, "sending request");

        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LookupError::Status {
                service,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| LookupError::Parse { service, source })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: DailyBlock,
}

/// The `daily` object of a forecast response: one array per variable,
/// all indexed by day. Days without data come as `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyBlock {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub windspeed_10m_max: Vec<Option<f64>>,
}

/// Zip the parallel daily arrays into one record per day, in source order.
///
/// All arrays must be as long as `time`; a mismatch is an error rather than
/// a silent truncation.
pub fn zip_daily(daily: &DailyBlock) -> Result<Vec<DayForecast>, LookupError> {
    let expected = daily.time.len();
    for (field, actual) in [
        ("temperature_2m_max", daily.temperature_2m_max.len()),
        ("temperature_2m_min", daily.temperature_2m_min.len()),
        ("precipitation_sum", daily.precipitation_sum.len()),
        ("windspeed_10m_max", daily.windspeed_10m_max.len()),
    ] {
        if actual != expected {
            return Err(LookupError::LengthMismatch {
                field,
                expected,
                actual,
            });
        }
    }

    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| LookupError::InvalidDate(raw.clone()))?;

            Ok(DayForecast {
                date,
                temp_max: daily.temperature_2m_max[i],
                temp_min: daily.temperature_2m_min[i],
                precipitation_mm: daily.precipitation_sum[i],
                wind_speed_kmh: daily.windspeed_10m_max[i],
            })
        })
        .collect()
}

#[async_trait]
impl ForecastService for OpenMeteoProvider {
    #[instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<Option<GeocodeMatch>, LookupError> {
        let query = [
            ("name", name.to_string()),
            ("count", "1".to_string()),
            ("language", self.language.clone()),
            ("format", "json".to_string()),
        ];

        let parsed: GeocodingResponse = self.get_json(GEOCODER, &self.geocoding_url, &query).await?;

        let first = parsed.results.unwrap_or_default().into_iter().next();
        Ok(first.map(|r| GeocodeMatch {
            name: r.name,
            latitude: r.latitude,
            longitude: r.longitude,
        }))
    }

    #[instrument(skip(self, place), fields(place = %place.name, lat = place.latitude, lon = place.longitude))]
    async fn daily_forecast(&self, place: &GeocodeMatch) -> Result<Vec<DayForecast>, LookupError> {
        let mut query = vec![
            ("latitude", place.latitude.to_string()),
            ("longitude", place.longitude.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", self.timezone.clone()),
        ];
        if let Some(days) = self.forecast_days {
            query.push(("forecast_days", days.to_string()));
        }

        let parsed: ForecastResponse = self.get_json(FORECASTER, &self.forecast_url, &query).await?;

        let days = zip_daily(&parsed.daily)?;
        debug!(days = days.len(), "forecast parsed");
        Ok(days)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
