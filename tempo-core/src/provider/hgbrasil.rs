use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::{collections::BTreeMap, time::Duration};
use tracing::{debug, instrument};

use crate::{
    Config,
    error::{Result, WeatherError},
    model::{
        Aggregate, Coordinates, DateRange, DayPeriod, ForecastDay, HistoricalDay, WeatherSnapshot,
    },
};

use super::WeatherProvider;

/// Client for the HG Brasil weather API.
#[derive(Debug, Clone)]
pub struct HgBrasilClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl HgBrasilClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_http(api_key, base_url, Client::new())
    }

    pub fn with_http(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn from_config(api_key: String, config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self::with_http(api_key, config.base_url.as_str(), http))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| WeatherError::Network(format!("Failed to send request to {path}: {e}")))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Network(format!("Failed to read {path} response body: {e}"))
        })?;

        debug!(%status, bytes = body.len(), "HG Brasil responded");

        if !status.is_success() {
            return Err(WeatherError::Network(format!(
                "{} request failed with status {}: {}",
                path,
                status,
                truncate_body(&body),
            )));
        }

        let envelope: HgEnvelope<T> = serde_json::from_str(&body)?;

        if envelope.error {
            return Err(WeatherError::Provider(
                envelope.message.unwrap_or_else(|| "provider reported an error".to_string()),
            ));
        }

        envelope
            .results
            .ok_or_else(|| WeatherError::Provider(format!("{path} response contained no results")))
    }

    async fn fetch_snapshot(&self, params: &[(&str, String)]) -> Result<WeatherSnapshot> {
        let results: HgResults = self.get_json("/weather", params).await?;
        Ok(results.into())
    }
}

#[derive(Debug, Deserialize)]
struct HgEnvelope<T> {
    #[serde(default)]
    error: bool,
    message: Option<String>,
    results: Option<T>,
}

#[derive(Debug, Deserialize)]
struct HgResults {
    city: String,
    temp: i32,
    description: String,
    #[serde(default)]
    humidity: u8,
    #[serde(default)]
    wind_speedy: String,
    #[serde(default)]
    sunrise: String,
    #[serde(default)]
    sunset: String,
    #[serde(default)]
    condition_slug: String,
    #[serde(default)]
    currently: String,
    #[serde(default)]
    forecast: Vec<HgForecastDay>,
}

#[derive(Debug, Deserialize)]
struct HgForecastDay {
    date: String,
    weekday: String,
    max: i32,
    min: i32,
    #[serde(default)]
    humidity: u8,
    #[serde(default)]
    rain_probability: u8,
    #[serde(default)]
    wind_speedy: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    condition: String,
}

#[derive(Debug, Deserialize)]
struct HgForecastOnly {
    #[serde(default)]
    forecast: Vec<HgForecastDay>,
}

#[derive(Debug, Deserialize)]
struct HgAvg {
    avg: f64,
}

#[derive(Debug, Deserialize)]
struct HgTemp {
    max: f64,
    min: f64,
    avg: f64,
}

#[derive(Debug, Deserialize)]
struct HgHistoricalDay {
    date: String,
    temp: HgTemp,
    humidity: HgAvg,
    wind_speedy: HgAvg,
    cloudiness: HgAvg,
}

/// Historical results come either as a list or as an object keyed by date.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HgHistoricalResults {
    List(Vec<HgHistoricalDay>),
    Keyed(BTreeMap<String, HgHistoricalDay>),
}

impl From<HgForecastDay> for ForecastDay {
    fn from(day: HgForecastDay) -> Self {
        ForecastDay {
            date: day.date,
            weekday: day.weekday,
            max: day.max,
            min: day.min,
            humidity: day.humidity,
            rain_probability: day.rain_probability,
            wind_speed: day.wind_speedy,
            description: day.description,
            condition: day.condition,
        }
    }
}

impl From<HgResults> for WeatherSnapshot {
    fn from(r: HgResults) -> Self {
        WeatherSnapshot {
            city: r.city,
            temperature: r.temp,
            description: r.description,
            humidity: r.humidity,
            wind_speed: r.wind_speedy,
            sunrise: r.sunrise,
            sunset: r.sunset,
            condition_slug: r.condition_slug,
            period: DayPeriod::from_provider(&r.currently),
            forecast: r.forecast.into_iter().map(ForecastDay::from).collect(),
        }
    }
}

impl From<HgHistoricalDay> for HistoricalDay {
    fn from(d: HgHistoricalDay) -> Self {
        HistoricalDay {
            date: d.date,
            temperature: Aggregate {
                max: d.temp.max,
                min: d.temp.min,
                avg: d.temp.avg,
            },
            humidity_avg: d.humidity.avg,
            wind_speed_avg: d.wind_speedy.avg,
            cloudiness_avg: d.cloudiness.avg,
        }
    }
}

impl HgHistoricalResults {
    fn into_days(self) -> Vec<HistoricalDay> {
        match self {
            HgHistoricalResults::List(days) => {
                days.into_iter().map(HistoricalDay::from).collect()
            }
            HgHistoricalResults::Keyed(days) => {
                days.into_values().map(HistoricalDay::from).collect()
            }
        }
    }
}

fn city_param(name: &str, state: Option<&str>) -> String {
    match state.map(str::trim).filter(|s| !s.is_empty()) {
        Some(uf) => format!("{},{}", name.trim(), uf),
        None => name.trim().to_string(),
    }
}

#[async_trait]
impl WeatherProvider for HgBrasilClient {
    #[instrument(skip(self))]
    async fn get_by_coordinates(&self, coords: Coordinates) -> Result<WeatherSnapshot> {
        self.fetch_snapshot(&[
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
        ])
        .await
    }

    #[instrument(skip(self))]
    async fn get_by_user_ip(&self) -> Result<WeatherSnapshot> {
        self.fetch_snapshot(&[("user_ip", "remote".to_string())]).await
    }

    #[instrument(skip(self))]
    async fn get_by_city(&self, name: &str, state: Option<&str>) -> Result<WeatherSnapshot> {
        self.fetch_snapshot(&[("city_name", city_param(name, state))]).await
    }

    #[instrument(skip(self))]
    async fn get_forecast(&self, city: &str) -> Result<Vec<ForecastDay>> {
        let results: HgForecastOnly =
            self.get_json("/weather", &[("city_name", city.trim().to_string())]).await?;

        Ok(results.forecast.into_iter().map(ForecastDay::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_historical(&self, city: &str, range: DateRange) -> Result<Vec<HistoricalDay>> {
        let results: HgHistoricalResults = self
            .get_json(
                "/weather/historical",
                &[
                    ("city_name", city.trim().to_string()),
                    ("start_date", range.start_param()),
                    ("end_date", range.end_param()),
                ],
            )
            .await?;

        Ok(results.into_days())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_param_appends_state_when_present() {
        assert_eq!(city_param("Recife", Some("PE")), "Recife,PE");
        assert_eq!(city_param(" Recife ", None), "Recife");
        assert_eq!(city_param("Recife", Some(" ")), "Recife");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(250);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);

        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn keyed_historical_results_are_ordered_by_key() {
        let json = serde_json::json!({
            "2024-01-02": {
                "date": "2024-01-02",
                "temp": { "max": 31.0, "min": 23.0, "avg": 27.0 },
                "humidity": { "avg": 70.0 },
                "wind_speedy": { "avg": 12.5 },
                "cloudiness": { "avg": 40.0 }
            },
            "2024-01-01": {
                "date": "2024-01-01",
                "temp": { "max": 30.0, "min": 22.0, "avg": 26.0 },
                "humidity": { "avg": 75.0 },
                "wind_speedy": { "avg": 10.0 },
                "cloudiness": { "avg": 50.0 }
            }
        });

        let parsed: HgHistoricalResults = serde_json::from_value(json).expect("valid results");
        let days = parsed.into_days();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-01-01");
        assert_eq!(days[1].temperature.max, 31.0);
    }

    #[test]
    fn snapshot_conversion_keeps_forecast_values() {
        let json = serde_json::json!({
            "city": "Recife, PE",
            "temp": 27,
            "description": "Parcialmente nublado",
            "currently": "noite",
            "forecast": [
                { "date": "16/10", "weekday": "Qui", "max": 30, "min": 22 }
            ]
        });

        let parsed: HgResults = serde_json::from_value(json).expect("valid results");
        let snapshot = WeatherSnapshot::from(parsed);

        assert_eq!(snapshot.period, DayPeriod::Night);
        assert_eq!(snapshot.humidity, 0);
        assert_eq!(snapshot.forecast[0].max, 30);
        assert_eq!(snapshot.forecast[0].min, 22);
    }
}
