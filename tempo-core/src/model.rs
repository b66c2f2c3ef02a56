use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ICON_BASE_URL: &str = "https://assets.hgbrasil.com/weather/icons/conditions";

/// Whether the reading was taken during the day or at night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPeriod {
    Day,
    Night,
}

impl DayPeriod {
    /// Provider reports `"dia"` or `"noite"`; anything else counts as day.
    pub fn from_provider(value: &str) -> Self {
        if value.eq_ignore_ascii_case("noite") {
            DayPeriod::Night
        } else {
            DayPeriod::Day
        }
    }
}

/// Point-in-time weather reading for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature: i32,
    pub description: String,
    pub humidity: u8,
    /// Provider descriptor, e.g. "3.6 km/h".
    pub wind_speed: String,
    pub sunrise: String,
    pub sunset: String,
    pub condition_slug: String,
    pub period: DayPeriod,
    /// Chronological, index 0 is today.
    pub forecast: Vec<ForecastDay>,
}

impl WeatherSnapshot {
    pub fn today(&self) -> Option<&ForecastDay> {
        self.forecast.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub weekday: String,
    pub max: i32,
    pub min: i32,
    pub humidity: u8,
    pub rain_probability: u8,
    pub wind_speed: String,
    pub description: String,
    pub condition: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub max: f64,
    pub min: f64,
    pub avg: f64,
}

/// Aggregated readings for one past day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDay {
    pub date: String,
    pub temperature: Aggregate,
    pub humidity_avg: f64,
    /// km/h
    pub wind_speed_avg: f64,
    /// percent
    pub cloudiness_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Municipality {
    pub name: String,
    /// UF abbreviation, e.g. "PE". Absent for records without a micro-region.
    pub state: Option<String>,
}

impl Municipality {
    pub fn new(name: impl Into<String>, state: Option<&str>) -> Self {
        Self {
            name: name.into(),
            state: state.map(str::to_owned),
        }
    }

    pub fn label(&self) -> String {
        match &self.state {
            Some(uf) => format!("{} - {}", self.name, uf),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Inclusive date interval for historical lookups.
///
/// `start <= end` is not checked; the provider decides what an inverted
/// range means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

/// Image URI for a condition identifier. Invalid identifiers are not caught.
pub fn icon_url(base: &str, slug: &str) -> String {
    format!("{}/{}.svg", base.trim_end_matches('/'), slug)
}
