use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::{
    model::{DateRange, HistoricalDay},
    provider::WeatherProvider,
};

use super::{ScreenModel, ScreenState};

pub const LOAD_FAILED: &str = "Não foi possível carregar os dados históricos.";

/// Aggregated past readings for a city over a chosen date range.
#[derive(Debug)]
pub struct HistoryScreen {
    provider: Arc<dyn WeatherProvider>,
    city: String,
    range: DateRange,
    model: ScreenModel<Vec<HistoricalDay>>,
}

impl HistoryScreen {
    /// Range starts out as today..today.
    pub fn new(provider: Arc<dyn WeatherProvider>, city: impl Into<String>) -> Self {
        let today = Local::now().date_naive();
        Self {
            provider,
            city: city.into(),
            range: DateRange::single(today),
            model: ScreenModel::new("history"),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn state(&self) -> ScreenState<Vec<HistoricalDay>> {
        self.model.state()
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
    }

    pub fn set_start(&mut self, start: NaiveDate) {
        self.range.start = start;
    }

    pub fn set_end(&mut self, end: NaiveDate) {
        self.range.end = end;
    }

    pub async fn mount(&self) -> bool {
        self.search().await
    }

    /// Fetch the current range. Inverted ranges go to the provider unchanged.
    pub async fn search(&self) -> bool {
        let fetch = self.provider.get_historical(&self.city, self.range);
        self.model.run(fetch, |_| LOAD_FAILED.to_string()).await
    }

    pub fn unmount(&self) {
        self.model.unmount();
    }
}
