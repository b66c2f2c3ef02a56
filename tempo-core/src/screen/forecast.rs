use std::sync::Arc;

use crate::{model::ForecastDay, provider::WeatherProvider};

use super::{ScreenModel, ScreenState};

pub const LOAD_FAILED: &str = "Não foi possível carregar a previsão estendida.";

/// Multi-day forecast for a city handed over by the caller.
#[derive(Debug)]
pub struct ExtendedForecastScreen {
    provider: Arc<dyn WeatherProvider>,
    city: String,
    model: ScreenModel<Vec<ForecastDay>>,
}

impl ExtendedForecastScreen {
    pub fn new(provider: Arc<dyn WeatherProvider>, city: impl Into<String>) -> Self {
        Self {
            provider,
            city: city.into(),
            model: ScreenModel::new("forecast"),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> ScreenState<Vec<ForecastDay>> {
        self.model.state()
    }

    pub async fn mount(&self) -> bool {
        self.reload().await
    }

    /// Switch to another city and fetch it.
    pub async fn set_city(&mut self, city: impl Into<String>) -> bool {
        self.city = city.into();
        self.reload().await
    }

    pub async fn reload(&self) -> bool {
        let fetch = self.provider.get_forecast(&self.city);
        self.model.run(fetch, |_| LOAD_FAILED.to_string()).await
    }

    pub fn unmount(&self) {
        self.model.unmount();
    }
}
