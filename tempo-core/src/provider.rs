use crate::{
    Config,
    error::Result,
    model::{Coordinates, DateRange, ForecastDay, HistoricalDay, WeatherSnapshot},
    provider::hgbrasil::HgBrasilClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod hgbrasil;

/// Remote weather source used by every screen.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_by_coordinates(&self, coords: Coordinates) -> Result<WeatherSnapshot>;

    /// Let the provider geolocate the caller from its public IP.
    async fn get_by_user_ip(&self) -> Result<WeatherSnapshot>;

    /// `state` is a UF abbreviation used to disambiguate cities sharing a name.
    async fn get_by_city(&self, name: &str, state: Option<&str>) -> Result<WeatherSnapshot>;

    async fn get_forecast(&self, city: &str) -> Result<Vec<ForecastDay>>;

    async fn get_historical(&self, city: &str, range: DateRange) -> Result<Vec<HistoricalDay>>;
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    let client = HgBrasilClient::from_config(api_key.to_owned(), config)?;

    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());
        cfg.timeout_secs = Some(5);

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
