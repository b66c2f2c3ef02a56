use std::sync::Arc;

use tracing::info;

use crate::{
    error::WeatherError, location::LocationResolver, model::WeatherSnapshot,
    provider::WeatherProvider,
};

use super::{ScreenModel, ScreenState};

pub const LOAD_FAILED: &str = "Não foi possível carregar os dados climáticos.";
pub const PERMISSION_DENIED: &str = "Permissão de localização negada.";

/// Where the Home screen gets its location from.
#[derive(Debug, Clone)]
pub enum HomeSource {
    /// Ask the resolver for permission, then for coordinates.
    Device(Arc<dyn LocationResolver>),
    /// Let the provider geolocate the caller's public IP.
    UserIp,
}

/// Current conditions for wherever the user is.
#[derive(Debug)]
pub struct HomeScreen {
    provider: Arc<dyn WeatherProvider>,
    source: HomeSource,
    model: ScreenModel<WeatherSnapshot>,
}

impl HomeScreen {
    pub fn new(provider: Arc<dyn WeatherProvider>, locator: Arc<dyn LocationResolver>) -> Self {
        Self::with_source(provider, HomeSource::Device(locator))
    }

    pub fn by_user_ip(provider: Arc<dyn WeatherProvider>) -> Self {
        Self::with_source(provider, HomeSource::UserIp)
    }

    fn with_source(provider: Arc<dyn WeatherProvider>, source: HomeSource) -> Self {
        Self {
            provider,
            source,
            model: ScreenModel::new("home"),
        }
    }

    pub fn state(&self) -> ScreenState<WeatherSnapshot> {
        self.model.state()
    }

    /// Load on mount.
    pub async fn mount(&self) -> bool {
        self.refresh().await
    }

    /// Shows `Loading` right away, before the resolver is consulted, so a
    /// slow permission prompt still supersedes earlier fetches.
    pub async fn refresh(&self) -> bool {
        let ticket = self.model.begin();

        match &self.source {
            HomeSource::Device(locator) => {
                if !locator.request_permission().await {
                    info!("location permission denied");
                    self.model.finish(ticket, Err(PERMISSION_DENIED.to_string()));
                    return false;
                }

                let fetch = async {
                    let coords = locator.current_position().await?;
                    self.provider.get_by_coordinates(coords).await
                };
                self.model.run_with(ticket, fetch, message_for).await
            }
            HomeSource::UserIp => {
                self.model.run_with(ticket, self.provider.get_by_user_ip(), message_for).await
            }
        }
    }

    pub fn unmount(&self) {
        self.model.unmount();
    }
}

fn message_for(err: &WeatherError) -> String {
    let message = if err.is_permission_denied() {
        PERMISSION_DENIED
    } else {
        LOAD_FAILED
    };
    message.to_string()
}
