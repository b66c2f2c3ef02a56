use std::sync::Arc;

use tracing::debug;

use crate::{
    cities::CitySuggestionIndex,
    error::{Result, WeatherError},
    model::{Municipality, WeatherSnapshot},
    provider::WeatherProvider,
};

use super::{ScreenModel, ScreenState};

pub const EMPTY_QUERY: &str = "Por favor, insira o nome de uma cidade.";
pub const NOT_FOUND: &str = "Não foi possível encontrar a cidade.";

/// Free-text city lookup with autocomplete.
#[derive(Debug)]
pub struct SearchScreen {
    provider: Arc<dyn WeatherProvider>,
    index: Option<Arc<CitySuggestionIndex>>,
    query: String,
    model: ScreenModel<WeatherSnapshot>,
}

impl SearchScreen {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            index: None,
            query: String::new(),
            model: ScreenModel::new("search"),
        }
    }

    /// Attach the municipality list used for suggestions.
    pub fn with_suggestions(mut self, index: Arc<CitySuggestionIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn state(&self) -> ScreenState<WeatherSnapshot> {
        self.model.state()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Update the input text and return suggestions for it.
    pub fn set_query(&mut self, text: impl Into<String>) -> Vec<Municipality> {
        self.query = text.into();
        self.suggestions()
    }

    pub fn suggestions(&self) -> Vec<Municipality> {
        self.index.as_ref().map(|idx| idx.filter(&self.query)).unwrap_or_default()
    }

    /// Search for the current input. Empty input fails without a request.
    pub async fn submit(&self) -> bool {
        match validate_query(&self.query) {
            Ok(name) => self.search(name, None).await,
            Err(err) => {
                debug!(%err, "search rejected");
                self.model.fail_now(EMPTY_QUERY);
                false
            }
        }
    }

    /// Pick a suggestion: the input becomes its name and it is searched
    /// together with its state.
    pub async fn select(&mut self, municipality: &Municipality) -> bool {
        self.query = municipality.name.clone();
        self.search(&municipality.name, municipality.state.as_deref()).await
    }

    pub async fn search(&self, name: &str, state: Option<&str>) -> bool {
        let fetch = self.provider.get_by_city(name, state);
        self.model.run(fetch, |_| NOT_FOUND.to_string()).await
    }

    pub fn unmount(&self) {
        self.model.unmount();
    }
}

fn validate_query(query: &str) -> Result<&str> {
    let name = query.trim();
    if name.is_empty() {
        return Err(WeatherError::Validation("city name is empty".to_string()));
    }
    Ok(name)
}
