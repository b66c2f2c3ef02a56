//! City autocomplete over the IBGE municipality list.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    Config,
    error::{Result, WeatherError},
    model::Municipality,
};

/// Maximum number of suggestions returned for a query.
pub const MAX_SUGGESTIONS: usize = 10;

/// Queries shorter than this (in characters) yield no suggestions.
pub const MIN_QUERY_CHARS: usize = 2;

/// Immutable, load-ordered set of municipalities answering prefix queries.
#[derive(Debug, Clone, Default)]
pub struct CitySuggestionIndex {
    entries: Vec<Municipality>,
    folded: Vec<String>,
}

impl CitySuggestionIndex {
    pub fn new(entries: Vec<Municipality>) -> Self {
        let folded = entries.iter().map(|m| m.name.to_lowercase()).collect();
        Self { entries, folded }
    }

    /// Download the full municipality list and index it.
    pub async fn load(http: &Client, url: &str) -> Result<Self> {
        let entries = fetch_municipalities(http, url).await?;
        Ok(Self::new(entries))
    }

    /// Load from the configured municipality URL.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| WeatherError::Network(e.to_string()))?;

        Self::load(&http, &config.municipalities_url).await
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive prefix match in load order, at most
    /// [`MAX_SUGGESTIONS`] results, nothing for queries under
    /// [`MIN_QUERY_CHARS`] characters.
    pub fn filter(&self, prefix: &str) -> Vec<Municipality> {
        if prefix.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let needle = prefix.to_lowercase();

        self.folded
            .iter()
            .zip(&self.entries)
            .filter(|(name, _)| name.starts_with(&needle))
            .map(|(_, m)| m.clone())
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    /// Municipality whose [`Municipality::label`] is exactly `label`.
    pub fn find_label(&self, label: &str) -> Option<&Municipality> {
        self.entries.iter().find(|m| m.label() == label)
    }
}

#[derive(Debug, Deserialize)]
struct IbgeMunicipality {
    nome: String,
    microrregiao: Option<IbgeMicroRegion>,
}

#[derive(Debug, Deserialize)]
struct IbgeMicroRegion {
    mesorregiao: Option<IbgeMesoRegion>,
}

#[derive(Debug, Deserialize)]
struct IbgeMesoRegion {
    #[serde(rename = "UF")]
    uf: Option<IbgeState>,
}

#[derive(Debug, Deserialize)]
struct IbgeState {
    sigla: String,
}

impl From<IbgeMunicipality> for Municipality {
    fn from(m: IbgeMunicipality) -> Self {
        let state = m
            .microrregiao
            .and_then(|micro| micro.mesorregiao)
            .and_then(|meso| meso.uf);

        Municipality {
            name: m.nome,
            state: state.map(|uf| uf.sigla),
        }
    }
}

/// Fetch the municipality list once; the result is never refreshed.
#[instrument(skip(http))]
pub async fn fetch_municipalities(http: &Client, url: &str) -> Result<Vec<Municipality>> {
    let res = http
        .get(url)
        .send()
        .await
        .map_err(|e| WeatherError::Network(format!("Failed to fetch municipality list: {e}")))?;

    let status = res.status();
    if !status.is_success() {
        return Err(WeatherError::Network(format!(
            "Municipality list request failed with status {status}"
        )));
    }

    let body = res
        .text()
        .await
        .map_err(|e| WeatherError::Network(format!("Failed to read municipality list: {e}")))?;

    parse_municipalities(&body)
}

fn parse_municipalities(body: &str) -> Result<Vec<Municipality>> {
    let raw: Vec<IbgeMunicipality> = serde_json::from_str(body)?;
    debug!(count = raw.len(), "loaded municipality list");

    Ok(raw.into_iter().map(Municipality::from).collect())
}
