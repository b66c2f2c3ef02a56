//! Interactive prompts.

use std::sync::Arc;

use inquire::{
    CustomUserError, Password, Text,
    autocompletion::{Autocomplete, Replacement},
};
use tempo_core::CitySuggestionIndex;

/// Feeds municipality labels to the search prompt as the user types.
#[derive(Debug, Clone)]
pub struct CitySuggester {
    index: Arc<CitySuggestionIndex>,
}

impl CitySuggester {
    pub fn new(index: Arc<CitySuggestionIndex>) -> Self {
        Self { index }
    }
}

impl Autocomplete for CitySuggester {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(self.index.filter(input).iter().map(|m| m.label()).collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

pub fn city(index: Arc<CitySuggestionIndex>, initial: Option<&str>) -> anyhow::Result<String> {
    let mut prompt = Text::new("Cidade:")
        .with_placeholder("Digite o nome da cidade")
        .with_autocomplete(CitySuggester::new(index));
    if let Some(initial) = initial {
        prompt = prompt.with_initial_value(initial);
    }
    Ok(prompt.prompt()?)
}

pub fn api_key() -> anyhow::Result<String> {
    let key = Password::new("HG Brasil API key:")
        .without_confirmation()
        .with_help_message("Get one at https://console.hgbrasil.com")
        .prompt()?;
    Ok(key.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_core::Municipality;

    #[test]
    fn suggester_returns_labels() {
        let index = Arc::new(CitySuggestionIndex::new(vec![
            Municipality::new("Recife", Some("PE")),
            Municipality::new("Olinda", Some("PE")),
        ]));
        let mut suggester = CitySuggester::new(index);

        assert_eq!(suggester.get_suggestions("re").unwrap(), vec!["Recife - PE".to_string()]);
        assert!(suggester.get_suggestions("r").unwrap().is_empty());
        assert_eq!(
            suggester.get_completion("re", Some("Recife - PE".into())).unwrap(),
            Some("Recife - PE".to_string())
        );
    }
}
