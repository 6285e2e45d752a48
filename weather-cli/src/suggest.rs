use inquire::{
    CustomUserError,
    autocompletion::{Autocomplete, Replacement},
};
use weather_core::CityList;

/// Offered in the search prompt even before anything has been searched.
pub const SUGGESTED_CITIES: [&str; 13] = [
    "Tampere",
    "Helsinki",
    "Turku",
    "Amsterdam",
    "Paris",
    "New York",
    "Tokyo",
    "London",
    "Sydney",
    "Moscow",
    "Rio de Janeiro",
    "Beijing",
    "Cape Town",
];

/// Autocompletion for city names: the user's history, newest first, then
/// the built-in cities.
#[derive(Debug, Clone)]
pub struct CitySuggester {
    cities: Vec<String>,
}

impl CitySuggester {
    pub fn new(history: &CityList) -> Self {
        let mut cities: Vec<String> = Vec::new();
        for city in history.iter().rev().chain(SUGGESTED_CITIES) {
            if !cities.iter().any(|c| c.eq_ignore_ascii_case(city)) {
                cities.push(city.to_string());
            }
        }
        Self { cities }
    }

    /// Case-insensitive substring match. Nothing is offered for blank input.
    pub fn suggestions(&self, input: &str) -> Vec<String> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.cities
            .iter()
            .filter(|city| city.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

impl Autocomplete for CitySuggester {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(self.suggestions(input))
    }

    fn get_completion(
        &mut self,
        input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        if highlighted_suggestion.is_some() {
            return Ok(highlighted_suggestion);
        }

        let mut matches = self.suggestions(input);
        Ok(if matches.len() == 1 { matches.pop() } else { None })
    }
}
