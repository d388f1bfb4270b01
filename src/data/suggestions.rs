//! City suggestion and validation client
//!
//! Wraps the two read-only lookups the trip form makes before an itinerary
//! is requested: candidate cities for a country, and a yes/no check for a
//! city the user typed in.

use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use super::{get_json, ApiError, DEFAULT_API_URL};

/// Path of the city suggestion endpoint
const SUGGEST_CITIES_PATH: &str = "/api/suggest-cities";

/// Path of the city validation endpoint
const VALIDATE_CITY_PATH: &str = "/api/validate-city";

/// Response from the suggestion endpoint
#[derive(Debug, Deserialize)]
struct SuggestCitiesResponse {
    #[serde(default)]
    suggested_cities: Vec<String>,
    /// Set by the backend when its model call failed
    #[serde(default)]
    error: Option<String>,
}

/// Response from the validation endpoint
#[derive(Debug, Deserialize)]
struct ValidateCityResponse {
    #[serde(default)]
    valid: bool,
}

/// Client for the suggestion and validation endpoints
#[derive(Debug, Clone)]
pub struct SuggestionClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL of the itinerary service
    base_url: String,
}

impl Default for SuggestionClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl SuggestionClient {
    /// Creates a new SuggestionClient for the given service URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a new SuggestionClient sharing an existing HTTP client
    pub fn with_client(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches candidate cities for a country
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - City names in the order the backend ranked them
    /// * `Err(ApiError)` - If the request fails or the body is not valid JSON
    pub async fn suggest_cities(&self, country: &str) -> Result<Vec<String>, ApiError> {
        let response: SuggestCitiesResponse = get_json(
            &self.http_client,
            &self.base_url,
            SUGGEST_CITIES_PATH,
            &[("country", country)],
        )
        .await?;

        if let Some(error) = &response.error {
            warn!(country, %error, "suggestion backend reported an error");
        }
        info!(
            country,
            count = response.suggested_cities.len(),
            "received city suggestions"
        );
        Ok(response.suggested_cities)
    }

    /// Asks the backend whether `city` is a real city in `country`
    pub async fn validate_city(&self, country: &str, city: &str) -> Result<bool, ApiError> {
        let response: ValidateCityResponse = get_json(
            &self.http_client,
            &self.base_url,
            VALIDATE_CITY_PATH,
            &[("country", country), ("city", city)],
        )
        .await?;

        info!(country, city, valid = response.valid, "validated city");
        Ok(response.valid)
    }
}
