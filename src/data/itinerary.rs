//! Itinerary generation client
//!
//! Requests a combined day-by-day plan for the selected cities.

use reqwest::Client;
use tracing::{info, warn};

use super::{get_json, ApiError, ItineraryResponse, TripRequest, DEFAULT_API_URL};

/// Path of the itinerary endpoint
const ITINERARY_PATH: &str = "/api/itinerary";

/// Client for the itinerary endpoint
#[derive(Debug, Clone)]
pub struct ItineraryClient {
    http_client: Client,
    base_url: String,
}

impl Default for ItineraryClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ItineraryClient {
    /// Creates a new ItineraryClient for the given service URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a new ItineraryClient sharing an existing HTTP client
    pub fn with_client(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches an itinerary for the request
    ///
    /// A response carrying a backend `error` is still `Ok`; the renderer
    /// decides how to show it. Only transport, status and decoding
    /// failures produce `Err`.
    pub async fn fetch_itinerary(
        &self,
        request: &TripRequest,
    ) -> Result<ItineraryResponse, ApiError> {
        let cities = request.cities_param();
        let days = request.days.to_string();

        let response: ItineraryResponse = get_json(
            &self.http_client,
            &self.base_url,
            ITINERARY_PATH,
            &[("cities", cities.as_str()), ("days", days.as_str())],
        )
        .await?;

        match response.error_message() {
            Some(error) => warn!(%cities, %error, "itinerary backend reported an error"),
            None => info!(
                %cities,
                days = request.days,
                day_count = response.combined().map_or(0, |plan| plan.len()),
                "received itinerary"
            ),
        }
        Ok(response)
    }
}
