//! Background request worker
//!
//! Runs API calls on tokio tasks and reports their results to the main
//! event loop over a channel, so the UI keeps redrawing while a request is
//! outstanding.

use tokio::sync::mpsc;
use tracing::debug;

use crate::data::{
    ApiError, ItineraryClient, ItineraryResponse, SuggestionClient, TripRequest,
};

/// Identifies one issued request so late answers can be recognised
pub type RequestId = u64;

/// Work requested by the app in response to user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Fetch suggested cities for a country
    SuggestCities { id: RequestId, country: String },
    /// Check a typed-in city against a country
    ValidateCity {
        id: RequestId,
        country: String,
        city: String,
    },
    /// Generate an itinerary
    GenerateItinerary { id: RequestId, request: TripRequest },
}

/// Messages sent from request tasks back to the app
#[derive(Debug)]
pub enum ApiMessage {
    /// Suggestion lookup finished
    CitiesSuggested {
        id: RequestId,
        country: String,
        result: Result<Vec<String>, ApiError>,
    },
    /// City validation finished
    CityValidated {
        id: RequestId,
        city: String,
        result: Result<bool, ApiError>,
    },
    /// Itinerary generation finished
    ItineraryFetched {
        id: RequestId,
        request: TripRequest,
        result: Result<ItineraryResponse, ApiError>,
    },
}

/// Handle for dispatching actions and receiving their results
pub struct Worker {
    /// Channel for receiving finished requests
    pub receiver: mpsc::Receiver<ApiMessage>,
    sender: mpsc::Sender<ApiMessage>,
    suggestions: SuggestionClient,
    itinerary: ItineraryClient,
}

impl Worker {
    /// Creates a new Worker around the given API clients
    pub fn new(suggestions: SuggestionClient, itinerary: ItineraryClient) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self {
            receiver,
            sender,
            suggestions,
            itinerary,
        }
    }

    /// Spawns a task that performs the action and posts its result.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, action: Action) {
        debug!(?action, "dispatching request");
        let tx = self.sender.clone();

        match action {
            Action::SuggestCities { id, country } => {
                let client = self.suggestions.clone();
                tokio::spawn(async move {
                    let result = client.suggest_cities(&country).await;
                    let _ = tx
                        .send(ApiMessage::CitiesSuggested {
                            id,
                            country,
                            result,
                        })
                        .await;
                });
            }
            Action::ValidateCity { id, country, city } => {
                let client = self.suggestions.clone();
                tokio::spawn(async move {
                    let result = client.validate_city(&country, &city).await;
                    let _ = tx
                        .send(ApiMessage::CityValidated { id, city, result })
                        .await;
                });
            }
            Action::GenerateItinerary { id, request } => {
                let client = self.itinerary.clone();
                tokio::spawn(async move {
                    let result = client.fetch_itinerary(&request).await;
                    let _ = tx
                        .send(ApiMessage::ItineraryFetched {
                            id,
                            request,
                            result,
                        })
                        .await;
                });
            }
        }
    }
}

/// Checks for a finished request without blocking
///
/// # Returns
/// * `Some(ApiMessage)` if a message was available
/// * `None` if no messages are pending
pub fn try_recv(worker: &mut Worker) -> Option<ApiMessage> {
    worker.receiver.try_recv().ok()
}
