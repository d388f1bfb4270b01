//! Core data models for tripgen
//!
//! This module contains the types exchanged with the itinerary service:
//! trip requests, city suggestions, the user's city selection, and the
//! day-by-day itinerary returned by the backend.

pub mod itinerary;
pub mod suggestions;

pub use itinerary::ItineraryClient;
pub use suggestions::SuggestionClient;

use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

/// Default location of the itinerary service
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Error text shown when the itinerary request itself fails
pub const ITINERARY_FETCH_FAILED: &str = "Failed to fetch itinerary";

/// Errors that can occur when talking to the itinerary service
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Server answered with a non-success status
    #[error("{endpoint} returned {status}")]
    UnexpectedStatus {
        endpoint: &'static str,
        status: StatusCode,
    },
}

/// Builds the shared HTTP client, with an optional per-request timeout
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client, ApiError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Joins a base URL and an API path without doubling the slash
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Issues a GET with query parameters and decodes the JSON body
async fn get_json<T: DeserializeOwned>(
    client: &Client,
    base_url: &str,
    endpoint: &'static str,
    query: &[(&str, &str)],
) -> Result<T, ApiError> {
    let url = endpoint_url(base_url, endpoint);
    debug!(%url, ?query, "GET");

    let response = client.get(&url).query(query).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::UnexpectedStatus { endpoint, status });
    }

    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// A finalized request for an itinerary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Cities in the order the user selected them
    pub cities: Vec<String>,
    /// Trip length in days (at least 1)
    pub days: u32,
}

impl TripRequest {
    /// Value of the `cities` query parameter
    pub fn cities_param(&self) -> String {
        self.cities.join(",")
    }
}

/// Candidate cities returned for a single country query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitySuggestions {
    country: String,
    cities: Vec<String>,
}

impl CitySuggestions {
    /// Builds a suggestion list, dropping blank names and repeats.
    pub fn new(country: impl Into<String>, cities: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(cities.len());
        for city in cities {
            let city = city.trim();
            if !city.is_empty() && !unique.iter().any(|c| c == city) {
                unique.push(city.to_string());
            }
        }
        Self {
            country: country.into(),
            cities: unique,
        }
    }

    /// The country these suggestions were fetched for
    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn contains(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cities.get(index).map(String::as_str)
    }
}

/// The user's chosen cities: a set that remembers insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedCities {
    cities: Vec<String>,
}

impl SelectedCities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the city if absent, removes it if present.
    ///
    /// Returns `true` when the city ends up selected.
    pub fn toggle(&mut self, city: &str) -> bool {
        if self.remove(city) {
            false
        } else {
            self.cities.push(city.to_string());
            true
        }
    }

    /// Adds a city, returning `false` if it was already selected
    pub fn insert(&mut self, city: &str) -> bool {
        if self.contains(city) {
            return false;
        }
        self.cities.push(city.to_string());
        true
    }

    /// Removes a city, returning `false` if it was not selected
    pub fn remove(&mut self, city: &str) -> bool {
        let before = self.cities.len();
        self.cities.retain(|c| c != city);
        self.cities.len() != before
    }

    pub fn contains(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }

    pub fn clear(&mut self) {
        self.cities.clear();
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cities.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.cities
    }

    /// Builds the request sent on submit
    pub fn to_request(&self, days: u32) -> TripRequest {
        TripRequest {
            cities: self.cities.clone(),
            days,
        }
    }
}

/// Reads `null` the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single stop in the itinerary, produced by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Ranking from 1 to 10
    #[serde(default, deserialize_with = "null_as_default")]
    pub importance_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_visit_time_hours: f64,
    /// Morning, Afternoon or Evening
    #[serde(default, deserialize_with = "null_as_default")]
    pub best_time_of_day: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(rename = "travelTip", default, skip_serializing_if = "Option::is_none")]
    pub travel_tip: Option<String>,
    #[serde(
        rename = "foodSuggestion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub food_suggestion: Option<String>,
}

/// Day label to attractions, kept in the order the server sent them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayPlan {
    days: Vec<(String, Vec<Attraction>)>,
}

impl DayPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a day, replacing the attractions of an existing label in place
    pub fn push(&mut self, label: impl Into<String>, attractions: Vec<Attraction>) {
        let label = label.into();
        match self.days.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => *existing = attractions,
            None => self.days.push((label, attractions)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Attraction])> {
        self.days.iter().map(|(l, a)| (l.as_str(), a.as_slice()))
    }

    pub fn get(&self, label: &str) -> Option<&[Attraction]> {
        self.days
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, a)| a.as_slice())
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl Serialize for DayPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (label, attractions) in &self.days {
            map.serialize_entry(label, attractions)?;
        }
        map.end()
    }
}

struct DayPlanVisitor;

impl<'de> Visitor<'de> for DayPlanVisitor {
    type Value = DayPlan;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of day labels to attraction lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DayPlan, A::Error> {
        let mut plan = DayPlan::new();
        while let Some((label, attractions)) = access.next_entry::<String, Vec<Attraction>>()? {
            plan.push(label, attractions);
        }
        Ok(plan)
    }
}

impl<'de> Deserialize<'de> for DayPlan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DayPlanVisitor)
    }
}

/// Itinerary groupings returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Itineraries {
    /// Unified plan across all selected cities
    #[serde(rename = "Combined", default, skip_serializing_if = "Option::is_none")]
    pub combined: Option<DayPlan>,
}

/// Full response of the itinerary endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryResponse {
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub days: u32,
    #[serde(default)]
    pub itineraries: Itineraries,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItineraryResponse {
    /// Response standing in for a request that never got an answer
    pub fn failed(request: &TripRequest) -> Self {
        Self {
            cities: request.cities.clone(),
            days: request.days,
            itineraries: Itineraries {
                combined: Some(DayPlan::new()),
            },
            error: Some(ITINERARY_FETCH_FAILED.to_string()),
        }
    }

    /// Returns the error message if it is non-empty
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.trim().is_empty())
    }

    pub fn is_error(&self) -> bool {
        self.error_message().is_some()
    }

    /// The combined day plan, if the backend sent one
    pub fn combined(&self) -> Option<&DayPlan> {
        self.itineraries.combined.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attraction(name: &str, city: &str) -> Attraction {
        Attraction {
            name: name.to_string(),
            description: "A landmark".to_string(),
            importance_score: 9.0,
            average_visit_time_hours: 2.0,
            best_time_of_day: "Morning".to_string(),
            city: city.to_string(),
            travel_tip: None,
            food_suggestion: None,
        }
    }

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        assert_eq!(
            endpoint_url("http://127.0.0.1:8000/", "/api/itinerary"),
            "http://127.0.0.1:8000/api/itinerary"
        );
        assert_eq!(
            endpoint_url("http://localhost:9000", "/api/suggest-cities"),
            "http://localhost:9000/api/suggest-cities"
        );
    }

    #[test]
    fn test_build_http_client_with_timeout() {
        assert!(build_http_client(Some(Duration::from_secs(5))).is_ok());
        assert!(build_http_client(None).is_ok());
    }

    #[test]
    fn test_trip_request_cities_param_keeps_order() {
        let request = TripRequest {
            cities: vec!["Paris".to_string(), "Nice".to_string(), "Lyon".to_string()],
            days: 3,
        };
        assert_eq!(request.cities_param(), "Paris,Nice,Lyon");
    }

    #[test]
    fn test_suggestions_drop_duplicates_and_blanks() {
        let suggestions = CitySuggestions::new(
            "Japan",
            vec![
                "Tokyo".to_string(),
                " Kyoto ".to_string(),
                "".to_string(),
                "Tokyo".to_string(),
                "Osaka".to_string(),
            ],
        );
        assert_eq!(suggestions.country(), "Japan");
        assert_eq!(suggestions.cities(), &["Tokyo", "Kyoto", "Osaka"]);
        assert!(suggestions.contains("Kyoto"));
        assert!(!suggestions.contains("Nara"));
    }

    #[test]
    fn test_selected_cities_toggle_is_involution() {
        let mut selected = SelectedCities::new();
        selected.insert("Paris");
        let before = selected.clone();

        assert!(selected.toggle("Lyon"));
        assert!(!selected.toggle("Lyon"));
        assert_eq!(selected, before);

        assert!(!selected.toggle("Paris"));
        assert!(selected.toggle("Paris"));
        assert_eq!(selected.as_slice(), before.as_slice());
    }

    #[test]
    fn test_selected_cities_insert_rejects_duplicates() {
        let mut selected = SelectedCities::new();
        assert!(selected.insert("Rome"));
        assert!(!selected.insert("Rome"));
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_selected_cities_preserve_insertion_order() {
        let mut selected = SelectedCities::new();
        selected.toggle("Paris");
        selected.toggle("Nice");
        selected.toggle("Lyon");
        selected.toggle("Nice");
        selected.toggle("Nice");

        let request = selected.to_request(4);
        assert_eq!(request.cities, vec!["Paris", "Lyon", "Nice"]);
        assert_eq!(request.days, 4);
    }

    #[test]
    fn test_attraction_parses_camel_case_extras() {
        let json = r#"{
            "name": "Louvre",
            "description": "Art museum",
            "importance_score": 9.5,
            "average_visit_time_hours": 3.0,
            "best_time_of_day": "Morning",
            "city": "Paris",
            "travelTip": "Book ahead",
            "foodSuggestion": "Croissant"
        }"#;
        let parsed: Attraction = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.travel_tip.as_deref(), Some("Book ahead"));
        assert_eq!(parsed.food_suggestion.as_deref(), Some("Croissant"));
        assert!((parsed.importance_score - 9.5).abs() < 0.001);
    }

    #[test]
    fn test_attraction_tolerates_missing_fields() {
        let parsed: Attraction = serde_json::from_str(r#"{"name": "Colosseum"}"#).unwrap();
        assert_eq!(parsed.name, "Colosseum");
        assert!(parsed.description.is_empty());
        assert!(parsed.travel_tip.is_none());
    }

    #[test]
    fn test_attraction_tolerates_null_fields() {
        let parsed: Attraction = serde_json::from_str(
            r#"{"name": "Louvre", "description": null, "importance_score": null,
                "average_visit_time_hours": null, "best_time_of_day": null,
                "city": "Paris", "travelTip": null}"#,
        )
        .unwrap();
        assert_eq!(parsed.name, "Louvre");
        assert!(parsed.description.is_empty());
        assert!(parsed.best_time_of_day.is_empty());
        assert_eq!(parsed.average_visit_time_hours, 0.0);
        assert_eq!(parsed.city, "Paris");
        assert!(parsed.travel_tip.is_none());
    }

    #[test]
    fn test_itinerary_with_null_attraction_field_still_parses() {
        let json = r#"{
            "cities": ["Rome"],
            "days": 1,
            "itineraries": {"Combined": {"Day 1": [{
                "name": "Colosseum", "description": "Amphitheatre",
                "importance_score": 10, "average_visit_time_hours": 2.5,
                "best_time_of_day": null, "city": "Rome"
            }]}}
        }"#;
        let response: ItineraryResponse = serde_json::from_str(json).unwrap();
        let day = response.combined().unwrap().get("Day 1").unwrap();
        assert_eq!(day[0].name, "Colosseum");
        assert!(day[0].best_time_of_day.is_empty());
        assert!(!response.is_error());
    }

    #[test]
    fn test_day_plan_preserves_server_order() {
        let json = r#"{
            "cities": ["Rome"],
            "days": 3,
            "itineraries": {"Combined": {"Day 2": [], "Day 10": [], "Day 1": []}}
        }"#;
        let response: ItineraryResponse = serde_json::from_str(json).unwrap();
        let labels: Vec<&str> = response
            .combined()
            .unwrap()
            .iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(labels, vec!["Day 2", "Day 10", "Day 1"]);
    }

    #[test]
    fn test_day_plan_serializes_in_order() {
        let mut plan = DayPlan::new();
        plan.push("Day 2", vec![]);
        plan.push("Day 1", vec![attraction("Colosseum", "Rome")]);

        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.find("Day 2").unwrap() < json.find("Day 1").unwrap());
    }

    #[test]
    fn test_day_plan_push_replaces_existing_label() {
        let mut plan = DayPlan::new();
        plan.push("Day 1", vec![]);
        plan.push("Day 1", vec![attraction("Pantheon", "Rome")]);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.get("Day 1").unwrap().len(), 1);
    }

    #[test]
    fn test_response_without_combined() {
        let json = r#"{"cities": ["Rome"], "days": 1, "itineraries": {}}"#;
        let response: ItineraryResponse = serde_json::from_str(json).unwrap();
        assert!(response.combined().is_none());
        assert!(!response.is_error());
    }

    #[test]
    fn test_response_error_field() {
        let json = r#"{"cities": ["Rome"], "days": 1,
            "itineraries": {"Combined": {}}, "error": "model offline"}"#;
        let response: ItineraryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error_message(), Some("model offline"));
    }

    #[test]
    fn test_blank_error_is_not_an_error() {
        let json = r#"{"cities": [], "days": 1, "itineraries": {"Combined": {}}, "error": ""}"#;
        let response: ItineraryResponse = serde_json::from_str(json).unwrap();
        assert!(!response.is_error());
    }

    #[test]
    fn test_failed_response_keeps_request() {
        let request = TripRequest {
            cities: vec!["Paris".to_string()],
            days: 2,
        };
        let response = ItineraryResponse::failed(&request);
        assert_eq!(response.cities, vec!["Paris"]);
        assert_eq!(response.days, 2);
        assert_eq!(response.error_message(), Some(ITINERARY_FETCH_FAILED));
        assert!(response.combined().unwrap().is_empty());
    }
}
