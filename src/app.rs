//! Application state management for tripgen
//!
//! This module contains the trip form state, handling keyboard input,
//! issuing API actions, and applying their results. All UI state lives in
//! [`App`]; the event loop feeds it keys and finished requests and hands the
//! returned [`Action`]s to the worker.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::cli::StartupConfig;
use crate::data::{CitySuggestions, ItineraryResponse, SelectedCities};
use crate::worker::{Action, ApiMessage, RequestId};

/// Trip length used when none is given
pub const DEFAULT_DAYS: u32 = 3;

/// Largest trip length the days field accepts
pub const MAX_DAYS: u32 = 99;

/// Digits accepted by the days field
const MAX_DAYS_DIGITS: usize = 2;

/// Upper bound for the itinerary scroll offset; the renderer clamps further
const MAX_SCROLL: u16 = 1000;

/// Rows moved by PageUp/PageDown in the itinerary panel
const PAGE_SCROLL: u16 = 10;

/// Where the screen is in the search → select → generate flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing searched yet
    Idle,
    /// Waiting for suggested cities
    SearchingCities,
    /// Suggestions (possibly empty) are on screen
    CitiesShown,
    /// Waiting for the itinerary
    GeneratingItinerary,
    /// An itinerary is on screen
    ItineraryShown,
    /// The last generation failed
    ItineraryError,
}

/// Which form element receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Country,
    Suggestions,
    CustomCity,
    Selected,
    Days,
    Itinerary,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Country,
        Focus::Suggestions,
        Focus::CustomCity,
        Focus::Selected,
        Focus::Days,
        Focus::Itinerary,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// The next element in tab order, wrapping at the end
    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    /// The previous element in tab order, wrapping at the start
    pub fn previous(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

/// A city validation waiting for the backend
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingValidation {
    id: RequestId,
    city: String,
}

/// Main application struct managing state and data
pub struct App {
    /// Country field contents
    pub country: String,
    /// Trip length in days (always at least 1)
    pub days: u32,
    /// Days field text while it is being typed, committed to `days` on blur
    days_input: Option<String>,
    /// "Other city" field contents
    pub custom_city: String,
    /// Result of the last completed search, `None` before any search
    pub suggestions: Option<CitySuggestions>,
    /// Cities chosen for the trip
    pub selected: SelectedCities,
    /// Last itinerary (or failure) received
    pub itinerary: Option<ItineraryResponse>,
    /// When the current itinerary arrived
    pub generated_at: Option<DateTime<Local>>,
    /// Focused form element
    pub focus: Focus,
    /// Highlighted row in the suggestion list
    pub suggestion_cursor: usize,
    /// Highlighted row in the selected list
    pub selected_cursor: usize,
    /// Scroll offset of the itinerary panel
    pub itinerary_scroll: u16,
    /// Blocking message shown until dismissed
    pub alert: Option<String>,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Search to run once the event loop starts (from --country)
    pub pending_initial_search: bool,
    next_request_id: RequestId,
    pending_search: Option<RequestId>,
    pending_validation: Option<PendingValidation>,
    pending_generation: Option<RequestId>,
}

impl App {
    /// Creates a new App instance with an empty form
    pub fn new() -> Self {
        Self {
            country: String::new(),
            days: DEFAULT_DAYS,
            days_input: None,
            custom_city: String::new(),
            suggestions: None,
            selected: SelectedCities::new(),
            itinerary: None,
            generated_at: None,
            focus: Focus::Country,
            suggestion_cursor: 0,
            selected_cursor: 0,
            itinerary_scroll: 0,
            alert: None,
            show_help: false,
            should_quit: false,
            pending_initial_search: false,
            next_request_id: 1,
            pending_search: None,
            pending_validation: None,
            pending_generation: None,
        }
    }

    /// Creates a new App instance with the given startup configuration.
    ///
    /// A country given on the command line is searched as soon as
    /// [`App::initial_action`] is called.
    pub fn with_startup_config(config: &StartupConfig) -> Self {
        let mut app = Self::new();
        app.days = config.days.clamp(1, MAX_DAYS);
        if let Some(country) = &config.country {
            app.country = country.clone();
            app.pending_initial_search = true;
        }
        app
    }

    /// Returns the action to run before the first key press, if any
    pub fn initial_action(&mut self) -> Option<Action> {
        if !self.pending_initial_search {
            return None;
        }
        self.pending_initial_search = false;
        self.search()
    }

    /// Current position in the search → generate flow
    pub fn phase(&self) -> Phase {
        if self.pending_generation.is_some() {
            return Phase::GeneratingItinerary;
        }
        if self.pending_search.is_some() {
            return Phase::SearchingCities;
        }
        if let Some(itinerary) = &self.itinerary {
            return if itinerary.is_error() {
                Phase::ItineraryError
            } else {
                Phase::ItineraryShown
            };
        }
        if self.suggestions.is_some() {
            Phase::CitiesShown
        } else {
            Phase::Idle
        }
    }

    pub fn is_searching(&self) -> bool {
        self.pending_search.is_some()
    }

    pub fn is_validating(&self) -> bool {
        self.pending_validation.is_some()
    }

    pub fn is_generating(&self) -> bool {
        self.pending_generation.is_some()
    }

    /// Inline progress text for requests in flight
    pub fn status_line(&self) -> Option<String> {
        if self.is_generating() {
            Some("Generating Itinerary...".to_string())
        } else if self.is_searching() {
            Some("Fetching suggested cities...".to_string())
        } else {
            self.pending_validation
                .as_ref()
                .map(|pending| format!("Validating {}...", pending.city))
        }
    }

    fn next_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    fn show_alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "alert");
        self.alert = Some(message);
    }

    /// Starts a city search for the current country.
    ///
    /// A blank country raises an alert and sends nothing. Otherwise the
    /// previous suggestions and selection are dropped.
    pub fn search(&mut self) -> Option<Action> {
        if self.is_searching() {
            return None;
        }
        let country = self.country.trim().to_string();
        if country.is_empty() {
            self.show_alert("Please enter a country name first.");
            return None;
        }

        self.suggestions = None;
        self.selected.clear();
        self.suggestion_cursor = 0;
        self.selected_cursor = 0;
        self.pending_validation = None;

        let id = self.next_id();
        self.pending_search = Some(id);
        info!(%country, id, "searching cities");
        Some(Action::SuggestCities { id, country })
    }

    /// Adds the city to the selection, or removes it if already selected
    pub fn toggle_city(&mut self, city: &str) {
        let selected = self.selected.toggle(city);
        debug!(city, selected, "toggled city");
        self.clamp_selected_cursor();
    }

    /// Adds the typed-in city to the selection.
    ///
    /// Cities among the current suggestions are added straight away; any
    /// other city is first checked with the backend and added when the
    /// answer arrives in [`App::apply`].
    pub fn add_custom_city(&mut self) -> Option<Action> {
        let city = self.custom_city.trim().to_string();
        if city.is_empty() || self.is_validating() {
            return None;
        }
        let country = self.country.trim().to_string();
        if country.is_empty() {
            self.show_alert("Please enter a country name first.");
            return None;
        }
        if self.selected.contains(&city) {
            self.show_alert(format!("{} is already selected.", city));
            return None;
        }

        let suggested = self
            .suggestions
            .as_ref()
            .is_some_and(|suggestions| suggestions.contains(&city));
        if suggested {
            self.selected.insert(&city);
            self.custom_city.clear();
            return None;
        }

        let id = self.next_id();
        self.pending_validation = Some(PendingValidation {
            id,
            city: city.clone(),
        });
        info!(%country, %city, id, "validating custom city");
        Some(Action::ValidateCity { id, country, city })
    }

    /// Requests an itinerary for the current selection.
    ///
    /// An empty selection raises an alert and sends nothing.
    pub fn submit(&mut self) -> Option<Action> {
        self.commit_days_input();
        if self.is_generating() {
            return None;
        }
        if self.selected.is_empty() {
            self.show_alert("Please select or add at least one city!");
            return None;
        }

        self.itinerary = None;
        self.generated_at = None;
        self.itinerary_scroll = 0;

        let request = self.selected.to_request(self.days);
        let id = self.next_id();
        self.pending_generation = Some(id);
        info!(cities = %request.cities_param(), days = request.days, id, "generating itinerary");
        Some(Action::GenerateItinerary { id, request })
    }

    /// Applies a finished request.
    ///
    /// Answers to requests that have since been superseded are dropped.
    pub fn apply(&mut self, message: ApiMessage) {
        match message {
            ApiMessage::CitiesSuggested {
                id,
                country,
                result,
            } => {
                if self.pending_search != Some(id) {
                    debug!(id, "dropping stale city suggestions");
                    return;
                }
                self.pending_search = None;
                match result {
                    Ok(cities) => {
                        let suggestions = CitySuggestions::new(country, cities);
                        self.focus = if suggestions.is_empty() {
                            Focus::CustomCity
                        } else {
                            Focus::Suggestions
                        };
                        self.suggestions = Some(suggestions);
                    }
                    Err(error) => {
                        warn!(%error, "failed to fetch suggested cities");
                        self.suggestions = Some(CitySuggestions::new(country, Vec::new()));
                        self.show_alert("Could not fetch suggested cities. Please try again.");
                    }
                }
            }
            ApiMessage::CityValidated { id, city, result } => {
                if self.pending_validation.as_ref().map(|p| p.id) != Some(id) {
                    debug!(id, %city, "dropping stale city validation");
                    return;
                }
                self.pending_validation = None;
                match result {
                    Ok(true) => {
                        if self.selected.insert(&city) {
                            if self.custom_city.trim() == city {
                                self.custom_city.clear();
                            }
                        } else {
                            self.show_alert(format!("{} is already selected.", city));
                        }
                    }
                    Ok(false) => {
                        let country = self.country.trim().to_string();
                        self.show_alert(format!(
                            "{} does not appear to be a city in {}.",
                            city, country
                        ));
                    }
                    Err(error) => {
                        warn!(%error, %city, "city validation failed");
                        self.show_alert("Could not validate city. Try again later.");
                    }
                }
            }
            ApiMessage::ItineraryFetched {
                id,
                request,
                result,
            } => {
                if self.pending_generation != Some(id) {
                    debug!(id, "dropping stale itinerary");
                    return;
                }
                self.pending_generation = None;
                let response = match result {
                    Ok(response) => response,
                    Err(error) => {
                        warn!(%error, "error fetching itinerary");
                        ItineraryResponse::failed(&request)
                    }
                };
                self.itinerary = Some(response);
                self.generated_at = Some(Local::now());
                self.itinerary_scroll = 0;
            }
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Returns
    /// The request to dispatch, if the key triggered one
    ///
    /// # Key Bindings
    /// - `Tab`/`Shift+Tab`: Move focus between form elements
    /// - `Enter` (country): Search suggested cities
    /// - `Up`/`Down`, `Space`/`Enter` (lists): Move and toggle cities
    /// - `Enter` (other city): Add the typed city
    /// - `Up`/`Down`, `+`/`-`, digits (days): Adjust trip length
    /// - `Enter` (days) or `Ctrl+G` anywhere: Generate itinerary
    /// - `Up`/`Down`, `PageUp`/`PageDown` (itinerary): Scroll
    /// - `F1`: Toggle help
    /// - `Esc` or `Ctrl+C`: Quit
    pub fn handle_key(&mut self, key_event: KeyEvent) -> Option<Action> {
        // Alerts block everything until dismissed
        if self.alert.is_some() {
            if matches!(
                key_event.code,
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')
            ) {
                self.alert = None;
            }
            return None;
        }

        if self.show_help {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return None;
        }

        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        match key_event.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return None;
            }
            KeyCode::Char('g') if ctrl => return self.submit(),
            KeyCode::Esc => {
                self.should_quit = true;
                return None;
            }
            KeyCode::F(1) => {
                self.show_help = true;
                return None;
            }
            KeyCode::Tab => {
                self.commit_days_input();
                self.focus = self.focus.next();
                return None;
            }
            KeyCode::BackTab => {
                self.commit_days_input();
                self.focus = self.focus.previous();
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Country => match key_event.code {
                KeyCode::Enter => self.search(),
                KeyCode::Char(c) if !ctrl => {
                    self.country.push(c);
                    self.country_changed();
                    None
                }
                KeyCode::Backspace => {
                    if self.country.pop().is_some() {
                        self.country_changed();
                    }
                    None
                }
                _ => None,
            },
            Focus::Suggestions => {
                match key_event.code {
                    KeyCode::Up | KeyCode::Char('k') => self.move_suggestion_cursor_up(),
                    KeyCode::Down | KeyCode::Char('j') => self.move_suggestion_cursor_down(),
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        let city = self
                            .suggestions
                            .as_ref()
                            .and_then(|s| s.get(self.suggestion_cursor))
                            .map(str::to_string);
                        if let Some(city) = city {
                            self.toggle_city(&city);
                        }
                    }
                    _ => {}
                }
                None
            }
            Focus::CustomCity => match key_event.code {
                KeyCode::Enter => self.add_custom_city(),
                KeyCode::Char(c) if !ctrl => {
                    self.custom_city.push(c);
                    None
                }
                KeyCode::Backspace => {
                    self.custom_city.pop();
                    None
                }
                _ => None,
            },
            Focus::Selected => {
                match key_event.code {
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.selected_cursor = self.selected_cursor.saturating_sub(1);
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        if self.selected_cursor + 1 < self.selected.len() {
                            self.selected_cursor += 1;
                        }
                    }
                    KeyCode::Enter
                    | KeyCode::Char(' ')
                    | KeyCode::Delete
                    | KeyCode::Backspace => {
                        let city = self.selected.get(self.selected_cursor).map(str::to_string);
                        if let Some(city) = city {
                            self.toggle_city(&city);
                        }
                    }
                    _ => {}
                }
                None
            }
            Focus::Days => match key_event.code {
                KeyCode::Enter => self.submit(),
                KeyCode::Up | KeyCode::Char('+') => {
                    self.commit_days_input();
                    self.set_days(self.days.saturating_add(1));
                    None
                }
                KeyCode::Down | KeyCode::Char('-') => {
                    self.commit_days_input();
                    self.set_days(self.days.saturating_sub(1));
                    None
                }
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    let mut text = self.days_text();
                    if text.len() < MAX_DAYS_DIGITS {
                        text.push(c);
                    }
                    self.edit_days_input(text);
                    None
                }
                KeyCode::Backspace => {
                    let mut text = self.days_text();
                    text.pop();
                    self.edit_days_input(text);
                    None
                }
                _ => None,
            },
            Focus::Itinerary => {
                match key_event.code {
                    KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
                    KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
                    KeyCode::PageUp => self.scroll_up(PAGE_SCROLL),
                    KeyCode::PageDown => self.scroll_down(PAGE_SCROLL),
                    KeyCode::Char('g') | KeyCode::Home => self.itinerary_scroll = 0,
                    KeyCode::Char('G') | KeyCode::End => self.itinerary_scroll = MAX_SCROLL,
                    _ => {}
                }
                None
            }
        }
    }

    /// Suggestions belong to the query they were fetched for
    fn country_changed(&mut self) {
        if self.suggestions.take().is_some() {
            self.suggestion_cursor = 0;
        }
        if self.pending_search.take().is_some() {
            debug!("country edited during search, result will be dropped");
        }
        self.pending_validation = None;
    }

    /// Sets the trip length, clamped to `1..=MAX_DAYS`
    pub fn set_days(&mut self, days: u32) {
        self.days_input = None;
        self.days = days.clamp(1, MAX_DAYS);
    }

    /// Text shown in the days field
    pub fn days_text(&self) -> String {
        self.days_input
            .clone()
            .unwrap_or_else(|| self.days.to_string())
    }

    /// Keeps the typed text and adopts it as the trip length once it is a valid count
    fn edit_days_input(&mut self, text: String) {
        if let Ok(days) = text.parse::<u32>() {
            if days >= 1 {
                self.days = days.min(MAX_DAYS);
            }
        }
        self.days_input = Some(text);
    }

    /// Replaces half-typed text with the trip length it stands for.
    ///
    /// An empty or zero field becomes 1.
    fn commit_days_input(&mut self) {
        if let Some(text) = self.days_input.take() {
            let days = text.parse::<u32>().unwrap_or(1);
            self.days = days.clamp(1, MAX_DAYS);
        }
    }

    fn move_suggestion_cursor_up(&mut self) {
        let count = self.suggestions.as_ref().map_or(0, CitySuggestions::len);
        if count == 0 {
            return;
        }
        if self.suggestion_cursor == 0 {
            self.suggestion_cursor = count - 1;
        } else {
            self.suggestion_cursor -= 1;
        }
    }

    fn move_suggestion_cursor_down(&mut self) {
        let count = self.suggestions.as_ref().map_or(0, CitySuggestions::len);
        if count == 0 {
            return;
        }
        self.suggestion_cursor = (self.suggestion_cursor + 1) % count;
    }

    fn clamp_selected_cursor(&mut self) {
        let len = self.selected.len();
        if self.selected_cursor >= len {
            self.selected_cursor = len.saturating_sub(1);
        }
    }

    /// Scrolls the itinerary panel up, stopping at 0
    pub fn scroll_up(&mut self, rows: u16) {
        self.itinerary_scroll = self.itinerary_scroll.saturating_sub(rows);
    }

    /// Scrolls the itinerary panel down; the renderer clamps to the content
    pub fn scroll_down(&mut self, rows: u16) {
        self.itinerary_scroll = self.itinerary_scroll.saturating_add(rows).min(MAX_SCROLL);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
