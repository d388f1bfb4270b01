//! Itinerary panel rendering
//!
//! Projects an [`ItineraryResponse`] into day cards and attraction cards,
//! then draws them as a scrollable panel. The projection is pure so the
//! rules (nothing for no response, only the error for a failed one, days
//! in server order) can be checked without a terminal.

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::data::{Attraction, ItineraryResponse};

/// Color scheme for the itinerary panel
mod colors {
    use ratatui::style::Color;

    pub const TITLE: Color = Color::Cyan;
    pub const DAY: Color = Color::Yellow;
    pub const NAME: Color = Color::White;
    pub const LABEL: Color = Color::Gray;
    pub const ERROR: Color = Color::Red;
    pub const DIM: Color = Color::DarkGray;
}

/// One attraction as shown on screen
#[derive(Debug, Clone, PartialEq)]
pub struct AttractionCard {
    pub name: String,
    pub description: String,
    pub city: String,
    pub best_time: String,
    /// Visit duration in hours
    pub hours: f64,
    pub tip: Option<String>,
    pub food: Option<String>,
}

impl From<&Attraction> for AttractionCard {
    fn from(a: &Attraction) -> Self {
        Self {
            name: a.name.clone(),
            description: a.description.clone(),
            city: a.city.clone(),
            best_time: a.best_time_of_day.clone(),
            hours: a.average_visit_time_hours,
            tip: a.travel_tip.clone().filter(|t| !t.is_empty()),
            food: a.food_suggestion.clone().filter(|f| !f.is_empty()),
        }
    }
}

/// One day of the plan
#[derive(Debug, Clone, PartialEq)]
pub struct DayCard {
    pub label: String,
    pub attractions: Vec<AttractionCard>,
}

/// What the itinerary panel shows
#[derive(Debug, Clone, PartialEq)]
pub enum ItineraryView {
    /// No itinerary requested yet, or no combined plan returned
    Empty,
    /// The request or the backend failed
    Error(String),
    /// A plan, one card per day in server order
    Days { title: String, days: Vec<DayCard> },
}

impl ItineraryView {
    /// Builds the view for an optional response
    pub fn from_response(response: Option<&ItineraryResponse>) -> Self {
        let Some(response) = response else {
            return ItineraryView::Empty;
        };
        if let Some(error) = response.error_message() {
            return ItineraryView::Error(error.to_string());
        }
        let Some(plan) = response.combined() else {
            return ItineraryView::Empty;
        };

        let title = format!(
            "Itinerary for {} ({} days)",
            response.cities.join(", "),
            response.days
        );
        let days = plan
            .iter()
            .map(|(label, attractions)| DayCard {
                label: label.to_string(),
                attractions: attractions.iter().map(AttractionCard::from).collect(),
            })
            .collect();
        ItineraryView::Days { title, days }
    }

    /// Number of day cards
    pub fn day_count(&self) -> usize {
        match self {
            ItineraryView::Days { days, .. } => days.len(),
            _ => 0,
        }
    }

    /// Total number of attraction cards across all days
    pub fn attraction_count(&self) -> usize {
        match self {
            ItineraryView::Days { days, .. } => days.iter().map(|d| d.attractions.len()).sum(),
            _ => 0,
        }
    }

    /// Text lines for the panel body
    pub fn lines(&self) -> Vec<Line<'static>> {
        match self {
            ItineraryView::Empty => Vec::new(),
            ItineraryView::Error(message) => vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(colors::ERROR),
            ))],
            ItineraryView::Days { title, days } => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        title.clone(),
                        Style::default()
                            .fg(colors::TITLE)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                ];
                for day in days {
                    lines.extend(day_lines(day));
                }
                lines
            }
        }
    }
}

fn day_lines(day: &DayCard) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("\u{250C}\u{2500} {} ", day.label), // ┌─
        Style::default()
            .fg(colors::DAY)
            .add_modifier(Modifier::BOLD),
    ))];

    if day.attractions.is_empty() {
        lines.push(Line::from(Span::styled(
            "\u{2502}  (nothing planned)",
            Style::default().fg(colors::DIM),
        )));
    }
    for card in &day.attractions {
        lines.extend(attraction_lines(card));
    }
    lines.push(Line::from(Span::styled(
        "\u{2514}\u{2500}", // └─
        Style::default().fg(colors::DAY),
    )));
    lines.push(Line::from(""));
    lines
}

fn attraction_lines(card: &AttractionCard) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("\u{2502} \u{25B8} ", Style::default().fg(colors::DAY)), // │ ▸
            Span::styled(
                card.name.clone(),
                Style::default()
                    .fg(colors::NAME)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("\u{2502}   ", Style::default().fg(colors::DAY)),
            Span::styled(
                card.description.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        ]),
        field_line("City", card.city.clone()),
        field_line("Best Time", card.best_time.clone()),
        field_line("Visit Duration", format!("{} hrs", card.hours)),
    ];
    if let Some(tip) = &card.tip {
        lines.push(field_line("Tip", tip.clone()));
    }
    if let Some(food) = &card.food {
        lines.push(field_line("Food", food.clone()));
    }
    lines
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled("\u{2502}   ", Style::default().fg(colors::DAY)),
        Span::styled(format!("{}: ", label), Style::default().fg(colors::LABEL)),
        Span::raw(value),
    ])
}

fn panel_title(generated_at: Option<DateTime<Local>>) -> String {
    match generated_at {
        Some(at) => format!(" Itinerary (received {}) ", at.format("%H:%M")),
        None => " Itinerary ".to_string(),
    }
}

/// Renders the itinerary panel
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `area` - Panel area
/// * `app` - The application state
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Itinerary;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Yellow } else { Color::Gray }))
        .title(panel_title(app.generated_at));

    let view = ItineraryView::from_response(app.itinerary.as_ref());
    let mut lines = view.lines();
    if lines.is_empty() {
        let hint = if app.is_generating() {
            "Generating Itinerary..."
        } else {
            "Select cities and press Ctrl+G to generate an itinerary."
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(colors::DIM),
        )));
    }

    let inner = block.inner(area);
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });

    // Clamp against rows after wrapping to the panel width
    let rows = u16::try_from(paragraph.line_count(inner.width)).unwrap_or(u16::MAX);
    let max_scroll = rows.saturating_sub(inner.height);
    let scroll = app.itinerary_scroll.min(max_scroll);

    frame.render_widget(paragraph.block(block).scroll((scroll, 0)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DayPlan, Itineraries, TripRequest, ITINERARY_FETCH_FAILED};
    use ratatui::{backend::TestBackend, Terminal};

    fn rome_response() -> ItineraryResponse {
        serde_json::from_str(
            r#"{
                "cities": ["Rome"],
                "days": 2,
                "itineraries": {"Combined": {
                    "Day 1": [{
                        "name": "Colosseum",
                        "description": "Ancient amphitheatre",
                        "importance_score": 10,
                        "average_visit_time_hours": 2.5,
                        "best_time_of_day": "Morning",
                        "city": "Rome",
                        "travelTip": "Buy tickets online",
                        "foodSuggestion": "Supplì"
                    }],
                    "Day 2": []
                }}
            }"#,
        )
        .unwrap()
    }

    fn buffer_text(app: &App) -> String {
        buffer_text_sized(app, 80, 40)
    }

    fn buffer_text_sized(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, area, app);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_no_response_renders_nothing() {
        let view = ItineraryView::from_response(None);
        assert_eq!(view, ItineraryView::Empty);
        assert!(view.lines().is_empty());
    }

    #[test]
    fn test_error_response_suppresses_cards() {
        let mut response = rome_response();
        response.error = Some("model offline".to_string());

        let view = ItineraryView::from_response(Some(&response));
        assert_eq!(view, ItineraryView::Error("model offline".to_string()));
        assert_eq!(view.day_count(), 0);
        assert_eq!(view.attraction_count(), 0);
    }

    #[test]
    fn test_rome_response_renders_two_days() {
        let response = rome_response();
        let view = ItineraryView::from_response(Some(&response));

        let ItineraryView::Days { title, days } = &view else {
            panic!("expected day cards");
        };
        assert_eq!(title, "Itinerary for Rome (2 days)");
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].label, "Day 1");
        assert_eq!(days[0].attractions.len(), 1);
        assert_eq!(days[0].attractions[0].name, "Colosseum");
        assert_eq!(days[1].label, "Day 2");
        assert!(days[1].attractions.is_empty());
    }

    #[test]
    fn test_missing_combined_renders_nothing() {
        let response = ItineraryResponse {
            cities: vec!["Rome".to_string()],
            days: 1,
            itineraries: Itineraries { combined: None },
            error: None,
        };
        assert_eq!(
            ItineraryView::from_response(Some(&response)),
            ItineraryView::Empty
        );
    }

    #[test]
    fn test_days_follow_server_order() {
        let mut plan = DayPlan::new();
        plan.push("Day 3", vec![]);
        plan.push("Day 1", vec![]);
        let response = ItineraryResponse {
            cities: vec!["Oslo".to_string()],
            days: 3,
            itineraries: Itineraries {
                combined: Some(plan),
            },
            error: None,
        };

        let ItineraryView::Days { days, .. } = ItineraryView::from_response(Some(&response))
        else {
            panic!("expected day cards");
        };
        let labels: Vec<&str> = days.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Day 3", "Day 1"]);
    }

    #[test]
    fn test_optional_fields_only_when_present() {
        let mut response = rome_response();
        if let Some(plan) = response.itineraries.combined.as_mut() {
            let mut stripped = DayPlan::new();
            for (label, attractions) in plan.iter() {
                let attractions = attractions
                    .iter()
                    .cloned()
                    .map(|mut a| {
                        a.travel_tip = None;
                        a.food_suggestion = Some(String::new());
                        a
                    })
                    .collect();
                stripped.push(label, attractions);
            }
            *plan = stripped;
        }

        let view = ItineraryView::from_response(Some(&response));
        let text: String = view
            .lines()
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("Visit Duration: 2.5 hrs"));
        assert!(!text.contains("Tip:"));
        assert!(!text.contains("Food:"));
    }

    #[test]
    fn test_render_shows_attraction_fields() {
        let mut app = App::new();
        app.itinerary = Some(rome_response());

        let content = buffer_text(&app);
        assert!(content.contains("Itinerary for Rome (2 days)"));
        assert!(content.contains("Day 1"));
        assert!(content.contains("Colosseum"));
        assert!(content.contains("Best Time: Morning"));
        assert!(content.contains("Tip: Buy tickets online"));
        assert!(content.contains("Day 2"));
    }

    #[test]
    fn test_render_failed_generation() {
        let mut app = App::new();
        let request = TripRequest {
            cities: vec!["Rome".to_string()],
            days: 2,
        };
        app.itinerary = Some(ItineraryResponse::failed(&request));

        let content = buffer_text(&app);
        assert!(content.contains(ITINERARY_FETCH_FAILED));
        assert!(!content.contains("Day 1"));
        assert!(!content.contains("Itinerary for"));
    }

    fn long_attraction(name: &str, food: Option<&str>) -> Attraction {
        Attraction {
            name: name.to_string(),
            description: "a long winding description of the place ".repeat(5),
            importance_score: 7.0,
            average_visit_time_hours: 1.0,
            best_time_of_day: "Morning".to_string(),
            city: "Rome".to_string(),
            travel_tip: None,
            food_suggestion: food.map(str::to_string),
        }
    }

    #[test]
    fn test_scrolling_to_end_reaches_last_wrapped_attraction() {
        let mut plan = DayPlan::new();
        plan.push(
            "Day 1",
            vec![
                long_attraction("Spot1", None),
                long_attraction("Spot2", None),
                long_attraction("Spot3", Some("Carbonara")),
            ],
        );
        let mut app = App::new();
        app.itinerary = Some(ItineraryResponse {
            cities: vec!["Rome".to_string()],
            days: 1,
            itineraries: Itineraries {
                combined: Some(plan),
            },
            error: None,
        });
        app.itinerary_scroll = 1000;

        let content = buffer_text_sized(&app, 40, 12);
        assert!(content.contains("Carbonara"));
        assert!(!content.contains("Itinerary for"));
    }

    #[test]
    fn test_render_empty_shows_hint() {
        let app = App::new();
        let content = buffer_text(&app);
        assert!(content.contains("Ctrl+G"));
    }
}
