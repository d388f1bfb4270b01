//! Trip form rendering
//!
//! Renders the input side of the screen: the country and "other city"
//! fields, the trip length, and the suggested and selected city lists.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};

/// Color scheme for the form
mod colors {
    use ratatui::style::Color;

    /// Border of the focused element
    pub const FOCUSED: Color = Color::Yellow;
    /// Border of other elements
    pub const BORDER: Color = Color::Gray;
    /// Placeholder and hint text
    pub const HINT: Color = Color::DarkGray;
    /// Selected city marker
    pub const SELECTED: Color = Color::Green;
}

/// Width of the column holding the text fields
const FIELD_COLUMN_WIDTH: u16 = 34;

fn bordered(title: &str, focused: bool) -> Block<'static> {
    let color = if focused { colors::FOCUSED } else { colors::BORDER };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", title))
}

/// A single-line text field with a placeholder and a cursor when focused
fn text_field<'a>(value: &'a str, placeholder: &'a str, focused: bool) -> Line<'a> {
    if value.is_empty() && !focused {
        return Line::from(Span::styled(placeholder, Style::default().fg(colors::HINT)));
    }
    let mut spans = vec![Span::raw(value)];
    if focused {
        spans.push(Span::styled(
            "\u{2588}", // █
            Style::default().fg(colors::FOCUSED),
        ));
    }
    Line::from(spans)
}

fn render_fields(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let searching = app.is_searching();
    let country_title = if searching { "Country (searching...)" } else { "Country" };
    let country = Paragraph::new(text_field(
        &app.country,
        "Enter country",
        app.focus == Focus::Country,
    ))
    .block(bordered(country_title, app.focus == Focus::Country));
    frame.render_widget(country, rows[0]);

    let custom = Paragraph::new(text_field(
        &app.custom_city,
        "Other city...",
        app.focus == Focus::CustomCity,
    ))
    .block(bordered("Other city", app.focus == Focus::CustomCity));
    frame.render_widget(custom, rows[1]);

    let days_focused = app.focus == Focus::Days;
    let mut days_spans = vec![Span::styled(
        app.days_text(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if days_focused {
        days_spans.push(Span::styled(
            "  \u{2191}/\u{2193} adjust, Enter generates",
            Style::default().fg(colors::HINT),
        ));
    }
    let days = Paragraph::new(Line::from(days_spans)).block(bordered("Days", days_focused));
    frame.render_widget(days, rows[2]);
}

/// Visible window of `len` rows keeping `cursor` on screen
fn visible_range(len: usize, cursor: usize, height: usize) -> std::ops::Range<usize> {
    if height == 0 || len <= height {
        return 0..len;
    }
    let start = cursor.saturating_sub(height - 1).min(len - height);
    start..start + height
}

fn render_suggestions(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Suggestions;
    let block = bordered("Suggested Cities", focused);
    let height = block.inner(area).height as usize;

    let lines: Vec<Line> = match &app.suggestions {
        None if app.is_searching() => vec![Line::from(Span::styled(
            "Fetching suggested cities...",
            Style::default().fg(colors::HINT),
        ))],
        None => vec![Line::from(Span::styled(
            "Search a country to see suggestions",
            Style::default().fg(colors::HINT),
        ))],
        Some(suggestions) if suggestions.is_empty() => vec![Line::from(Span::styled(
            "No suggestions. Add a city by name.",
            Style::default().fg(colors::HINT),
        ))],
        Some(suggestions) => {
            let range = visible_range(suggestions.len(), app.suggestion_cursor, height);
            suggestions.cities()[range.clone()]
                .iter()
                .enumerate()
                .map(|(offset, city)| {
                    let index = range.start + offset;
                    let chosen = app.selected.contains(city);
                    let marker = if chosen { "[x] " } else { "[ ] " };
                    let mut style = if chosen {
                        Style::default().fg(colors::SELECTED)
                    } else {
                        Style::default()
                    };
                    if focused && index == app.suggestion_cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Line::from(Span::styled(format!("{}{}", marker, city), style))
                })
                .collect()
        }
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_selected(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Selected;
    let title = format!("Selected Cities ({})", app.selected.len());
    let block = bordered(&title, focused);
    let height = block.inner(area).height as usize;

    let lines: Vec<Line> = if app.selected.is_empty() {
        vec![Line::from(Span::styled(
            "None yet",
            Style::default().fg(colors::HINT),
        ))]
    } else {
        let range = visible_range(app.selected.len(), app.selected_cursor, height);
        app.selected.as_slice()[range.clone()]
            .iter()
            .enumerate()
            .map(|(offset, city)| {
                let index = range.start + offset;
                let mut style = Style::default().fg(Color::White);
                if focused && index == app.selected_cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(vec![
                    Span::styled(format!("{}. ", index + 1), Style::default().fg(colors::HINT)),
                    Span::styled(city.clone(), style),
                    Span::styled(" \u{00D7}", Style::default().fg(colors::HINT)), // ×
                ])
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the trip form into `area`
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(FIELD_COLUMN_WIDTH),
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(area);

    render_fields(frame, columns[0], app);
    render_suggestions(frame, columns[1], app);
    render_selected(frame, columns[2], app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CitySuggestions;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(app: &App) -> String {
        let backend = TestBackend::new(100, 12);
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
    fn test_visible_range_keeps_cursor_on_screen() {
        assert_eq!(visible_range(3, 0, 5), 0..3);
        assert_eq!(visible_range(10, 0, 4), 0..4);
        assert_eq!(visible_range(10, 5, 4), 2..6);
        assert_eq!(visible_range(10, 9, 4), 6..10);
        assert_eq!(visible_range(10, 9, 0), 0..10);
    }

    #[test]
    fn test_empty_form_shows_placeholders() {
        let mut app = App::new();
        app.focus = Focus::Days;
        let content = buffer_text(&app);
        assert!(content.contains("Enter country"));
        assert!(content.contains("Search a country"));
        assert!(content.contains("None yet"));
    }

    #[test]
    fn test_selected_suggestions_are_marked() {
        let mut app = App::new();
        app.country = "France".to_string();
        app.suggestions = Some(CitySuggestions::new(
            "France",
            vec!["Paris".to_string(), "Lyon".to_string()],
        ));
        app.selected.insert("Lyon");

        let content = buffer_text(&app);
        assert!(content.contains("[ ] Paris"));
        assert!(content.contains("[x] Lyon"));
        assert!(content.contains("Selected Cities (1)"));
        assert!(content.contains("1. Lyon"));
    }

    #[test]
    fn test_days_field_shows_value() {
        let mut app = App::new();
        app.days = 7;
        let content = buffer_text(&app);
        assert!(content.contains('7'));
    }
}
