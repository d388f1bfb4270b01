//! UI rendering module for tripgen
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod alert;
pub mod help_overlay;
pub mod itinerary;
pub mod trip_form;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Height of the form area
const FORM_HEIGHT: u16 = 11;

/// Renders the whole screen, overlays last
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(FORM_HEIGHT),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title = Paragraph::new(Line::from(Span::styled(
        "AI Travel Itinerary Generator",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, chunks[0]);

    trip_form::render(frame, chunks[1], app);
    itinerary::render(frame, chunks[2], app);
    render_footer(frame, chunks[3], app);

    if app.show_help {
        help_overlay::render(frame);
    }
    if let Some(message) = &app.alert {
        alert::render(frame, message);
    }
}

/// Status of requests in flight, or key hints when idle
fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let line = match app.status_line() {
        Some(status) => Line::from(Span::styled(status, Style::default().fg(Color::Yellow))),
        None => Line::from(Span::styled(
            "Tab: next field  Ctrl+G: generate  F1: help  Esc: quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Helper function to create a centered rect
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
