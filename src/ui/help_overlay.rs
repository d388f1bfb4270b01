//! Help overlay showing all keybindings
//!
//! Renders a centered modal overlay with keyboard shortcuts.

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;

/// Renders the help overlay on top of the current view
pub fn render(frame: &mut Frame) {
    let area = frame.area();
    let overlay_area = centered_rect(54, 22, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Form"),
        help_line("Tab/Shift+Tab", "Next / previous field"),
        help_line("Enter", "Search (in Country)"),
        help_line("Enter", "Add city (in Other city)"),
        help_line("Space/Enter", "Toggle city (in lists)"),
        help_line("\u{2191}/\u{2193}, +/-", "Change days (in Days)"),
        Line::from(""),
        section("Itinerary"),
        help_line("Ctrl+G", "Generate itinerary"),
        help_line("\u{2191}/\u{2193}, PgUp/PgDn", "Scroll (in Itinerary)"),
        help_line("g/G", "Jump to top / bottom"),
        Line::from(""),
        section("Other"),
        help_line("F1", "Toggle this help"),
        help_line("Esc, Ctrl+C", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or F1 to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, overlay_area);
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

/// Creates a help line with key and description
fn help_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<20}", key), Style::default().fg(Color::Yellow)),
        Span::raw(description.to_string()),
    ])
}
