//! Modal alert
//!
//! Shows a blocking message (rejected input, failed request) until the
//! user dismisses it.

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;

/// Renders `message` in a centered box on top of the current view
pub fn render(frame: &mut Frame, message: &str) {
    let area = frame.area();
    let width = u16::try_from(message.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(6)
        .clamp(30, 60);
    let overlay_area = centered_rect(width, 7, area);

    frame.render_widget(Clear, overlay_area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(" Notice ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightRed));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, overlay_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_alert_renders_message() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| render(frame, "Paris is already selected."))
            .unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("Paris is already selected."));
        assert!(content.contains("Notice"));
    }

    #[test]
    fn test_alert_with_huge_message_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let message = format!("{} is already selected.", "x".repeat(65_510));

        terminal.draw(|frame| render(frame, &message)).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("Notice"));
    }
}
