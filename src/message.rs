use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::sync::atomic::{AtomicU64, Ordering};
use textwrap::wrap;

// Creation-time ids alone can collide within a millisecond; the counter
// keeps them unique for the life of the process.
static NEXT_MESSAGE_SEQ: AtomicU64 = AtomicU64::new(0);

/// One turn in the conversation, tagged by role and timestamp.
/// Immutable once created.
#[derive(Debug, Clone)]
pub struct Message {
    id: String,
    text: String,
    from_user: bool,
    timestamp: DateTime<Local>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text.into(), true)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text.into(), false)
    }

    fn new(text: String, from_user: bool) -> Self {
        let timestamp = Local::now();
        let id = format!(
            "{}-{}",
            timestamp.timestamp_millis(),
            NEXT_MESSAGE_SEQ.fetch_add(1, Ordering::Relaxed)
        );
        Self {
            id,
            text,
            from_user,
            timestamp,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn from_user(&self) -> bool {
        self.from_user
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Renders the message as a bubble: timestamp header, wrapped body,
    /// closing rail. User messages are indented off the left edge.
    pub fn render(&self, area: Rect) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let style = self.base_style();

        self.render_header(&mut lines, style);
        self.render_body(&mut lines, area, style);
        self.render_footer(&mut lines, style);

        lines
    }

    fn base_style(&self) -> Style {
        Style::default().fg(if self.from_user {
            Color::Rgb(255, 223, 128) // Warm yellow
        } else {
            Color::Rgb(144, 238, 144) // Soft green
        })
    }

    fn indent(&self) -> &'static str {
        if self.from_user {
            "  "
        } else {
            ""
        }
    }

    fn render_header(&self, lines: &mut Vec<Line<'static>>, style: Style) {
        let timestamp = self.timestamp.format("%H:%M").to_string();
        let who = if self.from_user { "you" } else { "assistant" };

        lines.push(Line::from(vec![
            Span::styled(self.indent().to_string(), style),
            Span::styled("┌─".to_string(), style),
            Span::styled(timestamp, style.add_modifier(Modifier::DIM)),
            Span::styled(" ".to_string(), style),
            Span::styled(who.to_string(), style.add_modifier(Modifier::DIM)),
        ]));
    }

    fn render_body(&self, lines: &mut Vec<Line<'static>>, area: Rect, style: Style) {
        let wrap_width = (area.width as usize).saturating_sub(4).max(1);

        for raw_line in self.text.lines() {
            if raw_line.trim().is_empty() {
                lines.push(Line::from(vec![
                    Span::styled(self.indent().to_string(), style),
                    Span::styled("│".to_string(), style),
                ]));
                continue;
            }

            for wrapped_line in wrap(raw_line, wrap_width) {
                lines.push(Line::from(vec![
                    Span::styled(self.indent().to_string(), style),
                    Span::styled("│ ".to_string(), style),
                    Span::styled(wrapped_line.to_string(), style),
                ]));
            }
        }
    }

    fn render_footer(&self, lines: &mut Vec<Line<'static>>, style: Style) {
        lines.push(Line::from(vec![
            Span::styled(self.indent().to_string(), style),
            Span::styled("╰─".to_string(), style),
        ]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_within_the_same_instant() {
        let a = Message::user("one");
        let b = Message::user("two");
        let c = Message::assistant("three");
        assert_ne!(a.id(), b.id());
        assert_ne!(b.id(), c.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn constructors_set_the_role_flag() {
        assert!(Message::user("hi").from_user());
        assert!(!Message::assistant("hi").from_user());
    }

    #[test]
    fn render_wraps_long_bodies_to_the_viewport() {
        let message = Message::assistant("word ".repeat(40));
        let area = Rect::new(0, 0, 24, 10);
        let lines = message.render(area);
        // header + several wrapped body lines + footer
        assert!(lines.len() > 3);
    }
}
