use crate::api;
use crate::app::App;
use crate::message::Message;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Mutex;
use unicode_width::UnicodeWidthStr;

/// Shown in place of a reply when the backend call fails for any reason.
pub const SEND_FAILURE_REPLY: &str = "Sorry, something went wrong. Please try again.";

pub fn draw_chat(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(2),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    draw_messages(f, app, chunks[0]);

    app.status_indicator.update_spinner();
    app.status_indicator.render(f, chunks[1]);

    draw_input(f, app, chunks[2]);
}

fn draw_messages(f: &mut Frame, app: &mut App, area: Rect) {
    if app.conversation().is_empty() {
        draw_empty_state(f, area);
        return;
    }

    let mut lines = Vec::new();
    for message in app.conversation().iter() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(message.render(area));
    }

    let total_rows = lines.len() as u16;
    app.track_scroll(total_rows, area.height);

    let msgs_para = Paragraph::new(lines)
        .style(Style::default())
        .block(Block::default())
        .wrap(Wrap { trim: true });
    f.render_widget(msgs_para.scroll((app.scroll, 0)), area);

    if app.jump_button_visible() {
        draw_jump_button(f, area);
    }
}

fn draw_empty_state(f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage(40),
                Constraint::Length(4),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let placeholder = Paragraph::new("💬\n\nStart a conversation\nType a message below to begin")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(placeholder, chunks[1]);
}

fn draw_jump_button(f: &mut Frame, area: Rect) {
    let label = " ↓ End: latest ";
    let width = (label.width() as u16).min(area.width);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            label,
            Style::default().fg(Color::Black).bg(Color::Gray),
        ))),
        Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y: area.y + area.height.saturating_sub(1),
            width,
            height: 1,
        },
    );
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let separator = "─".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            &separator,
            Style::default().fg(Color::DarkGray),
        ))),
        Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        },
    );

    // Input is disabled while a send is outstanding
    let (prefix_style, input_style) = if app.is_sending() {
        (
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::White),
        )
    };

    let input = Line::from(vec![
        Span::styled("→ ", prefix_style),
        Span::styled(&app.input, input_style),
    ]);

    let visible_width = area.width.saturating_sub(2);
    let text_width = app.input.width() as u16;
    let scroll_offset = text_width.saturating_sub(visible_width);

    f.render_widget(
        Paragraph::new(input).scroll((0, scroll_offset)),
        Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height - 2,
        },
    );

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            &separator,
            Style::default().fg(Color::DarkGray),
        ))),
        Rect {
            x: area.x,
            y: area.y + area.height - 1,
            width: area.width,
            height: 1,
        },
    );

    let cursor_x = area.x + 2 + text_width - scroll_offset;
    f.set_cursor_position((cursor_x, area.y + 1));
}

/// Drives one user submission through the backend bridge: append the user
/// message, call `/chat`, append the reply or the generic failure text.
/// Blank input and overlapping submissions are dropped before any state
/// changes. The send state returns to Idle on every settlement path.
pub async fn send_message(app: Arc<Mutex<App>>, client: Client, raw_input: String) {
    let text = raw_input.trim().to_string();

    let backend_url = {
        let mut guard = app.lock().await;
        if text.is_empty() || !guard.begin_send() {
            return;
        }
        guard.push_message(Message::user(text.clone()));
        guard.clear_input();
        guard.status_indicator.set_thinking(true);
        guard.backend_url.clone()
    };

    let reply = match api::request_reply(&client, &backend_url, &text).await {
        Ok(reply) => reply,
        Err(e) => {
            log::error!("send failed: {}", e);
            SEND_FAILURE_REPLY.to_string()
        }
    };

    let mut guard = app.lock().await;
    guard.push_message(Message::assistant(reply));
    guard.status_indicator.set_thinking(false);
    guard.finish_send();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_app(backend_url: String) -> Arc<Mutex<App>> {
        Arc::new(Mutex::new(App::new(backend_url)))
    }

    #[tokio::test]
    async fn appends_user_message_then_reply_in_order() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "reply": "Hello farmer" })),
            )
            .mount(&mock_server)
            .await;

        let app = test_app(mock_server.uri());
        send_message(app.clone(), Client::new(), "  hello  ".to_string()).await;

        let guard = app.lock().await;
        let turns: Vec<(bool, &str)> = guard
            .conversation()
            .iter()
            .map(|m| (m.from_user(), m.text()))
            .collect();
        assert_eq!(turns, vec![(true, "hello"), (false, "Hello farmer")]);
        assert!(!guard.is_sending());
        assert!(guard.input.is_empty());
    }

    #[tokio::test]
    async fn blank_submission_appends_nothing_and_sends_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let app = test_app(mock_server.uri());
        send_message(app.clone(), Client::new(), "   \t  ".to_string()).await;

        let guard = app.lock().await;
        assert!(guard.conversation().is_empty());
        assert!(!guard.is_sending());
    }

    #[tokio::test]
    async fn submission_while_outstanding_is_dropped() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "reply": "done" }))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let app = test_app(mock_server.uri());
        let first = tokio::spawn(send_message(app.clone(), Client::new(), "first".to_string()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        {
            let guard = app.lock().await;
            assert!(guard.is_sending());
        }

        send_message(app.clone(), Client::new(), "second".to_string()).await;
        first.await.unwrap();

        let guard = app.lock().await;
        // Only the first submission's turn pair made it in
        assert_eq!(guard.conversation().len(), 2);
        assert_eq!(guard.conversation().last().map(|m| m.text()), Some("done"));
        assert!(!guard.is_sending());
    }

    #[tokio::test]
    async fn failure_appends_the_generic_error_reply() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let app = test_app(mock_server.uri());
        send_message(app.clone(), Client::new(), "hello".to_string()).await;

        let guard = app.lock().await;
        assert_eq!(guard.conversation().len(), 2);
        assert_eq!(
            guard.conversation().last().map(|m| m.text()),
            Some(SEND_FAILURE_REPLY)
        );
        assert!(!guard.is_sending());
    }

    #[tokio::test]
    async fn transport_failure_appends_the_generic_error_reply() {
        let app = test_app("http://127.0.0.1:1".to_string());
        send_message(app.clone(), Client::new(), "hello".to_string()).await;

        let guard = app.lock().await;
        assert_eq!(guard.conversation().len(), 2);
        assert_eq!(
            guard.conversation().last().map(|m| m.text()),
            Some(SEND_FAILURE_REPLY)
        );
        assert!(!guard.is_sending());
    }

    #[tokio::test]
    async fn n_settled_sends_leave_two_n_messages() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "ack" })))
            .mount(&mock_server)
            .await;

        let app = test_app(mock_server.uri());
        for i in 0..3 {
            send_message(app.clone(), Client::new(), format!("message {}", i)).await;
        }

        let guard = app.lock().await;
        assert_eq!(guard.conversation().len(), 6);
        for (i, message) in guard.conversation().iter().enumerate() {
            assert_eq!(message.from_user(), i % 2 == 0);
        }
    }
}
