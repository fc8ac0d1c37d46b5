use crate::app::{App, AppState};
use crate::chat_view;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Key handling for the chat screen. Editing keys are ignored while a send
/// is outstanding; the pipeline itself guards Enter a second time.
pub fn handle_chat_input(
    app: &mut App,
    key: KeyEvent,
    app_arc: &Arc<Mutex<App>>,
    client: &Client,
) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::QuitConfirm;
        }
        KeyCode::Enter => {
            if !app.is_sending() {
                let raw_input = app.input.clone();
                tokio::spawn(chat_view::send_message(
                    app_arc.clone(),
                    client.clone(),
                    raw_input,
                ));
            }
        }
        KeyCode::PageUp => app.scroll_up(1),
        KeyCode::PageDown => app.scroll_down(1),
        KeyCode::End => app.jump_to_bottom(),
        KeyCode::Backspace => {
            if !app.is_sending() {
                app.input.pop();
            }
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'c' => app.state = AppState::Quit,
                    'u' => app.scroll_up(1),
                    'd' => app.scroll_down(1),
                    _ => {}
                }
            } else if !app.is_sending() {
                app.input.push(c);
            }
        }
        _ => {}
    }
}

pub fn handle_quit_confirm_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.state = AppState::Quit;
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.state = AppState::Chat;
        }
        _ => {}
    }
}
