pub mod footer;
pub mod header;
pub mod quit_confirm;

use crate::app::{App, AppState};
use crate::chat_view;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

/// Top-level frame: header bar, active screen, footer hints.
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    header::draw_header(f, chunks[0]);

    match app.state {
        AppState::QuitConfirm => quit_confirm::draw_quit_confirm(f, chunks[1]),
        _ => chat_view::draw_chat(f, app, chunks[1]),
    }

    footer::draw_footer(f, chunks[2], app);
}
