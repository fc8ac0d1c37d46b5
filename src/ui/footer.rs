use crate::app::{App, AppState};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Draws the footer with dynamic instructions
pub fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let instructions = match app.state {
        AppState::Chat => {
            if app.is_sending() {
                "Waiting for the assistant... Esc to quit."
            } else {
                "Enter to send. PgUp/PgDn scroll, End jumps to latest. Esc to quit."
            }
        }
        AppState::QuitConfirm => "Press 'y' to confirm quit or 'n' to cancel.",
        AppState::Quit => "",
    };

    let footer = Paragraph::new(instructions)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(footer, area);
}
