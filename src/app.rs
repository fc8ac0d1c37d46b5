use crate::conversation::Conversation;
use crate::message::Message;
use crate::status_indicator::StatusIndicator;

/// Rows from the bottom edge beyond which the jump-to-bottom indicator
/// appears.
pub const JUMP_BUTTON_THRESHOLD: u16 = 100;

/// Represents the different states of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Chat,
    QuitConfirm,
    Quit,
}

/// Single-flight state of the send pipeline. At most one send may be
/// outstanding; `Sending` is only ever left when the backend call settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    Idle,
    Sending,
}

pub struct App {
    pub state: AppState,
    pub input: String,
    pub scroll: u16,
    pub status_indicator: StatusIndicator,
    pub backend_url: String,
    conversation: Conversation,
    send_state: SendState,
    pinned_to_bottom: bool,
    show_jump_button: bool,
}

impl App {
    pub fn new(backend_url: String) -> App {
        App {
            state: AppState::Chat,
            input: String::new(),
            scroll: 0,
            status_indicator: StatusIndicator::new(),
            backend_url,
            conversation: Conversation::new(),
            send_state: SendState::Idle,
            pinned_to_bottom: true,
            show_jump_button: false,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Appends to the thread and re-pins the view to the newest message.
    pub fn push_message(&mut self, message: Message) {
        self.conversation.push(message);
        self.pinned_to_bottom = true;
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn is_sending(&self) -> bool {
        self.send_state == SendState::Sending
    }

    /// Idle -> Sending. Returns false (and changes nothing) when a send is
    /// already outstanding.
    pub fn begin_send(&mut self) -> bool {
        match self.send_state {
            SendState::Idle => {
                self.send_state = SendState::Sending;
                true
            }
            SendState::Sending => false,
        }
    }

    /// Sending -> Idle, unconditionally. Runs on every settlement path.
    pub fn finish_send(&mut self) {
        self.send_state = SendState::Idle;
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.pinned_to_bottom = false;
        self.scroll = self.scroll.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll = self.scroll.saturating_add(rows);
    }

    pub fn jump_to_bottom(&mut self) {
        self.pinned_to_bottom = true;
    }

    pub fn jump_button_visible(&self) -> bool {
        self.show_jump_button
    }

    /// Reconciles the scroll offset against the rendered thread and updates
    /// the jump-button flag. Called once per frame with the measured sizes.
    pub fn track_scroll(&mut self, total_rows: u16, viewport_rows: u16) {
        let max_scroll = total_rows.saturating_sub(viewport_rows);

        if self.pinned_to_bottom || self.scroll > max_scroll {
            self.scroll = max_scroll;
        }

        let distance = distance_from_bottom(total_rows, self.scroll, viewport_rows);
        self.show_jump_button = distance > JUMP_BUTTON_THRESHOLD;

        if distance == 0 {
            self.pinned_to_bottom = true;
        }
    }
}

/// Rows between the bottom of the rendered thread and the bottom of the
/// viewport at the given offset.
pub fn distance_from_bottom(total_rows: u16, scroll_offset: u16, viewport_rows: u16) -> u16 {
    total_rows
        .saturating_sub(scroll_offset)
        .saturating_sub(viewport_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new("http://localhost:8000".to_string())
    }

    #[test]
    fn begin_send_rejects_overlapping_sends() {
        let mut app = app();
        assert!(!app.is_sending());
        assert!(app.begin_send());
        assert!(app.is_sending());
        assert!(!app.begin_send());
        app.finish_send();
        assert!(!app.is_sending());
        assert!(app.begin_send());
    }

    #[test]
    fn push_message_pins_view_to_bottom() {
        let mut app = app();
        app.scroll_up(5);
        app.push_message(Message::user("hello"));
        // pinned again: a long thread resolves to its bottom
        app.track_scroll(300, 40);
        assert_eq!(app.scroll, 260);
    }

    #[test]
    fn jump_button_follows_the_threshold() {
        let mut app = app();
        app.scroll_up(1); // unpin so track_scroll keeps the offset

        app.scroll = 0;
        app.track_scroll(151, 50); // distance 101
        assert!(app.jump_button_visible());

        app.scroll = 0;
        app.track_scroll(150, 50); // distance 100, not beyond it
        assert!(!app.jump_button_visible());

        app.track_scroll(40, 50); // thread shorter than viewport
        assert!(!app.jump_button_visible());
    }

    #[test]
    fn reaching_the_bottom_re_pins() {
        let mut app = app();
        app.scroll_up(1);
        app.scroll = 60;
        app.track_scroll(100, 40); // offset at max, distance 0
        assert!(!app.jump_button_visible());
        app.push_message(Message::assistant("reply"));
        app.track_scroll(120, 40);
        assert_eq!(app.scroll, 80);
    }

    #[test]
    fn distance_saturates_at_zero() {
        assert_eq!(distance_from_bottom(10, 0, 50), 0);
        assert_eq!(distance_from_bottom(200, 30, 50), 120);
    }
}
