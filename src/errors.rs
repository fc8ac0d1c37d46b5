use thiserror::Error;

pub type AgriChatResult<T> = Result<T, AgriChatError>;

/// Crate-wide error type. Backend failures are a single category: the UI
/// surfaces them all as one generic reply, and the cause detail only ever
/// goes to the log.
#[derive(Debug, Error)]
pub enum AgriChatError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),
}

impl AgriChatError {
    pub fn backend_error(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn logging_error(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}
