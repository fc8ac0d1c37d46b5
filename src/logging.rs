// src/logging.rs

use crate::config::get_config;
use crate::errors::{AgriChatError, AgriChatResult};
use flexi_logger::{FileSpec, Logger, LoggerHandle};

/// Starts the file logger (`agrichat_*.log` in the working directory).
/// A TUI cannot log to the terminal it draws on, so everything goes to the
/// file. The returned handle must stay alive for the life of the process.
pub fn init_logging() -> AgriChatResult<LoggerHandle> {
    let config = get_config();

    Logger::try_with_str(&config.log_level)
        .map_err(|e| AgriChatError::logging_error(format!("invalid log level: {}", e)))?
        .log_to_file(FileSpec::default().basename("agrichat"))
        .start()
        .map_err(|e| AgriChatError::logging_error(format!("failed to start logger: {}", e)))
}
