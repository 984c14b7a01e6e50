//! Log messages sent to the MCP client as `notifications/message`

use serde_json::Value;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::mpsc;

use super::protocol::{JsonRpcNotification, LoggingLevel, LoggingMessageParams};
use crate::tools::Progress;

pub const LOGGING_MESSAGE: &str = "notifications/message";

/// Outbound lines of one session. Responses and notifications share it, so a
/// tool's progress messages always reach the client before its result.
pub type Outbound = mpsc::UnboundedSender<String>;

/// Forwards tool progress to the client, dropping anything below the session level
pub struct ClientNotifier<'a> {
    outbound: Option<&'a Outbound>,
    min_level: &'a AtomicU8,
    logger: &'static str,
}

impl<'a> ClientNotifier<'a> {
    pub fn new(outbound: Option<&'a Outbound>, min_level: &'a AtomicU8, logger: &'static str) -> Self {
        Self {
            outbound,
            min_level,
            logger,
        }
    }

    pub fn send(&self, level: LoggingLevel, message: &str) {
        let Some(outbound) = self.outbound else {
            return;
        };
        if level.as_u8() < self.min_level.load(Ordering::Relaxed) {
            return;
        }

        let params = LoggingMessageParams {
            level,
            logger: self.logger.to_string(),
            data: Value::String(message.to_string()),
        };
        let notification = match serde_json::to_value(params) {
            Ok(params) => JsonRpcNotification::new(LOGGING_MESSAGE, params),
            Err(e) => {
                log::error!("Failed to encode log notification: {}", e);
                return;
            }
        };

        match serde_json::to_string(&notification) {
            // Receiver is gone only once the session has closed
            Ok(line) => {
                let _ = outbound.send(line);
            }
            Err(e) => log::error!("Failed to serialize log notification: {}", e),
        }
    }
}

impl Progress for ClientNotifier<'_> {
    fn info(&self, message: &str) {
        self.send(LoggingLevel::Info, message);
    }

    fn error(&self, message: &str) {
        self.send(LoggingLevel::Error, message);
    }
}
