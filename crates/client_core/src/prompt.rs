//! User-facing notices and the yes/no gate in front of destructive actions.

use tracing::{info, warn};

pub const RETRY_QUESTIONS_NOTICE: &str = "Unable to load questions. Please try your request again";
pub const RETRY_QUESTION_NOTICE: &str = "Unable to load question. Please try your request again";
pub const RETRY_CATEGORIES_NOTICE: &str =
    "Unable to load categories. Please try your request again";
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete the question?";

pub trait Prompt: Send + Sync {
    /// Waits for the user's answer; `true` means proceed. Implementations may
    /// block the calling thread, for example on a stdin read.
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

/// Non-interactive prompt: answers every confirmation the same way and sends
/// notices to the log.
pub struct LoggingPrompt {
    answer: bool,
}

impl LoggingPrompt {
    pub fn assume_yes() -> Self {
        Self { answer: true }
    }
}

impl Prompt for LoggingPrompt {
    fn confirm(&self, message: &str) -> bool {
        info!(answer = self.answer, "prompt: {message}");
        self.answer
    }

    fn alert(&self, message: &str) {
        warn!("prompt: {message}");
    }
}
