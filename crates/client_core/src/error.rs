use shared::{domain::QuestionId, error::ApiException};
use thiserror::Error;

use crate::quiz::QuizPhase;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("question store unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("question store rejected request: {0}")]
    Rejected(#[from] ApiException),
    #[error("malformed question store response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("page numbers start at 1, got {0}")]
    InvalidPage(u32),
    #[error("another browse request is still in flight")]
    Busy,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("cannot {operation} while the quiz is in {phase:?}")]
    WrongPhase {
        operation: &'static str,
        phase: QuizPhase,
    },
    #[error("a quiz request is still in flight")]
    Busy,
    #[error("store served question {0} twice in one session")]
    RepeatedQuestion(QuestionId),
    #[error(transparent)]
    Store(#[from] StoreError),
}
