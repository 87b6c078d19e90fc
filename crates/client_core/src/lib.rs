//! Client-side controllers for the trivia question store: a browse view
//! (paging, category filter, search, delete) and a quiz session.

pub mod browse;
pub mod error;
pub mod evaluate;
pub mod prompt;
pub mod quiz;
pub mod sequence;
pub mod store;

pub use browse::{BrowseController, DeleteOutcome, ListMode, ListState, PageLabel, PAGE_SIZE};
pub use error::{BrowseError, QuizError, StoreError};
pub use prompt::{LoggingPrompt, Prompt};
pub use quiz::{QuizController, QuizPhase, QuizState, Score, QUESTIONS_PER_SESSION};
pub use sequence::Settled;
pub use store::{HttpQuestionStore, QuestionStore};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
