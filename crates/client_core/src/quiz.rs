//! Quiz session state machine.
//!
//! `PrePlay -> Asking -> Answered -> (Asking | Ended)`. The store picks each
//! question given the ids already asked; the session ends after
//! [`QUESTIONS_PER_SESSION`] questions or when the store runs out.

use std::sync::Arc;

use shared::{
    domain::{CategoryCatalog, QuestionId},
    protocol::{NextQuestion, QuizCategory, QuizQuestion},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::QuizError,
    evaluate::is_correct,
    prompt::{Prompt, RETRY_CATEGORIES_NOTICE, RETRY_QUESTION_NOTICE},
    sequence::{RequestTracker, Settled},
    store::QuestionStore,
};

pub const QUESTIONS_PER_SESSION: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    PrePlay,
    Asking,
    Answered,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: u32,
    pub asked: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizState {
    pub category: Option<QuizCategory>,
    pub asked_ids: Vec<QuestionId>,
    pub current: Option<QuizQuestion>,
    pub guess: String,
    pub show_answer: bool,
    /// Verdict for the current question once a guess has been submitted.
    pub verdict: Option<bool>,
    pub correct_count: u32,
    pub ended: bool,
}

#[derive(Debug, Clone)]
pub enum QuizEvent {
    QuestionServed {
        category: QuizCategory,
        question: QuizQuestion,
    },
    Exhausted {
        category: QuizCategory,
    },
    GuessSubmitted {
        guess: String,
    },
    SessionComplete,
    Restarted,
}

impl QuizState {
    pub fn phase(&self) -> QuizPhase {
        if self.ended {
            QuizPhase::Ended
        } else if self.category.is_none() || self.current.is_none() {
            QuizPhase::PrePlay
        } else if self.show_answer {
            QuizPhase::Answered
        } else {
            QuizPhase::Asking
        }
    }

    pub fn score(&self) -> Score {
        Score {
            correct: self.correct_count,
            asked: self.asked_ids.len(),
        }
    }

    pub fn reduce(self, event: QuizEvent) -> Self {
        match event {
            QuizEvent::QuestionServed { category, question } => {
                let mut asked_ids = self.asked_ids;
                asked_ids.push(question.id);
                Self {
                    category: Some(category),
                    asked_ids,
                    current: Some(question),
                    guess: String::new(),
                    show_answer: false,
                    verdict: None,
                    ..self
                }
            }
            QuizEvent::Exhausted { category } => Self {
                category: Some(category),
                current: None,
                guess: String::new(),
                show_answer: false,
                verdict: None,
                ended: true,
                ..self
            },
            QuizEvent::GuessSubmitted { guess } => {
                let correct = self
                    .current
                    .as_ref()
                    .is_some_and(|current| is_correct(&guess, &current.answer));
                Self {
                    guess,
                    show_answer: true,
                    verdict: Some(correct),
                    correct_count: self.correct_count + u32::from(correct),
                    ..self
                }
            }
            QuizEvent::SessionComplete => Self {
                ended: true,
                ..self
            },
            QuizEvent::Restarted => Self::default(),
        }
    }
}

struct QuizInner {
    state: QuizState,
    categories: CategoryCatalog,
    tracker: RequestTracker,
}

impl QuizInner {
    fn ensure_ready(&self, operation: &'static str, expected: QuizPhase) -> Result<(), QuizError> {
        if self.tracker.is_pending() {
            return Err(QuizError::Busy);
        }
        let phase = self.state.phase();
        if phase != expected {
            return Err(QuizError::WrongPhase { operation, phase });
        }
        Ok(())
    }

    fn apply(&mut self, event: QuizEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(event);
    }
}

pub struct QuizController {
    store: Arc<dyn QuestionStore>,
    prompt: Arc<dyn Prompt>,
    inner: Mutex<QuizInner>,
}

impl QuizController {
    pub fn new(store: Arc<dyn QuestionStore>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            store,
            prompt,
            inner: Mutex::new(QuizInner {
                state: QuizState::default(),
                categories: CategoryCatalog::new(),
                tracker: RequestTracker::default(),
            }),
        }
    }

    /// Loads the category catalog offered on the pre-play screen.
    pub async fn mount(&self) -> Result<(), QuizError> {
        match self.store.list_categories().await {
            Ok(categories) => {
                debug!(count = categories.len(), "quiz: categories loaded");
                self.inner.lock().await.categories = categories;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "quiz: loading categories failed");
                self.prompt.alert(RETRY_CATEGORIES_NOTICE);
                Err(err.into())
            }
        }
    }

    pub async fn state(&self) -> QuizState {
        self.inner.lock().await.state.clone()
    }

    pub async fn phase(&self) -> QuizPhase {
        self.inner.lock().await.state.phase()
    }

    pub async fn score(&self) -> Score {
        self.inner.lock().await.state.score()
    }

    pub async fn categories(&self) -> CategoryCatalog {
        self.inner.lock().await.categories.clone()
    }

    pub async fn is_pending(&self) -> bool {
        self.inner.lock().await.tracker.is_pending()
    }

    pub async fn select_category(&self, category: QuizCategory) -> Result<Settled, QuizError> {
        let (seq, asked) = {
            let mut guard = self.inner.lock().await;
            guard.ensure_ready("select a category", QuizPhase::PrePlay)?;
            (guard.tracker.issue(), guard.state.asked_ids.clone())
        };
        info!(?category, "quiz: session started");
        self.fetch_next(seq, category, asked).await
    }

    /// Grades `guess` against the current answer and reveals it.
    pub async fn submit_guess(&self, guess: &str) -> Result<bool, QuizError> {
        let mut guard = self.inner.lock().await;
        guard.ensure_ready("submit a guess", QuizPhase::Asking)?;
        guard.apply(QuizEvent::GuessSubmitted {
            guess: guess.to_string(),
        });
        let correct = guard.state.verdict == Some(true);
        debug!(
            correct,
            correct_count = guard.state.correct_count,
            "quiz: guess evaluated"
        );
        Ok(correct)
    }

    pub async fn advance(&self) -> Result<Settled, QuizError> {
        let (seq, category, asked) = {
            let mut guard = self.inner.lock().await;
            guard.ensure_ready("advance", QuizPhase::Answered)?;
            if guard.state.asked_ids.len() >= QUESTIONS_PER_SESSION {
                guard.apply(QuizEvent::SessionComplete);
                let score = guard.state.score();
                info!(
                    correct = score.correct,
                    asked = score.asked,
                    "quiz: session complete"
                );
                return Ok(Settled::Applied);
            }
            let Some(category) = guard.state.category else {
                return Err(QuizError::WrongPhase {
                    operation: "advance",
                    phase: QuizPhase::PrePlay,
                });
            };
            (
                guard.tracker.issue(),
                category,
                guard.state.asked_ids.clone(),
            )
        };
        self.fetch_next(seq, category, asked).await
    }

    /// Abandons the session, including any question request still in flight.
    pub async fn restart(&self) {
        let mut guard = self.inner.lock().await;
        guard.tracker.invalidate();
        guard.apply(QuizEvent::Restarted);
        debug!("quiz: restarted");
    }

    async fn fetch_next(
        &self,
        seq: u64,
        category: QuizCategory,
        asked: Vec<QuestionId>,
    ) -> Result<Settled, QuizError> {
        debug!(seq, asked = asked.len(), "quiz: requesting next question");
        let result = self.store.next_quiz_question(&asked, category).await;

        let mut guard = self.inner.lock().await;
        if !guard.tracker.settle(seq) {
            debug!(seq, "quiz: dropping superseded response");
            return Ok(Settled::Stale);
        }
        let event = match result {
            Ok(NextQuestion::Question(question)) if guard.state.asked_ids.contains(&question.id) => {
                Err(QuizError::RepeatedQuestion(question.id))
            }
            Ok(NextQuestion::Question(question)) => {
                Ok(QuizEvent::QuestionServed { category, question })
            }
            Ok(NextQuestion::Exhausted) => Ok(QuizEvent::Exhausted { category }),
            Err(err) => Err(err.into()),
        };

        match event {
            Ok(event) => {
                guard.apply(event);
                if guard.state.ended {
                    info!(
                        asked = guard.state.asked_ids.len(),
                        "quiz: store has no more questions"
                    );
                }
                Ok(Settled::Applied)
            }
            Err(err) => {
                drop(guard);
                warn!(seq, error = %err, "quiz: next question failed");
                self.prompt.alert(RETRY_QUESTION_NOTICE);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/quiz_tests.rs"]
mod tests;
