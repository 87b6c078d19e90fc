//! Question listing: paging through everything, narrowing to one category,
//! or searching by text, plus deleting from whichever listing is on screen.

use std::sync::Arc;

use shared::{
    domain::{CategoryCatalog, CategoryId, Question, QuestionId},
    error::ErrorCode,
    protocol::{CategoryListing, QuestionPage, SearchOutcome},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{BrowseError, StoreError},
    prompt::{Prompt, DELETE_CONFIRMATION, RETRY_QUESTIONS_NOTICE},
    sequence::{RequestTracker, Settled},
    store::QuestionStore,
};

pub const PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListMode {
    #[default]
    All,
    /// Whole category shown at once; pagination is hidden.
    ByCategory(CategoryId),
    Search(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub questions: Vec<Question>,
    pub page: u32,
    pub total_questions: u64,
    pub categories: CategoryCatalog,
    pub current_category: Option<CategoryId>,
    pub mode: ListMode,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            questions: Vec::new(),
            page: 1,
            total_questions: 0,
            categories: CategoryCatalog::new(),
            current_category: None,
            mode: ListMode::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLabel {
    pub number: u32,
    pub active: bool,
}

/// A successful store response, ready to fold into the list state.
#[derive(Debug, Clone)]
pub enum ListEvent {
    PageLoaded {
        page: u32,
        response: QuestionPage,
    },
    CategoryLoaded {
        category: CategoryId,
        listing: CategoryListing,
    },
    SearchLoaded {
        term: String,
        outcome: SearchOutcome,
    },
}

impl ListState {
    pub fn reduce(self, event: ListEvent) -> Self {
        match event {
            ListEvent::PageLoaded { page, response } => Self {
                questions: response.questions,
                page,
                total_questions: response.total_questions,
                categories: response.categories,
                current_category: response.current_category,
                mode: ListMode::All,
            },
            ListEvent::CategoryLoaded { category, listing } => {
                let (questions, total_questions) = match listing {
                    CategoryListing::Questions(found) => (found.questions, found.total_questions),
                    CategoryListing::NoQuestions => (Vec::new(), 0),
                };
                Self {
                    questions,
                    total_questions,
                    current_category: Some(category),
                    mode: ListMode::ByCategory(category),
                    ..self
                }
            }
            ListEvent::SearchLoaded { term, outcome } => {
                let (questions, total_questions, current_category) = match outcome {
                    SearchOutcome::Matches(found) => {
                        (found.questions, found.total_questions, found.current_category)
                    }
                    SearchOutcome::NoResults => (Vec::new(), 0, None),
                };
                Self {
                    questions,
                    total_questions,
                    current_category,
                    mode: ListMode::Search(term),
                    ..self
                }
            }
        }
    }

    pub fn page_count(&self) -> u32 {
        u32::try_from(self.total_questions.div_ceil(PAGE_SIZE)).unwrap_or(u32::MAX)
    }

    pub fn pagination_labels(&self) -> Vec<PageLabel> {
        if matches!(self.mode, ListMode::ByCategory(_)) {
            return Vec::new();
        }
        (1..=self.page_count())
            .map(|number| PageLabel {
                number,
                active: number == self.page,
            })
            .collect()
    }

    pub fn category_name(&self, id: CategoryId) -> Option<&str> {
        self.categories.get(&id).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Deleted { refresh: Settled },
}

struct BrowseInner {
    state: ListState,
    tracker: RequestTracker,
}

pub struct BrowseController {
    store: Arc<dyn QuestionStore>,
    prompt: Arc<dyn Prompt>,
    inner: Mutex<BrowseInner>,
}

impl BrowseController {
    pub fn new(store: Arc<dyn QuestionStore>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            store,
            prompt,
            inner: Mutex::new(BrowseInner {
                state: ListState::default(),
                tracker: RequestTracker::default(),
            }),
        }
    }

    /// Initial listing shown when the browse view opens.
    pub async fn mount(&self) -> Result<Settled, BrowseError> {
        self.load_page(1).await
    }

    pub async fn state(&self) -> ListState {
        self.inner.lock().await.state.clone()
    }

    pub async fn is_pending(&self) -> bool {
        self.inner.lock().await.tracker.is_pending()
    }

    pub async fn pagination_labels(&self) -> Vec<PageLabel> {
        self.inner.lock().await.state.pagination_labels()
    }

    pub async fn load_page(&self, page: u32) -> Result<Settled, BrowseError> {
        if page == 0 {
            return Err(BrowseError::InvalidPage(page));
        }
        let seq = self.inner.lock().await.tracker.issue();
        debug!(page, seq, "browse: loading page");
        let result = self
            .store
            .list_questions(page)
            .await
            .map(|response| ListEvent::PageLoaded { page, response });
        self.settle(seq, result).await
    }

    pub async fn filter_by_category(&self, category: CategoryId) -> Result<Settled, BrowseError> {
        let seq = self.inner.lock().await.tracker.issue();
        debug!(category_id = category.0, seq, "browse: loading category");
        let result = self
            .store
            .list_by_category(category)
            .await
            .map(|listing| ListEvent::CategoryLoaded { category, listing });
        self.settle(seq, result).await
    }

    pub async fn search(&self, term: &str) -> Result<Settled, BrowseError> {
        let seq = self.inner.lock().await.tracker.issue();
        debug!(term, seq, "browse: searching");
        let result = self
            .store
            .search_questions(term)
            .await
            .map(|outcome| ListEvent::SearchLoaded {
                term: term.to_string(),
                outcome,
            });
        self.settle(seq, result).await
    }

    /// Deletes after confirmation, then refreshes the listing the user is
    /// looking at. Nothing is removed locally until the refresh lands.
    pub async fn delete_question(&self, id: QuestionId) -> Result<DeleteOutcome, BrowseError> {
        if self.is_pending().await {
            return Err(BrowseError::Busy);
        }
        if !self.prompt.confirm(DELETE_CONFIRMATION) {
            debug!(question_id = id.0, "browse: delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(err) = self.store.delete_question(id).await {
            warn!(question_id = id.0, error = %err, "browse: delete failed");
            self.prompt.alert(RETRY_QUESTIONS_NOTICE);
            return Err(err.into());
        }
        info!(question_id = id.0, "browse: question deleted");

        let (mode, page) = {
            let guard = self.inner.lock().await;
            (guard.state.mode.clone(), guard.state.page)
        };
        let refresh = match mode {
            ListMode::ByCategory(category) => self.filter_by_category(category).await?,
            ListMode::All | ListMode::Search(_) => self.reload_after_delete(page).await?,
        };
        Ok(DeleteOutcome::Deleted { refresh })
    }

    /// Reloads `page`, stepping back one page when the delete emptied it.
    async fn reload_after_delete(&self, page: u32) -> Result<Settled, BrowseError> {
        let seq = self.inner.lock().await.tracker.issue();
        debug!(page, seq, "browse: reloading after delete");
        let mut loaded = page;
        let mut result = self.store.list_questions(page).await;
        if page > 1 {
            if let Err(StoreError::Rejected(err)) = &result {
                if err.code == ErrorCode::Unprocessable {
                    loaded = page - 1;
                    debug!(page = loaded, seq, "browse: last page emptied, stepping back");
                    result = self.store.list_questions(loaded).await;
                }
            }
        }
        let result = result.map(|response| ListEvent::PageLoaded {
            page: loaded,
            response,
        });
        self.settle(seq, result).await
    }

    async fn settle(
        &self,
        seq: u64,
        result: Result<ListEvent, StoreError>,
    ) -> Result<Settled, BrowseError> {
        let mut guard = self.inner.lock().await;
        if !guard.tracker.settle(seq) {
            debug!(seq, "browse: dropping superseded response");
            return Ok(Settled::Stale);
        }
        match result {
            Ok(event) => {
                let state = std::mem::take(&mut guard.state);
                guard.state = state.reduce(event);
                Ok(Settled::Applied)
            }
            Err(err) => {
                drop(guard);
                warn!(seq, error = %err, "browse: request failed");
                self.prompt.alert(RETRY_QUESTIONS_NOTICE);
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/browse_tests.rs"]
mod tests;
