use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex as StdMutex},
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{CategoryCatalog, CategoryId, Question, QuestionId},
    error::ApiException,
    protocol::{
        CategoryListing, CategoryQuestions, NewQuestion, NextQuestion, QuestionPage,
        QuizCategory, QuizQuestion, SearchOutcome, SearchResults,
    },
};
use tokio::sync::Mutex;

use crate::{browse::PAGE_SIZE, error::StoreError, prompt::Prompt, store::QuestionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ListQuestions(u32),
    ListByCategory(CategoryId),
    Search(String),
    Delete(QuestionId),
    Create,
    ListCategories,
    NextQuizQuestion {
        previous: Vec<QuestionId>,
        category: QuizCategory,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListQuestions,
    ListByCategory,
    Search,
    Delete,
    ListCategories,
    NextQuizQuestion,
}

pub struct FakeQuestionStore {
    questions: Mutex<Vec<Question>>,
    categories: CategoryCatalog,
    calls: Mutex<Vec<StoreCall>>,
    failing: Mutex<HashSet<Op>>,
    page_delays: Mutex<HashMap<u32, Duration>>,
    quiz_delay: Mutex<Option<Duration>>,
    quiz_script: Mutex<Option<VecDeque<NextQuestion>>>,
}

impl FakeQuestionStore {
    /// 23 questions over categories 1-3; category 4 ("History") is empty.
    /// Question `n` lives in category `n % 3 + 1`.
    pub fn seeded() -> Arc<Self> {
        let categories: CategoryCatalog = [
            (CategoryId(1), "Science".to_string()),
            (CategoryId(2), "Art".to_string()),
            (CategoryId(3), "Geography".to_string()),
            (CategoryId(4), "History".to_string()),
        ]
        .into_iter()
        .collect();
        let questions = (1..=23)
            .map(|n| Question {
                id: QuestionId(n),
                question: format!("Question number {n}"),
                answer: format!("Answer {n}"),
                category: CategoryId(n % 3 + 1),
                difficulty: (n % 5 + 1) as i32,
            })
            .collect();
        Arc::new(Self {
            questions: Mutex::new(questions),
            categories,
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            page_delays: Mutex::new(HashMap::new()),
            quiz_delay: Mutex::new(None),
            quiz_script: Mutex::new(None),
        })
    }

    pub async fn fail(&self, op: Op) {
        self.failing.lock().await.insert(op);
    }

    pub async fn recover(&self, op: Op) {
        self.failing.lock().await.remove(&op);
    }

    pub async fn delay_page(&self, page: u32, delay: Duration) {
        self.page_delays.lock().await.insert(page, delay);
    }

    pub async fn delay_quiz(&self, delay: Duration) {
        *self.quiz_delay.lock().await = Some(delay);
    }

    /// Replaces question selection with a fixed sequence of answers; once it
    /// runs dry the store reports the quiz as exhausted.
    pub async fn script_quiz(&self, script: Vec<NextQuestion>) {
        *self.quiz_script.lock().await = Some(script.into());
    }

    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().await.clone()
    }

    pub async fn clear_calls(&self) {
        self.calls.lock().await.clear();
    }

    pub async fn question_count(&self) -> usize {
        self.questions.lock().await.len()
    }

    async fn record(&self, call: StoreCall, op: Op) -> Result<(), StoreError> {
        self.calls.lock().await.push(call);
        if self.failing.lock().await.contains(&op) {
            return Err(ApiException::new(500, "Internal Server Error").into());
        }
        Ok(())
    }
}

pub fn quiz_question(id: i64) -> NextQuestion {
    NextQuestion::Question(QuizQuestion {
        id: QuestionId(id),
        question: format!("Question number {id}"),
        answer: format!("Answer {id}"),
    })
}

#[async_trait]
impl QuestionStore for FakeQuestionStore {
    async fn list_questions(&self, page: u32) -> Result<QuestionPage, StoreError> {
        let delay = self.page_delays.lock().await.get(&page).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(StoreCall::ListQuestions(page), Op::ListQuestions)
            .await?;
        let questions = self.questions.lock().await;
        let first = (page as usize - 1) * PAGE_SIZE as usize;
        let page_questions: Vec<Question> = questions
            .iter()
            .skip(first)
            .take(PAGE_SIZE as usize)
            .cloned()
            .collect();
        if page_questions.is_empty() {
            return Err(ApiException::new(422, "Page out of range").into());
        }
        Ok(QuestionPage {
            questions: page_questions,
            total_questions: questions.len() as u64,
            categories: self.categories.clone(),
            current_category: None,
        })
    }

    async fn list_by_category(&self, category: CategoryId) -> Result<CategoryListing, StoreError> {
        self.record(StoreCall::ListByCategory(category), Op::ListByCategory)
            .await?;
        let matching: Vec<Question> = self
            .questions
            .lock()
            .await
            .iter()
            .filter(|q| q.category == category)
            .cloned()
            .collect();
        if matching.is_empty() {
            return Ok(CategoryListing::NoQuestions);
        }
        Ok(CategoryListing::Questions(CategoryQuestions {
            total_questions: matching.len() as u64,
            questions: matching,
        }))
    }

    async fn search_questions(&self, term: &str) -> Result<SearchOutcome, StoreError> {
        self.record(StoreCall::Search(term.to_string()), Op::Search)
            .await?;
        let needle = term.to_lowercase();
        let matching: Vec<Question> = self
            .questions
            .lock()
            .await
            .iter()
            .filter(|q| q.question.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        if matching.is_empty() {
            return Ok(SearchOutcome::NoResults);
        }
        Ok(SearchOutcome::Matches(SearchResults {
            total_questions: matching.len() as u64,
            questions: matching,
            current_category: None,
        }))
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), StoreError> {
        self.record(StoreCall::Delete(id), Op::Delete).await?;
        let mut questions = self.questions.lock().await;
        let before = questions.len();
        questions.retain(|q| q.id != id);
        if questions.len() == before {
            return Err(ApiException::new(422, "No such question").into());
        }
        Ok(())
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<(), StoreError> {
        self.calls.lock().await.push(StoreCall::Create);
        let mut questions = self.questions.lock().await;
        let id = questions.iter().map(|q| q.id.0).max().unwrap_or(0) + 1;
        questions.push(Question {
            id: QuestionId(id),
            question: question.question.clone(),
            answer: question.answer.clone(),
            category: question.category,
            difficulty: question.difficulty,
        });
        Ok(())
    }

    async fn list_categories(&self) -> Result<CategoryCatalog, StoreError> {
        self.record(StoreCall::ListCategories, Op::ListCategories)
            .await?;
        Ok(self.categories.clone())
    }

    async fn next_quiz_question(
        &self,
        previous_questions: &[QuestionId],
        category: QuizCategory,
    ) -> Result<NextQuestion, StoreError> {
        let delay = *self.quiz_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(
            StoreCall::NextQuizQuestion {
                previous: previous_questions.to_vec(),
                category,
            },
            Op::NextQuizQuestion,
        )
        .await?;
        if let Some(script) = self.quiz_script.lock().await.as_mut() {
            return Ok(script.pop_front().unwrap_or(NextQuestion::Exhausted));
        }
        let next = self
            .questions
            .lock()
            .await
            .iter()
            .find(|q| category.matches(q.category) && !previous_questions.contains(&q.id))
            .map(|q| QuizQuestion {
                id: q.id,
                question: q.question.clone(),
                answer: q.answer.clone(),
            });
        Ok(next.map_or(NextQuestion::Exhausted, NextQuestion::Question))
    }
}

pub struct RecordingPrompt {
    answer: bool,
    confirmations: StdMutex<Vec<String>>,
    alerts: StdMutex<Vec<String>>,
}

impl RecordingPrompt {
    pub fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            confirmations: StdMutex::new(Vec::new()),
            alerts: StdMutex::new(Vec::new()),
        })
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().expect("alerts lock").clone()
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().expect("confirmations lock").clone()
    }
}

impl Prompt for RecordingPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.confirmations
            .lock()
            .expect("confirmations lock")
            .push(message.to_string());
        self.answer
    }

    fn alert(&self, message: &str) {
        self.alerts
            .lock()
            .expect("alerts lock")
            .push(message.to_string());
    }
}
