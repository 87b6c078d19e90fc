use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{CategoryCatalog, CategoryId, QuestionId},
    error::{ApiError, ApiException},
    protocol::{
        CategoriesResponse, CategoryListing, CategoryRequest, NewQuestion, NextQuestion,
        QuestionPage, QuizCategory, QuizQuestionBody, QuizRequest, SearchOutcome, SearchRequest,
        NO_QUESTIONS_IN_CATEGORY, NO_SEARCH_RESULTS,
    },
};
use tracing::debug;

use crate::error::StoreError;

/// Remote question store consumed by both controllers.
///
/// Every call is a single request with a single response. Empty results the
/// store signals on purpose come back as the `NoQuestions`/`NoResults`/
/// `Exhausted` variants; anything else that is not a success is an error.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn list_questions(&self, page: u32) -> Result<QuestionPage, StoreError>;
    async fn list_by_category(&self, category: CategoryId) -> Result<CategoryListing, StoreError>;
    async fn search_questions(&self, term: &str) -> Result<SearchOutcome, StoreError>;
    async fn delete_question(&self, id: QuestionId) -> Result<(), StoreError>;
    async fn create_question(&self, question: &NewQuestion) -> Result<(), StoreError>;
    async fn list_categories(&self) -> Result<CategoryCatalog, StoreError>;
    async fn next_quiz_question(
        &self,
        previous_questions: &[QuestionId],
        category: QuizCategory,
    ) -> Result<NextQuestion, StoreError>;
}

pub struct HttpQuestionStore {
    http: Client,
    server_url: String,
}

impl HttpQuestionStore {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: impl Into<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self { http, server_url }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await?;
    let message = serde_json::from_slice::<ApiError>(&body)
        .map(|err| err.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });
    Err(ApiException::new(status.as_u16(), message).into())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|err| StoreError::Malformed(err.to_string()))
}

#[async_trait]
impl QuestionStore for HttpQuestionStore {
    async fn list_questions(&self, page: u32) -> Result<QuestionPage, StoreError> {
        debug!(page, "store: GET /questions");
        let response = self
            .http
            .get(format!("{}/questions", self.server_url))
            .query(&[("page", page)])
            .send()
            .await?;
        decode(check_status(response).await?).await
    }

    async fn list_by_category(&self, category: CategoryId) -> Result<CategoryListing, StoreError> {
        debug!(category_id = category.0, "store: POST /category");
        let response = self
            .http
            .post(format!("{}/category", self.server_url))
            .json(&CategoryRequest { category })
            .send()
            .await?;
        match check_status(response).await {
            Ok(response) => Ok(CategoryListing::Questions(decode(response).await?)),
            Err(StoreError::Rejected(err)) if err.is_not_found_with(NO_QUESTIONS_IN_CATEGORY) => {
                Ok(CategoryListing::NoQuestions)
            }
            Err(err) => Err(err),
        }
    }

    async fn search_questions(&self, term: &str) -> Result<SearchOutcome, StoreError> {
        debug!(term, "store: POST /search");
        let response = self
            .http
            .post(format!("{}/search", self.server_url))
            .json(&SearchRequest {
                search_term: term.to_string(),
            })
            .send()
            .await?;
        match check_status(response).await {
            Ok(response) => Ok(SearchOutcome::Matches(decode(response).await?)),
            Err(StoreError::Rejected(err)) if err.is_not_found_with(NO_SEARCH_RESULTS) => {
                Ok(SearchOutcome::NoResults)
            }
            Err(err) => Err(err),
        }
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), StoreError> {
        debug!(question_id = id.0, "store: DELETE /question");
        let response = self
            .http
            .delete(format!("{}/question/{}", self.server_url, id.0))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<(), StoreError> {
        debug!(category_id = question.category.0, "store: POST /question");
        let response = self
            .http
            .post(format!("{}/question", self.server_url))
            .json(question)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<CategoryCatalog, StoreError> {
        debug!("store: GET /categories");
        let response = self
            .http
            .get(format!("{}/categories", self.server_url))
            .send()
            .await?;
        let body: CategoriesResponse = decode(check_status(response).await?).await?;
        Ok(body.categories)
    }

    async fn next_quiz_question(
        &self,
        previous_questions: &[QuestionId],
        category: QuizCategory,
    ) -> Result<NextQuestion, StoreError> {
        debug!(
            asked = previous_questions.len(),
            ?category,
            "store: POST /quiz"
        );
        let response = self
            .http
            .post(format!("{}/quiz", self.server_url))
            .json(&QuizRequest {
                previous_questions: previous_questions.to_vec(),
                quiz_category: category,
            })
            .send()
            .await?;
        let body: QuizQuestionBody = decode(check_status(response).await?).await?;
        NextQuestion::from_body(body)
            .ok_or_else(|| StoreError::Malformed("quiz question without an id".to_string()))
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
