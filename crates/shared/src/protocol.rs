use serde::{
    de::{self, Deserializer},
    ser::SerializeStruct,
    Deserialize, Serialize, Serializer,
};
use serde_json::Value;

use crate::domain::{CategoryCatalog, CategoryId, Question, QuestionId};

/// Message the store sends with a 404 when a category holds no questions.
pub const NO_QUESTIONS_IN_CATEGORY: &str = "No questions in this category";
/// Message the store sends with a 404 when a search matches nothing.
pub const NO_SEARCH_RESULTS: &str = "No results";
/// Question text the quiz endpoint uses to signal that nothing is left to ask.
pub const QUIZ_END_SENTINEL: &str = "none";

/// Decodes `current_category`, which the store sends as `""` when no category
/// is active.
fn blank_category_as_none<'de, D>(deserializer: D) -> Result<Option<CategoryId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
        Some(value) => CategoryId::deserialize(value)
            .map(Some)
            .map_err(de::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    pub total_questions: u64,
    #[serde(default)]
    pub categories: CategoryCatalog,
    #[serde(default, deserialize_with = "blank_category_as_none")]
    pub current_category: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryQuestions {
    pub questions: Vec<Question>,
    pub total_questions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub questions: Vec<Question>,
    #[serde(alias = "totalQuestions")]
    pub total_questions: u64,
    #[serde(
        default,
        alias = "currentCategory",
        deserialize_with = "blank_category_as_none"
    )]
    pub current_category: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: CategoryCatalog,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: QuestionId,
    pub question: String,
    pub answer: String,
}

/// Raw quiz endpoint body. The end sentinel is built from an unsaved row, so
/// its id is null.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizQuestionBody {
    #[serde(default)]
    pub id: Option<QuestionId>,
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRequest {
    pub category: CategoryId,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizRequest {
    pub previous_questions: Vec<QuestionId>,
    pub quiz_category: QuizCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub difficulty: i32,
    pub category: CategoryId,
}

/// Which questions a quiz session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCategory {
    All,
    ById(CategoryId),
}

impl QuizCategory {
    pub fn matches(&self, category: CategoryId) -> bool {
        match self {
            Self::All => true,
            Self::ById(id) => *id == category,
        }
    }
}

// The quiz endpoint reads `0` as "every category" and otherwise looks up
// `quiz_category["id"]`.
impl Serialize for QuizCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_i64(0),
            Self::ById(id) => {
                let mut state = serializer.serialize_struct("QuizCategory", 1)?;
                state.serialize_field("id", id)?;
                state.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryListing {
    Questions(CategoryQuestions),
    NoQuestions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Matches(SearchResults),
    NoResults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion {
    Question(QuizQuestion),
    Exhausted,
}

impl NextQuestion {
    /// Interprets a quiz endpoint body. Returns `None` for a real question
    /// that arrived without an id.
    pub fn from_body(body: QuizQuestionBody) -> Option<Self> {
        if body.question == QUIZ_END_SENTINEL {
            return Some(Self::Exhausted);
        }
        Some(Self::Question(QuizQuestion {
            id: body.id?,
            question: body.question,
            answer: body.answer,
        }))
    }
}
