//! Plain-text views of controller state.

use std::fmt::Write;

use client_core::{ListMode, ListState, QuizState, Score};
use shared::{domain::CategoryCatalog, protocol::QuizCategory};

pub fn list_view(state: &ListState) -> String {
    let mut out = String::new();
    let header = match &state.mode {
        ListMode::All => format!("All questions, page {}", state.page),
        ListMode::ByCategory(id) => format!(
            "Category: {}",
            state.category_name(*id).unwrap_or("unknown")
        ),
        ListMode::Search(term) => format!("Search results for \"{term}\""),
    };
    let _ = writeln!(out, "{header} ({} total)", state.total_questions);

    if state.questions.is_empty() {
        out.push_str("  (no questions)\n");
    }
    for question in &state.questions {
        let _ = writeln!(
            out,
            "  #{:<4} [{}, difficulty {}] {}",
            question.id.0,
            state.category_name(question.category).unwrap_or("?"),
            question.difficulty,
            question.question
        );
    }

    let labels = state.pagination_labels();
    if !labels.is_empty() {
        let pages: Vec<String> = labels
            .iter()
            .map(|label| {
                if label.active {
                    format!("[{}]", label.number)
                } else {
                    label.number.to_string()
                }
            })
            .collect();
        let _ = writeln!(out, "pages: {}", pages.join(" "));
    }
    out
}

pub fn category_list(categories: &CategoryCatalog) -> String {
    let mut out = String::new();
    for (id, name) in categories {
        let _ = writeln!(out, "  {:>3}  {name}", id.0);
    }
    out
}

pub fn category_label(category: QuizCategory, categories: &CategoryCatalog) -> String {
    match category {
        QuizCategory::All => "all categories".to_string(),
        QuizCategory::ById(id) => categories
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("category {id}")),
    }
}

pub fn question_card(state: &QuizState) -> String {
    let Some(current) = &state.current else {
        return String::new();
    };
    format!("Q{}: {}", state.asked_ids.len(), current.question)
}

pub fn verdict(state: &QuizState) -> String {
    let answer = state
        .current
        .as_ref()
        .map(|current| current.answer.as_str())
        .unwrap_or_default();
    match state.verdict {
        Some(true) => format!("Correct! The answer is {answer}."),
        Some(false) => format!("Not quite. The answer was {answer}."),
        None => String::new(),
    }
}

pub fn final_score(score: Score) -> String {
    if score.asked == 0 {
        return "No questions left in this category.".to_string();
    }
    format!("Your score: {} / {}", score.correct, score.asked)
}
