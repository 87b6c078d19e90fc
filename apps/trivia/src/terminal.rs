//! Line-oriented terminal input: the interactive prompt and command parsing.

use std::io::{self, BufRead, Write};

use client_core::Prompt;
use shared::{
    domain::{CategoryCatalog, CategoryId, QuestionId},
    protocol::QuizCategory,
};

pub const BROWSE_HELP: &str = "\
commands:
  page N          show page N of all questions
  all             back to page 1 of all questions
  category ID     show every question in a category
  search TERM     find questions containing TERM
  delete ID       delete a question (asks first)
  help            show this list
  quit            leave";

/// Prints `prompt` and reads one line. `None` at end of input.
pub fn read_line(prompt: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        match read_line(&format!("{message} [y/N] ")) {
            Ok(Some(answer)) => is_yes(&answer),
            _ => false,
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Page(u32),
    All,
    Category(CategoryId),
    Search(String),
    Delete(QuestionId),
    Help,
    Quit,
}

impl BrowseCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        match verb.to_ascii_lowercase().as_str() {
            "page" | "p" => rest
                .parse()
                .map(Self::Page)
                .map_err(|_| format!("expected a page number, got '{rest}'")),
            "all" => Ok(Self::All),
            "category" | "cat" | "c" => rest
                .parse()
                .map(Self::Category)
                .map_err(|_| format!("expected a category id, got '{rest}'")),
            "search" | "s" if !rest.is_empty() => Ok(Self::Search(rest.to_string())),
            "search" | "s" => Err("search needs a term".to_string()),
            "delete" | "del" | "d" => rest
                .parse()
                .map(|id| Self::Delete(QuestionId(id)))
                .map_err(|_| format!("expected a question id, got '{rest}'")),
            "help" | "?" | "" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

/// Blank input, `0`, and `all` pick every category; otherwise the id must be
/// in the catalog.
pub fn parse_quiz_category(input: &str, catalog: &CategoryCatalog) -> Result<QuizCategory, String> {
    let input = input.trim();
    if input.is_empty() || input == "0" || input.eq_ignore_ascii_case("all") {
        return Ok(QuizCategory::All);
    }
    let id: CategoryId = input
        .parse()
        .map_err(|_| format!("expected a category id, got '{input}'"))?;
    if catalog.contains_key(&id) {
        Ok(QuizCategory::ById(id))
    } else {
        Err(format!("no category with id {id}"))
    }
}
