mod config;
mod render;
mod terminal;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    BrowseController, BrowseError, DeleteOutcome, HttpQuestionStore, LoggingPrompt, Prompt,
    QuestionStore, QuizController, QuizError, QuizPhase,
};
use shared::{
    domain::{CategoryId, QuestionId},
    protocol::NewQuestion,
};
use tracing::{debug, info};

use crate::{
    config::{load_settings, normalize_server_url},
    terminal::{is_yes, parse_quiz_category, read_line, BrowseCommand, TerminalPrompt, BROWSE_HELP},
};

#[derive(Parser, Debug)]
#[command(name = "trivia", about = "Browse and play trivia questions from a question store")]
struct Cli {
    /// Base URL of the question store; overrides config and environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = "trivia.toml")]
    config: PathBuf,
    /// Answer yes to every confirmation.
    #[arg(long)]
    yes: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Page through, filter, search and delete questions.
    Browse,
    /// Play a five-question quiz.
    Play {
        /// Category id to play; omit to choose interactively.
        #[arg(long)]
        category: Option<i64>,
    },
    /// List the categories.
    Categories,
    /// Add a question to the store.
    Add {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        #[arg(long)]
        category: i64,
        #[arg(long, default_value_t = 1)]
        difficulty: i32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config);
    if let Some(server_url) = cli.server_url.clone() {
        settings.server_url = server_url;
    }
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let server_url = normalize_server_url(&settings.server_url)?;
    info!(%server_url, "trivia: using question store");
    let store: Arc<dyn QuestionStore> = Arc::new(HttpQuestionStore::new(server_url));
    let prompt: Arc<dyn Prompt> = if cli.yes {
        Arc::new(LoggingPrompt::assume_yes())
    } else {
        Arc::new(TerminalPrompt)
    };

    match cli.command {
        Command::Browse => run_browse(BrowseController::new(store, prompt)).await,
        Command::Play { category } => {
            run_play(QuizController::new(store, prompt), category.map(CategoryId)).await
        }
        Command::Categories => {
            let categories = store
                .list_categories()
                .await
                .context("failed to load categories")?;
            print!("{}", render::category_list(&categories));
            Ok(())
        }
        Command::Add {
            question,
            answer,
            category,
            difficulty,
        } => {
            store
                .create_question(&NewQuestion {
                    question,
                    answer,
                    difficulty,
                    category: CategoryId(category),
                })
                .await
                .context("failed to add question")?;
            println!("Question added.");
            Ok(())
        }
    }
}

async fn run_browse(browse: BrowseController) -> Result<()> {
    // A failed first load was already reported; the prompt still works.
    let _ = browse.mount().await;
    print!("{}", render::list_view(&browse.state().await));

    while let Some(line) = read_line("browse> ")? {
        let command = match BrowseCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        let result = match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                println!("{BROWSE_HELP}");
                continue;
            }
            BrowseCommand::Page(page) => browse.load_page(page).await.map(|_| ()),
            BrowseCommand::All => browse.load_page(1).await.map(|_| ()),
            BrowseCommand::Category(id) => browse.filter_by_category(id).await.map(|_| ()),
            BrowseCommand::Search(term) => browse.search(&term).await.map(|_| ()),
            BrowseCommand::Delete(id) => delete(&browse, id).await,
        };
        match result {
            Ok(()) => print!("{}", render::list_view(&browse.state().await)),
            Err(BrowseError::Store(err)) => debug!(error = %err, "trivia: browse request failed"),
            Err(err) => eprintln!("{err}"),
        }
    }
    Ok(())
}

async fn delete(browse: &BrowseController, id: QuestionId) -> Result<(), BrowseError> {
    if browse.delete_question(id).await? == DeleteOutcome::Declined {
        println!("Kept question {id}.");
    }
    Ok(())
}

async fn run_play(quiz: QuizController, preset: Option<CategoryId>) -> Result<()> {
    quiz.mount().await.context("failed to load categories")?;
    let categories = quiz.categories().await;

    loop {
        let category = match preset {
            Some(id) => parse_quiz_category(&id.to_string(), &categories)
                .map_err(anyhow::Error::msg)?,
            None => {
                print!("{}", render::category_list(&categories));
                let Some(input) = read_line("category id (blank for all)> ")? else {
                    return Ok(());
                };
                match parse_quiz_category(&input, &categories) {
                    Ok(category) => category,
                    Err(message) => {
                        eprintln!("{message}");
                        continue;
                    }
                }
            }
        };
        println!(
            "Playing {}.",
            render::category_label(category, &categories)
        );

        if quiz.select_category(category).await.is_ok() && !play_session(&quiz).await? {
            return Ok(());
        }

        let state = quiz.state().await;
        if state.phase() == QuizPhase::Ended {
            println!("{}", render::final_score(state.score()));
        }
        match read_line("play again? [y/N] ")? {
            Some(answer) if is_yes(&answer) => quiz.restart().await,
            _ => return Ok(()),
        }
    }
}

/// Drives one session to its end. `false` when input ran out.
async fn play_session(quiz: &QuizController) -> Result<bool> {
    loop {
        let state = quiz.state().await;
        match state.phase() {
            QuizPhase::Asking => {
                println!("{}", render::question_card(&state));
                let Some(guess) = read_line("your answer> ")? else {
                    return Ok(false);
                };
                quiz.submit_guess(&guess).await?;
                println!("{}", render::verdict(&quiz.state().await));
            }
            QuizPhase::Answered => {
                if read_line("press enter for the next question")?.is_none() {
                    return Ok(false);
                }
                match quiz.advance().await {
                    Ok(_) => {}
                    // Reported through the prompt; stop here rather than retry forever.
                    Err(QuizError::Store(_) | QuizError::RepeatedQuestion(_)) => return Ok(true),
                    Err(err) => return Err(err.into()),
                }
            }
            QuizPhase::Ended | QuizPhase::PrePlay => return Ok(true),
        }
    }
}
