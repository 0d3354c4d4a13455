use crate::constraints::{ConstraintError, Constraints};
use crate::game_state::{GameInterface, Recommendation, UserAction};
use crate::solver::SelectionMode;
use crate::word::Word;
use crate::{WILDCARD, WORD_LENGTH};
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

const MAX_CANDIDATES_DISPLAY: usize = 5;

/// Interactive Wordle solver that narrows a word list from round feedback
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited word list
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<PathBuf>,

    /// Use the full-screen terminal interface
    #[arg(long)]
    pub tui: bool,

    /// Pick guesses uniformly at random instead of by letter score
    #[arg(short = 'r', long)]
    pub random: bool,

    /// Seed for --random, for reproducible sessions
    #[arg(long, requires = "random")]
    pub seed: Option<u64>,

    /// Write log records to this file
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn selection_mode(&self) -> SelectionMode {
        if self.random {
            SelectionMode::Random
        } else {
            SelectionMode::Heuristic
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

/// Maps one line of player input to an action.
#[must_use]
pub fn parse_action(input: &str) -> UserAction {
    match input.trim().to_lowercase().as_str() {
        "exit" | "quit" => UserAction::Exit,
        "next" => UserAction::NewGame,
        "undo" => UserAction::Undo,
        _ => UserAction::Feedback(input.trim().to_string()),
    }
}

pub fn read_action<R: BufRead>(reader: &mut R) -> Option<UserAction> {
    println!(
        "\nEnter feedback as pattern[,included] (e.g. {WILDCARD}{WILDCARD}p{WILDCARD}e,al), \
         blank to refilter, or 'undo', 'next', 'exit':"
    );
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) => Some(UserAction::Exit),
        Ok(_) => Some(parse_action(&input)),
        Err(e) => {
            log::error!("failed to read input: {e}");
            Some(UserAction::Exit)
        }
    }
}

pub fn display_candidates(candidates: &[Word]) {
    println!("Possible candidates ({})", candidates.len());
    for word in candidates.iter().take(MAX_CANDIDATES_DISPLAY) {
        println!("{word}");
    }
    if candidates.len() > MAX_CANDIDATES_DISPLAY {
        println!("...and {} more", candidates.len() - MAX_CANDIDATES_DISPLAY);
    }
}

pub fn display_constraints(constraints: &Constraints) {
    println!(
        "Known: {}  included: [{}]  excluded: [{}]",
        constraints.pattern,
        constraints.included,
        constraints.effective_excluded()
    );
}

pub fn display_recommendation(recommendation: &Recommendation) {
    println!("------------------");
    println!(
        "Round {}: guessing '{}' ({} candidates, {} tied)",
        recommendation.round,
        recommendation.guess,
        recommendation.candidate_count,
        recommendation.tied
    );
}

pub fn display_rejection(error: &ConstraintError) {
    println!("invalid input [{}]: {error}", error.kind());
}

pub fn display_single_candidate(word: &Word) {
    println!("Only one candidate left: {word}");
}

pub fn display_no_candidates_message() {
    println!("No candidates remain. Check your inputs, then 'undo' or 'next'.");
}

pub fn display_undo_message(undone: bool) {
    if undone {
        println!("Undid the last round.");
    } else {
        println!("Nothing to undo.");
    }
}

pub fn display_exit_message() {
    println!("Exiting.");
}

pub fn display_new_game_message(word_count: usize) {
    println!("New game started. Loaded {word_count} words of {WORD_LENGTH} letters.");
}

/// CLI implementation of the GameInterface trait
/// This struct wraps a BufRead reader and implements the game interface for CLI interaction
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_new_game_message(&mut self, word_count: usize) {
        display_new_game_message(word_count);
    }

    fn display_candidates(&mut self, candidates: &[Word]) {
        display_candidates(candidates);
    }

    fn display_constraints(&mut self, constraints: &Constraints) {
        display_constraints(constraints);
    }

    fn display_recommendation(&mut self, recommendation: &Recommendation) {
        display_recommendation(recommendation);
    }

    fn display_single_candidate(&mut self, word: &Word) {
        display_single_candidate(word);
    }

    fn display_no_candidates_message(&mut self) {
        display_no_candidates_message();
    }

    fn display_rejection(&mut self, error: &ConstraintError) {
        display_rejection(error);
    }

    fn display_undo_message(&mut self, undone: bool) {
        display_undo_message(undone);
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }

    fn read_action(&mut self) -> Option<UserAction> {
        read_action(&mut self.reader)
    }
}
