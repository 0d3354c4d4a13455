// Library interface for wordle-constraints
// This allows integration tests to access internal modules

pub mod cli;
pub mod constraints;
pub mod feedback;
pub mod game_state;
pub mod logging;
pub mod solver;
pub mod tui;
pub mod word;
pub mod wordbank;

/// Length of every word the solver handles.
pub const WORD_LENGTH: usize = 5;

/// Marks a slot whose letter is not yet known.
pub const WILDCARD: char = '*';

// Re-export commonly used items for easier testing
pub use constraints::{ConstraintError, ConstraintStore, Constraints, LetterSet, PositionPattern};
pub use feedback::RoundFeedback;
pub use game_state::{GameInterface, Recommendation, Session, SessionState, UserAction, game_loop};
pub use solver::{CandidateEngine, GuessSelection, SelectionMode, filter_candidates, score_word};
pub use word::{Word, WordError};
pub use wordbank::{load_wordbank_from_file, load_wordbank_from_str, resolve_wordbank};
