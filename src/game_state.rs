use crate::constraints::{ConstraintError, ConstraintStore, Constraints};
use crate::feedback::RoundFeedback;
use crate::solver::{CandidateEngine, GuessSelection, SelectionMode};
use crate::word::Word;
use crate::{debug_log, info_log};
use rand::Rng;

/// Where a session is between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constraints changed (or the session just began); a guess is due.
    AwaitingGuessComputation,
    /// A guess is out and the player's feedback is awaited.
    AwaitingFeedback,
    /// Feedback for the current guess is being applied.
    Merging,
    /// The last feedback was refused; the same guess still awaits feedback.
    RejectedFeedback,
    /// Every word has been filtered out. Only undo, a new game or exit help.
    NoCandidates,
}

/// What the player asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Feedback(String),
    Undo,
    NewGame,
    Exit,
}

/// Everything a front end shows for a freshly computed guess.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub round: usize,
    pub guess: Word,
    pub score: f64,
    pub tied: usize,
    pub candidate_count: usize,
}

/// Seam between the game loop and a front end (line CLI or TUI).
pub trait GameInterface {
    fn display_new_game_message(&mut self, word_count: usize);
    fn display_candidates(&mut self, candidates: &[Word]);
    fn display_constraints(&mut self, constraints: &Constraints);
    fn display_recommendation(&mut self, recommendation: &Recommendation);
    fn display_single_candidate(&mut self, word: &Word);
    fn display_no_candidates_message(&mut self);
    fn display_rejection(&mut self, error: &ConstraintError);
    fn display_undo_message(&mut self, undone: bool);
    fn display_exit_message(&mut self);
    /// `None` means nothing actionable was entered; the loop asks again.
    fn read_action(&mut self) -> Option<UserAction>;
}

/// One solving session over a shared, immutable engine.
///
/// Sessions never share state with each other; several can run over the
/// same engine.
pub struct Session<'e, R> {
    engine: &'e CandidateEngine,
    store: ConstraintStore,
    history: Vec<Constraints>,
    candidates: Vec<Word>,
    guess: Option<GuessSelection>,
    state: SessionState,
    mode: SelectionMode,
    rng: R,
    round: usize,
}

impl<'e, R: Rng> Session<'e, R> {
    pub fn new(engine: &'e CandidateEngine, mode: SelectionMode, rng: R) -> Self {
        Self {
            engine,
            store: ConstraintStore::new(),
            history: Vec::new(),
            candidates: engine.words().to_vec(),
            guess: None,
            state: SessionState::AwaitingGuessComputation,
            mode,
            rng,
            round: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn constraints(&self) -> Constraints {
        self.store.snapshot()
    }

    #[must_use]
    pub fn candidates(&self) -> &[Word] {
        &self.candidates
    }

    #[must_use]
    pub fn guess(&self) -> Option<&GuessSelection> {
        self.guess.as_ref()
    }

    /// Completed (merged) rounds in this game.
    #[must_use]
    pub fn round(&self) -> usize {
        self.round
    }

    /// Refilters the word list and picks the next guess.
    ///
    /// # Errors
    /// `ConstraintError::EmptyCandidateSet` when nothing is left; the session
    /// moves to `SessionState::NoCandidates`.
    pub fn compute_guess(&mut self) -> Result<GuessSelection, ConstraintError> {
        self.candidates = self.engine.candidates(&self.store.snapshot());
        match self
            .engine
            .choose(&self.candidates, self.mode, &mut self.rng)
        {
            Ok(selection) => {
                self.guess = Some(selection.clone());
                self.state = SessionState::AwaitingFeedback;
                Ok(selection)
            }
            Err(e) => {
                log::warn!("no candidates left after round {}", self.round);
                self.guess = None;
                self.state = SessionState::NoCandidates;
                Err(e)
            }
        }
    }

    /// Applies one feedback line to the current guess.
    ///
    /// A blank line merges nothing: the candidates are re-derived from the
    /// unchanged constraints on the next `compute_guess`, which in random mode
    /// also draws a fresh guess. An all-grey round is `*****`.
    ///
    /// # Errors
    /// The merge error when the feedback is refused (state is unchanged apart
    /// from moving to `RejectedFeedback`), or `EmptyCandidateSet` when there
    /// is no guess to give feedback on.
    pub fn submit_feedback(&mut self, line: &str) -> Result<(), ConstraintError> {
        let guess = match (&self.guess, self.state) {
            (Some(selection), SessionState::AwaitingFeedback | SessionState::RejectedFeedback) => {
                selection.word.clone()
            }
            _ => return Err(ConstraintError::EmptyCandidateSet),
        };

        if line.trim().is_empty() {
            debug_log!("blank feedback for '{}', re-filtering unchanged constraints", guess);
            self.state = SessionState::AwaitingGuessComputation;
            return Ok(());
        }

        self.state = SessionState::Merging;
        let before = self.store.snapshot();
        let feedback = RoundFeedback::parse(line);
        match self.store.merge_round(&guess, &feedback) {
            Ok(()) => {
                self.history.push(before);
                self.round += 1;
                self.state = SessionState::AwaitingGuessComputation;
                info_log!("round {} merged: {:?}", self.round, self.store.snapshot());
                Ok(())
            }
            Err(e) => {
                debug_log!("rejected feedback {:?} for '{}': {}", line, guess, e);
                self.state = SessionState::RejectedFeedback;
                Err(e)
            }
        }
    }

    /// Steps back to the snapshot before the last merged round.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.store.restore(previous);
                self.round -= 1;
                self.guess = None;
                self.state = SessionState::AwaitingGuessComputation;
                true
            }
            None => false,
        }
    }

    pub fn new_game(&mut self) {
        self.store.reset();
        self.history.clear();
        self.candidates = self.engine.words().to_vec();
        self.guess = None;
        self.round = 0;
        self.state = SessionState::AwaitingGuessComputation;
    }
}

/// Runs rounds against `interface` until it reports `UserAction::Exit`.
pub fn game_loop<R: Rng, I: GameInterface + ?Sized>(
    engine: &CandidateEngine,
    mode: SelectionMode,
    rng: R,
    interface: &mut I,
) {
    let mut session = Session::new(engine, mode, rng);
    interface.display_new_game_message(engine.words().len());

    loop {
        if session.state() == SessionState::AwaitingGuessComputation {
            match session.compute_guess() {
                Ok(selection) => {
                    interface.display_constraints(&session.constraints());
                    interface.display_candidates(session.candidates());
                    if let [only] = session.candidates() {
                        interface.display_single_candidate(only);
                    }
                    interface.display_recommendation(&Recommendation {
                        round: session.round() + 1,
                        guess: selection.word,
                        score: selection.score,
                        tied: selection.tied,
                        candidate_count: session.candidates().len(),
                    });
                }
                Err(_) => {
                    interface.display_constraints(&session.constraints());
                    interface.display_no_candidates_message();
                }
            }
        }

        let Some(action) = interface.read_action() else {
            continue;
        };
        debug_log!("game_loop() - action {:?} in state {:?}", action, session.state());

        match action {
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
            UserAction::NewGame => {
                session.new_game();
                interface.display_new_game_message(engine.words().len());
            }
            UserAction::Undo => {
                let undone = session.undo();
                interface.display_undo_message(undone);
            }
            UserAction::Feedback(line) => {
                if let Err(e) = session.submit_feedback(&line) {
                    interface.display_rejection(&e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    fn engine(list: &[&str]) -> CandidateEngine {
        CandidateEngine::new(list.iter().map(|w| Word::new(*w).unwrap()).collect())
    }

    fn session(engine: &CandidateEngine) -> Session<'_, StdRng> {
        Session::new(engine, SelectionMode::Heuristic, StdRng::seed_from_u64(0))
    }

    #[derive(Default)]
    struct ScriptedInterface {
        actions: VecDeque<Option<UserAction>>,
        recommendations: Vec<Recommendation>,
        rejections: Vec<&'static str>,
        candidate_counts: Vec<usize>,
        singles: Vec<String>,
        no_candidates: usize,
        undos: Vec<bool>,
        new_games: usize,
        exited: bool,
    }

    impl ScriptedInterface {
        fn new(actions: Vec<Option<UserAction>>) -> Self {
            Self {
                actions: actions.into(),
                ..Self::default()
            }
        }
    }

    impl GameInterface for ScriptedInterface {
        fn display_new_game_message(&mut self, _word_count: usize) {
            self.new_games += 1;
        }
        fn display_candidates(&mut self, candidates: &[Word]) {
            self.candidate_counts.push(candidates.len());
        }
        fn display_constraints(&mut self, _constraints: &Constraints) {}
        fn display_recommendation(&mut self, recommendation: &Recommendation) {
            self.recommendations.push(recommendation.clone());
        }
        fn display_single_candidate(&mut self, word: &Word) {
            self.singles.push(word.to_string());
        }
        fn display_no_candidates_message(&mut self) {
            self.no_candidates += 1;
        }
        fn display_rejection(&mut self, error: &ConstraintError) {
            self.rejections.push(error.kind());
        }
        fn display_undo_message(&mut self, undone: bool) {
            self.undos.push(undone);
        }
        fn display_exit_message(&mut self) {
            self.exited = true;
        }
        fn read_action(&mut self) -> Option<UserAction> {
            self.actions.pop_front().unwrap_or(Some(UserAction::Exit))
        }
    }

    fn feedback(line: &str) -> Option<UserAction> {
        Some(UserAction::Feedback(line.to_string()))
    }

    #[test]
    fn test_session_starts_with_full_list() {
        let engine = engine(&["apple", "mango", "grape"]);
        let session = session(&engine);
        assert_eq!(session.state(), SessionState::AwaitingGuessComputation);
        assert_eq!(session.candidates().len(), 3);
        assert_eq!(session.constraints(), Constraints::default());
    }

    #[test]
    fn test_session_round_transitions() {
        let engine = engine(&["crane", "slate", "trace", "grace"]);
        let mut session = session(&engine);

        let guess = session.compute_guess().unwrap();
        assert_eq!(session.state(), SessionState::AwaitingFeedback);

        let err = session.submit_feedback("bad").unwrap_err();
        assert_eq!(err.kind(), "invalid-pattern");
        assert_eq!(session.state(), SessionState::RejectedFeedback);
        assert_eq!(session.guess().map(|g| &g.word), Some(&guess.word));
        assert_eq!(session.constraints(), Constraints::default());

        session.submit_feedback("*****").unwrap();
        assert_eq!(session.state(), SessionState::AwaitingGuessComputation);
        assert_eq!(session.round(), 1);
    }

    #[test]
    fn test_blank_feedback_on_first_round_keeps_all_candidates() {
        let engine = engine(&["apple", "mango", "grape"]);
        let mut session = session(&engine);
        session.compute_guess().unwrap();
        session.submit_feedback("  ").unwrap();
        session.compute_guess().unwrap();
        assert_eq!(session.candidates(), engine.words());
        assert_eq!(session.constraints(), Constraints::default());
        assert_eq!(session.round(), 0);
    }

    #[test]
    fn test_feedback_without_guess_is_rejected() {
        let engine = engine(&["crane"]);
        let mut session = session(&engine);
        assert_eq!(
            session.submit_feedback("c****"),
            Err(ConstraintError::EmptyCandidateSet)
        );
        assert_eq!(session.state(), SessionState::AwaitingGuessComputation);
    }

    /// Feedback the game would give for `guess` against `answer`.
    fn respond(guess: &Word, answer: &str) -> String {
        let answer = answer.as_bytes();
        let pattern: String = guess
            .letters()
            .zip(answer)
            .map(|(g, &a)| if g == a { g as char } else { '*' })
            .collect();
        let included: String = guess
            .letters()
            .enumerate()
            .filter(|&(i, g)| g != answer[i] && answer.contains(&g))
            .map(|(_, g)| g as char)
            .collect();
        format!("{pattern},{included}")
    }

    #[test]
    fn test_candidates_never_grow_and_keep_answer() {
        let list = [
            "crane", "slate", "trace", "grace", "brace", "place", "shine", "spine",
        ];
        let engine = engine(&list);
        let mut session = session(&engine);
        let answer = "brace";

        let mut previous = session.candidates().to_vec();
        for _ in 0..list.len() {
            let guess = session.compute_guess().unwrap();
            assert!(session.candidates().iter().all(|w| previous.contains(w)));
            assert!(session.candidates().iter().any(|w| w.as_str() == answer));
            previous = session.candidates().to_vec();
            if guess.word.as_str() == answer {
                break;
            }
            session
                .submit_feedback(&respond(&guess.word, answer))
                .unwrap();
        }
        assert_eq!(session.guess().unwrap().word.as_str(), answer);
    }

    #[test]
    fn test_no_candidates_then_undo() {
        let engine = engine(&["crane", "slate"]);
        let mut session = session(&engine);
        // crane and slate tie; the first one wins
        let first = session.compute_guess().unwrap();
        assert_eq!(first.word.as_str(), "crane");

        // all grey excludes a and e, which slate needs
        session.submit_feedback("*****").unwrap();
        assert_eq!(
            session.compute_guess(),
            Err(ConstraintError::EmptyCandidateSet)
        );
        assert_eq!(session.state(), SessionState::NoCandidates);
        assert_eq!(
            session.submit_feedback("*****"),
            Err(ConstraintError::EmptyCandidateSet)
        );

        assert!(session.undo());
        assert_eq!(session.state(), SessionState::AwaitingGuessComputation);
        assert_eq!(session.compute_guess().unwrap().word.as_str(), "crane");
        assert_eq!(session.candidates().len(), 2);
    }

    #[test]
    fn test_undo_without_history() {
        let engine = engine(&["crane"]);
        let mut session = session(&engine);
        assert!(!session.undo());
    }

    #[test]
    fn test_new_game_resets() {
        let engine = engine(&["crane", "slate", "trace"]);
        let mut session = session(&engine);
        session.compute_guess().unwrap();
        session.submit_feedback("*****").unwrap();
        session.new_game();
        assert_eq!(session.round(), 0);
        assert_eq!(session.constraints(), Constraints::default());
        assert_eq!(session.candidates().len(), 3);
        assert!(!session.undo());
    }

    #[test]
    fn test_sessions_are_independent() {
        let engine = engine(&["crane", "slate", "trace"]);
        let mut first = session(&engine);
        let second = session(&engine);
        first.compute_guess().unwrap();
        first.submit_feedback("*****").unwrap();
        assert_ne!(first.constraints(), second.constraints());
        assert_eq!(second.constraints(), Constraints::default());
    }

    #[test]
    fn test_game_loop_immediate_exit() {
        let engine = engine(&["crane", "slate", "raise"]);
        let mut interface = ScriptedInterface::new(vec![Some(UserAction::Exit)]);
        game_loop(
            &engine,
            SelectionMode::Heuristic,
            StdRng::seed_from_u64(0),
            &mut interface,
        );
        assert!(interface.exited);
        assert_eq!(interface.recommendations.len(), 1);
        assert_eq!(interface.recommendations[0].round, 1);
        assert_eq!(interface.recommendations[0].candidate_count, 3);
    }

    #[test]
    fn test_game_loop_rejection_keeps_guess() {
        let engine = engine(&["mango", "tango", "cargo"]);
        let mut interface = ScriptedInterface::new(vec![
            feedback("*****,z"),
            None,
            Some(UserAction::Exit),
        ]);
        game_loop(
            &engine,
            SelectionMode::Heuristic,
            StdRng::seed_from_u64(0),
            &mut interface,
        );
        assert_eq!(interface.rejections, ["included-not-in-guess"]);
        // a rejected round does not trigger a new recommendation
        assert_eq!(interface.recommendations.len(), 1);
    }

    #[test]
    fn test_game_loop_narrows_to_single_candidate() {
        let engine = engine(&["apple", "mango", "grape"]);
        // heuristic opens with grape
        let mut interface =
            ScriptedInterface::new(vec![feedback("grap*,e"), Some(UserAction::Exit)]);
        game_loop(
            &engine,
            SelectionMode::Heuristic,
            StdRng::seed_from_u64(0),
            &mut interface,
        );
        assert_eq!(interface.recommendations[0].guess.as_str(), "grape");
        assert_eq!(interface.candidate_counts, [3, 1]);
        assert_eq!(interface.singles, ["grape"]);
        assert_eq!(interface.recommendations[1].round, 2);
    }

    #[test]
    fn test_game_loop_undo_and_new_game() {
        let engine = engine(&["apple", "mango", "grape"]);
        let mut interface = ScriptedInterface::new(vec![
            Some(UserAction::Undo),
            feedback("*****"),
            Some(UserAction::Undo),
            Some(UserAction::NewGame),
            Some(UserAction::Exit),
        ]);
        game_loop(
            &engine,
            SelectionMode::Heuristic,
            StdRng::seed_from_u64(0),
            &mut interface,
        );
        assert_eq!(interface.undos, [false, true]);
        assert_eq!(interface.new_games, 2);
        assert_eq!(interface.no_candidates, 1);
        assert_eq!(interface.recommendations.len(), 3);
    }
}
