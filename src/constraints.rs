//! Accumulated knowledge about the answer.
//!
//! A `Constraints` value is an immutable snapshot of what the feedback so far
//! has revealed: the confirmed-position pattern, the letters known to be in
//! the answer and the letters known not to be. `ConstraintStore` owns the
//! current snapshot and is the only thing that replaces it.

use crate::feedback::RoundFeedback;
use crate::word::Word;
use crate::{WILDCARD, WORD_LENGTH};
use std::fmt;
use thiserror::Error;

/// A set of lowercase ASCII letters packed into the low 26 bits of a `u32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LetterSet(u32);

impl LetterSet {
    pub const EMPTY: Self = Self(0);

    fn bit(letter: u8) -> Option<u32> {
        letter
            .is_ascii_lowercase()
            .then(|| 1 << (letter - b'a'))
    }

    /// Collects the letters of `text`, ignoring anything that is not a-z.
    #[must_use]
    pub fn from_letters(text: &str) -> Self {
        text.bytes().collect()
    }

    /// Adds `letter`; returns `false` when it is not a lowercase letter.
    pub fn insert(&mut self, letter: u8) -> bool {
        match Self::bit(letter) {
            Some(bit) => {
                self.0 |= bit;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(self, letter: u8) -> bool {
        Self::bit(letter).is_some_and(|bit| self.0 & bit != 0)
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    #[must_use]
    pub const fn is_disjoint(self, other: Self) -> bool {
        self.0 & other.0 == 0
    }

    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Letters in alphabetical order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (b'a'..=b'z').filter(move |&letter| self.contains(letter))
    }
}

impl FromIterator<u8> for LetterSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for letter in iter {
            set.insert(letter);
        }
        set
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.iter() {
            write!(f, "{}", letter as char)?;
        }
        Ok(())
    }
}

/// Per-slot record of confirmed letters; `None` is a wildcard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PositionPattern([Option<u8>; WORD_LENGTH]);

impl PositionPattern {
    /// Parses `WORD_LENGTH` characters, each a lowercase letter or `WILDCARD`.
    ///
    /// # Errors
    /// Returns `ConstraintError::InvalidPatternShape` for any other input.
    pub fn parse(input: &str) -> Result<Self, ConstraintError> {
        let shape_error = || ConstraintError::InvalidPatternShape {
            input: input.to_string(),
        };
        if input.len() != WORD_LENGTH {
            return Err(shape_error());
        }
        let mut slots = [None; WORD_LENGTH];
        for (slot, byte) in slots.iter_mut().zip(input.bytes()) {
            *slot = match byte {
                b if b == WILDCARD as u8 => None,
                b if b.is_ascii_lowercase() => Some(b),
                _ => return Err(shape_error()),
            };
        }
        Ok(Self(slots))
    }

    #[must_use]
    pub fn slot(&self, index: usize) -> Option<u8> {
        self.0[index]
    }

    pub fn slots(&self) -> impl Iterator<Item = Option<u8>> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn confirmed_letters(&self) -> LetterSet {
        self.0.iter().flatten().copied().collect()
    }

    #[must_use]
    pub fn confirmed_count(&self) -> usize {
        self.0.iter().flatten().count()
    }

    /// True when every confirmed slot equals the word's letter there.
    #[must_use]
    pub fn matches(&self, word: &Word) -> bool {
        self.0
            .iter()
            .zip(word.letters())
            .all(|(slot, letter)| slot.is_none_or(|confirmed| confirmed == letter))
    }
}

impl fmt::Display for PositionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.0 {
            let c = slot.map_or(WILDCARD, char::from);
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Reasons a round is rejected or a guess cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("position feedback '{}' must be {} letters or '{}'", .input, WORD_LENGTH, WILDCARD)]
    InvalidPatternShape { input: String },

    #[error("slot {} is already known to be '{}', not '{}'", .slot + 1, *.known as char, *.proposed as char)]
    PositionConflict { slot: usize, known: u8, proposed: u8 },

    #[error("slot {} was guessed as '{}', not '{}'", .slot + 1, *.guessed as char, *.proposed as char)]
    GuessMismatch { slot: usize, guessed: u8, proposed: u8 },

    #[error("included letters '{input}' must be lowercase letters only")]
    InvalidIncludedShape { input: String },

    #[error("letter(s) '{letters}' were not in the guess")]
    IncludedNotInGuess { letters: LetterSet },

    #[error("no word in the list is consistent with the feedback so far")]
    EmptyCandidateSet,
}

impl ConstraintError {
    /// Stable tag for the error kind, shown alongside the message.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPatternShape { .. } => "invalid-pattern",
            Self::PositionConflict { .. } => "position-conflict",
            Self::GuessMismatch { .. } => "guess-mismatch",
            Self::InvalidIncludedShape { .. } => "invalid-included",
            Self::IncludedNotInGuess { .. } => "included-not-in-guess",
            Self::EmptyCandidateSet => "no-candidates",
        }
    }
}

/// Immutable snapshot of everything learned so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Constraints {
    pub pattern: PositionPattern,
    pub included: LetterSet,
    pub excluded: LetterSet,
}

impl Constraints {
    /// Excluded letters that are not also known to be included.
    ///
    /// Wordle greys the second copy of a letter when the answer holds only
    /// one, so a letter can land in both sets. The included side wins. This
    /// under-excludes when the answer repeats a letter the guess revealed
    /// only once.
    #[must_use]
    pub const fn effective_excluded(&self) -> LetterSet {
        self.excluded.difference(self.included)
    }

    /// The candidate predicate.
    #[must_use]
    pub fn admits(&self, word: &Word) -> bool {
        let letters = word.letter_set();
        letters.is_disjoint(self.effective_excluded())
            && self.included.is_subset(letters)
            && self.pattern.matches(word)
    }

    /// Computes the snapshot that results from one round of feedback.
    ///
    /// Checks run in a fixed order and the first failure is returned;
    /// `self` is never touched.
    ///
    /// # Errors
    /// Any `ConstraintError` other than `EmptyCandidateSet`.
    pub fn merged(
        &self,
        guess: &Word,
        feedback_pattern: &str,
        feedback_included: &str,
    ) -> Result<Self, ConstraintError> {
        let proposed = PositionPattern::parse(feedback_pattern)?;

        for (slot, (known, new)) in self.pattern.slots().zip(proposed.slots()).enumerate() {
            if let (Some(known), Some(new)) = (known, new)
                && known != new
            {
                return Err(ConstraintError::PositionConflict {
                    slot,
                    known,
                    proposed: new,
                });
            }
        }

        for (slot, (new, guessed)) in proposed.slots().zip(guess.letters()).enumerate() {
            if let Some(new) = new
                && new != guessed
            {
                return Err(ConstraintError::GuessMismatch {
                    slot,
                    guessed,
                    proposed: new,
                });
            }
        }

        if !feedback_included.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(ConstraintError::InvalidIncludedShape {
                input: feedback_included.to_string(),
            });
        }
        let reported = LetterSet::from_letters(feedback_included);
        let stray = reported.difference(guess.letter_set());
        if !stray.is_empty() {
            return Err(ConstraintError::IncludedNotInGuess { letters: stray });
        }

        let mut slots = [None; WORD_LENGTH];
        for (i, slot) in slots.iter_mut().enumerate() {
            *slot = self.pattern.slot(i).or(proposed.slot(i));
        }
        let pattern = PositionPattern(slots);
        let included = self
            .included
            .union(reported)
            .union(pattern.confirmed_letters());
        let excluded = self
            .excluded
            .union(guess.letter_set().difference(included));

        Ok(Self {
            pattern,
            included,
            excluded,
        })
    }
}

/// Sole owner and mutator of the current `Constraints`.
#[derive(Debug, Default, Clone)]
pub struct ConstraintStore {
    current: Constraints,
}

impl ConstraintStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_snapshot(snapshot: Constraints) -> Self {
        Self { current: snapshot }
    }

    #[must_use]
    pub const fn snapshot(&self) -> Constraints {
        self.current
    }

    /// Merges one round of feedback for `guess`.
    ///
    /// On error the stored snapshot is exactly what it was before the call.
    ///
    /// # Errors
    /// See `Constraints::merged`.
    pub fn merge(
        &mut self,
        guess: &Word,
        feedback_pattern: &str,
        feedback_included: &str,
    ) -> Result<(), ConstraintError> {
        self.current = self
            .current
            .merged(guess, feedback_pattern, feedback_included)?;
        Ok(())
    }

    /// Like `merge`, but an absent position side repeats the known pattern.
    ///
    /// # Errors
    /// See `Constraints::merged`.
    pub fn merge_round(
        &mut self,
        guess: &Word,
        feedback: &RoundFeedback,
    ) -> Result<(), ConstraintError> {
        let pattern = match &feedback.pattern {
            Some(pattern) => pattern.clone(),
            None => self.current.pattern.to_string(),
        };
        self.merge(guess, &pattern, &feedback.included)
    }

    /// Replaces the current snapshot wholesale, e.g. when stepping back a round.
    pub fn restore(&mut self, snapshot: Constraints) {
        self.current = snapshot;
    }

    pub fn reset(&mut self) {
        self.current = Constraints::default();
    }
}
