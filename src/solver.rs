use crate::WORD_LENGTH;
use crate::constraints::{ConstraintError, Constraints};
use crate::word::Word;
use rand::Rng;
use rand::seq::IndexedRandom;

/// How the next guess is picked from the candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// Lowest `score_word`, first candidate wins ties.
    #[default]
    Heuristic,
    /// Uniformly random candidate.
    Random,
}

/// The chosen guess plus how it was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct GuessSelection {
    pub word: Word,
    pub score: f64,
    /// Number of candidates sharing the minimum score. Informational only.
    pub tied: usize,
}

/// Count of each letter a-z across every word in `words`, repeats included.
#[must_use]
pub fn build_freq_chart(words: &[Word]) -> [usize; 26] {
    let mut freq = [0; 26];
    for word in words {
        for letter in word.letters() {
            freq[(letter - b'a') as usize] += 1;
        }
    }
    freq
}

/// Lower is better: repeated letters cost one point each, and words built
/// from common letters get a smaller fractional penalty.
#[must_use]
pub fn score_word(word: &Word, freq: &[usize; 26]) -> f64 {
    let uniqueness_penalty = (WORD_LENGTH - word.letter_set().len()) as f64;
    let total: usize = word
        .letters()
        .map(|letter| freq[(letter - b'a') as usize])
        .sum();
    let frequency_penalty = if total == 0 { 1.0 } else { 1.0 / total as f64 };
    uniqueness_penalty + frequency_penalty
}

/// Words from `words` admitted by `constraints`, in list order.
#[must_use]
pub fn filter_candidates(words: &[Word], constraints: &Constraints) -> Vec<Word> {
    words
        .iter()
        .filter(|word| constraints.admits(word))
        .cloned()
        .collect()
}

/// Owns the full word list and the letter frequencies derived from it.
#[derive(Debug, Clone)]
pub struct CandidateEngine {
    words: Vec<Word>,
    freq: [usize; 26],
}

impl CandidateEngine {
    #[must_use]
    pub fn new(words: Vec<Word>) -> Self {
        let freq = build_freq_chart(&words);
        Self { words, freq }
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    #[must_use]
    pub fn letter_frequency(&self, letter: u8) -> usize {
        if letter.is_ascii_lowercase() {
            self.freq[(letter - b'a') as usize]
        } else {
            0
        }
    }

    #[must_use]
    pub fn candidates(&self, constraints: &Constraints) -> Vec<Word> {
        filter_candidates(&self.words, constraints)
    }

    #[must_use]
    pub fn score(&self, word: &Word) -> f64 {
        score_word(word, &self.freq)
    }

    /// Picks the lowest-scoring candidate.
    ///
    /// # Errors
    /// `ConstraintError::EmptyCandidateSet` when `candidates` is empty.
    pub fn select_guess(&self, candidates: &[Word]) -> Result<GuessSelection, ConstraintError> {
        let mut best: Option<(&Word, f64)> = None;
        let mut tied = 0;
        for word in candidates {
            let score = self.score(word);
            match best {
                Some((_, best_score)) if score > best_score => {}
                Some((_, best_score)) if score == best_score => tied += 1,
                _ => {
                    best = Some((word, score));
                    tied = 1;
                }
            }
        }

        let (word, score) = best.ok_or(ConstraintError::EmptyCandidateSet)?;
        log::debug!(
            "selected '{word}' (score {score:.6}) from {} candidates, {tied} tied",
            candidates.len()
        );
        Ok(GuessSelection {
            word: word.clone(),
            score,
            tied,
        })
    }

    /// Picks a candidate uniformly at random.
    ///
    /// # Errors
    /// `ConstraintError::EmptyCandidateSet` when `candidates` is empty.
    pub fn random_guess<R: Rng + ?Sized>(
        &self,
        candidates: &[Word],
        rng: &mut R,
    ) -> Result<GuessSelection, ConstraintError> {
        let word = candidates
            .choose(rng)
            .ok_or(ConstraintError::EmptyCandidateSet)?;
        log::debug!("picked '{word}' at random from {} candidates", candidates.len());
        Ok(GuessSelection {
            word: word.clone(),
            score: self.score(word),
            tied: candidates.len(),
        })
    }

    /// Dispatches on `mode`.
    ///
    /// # Errors
    /// `ConstraintError::EmptyCandidateSet` when `candidates` is empty.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        candidates: &[Word],
        mode: SelectionMode,
        rng: &mut R,
    ) -> Result<GuessSelection, ConstraintError> {
        match mode {
            SelectionMode::Heuristic => self.select_guess(candidates),
            SelectionMode::Random => self.random_guess(candidates, rng),
        }
    }
}
