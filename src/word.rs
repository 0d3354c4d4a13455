use crate::WORD_LENGTH;
use crate::constraints::LetterSet;
use std::fmt;
use thiserror::Error;

/// A validated, lowercase word of exactly `WORD_LENGTH` letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word {
    text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("word must be exactly {} letters, got {}", WORD_LENGTH, .0)]
    InvalidLength(usize),
    #[error("word must contain only the letters a-z")]
    InvalidCharacters,
}

impl Word {
    /// Builds a word from any text, lowercasing it first.
    ///
    /// # Errors
    /// Returns `WordError` when the text is not `WORD_LENGTH` ASCII letters.
    pub fn new(text: impl Into<String>) -> Result<Self, WordError> {
        let text = text.into().to_lowercase();
        if !text.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(WordError::InvalidCharacters);
        }
        if text.len() != WORD_LENGTH {
            return Err(WordError::InvalidLength(text.chars().count()));
        }
        Ok(Self { text })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Letter at `index` as an ASCII byte.
    ///
    /// # Panics
    /// Panics if `index >= WORD_LENGTH`.
    #[must_use]
    pub fn letter_at(&self, index: usize) -> u8 {
        self.text.as_bytes()[index]
    }

    pub fn letters(&self) -> impl Iterator<Item = u8> + '_ {
        self.text.bytes()
    }

    #[must_use]
    pub fn contains(&self, letter: u8) -> bool {
        self.text.as_bytes().contains(&letter)
    }

    /// The distinct letters of the word.
    #[must_use]
    pub fn letter_set(&self) -> LetterSet {
        self.letters().collect()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl TryFrom<&str> for Word {
    type Error = WordError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_lowercases_input() {
        let word = Word::new("CRANE").unwrap();
        assert_eq!(word.as_str(), "crane");
        assert_eq!(word.to_string(), "crane");
    }

    #[test]
    fn test_word_rejects_wrong_length() {
        assert_eq!(Word::new("cran"), Err(WordError::InvalidLength(4)));
        assert_eq!(Word::new("cranes"), Err(WordError::InvalidLength(6)));
        assert_eq!(Word::new(""), Err(WordError::InvalidLength(0)));
    }

    #[test]
    fn test_word_rejects_non_letters() {
        assert_eq!(Word::new("cr4ne"), Err(WordError::InvalidCharacters));
        assert_eq!(Word::new("cra e"), Err(WordError::InvalidCharacters));
        assert_eq!(Word::new("crâne"), Err(WordError::InvalidCharacters));
    }

    #[test]
    fn test_letter_access() {
        let word = Word::new("apple").unwrap();
        assert_eq!(word.letter_at(0), b'a');
        assert_eq!(word.letter_at(4), b'e');
        assert!(word.contains(b'p'));
        assert!(!word.contains(b'z'));
        assert_eq!(word.letter_set().len(), 4);
    }
}
