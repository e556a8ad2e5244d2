use game_types::GameError;

pub const DEFAULT_MAX_WORD_LEN: usize = 32;

/// Checks secret words chosen by the word-giver and letters sent by the guesser.
#[derive(Debug, Clone)]
pub struct WordValidator {
    max_len: usize,
}

impl WordValidator {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len: max_len.max(1),
        }
    }

    /// Returns the word uppercased if it is usable as a secret word.
    ///
    /// Only ASCII letters are accepted: anything else could never be
    /// revealed by single letter guesses and the round would be unwinnable.
    pub fn validate_word(&self, word: &str) -> Result<String, GameError> {
        let word = word.trim();
        let len = word.chars().count();
        if len == 0 || len > self.max_len || !self.is_alphabetic(word) {
            return Err(GameError::InvalidWord {
                max_len: self.max_len,
            });
        }
        Ok(word.to_ascii_uppercase())
    }

    /// Uppercases a guessed letter, rejecting anything outside A-Z.
    pub fn normalize_letter(&self, letter: char) -> Result<char, GameError> {
        if letter.is_ascii_alphabetic() {
            Ok(letter.to_ascii_uppercase())
        } else {
            Err(GameError::InvalidLetter)
        }
    }

    /// Check if word contains only ASCII alphabetic characters
    pub fn is_alphabetic(&self, word: &str) -> bool {
        word.chars().all(|c| c.is_ascii_alphabetic())
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for WordValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORD_LEN)
    }
}
