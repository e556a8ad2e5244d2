use crate::WordValidator;
use game_types::{GameError, Round, RoundStatus};

/// Result of applying one letter to a round, before round-end evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessOutcome {
    pub letter: char,
    pub is_correct: bool,
    pub guessed_letters: Vec<char>,
    pub wrong_guesses: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    InProgress,
    Won,
    Lost,
}

impl RoundOutcome {
    pub fn status(&self) -> RoundStatus {
        match self {
            RoundOutcome::InProgress => RoundStatus::InProgress,
            RoundOutcome::Won => RoundStatus::Won,
            RoundOutcome::Lost => RoundStatus::Lost,
        }
    }

    /// Points for the guesser. Only a won round scores.
    pub fn points_awarded(&self) -> u32 {
        match self {
            RoundOutcome::Won => 1,
            RoundOutcome::InProgress | RoundOutcome::Lost => 0,
        }
    }

    pub fn is_over(&self) -> bool {
        !matches!(self, RoundOutcome::InProgress)
    }
}

pub struct RoundRules;

impl RoundRules {
    /// Apply a guessed letter to an in-progress round.
    ///
    /// Repeat guesses are errors, never no-ops. A correct letter leaves the
    /// wrong-guess counter untouched, an absent letter increments it by one.
    pub fn apply_guess(round: &Round, letter: char) -> Result<GuessOutcome, GameError> {
        if round.status.is_finished() {
            return Err(GameError::NoActiveRound);
        }
        let letter = WordValidator::default().normalize_letter(letter)?;
        if round.has_guessed(letter) {
            return Err(GameError::LetterAlreadyGuessed);
        }

        let is_correct = round.word.to_ascii_uppercase().contains(letter);
        let mut guessed_letters = round.guessed_letters.clone();
        guessed_letters.push(letter);

        let wrong_guesses = if is_correct {
            round.wrong_guesses
        } else {
            round.wrong_guesses + 1
        };

        Ok(GuessOutcome {
            letter,
            is_correct,
            guessed_letters,
            wrong_guesses,
        })
    }

    /// Every letter of the word (case-insensitive) has been guessed.
    pub fn is_word_complete(word: &str, guessed_letters: &[char]) -> bool {
        word.chars()
            .all(|ch| guessed_letters.contains(&ch.to_ascii_uppercase()))
    }

    /// A completed word wins even if the same guess also hit the wrong-guess limit.
    pub fn evaluate(
        word: &str,
        guessed_letters: &[char],
        wrong_guesses: u32,
        max_guesses: u32,
    ) -> RoundOutcome {
        if Self::is_word_complete(word, guessed_letters) {
            RoundOutcome::Won
        } else if wrong_guesses >= max_guesses {
            RoundOutcome::Lost
        } else {
            RoundOutcome::InProgress
        }
    }

    pub fn evaluate_round(round: &Round) -> RoundOutcome {
        Self::evaluate(
            &round.word,
            &round.guessed_letters,
            round.wrong_guesses,
            round.max_guesses,
        )
    }

    /// Apply a guess and evaluate in one step, returning the updated round.
    /// The returned round carries the final status and points when it ended.
    pub fn play(
        round: &Round,
        letter: char,
    ) -> Result<(Round, GuessOutcome, RoundOutcome), GameError> {
        let guess = Self::apply_guess(round, letter)?;
        let mut next = round.clone();
        next.guessed_letters = guess.guessed_letters.clone();
        next.wrong_guesses = guess.wrong_guesses;

        let outcome = Self::evaluate_round(&next);
        next.status = outcome.status();
        next.points_awarded = outcome.points_awarded();

        Ok((next, guess, outcome))
    }
}
