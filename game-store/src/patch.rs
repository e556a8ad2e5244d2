use game_types::{GameStatus, PlayerId, RoundStatus};

/// A single field of a partial update. `Unchanged` leaves the stored value as
/// it is, `Set` overwrites it (including with `None` for optional fields).
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Unchanged,
    Set(T),
}

impl<T> Patch<T> {
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Set(value) = self {
            *target = value;
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unchanged
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoomUpdate {
    pub game_status: Patch<GameStatus>,
    pub round_number: Patch<u32>,
    pub word_giver_id: Patch<Option<PlayerId>>,
    pub guesser_id: Patch<Option<PlayerId>>,
    pub current_word: Patch<Option<String>>,
    pub hint: Patch<Option<String>>,
    pub max_guesses: Patch<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerUpdate {
    pub name: Patch<String>,
    pub score: Patch<u32>,
    pub is_online: Patch<bool>,
    pub last_seen: Patch<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RoundUpdate {
    pub guessed_letters: Patch<Vec<char>>,
    pub wrong_guesses: Patch<u32>,
    pub status: Patch<RoundStatus>,
    pub points_awarded: Patch<u32>,
    pub completed_at: Patch<Option<String>>,
}
