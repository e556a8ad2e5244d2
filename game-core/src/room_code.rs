use game_types::{ROOM_CODE_ALPHABET, ROOM_CODE_LEN};
use rand::Rng;
use tracing::warn;

pub const DEFAULT_ROOM_CODE_ATTEMPTS: usize = 32;

/// Issues human-shareable room codes, checked against the codes already in use.
#[derive(Debug, Clone)]
pub struct RoomCodeGenerator {
    max_attempts: usize,
}

impl RoomCodeGenerator {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn random_code<R: Rng + ?Sized>(rng: &mut R) -> String {
        let alphabet = ROOM_CODE_ALPHABET.as_bytes();
        (0..ROOM_CODE_LEN)
            .map(|_| char::from(alphabet[rng.random_range(0..alphabet.len())]))
            .collect()
    }

    /// Generate-and-check: draw codes until one is not taken. Returns `None`
    /// only when every attempt collided.
    pub fn generate_unique(&self, is_taken: impl Fn(&str) -> bool) -> Option<String> {
        self.generate_unique_with(&mut rand::rng(), is_taken)
    }

    pub fn generate_unique_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        is_taken: impl Fn(&str) -> bool,
    ) -> Option<String> {
        for attempt in 1..=self.max_attempts {
            let code = Self::random_code(rng);
            if !is_taken(&code) {
                return Some(code);
            }
            warn!("Room code collision on attempt {}: {}", attempt, code);
        }
        None
    }
}

impl Default for RoomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_CODE_ATTEMPTS)
    }
}
