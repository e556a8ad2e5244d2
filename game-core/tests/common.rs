use game_core::RoundRules;
use game_types::{Player, Round, RoundStatus};
use uuid::Uuid;

/// Creates a test player with specified attributes
pub fn create_test_player(name: &str) -> Player {
    create_test_player_with_score(name, 0)
}

/// Creates a test player with a given score
pub fn create_test_player_with_score(name: &str, score: u32) -> Player {
    Player {
        id: Uuid::new_v4(),
        room_id: Uuid::nil(),
        name: name.to_string(),
        score,
        is_online: true,
        is_creator: false,
        joined_at: "2024-01-01T00:00:00+00:00".to_string(),
        last_seen: "2024-01-01T00:00:00+00:00".to_string(),
    }
}

/// Creates an in-progress round for the given roles
pub fn create_round(word_giver: &Player, guesser: &Player, word: &str, max_guesses: u32) -> Round {
    Round {
        id: Uuid::new_v4(),
        room_id: Uuid::nil(),
        round_number: 1,
        word_giver_id: word_giver.id,
        guesser_id: guesser.id,
        word: word.to_string(),
        hint: None,
        guessed_letters: Vec::new(),
        wrong_guesses: 0,
        max_guesses,
        status: RoundStatus::InProgress,
        points_awarded: 0,
        created_at: "2024-01-01T00:00:00+00:00".to_string(),
        completed_at: None,
    }
}

/// Plays letters in order until the round ends or the letters run out
pub fn play_letters(round: &Round, letters: &str) -> Round {
    let mut current = round.clone();
    for letter in letters.chars() {
        if current.status.is_finished() {
            break;
        }
        current = RoundRules::play(&current, letter)
            .expect("test letters should be fresh")
            .0;
    }
    current
}
