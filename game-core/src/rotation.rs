use game_types::{Player, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roles {
    pub word_giver_id: PlayerId,
    pub guesser_id: PlayerId,
}

/// Roles for a 1-indexed round over players in join order.
///
/// The word-giver index advances by one each round and the guesser is always
/// the next player after the word-giver, so with two players the roles swap
/// every round. Returns `None` when fewer than two players are seated, since
/// the two roles must be held by different players.
pub fn assign_roles(players: &[Player], round_number: u32) -> Option<Roles> {
    if players.len() < 2 {
        return None;
    }

    let round_index = round_number.saturating_sub(1) as usize;
    let word_giver_index = round_index % players.len();
    let guesser_index = (word_giver_index + 1) % players.len();

    Some(Roles {
        word_giver_id: players[word_giver_index].id,
        guesser_id: players[guesser_index].id,
    })
}
