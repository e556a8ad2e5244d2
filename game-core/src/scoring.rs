use game_types::{FinalWinner, Player, PlayerId, Round, RoundStatus, Standing};

/// Win rates closer than this are treated as equal when breaking ties.
pub const WIN_RATE_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct FinalRanking {
    pub standings: Vec<Standing>,
    pub winner: Option<PlayerId>,
    pub is_draw: bool,
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Rounds a player finished as guesser, and how many of those were won.
    /// Rounds still in progress are not counted.
    pub fn guesser_record(player_id: PlayerId, rounds: &[Round]) -> (u32, u32) {
        rounds
            .iter()
            .filter(|round| round.guesser_id == player_id && round.status.is_finished())
            .fold((0, 0), |(played, won), round| {
                let win = u32::from(round.status == RoundStatus::Won);
                (played + 1, won + win)
            })
    }

    pub fn win_rate(wins: u32, played: u32) -> f64 {
        if played == 0 {
            0.0
        } else {
            f64::from(wins) / f64::from(played)
        }
    }

    /// Players ordered by score, then guesser win rate, both descending.
    /// Players tied on both keep their join order.
    pub fn standings(players: &[Player], rounds: &[Round]) -> Vec<Standing> {
        let mut standings: Vec<Standing> = players
            .iter()
            .map(|player| {
                let (played, wins) = Self::guesser_record(player.id, rounds);
                Standing {
                    player_id: player.id,
                    name: player.name.clone(),
                    score: player.score,
                    rounds_as_guesser: played,
                    wins_as_guesser: wins,
                    win_rate: Self::win_rate(wins, played),
                }
            })
            .collect();

        Self::sort_standings(&mut standings);
        standings
    }

    fn sort_standings(standings: &mut [Standing]) {
        standings.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| b.win_rate.total_cmp(&a.win_rate))
        });
    }

    /// Equal score and win rates within [`WIN_RATE_TOLERANCE`]. Sorting uses
    /// the exact rates.
    fn is_level(a: &Standing, b: &Standing) -> bool {
        a.score == b.score && (a.win_rate - b.win_rate).abs() < WIN_RATE_TOLERANCE
    }

    /// Rank the players at the end of a game. The top two being level on
    /// score and win rate is a draw with no winner.
    pub fn final_ranking(players: &[Player], rounds: &[Round]) -> FinalRanking {
        let standings = Self::standings(players, rounds);

        let is_draw = match (standings.first(), standings.get(1)) {
            (Some(first), Some(second)) => Self::is_level(first, second),
            _ => false,
        };

        let winner = if is_draw {
            None
        } else {
            standings.first().map(|standing| standing.player_id)
        };

        FinalRanking {
            standings,
            winner,
            is_draw,
        }
    }

    /// The `finalWinner` annotation for an `end_game` snapshot.
    pub fn final_winner(players: &[Player], rounds: &[Round]) -> FinalWinner {
        let ranking = Self::final_ranking(players, rounds);
        let winner = ranking
            .winner
            .and_then(|id| players.iter().find(|player| player.id == id))
            .cloned();

        FinalWinner {
            winner,
            is_draw: ranking.is_draw,
            standings: ranking.standings,
        }
    }
}
