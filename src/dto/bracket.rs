use serde::Serialize;
use utoipa::ToSchema;

use crate::bracket::{Bracket, BracketSession, GameKey, can_advance, matchup_for, rounds_for};

/// One game of the displayed round.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MatchupView {
    /// Game index inside the round.
    pub game: u32,
    /// Contestant from the upper feeder slot, absent while undecided.
    pub left: Option<String>,
    /// Contestant from the lower feeder slot, absent while undecided.
    pub right: Option<String>,
    /// Recorded winner, if any.
    pub winner: Option<String>,
}

/// The round a session is currently filling in.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoundView {
    /// 1-based round number.
    pub number: u32,
    /// Display name, e.g. "Sweet 16".
    pub name: String,
    pub total_rounds: u32,
    pub is_final: bool,
    /// True when every game of this round has a winner and a later round exists.
    pub can_advance: bool,
    pub matchups: Vec<MatchupView>,
}

impl RoundView {
    /// Project the current round of `session`.
    pub fn of(session: &BracketSession) -> Self {
        let rounds = rounds_for(session.size());
        let number = session.current_round();
        let (name, game_count) = rounds
            .iter()
            .find(|round| round.number == number)
            .map(|round| (round.display_name.to_owned(), round.game_count))
            .unwrap_or_default();

        let matchups = (0..game_count)
            .filter_map(|game| {
                let key = GameKey::new(number, game);
                let matchup = matchup_for(session.entrants(), session.bracket(), key).ok()?;
                Some(MatchupView {
                    game,
                    left: matchup.left.map(str::to_owned),
                    right: matchup.right.map(str::to_owned),
                    winner: session.bracket().winner(key).map(str::to_owned),
                })
            })
            .collect();

        Self {
            number,
            name,
            total_rounds: rounds.len() as u32,
            is_final: session.is_final_round(),
            can_advance: !session.is_final_round()
                && can_advance(session.bracket(), session.size(), number).is_ok(),
            matchups,
        }
    }
}

/// A recorded winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PickView {
    pub round: u32,
    pub game: u32,
    pub winner: String,
}

/// Flatten a bracket into its picks, ordered by round then game.
pub fn picks_of(bracket: &Bracket) -> Vec<PickView> {
    bracket
        .iter()
        .map(|(key, winner)| PickView {
            round: key.round,
            game: key.game,
            winner: winner.to_owned(),
        })
        .collect()
}
