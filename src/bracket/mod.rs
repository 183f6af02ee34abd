//! Single-elimination bracket core: round topology, matchup resolution, winner
//! selection with downstream invalidation, and prediction scoring.
//!
//! Everything in this module is synchronous and free of shared state. Every
//! operation takes a snapshot and returns a new one; the service layer owns the
//! session lifecycle and persistence.

pub mod error;
pub mod matchup;
pub mod scoring;
pub mod state_machine;
pub mod topology;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use utoipa::ToSchema;

pub use self::error::BracketError;
pub use self::matchup::{Matchup, matchup_for};
pub use self::scoring::{Standing, max_score, rank, score};
pub use self::state_machine::{
    BracketSession, can_advance, champion, is_round_complete, select_winner, start_bracket,
};
pub use self::topology::{Round, game_count, round_count, rounds_for};

/// Supported bracket sizes. The entrant count of a bracket is always one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BracketSize {
    /// Eight entrants, three rounds.
    Eight,
    /// Sixteen entrants, four rounds.
    Sixteen,
    /// Thirty-two entrants, five rounds.
    ThirtyTwo,
}

impl BracketSize {
    /// Every supported size, smallest first.
    pub const ALL: [BracketSize; 3] = [Self::Eight, Self::Sixteen, Self::ThirtyTwo];

    /// Number of entrants.
    pub fn entrants(self) -> u32 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
            Self::ThirtyTwo => 32,
        }
    }
}

impl TryFrom<u32> for BracketSize {
    type Error = BracketError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(Self::Eight),
            16 => Ok(Self::Sixteen),
            32 => Ok(Self::ThirtyTwo),
            other => Err(BracketError::InvalidSize(other)),
        }
    }
}

impl From<BracketSize> for u32 {
    fn from(size: BracketSize) -> Self {
        size.entrants()
    }
}

/// Composite `(round, game)` key of a bracket slot. Rounds are 1-based, games 0-based.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub struct GameKey {
    /// Round number, starting at 1.
    pub round: u32,
    /// Game index inside the round, starting at 0.
    pub game: u32,
}

impl GameKey {
    /// Build a key for `game` inside `round`.
    pub const fn new(round: u32, game: u32) -> Self {
        Self { round, game }
    }

    /// The two games of the previous round feeding this one, or `None` in round 1.
    pub fn feeders(self) -> Option<(GameKey, GameKey)> {
        if self.round <= 1 {
            return None;
        }
        Some((
            GameKey::new(self.round - 1, self.game * 2),
            GameKey::new(self.round - 1, self.game * 2 + 1),
        ))
    }
}

/// Sparse mapping of decided games to their winner.
///
/// A key exists only once a winner was recorded for that game.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bracket {
    #[serde_as(as = "Vec<(_, _)>")]
    picks: BTreeMap<GameKey, String>,
}

impl Bracket {
    /// An empty bracket with no recorded winners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Winner recorded for `key`, if any.
    pub fn winner(&self, key: GameKey) -> Option<&str> {
        self.picks.get(&key).map(String::as_str)
    }

    /// Number of recorded winners across all rounds.
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    /// True when no winner has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// Number of recorded winners in `round`.
    pub fn decided_in_round(&self, round: u32) -> usize {
        self.picks
            .range(GameKey::new(round, 0)..GameKey::new(round + 1, 0))
            .count()
    }

    /// Iterate over recorded picks ordered by round then game.
    pub fn iter(&self) -> impl Iterator<Item = (GameKey, &str)> {
        self.picks.iter().map(|(key, winner)| (*key, winner.as_str()))
    }

    /// Copy of this bracket with `key` set and every pick of a later round removed.
    pub(crate) fn with_pick(&self, key: GameKey, winner: &str) -> Self {
        let mut picks = self.picks.clone();
        picks.retain(|existing, _| existing.round <= key.round);
        picks.insert(key, winner.to_owned());
        Self { picks }
    }
}

impl FromIterator<(GameKey, String)> for Bracket {
    fn from_iter<I: IntoIterator<Item = (GameKey, String)>>(iter: I) -> Self {
        Self {
            picks: iter.into_iter().collect(),
        }
    }
}

/// Ordered entrant names, one per first-round slot. Only built by [`start_bracket`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrants {
    size: BracketSize,
    names: Vec<String>,
}

impl Entrants {
    pub(crate) fn from_validated(size: BracketSize, names: Vec<String>) -> Self {
        Self { size, names }
    }

    /// Bracket size these entrants fill.
    pub fn size(&self) -> BracketSize {
        self.size
    }

    /// Entrant names in seeding order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name in `slot`, if the slot exists.
    pub fn get(&self, slot: usize) -> Option<&str> {
        self.names.get(slot).map(String::as_str)
    }
}

/// Lifecycle of a bracket, derived from its recorded picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BracketPhase {
    /// No winner recorded.
    Empty,
    /// Some winners recorded, final not decided.
    InProgress,
    /// The final has a winner.
    Complete,
}

impl BracketPhase {
    /// Derive the phase of `bracket` for a tournament of `size`.
    pub fn of(bracket: &Bracket, size: BracketSize) -> Self {
        if bracket.is_empty() {
            Self::Empty
        } else if champion(bracket, size).is_some() {
            Self::Complete
        } else {
            Self::InProgress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_conversion_accepts_only_supported_values() {
        assert_eq!(BracketSize::try_from(8).unwrap(), BracketSize::Eight);
        assert_eq!(BracketSize::try_from(16).unwrap(), BracketSize::Sixteen);
        assert_eq!(BracketSize::try_from(32).unwrap(), BracketSize::ThirtyTwo);
        for invalid in [0, 1, 4, 12, 24, 64] {
            assert_eq!(
                BracketSize::try_from(invalid).unwrap_err(),
                BracketError::InvalidSize(invalid)
            );
        }
    }

    #[test]
    fn size_serializes_as_number() {
        let json = serde_json::to_string(&BracketSize::Sixteen).unwrap();
        assert_eq!(json, "16");
        let parsed: BracketSize = serde_json::from_str("32").unwrap();
        assert_eq!(parsed, BracketSize::ThirtyTwo);
        assert!(serde_json::from_str::<BracketSize>("10").is_err());
    }

    #[test]
    fn feeders_point_at_previous_round() {
        assert_eq!(GameKey::new(1, 3).feeders(), None);
        assert_eq!(
            GameKey::new(3, 1).feeders(),
            Some((GameKey::new(2, 2), GameKey::new(2, 3)))
        );
    }

    #[test]
    fn with_pick_clears_every_later_round() {
        let bracket: Bracket = [
            (GameKey::new(1, 0), "A".to_owned()),
            (GameKey::new(1, 1), "C".to_owned()),
            (GameKey::new(1, 2), "E".to_owned()),
            (GameKey::new(2, 0), "A".to_owned()),
            (GameKey::new(2, 1), "E".to_owned()),
            (GameKey::new(3, 0), "A".to_owned()),
        ]
        .into_iter()
        .collect();

        let next = bracket.with_pick(GameKey::new(1, 2), "F");

        assert_eq!(next.winner(GameKey::new(1, 2)), Some("F"));
        assert_eq!(next.winner(GameKey::new(1, 0)), Some("A"));
        assert_eq!(next.decided_in_round(2), 0);
        assert_eq!(next.decided_in_round(3), 0);
        // the original value is untouched
        assert_eq!(bracket.len(), 6);
    }

    #[test]
    fn bracket_round_trips_through_json() {
        let bracket: Bracket = [
            (GameKey::new(1, 0), "A".to_owned()),
            (GameKey::new(2, 0), "A".to_owned()),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_value(&bracket).unwrap();
        assert!(json.is_array());
        let parsed: Bracket = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, bracket);
    }
}
