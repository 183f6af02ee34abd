use thiserror::Error;

use super::GameKey;

/// Rejected bracket operations. None of them alter the input snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BracketError {
    /// Bracket size outside the supported set.
    #[error("unsupported bracket size {0} (expected 8, 16 or 32)")]
    InvalidSize(u32),
    /// Not exactly `size` non-empty entrant names were supplied.
    #[error("please enter all {size} names, you have {filled}/{size}")]
    IncompleteEntrants {
        /// Number of non-empty names supplied.
        filled: usize,
        /// Required number of names.
        size: u32,
    },
    /// The same entrant name appears twice.
    #[error("entrant `{0}` is listed more than once")]
    DuplicateEntrant(String),
    /// Round or game index outside the bracket topology.
    #[error("game {} of round {} does not exist in this bracket", .0.game, .0.round)]
    IndexOutOfRange(GameKey),
    /// At least one side of the matchup is still undecided.
    #[error("game {} of round {} is waiting on earlier results", .0.game, .0.round)]
    MatchupNotReady(GameKey),
    /// The proposed winner is not one of the two contestants.
    #[error("`{winner}` is not playing in game {} of round {}", .key.game, .key.round)]
    InvalidWinner {
        /// Game the winner was proposed for.
        key: GameKey,
        /// Rejected winner.
        winner: String,
    },
    /// Some games of the round have no winner yet.
    #[error("round {round} is not complete ({decided}/{expected} games decided)")]
    RoundNotComplete {
        /// Round that still has open games.
        round: u32,
        /// Games with a recorded winner.
        decided: usize,
        /// Games in the round.
        expected: usize,
    },
    /// Advancing past the final round.
    #[error("round {0} is the final round")]
    NoNextRound(u32),
}
