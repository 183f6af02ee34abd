//! Winner selection, round completion, and round navigation.
//!
//! Recording a winner conservatively clears **every** pick of every later round, not just
//! the games that depend on the changed one. A later-round matchup can therefore never
//! show a contestant that was eliminated by an edit, at the price of discarding unrelated
//! sibling picks in those rounds.

use std::collections::HashSet;

use super::{
    Bracket, BracketError, BracketSize, Entrants, GameKey, game_count, matchup_for, round_count,
};

/// Validate entrant names and fix them for a new bracket.
///
/// Names are trimmed; exactly `size` of them must be non-empty, and no name may repeat.
pub fn start_bracket(size: BracketSize, names: Vec<String>) -> Result<Entrants, BracketError> {
    let names: Vec<String> = names
        .into_iter()
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .collect();

    if names.len() != size.entrants() as usize {
        return Err(BracketError::IncompleteEntrants {
            filled: names.len(),
            size: size.entrants(),
        });
    }

    let mut seen = HashSet::with_capacity(names.len());
    if let Some(duplicate) = names.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(BracketError::DuplicateEntrant(duplicate.clone()));
    }

    Ok(Entrants::from_validated(size, names))
}

/// Record `winner` for `key` and return the new bracket.
///
/// The winner must be one of the two contestants currently resolved for `key`. Every pick of
/// every round after `key.round` is dropped from the result; `bracket` itself is untouched.
pub fn select_winner(
    entrants: &Entrants,
    bracket: &Bracket,
    key: GameKey,
    winner: &str,
) -> Result<Bracket, BracketError> {
    let matchup = matchup_for(entrants, bracket, key)?;
    if !matchup.is_ready() {
        return Err(BracketError::MatchupNotReady(key));
    }
    if !matchup.contains(winner) {
        return Err(BracketError::InvalidWinner {
            key,
            winner: winner.to_owned(),
        });
    }

    Ok(bracket.with_pick(key, winner))
}

/// True iff `round` has exactly `round_game_count` recorded winners.
pub fn is_round_complete(bracket: &Bracket, round: u32, round_game_count: u32) -> bool {
    bracket.decided_in_round(round) == round_game_count as usize
}

/// Succeeds when every game of `round` has a winner, so the next round may be shown.
pub fn can_advance(bracket: &Bracket, size: BracketSize, round: u32) -> Result<(), BracketError> {
    let expected = game_count(size, round);
    if expected == 0 {
        return Err(BracketError::IndexOutOfRange(GameKey::new(round, 0)));
    }
    if is_round_complete(bracket, round, expected) {
        Ok(())
    } else {
        Err(BracketError::RoundNotComplete {
            round,
            decided: bracket.decided_in_round(round),
            expected: expected as usize,
        })
    }
}

/// Winner of the final, once decided.
pub fn champion(bracket: &Bracket, size: BracketSize) -> Option<&str> {
    bracket.winner(GameKey::new(round_count(size), 0))
}

/// An entrant list, its bracket and the round currently being filled in.
///
/// Host and prediction sessions both wrap one of these. Each mutation goes through the pure
/// functions above and replaces the bracket snapshot only on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketSession {
    entrants: Entrants,
    bracket: Bracket,
    current_round: u32,
}

impl BracketSession {
    /// A fresh session positioned on round 1 with no picks.
    pub fn new(entrants: Entrants) -> Self {
        Self {
            entrants,
            bracket: Bracket::new(),
            current_round: 1,
        }
    }

    /// Rebuild a session from stored picks, positioned on the furthest round with a ready game.
    pub fn restore(entrants: Entrants, bracket: Bracket) -> Result<Self, BracketError> {
        let mut session = Self::new(entrants);
        for (key, winner) in bracket.iter() {
            session.bracket = select_winner(&session.entrants, &session.bracket, key, winner)?;
        }
        while session.current_round < session.last_round()
            && can_advance(&session.bracket, session.size(), session.current_round).is_ok()
        {
            session.current_round += 1;
        }
        Ok(session)
    }

    /// Entrants of this bracket.
    pub fn entrants(&self) -> &Entrants {
        &self.entrants
    }

    /// Current bracket snapshot.
    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    /// Bracket size.
    pub fn size(&self) -> BracketSize {
        self.entrants.size()
    }

    /// Round currently being filled in.
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    fn last_round(&self) -> u32 {
        round_count(self.size())
    }

    /// Whether the session sits on the final round.
    pub fn is_final_round(&self) -> bool {
        self.current_round == self.last_round()
    }

    /// Record a winner. On error the session is unchanged.
    pub fn select(&mut self, key: GameKey, winner: &str) -> Result<(), BracketError> {
        self.bracket = select_winner(&self.entrants, &self.bracket, key, winner)?;
        Ok(())
    }

    /// Move to the next round once the current one is complete.
    pub fn advance(&mut self) -> Result<u32, BracketError> {
        if self.is_final_round() {
            return Err(BracketError::NoNextRound(self.current_round));
        }
        can_advance(&self.bracket, self.size(), self.current_round)?;
        self.current_round += 1;
        Ok(self.current_round)
    }

    /// Move back one round. Always allowed; stays on round 1. Picks are kept.
    pub fn go_back(&mut self) -> u32 {
        self.current_round = self.current_round.saturating_sub(1).max(1);
        self.current_round
    }

    /// The champion, provided the final round is complete.
    pub fn finalize(&self) -> Result<&str, BracketError> {
        let final_round = self.last_round();
        can_advance(&self.bracket, self.size(), final_round)?;
        champion(&self.bracket, self.size()).ok_or(BracketError::RoundNotComplete {
            round: final_round,
            decided: 0,
            expected: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::{BracketPhase, matchup_for, rounds_for};

    fn names(count: u32) -> Vec<String> {
        (0..count).map(|i| format!("N{i}")).collect()
    }

    fn entrants(size: BracketSize) -> Entrants {
        start_bracket(size, names(size.entrants())).unwrap()
    }

    /// Fill every game, always picking the left contestant.
    fn fill(entrants: &Entrants) -> Bracket {
        let mut bracket = Bracket::new();
        for round in rounds_for(entrants.size()) {
            for game in 0..round.game_count {
                let key = GameKey::new(round.number, game);
                let left = matchup_for(entrants, &bracket, key)
                    .unwrap()
                    .left
                    .unwrap()
                    .to_owned();
                bracket = select_winner(entrants, &bracket, key, &left).unwrap();
            }
        }
        bracket
    }

    #[test]
    fn start_requires_every_name() {
        let mut input = names(32);
        input[7] = "   ".into();

        let err = start_bracket(BracketSize::ThirtyTwo, input).unwrap_err();
        assert_eq!(
            err,
            BracketError::IncompleteEntrants {
                filled: 31,
                size: 32
            }
        );
        assert!(err.to_string().contains("31/32"));

        let entrants = start_bracket(BracketSize::ThirtyTwo, names(32)).unwrap();
        let session = BracketSession::new(entrants);
        assert_eq!(session.current_round(), 1);
        assert!(session.bracket().is_empty());
    }

    #[test]
    fn start_trims_names_and_rejects_duplicates() {
        let mut input = names(8);
        input[0] = "  Ada ".into();
        let entrants = start_bracket(BracketSize::Eight, input).unwrap();
        assert_eq!(entrants.get(0), Some("Ada"));

        let mut input = names(8);
        input[5] = "N2".into();
        assert_eq!(
            start_bracket(BracketSize::Eight, input).unwrap_err(),
            BracketError::DuplicateEntrant("N2".into())
        );
    }

    #[test]
    fn start_rejects_too_many_names() {
        let err = start_bracket(BracketSize::Eight, names(9)).unwrap_err();
        assert_eq!(
            err,
            BracketError::IncompleteEntrants { filled: 9, size: 8 }
        );
    }

    #[test]
    fn winner_must_be_a_contestant() {
        let entrants = entrants(BracketSize::Eight);
        let bracket = Bracket::new();

        let err = select_winner(&entrants, &bracket, GameKey::new(1, 0), "N2").unwrap_err();
        assert_eq!(
            err,
            BracketError::InvalidWinner {
                key: GameKey::new(1, 0),
                winner: "N2".into()
            }
        );

        let err = select_winner(&entrants, &bracket, GameKey::new(2, 0), "N0").unwrap_err();
        assert_eq!(err, BracketError::MatchupNotReady(GameKey::new(2, 0)));
    }

    #[test]
    fn selecting_clears_every_later_round() {
        for size in BracketSize::ALL {
            let entrants = entrants(size);
            let full = fill(&entrants);
            for round in rounds_for(size) {
                for game in 0..round.game_count {
                    let key = GameKey::new(round.number, game);
                    let matchup = matchup_for(&entrants, &full, key).unwrap();
                    let right = matchup.right.unwrap();

                    let next = select_winner(&entrants, &full, key, right).unwrap();

                    assert_eq!(next.winner(key), Some(right));
                    for later in round.number + 1..=round_count(size) {
                        assert_eq!(next.decided_in_round(later), 0);
                    }
                    for earlier in 1..=round.number {
                        assert_eq!(
                            next.decided_in_round(earlier),
                            full.decided_in_round(earlier)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn selecting_twice_is_idempotent() {
        let entrants = entrants(BracketSize::Sixteen);
        let full = fill(&entrants);
        let key = GameKey::new(2, 1);
        let once = select_winner(&entrants, &full, key, "N4").unwrap();
        let twice = select_winner(&entrants, &once, key, "N4").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn complete_bracket_has_every_round_complete() {
        for size in BracketSize::ALL {
            let entrants = entrants(size);
            let bracket = fill(&entrants);
            assert_eq!(BracketPhase::of(&bracket, size), BracketPhase::Complete);
            assert_eq!(champion(&bracket, size), Some("N0"));
            for round in rounds_for(size) {
                assert!(is_round_complete(&bracket, round.number, round.game_count));
            }
        }
    }

    #[test]
    fn phase_follows_picks() {
        let entrants = entrants(BracketSize::Eight);
        let empty = Bracket::new();
        assert_eq!(BracketPhase::of(&empty, BracketSize::Eight), BracketPhase::Empty);
        let one = select_winner(&entrants, &empty, GameKey::new(1, 0), "N1").unwrap();
        assert_eq!(
            BracketPhase::of(&one, BracketSize::Eight),
            BracketPhase::InProgress
        );
    }

    #[test]
    fn advancing_requires_a_complete_round() {
        let entrants = entrants(BracketSize::Eight);
        let mut session = BracketSession::new(entrants);
        for game in 0..3 {
            session
                .select(GameKey::new(1, game), &format!("N{}", game * 2))
                .unwrap();
        }

        assert!(!is_round_complete(session.bracket(), 1, 4));
        assert_eq!(
            session.advance().unwrap_err(),
            BracketError::RoundNotComplete {
                round: 1,
                decided: 3,
                expected: 4
            }
        );
        assert_eq!(session.current_round(), 1);

        session.select(GameKey::new(1, 3), "N7").unwrap();
        assert!(is_round_complete(session.bracket(), 1, 4));
        assert_eq!(session.advance().unwrap(), 2);
    }

    #[test]
    fn navigation_back_keeps_picks_and_final_round_has_no_next() {
        let entrants = entrants(BracketSize::Eight);
        let bracket = fill(&entrants);
        let mut session = BracketSession::restore(entrants, bracket.clone()).unwrap();
        assert_eq!(session.current_round(), 3);
        assert!(session.is_final_round());
        assert_eq!(session.advance().unwrap_err(), BracketError::NoNextRound(3));
        assert_eq!(session.finalize().unwrap(), "N0");

        assert_eq!(session.go_back(), 2);
        assert_eq!(session.go_back(), 1);
        assert_eq!(session.go_back(), 1);
        assert_eq!(session.bracket(), &bracket);
    }

    #[test]
    fn finalize_rejects_an_open_final() {
        let entrants = entrants(BracketSize::Eight);
        let session = BracketSession::new(entrants);
        assert_eq!(
            session.finalize().unwrap_err(),
            BracketError::RoundNotComplete {
                round: 3,
                decided: 0,
                expected: 1
            }
        );
    }

    #[test]
    fn failed_select_leaves_session_untouched() {
        let entrants = entrants(BracketSize::Eight);
        let mut session = BracketSession::new(entrants);
        session.select(GameKey::new(1, 0), "N0").unwrap();
        let before = session.clone();
        assert!(session.select(GameKey::new(1, 1), "N0").is_err());
        assert_eq!(session, before);
    }

    #[test]
    fn restore_rejects_inconsistent_picks() {
        let entrants = entrants(BracketSize::Eight);
        let bracket: Bracket = [(GameKey::new(1, 0), "N5".to_owned())].into_iter().collect();
        assert!(matches!(
            BracketSession::restore(entrants, bracket),
            Err(BracketError::InvalidWinner { .. })
        ));
    }
}
