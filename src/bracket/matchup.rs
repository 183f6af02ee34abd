use super::{Bracket, BracketError, Entrants, GameKey, game_count};

/// The two contestants of a game. `None` marks a side that is still undecided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matchup<'a> {
    /// Contestant coming from the even feeder slot.
    pub left: Option<&'a str>,
    /// Contestant coming from the odd feeder slot.
    pub right: Option<&'a str>,
}

impl Matchup<'_> {
    /// Both sides are known, so a winner can be picked.
    pub fn is_ready(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Whether `name` is one of the two decided contestants.
    pub fn contains(&self, name: &str) -> bool {
        self.left == Some(name) || self.right == Some(name)
    }
}

/// Resolve the contestants of `key`.
///
/// Round 1 reads the entrant slots `2g` and `2g + 1`; later rounds read the winners of the
/// two feeder games of the previous round, leaving a side undecided when its feeder has no
/// recorded winner.
pub fn matchup_for<'a>(
    entrants: &'a Entrants,
    bracket: &'a Bracket,
    key: GameKey,
) -> Result<Matchup<'a>, BracketError> {
    if key.game >= game_count(entrants.size(), key.round) {
        return Err(BracketError::IndexOutOfRange(key));
    }

    let matchup = match key.feeders() {
        None => {
            let slot = key.game as usize * 2;
            Matchup {
                left: entrants.get(slot),
                right: entrants.get(slot + 1),
            }
        }
        Some((left, right)) => Matchup {
            left: bracket.winner(left),
            right: bracket.winner(right),
        },
    };

    Ok(matchup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::{BracketSize, rounds_for, select_winner, start_bracket};

    fn entrants(size: BracketSize) -> Entrants {
        let names = (0..size.entrants()).map(|i| format!("N{i}")).collect();
        start_bracket(size, names).unwrap()
    }

    #[test]
    fn first_round_pairs_adjacent_slots() {
        let entrants = entrants(BracketSize::Eight);
        let bracket = Bracket::new();
        let matchup = matchup_for(&entrants, &bracket, GameKey::new(1, 2)).unwrap();
        assert_eq!(matchup.left, Some("N4"));
        assert_eq!(matchup.right, Some("N5"));
        assert!(matchup.is_ready());
    }

    #[test]
    fn later_rounds_are_undecided_until_feeders_have_winners() {
        for size in BracketSize::ALL {
            let entrants = entrants(size);
            let bracket = Bracket::new();
            for round in rounds_for(size).into_iter().skip(1) {
                for game in 0..round.game_count {
                    let matchup =
                        matchup_for(&entrants, &bracket, GameKey::new(round.number, game))
                            .unwrap();
                    assert_eq!(matchup.left, None);
                    assert_eq!(matchup.right, None);
                    assert!(!matchup.is_ready());
                }
            }
        }
    }

    #[test]
    fn one_decided_feeder_leaves_the_other_side_open() {
        let entrants = entrants(BracketSize::Eight);
        let bracket =
            select_winner(&entrants, &Bracket::new(), GameKey::new(1, 1), "N3").unwrap();

        let matchup = matchup_for(&entrants, &bracket, GameKey::new(2, 0)).unwrap();
        assert_eq!(matchup.left, None);
        assert_eq!(matchup.right, Some("N3"));
        assert!(!matchup.is_ready());
        assert!(matchup.contains("N3"));
        assert!(!matchup.contains("N2"));
    }

    #[test]
    fn later_round_sides_are_always_recorded_winners() {
        let entrants = entrants(BracketSize::Sixteen);
        let mut bracket = Bracket::new();
        for game in 0..8 {
            let winner = format!("N{}", game * 2 + game % 2);
            bracket = select_winner(&entrants, &bracket, GameKey::new(1, game), &winner).unwrap();
        }

        for game in 0..4 {
            let matchup = matchup_for(&entrants, &bracket, GameKey::new(2, game)).unwrap();
            assert_eq!(matchup.left, bracket.winner(GameKey::new(1, game * 2)));
            assert_eq!(matchup.right, bracket.winner(GameKey::new(1, game * 2 + 1)));
        }
    }

    #[test]
    fn out_of_range_keys_are_rejected() {
        let entrants = entrants(BracketSize::Eight);
        let bracket = Bracket::new();
        for key in [
            GameKey::new(1, 4),
            GameKey::new(0, 0),
            GameKey::new(3, 1),
            GameKey::new(4, 0),
        ] {
            assert_eq!(
                matchup_for(&entrants, &bracket, key).unwrap_err(),
                BracketError::IndexOutOfRange(key)
            );
        }
    }
}
