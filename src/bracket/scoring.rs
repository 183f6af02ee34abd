use std::cmp::Reverse;

use super::{Bracket, GameKey, Round};

/// Weighted score of `prediction` against `master`.
///
/// A correct pick in the round at index `i` of `rounds` is worth `i + 1` points. Missing or
/// wrong picks score nothing, and picks outside the round topology are ignored.
pub fn score(prediction: &Bracket, master: &Bracket, rounds: &[Round]) -> u32 {
    rounds
        .iter()
        .zip(1u32..)
        .map(|(round, weight)| {
            let correct = (0..round.game_count)
                .map(|game| GameKey::new(round.number, game))
                .filter(|&key| {
                    prediction
                        .winner(key)
                        .is_some_and(|pick| master.winner(key) == Some(pick))
                })
                .count() as u32;
            correct * weight
        })
        .sum()
}

/// Best achievable score for `rounds`.
pub fn max_score(rounds: &[Round]) -> u32 {
    rounds
        .iter()
        .zip(1u32..)
        .map(|(round, weight)| round.game_count * weight)
        .sum()
}

/// A scored prediction inside a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing<T> {
    /// Competition rank: equal scores share a rank and the next rank skips.
    pub rank: usize,
    /// Weighted score.
    pub score: u32,
    /// The ranked item.
    pub entry: T,
}

/// Score every entry and sort by descending score.
///
/// The sort is stable, so entries with equal scores keep their input order.
pub fn rank<T, F>(
    entries: Vec<T>,
    master: &Bracket,
    rounds: &[Round],
    bracket_of: F,
) -> Vec<Standing<T>>
where
    F: Fn(&T) -> &Bracket,
{
    let mut scored: Vec<(u32, T)> = entries
        .into_iter()
        .map(|entry| (score(bracket_of(&entry), master, rounds), entry))
        .collect();
    scored.sort_by_key(|(score, _)| Reverse(*score));

    let mut standings = Vec::with_capacity(scored.len());
    let mut previous: Option<(u32, usize)> = None;
    for (position, (score, entry)) in scored.into_iter().enumerate() {
        let rank = match previous {
            Some((last_score, last_rank)) if last_score == score => last_rank,
            _ => position + 1,
        };
        previous = Some((score, rank));
        standings.push(Standing { rank, score, entry });
    }
    standings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::{BracketSize, rounds_for, select_winner, start_bracket};

    fn pick(bracket: Bracket, round: u32, game: u32, winner: &str) -> Bracket {
        bracket
            .iter()
            .map(|(key, name)| (key, name.to_owned()))
            .chain([(GameKey::new(round, game), winner.to_owned())])
            .collect()
    }

    /// Size 8 master: A beats B in (1,0), C beats D in (1,1), A beats C in the final.
    fn master() -> Bracket {
        let b = pick(Bracket::new(), 1, 0, "A");
        let b = pick(b, 1, 1, "C");
        let b = pick(b, 2, 0, "A");
        pick(b, 3, 0, "A")
    }

    fn size_eight() -> Vec<Round> {
        rounds_for(BracketSize::Eight)
    }

    #[test]
    fn rounds_are_weighted_by_position() {
        let rounds = size_eight();
        let master = master();

        let only_first = pick(Bracket::new(), 1, 0, "A");
        assert_eq!(score(&only_first, &master, &rounds), 1);

        let first_and_final = pick(only_first.clone(), 3, 0, "A");
        assert_eq!(score(&first_and_final, &master, &rounds), 1 + 3);

        let first_and_semi = pick(only_first, 2, 0, "A");
        assert_eq!(score(&first_and_semi, &master, &rounds), 1 + 2);

        let nothing = pick(pick(Bracket::new(), 1, 0, "B"), 1, 1, "D");
        assert_eq!(score(&nothing, &master, &rounds), 0);
        assert_eq!(score(&Bracket::new(), &master, &rounds), 0);
    }

    #[test]
    fn missing_master_picks_score_nothing() {
        let rounds = size_eight();
        let master = pick(Bracket::new(), 1, 0, "A");
        let prediction = pick(pick(Bracket::new(), 1, 0, "A"), 3, 0, "A");
        assert_eq!(score(&prediction, &master, &rounds), 1);
    }

    #[test]
    fn picks_outside_topology_are_ignored() {
        let rounds = size_eight();
        let master = pick(pick(master(), 9, 0, "A"), 1, 7, "Z");
        // (1, 7) and (9, 0) do not exist in a size 8 bracket
        let prediction = pick(pick(Bracket::new(), 9, 0, "A"), 1, 7, "Z");
        assert_eq!(score(&prediction, &master, &rounds), 0);
    }

    #[test]
    fn perfect_prediction_reaches_max_score() {
        for size in BracketSize::ALL {
            let rounds = rounds_for(size);
            let names = (0..size.entrants()).map(|i| format!("N{i}")).collect();
            let entrants = start_bracket(size, names).unwrap();
            let mut bracket = Bracket::new();
            for round in &rounds {
                for game in 0..round.game_count {
                    let key = GameKey::new(round.number, game);
                    let winner = crate::bracket::matchup_for(&entrants, &bracket, key)
                        .unwrap()
                        .right
                        .unwrap()
                        .to_owned();
                    bracket = select_winner(&entrants, &bracket, key, &winner).unwrap();
                }
            }
            assert_eq!(score(&bracket, &bracket, &rounds), max_score(&rounds));
        }
        assert_eq!(max_score(&size_eight()), 4 + 2 * 2 + 3);
        assert_eq!(
            max_score(&rounds_for(BracketSize::ThirtyTwo)),
            16 + 8 * 2 + 4 * 3 + 2 * 4 + 5
        );
    }

    #[test]
    fn ranking_sorts_descending_and_shares_ranks_on_ties() {
        let rounds = size_eight();
        let master = master();
        let entries = vec![
            ("zero", Bracket::new()),
            ("one", pick(Bracket::new(), 1, 0, "A")),
            ("four", pick(pick(Bracket::new(), 1, 0, "A"), 3, 0, "A")),
            ("also-one", pick(Bracket::new(), 1, 1, "C")),
        ];

        let standings = rank(entries, &master, &rounds, |(_, bracket)| bracket);
        let summary: Vec<_> = standings
            .iter()
            .map(|s| (s.rank, s.score, s.entry.0))
            .collect();
        assert_eq!(
            summary,
            [(1, 4, "four"), (2, 1, "one"), (2, 1, "also-one"), (4, 0, "zero")]
        );
    }
}
