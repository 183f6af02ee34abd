use super::BracketSize;

const NAMES_8: [&str; 3] = ["Quarterfinals", "Semifinals", "Final"];
const NAMES_16: [&str; 4] = ["Round of 16", "Quarterfinals", "Semifinals", "Final"];
const NAMES_32: [&str; 5] = [
    "Round of 32",
    "Sweet 16",
    "Elite 8",
    "Final Four",
    "Championship",
];

/// One elimination stage of a bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    /// 1-based, contiguous round number.
    pub number: u32,
    /// Human readable round name.
    pub display_name: &'static str,
    /// Number of games played in the round.
    pub game_count: u32,
}

/// Number of rounds for `size` (`log2(size)`).
pub fn round_count(size: BracketSize) -> u32 {
    size.entrants().trailing_zeros()
}

/// Games played in `round` for a bracket of `size`, or 0 when the round does not exist.
pub fn game_count(size: BracketSize, round: u32) -> u32 {
    if round == 0 || round > round_count(size) {
        return 0;
    }
    size.entrants() >> round
}

/// Ordered round structure for `size`: game counts halve every round down to a single final.
pub fn rounds_for(size: BracketSize) -> Vec<Round> {
    let names: &[&'static str] = match size {
        BracketSize::Eight => &NAMES_8,
        BracketSize::Sixteen => &NAMES_16,
        BracketSize::ThirtyTwo => &NAMES_32,
    };

    names
        .iter()
        .zip(1..)
        .map(|(&display_name, number)| Round {
            number,
            display_name,
            game_count: game_count(size, number),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_two_uses_tournament_names() {
        let rounds = rounds_for(BracketSize::ThirtyTwo);
        let names: Vec<_> = rounds.iter().map(|round| round.display_name).collect();
        assert_eq!(
            names,
            [
                "Round of 32",
                "Sweet 16",
                "Elite 8",
                "Final Four",
                "Championship"
            ]
        );
        let games: Vec<_> = rounds.iter().map(|round| round.game_count).collect();
        assert_eq!(games, [16, 8, 4, 2, 1]);
    }

    #[test]
    fn game_counts_halve_down_to_a_single_final() {
        for size in BracketSize::ALL {
            let rounds = rounds_for(size);
            assert_eq!(rounds.len() as u32, round_count(size));
            assert_eq!(1u32 << rounds.len(), size.entrants());
            assert_eq!(rounds[0].game_count, size.entrants() / 2);
            for pair in rounds.windows(2) {
                assert_eq!(pair[1].number, pair[0].number + 1);
                assert_eq!(pair[1].game_count * 2, pair[0].game_count);
            }
            assert_eq!(rounds.last().map(|round| round.game_count), Some(1));
        }
    }

    #[test]
    fn rounds_are_stable_between_calls() {
        for size in BracketSize::ALL {
            assert_eq!(rounds_for(size), rounds_for(size));
        }
    }

    #[test]
    fn game_count_is_zero_outside_topology() {
        assert_eq!(game_count(BracketSize::Eight, 0), 0);
        assert_eq!(game_count(BracketSize::Eight, 4), 0);
        assert_eq!(game_count(BracketSize::Eight, 3), 1);
    }
}
