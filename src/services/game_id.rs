//! Short shareable game ids.

use rand::{Rng, rng};

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Random upper-case base-36 code of `length` characters.
pub fn generate(length: usize) -> String {
    let mut rng = rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::validation::validate_game_id;

    #[test]
    fn generated_ids_pass_validation() {
        for length in [4, 7, 16] {
            let id = generate(length);
            assert_eq!(id.len(), length);
            assert!(validate_game_id(&id).is_ok(), "{id}");
        }
    }
}
