//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted player name, in characters.
pub const PLAYER_NAME_MAX_CHARS: usize = 64;

/// Validates that a game id is 4 to 16 upper-case base-36 characters.
///
/// # Examples
///
/// ```ignore
/// validate_game_id("K3F9Q2A") // Ok
/// validate_game_id("k3f9q2a") // Err - lowercase
/// validate_game_id("K3F")     // Err - too short
/// ```
pub fn validate_game_id(id: &str) -> Result<(), ValidationError> {
    if !(4..=16).contains(&id.len()) {
        let mut err = ValidationError::new("game_id_length");
        err.message = Some(
            format!(
                "Game ID must be between 4 and 16 characters (got {})",
                id.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    {
        let mut err = ValidationError::new("game_id_format");
        err.message = Some("Game ID must contain only digits and upper-case letters".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a player name is non-blank and at most [`PLAYER_NAME_MAX_CHARS`] characters.
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("player_name_empty");
        err.message = Some("Player name must not be empty".into());
        return Err(err);
    }

    let count = trimmed.chars().count();
    if count > PLAYER_NAME_MAX_CHARS {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!("Player name must be at most {PLAYER_NAME_MAX_CHARS} characters (got {count})")
                .into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates that a bracket size is one of 8, 16 or 32.
pub fn validate_bracket_size(size: u32) -> Result<(), ValidationError> {
    if matches!(size, 8 | 16 | 32) {
        return Ok(());
    }
    let mut err = ValidationError::new("bracket_size");
    err.message = Some(format!("Bracket size must be 8, 16 or 32 (got {size})").into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_game_id_valid() {
        assert!(validate_game_id("K3F9Q2A").is_ok());
        assert!(validate_game_id("0000").is_ok());
        assert!(validate_game_id("ABCDEFGHIJKLMNOP").is_ok());
    }

    #[test]
    fn test_validate_game_id_invalid_length() {
        assert!(validate_game_id("ABC").is_err()); // too short
        assert!(validate_game_id("ABCDEFGHIJKLMNOPQ").is_err()); // too long
        assert!(validate_game_id("").is_err()); // empty
    }

    #[test]
    fn test_validate_game_id_invalid_format() {
        assert!(validate_game_id("k3f9q2a").is_err()); // lowercase
        assert!(validate_game_id("K3F-Q2A").is_err()); // dash
        assert!(validate_game_id("K3F Q2A").is_err()); // space
    }

    #[test]
    fn test_validate_player_name() {
        assert!(validate_player_name("Ada").is_ok());
        assert!(validate_player_name("   ").is_err());
        assert!(validate_player_name(&"é".repeat(64)).is_ok());
        assert!(validate_player_name(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_bracket_size() {
        for size in [8, 16, 32] {
            assert!(validate_bracket_size(size).is_ok());
        }
        for size in [0, 4, 12, 64] {
            assert!(validate_bracket_size(size).is_err());
        }
    }
}
