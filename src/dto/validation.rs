//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest player name accepted, in characters.
pub const MAX_PLAYER_NAME_CHARS: usize = 32;

/// Validates the raw name entries of a start request.
///
/// Blank entries are allowed (they are dropped when the game starts), but a
/// filled entry must fit in [`MAX_PLAYER_NAME_CHARS`] once trimmed.
///
/// # Examples
///
/// ```ignore
/// validate_player_names(&["Ann".into(), "".into()]) // Ok
/// validate_player_names(&["x".repeat(40)])          // Err - too long
/// ```
pub fn validate_player_names(names: &[String]) -> Result<(), ValidationError> {
    if let Some(name) = names
        .iter()
        .map(|name| name.trim())
        .find(|name| name.chars().count() > MAX_PLAYER_NAME_CHARS)
    {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!(
                "Player names must be at most {MAX_PLAYER_NAME_CHARS} characters (got {})",
                name.chars().count()
            )
            .into(),
        );
        return Err(err);
    }

    if names.iter().any(|name| name.chars().any(char::is_control)) {
        let mut err = ValidationError::new("player_name_format");
        err.message = Some("Player names must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}
