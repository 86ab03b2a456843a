//! Letter normalization and accent equivalence.
//!
//! Guesses are matched against the secret word by equivalence class rather
//! than by exact character, so that `A` finds `Ä` and `Ü` finds `U`.

use super::errors::{GameError, GameResult};

/// Pairs of (base, accented) letters that match each other in both directions.
pub const EQUIVALENCE_CLASSES: &[(char, char)] = &[('A', 'Ä'), ('O', 'Ö'), ('U', 'Ü')];

/// Uppercase a single letter, keeping it as-is when its uppercase form
/// expands to more than one character (e.g. `ß`).
#[must_use]
pub fn to_upper(letter: char) -> char {
    let mut upper = letter.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => letter,
    }
}

/// Class representative for `letter`. Letters without an equivalent map to themselves.
#[must_use]
pub fn equivalence_key(letter: char) -> char {
    let letter = to_upper(letter);
    EQUIVALENCE_CLASSES
        .iter()
        .find(|(base, accented)| *base == letter || *accented == letter)
        .map_or(letter, |(base, _)| *base)
}

/// Whether two letters are interchangeable for guess matching.
#[must_use]
pub fn letters_match(a: char, b: char) -> bool {
    equivalence_key(a) == equivalence_key(b)
}

/// Parse raw client input into a single uppercase letter.
///
/// # Errors
///
/// Returns [`GameError::InvalidLetter`] unless the input is exactly one
/// alphabetic character.
pub fn parse_letter(input: &str) -> GameResult<char> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => Ok(to_upper(c)),
        _ => Err(GameError::InvalidLetter(input.to_string())),
    }
}
