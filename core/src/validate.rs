//! Input rules checked before anything reaches the remote service.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{Todo, TodoId};

/// Longest accepted todo text, in characters.
pub const MAX_TEXT_LEN: usize = 100;

/// Text must be non-empty and at most `MAX_TEXT_LEN` characters. Length is
/// counted in `char`s, not bytes.
pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    let len = text.chars().count();
    if len == 0 {
        return Err(ValidationError::Empty);
    }
    if len > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            len,
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

/// `ids` must name every todo in `current` exactly once.
pub fn validate_permutation(current: &[Todo], ids: &[TodoId]) -> Result<(), ValidationError> {
    if current.len() != ids.len() {
        return Err(ValidationError::NotAPermutation);
    }
    let known: HashSet<TodoId> = current.iter().map(|t| t.id).collect();
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !known.contains(id) || !seen.insert(*id) {
            return Err(ValidationError::NotAPermutation);
        }
    }
    Ok(())
}
