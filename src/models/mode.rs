//! Analysis mode selection

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{AppError, AppResult};

/// Selector of one fixed analysis prompt (1-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mode(u8);

impl Mode {
    /// All supported modes
    pub const ALL: [Mode; 4] = [Mode(1), Mode(2), Mode(3), Mode(4)];

    /// Mode id as entered by the user
    pub fn id(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Mode {
    type Error = AppError;

    fn try_from(value: u8) -> AppResult<Self> {
        Mode::ALL
            .into_iter()
            .find(|m| m.0 == value)
            .ok_or_else(|| AppError::invalid_mode(value.to_string()))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a comma-separated mode list such as `"1, 2, 2, 3"`.
///
/// Duplicates collapse; the set iterates in ascending order. Any bad token, or
/// an input with no tokens at all, rejects the whole input and the error
/// carries it verbatim.
pub fn parse_modes(input: &str) -> AppResult<BTreeSet<Mode>> {
    let invalid = || AppError::invalid_mode(input);

    if input.trim().is_empty() {
        return Err(invalid());
    }

    let mut modes = BTreeSet::new();
    for token in input.split(',') {
        let id: u8 = token.trim().parse().map_err(|_| invalid())?;
        let mode = Mode::try_from(id).map_err(|_| invalid())?;
        modes.insert(mode);
    }

    Ok(modes)
}
