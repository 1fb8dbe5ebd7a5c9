//! Board and winning number sets.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// Smallest number a player can pick.
pub const MIN_NUMBER: u8 = 1;
/// Largest number a player can pick.
pub const MAX_NUMBER: u8 = 16;
/// Size of every winning-number draw.
pub const WINNING_COUNT: usize = 3;
/// Allowed board sizes.
pub const FIELD_COUNTS: std::ops::RangeInclusive<u8> = 5..=8;

fn in_domain(n: u8) -> bool {
    (MIN_NUMBER..=MAX_NUMBER).contains(&n)
}

/// Sort and deduplicate; `None` if any value repeats or is out of range.
fn normalize(raw: &[u8]) -> Option<Vec<u8>> {
    let set: BTreeSet<u8> = raw.iter().copied().collect();
    if set.len() != raw.len() || !set.iter().all(|n| in_domain(*n)) {
        return None;
    }
    Some(set.into_iter().collect())
}

/// True when every value of `winning` appears in `picks`.
pub fn covers(picks: &[u8], winning: &[u8]) -> bool {
    winning.iter().all(|n| picks.contains(n))
}

/// The numbers chosen on one board: 5 to 8 distinct values from 1..=16, kept sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct BoardNumbers(Vec<u8>);

impl BoardNumbers {
    pub fn new(raw: &[u8]) -> Result<Self, DomainError> {
        let count_ok = u8::try_from(raw.len()).is_ok_and(|n| FIELD_COUNTS.contains(&n));
        if !count_ok {
            return Err(DomainError::validation(
                ValidationKind::InvalidFieldCount,
                format!(
                    "A board needs between {} and {} numbers, got {}",
                    FIELD_COUNTS.start(),
                    FIELD_COUNTS.end(),
                    raw.len()
                ),
            ));
        }
        normalize(raw).map(Self).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::InvalidFieldCount,
                format!(
                    "Board numbers must be distinct values between {MIN_NUMBER} and {MAX_NUMBER}"
                ),
            )
        })
    }

    /// Number of fields on the board; always within [`FIELD_COUNTS`].
    pub fn field_count(&self) -> u8 {
        self.0.len() as u8
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn contains(&self, n: u8) -> bool {
        self.0.binary_search(&n).is_ok()
    }
}

impl TryFrom<Vec<u8>> for BoardNumbers {
    type Error = DomainError;

    fn try_from(raw: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(&raw)
    }
}

impl From<BoardNumbers> for Vec<u8> {
    fn from(n: BoardNumbers) -> Self {
        n.0
    }
}

/// Exactly three distinct winning numbers from 1..=16, kept sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WinningNumbers([u8; WINNING_COUNT]);

impl WinningNumbers {
    pub fn new(raw: &[u8]) -> Result<Self, DomainError> {
        let invalid = || {
            DomainError::validation(
                ValidationKind::InvalidWinningNumbers,
                format!(
                    "Winning numbers must be {WINNING_COUNT} distinct values between {MIN_NUMBER} and {MAX_NUMBER}"
                ),
            )
        };
        if raw.len() != WINNING_COUNT {
            return Err(invalid());
        }
        let sorted = normalize(raw).ok_or_else(invalid)?;
        let arr: [u8; WINNING_COUNT] = sorted.try_into().map_err(|_| invalid())?;
        Ok(Self(arr))
    }

    /// Three distinct in-range values, e.g. from an index sampler.
    pub(super) fn from_distinct(mut picked: [u8; WINNING_COUNT]) -> Self {
        picked.sort_unstable();
        Self(picked)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// A board wins when every winning number is among its picks.
    pub fn matched_by(&self, board: &BoardNumbers) -> bool {
        covers(board.as_slice(), &self.0)
    }
}

impl TryFrom<Vec<u8>> for WinningNumbers {
    type Error = DomainError;

    fn try_from(raw: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(&raw)
    }
}

impl From<WinningNumbers> for Vec<u8> {
    fn from(n: WinningNumbers) -> Self {
        n.0.to_vec()
    }
}

impl fmt::Display for WinningNumbers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a}-{b}-{c}")
    }
}
