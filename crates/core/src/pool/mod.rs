//! Derives which numbers are still eligible for a draw.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, WheelError};

/// Inclusive range of drawable numbers. Always satisfies `min <= max`,
/// including when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct DrawRange {
    min: i64,
    max: i64,
}

#[derive(Deserialize)]
struct RawRange {
    min: i64,
    max: i64,
}

impl TryFrom<RawRange> for DrawRange {
    type Error = WheelError;

    fn try_from(raw: RawRange) -> Result<Self> {
        Self::new(raw.min, raw.max)
    }
}

impl DrawRange {
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if min > max {
            return Err(WheelError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn contains(&self, number: i64) -> bool {
        (self.min..=self.max).contains(&number)
    }

    /// Number of integers in the range. Saturates for the full `i64` span.
    pub fn len(&self) -> u64 {
        self.max.abs_diff(self.min).saturating_add(1)
    }

    /// A valid range always holds at least one number.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for DrawRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// Every number of `range` not present in `drawn`, ascending.
///
/// This materialises the whole pool; the selector uses [`pool_size`] and
/// [`nth_available`] instead so wide ranges stay cheap.
pub fn available_pool(range: DrawRange, drawn: &BTreeSet<i64>) -> Vec<i64> {
    (range.min..=range.max)
        .filter(|number| !drawn.contains(number))
        .collect()
}

/// Count of numbers still available. Drawn numbers outside the range (left
/// over from an earlier configuration) are ignored.
pub fn pool_size(range: DrawRange, drawn: &BTreeSet<i64>) -> u64 {
    let taken = drawn.range(range.min..=range.max).count() as u64;
    range.len().saturating_sub(taken)
}

/// Returns the `rank`-th available number (0-based, ascending) without
/// building the pool.
pub fn nth_available(range: DrawRange, drawn: &BTreeSet<i64>, rank: u64) -> Option<i64> {
    if rank >= pool_size(range, drawn) {
        return None;
    }

    let mut candidate = i128::from(range.min) + i128::from(rank);
    for &taken in drawn.range(range.min..=range.max) {
        if i128::from(taken) <= candidate {
            candidate += 1;
        } else {
            break;
        }
    }

    i64::try_from(candidate).ok()
}
