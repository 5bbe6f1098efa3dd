// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::ParseError;

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

/// A star rating, validated on construction so out-of-range values
/// never reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Rating(i64);

impl Rating {
    pub fn parse(value: i64) -> Result<Self, ParseError> {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(ParseError::OutOfRange("rating", RATING_MIN, RATING_MAX));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Review {
    pub id: i64,
    pub content: String,
    pub rating: Rating,
    pub user_id: i64,
    pub cocktail_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(Rating::parse(1).is_ok());
        assert!(Rating::parse(5).is_ok());
        assert_eq!(
            Rating::parse(0),
            Err(ParseError::OutOfRange("rating", 1, 5))
        );
        assert_eq!(
            Rating::parse(6),
            Err(ParseError::OutOfRange("rating", 1, 5))
        );
    }
}
