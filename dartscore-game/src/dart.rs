//! Dart normalization and scoring.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

use crate::constants::{
    CHECKOUT_ROUTE_SEPARATOR, INNER_BULL_SCORE, INNER_BULL_SEGMENT, MAX_MULTIPLIER,
    MAX_NUMBERED_SEGMENT, MIN_MULTIPLIER, OUTER_BULL_MAX_MULTIPLIER, OUTER_BULL_SEGMENT,
};

/// A dart exactly as the host received it, before any validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawDart {
    pub multiplier: u32,
    pub segment: u32,
}

impl RawDart {
    #[must_use]
    pub const fn new(multiplier: u32, segment: u32) -> Self {
        Self {
            multiplier,
            segment,
        }
    }
}

/// Reasons a raw dart cannot be scored.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum InvalidDart {
    #[error("multiplier must be between 1 and 3 (got {0})")]
    MultiplierOutOfRange(u32),
    #[error("segment must be 1-20, 25 or 50 (got {0})")]
    SegmentOutOfRange(u32),
    #[error("bull can only be single or double (got multiplier {0})")]
    OuterBullMultiplier(u32),
    #[error("inner bull cannot have a multiplier greater than one (got {0})")]
    InnerBullMultiplier(u32),
}

/// A validated dart. Construct through [`Dart::new`] or [`normalize_dart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDart", into = "RawDart")]
pub struct Dart {
    multiplier: u8,
    segment: u8,
}

impl Dart {
    /// Validate a multiplier/segment pair.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDart`] for out-of-range values and impossible bull
    /// combinations.
    pub fn new(multiplier: u32, segment: u32) -> Result<Self, InvalidDart> {
        let multiplier = u8::try_from(multiplier)
            .ok()
            .filter(|m| (MIN_MULTIPLIER..=MAX_MULTIPLIER).contains(m))
            .ok_or(InvalidDart::MultiplierOutOfRange(multiplier))?;
        let segment_u8 = u8::try_from(segment)
            .ok()
            .filter(|s| {
                (1..=MAX_NUMBERED_SEGMENT).contains(s)
                    || *s == OUTER_BULL_SEGMENT
                    || *s == INNER_BULL_SEGMENT
            })
            .ok_or(InvalidDart::SegmentOutOfRange(segment))?;

        if segment_u8 == OUTER_BULL_SEGMENT && multiplier > OUTER_BULL_MAX_MULTIPLIER {
            return Err(InvalidDart::OuterBullMultiplier(u32::from(multiplier)));
        }
        if segment_u8 == INNER_BULL_SEGMENT && multiplier > MIN_MULTIPLIER {
            return Err(InvalidDart::InnerBullMultiplier(u32::from(multiplier)));
        }

        Ok(Self {
            multiplier,
            segment: segment_u8,
        })
    }

    pub(crate) const fn single(segment: u8) -> Self {
        Self {
            multiplier: 1,
            segment,
        }
    }

    pub(crate) const fn double(segment: u8) -> Self {
        Self {
            multiplier: 2,
            segment,
        }
    }

    pub(crate) const fn treble(segment: u8) -> Self {
        Self {
            multiplier: 3,
            segment,
        }
    }

    pub(crate) const fn outer_bull() -> Self {
        Self::single(OUTER_BULL_SEGMENT)
    }

    pub(crate) const fn inner_bull() -> Self {
        Self::single(INNER_BULL_SEGMENT)
    }

    #[must_use]
    pub const fn multiplier(self) -> u8 {
        self.multiplier
    }

    #[must_use]
    pub const fn segment(self) -> u8 {
        self.segment
    }

    /// Points this dart is worth on the board.
    #[must_use]
    pub fn score_value(self) -> u32 {
        match self.segment {
            INNER_BULL_SEGMENT => INNER_BULL_SCORE,
            segment => u32::from(self.multiplier) * u32::from(segment),
        }
    }

    /// Whether the dart may finish a double-out leg.
    #[must_use]
    pub const fn is_double(self) -> bool {
        self.segment == INNER_BULL_SEGMENT || self.multiplier == 2
    }

    #[must_use]
    pub const fn is_bull(self) -> bool {
        self.segment == OUTER_BULL_SEGMENT || self.segment == INNER_BULL_SEGMENT
    }

    /// Ordering used when ranking checkout shots: bigger score first, then
    /// bigger multiplier, then bigger segment.
    #[must_use]
    pub fn cmp_checkout_desc(self, other: Self) -> Ordering {
        other
            .score_value()
            .cmp(&self.score_value())
            .then_with(|| other.multiplier.cmp(&self.multiplier))
            .then_with(|| other.segment.cmp(&self.segment))
    }
}

impl TryFrom<RawDart> for Dart {
    type Error = InvalidDart;

    fn try_from(raw: RawDart) -> Result<Self, Self::Error> {
        Self::new(raw.multiplier, raw.segment)
    }
}

impl From<Dart> for RawDart {
    fn from(dart: Dart) -> Self {
        Self::new(u32::from(dart.multiplier), u32::from(dart.segment))
    }
}

impl fmt::Display for Dart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.segment, self.multiplier) {
            (INNER_BULL_SEGMENT, _) => f.write_str("Inner Bull"),
            (OUTER_BULL_SEGMENT, 2) => f.write_str("Double Bull"),
            (OUTER_BULL_SEGMENT, _) => f.write_str("Outer Bull"),
            (segment, 1) => write!(f, "S{segment}"),
            (segment, 2) => write!(f, "D{segment}"),
            (segment, _) => write!(f, "T{segment}"),
        }
    }
}

/// Validate and score a raw dart.
///
/// # Errors
///
/// Returns [`InvalidDart`] when the dart cannot exist on a board.
pub fn normalize_dart(raw: RawDart) -> Result<Dart, InvalidDart> {
    Dart::try_from(raw)
}

/// Sum of the board value of every dart.
#[must_use]
pub fn total_for_darts(darts: &[Dart]) -> u32 {
    darts.iter().map(|dart| dart.score_value()).sum()
}

/// Render darts as labels joined by a bullet separator.
#[must_use]
pub fn format_route(darts: &[Dart]) -> String {
    darts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(CHECKOUT_ROUTE_SEPARATOR)
}
