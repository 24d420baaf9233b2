//! Centralized rule constants for dartscore scoring logic.
//!
//! These values define the board geometry and the limits of each rule set.
//! Keeping them together means a rule change is a reviewed code change rather
//! than something scattered across the processors.

// Board geometry -----------------------------------------------------------
pub(crate) const MIN_MULTIPLIER: u8 = 1;
pub(crate) const MAX_MULTIPLIER: u8 = 3;
pub(crate) const MAX_NUMBERED_SEGMENT: u8 = 20;
pub(crate) const OUTER_BULL_SEGMENT: u8 = 25;
pub(crate) const INNER_BULL_SEGMENT: u8 = 50;
pub(crate) const OUTER_BULL_MAX_MULTIPLIER: u8 = 2;
pub(crate) const INNER_BULL_SCORE: u32 = 50;
pub(crate) const BULL_BASE_SCORE: u32 = 25;

// Visits -------------------------------------------------------------------
pub(crate) const MAX_DARTS_PER_VISIT: usize = 3;
pub(crate) const REQUIRED_PLAYERS: usize = 2;

// X01 ----------------------------------------------------------------------
pub(crate) const DEFAULT_X01_TARGET: u32 = 501;
pub(crate) const MAX_X01_TARGET: u32 = 10_001;

// Cricket ------------------------------------------------------------------
pub(crate) const CRICKET_MARKS_TO_CLOSE: u8 = 3;
pub(crate) const INNER_BULL_CRICKET_MARKS: u8 = 2;

// Checkout tables ----------------------------------------------------------
pub(crate) const MAX_DOUBLE_OUT_CHECKOUT: u32 = 170;
pub(crate) const MAX_STRAIGHT_OUT_CHECKOUT: u32 = 180;
pub(crate) const CHECKOUT_ROUTE_SEPARATOR: &str = " \u{2022} ";

// Checkout notes -----------------------------------------------------------
pub(crate) const NOTE_LEG_COMPLETE: &str = "Leg complete \u{2013} enjoy the roar of the crowd.";
pub(crate) const NOTE_DOUBLE_OUT_TOO_HIGH: &str =
    "No finish above 170. Stack scores to leave a preferred double.";
pub(crate) const NOTE_DOUBLE_OUT_ROUTES: &str = "Double-out routes available in three darts.";
pub(crate) const NOTE_DOUBLE_OUT_EVEN_SETUP: &str = "Set up a comfortable double for next visit.";
pub(crate) const NOTE_DOUBLE_OUT_ODD_SETUP: &str =
    "No checkout this visit \u{2013} leave an even number or bull.";
pub(crate) const NOTE_STRAIGHT_OUT_TOO_HIGH: &str =
    "Too high for a straight-out finish. Keep piling on the scores.";
pub(crate) const NOTE_STRAIGHT_OUT_ROUTES: &str = "Straight-out finish options in hand.";
pub(crate) const NOTE_STRAIGHT_OUT_SETUP: &str =
    "Aim to leave a simple finish \u{2013} even numbers give the most options.";
