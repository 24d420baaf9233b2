//! Match rule configuration.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{DEFAULT_X01_TARGET, MAX_X01_TARGET};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    X01,
    Cricket,
}

impl MatchMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X01 => "x01",
            Self::Cricket => "cricket",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x01" => Ok(Self::X01),
            "cricket" => Ok(Self::Cricket),
            _ => Err(()),
        }
    }
}

/// Errors raised when match rules are inconsistent.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("x01 target must be between 1 and {max} (got {value})")]
    TargetOutOfRange { value: u32, max: u32 },
}

/// Scoring rules shared by every leg of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRules {
    #[serde(default)]
    pub mode: MatchMode,
    #[serde(default = "MatchRules::default_target_score")]
    pub target_score: u32,
    #[serde(default = "MatchRules::default_double_out")]
    pub double_out: bool,
}

impl MatchRules {
    const fn default_target_score() -> u32 {
        DEFAULT_X01_TARGET
    }

    const fn default_double_out() -> bool {
        true
    }

    #[must_use]
    pub const fn x01(target_score: u32, double_out: bool) -> Self {
        Self {
            mode: MatchMode::X01,
            target_score,
            double_out,
        }
    }

    /// Cricket ignores the target and out-rule.
    #[must_use]
    pub const fn cricket() -> Self {
        Self {
            mode: MatchMode::Cricket,
            target_score: 0,
            double_out: false,
        }
    }

    /// Return the rules with mode-irrelevant fields cleared.
    #[must_use]
    pub const fn normalized(self) -> Self {
        match self.mode {
            MatchMode::X01 => self,
            MatchMode::Cricket => Self::cricket(),
        }
    }

    /// Check the rules describe a playable match.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError`] when an X01 target is zero or above the supported maximum.
    pub const fn validate(&self) -> Result<(), RulesError> {
        if matches!(self.mode, MatchMode::X01)
            && (self.target_score == 0 || self.target_score > MAX_X01_TARGET)
        {
            return Err(RulesError::TargetOutOfRange {
                value: self.target_score,
                max: MAX_X01_TARGET,
            });
        }
        Ok(())
    }
}

impl Default for MatchRules {
    fn default() -> Self {
        Self::x01(Self::default_target_score(), Self::default_double_out())
    }
}
