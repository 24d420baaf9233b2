use thiserror::Error;

use crate::dart::InvalidDart;
use crate::state::{LegId, TurnId};

/// Failures surfaced by [`ScoringEngine`](crate::ScoringEngine) operations.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(transparent)]
    InvalidDart(#[from] InvalidDart),
    #[error("a visit must hold between 1 and 3 darts, got {count}")]
    InvalidVisit { count: usize },
    #[error("leg {0} not found")]
    LegNotFound(LegId),
    #[error("turn {0} not found")]
    TurnNotFound(TurnId),
    #[error("leg {0} is already finished")]
    LegAlreadyFinished(LegId),
    #[error("leg {leg} has {count} players; scoring supports exactly 2")]
    UnsupportedPlayerCount { leg: LegId, count: usize },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ScoringError {
    /// Wrap a host loader or sink failure.
    pub(crate) fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(anyhow::Error::new(err))
    }
}
