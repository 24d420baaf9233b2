//! Dartscore Scoring Engine
//!
//! Platform-agnostic scoring for two-player X01 and Cricket darts legs.
//! Persistence is left to the host through the [`LegLoader`] and [`LegSink`]
//! traits; this crate only computes outcomes and the effects to commit.

pub mod checkout;
mod constants;
pub mod cricket;
pub mod dart;
pub mod error;
pub mod memory;
pub mod numbers;
pub mod replay;
pub mod rules;
pub mod state;
pub mod summary;
pub mod x01;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use checkout::{
    CheckoutRoute, CheckoutSuggestion, CheckoutTable, OutRule, checkout_suggestion, checkout_table,
    compare_routes,
};
pub use cricket::{
    CricketLedger, CricketNumber, CricketPlayerLedger, CricketTurnOutcome, process_cricket_turn,
};
pub use dart::{Dart, InvalidDart, RawDart, format_route, normalize_dart, total_for_darts};
pub use error::ScoringError;
pub use memory::{MemoryStore, MemoryStoreError};
pub use replay::{ReplayOutcome, replay_cricket_leg};
pub use rules::{MatchMode, MatchRules, RulesError};
pub use state::{
    LegCompletion, LegId, LegSnapshot, LegStatus, MatchStatus, NewTurn, PlayerId, Seat, Turn,
    TurnId, Visit,
};
pub use summary::{LegState, PlayerLegSummary, leg_state};
pub use x01::{X01TurnOutcome, process_x01_turn};

use constants::MAX_DARTS_PER_VISIT;

/// Trait for loading leg state from the host's store
pub trait LegLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load a leg with its rules, roster, turns, ledger and completion fields
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load_leg(&self, leg: LegId) -> Result<Option<LegSnapshot>, Self::Error>;

    /// Find the leg a turn belongs to
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_turn(&self, turn: TurnId) -> Result<Option<LegId>, Self::Error>;
}

/// Trait for committing scoring effects to the host's store
///
/// Each call must apply the turn change and its effects together.
pub trait LegSink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a new turn and the leg effects it produced, returning its id
    ///
    /// # Errors
    ///
    /// Returns an error if the turn cannot be stored.
    fn append_turn(
        &self,
        leg: LegId,
        turn: &NewTurn,
        effects: &LegEffects,
    ) -> Result<TurnId, Self::Error>;

    /// Delete a turn with its darts and store the recomputed leg effects
    ///
    /// # Errors
    ///
    /// Returns an error if the turn cannot be removed.
    fn remove_turn(&self, leg: LegId, turn: TurnId, effects: &LegEffects)
    -> Result<(), Self::Error>;
}

/// Leg-level state that changes alongside a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegEffects {
    /// Updated Cricket counters; `None` for X01 legs.
    pub ledger: Option<CricketLedger>,
    pub completion: LegCompletion,
}

/// Result of a recorded visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub turn_id: TurnId,
    pub player: PlayerId,
    pub total_scored: u32,
    pub was_bust: bool,
    pub did_finish: bool,
    pub status: LegStatus,
}

/// Turn orchestrator over a host-provided loader and sink
///
/// Callers must serialize `record_turn` and `undo_turn` for the same leg.
pub struct ScoringEngine<L, S>
where
    L: LegLoader,
    S: LegSink,
{
    loader: L,
    sink: S,
    clock: fn() -> DateTime<Utc>,
}

impl<L, S> ScoringEngine<L, S>
where
    L: LegLoader,
    S: LegSink,
{
    /// Create a scoring engine stamping finishes with the system clock
    pub fn new(loader: L, sink: S) -> Self {
        Self {
            loader,
            sink,
            clock: Utc::now,
        }
    }

    /// Replace the clock used for finish timestamps
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    fn load(&self, leg_id: LegId) -> Result<LegSnapshot, ScoringError> {
        self.loader
            .load_leg(leg_id)
            .map_err(ScoringError::store)?
            .ok_or(ScoringError::LegNotFound(leg_id))
    }

    /// Score a visit for the leg's active player and persist it
    ///
    /// # Errors
    ///
    /// Returns an error if the leg is missing, finished or not a two-player
    /// leg, if the visit is empty or holds more than three darts, if any dart
    /// is invalid, or if the store fails.
    pub fn record_turn(
        &self,
        leg_id: LegId,
        darts: &[RawDart],
    ) -> Result<TurnOutcome, ScoringError> {
        let leg = self.load(leg_id)?;
        if !leg.has_supported_roster() {
            log::warn!(
                "rejecting turn for leg {leg_id}: {} players on roster",
                leg.players.len()
            );
            return Err(ScoringError::UnsupportedPlayerCount {
                leg: leg_id,
                count: leg.players.len(),
            });
        }
        if leg.status() == LegStatus::Finished {
            log::warn!("rejecting turn for finished leg {leg_id}");
            return Err(ScoringError::LegAlreadyFinished(leg_id));
        }
        if darts.is_empty() || darts.len() > MAX_DARTS_PER_VISIT {
            return Err(ScoringError::InvalidVisit { count: darts.len() });
        }
        let visit = darts
            .iter()
            .copied()
            .map(normalize_dart)
            .collect::<Result<Visit, _>>()?;

        let Some(player) = leg
            .active_player()
            .or_else(|| leg.players.first().copied())
        else {
            return Err(ScoringError::UnsupportedPlayerCount {
                leg: leg_id,
                count: leg.players.len(),
            });
        };

        let (total_scored, was_bust, did_finish, ledger) = match leg.rules.mode {
            MatchMode::X01 => {
                let remaining = leg.remaining_for(player);
                let outcome = process_x01_turn(remaining, leg.rules.double_out, &visit);
                log::debug!(
                    "leg {leg_id}: player {player} from {remaining} scored {} (bust: {})",
                    outcome.total_scored,
                    outcome.was_bust
                );
                (
                    outcome.total_scored,
                    outcome.was_bust,
                    outcome.did_finish,
                    None,
                )
            }
            MatchMode::Cricket => {
                let mut ledger = cricket_ledger_for(&leg, leg_id)?;
                let seat = ledger
                    .seat_of(player)
                    .ok_or(ScoringError::UnsupportedPlayerCount {
                        leg: leg_id,
                        count: leg.players.len(),
                    })?;
                let outcome = process_cricket_turn(&mut ledger, seat, &visit);
                log::debug!(
                    "leg {leg_id}: player {player} scored {} cricket points",
                    outcome.total_scored
                );
                (outcome.total_scored, false, outcome.did_finish, Some(ledger))
            }
        };

        let completion = if did_finish {
            log::info!("leg {leg_id} won by player {player}");
            leg.completion.finish(player, (self.clock)())
        } else {
            leg.completion
        };
        let effects = LegEffects { ledger, completion };
        let turn = NewTurn {
            number: leg.next_turn_number(),
            player,
            darts: visit,
            total_scored,
            was_bust,
        };
        let turn_id = self
            .sink
            .append_turn(leg_id, &turn, &effects)
            .map_err(ScoringError::store)?;

        Ok(TurnOutcome {
            turn_id,
            player,
            total_scored,
            was_bust,
            did_finish,
            status: completion.status(),
        })
    }

    /// Remove a turn, reopening its leg if it had been won
    ///
    /// Cricket legs have their ledger rebuilt from the remaining turns.
    ///
    /// # Errors
    ///
    /// Returns an error if the turn or its leg cannot be found, or if the
    /// store fails.
    pub fn undo_turn(&self, turn_id: TurnId) -> Result<(), ScoringError> {
        let leg_id = self
            .loader
            .find_turn(turn_id)
            .map_err(ScoringError::store)?
            .ok_or(ScoringError::TurnNotFound(turn_id))?;
        let leg = self.load(leg_id)?;
        if !leg.turns.iter().any(|turn| turn.id == turn_id) {
            log::warn!("turn {turn_id} indexed under leg {leg_id} but missing from it");
            return Err(ScoringError::TurnNotFound(turn_id));
        }

        let mut completion = leg.completion;
        if leg.status() == LegStatus::Finished {
            log::info!("reopening leg {leg_id} after undoing turn {turn_id}");
            completion = LegCompletion::reopen();
        }

        let ledger = match leg.rules.mode {
            MatchMode::X01 => None,
            MatchMode::Cricket => {
                let base = cricket_ledger_for(&leg, leg_id)?;
                let remaining = leg.turns.iter().filter(|turn| turn.id != turn_id);
                let replayed = replay_cricket_leg(base, remaining);
                if let Some(winner) = replayed.winner {
                    completion = if leg.completion.winner == Some(winner) {
                        leg.completion
                    } else {
                        completion.finish(winner, (self.clock)())
                    };
                }
                Some(replayed.ledger)
            }
        };

        log::debug!("leg {leg_id}: undoing turn {turn_id}");
        self.sink
            .remove_turn(leg_id, turn_id, &LegEffects { ledger, completion })
            .map_err(ScoringError::store)
    }

    /// Checkout advice for a remaining score
    #[must_use]
    pub fn checkout_suggestion(&self, remaining: i32, double_out: bool) -> CheckoutSuggestion {
        checkout_suggestion(remaining, double_out)
    }

    /// Ordered turns, winner and per-player summaries for a leg
    ///
    /// # Errors
    ///
    /// Returns an error if the leg is missing or the store fails.
    pub fn leg_state(&self, leg_id: LegId) -> Result<LegState, ScoringError> {
        self.load(leg_id).map(|leg| leg_state(&leg))
    }
}

/// The leg's stored ledger, or a fresh one when none matches the roster.
fn cricket_ledger_for(leg: &LegSnapshot, leg_id: LegId) -> Result<CricketLedger, ScoringError> {
    match leg.ledger {
        Some(ledger) if ledger.tracks(&leg.players) => Ok(ledger),
        _ => CricketLedger::for_players(&leg.players).ok_or(
            ScoringError::UnsupportedPlayerCount {
                leg: leg_id,
                count: leg.players.len(),
            },
        ),
    }
}
