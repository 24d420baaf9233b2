//! Rebuild Cricket state from the retained turn history.
//!
//! Undo never reverses a mark: removing one can change whether a later mark
//! scored, so the ledger is always recomputed from scratch instead.
use serde::{Deserialize, Serialize};

use crate::cricket::{CricketLedger, process_cricket_turn};
use crate::state::{PlayerId, Turn};

/// Final state after replaying a leg's turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub ledger: CricketLedger,
    /// Player whose replayed turn satisfied the win condition, if any.
    pub winner: Option<PlayerId>,
}

/// Reset `ledger` and replay `turns` through the Cricket processor.
///
/// Turns are replayed in (turn number, id) order regardless of the order
/// given. Turns thrown by players absent from the ledger are skipped.
#[must_use]
pub fn replay_cricket_leg<'a>(
    mut ledger: CricketLedger,
    turns: impl IntoIterator<Item = &'a Turn>,
) -> ReplayOutcome {
    ledger.reset();

    let mut ordered: Vec<&Turn> = turns.into_iter().collect();
    ordered.sort_by_key(|turn| (turn.number, turn.id));

    let mut winner = None;
    for turn in ordered {
        let Some(seat) = ledger.seat_of(turn.player) else {
            log::warn!(
                "skipping turn {} during replay: player {} has no ledger entry",
                turn.id,
                turn.player
            );
            continue;
        };
        let outcome = process_cricket_turn(&mut ledger, seat, &turn.darts);
        if outcome.did_finish {
            winner = Some(turn.player);
        }
    }

    ReplayOutcome { ledger, winner }
}
