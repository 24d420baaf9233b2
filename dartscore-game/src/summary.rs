//! Read-side view of a leg: ordered turns and per-player summaries.
use serde::{Deserialize, Serialize};

use crate::cricket::{CricketLedger, CricketPlayerLedger};
use crate::numbers::three_dart_average;
use crate::rules::MatchMode;
use crate::state::{LegId, LegSnapshot, LegStatus, PlayerId, Turn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLegSummary {
    pub player: PlayerId,
    pub darts_thrown: usize,
    pub three_dart_average: f64,
    /// X01 only.
    pub remaining: Option<u32>,
    /// Cricket only.
    pub cricket: Option<CricketPlayerLedger>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegState {
    pub leg_id: LegId,
    pub mode: MatchMode,
    pub status: LegStatus,
    pub starting_player: PlayerId,
    pub active_player: Option<PlayerId>,
    pub winner: Option<PlayerId>,
    pub turns: Vec<Turn>,
    pub players: Vec<PlayerLegSummary>,
}

impl LegState {
    #[must_use]
    pub fn summary_for(&self, player: PlayerId) -> Option<&PlayerLegSummary> {
        self.players.iter().find(|summary| summary.player == player)
    }
}

/// Build the view for a loaded leg. Summaries follow the match's player order.
#[must_use]
pub fn leg_state(snapshot: &LegSnapshot) -> LegState {
    let mode = snapshot.rules.mode;
    let ledger = snapshot
        .ledger
        .or_else(|| CricketLedger::for_players(&snapshot.players));
    let players = snapshot
        .players
        .iter()
        .map(|&player| {
            let darts_thrown = snapshot.darts_thrown_by(player);
            PlayerLegSummary {
                player,
                darts_thrown,
                three_dart_average: three_dart_average(snapshot.scored_by(player), darts_thrown),
                remaining: matches!(mode, MatchMode::X01).then(|| snapshot.remaining_for(player)),
                cricket: match mode {
                    MatchMode::Cricket => ledger
                        .and_then(|ledger| ledger.entry_for(player).copied())
                        .or(Some(CricketPlayerLedger::new(player))),
                    MatchMode::X01 => None,
                },
            }
        })
        .collect();

    LegState {
        leg_id: snapshot.id,
        mode,
        status: snapshot.status(),
        starting_player: snapshot.starting_player,
        active_player: match snapshot.status() {
            LegStatus::Open => snapshot.active_player(),
            LegStatus::Finished => None,
        },
        winner: snapshot.completion.winner,
        turns: snapshot.ordered_turns().into_iter().cloned().collect(),
        players,
    }
}
