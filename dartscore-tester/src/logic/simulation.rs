//! Seeded random legs played through the scoring engine.
//!
//! Every simulated visit is checked against the invariants the engine must
//! hold: a replayed Cricket ledger equals the live one, recording and then
//! undoing a visit leaves the leg untouched, and every leg reaches a winner.
use anyhow::{Context, Result, ensure};
use dartscore_game::{
    CricketLedger, LegId, LegSnapshot, LegStatus, MatchMode, MatchRules, MemoryStore, PlayerId,
    RawDart, ScoringEngine, checkout_suggestion, replay_cricket_leg,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

const SIM_LEG: LegId = LegId(1);
const PLAYERS: [PlayerId; 2] = [PlayerId(1), PlayerId(2)];
const MAX_VISITS: usize = 600;
const UNDO_PROBE_CHANCE: f64 = 0.15;
const CHECKOUT_ATTEMPT_CHANCE: f64 = 0.45;
const CRICKET_FOCUS_CHANCE: f64 = 0.8;

/// What a simulated leg looked like once it finished.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub mode: MatchMode,
    pub visits: usize,
    pub darts: usize,
    pub busts: usize,
    pub winner: Option<PlayerId>,
    pub undo_probes: usize,
    pub replay_checks: usize,
}

type SimEngine = ScoringEngine<MemoryStore, MemoryStore>;

/// Play one leg under `rules` with throws drawn from `seed`.
///
/// # Errors
///
/// Returns an error describing the first invariant violation, or if the leg
/// fails to finish.
pub fn simulate_leg(rules: MatchRules, seed: u64) -> Result<SimulationSummary> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let store = MemoryStore::new();
    store
        .insert_leg(LegSnapshot::new(SIM_LEG, rules, PLAYERS.to_vec(), PLAYERS[0]))
        .context("seeding simulated leg")?;
    let engine = ScoringEngine::new(store.clone(), store.clone());

    let mut summary = SimulationSummary {
        seed,
        mode: rules.mode,
        visits: 0,
        darts: 0,
        busts: 0,
        winner: None,
        undo_probes: 0,
        replay_checks: 0,
    };

    while summary.visits < MAX_VISITS {
        let leg = current_leg(&store)?;
        let visit = next_visit(&mut rng, &leg);

        if rng.gen_bool(UNDO_PROBE_CHANCE) {
            probe_undo(&engine, &store, &leg, &visit)?;
            summary.undo_probes += 1;
        }

        let outcome = engine
            .record_turn(SIM_LEG, &visit)
            .with_context(|| format!("visit {} of seed {seed}", summary.visits + 1))?;
        summary.visits += 1;
        summary.darts += visit.len();
        if outcome.was_bust {
            summary.busts += 1;
        }

        let leg = current_leg(&store)?;
        check_leg(&leg)?;
        if leg.rules.mode == MatchMode::Cricket {
            summary.replay_checks += 1;
        }

        if outcome.did_finish {
            ensure!(
                leg.status() == LegStatus::Finished,
                "finishing visit left leg open"
            );
            summary.winner = leg.completion.winner;
            log::debug!(
                "seed {seed}: {} leg won by {} after {} visits",
                rules.mode,
                outcome.player,
                summary.visits
            );
            return Ok(summary);
        }
    }

    anyhow::bail!("leg did not finish within {MAX_VISITS} visits")
}

fn current_leg(store: &MemoryStore) -> Result<LegSnapshot> {
    store
        .snapshot(SIM_LEG)
        .context("simulated leg vanished from the store")
}

/// Record `visit`, undo it, and require the leg to match its prior state.
fn probe_undo(
    engine: &SimEngine,
    store: &MemoryStore,
    before: &LegSnapshot,
    visit: &[RawDart],
) -> Result<()> {
    let probe = engine.record_turn(SIM_LEG, visit)?;
    engine.undo_turn(probe.turn_id)?;
    let after = current_leg(store)?;
    ensure!(after.turns == before.turns, "undo left turns changed");
    ensure!(after.ledger == before.ledger, "undo left cricket ledger changed");
    ensure!(
        after.completion == before.completion,
        "undo left completion changed"
    );
    Ok(())
}

fn check_leg(leg: &LegSnapshot) -> Result<()> {
    match leg.rules.mode {
        MatchMode::X01 => {
            for player in &leg.players {
                ensure!(
                    leg.scored_by(*player) <= leg.rules.target_score,
                    "player {player} scored past the target"
                );
            }
        }
        MatchMode::Cricket => {
            let live = leg.ledger.context("cricket leg has no ledger")?;
            let base = CricketLedger::for_players(&leg.players)
                .context("cricket leg without two players")?;
            let replayed = replay_cricket_leg(base, &leg.turns);
            ensure!(
                replayed.ledger == live,
                "replayed ledger diverged from live ledger after {} turns",
                leg.turns.len()
            );
            ensure!(
                replayed.winner == leg.completion.winner,
                "replayed winner {:?} differs from recorded {:?}",
                replayed.winner,
                leg.completion.winner
            );
        }
    }
    Ok(())
}

fn next_visit(rng: &mut ChaCha20Rng, leg: &LegSnapshot) -> Vec<RawDart> {
    if leg.rules.mode == MatchMode::X01
        && let Some(player) = leg.active_player()
        && rng.gen_bool(CHECKOUT_ATTEMPT_CHANCE)
    {
        let remaining = i32::try_from(leg.remaining_for(player)).unwrap_or(i32::MAX);
        let suggestion = checkout_suggestion(remaining, leg.rules.double_out);
        if let Some(route) = suggestion.routes.first() {
            return route.iter().map(|dart| RawDart::from(*dart)).collect();
        }
    }

    let count = rng.gen_range(1..=3);
    (0..count)
        .map(|_| random_dart(rng, leg.rules.mode))
        .collect()
}

fn random_dart(rng: &mut ChaCha20Rng, mode: MatchMode) -> RawDart {
    let focus = mode == MatchMode::Cricket && rng.gen_bool(CRICKET_FOCUS_CHANCE);
    let segment = match rng.gen_range(0..22) {
        20 => 25,
        21 => 50,
        n if focus => 15 + n % 6,
        n => n + 1,
    };
    let multiplier = match segment {
        50 => 1,
        25 => rng.gen_range(1..=2),
        _ => rng.gen_range(1..=3),
    };
    RawDart::new(multiplier, segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x01_simulation_finishes_deterministically() {
        let first = simulate_leg(MatchRules::x01(301, true), 7).unwrap();
        let second = simulate_leg(MatchRules::x01(301, true), 7).unwrap();
        assert!(first.winner.is_some());
        assert_eq!(first.visits, second.visits);
        assert_eq!(first.winner, second.winner);
    }

    #[test]
    fn cricket_simulation_replays_every_turn() {
        let summary = simulate_leg(MatchRules::cricket(), 1337).unwrap();
        assert!(summary.winner.is_some());
        assert_eq!(summary.replay_checks, summary.visits);
    }

    #[test]
    fn random_darts_are_always_valid() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for mode in [MatchMode::X01, MatchMode::Cricket] {
            for _ in 0..500 {
                let dart = random_dart(&mut rng, mode);
                assert!(dartscore_game::normalize_dart(dart).is_ok(), "{dart:?}");
            }
        }
    }
}
