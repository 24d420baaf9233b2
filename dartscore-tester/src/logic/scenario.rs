use anyhow::{Context, Result, anyhow};
use dartscore_game::{
    LegId, LegSnapshot, MatchRules, MemoryStore, PlayerId, ScoringEngine, ScoringError,
    TurnOutcome,
};

use super::notation::parse_visit;

pub const HOME: PlayerId = PlayerId(1);
pub const AWAY: PlayerId = PlayerId(2);
pub const SCRIPT_LEG: LegId = LegId(1);

pub type Expectation = fn(&ScriptRun) -> Result<()>;

/// A fixed sequence of visits with a check on the resulting leg.
#[derive(Clone, Copy)]
pub struct Script {
    pub rules: MatchRules,
    pub visits: &'static [&'static str],
    pub expectation: Expectation,
}

#[derive(Clone, Copy)]
pub enum ScenarioKind {
    /// Runs once; seeds and iterations do not apply.
    Scripted(Script),
    /// One random leg per seed and iteration.
    Simulation(MatchRules),
}

#[derive(Clone, Copy)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ScenarioKind,
}

/// Engine, store and per-visit results left behind by a script.
pub struct ScriptRun {
    pub engine: ScoringEngine<MemoryStore, MemoryStore>,
    pub store: MemoryStore,
    pub results: Vec<Result<TurnOutcome, ScoringError>>,
}

impl ScriptRun {
    /// Every visit outcome, failing if any visit was rejected.
    pub fn accepted(&self) -> Result<Vec<TurnOutcome>> {
        self.results
            .iter()
            .enumerate()
            .map(|(index, result)| match result {
                Ok(outcome) => Ok(*outcome),
                Err(err) => Err(anyhow!("visit {} rejected: {err}", index + 1)),
            })
            .collect()
    }

    pub fn last(&self) -> Result<TurnOutcome> {
        self.accepted()?
            .last()
            .copied()
            .context("script recorded no visits")
    }

    pub fn leg(&self) -> Result<LegSnapshot> {
        self.store
            .snapshot(SCRIPT_LEG)
            .context("scripted leg missing from store")
    }
}

/// Play a script's visits against a fresh two-player leg with `HOME` to throw.
pub fn run_script(script: &Script) -> Result<ScriptRun> {
    let store = MemoryStore::new();
    store
        .insert_leg(LegSnapshot::new(
            SCRIPT_LEG,
            script.rules,
            vec![HOME, AWAY],
            HOME,
        ))
        .context("seeding scripted leg")?;
    let engine = ScoringEngine::new(store.clone(), store.clone());

    let mut results = Vec::with_capacity(script.visits.len());
    for visit in script.visits {
        let darts = parse_visit(visit).with_context(|| format!("parsing visit `{visit}`"))?;
        let result = engine.record_turn(SCRIPT_LEG, &darts);
        if let Err(err) = &result {
            log::debug!("scripted visit `{visit}` rejected: {err}");
        }
        results.push(result);
    }

    Ok(ScriptRun {
        engine,
        store,
        results,
    })
}
