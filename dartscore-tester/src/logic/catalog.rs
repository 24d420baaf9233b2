use anyhow::{Context, Result, ensure};
use dartscore_game::{
    CricketNumber, LegStatus, MatchRules, MatchStatus, ScoringError, checkout_suggestion,
    format_route,
};

use super::scenario::{AWAY, HOME, SCRIPT_LEG, ScenarioKind, Script, ScriptRun, TestScenario};

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        scripted(
            "x01-bull-bust",
            "X01 Outer Bull Bust",
            "Outer bull on 25 busts under double-out",
            Script {
                rules: MatchRules::x01(25, true),
                visits: &["OB"],
                expectation: bull_bust_expectation,
            },
        ),
        scripted(
            "x01-double-finish",
            "X01 Double Finish",
            "D20 checks out 40 and completes the match",
            Script {
                rules: MatchRules::x01(40, true),
                visits: &["D20"],
                expectation: double_finish_expectation,
            },
        ),
        scripted(
            "x01-leave-one",
            "X01 Leave One",
            "Leaving 1 under double-out busts the visit",
            Script {
                rules: MatchRules::x01(2, true),
                visits: &["S1"],
                expectation: leave_one_expectation,
            },
        ),
        scripted(
            "x01-nine-darter",
            "X01 Nine Darter",
            "Perfect 501 leg: 180, 180, T20 T19 D12",
            Script {
                rules: MatchRules::x01(501, true),
                visits: &["T20 T20 T20", "S1", "T20 T20 T20", "S1", "T20 T19 D12"],
                expectation: nine_darter_expectation,
            },
        ),
        scripted(
            "x01-undo",
            "X01 Undo Round Trip",
            "Undoing a winning visit restores remaining and reopens the match",
            Script {
                rules: MatchRules::x01(101, true),
                visits: &["T17 S10", "S1", "D20"],
                expectation: x01_undo_expectation,
            },
        ),
        scripted(
            "cricket-overflow",
            "Cricket Overflow",
            "Marks past three score while the opponent is open",
            Script {
                rules: MatchRules::cricket(),
                visits: &["T20", "S3 S4", "D20"],
                expectation: cricket_overflow_expectation,
            },
        ),
        scripted(
            "cricket-close-out",
            "Cricket Close Out",
            "Closing all seven numbers while level or ahead wins",
            Script {
                rules: MatchRules::cricket(),
                visits: &["T20 T19 T18", "S1", "T17 T16 T15", "S1", "IB OB"],
                expectation: cricket_close_out_expectation,
            },
        ),
        scripted(
            "cricket-trailing",
            "Cricket Trailing Close",
            "Closing everything while behind on points does not win",
            Script {
                rules: MatchRules::cricket(),
                visits: &[
                    "S1",
                    "T20 T20 T20",
                    "T20 T19 T18",
                    "S1",
                    "T17 T16 T15",
                    "S2",
                    "IB OB",
                ],
                expectation: cricket_trailing_expectation,
            },
        ),
        scripted(
            "cricket-undo-replay",
            "Cricket Undo Replay",
            "Undoing an early close rescores later overflow",
            Script {
                rules: MatchRules::cricket(),
                visits: &["T18", "T18 S18"],
                expectation: cricket_replay_expectation,
            },
        ),
        scripted(
            "invalid-darts",
            "Invalid Darts",
            "Treble bull and double inner bull are rejected",
            Script {
                rules: MatchRules::default(),
                visits: &["T25", "D50", "T20"],
                expectation: invalid_darts_expectation,
            },
        ),
        scripted(
            "checkout-routes",
            "Checkout Routes",
            "170 leads with T20 T20 Inner Bull; bogey numbers have no route",
            Script {
                rules: MatchRules::default(),
                visits: &[],
                expectation: checkout_expectation,
            },
        ),
        TestScenario {
            key: "random-x01",
            name: "Random X01 Legs",
            description: "Seeded 501 legs checking bust accounting and undo round trips",
            kind: ScenarioKind::Simulation(MatchRules::x01(501, true)),
        },
        TestScenario {
            key: "random-x01-straight",
            name: "Random Straight-Out Legs",
            description: "Seeded 301 straight-out legs",
            kind: ScenarioKind::Simulation(MatchRules::x01(301, false)),
        },
        TestScenario {
            key: "random-cricket",
            name: "Random Cricket Legs",
            description: "Seeded cricket legs checking replayed ledgers after every visit",
            kind: ScenarioKind::Simulation(MatchRules::cricket()),
        },
    ]
}

pub fn find_catalog_scenario(key: &str) -> Option<TestScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog_scenarios()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

const fn scripted(
    key: &'static str,
    name: &'static str,
    description: &'static str,
    script: Script,
) -> TestScenario {
    TestScenario {
        key,
        name,
        description,
        kind: ScenarioKind::Scripted(script),
    }
}

fn bull_bust_expectation(run: &ScriptRun) -> Result<()> {
    let outcome = run.last()?;
    ensure!(outcome.was_bust, "single bull on 25 should bust");
    ensure!(outcome.total_scored == 0, "bust must score nothing");
    let leg = run.leg()?;
    ensure!(leg.remaining_for(HOME) == 25, "remaining should stay at 25");
    ensure!(leg.completion.winner.is_none(), "no winner expected");
    Ok(())
}

fn double_finish_expectation(run: &ScriptRun) -> Result<()> {
    ensure!(run.last()?.did_finish, "D20 should finish 40");
    let leg = run.leg()?;
    ensure!(leg.completion.winner == Some(HOME), "thrower should win");
    ensure!(
        leg.completion.match_status == MatchStatus::Completed,
        "match should be completed"
    );
    ensure!(
        leg.completion.match_finished_at.is_some(),
        "match finish time missing"
    );
    Ok(())
}

fn leave_one_expectation(run: &ScriptRun) -> Result<()> {
    ensure!(run.last()?.was_bust, "leaving 1 should bust");
    ensure!(run.leg()?.remaining_for(HOME) == 2, "remaining should stay at 2");
    Ok(())
}

fn nine_darter_expectation(run: &ScriptRun) -> Result<()> {
    let outcomes = run.accepted()?;
    let home_totals: Vec<u32> = outcomes
        .iter()
        .filter(|outcome| outcome.player == HOME)
        .map(|outcome| outcome.total_scored)
        .collect();
    ensure!(
        home_totals == [180, 180, 141],
        "unexpected totals {home_totals:?}"
    );
    let state = run.engine.leg_state(SCRIPT_LEG)?;
    ensure!(state.winner == Some(HOME), "home player should win");
    let home = state
        .summary_for(HOME)
        .context("home summary missing")?;
    ensure!(home.darts_thrown == 9, "nine darts expected");
    ensure!(
        (home.three_dart_average - 167.0).abs() < f64::EPSILON,
        "average should be 167, got {}",
        home.three_dart_average
    );
    Ok(())
}

fn x01_undo_expectation(run: &ScriptRun) -> Result<()> {
    let finish = run.last()?;
    ensure!(finish.did_finish, "D20 should finish 40");
    run.engine.undo_turn(finish.turn_id)?;
    let leg = run.leg()?;
    ensure!(leg.status() == LegStatus::Open, "leg should reopen");
    ensure!(
        leg.completion.match_status == MatchStatus::InProgress,
        "match should be in progress again"
    );
    ensure!(leg.completion.finished_at.is_none(), "finish time should clear");
    ensure!(leg.remaining_for(HOME) == 40, "remaining should return to 40");
    ensure!(leg.active_player() == Some(HOME), "home should throw again");
    Ok(())
}

fn cricket_overflow_expectation(run: &ScriptRun) -> Result<()> {
    let outcomes = run.accepted()?;
    ensure!(outcomes[0].total_scored == 0, "closing T20 scores nothing");
    ensure!(outcomes[2].total_scored == 40, "D20 overflow scores 40");
    let ledger = run
        .leg()?
        .ledger
        .context("cricket ledger missing")?;
    let home = ledger
        .entry_for(HOME)
        .context("home entry missing")?;
    ensure!(home.marks_on(CricketNumber::Twenty) == 3, "marks cap at 3");
    ensure!(home.points == 40, "home points should be 40");
    Ok(())
}

fn cricket_close_out_expectation(run: &ScriptRun) -> Result<()> {
    let finish = run.last()?;
    ensure!(finish.did_finish, "closing all numbers level should win");
    ensure!(run.leg()?.completion.winner == Some(HOME), "home should win");
    Ok(())
}

fn cricket_trailing_expectation(run: &ScriptRun) -> Result<()> {
    let last = run.last()?;
    ensure!(!last.did_finish, "trailing player must not win");
    let leg = run.leg()?;
    ensure!(leg.status() == LegStatus::Open, "leg should stay open");
    let away_points = leg
        .ledger
        .and_then(|ledger| ledger.entry_for(AWAY).map(|entry| entry.points));
    ensure!(away_points == Some(120), "away should hold 120 points");
    Ok(())
}

fn cricket_replay_expectation(run: &ScriptRun) -> Result<()> {
    let outcomes = run.accepted()?;
    ensure!(outcomes[1].total_scored == 0, "closed 18 must not score");
    run.engine.undo_turn(outcomes[0].turn_id)?;
    let ledger = run
        .leg()?
        .ledger
        .context("cricket ledger missing")?;
    let away = ledger
        .entry_for(AWAY)
        .context("away entry missing")?;
    ensure!(
        away.points == 18,
        "replay should rescore 18, got {}",
        away.points
    );
    Ok(())
}

fn invalid_darts_expectation(run: &ScriptRun) -> Result<()> {
    ensure!(
        matches!(run.results[0], Err(ScoringError::InvalidDart(_))),
        "treble bull should be rejected"
    );
    ensure!(
        matches!(run.results[1], Err(ScoringError::InvalidDart(_))),
        "double inner bull should be rejected"
    );
    ensure!(run.results[2].is_ok(), "valid visit should be accepted");
    ensure!(run.leg()?.turns.len() == 1, "only the valid visit is stored");
    Ok(())
}

fn checkout_expectation(_run: &ScriptRun) -> Result<()> {
    let top = checkout_suggestion(170, true);
    let first = top
        .routes
        .first()
        .map(|route| format_route(route))
        .unwrap_or_default();
    ensure!(
        first == "T20 \u{2022} T20 \u{2022} Inner Bull",
        "unexpected 170 route {first}"
    );
    for bogey in [159, 162, 163, 165, 166, 168, 169] {
        let suggestion = checkout_suggestion(bogey, true);
        ensure!(
            suggestion.routes.is_empty() && !suggestion.finishable,
            "{bogey} should have no checkout"
        );
    }
    ensure!(
        checkout_suggestion(0, true).finishable,
        "a finished leg is finishable"
    );
    Ok(())
}
