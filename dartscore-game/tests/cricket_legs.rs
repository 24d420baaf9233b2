use dartscore_game::{
    CricketNumber, LegId, LegSnapshot, LegStatus, MatchMode, MatchRules, MatchStatus, MemoryStore,
    PlayerId, RawDart, ScoringEngine,
};

const ALICE: PlayerId = PlayerId(1);
const BOB: PlayerId = PlayerId(2);
const LEG: LegId = LegId(77);

fn setup() -> (ScoringEngine<MemoryStore, MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    store
        .insert_leg(LegSnapshot::new(LEG, MatchRules::cricket(), vec![ALICE, BOB], ALICE))
        .unwrap();
    (ScoringEngine::new(store.clone(), store.clone()), store)
}

fn visit(darts: &[(u32, u32)]) -> Vec<RawDart> {
    darts.iter().map(|&(m, s)| RawDart::new(m, s)).collect()
}

#[test]
fn overflow_on_a_closed_number_scores() {
    let (engine, store) = setup();
    let opening = engine.record_turn(LEG, &visit(&[(3, 20)])).unwrap();
    assert_eq!(opening.total_scored, 0);
    engine.record_turn(LEG, &visit(&[(1, 3), (1, 4)])).unwrap();
    let scoring = engine.record_turn(LEG, &visit(&[(2, 20)])).unwrap();
    assert_eq!(scoring.total_scored, 40);
    assert!(!scoring.was_bust);

    let ledger = store.snapshot(LEG).unwrap().ledger.unwrap();
    let alice = ledger.entry_for(ALICE).unwrap();
    assert_eq!(alice.marks_on(CricketNumber::Twenty), 3);
    assert_eq!(alice.points, 40);
    assert_eq!(ledger.entry_for(BOB).unwrap().points, 0);
}

#[test]
fn closing_everything_while_ahead_wins() {
    let (engine, store) = setup();
    engine.record_turn(LEG, &visit(&[(3, 20), (3, 20), (3, 19)])).unwrap();
    engine.record_turn(LEG, &visit(&[(1, 1)])).unwrap();
    engine.record_turn(LEG, &visit(&[(3, 18), (3, 17), (3, 16)])).unwrap();
    engine.record_turn(LEG, &visit(&[(1, 2)])).unwrap();
    let finish = engine
        .record_turn(LEG, &visit(&[(3, 15), (1, 50), (1, 25)]))
        .unwrap();
    assert!(finish.did_finish);
    assert_eq!(finish.status, LegStatus::Finished);

    let leg = store.snapshot(LEG).unwrap();
    assert_eq!(leg.completion.winner, Some(ALICE));
    assert_eq!(leg.completion.match_status, MatchStatus::Completed);
}

#[test]
fn closing_everything_while_behind_does_not_win() {
    let (engine, _store) = setup();
    // Bob banks points on 20 before Alice closes it
    engine.record_turn(LEG, &visit(&[(1, 1)])).unwrap();
    engine.record_turn(LEG, &visit(&[(3, 20), (3, 20), (3, 20)])).unwrap();
    engine.record_turn(LEG, &visit(&[(3, 20), (3, 19), (3, 18)])).unwrap();
    engine.record_turn(LEG, &visit(&[(1, 1)])).unwrap();
    let closing = engine
        .record_turn(LEG, &visit(&[(3, 17), (3, 16), (3, 15)]))
        .unwrap();
    assert!(!closing.did_finish);
    engine.record_turn(LEG, &visit(&[(1, 2)])).unwrap();
    let bull = engine.record_turn(LEG, &visit(&[(1, 50), (1, 25)])).unwrap();
    assert!(!bull.did_finish);

    let state = engine.leg_state(LEG).unwrap();
    assert_eq!(state.status, LegStatus::Open);
    assert_eq!(state.mode, MatchMode::Cricket);
    let bob = state.summary_for(BOB).unwrap().cricket.unwrap();
    assert_eq!(bob.points, 120);
}

#[test]
fn undo_round_trip_restores_the_ledger() {
    let (engine, store) = setup();
    engine.record_turn(LEG, &visit(&[(3, 19), (1, 19)])).unwrap();
    engine.record_turn(LEG, &visit(&[(2, 19), (1, 17)])).unwrap();
    let before = store.snapshot(LEG).unwrap();

    let extra = engine.record_turn(LEG, &visit(&[(3, 17), (1, 16)])).unwrap();
    assert_eq!(extra.total_scored, 0);
    engine.undo_turn(extra.turn_id).unwrap();

    let after = store.snapshot(LEG).unwrap();
    assert_eq!(after.ledger, before.ledger);
    assert_eq!(after.turns, before.turns);
}

#[test]
fn undoing_an_early_turn_rescores_later_turns() {
    let (engine, store) = setup();
    let closer = engine.record_turn(LEG, &visit(&[(3, 18)])).unwrap();
    engine.record_turn(LEG, &visit(&[(3, 18), (1, 18)])).unwrap();
    // Alice had closed 18 so Bob's extra mark did not score
    let ledger = store.snapshot(LEG).unwrap().ledger.unwrap();
    assert_eq!(ledger.entry_for(BOB).unwrap().points, 0);

    engine.undo_turn(closer.turn_id).unwrap();
    let ledger = store.snapshot(LEG).unwrap().ledger.unwrap();
    assert_eq!(ledger.entry_for(ALICE).unwrap().marks_on(CricketNumber::Eighteen), 0);
    assert_eq!(ledger.entry_for(BOB).unwrap().points, 18);
}

#[test]
fn undoing_the_winning_turn_reopens_the_match() {
    let (engine, store) = setup();
    engine.record_turn(LEG, &visit(&[(3, 20), (3, 19), (3, 18)])).unwrap();
    engine.record_turn(LEG, &visit(&[(1, 1)])).unwrap();
    engine.record_turn(LEG, &visit(&[(3, 17), (3, 16), (3, 15)])).unwrap();
    engine.record_turn(LEG, &visit(&[(1, 1)])).unwrap();
    let win = engine.record_turn(LEG, &visit(&[(1, 50), (1, 25)])).unwrap();
    assert!(win.did_finish);

    engine.undo_turn(win.turn_id).unwrap();
    let leg = store.snapshot(LEG).unwrap();
    assert_eq!(leg.status(), LegStatus::Open);
    assert_eq!(leg.completion.match_status, MatchStatus::InProgress);
    assert!(leg.completion.finished_at.is_none());
    assert!(leg.completion.match_finished_at.is_none());
    let ledger = leg.ledger.unwrap();
    assert_eq!(ledger.entry_for(ALICE).unwrap().marks_on(CricketNumber::Bull), 0);
}
