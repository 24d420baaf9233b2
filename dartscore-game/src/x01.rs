//! X01 visit scoring: bust, finish and double-out legality.
use serde::{Deserialize, Serialize};

use crate::dart::Dart;

/// Result of applying one visit to an X01 remaining score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct X01TurnOutcome {
    pub total_scored: u32,
    pub was_bust: bool,
    pub did_finish: bool,
}

impl X01TurnOutcome {
    const fn bust() -> Self {
        Self {
            total_scored: 0,
            was_bust: true,
            did_finish: false,
        }
    }
}

/// Score a visit against the thrower's pre-visit remaining score.
///
/// Darts are evaluated strictly in order. Taking the score below zero, or
/// leaving exactly one under double-out, busts the whole visit. Reaching zero
/// finishes the leg unless double-out is on and the dart was not a double.
/// Darts after a bust or finish are not evaluated.
#[must_use]
pub fn process_x01_turn(remaining: u32, double_out: bool, darts: &[Dart]) -> X01TurnOutcome {
    let mut current = remaining;
    let mut total_scored = 0;

    for dart in darts {
        let score = dart.score_value();
        let Some(prospective) = current.checked_sub(score) else {
            return X01TurnOutcome::bust();
        };
        if double_out && prospective == 1 {
            return X01TurnOutcome::bust();
        }
        if prospective == 0 {
            if double_out && !dart.is_double() {
                return X01TurnOutcome::bust();
            }
            return X01TurnOutcome {
                total_scored: total_scored + score,
                was_bust: false,
                did_finish: true,
            };
        }
        total_scored += score;
        current = prospective;
    }

    X01TurnOutcome {
        total_scored,
        was_bust: false,
        did_finish: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dart(multiplier: u32, segment: u32) -> Dart {
        Dart::new(multiplier, segment).unwrap()
    }

    #[test]
    fn accumulates_a_normal_visit() {
        let outcome = process_x01_turn(501, true, &[dart(3, 20), dart(3, 20), dart(3, 20)]);
        assert_eq!(
            outcome,
            X01TurnOutcome {
                total_scored: 180,
                was_bust: false,
                did_finish: false
            }
        );
    }

    #[test]
    fn single_bull_cannot_finish_double_out() {
        let outcome = process_x01_turn(25, true, &[dart(1, 25)]);
        assert!(outcome.was_bust);
        assert_eq!(outcome.total_scored, 0);
        assert!(!outcome.did_finish);
    }

    #[test]
    fn double_finishes_double_out() {
        let outcome = process_x01_turn(40, true, &[dart(2, 20)]);
        assert!(outcome.did_finish);
        assert_eq!(outcome.total_scored, 40);
    }

    #[test]
    fn leaving_one_busts_under_double_out() {
        let outcome = process_x01_turn(2, true, &[dart(1, 1)]);
        assert!(outcome.was_bust);
        // Straight-out has no such restriction
        let outcome = process_x01_turn(2, false, &[dart(1, 1), dart(1, 1)]);
        assert!(outcome.did_finish);
        assert_eq!(outcome.total_scored, 2);
    }

    #[test]
    fn going_below_zero_discards_earlier_darts() {
        let outcome = process_x01_turn(50, true, &[dart(1, 20), dart(3, 20), dart(1, 1)]);
        assert_eq!(outcome, X01TurnOutcome::bust());
    }

    #[test]
    fn finish_stops_evaluation() {
        let outcome = process_x01_turn(60, true, &[dart(1, 20), dart(2, 20), dart(3, 20)]);
        assert!(outcome.did_finish);
        assert_eq!(outcome.total_scored, 60);
    }

    #[test]
    fn inner_bull_is_a_legal_double_out() {
        let outcome = process_x01_turn(170, true, &[dart(3, 20), dart(3, 20), dart(1, 50)]);
        assert!(outcome.did_finish);
        assert_eq!(outcome.total_scored, 170);
    }

    #[test]
    fn straight_out_finishes_on_any_dart() {
        let outcome = process_x01_turn(25, false, &[dart(1, 25)]);
        assert!(outcome.did_finish);
    }
}
