//! Checkout route tables.
//!
//! Both tables are enumerated once on first use and shared read-only for the
//! rest of the process.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use crate::constants::{
    MAX_DOUBLE_OUT_CHECKOUT, MAX_NUMBERED_SEGMENT, MAX_STRAIGHT_OUT_CHECKOUT,
    NOTE_DOUBLE_OUT_EVEN_SETUP, NOTE_DOUBLE_OUT_ODD_SETUP, NOTE_DOUBLE_OUT_ROUTES,
    NOTE_DOUBLE_OUT_TOO_HIGH, NOTE_LEG_COMPLETE, NOTE_STRAIGHT_OUT_ROUTES, NOTE_STRAIGHT_OUT_SETUP,
    NOTE_STRAIGHT_OUT_TOO_HIGH,
};
use crate::dart::{Dart, total_for_darts};

/// Up to three darts that finish a leg from a given score.
pub type CheckoutRoute = SmallVec<[Dart; 3]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutRule {
    DoubleOut,
    StraightOut,
}

impl OutRule {
    #[must_use]
    pub const fn from_double_out(double_out: bool) -> Self {
        if double_out {
            Self::DoubleOut
        } else {
            Self::StraightOut
        }
    }

    /// Highest remaining score this rule can finish in one visit.
    #[must_use]
    pub const fn max_checkout(self) -> u32 {
        match self {
            Self::DoubleOut => MAX_DOUBLE_OUT_CHECKOUT,
            Self::StraightOut => MAX_STRAIGHT_OUT_CHECKOUT,
        }
    }

    fn setup_shots(self) -> Vec<Dart> {
        let segments = (1..=MAX_NUMBERED_SEGMENT).rev();
        let mut shots: Vec<Dart> = segments.clone().map(Dart::treble).collect();
        if matches!(self, Self::StraightOut) {
            shots.extend(segments.clone().map(Dart::double));
        }
        shots.extend(segments.map(Dart::single));
        shots.push(Dart::outer_bull());
        if matches!(self, Self::StraightOut) {
            shots.push(Dart::inner_bull());
        }
        shots
    }

    fn finishing_shots(self) -> Vec<Dart> {
        let segments = (1..=MAX_NUMBERED_SEGMENT).rev();
        let mut shots = vec![Dart::inner_bull()];
        shots.extend(segments.clone().map(Dart::double));
        if matches!(self, Self::StraightOut) {
            shots.extend(segments.clone().map(Dart::treble));
            shots.extend(segments.map(Dart::single));
            shots.push(Dart::outer_bull());
        }
        shots
    }
}

impl fmt::Display for OutRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoubleOut => f.write_str("double-out"),
            Self::StraightOut => f.write_str("straight-out"),
        }
    }
}

/// Order routes by dart count, then shot by shot from the biggest shot down.
#[must_use]
pub fn compare_routes(a: &[Dart], b: &[Dart]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b)
            .map(|(left, right)| left.cmp_checkout_desc(*right))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

/// Ranked finishing routes for every finishable score under one out-rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutTable {
    rule: OutRule,
    routes: BTreeMap<u32, Vec<CheckoutRoute>>,
}

impl CheckoutTable {
    /// Enumerate every one, two and three dart finish for `rule`.
    #[must_use]
    pub fn build(rule: OutRule) -> Self {
        let setups = rule.setup_shots();
        let finishers = rule.finishing_shots();
        let mut buckets: HashMap<u32, HashSet<CheckoutRoute>> = HashMap::new();
        let mut register = |setup: &[Dart], finisher: Dart| {
            let route = canonical_route(rule, setup, finisher);
            let target = total_for_darts(&route);
            if (1..=rule.max_checkout()).contains(&target) {
                buckets.entry(target).or_default().insert(route);
            }
        };

        for &finisher in &finishers {
            register(&[], finisher);
            for &first in &setups {
                register(&[first], finisher);
            }
            for (i, &first) in setups.iter().enumerate() {
                for &second in &setups[i..] {
                    register(&[first, second], finisher);
                }
            }
        }

        let routes = buckets
            .into_iter()
            .map(|(target, bucket)| {
                let mut ranked: Vec<CheckoutRoute> = bucket.into_iter().collect();
                ranked.sort_by(|a, b| compare_routes(a, b));
                (target, ranked)
            })
            .collect();

        Self { rule, routes }
    }

    #[must_use]
    pub const fn rule(&self) -> OutRule {
        self.rule
    }

    /// Ranked routes for `remaining`; empty when no route exists.
    #[must_use]
    pub fn routes_for(&self, remaining: u32) -> &[CheckoutRoute] {
        self.routes
            .get(&remaining)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every score with at least one route, ascending.
    pub fn finishable_scores(&self) -> impl Iterator<Item = u32> + '_ {
        self.routes.keys().copied()
    }

    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }
}

/// Setups big-to-small with the finisher kept last under double-out; under
/// straight-out every dart can finish so the whole route is sorted.
fn canonical_route(rule: OutRule, setup: &[Dart], finisher: Dart) -> CheckoutRoute {
    let mut route: CheckoutRoute = setup.iter().copied().collect();
    match rule {
        OutRule::DoubleOut => {
            route.sort_by(|a, b| a.cmp_checkout_desc(*b));
            route.push(finisher);
        }
        OutRule::StraightOut => {
            route.push(finisher);
            route.sort_by(|a, b| a.cmp_checkout_desc(*b));
        }
    }
    route
}

/// The process-wide table for `rule`, built on first use.
#[must_use]
pub fn checkout_table(rule: OutRule) -> &'static CheckoutTable {
    static DOUBLE_OUT: OnceLock<CheckoutTable> = OnceLock::new();
    static STRAIGHT_OUT: OnceLock<CheckoutTable> = OnceLock::new();
    let cell = match rule {
        OutRule::DoubleOut => &DOUBLE_OUT,
        OutRule::StraightOut => &STRAIGHT_OUT,
    };
    cell.get_or_init(|| {
        let table = CheckoutTable::build(rule);
        log::debug!(
            "built {rule} checkout table: {} scores, {} routes",
            table.routes.len(),
            table.route_count()
        );
        table
    })
}

/// Finishing advice for a remaining score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSuggestion {
    pub routes: Vec<CheckoutRoute>,
    pub note: String,
    pub finishable: bool,
}

impl CheckoutSuggestion {
    fn empty(note: &str, finishable: bool) -> Self {
        Self {
            routes: Vec::new(),
            note: note.to_string(),
            finishable,
        }
    }
}

/// Look up ranked checkout routes for `remaining`.
///
/// A remaining score of zero or below means the leg is already won and is
/// reported as finishable with no routes.
#[must_use]
pub fn checkout_suggestion(remaining: i32, double_out: bool) -> CheckoutSuggestion {
    let Ok(remaining) = u32::try_from(remaining) else {
        return CheckoutSuggestion::empty(NOTE_LEG_COMPLETE, true);
    };
    if remaining == 0 {
        return CheckoutSuggestion::empty(NOTE_LEG_COMPLETE, true);
    }

    let rule = OutRule::from_double_out(double_out);
    if remaining > rule.max_checkout() {
        let note = match rule {
            OutRule::DoubleOut => NOTE_DOUBLE_OUT_TOO_HIGH,
            OutRule::StraightOut => NOTE_STRAIGHT_OUT_TOO_HIGH,
        };
        return CheckoutSuggestion::empty(note, false);
    }

    let routes = checkout_table(rule).routes_for(remaining);
    if !routes.is_empty() {
        let note = match rule {
            OutRule::DoubleOut => NOTE_DOUBLE_OUT_ROUTES,
            OutRule::StraightOut => NOTE_STRAIGHT_OUT_ROUTES,
        };
        return CheckoutSuggestion {
            routes: routes.to_vec(),
            note: note.to_string(),
            finishable: true,
        };
    }

    let note = match rule {
        OutRule::DoubleOut if remaining % 2 == 0 => NOTE_DOUBLE_OUT_EVEN_SETUP,
        OutRule::DoubleOut => NOTE_DOUBLE_OUT_ODD_SETUP,
        OutRule::StraightOut => NOTE_STRAIGHT_OUT_SETUP,
    };
    CheckoutSuggestion::empty(note, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn shot_lists_match_rule() {
        assert_eq!(OutRule::DoubleOut.setup_shots().len(), 41);
        assert_eq!(OutRule::DoubleOut.finishing_shots().len(), 21);
        assert_eq!(OutRule::StraightOut.setup_shots().len(), 62);
        assert_eq!(OutRule::StraightOut.finishing_shots().len(), 62);
        assert!(
            OutRule::DoubleOut
                .finishing_shots()
                .iter()
                .all(|dart| dart.is_double())
        );
    }

    #[test]
    fn route_comparison_prefers_fewer_darts() {
        let one: CheckoutRoute = smallvec![Dart::double(20)];
        let two: CheckoutRoute = smallvec![Dart::treble(20), Dart::double(20)];
        assert_eq!(compare_routes(&one, &two), Ordering::Less);
        let lower: CheckoutRoute = smallvec![Dart::single(20), Dart::double(20)];
        assert_eq!(compare_routes(&two, &lower), Ordering::Less);
    }

    #[test]
    fn canonical_routes_keep_double_last() {
        let route = canonical_route(
            OutRule::DoubleOut,
            &[Dart::single(1), Dart::treble(20)],
            Dart::double(2),
        );
        assert_eq!(route.as_slice(), &[Dart::treble(20), Dart::single(1), Dart::double(2)]);

        let route = canonical_route(OutRule::StraightOut, &[Dart::single(1)], Dart::treble(20));
        assert_eq!(route.as_slice(), &[Dart::treble(20), Dart::single(1)]);
    }

    #[test]
    fn straight_out_deduplicates_reordered_routes() {
        let table = CheckoutTable::build(OutRule::StraightOut);
        let routes = table.routes_for(3);
        // T1, S3, D1+S1, S2+S1, S1+S1+S1
        assert_eq!(routes.len(), 5);
        assert_eq!(routes[0].as_slice(), &[Dart::treble(1)]);
        assert_eq!(routes[1].as_slice(), &[Dart::single(3)]);
        assert_eq!(routes[2].as_slice(), &[Dart::double(1), Dart::single(1)]);
        assert_eq!(routes[4].len(), 3);
    }

    #[test]
    fn suggestion_edges() {
        let done = checkout_suggestion(0, true);
        assert!(done.finishable && done.routes.is_empty());
        assert!(checkout_suggestion(-12, false).finishable);

        let high = checkout_suggestion(171, true);
        assert!(!high.finishable);
        assert!(high.note.contains("170"));
        assert!(!checkout_suggestion(181, false).finishable);

        let odd = checkout_suggestion(169, true);
        assert!(!odd.finishable && odd.routes.is_empty());
        assert!(odd.note.contains("even number"));

        let one = checkout_suggestion(1, true);
        assert!(!one.finishable);
        assert!(checkout_suggestion(1, false).finishable);
    }
}
