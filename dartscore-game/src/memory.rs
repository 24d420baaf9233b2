//! In-memory leg store for tests, the tester and embedding hosts without a
//! database.
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::rc::Rc;
use thiserror::Error;

use crate::rules::RulesError;
use crate::state::{LegId, LegSnapshot, NewTurn, TurnId};
use crate::{LegEffects, LegLoader, LegSink};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("leg {0} is already stored")]
    DuplicateLeg(LegId),
    #[error("leg {0} is not stored")]
    UnknownLeg(LegId),
    #[error("turn {turn} is not part of leg {leg}")]
    UnknownTurn { leg: LegId, turn: TurnId },
    #[error("turn {0} is already stored")]
    DuplicateTurn(TurnId),
    #[error(transparent)]
    Rules(#[from] RulesError),
}

#[derive(Debug, Default)]
struct StoreInner {
    legs: BTreeMap<LegId, LegSnapshot>,
    turn_index: HashMap<TurnId, LegId>,
    last_turn_id: u64,
}

/// Single-threaded store implementing both [`LegLoader`] and [`LegSink`].
///
/// Clones share the same storage, so the engine can hold one handle for
/// loading and one for committing while the caller keeps another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a leg. Rules are validated and normalized; any turns already on
    /// the snapshot are indexed and later ids continue after the highest one.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules are invalid, the leg id is taken, or a
    /// seeded turn id is already stored.
    pub fn insert_leg(&self, mut leg: LegSnapshot) -> Result<(), MemoryStoreError> {
        leg.rules.validate()?;
        leg.rules = leg.rules.normalized();

        let mut inner = self.inner.borrow_mut();
        if inner.legs.contains_key(&leg.id) {
            return Err(MemoryStoreError::DuplicateLeg(leg.id));
        }
        if let Some(turn) = leg
            .turns
            .iter()
            .find(|turn| inner.turn_index.contains_key(&turn.id))
        {
            return Err(MemoryStoreError::DuplicateTurn(turn.id));
        }
        for turn in &leg.turns {
            inner.turn_index.insert(turn.id, leg.id);
            inner.last_turn_id = inner.last_turn_id.max(turn.id.0);
        }
        inner.legs.insert(leg.id, leg);
        Ok(())
    }

    /// A copy of the stored leg.
    #[must_use]
    pub fn snapshot(&self, leg: LegId) -> Option<LegSnapshot> {
        self.inner.borrow().legs.get(&leg).cloned()
    }

    #[must_use]
    pub fn leg_count(&self) -> usize {
        self.inner.borrow().legs.len()
    }

    #[must_use]
    pub fn turn_count(&self) -> usize {
        self.inner.borrow().turn_index.len()
    }
}

fn apply_effects(leg: &mut LegSnapshot, effects: &LegEffects) {
    leg.ledger = effects.ledger;
    leg.completion = effects.completion;
}

impl LegLoader for MemoryStore {
    type Error = Infallible;

    fn load_leg(&self, leg: LegId) -> Result<Option<LegSnapshot>, Self::Error> {
        Ok(self.snapshot(leg))
    }

    fn find_turn(&self, turn: TurnId) -> Result<Option<LegId>, Self::Error> {
        Ok(self.inner.borrow().turn_index.get(&turn).copied())
    }
}

impl LegSink for MemoryStore {
    type Error = MemoryStoreError;

    fn append_turn(
        &self,
        leg: LegId,
        turn: &NewTurn,
        effects: &LegEffects,
    ) -> Result<TurnId, Self::Error> {
        let mut inner = self.inner.borrow_mut();
        let id = TurnId(inner.last_turn_id + 1);
        let stored = inner
            .legs
            .get_mut(&leg)
            .ok_or(MemoryStoreError::UnknownLeg(leg))?;
        stored.turns.push(turn.clone().into_turn(id));
        apply_effects(stored, effects);
        inner.turn_index.insert(id, leg);
        inner.last_turn_id = id.0;
        Ok(id)
    }

    fn remove_turn(
        &self,
        leg: LegId,
        turn: TurnId,
        effects: &LegEffects,
    ) -> Result<(), Self::Error> {
        let mut inner = self.inner.borrow_mut();
        let stored = inner
            .legs
            .get_mut(&leg)
            .ok_or(MemoryStoreError::UnknownLeg(leg))?;
        let Some(position) = stored.turns.iter().position(|t| t.id == turn) else {
            return Err(MemoryStoreError::UnknownTurn { leg, turn });
        };
        stored.turns.remove(position);
        apply_effects(stored, effects);
        inner.turn_index.remove(&turn);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dart::Dart;
    use crate::rules::MatchRules;
    use crate::state::{LegCompletion, PlayerId, Turn};
    use smallvec::smallvec;

    const ALICE: PlayerId = PlayerId(1);
    const BOB: PlayerId = PlayerId(2);

    fn new_turn(number: u32) -> NewTurn {
        NewTurn {
            number,
            player: ALICE,
            darts: smallvec![Dart::new(1, 20).unwrap()],
            total_scored: 20,
            was_bust: false,
        }
    }

    fn effects() -> LegEffects {
        LegEffects {
            ledger: None,
            completion: LegCompletion::default(),
        }
    }

    #[test]
    fn turn_ids_increase_across_legs() {
        let store = MemoryStore::new();
        for id in [1, 2] {
            store
                .insert_leg(LegSnapshot::new(LegId(id), MatchRules::default(), vec![ALICE, BOB], ALICE))
                .unwrap();
        }
        let first = store.append_turn(LegId(1), &new_turn(1), &effects()).unwrap();
        let second = store.append_turn(LegId(2), &new_turn(1), &effects()).unwrap();
        assert!(second > first);
        assert_eq!(store.find_turn(second).unwrap(), Some(LegId(2)));
        assert_eq!(store.turn_count(), 2);
    }

    #[test]
    fn seeded_turns_push_the_id_counter() {
        let store = MemoryStore::new();
        let mut leg = LegSnapshot::new(LegId(1), MatchRules::default(), vec![ALICE, BOB], ALICE);
        leg.turns.push(Turn {
            id: TurnId(40),
            number: 1,
            player: ALICE,
            darts: smallvec![Dart::new(1, 1).unwrap()],
            total_scored: 1,
            was_bust: false,
        });
        store.insert_leg(leg).unwrap();
        let id = store.append_turn(LegId(1), &new_turn(2), &effects()).unwrap();
        assert_eq!(id, TurnId(41));
    }

    #[test]
    fn rejects_bad_seeds_and_unknown_targets() {
        let store = MemoryStore::new();
        let leg = LegSnapshot::new(LegId(1), MatchRules::x01(20_000, true), vec![ALICE, BOB], ALICE);
        assert!(matches!(store.insert_leg(leg), Err(MemoryStoreError::Rules(_))));

        let leg = LegSnapshot::new(LegId(1), MatchRules::default(), vec![ALICE, BOB], ALICE);
        store.insert_leg(leg.clone()).unwrap();
        assert_eq!(store.insert_leg(leg), Err(MemoryStoreError::DuplicateLeg(LegId(1))));

        assert_eq!(
            store.append_turn(LegId(9), &new_turn(1), &effects()),
            Err(MemoryStoreError::UnknownLeg(LegId(9)))
        );
        assert_eq!(
            store.remove_turn(LegId(1), TurnId(3), &effects()),
            Err(MemoryStoreError::UnknownTurn {
                leg: LegId(1),
                turn: TurnId(3)
            })
        );
    }

    #[test]
    fn removal_unindexes_the_turn() {
        let store = MemoryStore::new();
        store
            .insert_leg(LegSnapshot::new(LegId(1), MatchRules::default(), vec![ALICE, BOB], ALICE))
            .unwrap();
        let id = store.append_turn(LegId(1), &new_turn(1), &effects()).unwrap();
        store.remove_turn(LegId(1), id, &effects()).unwrap();
        assert_eq!(store.find_turn(id).unwrap(), None);
        assert!(store.snapshot(LegId(1)).unwrap().turns.is_empty());
    }
}
