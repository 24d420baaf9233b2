use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::constants::REQUIRED_PLAYERS;
use crate::cricket::CricketLedger;
use crate::dart::Dart;
use crate::rules::MatchRules;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Host-assigned player identity.
    PlayerId
);
id_type!(
    /// Host-assigned leg identity.
    LegId
);
id_type!(
    /// Host-assigned turn identity; also the tie-break for turns sharing a number.
    TurnId
);

/// Darts of one visit, at most three.
pub type Visit = SmallVec<[Dart; 3]>;

/// Position of a player within the match's fixed two-player order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            _ => None,
        }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegStatus {
    Open,
    Finished,
}

/// A recorded visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub id: TurnId,
    pub number: u32,
    pub player: PlayerId,
    pub darts: Visit,
    pub total_scored: u32,
    pub was_bust: bool,
}

/// A visit scored by the orchestrator but not yet assigned an id by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTurn {
    pub number: u32,
    pub player: PlayerId,
    pub darts: Visit,
    pub total_scored: u32,
    pub was_bust: bool,
}

impl NewTurn {
    #[must_use]
    pub fn into_turn(self, id: TurnId) -> Turn {
        Turn {
            id,
            number: self.number,
            player: self.player,
            darts: self.darts,
            total_scored: self.total_scored,
            was_bust: self.was_bust,
        }
    }
}

/// Winner and finish stamps for a leg and its parent match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LegCompletion {
    pub winner: Option<PlayerId>,
    pub finished_at: Option<DateTime<Utc>>,
    pub match_status: MatchStatus,
    pub match_finished_at: Option<DateTime<Utc>>,
}

impl LegCompletion {
    #[must_use]
    pub const fn status(&self) -> LegStatus {
        if self.winner.is_some() {
            LegStatus::Finished
        } else {
            LegStatus::Open
        }
    }

    /// Stamp a winner. The first completed leg completes the match; an
    /// existing match finish time is kept.
    #[must_use]
    pub fn finish(self, winner: PlayerId, now: DateTime<Utc>) -> Self {
        Self {
            winner: Some(winner),
            finished_at: Some(now),
            match_status: MatchStatus::Completed,
            match_finished_at: self.match_finished_at.or(Some(now)),
        }
    }

    #[must_use]
    pub fn reopen() -> Self {
        Self::default()
    }
}

/// Everything the orchestrator needs to score a leg, as loaded by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegSnapshot {
    pub id: LegId,
    pub rules: MatchRules,
    pub players: Vec<PlayerId>,
    pub starting_player: PlayerId,
    #[serde(default)]
    pub turns: Vec<Turn>,
    #[serde(default)]
    pub ledger: Option<CricketLedger>,
    #[serde(default)]
    pub completion: LegCompletion,
}

impl LegSnapshot {
    #[must_use]
    pub fn new(
        id: LegId,
        rules: MatchRules,
        players: Vec<PlayerId>,
        starting_player: PlayerId,
    ) -> Self {
        Self {
            id,
            rules: rules.normalized(),
            players,
            starting_player,
            turns: Vec::new(),
            ledger: None,
            completion: LegCompletion::default(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> LegStatus {
        self.completion.status()
    }

    #[must_use]
    pub fn has_supported_roster(&self) -> bool {
        self.players.len() == REQUIRED_PLAYERS
    }

    /// Turns ordered by turn number, ties broken by id.
    #[must_use]
    pub fn ordered_turns(&self) -> Vec<&Turn> {
        let mut turns: Vec<&Turn> = self.turns.iter().collect();
        turns.sort_by_key(|turn| (turn.number, turn.id));
        turns
    }

    #[must_use]
    pub fn next_turn_number(&self) -> u32 {
        self.turns
            .iter()
            .map(|turn| turn.number)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }

    /// The player due to throw next.
    ///
    /// The starting player opens the leg (or the first listed player if the
    /// starting player is not on the roster); afterwards play rotates from
    /// whoever threw the most recent turn.
    #[must_use]
    pub fn active_player(&self) -> Option<PlayerId> {
        let Some(last) = self.ordered_turns().last().map(|turn| turn.player) else {
            return self
                .players
                .iter()
                .copied()
                .find(|player| *player == self.starting_player)
                .or_else(|| self.players.first().copied());
        };
        let last_index = self.players.iter().position(|player| *player == last)?;
        let next_index = (last_index + 1) % self.players.len();
        self.players.get(next_index).copied()
    }

    #[must_use]
    pub fn seat_of(&self, player: PlayerId) -> Option<Seat> {
        self.players
            .iter()
            .position(|candidate| *candidate == player)
            .and_then(Seat::from_index)
    }

    /// Sum of non-bust turn totals for one player.
    #[must_use]
    pub fn scored_by(&self, player: PlayerId) -> u32 {
        self.turns
            .iter()
            .filter(|turn| turn.player == player && !turn.was_bust)
            .map(|turn| turn.total_scored)
            .sum()
    }

    #[must_use]
    pub fn darts_thrown_by(&self, player: PlayerId) -> usize {
        self.turns
            .iter()
            .filter(|turn| turn.player == player)
            .map(|turn| turn.darts.len())
            .sum()
    }

    /// X01 remaining score, derived from retained turns.
    #[must_use]
    pub fn remaining_for(&self, player: PlayerId) -> u32 {
        self.rules
            .target_score
            .saturating_sub(self.scored_by(player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    const ALICE: PlayerId = PlayerId(1);
    const BOB: PlayerId = PlayerId(2);

    fn turn(id: u64, number: u32, player: PlayerId) -> Turn {
        Turn {
            id: TurnId(id),
            number,
            player,
            darts: smallvec![Dart::new(1, 20).unwrap()],
            total_scored: 20,
            was_bust: false,
        }
    }

    fn snapshot(starting: PlayerId) -> LegSnapshot {
        LegSnapshot::new(LegId(1), MatchRules::default(), vec![ALICE, BOB], starting)
    }

    #[test]
    fn starting_player_opens_the_leg() {
        assert_eq!(snapshot(BOB).active_player(), Some(BOB));
        assert_eq!(snapshot(PlayerId(99)).active_player(), Some(ALICE));
    }

    #[test]
    fn rotation_follows_most_recent_turn() {
        let mut leg = snapshot(ALICE);
        leg.turns.push(turn(10, 1, ALICE));
        assert_eq!(leg.active_player(), Some(BOB));
        leg.turns.push(turn(11, 2, BOB));
        assert_eq!(leg.active_player(), Some(ALICE));
        assert_eq!(leg.next_turn_number(), 3);
    }

    #[test]
    fn shared_turn_numbers_break_ties_by_id() {
        let mut leg = snapshot(ALICE);
        leg.turns.push(turn(8, 2, ALICE));
        leg.turns.push(turn(5, 2, BOB));
        leg.turns.push(turn(3, 1, ALICE));
        let ids: Vec<u64> = leg.ordered_turns().iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![3, 5, 8]);
        assert_eq!(leg.active_player(), Some(BOB));
    }

    #[test]
    fn remaining_ignores_busts() {
        let mut leg = snapshot(ALICE);
        leg.turns.push(turn(1, 1, ALICE));
        let mut bust = turn(2, 3, ALICE);
        bust.was_bust = true;
        bust.total_scored = 0;
        leg.turns.push(bust);
        assert_eq!(leg.remaining_for(ALICE), 481);
        assert_eq!(leg.remaining_for(BOB), 501);
        assert_eq!(leg.darts_thrown_by(ALICE), 2);
    }

    #[test]
    fn completion_keeps_existing_match_finish() {
        let earlier = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let now = DateTime::<Utc>::from_timestamp(1_700_000_500, 0).unwrap();
        let completion = LegCompletion {
            match_finished_at: Some(earlier),
            ..LegCompletion::default()
        }
        .finish(BOB, now);
        assert_eq!(completion.status(), LegStatus::Finished);
        assert_eq!(completion.finished_at, Some(now));
        assert_eq!(completion.match_finished_at, Some(earlier));
        assert_eq!(completion.match_status, MatchStatus::Completed);
        assert_eq!(LegCompletion::reopen().status(), LegStatus::Open);
    }
}
