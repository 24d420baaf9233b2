//! Cricket marks and points.
//!
//! The ledger is a pair of per-player entries indexed by [`Seat`], so the
//! processor can read the opponent's counters while mutating the thrower's
//! without any shared ownership between the two.
use serde::{Deserialize, Serialize};

use crate::constants::{
    BULL_BASE_SCORE, CRICKET_MARKS_TO_CLOSE, INNER_BULL_CRICKET_MARKS, INNER_BULL_SEGMENT,
    OUTER_BULL_MAX_MULTIPLIER, OUTER_BULL_SEGMENT,
};
use crate::dart::Dart;
use crate::state::{PlayerId, Seat};

/// The seven numbers that count in Cricket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CricketNumber {
    Fifteen,
    Sixteen,
    Seventeen,
    Eighteen,
    Nineteen,
    Twenty,
    Bull,
}

impl CricketNumber {
    pub const ALL: [Self; 7] = [
        Self::Fifteen,
        Self::Sixteen,
        Self::Seventeen,
        Self::Eighteen,
        Self::Nineteen,
        Self::Twenty,
        Self::Bull,
    ];

    /// Map a board segment to its Cricket number; other segments are misses.
    #[must_use]
    pub const fn from_segment(segment: u8) -> Option<Self> {
        match segment {
            15 => Some(Self::Fifteen),
            16 => Some(Self::Sixteen),
            17 => Some(Self::Seventeen),
            18 => Some(Self::Eighteen),
            19 => Some(Self::Nineteen),
            20 => Some(Self::Twenty),
            OUTER_BULL_SEGMENT | INNER_BULL_SEGMENT => Some(Self::Bull),
            _ => None,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Points for each scoring mark on this number.
    #[must_use]
    pub const fn base_value(self) -> u32 {
        match self {
            Self::Fifteen => 15,
            Self::Sixteen => 16,
            Self::Seventeen => 17,
            Self::Eighteen => 18,
            Self::Nineteen => 19,
            Self::Twenty => 20,
            Self::Bull => BULL_BASE_SCORE,
        }
    }
}

/// Marks a dart earns on its Cricket number.
#[must_use]
pub fn marks_for_dart(dart: Dart) -> u8 {
    match dart.segment() {
        INNER_BULL_SEGMENT => INNER_BULL_CRICKET_MARKS,
        OUTER_BULL_SEGMENT => dart.multiplier().min(OUTER_BULL_MAX_MULTIPLIER),
        _ => dart.multiplier(),
    }
}

/// One player's Cricket counters for a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CricketPlayerLedger {
    pub player: PlayerId,
    pub marks: [u8; 7],
    pub points: u32,
}

impl CricketPlayerLedger {
    #[must_use]
    pub const fn new(player: PlayerId) -> Self {
        Self {
            player,
            marks: [0; 7],
            points: 0,
        }
    }

    #[must_use]
    pub const fn marks_on(&self, number: CricketNumber) -> u8 {
        self.marks[number.index()]
    }

    #[must_use]
    pub const fn has_closed(&self, number: CricketNumber) -> bool {
        self.marks_on(number) >= CRICKET_MARKS_TO_CLOSE
    }

    #[must_use]
    pub fn has_closed_all(&self) -> bool {
        CricketNumber::ALL
            .iter()
            .all(|number| self.has_closed(*number))
    }

    pub const fn reset(&mut self) {
        self.marks = [0; 7];
        self.points = 0;
    }
}

/// Both players' counters, indexed by seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CricketLedger {
    seats: [CricketPlayerLedger; 2],
}

impl CricketLedger {
    #[must_use]
    pub const fn new(first: PlayerId, second: PlayerId) -> Self {
        Self {
            seats: [
                CricketPlayerLedger::new(first),
                CricketPlayerLedger::new(second),
            ],
        }
    }

    /// Build an empty ledger for a two-player roster.
    #[must_use]
    pub fn for_players(players: &[PlayerId]) -> Option<Self> {
        match players {
            [first, second] => Some(Self::new(*first, *second)),
            _ => None,
        }
    }

    #[must_use]
    pub const fn seat(&self, seat: Seat) -> &CricketPlayerLedger {
        &self.seats[seat.index()]
    }

    #[must_use]
    pub fn entry_for(&self, player: PlayerId) -> Option<&CricketPlayerLedger> {
        self.seats.iter().find(|entry| entry.player == player)
    }

    #[must_use]
    pub fn entries(&self) -> &[CricketPlayerLedger; 2] {
        &self.seats
    }

    /// Seat holding `player`'s counters, if the ledger tracks them.
    #[must_use]
    pub fn seat_of(&self, player: PlayerId) -> Option<Seat> {
        self.seats
            .iter()
            .position(|entry| entry.player == player)
            .and_then(Seat::from_index)
    }

    /// Whether the ledger tracks exactly this roster, in any seat order.
    #[must_use]
    pub fn tracks(&self, players: &[PlayerId]) -> bool {
        players.len() == self.seats.len()
            && players.iter().all(|player| self.seat_of(*player).is_some())
    }

    /// The thrower's entry mutably alongside the opponent's entry.
    fn split_for(&mut self, seat: Seat) -> (&mut CricketPlayerLedger, &CricketPlayerLedger) {
        let [first, second] = &mut self.seats;
        match seat {
            Seat::First => (first, &*second),
            Seat::Second => (second, &*first),
        }
    }

    pub fn reset(&mut self) {
        for entry in &mut self.seats {
            entry.reset();
        }
    }

    /// Whether `seat` has closed every number without trailing on points.
    ///
    /// Evaluated only for the seat that just threw, so level points go to the
    /// player completing their closure.
    #[must_use]
    pub fn is_winner(&self, seat: Seat) -> bool {
        let player = self.seat(seat);
        let opponent = self.seat(seat.opponent());
        player.has_closed_all() && player.points >= opponent.points
    }
}

/// Result of applying one visit to a Cricket ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CricketTurnOutcome {
    pub total_scored: u32,
    pub did_finish: bool,
}

/// Apply a visit for the player in `seat`, mutating only that seat's entry.
pub fn process_cricket_turn(
    ledger: &mut CricketLedger,
    seat: Seat,
    darts: &[Dart],
) -> CricketTurnOutcome {
    let mut total_scored = 0;
    {
        let (player, opponent) = ledger.split_for(seat);
        for dart in darts {
            let Some(number) = CricketNumber::from_segment(dart.segment()) else {
                continue;
            };
            let combined = player.marks_on(number) + marks_for_dart(*dart);
            let overflow = combined.saturating_sub(CRICKET_MARKS_TO_CLOSE);
            player.marks[number.index()] = combined.min(CRICKET_MARKS_TO_CLOSE);

            if overflow > 0 && !opponent.has_closed(number) {
                let points = u32::from(overflow) * number.base_value();
                player.points += points;
                total_scored += points;
            }
        }
    }

    CricketTurnOutcome {
        total_scored,
        did_finish: ledger.is_winner(seat),
    }
}
