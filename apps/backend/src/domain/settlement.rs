//! Winner determination and payout split for a closed round.

use super::numbers::{BoardNumbers, WinningNumbers};
use super::pricing::Money;

/// One board as seen by settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub board_id: i64,
    pub player_id: i64,
    pub numbers: BoardNumbers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub board_id: i64,
    pub player_id: i64,
    pub amount: Money,
}

/// Result of settling one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub prize_pool: Money,
    /// One payout per winning board, in board-id order.
    pub payouts: Vec<Payout>,
    /// Amount carried into the next round.
    pub rollover: Money,
    /// Part of the pool that did not divide evenly among winners (included in `rollover`).
    pub residue: Money,
}

impl Settlement {
    pub fn has_winners(&self) -> bool {
        !self.payouts.is_empty()
    }
}

/// Split `prize_pool` evenly among the boards matching `winning`.
///
/// With no winners the whole pool rolls over. Otherwise every winning board
/// gets `pool / winners`; the remainder rolls over.
pub fn settle(prize_pool: Money, winning: &WinningNumbers, entries: &[Entry]) -> Settlement {
    let prize_pool = prize_pool.max(0);
    let mut winners: Vec<&Entry> = entries
        .iter()
        .filter(|e| winning.matched_by(&e.numbers))
        .collect();
    winners.sort_by_key(|e| e.board_id);

    if winners.is_empty() {
        return Settlement {
            prize_pool,
            payouts: Vec::new(),
            rollover: prize_pool,
            residue: 0,
        };
    }

    let count = winners.len() as Money;
    let share = prize_pool / count;
    let residue = prize_pool % count;

    Settlement {
        prize_pool,
        payouts: winners
            .into_iter()
            .map(|e| Payout {
                board_id: e.board_id,
                player_id: e.player_id,
                amount: share,
            })
            .collect(),
        rollover: residue,
        residue,
    }
}
