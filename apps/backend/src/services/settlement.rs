use std::sync::Arc;

use crate::domain::prize_policy::PrizePoolPolicy;
use crate::domain::pricing::Money;
use crate::domain::settlement::{self, Entry, Settlement};
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::boards::Board;
use crate::repos::rounds::Round;

/// Winner determination for a closed round, with a pluggable prize-pool policy.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    policy: Arc<dyn PrizePoolPolicy>,
}

impl SettlementEngine {
    pub fn new(policy: Arc<dyn PrizePoolPolicy>) -> Self {
        Self { policy }
    }

    pub fn prize_pool(&self, round: &Round) -> Money {
        self.policy.prize_pool(round.revenue, round.carried_rollover)
    }

    /// Settle `round` over its `boards`. Boards of other rounds are ignored.
    pub fn settle(&self, round: &Round, boards: &[Board]) -> Result<Settlement, DomainError> {
        let winning = round.winning_numbers.as_ref().ok_or_else(|| {
            DomainError::conflict(
                ConflictKind::Other("RoundNotClosed".into()),
                format!("Round {} has no winning numbers yet", round.id),
            )
        })?;
        let entries: Vec<Entry> = boards
            .iter()
            .filter(|b| b.round_id == round.id)
            .map(Board::entry)
            .collect();
        Ok(settlement::settle(self.prize_pool(round), winning, &entries))
    }
}
