use std::collections::BTreeMap;
use std::sync::Arc;

use sea_orm::DatabaseTransaction;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::autoplay::{AutoplayCoordinator, ContinuationReport};
use super::settlement::SettlementEngine;
use crate::domain::numbers::WinningNumbers;
use crate::domain::pricing::Money;
use crate::domain::prize_policy::PrizePoolPolicy;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::rounds::{self, Round};
use crate::repos::winners::{self, Winner};
use crate::repos::{accounts, boards};

/// A freshly opened round and the autoplay batch entered into it.
#[derive(Debug, Clone, PartialEq)]
pub struct StartedRound {
    pub round: Round,
    pub continuation: ContinuationReport,
}

/// Outcome of closing a round.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementSummary {
    pub round_id: i64,
    pub winning_numbers: WinningNumbers,
    pub prize_pool: Money,
    pub winners: Vec<Winner>,
    /// Carried into the next round: the whole pool without winners, else the residue.
    pub rollover_amount: Money,
    pub residue: Money,
}

/// Owns the Open -> Closed state machine of rounds.
#[derive(Debug, Clone)]
pub struct GameLifecycleManager {
    settlement: SettlementEngine,
    autoplay: AutoplayCoordinator,
}

impl GameLifecycleManager {
    pub fn new(policy: Arc<dyn PrizePoolPolicy>) -> Self {
        Self {
            settlement: SettlementEngine::new(policy),
            autoplay: AutoplayCoordinator::new(),
        }
    }

    /// Open a new round carrying the last rollover, then run autoplay into it.
    pub async fn start_round(
        &self,
        txn: &DatabaseTransaction,
        now: OffsetDateTime,
    ) -> Result<StartedRound, DomainError> {
        if let Some(open) = rounds::find_open(txn).await? {
            return Err(DomainError::conflict(
                ConflictKind::RoundAlreadyActive,
                format!("Round {} is already open", open.id),
            ));
        }

        let carried = rounds::find_latest_closed(txn)
            .await?
            .and_then(|r| r.rollover_amount)
            .unwrap_or(0);

        let round = rounds::create_round(txn, now, carried).await?;
        debug!(round_id = round.id, carried_rollover = carried, "Round opened");

        let continuation = self.autoplay.continue_boards(txn, round.id, now).await?;
        // revenue moved if any boards were continued
        let round = rounds::require_round(txn, round.id).await?;

        info!(
            round_id = round.id,
            carried_rollover = round.carried_rollover,
            revenue = round.revenue,
            continued = continuation.continued(),
            "Round started"
        );
        Ok(StartedRound {
            round,
            continuation,
        })
    }

    /// Close the open round with `winning_numbers`, settle it and pay the winners.
    pub async fn close_round(
        &self,
        txn: &DatabaseTransaction,
        round_id: i64,
        winning_numbers: &[u8],
        now: OffsetDateTime,
    ) -> Result<SettlementSummary, DomainError> {
        let open = rounds::find_open(txn)
            .await?
            .ok_or_else(DomainError::no_active_round)?;
        if open.id != round_id {
            return Err(DomainError::conflict(
                ConflictKind::RoundMismatch,
                format!("Round {round_id} is not the open round (round {} is)", open.id),
            ));
        }
        let winning = WinningNumbers::new(winning_numbers)?;

        // Taken before reading boards: purchases either committed already or now see a closed round.
        if !rounds::close_if_open(txn, round_id, now, &winning).await? {
            return Err(DomainError::no_active_round());
        }

        let round = rounds::require_round(txn, round_id).await?;
        let round_boards = boards::find_by_round(txn, round_id).await?;
        let settlement = self.settlement.settle(&round, &round_boards)?;

        let winning_ids: Vec<i64> = settlement.payouts.iter().map(|p| p.board_id).collect();
        boards::mark_winning(txn, &winning_ids).await?;
        let winners = winners::record_payouts(txn, round_id, &settlement.payouts, now).await?;

        let mut per_player: BTreeMap<i64, Money> = BTreeMap::new();
        for payout in &settlement.payouts {
            *per_player.entry(payout.player_id).or_default() += payout.amount;
        }
        for (player_id, amount) in per_player {
            if amount > 0 {
                accounts::credit(txn, player_id, amount).await?;
            }
        }

        let round =
            rounds::record_settlement(txn, &round, settlement.prize_pool, settlement.rollover)
                .await?;

        info!(
            round_id,
            winning_numbers = %winning,
            boards = round_boards.len(),
            winners = winners.len(),
            prize_pool = round.prize_pool,
            rollover = settlement.rollover,
            "Round closed"
        );

        Ok(SettlementSummary {
            round_id,
            winning_numbers: winning,
            prize_pool: round.prize_pool,
            winners,
            rollover_amount: settlement.rollover,
            residue: settlement.residue,
        })
    }

    pub async fn get_active_round(&self, txn: &DatabaseTransaction) -> Result<Round, DomainError> {
        rounds::find_open(txn)
            .await?
            .ok_or_else(DomainError::no_active_round)
    }

    pub async fn get_round(
        &self,
        txn: &DatabaseTransaction,
        round_id: i64,
    ) -> Result<Round, DomainError> {
        rounds::require_round(txn, round_id).await
    }

    /// Most recent rounds first.
    pub async fn list_rounds(
        &self,
        txn: &DatabaseTransaction,
        limit: u64,
    ) -> Result<Vec<Round>, DomainError> {
        rounds::list_recent(txn, limit).await
    }

    pub async fn list_winners(
        &self,
        txn: &DatabaseTransaction,
        round_id: i64,
    ) -> Result<Vec<Winner>, DomainError> {
        rounds::require_round(txn, round_id).await?;
        winners::find_by_round(txn, round_id).await
    }
}
