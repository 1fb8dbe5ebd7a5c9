//! Weekly StartRound / CloseRound driver.
//!
//! Each schedule runs on its own task and opens a fresh transaction per fire.
//! Failures are logged and the loop keeps going until the token is cancelled.

use std::future::Future;
use std::sync::Arc;

use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::schedule::WeeklySchedule;
use crate::db::txn::with_txn;
use crate::domain::pricing::Money;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

/// Result of one trigger fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started {
        round_id: i64,
        continued: usize,
        skipped: usize,
    },
    Closed {
        round_id: i64,
        winners: usize,
        rollover_amount: Money,
    },
    /// A round was already open; nothing to do.
    AlreadyActive,
    /// No open round (or the operator closed it first).
    NothingToClose,
    /// Round left open because no fallback draw is configured.
    AwaitingOperator { round_id: i64 },
    Failed { code: ErrorCode, detail: String },
}

impl TriggerOutcome {
    fn failed(err: &AppError) -> Self {
        TriggerOutcome::Failed {
            code: err.code(),
            detail: err.to_string(),
        }
    }
}

/// Join handles of the two spawned trigger loops.
pub struct TriggerHandles {
    pub start: JoinHandle<()>,
    pub close: JoinHandle<()>,
}

impl TriggerHandles {
    /// Wait for both loops to stop.
    pub async fn join(self) {
        for (name, handle) in [("start", self.start), ("close", self.close)] {
            if let Err(e) = handle.await {
                error!(trigger = name, error = %e, "Trigger task ended abnormally");
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoundTrigger {
    state: AppState,
    start: WeeklySchedule,
    close: WeeklySchedule,
}

impl RoundTrigger {
    /// Trigger using the schedules from the game config.
    pub fn new(state: AppState) -> Self {
        let start = state.game.start_schedule;
        let close = state.game.close_schedule;
        Self::with_schedules(state, start, close)
    }

    pub fn with_schedules(state: AppState, start: WeeklySchedule, close: WeeklySchedule) -> Self {
        Self {
            state,
            start,
            close,
        }
    }

    /// Start a round unless one is already open.
    pub async fn fire_start(&self, now: OffsetDateTime) -> TriggerOutcome {
        let lifecycle = self.state.lifecycle();
        let result = with_txn(&self.state, move |txn| {
            Box::pin(async move { Ok(lifecycle.start_round(txn, now).await?) })
        })
        .await;

        match result {
            Ok(started) => TriggerOutcome::Started {
                round_id: started.round.id,
                continued: started.continuation.continued(),
                skipped: started.continuation.skipped(),
            },
            Err(e) if e.code() == ErrorCode::RoundAlreadyActive => TriggerOutcome::AlreadyActive,
            Err(e) => TriggerOutcome::failed(&e),
        }
    }

    /// Close the open round with a fallback draw.
    ///
    /// An operator close always wins: if the round is gone by the time this
    /// fires (or while it runs) the fire is a no-op.
    pub async fn fire_close(&self, now: OffsetDateTime) -> TriggerOutcome {
        let lifecycle = self.state.lifecycle();
        let open = {
            let lifecycle = lifecycle.clone();
            with_txn(&self.state, move |txn| {
                Box::pin(async move { Ok(lifecycle.get_active_round(txn).await?) })
            })
            .await
        };
        let round = match open {
            Ok(round) => round,
            Err(e) if e.code() == ErrorCode::NoActiveRound => return TriggerOutcome::NothingToClose,
            Err(e) => return TriggerOutcome::failed(&e),
        };

        let Some(source) = self.state.fallback_source.clone() else {
            return TriggerOutcome::AwaitingOperator { round_id: round.id };
        };
        let numbers = source.draw().as_slice().to_vec();
        let round_id = round.id;
        debug!(round_id, ?numbers, "Fallback numbers drawn");

        let result = with_txn(&self.state, move |txn| {
            Box::pin(async move { Ok(lifecycle.close_round(txn, round_id, &numbers, now).await?) })
        })
        .await;

        match result {
            Ok(summary) => TriggerOutcome::Closed {
                round_id: summary.round_id,
                winners: summary.winners.len(),
                rollover_amount: summary.rollover_amount,
            },
            Err(e)
                if matches!(
                    e.code(),
                    ErrorCode::NoActiveRound | ErrorCode::RoundMismatch
                ) =>
            {
                TriggerOutcome::NothingToClose
            }
            Err(e) => TriggerOutcome::failed(&e),
        }
    }

    /// Spawn both loops. They stop when `token` is cancelled.
    pub fn spawn(self, token: CancellationToken) -> TriggerHandles {
        let trigger = Arc::new(self);

        let starter = trigger.clone();
        let start = tokio::spawn(run_loop("start", trigger.start, token.clone(), move |now| {
            let t = starter.clone();
            async move { t.fire_start(now).await }
        }));

        let closer = trigger.clone();
        let close = tokio::spawn(run_loop("close", trigger.close, token, move |now| {
            let t = closer.clone();
            async move { t.fire_close(now).await }
        }));

        TriggerHandles { start, close }
    }
}

async fn run_loop<F, Fut>(
    name: &'static str,
    schedule: WeeklySchedule,
    token: CancellationToken,
    fire: F,
) where
    F: Fn(OffsetDateTime) -> Fut,
    Fut: Future<Output = TriggerOutcome>,
{
    info!(trigger = name, schedule = %schedule, "Trigger loop started");
    loop {
        let now = OffsetDateTime::now_utc();
        let next = schedule.next_after(now);
        let wait = std::time::Duration::try_from(next - now).unwrap_or_default();
        debug!(trigger = name, next = %next, "Trigger armed");

        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(wait) => {}
        }

        log_outcome(name, &fire(OffsetDateTime::now_utc()).await);
    }
    info!(trigger = name, "Trigger loop stopped");
}

fn log_outcome(name: &'static str, outcome: &TriggerOutcome) {
    match outcome {
        TriggerOutcome::Started {
            round_id,
            continued,
            skipped,
        } => info!(trigger = name, round_id, continued, skipped, "Scheduled start opened a round"),
        TriggerOutcome::Closed {
            round_id,
            winners,
            rollover_amount,
        } => info!(trigger = name, round_id, winners, rollover_amount, "Scheduled close settled a round"),
        TriggerOutcome::AlreadyActive => debug!(trigger = name, "Round already open"),
        TriggerOutcome::NothingToClose => debug!(trigger = name, "No open round to close"),
        TriggerOutcome::AwaitingOperator { round_id } => {
            info!(trigger = name, round_id, "Fallback draw disabled; waiting for operator close")
        }
        TriggerOutcome::Failed { code, detail } => {
            warn!(trigger = name, code = %code, detail = %detail, "Trigger fire failed")
        }
    }
}
