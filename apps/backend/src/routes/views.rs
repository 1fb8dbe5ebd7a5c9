//! JSON shapes returned by the HTTP surface.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::pricing::Money;
use crate::repos::accounts::Account;
use crate::repos::boards::Board;
use crate::repos::rounds::{Round, RoundStatus};
use crate::repos::winners::Winner;
use crate::services::autoplay::{ContinuationOutcome, ContinuationReport};
use crate::services::game_lifecycle::{SettlementSummary, StartedRound};

#[derive(Debug, Serialize)]
pub struct RoundView {
    pub id: i64,
    pub status: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
    pub winning_numbers: Option<Vec<u8>>,
    pub revenue: Money,
    pub prize_pool: Money,
    pub carried_rollover: Money,
    pub rollover_amount: Option<Money>,
}

impl From<Round> for RoundView {
    fn from(round: Round) -> Self {
        Self {
            id: round.id,
            status: match round.status {
                RoundStatus::Open => "OPEN",
                RoundStatus::Closed => "CLOSED",
            },
            started_at: round.started_at,
            ended_at: round.ended_at,
            winning_numbers: round.winning_numbers.map(Vec::from),
            revenue: round.revenue,
            prize_pool: round.prize_pool,
            carried_rollover: round.carried_rollover,
            rollover_amount: round.rollover_amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BoardView {
    pub id: i64,
    pub player_id: i64,
    pub round_id: i64,
    pub numbers: Vec<u8>,
    pub field_count: u8,
    pub cost: Money,
    pub autoplay: bool,
    pub remaining_weeks: u32,
    pub is_winning: bool,
    pub source_board_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Board> for BoardView {
    fn from(board: Board) -> Self {
        Self {
            id: board.id,
            player_id: board.player_id,
            round_id: board.round_id,
            field_count: board.field_count(),
            numbers: board.numbers.into(),
            cost: board.cost,
            autoplay: board.autoplay,
            remaining_weeks: board.remaining_weeks,
            is_winning: board.is_winning,
            source_board_id: board.source_board_id,
            created_at: board.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WinnerView {
    pub player_id: i64,
    pub board_id: i64,
    pub payout: Money,
}

impl From<Winner> for WinnerView {
    fn from(w: Winner) -> Self {
        Self {
            player_id: w.player_id,
            board_id: w.board_id,
            payout: w.payout,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SkippedBoardView {
    pub source_board_id: i64,
    pub player_id: i64,
    pub cost: Money,
}

#[derive(Debug, Serialize)]
pub struct ContinuationView {
    pub source_round_id: Option<i64>,
    pub continued: Vec<BoardView>,
    pub insufficient_balance: Vec<SkippedBoardView>,
}

impl From<ContinuationReport> for ContinuationView {
    fn from(report: ContinuationReport) -> Self {
        let mut continued = Vec::new();
        let mut insufficient_balance = Vec::new();
        for outcome in report.outcomes {
            match outcome {
                ContinuationOutcome::Continued { board, .. } => continued.push(board.into()),
                ContinuationOutcome::InsufficientBalance {
                    source_board_id,
                    player_id,
                    cost,
                } => insufficient_balance.push(SkippedBoardView {
                    source_board_id,
                    player_id,
                    cost,
                }),
            }
        }
        Self {
            source_round_id: report.source_round_id,
            continued,
            insufficient_balance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StartedRoundView {
    pub round: RoundView,
    pub continuation: ContinuationView,
}

impl From<StartedRound> for StartedRoundView {
    fn from(started: StartedRound) -> Self {
        Self {
            round: started.round.into(),
            continuation: started.continuation.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SettlementView {
    pub round_id: i64,
    pub winning_numbers: Vec<u8>,
    pub prize_pool: Money,
    pub winners: Vec<WinnerView>,
    pub rollover_amount: Money,
    pub residue: Money,
}

impl From<SettlementSummary> for SettlementView {
    fn from(s: SettlementSummary) -> Self {
        Self {
            round_id: s.round_id,
            winning_numbers: s.winning_numbers.into(),
            prize_pool: s.prize_pool,
            winners: s.winners.into_iter().map(WinnerView::from).collect(),
            rollover_amount: s.rollover_amount,
            residue: s.residue,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountView {
    pub id: i64,
    pub display_name: String,
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Money>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            role: if account.is_player() { "PLAYER" } else { "ADMIN" },
            balance: account.balance(),
            display_name: account.display_name,
        }
    }
}
