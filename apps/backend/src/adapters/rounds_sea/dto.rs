//! DTOs for the rounds_sea adapter.

use time::OffsetDateTime;

/// DTO for opening a new round.
#[derive(Debug, Clone)]
pub struct RoundCreate {
    pub started_at: OffsetDateTime,
    pub carried_rollover: i64,
}

/// DTO for the Open -> Closed transition.
#[derive(Debug, Clone)]
pub struct RoundClose {
    pub round_id: i64,
    pub ended_at: OffsetDateTime,
    pub winning_numbers: Vec<u8>,
}

/// DTO for writing settlement results onto a closed round.
#[derive(Debug, Clone)]
pub struct RoundSettle {
    pub round_id: i64,
    pub expected_version: i32,
    pub prize_pool: i64,
    pub rollover_amount: i64,
}
