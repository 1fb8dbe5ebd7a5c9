//! DTOs for the boards_sea adapter.

use time::OffsetDateTime;

/// DTO for inserting a board.
#[derive(Debug, Clone)]
pub struct BoardCreate {
    pub player_id: i64,
    pub round_id: i64,
    pub numbers: Vec<u8>,
    pub cost: i64,
    pub remaining_weeks: u32,
    pub source_board_id: Option<i64>,
    pub created_at: OffsetDateTime,
}

/// Filter for a player's board history.
#[derive(Debug, Clone, Default)]
pub struct BoardQuery {
    pub player_id: i64,
    pub round_id: Option<i64>,
    pub limit: u64,
}
