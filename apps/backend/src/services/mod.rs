//! Round engine services. Each method runs inside the caller's transaction.

pub mod accounts;
pub mod autoplay;
pub mod board_ledger;
pub mod game_lifecycle;
pub mod settlement;
