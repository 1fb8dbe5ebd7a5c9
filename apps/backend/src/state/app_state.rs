use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::game::GameConfig;
use crate::domain::{PrizePoolPolicy, WinningNumberSource};
use crate::services::accounts::AccountService;
use crate::services::board_ledger::BoardLedger;
use crate::services::game_lifecycle::GameLifecycleManager;

/// Shared resources handed to every request handler and the round trigger.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (absent only in tests that never touch storage)
    db: Option<DatabaseConnection>,
    pub game: GameConfig,
    pub prize_policy: Arc<dyn PrizePoolPolicy>,
    /// Draw used by the scheduled close; `None` leaves rounds to the operator.
    pub fallback_source: Option<Arc<dyn WinningNumberSource>>,
}

impl AppState {
    pub fn new(
        db: Option<DatabaseConnection>,
        game: GameConfig,
        prize_policy: Arc<dyn PrizePoolPolicy>,
        fallback_source: Option<Arc<dyn WinningNumberSource>>,
    ) -> Self {
        Self {
            db,
            game,
            prize_policy,
            fallback_source,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn lifecycle(&self) -> GameLifecycleManager {
        GameLifecycleManager::new(self.prize_policy.clone())
    }

    pub fn ledger(&self) -> BoardLedger {
        BoardLedger::new()
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new()
    }
}
