use std::sync::Arc;

use crate::config::db::{DbKind, RuntimeEnv};
use crate::config::game::{FallbackDraw, GameConfig};
use crate::domain::{
    PrizePoolPolicy, RandomNumberSource, SeededNumberSource, WinningNumberSource,
};
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;

/// Builder for `AppState` (used by `main` and by tests)
pub struct StateBuilder {
    env: RuntimeEnv,
    db_kind: Option<DbKind>,
    game: GameConfig,
    prize_policy: Option<Arc<dyn PrizePoolPolicy>>,
    number_source: Option<Option<Arc<dyn WinningNumberSource>>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            env: RuntimeEnv::Test,
            db_kind: None,
            game: GameConfig::default(),
            prize_policy: None,
            number_source: None,
        }
    }

    pub fn with_env(mut self, env: RuntimeEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_db(mut self, db_kind: DbKind) -> Self {
        self.db_kind = Some(db_kind);
        self
    }

    pub fn with_game_config(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    /// Override the policy derived from the game config.
    pub fn with_prize_policy(mut self, policy: Arc<dyn PrizePoolPolicy>) -> Self {
        self.prize_policy = Some(policy);
        self
    }

    /// Override the fallback draw derived from the game config; `None` disables it.
    pub fn with_number_source(mut self, source: Option<Arc<dyn WinningNumberSource>>) -> Self {
        self.number_source = Some(source);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let db = match self.db_kind {
            Some(kind) => Some(bootstrap_db(self.env, kind).await?),
            None => None,
        };

        let prize_policy = self
            .prize_policy
            .unwrap_or_else(|| Arc::new(self.game.prize_policy) as Arc<dyn PrizePoolPolicy>);

        let fallback_source = self
            .number_source
            .unwrap_or_else(|| source_for(self.game.fallback_draw));

        Ok(AppState::new(db, self.game, prize_policy, fallback_source))
    }
}

fn source_for(draw: FallbackDraw) -> Option<Arc<dyn WinningNumberSource>> {
    match draw {
        FallbackDraw::Random => Some(Arc::new(RandomNumberSource)),
        FallbackDraw::Seeded(seed) => Some(Arc::new(SeededNumberSource::new(seed))),
        FallbackDraw::Disabled => None,
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
