//! Round rules and trigger settings read from the environment.

use std::env;
use std::str::FromStr;

use crate::domain::pricing::Money;
use crate::domain::StandardPrizePolicy;
use crate::error::AppError;
use crate::scheduler::schedule::WeeklySchedule;

pub const DEFAULT_START_SCHEDULE: &str = "sat 17:05";
pub const DEFAULT_CLOSE_SCHEDULE: &str = "sat 17:00";

/// How the scheduled close obtains winning numbers when the operator has not
/// closed the round in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackDraw {
    /// OS-seeded random draw
    Random,
    /// Deterministic ChaCha8 stream (staging / demos)
    Seeded(u64),
    /// Leave the round open for the operator
    Disabled,
}

impl FromStr for FallbackDraw {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "random" => Ok(FallbackDraw::Random),
            "disabled" | "off" | "none" => Ok(FallbackDraw::Disabled),
            _ => s
                .strip_prefix("seeded:")
                .and_then(|seed| seed.parse::<u64>().ok())
                .map(FallbackDraw::Seeded)
                .ok_or_else(|| {
                    AppError::config(format!(
                        "ROUND_FALLBACK_DRAW must be random | disabled | seeded:<u64>, got '{s}'"
                    ))
                }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub prize_policy: StandardPrizePolicy,
    pub start_schedule: WeeklySchedule,
    pub close_schedule: WeeklySchedule,
    pub fallback_draw: FallbackDraw,
    pub triggers_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            prize_policy: StandardPrizePolicy::default(),
            start_schedule: WeeklySchedule::saturday(17, 5),
            close_schedule: WeeklySchedule::saturday(17, 0),
            fallback_draw: FallbackDraw::Random,
            triggers_enabled: true,
        }
    }
}

impl GameConfig {
    /// Read `POOL_HOUSE_FLOOR`, `POOL_HOUSE_SHARE_BPS`, `ROUND_START_SCHEDULE`,
    /// `ROUND_CLOSE_SCHEDULE`, `ROUND_FALLBACK_DRAW` and `TRIGGERS_ENABLED`.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let house_floor: Money = parse_var("POOL_HOUSE_FLOOR", defaults.prize_policy.house_floor)?;
        if house_floor < 0 {
            return Err(AppError::config("POOL_HOUSE_FLOOR must not be negative"));
        }
        let house_share_bps: u32 =
            parse_var("POOL_HOUSE_SHARE_BPS", defaults.prize_policy.house_share_bps)?;
        if house_share_bps > 10_000 {
            return Err(AppError::config(
                "POOL_HOUSE_SHARE_BPS must be between 0 and 10000",
            ));
        }

        Ok(Self {
            prize_policy: StandardPrizePolicy {
                house_floor,
                house_share_bps,
            },
            start_schedule: schedule_var("ROUND_START_SCHEDULE", DEFAULT_START_SCHEDULE)?,
            close_schedule: schedule_var("ROUND_CLOSE_SCHEDULE", DEFAULT_CLOSE_SCHEDULE)?,
            fallback_draw: match env::var("ROUND_FALLBACK_DRAW") {
                Ok(raw) => raw.parse()?,
                Err(_) => defaults.fallback_draw,
            },
            triggers_enabled: parse_bool("TRIGGERS_ENABLED", defaults.triggers_enabled)?,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("{name} has an invalid value '{raw}'"))),
        Err(_) => Ok(default),
    }
}

fn schedule_var(name: &str, default: &str) -> Result<WeeklySchedule, AppError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|e| AppError::config(format!("{name}: {e}")))
}

fn parse_bool(name: &str, default: bool) -> Result<bool, AppError> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(AppError::config(format!("{name} must be a boolean, got '{raw}'"))),
        },
        Err(_) => Ok(default),
    }
}
