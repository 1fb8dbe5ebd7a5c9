//! How much of a round's money goes to the prize pool.

use std::fmt::Debug;

use super::pricing::Money;

/// Basis points in 100 %.
pub const BPS_SCALE: i64 = 10_000;

/// Derives a round's prize pool from its revenue and the rollover it carried in.
pub trait PrizePoolPolicy: Debug + Send + Sync {
    fn prize_pool(&self, revenue: Money, carried_rollover: Money) -> Money;
}

/// The house keeps all revenue up to `house_floor`, then `house_share_bps`
/// of anything above it. The rest of the revenue plus the carried rollover is
/// paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardPrizePolicy {
    pub house_floor: Money,
    pub house_share_bps: u32,
}

impl Default for StandardPrizePolicy {
    fn default() -> Self {
        Self {
            house_floor: 0,
            house_share_bps: 3_000,
        }
    }
}

impl StandardPrizePolicy {
    pub fn house_take(&self, revenue: Money) -> Money {
        let revenue = revenue.max(0);
        let floor = self.house_floor.max(0);
        let bps = i64::from(self.house_share_bps.min(BPS_SCALE as u32));
        let above = (revenue - floor).max(0);
        // i128 keeps the product exact for any i64 revenue
        let share = (i128::from(above) * i128::from(bps) / i128::from(BPS_SCALE)) as Money;
        revenue.min(floor) + share
    }
}

impl PrizePoolPolicy for StandardPrizePolicy {
    fn prize_pool(&self, revenue: Money, carried_rollover: Money) -> Money {
        carried_rollover.max(0) + revenue.max(0) - self.house_take(revenue)
    }
}
