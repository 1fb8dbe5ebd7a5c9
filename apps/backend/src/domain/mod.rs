//! Domain layer: pure round rules, no I/O.

pub mod number_source;
pub mod numbers;
pub mod pricing;
pub mod prize_policy;
pub mod settlement;

#[cfg(test)]
mod test_gens;

pub use number_source::{
    FixedNumberSource, RandomNumberSource, SeededNumberSource, WinningNumberSource,
};
pub use numbers::{BoardNumbers, WinningNumbers};
pub use pricing::{price, Money};
pub use prize_policy::{PrizePoolPolicy, StandardPrizePolicy};
pub use settlement::{settle, Entry, Payout, Settlement};
