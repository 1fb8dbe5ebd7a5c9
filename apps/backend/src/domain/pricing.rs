//! Board prices.

use crate::errors::domain::{DomainError, ValidationKind};

/// Money in minor units (hundredths of the currency unit).
pub type Money = i64;

/// Minor units per whole currency unit.
pub const MINOR_PER_UNIT: Money = 100;

/// Cost of a board with `field_count` numbers. Each extra field doubles the price.
pub fn price(field_count: u8) -> Result<Money, DomainError> {
    let units = match field_count {
        5 => 20,
        6 => 40,
        7 => 80,
        8 => 160,
        other => {
            return Err(DomainError::validation(
                ValidationKind::InvalidFieldCount,
                format!("No price for a board with {other} numbers"),
            ))
        }
    };
    Ok(units * MINOR_PER_UNIT)
}

/// Render minor units as `units.cents` for log lines and error details.
pub fn format_money(amount: Money) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!(
        "{sign}{}.{:02}",
        abs / MINOR_PER_UNIT as u64,
        abs % MINOR_PER_UNIT as u64
    )
}
