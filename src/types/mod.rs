//! Wire and domain types for the level-2 feed.
//!
//! - [`side`] - Book side (buy/sell)
//! - [`messages`] - WebSocket commands and decoded feed messages

pub mod messages;
pub mod side;

use std::str::FromStr;

use rust_decimal::Decimal;

pub use messages::{FeedCommand, FeedMessage};
pub use side::Side;

use crate::error::Error;

/// Price of a level, exact decimal as quoted by the exchange
///
/// The feed sends prices as strings (`"6500.09"`); decoding into a
/// `Decimal` keeps them exact, so two quotes of the same level compare
/// equal regardless of trailing zeros.
pub type Price = Decimal;

/// Resting size at a level
pub type Size = Decimal;

/// Parse a price or size string from the feed
///
/// # Errors
///
/// Returns [`Error::InvalidDecimal`] if `value` is not a decimal number.
pub fn parse_decimal(value: &str) -> Result<Decimal, Error> {
    Decimal::from_str(value).map_err(|source| Error::InvalidDecimal {
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("12.5").unwrap(), dec!(12.5));
        assert_eq!(parse_decimal("0.00000001").unwrap(), dec!(0.00000001));
        assert_eq!(parse_decimal("5.0").unwrap(), parse_decimal("5").unwrap());
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        let err = parse_decimal("abc").unwrap_err();
        assert!(err.is_decode());
        assert!(parse_decimal("").is_err());
    }
}
