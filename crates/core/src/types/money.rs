//! Store-currency amounts using decimal arithmetic.
//!
//! The shop trades in a single currency, so an amount is just a non-negative
//! decimal with two fractional digits. Floats never appear in price math.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing or combining [`Money`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    /// Amounts are never negative.
    #[error("amount cannot be negative")]
    Negative,
    /// The result exceeds [`Money::MAX`].
    #[error("amount cannot exceed 9999999999.99")]
    Overflow,
}

/// A non-negative amount rounded to cents.
///
/// Serialized as a decimal string (`"1299.00"`); deserializes from either a
/// JSON number or a string.
///
/// ```
/// use lumina_core::Money;
/// use rust_decimal::Decimal;
///
/// let unit = Money::new(Decimal::new(129_999, 2)).unwrap();
/// assert_eq!(unit.times(3).unwrap().to_string(), "3899.97");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Zero, carrying two decimal places like every other amount.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, 2));

    /// Largest amount a `NUMERIC(12,2)` column holds: 9,999,999,999.99.
    ///
    /// Products, line totals and order totals are all kept at or below it.
    pub const MAX: Self = Self(Decimal::from_parts(3_567_587_327, 232, 0, false, 2));

    /// Create an amount, rounding half away from zero to two decimal places
    /// (the same rule as Postgres `NUMERIC`).
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Negative` for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative);
        }
        let mut amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(2);
        Ok(Self(amount))
    }

    /// Create an amount from whole cents.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Negative` for negative input.
    pub fn from_cents(cents: i64) -> Result<Self, MoneyError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The underlying decimal.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether the amount fits a stored price or total.
    #[must_use]
    pub fn is_storable(&self) -> bool {
        *self <= Self::MAX
    }

    /// Multiply by a line quantity.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the result exceeds [`Money::MAX`].
    pub fn times(self, quantity: u32) -> Result<Self, MoneyError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Self)
            .filter(Self::is_storable)
            .ok_or(MoneyError::Overflow)
    }

    /// Add two amounts.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the sum exceeds [`Money::MAX`].
    pub fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .filter(Self::is_storable)
            .ok_or(MoneyError::Overflow)
    }
}

/// The price a customer actually pays: the sale price when one is set,
/// otherwise the list price.
#[must_use]
pub fn effective_price(price: Money, sale_price: Option<Money>) -> Money {
    sale_price.unwrap_or(price)
}

impl Add for Money {
    type Output = Self;

    /// Saturates at `Decimal::MAX`; use [`Money::checked_add`] where overflow matters.
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Money {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Money {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn money(cents: i64) -> Money {
        Money::from_cents(cents).unwrap()
    }

    #[test]
    fn test_rounds_to_cents() {
        let m = Money::new(Decimal::new(12_345, 3)).unwrap();
        assert_eq!(m.to_string(), "12.35");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(Money::new(Decimal::new(12_355, 3)).unwrap().to_string(), "12.36");
        assert_eq!(Money::new(Decimal::new(12_344, 3)).unwrap().to_string(), "12.34");
        assert_eq!(Money::new(Decimal::new(5, 3)).unwrap().to_string(), "0.01");
    }

    #[test]
    fn test_max_matches_numeric_12_2() {
        assert_eq!(Money::MAX.to_string(), "9999999999.99");
        assert!(Money::MAX.is_storable());
        assert!(!Money::new(Decimal::new(100_000_000_000, 0)).unwrap().is_storable());
    }

    #[test]
    fn test_arithmetic_stays_within_max() {
        // 20,000,000.00 x 999 would be 19,980,000,000.00
        assert_eq!(money(2_000_000_000).times(999), Err(MoneyError::Overflow));
        assert_eq!(money(2_000_000_000).times(499).unwrap().to_string(), "9980000000.00");
        assert_eq!(Money::MAX.checked_add(money(1)), Err(MoneyError::Overflow));
        assert_eq!(Money::MAX.checked_add(Money::ZERO), Ok(Money::MAX));
    }

    #[test]
    fn test_serializes_with_two_places() {
        let m = Money::new(Decimal::from(1599)).unwrap();
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"1599.00\"");
    }

    #[test]
    fn test_rejects_negative() {
        assert_eq!(Money::from_cents(-1), Err(MoneyError::Negative));
        assert!(Money::new(Decimal::ZERO).unwrap().is_zero());
        assert_eq!(serde_json::to_string(&Money::ZERO).unwrap(), "\"0.00\"");
    }

    #[test]
    fn test_sale_price_wins() {
        assert_eq!(effective_price(money(159_900), Some(money(129_900))), money(129_900));
        assert_eq!(effective_price(money(84_900), None), money(84_900));
    }

    #[test]
    fn test_sum_and_times() {
        let total: Money = [money(129_900).times(2).unwrap(), money(54_900)]
            .into_iter()
            .sum();
        assert_eq!(total, money(314_700));
    }

    #[test]
    fn test_json_accepts_numbers_and_strings() {
        let from_number: Money = serde_json::from_str("1599").unwrap();
        let from_string: Money = serde_json::from_str("\"1599.00\"").unwrap();
        assert_eq!(from_number, from_string);
        assert!(serde_json::from_str::<Money>("-5").is_err());
    }
}
