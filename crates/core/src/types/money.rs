//! Non-negative monetary amounts using decimal arithmetic.

use core::fmt;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing a [`Money`] value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The amount is negative.
    #[error("amount cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative monetary amount.
///
/// Prices, line totals, and order totals are all `Money`. The invariant is
/// enforced at construction and on deserialization, so a `Money` value can
/// never hold a negative amount.
///
/// Amounts are stored in the currency's standard unit (e.g. dollars, not
/// cents) and map to `NUMERIC` in PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a `Money` from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Negative`] if the amount is negative.
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a (line item) quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Fully qualified: `Decimal` has an inherent `deserialize([u8; 16])`
        // that would otherwise shadow the serde trait method.
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

// SQLx support (with postgres feature)
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
        // Database values are guarded by CHECK constraints
        Ok(Self(amount))
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
    use rust_decimal::dec;

    #[test]
    fn test_new_rejects_negative() {
        assert!(matches!(
            Money::new(dec!(-0.01)),
            Err(MoneyError::Negative(_))
        ));
    }

    #[test]
    fn test_new_accepts_zero_and_positive() {
        assert!(Money::new(Decimal::ZERO).is_ok());
        assert!(Money::new(dec!(19.99)).is_ok());
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let money = Money::new(dec!(-0.0)).unwrap();
        assert_eq!(money.amount(), Decimal::ZERO);
    }

    #[test]
    fn test_times() {
        let price = Money::new(dec!(100)).unwrap();
        assert_eq!(price.times(2).amount(), dec!(200));
        assert_eq!(price.times(0).amount(), Decimal::ZERO);
    }

    #[test]
    fn test_add() {
        let a = Money::new(dec!(1.50)).unwrap();
        let b = Money::new(dec!(2.25)).unwrap();
        assert_eq!((a + b).amount(), dec!(3.75));
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let result: Result<Money, _> = serde_json::from_str("\"-5\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_accepts_positive() {
        let money: Money = serde_json::from_str("\"12.34\"").unwrap();
        assert_eq!(money.amount(), dec!(12.34));
    }

    #[test]
    fn test_serde_roundtrip() {
        let money = Money::new(dec!(42.50)).unwrap();
        let json = serde_json::to_string(&money).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, money);
    }
}
