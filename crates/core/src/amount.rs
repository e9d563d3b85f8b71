//! Amount - Unsigned token amount in base units
//!
//! Amounts are unsigned by construction, so a balance can never go negative;
//! every subtraction goes through `checked_sub` and surfaces as an error
//! instead of wrapping.

use rust_decimal::Decimal;
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A token amount in base units (no decimal shift applied).
///
/// `Amount::MAX` is also the "unlimited" allowance sentinel.
///
/// # Example
/// ```
/// use idtoken_core::Amount;
///
/// let a = Amount::new(100);
/// let b = Amount::new(30);
/// assert_eq!(a.checked_sub(b), Some(Amount::new(70)));
///
/// // Underflow is rejected
/// assert!(b.checked_sub(a).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u128);

impl Amount {
    /// Zero amount constant
    pub const ZERO: Self = Self(0);

    /// Largest representable amount; as an allowance it means "unlimited"
    pub const MAX: Self = Self(u128::MAX);

    #[inline]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Get the inner value
    #[inline]
    pub const fn value(&self) -> u128 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if this is the unlimited allowance sentinel
    #[inline]
    pub fn is_unlimited(&self) -> bool {
        self.0 == u128::MAX
    }

    /// Addition, `None` on overflow
    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Subtraction, `None` if the result would be negative
    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Convert base units to display units, shifting by `decimals`.
    ///
    /// Returns `None` when the value does not fit a `Decimal` (96-bit
    /// mantissa) or `decimals` exceeds the supported scale.
    pub fn to_decimal(&self, decimals: u8) -> Option<Decimal> {
        let raw = i128::try_from(self.0).ok()?;
        Decimal::try_from_i128_with_scale(raw, u32::from(decimals)).ok()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}

impl From<Amount> for u128 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

// Serialized as a decimal string so values above 2^53 survive JSON tooling.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

/// Accepts JSON integers, decimal strings and `"max"`.
struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative integer, a decimal string or \"max\"")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        Ok(Amount::from(value))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<Amount, E> {
        Ok(Amount(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        u128::try_from(value)
            .map(Amount)
            .map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
        if value.eq_ignore_ascii_case("max") {
            return Ok(Amount::MAX);
        }
        value
            .parse::<u128>()
            .map(Amount)
            .map_err(|e| E::custom(format!("invalid amount {value:?}: {e}")))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
