//! Type-safe price representation using decimal arithmetic.
//!
//! The shop sells in Vietnamese đồng, which has no minor unit in practice, so
//! amounts are whole numbers. The backend sends them as JSON numbers (integer
//! for catalog reads, float for recommendation payloads); both deserialize.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// ISO 4217 currency codes accepted by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    VND,
    USD,
}

impl CurrencyCode {
    /// Symbol used when rendering an amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::VND => "₫",
            Self::USD => "$",
        }
    }
}

/// A price in the shop currency.
///
/// Serializes as a bare JSON number so it round-trips with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price {
    amount: Decimal,
}

impl Price {
    /// Create a price from a decimal amount of đồng.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self { amount }
    }

    /// Create a price from a whole number of đồng.
    #[must_use]
    pub fn from_vnd(amount: i64) -> Self {
        Self {
            amount: Decimal::from(amount),
        }
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Multiply by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
        }
    }

    /// Format for display, e.g. `500.000₫`.
    ///
    /// Fractions are rounded away; negative amounts keep their sign.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.amount.round();
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = rounded.abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if negative { "-" } else { "" };
        format!("{sign}{grouped}{}", CurrencyCode::VND.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self {
            amount: iter.map(|p| p.amount).sum(),
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.amount.normalize().to_i64() {
            Some(whole) if self.amount.fract().is_zero() => serializer.serialize_i64(whole),
            _ => serializer.serialize_f64(self.amount.to_f64().unwrap_or_default()),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Self::new)
    }
}
