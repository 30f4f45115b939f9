//! Exact decimal monetary amounts.
//!
//! An [`Amount`] is a signed integer magnitude plus a decimal scale, so
//! `Amount::new(1000, 2)` is exactly `10.00`. No binary floating point is
//! involved at any stage: comparison aligns both operands to the larger scale
//! and compares integers, rendering pads the fraction with zeros.
//!
//! # Examples
//!
//! ```
//! use braintree_gateway::Amount;
//!
//! let ten = Amount::new(1000, 2);
//! assert_eq!(ten.to_string(), "10.00");
//! assert_eq!(ten, Amount::new(10000, 3));
//! assert_eq!("10.00".parse::<Amount>().unwrap(), ten);
//! ```

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{GatewayError, Result};

/// Exact decimal value `magnitude × 10^-scale`.
///
/// Equality, ordering and hashing are scale-invariant: `10.0` and `10.00` are
/// the same amount. Use [`scale`](Self::scale) when the representation
/// matters (it does for rendering).
#[derive(Debug, Clone, Copy, Default)]
pub struct Amount {
    magnitude: i64,
    scale: u32,
}

impl Amount {
    /// Zero with scale 0.
    pub const ZERO: Self = Self { magnitude: 0, scale: 0 };

    /// Creates an amount from an integer magnitude and a decimal scale.
    ///
    /// # Examples
    ///
    /// ```
    /// use braintree_gateway::Amount;
    ///
    /// assert_eq!(Amount::new(2000, 2).to_string(), "20.00");
    /// assert_eq!(Amount::new(-5, 3).to_string(), "-0.005");
    /// ```
    #[must_use]
    pub const fn new(magnitude: i64, scale: u32) -> Self {
        Self { magnitude, scale }
    }

    /// Creates an amount from a signed exponent, rejecting negative scales.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] if `scale` is negative.
    pub fn try_new(magnitude: i64, scale: i32) -> Result<Self> {
        let scale = u32::try_from(scale).map_err(|_| {
            GatewayError::InvalidInput(format!("amount scale must not be negative, got {scale}"))
        })?;
        Ok(Self::new(magnitude, scale))
    }

    /// Integer magnitude.
    #[must_use]
    pub const fn magnitude(&self) -> i64 {
        self.magnitude
    }

    /// Number of fractional decimal digits.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Returns true if the amount is zero at any scale.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.magnitude == 0
    }

    /// Strips trailing fractional zeros: `10.00` becomes `10`.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let mut magnitude = self.magnitude;
        let mut scale = self.scale;
        while scale > 0 && magnitude % 10 == 0 {
            magnitude /= 10;
            scale -= 1;
        }
        Self { magnitude, scale }
    }

    /// Re-expresses the amount at `scale` without losing precision.
    ///
    /// Returns `None` if digits would be dropped or the magnitude overflows.
    ///
    /// # Examples
    ///
    /// ```
    /// use braintree_gateway::Amount;
    ///
    /// assert_eq!(Amount::new(10, 0).rescale(2).unwrap().to_string(), "10.00");
    /// assert!(Amount::new(1005, 3).rescale(2).is_none());
    /// ```
    #[must_use]
    pub fn rescale(&self, scale: u32) -> Option<Self> {
        match scale.cmp(&self.scale) {
            Ordering::Equal => Some(*self),
            Ordering::Greater => {
                let factor = 10_i64.checked_pow(scale - self.scale)?;
                Some(Self { magnitude: self.magnitude.checked_mul(factor)?, scale })
            }
            Ordering::Less => {
                let factor = 10_i64.checked_pow(self.scale - scale)?;
                (self.magnitude % factor == 0)
                    .then(|| Self { magnitude: self.magnitude / factor, scale })
            }
        }
    }

    /// Adds two amounts at the larger of their scales.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        let scale = self.scale.max(other.scale);
        let lhs = self.rescale(scale)?;
        let rhs = other.rescale(scale)?;
        Some(Self { magnitude: lhs.magnitude.checked_add(rhs.magnitude)?, scale })
    }

    /// Subtracts `other` at the larger of the two scales.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        let scale = self.scale.max(other.scale);
        let lhs = self.rescale(scale)?;
        let rhs = other.rescale(scale)?;
        Some(Self { magnitude: lhs.magnitude.checked_sub(rhs.magnitude)?, scale })
    }

    /// Magnitude aligned up to `scale`, or `None` if it leaves `i128`.
    fn aligned(&self, scale: u32) -> Option<i128> {
        if self.magnitude == 0 {
            return Some(0);
        }
        let factor = 10_i128.checked_pow(scale - self.scale)?;
        i128::from(self.magnitude).checked_mul(factor)
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Amount {}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        // Only the lower-scale side is multiplied. If it overflows, its absolute
        // value exceeds anything an i64 magnitude can reach, so its sign decides.
        match (self.aligned(scale), other.aligned(scale)) {
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
            (None, _) => self.magnitude.signum().cmp(&0),
            (_, None) => 0.cmp(&other.magnitude.signum()),
        }
    }
}

impl Hash for Amount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let normalized = self.normalize();
        normalized.magnitude.hash(state);
        normalized.scale.hash(state);
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.magnitude.unsigned_abs().to_string();
        let sign = if self.magnitude < 0 { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (integer, fraction) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{integer}.{fraction}")
    }
}

impl FromStr for Amount {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || GatewayError::InvalidInput(format!("invalid amount: '{s}'"));

        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !integer.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let scale = u32::try_from(fraction.len()).map_err(|_| invalid())?;
        let sign = if negative { "-" } else { "" };
        let magnitude: i64 = format!("{sign}{integer}{fraction}").parse().map_err(|_| invalid())?;
        Ok(Self::new(magnitude, scale))
    }
}

impl TryFrom<Amount> for Decimal {
    type Error = GatewayError;

    fn try_from(amount: Amount) -> Result<Self> {
        Decimal::try_from_i128_with_scale(i128::from(amount.magnitude), amount.scale)
            .map_err(|e| GatewayError::InvalidInput(format!("amount {amount} out of range: {e}")))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = GatewayError;

    fn try_from(value: Decimal) -> Result<Self> {
        let magnitude = i64::try_from(value.mantissa()).map_err(|_| {
            GatewayError::InvalidInput(format!("decimal {value} does not fit an amount"))
        })?;
        Ok(Self::new(magnitude, value.scale()))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
