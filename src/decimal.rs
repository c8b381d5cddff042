//! Exact decimal numbers for nanosecond timestamps.
//!
//! A [`Decimal`] is an unscaled [`BigInt`] plus a base-10 scale. It never
//! passes through a binary float, so `1700000000.123456789` survives encoding
//! and decoding digit for digit.

use crate::{Error, Result};
use num_bigint::{BigInt, Sign};
use std::fmt;
use std::str::FromStr;

const NANO_SCALE: u32 = 9;

/// Largest exponent shift accepted beyond the digits actually written.
const MAX_EXPONENT_SHIFT: u64 = 64;

/// An `i64` has at most 19 decimal digits.
const I64_DIGITS: u64 = 19;

/// An exact decimal value `unscaled * 10^-scale`.
///
/// # Examples
///
/// ```rust
/// use serde_temporal::Decimal;
///
/// let d: Decimal = "-12.5e-1".parse().unwrap();
/// assert_eq!(d.to_string(), "-1.25");
/// assert_eq!(d.scale(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u32,
}

impl Decimal {
    #[must_use]
    pub fn new(unscaled: BigInt, scale: u32) -> Self {
        Decimal { unscaled, scale }
    }

    /// Builds `seconds + nanos / 10^9` at scale 9.
    #[must_use]
    pub fn from_parts(seconds: i64, nanos: u32) -> Self {
        let unscaled = BigInt::from(seconds) * pow10(NANO_SCALE) + BigInt::from(nanos);
        Decimal::new(unscaled, NANO_SCALE)
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    #[inline]
    #[must_use]
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Splits into floored whole units and a nanosecond remainder.
    ///
    /// Digits past the ninth decimal place are truncated toward zero before
    /// flooring. Returns `None` when the whole part does not fit in `i64`.
    #[must_use]
    pub fn to_parts(&self) -> Option<(i64, u32)> {
        let digits = self.unscaled.magnitude().to_string().len() as u64;
        let scale = u64::from(self.scale);
        if digits > scale + I64_DIGITS {
            return None;
        }
        if scale - u64::from(NANO_SCALE).min(scale) > digits {
            // Everything past the ninth decimal place truncates to zero.
            return Some((0, 0));
        }
        let total_nanos = if self.scale <= NANO_SCALE {
            &self.unscaled * pow10(NANO_SCALE - self.scale)
        } else {
            &self.unscaled / pow10(self.scale - NANO_SCALE)
        };
        let billion = pow10(NANO_SCALE);
        let mut seconds = &total_nanos / &billion;
        let mut nanos = &total_nanos % &billion;
        if nanos.sign() == Sign::Minus {
            seconds -= BigInt::from(1u8);
            nanos += &billion;
        }
        let seconds = i64::try_from(&seconds).ok()?;
        let nanos = u32::try_from(&nanos).ok()?;
        Some((seconds, nanos))
    }
}

fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u32).pow(exp)
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        if self.unscaled.sign() == Sign::Minus {
            f.write_str("-")?;
        }
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > scale {
            let (whole, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", whole, frac)
        } else {
            write!(f, "0.{}{}", "0".repeat(scale - digits.len()), digits)
        }
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::custom(format!("invalid decimal number {:?}", s));

        let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => {
                let exp: i64 = s[pos + 1..].parse().map_err(|_| invalid())?;
                (&s[..pos], exp)
            }
            None => (s, 0),
        };

        let (negative, unsigned) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };

        let (whole, frac) = match unsigned.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (unsigned, ""),
        };
        if (whole.is_empty() && frac.is_empty())
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let digits = format!("{}{}", whole, frac);
        let mut unscaled: BigInt = digits.parse().map_err(|_| invalid())?;
        if negative {
            unscaled = -unscaled;
        }

        let scale = (frac.len() as i64)
            .checked_sub(exponent)
            .ok_or_else(invalid)?;
        if scale.unsigned_abs() > digits.len() as u64 + MAX_EXPONENT_SHIFT {
            return Err(invalid());
        }
        if scale >= 0 {
            let scale = u32::try_from(scale).map_err(|_| invalid())?;
            Ok(Decimal::new(unscaled, scale))
        } else {
            let shift = u32::try_from(-scale).map_err(|_| invalid())?;
            Ok(Decimal::new(unscaled * pow10(shift), 0))
        }
    }
}
