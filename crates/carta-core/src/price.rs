//! Fixed-point dish prices.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error al interpretar un precio.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid price '{value}': {reason}")]
pub struct PriceError {
    /// El texto recibido
    pub value: String,
    /// Por que no es un precio valido
    pub reason: &'static str,
}

impl PriceError {
    fn new(value: impl Into<String>, reason: &'static str) -> Self {
        Self {
            value: value.into(),
            reason,
        }
    }
}

/// Dish price with exactly two fraction digits.
///
/// Stored as an integer count of hundredths. Input with more than two
/// fraction digits is rounded with the round-half-even rule, so
/// `12.5345` becomes `12.53` and `1.135` becomes `1.14`.
///
/// Serializes as a decimal string (`"12.53"`); deserializes from either a
/// JSON string or a JSON number.
///
/// # Example
///
/// ```
/// use carta_core::Price;
///
/// let price: Price = "12.5345".parse().unwrap();
/// assert_eq!(price.to_string(), "12.53");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Price(i64);

impl Price {
    /// Crea un precio a partir de centesimas.
    pub fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Retorna el precio en centesimas.
    pub fn hundredths(&self) -> i64 {
        self.0
    }

    /// Parses a decimal string, rounding half-even to two fraction digits.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PriceError::new(input, "empty value"));
        }

        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(PriceError::new(input, "no digits"));
        }
        if !int_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(PriceError::new(input, "integer part is not numeric"));
        }
        if !frac_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(PriceError::new(input, "fraction part is not numeric"));
        }

        let whole: i64 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| PriceError::new(input, "integer part out of range"))?
        };

        let mut frac = frac_part.bytes();
        let d1 = frac.next().map(|b| i64::from(b - b'0')).unwrap_or(0);
        let d2 = frac.next().map(|b| i64::from(b - b'0')).unwrap_or(0);
        let mut hundredths = whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(d1 * 10 + d2))
            .ok_or_else(|| PriceError::new(input, "value out of range"))?;

        // Round-half-even sobre los digitos sobrantes
        let rest: Vec<u8> = frac.collect();
        if let Some(&first) = rest.first() {
            let tail_nonzero = rest[1..].iter().any(|&b| b != b'0');
            let round_up = match first.cmp(&b'5') {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Less => false,
                std::cmp::Ordering::Equal => tail_nonzero || hundredths % 2 != 0,
            };
            if round_up {
                hundredths = hundredths
                    .checked_add(1)
                    .ok_or_else(|| PriceError::new(input, "value out of range"))?;
            }
        }

        Ok(Self(if negative { -hundredths } else { hundredths }))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

struct PriceVisitor;

impl Visitor<'_> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
        Price::parse(v).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
        Price::parse(&v.to_string()).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
        Price::parse(&v.to_string()).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
        Price::parse(&v.to_string()).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Price, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}
