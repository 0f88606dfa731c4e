use std::fmt;

use itertools::Itertools;

use crate::{geo::*, id::*, time::*};

/// A parcel of real estate as delivered by the backend (read-only).
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id              : Id,
    pub address         : String,
    pub pos             : MapPoint,
    pub size_sqft       : Option<f64>,
    pub value_usd       : Option<f64>,
    pub owner_name      : Option<String>,
    pub zip_code        : String,
    pub wealth_estimate : Option<WealthEstimate>,
    pub created_at      : Timestamp,
}

/// Externally sourced estimate of the owner's net worth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WealthEstimate {
    pub usd: f64,
    /// Conventionally in `[0, 1]`.
    pub confidence: Option<f64>,
}

impl WealthEstimate {
    pub fn confidence_percent(&self) -> Option<u8> {
        self.confidence.map(|c| (c.clamp(0.0, 1.0) * 100.0).round() as u8)
    }
}

/// US dollars, displayed with thousands separators and cents only
/// when the amount is not whole.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Usd(pub f64);

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cents = (self.0.max(0.0) * 100.0).round() as u64;
        let digits = (cents / 100).to_string();
        let head = digits.len() % 3;
        let groups = std::iter::once(&digits[..head])
            .filter(|g| !g.is_empty())
            .chain(
                digits.as_bytes()[head..]
                    .chunks(3)
                    .map(|c| std::str::from_utf8(c).unwrap_or_default()),
            )
            .join(",");
        match cents % 100 {
            0 => write!(f, "${groups}"),
            rest => write!(f, "${groups}.{rest:02}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_dollars() {
        assert_eq!("$0", Usd(0.0).to_string());
        assert_eq!("$999", Usd(999.0).to_string());
        assert_eq!("$1,000", Usd(1_000.0).to_string());
        assert_eq!("$1,500,000", Usd(1_500_000.0).to_string());
        assert_eq!("$12,345,678", Usd(12_345_678.0).to_string());
        assert_eq!("$999,999.60", Usd(999_999.6).to_string());
        assert_eq!("$0.05", Usd(0.05).to_string());
    }

    #[test]
    fn confidence_as_percent() {
        let estimate = WealthEstimate {
            usd: 5_000_000.0,
            confidence: Some(0.82),
        };
        assert_eq!(Some(82), estimate.confidence_percent());
        let estimate = WealthEstimate {
            usd: 1.0,
            confidence: Some(1.7),
        };
        assert_eq!(Some(100), estimate.confidence_percent());
        let estimate = WealthEstimate {
            usd: 1.0,
            confidence: None,
        };
        assert_eq!(None, estimate.confidence_percent());
    }
}
