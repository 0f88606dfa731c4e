use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::{entities::*, usecases::SearchFilters};

pub use fast_chemail::is_valid_email;

/// Minimum password length accepted by the identity backend.
pub const MIN_PASSWORD_LEN: usize = 6;

const MAX_COMPANY_NAME_LEN: usize = 100;

lazy_static! {
    static ref ZIP_CODE_REGEX: Regex = Regex::new(r"^\d{5}(-\d{4})?$").unwrap();
}

pub trait Validate {
    type Error;
    fn validate(&self) -> Result<(), Self::Error>;
}

pub fn is_valid_bbox(bbox: &MapBbox) -> bool {
    bbox.is_valid()
}

pub fn is_valid_zip_code(s: &str) -> bool {
    ZIP_CODE_REGEX.is_match(s)
}

pub fn is_valid_company_name(s: &str) -> bool {
    let trimmed = s.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= MAX_COMPANY_NAME_LEN
}

pub fn is_valid_password(s: &str) -> bool {
    s.chars().count() >= MIN_PASSWORD_LEN
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterInvalidation {
    #[error("Invalid ZIP code")]
    ZipCode,
    #[error("Empty range")]
    Range,
}

impl Validate for SearchFilters {
    type Error = FilterInvalidation;
    fn validate(&self) -> Result<(), Self::Error> {
        if let Some(zip) = self.zip_code() {
            if !is_valid_zip_code(zip) {
                return Err(FilterInvalidation::ZipCode);
            }
        }
        let value_range_ok = match (self.min_value_usd, self.max_value_usd) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        };
        let size_range_ok = match (self.min_size_sqft, self.max_size_sqft) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        };
        if value_range_ok && size_range_ok {
            Ok(())
        } else {
            Err(FilterInvalidation::Range)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_codes() {
        assert!(is_valid_zip_code("94105"));
        assert!(is_valid_zip_code("94105-1234"));
        assert!(!is_valid_zip_code("9410"));
        assert!(!is_valid_zip_code("94105 "));
        assert!(!is_valid_zip_code("abcde"));
    }

    #[test]
    fn company_names() {
        assert!(is_valid_company_name("Acme Wealth"));
        assert!(!is_valid_company_name("   "));
        assert!(!is_valid_company_name(&"x".repeat(101)));
    }

    #[test]
    fn filter_ranges() {
        let filters = SearchFilters {
            min_value_usd: Some(2),
            max_value_usd: Some(1),
            ..Default::default()
        };
        assert_eq!(Err(FilterInvalidation::Range), filters.validate());
        let filters = SearchFilters {
            min_size_sqft: Some(1000),
            max_size_sqft: Some(1000),
            zip_code: Some("94105".into()),
            ..Default::default()
        };
        assert_eq!(Ok(()), filters.validate());
        let filters = SearchFilters {
            zip_code: Some("SF".into()),
            ..Default::default()
        };
        assert_eq!(Err(FilterInvalidation::ZipCode), filters.validate());
    }
}
