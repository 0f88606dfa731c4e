use super::prelude::*;
use crate::{
    bbox::InBBox,
    util::validate::{self, Validate},
};

/// Optional constraints of a property search.
///
/// Unset fields impose no constraint. A set bound excludes properties
/// that lack the corresponding value. Ranges are inclusive and `0` is a
/// regular bound.
#[rustfmt::skip]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub min_value_usd : Option<u64>,
    pub max_value_usd : Option<u64>,
    pub min_size_sqft : Option<u32>,
    pub max_size_sqft : Option<u32>,
    pub zip_code      : Option<String>,
}

/// Compares the exact value delivered by the backend, fractions included.
fn in_range(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

impl SearchFilters {
    /// The ZIP code constraint, blank values count as unset.
    pub fn zip_code(&self) -> Option<&str> {
        self.zip_code
            .as_deref()
            .map(str::trim)
            .filter(|zip| !zip.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.min_value_usd.is_none()
            && self.max_value_usd.is_none()
            && self.min_size_sqft.is_none()
            && self.max_size_sqft.is_none()
            && self.zip_code().is_none()
    }

    pub fn matches(&self, property: &Property) -> bool {
        in_range(
            property.value_usd,
            self.min_value_usd.map(|v| v as f64),
            self.max_value_usd.map(|v| v as f64),
        ) && in_range(
            property.size_sqft,
            self.min_size_sqft.map(f64::from),
            self.max_size_sqft.map(f64::from),
        )
            && self
                .zip_code()
                .map_or(true, |zip| property.zip_code == zip)
    }
}

/// Free text plus filters. All predicates must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub text: String,
    pub filters: SearchFilters,
}

impl SearchRequest {
    pub fn text(&self) -> Option<&str> {
        Some(self.text.trim()).filter(|t| !t.is_empty())
    }

    pub fn matches(&self, property: &Property) -> bool {
        let text_matches = self.text().map_or(true, |text| {
            property
                .address
                .to_lowercase()
                .contains(&text.to_lowercase())
        });
        text_matches && self.filters.matches(property)
    }
}

pub fn properties_in_bbox<R: PropertyRepo>(repo: &R, bbox: &MapBbox) -> Result<Vec<Property>> {
    if !validate::is_valid_bbox(bbox) {
        return Err(Error::Bbox);
    }
    let mut properties = repo.properties_in_bbox(bbox)?;
    properties.retain(|p| p.in_bbox(bbox));
    Ok(properties)
}

pub fn search_properties<R: PropertyRepo>(repo: &R, request: &SearchRequest) -> Result<Vec<Property>> {
    request.filters.validate()?;
    let query = PropertyQuery {
        address_contains: request.text().map(ToOwned::to_owned),
        zip_code: request.filters.zip_code().map(ToOwned::to_owned),
    };
    let mut properties = repo.query_properties(&query)?;
    properties.retain(|p| request.matches(p));
    log::debug!("Search {request:?} found {} properties", properties.len());
    Ok(properties)
}
