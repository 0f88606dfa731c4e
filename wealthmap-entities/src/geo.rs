use std::{fmt, str::FromStr};

use itertools::Itertools;
use thiserror::Error;

pub type RawCoord = i32;

/// Fixed-point resolution: 7 decimal places (~1 cm).
pub const RAW_UNITS_PER_DEG: RawCoord = 10_000_000;

const RAW_COORD_INVALID: RawCoord = RawCoord::MIN;

macro_rules! geo_coord {
    ($(#[$attr:meta])* $name:ident, $deg_max:literal) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name(RawCoord);

        impl $name {
            const DEG_MAX: f64 = $deg_max as f64;
            const DEG_MIN: f64 = -($deg_max as f64);
            const RAW_MAX: RawCoord = $deg_max * RAW_UNITS_PER_DEG;

            pub const fn max() -> Self {
                Self(Self::RAW_MAX)
            }

            pub const fn min() -> Self {
                Self(-Self::RAW_MAX)
            }

            pub const fn to_raw(self) -> RawCoord {
                self.0
            }

            pub const fn from_raw(raw: RawCoord) -> Self {
                Self(raw)
            }

            pub fn is_valid(self) -> bool {
                self.0 != RAW_COORD_INVALID && self.0.abs() <= Self::RAW_MAX
            }

            pub fn to_deg(self) -> f64 {
                if self.is_valid() {
                    f64::from(self.0) / f64::from(RAW_UNITS_PER_DEG)
                } else {
                    f64::NAN
                }
            }

            pub fn from_deg<T: Into<f64>>(deg: T) -> Self {
                let deg = deg.into();
                debug_assert!(deg >= Self::DEG_MIN);
                debug_assert!(deg <= Self::DEG_MAX);
                let res = Self(f64::round(deg * f64::from(RAW_UNITS_PER_DEG)) as RawCoord);
                debug_assert!(res.is_valid());
                res
            }

            pub fn try_from_deg<T: Into<f64>>(deg: T) -> Option<Self> {
                let deg = deg.into();
                if (Self::DEG_MIN..=Self::DEG_MAX).contains(&deg) {
                    Some(Self::from_deg(deg))
                } else {
                    None
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self(RAW_COORD_INVALID)
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                if self == other {
                    Some(std::cmp::Ordering::Equal)
                } else if self.is_valid() && other.is_valid() {
                    Some(self.0.cmp(&other.0))
                } else {
                    None
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.to_deg())
            }
        }
    };
}

geo_coord!(
    /// Latitude in fixed-point degrees.
    LatCoord,
    90
);

geo_coord!(
    /// Longitude in fixed-point degrees.
    LngCoord,
    180
);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid latitude degrees: {0}")]
    Latitude(String),
    #[error("Invalid longitude degrees: {0}")]
    Longitude(String),
    #[error("Expected {expected} comma separated numbers: '{found}'")]
    Format { expected: usize, found: String },
}

/// A geographical position on a (flat) map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MapPoint {
    lat: LatCoord,
    lng: LngCoord,
}

impl MapPoint {
    pub const fn new(lat: LatCoord, lng: LngCoord) -> Self {
        Self { lat, lng }
    }

    pub const fn lat(self) -> LatCoord {
        self.lat
    }

    pub const fn lng(self) -> LngCoord {
        self.lng
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_valid() && self.lng.is_valid()
    }

    pub fn to_lat_lng_deg(self) -> (f64, f64) {
        (self.lat.to_deg(), self.lng.to_deg())
    }

    pub fn from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(lat: LAT, lng: LNG) -> Self {
        Self::new(LatCoord::from_deg(lat), LngCoord::from_deg(lng))
    }

    pub fn try_from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(
        lat: LAT,
        lng: LNG,
    ) -> Option<Self> {
        match (LatCoord::try_from_deg(lat), LngCoord::try_from_deg(lng)) {
            (Some(lat), Some(lng)) => Some(Self::new(lat, lng)),
            _ => None,
        }
    }

    fn parse_lat_lng_deg(lat_str: &str, lng_str: &str) -> Result<Self, ParseError> {
        let lat = lat_str
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(LatCoord::try_from_deg)
            .ok_or_else(|| ParseError::Latitude(lat_str.to_owned()))?;
        let lng = lng_str
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(LngCoord::try_from_deg)
            .ok_or_else(|| ParseError::Longitude(lng_str.to_owned()))?;
        Ok(Self::new(lat, lng))
    }
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for MapPoint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split(',')
            .collect_tuple()
            .ok_or_else(|| ParseError::Format {
                expected: 2,
                found: s.to_owned(),
            })?;
        MapPoint::parse_lat_lng_deg(lat, lng)
    }
}

/// Rectangular map area given by its south-west and north-east corners.
///
/// A south-west longitude greater than the north-east longitude
/// denotes an area that crosses the antimeridian.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MapBbox {
    sw: MapPoint,
    ne: MapPoint,
}

impl MapBbox {
    pub const fn new(sw: MapPoint, ne: MapPoint) -> Self {
        Self { sw, ne }
    }

    pub fn from_edges_deg(west: f64, south: f64, east: f64, north: f64) -> Option<Self> {
        let sw = MapPoint::try_from_lat_lng_deg(south, west)?;
        let ne = MapPoint::try_from_lat_lng_deg(north, east)?;
        Some(Self::new(sw, ne))
    }

    /// The smallest box that contains all points, or `None` if there are none.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = MapPoint>,
    {
        let mut points = points.into_iter().filter(|p| p.is_valid());
        let first = points.next()?;
        let (mut south, mut west) = (first.lat().to_raw(), first.lng().to_raw());
        let (mut north, mut east) = (south, west);
        for p in points {
            south = south.min(p.lat().to_raw());
            north = north.max(p.lat().to_raw());
            west = west.min(p.lng().to_raw());
            east = east.max(p.lng().to_raw());
        }
        Some(Self::new(
            MapPoint::new(LatCoord::from_raw(south), LngCoord::from_raw(west)),
            MapPoint::new(LatCoord::from_raw(north), LngCoord::from_raw(east)),
        ))
    }

    pub const fn south_west(&self) -> MapPoint {
        self.sw
    }

    pub const fn north_east(&self) -> MapPoint {
        self.ne
    }

    pub fn west(&self) -> f64 {
        self.sw.lng().to_deg()
    }

    pub fn south(&self) -> f64 {
        self.sw.lat().to_deg()
    }

    pub fn east(&self) -> f64 {
        self.ne.lng().to_deg()
    }

    pub fn north(&self) -> f64 {
        self.ne.lat().to_deg()
    }

    pub fn is_valid(&self) -> bool {
        self.sw.is_valid() && self.ne.is_valid() && self.sw.lat() <= self.ne.lat()
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.sw.lng() > self.ne.lng()
    }

    /// Inclusive on all four edges.
    pub fn contains_point(&self, pt: MapPoint) -> bool {
        debug_assert!(self.is_valid());
        if !pt.is_valid() {
            return false;
        }
        if pt.lat() < self.sw.lat() || pt.lat() > self.ne.lat() {
            return false;
        }
        if self.crosses_antimeridian() {
            pt.lng() >= self.sw.lng() || pt.lng() <= self.ne.lng()
        } else {
            pt.lng() >= self.sw.lng() && pt.lng() <= self.ne.lng()
        }
    }

    pub fn center(&self) -> MapPoint {
        let lat = (i64::from(self.sw.lat().to_raw()) + i64::from(self.ne.lat().to_raw())) / 2;
        let west = i64::from(self.sw.lng().to_raw());
        let mut east = i64::from(self.ne.lng().to_raw());
        let full_turn = 360 * i64::from(RAW_UNITS_PER_DEG);
        if self.crosses_antimeridian() {
            east += full_turn;
        }
        let mut lng = (west + east) / 2;
        if lng > i64::from(LngCoord::max().to_raw()) {
            lng -= full_turn;
        }
        MapPoint::new(
            LatCoord::from_raw(lat as RawCoord),
            LngCoord::from_raw(lng as RawCoord),
        )
    }
}

impl fmt::Display for MapBbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.sw, self.ne)
    }
}

impl FromStr for MapBbox {
    type Err = ParseError;

    /// Parses `sw_lat,sw_lng,ne_lat,ne_lng`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sw_lat, sw_lng, ne_lat, ne_lng) =
            s.split(',')
                .collect_tuple()
                .ok_or_else(|| ParseError::Format {
                    expected: 4,
                    found: s.to_owned(),
                })?;
        let sw = MapPoint::parse_lat_lng_deg(sw_lat, sw_lng)?;
        let ne = MapPoint::parse_lat_lng_deg(ne_lat, ne_lng)?;
        Ok(MapBbox::new(sw, ne))
    }
}
