//! Grid based clustering of the properties in the current viewport.
//!
//! Small result sets are shown as individual markers. Larger ones are
//! bucketed into cells of a fixed grid and every cell with more than one
//! property becomes a single cluster marker.

use std::collections::HashMap;

use crate::entities::*;

/// Result sets up to this size are never clustered.
pub const CLUSTER_THRESHOLD: usize = 50;

/// Edge length of a grid cell (0.01°) in fixed-point units.
pub const GRID_SIZE_RAW: RawCoord = RAW_UNITS_PER_DEG / 100;

/// Zoom levels added when a cluster is clicked.
pub const CLUSTER_ZOOM_STEP: f64 = 2.0;

/// Grid cell index of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    pub lat_cell: i32,
    pub lng_cell: i32,
}

impl BucketKey {
    pub fn of(pos: MapPoint) -> Self {
        Self {
            lat_cell: pos.lat().to_raw().div_euclid(GRID_SIZE_RAW),
            lng_cell: pos.lng().to_raw().div_euclid(GRID_SIZE_RAW),
        }
    }

    /// Middle of the cell.
    pub fn center(self) -> MapPoint {
        let half = GRID_SIZE_RAW / 2;
        let lat = (self.lat_cell * GRID_SIZE_RAW + half).min(LatCoord::max().to_raw());
        let lng = (self.lng_cell * GRID_SIZE_RAW + half).min(LngCoord::max().to_raw());
        MapPoint::new(LatCoord::from_raw(lat), LngCoord::from_raw(lng))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub key: BucketKey,
    pub center: MapPoint,
    /// Sorted.
    pub property_ids: Vec<Id>,
}

impl Cluster {
    pub fn count(&self) -> usize {
        self.property_ids.len()
    }
}

/// Something that is drawn as exactly one marker.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderUnit {
    Single(Property),
    Cluster(Cluster),
}

impl RenderUnit {
    pub fn pos(&self) -> MapPoint {
        match self {
            Self::Single(p) => p.pos,
            Self::Cluster(c) => c.center,
        }
    }

    pub fn property_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Cluster(c) => c.count(),
        }
    }
}

/// Groups properties into render units.
///
/// Up to [`CLUSTER_THRESHOLD`] properties are returned as singles in
/// input order. Above it the units are ordered by grid cell, so equal
/// input sets always produce equal output.
pub fn cluster_properties(properties: &[Property]) -> Vec<RenderUnit> {
    if properties.len() <= CLUSTER_THRESHOLD {
        return properties.iter().cloned().map(RenderUnit::Single).collect();
    }
    let mut buckets: HashMap<BucketKey, Vec<&Property>> = HashMap::new();
    for p in properties {
        buckets.entry(BucketKey::of(p.pos)).or_default().push(p);
    }
    let mut buckets: Vec<_> = buckets.into_iter().collect();
    buckets.sort_unstable_by_key(|(key, _)| *key);
    let units: Vec<_> = buckets
        .into_iter()
        .map(|(key, mut members)| {
            if members.len() == 1 {
                RenderUnit::Single(members.remove(0).clone())
            } else {
                let mut property_ids: Vec<_> = members.into_iter().map(|p| p.id.clone()).collect();
                property_ids.sort();
                RenderUnit::Cluster(Cluster {
                    key,
                    center: key.center(),
                    property_ids,
                })
            }
        })
        .collect();
    log::debug!(
        "Clustered {} properties into {} markers",
        properties.len(),
        units.len()
    );
    units
}
