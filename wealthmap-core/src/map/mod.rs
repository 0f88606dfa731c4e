//! The interactive property map.
//!
//! [`MapViewController`] owns a [`MapSurface`] (the map widget), reacts to
//! viewport changes with a debounced refetch and redraws all markers
//! through the [`MarkerController`] whenever a new property list arrives.
//!
//! The controller is free of I/O and clocks: the host passes in the
//! current [`Instant`](std::time::Instant), executes the returned tickets
//! against the backend and hands the results back.

mod controller;
mod debounce;
mod markers;
mod viewport;


pub use self::{controller::*, debounce::*, markers::*, viewport::*};

use crate::entities::*;

pub type MarkerId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerKind {
    Property { property_id: Id, address: String },
    Cluster { count: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub id: MarkerId,
    pub pos: MapPoint,
    pub kind: MarkerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapControl {
    Navigation,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyTo {
    pub center: MapPoint,
    pub zoom: f64,
    /// Animation speed, `None` for the widget default.
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitBoundsOptions {
    pub padding_px: f64,
    pub max_zoom: f64,
}

/// A map widget.
///
/// Marker handles are moved back into [`MapSurface::remove_marker`], so a
/// handle can only be removed once.
pub trait MapSurface {
    type Marker;

    fn bounds(&self) -> MapBbox;
    fn zoom(&self) -> f64;
    fn jump_to(&mut self, center: MapPoint, zoom: f64);
    fn add_control(&mut self, control: MapControl);
    fn create_marker(&mut self, spec: &MarkerSpec) -> Self::Marker;
    fn remove_marker(&mut self, marker: Self::Marker);
    fn fly_to(&mut self, target: FlyTo);
    fn fit_bounds(&mut self, bbox: MapBbox, options: FitBoundsOptions);
    fn destroy(&mut self);
}
