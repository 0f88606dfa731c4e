//! A [`MapSurface`] that draws the markers as characters on a grid.

use std::{collections::BTreeMap, fmt::Write};

use wealthmap_core::{
    entities::*,
    map::{FitBoundsOptions, FlyTo, MapControl, MapSurface, MarkerId, MarkerKind, MarkerSpec, Viewport},
};

const COLUMNS: usize = 72;
const ROWS: usize = 20;

/// Marker handle of the [`TerminalMap`].
#[derive(Debug, PartialEq, Eq)]
pub struct TerminalMarker(MarkerId);

pub struct TerminalMap {
    viewport: Viewport,
    markers: BTreeMap<MarkerId, MarkerSpec>,
    controls: Vec<MapControl>,
    moved: bool,
    destroyed: bool,
}

impl TerminalMap {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            viewport: Viewport::new(MapPoint::from_lat_lng_deg(0.0, 0.0), 0.0, width_px, height_px),
            markers: BTreeMap::new(),
            controls: vec![],
            moved: false,
            destroyed: false,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pan(&mut self, dlat: f64, dlng: f64) {
        self.viewport.pan(dlat, dlng);
        self.moved = true;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
        self.moved = true;
    }

    /// Returns whether the viewport changed since the last call.
    pub fn take_moved(&mut self) -> bool {
        std::mem::take(&mut self.moved)
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerSpec> {
        self.markers.values()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn cell_of(&self, bounds: &MapBbox, pos: MapPoint) -> Option<(usize, usize)> {
        if !bounds.contains_point(pos) {
            return None;
        }
        let (lat, lng) = pos.to_lat_lng_deg();
        let mut width = bounds.east() - bounds.west();
        let mut dx = lng - bounds.west();
        if bounds.crosses_antimeridian() {
            width += 360.0;
            if dx < 0.0 {
                dx += 360.0;
            }
        }
        let height = bounds.north() - bounds.south();
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let col = ((dx / width) * COLUMNS as f64) as usize;
        let row = (((bounds.north() - lat) / height) * ROWS as f64) as usize;
        Some((col.min(COLUMNS - 1), row.min(ROWS - 1)))
    }

    /// Draws the visible markers followed by a legend.
    pub fn render(&self) -> String {
        let bounds = self.viewport.bounds();
        let mut grid = vec![vec![' '; COLUMNS]; ROWS];
        for spec in self.markers.values() {
            let Some((col, row)) = self.cell_of(&bounds, spec.pos) else {
                continue;
            };
            let symbol = match spec.kind {
                MarkerKind::Property { .. } => 'o',
                MarkerKind::Cluster { count } if count < 10 => {
                    char::from_digit(count as u32, 10).unwrap_or('#')
                }
                MarkerKind::Cluster { .. } => '#',
            };
            let cell = &mut grid[row][col];
            // Overlapping markers.
            *cell = if *cell == ' ' { symbol } else { '*' };
        }
        let mut out = String::new();
        let border = format!("+{}+", "-".repeat(COLUMNS));
        let _ = writeln!(out, "{border}");
        for row in grid {
            let _ = writeln!(out, "|{}|", row.into_iter().collect::<String>());
        }
        let _ = writeln!(out, "{border}");
        let (lat, lng) = self.viewport.center.to_lat_lng_deg();
        let _ = writeln!(
            out,
            "center {lat:.5},{lng:.5}  zoom {:.1}  bounds {bounds}",
            self.viewport.zoom
        );
        for spec in self.markers.values() {
            match &spec.kind {
                MarkerKind::Property { address, .. } => {
                    let _ = writeln!(out, "  [{}] {address}", spec.id);
                }
                MarkerKind::Cluster { count } => {
                    let _ = writeln!(out, "  [{}] {count} properties", spec.id);
                }
            }
        }
        out
    }
}

impl MapSurface for TerminalMap {
    type Marker = TerminalMarker;

    fn bounds(&self) -> MapBbox {
        self.viewport.bounds()
    }

    fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    fn jump_to(&mut self, center: MapPoint, zoom: f64) {
        self.viewport.center = center;
        self.viewport.set_zoom(zoom);
    }

    fn add_control(&mut self, control: MapControl) {
        self.controls.push(control);
    }

    fn create_marker(&mut self, spec: &MarkerSpec) -> TerminalMarker {
        self.markers.insert(spec.id, spec.clone());
        TerminalMarker(spec.id)
    }

    fn remove_marker(&mut self, marker: TerminalMarker) {
        if self.markers.remove(&marker.0).is_none() {
            log::warn!("Removed unknown marker {}", marker.0);
        }
    }

    fn fly_to(&mut self, target: FlyTo) {
        let FlyTo { center, zoom, .. } = target;
        self.viewport.center = center;
        self.viewport.set_zoom(zoom);
        self.moved = true;
    }

    fn fit_bounds(&mut self, bbox: MapBbox, options: FitBoundsOptions) {
        let FitBoundsOptions {
            padding_px,
            max_zoom,
        } = options;
        self.viewport.fit_bounds(&bbox, padding_px, max_zoom);
        self.moved = true;
    }

    fn destroy(&mut self) {
        self.markers.clear();
        self.destroyed = true;
    }
}
