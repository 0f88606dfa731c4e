use std::f64::consts::PI;

use crate::entities::*;

/// Web Mercator cannot represent the poles.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 22.0;

/// Pixel size of the whole world at zoom level 0.
const TILE_SIZE: f64 = 512.0;

/// The visible part of a Web Mercator map with a fixed pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: MapPoint,
    pub zoom: f64,
    pub width_px: u32,
    pub height_px: u32,
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Normalized world coordinates in `[0, 1]`.
fn project(lat: f64, lng: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (lng + 180.0) / 360.0;
    let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0;
    (x, y)
}

fn unproject(x: f64, y: f64) -> (f64, f64) {
    let lng = x * 360.0 - 180.0;
    let lat = (2.0 * (PI * (1.0 - 2.0 * y)).exp().atan() - PI / 2.0).to_degrees();
    (
        lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT),
        lng.clamp(-180.0, 180.0),
    )
}

impl Viewport {
    pub fn new(center: MapPoint, zoom: f64, width_px: u32, height_px: u32) -> Self {
        let zoom = if zoom.is_nan() { MIN_ZOOM } else { zoom };
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width_px,
            height_px,
        }
    }

    pub fn bounds(&self) -> MapBbox {
        let (lat, lng) = self.center.to_lat_lng_deg();
        let (cx, cy) = project(lat, lng);
        let ws = world_size(self.zoom);
        let dx = f64::from(self.width_px) / 2.0 / ws;
        let dy = f64::from(self.height_px) / 2.0 / ws;
        let (north, west) = unproject(cx - dx, cy - dy);
        let (south, east) = unproject(cx + dx, cy + dy);
        MapBbox::new(
            MapPoint::from_lat_lng_deg(south, west),
            MapPoint::from_lat_lng_deg(north, east),
        )
    }

    /// A `NaN` zoom is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Moves the center by the given degrees.
    ///
    /// Non-finite offsets leave the viewport unchanged.
    pub fn pan(&mut self, dlat: f64, dlng: f64) {
        if !dlat.is_finite() || !dlng.is_finite() {
            return;
        }
        let (lat, lng) = self.center.to_lat_lng_deg();
        let lat = (lat + dlat).clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
        let lng = ((lng + dlng) + 180.0).rem_euclid(360.0) - 180.0;
        self.center = MapPoint::from_lat_lng_deg(lat, lng);
    }

    /// Centers the viewport on `bbox` with the largest zoom that keeps
    /// the whole box visible inside the padding, capped at `max_zoom`.
    pub fn fit_bounds(&mut self, bbox: &MapBbox, padding_px: f64, max_zoom: f64) {
        let (x0, y0) = project(bbox.north(), bbox.west());
        let (x1, y1) = project(bbox.south(), bbox.east());
        let span_x = (x1 - x0).abs();
        let span_y = (y1 - y0).abs();
        let avail_x = (f64::from(self.width_px) - 2.0 * padding_px).max(1.0);
        let avail_y = (f64::from(self.height_px) - 2.0 * padding_px).max(1.0);
        let zoom_x = (avail_x / (span_x * TILE_SIZE)).log2();
        let zoom_y = (avail_y / (span_y * TILE_SIZE)).log2();
        // An empty span yields an infinite zoom that is capped below.
        let zoom = zoom_x.min(zoom_y).min(max_zoom);
        let (lat, lng) = unproject((x0 + x1) / 2.0, (y0 + y1) / 2.0);
        self.center = MapPoint::from_lat_lng_deg(lat, lng);
        self.set_zoom(zoom);
    }
}
