use std::{
    fmt,
    time::{Duration, Instant},
};

use super::*;
use crate::{
    clustering::{cluster_properties, CLUSTER_ZOOM_STEP},
    entities::*,
    usecases::SearchRequest,
};

pub const DEFAULT_CENTER_LAT: f64 = 37.7749;
pub const DEFAULT_CENTER_LNG: f64 = -122.4194;
pub const DEFAULT_ZOOM: f64 = 13.0;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub const SELECT_ZOOM: f64 = 16.0;
pub const SELECT_SPEED: f64 = 0.8;
pub const FIT_PADDING_PX: f64 = 50.0;
pub const FIT_MAX_ZOOM: f64 = 16.0;

pub const LOAD_ERROR: &str = "Failed to load properties";
pub const SEARCH_ERROR: &str = "Search failed. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub struct MapViewConfig {
    pub center: MapPoint,
    pub zoom: f64,
    pub debounce: Duration,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center: MapPoint::from_lat_lng_deg(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG),
            zoom: DEFAULT_ZOOM,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Monotonically increasing request number.
pub type Generation = u64;

/// A viewport fetch that the host has to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: Generation,
    pub bbox: MapBbox,
}

/// A search that the host has to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: Generation,
    pub request: SearchRequest,
}

/// Drives a [`MapSurface`]: debounced viewport fetches, clustering,
/// marker rendering, search and selection.
///
/// Only the response to the most recently issued request is applied.
/// Responses that arrive for an older generation are dropped.
pub struct MapViewController<S: MapSurface> {
    surface: S,
    markers: MarkerController<S::Marker>,
    debouncer: Debouncer,
    properties: Vec<Property>,
    selected: Option<Property>,
    loading: bool,
    error: Option<String>,
    generation: Generation,
    loaded: bool,
    torn_down: bool,
}

impl<S: MapSurface> MapViewController<S> {
    pub fn new(mut surface: S, config: &MapViewConfig) -> Self {
        surface.jump_to(config.center, config.zoom);
        surface.add_control(MapControl::Navigation);
        surface.add_control(MapControl::Scale);
        Self {
            surface,
            markers: MarkerController::new(),
            debouncer: Debouncer::new(config.debounce),
            properties: vec![],
            selected: None,
            loading: false,
            error: None,
            generation: 0,
            loaded: false,
            torn_down: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn selected(&self) -> Option<&Property> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn live_markers(&self) -> usize {
        self.markers.live_count()
    }

    pub fn marker_ids(&self) -> Vec<MarkerId> {
        self.markers.live_ids().collect()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// The map finished loading. Returns the initial fetch once.
    pub fn on_load(&mut self) -> Option<FetchTicket> {
        if self.loaded || self.torn_down {
            return None;
        }
        self.loaded = true;
        Some(self.begin_fetch())
    }

    /// The viewport stopped moving. Restarts the quiet window.
    pub fn on_move_end(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        self.debouncer.trigger(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Fires the debounced fetch once the quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<FetchTicket> {
        if self.debouncer.poll(now) {
            Some(self.begin_fetch())
        } else {
            None
        }
    }

    fn next_generation(&mut self) -> Generation {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// Starts a fetch of the properties inside the current bounds.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        let bbox = self.surface.bounds();
        let generation = self.next_generation();
        log::debug!("Fetching properties in {bbox} (generation {generation})");
        FetchTicket { generation, bbox }
    }

    fn accept(&self, generation: Generation) -> bool {
        if self.torn_down {
            log::debug!("Ignoring response {generation} after teardown");
            return false;
        }
        if generation != self.generation {
            log::debug!(
                "Dropping stale response {generation} (latest is {})",
                self.generation
            );
            return false;
        }
        true
    }

    /// Applies the result of a fetch. Returns `false` if it was stale.
    pub fn complete_fetch<E>(&mut self, ticket: FetchTicket, result: Result<Vec<Property>, E>) -> bool
    where
        E: fmt::Display,
    {
        if !self.accept(ticket.generation) {
            return false;
        }
        self.loading = false;
        match result {
            Ok(properties) => {
                log::debug!("Loaded {} properties", properties.len());
                self.replace_properties(properties);
            }
            Err(err) => {
                log::error!("Error fetching properties: {err}");
                self.error = Some(LOAD_ERROR.to_string());
            }
        }
        true
    }

    pub fn begin_search(&mut self, request: SearchRequest) -> SearchTicket {
        let generation = self.next_generation();
        log::debug!("Searching {request:?} (generation {generation})");
        SearchTicket {
            generation,
            request,
        }
    }

    /// Applies the result of a search and fits the map to the results.
    /// Returns `false` if it was stale.
    pub fn complete_search<E>(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<Property>, E>,
    ) -> bool
    where
        E: fmt::Display,
    {
        if !self.accept(ticket.generation) {
            return false;
        }
        self.loading = false;
        match result {
            Ok(results) => {
                let bbox = crate::bbox::bbox_of_properties(&results);
                self.replace_properties(results);
                if let Some(bbox) = bbox {
                    self.surface.fit_bounds(
                        bbox,
                        FitBoundsOptions {
                            padding_px: FIT_PADDING_PX,
                            max_zoom: FIT_MAX_ZOOM,
                        },
                    );
                }
            }
            Err(err) => {
                log::error!("Error searching properties: {err}");
                self.error = Some(SEARCH_ERROR.to_string());
            }
        }
        true
    }

    fn replace_properties(&mut self, properties: Vec<Property>) {
        self.properties = properties;
        let units = cluster_properties(&self.properties);
        self.markers.render(&mut self.surface, &units);
    }

    pub fn select(&mut self, property: Property) {
        self.surface.fly_to(FlyTo {
            center: property.pos,
            zoom: SELECT_ZOOM,
            speed: Some(SELECT_SPEED),
        });
        self.selected = Some(property);
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Dispatches a click on a marker. Returns `false` for unknown markers.
    pub fn on_marker_click(&mut self, id: MarkerId) -> bool {
        match self.markers.action(id).cloned() {
            Some(ClickAction::Select(property)) => {
                self.select(property);
                true
            }
            Some(ClickAction::ZoomInto(center)) => {
                let zoom = self.surface.zoom() + CLUSTER_ZOOM_STEP;
                self.surface.fly_to(FlyTo {
                    center,
                    zoom,
                    speed: None,
                });
                true
            }
            None => false,
        }
    }

    /// Cancels the pending fetch, removes all markers and destroys the map.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.debouncer.cancel();
        self.markers.clear(&mut self.surface);
        self.surface.destroy();
        self.loading = false;
        self.torn_down = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{map::tests::RecordingSurface, usecases::SearchFilters};
    use wealthmap_entities::builders::*;

    fn controller() -> MapViewController<RecordingSurface> {
        MapViewController::new(RecordingSurface::default(), &MapViewConfig::default())
    }

    fn properties(n: usize) -> Vec<Property> {
        (0..n)
            .map(|i| {
                Property::build()
                    .id(&format!("p{i}"))
                    .address(&format!("{i} Market St"))
                    .lat_lng(37.76 + i as f64 * 0.0001, -122.41)
                    .finish()
            })
            .collect()
    }

    #[test]
    fn initialization() {
        let ctl = controller();
        let surface = ctl.surface();
        assert_eq!(vec![MapControl::Navigation, MapControl::Scale], surface.controls);
        assert_eq!(
            (DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG),
            surface.center.to_lat_lng_deg()
        );
        assert_eq!(DEFAULT_ZOOM, surface.zoom);
        assert!(!ctl.is_loading());
    }

    #[test]
    fn initial_fetch_happens_once() {
        let mut ctl = controller();
        let ticket = ctl.on_load().unwrap();
        assert_eq!(ctl.surface().bounds, ticket.bbox);
        assert!(ctl.is_loading());
        assert!(ctl.on_load().is_none());
        assert!(ctl.complete_fetch(ticket, Ok::<_, String>(properties(3))));
        assert!(!ctl.is_loading());
        assert_eq!(3, ctl.properties().len());
        assert_eq!(3, ctl.live_markers());
    }

    #[test]
    fn viewport_changes_are_debounced() {
        let mut ctl = controller();
        let start = Instant::now();
        let last_bounds = MapBbox::from_edges_deg(-122.5, 37.6, -122.3, 37.9).unwrap();
        for i in 0..5u64 {
            let now = start + Duration::from_millis(i * 50);
            ctl.surface_mut().bounds =
                MapBbox::from_edges_deg(-122.5, 37.6 - i as f64 * 0.01, -122.3, 37.9).unwrap();
            ctl.on_move_end(now);
            assert!(ctl.poll(now).is_none());
        }
        ctl.surface_mut().bounds = last_bounds;
        let quiet = start + Duration::from_millis(200) + DEFAULT_DEBOUNCE;
        assert_eq!(Some(quiet), ctl.next_deadline());
        assert!(ctl.poll(quiet - Duration::from_millis(1)).is_none());
        let ticket = ctl.poll(quiet).unwrap();
        assert_eq!(last_bounds, ticket.bbox);
        assert!(ctl.poll(quiet + DEFAULT_DEBOUNCE).is_none());
    }

    #[test]
    fn failed_fetch_shows_an_error_and_keeps_markers() {
        let mut ctl = controller();
        let ticket = ctl.on_load().unwrap();
        ctl.complete_fetch(ticket, Ok::<_, String>(properties(2)));
        let ticket = ctl.begin_fetch();
        assert!(ctl.complete_fetch(ticket, Err("connection reset")));
        assert_eq!(Some(LOAD_ERROR), ctl.error());
        assert!(!ctl.is_loading());
        assert_eq!(2, ctl.live_markers());

        let ticket = ctl.begin_fetch();
        assert_eq!(None, ctl.error());
        ctl.complete_fetch(ticket, Ok::<_, String>(vec![]));
        assert_eq!(0, ctl.live_markers());
    }

    #[test]
    fn stale_responses_are_dropped() {
        let mut ctl = controller();
        let older = ctl.begin_fetch();
        let newer = ctl.begin_fetch();
        assert!(ctl.complete_fetch(newer, Ok::<_, String>(properties(2))));
        assert!(!ctl.complete_fetch(older, Ok::<_, String>(properties(7))));
        assert_eq!(2, ctl.properties().len());
        assert_eq!(2, ctl.live_markers());
        assert!(!ctl.is_loading());
    }

    #[test]
    fn stale_failure_does_not_override_newer_state() {
        let mut ctl = controller();
        let older = ctl.begin_fetch();
        let newer = ctl.begin_search(SearchRequest::default());
        assert!(!ctl.complete_fetch(older, Err("timeout")));
        assert!(ctl.is_loading());
        assert_eq!(None, ctl.error());
        assert!(ctl.complete_search(newer, Ok::<_, String>(properties(1))));
        assert!(!ctl.is_loading());
    }

    #[test]
    fn search_fits_the_results() {
        let mut ctl = controller();
        let request = SearchRequest {
            text: "market".into(),
            filters: SearchFilters::default(),
        };
        let ticket = ctl.begin_search(request.clone());
        assert_eq!(request, ticket.request);
        let results = properties(4);
        ctl.complete_search(ticket, Ok::<_, String>(results.clone()));
        assert_eq!(4, ctl.live_markers());
        let (bbox, options) = ctl.surface().fits[0];
        assert_eq!(crate::bbox::bbox_of_properties(&results), Some(bbox));
        assert_eq!(50.0, options.padding_px);
        assert_eq!(16.0, options.max_zoom);
    }

    #[test]
    fn empty_search_does_not_move_the_map() {
        let mut ctl = controller();
        let ticket = ctl.begin_search(SearchRequest::default());
        ctl.complete_search(ticket, Ok::<_, String>(vec![]));
        assert!(ctl.surface().fits.is_empty());
        assert_eq!(0, ctl.live_markers());
    }

    #[test]
    fn failed_search() {
        let mut ctl = controller();
        let ticket = ctl.begin_search(SearchRequest::default());
        ctl.complete_search(ticket, Err("500"));
        assert_eq!(Some(SEARCH_ERROR), ctl.error());
        assert!(!ctl.is_loading());
    }

    #[test]
    fn clicking_a_property_selects_it() {
        let mut ctl = controller();
        let ticket = ctl.on_load().unwrap();
        let props = properties(3);
        ctl.complete_fetch(ticket, Ok::<_, String>(props.clone()));
        let id = ctl.marker_ids()[1];
        assert!(ctl.on_marker_click(id));
        assert_eq!(Some(&props[1]), ctl.selected());
        let fly = ctl.surface().fly_tos.last().copied().unwrap();
        assert_eq!(props[1].pos, fly.center);
        assert_eq!(SELECT_ZOOM, fly.zoom);
        assert_eq!(Some(SELECT_SPEED), fly.speed);
        ctl.deselect();
        assert!(ctl.selected().is_none());
    }

    #[test]
    fn clicking_a_cluster_zooms_in_without_fetching() {
        let mut ctl = controller();
        let ticket = ctl.on_load().unwrap();
        ctl.complete_fetch(ticket, Ok::<_, String>(properties(60)));
        assert!(ctl.live_markers() < 60);
        let zoom_before = ctl.surface().zoom;
        let cluster = ctl
            .surface()
            .created
            .iter()
            .rev()
            .find(|m| matches!(m.kind, MarkerKind::Cluster { .. }))
            .cloned()
            .unwrap();
        assert!(ctl.on_marker_click(cluster.id));
        let fly = ctl.surface().fly_tos.last().copied().unwrap();
        assert_eq!(cluster.pos, fly.center);
        assert_eq!(zoom_before + 2.0, fly.zoom);
        assert!(!ctl.is_loading());
        assert!(ctl.next_deadline().is_none());
    }

    #[test]
    fn unknown_marker_clicks_are_ignored() {
        let mut ctl = controller();
        assert!(!ctl.on_marker_click(42));
    }

    #[test]
    fn teardown_cleans_up_everything() {
        let mut ctl = controller();
        let start = Instant::now();
        let ticket = ctl.on_load().unwrap();
        ctl.complete_fetch(ticket, Ok::<_, String>(properties(5)));
        let pending = ctl.begin_fetch();
        ctl.on_move_end(start);
        ctl.teardown();
        ctl.teardown();
        assert!(ctl.surface().destroyed);
        assert!(ctl.surface().live.is_empty());
        assert_eq!(0, ctl.live_markers());
        assert!(ctl.next_deadline().is_none());
        assert!(ctl.poll(start + DEFAULT_DEBOUNCE).is_none());
        assert!(!ctl.complete_fetch(pending, Ok::<_, String>(properties(3))));
        ctl.on_move_end(start);
        assert!(ctl.next_deadline().is_none());
    }
}
