use std::collections::HashMap;

use super::{MapSurface, MarkerId, MarkerKind, MarkerSpec};
use crate::{clustering::*, entities::*};

/// What happens when a marker is clicked.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickAction {
    Select(Property),
    ZoomInto(MapPoint),
}

/// Owns every marker on the map.
///
/// Markers are never updated in place: each render removes all markers
/// of the previous render before the new ones are created.
#[derive(Debug)]
pub struct MarkerController<H> {
    live: Vec<(MarkerId, H)>,
    actions: HashMap<MarkerId, ClickAction>,
    next_id: MarkerId,
}

impl<H> Default for MarkerController<H> {
    fn default() -> Self {
        Self {
            live: Vec::new(),
            actions: HashMap::new(),
            next_id: 1,
        }
    }
}

impl<H> MarkerController<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render<S>(&mut self, surface: &mut S, units: &[RenderUnit])
    where
        S: MapSurface<Marker = H>,
    {
        self.clear(surface);
        self.live.reserve(units.len());
        for unit in units {
            let id = self.next_id;
            self.next_id += 1;
            let (kind, action) = match unit {
                RenderUnit::Single(p) => (
                    MarkerKind::Property {
                        property_id: p.id.clone(),
                        address: p.address.clone(),
                    },
                    ClickAction::Select(p.clone()),
                ),
                RenderUnit::Cluster(c) => (
                    MarkerKind::Cluster { count: c.count() },
                    ClickAction::ZoomInto(c.center),
                ),
            };
            let spec = MarkerSpec {
                id,
                pos: unit.pos(),
                kind,
            };
            let handle = surface.create_marker(&spec);
            self.live.push((id, handle));
            self.actions.insert(id, action);
        }
    }

    /// Removes all markers. Calling it again is a no-op.
    pub fn clear<S>(&mut self, surface: &mut S)
    where
        S: MapSurface<Marker = H>,
    {
        for (_, handle) in self.live.drain(..) {
            surface.remove_marker(handle);
        }
        self.actions.clear();
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn live_ids(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.live.iter().map(|(id, _)| *id)
    }

    pub fn action(&self, id: MarkerId) -> Option<&ClickAction> {
        self.actions.get(&id)
    }
}
