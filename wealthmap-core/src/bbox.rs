use crate::entities::*;

pub trait InBBox {
    fn in_bbox(&self, bbox: &MapBbox) -> bool;
}

impl InBBox for Property {
    fn in_bbox(&self, bbox: &MapBbox) -> bool {
        bbox.contains_point(self.pos)
    }
}

impl InBBox for MapPoint {
    fn in_bbox(&self, bbox: &MapBbox) -> bool {
        bbox.contains_point(*self)
    }
}

/// Bounding box of all given properties.
pub fn bbox_of_properties<'a, I>(properties: I) -> Option<MapBbox>
where
    I: IntoIterator<Item = &'a Property>,
{
    MapBbox::enclosing(properties.into_iter().map(|p| p.pos))
}
