//! Planar geometry on map positions: bounding boxes, point-in-polygon and the
//! polygon search over marchés.
//!
//! Positions are treated as plain `(lng, lat)` plane coordinates, the same
//! approximation the drawing layer uses. Polygon containment is boundary
//! inclusive: a position on a vertex or on an edge is inside. The bounding box
//! test is inclusive too, so the prefilter never rejects a position that the
//! exact test would accept.

pub mod cluster;
pub mod marker;

use serde::{Deserialize, Serialize};

use crate::model::marche::Marche;

/// Tolerance for the on-edge test, in degrees.
const EDGE_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// GeoJSON order.
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    pub fn from_lng_lat([lng, lat]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

/// Axis-aligned box, inclusive on every side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn of(points: &[LatLng]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_lat: first.lat,
            min_lng: first.lng,
            max_lat: first.lat,
            max_lng: first.lng,
        };
        Some(points.iter().skip(1).fold(init, |bb, p| Self {
            min_lat: bb.min_lat.min(p.lat),
            min_lng: bb.min_lng.min(p.lng),
            max_lat: bb.max_lat.max(p.lat),
            max_lng: bb.max_lng.max(p.lng),
        }))
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lng >= self.min_lng && p.lng <= self.max_lng && p.lat >= self.min_lat && p.lat <= self.max_lat
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// `[[south, west], [north, east]]`, the corner pair the map expects.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.min_lat, self.min_lng], [self.max_lat, self.max_lng]]
    }
}

/// A simple polygon (outer ring only) with its precomputed bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    ring: Vec<LatLng>,
    bbox: BoundingBox,
}

impl Polygon {
    /// Builds a polygon from drawn vertices. A trailing vertex equal to the
    /// first one is dropped. Needs at least three distinct vertices.
    pub fn new(mut vertices: Vec<LatLng>) -> Option<Self> {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return None;
        }
        let bbox = BoundingBox::of(&vertices)?;
        Some(Self { ring: vertices, bbox })
    }

    pub fn ring(&self) -> &[LatLng] {
        &self.ring
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Bounding box reject first, exact test second.
    pub fn contains(&self, p: LatLng) -> bool {
        self.bbox.contains(p) && point_in_polygon(p, &self.ring)
    }
}

/// Exact, boundary-inclusive point-in-polygon test (even-odd ray casting with
/// an explicit on-edge check).
pub fn point_in_polygon(p: LatLng, ring: &[LatLng]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if on_segment(p, a, b) {
            return true;
        }
        if (a.lat > p.lat) != (b.lat > p.lat) {
            let x_cross = (b.lng - a.lng) * (p.lat - a.lat) / (b.lat - a.lat) + a.lng;
            if p.lng < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn on_segment(p: LatLng, a: LatLng, b: LatLng) -> bool {
    let cross = (b.lng - a.lng) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lng - a.lng);
    let scale = (b.lng - a.lng).abs().max((b.lat - a.lat).abs()).max(1.0);
    if cross.abs() > EDGE_EPSILON * scale {
        return false;
    }
    // Exact bounds keep every accepted point inside the polygon's bbox.
    p.lng >= a.lng.min(b.lng)
        && p.lng <= a.lng.max(b.lng)
        && p.lat >= a.lat.min(b.lat)
        && p.lat <= a.lat.max(b.lat)
}

/// Marchés with coordinates that fall inside `polygon`, in input order.
pub fn marches_within(marches: &[Marche], polygon: &Polygon) -> Vec<Marche> {
    marches
        .iter()
        .filter(|m| m.position().is_some_and(|p| polygon.contains(p)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 2.0),
            LatLng::new(2.0, 2.0),
            LatLng::new(2.0, 0.0),
            LatLng::new(0.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn closing_vertex_is_dropped() {
        assert_eq!(square().ring().len(), 4);
        assert!(Polygon::new(vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)]).is_none());
    }

    #[test]
    fn interior_edge_and_exterior() {
        let sq = square();
        assert!(sq.contains(LatLng::new(1.0, 1.0)));
        assert!(sq.contains(LatLng::new(0.0, 1.0)));
        assert!(sq.contains(LatLng::new(2.0, 2.0)));
        assert!(!sq.contains(LatLng::new(2.5, 1.0)));
        assert!(!sq.contains(LatLng::new(1.0, -0.0001)));
    }

    #[test]
    fn concave_notch_is_outside() {
        // U shape opening to the north.
        let u = Polygon::new(vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 3.0),
            LatLng::new(3.0, 3.0),
            LatLng::new(3.0, 2.0),
            LatLng::new(1.0, 2.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(3.0, 1.0),
            LatLng::new(3.0, 0.0),
        ])
        .unwrap();
        assert!(u.bbox().contains(LatLng::new(2.0, 1.5)));
        assert!(!u.contains(LatLng::new(2.0, 1.5)));
        assert!(u.contains(LatLng::new(2.0, 0.5)));
    }
}
