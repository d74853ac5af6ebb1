use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

/// GeoJSON geometry attached to a marché. Positions are `[lng, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point([f64; 2]),
    LineString(Vec<[f64; 2]>),
    Polygon(Vec<Vec<[f64; 2]>>),
}

impl Geometry {
    pub fn line(vertices: &[LatLng]) -> Self {
        Geometry::LineString(vertices.iter().map(|p| p.to_lng_lat()).collect())
    }

    /// Closed polygon ring out of the drawn vertices.
    pub fn polygon(vertices: &[LatLng]) -> Self {
        let mut ring: Vec<[f64; 2]> = vertices.iter().map(|p| p.to_lng_lat()).collect();
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if first != last {
                ring.push(first);
            }
        }
        Geometry::Polygon(vec![ring])
    }

    /// Vertices as map positions, outer ring only for polygons.
    pub fn positions(&self) -> Vec<LatLng> {
        match self {
            Geometry::Point(p) => vec![LatLng::from_lng_lat(*p)],
            Geometry::LineString(line) => line.iter().copied().map(LatLng::from_lng_lat).collect(),
            Geometry::Polygon(rings) => rings
                .first()
                .map(|ring| ring.iter().copied().map(LatLng::from_lng_lat).collect())
                .unwrap_or_default(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "Ligne",
            Geometry::Polygon(_) => "Polygone",
        }
    }
}

/// A stored geometry, as returned by `GET /marche-geometries/{marche_id}` and
/// `POST /marche-geometries/add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarcheGeometry {
    #[serde(default)]
    pub id: Option<i64>,
    pub marche_id: i64,
    pub geometry: Geometry,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /marche-geometries/add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGeometry {
    pub marche_id: i64,
    pub geometry: Geometry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_geojson() {
        let line = Geometry::line(&[LatLng::new(34.0, -5.0), LatLng::new(34.1, -5.1)]);
        assert_eq!(
            serde_json::to_value(&line).unwrap(),
            serde_json::json!({"type": "LineString", "coordinates": [[-5.0, 34.0], [-5.1, 34.1]]})
        );
    }

    #[test]
    fn polygon_ring_is_closed_once() {
        let vertices = [
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
        ];
        match Geometry::polygon(&vertices) {
            Geometry::Polygon(rings) => {
                assert_eq!(rings[0].len(), 4);
                assert_eq!(rings[0][0], rings[0][3]);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }
}
