//! Proximity clustering of marché markers, recomputed on every zoom change.

use super::LatLng;
use crate::model::marche::Marche;

/// Size of a map tile in pixels at zoom 0.
const TILE_SIZE: f64 = 256.0;

/// Grouping radius used by the map, in screen pixels.
pub const CLUSTER_RADIUS_PX: f64 = 50.0;

/// Visual weight of a cluster, a pure function of its member count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterSize {
    Small,
    Medium,
    Large,
}

impl ClusterSize {
    pub fn for_count(count: usize) -> Self {
        if count < 10 {
            ClusterSize::Small
        } else if count > 50 {
            ClusterSize::Large
        } else {
            ClusterSize::Medium
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            ClusterSize::Small => "rgba(101, 163, 13, 0.6)",
            ClusterSize::Medium => "rgba(234, 88, 12, 0.7)",
            ClusterSize::Large => "rgba(220, 38, 38, 0.8)",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Mean position of the members.
    pub center: LatLng,
    /// Marché ids, in input order.
    pub members: Vec<i64>,
}

impl Cluster {
    pub fn size(&self) -> ClusterSize {
        ClusterSize::for_count(self.members.len())
    }

    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }
}

/// Web-Mercator pixel position at `zoom`.
pub fn project(p: LatLng, zoom: f64) -> (f64, f64) {
    let scale = TILE_SIZE * 2f64.powf(zoom);
    let x = (p.lng + 180.0) / 360.0 * scale;
    let lat = p.lat.clamp(-85.051_128_78, 85.051_128_78).to_radians();
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * scale;
    (x, y)
}

/// Greedy grouping: each marker joins the first cluster whose anchor (its
/// first member) lies within `radius_px` on screen, or opens a new one.
/// Marchés without coordinates are skipped.
pub fn cluster_marches<'a, I>(marches: I, zoom: f64, radius_px: f64) -> Vec<Cluster>
where
    I: IntoIterator<Item = &'a Marche>,
{
    struct Building {
        anchor: (f64, f64),
        lat_sum: f64,
        lng_sum: f64,
        members: Vec<i64>,
    }

    let mut building: Vec<Building> = Vec::new();
    for marche in marches {
        let Some(pos) = marche.position() else {
            continue;
        };
        let px = project(pos, zoom);
        let slot = building.iter_mut().find(|c| {
            let dx = c.anchor.0 - px.0;
            let dy = c.anchor.1 - px.1;
            (dx * dx + dy * dy).sqrt() <= radius_px
        });
        match slot {
            Some(c) => {
                c.lat_sum += pos.lat;
                c.lng_sum += pos.lng;
                c.members.push(marche.id);
            }
            None => building.push(Building {
                anchor: px,
                lat_sum: pos.lat,
                lng_sum: pos.lng,
                members: vec![marche.id],
            }),
        }
    }

    building
        .into_iter()
        .map(|c| {
            let n = c.members.len() as f64;
            Cluster {
                center: LatLng::new(c.lat_sum / n, c.lng_sum / n),
                members: c.members,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(id: i64, lat: f64, lng: f64) -> Marche {
        Marche {
            id,
            num_marche: format!("{id}/24"),
            objet: String::new(),
            annee: 2024,
            num_boite: None,
            organisme: None,
            type_communaute_publique: None,
            latitude: Some(lat),
            longitude: Some(lng),
            created_at: None,
        }
    }

    #[test]
    fn size_thresholds() {
        assert_eq!(ClusterSize::for_count(1), ClusterSize::Small);
        assert_eq!(ClusterSize::for_count(9), ClusterSize::Small);
        assert_eq!(ClusterSize::for_count(10), ClusterSize::Medium);
        assert_eq!(ClusterSize::for_count(50), ClusterSize::Medium);
        assert_eq!(ClusterSize::for_count(51), ClusterSize::Large);
    }

    #[test]
    fn nearby_markers_merge_until_zoomed_in() {
        let marches = vec![at(1, 34.02, -6.84), at(2, 34.03, -6.83), at(3, 31.63, -8.0)];
        let far = cluster_marches(&marches, 5.0, CLUSTER_RADIUS_PX);
        assert_eq!(far.len(), 2);
        assert_eq!(far[0].members, vec![1, 2]);
        assert!((far[0].center.lat - 34.025).abs() < 1e-9);

        let near = cluster_marches(&marches, 16.0, CLUSTER_RADIUS_PX);
        assert_eq!(near.len(), 3);
        assert!(near.iter().all(Cluster::is_single));
    }

    #[test]
    fn records_without_position_are_skipped() {
        let mut hidden = at(4, 0.0, 0.0);
        hidden.latitude = None;
        assert!(cluster_marches(&[hidden], 5.0, CLUSTER_RADIUS_PX).is_empty());
    }
}
