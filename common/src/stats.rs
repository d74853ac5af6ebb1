//! Figures shown on the dashboard landing page.

use std::collections::BTreeMap;

use crate::model::marche::Marche;

pub const UNDEFINED_TYPE: &str = "Non défini";

/// Colours cycled over the community-type breakdown.
pub const PALETTE: [&str; 6] = ["#10b981", "#22d3ee", "#f59e0b", "#10b985", "#ef4444", "#8b5cf6"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_marches: usize,
    /// Ascending by year.
    pub by_year: Vec<(i32, usize)>,
    /// By community type, in order of first appearance.
    pub by_type: Vec<(String, usize)>,
    pub latest_year: Option<i32>,
    pub total_folders: u64,
    pub total_pieces: u64,
}

impl DashboardStats {
    pub fn compute(marches: &[Marche], total_folders: u64, total_pieces: u64) -> Self {
        let mut years: BTreeMap<i32, usize> = BTreeMap::new();
        let mut by_type: Vec<(String, usize)> = Vec::new();
        for marche in marches {
            *years.entry(marche.annee).or_default() += 1;
            let kind = marche
                .type_communaute_publique
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .unwrap_or(UNDEFINED_TYPE);
            match by_type.iter_mut().find(|(k, _)| k == kind) {
                Some((_, n)) => *n += 1,
                None => by_type.push((kind.to_string(), 1)),
            }
        }
        Self {
            total_marches: marches.len(),
            latest_year: years.keys().next_back().copied(),
            by_year: years.into_iter().collect(),
            by_type,
            total_folders,
            total_pieces,
        }
    }

    /// Largest per-year count, used to scale the bar chart.
    pub fn max_per_year(&self) -> usize {
        self.by_year.iter().map(|(_, n)| *n).max().unwrap_or(0)
    }

    /// Share of `count` in percent of all marchés.
    pub fn share(&self, count: usize) -> f64 {
        if self.total_marches == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total_marches as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marche(id: i64, annee: i32, kind: Option<&str>) -> Marche {
        Marche {
            id,
            num_marche: format!("{id}/{annee}"),
            objet: String::new(),
            annee,
            num_boite: None,
            organisme: None,
            type_communaute_publique: kind.map(String::from),
            latitude: None,
            longitude: None,
            created_at: None,
        }
    }

    #[test]
    fn groups_by_year_and_type() {
        let stats = DashboardStats::compute(
            &[
                marche(1, 2023, Some("Commune")),
                marche(2, 2024, None),
                marche(3, 2023, Some("Région")),
                marche(4, 2021, Some("Commune")),
            ],
            12,
            40,
        );
        assert_eq!(stats.by_year, vec![(2021, 1), (2023, 2), (2024, 1)]);
        assert_eq!(
            stats.by_type,
            vec![
                ("Commune".to_string(), 2),
                (UNDEFINED_TYPE.to_string(), 1),
                ("Région".to_string(), 1)
            ]
        );
        assert_eq!(stats.latest_year, Some(2024));
        assert_eq!(stats.max_per_year(), 2);
        assert!((stats.share(1) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_dashboard() {
        let stats = DashboardStats::compute(&[], 0, 0);
        assert_eq!(stats.latest_year, None);
        assert_eq!(stats.share(3), 0.0);
    }
}
