use serde::{Deserialize, Serialize};

use super::lenient;
use crate::geo::LatLng;
use crate::pagination::Page;

/// A public procurement record as returned by `GET /marches` and
/// `GET /marches/{id}`.
///
/// Coordinates are optional: records created without a map selection have no
/// position and are skipped by the map layers and the polygon search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marche {
    pub id: i64,
    pub num_marche: String,
    pub objet: String,
    #[serde(deserialize_with = "lenient::i32_or_text")]
    pub annee: i32,
    #[serde(default)]
    pub num_boite: Option<String>,
    #[serde(default)]
    pub organisme: Option<String>,
    #[serde(default)]
    pub type_communaute_publique: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Marche {
    /// Position of the record, if both coordinates are present.
    pub fn position(&self) -> Option<LatLng> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }

    pub fn organisme(&self) -> &str {
        self.organisme.as_deref().unwrap_or("")
    }

    /// Case-insensitive match used by the results list on the map: reference
    /// number, subject or organisation contains `term`.
    pub fn matches_text(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [self.num_marche.as_str(), self.objet.as_str(), self.organisme()]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// `GET /marches` answers with a page envelope; older deployments answered
/// with a bare array. Both are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MarchesPayload {
    Paged(Page<Marche>),
    Plain(Vec<Marche>),
}

impl MarchesPayload {
    pub fn into_page(self) -> Page<Marche> {
        match self {
            MarchesPayload::Paged(page) => page,
            MarchesPayload::Plain(data) => Page::single(data),
        }
    }
}

/// Search fields shared by the list page and the map filter panel.
///
/// Every field is free text as typed by the user; blank fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarcheFilters {
    pub num_marche: String,
    pub objet: String,
    pub organisme: String,
    pub annee: String,
    pub num_boite: String,
    /// Community type; sent to the API as `type`.
    #[serde(rename = "type")]
    pub type_communaute: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    NumMarche,
    Objet,
    Organisme,
    Annee,
    NumBoite,
    TypeCommunaute,
}

impl MarcheFilters {
    pub fn set(&mut self, field: FilterField, value: String) {
        match field {
            FilterField::NumMarche => self.num_marche = value,
            FilterField::Objet => self.objet = value,
            FilterField::Organisme => self.organisme = value,
            FilterField::Annee => self.annee = value,
            FilterField::NumBoite => self.num_boite = value,
            FilterField::TypeCommunaute => self.type_communaute = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    /// Non-blank filters as API query parameters. `annee` is only sent when
    /// it parses as a number.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let text_fields = [
            ("num_marche", &self.num_marche),
            ("objet", &self.objet),
            ("organisme", &self.organisme),
            ("num_boite", &self.num_boite),
            ("type", &self.type_communaute),
        ];
        for (key, value) in text_fields {
            let value = value.trim();
            if !value.is_empty() {
                pairs.push((key, value.to_string()));
            }
        }
        if let Ok(year) = self.annee.trim().parse::<i32>() {
            pairs.push(("annee", year.to_string()));
        }
        pairs
    }

    /// Local evaluation of the same filters, used on the map where all
    /// records are already loaded.
    pub fn matches(&self, marche: &Marche) -> bool {
        fn contains(haystack: &str, needle: &str) -> bool {
            let needle = needle.trim();
            needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
        }

        let year_ok = match self.annee.trim().parse::<i32>() {
            Ok(year) => marche.annee == year,
            Err(_) => true,
        };

        year_ok
            && contains(&marche.num_marche, &self.num_marche)
            && contains(&marche.objet, &self.objet)
            && contains(marche.organisme(), &self.organisme)
            && contains(marche.num_boite.as_deref().unwrap_or(""), &self.num_boite)
            && contains(
                marche.type_communaute_publique.as_deref().unwrap_or(""),
                &self.type_communaute,
            )
    }
}

/// Raw text of the add / edit form. Kept as strings so a half-typed form can
/// be parked in the handoff while the user picks a position on the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarcheForm {
    pub num_marche: String,
    pub objet: String,
    pub annee: String,
    pub num_boite: String,
    pub organisme: String,
    pub type_communaute_publique: String,
    pub latitude: String,
    pub longitude: String,
}

impl MarcheForm {
    /// Blank form for creation, with the year pre-filled.
    pub fn blank(current_year: i32) -> Self {
        Self {
            annee: current_year.to_string(),
            ..Self::default()
        }
    }

    pub fn from_marche(marche: &Marche) -> Self {
        Self {
            num_marche: marche.num_marche.clone(),
            objet: marche.objet.clone(),
            annee: marche.annee.to_string(),
            num_boite: marche.num_boite.clone().unwrap_or_default(),
            organisme: marche.organisme.clone().unwrap_or_default(),
            type_communaute_publique: marche.type_communaute_publique.clone().unwrap_or_default(),
            latitude: marche.latitude.map(|v| v.to_string()).unwrap_or_default(),
            longitude: marche.longitude.map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    pub fn set_position(&mut self, at: LatLng) {
        self.latitude = at.lat.to_string();
        self.longitude = at.lng.to_string();
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::NumMarche => self.num_marche = value,
            FormField::Objet => self.objet = value,
            FormField::Annee => self.annee = value,
            FormField::NumBoite => self.num_boite = value,
            FormField::Organisme => self.organisme = value,
            FormField::TypeCommunaute => self.type_communaute_publique = value,
            FormField::Latitude => self.latitude = value,
            FormField::Longitude => self.longitude = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    NumMarche,
    Objet,
    Annee,
    NumBoite,
    Organisme,
    TypeCommunaute,
    Latitude,
    Longitude,
}

/// Body of `POST /marches/add`. The position travels as WKT in `geom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMarche {
    pub num_marche: String,
    pub objet: String,
    pub annee: i32,
    pub num_boite: String,
    pub organisme: String,
    pub type_communaute_publique: String,
    pub geom: Option<String>,
}

/// Body of `PUT /marches/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarcheUpdate {
    pub num_marche: String,
    pub objet: String,
    pub annee: i32,
    pub num_boite: String,
    pub organisme: String,
    pub type_communaute_publique: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// WKT point as the API stores it: longitude first.
pub fn wkt_point(at: LatLng) -> String {
    format!("POINT({} {})", at.lng, at.lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Marche {
        Marche {
            id: 7,
            num_marche: "12/2023".into(),
            objet: "Travaux de voirie".into(),
            annee: 2023,
            num_boite: Some("4".into()),
            organisme: Some("Commune de Fès".into()),
            type_communaute_publique: Some("Commune".into()),
            latitude: Some(34.03),
            longitude: Some(-5.0),
            created_at: None,
        }
    }

    #[test]
    fn decodes_quoted_coordinates_and_year() {
        let json = r#"{"id":1,"num_marche":"1/24","objet":"x","annee":"2024",
            "latitude":"34.5","longitude":null}"#;
        let marche: Marche = serde_json::from_str(json).unwrap();
        assert_eq!(marche.annee, 2024);
        assert_eq!(marche.latitude, Some(34.5));
        assert_eq!(marche.position(), None);
    }

    #[test]
    fn payload_accepts_bare_arrays() {
        let json = r#"[{"id":1,"num_marche":"1/24","objet":"x","annee":2024}]"#;
        let page = serde_json::from_str::<MarchesPayload>(json).unwrap().into_page();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn blank_filters_are_not_sent() {
        let filters = MarcheFilters {
            objet: "  voirie ".into(),
            annee: "20x4".into(),
            type_communaute: "Commune".into(),
            ..Default::default()
        };
        assert_eq!(
            filters.query_pairs(),
            vec![("objet", "voirie".to_string()), ("type", "Commune".to_string())]
        );
    }

    #[test]
    fn local_filters_match_like_the_api() {
        let mut filters = MarcheFilters::default();
        assert!(filters.matches(&sample()));
        filters.set(FilterField::Organisme, "fès".into());
        filters.set(FilterField::Annee, "2023".into());
        assert!(filters.matches(&sample()));
        filters.set(FilterField::Annee, "2022".into());
        assert!(!filters.matches(&sample()));
    }

    #[test]
    fn wkt_puts_longitude_first() {
        assert_eq!(wkt_point(LatLng::new(34.5, -6.25)), "POINT(-6.25 34.5)");
    }
}
