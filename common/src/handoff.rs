//! Form/map handoff.
//!
//! The add and edit forms park their draft here before sending the user to the
//! map to pick a position. The map writes the picked coordinate into the same
//! object and navigates back; the form then takes draft and coordinate exactly
//! once and the handoff is cleared.

use crate::geo::LatLng;
use crate::model::marche::MarcheForm;

/// Why the map was opened in selection mode, and where to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPurpose {
    AddMarche,
    EditMarche(i64),
}

impl SelectionPurpose {
    /// Reads the `from` / `id` navigation parameters of the map route.
    pub fn from_query(from: Option<&str>, id: Option<&str>) -> Option<Self> {
        match from? {
            "add-marche" => Some(SelectionPurpose::AddMarche),
            "edit-marche" => id?.parse().ok().map(SelectionPurpose::EditMarche),
            _ => None,
        }
    }

    pub fn query_pairs(self) -> Vec<(&'static str, String)> {
        match self {
            SelectionPurpose::AddMarche => vec![("from", "add-marche".into())],
            SelectionPurpose::EditMarche(id) => {
                vec![("from", "edit-marche".into()), ("id", id.to_string())]
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Handoff {
    pending: Option<Pending>,
}

#[derive(Debug, Clone, PartialEq)]
struct Pending {
    purpose: SelectionPurpose,
    draft: MarcheForm,
    picked: Option<LatLng>,
}

impl Handoff {
    /// Parks `draft` for `purpose`, replacing any earlier unfinished handoff.
    pub fn begin(&mut self, purpose: SelectionPurpose, draft: MarcheForm) {
        self.pending = Some(Pending {
            purpose,
            draft,
            picked: None,
        });
    }

    /// Records the coordinate picked on the map. Without a parked draft the
    /// pick still travels back, on an empty draft.
    pub fn pick(&mut self, purpose: SelectionPurpose, at: LatLng) {
        match &mut self.pending {
            Some(p) if p.purpose == purpose => p.picked = Some(at),
            _ => {
                self.pending = Some(Pending {
                    purpose,
                    draft: MarcheForm::default(),
                    picked: Some(at),
                })
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consumes the handoff for `purpose`: the parked draft with the picked
    /// position applied. A handoff parked for another purpose is left alone.
    pub fn take(&mut self, purpose: SelectionPurpose) -> Option<(MarcheForm, Option<LatLng>)> {
        if self.pending.as_ref()?.purpose != purpose {
            return None;
        }
        let Pending { mut draft, picked, .. } = self.pending.take()?;
        if let Some(at) = picked {
            draft.set_position(at);
        }
        Some((draft, picked))
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_comes_back_once_with_the_pick() {
        let mut handoff = Handoff::default();
        let draft = MarcheForm {
            objet: "Éclairage public".into(),
            ..MarcheForm::blank(2024)
        };
        handoff.begin(SelectionPurpose::AddMarche, draft);
        handoff.pick(SelectionPurpose::AddMarche, LatLng::new(33.5, -7.6));

        let (form, picked) = handoff.take(SelectionPurpose::AddMarche).unwrap();
        assert_eq!(form.objet, "Éclairage public");
        assert_eq!(form.latitude, "33.5");
        assert_eq!(form.longitude, "-7.6");
        assert_eq!(picked, Some(LatLng::new(33.5, -7.6)));
        assert!(handoff.take(SelectionPurpose::AddMarche).is_none());
    }

    #[test]
    fn other_purpose_does_not_consume() {
        let mut handoff = Handoff::default();
        handoff.begin(SelectionPurpose::EditMarche(3), MarcheForm::default());
        assert!(handoff.take(SelectionPurpose::EditMarche(4)).is_none());
        assert!(handoff.is_pending());
    }

    #[test]
    fn query_parameters() {
        assert_eq!(
            SelectionPurpose::from_query(Some("edit-marche"), Some("12")),
            Some(SelectionPurpose::EditMarche(12))
        );
        assert_eq!(SelectionPurpose::from_query(Some("edit-marche"), None), None);
        assert_eq!(
            SelectionPurpose::from_query(Some("add-marche"), None),
            Some(SelectionPurpose::AddMarche)
        );
    }
}
