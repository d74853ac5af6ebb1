use serde::{Deserialize, Serialize};

/// A folder of a marché's document hierarchy, as returned flat by
/// `GET /docs/tree/{marche_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: i64,
    pub nom: String,
    #[serde(default)]
    pub id_parent: Option<i64>,
    pub marche_id: i64,
}

impl DocumentNode {
    /// Parent id as the hierarchy understands it: `0` is the legacy spelling
    /// of "no parent".
    pub fn parent(&self) -> Option<i64> {
        self.id_parent.filter(|id| *id != 0)
    }
}

/// Body of `POST /docs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFolder {
    pub nom: String,
    pub id_parent: Option<i64>,
    pub marche_id: i64,
}

/// Body of `PUT /docs/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameFolder {
    pub nom: String,
}

/// `{ "total": n }` answered by the count endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountResponse {
    #[serde(default)]
    pub total: u64,
}
