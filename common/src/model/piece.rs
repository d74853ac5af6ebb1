use serde::{Deserialize, Serialize};

/// Whether a filed piece is the original document or a copy.
///
/// Unknown tags coming from the API are preserved as `Other` so that an edit
/// round-trip does not rewrite them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PieceKind {
    #[default]
    Originale,
    Copie,
    Other(String),
}

impl PieceKind {
    pub fn as_str(&self) -> &str {
        match self {
            PieceKind::Originale => "originale",
            PieceKind::Copie => "copie",
            PieceKind::Other(tag) => tag,
        }
    }
}

impl From<String> for PieceKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "originale" => PieceKind::Originale,
            "copie" => PieceKind::Copie,
            _ => PieceKind::Other(tag),
        }
    }
}

impl From<PieceKind> for String {
    fn from(kind: PieceKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A file attached to a document node (`hierarchie_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: i64,
    pub nom: String,
    #[serde(default)]
    pub fichier_path: String,
    #[serde(default)]
    pub type_piece: PieceKind,
    #[serde(default)]
    pub description: String,
    #[serde(default = "one")]
    pub nombre_pieces: u32,
    #[serde(default)]
    pub created_at: String,
    pub hierarchie_id: i64,
}

fn one() -> u32 {
    1
}

impl Piece {
    /// Absolute URL of the stored file. Relative storage paths are served by
    /// the API host; an empty path means nothing can be previewed.
    pub fn file_url(&self, api_base: &str) -> Option<String> {
        let path = self.fichier_path.trim();
        if path.is_empty() {
            None
        } else if path.starts_with("http") {
            Some(path.to_string())
        } else {
            Some(format!("{}{}", api_base.trim_end_matches('/'), path))
        }
    }

    /// Creation day (`YYYY-MM-DD`) out of the API timestamp.
    pub fn created_day(&self) -> &str {
        self.created_at.get(..10).unwrap_or(&self.created_at)
    }
}

/// Body of `PUT /pieces/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceUpdate {
    pub description: String,
    pub type_piece: PieceKind,
    pub nombre_pieces: u32,
}

/// Text fields of the multipart `POST /pieces/upload`; the file part is
/// attached by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceUpload {
    pub hierarchie_id: i64,
    pub description: String,
    pub type_piece: PieceKind,
    pub nombre_pieces: u32,
}

impl PieceUpload {
    /// Form fields in the order the upload endpoint reads them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("hierarchie_id", self.hierarchie_id.to_string()),
            ("description", self.description.clone()),
            ("type_piece", self.type_piece.as_str().to_string()),
            ("nombre_pieces", self.nombre_pieces.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kinds_survive_a_round_trip() {
        let piece: Piece = serde_json::from_str(
            r#"{"id":3,"nom":"pv.pdf","type_piece":"scan","hierarchie_id":9}"#,
        )
        .unwrap();
        assert_eq!(piece.type_piece, PieceKind::Other("scan".into()));
        assert_eq!(piece.nombre_pieces, 1);
        let json = serde_json::to_value(&piece).unwrap();
        assert_eq!(json["type_piece"], "scan");
    }

    #[test]
    fn file_url_resolves_relative_paths() {
        let mut piece: Piece = serde_json::from_str(
            r#"{"id":3,"nom":"pv.pdf","fichier_path":"/uploads/pv.pdf","hierarchie_id":9}"#,
        )
        .unwrap();
        assert_eq!(
            piece.file_url("http://localhost:5001/").as_deref(),
            Some("http://localhost:5001/uploads/pv.pdf")
        );
        piece.fichier_path = "https://cdn.example.org/pv.pdf".into();
        assert_eq!(
            piece.file_url("http://localhost:5001").as_deref(),
            Some("https://cdn.example.org/pv.pdf")
        );
        piece.fichier_path.clear();
        assert_eq!(piece.file_url("http://localhost:5001"), None);
    }
}
