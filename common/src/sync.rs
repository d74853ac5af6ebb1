//! Mutations sent to the API.
//!
//! A confirmed dialog or form produces exactly one [`Mutation`]. The frontend
//! turns it into an HTTP request, and on success re-fetches the collection
//! named by [`Mutation::refetch`]. The local view is never patched in place.

use serde_json::Value;

use crate::model::document::{NewFolder, RenameFolder};
use crate::model::geometry::NewGeometry;
use crate::model::marche::{MarcheUpdate, NewMarche};
use crate::model::piece::{PieceUpdate, PieceUpload};

/// Server-side collection a view mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    DocumentTree { marche_id: i64 },
    Marches,
    Geometries { marche_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Request body of a mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    None,
    Json(Value),
    /// Multipart text fields; the file part is appended by the caller.
    Multipart(Vec<(&'static str, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateFolder(NewFolder),
    RenameFolder {
        id: i64,
        marche_id: i64,
        body: RenameFolder,
    },
    DeleteFolder {
        id: i64,
        marche_id: i64,
    },
    UploadPiece {
        marche_id: i64,
        upload: PieceUpload,
    },
    UpdatePiece {
        id: i64,
        marche_id: i64,
        body: PieceUpdate,
    },
    DeletePiece {
        id: i64,
        marche_id: i64,
    },
    CreateMarche(NewMarche),
    UpdateMarche {
        id: i64,
        body: MarcheUpdate,
    },
    DeleteMarche {
        id: i64,
    },
    CreateGeometry(NewGeometry),
}

impl Mutation {
    pub fn method(&self) -> HttpMethod {
        match self {
            Mutation::CreateFolder(_)
            | Mutation::UploadPiece { .. }
            | Mutation::CreateMarche(_)
            | Mutation::CreateGeometry(_) => HttpMethod::Post,
            Mutation::RenameFolder { .. } | Mutation::UpdatePiece { .. } | Mutation::UpdateMarche { .. } => {
                HttpMethod::Put
            }
            Mutation::DeleteFolder { .. } | Mutation::DeletePiece { .. } | Mutation::DeleteMarche { .. } => {
                HttpMethod::Delete
            }
        }
    }

    /// Path relative to the API base.
    pub fn path(&self) -> String {
        match self {
            Mutation::CreateFolder(_) => "/docs".into(),
            Mutation::RenameFolder { id, .. } | Mutation::DeleteFolder { id, .. } => format!("/docs/{id}"),
            Mutation::UploadPiece { .. } => "/pieces/upload".into(),
            Mutation::UpdatePiece { id, .. } | Mutation::DeletePiece { id, .. } => format!("/pieces/{id}"),
            Mutation::CreateMarche(_) => "/marches/add".into(),
            Mutation::UpdateMarche { id, .. } | Mutation::DeleteMarche { id } => format!("/marches/{id}"),
            Mutation::CreateGeometry(_) => "/marche-geometries/add".into(),
        }
    }

    pub fn body(&self) -> Result<Body, serde_json::Error> {
        let json = match self {
            Mutation::CreateFolder(body) => serde_json::to_value(body)?,
            Mutation::RenameFolder { body, .. } => serde_json::to_value(body)?,
            Mutation::UpdatePiece { body, .. } => serde_json::to_value(body)?,
            Mutation::CreateMarche(body) => serde_json::to_value(body)?,
            Mutation::UpdateMarche { body, .. } => serde_json::to_value(body)?,
            Mutation::CreateGeometry(body) => serde_json::to_value(body)?,
            Mutation::UploadPiece { upload, .. } => return Ok(Body::Multipart(upload.form_fields())),
            Mutation::DeleteFolder { .. } | Mutation::DeletePiece { .. } | Mutation::DeleteMarche { .. } => {
                return Ok(Body::None);
            }
        };
        Ok(Body::Json(json))
    }

    /// Collection to re-fetch once the mutation succeeded.
    pub fn refetch(&self) -> Collection {
        match self {
            Mutation::CreateFolder(body) => Collection::DocumentTree {
                marche_id: body.marche_id,
            },
            Mutation::RenameFolder { marche_id, .. }
            | Mutation::DeleteFolder { marche_id, .. }
            | Mutation::UploadPiece { marche_id, .. }
            | Mutation::UpdatePiece { marche_id, .. }
            | Mutation::DeletePiece { marche_id, .. } => Collection::DocumentTree { marche_id: *marche_id },
            Mutation::CreateMarche(_) | Mutation::UpdateMarche { .. } | Mutation::DeleteMarche { .. } => {
                Collection::Marches
            }
            Mutation::CreateGeometry(body) => Collection::Geometries {
                marche_id: body.marche_id,
            },
        }
    }

    /// Message shown when the API rejects the mutation without a message of
    /// its own.
    pub fn failure_fallback(&self) -> &'static str {
        match self {
            Mutation::CreateFolder(_) => "Erreur création dossier",
            Mutation::RenameFolder { .. } => "Erreur renommage",
            Mutation::DeleteFolder { .. } => "Erreur suppression",
            Mutation::UploadPiece { .. } => "Erreur lors de l'upload du fichier",
            Mutation::UpdatePiece { .. } => "Erreur lors de la modification de la pièce",
            Mutation::DeletePiece { .. } => "Erreur suppression pièce",
            Mutation::CreateMarche(_) => "Erreur lors de l'ajout du marché.",
            Mutation::UpdateMarche { .. } => "Erreur lors de la modification du marché.",
            Mutation::DeleteMarche { .. } => "Erreur lors de la suppression du marché",
            Mutation::CreateGeometry(_) => "Erreur lors de la sauvegarde de la géométrie",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Mutation::CreateFolder(_) => "Dossier créé",
            Mutation::RenameFolder { .. } => "Dossier renommé",
            Mutation::DeleteFolder { .. } => "Dossier supprimé",
            Mutation::UploadPiece { .. } => "Fichier importé",
            Mutation::UpdatePiece { .. } => "Pièce modifiée",
            Mutation::DeletePiece { .. } => "Pièce supprimée",
            Mutation::CreateMarche(_) => "Marché ajouté avec succès",
            Mutation::UpdateMarche { .. } => "Marché modifié avec succès",
            Mutation::DeleteMarche { .. } => "Marché supprimé",
            Mutation::CreateGeometry(_) => "Géométrie enregistrée avec succès !",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::piece::PieceKind;

    #[test]
    fn folder_mutations_refetch_the_tree() {
        let rename = Mutation::RenameFolder {
            id: 4,
            marche_id: 9,
            body: RenameFolder { nom: "Contrat".into() },
        };
        assert_eq!(rename.method(), HttpMethod::Put);
        assert_eq!(rename.path(), "/docs/4");
        assert_eq!(rename.refetch(), Collection::DocumentTree { marche_id: 9 });
        assert_eq!(
            rename.body().unwrap(),
            Body::Json(serde_json::json!({ "nom": "Contrat" }))
        );
    }

    #[test]
    fn uploads_are_multipart() {
        let upload = Mutation::UploadPiece {
            marche_id: 2,
            upload: PieceUpload {
                hierarchie_id: 5,
                description: "PV".into(),
                type_piece: PieceKind::Copie,
                nombre_pieces: 2,
            },
        };
        assert_eq!(upload.path(), "/pieces/upload");
        let Body::Multipart(fields) = upload.body().unwrap() else {
            panic!("upload must be multipart");
        };
        assert!(fields.contains(&("type_piece", "copie".to_string())));
    }

    #[test]
    fn marche_form_mutations_carry_their_own_messages() {
        use crate::model::marche::MarcheForm;
        use crate::validation::{validate_marche_update, validate_new_marche};

        let form = MarcheForm {
            num_marche: "07/2025".into(),
            objet: "Éclairage public".into(),
            ..MarcheForm::blank(2025)
        };
        let create = Mutation::CreateMarche(validate_new_marche(&form).unwrap());
        let update = Mutation::UpdateMarche {
            id: 4,
            body: validate_marche_update(&form).unwrap(),
        };

        assert_eq!(create.success_message(), "Marché ajouté avec succès");
        assert_eq!(update.success_message(), "Marché modifié avec succès");
        assert_eq!(create.failure_fallback(), "Erreur lors de l'ajout du marché.");
        assert_eq!(update.failure_fallback(), "Erreur lors de la modification du marché.");
        assert_eq!(create.refetch(), Collection::Marches);
        assert_eq!(update.refetch(), Collection::Marches);
    }

    #[test]
    fn deletes_have_no_body() {
        let delete = Mutation::DeleteMarche { id: 3 };
        assert_eq!(delete.body().unwrap(), Body::None);
        assert_eq!(delete.refetch(), Collection::Marches);
        assert_eq!(delete.method().as_str(), "DELETE");
    }
}
