//! Modal dialogs of the document browser and the marchés list.
//!
//! A [`DialogSlot`] holds at most one open dialog. Confirming validates the
//! input and yields the single [`Mutation`] to send; the dialog then waits in
//! [`Phase::Submitting`] until the outcome is resolved. A failure reopens it
//! for editing with the input intact.

use crate::model::document::{DocumentNode, NewFolder, RenameFolder};
use crate::model::piece::{Piece, PieceKind, PieceUpdate, PieceUpload};
use crate::sync::Mutation;
use crate::validation::{ValidationError, validate_folder_name, validate_piece_count};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Editing,
    Submitting,
}

/// Behaviour a dialog needs to live in a [`DialogSlot`].
pub trait Dialog: Clone {
    type Field: Copy;

    fn edit(&mut self, field: Self::Field, value: String);

    /// The mutation the confirmed dialog stands for. `Ok(None)` for dialogs
    /// that only display something.
    fn mutation(&self) -> Result<Option<Mutation>, ValidationError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenDialog<D> {
    pub dialog: D,
    pub phase: Phase,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogSlot<D> {
    open: Option<OpenDialog<D>>,
}

impl<D> Default for DialogSlot<D> {
    fn default() -> Self {
        Self { open: None }
    }
}

impl<D: Dialog> DialogSlot<D> {
    /// Opens `dialog`, replacing whatever was open.
    pub fn open(&mut self, dialog: D) {
        self.open = Some(OpenDialog {
            dialog,
            phase: Phase::Editing,
            error: None,
        });
    }

    pub fn current(&self) -> Option<&OpenDialog<D>> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.open.as_ref().is_some_and(|o| o.phase == Phase::Submitting)
    }

    /// Input change. Ignored while submitting.
    pub fn edit(&mut self, field: D::Field, value: String) {
        if let Some(open) = &mut self.open {
            if open.phase == Phase::Editing {
                open.dialog.edit(field, value);
            }
        }
    }

    /// Validates the input. On success the dialog moves to submitting and the
    /// mutation is returned; on a validation error it stays open showing the
    /// message. A confirm while already submitting yields nothing. Display
    /// only dialogs simply close.
    pub fn confirm(&mut self) -> Result<Option<Mutation>, ValidationError> {
        let Some(open) = &mut self.open else {
            return Ok(None);
        };
        if open.phase == Phase::Submitting {
            return Ok(None);
        }
        match open.dialog.mutation() {
            Ok(Some(mutation)) => {
                open.phase = Phase::Submitting;
                open.error = None;
                Ok(Some(mutation))
            }
            Ok(None) => {
                self.open = None;
                Ok(None)
            }
            Err(err) => {
                open.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Outcome of the submitted mutation.
    pub fn resolve(&mut self, outcome: Result<(), String>) {
        match outcome {
            Ok(()) => self.open = None,
            Err(message) => {
                if let Some(open) = &mut self.open {
                    open.phase = Phase::Editing;
                    open.error = Some(message);
                }
            }
        }
    }

    pub fn cancel(&mut self) {
        self.open = None;
    }
}

/// Editable fields of a piece, kept as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceForm {
    pub description: String,
    pub type_piece: PieceKind,
    pub nombre_pieces: String,
}

impl Default for PieceForm {
    fn default() -> Self {
        Self {
            description: String::new(),
            type_piece: PieceKind::Originale,
            nombre_pieces: "1".into(),
        }
    }
}

impl PieceForm {
    pub fn from_piece(piece: &Piece) -> Self {
        Self {
            description: piece.description.clone(),
            type_piece: piece.type_piece.clone(),
            nombre_pieces: piece.nombre_pieces.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    Name,
    Description,
    TypePiece,
    NombrePieces,
    /// Target folder of an upload, as a folder id.
    Folder,
    /// Chosen file of an upload; blank when the selection was cleared.
    File,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentDialog {
    CreateFolder {
        marche_id: i64,
        parent: Option<i64>,
        name: String,
    },
    RenameFolder {
        marche_id: i64,
        id: i64,
        name: String,
    },
    DeleteFolder {
        marche_id: i64,
        id: i64,
        name: String,
    },
    DeletePiece {
        marche_id: i64,
        id: i64,
        name: String,
    },
    UploadPiece {
        marche_id: i64,
        folder: Option<i64>,
        file_name: Option<String>,
        form: PieceForm,
    },
    EditPiece {
        marche_id: i64,
        id: i64,
        name: String,
        form: PieceForm,
    },
    Preview {
        url: String,
        name: String,
    },
}

impl DocumentDialog {
    pub fn create_folder(marche_id: i64, parent: Option<i64>) -> Self {
        DocumentDialog::CreateFolder {
            marche_id,
            parent,
            name: String::new(),
        }
    }

    pub fn rename_folder(node: &DocumentNode) -> Self {
        DocumentDialog::RenameFolder {
            marche_id: node.marche_id,
            id: node.id,
            name: node.nom.clone(),
        }
    }

    pub fn delete_folder(node: &DocumentNode) -> Self {
        DocumentDialog::DeleteFolder {
            marche_id: node.marche_id,
            id: node.id,
            name: node.nom.clone(),
        }
    }

    pub fn delete_piece(marche_id: i64, piece: &Piece) -> Self {
        DocumentDialog::DeletePiece {
            marche_id,
            id: piece.id,
            name: piece.nom.clone(),
        }
    }

    pub fn upload_piece(marche_id: i64, folder: Option<i64>) -> Self {
        DocumentDialog::UploadPiece {
            marche_id,
            folder,
            file_name: None,
            form: PieceForm::default(),
        }
    }

    pub fn edit_piece(marche_id: i64, piece: &Piece) -> Self {
        DocumentDialog::EditPiece {
            marche_id,
            id: piece.id,
            name: piece.nom.clone(),
            form: PieceForm::from_piece(piece),
        }
    }

    /// Preview of a stored file; `None` when the piece has no stored path.
    pub fn preview(piece: &Piece, api_base: &str) -> Option<Self> {
        Some(DocumentDialog::Preview {
            url: piece.file_url(api_base)?,
            name: piece.nom.clone(),
        })
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocumentDialog::CreateFolder { parent: None, .. } => "Nouveau dossier",
            DocumentDialog::CreateFolder { .. } => "Nouveau sous-dossier",
            DocumentDialog::RenameFolder { .. } => "Renommer le dossier",
            DocumentDialog::DeleteFolder { .. } => "Supprimer le dossier",
            DocumentDialog::DeletePiece { .. } => "Supprimer la pièce",
            DocumentDialog::UploadPiece { .. } => "Importer une pièce",
            DocumentDialog::EditPiece { .. } => "Modifier la pièce",
            DocumentDialog::Preview { .. } => "Aperçu",
        }
    }
}

impl Dialog for DocumentDialog {
    type Field = DialogField;

    fn edit(&mut self, field: DialogField, value: String) {
        match (self, field) {
            (
                DocumentDialog::CreateFolder { name, .. } | DocumentDialog::RenameFolder { name, .. },
                DialogField::Name,
            ) => *name = value,
            (DocumentDialog::UploadPiece { folder, .. }, DialogField::Folder) => {
                *folder = value.trim().parse().ok();
            }
            (DocumentDialog::UploadPiece { file_name, .. }, DialogField::File) => {
                *file_name = Some(value).filter(|v| !v.is_empty());
            }
            (
                DocumentDialog::UploadPiece { form, .. } | DocumentDialog::EditPiece { form, .. },
                field,
            ) => match field {
                DialogField::Description => form.description = value,
                DialogField::TypePiece => form.type_piece = PieceKind::from(value),
                DialogField::NombrePieces => form.nombre_pieces = value,
                _ => {}
            },
            _ => {}
        }
    }

    fn mutation(&self) -> Result<Option<Mutation>, ValidationError> {
        let mutation = match self {
            DocumentDialog::CreateFolder {
                marche_id,
                parent,
                name,
            } => Mutation::CreateFolder(NewFolder {
                nom: validate_folder_name(name)?,
                id_parent: *parent,
                marche_id: *marche_id,
            }),
            DocumentDialog::RenameFolder { marche_id, id, name } => Mutation::RenameFolder {
                id: *id,
                marche_id: *marche_id,
                body: RenameFolder {
                    nom: validate_folder_name(name)?,
                },
            },
            DocumentDialog::DeleteFolder { marche_id, id, .. } => Mutation::DeleteFolder {
                id: *id,
                marche_id: *marche_id,
            },
            DocumentDialog::DeletePiece { marche_id, id, .. } => Mutation::DeletePiece {
                id: *id,
                marche_id: *marche_id,
            },
            DocumentDialog::UploadPiece {
                marche_id,
                folder,
                file_name,
                form,
            } => {
                let (Some(folder), Some(_)) = (folder, file_name) else {
                    return Err(ValidationError::MissingUpload);
                };
                Mutation::UploadPiece {
                    marche_id: *marche_id,
                    upload: PieceUpload {
                        hierarchie_id: *folder,
                        description: form.description.trim().to_string(),
                        type_piece: form.type_piece.clone(),
                        nombre_pieces: validate_piece_count(&form.nombre_pieces)?,
                    },
                }
            }
            DocumentDialog::EditPiece {
                marche_id, id, form, ..
            } => Mutation::UpdatePiece {
                id: *id,
                marche_id: *marche_id,
                body: PieceUpdate {
                    description: form.description.trim().to_string(),
                    type_piece: form.type_piece.clone(),
                    nombre_pieces: validate_piece_count(&form.nombre_pieces)?,
                },
            },
            DocumentDialog::Preview { .. } => return Ok(None),
        };
        Ok(Some(mutation))
    }
}

/// Dialogs of the marchés list.
#[derive(Debug, Clone, PartialEq)]
pub enum MarcheDialog {
    ConfirmDelete { id: i64, num_marche: String },
}

impl Dialog for MarcheDialog {
    type Field = ();

    fn edit(&mut self, _field: (), _value: String) {}

    fn mutation(&self) -> Result<Option<Mutation>, ValidationError> {
        match self {
            MarcheDialog::ConfirmDelete { id, .. } => Ok(Some(Mutation::DeleteMarche { id: *id })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece() -> Piece {
        Piece {
            id: 21,
            nom: "Décompte 1.pdf".into(),
            fichier_path: "/uploads/decompte-1.pdf".into(),
            type_piece: PieceKind::Copie,
            description: "Premier décompte".into(),
            nombre_pieces: 3,
            created_at: "2024-05-02T08:00:00Z".into(),
            hierarchie_id: 4,
        }
    }

    #[test]
    fn create_folder_requires_a_name() {
        let mut slot = DialogSlot::default();
        slot.open(DocumentDialog::create_folder(1, Some(4)));
        assert_eq!(slot.confirm(), Err(ValidationError::EmptyFolderName));
        assert!(slot.current().unwrap().error.is_some());

        slot.edit(DialogField::Name, " Avenants ".into());
        let mutation = slot.confirm().unwrap().unwrap();
        assert_eq!(
            mutation,
            Mutation::CreateFolder(NewFolder {
                nom: "Avenants".into(),
                id_parent: Some(4),
                marche_id: 1,
            })
        );
        assert!(slot.is_submitting());
    }

    #[test]
    fn second_confirm_while_submitting_is_ignored() {
        let mut slot = DialogSlot::default();
        slot.open(DocumentDialog::delete_piece(1, &piece()));
        assert!(slot.confirm().unwrap().is_some());
        assert_eq!(slot.confirm(), Ok(None));
    }

    #[test]
    fn failure_keeps_input_for_retry() {
        let mut slot = DialogSlot::default();
        slot.open(DocumentDialog::edit_piece(1, &piece()));
        slot.edit(DialogField::NombrePieces, "5".into());
        slot.confirm().unwrap();
        slot.resolve(Err("Erreur lors de la modification de la pièce".into()));

        let open = slot.current().unwrap();
        assert_eq!(open.phase, Phase::Editing);
        assert_eq!(open.error.as_deref(), Some("Erreur lors de la modification de la pièce"));
        let DocumentDialog::EditPiece { form, .. } = &open.dialog else {
            panic!("dialog changed kind");
        };
        assert_eq!(form.nombre_pieces, "5");

        slot.confirm().unwrap();
        slot.resolve(Ok(()));
        assert!(!slot.is_open());
    }

    #[test]
    fn upload_needs_file_and_folder() {
        let mut slot = DialogSlot::default();
        slot.open(DocumentDialog::upload_piece(1, None));
        assert_eq!(slot.confirm(), Err(ValidationError::MissingUpload));
        slot.edit(DialogField::Folder, "4".into());
        slot.edit(DialogField::File, "pv.pdf".into());
        let Some(Mutation::UploadPiece { upload, .. }) = slot.confirm().unwrap() else {
            panic!("expected an upload");
        };
        assert_eq!(upload.type_piece, PieceKind::Originale);
        assert_eq!(upload.nombre_pieces, 1);
    }

    #[test]
    fn preview_closes_without_mutation() {
        let mut slot = DialogSlot::default();
        let preview = DocumentDialog::preview(&piece(), "http://localhost:5001").unwrap();
        slot.open(preview);
        assert_eq!(slot.confirm(), Ok(None));
        assert!(!slot.is_open());
    }

    #[test]
    fn marche_delete_confirmation() {
        let mut slot = DialogSlot::default();
        slot.open(MarcheDialog::ConfirmDelete {
            id: 9,
            num_marche: "9/2024".into(),
        });
        assert_eq!(slot.confirm(), Ok(Some(Mutation::DeleteMarche { id: 9 })));
        slot.cancel();
        assert!(!slot.is_open());
    }
}
