use common::error::ApiError;
use common::model::piece::Piece;
use common::sequence::Ticket;
use common::state::dialog::{DialogField, DocumentDialog};
use common::tree::DocumentTree;

pub enum Msg {
    Reload,
    Loaded(Ticket, Result<DocumentTree, ApiError>),
    Search(String),
    Toggle(i64),
    ExpandAll,
    CollapseAll,
    Open(DocumentDialog),
    Preview(Piece),
    Edit(DialogField, String),
    FileChosen(Option<web_sys::File>),
    Confirm,
    Cancel,
    Done(Result<String, ApiError>),
    Download(Piece),
    Downloaded(i64, Result<(), ApiError>),
}
