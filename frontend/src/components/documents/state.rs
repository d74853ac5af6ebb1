use std::collections::HashSet;

use common::sequence::RequestSequencer;
use common::state::dialog::{DialogSlot, DocumentDialog};
use common::sync::Mutation;
use common::tree::DocumentTree;
use yew::prelude::*;

pub struct DocumentBrowser {
    /// Last tree received; `None` until the first answer.
    pub tree: Option<DocumentTree>,
    pub loading: bool,
    pub error: Option<String>,
    pub sequencer: RequestSequencer,
    pub query: String,
    /// Folder ids shown open. Ignored while a search is active, where every
    /// kept folder is open.
    pub expanded: HashSet<i64>,
    pub dialog: DialogSlot<DocumentDialog>,
    /// The mutation in flight, for its success message and follow-up.
    pub in_flight: Option<Mutation>,
    /// File picked in the upload dialog.
    pub file: Option<web_sys::File>,
    pub file_input_ref: NodeRef,
    /// Pieces whose download is running.
    pub downloading: HashSet<i64>,
}

impl DocumentBrowser {
    pub fn new() -> Self {
        Self {
            tree: None,
            loading: false,
            error: None,
            sequencer: RequestSequencer::new(),
            query: String::new(),
            expanded: HashSet::new(),
            dialog: DialogSlot::default(),
            in_flight: None,
            file: None,
            file_input_ref: NodeRef::default(),
            downloading: HashSet::new(),
        }
    }

    pub fn is_searching(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.is_searching() || self.expanded.contains(&id)
    }
}
