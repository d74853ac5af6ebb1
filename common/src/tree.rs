//! Document hierarchy of a marché, rebuilt from the flat folder and piece lists
//! after every fetch.
//!
//! Folders are stored in an arena: each input node gets an index, and parent
//! and child links are kept as indices. Construction rejects duplicate ids and
//! parent cycles. A folder whose parent id does not resolve to an input folder
//! is kept in the arena but is not attached anywhere, so it (and everything
//! below it) never shows up in the rendered forest. A parent id of `0` means
//! "root", exactly like a missing one.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::document::DocumentNode;
use crate::model::piece::Piece;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("le dossier {id} apparaît plusieurs fois dans la hiérarchie")]
    DuplicateNode { id: i64 },
    #[error("la hiérarchie contient un cycle passant par le dossier {node}")]
    Cycle { node: i64 },
}

#[derive(Debug, Clone)]
struct Slot {
    node: DocumentNode,
    parent: Option<usize>,
    children: Vec<usize>,
    pieces: Vec<Piece>,
}

/// Rendering model of one folder: its direct sub-folders and direct pieces,
/// both in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderView {
    pub node: DocumentNode,
    pub children: Vec<FolderView>,
    pub pieces: Vec<Piece>,
}

impl FolderView {
    pub fn id(&self) -> i64 {
        self.node.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentTree {
    slots: Vec<Slot>,
    roots: Vec<usize>,
    index: HashMap<i64, usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    Walking,
    Done,
}

impl DocumentTree {
    pub fn build(nodes: Vec<DocumentNode>, pieces: Vec<Piece>) -> Result<Self, TreeError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id, i).is_some() {
                return Err(TreeError::DuplicateNode { id: node.id });
            }
        }

        let parents: Vec<Option<usize>> = nodes
            .iter()
            .map(|n| n.parent().and_then(|p| index.get(&p).copied()))
            .collect();
        detect_cycle(&nodes, &parents)?;

        let mut slots: Vec<Slot> = nodes
            .into_iter()
            .zip(parents.iter().copied())
            .map(|(node, parent)| Slot {
                node,
                parent,
                children: Vec::new(),
                pieces: Vec::new(),
            })
            .collect();

        let mut roots = Vec::new();
        for i in 0..slots.len() {
            match slots[i].parent {
                Some(p) => slots[p].children.push(i),
                None if slots[i].node.parent().is_none() => roots.push(i),
                None => {}
            }
        }

        for piece in pieces {
            if let Some(&owner) = index.get(&piece.hierarchie_id) {
                slots[owner].pieces.push(piece);
            }
        }

        Ok(Self { slots, roots, index })
    }

    /// The full forest.
    pub fn views(&self) -> Vec<FolderView> {
        self.roots.iter().map(|&i| self.view(i)).collect()
    }

    fn view(&self, i: usize) -> FolderView {
        let slot = &self.slots[i];
        FolderView {
            node: slot.node.clone(),
            children: slot.children.iter().map(|&c| self.view(c)).collect(),
            pieces: slot.pieces.clone(),
        }
    }

    /// Filtered forest for the search box. A folder is kept when its name
    /// matches, when one of its pieces matches, or when a descendant is kept;
    /// only matching pieces are listed. A blank query keeps everything.
    pub fn search(&self, query: &str) -> Vec<FolderView> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.views();
        }
        self.roots.iter().filter_map(|&i| self.search_from(i, &query)).collect()
    }

    fn search_from(&self, i: usize, query: &str) -> Option<FolderView> {
        let slot = &self.slots[i];
        let children: Vec<FolderView> = slot
            .children
            .iter()
            .filter_map(|&c| self.search_from(c, query))
            .collect();
        let pieces: Vec<Piece> = slot
            .pieces
            .iter()
            .filter(|p| p.nom.to_lowercase().contains(query))
            .cloned()
            .collect();
        let keep = slot.node.nom.to_lowercase().contains(query) || !children.is_empty() || !pieces.is_empty();
        keep.then(|| FolderView {
            node: slot.node.clone(),
            children,
            pieces,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of folders on some root-to-leaf path.
    pub fn reachable_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<usize> = self.roots.clone();
        while let Some(i) = stack.pop() {
            count += 1;
            stack.extend(self.slots[i].children.iter().copied());
        }
        count
    }

    pub fn is_reachable(&self, id: i64) -> bool {
        !self.path_to(id).is_empty()
    }

    pub fn find(&self, id: i64) -> Option<&DocumentNode> {
        self.index.get(&id).map(|&i| &self.slots[i].node)
    }

    /// Ids from a root down to `id` (inclusive), or empty when `id` is not
    /// attached to the forest.
    pub fn path_to(&self, id: i64) -> Vec<i64> {
        let Some(&start) = self.index.get(&id) else {
            return Vec::new();
        };
        let mut path = vec![id];
        let mut cur = start;
        while let Some(parent) = self.slots[cur].parent {
            path.push(self.slots[parent].node.id);
            cur = parent;
        }
        if !self.roots.contains(&cur) {
            return Vec::new();
        }
        path.reverse();
        path
    }

    /// Pieces owned directly by folder `id`.
    pub fn pieces_of(&self, id: i64) -> &[Piece] {
        self.index
            .get(&id)
            .map(|&i| self.slots[i].pieces.as_slice())
            .unwrap_or(&[])
    }
}

fn detect_cycle(nodes: &[DocumentNode], parents: &[Option<usize>]) -> Result<(), TreeError> {
    let mut state = vec![Visit::Pending; nodes.len()];
    for start in 0..nodes.len() {
        let mut walked = Vec::new();
        let mut cur = Some(start);
        while let Some(i) = cur {
            match state[i] {
                Visit::Done => break,
                Visit::Walking => return Err(TreeError::Cycle { node: nodes[i].id }),
                Visit::Pending => {
                    state[i] = Visit::Walking;
                    walked.push(i);
                    cur = parents[i];
                }
            }
        }
        for i in walked {
            state[i] = Visit::Done;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::piece::PieceKind;

    fn folder(id: i64, parent: Option<i64>, nom: &str) -> DocumentNode {
        DocumentNode {
            id,
            nom: nom.into(),
            id_parent: parent,
            marche_id: 1,
        }
    }

    fn piece(id: i64, owner: i64, nom: &str) -> Piece {
        Piece {
            id,
            nom: nom.into(),
            fichier_path: format!("/uploads/{nom}"),
            type_piece: PieceKind::Originale,
            description: String::new(),
            nombre_pieces: 1,
            created_at: "2024-03-01T10:00:00Z".into(),
            hierarchie_id: owner,
        }
    }

    #[test]
    fn children_keep_input_order() {
        let tree = DocumentTree::build(
            vec![
                folder(1, None, "Marché"),
                folder(3, Some(1), "Décomptes"),
                folder(2, Some(1), "Contrat"),
            ],
            vec![],
        )
        .unwrap();
        let views = tree.views();
        let names: Vec<_> = views[0].children.iter().map(|c| c.node.nom.as_str()).collect();
        assert_eq!(names, ["Décomptes", "Contrat"]);
    }

    #[test]
    fn zero_parent_is_a_root() {
        let tree = DocumentTree::build(vec![folder(5, Some(0), "Racine")], vec![]).unwrap();
        assert_eq!(tree.views().len(), 1);
        assert_eq!(tree.path_to(5), vec![5]);
    }

    #[test]
    fn cycles_and_duplicates_are_rejected() {
        let cycle = DocumentTree::build(
            vec![folder(1, Some(2), "a"), folder(2, Some(3), "b"), folder(3, Some(1), "c")],
            vec![],
        );
        assert!(matches!(cycle, Err(TreeError::Cycle { .. })));

        let own_parent = DocumentTree::build(vec![folder(4, Some(4), "self")], vec![]);
        assert_eq!(own_parent.unwrap_err(), TreeError::Cycle { node: 4 });

        let dup = DocumentTree::build(vec![folder(1, None, "a"), folder(1, None, "b")], vec![]);
        assert_eq!(dup.unwrap_err(), TreeError::DuplicateNode { id: 1 });
    }

    #[test]
    fn search_keeps_ancestors_of_matches() {
        let tree = DocumentTree::build(
            vec![
                folder(1, None, "Marché"),
                folder(2, Some(1), "Contrat"),
                folder(3, None, "Archives"),
            ],
            vec![piece(10, 2, "CPS signé.pdf"), piece(11, 2, "Avenant.pdf")],
        )
        .unwrap();
        let found = tree.search("cps");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), 1);
        assert_eq!(found[0].children[0].pieces.len(), 1);
        assert_eq!(found[0].children[0].pieces[0].id, 10);
        assert_eq!(tree.search("  ").len(), 2);
    }
}
