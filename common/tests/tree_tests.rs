use marches_common::model::document::DocumentNode;
use marches_common::model::piece::{Piece, PieceKind};
use marches_common::tree::{DocumentTree, FolderView};

fn folder(id: i64, parent: Option<i64>) -> DocumentNode {
    DocumentNode {
        id,
        nom: format!("Dossier {id}"),
        id_parent: parent,
        marche_id: 7,
    }
}

fn piece(id: i64, owner: i64) -> Piece {
    Piece {
        id,
        nom: format!("piece-{id}.pdf"),
        fichier_path: format!("/uploads/piece-{id}.pdf"),
        type_piece: PieceKind::Originale,
        description: String::new(),
        nombre_pieces: 1,
        created_at: String::new(),
        hierarchie_id: owner,
    }
}

fn collect_ids(views: &[FolderView], out: &mut Vec<i64>) {
    for view in views {
        out.push(view.id());
        collect_ids(&view.children, out);
    }
}

fn collect_pieces(views: &[FolderView], out: &mut Vec<(i64, i64)>) {
    for view in views {
        out.extend(view.pieces.iter().map(|p| (p.id, view.id())));
        collect_pieces(&view.children, out);
    }
}

/// 1 and 2 are roots (null and zero parent), 3 and 4 hang below them, 5
/// points at a folder that does not exist and 6 sits under 5.
fn sample_nodes() -> Vec<DocumentNode> {
    vec![
        folder(1, None),
        folder(2, Some(0)),
        folder(3, Some(1)),
        folder(4, Some(3)),
        folder(5, Some(99)),
        folder(6, Some(5)),
    ]
}

#[test]
fn reachable_count_matches_resolving_parents() {
    let tree = DocumentTree::build(sample_nodes(), vec![]).expect("acyclic input");
    assert_eq!(tree.reachable_count(), 4);

    let mut ids = Vec::new();
    collect_ids(&tree.views(), &mut ids);
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn dangling_parent_is_on_no_path() {
    let tree = DocumentTree::build(sample_nodes(), vec![]).expect("acyclic input");
    assert!(tree.path_to(5).is_empty());
    assert!(tree.path_to(6).is_empty());
    assert!(!tree.is_reachable(6));
    assert_eq!(tree.path_to(4), vec![1, 3, 4]);
    assert!(tree.find(5).is_some());
}

#[test]
fn pieces_sit_under_their_declared_owner_only() {
    let pieces = vec![piece(10, 4), piece(11, 1), piece(12, 4), piece(13, 6), piece(14, 404)];
    let tree = DocumentTree::build(sample_nodes(), pieces).expect("acyclic input");

    let mut placed = Vec::new();
    collect_pieces(&tree.views(), &mut placed);
    placed.sort_unstable();
    assert_eq!(placed, vec![(10, 4), (11, 1), (12, 4)]);

    let under_four: Vec<i64> = tree.pieces_of(4).iter().map(|p| p.id).collect();
    assert_eq!(under_four, vec![10, 12]);
}

#[test]
fn empty_input_gives_empty_forest() {
    let tree = DocumentTree::build(vec![], vec![piece(1, 1)]).expect("empty input");
    assert!(tree.is_empty());
    assert_eq!(tree.reachable_count(), 0);
}
