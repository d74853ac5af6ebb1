use common::error::ApiError;
use common::model::document::{CountResponse, DocumentNode};
use common::model::piece::Piece;
use common::tree::DocumentTree;

/// Folders and pieces of a marché, assembled into its tree.
pub async fn tree(marche_id: i64) -> Result<DocumentTree, ApiError> {
    let nodes: Vec<DocumentNode> = super::get_json(&format!("/docs/tree/{marche_id}"), &[]).await?;
    let pieces: Vec<Piece> = super::get_json(&format!("/pieces/marche/{marche_id}"), &[]).await?;
    DocumentTree::build(nodes, pieces).map_err(|err| ApiError::Decode(err.to_string()))
}

pub async fn count() -> Result<u64, ApiError> {
    let count: CountResponse = super::get_json("/docs/count", &[]).await?;
    Ok(count.total)
}
