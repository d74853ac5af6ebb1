use common::error::ApiError;
use common::model::marche::{Marche, MarchesPayload};
use common::pagination::{MarcheQuery, Page};

use crate::config::ALL_MARCHES_LIMIT;

pub async fn list(query: &MarcheQuery) -> Result<Page<Marche>, ApiError> {
    let payload: MarchesPayload = super::get_json("/marches", &query.query_pairs()).await?;
    Ok(payload.into_page())
}

/// Every marché in one request, for the map and the dashboard figures.
pub async fn all() -> Result<Vec<Marche>, ApiError> {
    let query = [("limit", ALL_MARCHES_LIMIT.to_string())];
    let payload: MarchesPayload = super::get_json("/marches", &query).await?;
    Ok(payload.into_page().data)
}

pub async fn get(id: i64) -> Result<Marche, ApiError> {
    super::get_json(&format!("/marches/{id}"), &[]).await
}
