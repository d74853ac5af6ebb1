use common::error::ApiError;
use common::model::geometry::MarcheGeometry;

pub async fn list(marche_id: i64) -> Result<Vec<MarcheGeometry>, ApiError> {
    super::get_json(&format!("/marche-geometries/{marche_id}"), &[]).await
}
