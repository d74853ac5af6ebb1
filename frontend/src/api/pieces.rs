use common::error::ApiError;
use common::model::document::CountResponse;
use common::model::piece::Piece;
use gloo_file::{Blob, ObjectUrl};
use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;

use crate::config::API_BASE;

pub async fn count() -> Result<u64, ApiError> {
    let count: CountResponse = super::get_json("/pieces/count", &[]).await?;
    Ok(count.total)
}

/// Fetches the stored file and hands it to the browser as a download.
pub async fn download(piece: &Piece) -> Result<(), ApiError> {
    let Some(url) = piece.file_url(API_BASE) else {
        return Err(ApiError::Decode("fichier introuvable".into()));
    };
    let bytes = super::get_bytes(&url).await?;
    let object_url = ObjectUrl::from(Blob::new(bytes.as_slice()));

    let anchor = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.create_element("a").ok())
        .and_then(|e| e.dyn_into::<HtmlAnchorElement>().ok());
    let anchor = anchor.ok_or_else(|| ApiError::Download("lien de téléchargement indisponible".into()))?;
    anchor.set_href(&object_url);
    anchor.set_download(&piece.nom);
    anchor.click();
    Ok(())
}
