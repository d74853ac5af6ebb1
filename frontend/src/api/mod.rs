//! HTTP client for the marchés API.
//!
//! Every request carries the session cookie (`credentials: include`). Errors
//! come back classified as [`ApiError`]: a request that never reached the
//! server is a network error naming [`API_BASE`], a non-2xx answer is a
//! rejection carrying the server message when it sent one.

pub mod auth;
pub mod documents;
pub mod geometries;
pub mod marches;
pub mod pieces;

use common::error::ApiError;
use common::sync::{Body, HttpMethod, Mutation};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::{FormData, RequestCredentials};

use crate::config::API_BASE;

pub fn url(path: &str) -> String {
    format!("{}{}", API_BASE.trim_end_matches('/'), path)
}

fn network(_err: gloo_net::Error) -> ApiError {
    ApiError::Network {
        endpoint: API_BASE.to_string(),
    }
}

fn decode(err: impl ToString) -> ApiError {
    ApiError::Decode(err.to_string())
}

fn js_error(err: JsValue) -> ApiError {
    ApiError::Decode(format!("{err:?}"))
}

fn with_credentials(builder: RequestBuilder) -> RequestBuilder {
    builder.credentials(RequestCredentials::Include)
}

async fn check(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_response(status, &body))
}

pub async fn get_json<T: DeserializeOwned>(path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
    let response = with_credentials(Request::get(&url(path)))
        .query(query.iter().map(|(k, v)| (*k, v)))
        .send()
        .await
        .map_err(network)?;
    check(response).await?.json::<T>().await.map_err(decode)
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiError> {
    let response = with_credentials(Request::post(&url(path)))
        .json(body)
        .map_err(decode)?
        .send()
        .await
        .map_err(network)?;
    check(response).await?.json::<T>().await.map_err(decode)
}

/// POST without a meaningful answer body.
pub async fn post_empty<B: Serialize>(path: &str, body: &B) -> Result<(), ApiError> {
    let response = with_credentials(Request::post(&url(path)))
        .json(body)
        .map_err(decode)?
        .send()
        .await
        .map_err(network)?;
    check(response).await.map(|_| ())
}

/// Raw bytes of an absolute URL (stored files).
pub async fn get_bytes(absolute_url: &str) -> Result<Vec<u8>, ApiError> {
    let response = with_credentials(Request::get(absolute_url))
        .send()
        .await
        .map_err(network)?;
    check(response).await?.binary().await.map_err(decode)
}

/// Sends a mutation and returns the raw answer body. `file` is attached to
/// multipart bodies as the `file` part.
pub async fn execute(mutation: &Mutation, file: Option<&web_sys::File>) -> Result<String, ApiError> {
    let target = url(&mutation.path());
    let builder = with_credentials(match mutation.method() {
        HttpMethod::Post => Request::post(&target),
        HttpMethod::Put => Request::put(&target),
        HttpMethod::Delete => Request::delete(&target),
    });

    let request = match mutation.body().map_err(decode)? {
        Body::None => builder.build(),
        Body::Json(value) => builder.json(&value),
        Body::Multipart(fields) => {
            let form = FormData::new().map_err(js_error)?;
            for (key, value) in fields {
                form.append_with_str(key, &value).map_err(js_error)?;
            }
            if let Some(file) = file {
                form.append_with_blob_and_filename("file", file, &file.name())
                    .map_err(js_error)?;
            }
            builder.body(form)
        }
    }
    .map_err(decode)?;

    let response = request.send().await.map_err(network)?;
    let response = check(response).await?;
    Ok(response.text().await.unwrap_or_default())
}
