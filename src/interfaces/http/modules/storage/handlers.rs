//! Object download handler
//!
//! Serves `GET /storage/{bucket}/{*path}`, the URL shape returned by the
//! object stores' `public_url`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::application::ObjectStore;
use crate::domain::DomainError;
use crate::interfaces::http::common::{api_error, ApiError};

#[derive(Clone)]
pub struct StorageHandlerState {
    pub objects: Arc<dyn ObjectStore>,
}

#[utoipa::path(
    get,
    path = "/storage/{bucket}/{path}",
    tag = "Storage",
    params(
        ("bucket" = String, Path, description = "Bucket name, e.g. meter-photos"),
        ("path" = String, Path, description = "Object path within the bucket")
    ),
    responses(
        (status = 200, description = "Object bytes"),
        (status = 404, description = "Object not found")
    )
)]
pub async fn get_object(
    State(state): State<StorageHandlerState>,
    Path((bucket, path)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let object = state
        .objects
        .get(&bucket, &path)
        .await
        .map_err(api_error)?
        .ok_or_else(|| {
            api_error(DomainError::NotFound {
                entity: "Object",
                field: "path",
                value: format!("{}/{}", bucket, path),
            })
        })?;

    let content_type = HeaderValue::from_str(&object.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=3600")),
        ],
        object.bytes,
    )
        .into_response())
}
