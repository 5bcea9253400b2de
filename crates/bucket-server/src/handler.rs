use axum::body::Body;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Query, Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{Json, Response};
use bucket_store::StoreError;
use bucket_types::BlobId;
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Multipart field carrying the uploaded content.
pub const UPLOAD_FIELD: &str = "file";

/// Body of a successful upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "hashData")]
    pub hash_data: String,
}

impl UploadResponse {
    pub fn new(id: &BlobId) -> Self {
        Self {
            hash_data: id.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FetchParams {
    #[serde(default)]
    pub hash: Option<String>,
}

/// `POST /upload`: stream the `file` field into the store.
pub async fn upload_handler(
    State(state): State<AppState>,
    request: Request,
) -> ServerResult<Json<UploadResponse>> {
    if request.method() != Method::POST {
        return Err(ServerError::UnsupportedMethod(request.method().clone()));
    }
    let limit = state.max_upload_bytes;
    let mut multipart = Multipart::from_request(request, &state)
        .await
        .map_err(|e| ServerError::InvalidFile(e.body_text()))?;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        // A part without a file name is a plain form value, not a file.
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let mut upload = state.store.begin_upload(&filename).await?;
        while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
            upload.write(&chunk).await?;
        }
        let id = upload.commit().await?;
        return Ok(Json(UploadResponse::new(&id)));
    }
    Err(ServerError::MissingField(UPLOAD_FIELD))
}

/// Body limit → 413, malformed framing → 400, failure to read the
/// transport → 500.
fn multipart_error(err: MultipartError, limit: usize) -> ServerError {
    let status = err.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge { limit }
    } else if status.is_client_error() {
        ServerError::InvalidFile(err.body_text())
    } else {
        ServerError::Store(StoreError::read_failure(err.body_text()))
    }
}

/// `GET /fetch?hash=<id>`: return the whole stored object.
pub async fn fetch_handler(
    State(state): State<AppState>,
    method: Method,
    query: Option<Query<FetchParams>>,
) -> ServerResult<Response> {
    if method != Method::GET {
        return Err(ServerError::UnsupportedMethod(method));
    }
    let hash = query.and_then(|Query(params)| params.hash).unwrap_or_default();
    let path = state.store.locate(&hash).await?;
    tracing::debug!(hash = %hash, "serving blob");

    // A fresh request carries no Range or conditional headers, so the
    // whole file is always returned.
    let response = ServeFile::new(&path)
        .oneshot(Request::new(Body::empty()))
        .await
        .unwrap_or_else(|never| match never {});
    Ok(response.map(Body::new))
}

/// Liveness probe.
pub async fn health_handler() -> &'static str {
    "ok"
}
