use anyhow::anyhow;
use axum::{
    Extension, Json, debug_handler,
    extract::{Query, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::{ApiError, AppState, Claims, Role, StoreError, authorize, resolve_key};

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

/// Acknowledgement returned by the write/delete routes.
#[derive(Debug, Serialize, Deserialize)]
pub struct WriteAck {
    pub key: String,
}

fn validated_key(name: &str) -> Result<String, ApiError> {
    if name.is_empty() {
        return Err(ApiError::BadRequest(anyhow!("name query parameter is required")));
    }
    Ok(resolve_key(name))
}

/// GET /api/files?name= - public read, replies with the stored content type.
#[debug_handler]
#[instrument(skip_all, fields(name = query.name))]
pub async fn get_file(
    State(appstate): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<Response, ApiError> {
    let key = validated_key(&query.name)?;
    let blob = appstate.blobs.get(&key).await?;
    info!(key, content_type = blob.content_type, "serving blob");
    Ok(([(CONTENT_TYPE, blob.content_type)], blob.content).into_response())
}

/// GET /api/listJson?filter= - keys containing the substring, `.json` when
/// no filter is given.
#[debug_handler]
#[instrument(skip_all)]
pub async fn list_json(
    State(appstate): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let filter = query.filter.unwrap_or_else(|| ".json".to_string());
    let mut keys = appstate.blobs.list().await?;
    keys.retain(|k| k.contains(&filter));
    info!(filter, count = keys.len(), "listing filtered keys");
    Ok(Json(keys))
}

/// GET /api/listAll - the raw, unfiltered key listing. Admin only.
#[debug_handler]
#[instrument(skip_all, fields(user = %claims.sub))]
pub async fn list_all(
    Extension(claims): Extension<Claims>,
    State(appstate): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    authorize(&claims, Role::Admin)?;
    let keys = appstate.blobs.list().await?;
    Ok(Json(keys))
}

fn write_content_type(headers: &axum::http::HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("application/json")
        .to_string()
}

/// PUT /api/files?name= - create-or-overwrite. Admin only.
#[debug_handler]
#[instrument(skip_all, fields(user = %claims.sub, name = query.name))]
pub async fn put_file(
    Extension(claims): Extension<Claims>,
    State(appstate): State<AppState>,
    Query(query): Query<FileQuery>,
    headers: axum::http::HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WriteAck>), ApiError> {
    authorize(&claims, Role::Admin)?;
    let key = validated_key(&query.name)?;
    let content_type = write_content_type(&headers);
    appstate
        .blobs
        .put(&key, body, &content_type)
        .await
        .inspect_err(|e| error!("{}", e))?;
    info!(key, "blob stored");
    Ok((StatusCode::CREATED, Json(WriteAck { key })))
}

/// POST /api/files?name= - update-only write: 404 when the key does not
/// exist yet. Admin only. The existence check and the write are two calls;
/// the store is last-write-wins per key, so the race is accepted.
#[debug_handler]
#[instrument(skip_all, fields(user = %claims.sub, name = query.name))]
pub async fn update_file(
    Extension(claims): Extension<Claims>,
    State(appstate): State<AppState>,
    Query(query): Query<FileQuery>,
    headers: axum::http::HeaderMap,
    body: Bytes,
) -> Result<Json<WriteAck>, ApiError> {
    authorize(&claims, Role::Admin)?;
    let key = validated_key(&query.name)?;
    match appstate.blobs.get(&key).await {
        Ok(_) => {}
        Err(StoreError::NotFound) => {
            info!(key, "update rejected, no such blob");
            return Err(ApiError::NotFound);
        }
        Err(e) => return Err(e.into()),
    }
    let content_type = write_content_type(&headers);
    appstate
        .blobs
        .put(&key, body, &content_type)
        .await
        .inspect_err(|e| error!("{}", e))?;
    info!(key, "blob updated");
    Ok(Json(WriteAck { key }))
}

/// DELETE /api/files?name= - remove the key, 404 when it never existed.
/// Admin only.
#[debug_handler]
#[instrument(skip_all, fields(user = %claims.sub, name = query.name))]
pub async fn delete_file(
    Extension(claims): Extension<Claims>,
    State(appstate): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<Json<WriteAck>, ApiError> {
    authorize(&claims, Role::Admin)?;
    let key = validated_key(&query.name)?;
    appstate
        .blobs
        .delete(&key)
        .await
        .inspect_err(|e| error!("{}", e))?;
    info!(key, "blob deleted");
    Ok(Json(WriteAck { key }))
}
