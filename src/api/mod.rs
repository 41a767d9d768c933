mod files;
mod session;
mod users;

pub use files::*;
pub use session::*;
pub use users::*;

use axum::{
    Json, Router, middleware,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{AppState, bearer_auth};

//-------------------------------------- blob routes --------------------------------------
pub fn storage_objects(state: AppState) -> Router<AppState> {
    let guarded = middleware::from_fn_with_state(state, bearer_auth);
    Router::new()
        .route(
            "/api/files",
            get(get_file).merge(
                put(put_file)
                    .post(update_file)
                    .delete(delete_file)
                    .layer(guarded.clone()),
            ),
        )
        .route("/api/listJson", get(list_json))
        .route("/api/listAll", get(list_all).layer(guarded))
}

//-------------------------------------- user routes --------------------------------------
pub fn user_management() -> Router<AppState> {
    Router::new()
        .route("/api/signup", post(signup))
        .route("/api/signin", post(signin))
        .route("/api/listUser", get(list_users))
}

//-------------------------------------- admin session ------------------------------------
pub fn admin_session() -> Router<AppState> {
    Router::new().route("/auth", get(session_login))
}

/// Catch-all: a JSON body naming the path and method, same shape on every
/// unmatched route.
pub async fn no_route(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "msg": "no route handler found",
            "path": uri.path(),
            "method": method.as_str(),
        })),
    )
}
