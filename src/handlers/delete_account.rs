use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::present;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// POST /functions/v1/delete-user-account
///
/// Cancels the user's bookings, then removes the account through the auth
/// admin API, falling back to the `delete_user_account` SQL function. When
/// both deletions fail, the admin API's error is the one reported.
pub async fn delete_account(State(state): State<AppState>, body: Bytes) -> Response {
    let request: DeleteAccountRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    };

    let (Some(user_id), Some(_email)) = (
        present(request.user_id.as_deref()),
        present(request.email.as_deref()),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Missing required parameters" })),
        )
            .into_response();
    };

    // Related data first: soft-delete the user's bookings. The account
    // deletion proceeds whatever happens here.
    if let Err(e) = state.supabase.soft_delete_bookings(user_id).await {
        tracing::warn!("bookings soft-delete failed for {}: {}", user_id, e);
    }

    match state.supabase.delete_auth_user(user_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "User successfully deleted" })),
        )
            .into_response(),
        Err(primary) => {
            tracing::error!("Error deleting user: {}", primary);

            match state.supabase.delete_user_rpc(user_id).await {
                Ok(()) => (
                    StatusCode::OK,
                    Json(json!({ "success": true, "message": "User deleted via RPC" })),
                )
                    .into_response(),
                Err(fallback) => {
                    tracing::error!("RPC deletion error: {}", fallback);
                    // The admin API failure stays the reported error.
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "success": false, "error": primary.to_string() })),
                    )
                        .into_response()
                }
            }
        }
    }
}
