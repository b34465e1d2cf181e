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
pub struct SendPushRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub payload: Option<String>,
}

/// POST /functions/v1/send-push-notification
///
/// Relays a notification to a device via FCM and passes the provider
/// response through. Failures are logged in full but reported to the
/// caller with a fixed message.
pub async fn send_push_notification(State(state): State<AppState>, body: Bytes) -> Response {
    let request: SendPushRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Error sending push notification: {}", e);
            return failed().into_response();
        }
    };

    let Some(token) = present(request.token.as_deref()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "FCM token is required" })),
        )
            .into_response();
    };

    match state
        .fcm
        .send(token, request.title, request.body, request.payload)
        .await
    {
        Ok(provider_response) => (StatusCode::OK, Json(provider_response)).into_response(),
        Err(e) => {
            tracing::error!("Error sending push notification: {}", e);
            failed().into_response()
        }
    }
}

fn failed() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to send push notification" })),
    )
}
