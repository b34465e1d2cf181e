use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::present;
use crate::email::{render_otp_email, OTP_SUBJECT};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub otp: Option<String>,
}

/// POST /functions/v1/send-password-reset-otp
///
/// Emails a one-time password for account recovery. The greeting uses the
/// first name from the profiles table; a failed lookup falls back to "User"
/// rather than blocking the reset.
pub async fn send_password_reset_otp(State(state): State<AppState>, body: Bytes) -> Response {
    let request: SendOtpRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let (Some(email), Some(otp)) = (
        present(request.email.as_deref()),
        present(request.otp.as_deref()),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Email and OTP are required" })),
        )
            .into_response();
    };

    // Profiles are keyed by lowercased email; the message itself goes to
    // the address as given.
    let first_name = match state.supabase.fetch_profile(&email.to_lowercase()).await {
        Ok(profile) => profile
            .first_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "User".to_string()),
        Err(e) => {
            tracing::error!("Error fetching profile: {}", e);
            "User".to_string()
        }
    };

    let message = json!({
        "to": email,
        "subject": OTP_SUBJECT,
        "html": render_otp_email(&first_name, otp),
    });

    match state.supabase.invoke_function("send-email", &message).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "OTP sent successfully" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
