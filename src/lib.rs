use std::sync::Arc;

use axum::http::{header, HeaderName};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod email;
pub mod fcm;
pub mod handlers;
pub mod supabase;

use crate::config::AppConfig;
use crate::fcm::{ConfigCredentialProvider, FcmClient};
use crate::supabase::SupabaseAdmin;

/// Shared clients handed to every handler through axum state.
///
/// Everything in here is cheap to clone: the reqwest client and the
/// credential provider are reference-counted internally.
#[derive(Clone)]
pub struct AppState {
    pub supabase: SupabaseAdmin,
    pub fcm: FcmClient,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        let http = reqwest::Client::new();

        let supabase = SupabaseAdmin::new(
            http.clone(),
            &config.supabase_url,
            &config.supabase_service_role_key,
        );

        let credentials =
            ConfigCredentialProvider::new(config.firebase_service_account_key.clone());
        let fcm = FcmClient::new(http, Arc::new(credentials));

        Self { supabase, fcm }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(
            "/functions/v1/delete-user-account",
            post(handlers::delete_account),
        )
        .route(
            "/functions/v1/send-password-reset-otp",
            post(handlers::send_password_reset_otp).layer(otp_cors_layer()),
        )
        .route(
            "/functions/v1/send-push-notification",
            post(handlers::send_push_notification),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS contract for the password-reset flow, which is called straight from
/// the browser. The other functions are invoked server-to-server and carry
/// no CORS headers.
fn otp_cors_layer() -> CorsLayer {
    CorsLayer::new().allow_origin(Any).allow_headers([
        header::AUTHORIZATION,
        HeaderName::from_static("x-client-info"),
        HeaderName::from_static("apikey"),
        header::CONTENT_TYPE,
    ])
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "HostelConnect Functions",
            "version": version,
            "endpoints": {
                "delete-user-account": "/functions/v1/delete-user-account (POST)",
                "send-password-reset-otp": "/functions/v1/send-password-reset-otp (POST)",
                "send-push-notification": "/functions/v1/send-push-notification (POST)",
            }
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}
