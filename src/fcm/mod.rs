//! Firebase Cloud Messaging delivery.
//!
//! Covers the whole chain the push handler needs: service-account
//! credentials, the OAuth2 JWT-bearer token exchange, and the FCM v1
//! `messages:send` call.

mod credential;
mod dispatch;
mod oauth;

pub use credential::{
    ConfigCredentialProvider, ProvideServiceAccount, ServiceAccount, StaticCredentialProvider,
};
pub use dispatch::FcmClient;
pub use oauth::{TokenExchanger, MESSAGING_SCOPE, TOKEN_ENDPOINT};

#[derive(Debug, thiserror::Error)]
pub enum FcmError {
    #[error("Firebase service account key not configured")]
    MissingCredential,
    #[error("invalid service account credential: {0}")]
    CredentialParse(String),
    #[error("failed to import RSA private key: {0}")]
    KeyImport(String),
    #[error("failed to encode JWT segment: {0}")]
    Encode(#[from] serde_json::Error),
    /// Token endpoint replied with a non-success status.
    #[error("OAuth2 error: {status} {body}")]
    TokenExchange { status: u16, body: String },
    /// FCM itself rejected the message.
    #[error("FCM API error: {status} {body}")]
    Messaging { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
