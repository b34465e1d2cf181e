//! OAuth2 JWT-bearer exchange for service accounts.
//!
//! The assertion is assembled and signed by hand: a JWT here is just two
//! base64 JSON segments plus an RSASSA-PKCS1-v1_5/SHA-256 signature over
//! them. No token is cached; every exchange signs a fresh assertion.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};

use super::credential::ServiceAccount;
use super::FcmError;

pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
pub const MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime. The claim set always spans exactly this long.
const ASSERTION_LIFETIME_SECS: u64 = 3600;

#[derive(Debug, Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

/// Claims for the Google OAuth2 token endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct Claims {
    pub(crate) iss: String,
    pub(crate) scope: String,
    pub(crate) aud: String,
    pub(crate) exp: u64,
    pub(crate) iat: u64,
}

impl Claims {
    pub(crate) fn new(client_email: &str, scope: &str, issued_at: u64) -> Self {
        Claims {
            iss: client_email.to_string(),
            scope: scope.to_string(),
            aud: TOKEN_ENDPOINT.to_string(),
            exp: issued_at + ASSERTION_LIFETIME_SECS,
            iat: issued_at,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Build and sign the `header.claims.signature` assertion.
///
/// Segments use the standard base64 alphabet with padding, exactly as the
/// deployed signer emits them; Google's endpoint accepts this even though
/// RFC 7515 asks for base64url.
pub(crate) fn sign_assertion(
    account: &ServiceAccount,
    scope: &str,
    issued_at: u64,
) -> Result<String, FcmError> {
    let header = serde_json::to_vec(&Header {
        alg: "RS256",
        typ: "JWT",
    })?;
    let claims = serde_json::to_vec(&Claims::new(&account.client_email, scope, issued_at))?;

    let mut assertion = format!("{}.{}", BASE64.encode(header), BASE64.encode(claims));

    // Secret managers store the PEM with literal \n escapes.
    let pem = account.private_key.replace("\\n", "\n");
    let private_key =
        RsaPrivateKey::from_pkcs8_pem(&pem).map_err(|e| FcmError::KeyImport(e.to_string()))?;
    let signing_key = SigningKey::<Sha256>::new(private_key);
    let signature = signing_key.sign(assertion.as_bytes());

    assertion.push('.');
    assertion.push_str(&BASE64.encode(signature.to_bytes()));
    Ok(assertion)
}

/// Exchanges a signed assertion for a short-lived access token.
#[derive(Debug, Clone)]
pub struct TokenExchanger {
    http: reqwest::Client,
    token_url: String,
}

impl TokenExchanger {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            token_url: TOKEN_ENDPOINT.to_string(),
        }
    }

    /// Point the exchange at a different token endpoint. Used by tests.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Sign a fresh assertion for `account` and trade it for a bearer token.
    pub async fn exchange(
        &self,
        account: &ServiceAccount,
        scope: &str,
    ) -> Result<String, FcmError> {
        let issued_at = Utc::now().timestamp() as u64;
        let assertion = sign_assertion(account, scope, issued_at)?;

        tracing::debug!(client_email = %account.client_email, %scope, "exchanging service account for access token");

        let resp = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FcmError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = resp.json().await?;
        Ok(token.access_token)
    }
}
