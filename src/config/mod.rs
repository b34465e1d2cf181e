use std::env;
use std::fmt::{self, Debug};

/// Runtime configuration, read once at startup.
///
/// Secrets intentionally default to empty rather than failing fast: a
/// missing `SUPABASE_URL` or service-role key surfaces as a failed
/// downstream call on the request that needs it, which is how the deployed
/// functions behave.
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub supabase_url: String,
    pub supabase_service_role_key: String,
    /// Raw service-account JSON as stored in the secret manager, if set.
    pub firebase_service_account_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8000);

        Self {
            port,
            supabase_url: env::var("SUPABASE_URL").unwrap_or_default(),
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_default(),
            firebase_service_account_key: env::var("FIREBASE_SERVICE_ACCOUNT_KEY").ok(),
        }
    }
}

impl Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("supabase_url", &self.supabase_url)
            .field("supabase_service_role_key", &"<redacted>")
            .field(
                "firebase_service_account_key",
                &self.firebase_service_account_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
