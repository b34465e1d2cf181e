use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    /// Non-2xx reply from the platform; the body text is the message the
    /// handlers report back to the caller.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Row shape returned by the profile lookup.
#[derive(Debug, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Service-role client for the Supabase admin surface.
///
/// Uses the privileged service-role key on every call, so it must only ever
/// run server-side.
#[derive(Debug, Clone)]
pub struct SupabaseAdmin {
    http: reqwest::Client,
    base_url: String,
    service_role_key: String,
}

impl SupabaseAdmin {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        service_role_key: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            service_role_key: service_role_key.into(),
        }
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    /// Mark all of a user's bookings cancelled and soft-deleted.
    pub async fn soft_delete_bookings(&self, user_id: &str) -> Result<(), SupabaseError> {
        let url = format!("{}/rest/v1/bookings", self.base_url);
        let body = json!({
            "status": "cancelled",
            "is_deleted": true,
            "updated_at": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });

        let resp = self
            .authed(self.http.patch(&url))
            .query(&[("user_id", format!("eq.{user_id}"))])
            .json(&body)
            .send()
            .await?;

        check(resp).await.map(|_| ())
    }

    /// Delete a user from auth.users through the admin API.
    pub async fn delete_auth_user(&self, user_id: &str) -> Result<(), SupabaseError> {
        let url = format!("{}/auth/v1/admin/users/{}", self.base_url, user_id);

        let resp = self.authed(self.http.delete(&url)).send().await?;

        check(resp).await.map(|_| ())
    }

    /// Last-resort deletion through the `delete_user_account` SQL function.
    pub async fn delete_user_rpc(&self, user_id: &str) -> Result<(), SupabaseError> {
        let url = format!("{}/rest/v1/rpc/delete_user_account", self.base_url);

        let resp = self
            .authed(self.http.post(&url))
            .json(&json!({ "user_id": user_id }))
            .send()
            .await?;

        check(resp).await.map(|_| ())
    }

    /// Fetch the single profile row for an email address.
    ///
    /// The `Accept` header asks PostgREST for exactly one object, so zero or
    /// multiple matches come back as an `Api` error.
    pub async fn fetch_profile(&self, email: &str) -> Result<Profile, SupabaseError> {
        let url = format!("{}/rest/v1/profiles", self.base_url);

        let resp = self
            .authed(self.http.get(&url))
            .header("Accept", "application/vnd.pgrst.object+json")
            .query(&[
                ("select", "first_name,last_name".to_string()),
                ("email", format!("eq.{email}")),
            ])
            .send()
            .await?;

        Ok(check(resp).await?.json::<Profile>().await?)
    }

    /// Invoke another edge function by name.
    pub async fn invoke_function(&self, name: &str, body: &Value) -> Result<(), SupabaseError> {
        let url = format!("{}/functions/v1/{}", self.base_url, name);

        let resp = self.authed(self.http.post(&url)).json(body).send().await?;

        check(resp).await.map(|_| ())
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, SupabaseError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = resp.text().await.unwrap_or_default();
    Err(SupabaseError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let admin = SupabaseAdmin::new(
            reqwest::Client::new(),
            "https://abc.supabase.co/",
            "service-role-key",
        );
        assert_eq!(admin.base_url, "https://abc.supabase.co");
    }

    #[test]
    fn api_error_displays_body_text_only() {
        let err = SupabaseError::Api {
            status: 500,
            message: "User not allowed".to_string(),
        };
        assert_eq!(err.to_string(), "User not allowed");
    }

    #[test]
    fn profile_tolerates_missing_columns() {
        let profile: Profile = serde_json::from_str("{}").unwrap();
        assert!(profile.first_name.is_none());
        assert!(profile.last_name.is_none());
    }
}
