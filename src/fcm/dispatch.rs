use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::credential::ProvideServiceAccount;
use super::oauth::{TokenExchanger, MESSAGING_SCOPE};
use super::FcmError;

const FCM_API_BASE: &str = "https://fcm.googleapis.com";

/// FCM v1 message envelope.
#[derive(Debug, Serialize)]
struct MessageEnvelope {
    message: Message,
}

#[derive(Debug, Serialize)]
struct Message {
    token: String,
    notification: Notification,
    data: MessageData,
    android: Android,
    apns: Apns,
}

#[derive(Debug, Serialize)]
struct Notification {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
}

#[derive(Debug, Serialize)]
struct MessageData {
    payload: String,
}

#[derive(Debug, Serialize)]
struct Android {
    notification: AndroidNotification,
}

#[derive(Debug, Serialize)]
struct AndroidNotification {
    sound: &'static str,
    priority: &'static str,
    click_action: &'static str,
}

#[derive(Debug, Serialize)]
struct Apns {
    payload: ApnsPayload,
}

#[derive(Debug, Serialize)]
struct ApnsPayload {
    aps: Aps,
}

#[derive(Debug, Serialize)]
struct Aps {
    sound: &'static str,
    badge: u32,
}

impl MessageEnvelope {
    fn new(token: &str, title: Option<String>, body: Option<String>, payload: Option<String>) -> Self {
        MessageEnvelope {
            message: Message {
                token: token.to_string(),
                notification: Notification { title, body },
                data: MessageData {
                    payload: payload.unwrap_or_default(),
                },
                android: Android {
                    notification: AndroidNotification {
                        sound: "default",
                        priority: "high",
                        click_action: "FLUTTER_NOTIFICATION_CLICK",
                    },
                },
                apns: Apns {
                    payload: ApnsPayload {
                        aps: Aps {
                            sound: "default",
                            badge: 1,
                        },
                    },
                },
            },
        }
    }
}

/// Client for the FCM v1 send API.
///
/// Every send performs a full sign-and-exchange cycle for the access token;
/// nothing is cached between calls.
#[derive(Clone)]
pub struct FcmClient {
    http: reqwest::Client,
    credentials: Arc<dyn ProvideServiceAccount>,
    exchanger: TokenExchanger,
    api_base: String,
}

impl FcmClient {
    pub fn new(http: reqwest::Client, credentials: Arc<dyn ProvideServiceAccount>) -> Self {
        let exchanger = TokenExchanger::new(http.clone());
        Self {
            http,
            credentials,
            exchanger,
            api_base: FCM_API_BASE.to_string(),
        }
    }

    /// Point the client at a different FCM host. Used by tests.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Point the token exchange at a different endpoint. Used by tests.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.exchanger = self.exchanger.with_token_url(url);
        self
    }

    /// Deliver one notification to a device token and return the provider
    /// response as-is.
    pub async fn send(
        &self,
        token: &str,
        title: Option<String>,
        body: Option<String>,
        payload: Option<String>,
    ) -> Result<Value, FcmError> {
        let account = self.credentials.provide_service_account().await?;
        let access_token = self.exchanger.exchange(&account, MESSAGING_SCOPE).await?;

        let envelope = MessageEnvelope::new(token, title, body, payload);
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.api_base, account.project_id
        );

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&access_token)
            .json(&envelope)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FcmError::Messaging {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json().await?)
    }
}
