//! Newsletter subscription proxy
//!
//! Thin forwarding layer in front of an EmailOctopus-style list API, so the
//! list id and API key never reach the browser. Credentials come from the
//! environment; without them the proxy stays disabled.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config::NewsletterConfig;

/// Environment variable holding the provider API key
pub const API_KEY_VAR: &str = "EMAILOCTOPUS_API_KEY";
/// Environment variable holding the target list id
pub const LIST_ID_VAR: &str = "EMAILOCTOPUS_LIST_ID";

/// A subscription request from the newsletter form
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    #[serde(default)]
    pub locale: String,
}

/// The localized message returned to the form
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeResponse {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum NewsletterError {
    /// The list provider rejected the subscription
    #[error("list provider returned status {status}")]
    Upstream { status: u16 },

    /// The provider could not be reached
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Client for the list provider's contacts endpoint
pub struct NewsletterClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl NewsletterClient {
    /// Build a client from config plus environment credentials.
    ///
    /// Returns `None` when either credential is missing, which disables the
    /// proxy route rather than failing requests later.
    pub fn from_env(config: &NewsletterConfig) -> Option<Self> {
        let api_key = std::env::var(API_KEY_VAR).ok()?;
        let list_id = std::env::var(LIST_ID_VAR).ok()?;
        Some(Self::new(&config.api_url, &api_key, &list_id))
    }

    pub fn new(api_url: &str, api_key: &str, list_id: &str) -> Self {
        let endpoint = format!(
            "{}/lists/{}/contacts",
            api_url.trim_end_matches('/'),
            list_id
        );
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key: api_key.to_string(),
        }
    }

    /// Forward a subscription to the list provider
    pub async fn subscribe(&self, email: &str, locale: &str) -> Result<(), NewsletterError> {
        let payload = build_payload(&self.api_key, email, locale);

        let response = self.http.post(&self.endpoint).json(&payload).send().await?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(NewsletterError::Upstream { status });
        }

        Ok(())
    }
}

/// The provider payload: key, address, and the locale as a contact field
fn build_payload(api_key: &str, email: &str, locale: &str) -> serde_json::Value {
    json!({
        "api_key": api_key,
        "email_address": email,
        "fields": {
            "Language": language_field(locale),
        },
    })
}

/// The human-readable language name stored on the contact
pub fn language_field(locale: &str) -> &'static str {
    match locale {
        "es" => "Spanish",
        _ => "English",
    }
}

/// Localized confirmation shown after a successful subscription
pub fn success_message(locale: &str) -> &'static str {
    match locale {
        "es" => "¡Suscrito!  🎉",
        _ => "Subscribed!  🎉",
    }
}

/// Localized message shown when the provider rejects the subscription
pub fn failure_message(locale: &str) -> &'static str {
    match locale {
        "es" => "Hubo un error al suscribirse a la lista.",
        _ => "There was an error subscribing to the list.",
    }
}
