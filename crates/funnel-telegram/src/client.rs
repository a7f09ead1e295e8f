//! HTTP client for the Telegram Bot API.
//!
//! Wraps `reqwest` with bot-token handling, multipart photo upload, and
//! typed error mapping. Every call checks the `"ok"` field of the JSON
//! envelope and surfaces failures as [`TelegramError`] variants keyed on the
//! API error code.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::TelegramError;
use crate::types::{ApiResponse, InlineKeyboardMarkup, Message};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Client for the Telegram Bot API.
///
/// Use [`TelegramClient::new`] for production or
/// [`TelegramClient::with_base_url`] to point at a mock server in tests.
pub struct TelegramClient {
    client: Client,
    token: String,
    /// Normalised to end with exactly one `/`.
    base_url: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("token", &"[redacted]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Creates a new client pointed at the production Bot API.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, TelegramError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`TelegramError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("funnel/0.1 (promo-delivery)")
            .build()
            .map_err(TelegramError::http)?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        Url::parse(&normalised).map_err(|e| TelegramError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url: normalised,
        })
    }

    /// Uploads the PNG at `photo` to `chat_id`, with optional inline buttons.
    ///
    /// # Errors
    ///
    /// - [`TelegramError::Io`] if the file cannot be read.
    /// - [`TelegramError::BadRequest`], [`TelegramError::Forbidden`],
    ///   [`TelegramError::RateLimited`] or [`TelegramError::Api`] when the
    ///   API rejects the message.
    /// - [`TelegramError::Http`] on network failure.
    /// - [`TelegramError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn send_photo(
        &self,
        chat_id: i64,
        photo: &Path,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError> {
        let bytes = tokio::fs::read(photo)
            .await
            .map_err(|e| TelegramError::Io {
                path: photo.display().to_string(),
                source: e,
            })?;
        let file_name = photo
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo.png")
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/png")
            .map_err(TelegramError::http)?;

        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", part);
        if let Some(markup) = reply_markup {
            let encoded = serde_json::to_string(markup).map_err(|e| TelegramError::Encode {
                context: "reply_markup".to_string(),
                source: e,
            })?;
            form = form.text("reply_markup", encoded);
        }

        let message: Message = self.post_multipart("sendPhoto", form).await?;
        tracing::debug!(
            chat_id,
            message_id = message.message_id,
            "photo delivered"
        );
        Ok(message)
    }

    /// Full URL of a Bot API method: `{base}/bot{token}/{method}`.
    ///
    /// Built by string concatenation: tokens contain `:`, which `Url::join`
    /// would read as a scheme separator.
    fn method_url(&self, method: &str) -> String {
        format!("{}bot{}/{method}", self.base_url, self.token)
    }

    /// Sends a multipart POST and unwraps the response envelope.
    async fn post_multipart<T: DeserializeOwned>(
        &self,
        method: &str,
        form: Form,
    ) -> Result<T, TelegramError> {
        let response = self
            .client
            .post(self.method_url(method))
            .multipart(form)
            .send()
            .await
            .map_err(TelegramError::http)?;
        let status = response.status();
        let body = response.text().await.map_err(TelegramError::http)?;

        let envelope: ApiResponse<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::from_api(
                    i64::from(status.as_u16()),
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected response")
                        .to_string(),
                    None,
                ));
            }
            Err(e) => {
                return Err(TelegramError::Deserialize {
                    context: method.to_string(),
                    source: e,
                });
            }
        };

        Self::unwrap_envelope(envelope, i64::from(status.as_u16()))
    }

    /// Returns `result` on `"ok": true`, otherwise the typed error.
    fn unwrap_envelope<T>(envelope: ApiResponse<T>, http_status: i64) -> Result<T, TelegramError> {
        if envelope.ok {
            return envelope.result.ok_or_else(|| TelegramError::Api {
                code: http_status,
                description: "response has no result".to_string(),
            });
        }

        let code = envelope.error_code.unwrap_or(http_status);
        let description = envelope
            .description
            .unwrap_or_else(|| "unknown error".to_string());
        let retry_after = envelope.parameters.and_then(|p| p.retry_after);
        Err(TelegramError::from_api(code, description, retry_after))
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
