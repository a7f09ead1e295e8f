use thiserror::Error;

/// Errors returned by the Telegram Bot API client.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Network or TLS failure from the underlying HTTP client. The request URL
    /// is stripped because it embeds the bot token.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP 400: the request was rejected, e.g. `chat not found`.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// HTTP 403: the bot may not message this chat (blocked, deactivated, kicked).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// HTTP 429: flood control. Not retried by the client.
    #[error("rate limited: {description}")]
    RateLimited {
        retry_after_secs: Option<u64>,
        description: String,
    },

    /// Any other `"ok": false` response.
    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },

    /// The photo to upload could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {context}: {source}")]
    Encode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl TelegramError {
    /// Wrap a `reqwest` error without its URL.
    pub(crate) fn http(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }

    /// Map an `"ok": false` response to a typed error.
    #[must_use]
    pub fn from_api(code: i64, description: String, retry_after_secs: Option<u64>) -> Self {
        match code {
            400 => Self::BadRequest(description),
            403 => Self::Forbidden(description),
            429 => Self::RateLimited {
                retry_after_secs,
                description,
            },
            _ => Self::Api { code, description },
        }
    }

    /// `true` when the recipient cannot be reached at all: the bot was
    /// blocked, the account was deactivated, or the chat does not exist.
    #[must_use]
    pub fn is_recipient_unreachable(&self) -> bool {
        match self {
            Self::Forbidden(_) => true,
            Self::BadRequest(description) => description.contains("chat not found"),
            _ => false,
        }
    }
}
