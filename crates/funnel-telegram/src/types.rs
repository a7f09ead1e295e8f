//! Telegram Bot API request and response types.
//!
//! Every response is wrapped in a `{"ok": true, "result": ...}` envelope, or
//! `{"ok": false, "error_code": ..., "description": ...}` on failure;
//! [`ApiResponse`] captures both shapes.

use serde::{Deserialize, Serialize};

/// Top-level envelope for all Bot API responses.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

/// Extra details attached to some error responses.
#[derive(Debug, Deserialize)]
pub struct ResponseParameters {
    /// Seconds to wait before retrying after a 429.
    #[serde(default)]
    pub retry_after: Option<u64>,
    /// Set when a group was upgraded to a supergroup.
    #[serde(default)]
    pub migrate_to_chat_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// sendPhoto
// ---------------------------------------------------------------------------

/// The message returned by `sendPhoto`.
#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub date: i64,
    /// Available sizes of the uploaded photo, smallest first.
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
}

// ---------------------------------------------------------------------------
// reply_markup
// ---------------------------------------------------------------------------

/// Buttons shown under a message, as rows of buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// A keyboard with one button that opens `url`.
    #[must_use]
    pub fn single_url_button(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: text.into(),
                url: url.into(),
            }]],
        }
    }
}

/// A button that opens a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub url: String,
}
