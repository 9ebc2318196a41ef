use serde::{Deserialize, Serialize};

/// Upper bound on message text, in UTF-16 code units.
pub const MAX_MESSAGE_LEN: usize = 255;

/// Minimum password length, in UTF-16 code units.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Length in UTF-16 code units. Characters outside the Basic Multilingual
/// Plane (most emoji) count as two.
pub fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// A registered account. The password is stored and echoed back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: i64,
    pub username: String,
    pub password: String,
}

/// A posted message, owned by the account in `posted_by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: i64,
    pub posted_by: i64,
    pub message_text: String,
    /// Seconds since the Unix epoch.
    pub time_posted_epoch: i64,
}
