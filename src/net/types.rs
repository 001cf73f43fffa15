//! Shared wire-protocol DTOs for the order-chat channel and REST backend.
//!
//! DESIGN
//! ======
//! These types mirror backend payloads so serde stays schema-driven. Inbound
//! channel frames are discriminated by their `type` field; anything the client
//! does not recognize decodes to `InboundFrame::Unknown` and is ignored.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned chat message identifier.
pub type MessageId = i64;

/// Role of a marketplace account.
///
/// Lowercase spellings are accepted; any other value decodes to `Unknown` so
/// the message itself is still shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SenderRole {
    #[serde(alias = "client")]
    Client,
    #[serde(alias = "worker")]
    Worker,
    #[serde(alias = "admin")]
    Admin,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A single persisted or live chat message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique per order; used for deduplication.
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: MessageId,
    /// Text body.
    pub content: String,
    /// User ID of the author.
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub sender: i64,
    /// Display name of the author; missing or null decodes to empty.
    #[serde(default, deserialize_with = "deserialize_string_or_default")]
    pub sender_name: String,
    /// Marketplace role of the author.
    #[serde(default)]
    pub sender_role: SenderRole,
    /// Creation time (ISO 8601).
    pub timestamp: String,
}

/// A frame received on the order-chat channel.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    ChatMessage(ChatMessage),
    Error {
        #[serde(default)]
        message: String,
    },
    #[serde(other)]
    Unknown,
}

/// A frame sent on the order-chat channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutboundFrame<'a> {
    pub message: &'a str,
}

/// The subset of an order the chat page needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    /// Backend status literal (e.g. `"ACCEPTED"`).
    pub status: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// The signed-in account as cached by the login flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub role: SenderRole,
}

fn deserialize_string_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_i64_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            if let Some(float) = number.as_f64()
                && float.is_finite()
                && float.fract() == 0.0
                && float >= i64::MIN as f64
                && float <= i64::MAX as f64
            {
                return Ok(float as i64);
            }
            Err(D::Error::custom("expected integer-compatible number"))
        }
        // Some endpoints serialize primary keys as strings.
        serde_json::Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("expected integer string, got {text:?}"))),
        _ => Err(D::Error::custom("expected number")),
    }
}
