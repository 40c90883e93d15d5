//! Chat export records as they appear on disk.
//!
//! Exports come from different tools, so the record is lenient: common field
//! aliases are accepted, `text` may be a string or a list of rich-text
//! fragments, and `date` may be RFC 3339, a naive UTC timestamp or Unix
//! seconds. A record without an id, sender or parseable date is rejected.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use hilo_core::entities::{MediaRef, Mention, RawMessage};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub id: Option<i64>,
    #[serde(alias = "from_id")]
    pub sender_id: Option<WireId>,
    #[serde(alias = "from", alias = "sender_name")]
    pub sender_display_name: Option<String>,
    #[serde(alias = "username")]
    pub sender_handle: Option<String>,
    #[serde(default)]
    pub text: WireText,
    #[serde(alias = "timestamp")]
    pub date: Option<WireDate>,
    #[serde(alias = "reply_to_message_id")]
    pub reply_to_id: Option<i64>,
    #[serde(default)]
    pub reactions: BTreeMap<String, u32>,
    #[serde(default)]
    pub mentions: Vec<Mention>,
    pub media: Option<MediaRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireText {
    Plain(String),
    Fragments(Vec<WireFragment>),
}

impl Default for WireText {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireFragment {
    Plain(String),
    Entity { text: String },
}

/// Numeric id, or a string such as `"user123"` ending in one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl WireId {
    fn value(&self) -> Option<i64> {
        match self {
            Self::Number(id) => Some(*id),
            Self::Text(raw) => {
                let digits = raw.trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-');
                digits.parse().ok()
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireDate {
    Unix(i64),
    Text(String),
}

impl WireText {
    fn flatten(self) -> String {
        match self {
            Self::Plain(text) => text,
            Self::Fragments(parts) => parts
                .into_iter()
                .map(|p| match p {
                    WireFragment::Plain(text) | WireFragment::Entity { text } => text,
                })
                .collect(),
        }
    }
}

impl WireDate {
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Unix(secs) => DateTime::from_timestamp(*secs, 0),
            Self::Text(raw) => {
                let raw = raw.trim();
                if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                    return Some(dt.with_timezone(&Utc));
                }
                if let Ok(secs) = raw.parse::<i64>() {
                    return DateTime::from_timestamp(secs, 0);
                }
                ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                    .map(|naive| naive.and_utc())
            }
        }
    }
}

impl WireMessage {
    /// Convert into a [`RawMessage`] of `chat_id`, or explain what is missing.
    pub fn into_raw(self, chat_id: i64) -> Result<RawMessage, String> {
        let id = self.id.ok_or("missing id")?;
        let sender_id = self
            .sender_id
            .as_ref()
            .and_then(WireId::value)
            .ok_or("missing sender_id")?;
        let timestamp = match &self.date {
            None => return Err("missing date".into()),
            Some(date) => date
                .to_utc()
                .ok_or_else(|| format!("unparseable date {date:?}"))?,
        };
        Ok(RawMessage {
            id,
            chat_id,
            sender_id,
            sender_display_name: self
                .sender_display_name
                .unwrap_or_else(|| format!("user {sender_id}")),
            sender_handle: self.sender_handle.filter(|h| !h.is_empty()),
            text: self.text.flatten(),
            timestamp,
            reply_to_id: self.reply_to_id,
            reactions: self.reactions,
            mentions: self.mentions,
            media: self.media,
        })
    }
}

/// Parse one JSON value as a message of `chat_id`.
pub fn parse_record(value: serde_json::Value, chat_id: i64) -> Result<RawMessage, String> {
    serde_json::from_value::<WireMessage>(value)
        .map_err(|e| e.to_string())?
        .into_raw(chat_id)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_telegram_style_records() {
        let message = parse_record(
            json!({
                "id": 5,
                "from_id": "user77",
                "from": "Ana",
                "username": "ana_mx",
                "date": "2024-05-10T09:30:00",
                "text": ["hola ", {"type": "link", "text": "https://t.me/durov"}],
                "reply_to_message_id": 4
            }),
            1,
        )
        .unwrap();
        assert_eq!(message.id, 5);
        assert_eq!(message.sender_id, 77);
        assert_eq!(message.sender_display_name, "Ana");
        assert_eq!(message.sender_handle.as_deref(), Some("ana_mx"));
        assert_eq!(message.text, "hola https://t.me/durov");
        assert_eq!(message.reply_to_id, Some(4));
        assert_eq!(
            message.timestamp,
            Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn dates_in_several_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        for date in [
            json!("2024-05-10T09:00:00Z"),
            json!("2024-05-10T11:00:00+02:00"),
            json!("2024-05-10 09:00:00"),
            json!(1_715_331_600),
            json!("1715331600"),
        ] {
            let message = parse_record(
                json!({ "id": 1, "sender_id": 2, "text": "x", "date": date }),
                1,
            )
            .unwrap();
            assert_eq!(message.timestamp, expected, "{date}");
        }
    }

    #[test]
    fn incomplete_records_are_rejected() {
        let no_date = parse_record(json!({ "id": 1, "sender_id": 2, "text": "x" }), 1);
        assert_eq!(no_date.unwrap_err(), "missing date");

        let bad_date = parse_record(
            json!({ "id": 1, "sender_id": 2, "text": "x", "date": "ayer" }),
            1,
        );
        assert!(bad_date.unwrap_err().starts_with("unparseable date"));

        assert!(parse_record(json!({ "sender_id": 2, "date": 0 }), 1).is_err());
        assert!(parse_record(json!("not an object"), 1).is_err());
    }
}
