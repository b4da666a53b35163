use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One registered user as stored in a role's JSON file.
///
/// Field order matters: it is the key order of the pretty-printed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    /// bcrypt hash; the key stays `password` to match the stored layout.
    /// Empty when a stored record has no `password`, and then not written back.
    #[serde(rename = "password", default, skip_serializing_if = "String::is_empty")]
    pub password_hash: String,
    /// ISO-8601 with millisecond precision, kept as the stored string.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    /// Keys written by other tools; carried through untouched on rewrite.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: format_timestamp(created_at),
            extra: Map::new(),
        }
    }
}

/// `2024-01-01T00:00:00.000Z` style timestamps.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(ts), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_serialized_keys() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let record = UserRecord::new("alice", "$2b$10$abc", ts);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "username": "alice",
                "password": "$2b$10$abc",
                "created_at": "2024-01-01T00:00:00.000Z"
            })
        );
    }
}
