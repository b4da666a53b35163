use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::error::CodecError;
use crate::models::UserRecord;

/// Decode a stored payload (base64 over pretty JSON) into records.
/// GitHub wraps base64 content at 60 columns, so whitespace is dropped first.
pub fn decode_records(encoded: &str) -> Result<Vec<UserRecord>, CodecError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    let text = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&text)?)
}

/// Pretty JSON, 2-space indent, then base64.
pub fn encode_records(records: &[UserRecord]) -> Result<String, CodecError> {
    let json = serde_json::to_string_pretty(records)?;
    Ok(STANDARD.encode(json.as_bytes()))
}
