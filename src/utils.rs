//! Utility functions for record ids and user references

use uuid7::uuid7;

// uuid7 is time-ordered, so ids sort by creation without a separate counter
pub fn new_sanction_id() -> String {
    uuid7().to_string()
}

/// Pull a platform user id out of free text. Forms hand us either a raw id
/// or a mention like `<@111222333444555666>`; the id is the first run of
/// 15 or more digits.
pub fn extract_user_id(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut start = None;

    for (i, b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            if i - s >= 15 {
                return Some(text[s..i].to_string());
            }
        }
    }
    if let Some(s) = start {
        if bytes.len() - s >= 15 {
            return Some(text[s..].to_string());
        }
    }
    None
}
