//! Internal helpers for amount parsing and tag encoding.
//!
//! Amounts are stored in minor units (paise for INR). External inputs carry
//! decimal strings with at most two fraction digits.

use crate::{EngineError, ResultEngine};

/// Parse a decimal amount string (`"150"`, `"150.5"`, `"150.00"`) into minor
/// units. Rejects negatives, more than two fraction digits, and garbage.
pub fn parse_amount_minor(value: &str) -> ResultEngine<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation("amount must not be empty".to_string()));
    }

    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(EngineError::Validation(format!("invalid amount: {value}")));
    }
    if frac.len() > 2 {
        return Err(EngineError::Validation(format!(
            "invalid amount: {value} has more than two fraction digits"
        )));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(EngineError::Validation(format!("invalid amount: {value}")));
    }

    let whole_minor: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<i64>()
            .map_err(|_| EngineError::Validation(format!("invalid amount: {value}")))?
            .checked_mul(100)
            .ok_or_else(|| EngineError::Validation(format!("amount out of range: {value}")))?
    };
    let frac_minor: i64 = match frac.len() {
        0 => 0,
        1 => {
            frac.parse::<i64>()
                .map_err(|_| EngineError::Validation(format!("invalid amount: {value}")))?
                * 10
        }
        _ => frac
            .parse::<i64>()
            .map_err(|_| EngineError::Validation(format!("invalid amount: {value}")))?,
    };

    whole_minor
        .checked_add(frac_minor)
        .ok_or_else(|| EngineError::Validation(format!("amount out of range: {value}")))
}

/// Format minor units back into a two-digit decimal string.
pub fn format_amount_minor(amount_minor: i64) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Decode the tags text column. Malformed content degrades to no tags rather
/// than failing the whole read.
pub(crate) fn decode_tags(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Encode tags for storage.
pub(crate) fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_amount_minor("150").unwrap(), 15000);
        assert_eq!(parse_amount_minor("150.5").unwrap(), 15050);
        assert_eq!(parse_amount_minor("150.00").unwrap(), 15000);
        assert_eq!(parse_amount_minor(".50").unwrap(), 50);
        assert_eq!(parse_amount_minor("0.01").unwrap(), 1);
    }

    #[test]
    fn rejects_bad_amounts() {
        assert!(parse_amount_minor("").is_err());
        assert!(parse_amount_minor("-5").is_err());
        assert!(parse_amount_minor("1.005").is_err());
        assert!(parse_amount_minor("abc").is_err());
        assert!(parse_amount_minor(".").is_err());
    }

    #[test]
    fn formats_minor_units() {
        assert_eq!(format_amount_minor(15000), "150.00");
        assert_eq!(format_amount_minor(5), "0.05");
        assert_eq!(format_amount_minor(-150), "-1.50");
    }

    #[test]
    fn tags_round_trip_and_degrade() {
        let tags = vec!["sms-auto".to_string()];
        assert_eq!(decode_tags(&encode_tags(&tags)), tags);
        assert!(decode_tags("not json").is_empty());
    }
}
