// src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendered in place of any quote whose live fetch failed.
pub const FETCH_FAILED_MARKER: &str = "取得失敗";

/// A fetched number together with the precision its provider displays it at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteValue {
    pub value: f64,
    pub decimals: Option<usize>,
}

impl QuoteValue {
    pub fn fixed(value: f64, decimals: usize) -> Self {
        QuoteValue {
            value,
            decimals: Some(decimals),
        }
    }

    /// Displayed exactly as received, without rounding.
    pub fn raw(value: f64) -> Self {
        QuoteValue {
            value,
            decimals: None,
        }
    }
}

impl fmt::Display for QuoteValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.decimals {
            Some(decimals) => f.write_str(&round_half_up(self.value, decimals)),
            None => write!(f, "{}", self.value),
        }
    }
}

/// Rounds the exact binary value to `decimals` places, ties away from zero.
/// `{:.N}` would round ties to even (`149.125` -> `149.12`).
fn round_half_up(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };

    // An f64 has at most 1074 fractional digits, so this expansion is exact.
    let exact = format!("{:.1074}", value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(decimals))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes().get(decimals).map_or(false, |&b| b >= b'5') {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, 1);
                break;
            }
            i -= 1;
            if digits[i] == 9 {
                digits[i] = 0;
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let int_len = digits.len() - decimals;
    let mut out = String::from(sign);
    out.extend(digits[..int_len].iter().map(|d| char::from(b'0' + d)));
    if decimals > 0 {
        out.push('.');
        out.extend(digits[int_len..].iter().map(|d| char::from(b'0' + d)));
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOutcome {
    Fetched(QuoteValue),
    Failed(String),
}

impl QuoteOutcome {
    pub fn from_result(result: anyhow::Result<QuoteValue>) -> Self {
        match result {
            Ok(value) => QuoteOutcome::Fetched(value),
            Err(e) => QuoteOutcome::Failed(format!("{:#}", e)),
        }
    }
}

impl fmt::Display for QuoteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QuoteOutcome::Fetched(value) => write!(f, "{}", value),
            QuoteOutcome::Failed(_) => f.write_str(FETCH_FAILED_MARKER),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteResult {
    pub usd_jpy: QuoteOutcome,
    pub sp500: QuoteOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub text: String,
}

impl NotificationMessage {
    pub fn from_quotes(quotes: &QuoteResult) -> Self {
        NotificationMessage {
            text: format!(
                "【朝の金融ニュース】\n\n・USD/JPY: {} 円\n・S&P 500: {}",
                quotes.usd_jpy, quotes.sp500
            ),
        }
    }
}

/// JSON body of every response the endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusBody {
    pub fn new(message: impl Into<String>) -> Self {
        StatusBody {
            message: message.into(),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn fixed_values_round_to_two_decimals() {
        assert_eq!(QuoteValue::fixed(149.8765, 2).to_string(), "149.88");
        assert_eq!(QuoteValue::fixed(512.3, 2).to_string(), "512.30");
    }

    #[test]
    fn exact_ties_round_up() {
        assert_eq!(QuoteValue::fixed(149.125, 2).to_string(), "149.13");
        assert_eq!(QuoteValue::fixed(0.125, 2).to_string(), "0.13");
        assert_eq!(QuoteValue::fixed(-1.125, 2).to_string(), "-1.13");
        assert_eq!(QuoteValue::fixed(512.375, 2).to_string(), "512.38");
    }

    #[test]
    fn near_ties_follow_the_binary_value() {
        // 1.005 is stored as 1.00499999999999989...
        assert_eq!(QuoteValue::fixed(1.005, 2).to_string(), "1.00");
        assert_eq!(QuoteValue::fixed(9.999, 2).to_string(), "10.00");
        assert_eq!(QuoteValue::fixed(99.995, 0).to_string(), "100");
        assert_eq!(QuoteValue::fixed(150.0, 2).to_string(), "150.00");
    }

    #[test]
    fn raw_values_keep_their_shortest_form() {
        assert_eq!(QuoteValue::raw(512.3).to_string(), "512.3");
        assert_eq!(QuoteValue::raw(5000.0).to_string(), "5000");
    }

    #[test]
    fn failed_outcome_renders_marker_and_keeps_reason() {
        let outcome = QuoteOutcome::from_result(Err(anyhow!("connection refused")));
        assert_eq!(outcome.to_string(), FETCH_FAILED_MARKER);
        assert_eq!(outcome, QuoteOutcome::Failed("connection refused".to_string()));
    }

    #[test]
    fn message_follows_template() {
        let quotes = QuoteResult {
            usd_jpy: QuoteOutcome::Fetched(QuoteValue::fixed(149.8765, 2)),
            sp500: QuoteOutcome::Failed("timeout".to_string()),
        };
        let message = NotificationMessage::from_quotes(&quotes);
        assert_eq!(
            message.text,
            "【朝の金融ニュース】\n\n・USD/JPY: 149.88 円\n・S&P 500: 取得失敗"
        );
    }

    #[test]
    fn status_body_omits_missing_error() {
        let json = serde_json::to_value(StatusBody::new("Method Not Allowed")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Method Not Allowed" }));
    }
}
