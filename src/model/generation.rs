use serde_json::Value;
use thiserror::Error;

pub const MIN_TOPIC_CHARS: usize = 3;
pub const MIN_WORDS: u32 = 800;
pub const MAX_WORDS: u32 = 1400;
pub const DEFAULT_WORDS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Please provide a valid topic/prompt (min 3 characters).")]
pub struct InvalidTopic;

/// A validated blog generation request. Lives for one HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Kept exactly as the client sent it; only the length check trims.
    pub topic: String,
    pub tone: Option<String>,
    pub audience: Option<String>,
    pub outline: Option<String>,
    pub words: u32,
}

impl GenerationRequest {
    /// Validates a raw JSON body.
    ///
    /// Topic length is measured in UTF-16 code units, so an astral character
    /// such as an emoji counts twice.
    ///
    /// Only `topic` can make the request invalid. Optional text fields that are
    /// not non-empty strings are dropped, and `words` is always coerced into
    /// `MIN_WORDS..=MAX_WORDS`.
    pub fn from_json(body: &Value) -> Result<Self, InvalidTopic> {
        let topic = match body.get("topic") {
            Some(Value::String(topic)) if topic.trim().encode_utf16().count() >= MIN_TOPIC_CHARS => {
                topic.clone()
            }
            _ => return Err(InvalidTopic),
        };

        Ok(Self {
            topic,
            tone: optional_text(body, "tone"),
            audience: optional_text(body, "audience"),
            outline: optional_text(body, "outline"),
            words: target_word_count(body.get("words")),
        })
    }
}

fn optional_text(body: &Value, field: &str) -> Option<String> {
    match body.get(field) {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

/// Loose numeric coercion of the `words` field, then clamped.
///
/// Follows script-style `Number(x)`: strings parse as decimal, `0x`/`0o`/`0b`
/// integers or `Infinity`; arrays go through their comma-joined text, so
/// `[1200]` is 1200. Zero and anything unparseable fall back to
/// `DEFAULT_WORDS` before clamping.
pub fn target_word_count(raw: Option<&Value>) -> u32 {
    let requested = raw.map(loose_number).unwrap_or(0.0);
    let requested = if requested == 0.0 || requested.is_nan() {
        f64::from(DEFAULT_WORDS)
    } else {
        requested
    };

    requested
        .clamp(f64::from(MIN_WORDS), f64::from(MAX_WORDS))
        .round() as u32
}

fn loose_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(true) => 1.0,
        Value::Bool(false) => 0.0,
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => string_to_number(s),
        Value::Array(_) => string_to_number(&loose_text(value)),
        Value::Object(_) => f64::NAN,
    }
}

fn loose_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(loose_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn string_to_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return f64::NAN;
        }
        // Only overflow is left as a failure.
        return u64::from_str_radix(digits, radix)
            .map(|n| n as f64)
            .unwrap_or(f64::INFINITY);
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // Rust also accepts "inf" and "NaN" spellings; only digits, sign, dot
    // and exponent are decimal literals here.
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_short_or_missing_topics() {
        for body in [
            json!({}),
            json!({ "topic": null }),
            json!({ "topic": 12345 }),
            json!({ "topic": ["rust", "async"] }),
            json!({ "topic": "ab" }),
            json!({ "topic": "   ab   " }),
            json!("just a string"),
        ] {
            assert_eq!(GenerationRequest::from_json(&body), Err(InvalidTopic), "{body}");
        }
    }

    #[test]
    fn accepts_three_char_topic_and_keeps_it_verbatim() {
        let req = GenerationRequest::from_json(&json!({ "topic": "  Rust  " })).unwrap();
        assert_eq!(req.topic, "  Rust  ");
        assert_eq!(req.words, DEFAULT_WORDS);
        assert_eq!(req.tone, None);
        assert_eq!(req.audience, None);
        assert_eq!(req.outline, None);
    }

    #[test]
    fn measures_topic_in_utf16_units() {
        assert!(GenerationRequest::from_json(&json!({ "topic": "🦀🦀" })).is_ok());
        assert!(GenerationRequest::from_json(&json!({ "topic": " 🦀 " })).is_err());
        assert!(GenerationRequest::from_json(&json!({ "topic": "é" })).is_err());
        assert!(GenerationRequest::from_json(&json!({ "topic": "日本語" })).is_ok());
    }

    #[test]
    fn word_target_is_clamped() {
        let cases = [
            (json!(50), 800),
            (json!(999999), 1400),
            (json!("abc"), 1000),
            (json!("1200"), 1200),
            (json!(" 900 "), 900),
            (json!(0), 1000),
            (json!(""), 1000),
            (json!(null), 1000),
            (json!(-5), 800),
            (json!(1100.4), 1100),
            (json!(true), 800),
            (json!({ "n": 1 }), 1000),
            (json!([1200]), 1200),
            (json!(["900"]), 900),
            (json!([[1300]]), 1300),
            (json!([]), 1000),
            (json!([1000, 1200]), 1000),
            (json!("0x4b0"), 1200),
            (json!("0b1111101000"), 1000),
            (json!("0o2260"), 1200),
            (json!("0xzz"), 1000),
            (json!("0x"), 1000),
            (json!("0x+4b0"), 1000),
            (json!("Infinity"), 1400),
            (json!("-Infinity"), 800),
            (json!("inf"), 1000),
            (json!("NaN"), 1000),
            (json!("1.2e3"), 1200),
        ];
        for (raw, expected) in cases {
            assert_eq!(target_word_count(Some(&raw)), expected, "{raw}");
        }
        assert_eq!(target_word_count(None), 1000);
    }

    #[test]
    fn optional_fields_require_non_empty_strings() {
        let req = GenerationRequest::from_json(&json!({
            "topic": "Home espresso",
            "tone": "",
            "audience": 42,
            "outline": "1. Beans\n2. Grinders",
            "words": 1300
        }))
        .unwrap();
        assert_eq!(req.tone, None);
        assert_eq!(req.audience, None);
        assert_eq!(req.outline.as_deref(), Some("1. Beans\n2. Grinders"));
        assert_eq!(req.words, 1300);
    }
}
