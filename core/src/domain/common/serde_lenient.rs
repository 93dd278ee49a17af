//! Deserialization helpers for loosely-typed JSON coming from the model
//! or from documents written by older clients.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// First signed number in free text, with optional `,` digit grouping.
static EMBEDDED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?\d{1,3}(?:,\d{3})+(?:\.\d+)?|-?\d+(?:\.\d+)?")
        .expect("embedded number pattern is valid")
});

/// Renders a scalar as text. Objects are flattened when they look like an
/// ingredient (`name` plus optional `quantity`/`amount`).
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_to_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(map) => {
            let name = map.get("name").and_then(value_to_text)?;
            let quantity = map
                .get("quantity")
                .or_else(|| map.get("amount"))
                .and_then(value_to_text);

            Some(match quantity {
                Some(quantity) => format!("{name} ({quantity})"),
                None => name,
            })
        }
    }
}

pub fn value_to_text_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(value_to_text).collect(),
        Value::Null => Vec::new(),
        other => value_to_text(other).into_iter().collect(),
    }
}

pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s).and_then(|n| n.parse::<f64>().ok()),
        _ => None,
    }
}

pub fn value_to_u32(value: &Value) -> Option<u32> {
    value_to_f64(value)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.round() as u32)
}

pub fn value_to_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

/// "25 minutes" -> "25", "1,250 kcal" -> "1250", "-2.5" -> "-2.5"
fn leading_number(text: &str) -> Option<String> {
    EMBEDDED_NUMBER
        .find(text)
        .map(|m| m.as_str().replace(',', ""))
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(&value).unwrap_or_default())
}

pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(&value))
}

pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text_list(&value))
}

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value))
}

pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_u32(&value))
}

pub fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_datetime(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ingredient_objects_are_flattened() {
        let value = json!(["rice", {"name": "egg", "quantity": 2}, {"name": "salt"}, null, ""]);
        assert_eq!(
            value_to_text_list(&value),
            vec!["rice".to_string(), "egg (2)".to_string(), "salt".to_string()]
        );
    }

    #[test]
    fn test_numbers_parse_from_text() {
        assert_eq!(value_to_u32(&json!("25 minutes")), Some(25));
        assert_eq!(value_to_u32(&json!("about 30")), Some(30));
        assert_eq!(value_to_f64(&json!("7.5g")), Some(7.5));
        assert_eq!(value_to_f64(&json!(12)), Some(12.0));
        assert_eq!(value_to_u32(&json!("quick")), None);
        assert_eq!(value_to_f64(&json!("1,250 kcal")), Some(1250.0));
        assert_eq!(value_to_u32(&json!("2,000")), Some(2000));
        assert_eq!(value_to_f64(&json!("12,345.5 mg")), Some(12345.5));
        assert_eq!(value_to_f64(&json!("-3.5")), Some(-3.5));
        assert_eq!(value_to_u32(&json!("-4")), None);
    }

    #[test]
    fn test_datetime_accepts_offset_forms() {
        let zulu = value_to_datetime(&json!("2025-03-01T10:00:00.123456Z"));
        let offset = value_to_datetime(&json!("2025-03-01T10:00:00.123456+00:00"));
        assert!(zulu.is_some());
        assert_eq!(zulu, offset);
        assert_eq!(value_to_datetime(&json!("yesterday")), None);
    }
}
