//! Lenient field deserializers for materialized records.
//!
//! Record values are text, nested records or lists (see
//! [`materialize`](crate::materialize)). These helpers accept whichever shape
//! the service happens to use and fall back to the default on garbage.

use crate::materialize::TEXT_KEY;
use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text of a value: the string itself, or the `#text` of a nested record.
fn text_of(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get(TEXT_KEY).and_then(Value::as_str),
        _ => None,
    }
}

/// Any text-bearing value as a `String`; empty otherwise.
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(text_of(&value).unwrap_or_default().to_owned())
}

/// A name given either as text or as a record with a `name` (or `title`)
/// child (`<artist>Cher</artist>` or `<artist><name>Cher</name></artist>`).
pub fn name<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Value::deserialize(d)?;
    let name = match &value {
        Value::Object(map) => map
            .get("name")
            .or_else(|| map.get("title"))
            .and_then(text_of)
            .or_else(|| text_of(&value)),
        other => text_of(other),
    };
    Ok(name.unwrap_or_default().to_owned())
}

/// Decimal text as `u64`; `None` when absent or unparsable.
pub fn u64_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match &value {
        Value::Number(n) => n.as_u64(),
        other => text_of(other).and_then(|t| t.trim().parse().ok()),
    })
}

/// Decimal text as `f64`; `None` when absent or unparsable.
pub fn f64_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match &value {
        Value::Number(n) => n.as_f64(),
        other => text_of(other).and_then(|t| t.trim().parse().ok()),
    })
}

/// `1`/`true` → `true`, anything else → `false`.
pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match &value {
        Value::Bool(b) => *b,
        other => matches!(text_of(other).map(str::trim), Some("1" | "true")),
    })
}

/// A single value or a list of them, as a `Vec`.
pub fn one_or_many<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .map(|v| T::deserialize(v).map_err(D::Error::custom))
            .collect(),
        Value::Null => Ok(Vec::new()),
        v => T::deserialize(v).map(|t| vec![t]).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "text")]
        text: String,
        #[serde(deserialize_with = "name")]
        artist: String,
        #[serde(deserialize_with = "u64_opt")]
        count: Option<u64>,
        #[serde(deserialize_with = "f64_opt")]
        score: Option<f64>,
        #[serde(deserialize_with = "flag")]
        on: bool,
        #[serde(deserialize_with = "one_or_many")]
        tags: Vec<String>,
    }

    fn sample(value: Value) -> Sample {
        Sample::deserialize(value).unwrap()
    }

    #[test]
    fn text_and_name_accept_both_shapes() {
        let p = sample(json!({ "text": { "size": "x", "#text": "t" }, "artist": "Cher" }));
        assert_eq!(p.text, "t");
        assert_eq!(p.artist, "Cher");

        let p = sample(json!({ "artist": { "mbid": "m", "name": "Cher" } }));
        assert_eq!(p.artist, "Cher");

        let p = sample(json!({ "artist": { "position": "1", "title": "Believe" } }));
        assert_eq!(p.artist, "Believe");
    }

    #[test]
    fn numbers_are_lenient() {
        assert_eq!(sample(json!({ "count": " 42 " })).count, Some(42));
        assert_eq!(sample(json!({ "count": "many" })).count, None);
        assert_eq!(sample(json!({ "score": "0.75" })).score, Some(0.75));
        assert_eq!(sample(json!({})).count, None);
    }

    #[test]
    fn flags() {
        assert!(sample(json!({ "on": "1" })).on);
        assert!(sample(json!({ "on": { "fulltrack": "0", "#text": "true" } })).on);
        assert!(!sample(json!({ "on": "0" })).on);
        assert!(!sample(json!({})).on);
    }

    #[test]
    fn one_or_many_lists() {
        assert_eq!(sample(json!({ "tags": "rock" })).tags, ["rock"]);
        assert_eq!(sample(json!({ "tags": ["rock", "pop"] })).tags, ["rock", "pop"]);
        assert!(sample(json!({})).tags.is_empty());
    }
}
