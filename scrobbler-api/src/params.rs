//! Request parameters and their query-string canonical form.
//!
//! Keys and values are percent-encoded with the RFC 3986 unreserved set
//! (`A-Z a-z 0-9 - _ . ~`) passed through and every other byte encoded as
//! `%XX`, including `&`, `=`, space and each byte of multi-byte UTF-8.

use crate::error::{Result, ScrobblerError};

/// A scalar parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    /// Render the value in its canonical text form.
    ///
    /// Fails for floats without a finite decimal form.
    pub fn to_text(&self, key: &str) -> Result<String> {
        match self {
            Self::Text(s) => Ok(s.clone()),
            Self::Int(n) => Ok(n.to_string()),
            Self::UInt(n) => Ok(n.to_string()),
            Self::Float(f) if f.is_finite() => Ok(f.to_string()),
            Self::Float(f) => Err(ScrobblerError::Encoding {
                key: key.to_owned(),
                reason: format!("{f} has no text form"),
            }),
            Self::Bool(b) => Ok(b.to_string()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for ParamValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        Self::UInt(n.into())
    }
}

impl From<u64> for ParamValue {
    fn from(n: u64) -> Self {
        Self::UInt(n)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// An insertion-ordered parameter set with unique keys.
///
/// Inserting an existing key replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert that skips `None`.
    #[must_use]
    pub fn with_opt<V: Into<ParamValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convert every value to text, keeping insertion order.
    ///
    /// Fails with [`ScrobblerError::Argument`] for an empty key and
    /// [`ScrobblerError::Encoding`] for a value without a text form.
    pub fn to_text_pairs(&self) -> Result<Vec<(String, String)>> {
        self.entries
            .iter()
            .map(|(k, v)| {
                if k.is_empty() {
                    return Err(ScrobblerError::Argument("empty parameter key".into()));
                }
                Ok((k.clone(), v.to_text(k)?))
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K: Into<String>, V: Into<ParamValue>, const N: usize> From<[(K, V); N]> for Params {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

/// Percent-encode one key or value.
pub fn encode(text: &str) -> String {
    urlencoding::encode(text).into_owned()
}

/// Encode text pairs into `key=value` fragments, preserving order.
pub fn canonicalize(pairs: &[(String, String)]) -> Vec<String> {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect()
}

/// Join canonicalized fragments with `&`.
pub fn query_string(pairs: &[(String, String)]) -> String {
    canonicalize(pairs).join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(params: &Params) -> Vec<(String, String)> {
        params.to_text_pairs().unwrap()
    }

    #[test]
    fn unreserved_characters_pass_through() {
        let p = Params::new().with("a-b_c.d~e", "AZaz09-_.~");
        assert_eq!(query_string(&pairs(&p)), "a-b_c.d~e=AZaz09-_.~");
    }

    #[test]
    fn reserved_and_multibyte_characters_are_encoded() {
        let p = Params::new().with("q", "a&b=c d/é");
        assert_eq!(query_string(&pairs(&p)), "q=a%26b%3Dc%20d%2F%C3%A9");
    }

    #[test]
    fn scalar_values_use_canonical_text() {
        let p = Params::new()
            .with("limit", 50u32)
            .with("offset", -3i64)
            .with("ratio", 1.5f64)
            .with("autocorrect", true);
        assert_eq!(
            query_string(&pairs(&p)),
            "limit=50&offset=-3&ratio=1.5&autocorrect=true"
        );
    }

    #[test]
    fn canonicalizing_is_idempotent_and_decodes_back() {
        let p = Params::from([("artist", "Sigur Rós"), ("track", "Hoppípolla & more")]);
        let text = pairs(&p);
        let first = canonicalize(&text);
        let second = canonicalize(&text);
        assert_eq!(first, second);

        for (fragment, (key, value)) in first.iter().zip(&text) {
            let (k, v) = fragment.split_once('=').unwrap();
            assert_eq!(urlencoding::decode(k).unwrap(), *key);
            assert_eq!(urlencoding::decode(v).unwrap(), *value);
        }
    }

    #[test]
    fn non_finite_float_fails_to_encode() {
        let p = Params::new().with("x", f64::NAN);
        let err = p.to_text_pairs().unwrap_err();
        assert!(matches!(err, ScrobblerError::Encoding { ref key, .. } if key == "x"));
    }

    #[test]
    fn empty_key_is_an_argument_error() {
        let p = Params::new().with("", "v");
        assert!(matches!(p.to_text_pairs(), Err(ScrobblerError::Argument(_))));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut p = Params::from([("a", "1"), ("b", "2")]);
        p.insert("a", "3");
        let keys: Vec<&str> = p.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(p.get("a"), Some(&ParamValue::from("3")));
        assert_eq!(p.remove("b"), Some(ParamValue::from("2")));
        assert_eq!(p.len(), 1);
    }
}
