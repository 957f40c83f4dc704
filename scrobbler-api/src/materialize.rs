//! Element → entity materialization.
//!
//! An element is first flattened into a [`Record`]:
//!
//! - attributes become text fields
//! - a leaf child (no attributes, no element children) becomes its trimmed text
//! - any other child becomes a nested record, its own text under `#text`
//! - repeated tags become a list
//!
//! ```text
//! <track rank="1">                       { "rank": "1",
//!   <name>Believe</name>                   "name": "Believe",
//!   <artist><name>Cher</name></artist>     "artist": { "name": "Cher" },
//!   <image size="small">s.png</image>      "image": [ { "size": "small", "#text": "s.png" },
//!   <image size="large">l.png</image>                 { "size": "large", "#text": "l.png" } ] }
//! </track>
//! ```
//!
//! The record is then deserialized into the target type, which picks the
//! fields it models by name. The record deserializer accepts whichever shape
//! the XML happened to produce:
//!
//! - string and number fields read the `#text` of a nested record, or the
//!   first item of a list
//! - numbers and booleans (`1`/`0`/`true`/`false`) are parsed from text
//! - sequence fields take a single value as a one-item list
//! - struct fields take bare text as a record holding only `#text`

use crate::entity::{Entity, EntityConstructor, Materialize};
use crate::error::{Result, ScrobblerError};
use roxmltree::Node;
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{
    DeserializeSeed, Deserializer, Error as _, MapAccess, SeqAccess, Unexpected, Visitor,
};
use serde::forward_to_deserialize_any;
use serde_json::map::Entry;
use serde_json::{Error, Map, Value};

/// Key holding an element's own text inside a nested record.
pub const TEXT_KEY: &str = "#text";

/// Flattened key/value view of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Value);

impl Default for Record {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl Record {
    pub fn from_element(node: Node<'_, '_>) -> Self {
        Self(Value::Object(fields(node)))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

fn fields(node: Node<'_, '_>) -> Map<String, Value> {
    let mut map = Map::new();
    for attr in node.attributes() {
        map.insert(attr.name().to_owned(), Value::String(attr.value().to_owned()));
    }
    for child in node.children().filter(Node::is_element) {
        let value = element_value(child);
        match map.entry(child.tag_name().name()) {
            Entry::Vacant(e) => {
                e.insert(value);
            }
            Entry::Occupied(mut e) => match e.get_mut() {
                Value::Array(items) => items.push(value),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            },
        }
    }
    let text = own_text(node);
    if !text.is_empty() {
        map.insert(TEXT_KEY.to_owned(), Value::String(text));
    }
    map
}

fn element_value(node: Node<'_, '_>) -> Value {
    let has_attributes = node.attributes().next().is_some();
    let has_elements = node.children().any(|c| c.is_element());
    if has_attributes || has_elements {
        Value::Object(fields(node))
    } else {
        Value::String(own_text(node))
    }
}

/// Concatenated direct text children, trimmed.
fn own_text(node: Node<'_, '_>) -> String {
    let text: String = node
        .children()
        .filter(Node::is_text)
        .filter_map(|c| c.text())
        .collect();
    text.trim().to_owned()
}

/// Constructor for `T`, suitable for the entity registry.
pub fn construct<T: Materialize>(record: &Record) -> Result<Box<dyn Entity>> {
    let entity = T::deserialize(RecordDeserializer(record.as_value())).map_err(|source| {
        ScrobblerError::Materialize {
            entity: T::NAME,
            source,
        }
    })?;
    Ok(Box::new(entity))
}

/// Deserializer over one record value, lenient about XML-derived shapes.
#[derive(Clone, Copy)]
struct RecordDeserializer<'de>(&'de Value);

impl<'de> RecordDeserializer<'de> {
    /// Text carried by the value: a string, the `#text` of a record, or the
    /// text of the first list item.
    fn text(self) -> Option<&'de str> {
        match self.0 {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get(TEXT_KEY).and_then(Value::as_str),
            Value::Array(items) => items.first().and_then(|v| Self(v).text()),
            _ => None,
        }
    }

    fn fields(map: &'de Map<String, Value>) -> Fields<'de> {
        Fields::new(map.iter().map(|(k, v)| (k.as_str(), v)).collect())
    }
}

macro_rules! deserialize_from_text {
    ($($method:ident => $ty:ty, $visit:ident;)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, Error> {
                match self.text() {
                    Some(text) => match text.trim().parse::<$ty>() {
                        Ok(n) => visitor.$visit(n),
                        Err(_) => Err(Error::invalid_value(Unexpected::Str(text), &visitor)),
                    },
                    None => self.0.$method(visitor),
                }
            }
        )*
    };
}

impl<'de> Deserializer<'de> for RecordDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, Error> {
        match self.0 {
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Array(items) => visitor.visit_seq(Items(items.iter())),
            Value::Object(map) => visitor.visit_map(Self::fields(map)),
            other => other.deserialize_any(visitor),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, Error> {
        match self.text().map(str::trim) {
            Some("1" | "true") => visitor.visit_bool(true),
            Some("" | "0" | "false") => visitor.visit_bool(false),
            Some(text) => Err(Error::invalid_value(Unexpected::Str(text), &visitor)),
            None => self.0.deserialize_bool(visitor),
        }
    }

    deserialize_from_text! {
        deserialize_i8 => i64, visit_i64;
        deserialize_i16 => i64, visit_i64;
        deserialize_i32 => i64, visit_i64;
        deserialize_i64 => i64, visit_i64;
        deserialize_u8 => u64, visit_u64;
        deserialize_u16 => u64, visit_u64;
        deserialize_u32 => u64, visit_u64;
        deserialize_u64 => u64, visit_u64;
        deserialize_f32 => f64, visit_f64;
        deserialize_f64 => f64, visit_f64;
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, Error> {
        match self.0 {
            Value::Object(_) | Value::Array(_) => {
                visitor.visit_borrowed_str(self.text().unwrap_or_default())
            }
            other => other.deserialize_str(visitor),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> std::result::Result<V::Value, Error> {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> std::result::Result<V::Value, Error> {
        if self.0.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> std::result::Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, Error> {
        match self.0 {
            Value::Array(items) => visitor.visit_seq(Items(items.iter())),
            Value::Null => visitor.visit_seq(Items(std::slice::Iter::default())),
            single => visitor.visit_seq(Items(std::slice::from_ref(single).iter())),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> std::result::Result<V::Value, Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, Error> {
        match self.0 {
            Value::Object(map) => visitor.visit_map(Self::fields(map)),
            Value::Array(items) => match items.first() {
                Some(first) => Self(first).deserialize_map(visitor),
                None => visitor.visit_map(Fields::new(Vec::new())),
            },
            Value::String(_) => visitor.visit_map(Fields::new(vec![(TEXT_KEY, self.0)])),
            other => other.deserialize_map(visitor),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> std::result::Result<V::Value, Error> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> std::result::Result<V::Value, Error> {
        match self.text() {
            Some(text) if !self.0.is_string() => {
                BorrowedStrDeserializer::<Error>::new(text).deserialize_enum(name, variants, visitor)
            }
            _ => self.0.deserialize_enum(name, variants, visitor),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> std::result::Result<V::Value, Error> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> std::result::Result<V::Value, Error> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        char bytes byte_buf unit unit_struct tuple_struct
    }
}

/// List items, each read through [`RecordDeserializer`].
struct Items<'de>(std::slice::Iter<'de, Value>);

impl<'de> SeqAccess<'de> for Items<'de> {
    type Error = Error;

    fn next_element_seed<S: DeserializeSeed<'de>>(
        &mut self,
        seed: S,
    ) -> std::result::Result<Option<S::Value>, Error> {
        self.0
            .next()
            .map(|v| seed.deserialize(RecordDeserializer(v)))
            .transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

/// Record fields, each value read through [`RecordDeserializer`].
struct Fields<'de> {
    entries: std::vec::IntoIter<(&'de str, &'de Value)>,
    value: Option<&'de Value>,
}

impl<'de> Fields<'de> {
    fn new(entries: Vec<(&'de str, &'de Value)>) -> Self {
        Self {
            entries: entries.into_iter(),
            value: None,
        }
    }
}

impl<'de> MapAccess<'de> for Fields<'de> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> std::result::Result<Option<K::Value>, Error> {
        let Some((key, value)) = self.entries.next() else {
            return Ok(None);
        };
        self.value = Some(value);
        seed.deserialize(BorrowedStrDeserializer::<Error>::new(key))
            .map(Some)
    }

    fn next_value_seed<S: DeserializeSeed<'de>>(
        &mut self,
        seed: S,
    ) -> std::result::Result<S::Value, Error> {
        let value = self
            .value
            .take()
            .ok_or_else(|| Error::custom("value requested before key"))?;
        seed.deserialize(RecordDeserializer(value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Build one entity from `element` with a resolved constructor.
pub fn materialize(constructor: EntityConstructor, element: Node<'_, '_>) -> Result<Box<dyn Entity>> {
    constructor(&Record::from_element(element))
}
