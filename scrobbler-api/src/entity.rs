//! Entity registry: logical element names → constructors.
//!
//! A response member such as `<track>` travels with the request as the
//! logical name `track`; it is resolved here to the canonical identifier
//! `Track` and to the constructor registered under it. Namespaces are
//! separated by `/` (`chart/top_tags` → `Chart::TopTags`) and every
//! `_`-delimited word is capitalized.

use crate::error::{Result, ScrobblerError};
use crate::materialize::{Record, construct};
use crate::types::{Album, Artist, Session, Tag, Track, User};
use serde::de::DeserializeOwned;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// A materialized result object.
///
/// Implemented for every [`Materialize`] type; use [`downcast`] to get the
/// concrete type back.
pub trait Entity: Any + fmt::Debug + Send + Sync {
    /// Canonical identifier of the concrete type.
    fn entity_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// A result type that can be built from one XML element.
///
/// Fields are filled by name through the type's `Deserialize` impl; unknown
/// fields are ignored and missing ones keep their default.
pub trait Materialize: DeserializeOwned + fmt::Debug + Send + Sync + 'static {
    /// Canonical identifier, e.g. `TopTags`.
    const NAME: &'static str;
}

impl<T: Materialize> Entity for T {
    fn entity_name(&self) -> &'static str {
        T::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Recover the concrete type of a materialized entity.
pub fn downcast<T: Materialize>(entity: Box<dyn Entity>) -> Result<T> {
    let found = entity.entity_name();
    entity
        .into_any()
        .downcast::<T>()
        .map(|b| *b)
        .map_err(|_| ScrobblerError::EntityType {
            expected: T::NAME,
            found,
        })
}

/// Builds one entity from the record of an element.
pub type EntityConstructor = fn(&Record) -> Result<Box<dyn Entity>>;

/// Derive the canonical identifier for a logical name.
///
/// `artist` → `Artist`, `top_tags` → `TopTags`, `chart/top_tags` →
/// `Chart::TopTags`. A `/` becomes `::` and upper-cases the next character;
/// the first character and each character after a `_` are upper-cased and
/// the `_` dropped. A `_` with nothing after it, or directly followed by
/// another `_`, is kept. Empty leading and trailing segments are dropped.
pub fn canonical_name(logical: &str) -> String {
    let scoped = upcase_after(logical, '/', "::");
    let camel = upcase_after(&scoped, '_', "");

    let mut segments: Vec<&str> = camel.split("::").collect();
    while segments.last() == Some(&"") {
        segments.pop();
    }
    if segments.first() == Some(&"") {
        segments.remove(0);
    }
    segments.join("::")
}

/// Replace each `marker` and the character after it with `replacement`
/// followed by that character upper-cased. With an empty `replacement`
/// the first character is upper-cased too, and a trailing `marker` stays.
fn upcase_after(text: &str, marker: char, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars();
    if replacement.is_empty() {
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
        }
    }
    while let Some(c) = chars.next() {
        if c != marker {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) => {
                out.push_str(replacement);
                out.extend(next.to_uppercase());
            }
            None if replacement.is_empty() => out.push(marker),
            None => out.push_str(replacement),
        }
    }
    out
}

/// Mapping from canonical identifier to constructor.
///
/// Built once at startup, read-only afterwards.
#[derive(Clone, Default)]
pub struct EntityRegistry {
    constructors: HashMap<String, EntityConstructor>,
}

impl EntityRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in entities.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<Artist>();
        registry.register::<Album>();
        registry.register::<Track>();
        registry.register::<Tag>();
        registry.register::<User>();
        registry.register::<Session>();
        registry
    }

    /// Register `T` under [`Materialize::NAME`], replacing any previous entry.
    pub fn register<T: Materialize>(&mut self) {
        self.register_as(T::NAME, construct::<T>);
    }

    /// Register a constructor under an explicit canonical identifier.
    pub fn register_as(&mut self, name: &str, constructor: EntityConstructor) {
        self.constructors.insert(name.to_owned(), constructor);
    }

    /// Resolve a logical name to its constructor.
    ///
    /// # Errors
    ///
    /// [`ScrobblerError::UnknownEntity`] if nothing is registered under the
    /// derived identifier.
    pub fn resolve(&self, logical: &str) -> Result<EntityConstructor> {
        let name = canonical_name(logical);
        self.constructors
            .get(&name)
            .copied()
            .ok_or_else(|| ScrobblerError::UnknownEntity {
                logical: logical.to_owned(),
                name,
            })
    }

    pub fn contains(&self, logical: &str) -> bool {
        self.constructors.contains_key(&canonical_name(logical))
    }

    /// Registered identifiers, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct TopTags {
        artist: String,
    }

    impl Materialize for TopTags {
        const NAME: &'static str = "TopTags";
    }

    #[test]
    fn canonical_names() {
        assert_eq!(canonical_name("artist"), "Artist");
        assert_eq!(canonical_name("top_tags"), "TopTags");
        assert_eq!(canonical_name("chart/top_tags"), "Chart::TopTags");
        assert_eq!(canonical_name("/scrobbler/weekly_album_chart"), "Scrobbler::WeeklyAlbumChart");
        assert_eq!(canonical_name("a__b"), "A_b");
        assert_eq!(canonical_name("top_"), "Top_");
        assert_eq!(canonical_name("chart/"), "Chart");
    }

    #[test]
    fn resolves_builtin_artist() {
        let registry = EntityRegistry::with_defaults();
        let ctor = registry.resolve("artist").unwrap();
        let entity = ctor(&Record::default()).unwrap();
        assert_eq!(entity.entity_name(), "Artist");
        assert!(entity.as_any().is::<Artist>());
    }

    #[test]
    fn resolves_registered_top_tags() {
        let mut registry = EntityRegistry::with_defaults();
        assert!(!registry.contains("top_tags"));
        registry.register::<TopTags>();

        let entity = registry.resolve("top_tags").unwrap()(&Record::default()).unwrap();
        assert_eq!(entity.entity_name(), "TopTags");
        let tags: TopTags = downcast(entity).unwrap();
        assert_eq!(tags.artist, "");
    }

    #[test]
    fn unknown_name_fails() {
        let registry = EntityRegistry::with_defaults();
        match registry.resolve("weekly_chart") {
            Err(ScrobblerError::UnknownEntity { logical, name }) => {
                assert_eq!(logical, "weekly_chart");
                assert_eq!(name, "WeeklyChart");
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn downcast_to_wrong_type_fails() {
        let registry = EntityRegistry::with_defaults();
        let entity = registry.resolve("tag").unwrap()(&Record::default()).unwrap();
        let err = downcast::<Artist>(entity).unwrap_err();
        assert!(matches!(
            err,
            ScrobblerError::EntityType { expected: "Artist", found: "Tag" }
        ));
    }

    #[test]
    fn default_registry_names() {
        assert_eq!(
            EntityRegistry::with_defaults().names(),
            ["Album", "Artist", "Session", "Tag", "Track", "User"]
        );
    }
}
