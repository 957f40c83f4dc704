//! Built-in entity types.
//!
//! Each type is filled by name from the record of one XML element (see
//! [`materialize`](crate::materialize)). Fields the service leaves out keep
//! their default; fields the type doesn't model are ignored.

use crate::capability::{HasImages, Image, Streamable};
use crate::de;
use crate::entity::Materialize;
use serde::Deserialize;

/// A music artist.
///
/// Returned by `artist.search`, `artist.getSimilar`, `user.getTopArtists`.
///
/// XML fields: `name`, `mbid`, `url`, `playcount`, `listeners`, `match`
/// (similarity 0 to 1), `streamable`, `image` (repeated, by size).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Artist {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    pub mbid: String,
    pub url: String,
    #[serde(deserialize_with = "de::u64_opt")]
    pub playcount: Option<u64>,
    #[serde(deserialize_with = "de::u64_opt")]
    pub listeners: Option<u64>,
    /// Similarity score from `artist.getSimilar`.
    #[serde(rename = "match", deserialize_with = "de::f64_opt")]
    pub similarity: Option<f64>,
    #[serde(deserialize_with = "de::u64_opt")]
    pub rank: Option<u64>,
    #[serde(deserialize_with = "de::flag")]
    pub streamable: bool,
    #[serde(rename = "image", deserialize_with = "de::one_or_many")]
    pub images: Vec<Image>,
}

impl Materialize for Artist {
    const NAME: &'static str = "Artist";
}

/// An album.
///
/// XML fields: `name`/`title`, `artist` (text or `<artist><name>`), `mbid`,
/// `url`, `playcount`, `image`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Album {
    #[serde(alias = "title", deserialize_with = "de::text")]
    pub name: String,
    #[serde(deserialize_with = "de::name")]
    pub artist: String,
    pub mbid: String,
    pub url: String,
    #[serde(deserialize_with = "de::u64_opt")]
    pub playcount: Option<u64>,
    #[serde(rename = "image", deserialize_with = "de::one_or_many")]
    pub images: Vec<Image>,
}

impl Materialize for Album {
    const NAME: &'static str = "Album";
}

/// A track.
///
/// Returned by `track.search`, `artist.getTopTracks`, `user.getRecentTracks`,
/// `track.getInfo`.
///
/// XML fields: `name`, `artist` and `album` (text or nested record), `mbid`,
/// `url`, `duration` (ms in `track.getInfo`, s elsewhere), `listeners`,
/// `playcount`, `streamable`, `image`; attributes `rank` and `nowplaying`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Track {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(deserialize_with = "de::name")]
    pub artist: String,
    #[serde(deserialize_with = "de::name")]
    pub album: String,
    pub mbid: String,
    pub url: String,
    #[serde(deserialize_with = "de::u64_opt")]
    pub duration: Option<u64>,
    #[serde(deserialize_with = "de::u64_opt")]
    pub listeners: Option<u64>,
    #[serde(deserialize_with = "de::u64_opt")]
    pub playcount: Option<u64>,
    #[serde(deserialize_with = "de::u64_opt")]
    pub rank: Option<u64>,
    #[serde(deserialize_with = "de::flag")]
    pub streamable: bool,
    /// Set on the first entry of `user.getRecentTracks` while playing.
    #[serde(rename = "nowplaying", deserialize_with = "de::flag")]
    pub now_playing: bool,
    /// Scrobble time as rendered by the service, e.g. `31 Jan 2024, 20:15`.
    #[serde(deserialize_with = "de::text")]
    pub date: String,
    #[serde(rename = "image", deserialize_with = "de::one_or_many")]
    pub images: Vec<Image>,
}

impl Materialize for Track {
    const NAME: &'static str = "Track";
}

/// A folksonomy tag.
///
/// XML fields: `name`, `count`, `url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Tag {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(deserialize_with = "de::u64_opt")]
    pub count: Option<u64>,
    pub url: String,
}

impl Materialize for Tag {
    const NAME: &'static str = "Tag";
}

/// A Last.fm user profile.
///
/// Returned by `user.getInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(deserialize_with = "de::text")]
    pub realname: String,
    pub url: String,
    #[serde(deserialize_with = "de::text")]
    pub country: String,
    #[serde(deserialize_with = "de::u64_opt")]
    pub playcount: Option<u64>,
    #[serde(deserialize_with = "de::flag")]
    pub subscriber: bool,
    #[serde(rename = "image", deserialize_with = "de::one_or_many")]
    pub images: Vec<Image>,
}

impl Materialize for User {
    const NAME: &'static str = "User";
}

/// A web service session, returned by `auth.getSession`.
///
/// `key` does not expire; it authorizes write methods for `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Session {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(deserialize_with = "de::text")]
    pub key: String,
    #[serde(deserialize_with = "de::flag")]
    pub subscriber: bool,
}

impl Materialize for Session {
    const NAME: &'static str = "Session";
}

/// Time range for `user.getTop*` charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Overall,
    Week,
    Month,
    Quarter,
    HalfYear,
    Year,
}

impl Period {
    /// Value sent in the `period` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::Week => "7day",
            Self::Month => "1month",
            Self::Quarter => "3month",
            Self::HalfYear => "6month",
            Self::Year => "12month",
        }
    }
}

impl HasImages for Artist {
    fn images(&self) -> &[Image] {
        &self.images
    }
}

impl HasImages for Album {
    fn images(&self) -> &[Image] {
        &self.images
    }
}

impl HasImages for Track {
    fn images(&self) -> &[Image] {
        &self.images
    }
}

impl HasImages for User {
    fn images(&self) -> &[Image] {
        &self.images
    }
}

impl Streamable for Artist {
    fn is_streamable(&self) -> bool {
        self.streamable
    }
}

impl Streamable for Track {
    fn is_streamable(&self) -> bool {
        self.streamable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::ImageSize;
    use crate::entity::downcast;
    use crate::materialize::{construct, materialize};
    use roxmltree::Document;

    fn build<T: Materialize>(xml: &str) -> T {
        let doc = Document::parse(xml).unwrap();
        downcast(materialize(construct::<T>, doc.root_element()).unwrap()).unwrap()
    }

    #[test]
    fn similar_artist() {
        let a: Artist = build(
            r#"<artist>
                 <name>Sonny &amp; Cher</name>
                 <mbid>3d6e4b6d</mbid>
                 <match>0.51</match>
                 <url>https://www.last.fm/music/Sonny+&amp;+Cher</url>
                 <image size="small">s.png</image>
                 <image size="extralarge">xl.png</image>
                 <streamable>0</streamable>
               </artist>"#,
        );
        assert_eq!(a.name, "Sonny & Cher");
        assert_eq!(a.similarity, Some(0.51));
        assert_eq!(a.image(ImageSize::ExtraLarge), Some("xl.png"));
        assert!(!a.is_streamable());
    }

    #[test]
    fn recent_track_with_text_artist() {
        let t: Track = build(
            r#"<track nowplaying="true">
                 <artist mbid="bfcc">Cher</artist>
                 <name>Believe</name>
                 <album mbid="">Believe</album>
                 <date uts="1700000000">14 Nov 2023, 22:13</date>
                 <image size="medium">m.png</image>
               </track>"#,
        );
        assert_eq!(t.artist, "Cher");
        assert_eq!(t.album, "Believe");
        assert_eq!(t.date, "14 Nov 2023, 22:13");
        assert!(t.now_playing);
        assert_eq!(t.largest_image(), Some("m.png"));
    }

    #[test]
    fn album_title_alias_and_session() {
        let a: Album = build("<album><title>Believe</title><artist>Cher</artist></album>");
        assert_eq!(a.name, "Believe");
        assert_eq!(a.artist, "Cher");

        let s: Session =
            build("<session><name>rj</name><key>d580d5</key><subscriber>0</subscriber></session>");
        assert_eq!(s.name, "rj");
        assert_eq!(s.key, "d580d5");
        assert!(!s.subscriber);
    }

    #[test]
    fn period_values() {
        assert_eq!(Period::default().as_str(), "overall");
        assert_eq!(Period::Week.as_str(), "7day");
        assert_eq!(Period::Year.as_str(), "12month");
    }
}
