//! Audioscrobbler (Last.fm 2.0) web service client library.
//!
//! Builds signed or unsigned `/2.0/` requests, sends them through a
//! [`Transport`], and turns the XML responses into typed entities without
//! per-endpoint parsing code.
//!
//! # Configuration
//!
//! Calls need an API key; signed calls also need the shared secret, and
//! write calls a session key. Credentials are persisted to
//! `~/.config/scrobbler/credentials.json`.
//!
//! ```no_run
//! use scrobbler_api::{Credentials, ScrobblerClient};
//!
//! // Save credentials
//! let credentials = Credentials::new("YOUR_API_KEY").with_secret("YOUR_SECRET");
//! credentials.save().unwrap();
//!
//! // Create client (loads credentials from disk)
//! let client = ScrobblerClient::new().unwrap();
//! let similar = client.artist_similar("Cher", Some(10)).unwrap();
//! ```
//!
//! # Generic fetch
//!
//! Every list endpoint is a [`ScrobblerClient::fetch`] of `<member>`
//! elements inside `<container>`; single-object endpoints use
//! [`ScrobblerClient::fetch_root`]. The member name is resolved through the
//! [`EntityRegistry`], so new result types only need a `Deserialize` impl
//! and a registration:
//!
//! ```no_run
//! use scrobbler_api::{Credentials, EntityRegistry, Materialize, Params, ScrobblerClient};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct Venue {
//!     name: String,
//!     url: String,
//! }
//!
//! impl Materialize for Venue {
//!     const NAME: &'static str = "Venue";
//! }
//!
//! let mut registry = EntityRegistry::with_defaults();
//! registry.register::<Venue>();
//! let client = ScrobblerClient::with_credentials(Credentials::new("K"))
//!     .unwrap()
//!     .with_registry(registry);
//! let venues: Vec<Venue> = client
//!     .fetch_as("venue.search", "results/venuematches", "venue", &Params::new().with("venue", "arena"))
//!     .unwrap();
//! ```
//!
//! # API method mapping
//!
//! | Method                                   | Web service method      | Result          |
//! |------------------------------------------|-------------------------|-----------------|
//! | [`ScrobblerClient::track_search`]        | `track.search`          | `Page<Track>`   |
//! | [`ScrobblerClient::artist_search`]       | `artist.search`         | `Page<Artist>`  |
//! | [`ScrobblerClient::album_search`]        | `album.search`          | `Page<Album>`   |
//! | [`ScrobblerClient::artist_top_tracks`]   | `artist.getTopTracks`   | `Vec<Track>`    |
//! | [`ScrobblerClient::artist_similar`]      | `artist.getSimilar`     | `Vec<Artist>`   |
//! | [`ScrobblerClient::artist_top_tags`]     | `artist.getTopTags`     | `Vec<Tag>`      |
//! | [`ScrobblerClient::track_info`]          | `track.getInfo`         | `Track`         |
//! | [`ScrobblerClient::track_love`]          | `track.love` (signed)   | `()`            |
//! | [`ScrobblerClient::user_info`]           | `user.getInfo`          | `User`          |
//! | [`ScrobblerClient::session_user`]        | `user.getInfo` (signed) | `User`          |
//! | [`ScrobblerClient::user_recent_tracks`]  | `user.getRecentTracks`  | `Page<Track>`   |
//! | [`ScrobblerClient::user_top_artists`]    | `user.getTopArtists`    | `Page<Artist>`  |
//! | [`ScrobblerClient::auth_get_token`]      | `auth.getToken` (signed)| `String`        |
//! | [`ScrobblerClient::auth_get_session`]    | `auth.getSession` (signed) | `Session`    |

mod artist;
pub mod auth;
pub mod capability;
pub mod client;
pub mod credentials;
pub mod de;
pub mod entity;
pub mod error;
pub mod materialize;
pub mod params;
pub mod request;
pub mod response;
mod search;
pub mod signature;
mod track;
pub mod transport;
pub mod types;
mod user;

pub use capability::{HasImages, Image, ImageSize, Streamable};
pub use client::ScrobblerClient;
pub use credentials::Credentials;
pub use entity::{Entity, EntityConstructor, EntityRegistry, Materialize};
pub use error::{Result, ScrobblerError};
pub use params::{ParamValue, Params};
pub use request::{HttpVerb, RequestBuilder, SignedRequest};
pub use response::Page;
pub use transport::{HttpTransport, Transport};
