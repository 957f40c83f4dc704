//! Artist API.
//!
//! | Method                 | Container        | Member   |
//! |------------------------|------------------|----------|
//! | `artist.getTopTracks`  | `toptracks`      | `track`  |
//! | `artist.getSimilar`    | `similarartists` | `artist` |
//! | `artist.getTopTags`    | `toptags`        | `tag`    |
//!
//! All take `artist` (name) and optionally `autocorrect=1` to let the
//! service fix misspelled names.

use crate::client::ScrobblerClient;
use crate::error::Result;
use crate::params::Params;
use crate::transport::Transport;
use crate::types::{Artist, Tag, Track};

impl<T: Transport> ScrobblerClient<T> {
    /// Most played tracks of an artist.
    pub fn artist_top_tracks(&self, artist: &str, limit: u32) -> Result<Vec<Track>> {
        let params = artist_params(artist).with("limit", limit);
        self.fetch_as("artist.getTopTracks", "toptracks", "track", &params)
    }

    /// Similar artists, best match first. `limit` of `None` returns the
    /// service default (100).
    pub fn artist_similar(&self, artist: &str, limit: Option<u32>) -> Result<Vec<Artist>> {
        let params = artist_params(artist).with_opt("limit", limit);
        self.fetch_as("artist.getSimilar", "similarartists", "artist", &params)
    }

    /// Tags most applied to an artist.
    pub fn artist_top_tags(&self, artist: &str) -> Result<Vec<Tag>> {
        self.fetch_as("artist.getTopTags", "toptags", "tag", &artist_params(artist))
    }
}

fn artist_params(artist: &str) -> Params {
    Params::new().with("artist", artist).with("autocorrect", 1u32)
}
