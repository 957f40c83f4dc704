//! Search API.
//!
//! Methods: `track.search`, `artist.search`, `album.search`
//!
//! Request parameters:
//! - `track` / `artist` / `album`: search keyword
//! - `artist`: optional artist filter for `track.search`
//! - `limit`: page size (default 30)
//! - `page`: 1-based page number
//!
//! Response XML:
//! ```xml
//! <lfm status="ok">
//!   <results for="believe" xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
//!     <opensearch:totalResults>5103</opensearch:totalResults>
//!     <opensearch:startIndex>0</opensearch:startIndex>
//!     <opensearch:itemsPerPage>30</opensearch:itemsPerPage>
//!     <trackmatches>
//!       <track><name>Believe</name><artist>Cher</artist>...</track>
//!     </trackmatches>
//!   </results>
//! </lfm>
//! ```

use crate::client::ScrobblerClient;
use crate::error::Result;
use crate::params::Params;
use crate::response::Page;
use crate::transport::Transport;
use crate::types::{Album, Artist, Track};

impl<T: Transport> ScrobblerClient<T> {
    /// Search tracks by name, optionally narrowed to one artist.
    pub fn track_search(
        &self,
        track: &str,
        artist: Option<&str>,
        limit: u32,
        page: u32,
    ) -> Result<Page<Track>> {
        let params = Params::new()
            .with("track", track)
            .with_opt("artist", artist)
            .with("limit", limit)
            .with("page", page);
        self.fetch_page("track.search", "results/trackmatches", "track", &params)
    }

    /// Search artists by name.
    pub fn artist_search(&self, artist: &str, limit: u32, page: u32) -> Result<Page<Artist>> {
        let params = Params::new()
            .with("artist", artist)
            .with("limit", limit)
            .with("page", page);
        self.fetch_page("artist.search", "results/artistmatches", "artist", &params)
    }

    /// Search albums by name.
    pub fn album_search(&self, album: &str, limit: u32, page: u32) -> Result<Page<Album>> {
        let params = Params::new()
            .with("album", album)
            .with("limit", limit)
            .with("page", page);
        self.fetch_page("album.search", "results/albummatches", "album", &params)
    }
}
