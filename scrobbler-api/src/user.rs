//! User profile and chart APIs.
//!
//! | Method                  | Container     | Member   |
//! |-------------------------|---------------|----------|
//! | `user.getInfo`          | (root)        | `user`   |
//! | `user.getInfo` (signed) | (root)        | `user`   |
//! | `user.getRecentTracks`  | `recenttracks`| `track`  |
//! | `user.getTopArtists`    | `topartists`  | `artist` |
//!
//! Chart containers carry pagination attributes:
//!
//! ```xml
//! <recenttracks user="rj" page="1" perPage="10" totalPages="5000" total="50000">
//!   <track nowplaying="true"><artist mbid="...">Cher</artist>...</track>
//! </recenttracks>
//! ```

use crate::client::ScrobblerClient;
use crate::error::{Result, ScrobblerError};
use crate::params::Params;
use crate::response::Page;
use crate::transport::Transport;
use crate::types::{Artist, Period, Track, User};

impl<T: Transport> ScrobblerClient<T> {
    /// Get a user's public profile.
    ///
    /// # Errors
    ///
    /// - [`ScrobblerError::Api`] with code 6: no such user
    pub fn user_info(&self, user: &str) -> Result<User> {
        let params = Params::new().with("user", user);
        self.fetch_root_one("user.getInfo", "user", &params)?
            .ok_or_else(|| ScrobblerError::Other(format!("user not found: {user}")))
    }

    /// Profile of the user the stored session belongs to.
    ///
    /// Signed `user.getInfo` with `sk` and no `user`; a cheap way to check
    /// that the session key is still accepted.
    ///
    /// # Errors
    ///
    /// - [`ScrobblerError::Configuration`]: no session key or secret
    /// - [`ScrobblerError::Api`] with code 9: session key revoked
    pub fn session_user(&self) -> Result<User> {
        let params = Params::new().with("sk", self.require_session_key()?);
        self.fetch_signed_root_one("user.getInfo", "user", &params)?
            .ok_or_else(|| ScrobblerError::Other("response has no user".into()))
    }

    /// Recently scrobbled tracks, newest first. A track being played right
    /// now comes first with [`Track::now_playing`] set.
    pub fn user_recent_tracks(&self, user: &str, limit: u32, page: u32) -> Result<Page<Track>> {
        let params = Params::new()
            .with("user", user)
            .with("limit", limit)
            .with("page", page);
        self.fetch_page("user.getRecentTracks", "recenttracks", "track", &params)
    }

    /// Most listened artists over `period`.
    pub fn user_top_artists(
        &self,
        user: &str,
        period: Period,
        limit: u32,
        page: u32,
    ) -> Result<Page<Artist>> {
        let params = Params::new()
            .with("user", user)
            .with("period", period.as_str())
            .with("limit", limit)
            .with("page", page);
        self.fetch_page("user.getTopArtists", "topartists", "artist", &params)
    }
}
