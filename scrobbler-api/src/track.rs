//! Track info and love APIs.
//!
//! # Endpoints
//!
//! ## `track_info`: `GET track.getInfo`
//!
//! Request: `artist`, `track`, optional `username` (adds `userplaycount`).
//!
//! Response:
//! ```xml
//! <lfm status="ok">
//!   <track>
//!     <name>Believe</name>
//!     <url>https://www.last.fm/music/Cher/_/Believe</url>
//!     <duration>240000</duration>
//!     <listeners>69572</listeners>
//!     <playcount>281445</playcount>
//!     <artist><name>Cher</name>...</artist>
//!     <album position="1"><artist>Cher</artist><title>Believe</title>...</album>
//!   </track>
//! </lfm>
//! ```
//!
//! ## `track_love`: signed `POST track.love`
//!
//! Request: `artist`, `track`, `sk` (session key). Response is an empty
//! `<lfm status="ok"/>`.

use crate::client::ScrobblerClient;
use crate::error::{Result, ScrobblerError};
use crate::params::Params;
use crate::transport::Transport;
use crate::types::Track;

impl<T: Transport> ScrobblerClient<T> {
    /// Get track metadata by artist and title.
    ///
    /// # Errors
    ///
    /// - [`ScrobblerError::Api`] with code 6: track not found
    /// - [`ScrobblerError::Other`]: the response held no `<track>`
    pub fn track_info(&self, artist: &str, track: &str) -> Result<Track> {
        let params = Params::new()
            .with("artist", artist)
            .with("track", track)
            .with("autocorrect", 1u32);
        self.fetch_root_one("track.getInfo", "track", &params)?
            .ok_or_else(|| ScrobblerError::Other(format!("track not found: {artist} - {track}")))
    }

    /// Love a track on behalf of the session's user.
    ///
    /// # Errors
    ///
    /// - [`ScrobblerError::Configuration`]: no session key or secret
    /// - [`ScrobblerError::Api`] with code 9: session key revoked
    pub fn track_love(&self, artist: &str, track: &str) -> Result<()> {
        let session_key = self.require_session_key()?;
        let params = Params::new()
            .with("artist", artist)
            .with("track", track)
            .with("sk", session_key);
        self.post_request("track.love", &params)?;
        Ok(())
    }
}
