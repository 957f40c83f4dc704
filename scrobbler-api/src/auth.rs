//! Desktop authentication flow.
//!
//! 1. `auth.getToken` (signed) → unauthorized request token
//! 2. The user opens [`authorize_url`] in a browser and grants access
//! 3. `auth.getSession` (signed, `token`) → [`Session`] whose `key` never
//!    expires and is stored as the credentials' `session_key`
//!
//! ```xml
//! <lfm status="ok"><token>cf45fe5a3e3cebe168480a086d7fe481</token></lfm>
//!
//! <lfm status="ok">
//!   <session><name>rj</name><key>d580d57f32848f5dcf574d1ce18d78b2</key><subscriber>0</subscriber></session>
//! </lfm>
//! ```
//!
//! Until the user grants access, `auth.getSession` fails with API error 14
//! (token not authorized).

use crate::client::ScrobblerClient;
use crate::error::{Result, ScrobblerError};
use crate::params::{Params, encode};
use crate::request::HttpVerb;
use crate::response::{check_status, parse, root_text};
use crate::transport::Transport;
use crate::types::Session;

const AUTH_URL: &str = "http://www.last.fm/api/auth/";

/// Page where the user grants `api_key` access for `token`.
pub fn authorize_url(api_key: &str, token: &str) -> String {
    format!("{AUTH_URL}?api_key={}&token={}", encode(api_key), encode(token))
}

impl<T: Transport> ScrobblerClient<T> {
    /// Fetch an unauthorized request token. Valid for 60 minutes.
    pub fn auth_get_token(&self) -> Result<String> {
        let body = self.request("auth.getToken", &Params::new(), true, HttpVerb::Get)?;
        let doc = parse(&body)?;
        check_status(&doc)?;
        root_text(&doc, "token")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ScrobblerError::Other("response has no token".into()))
    }

    /// Exchange an authorized token for a session.
    pub fn auth_get_session(&self, token: &str) -> Result<Session> {
        let params = Params::new().with("token", token);
        self.fetch_signed_root_one("auth.getSession", "session", &params)?
            .ok_or_else(|| ScrobblerError::Other("response has no session".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_encodes_values() {
        assert_eq!(
            authorize_url("K", "a b"),
            "http://www.last.fm/api/auth/?api_key=K&token=a%20b"
        );
    }
}
