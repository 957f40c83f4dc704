//! Request construction.
//!
//! Every request carries `api_key` and `method`. Signed requests add
//! `api_sig` (see [`signature`](crate::signature)) and are emitted in sorted
//! key order; unsigned requests keep the caller's insertion order with
//! `api_key` and `method` appended. The two orders differ on the wire and
//! are kept that way.

use crate::credentials::Credentials;
use crate::error::{Result, ScrobblerError};
use crate::params::{Params, query_string};
use crate::signature::{SIGNATURE_KEY, sign, sort_pairs};
use tracing::debug;

/// Path prefix of the 2.0 web service.
pub const API_PATH: &str = "/2.0/";

/// HTTP verb used to send a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpVerb {
    #[default]
    Get,
    Post,
}

/// A fully built request, ready for a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    method: String,
    params: Vec<(String, String)>,
    signature: Option<String>,
    verb: HttpVerb,
    path: String,
}

impl SignedRequest {
    /// API method name, e.g. `track.search`.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Parameters in wire order, `api_sig` included when signed.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn verb(&self) -> HttpVerb {
        self.verb
    }

    /// `/2.0/?<query>`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Builds [`SignedRequest`]s from a fixed credential set.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    credentials: Credentials,
}

impl RequestBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build a request for `method` with `params`.
    ///
    /// # Errors
    ///
    /// - [`ScrobblerError::Argument`]: empty method name or parameter key
    /// - [`ScrobblerError::Configuration`]: no API key, or `signed` without a secret
    /// - [`ScrobblerError::Encoding`]: a value without a text form
    pub fn build(
        &self,
        method: &str,
        params: &Params,
        signed: bool,
        verb: HttpVerb,
    ) -> Result<SignedRequest> {
        if method.trim().is_empty() {
            return Err(ScrobblerError::Argument("empty method name".into()));
        }
        let api_key = self
            .credentials
            .api_key()
            .ok_or_else(|| ScrobblerError::Configuration("API key is not set".into()))?;

        let mut all = params.clone();
        all.insert("api_key", api_key);
        all.insert("method", method);
        let mut pairs = all.to_text_pairs()?;

        let signature = if signed {
            let secret = self.credentials.secret().ok_or_else(|| {
                ScrobblerError::Configuration("shared secret is required for signed calls".into())
            })?;
            sort_pairs(&mut pairs);
            let token = sign(&pairs, secret);
            pairs.push((SIGNATURE_KEY.to_owned(), token.clone()));
            Some(token)
        } else {
            None
        };

        let path = format!("{API_PATH}?{}", query_string(&pairs));
        debug!(method, signed, ?verb, params = pairs.len(), "built request");

        Ok(SignedRequest {
            method: method.to_owned(),
            params: pairs,
            signature,
            verb,
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> RequestBuilder {
        RequestBuilder::new(Credentials::new("K").with_secret("S"))
    }

    #[test]
    fn signed_request_is_sorted_with_signature_last() {
        let params = Params::from([("track", "X"), ("artist", "Y")]);
        let req = builder()
            .build("track.search", &params, true, HttpVerb::Get)
            .unwrap();
        assert_eq!(req.signature(), Some("9d4aa277be2e423028ee1c2ca1082b9d"));
        assert_eq!(
            req.path(),
            "/2.0/?api_key=K&artist=Y&method=track.search&track=X\
             &api_sig=9d4aa277be2e423028ee1c2ca1082b9d"
        );
        assert!(req.path().contains("api_key=K"));
        assert!(req.path().contains("method=track.search"));
    }

    #[test]
    fn unsigned_request_keeps_caller_order() {
        let params = Params::from([("track", "X"), ("artist", "Y")]);
        let req = builder()
            .build("track.search", &params, false, HttpVerb::Get)
            .unwrap();
        assert_eq!(req.signature(), None);
        assert_eq!(
            req.path(),
            "/2.0/?track=X&artist=Y&api_key=K&method=track.search"
        );
    }

    #[test]
    fn reserved_keys_override_caller_values() {
        let params = Params::from([("method", "evil"), ("api_key", "other")]);
        let req = builder()
            .build("artist.getInfo", &params, false, HttpVerb::Get)
            .unwrap();
        assert_eq!(req.path(), "/2.0/?method=artist.getInfo&api_key=K");
    }

    #[test]
    fn signature_is_percent_encoded_like_any_value() {
        let params = Params::from([("artist", "AC/DC & co")]);
        let req = builder()
            .build("artist.getInfo", &params, true, HttpVerb::Post)
            .unwrap();
        assert_eq!(req.verb(), HttpVerb::Post);
        assert!(req.path().contains("artist=AC%2FDC%20%26%20co"));
        assert_eq!(req.params().last().unwrap().0, "api_sig");
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let b = RequestBuilder::new(Credentials::default());
        let err = b
            .build("track.search", &Params::new(), false, HttpVerb::Get)
            .unwrap_err();
        assert!(matches!(err, ScrobblerError::Configuration(_)));
    }

    #[test]
    fn signing_without_secret_is_a_configuration_error() {
        let b = RequestBuilder::new(Credentials::new("K"));
        let err = b
            .build("auth.getToken", &Params::new(), true, HttpVerb::Get)
            .unwrap_err();
        assert!(matches!(err, ScrobblerError::Configuration(_)));
    }

    #[test]
    fn empty_method_is_an_argument_error() {
        let err = builder()
            .build("  ", &Params::new(), false, HttpVerb::Get)
            .unwrap_err();
        assert!(matches!(err, ScrobblerError::Argument(_)));
    }

    #[test]
    fn unencodable_value_is_an_encoding_error() {
        let params = Params::new().with("ratio", f64::INFINITY);
        for signed in [false, true] {
            let err = builder()
                .build("artist.getInfo", &params, signed, HttpVerb::Get)
                .unwrap_err();
            assert!(matches!(err, ScrobblerError::Encoding { ref key, .. } if key == "ratio"));
        }
    }
}
