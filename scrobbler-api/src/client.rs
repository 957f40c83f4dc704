//! Client for the Audioscrobbler 2.0 web service.
//!
//! Every call goes through the same pipeline:
//!
//! 1. Build the query (`api_key`, `method`, caller params, optional `api_sig`)
//! 2. Send `GET`/`POST http://ws.audioscrobbler.com/2.0/?<query>`
//! 3. Parse the XML body and check the `lfm` status envelope
//! 4. Pick the `<member>` children of `<container>`, or of the root for
//!    single-object methods
//! 5. Resolve `member` in the entity registry and materialize each element
//!
//! # Response format
//!
//! ```xml
//! <lfm status="ok">
//!   <similarartists artist="Cher">
//!     <artist><name>Sonny &amp; Cher</name><match>1</match>...</artist>
//!     ...
//!   </similarartists>
//! </lfm>
//! ```
//!
//! `status="failed"` envelopes are mapped to
//! [`ScrobblerError::Api`](crate::ScrobblerError::Api).

use crate::credentials::Credentials;
use crate::entity::{Entity, EntityRegistry, Materialize, downcast};
use crate::error::{Result, ScrobblerError};
use crate::materialize::materialize;
use crate::params::Params;
use crate::request::{HttpVerb, RequestBuilder, SignedRequest};
use crate::response::{
    Page, PageInfo, check_status, extract_elements, extract_root_members, parse,
};
use crate::transport::{HttpTransport, Transport};
use tracing::debug;

/// Where member elements are looked up.
#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    Container(&'a str),
    Root,
}

/// Blocking client for the Audioscrobbler web service.
///
/// Holds a [`RequestBuilder`] (credentials), a [`Transport`] and the
/// [`EntityRegistry`]; all three are fixed at construction. Endpoint methods
/// are implemented in separate modules (`search`, `artist`, `track`, `user`,
/// `auth`) as `impl ScrobblerClient` blocks.
pub struct ScrobblerClient<T: Transport = HttpTransport> {
    builder: RequestBuilder,
    transport: T,
    registry: EntityRegistry,
}

impl ScrobblerClient {
    /// Create a new client, loading credentials from
    /// `~/.config/scrobbler/credentials.json`.
    pub fn new() -> Result<Self> {
        Self::with_credentials(Credentials::load()?)
    }

    /// Create a client with explicit [`Credentials`].
    pub fn with_credentials(credentials: Credentials) -> Result<Self> {
        Ok(Self::with_transport(credentials, HttpTransport::new()?))
    }
}

impl<T: Transport> ScrobblerClient<T> {
    /// Create a client over any [`Transport`] (useful for testing).
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            builder: RequestBuilder::new(credentials),
            transport,
            registry: EntityRegistry::with_defaults(),
        }
    }

    /// Replace the entity registry.
    #[must_use]
    pub fn with_registry(mut self, registry: EntityRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        self.builder.credentials()
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The stored session key, required by write and session-scoped methods.
    pub(crate) fn require_session_key(&self) -> Result<String> {
        self.credentials()
            .session_key()
            .map(str::to_owned)
            .ok_or_else(|| ScrobblerError::Configuration("no session key; log in first".into()))
    }

    /// Send a built request and return the raw body.
    pub fn send(&self, request: &SignedRequest) -> Result<String> {
        match request.verb() {
            HttpVerb::Get => self.transport.get(request.path()),
            HttpVerb::Post => self.transport.post(request.path()),
        }
    }

    /// Build and send a request, returning the raw XML body.
    ///
    /// The body is returned as-is, without checking the status envelope.
    pub fn request(
        &self,
        method: &str,
        params: &Params,
        signed: bool,
        verb: HttpVerb,
    ) -> Result<String> {
        let request = self.builder.build(method, params, signed, verb)?;
        self.send(&request)
    }

    /// Signed `POST` for write methods; fails on a `failed` envelope.
    pub fn post_request(&self, method: &str, params: &Params) -> Result<String> {
        let body = self.request(method, params, true, HttpVerb::Post)?;
        check_status(&parse(&body)?)?;
        Ok(body)
    }

    /// Fetch `member` elements of `container` and materialize them.
    ///
    /// Unsigned `GET`. The member name is resolved in the registry before
    /// any network traffic. No matching elements yields an empty vector.
    pub fn fetch(
        &self,
        method: &str,
        container: &str,
        member: &str,
        params: &Params,
    ) -> Result<Vec<Box<dyn Entity>>> {
        self.fetch_with(method, Scope::Container(container), member, params, false)
            .map(|(entities, _)| entities)
    }

    /// [`fetch`](Self::fetch), downcast to `E`.
    pub fn fetch_as<E: Materialize>(
        &self,
        method: &str,
        container: &str,
        member: &str,
        params: &Params,
    ) -> Result<Vec<E>> {
        self.fetch(method, container, member, params)?
            .into_iter()
            .map(downcast)
            .collect()
    }

    /// First member only, or `None`.
    pub fn fetch_one<E: Materialize>(
        &self,
        method: &str,
        container: &str,
        member: &str,
        params: &Params,
    ) -> Result<Option<E>> {
        Ok(self
            .fetch_as(method, container, member, params)?
            .into_iter()
            .next())
    }

    /// [`fetch_as`](Self::fetch_as) plus the container's pagination.
    pub fn fetch_page<E: Materialize>(
        &self,
        method: &str,
        container: &str,
        member: &str,
        params: &Params,
    ) -> Result<Page<E>> {
        let (entities, info) =
            self.fetch_with(method, Scope::Container(container), member, params, false)?;
        let items = entities.into_iter().map(downcast).collect::<Result<Vec<E>>>()?;
        Ok(info.with_items(items))
    }

    /// Fetch `member` elements placed directly under the envelope
    /// (`<lfm><track>...</track></lfm>`), as single-object methods return.
    pub fn fetch_root(
        &self,
        method: &str,
        member: &str,
        params: &Params,
    ) -> Result<Vec<Box<dyn Entity>>> {
        self.fetch_with(method, Scope::Root, member, params, false)
            .map(|(entities, _)| entities)
    }

    /// First root member as `E`, or `None`.
    pub fn fetch_root_one<E: Materialize>(
        &self,
        method: &str,
        member: &str,
        params: &Params,
    ) -> Result<Option<E>> {
        first(self.fetch_root(method, member, params)?)
    }

    /// Signed `GET` variant of [`fetch_root_one`](Self::fetch_root_one).
    pub(crate) fn fetch_signed_root_one<E: Materialize>(
        &self,
        method: &str,
        member: &str,
        params: &Params,
    ) -> Result<Option<E>> {
        let (entities, _) = self.fetch_with(method, Scope::Root, member, params, true)?;
        first(entities)
    }

    fn fetch_with(
        &self,
        method: &str,
        scope: Scope<'_>,
        member: &str,
        params: &Params,
        signed: bool,
    ) -> Result<(Vec<Box<dyn Entity>>, PageInfo)> {
        let constructor = self.registry.resolve(member)?;
        let body = self.request(method, params, signed, HttpVerb::Get)?;
        let doc = parse(&body)?;
        check_status(&doc)?;

        let (elements, info) = match scope {
            Scope::Container(container) => (
                extract_elements(&doc, container, member),
                PageInfo::from_document(&doc, container),
            ),
            Scope::Root => (extract_root_members(&doc, member), PageInfo::default()),
        };
        let entities = elements
            .into_iter()
            .map(|element| materialize(constructor, element))
            .collect::<Result<Vec<_>>>()?;
        debug!(method, ?scope, member, count = entities.len(), "materialized");

        Ok((entities, info))
    }
}

fn first<E: Materialize>(entities: Vec<Box<dyn Entity>>) -> Result<Option<E>> {
    entities.into_iter().next().map(downcast).transpose()
}
