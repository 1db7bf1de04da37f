//! Blocking client facade.
//!
//! [`SubsonicClient`] owns the session (server address, auth fragment,
//! transport, caches) and hands an `Arc` of it to every object it builds, so
//! those objects can resolve their children later. The endpoint methods are
//! implemented in separate modules (`search`, `playlist`, `library`,
//! `system`) as `impl SubsonicClient` blocks.
//!
//! Building a client makes no request; bad credentials show up on the first
//! real call (or as a failed [`ping`](SubsonicClient::ping)).

use crate::auth::{AuthParams, Credentials, DEFAULT_API_VERSION, DEFAULT_CLIENT_ID};
use crate::cache::{CacheConfig, Caches, Memo};
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::model::Playlist;
use crate::resolver::{Resolver, Session};
use crate::transport::{DEFAULT_TIMEOUT, HttpTransport, Transport};
use crate::types::License;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Everything needed to build a [`SubsonicClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URI, e.g. `https://music.example.com`.
    pub host: String,
    pub credentials: Credentials,
    /// Sent as the `c` parameter.
    pub client_id: String,
    /// REST protocol version sent as the `v` parameter.
    pub version: String,
    /// Per-request timeout.
    pub timeout: Duration,
    pub cache: CacheConfig,
}

impl ClientConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            credentials: Credentials::new(username, password),
            client_id: DEFAULT_CLIENT_ID.to_owned(),
            version: DEFAULT_API_VERSION.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            cache: CacheConfig::default(),
        }
    }

    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }
}

/// Blocking client for one Subsonic server.
///
/// Lookups that the server answers the same way every time are cached for
/// the life of the client (see [`CacheConfig`] to bound that), and results
/// are shared: asking twice for the same page of albums returns the same
/// `Arc`.
pub struct SubsonicClient {
    pub(crate) session: Arc<Session>,
    pub(crate) playlists: Memo<Vec<Playlist>>,
    pub(crate) folders: Memo<BTreeMap<String, String>>,
    pub(crate) license: Memo<License>,
}

impl SubsonicClient {
    /// Create a client with default settings.
    ///
    /// `password` is the shared secret the server checks: the plaintext
    /// password, or its MD5 digest if the server stores digests.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(ClientConfig::new(host, username, password))
    }

    /// Create a client over HTTP with an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over a custom [`Transport`]. `config.timeout` is not
    /// applied; the transport owns its own timeouts.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let auth = AuthParams::new(&config.credentials, &config.client_id, &config.version);
        debug!(host = %config.host, user = %config.credentials.username, "creating subsonic client");
        let dispatcher = Dispatcher::new(&config.host, auth, transport);
        let session = Session::new(dispatcher, Caches::new(&config.cache));
        Self {
            session: Arc::new(session),
            playlists: Memo::new(),
            folders: Memo::new(),
            license: Memo::new(),
        }
    }

    /// The auth fragment this client attaches to every request.
    pub fn auth(&self) -> &AuthParams {
        self.session.dispatcher().auth()
    }

    /// Server base URI (without trailing slash).
    pub fn host(&self) -> &str {
        self.session.dispatcher().base()
    }

    /// Drop all cached results so the next calls refetch from the server.
    ///
    /// Objects already handed out keep whatever they resolved.
    pub fn clear_caches(&mut self) {
        self.session.caches().invalidate_all();
        self.playlists = Memo::new();
        self.folders = Memo::new();
        self.license = Memo::new();
    }

    /// The resolver handed to every object this client builds.
    pub(crate) fn resolver(&self) -> Arc<dyn Resolver> {
        self.session.clone()
    }
}
