//! Token authentication.
//!
//! Subsonic servers (API 1.13.0+) authenticate every request with a salted
//! token instead of the password itself:
//!
//! ```text
//! s = random salt (32 lowercase hex chars, 128 bits)
//! t = md5(secret + s) as lowercase hex
//! ```
//!
//! `secret` is whatever the server compares against. If the server stores
//! passwords in plaintext, pass the plaintext password. If it stores an MD5
//! digest of the password, pass that digest instead.
//!
//! The salt is drawn once when the client is built; the resulting
//! [`AuthParams`] fragment is attached unchanged to every request that client
//! makes.

use md5::{Digest, Md5};
use rand::Rng;
use std::fmt;

/// Default client identifier sent as the `c` parameter.
pub const DEFAULT_CLIENT_ID: &str = "subsonic-rs";

/// Default REST protocol version sent as the `v` parameter.
pub const DEFAULT_API_VERSION: &str = "1.15.0";

/// Username and shared secret used to derive a request token.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Derive the token for `salt`.
    pub fn token(&self, salt: &Salt) -> String {
        token(&self.secret, salt.as_str())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// A per-client random salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt(String);

impl Salt {
    /// Draw 128 random bits and render them as 32 lowercase hex characters.
    pub fn random() -> Self {
        let bits: u128 = rand::rng().random();
        Self(format!("{bits:032x}"))
    }

    /// Use a fixed salt (tests, or replaying a known token).
    pub fn from_string(salt: impl Into<String>) -> Self {
        Self(salt.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `hex(md5(secret ‖ salt))`.
pub fn token(secret: &str, salt: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(secret.as_bytes());
    hasher.update(salt.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The fixed authentication fragment appended to every request URL:
/// `u=…&t=…&s=…&c=…&v=…&f=json`.
#[derive(Clone)]
pub struct AuthParams {
    username: String,
    token: String,
    salt: Salt,
    client_id: String,
    version: String,
    fragment: String,
}

impl AuthParams {
    /// Derive the token for a freshly generated salt.
    pub fn new(credentials: &Credentials, client_id: &str, version: &str) -> Self {
        Self::with_salt(credentials, Salt::random(), client_id, version)
    }

    pub fn with_salt(credentials: &Credentials, salt: Salt, client_id: &str, version: &str) -> Self {
        let token = credentials.token(&salt);
        let fragment = format!(
            "u={}&t={token}&s={}&c={}&v={}&f=json",
            urlencoding::encode(&credentials.username),
            salt.as_str(),
            urlencoding::encode(client_id),
            urlencoding::encode(version),
        );
        Self {
            username: credentials.username.clone(),
            token,
            salt,
            client_id: client_id.to_owned(),
            version: version.to_owned(),
            fragment,
        }
    }

    /// The serialized query-string fragment (without a leading `?` or `&`).
    pub fn as_query(&self) -> &str {
        &self.fragment
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Debug for AuthParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthParams")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .field("salt", &self.salt)
            .field("client_id", &self.client_id)
            .field("version", &self.version)
            .finish()
    }
}
