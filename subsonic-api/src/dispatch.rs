//! Request dispatch and envelope validation.
//!
//! Every REST call is a GET to
//!
//! ```text
//! {base}/rest/{action}.view?u=…&t=…&s=…&c=…&v=…&f=json[&param=value…]
//! ```
//!
//! and every JSON answer is wrapped in the same envelope:
//!
//! ```json
//! {
//!   "subsonic-response": {
//!     "status": "ok",
//!     "version": "1.16.1",
//!     "albumList": { "album": [ ... ] }
//!   }
//! }
//! ```
//!
//! or, on failure:
//!
//! ```json
//! {
//!   "subsonic-response": {
//!     "status": "failed",
//!     "version": "1.16.1",
//!     "error": { "code": 40, "message": "Wrong username or password." }
//!   }
//! }
//! ```
//!
//! A `failed` status maps to [`SubsonicError::Api`]. An `ok` status whose
//! envelope lacks the key the action needs maps to
//! [`SubsonicError::MissingKey`], which callers can tell apart from a
//! declared server error.

use crate::auth::AuthParams;
use crate::error::{Result, SubsonicError};
use crate::query::{Action, Query};
use crate::transport::Transport;
use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

const ENVELOPE: &str = "subsonic-response";

/// Builds request URLs, performs them, and unwraps the envelope.
pub struct Dispatcher {
    base: String,
    auth: AuthParams,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(base: &str, auth: AuthParams, transport: Arc<dyn Transport>) -> Self {
        Self {
            base: base.trim_end_matches('/').to_owned(),
            auth,
            transport,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn auth(&self) -> &AuthParams {
        &self.auth
    }

    /// Fully qualified URL for `query`.
    pub fn url(&self, query: &Query) -> String {
        format!(
            "{}/rest/{}.view?{}{}",
            self.base,
            query.action(),
            self.auth.as_query(),
            query.encode_params()
        )
    }

    /// Playable URL for a song. Pure string construction.
    pub fn stream_url(&self, id: &str) -> String {
        format!(
            "{}/rest/stream?id={}&{}",
            self.base,
            urlencoding::encode(id),
            self.auth.as_query()
        )
    }

    /// Perform `query` and return the payload under the action's root key
    /// (or the whole envelope for actions without one, e.g. `ping`).
    pub fn query(&self, query: &Query) -> Result<Value> {
        debug!(action = %query.action(), params = ?query.params(), "subsonic request");
        let body = self.transport.get(&self.url(query))?;
        let json: Value = serde_json::from_slice(&body)?;
        unwrap_envelope(json, query.action())
    }

    /// Perform `query` and return the unparsed body (binary endpoints).
    ///
    /// Servers answer binary endpoints with a JSON envelope when the request
    /// fails (e.g. an unknown cover art id); such an envelope is surfaced as
    /// [`SubsonicError::Api`] rather than returned as data.
    pub fn query_raw(&self, query: &Query) -> Result<Bytes> {
        debug!(action = %query.action(), params = ?query.params(), "subsonic raw request");
        let body = self.transport.get(&self.url(query))?;
        if body.first() == Some(&b'{') {
            if let Ok(json) = serde_json::from_slice::<Value>(&body) {
                if let Some(resp) = json.get(ENVELOPE) {
                    check_status(resp)?;
                }
            }
        }
        Ok(body)
    }
}

/// Validate the envelope and extract the payload for `action`.
pub fn unwrap_envelope(mut json: Value, action: Action) -> Result<Value> {
    let mut resp = json
        .get_mut(ENVELOPE)
        .map(Value::take)
        .ok_or_else(|| SubsonicError::MissingKey(ENVELOPE.into()))?;
    check_status(&resp)?;

    match action.root() {
        None => Ok(resp),
        Some(root) => resp
            .get_mut(root)
            .map(Value::take)
            .ok_or_else(|| SubsonicError::MissingKey(root.into())),
    }
}

fn check_status(resp: &Value) -> Result<()> {
    let status = resp
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| SubsonicError::MissingKey("status".into()))?;
    if status == "ok" {
        return Ok(());
    }

    let err = resp
        .get("error")
        .ok_or_else(|| SubsonicError::MissingKey("error".into()))?;
    Err(SubsonicError::Api {
        code: err.get("code").and_then(Value::as_i64).unwrap_or(0),
        message: err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_owned(),
    })
}
