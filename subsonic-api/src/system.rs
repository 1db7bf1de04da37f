//! System endpoints: `ping`, `getLicense`, and stream links.
//!
//! `ping` has no payload root; the envelope itself is the answer:
//!
//! ```json
//! { "subsonic-response": { "status": "ok", "version": "1.16.1",
//!                          "type": "navidrome", "serverVersion": "0.53.3",
//!                          "openSubsonic": true } }
//! ```

use crate::client::SubsonicClient;
use crate::error::Result;
use crate::query::{Action, Query};
use crate::types::{License, Ping};
use tracing::warn;

impl SubsonicClient {
    /// Check that the server is reachable and accepts our credentials.
    ///
    /// Never fails: if the request cannot be completed (or the server
    /// rejects it) the result is [`Ping::failed`].
    pub fn ping(&self) -> Ping {
        let result = self
            .session
            .dispatcher()
            .query(&Query::new(Action::Ping))
            .and_then(|envelope| Ok(serde_json::from_value::<Ping>(envelope)?));
        match result {
            Ok(ping) => ping,
            Err(err) => {
                warn!(host = %self.host(), error = %err, "ping failed");
                Ping::failed()
            }
        }
    }

    /// Server license. Fetched once per client.
    pub fn license(&self) -> Result<&License> {
        self.license.get_or_try_init(|| {
            let payload = self
                .session
                .dispatcher()
                .query(&Query::new(Action::GetLicense))?;
            Ok(serde_json::from_value(payload)?)
        })
    }

    /// Playable URL for a song id. No request is made.
    pub fn stream_url(&self, song_id: &str) -> String {
        self.session.dispatcher().stream_url(song_id)
    }
}
