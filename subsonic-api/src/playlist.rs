//! Playlist API.
//!
//! ## `getPlaylists`
//!
//! ```json
//! {
//!   "playlists": {
//!     "playlist": [
//!       { "id": "pl-1", "name": "Road trip", "owner": "alice", "public": true,
//!         "songCount": 12, "duration": 2931, "created": "2024-05-01T10:00:00Z",
//!         "coverArt": "pl-1" }
//!     ]
//!   }
//! }
//! ```
//!
//! Listings carry no entries; [`Playlist::songs`] fetches them on demand.
//!
//! ## `getPlaylist`
//!
//! Request: `id`. Same object as above plus `"entry": [ song, ... ]`.

use crate::cache::cached;
use crate::client::SubsonicClient;
use crate::error::Result;
use crate::model::{Playlist, list};
use crate::query::{Action, Query};
use serde_json::Value;
use std::sync::Arc;

impl SubsonicClient {
    /// All playlists visible to the user. Fetched once per client.
    pub fn playlists(&self) -> Result<&[Playlist]> {
        self.playlists
            .get_or_try_init(|| {
                let mut payload = self
                    .session
                    .dispatcher()
                    .query(&Query::new(Action::GetPlaylists))?;
                let items = payload.get_mut("playlist").map(Value::take);
                list::<Value>(items)?
                    .into_iter()
                    .map(|raw| Playlist::from_value(raw, self.resolver()))
                    .collect()
            })
            .map(Vec::as_slice)
    }

    /// The first playlist named `name`, if any. Not finding one is not an
    /// error.
    pub fn playlist(&self, name: &str) -> Result<Option<&Playlist>> {
        Ok(self.playlists()?.iter().find(|p| p.name == name))
    }

    /// Fetch one playlist with its entries. Cached by id.
    pub fn playlist_by_id(&self, id: &str) -> Result<Arc<Playlist>> {
        cached(&self.session.caches().playlists, id.to_owned(), || {
            let query = Query::new(Action::GetPlaylist).param("id", id);
            let payload = self.session.dispatcher().query(&query)?;
            Ok(Arc::new(Playlist::from_detail(payload, self.resolver())?))
        })
    }
}
