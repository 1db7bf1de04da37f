//! Search API.
//!
//! Endpoint: `GET /rest/search2.view`
//!
//! Request parameters:
//! - `query`: search text
//! - `artistCount` / `artistOffset`: artist page (default 20 / 0)
//! - `albumCount` / `albumOffset`: album page (default 20 / 0)
//! - `songCount` / `songOffset`: song page (default 20 / 0)
//! - `musicFolderId`: restrict to one library root
//!
//! Response payload:
//! ```json
//! {
//!   "searchResult2": {
//!     "artist": [ { "id": "ar-1", "name": "ABBA" } ],
//!     "album":  [ { "id": "al-1", "title": "Arrival", "isDir": true, "coverArt": "al-1" } ],
//!     "song":   [ { "id": "so-1", "title": "Dancing Queen", "album": "Arrival", ... } ]
//!   }
//! }
//! ```
//!
//! Sections with no hits are omitted by the server; they come back empty.

use crate::cache::cached;
use crate::client::SubsonicClient;
use crate::error::Result;
use crate::model::SearchResults;
use crate::query::{Action, Query};
use crate::types::SearchOptions;
use std::sync::Arc;

impl SubsonicClient {
    /// Search artists, albums and songs.
    ///
    /// Results are cached by the exact request: the same text and options
    /// return the same `Arc` without a second request; changing any option
    /// (including offsets) makes a new request.
    ///
    /// # Errors
    ///
    /// - connection failures ([`ErrorKind::Connection`](crate::ErrorKind::Connection))
    /// - [`SubsonicError::Api`](crate::SubsonicError::Api): server-side error
    pub fn search(&self, text: &str, options: &SearchOptions) -> Result<Arc<SearchResults>> {
        let query = Query::new(Action::Search2)
            .param("query", text)
            .opt("artistCount", options.artist_count)
            .opt("artistOffset", options.artist_offset)
            .opt("albumCount", options.album_count)
            .opt("albumOffset", options.album_offset)
            .opt("songCount", options.song_count)
            .opt("songOffset", options.song_offset)
            .opt("musicFolderId", options.music_folder_id.as_deref());

        cached(&self.session.caches().search, query.clone(), || {
            let payload = self.session.dispatcher().query(&query)?;
            Ok(Arc::new(SearchResults::from_value(payload, &self.resolver())?))
        })
    }
}
