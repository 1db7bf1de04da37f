//! Library browsing: music folders, album listings, albums and cover art.
//!
//! # Endpoints
//!
//! ## `getMusicFolders`
//!
//! ```json
//! { "musicFolders": { "musicFolder": [ { "id": 1, "name": "Music" } ] } }
//! ```
//!
//! ## `getAlbumList`
//!
//! Request: `type` (ordering), `size`, `offset`, `musicFolderId`.
//!
//! ```json
//! { "albumList": { "album": [ { "id": "al-1", "parent": "ar-1", "isDir": true,
//!                               "title": "Arrival", "artist": "ABBA", "coverArt": "al-1" } ] } }
//! ```
//!
//! ## `getAlbum`
//!
//! Request: `id`. Returns the ID3 album (`name` instead of `title`) with its
//! `song` list embedded.
//!
//! ## `getCoverArt`
//!
//! Request: `id`, `size`. Returns image bytes, not JSON.

use crate::cache::cached;
use crate::client::SubsonicClient;
use crate::error::{Result, SubsonicError};
use crate::model::{Album, CoverArt, list};
use crate::query::{Action, Query};
use crate::resolver::Resolver;
use crate::types::{AlbumListType, MusicFolder};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Default page size for [`SubsonicClient::albums`].
pub const DEFAULT_PAGE_SIZE: u32 = 40;

impl SubsonicClient {
    /// Music folder name → id. Fetched once per client.
    pub fn folders(&self) -> Result<&BTreeMap<String, String>> {
        self.folders.get_or_try_init(|| {
            let mut payload = self
                .session
                .dispatcher()
                .query(&Query::new(Action::GetMusicFolders))?;
            let items = payload.get_mut("musicFolder").map(Value::take);
            Ok(list::<MusicFolder>(items)?
                .into_iter()
                .map(|f| (f.name, f.id))
                .collect())
        })
    }

    /// One page of albums in `folder`, alphabetical by name.
    ///
    /// `page` is zero-based; the request offset is `page * count`. Pages are
    /// cached by `(folder, page, count)`.
    ///
    /// # Errors
    ///
    /// - [`SubsonicError::InvalidArgument`]: no music folder is called
    ///   `folder`; no album listing is requested
    pub fn albums(&self, folder: &str, page: u32, count: u32) -> Result<Arc<Vec<Album>>> {
        self.album_list(AlbumListType::AlphabeticalByName, Some(folder), page, count)
    }

    /// One page of albums in the given ordering, optionally restricted to
    /// one music folder.
    pub fn album_list(
        &self,
        list_type: AlbumListType,
        folder: Option<&str>,
        page: u32,
        count: u32,
    ) -> Result<Arc<Vec<Album>>> {
        let folder_id = match folder {
            Some(name) => Some(self.folder_id(name)?),
            None => None,
        };

        let query = Query::new(Action::GetAlbumList)
            .param("type", list_type.as_str())
            .param("size", count)
            .param("offset", u64::from(page) * u64::from(count))
            .opt("musicFolderId", folder_id);

        cached(&self.session.caches().album_lists, query.clone(), || {
            let mut payload = self.session.dispatcher().query(&query)?;
            let items = payload.get_mut("album").map(Value::take);
            let albums = list::<Value>(items)?
                .into_iter()
                .map(|raw| Album::from_value(raw, self.resolver()))
                .collect::<Result<Vec<_>>>()?;
            Ok(Arc::new(albums))
        })
    }

    /// Fetch one album with its songs. Cached by id.
    pub fn album(&self, id: &str) -> Result<Arc<Album>> {
        cached(&self.session.caches().albums, id.to_owned(), || {
            let query = Query::new(Action::GetAlbum).param("id", id);
            let payload = self.session.dispatcher().query(&query)?;
            Ok(Arc::new(Album::from_detail(payload, self.resolver())?))
        })
    }

    /// Cover art bytes for a coverArt id, shared with every object that
    /// references the same id.
    pub fn cover_art(&self, id: &str) -> Result<CoverArt> {
        self.session.cover_art(id)
    }

    fn folder_id(&self, name: &str) -> Result<String> {
        self.folders()?
            .get(name)
            .cloned()
            .ok_or_else(|| SubsonicError::InvalidArgument(format!("folder \"{name}\" does not exist")))
    }
}
