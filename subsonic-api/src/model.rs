//! Domain objects that resolve their own children.
//!
//! Each object wraps a record from [`types`](crate::types) (reachable through
//! `Deref`, so `album.title` works) and an `Arc<dyn Resolver>` pointing back
//! at the session that produced it. Relationships are fetched on first
//! access and kept for the lifetime of the object:
//!
//! | Object       | Lazy accessor | Source                                          |
//! |--------------|---------------|-------------------------------------------------|
//! | [`Album`]    | `songs()`     | embedded `song` list, else `getMusicDirectory`  |
//! | [`Playlist`] | `songs()`     | embedded `entry` list, else `getPlaylist`       |
//! | [`Artist`]   | `albums()`    | `getMusicDirectory` on the artist id            |
//! | any          | `cover()`     | [`Resolver::cover_art`] (shared cache)          |
//!
//! [`Song::uri`] never touches the network.

use crate::cache::Memo;
use crate::error::Result;
use crate::query::{Action, Query};
use crate::resolver::Resolver;
use crate::types::{AlbumInfo, ArtistInfo, PlaylistInfo, SongInfo};
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::trace;

/// Deserialize a list that the server may render as an array, a single
/// object (older servers, one-element lists) or not at all.
pub(crate) fn list<T: DeserializeOwned>(value: Option<Value>) -> Result<Vec<T>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(Into::into))
            .collect(),
        Some(single) => Ok(vec![serde_json::from_value(single)?]),
    }
}

fn take(value: &mut Value, key: &str) -> Option<Value> {
    value.get_mut(key).map(Value::take)
}

fn songs_from(value: Option<Value>, resolver: &Arc<dyn Resolver>) -> Result<Vec<Song>> {
    Ok(list::<SongInfo>(value)?
        .into_iter()
        .map(|info| Song::new(info, Arc::clone(resolver)))
        .collect())
}

fn cover_of(resolver: &dyn Resolver, cover_art: Option<&str>) -> Result<Option<CoverArt>> {
    cover_art.map(|id| resolver.cover_art(id)).transpose()
}

/// Image bytes returned by `getCoverArt`, keyed by coverArt id.
///
/// Cloning is cheap: the bytes are reference counted, so every holder of the
/// same cached art shares one buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct CoverArt {
    id: String,
    data: Bytes,
}

impl CoverArt {
    pub fn new(id: impl Into<String>, data: Bytes) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// The server-assigned coverArt id.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_base64(&self) -> String {
        B64.encode(&self.data)
    }

    /// `data:{mime};base64,…`, e.g. for embedding in HTML.
    pub fn data_uri(&self, mime: &str) -> String {
        format!("data:{mime};base64,{}", self.to_base64())
    }
}

impl fmt::Debug for CoverArt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoverArt")
            .field("id", &self.id)
            .field("len", &self.data.len())
            .finish()
    }
}

/// A song, able to produce its own stream URL.
#[derive(Clone)]
pub struct Song {
    info: SongInfo,
    resolver: Arc<dyn Resolver>,
}

impl Song {
    pub fn new(info: SongInfo, resolver: Arc<dyn Resolver>) -> Self {
        Self { info, resolver }
    }

    pub fn info(&self) -> &SongInfo {
        &self.info
    }

    pub fn into_info(self) -> SongInfo {
        self.info
    }

    /// Playable/downloadable URL for this song. No request is made.
    pub fn uri(&self) -> String {
        self.resolver.stream_url(&self.info.id)
    }

    pub fn cover(&self) -> Result<Option<CoverArt>> {
        cover_of(self.resolver.as_ref(), self.info.cover_art.as_deref())
    }
}

impl Deref for Song {
    type Target = SongInfo;

    fn deref(&self) -> &SongInfo {
        &self.info
    }
}

impl fmt::Debug for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.info, f)
    }
}

/// An album whose song list is fetched on first access.
pub struct Album {
    info: AlbumInfo,
    resolver: Arc<dyn Resolver>,
    songs: Memo<Vec<Song>>,
}

impl Album {
    pub fn new(info: AlbumInfo, resolver: Arc<dyn Resolver>) -> Self {
        Self {
            info,
            resolver,
            songs: Memo::new(),
        }
    }

    /// Build from a raw album object. If it carries a `song` list (as
    /// `getAlbum` responses do), that list becomes the resolved song list.
    pub fn from_value(mut value: Value, resolver: Arc<dyn Resolver>) -> Result<Self> {
        let embedded = take(&mut value, "song");
        let info: AlbumInfo = serde_json::from_value(value)?;
        let songs = match embedded {
            Some(entries) => Memo::resolved(songs_from(Some(entries), &resolver)?),
            None => Memo::new(),
        };
        Ok(Self {
            info,
            resolver,
            songs,
        })
    }

    /// Build from a full `getAlbum` payload, where a missing `song` list
    /// means the album is empty rather than unresolved.
    pub fn from_detail(mut value: Value, resolver: Arc<dyn Resolver>) -> Result<Self> {
        if let Value::Object(map) = &mut value {
            map.entry("song").or_insert_with(|| Value::Array(Vec::new()));
        }
        Self::from_value(value, resolver)
    }

    pub fn info(&self) -> &AlbumInfo {
        &self.info
    }

    /// Songs in this album. The first call lists the album directory
    /// (`getMusicDirectory`); later calls return the same list.
    ///
    /// Sub-directories (e.g. `CD1/`) in the listing are skipped.
    pub fn songs(&self) -> Result<&[Song]> {
        self.songs
            .get_or_try_init(|| {
                trace!(album = %self.info.id, "resolving album songs");
                let query = Query::new(Action::GetMusicDirectory).param("id", &self.info.id);
                let mut dir = self.resolver.fetch(&query)?;
                let mut songs = songs_from(take(&mut dir, "child"), &self.resolver)?;
                songs.retain(|s| !s.is_dir);
                Ok(songs)
            })
            .map(Vec::as_slice)
    }

    /// Whether [`songs`](Self::songs) has already been resolved.
    pub fn songs_resolved(&self) -> bool {
        self.songs.is_resolved()
    }

    pub fn cover(&self) -> Result<Option<CoverArt>> {
        cover_of(self.resolver.as_ref(), self.info.cover_art.as_deref())
    }
}

impl Deref for Album {
    type Target = AlbumInfo;

    fn deref(&self) -> &AlbumInfo {
        &self.info
    }
}

impl fmt::Debug for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Album")
            .field("info", &self.info)
            .field("songs", &self.songs)
            .finish_non_exhaustive()
    }
}

/// A playlist whose entries are fetched on first access.
pub struct Playlist {
    info: PlaylistInfo,
    resolver: Arc<dyn Resolver>,
    songs: Memo<Vec<Song>>,
}

impl Playlist {
    pub fn new(info: PlaylistInfo, resolver: Arc<dyn Resolver>) -> Self {
        Self {
            info,
            resolver,
            songs: Memo::new(),
        }
    }

    /// Build from a raw playlist object, keeping an embedded `entry` list if
    /// present.
    pub fn from_value(mut value: Value, resolver: Arc<dyn Resolver>) -> Result<Self> {
        let embedded = take(&mut value, "entry");
        let info: PlaylistInfo = serde_json::from_value(value)?;
        let songs = match embedded {
            Some(entries) => Memo::resolved(songs_from(Some(entries), &resolver)?),
            None => Memo::new(),
        };
        Ok(Self {
            info,
            resolver,
            songs,
        })
    }

    /// Build from a full `getPlaylist` payload. Servers omit `entry` for an
    /// empty playlist, so a missing list resolves to no songs.
    pub fn from_detail(mut value: Value, resolver: Arc<dyn Resolver>) -> Result<Self> {
        if let Value::Object(map) = &mut value {
            map.entry("entry").or_insert_with(|| Value::Array(Vec::new()));
        }
        Self::from_value(value, resolver)
    }

    pub fn info(&self) -> &PlaylistInfo {
        &self.info
    }

    /// Songs in this playlist. Listings from `getPlaylists` carry no
    /// entries, so the first call fetches `getPlaylist`; later calls return
    /// the same list.
    pub fn songs(&self) -> Result<&[Song]> {
        self.songs
            .get_or_try_init(|| {
                trace!(playlist = %self.info.id, "resolving playlist entries");
                let query = Query::new(Action::GetPlaylist).param("id", &self.info.id);
                let mut playlist = self.resolver.fetch(&query)?;
                songs_from(take(&mut playlist, "entry"), &self.resolver)
            })
            .map(Vec::as_slice)
    }

    pub fn songs_resolved(&self) -> bool {
        self.songs.is_resolved()
    }

    pub fn cover(&self) -> Result<Option<CoverArt>> {
        cover_of(self.resolver.as_ref(), self.info.cover_art.as_deref())
    }
}

impl Deref for Playlist {
    type Target = PlaylistInfo;

    fn deref(&self) -> &PlaylistInfo {
        &self.info
    }
}

impl fmt::Debug for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playlist")
            .field("info", &self.info)
            .field("songs", &self.songs)
            .finish_non_exhaustive()
    }
}

/// An artist whose albums are fetched on first access.
pub struct Artist {
    info: ArtistInfo,
    resolver: Arc<dyn Resolver>,
    albums: Memo<Vec<Album>>,
}

impl Artist {
    pub fn new(info: ArtistInfo, resolver: Arc<dyn Resolver>) -> Self {
        Self {
            info,
            resolver,
            albums: Memo::new(),
        }
    }

    pub fn info(&self) -> &ArtistInfo {
        &self.info
    }

    /// Album directories under this artist (`getMusicDirectory`). Loose
    /// songs directly under the artist directory are skipped.
    pub fn albums(&self) -> Result<&[Album]> {
        self.albums
            .get_or_try_init(|| {
                trace!(artist = %self.info.id, "resolving artist albums");
                let query = Query::new(Action::GetMusicDirectory).param("id", &self.info.id);
                let mut dir = self.resolver.fetch(&query)?;
                Ok(list::<AlbumInfo>(take(&mut dir, "child"))?
                    .into_iter()
                    .filter(|a| a.is_dir)
                    .map(|info| Album::new(info, Arc::clone(&self.resolver)))
                    .collect())
            })
            .map(Vec::as_slice)
    }

    pub fn cover(&self) -> Result<Option<CoverArt>> {
        cover_of(self.resolver.as_ref(), self.info.cover_art.as_deref())
    }
}

impl Deref for Artist {
    type Target = ArtistInfo;

    fn deref(&self) -> &ArtistInfo {
        &self.info
    }
}

impl fmt::Debug for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artist")
            .field("info", &self.info)
            .field("albums", &self.albums)
            .finish_non_exhaustive()
    }
}

/// Results of a `search2` query.
pub struct SearchResults {
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
    pub songs: Vec<Song>,
}

impl SearchResults {
    /// Build from a `searchResult2` payload. Missing sections are empty.
    pub fn from_value(mut value: Value, resolver: &Arc<dyn Resolver>) -> Result<Self> {
        let artists: Vec<Artist> = list::<ArtistInfo>(take(&mut value, "artist"))?
            .into_iter()
            .map(|info| Artist::new(info, Arc::clone(resolver)))
            .collect();
        let albums: Vec<Album> = list::<Value>(take(&mut value, "album"))?
            .into_iter()
            .map(|raw| Album::from_value(raw, Arc::clone(resolver)))
            .collect::<Result<_>>()?;
        let songs = songs_from(take(&mut value, "song"), resolver)?;
        Ok(Self {
            artists,
            albums,
            songs,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty() && self.albums.is_empty() && self.songs.is_empty()
    }
}

impl fmt::Debug for SearchResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SearchResults(artists=[...{}], albums=[...{}], songs=[...{}])",
            self.artists.len(),
            self.albums.len(),
            self.songs.len()
        )
    }
}
