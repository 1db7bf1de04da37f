//! Subsonic API client library.
//!
//! Provides authenticated, blocking access to Subsonic-compatible music
//! servers (Subsonic, Airsonic, Navidrome, Gonic, ...) and exposes the
//! results as objects that fetch their own children on demand: an album
//! lists its songs, a playlist its entries, an artist its albums, and any of
//! them its cover art.
//!
//! # Authentication
//!
//! Every request carries a salted token (`t = md5(password + salt)`), never
//! the password itself. The salt is drawn once per client. See
//! [`auth`](crate::auth).
//!
//! ```no_run
//! use subsonic_api::{SearchOptions, SubsonicClient};
//!
//! let client = SubsonicClient::new("https://music.example.com", "alice", "sesame").unwrap();
//! assert!(client.ping().is_ok());
//!
//! for album in client.albums("Music", 0, 40).unwrap().iter() {
//!     println!("{} ({} songs)", album.title, album.songs().unwrap().len());
//! }
//!
//! let hits = client.search("dancing queen", &SearchOptions::default()).unwrap();
//! if let Some(song) = hits.songs.first() {
//!     println!("stream: {}", song.uri());
//! }
//! ```
//!
//! # API endpoint mapping
//!
//! | Method                                | REST action        | Cached             |
//! |---------------------------------------|--------------------|--------------------|
//! | [`SubsonicClient::ping`]              | `ping`             | no                 |
//! | [`SubsonicClient::search`]            | `search2`          | per request        |
//! | [`SubsonicClient::playlists`]         | `getPlaylists`     | once per client    |
//! | [`SubsonicClient::playlist`]          | (uses `playlists`) | -                  |
//! | [`SubsonicClient::playlist_by_id`]    | `getPlaylist`      | per id             |
//! | [`SubsonicClient::folders`]           | `getMusicFolders`  | once per client    |
//! | [`SubsonicClient::albums`]            | `getAlbumList`     | per request        |
//! | [`SubsonicClient::album_list`]        | `getAlbumList`     | per request        |
//! | [`SubsonicClient::album`]             | `getAlbum`         | per id             |
//! | [`SubsonicClient::cover_art`]         | `getCoverArt`      | per coverArt id    |
//! | [`SubsonicClient::license`]           | `getLicense`       | once per client    |
//! | [`Album::songs`]                      | `getMusicDirectory`| once per object    |
//! | [`Playlist::songs`]                   | `getPlaylist`      | once per object    |
//! | [`Artist::albums`]                    | `getMusicDirectory`| once per object    |
//! | [`Song::uri`]                         | (no request)       | -                  |
//!
//! # Logging
//!
//! Requests are logged with [`tracing`] at `debug` (action and parameters,
//! never the token); cache hits at `trace`. The library installs no
//! subscriber.

pub mod auth;
pub mod cache;
pub mod client;
pub mod dispatch;
pub mod error;
mod library;
pub mod model;
mod playlist;
pub mod query;
pub mod resolver;
mod search;
mod system;
pub mod transport;
pub mod types;

pub use cache::CacheConfig;
pub use client::{ClientConfig, SubsonicClient};
pub use error::{ErrorKind, Result, SubsonicError};
pub use library::DEFAULT_PAGE_SIZE;
pub use model::{Album, Artist, CoverArt, Playlist, SearchResults, Song};
pub use resolver::Resolver;
pub use transport::{HttpTransport, Transport};
pub use types::{AlbumListType, License, Ping, SearchOptions};
