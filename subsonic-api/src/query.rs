//! Request building: actions and their parameters.
//!
//! A [`Query`] is an [`Action`] plus an ordered list of parameters. Optional
//! parameters that are `None` are dropped when they are added, so they never
//! reach the serialized URL. Because a `Query` is `Hash + Eq`, it doubles as
//! the cache key for memoized lookups: two calls with the same action and
//! the same present parameters are the same call.

use std::fmt::{self, Display};

/// A remote operation, i.e. the `{action}` in `/rest/{action}.view`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Ping,
    Search2,
    GetPlaylists,
    GetPlaylist,
    GetMusicFolders,
    GetAlbumList,
    GetAlbum,
    GetMusicDirectory,
    GetCoverArt,
    GetLicense,
}

impl Action {
    /// Wire name of the action.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Search2 => "search2",
            Self::GetPlaylists => "getPlaylists",
            Self::GetPlaylist => "getPlaylist",
            Self::GetMusicFolders => "getMusicFolders",
            Self::GetAlbumList => "getAlbumList",
            Self::GetAlbum => "getAlbum",
            Self::GetMusicDirectory => "getMusicDirectory",
            Self::GetCoverArt => "getCoverArt",
            Self::GetLicense => "getLicense",
        }
    }

    /// Key under `subsonic-response` that holds this action's payload.
    ///
    /// `None` means the envelope itself is the payload (`ping`) or the
    /// action returns a binary body (`getCoverArt`).
    pub fn root(self) -> Option<&'static str> {
        match self {
            Self::Ping | Self::GetCoverArt => None,
            Self::Search2 => Some("searchResult2"),
            Self::GetPlaylists => Some("playlists"),
            Self::GetPlaylist => Some("playlist"),
            Self::GetMusicFolders => Some("musicFolders"),
            Self::GetAlbumList => Some("albumList"),
            Self::GetAlbum => Some("album"),
            Self::GetMusicDirectory => Some("directory"),
            Self::GetLicense => Some("license"),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An action with its request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    action: Action,
    params: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            params: Vec::new(),
        }
    }

    /// Add a parameter that is always present.
    #[must_use]
    pub fn param(mut self, name: &'static str, value: impl Display) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    /// Add a parameter only if `value` is `Some`.
    #[must_use]
    pub fn opt<T: Display>(self, name: &'static str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.param(name, v),
            None => self,
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Parameters in insertion order (absent ones never appear).
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// Serialize the parameters as `&name=value…` with percent-encoded
    /// values, ready to be appended after the auth fragment.
    pub fn encode_params(&self) -> String {
        self.params
            .iter()
            .map(|(name, value)| format!("&{name}={}", urlencoding::encode(value)))
            .collect()
    }
}

impl From<Action> for Query {
    fn from(action: Action) -> Self {
        Self::new(action)
    }
}
