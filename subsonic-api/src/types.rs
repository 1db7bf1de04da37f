//! Data records for Subsonic API responses.
//!
//! These are plain snapshots of what the server reported, deserialized from
//! the JSON payloads. Field names follow Rust conventions (`snake_case`);
//! serde maps them from the API's camelCase. Unknown keys are ignored and
//! keys the server leaves out take their default, so the same record works
//! across server implementations that report more or fewer fields.
//!
//! The lazily-resolving objects built on top of these records live in
//! [`model`](crate::model).

use serde::{Deserialize, Serialize};

/// A song (directory child with `isDir == false`).
///
/// Returned by `getMusicDirectory` (`directory.child`), `getAlbum`
/// (`album.song`), `getPlaylist` (`playlist.entry`) and `search2`
/// (`searchResult2.song`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SongInfo {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(deserialize_with = "de::opt_id")]
    pub parent: Option<String>,
    pub is_dir: bool,
    pub title: String,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub track: Option<u32>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    #[serde(deserialize_with = "de::opt_id")]
    pub cover_art: Option<String>,
    /// File size in bytes.
    pub size: Option<u64>,
    pub content_type: Option<String>,
    pub suffix: Option<String>,
    /// Duration in seconds.
    pub duration: Option<u64>,
    /// Bitrate in kbps.
    pub bit_rate: Option<u32>,
    pub path: Option<String>,
    pub is_video: bool,
    pub play_count: Option<u64>,
    pub disc_number: Option<u32>,
    pub created: Option<String>,
    #[serde(deserialize_with = "de::opt_id")]
    pub album_id: Option<String>,
    #[serde(deserialize_with = "de::opt_id")]
    pub artist_id: Option<String>,
    /// Media type reported by the server (`music`, `podcast`, ...).
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

/// An album.
///
/// `getAlbumList` and `getMusicDirectory` report albums as directories with
/// a `title`; `getAlbum` (ID3) reports a `name` instead. Both land in
/// [`title`](Self::title).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlbumInfo {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(deserialize_with = "de::opt_id")]
    pub parent: Option<String>,
    pub is_dir: bool,
    #[serde(alias = "name")]
    pub title: String,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    #[serde(deserialize_with = "de::opt_id")]
    pub cover_art: Option<String>,
    pub play_count: Option<u64>,
    pub created: Option<String>,
    pub song_count: Option<u32>,
    /// Total duration in seconds.
    pub duration: Option<u64>,
    #[serde(deserialize_with = "de::opt_id")]
    pub artist_id: Option<String>,
}

/// A playlist as listed by `getPlaylists` / returned by `getPlaylist`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaylistInfo {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    pub name: String,
    pub comment: Option<String>,
    pub owner: Option<String>,
    pub public: bool,
    pub song_count: u32,
    /// Total duration in seconds.
    pub duration: u64,
    pub created: Option<String>,
    pub changed: Option<String>,
    #[serde(deserialize_with = "de::opt_id")]
    pub cover_art: Option<String>,
}

/// An artist as reported by `search2`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtistInfo {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "de::opt_id")]
    pub cover_art: Option<String>,
    pub album_count: Option<u32>,
    pub starred: Option<String>,
}

/// Result of `ping`.
///
/// Built from the envelope itself (ping has no payload root). `type`,
/// `serverVersion` and `openSubsonic` are OpenSubsonic extensions and are
/// absent on classic servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ping {
    pub status: String,
    #[serde(default = "unknown")]
    pub version: String,
    #[serde(rename = "type", default = "unknown")]
    pub server_type: String,
    #[serde(default)]
    pub server_version: Option<String>,
    #[serde(default)]
    pub open_subsonic: bool,
}

impl Ping {
    /// The status reported when the server could not be reached.
    pub fn failed() -> Self {
        Self {
            status: "failed".into(),
            version: unknown(),
            server_type: unknown(),
            server_version: None,
            open_subsonic: false,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

fn unknown() -> String {
    "unknown".into()
}

/// A music folder (library root), from `getMusicFolders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicFolder {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Server license, from `getLicense`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct License {
    pub valid: bool,
    pub email: Option<String>,
    pub license_expires: Option<String>,
    pub trial_expires: Option<String>,
}

/// Optional filters and paging for `search2`.
///
/// Every `None` field is left out of the request and the server applies its
/// own default (20 results per section, offset 0).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchOptions {
    pub artist_count: Option<u32>,
    pub artist_offset: Option<u32>,
    pub album_count: Option<u32>,
    pub album_offset: Option<u32>,
    pub song_count: Option<u32>,
    pub song_offset: Option<u32>,
    pub music_folder_id: Option<String>,
}

/// Ordering of an album listing, mapped to the `getAlbumList` `type`
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlbumListType {
    Random,
    Newest,
    Highest,
    Frequent,
    Recent,
    AlphabeticalByName,
    AlphabeticalByArtist,
    Starred,
}

impl AlbumListType {
    /// Value sent as the `type` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Newest => "newest",
            Self::Highest => "highest",
            Self::Frequent => "frequent",
            Self::Recent => "recent",
            Self::AlphabeticalByName => "alphabeticalByName",
            Self::AlphabeticalByArtist => "alphabeticalByArtist",
            Self::Starred => "starred",
        }
    }
}

/// Lenient id deserializers: some servers send ids as JSON numbers.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Int(i64),
        Float(f64),
    }

    impl From<RawId> for String {
        fn from(raw: RawId) -> Self {
            match raw {
                RawId::Str(s) => s,
                RawId::Int(n) => n.to_string(),
                RawId::Float(f) => f.to_string(),
            }
        }
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        RawId::deserialize(d).map(String::from)
    }

    pub fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<RawId>::deserialize(d)?.map(String::from))
    }
}
