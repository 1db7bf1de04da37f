//! Facade tests against an in-process transport.
//!
//! The fake transport answers by action name and records every URL it is
//! asked for, so the tests can assert exactly which requests went out.

use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use subsonic_api::{
    ClientConfig, ErrorKind, Result, SearchOptions, SubsonicClient, SubsonicError, Transport,
};

// =============================================================================
// Fake transport
// =============================================================================

#[derive(Default)]
struct FakeServer {
    routes: HashMap<&'static str, Result<Bytes>>,
    requests: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl FakeServer {
    fn json(mut self, action: &'static str, payload: Value) -> Self {
        let mut envelope = json!({ "status": "ok", "version": "1.16.1" });
        if let (Value::Object(env), Value::Object(extra)) = (&mut envelope, payload) {
            env.extend(extra);
        }
        let body = json!({ "subsonic-response": envelope }).to_string();
        self.routes.insert(action, Ok(Bytes::from(body)));
        self
    }

    fn raw(mut self, action: &'static str, body: &'static [u8]) -> Self {
        self.routes.insert(action, Ok(Bytes::from_static(body)));
        self
    }

    fn error(mut self, action: &'static str, err: SubsonicError) -> Self {
        self.routes.insert(action, Err(err));
        self
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn hits(&self, action: &str) -> usize {
        let needle = format!("/rest/{action}.view?");
        self.requests
            .lock()
            .iter()
            .filter(|u| u.contains(&needle))
            .count()
    }

    fn last_url(&self, action: &str) -> String {
        let needle = format!("/rest/{action}.view?");
        self.requests
            .lock()
            .iter()
            .rev()
            .find(|u| u.contains(&needle))
            .cloned()
            .unwrap_or_default()
    }
}

impl Transport for FakeServer {
    fn get(&self, url: &str) -> Result<Bytes> {
        self.requests.lock().push(url.to_owned());
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        let action = url
            .split("/rest/")
            .nth(1)
            .and_then(|rest| rest.split(".view").next())
            .unwrap_or_default();
        self.routes
            .get(action)
            .cloned()
            .unwrap_or(Err(SubsonicError::Status(404)))
    }
}

fn client(server: FakeServer) -> (SubsonicClient, Arc<FakeServer>) {
    let server = Arc::new(server);
    let config = ClientConfig::new("http://music.local", "alice", "sesame");
    let client = SubsonicClient::with_transport(config, server.clone());
    (client, server)
}

fn library() -> FakeServer {
    FakeServer::default()
        .json(
            "getMusicFolders",
            json!({ "musicFolders": { "musicFolder": [
                { "id": 1, "name": "Music" },
                { "id": 2, "name": "Audiobooks" }
            ] } }),
        )
        .json(
            "getAlbumList",
            json!({ "albumList": { "album": [
                { "id": "al-1", "isDir": true, "title": "Arrival", "artist": "ABBA", "coverArt": "ca-1" },
                { "id": "al-2", "isDir": true, "title": "Arrival (Deluxe)", "artist": "ABBA", "coverArt": "ca-1" }
            ] } }),
        )
        .json(
            "getMusicDirectory",
            json!({ "directory": { "id": "al-1", "name": "Arrival", "child": [
                { "id": "so-1", "title": "When I Kissed the Teacher", "track": 1, "coverArt": "ca-1" },
                { "id": "so-2", "title": "Dancing Queen", "track": 2, "coverArt": "ca-1" }
            ] } }),
        )
        .raw("getCoverArt", b"\x89PNG fake image")
}

// =============================================================================
// Construction
// =============================================================================

mod construction {
    use super::*;

    #[test]
    fn no_request_on_construction() {
        let (_client, server) = client(FakeServer::default());
        assert!(server.requests.lock().is_empty());
    }

    #[test]
    fn auth_fragment_on_every_request() {
        let (client, server) = client(library());
        client.folders().unwrap();
        let url = server.last_url("getMusicFolders");
        let auth = client.auth();
        assert!(url.starts_with("http://music.local/rest/getMusicFolders.view?u=alice&t="));
        assert!(url.contains(&format!("&t={}&s={}", auth.token(), auth.salt().as_str())));
        assert!(url.contains("&c=subsonic-rs&v=1.15.0&f=json"));
        assert!(!url.contains("sesame"));
    }

    #[test]
    fn each_client_draws_its_own_salt() {
        let (a, _) = client(FakeServer::default());
        let (b, _) = client(FakeServer::default());
        assert_ne!(a.auth().salt(), b.auth().salt());
        assert_ne!(a.auth().token(), b.auth().token());
    }
}

// =============================================================================
// Ping
// =============================================================================

mod ping {
    use super::*;

    #[test]
    fn ok() {
        let (client, _) = client(
            FakeServer::default().json("ping", json!({ "type": "navidrome", "openSubsonic": true })),
        );
        let ping = client.ping();
        assert!(ping.is_ok());
        assert_eq!(ping.version, "1.16.1");
        assert_eq!(ping.server_type, "navidrome");
        assert!(ping.open_subsonic);
    }

    #[test]
    fn connection_failure_degrades() {
        let (client, _) = client(FakeServer::default().error("ping", SubsonicError::Timeout));
        let ping = client.ping();
        assert_eq!(ping.status, "failed");
        assert_eq!(ping.version, "unknown");
        assert_eq!(ping.server_type, "unknown");
    }

    #[test]
    fn bad_status_degrades() {
        let (client, _) = client(FakeServer::default().error("ping", SubsonicError::Status(503)));
        assert!(!client.ping().is_ok());
    }
}

// =============================================================================
// Albums and folders
// =============================================================================

mod albums {
    use super::*;

    #[test]
    fn folders_map_names_to_ids() {
        let (client, server) = client(library());
        let folders = client.folders().unwrap();
        assert_eq!(folders.get("Music").map(String::as_str), Some("1"));
        assert_eq!(folders.get("Audiobooks").map(String::as_str), Some("2"));
        client.folders().unwrap();
        assert_eq!(server.hits("getMusicFolders"), 1);
    }

    #[test]
    fn same_page_is_served_from_cache() {
        let (client, server) = client(library());
        let first = client.albums("Music", 0, 40).unwrap();
        let second = client.albums("Music", 0, 40).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(server.hits("getAlbumList"), 1);

        let url = server.last_url("getAlbumList");
        assert!(url.ends_with("&type=alphabeticalByName&size=40&offset=0&musicFolderId=1"));
    }

    #[test]
    fn next_page_is_a_new_request() {
        let (client, server) = client(library());
        client.albums("Music", 0, 40).unwrap();
        client.albums("Music", 1, 40).unwrap();
        assert_eq!(server.hits("getAlbumList"), 2);
        assert!(server.last_url("getAlbumList").contains("&offset=40&"));
    }

    #[test]
    fn unknown_folder_is_invalid_argument() {
        let (client, server) = client(library());
        let err = client.albums("NonexistentFolder", 0, 40).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("NonexistentFolder"));
        assert_eq!(server.hits("getAlbumList"), 0);
    }

    #[test]
    fn album_songs_resolve_once() {
        let (client, server) = client(library());
        let albums = client.albums("Music", 0, 40).unwrap();
        let album = &albums[0];
        assert_eq!(server.hits("getMusicDirectory"), 0);

        let songs = album.songs().unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[1].title, "Dancing Queen");
        album.songs().unwrap();
        assert_eq!(server.hits("getMusicDirectory"), 1);
        assert!(server.last_url("getMusicDirectory").ends_with("&id=al-1"));
    }

    #[test]
    fn lazy_failure_surfaces_on_access() {
        let server = library().error("getMusicDirectory", SubsonicError::Status(500));
        let (client, _) = client(server);
        let albums = client.albums("Music", 0, 40).unwrap();
        let err = albums[0].songs().unwrap_err();
        assert!(err.is_connection());
    }

    #[test]
    fn song_uri_makes_no_request() {
        let (client, server) = client(library());
        let albums = client.albums("Music", 0, 40).unwrap();
        let songs = albums[0].songs().unwrap();
        let before = server.requests.lock().len();
        let uri = songs[0].uri();
        assert_eq!(server.requests.lock().len(), before);
        assert!(uri.starts_with("http://music.local/rest/stream?id=so-1&u=alice&t="));
        assert_eq!(uri, client.stream_url("so-1"));
    }

    #[test]
    fn album_by_id_uses_embedded_songs() {
        let server = FakeServer::default().json(
            "getAlbum",
            json!({ "album": {
                "id": "al-7", "name": "Voulez-Vous", "songCount": 1,
                "song": [ { "id": "so-9", "title": "Chiquitita" } ]
            } }),
        );
        let (client, server) = client(server);
        let album = client.album("al-7").unwrap();
        assert_eq!(album.title, "Voulez-Vous");
        assert_eq!(album.songs().unwrap()[0].title, "Chiquitita");
        assert!(Arc::ptr_eq(&album, &client.album("al-7").unwrap()));
        assert_eq!(server.hits("getAlbum"), 1);
        assert_eq!(server.hits("getMusicDirectory"), 0);
    }

    #[test]
    fn missing_root_is_server_error() {
        let server = FakeServer::default().json("getAlbum", json!({}));
        let (client, _) = client(server);
        match client.album("al-1") {
            Err(SubsonicError::MissingKey(key)) => assert_eq!(key, "album"),
            other => panic!("expected MissingKey, got {other:?}"),
        }
    }
}

// =============================================================================
// Cover art
// =============================================================================

mod cover_art {
    use super::*;

    #[test]
    fn shared_art_id_is_fetched_once() {
        let (client, server) = client(library());
        let albums = client.albums("Music", 0, 40).unwrap();
        let a = albums[0].cover().unwrap().unwrap();
        let b = albums[1].cover().unwrap().unwrap();
        assert_eq!(a.bytes(), b.bytes());
        assert_eq!(&a.bytes()[..], b"\x89PNG fake image");
        assert_eq!(server.hits("getCoverArt"), 1);
        assert!(server.last_url("getCoverArt").ends_with("&id=ca-1&size=512"));

        // Songs carrying the same art id share the entry too.
        albums[0].songs().unwrap()[0].cover().unwrap();
        assert_eq!(server.hits("getCoverArt"), 1);
    }

    #[test]
    fn concurrent_first_fetch_is_coalesced() {
        let (client, server) = client(library().slow(Duration::from_millis(50)));
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| client.cover_art("ca-1").unwrap());
            }
        });
        assert_eq!(server.hits("getCoverArt"), 1);
    }

    #[test]
    fn missing_art_is_server_error() {
        let server = FakeServer::default().raw(
            "getCoverArt",
            br#"{"subsonic-response":{"status":"failed","error":{"code":70,"message":"Cover art not found"}}}"#,
        );
        let (client, _) = client(server);
        let err = client.cover_art("nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
    }
}

// =============================================================================
// Search
// =============================================================================

mod search {
    use super::*;

    fn server() -> FakeServer {
        FakeServer::default().json(
            "search2",
            json!({ "searchResult2": {
                "artist": [ { "id": "ar-1", "name": "ABBA" } ],
                "song": [ { "id": "so-2", "title": "Dancing Queen" } ]
            } }),
        )
    }

    #[test]
    fn missing_sections_are_empty() {
        let (client, _) = client(server());
        let results = client.search("abba", &SearchOptions::default()).unwrap();
        assert_eq!(results.artists.len(), 1);
        assert!(results.albums.is_empty());
        assert_eq!(results.songs[0].title, "Dancing Queen");
    }

    #[test]
    fn absent_options_are_not_sent() {
        let (client, server) = client(server());
        let options = SearchOptions {
            song_count: Some(5),
            ..SearchOptions::default()
        };
        client.search("dancing queen", &options).unwrap();
        let url = server.last_url("search2");
        assert!(url.ends_with("&query=dancing%20queen&songCount=5"));
        for absent in ["artistCount", "artistOffset", "albumCount", "albumOffset", "songOffset", "musicFolderId"] {
            assert!(!url.contains(absent), "{absent} leaked into {url}");
        }
    }

    #[test]
    fn identical_searches_are_cached() {
        let (client, server) = client(server());
        let a = client.search("abba", &SearchOptions::default()).unwrap();
        let b = client.search("abba", &SearchOptions::default()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let paged = SearchOptions {
            song_offset: Some(20),
            ..SearchOptions::default()
        };
        client.search("abba", &paged).unwrap();
        assert_eq!(server.hits("search2"), 2);
    }

    #[test]
    fn wrong_password_message_is_preserved() {
        let body = br#"{"subsonic-response":{"status":"failed","version":"1.16.1","error":{"code":40,"message":"Wrong username or password."}}}"#;
        let (client, _) = client(FakeServer::default().raw("search2", body));
        match client.search("abba", &SearchOptions::default()) {
            Err(SubsonicError::Api { code, message }) => {
                assert_eq!(code, 40);
                assert_eq!(message, "Wrong username or password.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}

// =============================================================================
// Playlists
// =============================================================================

mod playlists {
    use super::*;

    fn server() -> FakeServer {
        FakeServer::default()
            .json(
                "getPlaylists",
                json!({ "playlists": { "playlist": [
                    { "id": "pl-1", "name": "Road trip", "songCount": 1, "public": true },
                    { "id": "pl-2", "name": "Focus", "songCount": 0 }
                ] } }),
            )
            .json(
                "getPlaylist",
                json!({ "playlist": {
                    "id": "pl-1", "name": "Road trip",
                    "entry": [ { "id": "so-3", "title": "SOS" } ]
                } }),
            )
    }

    #[test]
    fn listed_once_per_client() {
        let (client, server) = client(server());
        assert_eq!(client.playlists().unwrap().len(), 2);
        client.playlists().unwrap();
        assert_eq!(server.hits("getPlaylists"), 1);
    }

    #[test]
    fn lookup_by_name() {
        let (client, _) = client(server());
        assert_eq!(client.playlist("Focus").unwrap().unwrap().id, "pl-2");
        assert!(client.playlist("Nope").unwrap().is_none());
    }

    #[test]
    fn songs_fetch_entries_once() {
        let (client, server) = client(server());
        let playlist = client.playlist("Road trip").unwrap().unwrap();
        assert_eq!(playlist.songs().unwrap()[0].title, "SOS");
        playlist.songs().unwrap();
        assert_eq!(server.hits("getPlaylist"), 1);
        assert!(server.last_url("getPlaylist").ends_with("&id=pl-1"));
    }

    #[test]
    fn by_id_is_cached_with_entries() {
        let (client, server) = client(server());
        let playlist = client.playlist_by_id("pl-1").unwrap();
        assert!(playlist.songs_resolved());
        assert!(Arc::ptr_eq(&playlist, &client.playlist_by_id("pl-1").unwrap()));
        assert_eq!(server.hits("getPlaylist"), 1);
    }
}

// =============================================================================
// License and cache invalidation
// =============================================================================

mod misc {
    use super::*;

    #[test]
    fn license_once_per_client() {
        let server = FakeServer::default().json(
            "getLicense",
            json!({ "license": { "valid": true, "email": "alice@example.com" } }),
        );
        let (client, server) = client(server);
        assert!(client.license().unwrap().valid);
        client.license().unwrap();
        assert_eq!(server.hits("getLicense"), 1);
    }

    #[test]
    fn clear_caches_refetches() {
        let (mut client, server) = client(library());
        client.albums("Music", 0, 40).unwrap();
        client.cover_art("ca-1").unwrap();
        client.clear_caches();
        client.albums("Music", 0, 40).unwrap();
        client.cover_art("ca-1").unwrap();
        assert_eq!(server.hits("getMusicFolders"), 2);
        assert_eq!(server.hits("getAlbumList"), 2);
        assert_eq!(server.hits("getCoverArt"), 2);
    }
}
