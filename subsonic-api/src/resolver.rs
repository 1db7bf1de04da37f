//! The capability every domain object carries back into its session.
//!
//! An [`Album`](crate::model::Album) fetched from the server must later be
//! able to list its own songs; a [`Song`](crate::model::Song) must be able to
//! produce its stream URL. Rather than each object holding the HTTP client,
//! credentials and caches, it holds an `Arc<dyn Resolver>`.
//!
//! [`Session`] is the production implementation: a [`Dispatcher`] plus the
//! client's [`Caches`]. Tests substitute their own resolvers.

use crate::cache::{Caches, cached};
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::model::CoverArt;
use crate::query::{Action, Query};
use serde_json::Value;

/// Target edge length (pixels) requested from `getCoverArt`.
pub const COVER_ART_SIZE: u32 = 512;

/// Deferred-resolution capability injected into domain objects.
pub trait Resolver: Send + Sync {
    /// Perform `query` and return its unwrapped payload.
    fn fetch(&self, query: &Query) -> Result<Value>;

    /// Playable URL for the song with `id`. Must not perform I/O.
    fn stream_url(&self, id: &str) -> String;

    /// Cover art for a server-assigned coverArt id.
    fn cover_art(&self, id: &str) -> Result<CoverArt>;
}

/// Shared state behind one client: how to reach the server, and what has
/// already been fetched from it.
pub struct Session {
    dispatcher: Dispatcher,
    caches: Caches,
}

impl Session {
    pub fn new(dispatcher: Dispatcher, caches: Caches) -> Self {
        Self { dispatcher, caches }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn caches(&self) -> &Caches {
        &self.caches
    }
}

impl Resolver for Session {
    fn fetch(&self, query: &Query) -> Result<Value> {
        self.dispatcher.query(query)
    }

    fn stream_url(&self, id: &str) -> String {
        self.dispatcher.stream_url(id)
    }

    fn cover_art(&self, id: &str) -> Result<CoverArt> {
        cached(&self.caches.cover_art, id.to_owned(), || {
            let query = Query::new(Action::GetCoverArt)
                .param("id", id)
                .param("size", COVER_ART_SIZE);
            let data = self.dispatcher.query_raw(&query)?;
            Ok(CoverArt::new(id, data))
        })
    }
}
