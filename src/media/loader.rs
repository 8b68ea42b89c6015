// SPDX-License-Identifier: MPL-2.0
//! Bridges host media payloads onto a concrete image surface.
//!
//! Resolved payloads apply synchronously; deferred payloads hand the
//! host a future to run off the UI thread plus a [`LoadToken`] that ties
//! the eventual result to the surface state at issue time. If the
//! surface is retargeted before the fetch lands, the stale result is
//! discarded on arrival, so a late fetch can never overwrite a newer,
//! already applied image.

use crate::config::DEFAULT_THUMBNAIL_CACHE_ENTRIES;
use crate::media::{ImageData, ImageTransition, MediaId, MediaPayload};
use futures_util::future::BoxFuture;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Ties an in-flight fetch to the surface generation it was issued for.
#[derive(Debug)]
pub struct LoadToken {
    id: MediaId,
    generation: u64,
    transition: ImageTransition,
}

impl LoadToken {
    /// Identifier the fetch was issued for.
    #[must_use]
    pub fn id(&self) -> &MediaId {
        &self.id
    }
}

/// What `begin` decided about a payload.
pub enum LoadOutcome {
    /// The payload was already resolved; display it with this transition.
    Applied {
        image: ImageData,
        transition: ImageTransition,
    },
    /// Run `producer` off the UI thread, then feed the result back
    /// through [`SurfaceLoader::resolve`] with the token.
    Fetch {
        token: LoadToken,
        producer: BoxFuture<'static, Option<ImageData>>,
    },
    /// Nothing to show; the surface stays empty.
    Empty,
}

/// Per-surface loader state: which identifier the surface currently
/// targets, and a generation counter bumped on every retarget.
#[derive(Debug, Default)]
pub struct SurfaceLoader {
    current: Option<MediaId>,
    generation: u64,
}

impl SurfaceLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier the surface currently targets.
    #[must_use]
    pub fn current(&self) -> Option<&MediaId> {
        self.current.as_ref()
    }

    /// Retargets the surface to `id` and classifies `payload`.
    ///
    /// Bumping the generation here is what invalidates every token
    /// issued for the previous target.
    pub fn begin(&mut self, id: MediaId, payload: Option<MediaPayload>) -> LoadOutcome {
        self.generation += 1;
        self.current = Some(id.clone());

        match payload {
            None => LoadOutcome::Empty,
            Some(MediaPayload::Resolved(image)) => LoadOutcome::Applied {
                image,
                transition: ImageTransition::None,
            },
            Some(MediaPayload::Deferred {
                producer,
                transition,
            }) => LoadOutcome::Fetch {
                token: LoadToken {
                    id,
                    generation: self.generation,
                    transition,
                },
                producer,
            },
        }
    }

    /// Gate for an asynchronous result arriving back on the UI thread.
    ///
    /// Returns the image and its transition when the token still matches
    /// the surface; stale tokens (surface retargeted since issue) and
    /// failed fetches yield `None`. Consuming the token by value keeps
    /// each result applicable at most once.
    pub fn resolve(
        &self,
        token: LoadToken,
        image: Option<ImageData>,
    ) -> Option<(ImageData, ImageTransition)> {
        if token.generation != self.generation || self.current.as_ref() != Some(&token.id) {
            log::warn!(
                "discarding stale image fetch for {:?} (surface moved on)",
                token.id
            );
            return None;
        }
        image.map(|image| (image, token.transition))
    }
}

/// Runs a deferred producer on the tokio runtime, yielding the token and
/// result as a pair ready for [`SurfaceLoader::resolve`].
///
/// Hosts embedding the viewer in an iced application will usually run
/// the producer through a `Task` instead; this helper covers everyone
/// else.
pub fn spawn_fetch(
    token: LoadToken,
    producer: BoxFuture<'static, Option<ImageData>>,
) -> tokio::task::JoinHandle<(LoadToken, Option<ImageData>)> {
    tokio::spawn(async move {
        let image = producer.await;
        (token, image)
    })
}

/// Byte- and entry-bounded LRU cache for thumbnail placeholders.
pub struct ThumbnailCache {
    entries: LruCache<MediaId, Arc<ImageData>>,
    total_bytes: usize,
    max_bytes: usize,
}

impl ThumbnailCache {
    /// Creates a cache bounded by `max_bytes` and the default entry cap.
    ///
    /// # Panics
    ///
    /// Never panics; the entry cap constant is non-zero.
    #[must_use]
    pub fn new(max_bytes: usize) -> Self {
        let cap = NonZeroUsize::new(DEFAULT_THUMBNAIL_CACHE_ENTRIES)
            .expect("entry cap constant is non-zero");
        Self {
            entries: LruCache::new(cap),
            total_bytes: 0,
            max_bytes,
        }
    }

    /// Returns the cached thumbnail for `id`, refreshing its recency.
    pub fn get(&mut self, id: &MediaId) -> Option<Arc<ImageData>> {
        self.entries.get(id).cloned()
    }

    /// Inserts a thumbnail, evicting least-recently-used entries until
    /// the byte budget holds. Oversized single entries are not cached.
    pub fn insert(&mut self, id: MediaId, image: ImageData) {
        let size = image.byte_size();
        if size > self.max_bytes {
            return;
        }
        if let Some(previous) = self.entries.pop(&id) {
            self.total_bytes -= previous.byte_size();
        }
        while self.total_bytes + size > self.max_bytes {
            match self.entries.pop_lru() {
                Some((_, evicted)) => self.total_bytes -= evicted.byte_size(),
                None => break,
            }
        }
        self.total_bytes += size;
        // push also reports an eviction forced by the entry cap, which
        // the byte ledger must account for.
        if let Some((_, evicted)) = self.entries.push(id, Arc::new(image)) {
            self.total_bytes -= evicted.byte_size();
        }
    }

    /// Number of cached thumbnails.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current payload bytes held.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }
}
