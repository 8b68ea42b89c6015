// SPDX-License-Identifier: MPL-2.0
//! The data-source contract the viewer consumes from its host.
//!
//! All media retrieval is delegated through [`MediaSource`]; the core
//! never touches the filesystem or the network itself. Identifiers are
//! exchanged as type-erased [`MediaId`] values, so a host can key its
//! collection by whatever it likes (asset ids, paths, database rows).

use crate::media::{ImageData, MediaId};
use futures_util::future::BoxFuture;
use iced::widget::image;
use iced::{Rectangle, Size};
use std::fmt;
use std::time::Duration;

/// How a newly available image replaces the one currently displayed.
///
/// Pure description, consumed once per replacement; it carries no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTransition {
    /// Replace immediately.
    None,
    /// Cross-dissolve over the given duration.
    Fade(Duration),
}

/// A media item as handed over by the host: either already decoded, or
/// a producer of an eventual image plus the transition to apply when it
/// arrives.
pub enum MediaPayload {
    Resolved(ImageData),
    Deferred {
        producer: BoxFuture<'static, Option<ImageData>>,
        transition: ImageTransition,
    },
}

impl MediaPayload {
    /// Convenience constructor for an already decoded image.
    #[must_use]
    pub fn resolved(image: ImageData) -> Self {
        Self::Resolved(image)
    }

    /// Convenience constructor for an asynchronous producer.
    #[must_use]
    pub fn deferred(
        producer: BoxFuture<'static, Option<ImageData>>,
        transition: ImageTransition,
    ) -> Self {
        Self::Deferred {
            producer,
            transition,
        }
    }
}

impl fmt::Debug for MediaPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(image) => f
                .debug_tuple("Resolved")
                .field(&(image.width, image.height))
                .finish(),
            Self::Deferred { transition, .. } => f
                .debug_struct("Deferred")
                .field("transition", transition)
                .finish_non_exhaustive(),
        }
    }
}

/// Host-supplied collection of pages.
///
/// Pages are addressed both positionally (`identifier(page)`) and by
/// identifier (`page(id)`); the two must stay consistent within one
/// snapshot of the collection. All methods run on the UI thread and must
/// not block; slow work belongs inside deferred payload producers.
pub trait MediaSource {
    /// Number of pages currently visible.
    fn count(&self) -> usize;

    /// Identifier of the page at `page`, or `None` when out of range.
    fn identifier(&self, page: usize) -> Option<MediaId>;

    /// Position of `id` in the collection, or `None` when absent.
    fn page(&self, id: &MediaId) -> Option<usize>;

    /// Full-resolution media for `id`. `None` leaves the surface empty.
    fn media(&self, id: &MediaId) -> Option<MediaPayload>;

    /// Aspect ratio (width / height) of the media behind `id`.
    ///
    /// `None` or a non-positive value means "unknown"; the layout engine
    /// then falls back to viewport-derived geometry.
    fn aspect_ratio(&self, id: &MediaId) -> Option<f32> {
        let _ = id;
        None
    }

    /// Low-resolution placeholder filling `size`, shown while the full
    /// resolution loads.
    fn thumbnail(&self, id: &MediaId, filling: Size) -> Option<MediaPayload> {
        let _ = (id, filling);
        None
    }

    /// Frame of the grid cell (or other source view) the interactive
    /// transition starts from, in window coordinates.
    fn transition_source_frame(&self, id: &MediaId) -> Option<Rectangle> {
        let _ = id;
        None
    }

    /// Image shown by the transition's moving surface.
    fn transition_source_image(&self, id: &MediaId) -> Option<image::Handle> {
        let _ = id;
        None
    }
}

/// Sanitizes a host-reported aspect ratio: non-positive or non-finite
/// values are treated as unknown.
#[must_use]
pub(crate) fn known_aspect_ratio(ratio: Option<f32>) -> Option<f32> {
    ratio.filter(|r| r.is_finite() && *r > 0.0)
}
