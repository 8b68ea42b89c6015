// SPDX-License-Identifier: MPL-2.0
//! Per-page controller: hosts the layout engine, owns gesture
//! recognition, and forwards semantic events to a delegate instead of
//! handling navigation itself.

pub mod gestures;
pub mod layout;

use crate::media::{ImageData, ImageTransition, MediaId, MediaPayload, SurfaceLoader};
use crate::media::loader::LoadOutcome;
use gestures::{Tap, TapRecognizer};
use iced::{Point, Size};
use layout::{PageLayout, ZoomEffect};
use std::time::{Duration, Instant};

/// Capability interface a host implements to observe page gestures.
///
/// On a double tap the notification always precedes the zoom update, so
/// the delegate can react to the gesture itself before the scale
/// changes.
pub trait PageDelegate {
    /// Page body was tapped once (hosts typically toggle chrome).
    fn on_tap(&mut self, id: &MediaId);

    /// Page was double-tapped at an image-relative location.
    fn on_double_tap(&mut self, id: &MediaId, at: Point);
}

/// One page of the viewer: identifier, layout engine, tap recognizer
/// and the loader bridging host payloads onto the image surface.
pub struct PageController {
    id: MediaId,
    layout: PageLayout,
    recognizer: TapRecognizer,
    loader: SurfaceLoader,
}

impl PageController {
    #[must_use]
    pub fn new(id: MediaId, max_zoom: f32, double_tap_interval: Duration) -> Self {
        Self {
            id,
            layout: PageLayout::new(max_zoom),
            recognizer: TapRecognizer::new(double_tap_interval),
            loader: SurfaceLoader::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &MediaId {
        &self.id
    }

    #[must_use]
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    #[must_use]
    pub fn layout_mut(&mut self) -> &mut PageLayout {
        &mut self.layout
    }

    /// Classifies a host payload for this page's surface; deferred
    /// payloads come back as a fetch for the host to run.
    pub fn begin_load(&mut self, payload: Option<MediaPayload>) -> LoadOutcome {
        self.loader.begin(self.id.clone(), payload)
    }

    /// Applies an asynchronous fetch result, dropping it when stale.
    pub fn resolve_load(
        &mut self,
        token: crate::media::LoadToken,
        image: Option<ImageData>,
    ) -> bool {
        match self.loader.resolve(token, image) {
            Some((image, transition)) => {
                self.layout.set_image(image, transition);
                true
            }
            None => false,
        }
    }

    /// Applies an already resolved image with the given transition.
    pub fn apply_image(&mut self, image: ImageData, transition: ImageTransition) {
        self.layout.set_image(image, transition);
    }

    /// Feeds a raw tap. Single taps notify the delegate; double taps
    /// notify the delegate first, then run the zoom update.
    pub fn handle_tap(
        &mut self,
        at: Point,
        now: Instant,
        delegate: &mut dyn PageDelegate,
    ) -> ZoomEffect {
        match self.recognizer.touch(at, now) {
            Some(Tap::Single(_)) => {
                delegate.on_tap(&self.id);
                ZoomEffect::None
            }
            Some(Tap::Double(point)) => {
                delegate.on_double_tap(&self.id, point);
                self.layout.update_zoom_on_double_tap(point)
            }
            None => ZoomEffect::None,
        }
    }

    /// Releases a withheld single tap whose double-tap window expired.
    pub fn poll_taps(&mut self, now: Instant, delegate: &mut dyn PageDelegate) {
        if let Some(Tap::Single(_)) = self.recognizer.flush(now) {
            delegate.on_tap(&self.id);
        }
    }

    /// Rotation or size-class change: re-invalidate layout so the image
    /// reflows with the animation instead of snapping afterwards.
    pub fn viewport_resized(&mut self, bounds: Size) {
        self.layout.set_viewport(bounds);
    }

    /// Page is leaving the screen: reset zoom unconditionally so a later
    /// return never resumes a stale zoom level.
    pub fn will_disappear(&mut self) {
        self.recognizer.cancel();
        self.layout.reset_zoom();
    }
}
