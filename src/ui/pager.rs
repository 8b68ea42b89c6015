// SPDX-License-Identifier: MPL-2.0
//! Paging container: arranges one-page controllers over the host's
//! collection, reconciles the page set when it changes, and hosts the
//! transition coordinator.
//!
//! The pager never performs side effects itself; asynchronous work
//! (image fetches, deletions) is returned as [`PagerEffect`] values for
//! the host to run on its own runtime, with results fed back in.

use crate::config::{ViewerConfig, PAGE_RETAIN_WINDOW};
use crate::media::loader::LoadOutcome;
use crate::media::source::known_aspect_ratio;
use crate::media::{
    ImageData, ImageTransition, LoadToken, MediaId, MediaPayload, MediaSource, OrderedDifference,
    ThumbnailCache,
};
use crate::ui::page::PageController;
use crate::ui::transition::TransitionCoordinator;
use futures_util::future::BoxFuture;
use iced::Size;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Side effect the host must run on the pager's behalf.
pub enum PagerEffect {
    /// Fully complete the deletion of this identifier, then call
    /// [`PagerState::finish_delete`]. The reload must strictly follow
    /// the completed deletion so the pager never references a
    /// just-deleted identifier.
    Delete(MediaId),
    /// Run the producer off the UI thread, then feed the result back
    /// through [`PagerState::resolve_load`].
    Load {
        token: LoadToken,
        producer: BoxFuture<'static, Option<ImageData>>,
    },
}

impl fmt::Debug for PagerEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete(id) => f.debug_tuple("Delete").field(id).finish(),
            Self::Load { token, .. } => f
                .debug_struct("Load")
                .field("token", token)
                .finish_non_exhaustive(),
        }
    }
}

/// The paging container.
pub struct PagerState {
    ids: Vec<MediaId>,
    controllers: HashMap<MediaId, PageController>,
    current: usize,
    viewport: Size,
    max_zoom: f32,
    double_tap_interval: Duration,
    fade_duration: Duration,
    thumbnails: ThumbnailCache,
    pending_delete: Option<MediaId>,
    transition: TransitionCoordinator,
}

impl PagerState {
    #[must_use]
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            ids: Vec::new(),
            controllers: HashMap::new(),
            current: 0,
            viewport: Size::ZERO,
            max_zoom: config.max_zoom(),
            double_tap_interval: config.double_tap_interval(),
            fade_duration: config.fade_duration(),
            thumbnails: ThumbnailCache::new(config.thumbnail_cache_budget()),
            pending_delete: None,
            transition: TransitionCoordinator::new(),
        }
    }

    // ======================================================================
    // Accessors
    // ======================================================================

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Current page index, if any pages exist.
    #[must_use]
    pub fn current_page(&self) -> Option<usize> {
        if self.ids.is_empty() {
            None
        } else {
            Some(self.current)
        }
    }

    /// Identifier of the current page.
    #[must_use]
    pub fn current_id(&self) -> Option<&MediaId> {
        self.ids.get(self.current)
    }

    #[must_use]
    pub fn current_controller(&self) -> Option<&PageController> {
        self.controllers.get(self.ids.get(self.current)?)
    }

    #[must_use]
    pub fn current_controller_mut(&mut self) -> Option<&mut PageController> {
        let id = self.ids.get(self.current)?.clone();
        self.controllers.get_mut(&id)
    }

    // ======================================================================
    // Lifecycle
    // ======================================================================

    /// Opens the viewer on `page` of the host collection.
    ///
    /// The page index clamps into range; with all aspect ratios known the
    /// first layout pass is final (no reflow when the image arrives).
    pub fn open(&mut self, source: &dyn MediaSource, page: usize) -> Vec<PagerEffect> {
        self.ids = snapshot(source);
        self.controllers.clear();
        self.current = page.min(self.ids.len().saturating_sub(1));
        self.ensure_current_controller(source)
    }

    /// Viewport bounds changed (rotation, window resize). Propagates to
    /// every live page so they reflow within the animation.
    pub fn set_viewport(&mut self, bounds: Size) {
        self.viewport = bounds;
        for controller in self.controllers.values_mut() {
            controller.viewport_resized(bounds);
        }
    }

    /// Moves to the next page, if any. The page left behind gets its
    /// zoom reset so returning to it never resumes a stale zoom level.
    pub fn advance(&mut self, source: &dyn MediaSource) -> Vec<PagerEffect> {
        if self.current + 1 >= self.ids.len() {
            return Vec::new();
        }
        self.leave_current();
        self.current += 1;
        self.prune_distant_controllers();
        self.ensure_current_controller(source)
    }

    /// Moves to the previous page, if any.
    pub fn retreat(&mut self, source: &dyn MediaSource) -> Vec<PagerEffect> {
        if self.current == 0 || self.ids.is_empty() {
            return Vec::new();
        }
        self.leave_current();
        self.current -= 1;
        self.prune_distant_controllers();
        self.ensure_current_controller(source)
    }

    /// Reconciles against the host's current identifier set.
    ///
    /// Identifiers that disappeared (e.g. deleted elsewhere) lose their
    /// controllers; the current page follows its identifier when it
    /// survives and clamps otherwise.
    pub fn reload(&mut self, source: &dyn MediaSource) -> Vec<PagerEffect> {
        let previous_current = self.current_id().cloned();
        let fresh = snapshot(source);

        let removed = self.ids.subtracting_hashed(&fresh);
        for id in &removed {
            self.controllers.remove(id);
        }

        self.ids = fresh;
        self.current = previous_current
            .and_then(|id| self.ids.iter().position(|other| *other == id))
            .unwrap_or_else(|| self.current.min(self.ids.len().saturating_sub(1)));

        self.prune_distant_controllers();
        self.ensure_current_controller(source)
    }

    // ======================================================================
    // Deletion
    // ======================================================================

    /// Asks the host to delete the current page's media.
    ///
    /// Returns `None` while another deletion is still pending or when no
    /// page is current.
    pub fn request_delete(&mut self) -> Option<PagerEffect> {
        if self.pending_delete.is_some() {
            log::warn!("delete requested while another deletion is pending; ignoring");
            return None;
        }
        let id = self.current_id()?.clone();
        self.pending_delete = Some(id.clone());
        Some(PagerEffect::Delete(id))
    }

    /// Called by the host after the deletion has fully completed.
    /// Reloads the page set; the deleted identifier never reappears.
    pub fn finish_delete(&mut self, source: &dyn MediaSource) -> Vec<PagerEffect> {
        let Some(deleted) = self.pending_delete.take() else {
            log::warn!("finish_delete without a pending deletion; reloading anyway");
            return self.reload(source);
        };
        self.controllers.remove(&deleted);
        let effects = self.reload(source);
        debug_assert!(
            !self.ids.contains(&deleted),
            "deleted identifier still present after reload"
        );
        effects
    }

    // ======================================================================
    // Loading
    // ======================================================================

    /// Feeds an asynchronous fetch result back to the page it targets.
    /// Stale results (page gone or surface retargeted) are dropped.
    pub fn resolve_load(&mut self, token: LoadToken, image: Option<ImageData>) -> bool {
        match self.controllers.get_mut(token.id()) {
            Some(controller) => controller.resolve_load(token, image),
            None => {
                log::warn!("fetch resolved for a page no longer present; dropping");
                false
            }
        }
    }

    // ======================================================================
    // Transition
    // ======================================================================

    /// Starts the interactive presentation from the current page's
    /// source view (grid cell).
    pub fn begin_present(&mut self, source: &dyn MediaSource) {
        let Some(id) = self.ids.get(self.current).cloned() else {
            return;
        };
        let frame = source.transition_source_frame(&id);
        let aspect = known_aspect_ratio(source.aspect_ratio(&id));
        let viewport = self.viewport;
        if let Some(controller) = self.controllers.get_mut(&id) {
            // The full resolution is usually still loading here, so the
            // grid cell's image drives the moving surface.
            let surface = source
                .transition_source_image(&id)
                .or_else(|| controller.layout().image().map(|image| image.handle.clone()));
            self.transition
                .begin_present(controller.layout_mut(), frame, surface, viewport, aspect);
        }
    }

    /// Starts the interactive dismissal back to the source view.
    pub fn begin_dismiss(&mut self, source: &dyn MediaSource) {
        let Some(id) = self.ids.get(self.current).cloned() else {
            return;
        };
        let frame = source.transition_source_frame(&id);
        let aspect = known_aspect_ratio(source.aspect_ratio(&id));
        let viewport = self.viewport;
        if let Some(controller) = self.controllers.get_mut(&id) {
            let surface = controller
                .layout()
                .image()
                .map(|image| image.handle.clone())
                .or_else(|| source.transition_source_image(&id));
            self.transition
                .begin_dismiss(controller.layout_mut(), frame, surface, viewport, aspect);
        }
    }

    /// Completes the running transition and restores the page layout.
    pub fn finish_transition(&mut self) {
        let Some(id) = self.ids.get(self.current).cloned() else {
            return;
        };
        if let Some(controller) = self.controllers.get_mut(&id) {
            self.transition.finish(controller.layout_mut());
        }
    }

    /// Cancels the running transition and restores the page layout.
    pub fn cancel_transition(&mut self) {
        let Some(id) = self.ids.get(self.current).cloned() else {
            return;
        };
        if let Some(controller) = self.controllers.get_mut(&id) {
            self.transition.cancel(controller.layout_mut());
        }
    }

    #[must_use]
    pub fn transition(&self) -> &TransitionCoordinator {
        &self.transition
    }

    // ======================================================================
    // Internals
    // ======================================================================

    fn leave_current(&mut self) {
        if let Some(controller) = self.current_controller_mut() {
            controller.will_disappear();
        }
    }

    /// Drops controllers outside the retain window around the current
    /// page, releasing their decoded full-resolution images. Without
    /// this, paging through an N-item gallery would pin N RGBA buffers
    /// for the pager's lifetime.
    fn prune_distant_controllers(&mut self) {
        let current = self.current;
        let ids = &self.ids;
        self.controllers.retain(|id, _| {
            ids.iter()
                .position(|other| other == id)
                .is_some_and(|page| page.abs_diff(current) <= PAGE_RETAIN_WINDOW)
        });
    }

    /// Builds (or revisits) the controller for the current page and
    /// kicks off its loads: cached or host-resolved thumbnail first as a
    /// placeholder, then the full-resolution media.
    fn ensure_current_controller(&mut self, source: &dyn MediaSource) -> Vec<PagerEffect> {
        let Some(id) = self.ids.get(self.current).cloned() else {
            return Vec::new();
        };
        let mut effects = Vec::new();

        if !self.controllers.contains_key(&id) {
            let mut controller =
                PageController::new(id.clone(), self.max_zoom, self.double_tap_interval);
            controller
                .layout_mut()
                .set_source_aspect(source.aspect_ratio(&id));
            controller.viewport_resized(self.viewport);

            // Placeholder: cache hit, or a host thumbnail resolved
            // synchronously. Deferred thumbnails are skipped; the full
            // resolution is already on its way.
            let mut placeholder_shown = false;
            if let Some(thumbnail) = self.thumbnails.get(&id) {
                controller.apply_image((*thumbnail).clone(), ImageTransition::None);
                placeholder_shown = true;
            } else if let Some(MediaPayload::Resolved(thumbnail)) =
                source.thumbnail(&id, self.viewport)
            {
                self.thumbnails.insert(id.clone(), thumbnail.clone());
                controller.apply_image(thumbnail, ImageTransition::None);
                placeholder_shown = true;
            }

            // The full resolution replacing a visible placeholder gets a
            // cross-dissolve unless the host already picked a transition.
            let payload = match source.media(&id) {
                Some(MediaPayload::Deferred {
                    producer,
                    transition: ImageTransition::None,
                }) if placeholder_shown => Some(MediaPayload::Deferred {
                    producer,
                    transition: ImageTransition::Fade(self.fade_duration),
                }),
                other => other,
            };

            match controller.begin_load(payload) {
                LoadOutcome::Applied { image, transition } => {
                    controller.apply_image(image, transition);
                }
                LoadOutcome::Fetch { token, producer } => {
                    effects.push(PagerEffect::Load { token, producer });
                }
                LoadOutcome::Empty => {}
            }

            self.controllers.insert(id, controller);
        }

        effects
    }
}

fn snapshot(source: &dyn MediaSource) -> Vec<MediaId> {
    (0..source.count())
        .filter_map(|page| source.identifier(page))
        .collect()
}
