// SPDX-License-Identifier: MPL-2.0
//! Per-page layout and zoom engine.
//!
//! Owns one page's scrollable image geometry: the aspect-fitted frame,
//! the centering insets, the zoom scale and scroll offset, and the
//! explicit layout state machine the transition coordinator drives
//! through its teardown/restore hooks.

use crate::config::{DOUBLE_TAP_ZOOM_FRACTION, MIN_ZOOM_SCALE};
use crate::media::source::known_aspect_ratio;
use crate::media::{ImageData, ImageTransition};
use iced::{Padding, Point, Rectangle, Size, Vector};

/// Layout lifecycle of a single page.
///
/// `NotYetLaidOut` is the only initial state and is left automatically
/// on the first layout pass. `DestroyedForTransition` is entered and
/// left explicitly by the transition coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    NotYetLaidOut,
    LaidOut,
    DestroyedForTransition,
}

impl LayoutState {
    /// Whether layout work may run in this state.
    #[must_use]
    pub fn permits_layout(self) -> bool {
        !matches!(self, Self::DestroyedForTransition)
    }

    /// Closed transition table. Illegal moves are rejected, never
    /// undefined.
    #[must_use]
    fn allows(self, to: Self) -> bool {
        use LayoutState::{DestroyedForTransition, LaidOut, NotYetLaidOut};
        matches!(
            (self, to),
            (NotYetLaidOut, LaidOut)
                | (LaidOut, LaidOut)
                | (LaidOut, DestroyedForTransition)
                // Teardown can arrive before the first layout pass.
                | (NotYetLaidOut, DestroyedForTransition)
                | (DestroyedForTransition, LaidOut)
                | (DestroyedForTransition, NotYetLaidOut)
        )
    }
}

/// Ephemeral constraint set derived from the current image size.
///
/// Replaced wholesale on every layout pass; the previous set must be
/// fully inactive before a new one activates.
#[derive(Debug, Clone)]
pub struct ImageConstraints {
    frame: Rectangle,
    active: bool,
}

impl ImageConstraints {
    fn new(frame: Rectangle) -> Self {
        Self {
            frame,
            active: false,
        }
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Fitted image frame this set pins, at zoom 1.0.
    #[must_use]
    pub fn frame(&self) -> Rectangle {
        self.frame
    }
}

/// Result of a double-tap, reported so the host can animate it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomEffect {
    /// Page was not in a zoomable state; nothing changed.
    None,
    /// Zoom returned to the minimum scale.
    ZoomedOut,
    /// Zoomed in around the derived target rectangle.
    ZoomedIn { target: Rectangle, scale: f32 },
}

/// One page's scroll/zoom geometry and layout state.
#[derive(Debug)]
pub struct PageLayout {
    state: LayoutState,
    viewport: Size,
    image: Option<ImageData>,
    source_aspect: Option<f32>,
    constraints: Option<ImageConstraints>,
    zoom_scale: f32,
    max_zoom: f32,
    insets: Padding,
    offset: Vector,
    detached: bool,
    pending_transition: Option<ImageTransition>,
}

impl PageLayout {
    #[must_use]
    pub fn new(max_zoom: f32) -> Self {
        Self {
            state: LayoutState::NotYetLaidOut,
            viewport: Size::ZERO,
            image: None,
            source_aspect: None,
            constraints: None,
            zoom_scale: MIN_ZOOM_SCALE,
            max_zoom: max_zoom.max(MIN_ZOOM_SCALE),
            insets: Padding::ZERO,
            offset: Vector::new(0.0, 0.0),
            detached: false,
            pending_transition: None,
        }
    }

    // ======================================================================
    // Accessors
    // ======================================================================

    #[must_use]
    pub fn state(&self) -> LayoutState {
        self.state
    }

    #[must_use]
    pub fn zoom_scale(&self) -> f32 {
        self.zoom_scale
    }

    #[must_use]
    pub fn insets(&self) -> Padding {
        self.insets
    }

    #[must_use]
    pub fn offset(&self) -> Vector {
        self.offset
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }

    /// Whether the image surface is detached for a transition animation.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    #[must_use]
    pub fn has_active_constraints(&self) -> bool {
        self.constraints.as_ref().is_some_and(ImageConstraints::is_active)
    }

    /// Aspect ratio driving the fit: the image's own when present,
    /// otherwise the host-reported one, otherwise unknown.
    #[must_use]
    pub fn effective_aspect(&self) -> Option<f32> {
        self.image
            .as_ref()
            .and_then(ImageData::aspect_ratio)
            .or(self.source_aspect)
    }

    /// Fitted image size at the minimum zoom scale. Falls back to the
    /// full viewport when the aspect ratio is unknown.
    #[must_use]
    pub fn fitted_size(&self) -> Size {
        fit_size(self.effective_aspect(), self.viewport)
    }

    /// Current content size: fitted size scaled by the zoom.
    #[must_use]
    pub fn content_size(&self) -> Size {
        let fitted = self.fitted_size();
        Size::new(fitted.width * self.zoom_scale, fitted.height * self.zoom_scale)
    }

    /// Content frame in viewport coordinates, accounting for insets and
    /// scroll offset.
    #[must_use]
    pub fn image_frame(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.insets.left - self.offset.x, self.insets.top - self.offset.y),
            self.content_size(),
        )
    }

    /// Takes the transition recorded by the last image replacement.
    /// Consumed once; subsequent calls return `None`.
    pub fn take_pending_transition(&mut self) -> Option<ImageTransition> {
        self.pending_transition.take()
    }

    // ======================================================================
    // Layout
    // ======================================================================

    /// Sets the host-reported aspect ratio used before the image arrives.
    /// Non-positive or non-finite values are treated as unknown.
    pub fn set_source_aspect(&mut self, ratio: Option<f32>) {
        self.source_aspect = known_aspect_ratio(ratio);
    }

    /// Updates the viewport bounds.
    ///
    /// Triggers the first automatic layout pass when the page has never
    /// been laid out, and a relayout on size changes afterwards. While
    /// destroyed for a transition only the bounds are recorded.
    pub fn set_viewport(&mut self, bounds: Size) {
        let changed = (bounds.width - self.viewport.width).abs() > f32::EPSILON
            || (bounds.height - self.viewport.height).abs() > f32::EPSILON;
        self.viewport = bounds;

        match self.state {
            LayoutState::NotYetLaidOut => {
                if viewport_usable(bounds) {
                    self.invalidate_layout();
                }
            }
            LayoutState::LaidOut => {
                if changed {
                    self.invalidate_layout();
                }
            }
            LayoutState::DestroyedForTransition => {}
        }
    }

    /// Tears down and rebuilds the image-size constraint set from the
    /// current image and viewport, then recomputes centering insets.
    ///
    /// No-op while the layout is destroyed for a transition, and while
    /// the viewport is still unknown.
    pub fn invalidate_layout(&mut self) {
        if !self.state.permits_layout() {
            log::trace!("layout request ignored while destroyed for transition");
            return;
        }
        if !viewport_usable(self.viewport) {
            return;
        }

        if let Some(set) = self.constraints.as_mut() {
            set.deactivate();
        }
        let frame = Rectangle::new(Point::ORIGIN, self.fitted_size());
        self.activate_constraints(ImageConstraints::new(frame));

        self.transition_state(LayoutState::LaidOut);
        self.zoom_scale = self.zoom_scale.clamp(MIN_ZOOM_SCALE, self.max_zoom);
        self.clamp_offset();
        self.update_insets();
    }

    /// Replaces the displayed image.
    ///
    /// The transition is recorded for the host to run (consumed once via
    /// [`take_pending_transition`](Self::take_pending_transition)).
    /// Relayout happens only when the page is currently laid out; before
    /// the first layout pass it is deferred, and while destroyed for a
    /// transition it is suppressed until restoration.
    pub fn set_image(&mut self, image: ImageData, transition: ImageTransition) {
        self.image = Some(image);
        self.pending_transition = Some(transition);

        match self.state {
            LayoutState::LaidOut => self.invalidate_layout(),
            LayoutState::NotYetLaidOut | LayoutState::DestroyedForTransition => {}
        }
    }

    // ======================================================================
    // Zoom
    // ======================================================================

    /// Double-tap zoom toggle.
    ///
    /// At minimum scale, zooms into a rectangle derived from the tap
    /// point (in fitted-image coordinates); otherwise zooms back out.
    /// The target rectangle is oriented along the image's dominant axis:
    /// a portrait viewport gets a zero-width rectangle centered at the
    /// tap vertically, spanning the full fitted height for a landscape
    /// image and two thirds of it otherwise; a non-portrait viewport
    /// gets the width-based mirror of that rule.
    pub fn update_zoom_on_double_tap(&mut self, at: Point) -> ZoomEffect {
        if self.state != LayoutState::LaidOut {
            return ZoomEffect::None;
        }

        if self.zoom_scale > MIN_ZOOM_SCALE {
            self.reset_zoom();
            return ZoomEffect::ZoomedOut;
        }

        let fitted = self.fitted_size();
        let aspect = self.effective_aspect();
        let portrait_viewport = self.viewport.height > self.viewport.width;

        let target = if portrait_viewport {
            let landscape_image = aspect.is_some_and(|a| a > 1.0);
            let height = if landscape_image {
                fitted.height
            } else {
                fitted.height * DOUBLE_TAP_ZOOM_FRACTION
            };
            Rectangle::new(
                Point::new(at.x, at.y - height / 2.0),
                Size::new(0.0, height),
            )
        } else {
            let portrait_image = aspect.is_some_and(|a| a < 1.0);
            let width = if portrait_image {
                fitted.width
            } else {
                fitted.width * DOUBLE_TAP_ZOOM_FRACTION
            };
            Rectangle::new(
                Point::new(at.x - width / 2.0, at.y),
                Size::new(width, 0.0),
            )
        };

        let scale = self.zoom_to_rect(target);
        ZoomEffect::ZoomedIn { target, scale }
    }

    /// Returns the zoom to the minimum scale and recenters the content.
    pub fn reset_zoom(&mut self) {
        self.zoom_scale = MIN_ZOOM_SCALE;
        self.offset = Vector::new(0.0, 0.0);
        self.update_insets();
    }

    /// Zooms so `rect` (in fitted-image coordinates) fills the viewport,
    /// clamped to the configured scale range. Axes with zero extent do
    /// not constrain the scale. Returns the applied scale.
    fn zoom_to_rect(&mut self, rect: Rectangle) -> f32 {
        let mut scale = self.max_zoom;
        if rect.width > f32::EPSILON {
            scale = scale.min(self.viewport.width / rect.width);
        }
        if rect.height > f32::EPSILON {
            scale = scale.min(self.viewport.height / rect.height);
        }
        self.zoom_scale = scale.clamp(MIN_ZOOM_SCALE, self.max_zoom);

        let center_x = (rect.x + rect.width / 2.0) * self.zoom_scale;
        let center_y = (rect.y + rect.height / 2.0) * self.zoom_scale;
        self.offset = Vector::new(
            center_x - self.viewport.width / 2.0,
            center_y - self.viewport.height / 2.0,
        );
        self.clamp_offset();
        self.update_insets();
        self.zoom_scale
    }

    // ======================================================================
    // Transition hooks
    // ======================================================================

    /// Teardown half of the transition pair: deactivates the constraint
    /// set and detaches the image surface so the transition animator can
    /// freely reparent and transform it.
    pub fn destroy_layout_configuration_before_transition(&mut self) {
        if self.state == LayoutState::DestroyedForTransition {
            log::warn!("layout already destroyed for transition; ignoring repeated teardown");
            return;
        }
        if let Some(mut set) = self.constraints.take() {
            set.deactivate();
        }
        self.detached = true;
        self.transition_state(LayoutState::DestroyedForTransition);
    }

    /// Restore half of the transition pair: reattaches the surface and
    /// rebuilds layout from scratch. Calling it without a prior teardown
    /// is a warned no-op.
    pub fn restore_layout_configuration_after_transition(&mut self) {
        if self.state != LayoutState::DestroyedForTransition {
            log::warn!("restore requested without a prior teardown; ignoring");
            return;
        }
        self.detached = false;
        if viewport_usable(self.viewport) {
            self.transition_state(LayoutState::LaidOut);
            self.invalidate_layout();
        } else {
            // Never laid out before the teardown; wait for real bounds.
            self.transition_state(LayoutState::NotYetLaidOut);
        }
    }

    // ======================================================================
    // Internals
    // ======================================================================

    fn transition_state(&mut self, to: LayoutState) {
        if self.state == to {
            return;
        }
        if !self.state.allows(to) {
            log::warn!("illegal layout transition {:?} -> {:?} ignored", self.state, to);
            return;
        }
        log::trace!("layout state {:?} -> {:?}", self.state, to);
        self.state = to;
    }

    fn activate_constraints(&mut self, mut set: ImageConstraints) {
        let previous = self.constraints.take();
        debug_assert!(
            previous.as_ref().is_none_or(|p| !p.is_active()),
            "image constraints leaked across relayout"
        );
        set.activate();
        self.constraints = Some(set);
    }

    /// Centering insets: `max((viewport - content) / 2, 0)` per axis, so
    /// undersized content stays centered and oversized content gets no
    /// artificial margin.
    fn update_insets(&mut self) {
        let content = self.content_size();
        let horizontal = ((self.viewport.width - content.width) / 2.0).max(0.0);
        let vertical = ((self.viewport.height - content.height) / 2.0).max(0.0);
        self.insets = Padding {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        };
    }

    fn clamp_offset(&mut self) {
        let content = self.content_size();
        let max_x = (content.width - self.viewport.width).max(0.0);
        let max_y = (content.height - self.viewport.height).max(0.0);
        self.offset = Vector::new(
            self.offset.x.clamp(0.0, max_x),
            self.offset.y.clamp(0.0, max_y),
        );
    }
}

fn viewport_usable(bounds: Size) -> bool {
    bounds.width > 0.0 && bounds.height > 0.0
}

/// Aspect-fits `aspect` (width / height) inside `bounds`. Unknown aspect
/// falls back to the full bounds.
#[must_use]
pub(crate) fn fit_size(aspect: Option<f32>, bounds: Size) -> Size {
    let Some(aspect) = aspect else {
        return bounds;
    };
    if !viewport_usable(bounds) {
        return bounds;
    }
    if bounds.width / bounds.height > aspect {
        Size::new(bounds.height * aspect, bounds.height)
    } else {
        Size::new(bounds.width, bounds.width / aspect)
    }
}
