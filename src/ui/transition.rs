// SPDX-License-Identifier: MPL-2.0
//! Interactive grid-to-viewer transition coordination.
//!
//! The coordinator computes the start and end frames of the animated
//! handoff between a source view (typically a thumbnail grid cell) and
//! the full-screen page, interpolates between them while the gesture is
//! in flight, and drives the layout engine's teardown/restore hooks at
//! the phase boundaries so the page surface is free for the animator in
//! between.

use crate::ui::page::layout::{fit_size, PageLayout};
use iced::widget::image;
use iced::{Point, Rectangle, Size};

/// Phase of the animated handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Presenting,
    Dismissing,
}

/// Drives one present or dismiss animation at a time.
#[derive(Debug)]
pub struct TransitionCoordinator {
    phase: TransitionPhase,
    start: Rectangle,
    end: Rectangle,
    progress: f32,
    surface: Option<image::Handle>,
}

impl TransitionCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: TransitionPhase::Idle,
            start: Rectangle::with_size(Size::ZERO),
            end: Rectangle::with_size(Size::ZERO),
            progress: 0.0,
            surface: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Image the host draws on the moving surface, if any was supplied.
    #[must_use]
    pub fn surface_image(&self) -> Option<&image::Handle> {
        self.surface.as_ref()
    }

    /// Starts presenting: animates from the source cell frame to the
    /// aspect-fitted full-screen frame. Tears the page layout down so
    /// the animator owns the surface for the duration.
    ///
    /// A missing source frame degrades to animating in place from the
    /// destination frame (the host typically fades instead).
    pub fn begin_present(
        &mut self,
        layout: &mut PageLayout,
        source_frame: Option<Rectangle>,
        surface: Option<image::Handle>,
        viewport: Size,
        aspect: Option<f32>,
    ) {
        if self.phase != TransitionPhase::Idle {
            log::warn!("present requested while a transition is running; ignoring");
            return;
        }
        let destination = centered_fit_frame(aspect, viewport);
        self.start = source_frame.unwrap_or(destination);
        self.end = destination;
        self.progress = 0.0;
        self.surface = surface;
        layout.destroy_layout_configuration_before_transition();
        self.phase = TransitionPhase::Presenting;
    }

    /// Starts dismissing: animates from the full-screen frame back to
    /// the source cell frame (or in place when the cell is gone, e.g.
    /// scrolled away).
    pub fn begin_dismiss(
        &mut self,
        layout: &mut PageLayout,
        target_frame: Option<Rectangle>,
        surface: Option<image::Handle>,
        viewport: Size,
        aspect: Option<f32>,
    ) {
        if self.phase != TransitionPhase::Idle {
            log::warn!("dismiss requested while a transition is running; ignoring");
            return;
        }
        let full_screen = centered_fit_frame(aspect, viewport);
        self.start = full_screen;
        self.end = target_frame.unwrap_or(full_screen);
        self.progress = 0.0;
        self.surface = surface;
        layout.destroy_layout_configuration_before_transition();
        self.phase = TransitionPhase::Dismissing;
    }

    /// Advances the interactive progress, clamped to `0.0..=1.0`.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = progress.clamp(0.0, 1.0);
    }

    /// Frame of the moving surface at the given progress.
    #[must_use]
    pub fn frame_at(&self, progress: f32) -> Rectangle {
        let t = progress.clamp(0.0, 1.0);
        Rectangle::new(
            Point::new(
                lerp(self.start.x, self.end.x, t),
                lerp(self.start.y, self.end.y, t),
            ),
            Size::new(
                lerp(self.start.width, self.end.width, t),
                lerp(self.start.height, self.end.height, t),
            ),
        )
    }

    /// Frame at the current interactive progress.
    #[must_use]
    pub fn current_frame(&self) -> Rectangle {
        self.frame_at(self.progress)
    }

    /// Completes the animation and restores the page layout.
    pub fn finish(&mut self, layout: &mut PageLayout) {
        if self.phase == TransitionPhase::Idle {
            log::warn!("finish requested without a running transition; ignoring");
            return;
        }
        self.progress = 1.0;
        self.phase = TransitionPhase::Idle;
        self.surface = None;
        layout.restore_layout_configuration_after_transition();
    }

    /// Aborts the animation (interactive gesture cancelled) and restores
    /// the page layout in its pre-transition place.
    pub fn cancel(&mut self, layout: &mut PageLayout) {
        if self.phase == TransitionPhase::Idle {
            return;
        }
        self.progress = 0.0;
        self.phase = TransitionPhase::Idle;
        self.surface = None;
        layout.restore_layout_configuration_after_transition();
    }
}

impl Default for TransitionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Aspect-fitted frame centered in the viewport; the transition's
/// full-screen endpoint.
#[must_use]
pub(crate) fn centered_fit_frame(aspect: Option<f32>, viewport: Size) -> Rectangle {
    let size = fit_size(aspect, viewport);
    Rectangle::new(
        Point::new(
            (viewport.width - size.width) / 2.0,
            (viewport.height - size.height) / 2.0,
        ),
        size,
    )
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
