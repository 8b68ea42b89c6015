// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module is the single source of truth for the tunable constants
//! used across the crate, organized by category.
//!
//! # Categories
//!
//! - **Zoom**: zoom scale bounds and the double-tap target fraction
//! - **Transition**: fade duration bounds for image replacement
//! - **Gestures**: double-tap timing and position tolerance
//! - **Thumbnail Cache**: placeholder cache budget

// ==========================================================================
// Zoom Defaults
// ==========================================================================

/// Minimum zoom scale. 1.0 means the image exactly fits the viewport.
pub const MIN_ZOOM_SCALE: f32 = 1.0;

/// Default maximum zoom scale (8x the fitted size).
pub const DEFAULT_MAX_ZOOM_SCALE: f32 = 8.0;

/// Upper bound a host may configure for the maximum zoom scale.
pub const MAX_MAX_ZOOM_SCALE: f32 = 32.0;

/// Fraction of the image extent used for the double-tap zoom target when
/// the image and the viewport share the same orientation.
pub const DOUBLE_TAP_ZOOM_FRACTION: f32 = 2.0 / 3.0;

// ==========================================================================
// Transition Defaults
// ==========================================================================

/// Default cross-dissolve duration when replacing an image (milliseconds).
pub const DEFAULT_FADE_DURATION_MS: u64 = 200;

/// Minimum configurable fade duration.
pub const MIN_FADE_DURATION_MS: u64 = 0;

/// Maximum configurable fade duration.
pub const MAX_FADE_DURATION_MS: u64 = 2_000;

// ==========================================================================
// Gesture Defaults
// ==========================================================================

/// Window after a first tap during which a second tap counts as a
/// double tap (milliseconds). Single taps are withheld for this long.
pub const DEFAULT_DOUBLE_TAP_INTERVAL_MS: u64 = 250;

/// Minimum configurable double-tap interval.
pub const MIN_DOUBLE_TAP_INTERVAL_MS: u64 = 100;

/// Maximum configurable double-tap interval.
pub const MAX_DOUBLE_TAP_INTERVAL_MS: u64 = 600;

/// Maximum distance (logical pixels) between two taps that still form a
/// double tap.
pub const DOUBLE_TAP_SLOP: f32 = 32.0;

// ==========================================================================
// Thumbnail Cache Defaults
// ==========================================================================

/// Default thumbnail cache budget in bytes (8 MB).
pub const DEFAULT_THUMBNAIL_CACHE_BYTES: usize = 8 * 1024 * 1024;

/// Minimum thumbnail cache budget in bytes (1 MB).
pub const MIN_THUMBNAIL_CACHE_BYTES: usize = 1024 * 1024;

/// Maximum thumbnail cache budget in bytes (64 MB).
pub const MAX_THUMBNAIL_CACHE_BYTES: usize = 64 * 1024 * 1024;

/// Default maximum number of cached thumbnails.
pub const DEFAULT_THUMBNAIL_CACHE_ENTRIES: usize = 64;

// ==========================================================================
// Pager Defaults
// ==========================================================================

/// Number of neighbor pages on each side of the current one whose
/// controllers (and decoded full-resolution images) stay alive while
/// paging. Pages outside the window are rebuilt from the source on
/// return; their thumbnails stay in the bounded cache.
pub const PAGE_RETAIN_WINDOW: usize = 1;
