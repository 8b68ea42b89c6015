// SPDX-License-Identifier: MPL-2.0
//! Viewer-side state: per-page layout and gestures, the paging
//! container, and the grid-to-viewer transition coordinator.

pub mod page;
pub mod pager;
pub mod transition;

pub use page::{PageController, PageDelegate};
pub use pager::{PagerEffect, PagerState};
pub use transition::{TransitionCoordinator, TransitionPhase};
