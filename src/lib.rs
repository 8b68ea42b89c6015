// SPDX-License-Identifier: MPL-2.0
//! Embeddable full-screen media viewer state for iced applications.
//!
//! The crate is headless: it owns the layout, zoom, gesture and paging
//! state of a photo-style lightbox while the host application owns the
//! widgets, the runtime and the media collection. The host implements
//! [`media::MediaSource`] over its collection, drives a
//! [`ui::PagerState`] from its update loop, and runs the
//! [`ui::PagerEffect`] values the pager hands back.

pub mod config;
pub mod error;
pub mod media;
pub mod ui;

#[cfg(test)]
mod test_utils;

pub use error::{Error, Result};
