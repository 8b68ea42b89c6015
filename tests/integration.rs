// SPDX-License-Identifier: MPL-2.0
//! End-to-end scenarios driving the pager over an in-memory host
//! collection, plus the config round trip.

use futures_util::FutureExt;
use iced::{Point, Size};
use iced_lightbox::config::{self, ViewerConfig};
use iced_lightbox::media::{
    ImageData, ImageTransition, MediaId, MediaPayload, MediaSource, OrderedDifference,
};
use iced_lightbox::ui::page::layout::LayoutState;
use iced_lightbox::ui::{PagerEffect, PagerState};
use std::cell::RefCell;
use tempfile::tempdir;

/// Host collection backed by a plain vector of numeric identifiers.
/// Media resolves asynchronously; aspect ratios are known up front.
struct Gallery {
    items: RefCell<Vec<u64>>,
}

impl Gallery {
    fn new(count: u64) -> Self {
        Self {
            items: RefCell::new((0..count).collect()),
        }
    }

    fn delete(&self, value: u64) {
        self.items.borrow_mut().retain(|item| *item != value);
    }
}

impl MediaSource for Gallery {
    fn count(&self) -> usize {
        self.items.borrow().len()
    }

    fn identifier(&self, page: usize) -> Option<MediaId> {
        self.items.borrow().get(page).copied().map(MediaId::new)
    }

    fn page(&self, id: &MediaId) -> Option<usize> {
        let value = *id.value::<u64>();
        self.items.borrow().iter().position(|item| *item == value)
    }

    fn media(&self, _id: &MediaId) -> Option<MediaPayload> {
        Some(MediaPayload::deferred(
            async { Some(ImageData::from_rgba(4, 2, vec![0_u8; 4 * 2 * 4])) }.boxed(),
            ImageTransition::None,
        ))
    }

    fn aspect_ratio(&self, _id: &MediaId) -> Option<f32> {
        Some(2.0)
    }
}

fn open_pager(gallery: &Gallery, page: usize) -> (PagerState, Vec<PagerEffect>) {
    let mut pager = PagerState::new(&ViewerConfig::default());
    pager.set_viewport(Size::new(400.0, 300.0));
    let effects = pager.open(gallery, page);
    (pager, effects)
}

#[test]
fn opening_mid_collection_lays_out_once() {
    let gallery = Gallery::new(10);
    let (mut pager, mut effects) = open_pager(&gallery, 3);

    assert_eq!(pager.current_page(), Some(3));
    let layout_before = {
        let layout = pager.current_controller().expect("controller").layout();
        assert_eq!(layout.state(), LayoutState::LaidOut);
        (layout.fitted_size(), layout.insets())
    };

    // The known aspect ratio made the first pass final: the image
    // arriving later must not move anything.
    assert_eq!(effects.len(), 1);
    let PagerEffect::Load { token, producer } = effects.remove(0) else {
        panic!("expected a load effect");
    };
    let image = producer.now_or_never().flatten().expect("image");
    assert!(pager.resolve_load(token, Some(image)));

    let layout = pager.current_controller().expect("controller").layout();
    assert_eq!(layout.fitted_size(), layout_before.0);
    assert_eq!(layout.insets(), layout_before.1);
    assert!(layout.image().is_some());
}

#[test]
fn delete_reloads_without_the_deleted_page() {
    let gallery = Gallery::new(5);
    let (mut pager, _) = open_pager(&gallery, 2);

    let Some(PagerEffect::Delete(id)) = pager.request_delete() else {
        panic!("expected a delete effect");
    };
    assert_eq!(id, MediaId::new(2_u64));

    // Host completes the deletion fully before handing control back.
    gallery.delete(2);
    pager.finish_delete(&gallery);

    assert_eq!(pager.page_count(), 4);
    for page in 0..pager.page_count() {
        assert_ne!(gallery.identifier(page).expect("id"), id);
    }
}

#[test]
fn fetch_for_a_removed_page_is_discarded() {
    let gallery = Gallery::new(2);
    let (mut pager, mut effects) = open_pager(&gallery, 0);

    let PagerEffect::Load { token, producer } = effects.remove(0) else {
        panic!("expected a load effect");
    };
    let image = producer.now_or_never().flatten().expect("image");

    // Page 0 disappears while its fetch is still in flight.
    gallery.delete(0);
    pager.reload(&gallery);

    assert!(!pager.resolve_load(token, Some(image)));
    assert_eq!(pager.current_id(), Some(&MediaId::new(1_u64)));
}

#[test]
fn double_tap_zooms_and_leaving_resets() {
    use iced_lightbox::ui::PageDelegate;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct Chrome {
        taps: usize,
        double_taps: usize,
    }

    impl PageDelegate for Chrome {
        fn on_tap(&mut self, _id: &MediaId) {
            self.taps += 1;
        }

        fn on_double_tap(&mut self, _id: &MediaId, _at: Point) {
            self.double_taps += 1;
        }
    }

    let gallery = Gallery::new(3);
    let (mut pager, _) = open_pager(&gallery, 0);
    let mut chrome = Chrome::default();

    let t0 = Instant::now();
    let at = Point::new(200.0, 150.0);
    {
        let controller = pager.current_controller_mut().expect("controller");
        controller.handle_tap(at, t0, &mut chrome);
        controller.handle_tap(at, t0 + Duration::from_millis(100), &mut chrome);
        assert_eq!(chrome.double_taps, 1);
        assert!(controller.layout().zoom_scale() > 1.0);
    }

    pager.advance(&gallery);
    pager.retreat(&gallery);
    let controller = pager.current_controller().expect("controller");
    assert_eq!(controller.layout().zoom_scale(), 1.0);
}

#[test]
fn identifier_diff_drives_reconciliation() {
    let before: Vec<MediaId> = (0..5_u64).map(MediaId::new).collect();
    let after: Vec<MediaId> = [0_u64, 2, 4].iter().copied().map(MediaId::new).collect();

    let removed = before.subtracting_hashed(&after);
    assert_eq!(removed, vec![MediaId::new(1_u64), MediaId::new(3_u64)]);
}

#[test]
fn config_round_trips_through_toml() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("viewer.toml");

    let written = ViewerConfig {
        max_zoom_scale: Some(4.0),
        fade_duration_ms: Some(120),
        double_tap_interval_ms: Some(300),
        thumbnail_cache_bytes: None,
    };
    config::save_to_path(&written, &path).expect("save config");

    let loaded = config::load_from_path(&path).expect("load config");
    assert_eq!(loaded.max_zoom(), 4.0);
    assert_eq!(loaded.fade_duration().as_millis(), 120);
    assert_eq!(loaded.double_tap_interval().as_millis(), 300);

    dir.close().expect("close temp dir");
}
