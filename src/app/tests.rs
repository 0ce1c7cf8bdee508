use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{TrackId, sample_catalog};
use crate::player::{
    AudioBackend, HlsManifestLoader, PlaybackError, PlayerController, ResolvedSource,
};
use crate::settings::Settings;
use crate::storage::Store;

use super::*;

struct NullBackend;

impl AudioBackend for NullBackend {
    fn load(&mut self, _source: &ResolvedSource) -> Result<(), PlaybackError> {
        Ok(())
    }
    fn play(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }
    fn pause(&mut self) {}
    fn stop(&mut self) {}
    fn seek_to(&mut self, _position: Duration) {}
    fn position(&self) -> Duration {
        Duration::ZERO
    }
    fn duration(&self) -> Option<Duration> {
        None
    }
    fn set_volume(&mut self, _volume: f32) {}
    fn set_looping(&mut self, _on: bool) {}
    fn take_ended(&mut self) -> bool {
        false
    }
}

fn app_at(dir: &Path) -> App {
    let store = Arc::new(Store::open(dir.to_path_buf()));
    let catalog = Arc::new(sample_catalog());
    let settings = Settings::default();
    let player = PlayerController::new(
        catalog.clone(),
        store.clone(),
        Box::new(NullBackend),
        Box::new(HlsManifestLoader),
        settings.volume_factor(),
    );
    App::new(store, catalog, settings, player)
}

fn app() -> (tempfile::TempDir, App) {
    let dir = tempfile::tempdir().unwrap();
    let app = app_at(dir.path());
    (dir, app)
}

#[test]
fn navigation_remembers_and_pops_pages() {
    let (_dir, mut app) = app();
    assert_eq!(app.page, Page::Home);

    app.navigate(Page::Albums);
    app.navigate(Page::Favorites);
    assert_eq!(app.nav_history(), &[Page::Home, Page::Albums]);

    app.navigate_back();
    assert_eq!(app.page, Page::Albums);
    app.navigate_back();
    assert_eq!(app.page, Page::Home);
    // Popping past the start is a no-op.
    app.navigate_back();
    assert_eq!(app.page, Page::Home);
}

#[test]
fn navigating_to_the_same_page_records_nothing() {
    let (_dir, mut app) = app();
    app.navigate(Page::Home);
    assert!(app.nav_history().is_empty());
}

#[test]
fn navigation_history_is_persisted_and_capped() {
    let (dir, mut app) = app();
    for _ in 0..40 {
        app.navigate(Page::Albums);
        app.navigate(Page::Home);
    }
    assert_eq!(app.nav_history().len(), 50);

    let reopened = app_at(dir.path());
    assert_eq!(reopened.nav_history().len(), 50);
}

#[test]
fn selection_wraps_over_the_page_rows() {
    let (_dir, mut app) = app();
    let rows = app.row_count();
    assert_eq!(rows, 19);

    app.select_prev();
    assert_eq!(app.selected, rows - 1);
    app.select_next();
    assert_eq!(app.selected, 0);
}

#[test]
fn activating_a_row_queues_the_whole_page() {
    let (_dir, mut app) = app();
    app.selected = 2;
    app.activate_selected();

    let session = app.player.session();
    assert_eq!(session.current, Some(TrackId(6)));
    assert_eq!(session.playlist.len(), 19);
    assert_eq!(session.index, 2);
}

#[test]
fn activating_an_album_queues_its_tracks() {
    let (_dir, mut app) = app();
    app.navigate(Page::Albums);
    app.selected = 2; // "Electric Dreams", tracks 6 and 19
    app.activate_selected();

    let session = app.player.session();
    assert_eq!(session.current, Some(TrackId(6)));
    assert_eq!(session.playlist, vec![TrackId(6), TrackId(19)]);
}

#[test]
fn debounced_search_feeds_the_home_page() {
    let (_dir, mut app) = app();
    app.enter_filter_mode();
    for c in "luna".chars() {
        app.push_filter_char(c);
    }
    // Not yet: still inside the debounce window.
    assert!(app.search_results().is_empty());

    app.flush_search();
    assert_eq!(app.search_results(), &[TrackId(4)]);
    assert_eq!(app.visible_tracks().len(), 1);
    assert_eq!(app.search_history(), &["luna".to_string()]);
}

#[test]
fn search_history_deduplicates_and_caps() {
    let (dir, mut app) = app();
    for i in 0..25 {
        app.filter_query = format!("query {i}");
        app.flush_search();
    }
    app.filter_query = "query 24".to_string();
    app.flush_search();

    assert_eq!(app.search_history().len(), 20);
    assert_eq!(app.search_history()[0], "query 24");
    assert_eq!(
        app.search_history()
            .iter()
            .filter(|q| *q == "query 24")
            .count(),
        1
    );

    let reopened = app_at(dir.path());
    assert_eq!(reopened.search_history().len(), 20);
}

#[test]
fn clear_filter_restores_the_full_catalog() {
    let (_dir, mut app) = app();
    app.filter_query = "luna".to_string();
    app.flush_search();
    assert_eq!(app.visible_tracks().len(), 1);

    app.clear_filter();
    assert_eq!(app.visible_tracks().len(), 19);
    assert!(!app.filter_mode);
}

#[test]
fn notices_expire_after_their_ttl() {
    let (_dir, mut app) = app();
    app.push_notice("saved");
    assert_eq!(app.active_notices().count(), 1);

    // tick() only drops notices older than the TTL; a fresh one survives.
    app.tick();
    assert_eq!(app.active_notices().count(), 1);
}

#[test]
fn controller_notices_surface_through_the_app() {
    let (_dir, mut app) = app();
    app.player.play_track(TrackId(9999), None);
    app.tick();
    assert!(app.active_notices().any(|n| n == "Track not found"));
}

#[test]
fn follow_toggle_targets_the_selected_row() {
    let (_dir, mut app) = app();
    app.selected = 0; // "Midnight Dreams" by Luna Eclipse

    app.toggle_follow_selected();
    assert!(app.followed.contains("Luna Eclipse"));
    assert!(app.active_notices().any(|n| n == "Following Luna Eclipse"));

    app.toggle_follow_selected();
    assert!(!app.followed.contains("Luna Eclipse"));
    assert!(app.active_notices().any(|n| n == "Unfollowed Luna Eclipse"));
}

#[test]
fn favorites_page_lists_favorited_tracks() {
    let (_dir, mut app) = app();
    let track = app.catalog.track(TrackId(4)).unwrap().clone();
    app.favorites.toggle(&track);

    app.navigate(Page::Favorites);
    assert_eq!(app.row_count(), 1);
    assert_eq!(app.visible_tracks()[0].id, TrackId(4));
}
