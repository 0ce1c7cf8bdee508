//! Startup wiring: open the store, load catalog and settings, build the
//! player and app context, and apply persisted playback defaults.

use std::sync::Arc;

use crate::app::App;
use crate::catalog::CatalogSource;
use crate::player::{PlayerController, RodioBackend, select_media_loader};
use crate::settings::{RepeatMode, Settings};
use crate::storage::Store;

pub fn build_app() -> App {
    let store = Arc::new(Store::open_default());
    tracing::info!(dir = %store.dir().display(), "data directory");

    let mut source = CatalogSource::new(store.dir());
    let catalog = source.load();
    tracing::info!(tracks = catalog.tracks.len(), "catalog loaded");

    let settings = Settings::load(&store);
    let backend = Box::new(RodioBackend::new());
    let loader = select_media_loader();
    let mut player = PlayerController::new(
        catalog.clone(),
        store.clone(),
        backend,
        loader,
        settings.volume_factor(),
    );

    apply_playback_defaults(&mut player, &settings);

    App::new(store, catalog, settings, player)
}

/// Bring the fresh controller in line with the persisted playback settings.
fn apply_playback_defaults(player: &mut PlayerController, settings: &Settings) {
    if settings.playback.shuffle_mode {
        player.toggle_shuffle();
    }
    if settings.playback.repeat_mode == RepeatMode::One {
        player.toggle_repeat();
    }
    // Applying defaults is not user action; drop the toggle notices.
    player.take_notices();
}
