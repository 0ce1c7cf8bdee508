use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::{TrackId, sample_catalog};
use crate::storage::Store;

use super::backend::{AudioBackend, PlaybackError};
use super::controller::{HISTORY_THRESHOLD, PLAYER_HISTORY_CAP, PlayerController};
use super::session::{HistoryEntry, LikeSet, PlaybackState};
use super::source::{HlsManifestLoader, MediaError, MediaLoader, ProgressiveLoader, ResolvedSource};

#[derive(Debug, Default)]
struct FakeState {
    loaded: Vec<ResolvedSource>,
    position: Duration,
    duration: Option<Duration>,
    playing: bool,
    looping: bool,
    volume: f32,
    ended: bool,
    play_calls: u32,
    stop_calls: u32,
    seeks: Vec<Duration>,
}

#[derive(Clone, Default)]
struct FakeHandle(Arc<Mutex<FakeState>>);

impl FakeHandle {
    fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.0.lock().unwrap())
    }
}

struct FakeBackend {
    state: FakeHandle,
}

impl AudioBackend for FakeBackend {
    fn load(&mut self, source: &ResolvedSource) -> Result<(), PlaybackError> {
        self.state.with(|s| {
            s.loaded.push(source.clone());
            s.position = Duration::ZERO;
        });
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.state.with(|s| {
            s.playing = true;
            s.play_calls += 1;
        });
        Ok(())
    }

    fn pause(&mut self) {
        self.state.with(|s| s.playing = false);
    }

    fn stop(&mut self) {
        self.state.with(|s| {
            s.playing = false;
            s.stop_calls += 1;
        });
    }

    fn seek_to(&mut self, position: Duration) {
        self.state.with(|s| {
            s.position = position;
            s.seeks.push(position);
        });
    }

    fn position(&self) -> Duration {
        self.state.with(|s| s.position)
    }

    fn duration(&self) -> Option<Duration> {
        self.state.with(|s| s.duration)
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.with(|s| s.volume = volume);
    }

    fn set_looping(&mut self, on: bool) {
        self.state.with(|s| s.looping = on);
    }

    fn take_ended(&mut self) -> bool {
        self.state.with(|s| std::mem::take(&mut s.ended))
    }
}

fn controller() -> (tempfile::TempDir, FakeHandle, PlayerController) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path().to_path_buf()));
    let catalog = Arc::new(sample_catalog());
    let handle = FakeHandle::default();
    let backend = Box::new(FakeBackend {
        state: handle.clone(),
    });
    let ctrl = PlayerController::new(catalog, store, backend, Box::new(HlsManifestLoader), 0.7);
    (dir, handle, ctrl)
}

#[test]
fn play_track_starts_the_requested_track() {
    let (_dir, handle, mut player) = controller();

    player.play_track(TrackId(4), None);

    let track = player.current_track().unwrap();
    assert_eq!(track.title, "Midnight Dreams");
    assert_eq!(track.artist, "Luna Eclipse");
    assert_eq!(player.state(), PlaybackState::Playing);
    assert_eq!(player.session().playlist, vec![TrackId(4)]);
    handle.with(|s| {
        assert!(s.playing);
        assert!((s.volume - 0.7).abs() < f32::EPSILON);
        assert_eq!(s.loaded.len(), 1);
    });
}

#[test]
fn playing_unknown_track_is_a_notice_and_no_op() {
    let (_dir, handle, mut player) = controller();
    player.play_track(TrackId(4), None);
    handle.with(|s| s.position = Duration::from_secs(5));

    player.play_track(TrackId(9999), None);

    assert_eq!(player.current_track().unwrap().id, TrackId(4));
    assert_eq!(player.state(), PlaybackState::Playing);
    assert!(player.take_notices().contains(&"Track not found".to_string()));
}

#[test]
fn toggle_play_pause_flips_state_and_is_idle_safe() {
    let (_dir, handle, mut player) = controller();

    // Nothing loaded yet.
    player.toggle_play_pause();
    assert_eq!(player.state(), PlaybackState::Idle);

    player.play_track(TrackId(5), None);
    player.toggle_play_pause();
    assert_eq!(player.state(), PlaybackState::Paused);
    handle.with(|s| assert!(!s.playing));

    player.toggle_play_pause();
    assert_eq!(player.state(), PlaybackState::Playing);
}

#[test]
fn history_is_recorded_once_per_play_session() {
    let (_dir, handle, mut player) = controller();
    player.play_track(TrackId(4), None);

    handle.with(|s| s.position = Duration::from_secs(10));
    player.poll();
    assert!(player.history().is_empty());

    handle.with(|s| s.position = HISTORY_THRESHOLD);
    player.poll();
    assert_eq!(player.history().len(), 1);
    assert_eq!(player.history()[0].track.id, TrackId(4));
    assert_eq!(player.history()[0].play_duration_secs, 30);

    // The threshold fires once; further polling does not duplicate.
    handle.with(|s| s.position = Duration::from_secs(90));
    player.poll();
    player.poll();
    assert_eq!(player.history().len(), 1);
}

#[test]
fn resuming_opens_a_fresh_history_window() {
    let (_dir, handle, mut player) = controller();
    player.play_track(TrackId(4), None);
    handle.with(|s| s.position = Duration::from_secs(40));
    player.poll();
    assert_eq!(player.history().len(), 1);

    player.toggle_play_pause(); // pause
    player.toggle_play_pause(); // resume resets the window
    handle.with(|s| s.position = Duration::from_secs(80));
    player.poll();
    assert_eq!(player.history().len(), 2);
}

#[test]
fn history_is_capped_and_persisted() {
    let (dir, handle, mut player) = controller();
    for _ in 0..(PLAYER_HISTORY_CAP + 5) {
        player.play_track(TrackId(6), None);
        handle.with(|s| s.position = Duration::from_secs(45));
        player.poll();
    }
    assert_eq!(player.history().len(), PLAYER_HISTORY_CAP);

    let store = Store::open(dir.path().to_path_buf());
    let saved: Vec<HistoryEntry> = store.get_or("history", Vec::new());
    assert_eq!(saved.len(), PLAYER_HISTORY_CAP);
}

#[test]
fn next_track_advances_and_wraps_in_queue_order() {
    let (_dir, _handle, mut player) = controller();
    let queue = vec![TrackId(4), TrackId(5), TrackId(6)];
    player.play_track(TrackId(5), Some(queue));

    player.next_track();
    assert_eq!(player.current_track().unwrap().id, TrackId(6));
    player.next_track();
    assert_eq!(player.current_track().unwrap().id, TrackId(4));
}

#[test]
fn next_track_on_singleton_queue_replays_the_same_track() {
    let (_dir, handle, mut player) = controller();
    player.play_track(TrackId(7), None);

    player.next_track();
    assert_eq!(player.current_track().unwrap().id, TrackId(7));
    assert_eq!(player.state(), PlaybackState::Playing);
    handle.with(|s| assert_eq!(s.loaded.len(), 2));
}

#[test]
fn next_track_under_shuffle_stays_inside_the_queue() {
    let (_dir, _handle, mut player) = controller();
    let queue = vec![TrackId(4), TrackId(5), TrackId(6), TrackId(7)];
    player.play_track(TrackId(4), Some(queue.clone()));
    player.toggle_shuffle();

    for _ in 0..20 {
        player.next_track();
        assert!(queue.contains(&player.current_track().unwrap().id));
    }
}

#[test]
fn previous_track_wraps_from_the_first_entry() {
    let (_dir, _handle, mut player) = controller();
    let queue = vec![TrackId(4), TrackId(5), TrackId(6)];
    player.play_track(TrackId(4), Some(queue));

    player.previous_track();
    assert_eq!(player.current_track().unwrap().id, TrackId(6));
}

#[test]
fn seeks_are_clamped_to_the_track_bounds() {
    let (_dir, handle, mut player) = controller();
    player.play_track(TrackId(4), None);
    handle.with(|s| {
        s.position = Duration::from_secs(3);
        s.duration = Some(Duration::from_secs(272));
    });

    player.seek_backward();
    handle.with(|s| assert_eq!(s.seeks.last(), Some(&Duration::ZERO)));

    handle.with(|s| s.position = Duration::from_secs(268));
    player.seek_forward();
    handle.with(|s| assert_eq!(s.seeks.last(), Some(&Duration::from_secs(272))));
}

#[test]
fn seek_forward_falls_back_to_catalog_duration() {
    let (_dir, handle, mut player) = controller();
    player.play_track(TrackId(4), None); // "4:32" = 272s
    handle.with(|s| {
        s.position = Duration::from_secs(270);
        s.duration = None;
    });

    player.seek_forward();
    handle.with(|s| assert_eq!(s.seeks.last(), Some(&Duration::from_secs(272))));
}

#[test]
fn repeat_toggle_reaches_the_backend() {
    let (_dir, handle, mut player) = controller();
    player.play_track(TrackId(4), None);

    player.toggle_repeat();
    handle.with(|s| assert!(s.looping));
    player.toggle_repeat();
    handle.with(|s| assert!(!s.looping));
}

#[test]
fn end_of_track_auto_advances() {
    let (_dir, handle, mut player) = controller();
    player.play_track(TrackId(4), Some(vec![TrackId(4), TrackId(5)]));

    handle.with(|s| s.ended = true);
    player.poll();
    assert_eq!(player.current_track().unwrap().id, TrackId(5));
}

#[test]
fn like_toggle_is_idempotent_and_persists() {
    let (dir, _handle, mut player) = controller();
    player.play_track(TrackId(4), None);

    player.toggle_like();
    assert!(player.is_liked(TrackId(4)));
    player.toggle_like();
    assert!(!player.is_liked(TrackId(4)));
    player.toggle_like();
    assert!(player.is_liked(TrackId(4)));

    let notices = player.take_notices();
    assert!(notices.contains(&"Added \"Midnight Dreams\" to liked songs".to_string()));
    assert!(notices.contains(&"Removed \"Midnight Dreams\" from liked songs".to_string()));

    let store = Store::open(dir.path().to_path_buf());
    let saved: LikeSet = store.get_or("likes", LikeSet::default());
    assert!(saved.contains(TrackId(4)));
    assert_eq!(saved.len(), 1);
}

#[test]
fn like_set_deduplicates_on_load() {
    let set = LikeSet::from_ids(vec![TrackId(4), TrackId(5), TrackId(4)]);
    assert_eq!(set.ids(), &[TrackId(4), TrackId(5)]);
}

#[test]
fn manifest_loader_resolves_segments_in_order() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.mp3"), b"x").unwrap();
    std::fs::write(dir.path().join("b.mp3"), b"x").unwrap();
    let manifest = dir.path().join("track.m3u8");
    std::fs::write(
        &manifest,
        "#EXTM3U\n#EXTINF:10,\na.mp3\n\n#EXTINF:10,\nb.mp3\n",
    )
    .unwrap();

    let resolved = HlsManifestLoader.load(&manifest).unwrap();
    assert_eq!(
        resolved.files,
        vec![dir.path().join("a.mp3"), dir.path().join("b.mp3")]
    );
}

#[test]
fn manifest_loader_follows_variant_playlists() {
    let dir = tempfile::tempdir().unwrap();
    let master = dir.path().join("master.m3u8");
    let variant = dir.path().join("hi.m3u8");
    std::fs::write(&master, "#EXTM3U\nhi.m3u8\n").unwrap();
    std::fs::write(&variant, "#EXTM3U\nseg0.mp3\nseg1.mp3\n").unwrap();

    let resolved = HlsManifestLoader.load(&master).unwrap();
    assert_eq!(
        resolved.files,
        vec![dir.path().join("seg0.mp3"), dir.path().join("seg1.mp3")]
    );
}

#[test]
fn empty_manifest_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("empty.m3u8");
    std::fs::write(&manifest, "#EXTM3U\n# nothing here\n").unwrap();

    match HlsManifestLoader.load(&manifest) {
        Err(MediaError::EmptyManifest { path }) => assert_eq!(path, manifest),
        other => panic!("expected EmptyManifest, got {other:?}"),
    }
}

#[test]
fn progressive_loader_passes_files_through() {
    let resolved = ProgressiveLoader.load(Path::new("assets/audio/4.mp3")).unwrap();
    assert_eq!(resolved.files, vec![PathBuf::from("assets/audio/4.mp3")]);
}

#[test]
fn manifest_tracks_dispatch_through_the_loader() {
    // Swap one track's locator for a real manifest on disk.
    let mdir = tempfile::tempdir().unwrap();
    let manifest = mdir.path().join("live.m3u8");
    std::fs::write(&manifest, "#EXTM3U\nchunk0.mp3\nchunk1.mp3\n").unwrap();

    let mut catalog = sample_catalog();
    catalog.tracks[0].file = manifest.clone();
    let id = catalog.tracks[0].id;

    let sdir = tempfile::tempdir().unwrap();
    let store = Arc::new(Store::open(sdir.path().to_path_buf()));
    let handle = FakeHandle::default();
    let backend = Box::new(FakeBackend {
        state: handle.clone(),
    });
    let mut player = PlayerController::new(
        Arc::new(catalog),
        store,
        backend,
        Box::new(HlsManifestLoader),
        1.0,
    );

    player.play_track(id, None);
    handle.with(|s| {
        assert_eq!(
            s.loaded.last().unwrap().files,
            vec![mdir.path().join("chunk0.mp3"), mdir.path().join("chunk1.mp3")]
        );
    });
}
