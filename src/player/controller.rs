//! Transport controls and their side effects.

use std::sync::Arc;
use std::time::Duration;

use rand::RngExt;
use thiserror::Error;

use crate::catalog::{Catalog, Track, TrackId, format_time};
use crate::storage::Store;

use super::backend::{AudioBackend, PlaybackError};
use super::session::{HistoryEntry, LikeSet, PlaybackSession, PlaybackState};
use super::source::{MediaError, MediaLoader, ResolvedSource, is_adaptive_manifest};

/// A play session must reach this length before it lands in listening history.
pub const HISTORY_THRESHOLD: Duration = Duration::from_secs(30);

/// Most recent entries kept under the player's history key.
pub const PLAYER_HISTORY_CAP: usize = 100;

const SEEK_STEP: Duration = Duration::from_secs(10);

const LIKES_KEY: &str = "likes";
const HISTORY_KEY: &str = "history";

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

/// The single point of control for playback.
///
/// Every transport operation mutates the [`PlaybackSession`], drives the
/// backend, and pushes any user-facing outcome onto the notice queue; the UI
/// drains notices each frame rather than the controller touching it directly.
pub struct PlayerController {
    catalog: Arc<Catalog>,
    store: Arc<Store>,
    session: PlaybackSession,
    likes: LikeSet,
    history: Vec<HistoryEntry>,
    backend: Box<dyn AudioBackend>,
    loader: Box<dyn MediaLoader>,
    notices: Vec<String>,
}

impl PlayerController {
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<Store>,
        backend: Box<dyn AudioBackend>,
        loader: Box<dyn MediaLoader>,
        volume: f32,
    ) -> Self {
        let likes = LikeSet::from_ids(store.get_or(LIKES_KEY, Vec::new()));
        let history: Vec<HistoryEntry> = store.get_or(HISTORY_KEY, Vec::new());
        Self {
            catalog,
            store,
            session: PlaybackSession::new(volume),
            likes,
            history,
            backend,
            loader,
            notices: Vec::new(),
        }
    }

    // -- transport ---------------------------------------------------------

    /// Start playing `id`, optionally inside an explicit queue. An unknown id
    /// is a notice-and-no-op; the previous track keeps playing.
    pub fn play_track(&mut self, id: TrackId, queue: Option<Vec<TrackId>>) {
        let Some(track) = self.catalog.track(id).cloned() else {
            self.notice("Track not found");
            return;
        };

        let playlist = queue.unwrap_or_else(|| vec![id]);
        self.session.index = playlist.iter().position(|&t| t == id).unwrap_or(0);
        self.session.playlist = playlist;
        self.session.current = Some(id);
        self.session.play_start = Some(std::time::Instant::now());

        match self.start_playback(&track) {
            Ok(()) => {
                self.session.playing = true;
                tracing::info!(track = %track.display(), "playing");
            }
            Err(e) => {
                self.session.playing = false;
                tracing::error!(track = %track.display(), error = %e, "playback failed");
                self.notice("Error playing track");
            }
        }
    }

    fn start_playback(&mut self, track: &Track) -> Result<(), PlayerError> {
        let source = self.resolve_source(track)?;
        self.backend.load(&source)?;
        self.backend.set_volume(self.session.volume);
        self.backend.set_looping(self.session.repeating);
        self.backend.play()?;
        Ok(())
    }

    /// Tear down whatever is loaded, then resolve the track's locator through
    /// the appropriate strategy for its format and the loader's capabilities.
    fn resolve_source(&mut self, track: &Track) -> Result<ResolvedSource, MediaError> {
        self.backend.stop();
        if is_adaptive_manifest(&track.file) {
            if self.loader.supports_adaptive_streaming() {
                return self.loader.load(&track.file);
            }
            if self.backend.supports_native_adaptive() {
                return Ok(ResolvedSource::single(&track.file));
            }
            tracing::warn!(track = %track.display(), "no adaptive support, treating as progressive");
        }
        Ok(ResolvedSource::single(&track.file))
    }

    /// Pause when playing, resume when paused. No current track is a no-op.
    pub fn toggle_play_pause(&mut self) {
        if self.session.current.is_none() {
            return;
        }
        if self.session.playing {
            self.backend.pause();
            self.session.playing = false;
        } else {
            match self.backend.play() {
                Ok(()) => {
                    self.session.playing = true;
                    // Resuming opens a fresh history window.
                    self.session.play_start = Some(std::time::Instant::now());
                }
                Err(e) => {
                    tracing::error!(error = %e, "resume failed");
                    self.notice("Error resuming track");
                }
            }
        }
    }

    /// Advance in the queue: random pick under shuffle, wrap-around otherwise.
    /// A qualifying play of the outgoing track is recorded first.
    pub fn next_track(&mut self) {
        if self.session.playlist.is_empty() {
            return;
        }
        if self.session.play_start.is_some() && self.backend.position() >= HISTORY_THRESHOLD {
            self.record_listening_history();
        }
        let len = self.session.playlist.len();
        let next = if self.session.shuffled {
            rand::rng().random_range(0..len)
        } else {
            (self.session.index + 1) % len
        };
        let id = self.session.playlist[next];
        let queue = self.session.playlist.clone();
        self.session.index = next;
        self.play_track(id, Some(queue));
    }

    /// Step back in queue order, wrapping from the first to the last entry.
    /// Shuffle does not apply to backward navigation.
    pub fn previous_track(&mut self) {
        if self.session.playlist.is_empty() {
            return;
        }
        let len = self.session.playlist.len();
        let prev = if self.session.index > 0 {
            self.session.index - 1
        } else {
            len - 1
        };
        let id = self.session.playlist[prev];
        let queue = self.session.playlist.clone();
        self.session.index = prev;
        self.play_track(id, Some(queue));
    }

    pub fn seek_backward(&mut self) {
        if self.session.current.is_none() {
            return;
        }
        let target = self.backend.position().saturating_sub(SEEK_STEP);
        self.backend.seek_to(target);
        self.notice(format!("Rewound {}s", SEEK_STEP.as_secs()));
    }

    pub fn seek_forward(&mut self) {
        let Some(id) = self.session.current else {
            return;
        };
        let mut target = self.backend.position() + SEEK_STEP;
        let limit = self
            .backend
            .duration()
            .or_else(|| self.catalog.track(id).and_then(|t| t.duration_secs()));
        if let Some(limit) = limit {
            target = target.min(limit);
        }
        self.backend.seek_to(target);
        self.notice(format!("Forwarded {}s", SEEK_STEP.as_secs()));
    }

    pub fn toggle_shuffle(&mut self) {
        self.session.shuffled = !self.session.shuffled;
        self.notice(if self.session.shuffled {
            "Shuffle on"
        } else {
            "Shuffle off"
        });
    }

    pub fn toggle_repeat(&mut self) {
        self.session.repeating = !self.session.repeating;
        self.backend.set_looping(self.session.repeating);
        self.notice(if self.session.repeating {
            "Repeat on"
        } else {
            "Repeat off"
        });
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.session.volume = volume.clamp(0.0, 1.0);
        self.backend.set_volume(self.session.volume);
    }

    // -- likes -------------------------------------------------------------

    /// Toggle the like on the current track.
    pub fn toggle_like(&mut self) {
        if let Some(id) = self.session.current {
            self.toggle_like_for_track(id);
        }
    }

    pub fn toggle_like_for_track(&mut self, id: TrackId) {
        let liked = self.likes.toggle(id);
        self.store.set(LIKES_KEY, &self.likes);
        let title = self
            .catalog
            .track(id)
            .map(|t| t.title.clone())
            .unwrap_or_else(|| "Unknown track".to_string());
        if liked {
            self.notice(format!("Added \"{title}\" to liked songs"));
        } else {
            self.notice(format!("Removed \"{title}\" from liked songs"));
        }
    }

    pub fn is_liked(&self, id: TrackId) -> bool {
        self.likes.contains(id)
    }

    pub fn likes(&self) -> &LikeSet {
        &self.likes
    }

    // -- history -----------------------------------------------------------

    /// Record the current track into listening history, newest first, and
    /// persist under the shared history key.
    fn record_listening_history(&mut self) {
        let Some(track) = self
            .session
            .current
            .and_then(|id| self.catalog.track(id))
            .cloned()
        else {
            return;
        };
        let entry = HistoryEntry {
            track,
            timestamp: chrono::Utc::now().to_rfc3339(),
            play_duration_secs: self.backend.position().as_secs(),
        };
        self.history.insert(0, entry);
        self.history.truncate(PLAYER_HISTORY_CAP);
        self.store.set(HISTORY_KEY, &self.history);
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    // -- frame tick --------------------------------------------------------

    /// Called once per UI tick: records history when the threshold is crossed
    /// (once per play session) and auto-advances on end of track.
    pub fn poll(&mut self) {
        if self.session.play_start.is_some()
            && self.session.playing
            && self.backend.position() >= HISTORY_THRESHOLD
        {
            self.record_listening_history();
            self.session.play_start = None;
        }
        if self.backend.take_ended() {
            self.session.playing = false;
            self.next_track();
        }
    }

    // -- queries -----------------------------------------------------------

    pub fn search_tracks(&self, query: &str) -> Vec<&Track> {
        crate::catalog::search_tracks(&self.catalog.tracks, query)
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.session.current.and_then(|id| self.catalog.track(id))
    }

    pub fn state(&self) -> PlaybackState {
        self.session.state()
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn position(&self) -> Duration {
        self.backend.position()
    }

    /// Elapsed / total display string for the transport bar.
    pub fn progress_label(&self) -> String {
        let elapsed = format_time(self.backend.position());
        let total = self
            .backend
            .duration()
            .or_else(|| self.current_track().and_then(|t| t.duration_secs()));
        match total {
            Some(total) => format!("{elapsed} / {}", format_time(total)),
            None => elapsed,
        }
    }

    // -- notices -----------------------------------------------------------

    fn notice(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }

    /// Drain queued user-facing messages, oldest first.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}
