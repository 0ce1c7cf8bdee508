//! Playback session state and its persisted side-effect types.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::catalog::{Track, TrackId};

/// The coarse playback state exposed to the UI.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    /// No track has been selected yet.
    Idle,
    Paused,
    Playing,
}

/// Live state of the player. Created empty at controller construction,
/// mutated only by transport operations, never persisted itself.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub current: Option<TrackId>,
    /// The active play queue; a singleton when a track is played on its own.
    pub playlist: Vec<TrackId>,
    pub index: usize,
    pub playing: bool,
    pub shuffled: bool,
    pub repeating: bool,
    /// 0.0–1.0.
    pub volume: f32,
    /// Set on every playback start/resume; cleared once the listening-history
    /// threshold has been recorded for this session.
    pub play_start: Option<Instant>,
}

impl PlaybackSession {
    pub fn new(volume: f32) -> Self {
        Self {
            current: None,
            playlist: Vec::new(),
            index: 0,
            playing: false,
            shuffled: false,
            repeating: false,
            volume: volume.clamp(0.0, 1.0),
            play_start: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        match (self.current, self.playing) {
            (None, _) => PlaybackState::Idle,
            (Some(_), true) => PlaybackState::Playing,
            (Some(_), false) => PlaybackState::Paused,
        }
    }
}

/// One listening-history record: a track snapshot plus when and how long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub track: Track,
    /// RFC-3339 timestamp of the record.
    pub timestamp: String,
    /// Observed play time at the moment of recording, in seconds.
    pub play_duration_secs: u64,
}

/// Ordered set of liked track ids. Membership is toggled; duplicates are
/// impossible by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikeSet {
    ids: Vec<TrackId>,
}

impl LikeSet {
    pub fn from_ids(mut ids: Vec<TrackId>) -> Self {
        let mut seen = Vec::new();
        ids.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(*id);
                true
            }
        });
        Self { ids }
    }

    /// Flip membership of `id`; returns `true` when the track is now liked.
    pub fn toggle(&mut self, id: TrackId) -> bool {
        if let Some(pos) = self.ids.iter().position(|&t| t == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
