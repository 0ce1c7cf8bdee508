//! Listening-history tracking over the shared history key.
//!
//! The player writes history too (capped tighter); both sides read and write
//! the same key, so the tracker reloads before every mutation rather than
//! assuming its copy is fresh.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};

use crate::catalog::{Track, TrackId, fold_diacritics};
use crate::player::HistoryEntry;
use crate::storage::Store;

const HISTORY_KEY: &str = "history";

/// The tracker keeps a longer tail than the player's own cap.
pub const TRACKER_HISTORY_CAP: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Today,
    Week,
    Month,
    Year,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_plays: usize,
    pub unique_tracks: usize,
    pub total_listening_secs: u64,
}

pub struct HistoryTracker {
    store: Arc<Store>,
    entries: Vec<HistoryEntry>,
}

impl HistoryTracker {
    pub fn new(store: Arc<Store>) -> Self {
        let entries = store.get_or(HISTORY_KEY, Vec::new());
        Self { store, entries }
    }

    /// Re-read the shared key; the player may have written since we loaded.
    pub fn refresh(&mut self) {
        self.entries = self.store.get_or(HISTORY_KEY, Vec::new());
    }

    pub fn record(&mut self, track: &Track, play_duration_secs: u64) {
        self.refresh();
        self.entries.insert(
            0,
            HistoryEntry {
                track: track.clone(),
                timestamp: Utc::now().to_rfc3339(),
                play_duration_secs,
            },
        );
        self.entries.truncate(TRACKER_HISTORY_CAP);
        self.store.set(HISTORY_KEY, &self.entries);
    }

    pub fn all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn recently_played(&self, limit: usize) -> &[HistoryEntry] {
        &self.entries[..self.entries.len().min(limit)]
    }

    /// Entries recorded within `range` of now, newest first.
    pub fn in_range(&self, range: TimeRange) -> Vec<&HistoryEntry> {
        let Some(cutoff) = range.cutoff() else {
            return self.entries.iter().collect();
        };
        self.entries
            .iter()
            .filter(|e| recorded_since(e, cutoff))
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<&HistoryEntry> {
        let needle = fold_diacritics(query.trim());
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| {
                fold_diacritics(&e.track.title).contains(&needle)
                    || fold_diacritics(&e.track.artist).contains(&needle)
            })
            .collect()
    }

    /// Play counts per track id across the whole retained history.
    pub fn play_counts(&self) -> HashMap<TrackId, usize> {
        let mut counts = HashMap::new();
        for e in &self.entries {
            *counts.entry(e.track.id).or_insert(0) += 1;
        }
        counts
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            total_plays: self.entries.len(),
            unique_tracks: self.play_counts().len(),
            total_listening_secs: self.entries.iter().map(|e| e.play_duration_secs).sum(),
        }
    }

    /// Artists ranked by play count, most played first.
    pub fn top_artists(&self, limit: usize) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for e in &self.entries {
            *counts.entry(e.track.artist.as_str()).or_insert(0) += 1;
        }
        let mut ranked: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(a, c)| (a.to_string(), c))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Play counts per genre across the retained history.
    pub fn genre_distribution(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for e in &self.entries {
            *counts.entry(e.track.genre.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn export(&self) -> String {
        serde_json::to_string_pretty(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.store.remove(HISTORY_KEY);
    }

    /// Drop only the entries recorded within `range`, keeping older ones.
    pub fn clear_range(&mut self, range: TimeRange) {
        let Some(cutoff) = range.cutoff() else {
            self.clear();
            return;
        };
        self.entries.retain(|e| !recorded_since(e, cutoff));
        self.store.set(HISTORY_KEY, &self.entries);
    }
}

impl TimeRange {
    /// The instant entries must be newer than to fall in this range;
    /// `None` means the range is unbounded.
    fn cutoff(self) -> Option<DateTime<Utc>> {
        let now = Utc::now();
        match self {
            TimeRange::Today => Some(now - ChronoDuration::days(1)),
            TimeRange::Week => Some(now - ChronoDuration::weeks(1)),
            TimeRange::Month => Some(now - ChronoDuration::days(30)),
            TimeRange::Year => Some(now - ChronoDuration::days(365)),
            TimeRange::All => None,
        }
    }
}

/// Unparseable timestamps never match a bounded range.
fn recorded_since(entry: &HistoryEntry, cutoff: DateTime<Utc>) -> bool {
    match DateTime::parse_from_rfc3339(&entry.timestamp) {
        Ok(t) => t.with_timezone(&Utc) >= cutoff,
        Err(_) => false,
    }
}
