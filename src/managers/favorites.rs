//! Favorite tracks and followed artists: timestamps, sorting, stats and
//! export/import.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{Track, TrackId, fold_diacritics};
use crate::storage::Store;

use super::ManagerError;

const FAVORITES_KEY: &str = "favorites";
const FOLLOWED_ARTISTS_KEY: &str = "followed_artists";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub track: Track,
    pub added_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoriteSort {
    #[default]
    Recent,
    Oldest,
    Title,
    Artist,
}

pub struct FavoritesManager {
    store: Arc<Store>,
    favorites: Vec<FavoriteEntry>,
}

impl FavoritesManager {
    pub fn new(store: Arc<Store>) -> Self {
        let favorites = store.get_or(FAVORITES_KEY, Vec::new());
        Self { store, favorites }
    }

    fn persist(&self) {
        self.store.set(FAVORITES_KEY, &self.favorites);
    }

    /// Flip membership; returns `true` when the track is now a favorite.
    /// New favorites go to the front so "recent" order is the natural one.
    pub fn toggle(&mut self, track: &Track) -> bool {
        if let Some(pos) = self.favorites.iter().position(|f| f.track.id == track.id) {
            self.favorites.remove(pos);
            self.persist();
            false
        } else {
            self.favorites.insert(
                0,
                FavoriteEntry {
                    track: track.clone(),
                    added_at: chrono::Utc::now().to_rfc3339(),
                },
            );
            self.persist();
            true
        }
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.favorites.iter().any(|f| f.track.id == id)
    }

    pub fn all(&self) -> &[FavoriteEntry] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn sorted(&self, sort: FavoriteSort) -> Vec<&FavoriteEntry> {
        let mut entries: Vec<&FavoriteEntry> = self.favorites.iter().collect();
        match sort {
            FavoriteSort::Recent => {} // stored order
            FavoriteSort::Oldest => entries.reverse(),
            FavoriteSort::Title => {
                entries.sort_by(|a, b| a.track.title.to_lowercase().cmp(&b.track.title.to_lowercase()))
            }
            FavoriteSort::Artist => entries
                .sort_by(|a, b| a.track.artist.to_lowercase().cmp(&b.track.artist.to_lowercase())),
        }
        entries
    }

    /// Accent-folded substring search over title, artist and album.
    pub fn search(&self, query: &str) -> Vec<&FavoriteEntry> {
        let needle = fold_diacritics(query.trim());
        if needle.is_empty() {
            return Vec::new();
        }
        self.favorites
            .iter()
            .filter(|f| {
                fold_diacritics(&f.track.title).contains(&needle)
                    || fold_diacritics(&f.track.artist).contains(&needle)
                    || fold_diacritics(&f.track.album).contains(&needle)
            })
            .collect()
    }

    /// Total listening time of the collection, in seconds.
    pub fn total_duration_secs(&self) -> u64 {
        self.favorites
            .iter()
            .filter_map(|f| f.track.duration_secs())
            .map(|d| d.as_secs())
            .sum()
    }

    pub fn stats(&self) -> FavoriteStats {
        FavoriteStats {
            count: self.favorites.len(),
            total_secs: self.total_duration_secs(),
            top_genre: most_common(self.favorites.iter().map(|f| f.track.genre.as_str())),
            top_artist: most_common(self.favorites.iter().map(|f| f.track.artist.as_str())),
        }
    }

    pub fn export(&self) -> String {
        serde_json::to_string_pretty(&self.favorites).unwrap_or_else(|_| "[]".to_string())
    }

    /// Merge exported favorites back in; entries whose track id is already
    /// present are skipped, so re-importing the same file changes nothing.
    pub fn import(&mut self, json: &str) -> Result<usize, ManagerError> {
        let incoming: Vec<FavoriteEntry> =
            serde_json::from_str(json).map_err(|e| ManagerError::BadImport(e.to_string()))?;
        let mut added = 0;
        for entry in incoming {
            if !self.contains(entry.track.id) {
                self.favorites.push(entry);
                added += 1;
            }
        }
        if added > 0 {
            self.persist();
        }
        Ok(added)
    }

    pub fn clear(&mut self) {
        self.favorites.clear();
        self.persist();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteStats {
    pub count: usize,
    pub total_secs: u64,
    pub top_genre: Option<String>,
    pub top_artist: Option<String>,
}

/// Most frequent value, ties broken alphabetically for determinism.
fn most_common<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(v, _)| v.to_string())
}

/// Artists the user follows, persisted as a plain ordered name list.
pub struct FollowedArtists {
    store: Arc<Store>,
    artists: Vec<String>,
}

impl FollowedArtists {
    pub fn new(store: Arc<Store>) -> Self {
        let artists = store.get_or(FOLLOWED_ARTISTS_KEY, Vec::new());
        Self { store, artists }
    }

    /// Flip follow state; returns `true` when the artist is now followed.
    pub fn toggle(&mut self, artist: &str) -> bool {
        let followed = if let Some(pos) = self.artists.iter().position(|a| a == artist) {
            self.artists.remove(pos);
            false
        } else {
            self.artists.push(artist.to_string());
            true
        };
        self.store.set(FOLLOWED_ARTISTS_KEY, &self.artists);
        followed
    }

    pub fn contains(&self, artist: &str) -> bool {
        self.artists.iter().any(|a| a == artist)
    }

    pub fn all(&self) -> &[String] {
        &self.artists
    }
}
