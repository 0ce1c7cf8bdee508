//! User playlists: creation, membership, ordering, and JSON export/import.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, PlaylistId, TrackId};
use crate::storage::Store;

use super::ManagerError;

const PLAYLISTS_KEY: &str = "playlists";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub description: String,
    pub tracks: Vec<TrackId>,
    /// Default playlists ship with the app and cannot be deleted.
    #[serde(default)]
    pub is_default: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistStats {
    pub playlist_count: usize,
    pub track_count: usize,
}

pub struct PlaylistManager {
    store: Arc<Store>,
    playlists: Vec<Playlist>,
}

impl PlaylistManager {
    /// Load persisted playlists, seeding the two default ones on first run.
    pub fn new(store: Arc<Store>) -> Self {
        let mut playlists: Vec<Playlist> = store.get_or(PLAYLISTS_KEY, Vec::new());
        if playlists.is_empty() {
            playlists = default_playlists();
            store.set(PLAYLISTS_KEY, &playlists);
        }
        Self { store, playlists }
    }

    fn persist(&self) {
        self.store.set(PLAYLISTS_KEY, &self.playlists);
    }

    fn next_id(&self) -> PlaylistId {
        PlaylistId(self.playlists.iter().map(|p| p.id.0).max().unwrap_or(0) + 1)
    }

    pub fn create(&mut self, name: &str, description: &str) -> PlaylistId {
        let id = self.next_id();
        self.playlists.push(Playlist {
            id,
            name: name.to_string(),
            description: description.to_string(),
            tracks: Vec::new(),
            is_default: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        });
        self.persist();
        id
    }

    pub fn delete(&mut self, id: PlaylistId) -> Result<(), ManagerError> {
        let playlist = self.get(id).ok_or(ManagerError::PlaylistNotFound)?;
        if playlist.is_default {
            return Err(ManagerError::DefaultPlaylist);
        }
        self.playlists.retain(|p| p.id != id);
        self.persist();
        Ok(())
    }

    pub fn rename(&mut self, id: PlaylistId, name: &str) -> Result<(), ManagerError> {
        let playlist = self.get_mut(id).ok_or(ManagerError::PlaylistNotFound)?;
        playlist.name = name.to_string();
        self.persist();
        Ok(())
    }

    /// Append `track` to the playlist; a second add of the same id is rejected.
    pub fn add_track(&mut self, id: PlaylistId, track: TrackId) -> Result<(), ManagerError> {
        let playlist = self.get_mut(id).ok_or(ManagerError::PlaylistNotFound)?;
        if playlist.tracks.contains(&track) {
            return Err(ManagerError::DuplicateTrack);
        }
        playlist.tracks.push(track);
        self.persist();
        Ok(())
    }

    pub fn remove_track(&mut self, id: PlaylistId, track: TrackId) -> Result<(), ManagerError> {
        let playlist = self.get_mut(id).ok_or(ManagerError::PlaylistNotFound)?;
        playlist.tracks.retain(|&t| t != track);
        self.persist();
        Ok(())
    }

    /// Move the track at `from` to position `to`, shifting the rest.
    pub fn reorder(&mut self, id: PlaylistId, from: usize, to: usize) -> Result<(), ManagerError> {
        let playlist = self.get_mut(id).ok_or(ManagerError::PlaylistNotFound)?;
        if from >= playlist.tracks.len() || to >= playlist.tracks.len() {
            return Err(ManagerError::BadPosition);
        }
        let track = playlist.tracks.remove(from);
        playlist.tracks.insert(to, track);
        self.persist();
        Ok(())
    }

    pub fn get(&self, id: PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: PlaylistId) -> Option<&mut Playlist> {
        self.playlists.iter_mut().find(|p| p.id == id)
    }

    pub fn all(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Case-insensitive substring match over name and description.
    pub fn search(&self, query: &str) -> Vec<&Playlist> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.playlists
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn stats(&self) -> PlaylistStats {
        PlaylistStats {
            playlist_count: self.playlists.len(),
            track_count: self.playlists.iter().map(|p| p.tracks.len()).sum(),
        }
    }

    /// Total play time of one playlist, resolved against the catalog.
    pub fn total_duration_secs(&self, id: PlaylistId, catalog: &Catalog) -> u64 {
        self.get(id)
            .map(|p| {
                p.tracks
                    .iter()
                    .filter_map(|&t| catalog.track(t))
                    .filter_map(|t| t.duration_secs())
                    .map(|d| d.as_secs())
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Serialize every playlist as pretty JSON for file export.
    pub fn export(&self) -> String {
        serde_json::to_string_pretty(&self.playlists).unwrap_or_else(|_| "[]".to_string())
    }

    /// Import playlists from exported JSON, merging on playlist id: existing
    /// playlists absorb the imported track ids (no duplicates), unknown ids
    /// are added as new playlists.
    pub fn import(&mut self, json: &str) -> Result<usize, ManagerError> {
        let incoming: Vec<Playlist> =
            serde_json::from_str(json).map_err(|e| ManagerError::BadImport(e.to_string()))?;
        let mut touched = 0;
        for playlist in incoming {
            match self.get_mut(playlist.id) {
                Some(existing) => {
                    for track in playlist.tracks {
                        if !existing.tracks.contains(&track) {
                            existing.tracks.push(track);
                        }
                    }
                }
                None => self.playlists.push(playlist),
            }
            touched += 1;
        }
        self.persist();
        Ok(touched)
    }
}

fn default_playlists() -> Vec<Playlist> {
    let now = chrono::Utc::now().to_rfc3339();
    vec![
        Playlist {
            id: PlaylistId(1),
            name: "My Favorites".to_string(),
            description: "Your liked tracks in one place".to_string(),
            tracks: Vec::new(),
            is_default: true,
            created_at: now.clone(),
        },
        Playlist {
            id: PlaylistId(2),
            name: "Recently Added".to_string(),
            description: "Tracks you added recently".to_string(),
            tracks: Vec::new(),
            is_default: true,
            created_at: now,
        },
    ]
}
