//! Album browsing over the catalog: sorting, search, track resolution.

use std::sync::Arc;

use crate::catalog::{Album, AlbumId, Catalog, Track, fold_diacritics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlbumSort {
    #[default]
    Title,
    Artist,
    Year,
    TrackCount,
}

pub struct AlbumManager {
    catalog: Arc<Catalog>,
}

impl AlbumManager {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn all(&self) -> &[Album] {
        &self.catalog.albums
    }

    pub fn get(&self, id: AlbumId) -> Option<&Album> {
        self.catalog.album(id)
    }

    pub fn sorted(&self, sort: AlbumSort) -> Vec<&Album> {
        let mut albums: Vec<&Album> = self.catalog.albums.iter().collect();
        match sort {
            AlbumSort::Title => {
                albums.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
            }
            AlbumSort::Artist => {
                albums.sort_by(|a, b| a.artist.to_lowercase().cmp(&b.artist.to_lowercase()))
            }
            AlbumSort::Year => albums.sort_by(|a, b| b.year.cmp(&a.year)),
            AlbumSort::TrackCount => albums.sort_by(|a, b| b.tracks.len().cmp(&a.tracks.len())),
        }
        albums
    }

    pub fn search(&self, query: &str) -> Vec<&Album> {
        let needle = fold_diacritics(query.trim());
        if needle.is_empty() {
            return Vec::new();
        }
        self.catalog
            .albums
            .iter()
            .filter(|a| {
                fold_diacritics(&a.title).contains(&needle)
                    || fold_diacritics(&a.artist).contains(&needle)
            })
            .collect()
    }

    /// Resolve an album's track ids to catalog tracks, skipping dangling ids.
    pub fn tracks(&self, id: AlbumId) -> Vec<&Track> {
        self.get(id)
            .map(|album| {
                album
                    .tracks
                    .iter()
                    .filter_map(|&t| self.catalog.track(t))
                    .collect()
            })
            .unwrap_or_default()
    }
}
