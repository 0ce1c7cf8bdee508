//! Discovery surfaces: recommendations, trending, new releases, featured.
//!
//! The recommendation step is deliberately simple taste-overlap filtering:
//! take the listener's top genres and artists from favorites and history, and
//! surface catalog tracks that share them and have not been heard yet.

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::{Album, Catalog, PlaylistSeed, Track, TrackId};

use super::favorites::FavoritesManager;
use super::history::HistoryTracker;

const TOP_GENRES: usize = 3;
const TOP_ARTISTS: usize = 5;
const RECOMMENDATION_LIMIT: usize = 15;

pub struct DiscoveryManager {
    catalog: Arc<Catalog>,
}

impl DiscoveryManager {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Tracks sharing a top genre or artist with the listener's taste,
    /// excluding anything already favorited or played, catalog order.
    pub fn recommendations(
        &self,
        favorites: &FavoritesManager,
        history: &HistoryTracker,
    ) -> Vec<&Track> {
        let mut genre_weight: HashMap<&str, usize> = HashMap::new();
        let mut artist_weight: HashMap<&str, usize> = HashMap::new();
        let mut known: Vec<TrackId> = Vec::new();

        for f in favorites.all() {
            *genre_weight.entry(f.track.genre.as_str()).or_insert(0) += 2;
            *artist_weight.entry(f.track.artist.as_str()).or_insert(0) += 2;
            known.push(f.track.id);
        }
        for e in history.all() {
            *genre_weight.entry(e.track.genre.as_str()).or_insert(0) += 1;
            *artist_weight.entry(e.track.artist.as_str()).or_insert(0) += 1;
            if !known.contains(&e.track.id) {
                known.push(e.track.id);
            }
        }

        let top_genres = top_keys(&genre_weight, TOP_GENRES);
        let top_artists = top_keys(&artist_weight, TOP_ARTISTS);

        self.catalog
            .tracks
            .iter()
            .filter(|t| !known.contains(&t.id))
            .filter(|t| {
                top_genres.iter().any(|g| t.genre.eq_ignore_ascii_case(g))
                    || top_artists.iter().any(|a| t.artist.eq_ignore_ascii_case(a))
            })
            .take(RECOMMENDATION_LIMIT)
            .collect()
    }

    /// Catalog tracks ranked by how often they appear in listening history.
    pub fn trending(&self, history: &HistoryTracker, limit: usize) -> Vec<&Track> {
        let counts = history.play_counts();
        let mut ranked: Vec<(&Track, usize)> = self
            .catalog
            .tracks
            .iter()
            .filter_map(|t| counts.get(&t.id).map(|&c| (t, c)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(limit).map(|(t, _)| t).collect()
    }

    /// Albums newest-first by release year.
    pub fn new_releases(&self) -> Vec<&Album> {
        let mut albums: Vec<&Album> = self.catalog.albums.iter().collect();
        albums.sort_by(|a, b| b.year.cmp(&a.year));
        albums
    }

    pub fn featured_playlists(&self) -> &[PlaylistSeed] {
        &self.catalog.playlists
    }
}

fn top_keys<'a>(weights: &HashMap<&'a str, usize>, n: usize) -> Vec<&'a str> {
    let mut ranked: Vec<(&str, usize)> = weights.iter().map(|(&k, &v)| (k, v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.into_iter().take(n).map(|(k, _)| k).collect()
}
