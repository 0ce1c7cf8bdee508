//! Domain list managers: each owns an ordered in-memory collection mirrored
//! to the store, and exposes CRUD plus filter/sort/search over it. Rendering
//! is someone else's job; managers hand out data and the UI builds views.

mod albums;
mod discovery;
mod favorites;
mod history;
mod playlists;

pub use albums::{AlbumManager, AlbumSort};
pub use discovery::DiscoveryManager;
pub use favorites::{FavoriteEntry, FavoriteSort, FavoriteStats, FavoritesManager, FollowedArtists};
pub use history::{HistoryStats, HistoryTracker, TRACKER_HISTORY_CAP, TimeRange};
pub use playlists::{Playlist, PlaylistManager, PlaylistStats};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ManagerError {
    #[error("Track already exists in playlist")]
    DuplicateTrack,
    #[error("Cannot delete a default playlist")]
    DefaultPlaylist,
    #[error("Playlist not found")]
    PlaylistNotFound,
    #[error("Invalid position")]
    BadPosition,
    #[error("Could not read import data: {0}")]
    BadImport(String),
}
