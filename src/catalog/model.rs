use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(pub u32);

/// A single playable track. Immutable once loaded from the sample set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// Display duration, `"m:ss"`.
    pub duration: String,
    /// Media source locator; a `.m3u8` suffix selects the adaptive path.
    pub file: PathBuf,
    pub cover: String,
}

impl Track {
    pub fn display(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }

    /// Parsed form of the `"m:ss"` display duration.
    pub fn duration_secs(&self) -> Option<Duration> {
        parse_duration(&self.duration)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub artist: String,
    pub year: u16,
    pub tracks: Vec<TrackId>,
}

/// A curated playlist shipped with the sample data (distinct from user playlists).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSeed {
    pub id: PlaylistId,
    pub name: String,
    pub description: String,
    pub tracks: Vec<TrackId>,
}

/// The full in-memory data set the app runs against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub tracks: Vec<Track>,
    pub albums: Vec<Album>,
    pub playlists: Vec<PlaylistSeed>,
}

impl Catalog {
    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn album(&self, id: AlbumId) -> Option<&Album> {
        self.albums.iter().find(|a| a.id == id)
    }

    pub fn playlist(&self, id: PlaylistId) -> Option<&PlaylistSeed> {
        self.playlists.iter().find(|p| p.id == id)
    }

    /// Tracks whose genre matches `genre` case-insensitively.
    pub fn tracks_by_genre(&self, genre: &str) -> Vec<&Track> {
        self.tracks
            .iter()
            .filter(|t| t.genre.eq_ignore_ascii_case(genre))
            .collect()
    }
}

/// Parse a `"m:ss"` display duration. Returns `None` for malformed input.
pub fn parse_duration(display: &str) -> Option<Duration> {
    let (min, sec) = display.split_once(':')?;
    let min: u64 = min.trim().parse().ok()?;
    let sec: u64 = sec.trim().parse().ok()?;
    Some(Duration::from_secs(min * 60 + sec))
}

/// Format a duration as `"m:ss"` for display.
pub fn format_time(d: Duration) -> String {
    let total = d.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
