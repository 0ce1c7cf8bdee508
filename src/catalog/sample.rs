//! The built-in demo data set. Track ids 4–22 and album ids 1–7 are fixed so
//! lookups and tests stay deterministic.

use std::path::PathBuf;

use super::model::{Album, AlbumId, Catalog, PlaylistId, PlaylistSeed, Track, TrackId};

fn track(
    id: u32,
    title: &str,
    artist: &str,
    album: &str,
    genre: &str,
    duration: &str,
    cover: &str,
) -> Track {
    Track {
        id: TrackId(id),
        title: title.to_string(),
        artist: artist.to_string(),
        album: album.to_string(),
        genre: genre.to_string(),
        duration: duration.to_string(),
        file: PathBuf::from(format!("assets/audio/{id}.mp3")),
        cover: cover.to_string(),
    }
}

pub fn sample_tracks() -> Vec<Track> {
    vec![
        track(4, "Midnight Dreams", "Luna Eclipse", "Nocturnal Sessions", "Pop", "4:32", "https://images.unsplash.com/photo-1487180144351-b8472da7d491?w=300&h=300&fit=crop"),
        track(5, "Summer Breeze", "The Sunshine Band", "Summer Hits 2024", "Rock", "3:45", "https://images.unsplash.com/photo-1619983081563-430f63602796?w=300&h=300&fit=crop"),
        track(6, "Electric Pulse", "DJ Nova", "Electric Dreams", "Electronic", "5:12", "https://images.unsplash.com/photo-1506157786151-b8491531f063?w=300&h=300&fit=crop"),
        track(7, "Acoustic Dreams", "James Rivers", "Acoustic Sessions", "Folk", "4:18", "https://images.unsplash.com/photo-1598488035139-bdbb2231ce04?w=300&h=300&fit=crop"),
        track(8, "Urban Flow", "MC Flow", "Urban Tales", "Hip Hop", "3:56", "https://images.unsplash.com/photo-1509114397022-ed747cca3f65?w=300&h=300&fit=crop"),
        track(9, "Jazz Nights", "Miles Davis Jr", "Jazz Vibes", "Jazz", "6:23", "https://images.unsplash.com/photo-1514320291840-2e0a9bf2a9ae?w=300&h=300&fit=crop"),
        track(10, "Rock Anthem", "Thunder Strike", "Rock Legends", "Rock", "4:45", "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?w=300&h=300&fit=crop"),
        track(11, "Chill Vibes", "Relaxo", "Chill Collection", "Ambient", "7:12", "https://images.unsplash.com/photo-1485579149621-3123dd979885?w=300&h=300&fit=crop"),
        track(12, "Dance Floor", "Beat Master", "Dance Hits", "Dance", "3:28", "https://images.unsplash.com/photo-1507838153414-b4b713384a76?w=300&h=300&fit=crop"),
        track(13, "Country Road", "Nashville Stars", "Country Classics", "Country", "4:02", "https://images.unsplash.com/photo-1510915361894-db8b60106cb1?w=300&h=300&fit=crop"),
        track(14, "Classical Symphony", "Orchestra Vienna", "Classical Masterpieces", "Classical", "8:45", "https://images.unsplash.com/photo-1499415479124-43c32433a620?w=300&h=300&fit=crop"),
        track(15, "Reggae Sunshine", "Island Vibes", "Reggae Collection", "Reggae", "4:33", "https://images.unsplash.com/photo-1470225620780-dba8ba36b745?w=300&h=300&fit=crop"),
        track(16, "Blues Soul", "B.B. King Jr", "Blues Masters", "Blues", "5:21", "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?w=300&h=300&fit=crop"),
        track(17, "Metal Storm", "Iron Thunder", "Metal Collection", "Metal", "6:15", "https://images.unsplash.com/photo-1459749411175-04bf5292ceea?w=300&h=300&fit=crop"),
        track(18, "Folk Tales", "Mountain Echo", "Folk Stories", "Folk", "4:56", "https://images.unsplash.com/photo-1571330735066-03aaa9429d89?w=300&h=300&fit=crop"),
        track(19, "Electronic Dreams", "Synth Wave", "Electric Dreams", "Electronic", "5:44", "https://images.unsplash.com/photo-1516280440614-37939bbacd81?w=300&h=300&fit=crop"),
        track(20, "Pop Star", "Melody Queen", "Pop Hits 2024", "Pop", "3:33", "https://images.unsplash.com/photo-1511671782779-c97d3d27a1d4?w=300&h=300&fit=crop"),
        track(21, "Indie Spirit", "Indie Collective", "Indie Sounds", "Indie", "4:27", "https://images.unsplash.com/photo-1485579149621-3123dd979885?w=300&h=300&fit=crop"),
        track(22, "World Music", "Global Sounds", "World Collection", "World", "5:18", "https://images.unsplash.com/photo-1507838153414-b4b713384a76?w=300&h=300&fit=crop"),
    ]
}

fn album(id: u32, title: &str, artist: &str, year: u16, tracks: &[u32]) -> Album {
    Album {
        id: AlbumId(id),
        title: title.to_string(),
        artist: artist.to_string(),
        year,
        tracks: tracks.iter().copied().map(TrackId).collect(),
    }
}

pub fn sample_albums() -> Vec<Album> {
    vec![
        album(1, "Nocturnal Sessions", "Luna Eclipse", 2024, &[4]),
        album(2, "Summer Hits 2024", "The Sunshine Band", 2024, &[5]),
        album(3, "Electric Dreams", "DJ Nova", 2024, &[6, 19]),
        album(4, "Acoustic Sessions", "James Rivers", 2023, &[7]),
        album(5, "Urban Tales", "MC Flow", 2021, &[8]),
        album(6, "Jazz Vibes", "Miles Davis Jr", 2023, &[9]),
        album(7, "Rock Legends", "Thunder Strike", 2022, &[10]),
    ]
}

fn playlist(id: u32, name: &str, description: &str, tracks: &[u32]) -> PlaylistSeed {
    PlaylistSeed {
        id: PlaylistId(id),
        name: name.to_string(),
        description: description.to_string(),
        tracks: tracks.iter().copied().map(TrackId).collect(),
    }
}

pub fn sample_playlist_seeds() -> Vec<PlaylistSeed> {
    vec![
        playlist(1, "My Favorites", "My personal favorites", &[4, 5, 6]),
        playlist(2, "Workout Mix", "High energy workout music", &[5, 8, 12, 17]),
        playlist(3, "Chill Out", "Relaxing music for chill time", &[7, 9, 11, 15]),
        playlist(4, "Party Time", "Party and dance music", &[5, 12, 20, 22]),
        playlist(5, "Study Focus", "Music for concentration", &[9, 11, 14, 18]),
    ]
}

pub fn sample_catalog() -> Catalog {
    Catalog {
        tracks: sample_tracks(),
        albums: sample_albums(),
        playlists: sample_playlist_seeds(),
    }
}
