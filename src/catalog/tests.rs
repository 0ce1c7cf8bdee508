use super::*;
use std::time::Duration;

#[test]
fn sample_catalog_has_fixed_ids() {
    let catalog = sample_catalog();
    assert_eq!(catalog.tracks.len(), 19);
    assert_eq!(catalog.tracks.first().map(|t| t.id), Some(TrackId(4)));
    assert_eq!(catalog.tracks.last().map(|t| t.id), Some(TrackId(22)));
    assert_eq!(catalog.albums.len(), 7);
    assert_eq!(catalog.albums[0].id, AlbumId(1));
    assert_eq!(catalog.playlists.len(), 5);
}

#[test]
fn track_lookup_by_id() {
    let catalog = sample_catalog();
    assert_eq!(catalog.track(TrackId(4)).map(|t| t.title.as_str()), Some("Midnight Dreams"));
    assert!(catalog.track(TrackId(999)).is_none());
}

#[test]
fn parse_duration_handles_display_strings() {
    assert_eq!(parse_duration("4:32"), Some(Duration::from_secs(272)));
    assert_eq!(parse_duration("0:07"), Some(Duration::from_secs(7)));
    assert_eq!(parse_duration("garbage"), None);
    assert_eq!(parse_duration("4"), None);
}

#[test]
fn format_time_pads_seconds() {
    assert_eq!(format_time(Duration::from_secs(272)), "4:32");
    assert_eq!(format_time(Duration::from_secs(65)), "1:05");
    assert_eq!(format_time(Duration::from_secs(0)), "0:00");
}

#[test]
fn fold_diacritics_strips_marks_and_substitutes_d() {
    assert_eq!(fold_diacritics("Nhạc Trẻ"), "nhac tre");
    assert_eq!(fold_diacritics("Đêm Đông"), "dem dong");
    assert_eq!(fold_diacritics("Beyoncé"), "beyonce");
}

#[test]
fn search_matches_accented_entries_with_plain_query() {
    let mut tracks = sample_tracks();
    tracks.push(Track {
        id: TrackId(99),
        title: "Nhạc Đêm Khuya".to_string(),
        artist: "Hương Giang".to_string(),
        album: "Tuyển Tập".to_string(),
        genre: "Ballad".to_string(),
        duration: "4:00".to_string(),
        file: "assets/audio/99.mp3".into(),
        cover: String::new(),
    });

    let hits = search_tracks(&tracks, "nhac");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, TrackId(99));

    // đ folds to d
    let hits = search_tracks(&tracks, "dem");
    assert!(hits.iter().any(|t| t.id == TrackId(99)));
}

#[test]
fn search_covers_all_fields_and_preserves_catalog_order() {
    let tracks = sample_tracks();

    // genre match
    let pop = search_tracks(&tracks, "pop");
    assert!(pop.iter().any(|t| t.id == TrackId(4)));
    assert!(pop.iter().any(|t| t.id == TrackId(20)));

    // artist match, case-insensitive
    let luna = search_tracks(&tracks, "LUNA");
    assert_eq!(luna.len(), 1);
    assert_eq!(luna[0].id, TrackId(4));

    // album match
    let electric = search_tracks(&tracks, "electric dreams");
    let ids: Vec<TrackId> = electric.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![TrackId(6), TrackId(19)]);
}

#[test]
fn empty_query_matches_nothing() {
    let tracks = sample_tracks();
    assert!(search_tracks(&tracks, "").is_empty());
    assert!(search_tracks(&tracks, "   ").is_empty());
}

#[test]
fn tracks_by_genre_is_case_insensitive() {
    let catalog = sample_catalog();
    assert_eq!(catalog.tracks_by_genre("rock").len(), 2);
    assert_eq!(catalog.tracks_by_genre("ROCK").len(), 2);
    assert!(catalog.tracks_by_genre("polka").is_empty());
}

#[test]
fn catalog_source_falls_back_to_samples() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = CatalogSource::new(dir.path());
    let catalog = source.load();
    assert_eq!(catalog.tracks.len(), 19);
}

#[test]
fn catalog_source_prefers_override_file() {
    let dir = tempfile::tempdir().unwrap();
    let custom = Catalog {
        tracks: vec![sample_tracks().remove(0)],
        albums: Vec::new(),
        playlists: Vec::new(),
    };
    std::fs::write(
        dir.path().join("catalog.json"),
        serde_json::to_string(&custom).unwrap(),
    )
    .unwrap();

    let mut source = CatalogSource::new(dir.path());
    let catalog = source.load();
    assert_eq!(catalog.tracks.len(), 1);
    assert_eq!(catalog.tracks[0].id, TrackId(4));
}

#[test]
fn catalog_source_caches_between_loads() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = CatalogSource::new(dir.path());
    let first = source.load();

    // Writing an override now must not be visible until the cache expires
    // or is invalidated.
    let custom = Catalog {
        tracks: Vec::new(),
        albums: Vec::new(),
        playlists: Vec::new(),
    };
    std::fs::write(
        dir.path().join("catalog.json"),
        serde_json::to_string(&custom).unwrap(),
    )
    .unwrap();

    let second = source.load();
    assert_eq!(first.tracks.len(), second.tracks.len());

    source.invalidate();
    let third = source.load();
    assert!(third.tracks.is_empty());
}
