use serde::{Deserialize, Serialize};

use crate::storage::Store;

pub const SETTINGS_KEY: &str = "settings";

/// The active theme name is mirrored under its own key so it can be read
/// without deserializing the whole settings object.
pub const THEME_KEY: &str = "theme";

/// Top-level application settings.
///
/// Precedence (highest wins):
/// 1) Values previously saved through the store (`settings` key)
/// 2) Environment variables (prefix `GROOVEZILLA__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub display: DisplaySettings,
    pub privacy: PrivacySettings,
    pub notifications: NotificationSettings,
    pub storage: StorageSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio: AudioSettings::default(),
            playback: PlaybackSettings::default(),
            display: DisplaySettings::default(),
            privacy: PrivacySettings::default(),
            notifications: NotificationSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Playback volume, 0–100.
    pub volume: u8,
    pub quality: Quality,
    pub crossfade: bool,
    /// Crossfade duration in seconds, used only when `crossfade` is on.
    pub crossfade_duration: u8,
    pub normalize: bool,
    pub gapless_playback: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 70,
            quality: Quality::High,
            crossfade: false,
            crossfade_duration: 5,
            normalize: true,
            gapless_playback: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    pub autoplay: bool,
    pub repeat_mode: RepeatMode,
    pub shuffle_mode: bool,
    pub show_lyrics: bool,
    pub auto_skip_disliked: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            autoplay: true,
            repeat_mode: RepeatMode::Off,
            shuffle_mode: false,
            show_lyrics: true,
            auto_skip_disliked: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub theme: ThemeName,
    pub language: String,
    pub show_animations: bool,
    pub compact_mode: bool,
    pub show_cover_in_background: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            theme: ThemeName::Dark,
            language: "en".to_string(),
            show_animations: true,
            compact_mode: false,
            show_cover_in_background: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacySettings {
    pub private_session: bool,
    pub show_listening_activity: bool,
    pub allow_recommendations: bool,
    pub share_listening_history: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            private_session: false,
            show_listening_activity: true,
            allow_recommendations: true,
            share_listening_history: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub new_releases: bool,
    pub friend_activity: bool,
    pub recommendations: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            new_releases: true,
            friend_activity: true,
            recommendations: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub download_quality: Quality,
    /// Local cache budget in megabytes.
    pub max_storage_size_mb: u32,
    pub auto_download: bool,
    pub offline_mode: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            download_quality: Quality::High,
            max_storage_size_mb: 5000,
            auto_download: false,
            offline_mode: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    High,
    Lossless,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    Off,
    One,
    All,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Dark,
    Light,
}

impl Settings {
    /// Persist the full settings object.
    pub fn save(&self, store: &Store) -> bool {
        store.set(SETTINGS_KEY, self)
    }

    // Explicit per-field setters; every mutation goes through the store so
    // the persisted copy never drifts from the in-memory one.

    pub fn set_volume(&mut self, store: &Store, volume: u8) {
        self.audio.volume = volume.min(100);
        self.save(store);
    }

    pub fn set_quality(&mut self, store: &Store, quality: Quality) {
        self.audio.quality = quality;
        self.save(store);
    }

    pub fn set_crossfade(&mut self, store: &Store, on: bool) {
        self.audio.crossfade = on;
        self.save(store);
    }

    pub fn set_crossfade_duration(&mut self, store: &Store, seconds: u8) {
        self.audio.crossfade_duration = seconds;
        self.save(store);
    }

    pub fn set_normalize(&mut self, store: &Store, on: bool) {
        self.audio.normalize = on;
        self.save(store);
    }

    pub fn set_gapless_playback(&mut self, store: &Store, on: bool) {
        self.audio.gapless_playback = on;
        self.save(store);
    }

    pub fn set_autoplay(&mut self, store: &Store, on: bool) {
        self.playback.autoplay = on;
        self.save(store);
    }

    pub fn set_repeat_mode(&mut self, store: &Store, mode: RepeatMode) {
        self.playback.repeat_mode = mode;
        self.save(store);
    }

    pub fn set_shuffle_mode(&mut self, store: &Store, on: bool) {
        self.playback.shuffle_mode = on;
        self.save(store);
    }

    pub fn set_show_lyrics(&mut self, store: &Store, on: bool) {
        self.playback.show_lyrics = on;
        self.save(store);
    }

    pub fn set_auto_skip_disliked(&mut self, store: &Store, on: bool) {
        self.playback.auto_skip_disliked = on;
        self.save(store);
    }

    pub fn set_theme(&mut self, store: &Store, theme: ThemeName) {
        self.display.theme = theme;
        store.set(THEME_KEY, &theme);
        self.save(store);
    }

    pub fn set_language(&mut self, store: &Store, language: String) {
        self.display.language = language;
        self.save(store);
    }

    pub fn set_show_animations(&mut self, store: &Store, on: bool) {
        self.display.show_animations = on;
        self.save(store);
    }

    pub fn set_compact_mode(&mut self, store: &Store, on: bool) {
        self.display.compact_mode = on;
        self.save(store);
    }

    pub fn set_show_cover_in_background(&mut self, store: &Store, on: bool) {
        self.display.show_cover_in_background = on;
        self.save(store);
    }

    pub fn set_private_session(&mut self, store: &Store, on: bool) {
        self.privacy.private_session = on;
        self.save(store);
    }

    pub fn set_show_listening_activity(&mut self, store: &Store, on: bool) {
        self.privacy.show_listening_activity = on;
        self.save(store);
    }

    pub fn set_allow_recommendations(&mut self, store: &Store, on: bool) {
        self.privacy.allow_recommendations = on;
        self.save(store);
    }

    pub fn set_share_listening_history(&mut self, store: &Store, on: bool) {
        self.privacy.share_listening_history = on;
        self.save(store);
    }

    pub fn set_notifications_enabled(&mut self, store: &Store, on: bool) {
        self.notifications.enabled = on;
        self.save(store);
    }

    pub fn set_notify_new_releases(&mut self, store: &Store, on: bool) {
        self.notifications.new_releases = on;
        self.save(store);
    }

    pub fn set_notify_friend_activity(&mut self, store: &Store, on: bool) {
        self.notifications.friend_activity = on;
        self.save(store);
    }

    pub fn set_notify_recommendations(&mut self, store: &Store, on: bool) {
        self.notifications.recommendations = on;
        self.save(store);
    }

    pub fn set_download_quality(&mut self, store: &Store, quality: Quality) {
        self.storage.download_quality = quality;
        self.save(store);
    }

    pub fn set_max_storage_size_mb(&mut self, store: &Store, mb: u32) {
        self.storage.max_storage_size_mb = mb;
        self.save(store);
    }

    pub fn set_auto_download(&mut self, store: &Store, on: bool) {
        self.storage.auto_download = on;
        self.save(store);
    }

    pub fn set_offline_mode(&mut self, store: &Store, on: bool) {
        self.storage.offline_mode = on;
        self.save(store);
    }

    /// Session volume as a 0.0–1.0 factor for the audio backend.
    pub fn volume_factor(&self) -> f32 {
        f32::from(self.audio.volume.min(100)) / 100.0
    }
}
