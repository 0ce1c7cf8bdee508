//! Audio playback: session state machine, transport controls, like/history
//! side effects and media-source loading.
//!
//! The controller is the single point of control for what is playing. It
//! drives an [`AudioBackend`] (rodio behind a command thread in production, a
//! fake in tests) and resolves media through a [`MediaLoader`] strategy picked
//! once at startup.

mod backend;
mod controller;
mod session;
mod source;

pub use backend::{AudioBackend, PlaybackError, RodioBackend};
pub use controller::{HISTORY_THRESHOLD, PLAYER_HISTORY_CAP, PlayerController, PlayerError};
pub use session::{HistoryEntry, LikeSet, PlaybackSession, PlaybackState};
pub use source::{
    HlsManifestLoader, MediaError, MediaLoader, ResolvedSource, is_adaptive_manifest,
    select_media_loader,
};

#[cfg(test)]
mod tests;
