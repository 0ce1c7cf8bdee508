//! Application context and page-level UI state.
//!
//! One `App` instance exists per process and is passed explicitly to the
//! event loop and renderer; every manager gets its collaborators through
//! construction rather than reaching for globals.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::catalog::{Catalog, Track, TrackId};
use crate::managers::{
    AlbumManager, DiscoveryManager, FavoritesManager, FollowedArtists, HistoryTracker,
    ManagerError, PlaylistManager,
};
use crate::player::PlayerController;
use crate::settings::Settings;
use crate::storage::Store;

const NOTICE_TTL: Duration = Duration::from_secs(3);
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

const NAV_HISTORY_CAP: usize = 50;
const SEARCH_HISTORY_CAP: usize = 20;

const NAV_HISTORY_KEY: &str = "nav_history";
const SEARCH_HISTORY_KEY: &str = "search_history";

/// The pages the UI can show.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Page {
    Home,
    Albums,
    Playlists,
    Favorites,
    History,
    Discover,
    Settings,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Albums => "Albums",
            Page::Playlists => "Playlists",
            Page::Favorites => "Favorites",
            Page::History => "History",
            Page::Discover => "Discover",
            Page::Settings => "Settings",
        }
    }

    pub const ALL: [Page; 7] = [
        Page::Home,
        Page::Albums,
        Page::Playlists,
        Page::Favorites,
        Page::History,
        Page::Discover,
        Page::Settings,
    ];
}

/// A transient user-facing message; expires after a few seconds.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    shown_at: Instant,
}

/// Search-as-you-type state. Keystrokes only stage the query; the actual
/// search runs once the input has been quiet for the debounce window.
#[derive(Debug, Default)]
struct SearchState {
    pending: Option<Instant>,
    results: Vec<TrackId>,
}

pub struct App {
    pub store: Arc<Store>,
    pub catalog: Arc<Catalog>,
    pub settings: Settings,
    pub player: PlayerController,
    pub playlists: PlaylistManager,
    pub favorites: FavoritesManager,
    pub history: HistoryTracker,
    pub discovery: DiscoveryManager,
    pub albums: AlbumManager,
    pub followed: FollowedArtists,

    pub page: Page,
    pub selected: usize,
    pub filter_mode: bool,
    pub filter_query: String,
    pub should_quit: bool,

    search: SearchState,
    notices: VecDeque<Notice>,
    nav_history: Vec<Page>,
    search_history: Vec<String>,
}

impl App {
    pub fn new(
        store: Arc<Store>,
        catalog: Arc<Catalog>,
        settings: Settings,
        player: PlayerController,
    ) -> Self {
        let playlists = PlaylistManager::new(store.clone());
        let favorites = FavoritesManager::new(store.clone());
        let history = HistoryTracker::new(store.clone());
        let discovery = DiscoveryManager::new(catalog.clone());
        let albums = AlbumManager::new(catalog.clone());
        let followed = FollowedArtists::new(store.clone());
        let nav_history = store.get_or(NAV_HISTORY_KEY, Vec::new());
        let search_history = store.get_or(SEARCH_HISTORY_KEY, Vec::new());

        Self {
            store,
            catalog,
            settings,
            player,
            playlists,
            favorites,
            history,
            discovery,
            albums,
            followed,
            page: Page::Home,
            selected: 0,
            filter_mode: false,
            filter_query: String::new(),
            should_quit: false,
            search: SearchState::default(),
            notices: VecDeque::new(),
            nav_history,
            search_history,
        }
    }

    // -- navigation --------------------------------------------------------

    /// Switch pages, remembering where we came from.
    pub fn navigate(&mut self, page: Page) {
        if page == self.page {
            return;
        }
        self.nav_history.push(self.page);
        if self.nav_history.len() > NAV_HISTORY_CAP {
            self.nav_history.remove(0);
        }
        self.store.set(NAV_HISTORY_KEY, &self.nav_history);
        self.page = page;
        self.selected = 0;
        if page == Page::History {
            self.history.refresh();
        }
    }

    /// Return to the previously visited page, if any.
    pub fn navigate_back(&mut self) {
        if let Some(page) = self.nav_history.pop() {
            self.store.set(NAV_HISTORY_KEY, &self.nav_history);
            self.page = page;
            self.selected = 0;
        }
    }

    pub fn nav_history(&self) -> &[Page] {
        &self.nav_history
    }

    // -- selection ---------------------------------------------------------

    /// Number of selectable rows on the current page.
    pub fn row_count(&self) -> usize {
        match self.page {
            Page::Home => self.visible_tracks().len(),
            Page::Albums => self.albums.all().len(),
            Page::Playlists => self.playlists.all().len(),
            Page::Favorites => self.favorites.len(),
            Page::History => self.history.all().len(),
            Page::Discover => self
                .discovery
                .recommendations(&self.favorites, &self.history)
                .len(),
            Page::Settings => 0,
        }
    }

    pub fn select_next(&mut self) {
        let rows = self.row_count();
        if rows > 0 {
            self.selected = (self.selected + 1) % rows;
        }
    }

    pub fn select_prev(&mut self) {
        let rows = self.row_count();
        if rows > 0 {
            self.selected = if self.selected == 0 {
                rows - 1
            } else {
                self.selected - 1
            };
        }
    }

    /// The track list the current page would play from, honoring an active
    /// filter on the Home page.
    pub fn visible_tracks(&self) -> Vec<&Track> {
        match self.page {
            Page::Home => {
                if self.search.results.is_empty() && self.filter_query.trim().is_empty() {
                    self.catalog.tracks.iter().collect()
                } else {
                    self.search
                        .results
                        .iter()
                        .filter_map(|&id| self.catalog.track(id))
                        .collect()
                }
            }
            Page::Favorites => self.favorites.all().iter().map(|f| &f.track).collect(),
            Page::History => self.history.all().iter().map(|e| &e.track).collect(),
            Page::Discover => self.discovery.recommendations(&self.favorites, &self.history),
            _ => Vec::new(),
        }
    }

    /// Play whatever row is selected, queueing the rest of the page's list.
    pub fn activate_selected(&mut self) {
        match self.page {
            Page::Albums => {
                if let Some(album) = self.albums.all().get(self.selected) {
                    let queue = album.tracks.clone();
                    if let Some(&first) = queue.first() {
                        self.player.play_track(first, Some(queue));
                    }
                }
            }
            Page::Playlists => {
                if let Some(playlist) = self.playlists.all().get(self.selected) {
                    let queue = playlist.tracks.clone();
                    if let Some(&first) = queue.first() {
                        self.player.play_track(first, Some(queue));
                    } else {
                        self.push_notice("Playlist is empty");
                    }
                }
            }
            _ => {
                let queue: Vec<TrackId> = self.visible_tracks().iter().map(|t| t.id).collect();
                if let Some(&id) = queue.get(self.selected) {
                    self.player.play_track(id, Some(queue));
                }
            }
        }
    }

    /// Follow or unfollow the selected row's artist, falling back to the
    /// playing track's artist when the page has no track rows.
    pub fn toggle_follow_selected(&mut self) {
        let artist = self
            .visible_tracks()
            .get(self.selected)
            .map(|t| t.artist.clone())
            .or_else(|| self.player.current_track().map(|t| t.artist.clone()));
        let Some(artist) = artist else {
            return;
        };
        if self.followed.toggle(&artist) {
            self.push_notice(format!("Following {artist}"));
        } else {
            self.push_notice(format!("Unfollowed {artist}"));
        }
    }

    // -- filter / search ---------------------------------------------------

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
    }

    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    pub fn clear_filter(&mut self) {
        self.filter_mode = false;
        self.filter_query.clear();
        self.search = SearchState::default();
        self.selected = 0;
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.search.pending = Some(Instant::now());
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        if self.filter_query.is_empty() {
            self.search = SearchState::default();
        } else {
            self.search.pending = Some(Instant::now());
        }
    }

    pub fn search_results(&self) -> &[TrackId] {
        &self.search.results
    }

    pub fn search_history(&self) -> &[String] {
        &self.search_history
    }

    fn run_pending_search(&mut self) {
        let query = self.filter_query.trim().to_string();
        self.search.results = self
            .player
            .search_tracks(&query)
            .iter()
            .map(|t| t.id)
            .collect();
        self.selected = 0;
        if query.is_empty() {
            return;
        }
        // Most-recent-first, deduplicated, capped.
        self.search_history.retain(|q| q != &query);
        self.search_history.insert(0, query);
        self.search_history.truncate(SEARCH_HISTORY_CAP);
        self.store.set(SEARCH_HISTORY_KEY, &self.search_history);
    }

    // -- notices -----------------------------------------------------------

    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.notices.push_back(Notice {
            text: text.into(),
            shown_at: Instant::now(),
        });
    }

    /// Push the user-facing form of a manager failure.
    pub fn notice_error(&mut self, err: ManagerError) {
        self.push_notice(err.to_string());
    }

    pub fn active_notices(&self) -> impl Iterator<Item = &str> {
        self.notices.iter().map(|n| n.text.as_str())
    }

    // -- frame tick --------------------------------------------------------

    /// Advance time-driven state: playback polling, queued notices from the
    /// controller, notice expiry, and the search debounce.
    pub fn tick(&mut self) {
        self.player.poll();
        for text in self.player.take_notices() {
            self.push_notice(text);
        }
        let now = Instant::now();
        while let Some(front) = self.notices.front() {
            if now.duration_since(front.shown_at) >= NOTICE_TTL {
                self.notices.pop_front();
            } else {
                break;
            }
        }
        if let Some(staged) = self.search.pending {
            if now.duration_since(staged) >= SEARCH_DEBOUNCE {
                self.search.pending = None;
                self.run_pending_search();
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn flush_search(&mut self) {
        self.search.pending = None;
        self.run_pending_search();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
