//! UI rendering for the terminal interface.
//!
//! Rendering is split in two: `view` builds plain typed view-models from the
//! app state, and `draw` maps those onto `ratatui` widgets. Nothing in here
//! mutates the app.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Page};
use crate::player::PlaybackState;
use crate::settings::ThemeName;

/// Color palette derived from the display theme.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self {
                accent: Color::Magenta,
                text: Color::White,
                dim: Color::DarkGray,
                highlight_bg: Color::Rgb(60, 40, 80),
            },
            ThemeName::Light => Self {
                accent: Color::Blue,
                text: Color::Black,
                dim: Color::Gray,
                highlight_bg: Color::Rgb(200, 210, 240),
            },
        }
    }
}

/// What the transport bar shows for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBarView {
    pub track_line: String,
    pub time_line: String,
    pub state: PlaybackState,
    pub liked: bool,
    pub shuffled: bool,
    pub repeating: bool,
    pub volume_pct: u8,
}

impl PlayerBarView {
    pub fn build(app: &App) -> Self {
        let session = app.player.session();
        let (track_line, liked) = match app.player.current_track() {
            Some(track) => (track.display(), app.player.is_liked(track.id)),
            None => ("Nothing playing".to_string(), false),
        };
        Self {
            track_line,
            time_line: app.player.progress_label(),
            state: app.player.state(),
            liked,
            shuffled: session.shuffled,
            repeating: session.repeating,
            volume_pct: (session.volume * 100.0).round() as u8,
        }
    }

    fn status_line(&self) -> String {
        let state = match self.state {
            PlaybackState::Idle => "∙",
            PlaybackState::Playing => "▶",
            PlaybackState::Paused => "⏸",
        };
        let mut parts = vec![format!("{state} {}", self.track_line)];
        if self.state != PlaybackState::Idle {
            parts.push(self.time_line.clone());
        }
        if self.liked {
            parts.push("♥".to_string());
        }
        if self.shuffled {
            parts.push("Shuffle".to_string());
        }
        if self.repeating {
            parts.push("Repeat".to_string());
        }
        parts.push(format!("Vol {}%", self.volume_pct));
        parts.join("  |  ")
    }
}

/// One row of the main list, already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub text: String,
    pub dim: bool,
}

/// Build the rows the current page shows.
pub fn page_rows(app: &App) -> Vec<Row> {
    match app.page {
        Page::Albums => app
            .albums
            .all()
            .iter()
            .map(|a| Row {
                text: format!("{} - {} ({}) [{} tracks]", a.artist, a.title, a.year, a.tracks.len()),
                dim: false,
            })
            .collect(),
        Page::Playlists => app
            .playlists
            .all()
            .iter()
            .map(|p| Row {
                text: format!("{} [{} tracks] {}", p.name, p.tracks.len(), p.description),
                dim: p.is_default,
            })
            .collect(),
        Page::History => app
            .history
            .all()
            .iter()
            .map(|e| Row {
                text: format!("{} ({}s played)", e.track.display(), e.play_duration_secs),
                dim: false,
            })
            .collect(),
        Page::Settings => settings_rows(app),
        _ => app
            .visible_tracks()
            .iter()
            .map(|t| {
                let mut text = format!("{}  [{}]  {}", t.display(), t.duration, t.genre);
                if app.player.is_liked(t.id) {
                    text.push_str("  ♥");
                }
                Row { text, dim: false }
            })
            .collect(),
    }
}

fn settings_rows(app: &App) -> Vec<Row> {
    let s = &app.settings;
    [
        format!("Volume: {}", s.audio.volume),
        format!("Quality: {:?}", s.audio.quality),
        format!("Repeat: {:?}", s.playback.repeat_mode),
        format!("Shuffle: {}", s.playback.shuffle_mode),
        format!("Autoplay: {}", s.playback.autoplay),
        format!("Theme: {:?}", s.display.theme),
        format!("Language: {}", s.display.language),
        format!("Notifications: {}", s.notifications.enabled),
        format!("Max storage (MB): {}", s.storage.max_storage_size_mb),
    ]
    .into_iter()
    .map(|text| Row { text, dim: false })
    .collect()
}

/// List title for the current page, with summary stats where they exist.
fn page_title(app: &App) -> String {
    match app.page {
        Page::History => {
            let stats = app.history.stats();
            format!(
                " History | {} plays, {} tracks, {} listened ",
                stats.total_plays,
                stats.unique_tracks,
                crate::catalog::format_time(std::time::Duration::from_secs(
                    stats.total_listening_secs
                )),
            )
        }
        Page::Favorites => {
            let stats = app.favorites.stats();
            match stats.top_genre {
                Some(genre) => format!(" Favorites | {} tracks, mostly {} ", stats.count, genre),
                None => " Favorites ".to_string(),
            }
        }
        page => format!(" {} ", page.title()),
    }
}

fn tabs_line(current: Page) -> String {
    Page::ALL
        .iter()
        .map(|p| {
            if *p == current {
                format!("[{}]", p.title())
            } else {
                p.title().to_string()
            }
        })
        .collect::<Vec<String>>()
        .join("  ")
}

const CONTROLS: &str = "[j/k] up/down | [enter] play | [space] play/pause | [h/l] prev/next | \
[H/L] seek -/+10s | [/] search | [s] shuffle | [r] repeat | [f] like | [Tab] page | \
[Backspace] back | [q] quit";

fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);
    Rect {
        x: r.x + (r.width.saturating_sub(width) / 2),
        y: r.y + (r.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

/// Render the whole frame from the app state.
pub fn draw(frame: &mut Frame, app: &App) {
    let theme = Theme::from_name(app.settings.display.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header: page tabs.
    let header = Paragraph::new(tabs_line(app.page))
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.accent))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" groovezilla ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Main list, windowed around the selection.
    {
        let rows = page_rows(app);
        let total = rows.len();
        let list_height = chunks[1].height.saturating_sub(2) as usize;
        let sel = app.selected.min(total.saturating_sub(1));
        let (start, end, sel_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel)
        } else {
            let half = list_height / 2;
            let mut start = sel.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel - start)
        };

        let items: Vec<ListItem> = rows[start..end]
            .iter()
            .map(|row| {
                let style = if row.dim {
                    Style::default().fg(theme.dim)
                } else {
                    Style::default().fg(theme.text)
                };
                ListItem::new(row.text.clone()).style(style)
            })
            .collect();

        let title = if app.filter_mode || !app.filter_query.is_empty() {
            format!(" {} | search: {}_ ", app.page.title(), app.filter_query)
        } else {
            page_title(app)
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .bg(theme.highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(sel_visible));
        }
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    // Transport bar.
    let bar = PlayerBarView::build(app);
    let bar_par = Paragraph::new(bar.status_line())
        .style(Style::default().fg(theme.text))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" player "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(bar_par, chunks[2]);

    // Footer: controls.
    let footer = Paragraph::new(CONTROLS)
        .style(Style::default().fg(theme.dim))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    // Notices float over the list area, newest at the bottom.
    let notices: Vec<&str> = app.active_notices().collect();
    if !notices.is_empty() {
        let text = notices.join("\n");
        let height = (notices.len() as u16).saturating_add(2);
        let area = centered_rect_sized(44, height, chunks[1]);
        frame.render_widget(Clear, area);
        let popup = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.accent))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(popup, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_palettes_differ() {
        let dark = Theme::from_name(ThemeName::Dark);
        let light = Theme::from_name(ThemeName::Light);
        assert_ne!(dark.text, light.text);
    }

    #[test]
    fn tabs_line_marks_the_current_page() {
        let line = tabs_line(Page::Albums);
        assert!(line.contains("[Albums]"));
        assert!(line.contains("Home"));
        assert!(!line.contains("[Home]"));
    }

    #[test]
    fn centered_rect_stays_inside_the_area() {
        let outer = Rect::new(0, 0, 80, 24);
        let inner = centered_rect_sized(44, 5, outer);
        assert!(inner.x + inner.width <= outer.width);
        assert!(inner.y + inner.height <= outer.height);
    }
}
