//! Main terminal event loop: input handling, frame ticks and drawing.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Page};
use crate::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key_event(key, app);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key_event(key: KeyEvent, app: &mut App) {
    // While the search field has focus, keystrokes edit the query; transport
    // and navigation keys (including the seek arrows) are not interpreted.
    if app.filter_mode {
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Enter => app.exit_filter_mode(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.push_filter_char(c);
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        // transport
        KeyCode::Char(' ') => app.player.toggle_play_pause(),
        KeyCode::Char('h') => app.player.previous_track(),
        KeyCode::Char('l') => app.player.next_track(),
        KeyCode::Left | KeyCode::Char('H') => app.player.seek_backward(),
        KeyCode::Right | KeyCode::Char('L') => app.player.seek_forward(),
        KeyCode::Char('s') => app.player.toggle_shuffle(),
        KeyCode::Char('r') => app.player.toggle_repeat(),
        KeyCode::Char('f') => toggle_like_selected(app),
        KeyCode::Char('F') => app.toggle_follow_selected(),

        // selection and pages
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => app.activate_selected(),
        KeyCode::Tab => cycle_page(app, 1),
        KeyCode::BackTab => cycle_page(app, -1),
        KeyCode::Backspace => app.navigate_back(),
        KeyCode::Char('/') => app.enter_filter_mode(),

        // collection maintenance
        KeyCode::Char('E') => export_collections(app),
        KeyCode::Char('I') => import_collections(app),
        KeyCode::Char('d') => delete_selected_playlist(app),

        _ => {}
    }
}

/// Like the selected row's track, or the playing track when the page has no
/// track rows.
fn toggle_like_selected(app: &mut App) {
    let target = app.visible_tracks().get(app.selected).map(|t| t.id);
    match target {
        Some(id) => app.player.toggle_like_for_track(id),
        None => app.player.toggle_like(),
    }
}

fn cycle_page(app: &mut App, step: isize) {
    let pages = Page::ALL;
    let pos = pages.iter().position(|&p| p == app.page).unwrap_or(0) as isize;
    let next = (pos + step).rem_euclid(pages.len() as isize) as usize;
    app.navigate(pages[next]);
}

fn delete_selected_playlist(app: &mut App) {
    if app.page != Page::Playlists {
        return;
    }
    let Some(id) = app.playlists.all().get(app.selected).map(|p| p.id) else {
        return;
    };
    match app.playlists.delete(id) {
        Ok(()) => {
            app.selected = 0;
            app.push_notice("Playlist deleted");
        }
        Err(e) => app.notice_error(e),
    }
}

fn export_collections(app: &mut App) {
    let dir = app.store.dir().to_path_buf();
    let playlists = app.playlists.export();
    let favorites = app.favorites.export();
    let mut ok = std::fs::write(dir.join("playlists_export.json"), playlists).is_ok();
    ok &= std::fs::write(dir.join("favorites_export.json"), favorites).is_ok();
    if ok {
        app.push_notice("Collections exported");
    } else {
        app.push_notice("Export failed");
    }
}

fn import_collections(app: &mut App) {
    let dir = app.store.dir().to_path_buf();
    let mut imported = false;
    if let Ok(json) = std::fs::read_to_string(dir.join("playlists_export.json")) {
        match app.playlists.import(&json) {
            Ok(_) => imported = true,
            Err(e) => app.notice_error(e),
        }
    }
    if let Ok(json) = std::fs::read_to_string(dir.join("favorites_export.json")) {
        match app.favorites.import(&json) {
            Ok(_) => imported = true,
            Err(e) => app.notice_error(e),
        }
    }
    if imported {
        app.push_notice("Collections imported");
    } else {
        app.push_notice("Nothing to import");
    }
}
