//! Render functions for the TUI.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::Paragraph,
    Frame,
};

use super::{entries, feeds, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 8;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    // Header, main panels, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_main_panels(f, app, chunks[1]);
    status::render(f, app, chunks[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let title = app
        .loader
        .target()
        .read()
        .title()
        .map(str::to_string)
        .unwrap_or_else(|| "Feeds".to_string());
    let icon = if app.menu.is_hidden() {
        "☰"
    } else {
        "✕"
    };

    let header = Paragraph::new(format!(" {}  {}", icon, title))
        .style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(header, area);
}

/// Feed menu on the left while visible; the entry list takes the rest.
fn render_main_panels(f: &mut Frame, app: &App, area: Rect) {
    if app.menu.is_hidden() {
        entries::render(f, app, area);
        return;
    }

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    feeds::render(f, app, main_chunks[0]);
    entries::render(f, app, main_chunks[1]);
}
