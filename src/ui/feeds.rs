use crate::app::App;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the feed menu panel
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let max_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = app
        .registry()
        .list()
        .iter()
        .enumerate()
        .map(|(i, feed)| {
            let name = strip_control_chars(&feed.name);
            let name = truncate_to_width(&name, max_width).into_owned();

            let style = if i == app.selected_feed {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else if app.current_feed == Some(i) {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            // Marker for the feed whose load is in flight
            let line = if app.loading == Some(i) {
                Line::from(vec![
                    Span::styled("… ", Style::default().fg(Color::Yellow)),
                    Span::styled(name, style),
                ])
            } else {
                Line::from(Span::styled(name, style))
            };

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!("Feeds ({})", app.registry().len())),
    );

    f.render_widget(list, area);
}
