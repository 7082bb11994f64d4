use crate::app::App;
use crate::util::{plain_text, strip_control_chars, truncate_to_width};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Format timestamp as relative time
pub fn format_relative_time(timestamp: Option<i64>) -> String {
    let Some(ts) = timestamp else {
        return String::new();
    };

    let diff = Utc::now().timestamp() - ts;

    // Future dates (malformed feeds)
    if diff < 0 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }

    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%b %d").to_string())
        .unwrap_or_default()
}

/// Render the entry list: title and age on one line, a plain-text excerpt below.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let target = app.loader.target();
    let target = target.read();

    // Leave room for borders and the age column
    let title_width = area.width.saturating_sub(10) as usize;
    let excerpt_width = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = if target.entry_count() == 0 {
        let msg = if app.loading.is_some() {
            "Loading..."
        } else {
            "No entries"
        };
        vec![ListItem::new(msg)]
    } else {
        target
            .current_entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let title_style = if i == app.selected_entry {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };

                let title = strip_control_chars(&entry.title);
                let mut spans = vec![Span::styled(
                    truncate_to_width(&title, title_width).into_owned(),
                    title_style,
                )];
                let age = format_relative_time(entry.published);
                if !age.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", age),
                        Style::default().fg(Color::DarkGray),
                    ));
                }

                let excerpt = plain_text(&entry.content);
                let excerpt = Line::from(Span::styled(
                    format!("  {}", truncate_to_width(&excerpt, excerpt_width)),
                    Style::default().fg(Color::Gray),
                ));

                ListItem::new(vec![Line::from(spans), excerpt])
            })
            .collect()
    };

    let title = match target.title() {
        Some(name) => format!("Entries - {}", strip_control_chars(name)),
        None => "Entries".to_string(),
    };

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

    // Keep the selected entry scrolled into view
    let mut state = ListState::default().with_selected(
        (target.entry_count() > 0).then_some(app.selected_entry),
    );
    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_time_none_is_empty() {
        assert_eq!(format_relative_time(None), "");
    }

    #[test]
    fn test_relative_time_future_is_now() {
        let future = Utc::now().timestamp() + 3600;
        assert_eq!(format_relative_time(Some(future)), "now");
    }

    #[test]
    fn test_relative_time_hours() {
        let two_hours_ago = Utc::now().timestamp() - 2 * 3600 - 30;
        assert_eq!(format_relative_time(Some(two_hours_ago)), "2h");
    }
}
