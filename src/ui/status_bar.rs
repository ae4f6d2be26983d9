use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Focus};

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let note_path = {
        let path_str = app.document.path.to_string_lossy().to_string();
        match dirs::home_dir() {
            Some(home) => {
                let home_str = home.to_string_lossy().to_string();
                if path_str.starts_with(&home_str) {
                    path_str.replacen(&home_str, "~", 1)
                } else {
                    path_str
                }
            }
            None => path_str,
        }
    };

    let mode = match app.focus {
        Focus::Note => "note",
        Focus::FindInput => "find",
    };

    let cursor = app.view.cursor();
    let percentage = ((cursor.row + 1) * 100) / app.view.line_count().max(1);

    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode),
            Style::default()
                .fg(theme.status_background)
                .bg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {} ", note_path), Style::default().fg(theme.foreground)),
        Span::styled(
            format!("[{}{}] ", app.document.kind.label(), if app.document.read_only { ", ro" } else { "" }),
            Style::default().fg(theme.muted),
        ),
    ];

    if let Some(message) = &app.status_message {
        spans.push(Span::styled(format!(" {} ", message), Style::default().fg(theme.error)));
    }

    let right = format!(" {}:{}  {}% ", cursor.row + 1, cursor.col + 1, percentage);
    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize).saturating_sub(used + right.chars().count());
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(right, Style::default().fg(theme.muted)));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.status_background));
    f.render_widget(paragraph, area);
}
