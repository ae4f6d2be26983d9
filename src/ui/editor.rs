use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};
use crate::document::DocumentKind;
use crate::highlight::{decorate_runs, StyledRun};
use crate::search::MatchRange;

pub fn render_editor(f: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;
    let inner_height = area.height.saturating_sub(2) as usize;
    app.view.set_view_height(inner_height);

    let block = Block::default()
        .title(format!(" {} ", app.document.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.focus == Focus::Note {
            theme.primary
        } else {
            theme.border
        }));

    let line_count = app.view.line_count();
    let gutter_width = if app.config.editor.line_numbers {
        line_count.to_string().len() + 1
    } else {
        0
    };

    let styled_lines: Vec<Vec<StyledRun>> = if app.document.kind == DocumentKind::Code {
        app.highlighter
            .highlight_lines(app.view.lines(), &app.document.language())
    } else {
        app.view
            .lines()
            .iter()
            .map(|line| vec![prose_run(line, theme.foreground, theme.primary)])
            .collect()
    };

    let scroll_top = app.view.scroll_top();
    let highlights = app.view.search_highlights();
    let active = app.view.active_match().and_then(|i| highlights.get(i)).copied();
    let selection = app.view.selection();
    let tab = " ".repeat(app.config.editor.tab_width.max(1) as usize);

    let mut lines: Vec<Line> = Vec::with_capacity(inner_height);
    for row in scroll_top..(scroll_top + inner_height).min(line_count) {
        let row_matches: Vec<&MatchRange> = highlights.iter().filter(|m| m.row == row).collect();
        let decorate = |col: usize| -> Option<Color> {
            if active.is_some_and(|m| m.contains(row, col)) {
                Some(theme.search.current_highlight)
            } else if row_matches.iter().any(|m| m.contains(row, col)) {
                Some(theme.search.highlight)
            } else if selection.is_some_and(|s| s.contains(row, col)) {
                Some(theme.selection)
            } else {
                None
            }
        };

        let mut spans = Vec::new();
        if gutter_width > 0 {
            spans.push(Span::styled(
                format!("{:>width$} ", row + 1, width = gutter_width - 1),
                Style::default().fg(theme.muted),
            ));
        }
        let runs = styled_lines.get(row).map(Vec::as_slice).unwrap_or(&[]);
        spans.extend(decorate_runs(runs, decorate).into_iter().map(|span| {
            if span.content.contains('\t') {
                Span::styled(span.content.replace('\t', &tab), span.style)
            } else {
                span
            }
        }));
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);

    if app.focus == Focus::Note {
        let cursor = app.view.cursor();
        if cursor.row >= scroll_top && cursor.row < scroll_top + inner_height {
            let line = &app.view.lines()[cursor.row];
            let before: String = line.chars().take(cursor.col).collect::<String>().replace('\t', &tab);
            let x = area.x + 1 + gutter_width as u16 + before.width() as u16;
            let y = area.y + 1 + (cursor.row - scroll_top) as u16;
            if x < area.x + area.width.saturating_sub(1) {
                f.set_cursor_position((x, y));
            }
        }
    }
}

/// Markdown headings in bold, everything else plain.
fn prose_run(line: &str, foreground: Color, heading: Color) -> StyledRun {
    let style = if line.trim_start().starts_with('#') {
        Style::default().fg(heading).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(foreground)
    };
    StyledRun {
        text: line.to_string(),
        style,
    }
}
