use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};

pub const FIND_BAR_HEIGHT: u16 = 3;

pub fn render_find_bar(f: &mut Frame, app: &App, area: Rect) {
    if !app.find.is_open() {
        return;
    }

    let theme = &app.theme;
    let session = app.find.session();
    let input = app.find.input();
    let focused = app.focus == Focus::FindInput;

    f.render_widget(Clear, area);

    let count_text = if app.find.has_pending() {
        " ... ".to_string()
    } else {
        format!(" {} ", session.display())
    };
    let option = |label: &'static str, on: bool| {
        Span::styled(
            format!(" [{}] {} ", if on { "x" } else { " " }, label),
            Style::default().fg(if on { theme.search.option_on } else { theme.search.option_off }),
        )
    };
    let case_span = option("case", session.case_sensitive);
    let word_span = option("word", session.whole_word);

    let reserved = count_text.width() + case_span.content.width() + word_span.content.width() + 4;
    let available_width = (area.width as usize).saturating_sub(reserved);

    let query = &input.text;
    let display_query = if query.width() > available_width {
        let skip = query.chars().count().saturating_sub(available_width.saturating_sub(3));
        format!("...{}", query.chars().skip(skip).collect::<String>())
    } else {
        query.clone()
    };

    let mut query_style = Style::default().fg(theme.search.input);
    if input.all_selected {
        query_style = query_style.bg(theme.selection);
    }

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(display_query.clone(), query_style),
    ];
    if focused {
        spans.push(Span::styled(
            "_",
            Style::default().fg(theme.primary).add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    let used: usize = spans.iter().map(|s| s.content.width()).sum();
    spans.push(Span::raw(" ".repeat(available_width.saturating_sub(used) + 1)));
    spans.push(Span::styled(
        count_text,
        Style::default().fg(theme.search.match_count).add_modifier(Modifier::BOLD),
    ));
    spans.push(case_span);
    spans.push(word_span);

    let hint_text = if app.find.waits_for_submit() {
        " Enter: find/next  Shift+Enter: prev  Alt+c/w  Esc "
    } else {
        " Enter: next  Shift+Enter: prev  Alt+c/w  Esc "
    };

    let border_color = if session.total_found > 0 {
        theme.success
    } else if session.term.as_deref().is_some_and(|t| !t.is_empty()) {
        theme.error
    } else {
        theme.search.border
    };

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Find ")
            .title_bottom(
                Line::from(Span::styled(hint_text, Style::default().fg(theme.muted))).right_aligned(),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(theme.search.background)),
    );

    f.render_widget(bar, area);

    if focused {
        let x = area.x + 2 + display_query.width() as u16;
        if x < area.x + area.width.saturating_sub(1) {
            f.set_cursor_position((x, area.y + 1));
        }
    }
}
