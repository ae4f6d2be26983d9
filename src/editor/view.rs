use std::sync::Arc;

use super::cursor::{CursorMove, Position, Selection};
use crate::search::MatchRange;

/// Read-mostly view over a note: cursor, selection, scroll position and the
/// find decorations a match handler paints onto it.
#[derive(Debug, Clone)]
pub struct NoteView {
    lines: Arc<[String]>,
    cursor: Position,
    selection: Option<Selection>,
    scroll_top: usize,
    view_height: usize,
    search_highlights: Vec<MatchRange>,
    active_match: Option<usize>,
}

impl NoteView {
    pub fn new(lines: Arc<[String]>) -> Self {
        Self {
            lines,
            cursor: Position::default(),
            selection: None,
            scroll_top: 0,
            view_height: 1,
            search_highlights: Vec::new(),
            active_match: None,
        }
    }

    /// Swap in reloaded content, keeping the cursor in range.
    pub fn set_content(&mut self, lines: Arc<[String]>) {
        self.lines = lines;
        self.selection = None;
        self.clear_search_highlights();
        self.set_cursor(self.cursor.row, self.cursor.col);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.chars().count())
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn set_cursor(&mut self, row: usize, col: usize) {
        let row = row.min(self.line_count().saturating_sub(1));
        let col = col.min(self.line_len(row));
        self.cursor = Position::new(row, col);
        self.ensure_cursor_visible();
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn set_view_height(&mut self, height: usize) {
        self.view_height = height.max(1);
        self.ensure_cursor_visible();
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        self.selection = None;
        self.cursor = self.moved(movement);
        self.ensure_cursor_visible();
    }

    /// Move the cursor while growing the selection from its anchor.
    pub fn extend_selection(&mut self, movement: CursorMove) {
        let anchor = self.selection.map_or(self.cursor, |s| s.anchor);
        self.cursor = self.moved(movement);
        self.selection = Some(Selection::new(anchor, self.cursor));
        self.ensure_cursor_visible();
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection.filter(|s| !s.is_empty())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Select a match range and put the cursor at its end.
    pub fn select_range(&mut self, range: &MatchRange) {
        let anchor = Position::new(range.row, range.start_col);
        let head = Position::new(range.row, range.end_col);
        self.selection = Some(Selection::new(anchor, head));
        self.cursor = head;
    }

    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection()?.ordered();
        let mut out = String::new();
        for row in start.row..=end.row {
            let line = self.lines.get(row)?;
            let from = if row == start.row { start.col } else { 0 };
            let to = if row == end.row { end.col } else { line.chars().count() };
            if row > start.row {
                out.push('\n');
            }
            out.extend(line.chars().skip(from).take(to.saturating_sub(from)));
        }
        Some(out)
    }

    pub fn search_highlights(&self) -> &[MatchRange] {
        &self.search_highlights
    }

    pub fn set_search_highlights(&mut self, matches: Vec<MatchRange>) {
        self.search_highlights = matches;
        self.active_match = None;
    }

    pub fn clear_search_highlights(&mut self) {
        self.search_highlights.clear();
        self.active_match = None;
    }

    pub fn active_match(&self) -> Option<usize> {
        self.active_match
    }

    pub fn set_active_match(&mut self, index: Option<usize>) {
        self.active_match = index.filter(|&i| i < self.search_highlights.len());
    }

    /// Scroll so `row` sits in the middle of the view.
    pub fn center_on_row(&mut self, row: usize) {
        let half_height = self.view_height / 2;
        self.scroll_top = row.saturating_sub(half_height);
    }

    fn ensure_cursor_visible(&mut self) {
        let row = self.cursor.row;
        if row < self.scroll_top {
            self.scroll_top = row;
        } else if row >= self.scroll_top + self.view_height {
            self.scroll_top = row + 1 - self.view_height;
        }
    }

    fn moved(&self, movement: CursorMove) -> Position {
        let Position { row, col } = self.cursor;
        let last_row = self.line_count().saturating_sub(1);

        match movement {
            CursorMove::Forward => {
                if col < self.line_len(row) {
                    Position::new(row, col + 1)
                } else if row < last_row {
                    Position::new(row + 1, 0)
                } else {
                    self.cursor
                }
            }
            CursorMove::Back => {
                if col > 0 {
                    Position::new(row, col - 1)
                } else if row > 0 {
                    Position::new(row - 1, self.line_len(row - 1))
                } else {
                    self.cursor
                }
            }
            CursorMove::Up => {
                let row = row.saturating_sub(1);
                Position::new(row, col.min(self.line_len(row)))
            }
            CursorMove::Down => {
                let row = (row + 1).min(last_row);
                Position::new(row, col.min(self.line_len(row)))
            }
            CursorMove::Head => Position::new(row, 0),
            CursorMove::End => Position::new(row, self.line_len(row)),
            CursorMove::PageUp => {
                let row = row.saturating_sub(self.view_height);
                Position::new(row, col.min(self.line_len(row)))
            }
            CursorMove::PageDown => {
                let row = (row + self.view_height).min(last_row);
                Position::new(row, col.min(self.line_len(row)))
            }
            CursorMove::Top => Position::new(0, 0),
            CursorMove::Bottom => Position::new(last_row, self.line_len(last_row)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(content: &[&str]) -> NoteView {
        let lines: Vec<String> = content.iter().map(|s| s.to_string()).collect();
        NoteView::new(Arc::from(lines))
    }

    #[test]
    fn test_cursor_wraps_across_lines() {
        let mut v = view(&["ab", "cd"]);
        v.set_cursor(0, 2);
        v.move_cursor(CursorMove::Forward);
        assert_eq!(v.cursor(), Position::new(1, 0));
        v.move_cursor(CursorMove::Back);
        assert_eq!(v.cursor(), Position::new(0, 2));
    }

    #[test]
    fn test_set_cursor_clamps() {
        let mut v = view(&["short"]);
        v.set_cursor(10, 99);
        assert_eq!(v.cursor(), Position::new(0, 5));
    }

    #[test]
    fn test_selected_text_single_line() {
        let mut v = view(&["hello world"]);
        v.set_cursor(0, 6);
        for _ in 0..5 {
            v.extend_selection(CursorMove::Forward);
        }
        assert_eq!(v.selected_text().as_deref(), Some("world"));
    }

    #[test]
    fn test_selected_text_backwards_and_multiline() {
        let mut v = view(&["one", "two"]);
        v.set_cursor(1, 2);
        v.extend_selection(CursorMove::Up);
        v.extend_selection(CursorMove::Back);
        assert_eq!(v.selected_text().as_deref(), Some("ne\ntw"));
    }

    #[test]
    fn test_plain_move_drops_selection() {
        let mut v = view(&["abc"]);
        v.extend_selection(CursorMove::Forward);
        assert!(v.selection().is_some());
        v.move_cursor(CursorMove::End);
        assert!(v.selection().is_none());
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let lines: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let mut v = NoteView::new(Arc::from(lines));
        v.set_view_height(10);
        v.set_cursor(30, 0);
        assert_eq!(v.scroll_top(), 21);
        v.center_on_row(30);
        assert_eq!(v.scroll_top(), 25);
    }

    #[test]
    fn test_active_match_must_exist() {
        let mut v = view(&["aaa"]);
        v.set_search_highlights(vec![MatchRange::new(0, 0, 1)]);
        v.set_active_match(Some(3));
        assert_eq!(v.active_match(), None);
        v.set_active_match(Some(0));
        assert_eq!(v.active_match(), Some(0));
    }
}
