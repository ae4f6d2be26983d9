use super::{single_line_selection, Direction, FindQuery, MatchHandler, MatchRange};
use crate::editor::NoteView;
use crate::error::{FindError, FindResult};

/// Finds literal text in prose notes, comparing char by char so match
/// columns line up with what is rendered.
#[derive(Debug, Default)]
pub struct TextHandler;

impl TextHandler {
    pub fn new() -> Self {
        Self
    }
}

#[inline]
fn chars_equal(a: char, b: char, case_sensitive: bool) -> bool {
    a == b || (!case_sensitive && a.to_lowercase().eq(b.to_lowercase()))
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

fn find_in_line(row: usize, line: &[char], needle: &[char], query: &FindQuery, out: &mut Vec<MatchRange>) {
    let query_len = needle.len();
    let mut col = 0;
    while col + query_len <= line.len() {
        let matches = line[col..col + query_len]
            .iter()
            .zip(needle.iter())
            .all(|(&a, &b)| chars_equal(a, b, query.case_sensitive));

        let bounded = !query.whole_word
            || ((col == 0 || !is_word_char(line[col - 1]))
                && line.get(col + query_len).map_or(true, |&c| !is_word_char(c)));

        if matches && bounded {
            out.push(MatchRange::new(row, col, col + query_len));
            col += query_len;
        } else {
            col += 1;
        }
    }
}

impl MatchHandler for TextHandler {
    fn name(&self) -> &'static str {
        "text"
    }

    fn initial_search_term(&self, view: &NoteView) -> String {
        single_line_selection(view)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    fn find_matches(&self, lines: &[String], query: &FindQuery) -> FindResult<Vec<MatchRange>> {
        if lines.is_empty() {
            return Err(FindError::DocumentNotReady);
        }
        let query_chars: Vec<char> = query.term.chars().collect();
        if query_chars.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            find_in_line(row, &chars, &query_chars, query, &mut matches);
        }
        Ok(matches)
    }

    // Prose keeps the cursor at the start of the match instead of selecting it.
    fn find_next(&self, view: &mut NoteView, _direction: Direction, _previous: usize, next: usize) {
        self.focus_match(view, next);
        if let Some(range) = view.search_highlights().get(next).copied() {
            view.clear_selection();
            view.set_cursor(range.row, range.start_col);
            view.center_on_row(range.row);
        }
    }
}
