use regex::{Regex, RegexBuilder};

use super::{single_line_selection, Direction, FindQuery, MatchHandler, MatchRange};
use crate::editor::NoteView;
use crate::error::{FindError, FindResult};

/// Finds literal text in source code. Word boundaries follow identifiers,
/// so `_` counts as part of a word.
#[derive(Debug, Default)]
pub struct CodeHandler;

impl CodeHandler {
    pub fn new() -> Self {
        Self
    }

    fn build_pattern(query: &FindQuery) -> FindResult<Regex> {
        let mut pattern = regex::escape(&query.term);
        if query.whole_word {
            // A boundary only makes sense next to an identifier char
            if query.term.chars().next().is_some_and(is_identifier_char) {
                pattern.insert_str(0, r"\b");
            }
            if query.term.chars().last().is_some_and(is_identifier_char) {
                pattern.push_str(r"\b");
            }
        }

        RegexBuilder::new(&pattern)
            .case_insensitive(!query.case_sensitive)
            .build()
            .map_err(|e| FindError::InvalidPattern(e.to_string()))
    }
}

#[inline]
fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Identifier under (or just before) the cursor.
fn word_at_cursor(view: &NoteView) -> Option<String> {
    let cursor = view.cursor();
    let chars: Vec<char> = view.lines().get(cursor.row)?.chars().collect();

    let mut col = cursor.col.min(chars.len());
    if col == chars.len() || !is_identifier_char(chars[col]) {
        if col > 0 && is_identifier_char(chars[col - 1]) {
            col -= 1;
        } else {
            return None;
        }
    }

    let start = chars[..col]
        .iter()
        .rposition(|&c| !is_identifier_char(c))
        .map_or(0, |p| p + 1);
    let end = chars[col..]
        .iter()
        .position(|&c| !is_identifier_char(c))
        .map_or(chars.len(), |p| col + p);

    Some(chars[start..end].iter().collect())
}

impl MatchHandler for CodeHandler {
    fn name(&self) -> &'static str {
        "code"
    }

    fn initial_search_term(&self, view: &NoteView) -> String {
        single_line_selection(view)
            .or_else(|| word_at_cursor(view))
            .unwrap_or_default()
    }

    fn find_matches(&self, lines: &[String], query: &FindQuery) -> FindResult<Vec<MatchRange>> {
        if lines.is_empty() {
            return Err(FindError::DocumentNotReady);
        }
        if query.term.is_empty() {
            return Ok(Vec::new());
        }

        let regex = Self::build_pattern(query)?;
        let mut matches = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            for m in regex.find_iter(line) {
                if m.as_str().is_empty() {
                    continue;
                }
                let start_col = line[..m.start()].chars().count();
                let end_col = start_col + m.as_str().chars().count();
                matches.push(MatchRange::new(row, start_col, end_col));
            }
        }
        Ok(matches)
    }

    // Code keeps the active match selected, ready for copy or replace.
    fn find_next(&self, view: &mut NoteView, _direction: Direction, _previous: usize, next: usize) {
        self.focus_match(view, next);
        if let Some(range) = view.search_highlights().get(next).copied() {
            view.select_range(&range);
        }
    }
}
