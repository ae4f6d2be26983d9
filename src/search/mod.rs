//! In-note find: the coordinator behind the find bar and the match
//! handlers that do the actual searching for each kind of note.

mod code;
mod coordinator;
mod session;
mod text;
mod worker;

pub use code::CodeHandler;
pub use coordinator::FindCoordinator;
pub use session::{FindInput, SearchSession};
pub use text::TextHandler;

use crate::editor::{NoteView, Position};
use crate::error::FindResult;

/// One match, in char columns of a single line. `end_col` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    pub row: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl MatchRange {
    pub fn new(row: usize, start_col: usize, end_col: usize) -> Self {
        Self { row, start_col, end_col }
    }

    pub fn start(&self) -> Position {
        Position::new(self.row, self.start_col)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.row == row && col >= self.start_col && col < self.end_col
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FindQuery {
    pub term: String,
    pub case_sensitive: bool,
    pub whole_word: bool,
}

impl FindQuery {
    pub fn new(term: impl Into<String>, case_sensitive: bool, whole_word: bool) -> Self {
        Self {
            term: term.into(),
            case_sensitive,
            whole_word,
        }
    }
}

/// Counters a handler reports after a search. `current_found` is the
/// 0-based index of the match nearest the cursor, absent when nothing
/// matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FindOutcome {
    pub total_found: usize,
    pub current_found: Option<usize>,
}

impl FindOutcome {
    pub fn none() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn from_shift(shift_pressed: bool) -> Self {
        if shift_pressed {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }

    pub fn step(&self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindOption {
    CaseSensitive,
    WholeWord,
}

/// Searches and decorates one kind of note content.
///
/// Handlers hold no per-search state, so one instance can be shared with
/// the find worker thread. `find_matches` is the only part that runs off
/// the UI thread; everything taking a `NoteView` runs on it.
pub trait MatchHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Seed for the find input when the bar opens, usually the selection.
    fn initial_search_term(&self, view: &NoteView) -> String;

    fn find_matches(&self, lines: &[String], query: &FindQuery) -> FindResult<Vec<MatchRange>>;

    fn perform_find(&self, view: &mut NoteView, query: &FindQuery) -> FindResult<FindOutcome> {
        let matches = self.find_matches(view.lines(), query)?;
        Ok(self.apply_matches(view, matches))
    }

    /// Paint `matches` onto the view and focus the one nearest the cursor.
    fn apply_matches(&self, view: &mut NoteView, matches: Vec<MatchRange>) -> FindOutcome {
        let current = nearest_match(view, &matches);
        let total = matches.len();
        view.set_search_highlights(matches);
        if let Some(index) = current {
            self.focus_match(view, index);
        }
        FindOutcome {
            total_found: total,
            current_found: current,
        }
    }

    fn find_next(&self, view: &mut NoteView, _direction: Direction, _previous: usize, next: usize) {
        self.focus_match(view, next);
    }

    /// Drop the decorations and leave the view on the last active match.
    fn cleanup(&self, view: &mut NoteView, _total: usize, current: usize) {
        let last = view.search_highlights().get(current).copied();
        view.clear_search_highlights();
        if let Some(range) = last {
            view.select_range(&range);
            view.center_on_row(range.row);
        }
    }

    fn focus_match(&self, view: &mut NoteView, index: usize) {
        view.set_active_match(Some(index));
        if let Some(range) = view.search_highlights().get(index).copied() {
            view.center_on_row(range.row);
        }
    }
}

/// Index of the first match at or after the selection start (or the
/// cursor), wrapping to the first match.
pub fn nearest_match(view: &NoteView, matches: &[MatchRange]) -> Option<usize> {
    if matches.is_empty() {
        return None;
    }
    let origin = view
        .selection()
        .map(|s| s.ordered().0)
        .unwrap_or_else(|| view.cursor());
    Some(matches.iter().position(|m| m.start() >= origin).unwrap_or(0))
}

/// Single-line selection, or `None` when the selection spans lines.
pub(crate) fn single_line_selection(view: &NoteView) -> Option<String> {
    view.selected_text().filter(|text| !text.contains('\n'))
}
