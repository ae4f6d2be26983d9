use super::{Direction, FindOutcome};

/// Counters and options of the search shown in the find bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchSession {
    /// Last term actually searched for; `None` while the bar is closed
    pub term: Option<String>,
    pub total_found: usize,
    pub current_found: Option<usize>,
    pub case_sensitive: bool,
    pub whole_word: bool,
}

impl SearchSession {
    pub fn new(case_sensitive: bool, whole_word: bool) -> Self {
        Self {
            case_sensitive,
            whole_word,
            ..Self::default()
        }
    }

    pub fn record(&mut self, term: &str, outcome: FindOutcome) {
        self.term = Some(term.to_string());
        self.total_found = outcome.total_found;
        self.current_found = if outcome.total_found > 0 {
            Some(outcome.current_found.unwrap_or(0).min(outcome.total_found - 1))
        } else {
            None
        };
    }

    pub fn reset_counters(&mut self) {
        self.total_found = 0;
        self.current_found = None;
    }

    /// Forget the search but keep the option toggles.
    pub fn reset(&mut self) {
        self.term = None;
        self.reset_counters();
    }

    /// `(previous, next)` for a step in `direction`, wrapping at both ends.
    /// `None` when there is nothing to step through.
    pub fn step(&self, direction: Direction) -> Option<(usize, usize)> {
        if self.total_found == 0 {
            return None;
        }
        let total = self.total_found as i64;
        let current = self.current_found.map_or(-1, |c| c as i64);

        let mut next = current + direction.step();
        if next > total - 1 {
            next = 0;
        } else if next < 0 {
            next = total - 1;
        }
        Some((current.max(0) as usize, next as usize))
    }

    /// 1-based "current/total", "0/0" when nothing matched.
    pub fn display(&self) -> String {
        let current = self.current_found.map_or(0, |c| c + 1);
        format!("{}/{}", current, self.total_found)
    }
}

/// Contents of the find bar's text input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FindInput {
    pub text: String,
    /// Whole input selected; the next typed char replaces it
    pub all_selected: bool,
}

impl FindInput {
    pub fn set(&mut self, text: String) {
        self.text = text;
        self.all_selected = false;
    }

    pub fn select_all(&mut self) {
        self.all_selected = !self.text.is_empty();
    }

    pub fn insert_char(&mut self, c: char) {
        if self.all_selected {
            self.text.clear();
        }
        self.all_selected = false;
        self.text.push(c);
    }

    pub fn delete_char_before(&mut self) {
        if self.all_selected {
            self.text.clear();
        } else {
            self.text.pop();
        }
        self.all_selected = false;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.all_selected = false;
    }
}
