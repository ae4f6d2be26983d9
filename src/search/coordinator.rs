use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{
    CodeHandler, Direction, FindInput, FindOption, FindOutcome, FindQuery, MatchHandler,
    SearchSession, TextHandler,
};
use super::worker::{FindRequest, FindWorker};
use crate::config::FindConfig;
use crate::document::{Document, DocumentKind};
use crate::editor::NoteView;

/// Debounced search waiting to fire. Replaced on every keystroke, so at
/// most one exists at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingFind {
    term: String,
    due: Instant,
}

/// Drives the find bar: visibility, input, debounce timer, match counters
/// and navigation. Matching and highlighting are delegated to the handler
/// for the open document's kind.
pub struct FindCoordinator {
    text_handler: Arc<dyn MatchHandler>,
    code_handler: Arc<dyn MatchHandler>,
    debounce: Option<Duration>,
    worker: Option<FindWorker>,
    visible: bool,
    input: FindInput,
    session: SearchSession,
    pending: Option<PendingFind>,
    /// Bumped on every search and on close; worker results from older
    /// generations are dropped
    generation: u64,
    /// Generation of the worker search not yet applied
    in_flight: Option<u64>,
}

impl FindCoordinator {
    pub fn new(config: &FindConfig) -> Self {
        Self::with_handlers(
            Arc::new(TextHandler::new()),
            Arc::new(CodeHandler::new()),
            config,
        )
    }

    pub fn with_handlers(
        text_handler: Arc<dyn MatchHandler>,
        code_handler: Arc<dyn MatchHandler>,
        config: &FindConfig,
    ) -> Self {
        let worker = if config.background {
            match FindWorker::new() {
                Ok(worker) => Some(worker),
                Err(e) => {
                    tracing::warn!(error = %e, "find worker unavailable, searching inline");
                    None
                }
            }
        } else {
            None
        };

        Self {
            text_handler,
            code_handler,
            debounce: config.debounce(),
            worker,
            visible: false,
            input: FindInput::default(),
            session: SearchSession::new(config.case_sensitive, config.whole_word),
            pending: None,
            generation: 0,
            in_flight: None,
        }
    }

    /// Find works on writable text and code notes only.
    pub fn is_applicable(kind: DocumentKind, read_only: bool) -> bool {
        !read_only && matches!(kind, DocumentKind::Text | DocumentKind::Code)
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn input(&self) -> &FindInput {
        &self.input
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn waits_for_submit(&self) -> bool {
        self.debounce.is_none()
    }

    /// A search is waiting on the debounce timer or on the worker.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some() || self.in_flight.is_some()
    }

    /// When the event loop must wake up next for the debounce timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    fn handler(&self, kind: DocumentKind) -> Arc<dyn MatchHandler> {
        match kind {
            DocumentKind::Code => Arc::clone(&self.code_handler),
            _ => Arc::clone(&self.text_handler),
        }
    }

    fn query(&self, term: &str) -> FindQuery {
        FindQuery::new(term, self.session.case_sensitive, self.session.whole_word)
    }

    /// Show the find bar, seeded from the selection. A non-empty seed is
    /// searched right away. Returns `false` when find is not available.
    pub fn open(&mut self, doc: &Document, view: &mut NoteView) -> bool {
        if !Self::is_applicable(doc.kind, doc.read_only) {
            tracing::debug!(kind = doc.kind.label(), read_only = doc.read_only, "find not supported here");
            return false;
        }
        if self.visible {
            self.input.select_all();
            return true;
        }

        self.visible = true;
        self.session.reset_counters();

        let handler = self.handler(doc.kind);
        let seed = handler.initial_search_term(view);
        tracing::debug!(handler = handler.name(), seed = %seed, "find bar opened");
        self.input.set(seed);

        if !self.input.text.is_empty() {
            self.input.select_all();
            let term = self.input.text.clone();
            self.perform_find(doc, view, &term);
        }
        true
    }

    pub fn on_input_changed(&mut self, term: String, now: Instant) {
        self.input.set(term);
        self.schedule(now);
    }

    pub fn insert_char(&mut self, c: char, now: Instant) {
        let mut input = self.input.clone();
        input.insert_char(c);
        self.on_input_changed(input.text, now);
    }

    pub fn delete_char_before(&mut self, now: Instant) {
        let mut input = self.input.clone();
        input.delete_char_before();
        self.on_input_changed(input.text, now);
    }

    pub fn clear_input(&mut self, now: Instant) {
        self.on_input_changed(String::new(), now);
    }

    pub fn select_input(&mut self) {
        self.input.select_all();
    }

    fn schedule(&mut self, now: Instant) {
        if !self.visible {
            return;
        }
        if let Some(delay) = self.debounce {
            self.pending = Some(PendingFind {
                term: self.input.text.clone(),
                due: now + delay,
            });
        }
    }

    /// Fire the debounce timer if it is due. Returns `true` if a search
    /// was started.
    pub fn tick(&mut self, doc: &Document, view: &mut NoteView, now: Instant) -> bool {
        match self.pending.take() {
            Some(pending) if pending.due <= now => {
                let query = self.query(&pending.term);
                self.dispatch(doc, view, query);
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Search synchronously and record the counters. Handler failures show
    /// up as zero matches; the term is still recorded.
    pub fn perform_find(&mut self, doc: &Document, view: &mut NoteView, term: &str) -> FindOutcome {
        self.generation += 1;
        self.in_flight = None;
        let query = self.query(term);
        let handler = self.handler(doc.kind);

        let outcome = match handler.perform_find(view, &query) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(handler = handler.name(), term, error = %e, "find failed");
                view.clear_search_highlights();
                FindOutcome::none()
            }
        };
        tracing::debug!(term, total = outcome.total_found, "find completed");
        self.session.record(term, outcome);
        outcome
    }

    /// Run a search through the worker when there is one, inline otherwise.
    fn dispatch(&mut self, doc: &Document, view: &mut NoteView, query: FindQuery) {
        if self.worker.is_none() {
            self.perform_find(doc, view, &query.term);
            return;
        }

        self.generation += 1;
        tracing::trace!(generation = self.generation, term = %query.term, "find dispatched");
        let request = FindRequest {
            generation: self.generation,
            revision: doc.revision(),
            query,
            lines: doc.snapshot(),
            handler: self.handler(doc.kind),
        };
        if let Some(worker) = &self.worker {
            worker.request(request);
            self.in_flight = Some(self.generation);
        }
    }

    /// Apply finished worker searches. Results for an older generation,
    /// for a closed bar, or for since-replaced content are not shown.
    pub fn poll_results(&mut self, doc: &Document, view: &mut NoteView) -> bool {
        let mut responses = Vec::new();
        if let Some(worker) = &self.worker {
            while let Some(response) = worker.try_recv() {
                responses.push(response);
            }
        }

        let mut applied = false;
        for response in responses {
            if !self.visible || response.generation != self.generation {
                tracing::debug!(
                    generation = response.generation,
                    latest = self.generation,
                    "discarding stale find result"
                );
                continue;
            }
            if response.revision != doc.revision() {
                self.dispatch(doc, view, response.query);
                continue;
            }

            let handler = self.handler(doc.kind);
            let outcome = match response.result {
                Ok(matches) => handler.apply_matches(view, matches),
                Err(e) => {
                    tracing::warn!(handler = handler.name(), term = %response.query.term, error = %e, "find failed");
                    view.clear_search_highlights();
                    FindOutcome::none()
                }
            };
            self.session.record(&response.query.term, outcome);
            self.in_flight = None;
            applied = true;
        }
        applied
    }

    /// Enter / F3: step to the next match, or the previous one with shift.
    /// Counters that do not reflect the input yet (a pending timer, a
    /// worker search in flight, or an unsearched term) are refreshed inline
    /// first.
    pub fn submit(&mut self, doc: &Document, view: &mut NoteView, shift_pressed: bool) {
        if !self.visible {
            return;
        }
        let direction = Direction::from_shift(shift_pressed);

        let pending = self.pending.take().is_some();
        let outdated = self.in_flight.is_some()
            || self.session.term.as_deref() != Some(self.input.text.as_str());
        if pending || outdated {
            let term = self.input.text.clone();
            self.perform_find(doc, view, &term);
        }

        self.find_next(doc, view, direction);
    }

    /// Move to the neighbouring match with wraparound. No-op without matches.
    pub fn find_next(&mut self, doc: &Document, view: &mut NoteView, direction: Direction) {
        if !self.visible {
            return;
        }
        let Some((previous, next)) = self.session.step(direction) else {
            return;
        };
        self.session.current_found = Some(next);
        self.handler(doc.kind).find_next(view, direction, previous, next);
    }

    pub fn toggle_option(&mut self, doc: &Document, view: &mut NoteView, option: FindOption) {
        match option {
            FindOption::CaseSensitive => self.session.case_sensitive = !self.session.case_sensitive,
            FindOption::WholeWord => self.session.whole_word = !self.session.whole_word,
        }
        if !self.visible {
            return;
        }
        self.pending = None;
        let query = self.query(&self.input.text);
        self.dispatch(doc, view, query);
    }

    /// Hide the bar. If a match was active the handler clears its markers
    /// and leaves the view on that match.
    pub fn close(&mut self, doc: &Document, view: &mut NoteView) {
        if !self.visible {
            return;
        }
        self.visible = false;
        self.pending = None;
        self.generation += 1;
        self.in_flight = None;

        let total = self.session.total_found;
        if total > 0 {
            let current = self.session.current_found.unwrap_or(0);
            self.handler(doc.kind).cleanup(view, total, current);
        } else {
            view.clear_search_highlights();
        }

        tracing::debug!(total, "find bar closed");
        self.session.reset();
        self.input.clear();
    }

    /// The note was reloaded from disk: search the new content again.
    pub fn content_reloaded(&mut self, doc: &Document, view: &mut NoteView) {
        if !self.visible {
            return;
        }
        if !Self::is_applicable(doc.kind, doc.read_only) {
            self.close(doc, view);
            return;
        }
        match self.session.term.clone() {
            Some(term) if !term.is_empty() => {
                self.perform_find(doc, view, &term);
            }
            _ => self.session.reset_counters(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FindError, FindResult};
    use crate::search::MatchRange;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Find(FindQuery),
        Next(Direction, usize, usize),
        Cleanup(usize, usize),
    }

    /// Handler with a fixed number of matches that records every call.
    struct RecordingHandler {
        seed: String,
        total: usize,
        current: usize,
        fail: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingHandler {
        fn new(seed: &str, total: usize, current: usize) -> Arc<Self> {
            Arc::new(Self {
                seed: seed.into(),
                total,
                current,
                fail: false,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                seed: String::new(),
                total: 0,
                current: 0,
                fail: true,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn find_count(&self) -> usize {
            self.calls().iter().filter(|c| matches!(c, Call::Find(_))).count()
        }
    }

    impl MatchHandler for RecordingHandler {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn initial_search_term(&self, _view: &NoteView) -> String {
            self.seed.clone()
        }

        fn find_matches(&self, _lines: &[String], query: &FindQuery) -> FindResult<Vec<MatchRange>> {
            self.calls.lock().unwrap().push(Call::Find(query.clone()));
            if self.fail {
                return Err(FindError::DocumentNotReady);
            }
            if query.term.is_empty() {
                return Ok(Vec::new());
            }
            Ok((0..self.total).map(|i| MatchRange::new(0, i, i + 1)).collect())
        }

        fn apply_matches(&self, view: &mut NoteView, matches: Vec<MatchRange>) -> FindOutcome {
            let total = matches.len();
            view.set_search_highlights(matches);
            FindOutcome {
                total_found: total,
                current_found: (total > 0).then_some(self.current),
            }
        }

        fn find_next(&self, _view: &mut NoteView, direction: Direction, previous: usize, next: usize) {
            self.calls.lock().unwrap().push(Call::Next(direction, previous, next));
        }

        fn cleanup(&self, view: &mut NoteView, total: usize, current: usize) {
            self.calls.lock().unwrap().push(Call::Cleanup(total, current));
            view.clear_search_highlights();
        }
    }

    fn inline_config(debounce_ms: i64) -> FindConfig {
        FindConfig {
            debounce_ms,
            background: false,
            ..FindConfig::default()
        }
    }

    fn setup(
        handler: &Arc<RecordingHandler>,
        config: &FindConfig,
    ) -> (FindCoordinator, Document, NoteView) {
        let text: Arc<dyn MatchHandler> = handler.clone();
        let code: Arc<dyn MatchHandler> = Arc::new(CodeHandler::new());
        let coordinator = FindCoordinator::with_handlers(text, code, config);
        let doc = Document::from_text("note.md", DocumentKind::Text, "abcdefghij");
        let view = NoteView::new(doc.snapshot());
        (coordinator, doc, view)
    }

    #[test]
    fn test_open_without_seed_does_not_search() {
        let handler = RecordingHandler::new("", 5, 0);
        let (mut find, doc, mut view) = setup(&handler, &inline_config(200));

        assert!(find.open(&doc, &mut view));
        assert!(find.is_open());
        assert_eq!(find.session().total_found, 0);
        assert_eq!(find.session().display(), "0/0");
        assert_eq!(handler.find_count(), 0);
    }

    #[test]
    fn test_open_with_seed_searches_immediately() {
        let handler = RecordingHandler::new("foo", 3, 0);
        let (mut find, doc, mut view) = setup(&handler, &inline_config(200));

        find.open(&doc, &mut view);
        assert_eq!(handler.find_count(), 1);
        assert!(find.input().all_selected);
        assert_eq!(find.input().text, "foo");
        assert_eq!(find.session().term.as_deref(), Some("foo"));
        assert_eq!(find.session().display(), "1/3");
        assert!(!find.has_pending());
    }

    #[test]
    fn test_open_again_only_selects_input() {
        let handler = RecordingHandler::new("foo", 3, 0);
        let (mut find, doc, mut view) = setup(&handler, &inline_config(200));

        find.open(&doc, &mut view);
        find.insert_char('x', Instant::now());
        assert!(!find.input().all_selected);

        find.open(&doc, &mut view);
        assert!(find.input().all_selected);
        assert_eq!(handler.find_count(), 1);
    }

    #[test]
    fn test_submit_wraps_forward() {
        let handler = RecordingHandler::new("foo", 5, 4);
        let (mut find, doc, mut view) = setup(&handler, &inline_config(200));
        find.open(&doc, &mut view);
        assert_eq!(find.session().display(), "5/5");

        find.submit(&doc, &mut view, false);
        assert_eq!(find.session().current_found, Some(0));
        assert_eq!(find.session().display(), "1/5");
        assert_eq!(handler.calls().last(), Some(&Call::Next(Direction::Forward, 4, 0)));
    }

    #[test]
    fn test_submit_with_shift_wraps_backward() {
        let handler = RecordingHandler::new("foo", 5, 0);
        let (mut find, doc, mut view) = setup(&handler, &inline_config(200));
        find.open(&doc, &mut view);

        find.submit(&doc, &mut view, true);
        assert_eq!(find.session().current_found, Some(4));
        assert_eq!(find.session().display(), "5/5");
        assert_eq!(handler.calls().last(), Some(&Call::Next(Direction::Backward, 0, 4)));
    }

    #[test]
    fn test_submit_without_matches_is_noop() {
        let handler = RecordingHandler::new("foo", 0, 0);
        let (mut find, doc, mut view) = setup(&handler, &inline_config(200));
        find.open(&doc, &mut view);

        for shift in [false, true, false] {
            find.submit(&doc, &mut view, shift);
        }
        assert_eq!(find.session().display(), "0/0");
        assert!(!handler.calls().iter().any(|c| matches!(c, Call::Next(..))));
    }

    #[test]
    fn test_close_cleans_up_active_match() {
        let handler = RecordingHandler::new("foo", 3, 1);
        let (mut find, doc, mut view) = setup(&handler, &inline_config(200));
        find.open(&doc, &mut view);

        find.close(&doc, &mut view);
        assert!(!find.is_open());
        assert_eq!(handler.calls().last(), Some(&Call::Cleanup(3, 1)));
        assert_eq!(find.session().term, None);
        assert_eq!(find.session().total_found, 0);
    }

    #[test]
    fn test_close_without_matches_skips_cleanup() {
        let handler = RecordingHandler::new("", 3, 0);
        let (mut find, doc, mut view) = setup(&handler, &inline_config(200));
        find.open(&doc, &mut view);
        find.close(&doc, &mut view);
        assert!(!handler.calls().iter().any(|c| matches!(c, Call::Cleanup(..))));
    }

    #[test]
    fn test_debounce_keeps_only_latest_term() {
        let handler = RecordingHandler::new("", 2, 0);
        let (mut find, doc, mut view) = setup(&handler, &inline_config(200));
        find.open(&doc, &mut view);

        let start = Instant::now();
        find.insert_char('a', start);
        find.insert_char('b', start + Duration::from_millis(100));
        assert_eq!(find.next_deadline(), Some(start + Duration::from_millis(300)));

        // The first keystroke's deadline has passed but it was replaced
        assert!(!find.tick(&doc, &mut view, start + Duration::from_millis(250)));
        assert_eq!(handler.find_count(), 0);

        assert!(find.tick(&doc, &mut view, start + Duration::from_millis(300)));
        assert_eq!(
            handler.calls(),
            vec![Call::Find(FindQuery::new("ab", false, false))]
        );
        assert!(!find.has_pending());
        assert_eq!(find.session().display(), "1/2");
    }

    #[test]
    fn test_wait_for_submit_searches_on_enter() {
        let handler = RecordingHandler::new("", 4, 0);
        let (mut find, doc, mut view) = setup(&handler, &inline_config(0));
        find.open(&doc, &mut view);
        assert!(find.waits_for_submit());

        find.on_input_changed("needle".into(), Instant::now());
        assert!(!find.has_pending());
        assert_eq!(handler.find_count(), 0);

        find.submit(&doc, &mut view, false);
        assert_eq!(handler.find_count(), 1);
        assert_eq!(find.session().term.as_deref(), Some("needle"));
        assert_eq!(find.session().display(), "2/4");

        // Same term again: plain navigation
        find.submit(&doc, &mut view, false);
        assert_eq!(handler.find_count(), 1);
        assert_eq!(find.session().display(), "3/4");
    }

    #[test]
    fn test_submit_flushes_pending_search() {
        let handler = RecordingHandler::new("", 3, 0);
        let (mut find, doc, mut view) = setup(&handler, &inline_config(200));
        find.open(&doc, &mut view);

        find.on_input_changed("abc".into(), Instant::now());
        find.submit(&doc, &mut view, false);
        assert!(!find.has_pending());
        assert_eq!(find.session().term.as_deref(), Some("abc"));
        assert_eq!(find.session().display(), "2/3");
    }

    #[test]
    fn test_toggle_reruns_search() {
        let handler = RecordingHandler::new("foo", 3, 0);
        let (mut find, doc, mut view) = setup(&handler, &inline_config(200));
        find.open(&doc, &mut view);

        find.toggle_option(&doc, &mut view, FindOption::CaseSensitive);
        assert_eq!(handler.calls().last(), Some(&Call::Find(FindQuery::new("foo", true, false))));

        find.toggle_option(&doc, &mut view, FindOption::WholeWord);
        assert_eq!(handler.calls().last(), Some(&Call::Find(FindQuery::new("foo", true, true))));
    }

    #[test]
    fn test_repeated_search_gives_same_counters() {
        let handler: Arc<dyn MatchHandler> = Arc::new(TextHandler::new());
        let mut find = FindCoordinator::with_handlers(
            handler,
            Arc::new(CodeHandler::new()),
            &inline_config(200),
        );
        let doc = Document::from_text("n.md", DocumentKind::Text, "Ab ab AB\nab");
        let mut view = NoteView::new(doc.snapshot());
        find.open(&doc, &mut view);
        find.on_input_changed("ab".into(), Instant::now());

        find.toggle_option(&doc, &mut view, FindOption::CaseSensitive);
        let once = find.session().clone();
        assert_eq!(once.total_found, 2);

        find.toggle_option(&doc, &mut view, FindOption::CaseSensitive);
        find.toggle_option(&doc, &mut view, FindOption::CaseSensitive);
        assert_eq!(find.session(), &once);
    }

    #[test]
    fn test_failed_search_reports_zero_and_keeps_term() {
        let handler = RecordingHandler::failing();
        let (mut find, doc, mut view) = setup(&handler, &inline_config(200));
        find.open(&doc, &mut view);

        let outcome = find.perform_find(&doc, &mut view, "boom");
        assert_eq!(outcome, FindOutcome::none());
        assert_eq!(find.session().term.as_deref(), Some("boom"));
        assert_eq!(find.session().display(), "0/0");
    }

    #[test]
    fn test_unsupported_documents_are_ignored() {
        assert!(FindCoordinator::is_applicable(DocumentKind::Text, false));
        assert!(FindCoordinator::is_applicable(DocumentKind::Code, false));
        assert!(!FindCoordinator::is_applicable(DocumentKind::Text, true));
        assert!(!FindCoordinator::is_applicable(DocumentKind::Other, false));

        let handler = RecordingHandler::new("foo", 3, 0);
        let (mut find, _, mut view) = setup(&handler, &inline_config(200));
        let mut doc = Document::from_text("img.png", DocumentKind::Other, "x");
        assert!(!find.open(&doc, &mut view));
        doc.kind = DocumentKind::Text;
        doc.read_only = true;
        assert!(!find.open(&doc, &mut view));
        assert!(!find.is_open());
        assert_eq!(handler.find_count(), 0);
    }

    #[test]
    fn test_code_documents_use_code_handler() {
        let text = RecordingHandler::new("", 1, 0);
        let code = RecordingHandler::new("", 2, 0);
        let text_dyn: Arc<dyn MatchHandler> = text.clone();
        let code_dyn: Arc<dyn MatchHandler> = code.clone();
        let mut find = FindCoordinator::with_handlers(text_dyn, code_dyn, &inline_config(200));

        let doc = Document::from_text("main.rs", DocumentKind::Code, "fn main() {}");
        let mut view = NoteView::new(doc.snapshot());
        find.open(&doc, &mut view);
        find.perform_find(&doc, &mut view, "main");

        assert_eq!(code.find_count(), 1);
        assert_eq!(text.find_count(), 0);
        assert_eq!(find.session().total_found, 2);
    }

    #[test]
    fn test_reload_reruns_search() {
        let handler: Arc<dyn MatchHandler> = Arc::new(TextHandler::new());
        let mut find = FindCoordinator::with_handlers(
            handler,
            Arc::new(CodeHandler::new()),
            &inline_config(200),
        );
        let mut doc = Document::from_text("n.md", DocumentKind::Text, "cat");
        let mut view = NoteView::new(doc.snapshot());
        find.open(&doc, &mut view);
        find.perform_find(&doc, &mut view, "cat");
        assert_eq!(find.session().total_found, 1);

        doc.replace_content("cat cat\ncat");
        view.set_content(doc.snapshot());
        find.content_reloaded(&doc, &mut view);
        assert_eq!(find.session().total_found, 3);
        assert_eq!(view.search_highlights().len(), 3);
    }

    fn wait_for_result(find: &mut FindCoordinator, doc: &Document, view: &mut NoteView) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if find.poll_results(doc, view) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }

    fn background_config() -> FindConfig {
        FindConfig {
            debounce_ms: 50,
            background: true,
            ..FindConfig::default()
        }
    }

    #[test]
    fn test_background_search_applies_result() {
        let handler: Arc<dyn MatchHandler> = Arc::new(TextHandler::new());
        let mut find = FindCoordinator::with_handlers(
            handler,
            Arc::new(CodeHandler::new()),
            &background_config(),
        );
        let doc = Document::from_text("n.md", DocumentKind::Text, "one two one");
        let mut view = NoteView::new(doc.snapshot());
        find.open(&doc, &mut view);

        let now = Instant::now();
        find.on_input_changed("one".into(), now);
        assert!(find.tick(&doc, &mut view, now + Duration::from_millis(50)));

        assert!(wait_for_result(&mut find, &doc, &mut view));
        assert_eq!(find.session().term.as_deref(), Some("one"));
        assert_eq!(find.session().display(), "1/2");
    }

    #[test]
    fn test_result_after_close_is_discarded() {
        let handler: Arc<dyn MatchHandler> = Arc::new(TextHandler::new());
        let mut find = FindCoordinator::with_handlers(
            handler,
            Arc::new(CodeHandler::new()),
            &background_config(),
        );
        let doc = Document::from_text("n.md", DocumentKind::Text, "one two one");
        let mut view = NoteView::new(doc.snapshot());
        find.open(&doc, &mut view);

        let now = Instant::now();
        find.on_input_changed("one".into(), now);
        find.tick(&doc, &mut view, now + Duration::from_millis(50));
        find.close(&doc, &mut view);

        std::thread::sleep(Duration::from_millis(200));
        assert!(!find.poll_results(&doc, &mut view));
        assert_eq!(find.session().term, None);
        assert!(view.search_highlights().is_empty());
    }

    #[test]
    fn test_superseded_result_is_discarded() {
        let handler: Arc<dyn MatchHandler> = Arc::new(TextHandler::new());
        let mut find = FindCoordinator::with_handlers(
            handler,
            Arc::new(CodeHandler::new()),
            &background_config(),
        );
        let doc = Document::from_text("n.md", DocumentKind::Text, "one two one");
        let mut view = NoteView::new(doc.snapshot());
        find.open(&doc, &mut view);

        let now = Instant::now();
        find.on_input_changed("one".into(), now);
        find.tick(&doc, &mut view, now + Duration::from_millis(50));
        // A synchronous search supersedes the one in flight
        find.perform_find(&doc, &mut view, "two");

        std::thread::sleep(Duration::from_millis(200));
        find.poll_results(&doc, &mut view);
        assert_eq!(find.session().term.as_deref(), Some("two"));
        assert_eq!(find.session().display(), "1/1");
    }

    #[test]
    fn test_submit_during_background_search_uses_new_term() {
        let handler: Arc<dyn MatchHandler> = Arc::new(TextHandler::new());
        let mut find = FindCoordinator::with_handlers(
            handler,
            Arc::new(CodeHandler::new()),
            &background_config(),
        );
        let doc = Document::from_text("n.md", DocumentKind::Text, "one two one two one");
        let mut view = NoteView::new(doc.snapshot());
        find.open(&doc, &mut view);
        find.perform_find(&doc, &mut view, "one");
        assert_eq!(find.session().display(), "1/3");

        let now = Instant::now();
        find.on_input_changed("two".into(), now);
        assert!(find.tick(&doc, &mut view, now + Duration::from_millis(50)));

        // Enter before the worker answers
        find.submit(&doc, &mut view, false);
        assert_eq!(find.session().term.as_deref(), Some("two"));
        assert_eq!(find.session().display(), "2/2");
        assert_eq!(view.cursor().col, 12);

        std::thread::sleep(Duration::from_millis(200));
        assert!(!find.poll_results(&doc, &mut view));
        assert_eq!(find.session().display(), "2/2");
    }

    #[test]
    fn test_reload_to_read_only_closes_find() {
        let handler = RecordingHandler::new("foo", 3, 0);
        let (mut find, mut doc, mut view) = setup(&handler, &inline_config(200));
        find.open(&doc, &mut view);
        assert!(find.is_open());

        doc.read_only = true;
        find.content_reloaded(&doc, &mut view);
        assert!(!find.is_open());
        assert_eq!(handler.calls().last(), Some(&Call::Cleanup(3, 0)));
    }

    #[test]
    fn test_result_for_old_revision_is_searched_again() {
        let handler: Arc<dyn MatchHandler> = Arc::new(TextHandler::new());
        let mut find = FindCoordinator::with_handlers(
            handler,
            Arc::new(CodeHandler::new()),
            &background_config(),
        );
        let mut doc = Document::from_text("n.md", DocumentKind::Text, "one");
        let mut view = NoteView::new(doc.snapshot());
        find.open(&doc, &mut view);

        let now = Instant::now();
        find.on_input_changed("one".into(), now);
        find.tick(&doc, &mut view, now + Duration::from_millis(50));

        doc.replace_content("one one one");
        view.set_content(doc.snapshot());

        assert!(wait_for_result(&mut find, &doc, &mut view));
        assert_eq!(find.session().total_found, 3);
    }
}
