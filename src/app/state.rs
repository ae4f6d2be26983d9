use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;

use crate::config::{Config, Theme};
use crate::document::Document;
use crate::editor::{process_find_key, process_viewer_key, FindAction, NoteView, ViewerAction};
use crate::highlight::Highlighter;
use crate::search::FindCoordinator;

/// Longest the event loop sleeps when nothing is scheduled
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Note,
    FindInput,
}

pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub document: Document,
    pub view: NoteView,
    pub find: FindCoordinator,
    pub highlighter: Highlighter,
    pub focus: Focus,
    pub status_message: Option<String>,
    pub should_quit: bool,
    next_reload_check: Instant,
}

impl App {
    pub fn new(config: Config, document: Document) -> Self {
        let theme = Theme::from_name(&config.theme);
        let highlighter = Highlighter::new(&config.editor.syntax_theme);
        let find = FindCoordinator::new(&config.find);
        let view = NoteView::new(document.snapshot());
        let next_reload_check = Instant::now() + Duration::from_millis(config.editor.reload_poll_ms);

        Self {
            config,
            theme,
            document,
            view,
            find,
            highlighter,
            focus: Focus::Note,
            status_message: None,
            should_quit: false,
            next_reload_check,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match self.focus {
            Focus::Note => self.handle_viewer_key(key),
            Focus::FindInput => self.handle_find_key(key, now),
        }
    }

    fn handle_viewer_key(&mut self, key: KeyEvent) {
        match process_viewer_key(key) {
            ViewerAction::Move(movement) => self.view.move_cursor(movement),
            ViewerAction::Select(movement) => self.view.extend_selection(movement),
            ViewerAction::OpenFind => self.open_find(),
            ViewerAction::FindNext(direction) => {
                self.find.find_next(&self.document, &mut self.view, direction);
            }
            ViewerAction::CloseFind => self.find.close(&self.document, &mut self.view),
            ViewerAction::Quit => self.should_quit = true,
            ViewerAction::None => {}
        }
    }

    fn handle_find_key(&mut self, key: KeyEvent, now: Instant) {
        match process_find_key(key) {
            FindAction::InsertChar(c) => self.find.insert_char(c, now),
            FindAction::DeleteCharBefore => self.find.delete_char_before(now),
            FindAction::ClearInput => self.find.clear_input(now),
            FindAction::Submit { shift } => {
                self.find.submit(&self.document, &mut self.view, shift);
            }
            FindAction::Toggle(option) => {
                self.find.toggle_option(&self.document, &mut self.view, option);
            }
            FindAction::SelectAll => self.find.select_input(),
            FindAction::Close => {
                self.find.close(&self.document, &mut self.view);
                self.focus = Focus::Note;
            }
            FindAction::Blur => self.focus = Focus::Note,
            FindAction::None => {}
        }
    }

    fn open_find(&mut self) {
        if self.find.open(&self.document, &mut self.view) {
            self.focus = Focus::FindInput;
            self.status_message = None;
        } else {
            let reason = if self.document.read_only { "read-only" } else { self.document.kind.label() };
            self.status_message = Some(format!("Find is not available for {} notes", reason));
        }
    }

    /// Timers and background work: debounce, worker results, reloads.
    pub fn tick(&mut self, now: Instant) {
        self.find.tick(&self.document, &mut self.view, now);
        self.find.poll_results(&self.document, &mut self.view);

        if now >= self.next_reload_check {
            self.next_reload_check = now + Duration::from_millis(self.config.editor.reload_poll_ms);
            self.check_reload();
        }
    }

    fn check_reload(&mut self) {
        match self.document.reload_if_changed() {
            Ok(true) => {
                self.view.set_content(self.document.snapshot());
                self.find.content_reloaded(&self.document, &mut self.view);
                if !self.find.is_open() {
                    self.focus = Focus::Note;
                }
                self.status_message = Some("Note changed on disk, reloaded".to_string());
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "reload failed");
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let mut wake = self.next_reload_check;
        if let Some(due) = self.find.next_deadline() {
            wake = wake.min(due);
        }
        wake.saturating_duration_since(now).min(IDLE_POLL)
    }
}
