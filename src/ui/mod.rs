mod editor;
mod find_bar;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;

pub use editor::render_editor;
pub use find_bar::{render_find_bar, FIND_BAR_HEIGHT};
pub use status_bar::render_status_bar;

pub fn render(f: &mut Frame, app: &mut App) {
    let find_height = if app.find.is_open() { FIND_BAR_HEIGHT } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(find_height),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_editor(f, app, chunks[0]);
    render_find_bar(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);
}
