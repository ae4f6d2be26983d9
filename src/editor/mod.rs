pub mod cursor;
pub mod input;
mod view;

pub use cursor::{CursorMove, Position};
pub use input::{process_find_key, process_viewer_key, FindAction, ViewerAction};
pub use view::NoteView;
