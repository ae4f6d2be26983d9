mod state;
mod welcome_notes;

pub use state::{App, Focus};
pub use welcome_notes::{WELCOME_CONTENT, WELCOME_TITLE};
