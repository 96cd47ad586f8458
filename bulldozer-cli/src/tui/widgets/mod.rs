pub mod list;
pub mod text;

pub use list::ListState;
pub use text::{display_width, truncate_to_width};
