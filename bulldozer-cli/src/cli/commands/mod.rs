pub mod nodes;
pub mod preview;
pub mod select;

pub use nodes::handle_nodes_command;
pub use preview::handle_preview_command;
pub use select::handle_select_command;
