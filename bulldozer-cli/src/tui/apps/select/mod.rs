//! Data source selection step
//!
//! Shows the enumerated data nodes as a checkable list next to a preview of
//! the node last activated. Checkbox clicks mark nodes for migration and
//! record the selected id; label clicks (or Enter) load a preview.

pub mod app;
pub mod msg;
pub mod state;
pub mod view;

pub use app::SelectApp;
pub use state::SelectParams;
