pub mod config;
pub mod theme;

pub use config::RuntimeConfig;
pub use theme::{Theme, ThemeVariant};
