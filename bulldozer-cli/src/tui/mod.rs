pub mod app;
pub mod apps;
pub mod command;
pub mod renderer;
pub mod runtime;
pub mod state;
pub mod subscription;
pub mod widgets;

pub use app::App;
pub use command::Command;
pub use renderer::InteractionRegistry;
pub use runtime::{Exit, Runtime};
pub use state::{RuntimeConfig, ThemeVariant};
pub use subscription::{KeyBinding, Subscription};
pub use widgets::ListState;
