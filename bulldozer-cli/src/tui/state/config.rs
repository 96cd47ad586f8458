use super::theme::{Theme, ThemeVariant};

/// Process-wide UI settings, installed once at startup
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub theme: Theme,
}

impl RuntimeConfig {
    pub fn new(variant: ThemeVariant) -> Self {
        Self {
            theme: Theme::new(variant),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}
