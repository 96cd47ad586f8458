use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key plus modifiers. Shift is ignored for character keys so that
/// `Char('A')` matches however the terminal reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        let (want, got) = match self.code {
            KeyCode::Char(_) => (
                self.modifiers.difference(KeyModifiers::SHIFT),
                event.modifiers.difference(KeyModifiers::SHIFT),
            ),
            _ => (self.modifiers, event.modifiers),
        };
        self.code == event.code && want == got
    }

    /// Short label for the key hint bar
    pub fn display(&self) -> String {
        let key = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            other => format!("{:?}", other),
        };
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", key)
        } else {
            key
        }
    }
}

pub enum Subscription<Msg> {
    Keyboard {
        binding: KeyBinding,
        description: String,
        msg: Msg,
    },
}

impl<Msg: Clone> Subscription<Msg> {
    pub fn keyboard(binding: KeyBinding, description: impl Into<String>, msg: Msg) -> Self {
        Self::Keyboard {
            binding,
            description: description.into(),
            msg,
        }
    }

    /// Message for a key press, if this subscription handles it
    pub fn message_for(&self, event: &KeyEvent) -> Option<Msg> {
        match self {
            Self::Keyboard { binding, msg, .. } if binding.matches(event) => Some(msg.clone()),
            _ => None,
        }
    }
}
