use ratatui::layout::{Position, Rect};

/// Click targets registered while rendering a frame
///
/// Later registrations win when areas overlap, so a widget drawn on top of
/// another takes the click.
pub struct InteractionRegistry<Msg> {
    clicks: Vec<(Rect, Msg)>,
}

impl<Msg> Default for InteractionRegistry<Msg> {
    fn default() -> Self {
        Self { clicks: Vec::new() }
    }
}

impl<Msg: Clone> InteractionRegistry<Msg> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop last frame's targets, called before each render
    pub fn clear(&mut self) {
        self.clicks.clear();
    }

    /// Send `msg` when `area` is left-clicked; empty areas are ignored
    pub fn register_click(&mut self, area: Rect, msg: Msg) {
        if area.width > 0 && area.height > 0 {
            self.clicks.push((area, msg));
        }
    }

    /// Message for a click at the given cell, if any target covers it
    pub fn find_click(&self, column: u16, row: u16) -> Option<Msg> {
        let position = Position::new(column, row);
        self.clicks
            .iter()
            .rev()
            .find(|(area, _)| area.contains(position))
            .map(|(_, msg)| msg.clone())
    }

    /// Number of registered targets
    pub fn len(&self) -> usize {
        self.clicks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_click_prefers_latest() {
        let mut registry = InteractionRegistry::new();
        registry.register_click(Rect::new(0, 0, 10, 1), "row");
        registry.register_click(Rect::new(0, 0, 3, 1), "checkbox");
        registry.register_click(Rect::new(0, 5, 0, 1), "zero width");

        assert_eq!(registry.find_click(1, 0), Some("checkbox"));
        assert_eq!(registry.find_click(5, 0), Some("row"));
        assert_eq!(registry.find_click(5, 1), None);
        assert_eq!(registry.len(), 2);
    }
}
