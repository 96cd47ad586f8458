use crossterm::event::KeyCode;

/// Highlight and scroll position of a list
#[derive(Debug, Clone)]
pub struct ListState {
    selected: Option<usize>,
    scroll_offset: usize,
    /// Rows kept between the highlight and the viewport edge
    scroll_off: usize,
    viewport_height: Option<usize>,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new()
    }
}

impl ListState {
    /// Nothing highlighted
    pub fn new() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            scroll_off: 2,
            viewport_height: None,
        }
    }

    /// First row highlighted
    pub fn with_selection() -> Self {
        Self {
            selected: Some(0),
            ..Self::new()
        }
    }

    /// Index of the highlighted row
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Index of the first visible row
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Called by the view with the real area height
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = Some(height);
    }

    /// Move the highlight and keep it visible
    pub fn select_and_scroll(&mut self, index: Option<usize>, item_count: usize) {
        self.selected = index.filter(|&i| i < item_count);
        let height = self.viewport_height.unwrap_or(item_count);
        self.update_scroll(height, item_count);
    }

    /// Handle a navigation key, returns true if it moved anything
    pub fn handle_key(&mut self, key: KeyCode, item_count: usize, visible_height: usize) -> bool {
        if item_count == 0 {
            return false;
        }
        let height = self.viewport_height.unwrap_or(visible_height).max(1);
        let last = item_count - 1;

        let next = match (key, self.selected) {
            (KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown, None) => 0,
            (KeyCode::Up, Some(0)) => last,
            (KeyCode::Up, Some(sel)) => sel.saturating_sub(1),
            (KeyCode::Down, Some(sel)) if sel >= last => 0,
            (KeyCode::Down, Some(sel)) => (sel + 1).min(last),
            (KeyCode::PageUp, Some(sel)) => sel.saturating_sub(height),
            (KeyCode::PageDown, Some(sel)) => (sel + height).min(last),
            (KeyCode::Home, _) => 0,
            (KeyCode::End, _) => last,
            _ => return false,
        };

        self.selected = Some(next);
        self.update_scroll(height, item_count);
        true
    }

    /// Clamp the scroll offset so the highlight stays inside the viewport
    pub fn update_scroll(&mut self, visible_height: usize, item_count: usize) {
        let Some(sel) = self.selected else {
            return;
        };
        let visible_height = visible_height.max(1);
        let scroll_off = self.scroll_off.min(visible_height.saturating_sub(1) / 2);

        let min_scroll = (sel + scroll_off + 1).saturating_sub(visible_height);
        let max_scroll = sel.saturating_sub(scroll_off);
        self.scroll_offset = self.scroll_offset.clamp(min_scroll, max_scroll.max(min_scroll));
        self.scroll_offset = self
            .scroll_offset
            .min(item_count.saturating_sub(visible_height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_wraps() {
        let mut list = ListState::with_selection();
        assert!(list.handle_key(KeyCode::Up, 3, 10));
        assert_eq!(list.selected(), Some(2));
        assert!(list.handle_key(KeyCode::Down, 3, 10));
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn test_empty_list_ignores_keys() {
        let mut list = ListState::new();
        assert!(!list.handle_key(KeyCode::Down, 0, 10));
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_scroll_follows_selection() {
        let mut list = ListState::with_selection();
        list.set_viewport_height(5);
        list.handle_key(KeyCode::End, 20, 5);
        assert_eq!(list.selected(), Some(19));
        assert_eq!(list.scroll_offset(), 15);

        list.handle_key(KeyCode::Home, 20, 5);
        assert_eq!(list.scroll_offset(), 0);

        list.handle_key(KeyCode::PageDown, 20, 5);
        assert_eq!(list.selected(), Some(5));
        let offset = list.scroll_offset();
        assert!(offset <= 5 && 5 < offset + 5);
    }

    #[test]
    fn test_select_and_scroll_ignores_out_of_range() {
        let mut list = ListState::new();
        list.select_and_scroll(Some(7), 3);
        assert_eq!(list.selected(), None);
        list.select_and_scroll(Some(1), 3);
        assert_eq!(list.selected(), Some(1));
    }
}
