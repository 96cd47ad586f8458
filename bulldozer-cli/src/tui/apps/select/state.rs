use std::time::Duration;

use crate::preview::PreviewCoordinator;
use crate::session::{BulldozerSession, DataNode, NodeRegistry};
use crate::tui::app::AppState;
use crate::tui::widgets::ListState;

/// Parameters from the wizard host
#[derive(Debug, Default)]
pub struct SelectParams {
    /// `None` when the host has nothing to migrate from
    pub session: Option<BulldozerSession>,
    pub fetch_timeout: Option<Duration>,
}

#[derive(Default)]
pub struct State {
    pub registry: NodeRegistry,

    /// Node whose checkbox was clicked last (independent of the preview)
    pub selected_id: Option<String>,

    pub node_list: ListState,

    /// Present only when the host supplied a session
    pub preview: Option<PreviewCoordinator>,

    /// First table column shown in the preview pane
    pub preview_column_offset: usize,
}

impl AppState for State {}

impl State {
    /// Whether the host supplied anything to select from
    pub fn has_session(&self) -> bool {
        self.preview.is_some()
    }

    /// Whether "next" is offered
    pub fn can_proceed(&self) -> bool {
        self.has_session() && !self.registry.is_empty()
    }

    /// Node under the list highlight
    pub fn highlighted_node(&self) -> Option<&DataNode> {
        self.node_list
            .selected()
            .and_then(|i| self.registry.list().get(i))
    }

    /// Move the list highlight to `node_id`
    pub fn highlight(&mut self, node_id: &str) {
        let position = self.registry.position(node_id);
        self.node_list.select_and_scroll(position, self.registry.len());
    }
}
