//! Hand-off between wizard steps

use serde::Serialize;

use crate::session::NodeRegistry;

/// What the select step hands to the configuration step
#[derive(Debug, Clone, Serialize)]
pub struct Handoff {
    pub nodes: NodeRegistry,
    /// Node whose checkbox was clicked last
    pub selected_id: Option<String>,
}

/// Requests a step makes of the wizard host
#[derive(Debug, Clone)]
pub enum Transition {
    /// Pop this step
    Back,
    /// Continue to the next step with the given selection
    Next(Handoff),
}
