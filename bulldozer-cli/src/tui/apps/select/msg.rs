use crossterm::event::KeyCode;

use crate::preview::{PreviewOutcome, PreviewToken};

#[derive(Clone, Debug)]
pub enum Msg {
    /// Move the highlight in the node list
    ListNavigate(KeyCode),
    /// Checkbox of a node clicked: toggle it and remember it as selected
    CheckboxClicked(String),
    /// Space on the highlighted row
    ToggleHighlighted,
    /// Label of a node clicked: preview it
    LabelClicked(String),
    /// Enter on the highlighted row
    ActivateHighlighted,
    /// A preview fetch finished (possibly for a superseded request)
    PreviewLoaded {
        token: PreviewToken,
        outcome: PreviewOutcome,
    },
    SelectAll,
    UnselectAll,
    ScrollPreviewLeft,
    ScrollPreviewRight,
    Back,
    Next,
    Quit,
}
