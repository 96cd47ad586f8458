//! Preview loading for the select screen

pub mod coordinator;

pub use coordinator::{Completion, PreviewCoordinator, PreviewOutcome, PreviewState, PreviewToken};
