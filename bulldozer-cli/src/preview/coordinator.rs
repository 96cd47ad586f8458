//! Preview coordinator
//!
//! Issues preview fetches off the interactive loop and decides whether a
//! finished fetch is still the one the screen should show. Every request gets
//! a fresh token; only a completion carrying the current token may touch the
//! pane, so a slow earlier fetch can never overwrite a later one. Superseded
//! fetches are not cancelled, their results are just dropped.

use std::sync::Arc;
use std::time::Duration;

use crate::session::{PreviewFetcher, PreviewTable};

/// Identifies one preview request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewToken {
    seq: u64,
    node_id: String,
}

impl PreviewToken {
    /// Node this request is for
    pub fn node_id(&self) -> &str {
        &self.node_id
    }
}

/// What a finished fetch produced
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    Loaded(PreviewTable),
    /// No table, or a table without rows
    Empty,
    Failed(String),
}

impl PreviewOutcome {
    /// Classify a fetch result; a table without rows counts as empty
    pub fn from_fetch(result: anyhow::Result<Option<PreviewTable>>) -> Self {
        match result {
            Ok(Some(table)) if !table.is_empty() => Self::Loaded(table),
            Ok(_) => Self::Empty,
            Err(e) => Self::Failed(format!("{:#}", e)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewState {
    #[default]
    Idle,
    Loading { node_id: String },
    Displayed { node_id: String },
    Failed { node_id: String, reason: Option<String> },
}

/// Result of handing a finished fetch to the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Displayed,
    Failed,
    /// A newer request was issued; nothing changed
    Stale,
}

/// The display surface for previews
#[derive(Debug, Clone, Default)]
pub struct PreviewPane {
    node_id: Option<String>,
    table: Option<PreviewTable>,
    table_visible: bool,
    empty_state_visible: bool,
}

impl PreviewPane {
    /// The table, if the table view is currently visible
    pub fn visible_table(&self) -> Option<&PreviewTable> {
        if self.table_visible {
            self.table.as_ref()
        } else {
            None
        }
    }

    /// Whether the table view is shown
    pub fn is_table_visible(&self) -> bool {
        self.table_visible
    }

    /// Whether the "no data" indicator is shown
    pub fn is_empty_state_visible(&self) -> bool {
        self.empty_state_visible
    }

    /// Node whose outcome the pane currently reflects
    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    fn show_table(&mut self, node_id: String, table: PreviewTable) {
        self.node_id = Some(node_id);
        self.table = Some(table);
        self.table_visible = true;
        self.empty_state_visible = false;
    }

    fn show_empty_state(&mut self, node_id: String) {
        self.node_id = Some(node_id);
        self.table_visible = false;
        self.empty_state_visible = true;
    }
}

/// A fetch ready to run on a worker
pub struct PreviewTask {
    token: PreviewToken,
    fetcher: Arc<dyn PreviewFetcher>,
    timeout: Option<Duration>,
}

impl PreviewTask {
    /// Token the result will be reported under
    pub fn token(&self) -> &PreviewToken {
        &self.token
    }

    /// Run the fetch on a blocking worker and report back with the token
    pub async fn run(self) -> (PreviewToken, PreviewOutcome) {
        let node_id = self.token.node_id.clone();
        let fetcher = self.fetcher;
        let work = tokio::task::spawn_blocking(move || fetcher.fetch(&node_id));

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, work).await {
                Ok(joined) => joined,
                Err(_) => {
                    let reason = format!("Preview timed out after {}ms", limit.as_millis());
                    return (self.token, PreviewOutcome::Failed(reason));
                }
            },
            None => work.await,
        };

        let outcome = match joined {
            Ok(result) => PreviewOutcome::from_fetch(result),
            Err(e) => PreviewOutcome::Failed(format!("Preview worker failed: {}", e)),
        };
        (self.token, outcome)
    }
}

pub struct PreviewCoordinator {
    fetcher: Arc<dyn PreviewFetcher>,
    timeout: Option<Duration>,
    current: Option<PreviewToken>,
    next_seq: u64,
    state: PreviewState,
    pane: PreviewPane,
}

impl PreviewCoordinator {
    /// Idle coordinator with no timeout
    pub fn new(fetcher: Arc<dyn PreviewFetcher>) -> Self {
        Self {
            fetcher,
            timeout: None,
            current: None,
            next_seq: 1,
            state: PreviewState::Idle,
            pane: PreviewPane::default(),
        }
    }

    /// Give up on fetches slower than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Lifecycle state of the current request
    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// What the preview pane shows right now
    pub fn pane(&self) -> &PreviewPane {
        &self.pane
    }

    /// Token of the latest request, `None` before the first one
    pub fn current(&self) -> Option<&PreviewToken> {
        self.current.as_ref()
    }

    /// True while the current request has not completed
    pub fn is_loading(&self) -> bool {
        matches!(self.state, PreviewState::Loading { .. })
    }

    /// Make `node_id` the current request and hand back the fetch to run
    pub fn request(&mut self, node_id: impl Into<String>) -> PreviewTask {
        let node_id = node_id.into();
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);

        if let PreviewState::Loading { node_id: previous } = &self.state {
            log::debug!("Preview for '{}' superseded by '{}'", previous, node_id);
        }

        let token = PreviewToken {
            seq,
            node_id: node_id.clone(),
        };
        self.current = Some(token.clone());
        self.state = PreviewState::Loading { node_id };

        PreviewTask {
            token,
            fetcher: Arc::clone(&self.fetcher),
            timeout: self.timeout,
        }
    }

    /// Apply a finished fetch if its token is still current
    pub fn complete(&mut self, token: PreviewToken, outcome: PreviewOutcome) -> Completion {
        if self.current.as_ref() != Some(&token) {
            log::debug!(
                "Dropping stale preview for '{}' (request #{})",
                token.node_id,
                token.seq
            );
            return Completion::Stale;
        }

        let node_id = token.node_id;
        match outcome {
            PreviewOutcome::Loaded(table) => {
                log::info!(
                    "[{}] Preview loaded: {} columns, {} rows",
                    node_id,
                    table.column_count(),
                    table.row_count()
                );
                self.state = PreviewState::Displayed {
                    node_id: node_id.clone(),
                };
                self.pane.show_table(node_id, table);
                Completion::Displayed
            }
            PreviewOutcome::Empty => {
                log::info!("[{}] Preview returned no data", node_id);
                self.state = PreviewState::Failed {
                    node_id: node_id.clone(),
                    reason: None,
                };
                self.pane.show_empty_state(node_id);
                Completion::Failed
            }
            PreviewOutcome::Failed(reason) => {
                log::warn!("[{}] Preview failed: {}", node_id, reason);
                self.state = PreviewState::Failed {
                    node_id: node_id.clone(),
                    reason: Some(reason),
                };
                self.pane.show_empty_state(node_id);
                Completion::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::testing::{GatedFetcher, StaticFetcher, table};

    fn coordinator(fetcher: impl PreviewFetcher + 'static) -> PreviewCoordinator {
        PreviewCoordinator::new(Arc::new(fetcher))
    }

    #[test]
    fn test_request_enters_loading() {
        let mut coordinator = coordinator(StaticFetcher::default());
        assert_eq!(coordinator.state(), &PreviewState::Idle);

        let task = coordinator.request("1");
        assert_eq!(task.token().node_id(), "1");
        assert!(coordinator.is_loading());
        assert_eq!(coordinator.current(), Some(task.token()));
        assert!(!coordinator.pane().is_table_visible());
        assert!(!coordinator.pane().is_empty_state_visible());
    }

    #[test]
    fn test_current_success_displays_table() {
        let mut coordinator = coordinator(StaticFetcher::default());
        let task = coordinator.request("1");

        let done = coordinator.complete(task.token().clone(), PreviewOutcome::Loaded(table("1")));
        assert_eq!(done, Completion::Displayed);
        assert_eq!(coordinator.state(), &PreviewState::Displayed { node_id: "1".into() });
        let pane = coordinator.pane();
        assert_eq!(pane.visible_table(), Some(&table("1")));
        assert!(!pane.is_empty_state_visible());
        assert_eq!(pane.node_id(), Some("1"));
    }

    #[test]
    fn test_current_failure_shows_empty_state() {
        let mut coordinator = coordinator(StaticFetcher::default());
        let first = coordinator.request("1");
        coordinator.complete(first.token().clone(), PreviewOutcome::Loaded(table("1")));

        let second = coordinator.request("2");
        let done = coordinator.complete(
            second.token().clone(),
            PreviewOutcome::Failed("disk on fire".into()),
        );
        assert_eq!(done, Completion::Failed);
        assert!(coordinator.pane().visible_table().is_none());
        assert!(coordinator.pane().is_empty_state_visible());
        assert_eq!(
            coordinator.state(),
            &PreviewState::Failed {
                node_id: "2".into(),
                reason: Some("disk on fire".into())
            }
        );
    }

    #[test]
    fn test_empty_outcome_shows_empty_state() {
        let mut coordinator = coordinator(StaticFetcher::default());
        let task = coordinator.request("1");
        assert_eq!(
            coordinator.complete(task.token().clone(), PreviewOutcome::Empty),
            Completion::Failed
        );
        assert!(coordinator.pane().is_empty_state_visible());
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut coordinator = coordinator(StaticFetcher::default());
        let a = coordinator.request("A");
        let b = coordinator.request("B");

        assert_eq!(
            coordinator.complete(b.token().clone(), PreviewOutcome::Loaded(table("B"))),
            Completion::Displayed
        );
        assert_eq!(
            coordinator.complete(a.token().clone(), PreviewOutcome::Loaded(table("A"))),
            Completion::Stale
        );
        assert_eq!(coordinator.pane().visible_table(), Some(&table("B")));
        assert_eq!(coordinator.state(), &PreviewState::Displayed { node_id: "B".into() });
    }

    #[test]
    fn test_stale_failure_does_not_hide_current_table() {
        let mut coordinator = coordinator(StaticFetcher::default());
        let a = coordinator.request("A");
        let b = coordinator.request("B");
        coordinator.complete(b.token().clone(), PreviewOutcome::Loaded(table("B")));
        coordinator.complete(a.token().clone(), PreviewOutcome::Failed("late".into()));

        assert!(coordinator.pane().is_table_visible());
        assert!(!coordinator.pane().is_empty_state_visible());
    }

    #[test]
    fn test_stale_completion_while_newer_is_loading() {
        let mut coordinator = coordinator(StaticFetcher::default());
        let a = coordinator.request("A");
        let _b = coordinator.request("B");

        assert_eq!(
            coordinator.complete(a.token().clone(), PreviewOutcome::Loaded(table("A"))),
            Completion::Stale
        );
        assert_eq!(coordinator.state(), &PreviewState::Loading { node_id: "B".into() });
        assert!(coordinator.pane().visible_table().is_none());
    }

    #[test]
    fn test_repeated_request_for_same_node_supersedes() {
        let mut coordinator = coordinator(StaticFetcher::default());
        let first = coordinator.request("A");
        let second = coordinator.request("A");
        assert_ne!(first.token(), second.token());

        assert_eq!(
            coordinator.complete(first.token().clone(), PreviewOutcome::Empty),
            Completion::Stale
        );
        assert_eq!(
            coordinator.complete(second.token().clone(), PreviewOutcome::Loaded(table("A"))),
            Completion::Displayed
        );
    }

    #[tokio::test]
    async fn test_run_maps_fetch_results() {
        let fetcher = StaticFetcher::default()
            .with_table("ok", table("ok"))
            .with_none("none")
            .with_error("bad", "permission denied");
        let mut coordinator = coordinator(fetcher);

        let (token, outcome) = coordinator.request("ok").run().await;
        assert_eq!(token.node_id(), "ok");
        assert_eq!(outcome, PreviewOutcome::Loaded(table("ok")));

        let (_, outcome) = coordinator.request("none").run().await;
        assert_eq!(outcome, PreviewOutcome::Empty);

        let (_, outcome) = coordinator.request("bad").run().await;
        assert!(matches!(outcome, PreviewOutcome::Failed(reason) if reason.contains("permission denied")));
    }

    #[tokio::test]
    async fn test_header_only_table_is_empty() {
        let fetcher = StaticFetcher::default()
            .with_table("hdr", PreviewTable::new(vec!["id".into()], vec![]));
        let mut coordinator = coordinator(fetcher);
        let (_, outcome) = coordinator.request("hdr").run().await;
        assert_eq!(outcome, PreviewOutcome::Empty);
    }

    #[tokio::test]
    async fn test_panicking_fetcher_degrades_to_failure() {
        struct Panics;
        impl PreviewFetcher for Panics {
            fn fetch(&self, _node_id: &str) -> anyhow::Result<Option<PreviewTable>> {
                panic!("driver crashed");
            }
        }

        let mut coordinator = coordinator(Panics);
        let task = coordinator.request("1");
        let (token, outcome) = task.run().await;
        assert!(matches!(outcome, PreviewOutcome::Failed(_)));
        assert_eq!(coordinator.complete(token, outcome), Completion::Failed);
        assert!(coordinator.pane().is_empty_state_visible());
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_failure() {
        let (fetcher, gates) = GatedFetcher::new(&["slow"]);
        let mut coordinator = PreviewCoordinator::new(Arc::new(fetcher))
            .with_timeout(Some(Duration::from_millis(20)));

        let (_, outcome) = coordinator.request("slow").run().await;
        assert!(matches!(outcome, PreviewOutcome::Failed(reason) if reason.contains("timed out")));

        // Unblock the abandoned worker so the blocking pool can shut down
        gates.release("slow", None);
    }

    #[tokio::test]
    async fn test_slow_earlier_fetch_never_overwrites_later_one() {
        let (fetcher, gates) = GatedFetcher::new(&["A", "B"]);
        let mut coordinator = coordinator(fetcher);

        let a = tokio::spawn(coordinator.request("A").run());
        let b = tokio::spawn(coordinator.request("B").run());

        gates.release("B", Some(table("B")));
        let (token, outcome) = b.await.unwrap();
        assert_eq!(coordinator.complete(token, outcome), Completion::Displayed);

        gates.release("A", Some(table("A")));
        let (token, outcome) = a.await.unwrap();
        assert_eq!(coordinator.complete(token, outcome), Completion::Stale);

        assert_eq!(coordinator.pane().visible_table(), Some(&table("B")));
        assert_eq!(coordinator.pane().node_id(), Some("B"));
    }

    #[tokio::test]
    async fn test_later_failure_wins_over_earlier_success() {
        let (fetcher, gates) = GatedFetcher::new(&["A", "B"]);
        let mut coordinator = coordinator(fetcher);

        let a = tokio::spawn(coordinator.request("A").run());
        let b = tokio::spawn(coordinator.request("B").run());

        gates.release("B", None);
        let (token, outcome) = b.await.unwrap();
        coordinator.complete(token, outcome);

        gates.release("A", Some(table("A")));
        let (token, outcome) = a.await.unwrap();
        coordinator.complete(token, outcome);

        assert!(coordinator.pane().is_empty_state_visible());
        assert!(coordinator.pane().visible_table().is_none());
        assert_eq!(coordinator.pane().node_id(), Some("B"));
    }
}
