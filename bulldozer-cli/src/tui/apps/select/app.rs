//! Select step - main application

use crossterm::event::KeyCode;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::preview::{Completion, PreviewCoordinator};
use crate::tui::{App, Command, InteractionRegistry, KeyBinding, ListState, Subscription};
use crate::wizard::{Handoff, Transition};

use super::msg::Msg;
use super::state::{SelectParams, State};
use super::view;

pub struct SelectApp;

impl App for SelectApp {
    type State = State;
    type Msg = Msg;
    type InitParams = SelectParams;

    fn init(params: SelectParams) -> (State, Command<Msg>) {
        let Some(session) = params.session else {
            log::info!("No session supplied, showing empty state");
            return (State::default(), Command::None);
        };

        let mut state = State {
            registry: session.data_nodes,
            preview: Some(PreviewCoordinator::new(session.fetcher).with_timeout(params.fetch_timeout)),
            ..Default::default()
        };

        // Check and preview the first node before the first frame
        let Some(first) = state.registry.first().map(|n| n.id.clone()) else {
            log::info!("Session has no data nodes");
            return (state, Command::None);
        };
        state.registry.set_checked(&first, true);
        state.node_list = ListState::with_selection();
        let cmd = request_preview(&mut state, first);

        (state, cmd)
    }

    fn update(state: &mut State, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::ListNavigate(key) => {
                let count = state.registry.len();
                state.node_list.handle_key(key, count, 20);
                Command::None
            }
            Msg::CheckboxClicked(node_id) => {
                match state.registry.toggle(&node_id) {
                    Some(checked) => {
                        log::debug!("[{}] checked = {}", node_id, checked);
                        state.highlight(&node_id);
                        state.selected_id = Some(node_id);
                    }
                    None => log::warn!("Checkbox clicked for unknown node '{}'", node_id),
                }
                Command::None
            }
            Msg::ToggleHighlighted => match state.highlighted_node() {
                Some(node) => {
                    let id = node.id.clone();
                    Self::update(state, Msg::CheckboxClicked(id))
                }
                None => Command::None,
            },
            Msg::LabelClicked(node_id) => {
                if state.registry.get(&node_id).is_none() {
                    log::warn!("Preview requested for unknown node '{}'", node_id);
                    return Command::None;
                }
                state.highlight(&node_id);
                request_preview(state, node_id)
            }
            Msg::ActivateHighlighted => match state.highlighted_node() {
                Some(node) => {
                    let id = node.id.clone();
                    Self::update(state, Msg::LabelClicked(id))
                }
                None => Command::None,
            },
            Msg::PreviewLoaded { token, outcome } => {
                if let Some(preview) = state.preview.as_mut() {
                    if preview.complete(token, outcome) == Completion::Displayed {
                        state.preview_column_offset = 0;
                    }
                }
                Command::None
            }
            Msg::SelectAll => {
                state.registry.set_all_checked(true);
                Command::None
            }
            Msg::UnselectAll => {
                state.registry.set_all_checked(false);
                Command::None
            }
            Msg::ScrollPreviewLeft => {
                state.preview_column_offset = state.preview_column_offset.saturating_sub(1);
                Command::None
            }
            Msg::ScrollPreviewRight => {
                let columns = state
                    .preview
                    .as_ref()
                    .and_then(|p| p.pane().visible_table())
                    .map(|t| t.column_count())
                    .unwrap_or(0);
                if state.preview_column_offset + 1 < columns {
                    state.preview_column_offset += 1;
                }
                Command::None
            }
            Msg::Back => Command::navigate(Transition::Back),
            Msg::Next => {
                if !state.can_proceed() {
                    return Command::None;
                }
                log::info!(
                    "Continuing with {} of {} data sources",
                    state.registry.checked_count(),
                    state.registry.len()
                );
                Command::navigate(Transition::Next(Handoff {
                    nodes: state.registry.clone(),
                    selected_id: state.selected_id.clone(),
                }))
            }
            Msg::Quit => Command::quit_self(),
        }
    }

    fn view(state: &mut State, frame: &mut Frame, area: Rect, registry: &mut InteractionRegistry<Msg>) {
        view::render(state, frame, area, registry);
    }

    fn subscriptions(state: &State) -> Vec<Subscription<Msg>> {
        let mut subs = Vec::new();

        if state.can_proceed() {
            for key in [
                KeyCode::Up,
                KeyCode::Down,
                KeyCode::PageUp,
                KeyCode::PageDown,
                KeyCode::Home,
                KeyCode::End,
            ] {
                subs.push(Subscription::keyboard(KeyBinding::new(key), "Move", Msg::ListNavigate(key)));
            }
            subs.extend([
                Subscription::keyboard(KeyBinding::new(KeyCode::Char(' ')), "Toggle", Msg::ToggleHighlighted),
                Subscription::keyboard(KeyBinding::new(KeyCode::Enter), "Preview", Msg::ActivateHighlighted),
                Subscription::keyboard(KeyBinding::new(KeyCode::Char('a')), "Select all", Msg::SelectAll),
                Subscription::keyboard(KeyBinding::new(KeyCode::Char('u')), "Unselect all", Msg::UnselectAll),
                Subscription::keyboard(KeyBinding::new(KeyCode::Left), "Scroll columns", Msg::ScrollPreviewLeft),
                Subscription::keyboard(KeyBinding::new(KeyCode::Right), "Scroll columns", Msg::ScrollPreviewRight),
                Subscription::keyboard(KeyBinding::new(KeyCode::Char('n')), "Next", Msg::Next),
            ]);
        }

        subs.extend([
            Subscription::keyboard(KeyBinding::new(KeyCode::Char('b')), "Back", Msg::Back),
            Subscription::keyboard(KeyBinding::new(KeyCode::Esc), "Back", Msg::Back),
            Subscription::keyboard(KeyBinding::new(KeyCode::Char('q')), "Quit", Msg::Quit),
        ]);
        subs
    }

    fn title() -> &'static str {
        "Select Data Sources"
    }

    fn status(state: &State) -> Option<Line<'static>> {
        if !state.can_proceed() {
            return None;
        }
        let theme = &crate::global_runtime_config().theme;

        let mut spans = vec![Span::styled(
            format!("{} of {} selected", state.registry.checked_count(), state.registry.len()),
            Style::default().fg(theme.text_secondary),
        )];
        if let Some(loading) = state
            .preview
            .as_ref()
            .filter(|p| p.is_loading())
            .and_then(|p| p.current())
        {
            spans.push(Span::styled(
                format!("  loading {}", loading.node_id()),
                Style::default().fg(theme.accent_warning),
            ));
        }
        Some(Line::from(spans))
    }
}

/// Issue a preview request; the fetch runs on a worker and comes back as `PreviewLoaded`
fn request_preview(state: &mut State, node_id: String) -> Command<Msg> {
    let Some(preview) = state.preview.as_mut() else {
        return Command::None;
    };
    let task = preview.request(node_id);
    Command::perform(task.run(), |(token, outcome)| Msg::PreviewLoaded { token, outcome })
}
