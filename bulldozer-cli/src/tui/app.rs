use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;

use super::command::Command;
use super::renderer::InteractionRegistry;
use super::subscription::Subscription;

pub trait AppState: Send + 'static {}

/// Elm-style app: state is only mutated in `update`, on the runtime loop
pub trait App: 'static {
    type State: AppState;
    type Msg: Clone + Send + std::fmt::Debug + 'static;
    type InitParams;

    fn init(params: Self::InitParams) -> (Self::State, Command<Self::Msg>);

    fn update(state: &mut Self::State, msg: Self::Msg) -> Command<Self::Msg>;

    /// Draw into `area` and register click targets
    fn view(
        state: &mut Self::State,
        frame: &mut Frame,
        area: Rect,
        registry: &mut InteractionRegistry<Self::Msg>,
    );

    fn subscriptions(state: &Self::State) -> Vec<Subscription<Self::Msg>>;

    fn title() -> &'static str;

    fn status(_state: &Self::State) -> Option<Line<'static>> {
        None
    }
}
