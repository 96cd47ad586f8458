use std::future::Future;

use futures::future::BoxFuture;

use crate::wizard::Transition;

/// Side effects returned from `App::update`, executed by the runtime
pub enum Command<Msg> {
    None,
    /// Run a future on the async runtime and feed its result back as a message
    Perform(BoxFuture<'static, Msg>),
    /// Ask the wizard host to move to another step
    Navigate(Transition),
    /// Close the app without a transition
    Quit,
}

impl<Msg: Send + 'static> Command<Msg> {
    pub fn perform<F, T, M>(future: F, to_msg: M) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        M: FnOnce(T) -> Msg + Send + 'static,
    {
        Self::Perform(Box::pin(async move { to_msg(future.await) }))
    }

    pub fn navigate(transition: Transition) -> Self {
        Self::Navigate(transition)
    }

    pub fn quit_self() -> Self {
        Self::Quit
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl<Msg> std::fmt::Debug for Command<Msg> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Perform(_) => write!(f, "Perform"),
            Self::Navigate(t) => write!(f, "Navigate({:?})", t),
            Self::Quit => write!(f, "Quit"),
        }
    }
}
