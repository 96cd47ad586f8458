//! App runtime
//!
//! Owns the app state and is the only place `App::update` is called from.
//! Async work from `Command::perform` runs on the tokio runtime and comes
//! back through an unbounded channel; `drain_pending` applies those messages
//! on the interactive loop, so app state needs no locking.

use std::time::Duration;

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::app::App;
use super::command::Command;
use super::renderer::InteractionRegistry;
use super::subscription::{KeyBinding, Subscription};
use crate::wizard::Transition;

/// Why the runtime stopped
#[derive(Debug)]
pub enum Exit {
    Quit,
    Transition(Transition),
}

pub struct Runtime<A: App> {
    state: A::State,
    handle: Handle,
    tx: mpsc::UnboundedSender<A::Msg>,
    rx: mpsc::UnboundedReceiver<A::Msg>,
    registry: InteractionRegistry<A::Msg>,
    exit: Option<Exit>,
    in_flight: usize,
}

impl<A: App> Runtime<A> {
    /// Initialize the app and start whatever its `init` command asks for
    pub fn new(params: A::InitParams, handle: Handle) -> Self {
        let (state, command) = A::init(params);
        let (tx, rx) = mpsc::unbounded_channel();
        let mut runtime = Self {
            state,
            handle,
            tx,
            rx,
            registry: InteractionRegistry::new(),
            exit: None,
            in_flight: 0,
        };
        runtime.execute(command);
        runtime
    }

    /// Current app state
    pub fn state(&self) -> &A::State {
        &self.state
    }

    /// Exit requested by the app, if any
    pub fn exit(&self) -> Option<&Exit> {
        self.exit.as_ref()
    }

    /// Take the pending exit, clearing it
    pub fn take_exit(&mut self) -> Option<Exit> {
        self.exit.take()
    }

    /// Async commands started but not yet delivered
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Run `update` with `msg` and execute the returned command
    pub fn dispatch(&mut self, msg: A::Msg) {
        log::trace!("[{}] {:?}", A::title(), msg);
        let command = A::update(&mut self.state, msg);
        self.execute(command);
    }

    fn execute(&mut self, command: Command<A::Msg>) {
        match command {
            Command::None => {}
            Command::Perform(future) => {
                let tx = self.tx.clone();
                self.in_flight += 1;
                self.handle.spawn(async move {
                    let msg = future.await;
                    // Receiver only goes away when the runtime is dropped
                    let _ = tx.send(msg);
                });
            }
            Command::Navigate(transition) => {
                log::info!("[{}] Navigation requested: {}", A::title(), transition_name(&transition));
                self.exit = Some(Exit::Transition(transition));
            }
            Command::Quit => {
                self.exit = Some(Exit::Quit);
            }
        }
    }

    fn deliver(&mut self, msg: A::Msg) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.dispatch(msg);
    }

    /// Apply every completed async result without waiting
    pub fn drain_pending(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.deliver(msg);
            delivered += 1;
        }
        delivered
    }

    /// Wait for the next async result and apply it
    pub async fn process_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(msg) => {
                self.deliver(msg);
                true
            }
            None => false,
        }
    }

    /// Wait until nothing started by the app is still running
    pub async fn settle(&mut self) {
        while self.in_flight > 0 && self.process_next().await {}
    }

    /// Ctrl+C always quits; other keys go through the app's subscriptions
    pub fn handle_key(&mut self, key: KeyEvent) {
        if KeyBinding::ctrl(KeyCode::Char('c')).matches(&key) {
            self.exit = Some(Exit::Quit);
            return;
        }
        let msg = A::subscriptions(&self.state)
            .iter()
            .find_map(|sub| sub.message_for(&key));
        if let Some(msg) = msg {
            self.dispatch(msg);
        }
    }

    /// Left clicks hit-test against the targets of the last frame
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if let Some(msg) = self.registry.find_click(mouse.column, mouse.row) {
                self.dispatch(msg);
            }
        }
    }

    /// Draw header, app body and key hints, rebuilding click targets
    pub fn render(&mut self, frame: &mut Frame) {
        let theme = &crate::global_runtime_config().theme;
        self.registry.clear();

        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let mut title = vec![Span::styled(
            format!(" {} ", A::title()),
            Style::default().fg(theme.accent_primary).bold(),
        )];
        if let Some(status) = A::status(&self.state) {
            title.push(Span::raw(" "));
            title.extend(status.spans);
        }
        frame.render_widget(Paragraph::new(Line::from(title)), header);

        A::view(&mut self.state, frame, body, &mut self.registry);

        render_key_hints(frame, footer, &A::subscriptions(&self.state));
    }

    /// Drive the app until it quits or requests a transition
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> anyhow::Result<Exit> {
        loop {
            self.drain_pending();
            if let Some(exit) = self.exit.take() {
                return Ok(exit);
            }

            terminal
                .draw(|frame| self.render(frame))
                .context("Failed to draw frame")?;

            if event::poll(Duration::from_millis(50)).context("Failed to poll terminal events")? {
                match event::read().context("Failed to read terminal event")? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }
    }
}

fn transition_name(transition: &Transition) -> &'static str {
    match transition {
        Transition::Back => "back",
        Transition::Next(_) => "next",
    }
}

fn render_key_hints<Msg>(frame: &mut Frame, area: Rect, subscriptions: &[Subscription<Msg>]) {
    let theme = &crate::global_runtime_config().theme;
    let mut spans = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for sub in subscriptions {
        let Subscription::Keyboard { binding, description, .. } = sub;
        if seen.contains(&description.as_str()) {
            continue;
        }
        seen.push(description.as_str());
        spans.push(Span::styled(
            format!(" {} ", binding.display()),
            Style::default().fg(theme.accent_primary),
        ));
        spans.push(Span::styled(
            format!("{} ", description),
            Style::default().fg(theme.text_tertiary),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
