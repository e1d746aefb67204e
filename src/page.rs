//! Glue between a [`GraphSession`] and the iced runtime.
//!
//! [`Page`] turns the [`Effect`]s of the engine into tasks against a
//! [`GraphBackend`] and feeds the responses back as [`Message`]s. Anything
//! the embedding application has to act on surfaces as an [`Action`].

use std::time::{Duration, Instant};

use iced::widget::Canvas;
use iced::{Element, Length, Subscription, Task};

use data::{EngineConfig, GraphId, Timestamp};
use fetch::{AjaxGraph, FetchError, GraphBackend, HoverData, LoadRequest, SyncPool};
use iced_core::{Rectangle, Size, Vector};
use rustc_hash::FxHashMap;

use crate::action::{ClickHandlers, ClickOutcome};
use crate::interaction;
use crate::session::GraphSession;
use crate::style::GraphStyle;
use crate::update::{self, Effect, SyncJob};
use crate::widget::GraphCanvas;

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub enum Message {
    Pointer(GraphId, interaction::Event),
    Tick(Instant),
    Refreshed(GraphId, Result<AjaxGraph, FetchError>),
    Synced(GraphId, Result<AjaxGraph, FetchError>),
    Hovered(GraphId, Result<HoverData, FetchError>),
    /// First load of the placeholder with the given name.
    Loaded(String, Result<AjaxGraph, FetchError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Clicked(ClickOutcome),
    /// Postpone periodic page reloads for this long.
    PauseReload(Duration),
    /// Keep export links in line with the synced range.
    ExportRange { start: Timestamp, end: Timestamp },
    Mounted { placeholder: String, graph: GraphId },
    LoadFailed { placeholder: String, error: FetchError },
    /// Stylesheet for the graph's container, sent again whenever it changes.
    Stylesheet { graph: GraphId, css: String },
}

pub struct Page<B: GraphBackend> {
    session: GraphSession,
    backend: B,
    pool: SyncPool,
    handlers: ClickHandlers,
    stylesheets: FxHashMap<GraphId, String>,
}

impl<B: GraphBackend> Page<B> {
    pub fn new(config: EngineConfig, backend: B, handlers: ClickHandlers) -> Self {
        let pool = SyncPool::new(config.concurrency());

        Self {
            session: GraphSession::new(config),
            backend,
            pool,
            handlers,
            stylesheets: FxHashMap::default(),
        }
    }

    pub fn session(&self) -> &GraphSession {
        &self.session
    }

    pub fn update(&mut self, message: Message) -> (Task<Message>, Vec<Action>) {
        let now = Instant::now();

        match message {
            Message::Pointer(graph, event) => {
                let effects = interaction::handle(&mut self.session, &graph, event, now);
                self.run(effects)
            }
            Message::Tick(now) => {
                let effects = update::tick(&mut self.session, now);
                self.run(effects)
            }
            Message::Refreshed(graph, result) => {
                update::apply_refresh(&mut self.session, &graph, result, now);
                (Task::none(), self.restyle(&graph).into_iter().collect())
            }
            Message::Synced(graph, result) => {
                update::apply_sync(&mut self.session, &graph, result);
                (Task::none(), self.restyle(&graph).into_iter().collect())
            }
            Message::Hovered(graph, result) => {
                update::apply_hover(&mut self.session, &graph, result, now);
                (Task::none(), Vec::new())
            }
            Message::Loaded(placeholder, result) => {
                let actions = match update::apply_load(&mut self.session, &placeholder, result) {
                    Ok(graph) => {
                        let style = self.restyle(&graph);
                        std::iter::once(Action::Mounted { placeholder, graph })
                            .chain(style)
                            .collect()
                    }
                    Err(error) => vec![Action::LoadFailed { placeholder, error }],
                };
                (Task::none(), actions)
            }
        }
    }

    /// Loads a graph into a placeholder, right away when it is on screen and
    /// once it scrolls into view otherwise.
    pub fn load(&mut self, request: LoadRequest, bounds: Rectangle, viewport: Size) -> Task<Message> {
        match self.session.lazy.place(request, bounds, viewport) {
            Some(request) => self.run(vec![Effect::Load(request)]).0,
            None => Task::none(),
        }
    }

    /// Call on scroll and window resize.
    pub fn viewport_changed(&mut self, viewport: Size, scroll: Vector) -> Task<Message> {
        let effects = self
            .session
            .lazy
            .reveal(viewport, scroll)
            .into_iter()
            .map(Effect::Load)
            .collect();

        self.run(effects).0
    }

    /// A delayed placeholder moved, e.g. after the page layout changed.
    pub fn relocate_placeholder(&mut self, placeholder: &str, bounds: Rectangle) {
        self.session.lazy.relocate(placeholder, bounds);
    }

    /// Drops a placeholder that left the page before it was loaded.
    pub fn cancel_placeholder(&mut self, placeholder: &str) -> bool {
        let cancelled = self.session.lazy.cancel(placeholder);
        if cancelled {
            log::debug!("Cancelled delayed load of {placeholder}");
        }
        cancelled
    }

    /// Sets `main` to the last `duration` seconds and syncs every graph to it.
    pub fn change_timerange(
        &mut self,
        main: &GraphId,
        duration: f64,
        now: Timestamp,
    ) -> (Task<Message>, Vec<Action>) {
        let effects = update::change_graph_timerange(&mut self.session, main, duration, now);
        self.run(effects)
    }

    pub fn unmount(&mut self, graph: &GraphId) {
        self.session.unmount(graph);
        self.stylesheets
            .retain(|styled, _| self.session.is_mounted(styled));
    }

    pub fn view<'a>(&'a self, graph: &'a GraphId) -> Element<'a, Message> {
        Canvas::new(GraphCanvas::new(&self.session, graph))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Ticks only while a debounced sync is waiting.
    pub fn subscription(&self) -> Subscription<Message> {
        if self.session.wheel_sync.is_some() {
            iced::time::every(TICK).map(Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn run(&mut self, effects: Vec<Effect>) -> (Task<Message>, Vec<Action>) {
        let mut tasks = Vec::new();
        let mut actions = Vec::new();

        for effect in effects {
            match effect {
                Effect::Refresh { graph, request } => {
                    let backend = self.backend.clone();
                    tasks.push(Task::perform(
                        async move { backend.refresh(request).await },
                        move |result| Message::Refreshed(graph.clone(), result),
                    ));
                }
                Effect::Sync { origin, jobs } => {
                    log::debug!("Submitting {} sync job(s) for {origin}", jobs.len());
                    tasks.push(self.sync(jobs));
                }
                Effect::Hover { graph, request } => {
                    let backend = self.backend.clone();
                    tasks.push(Task::perform(
                        async move { backend.hover(request).await },
                        move |result| Message::Hovered(graph.clone(), result),
                    ));
                }
                Effect::Load(request) => {
                    let backend = self.backend.clone();
                    let placeholder = request.placeholder.clone();
                    tasks.push(Task::perform(
                        async move { backend.load(request).await },
                        move |result| Message::Loaded(placeholder.clone(), result),
                    ));
                }
                Effect::Click {
                    graph,
                    action,
                    time,
                } => {
                    let outcome = self.handlers.dispatch(&graph, &action, time);
                    actions.push(Action::Clicked(outcome));
                }
                Effect::PauseReload(duration) => actions.push(Action::PauseReload(duration)),
                Effect::ExportRange { start, end } => {
                    actions.push(Action::ExportRange { start, end });
                }
            }
        }

        (Task::batch(tasks), actions)
    }

    /// The graph's stylesheet, when it differs from the one last handed out.
    fn restyle(&mut self, graph: &GraphId) -> Option<Action> {
        let artwork = self.session.artwork(graph)?;
        let css = GraphStyle::from_config(&artwork.render_config).to_css(graph.as_str());

        if self.stylesheets.get(graph) == Some(&css) {
            return None;
        }
        self.stylesheets.insert(graph.clone(), css.clone());

        Some(Action::Stylesheet {
            graph: graph.clone(),
            css,
        })
    }

    /// Replaces whatever is still queued from an earlier sync.
    fn sync(&self, jobs: Vec<SyncJob>) -> Task<Message> {
        let backend = self.backend.clone();
        let results = self.pool.submit(jobs, move |job: SyncJob| {
            let backend = backend.clone();
            async move {
                let result = backend.refresh(job.request).await;
                (job.graph, result)
            }
        });

        Task::run(results, |(graph, result)| Message::Synced(graph, result))
    }
}
