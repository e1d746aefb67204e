//! State shared by every graph on a page.
//!
//! One [`GraphSession`] owns the artwork registry, the mounted containers and
//! the page-wide pointer and request gates. Components receive it explicitly.

use std::time::{Duration, Instant};

use data::{EngineConfig, GraphArtwork, GraphId, Registry, Timestamp};
use rustc_hash::FxHashMap;

use crate::hover::HoverPopup;
use crate::lazy::ViewportLazyLoader;
use crate::render::{self, Scene};

#[derive(Debug, Clone, PartialEq)]
pub enum GraphStatus {
    Loading,
    Rendered,
    /// An interaction-triggered refresh is in flight.
    Updating,
    /// The last refresh failed. The previous artwork stays displayed.
    Error(String),
}

/// A mounted graph container.
#[derive(Debug, Clone)]
pub struct Container {
    pub status: GraphStatus,
    /// Message shown above the graph.
    pub notice: Option<String>,
    /// Legend and title markup delivered with the artwork.
    pub html: String,
    pub scene: Option<Scene>,
    /// Bumped whenever `scene` changes.
    pub revision: u64,
}

impl Container {
    fn new() -> Self {
        Self {
            status: GraphStatus::Loading,
            notice: None,
            html: String::new(),
            scene: None,
            revision: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PointerState {
    #[default]
    Idle,
    /// `anchor` is the (time, value) grabbed on press.
    Dragging { graph: GraphId, anchor: (Timestamp, f64) },
    /// `anchor` is the pointer position of the last sent resize.
    Resizing { graph: GraphId, anchor: (f64, f64) },
}

/// Timing gate for interaction-triggered requests: closed while one is in
/// flight and for a short cooldown after it completed.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateGate {
    in_process: bool,
    cooldown_until: Option<Instant>,
}

impl UpdateGate {
    pub fn is_open(&self, now: Instant) -> bool {
        !self.in_process && !self.in_cooldown(now)
    }

    pub fn in_process(&self) -> bool {
        self.in_process
    }

    pub fn in_cooldown(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    pub fn begin(&mut self) {
        self.in_process = true;
    }

    pub fn finish(&mut self, now: Instant, cooldown: Duration) {
        self.in_process = false;
        self.cooldown_until = Some(now + cooldown);
    }
}

/// Vertical hover line, in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    pub graph: GraphId,
    pub x: f32,
}

#[derive(Debug)]
pub struct GraphSession {
    pub(crate) config: EngineConfig,
    pub(crate) registry: Registry,
    pub(crate) containers: FxHashMap<GraphId, Container>,
    /// Time windows requested but not yet confirmed by a response.
    pub(crate) pending_windows: FxHashMap<GraphId, (Timestamp, Timestamp)>,
    pub(crate) pointer: PointerState,
    pub(crate) gate: UpdateGate,
    pub(crate) wheel_sync: Option<(GraphId, Instant)>,
    pub(crate) lazy: ViewportLazyLoader,
    pub(crate) indicator: Option<Indicator>,
    pub(crate) hover: Option<HoverPopup>,
    pub(crate) export_range: Option<(Timestamp, Timestamp)>,
}

impl GraphSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            containers: FxHashMap::default(),
            pending_windows: FxHashMap::default(),
            pointer: PointerState::Idle,
            gate: UpdateGate::default(),
            wheel_sync: None,
            lazy: ViewportLazyLoader::new(),
            indicator: None,
            hover: None,
            export_range: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn artwork(&self, graph: &GraphId) -> Option<&GraphArtwork> {
        self.registry.get(graph)
    }

    pub fn container(&self, graph: &GraphId) -> Option<&Container> {
        self.containers.get(graph)
    }

    pub fn status(&self, graph: &GraphId) -> Option<&GraphStatus> {
        self.containers.get(graph).map(|container| &container.status)
    }

    pub fn scene(&self, graph: &GraphId) -> Option<&Scene> {
        self.containers
            .get(graph)
            .and_then(|container| container.scene.as_ref())
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn gate(&self) -> &UpdateGate {
        &self.gate
    }

    pub fn indicator(&self) -> Option<&Indicator> {
        self.indicator.as_ref()
    }

    pub fn hover(&self) -> Option<&HoverPopup> {
        self.hover.as_ref()
    }

    pub fn lazy_loader(&self) -> &ViewportLazyLoader {
        &self.lazy
    }

    /// Range the page was last synced to, for export links.
    pub fn export_range(&self) -> Option<(Timestamp, Timestamp)> {
        self.export_range
    }

    /// The window a graph is heading to: the last requested one if a
    /// response is still outstanding, else the one it was rendered with.
    pub fn effective_window(&self, graph: &GraphId) -> Option<(Timestamp, Timestamp)> {
        self.pending_windows.get(graph).copied().or_else(|| {
            self.registry
                .get(graph)
                .map(|artwork| (artwork.requested_start_time, artwork.requested_end_time))
        })
    }

    /// Whether this graph currently owns the pointer or shows hover state,
    /// i.e. wants pointer events even when the cursor is elsewhere.
    pub fn is_engaged(&self, graph: &GraphId) -> bool {
        let pointer = match &self.pointer {
            PointerState::Dragging { graph: owner, .. }
            | PointerState::Resizing { graph: owner, .. } => owner == graph,
            PointerState::Idle => false,
        };
        pointer
            || self
                .indicator
                .as_ref()
                .is_some_and(|indicator| &indicator.graph == graph)
    }

    pub fn is_mounted(&self, graph: &GraphId) -> bool {
        self.containers.contains_key(graph)
    }

    pub(crate) fn mount(&mut self, graph: GraphId) -> &mut Container {
        self.containers.entry(graph).or_insert_with(Container::new)
    }

    /// Forgets a graph whose container left the page, along with its
    /// subgraphs. Responses still in flight for it are discarded on arrival.
    pub fn unmount(&mut self, graph: &GraphId) {
        let mut removed = self.registry.subgraphs_of(graph);
        removed.push(graph.clone());

        for id in &removed {
            self.registry.remove(id);
            self.containers.remove(id);
            self.pending_windows.remove(id);
        }

        let owned = |id: &GraphId| removed.contains(id);
        let pointer_owned = match &self.pointer {
            PointerState::Dragging { graph, .. } | PointerState::Resizing { graph, .. } => {
                owned(graph)
            }
            PointerState::Idle => false,
        };
        if pointer_owned {
            self.pointer = PointerState::Idle;
        }
        if self.wheel_sync.as_ref().is_some_and(|(id, _)| owned(id)) {
            self.wheel_sync = None;
        }
        if self.indicator.as_ref().is_some_and(|i| owned(&i.graph)) {
            self.indicator = None;
        }
        if self.hover.as_ref().is_some_and(|h| owned(&h.graph)) {
            self.hover = None;
        }

        log::debug!("Unmounted {} graph(s) under {graph}", removed.len());
    }

    /// Repaints a graph and every subgraph sharing its id prefix. Graphs
    /// without a mounted container are skipped.
    pub fn render(&mut self, graph: &GraphId) {
        let mut targets = vec![graph.clone()];
        targets.extend(self.registry.subgraphs_of(graph));

        for id in targets {
            let (Some(container), Some(artwork)) =
                (self.containers.get_mut(&id), self.registry.get_mut(&id))
            else {
                continue;
            };
            container.scene = Some(render::render(artwork));
            container.revision += 1;
        }
    }

    pub(crate) fn clear_hover(&mut self, graph: &GraphId) {
        if self.indicator.as_ref().is_some_and(|i| &i.graph == graph) {
            self.indicator = None;
        }
        if self.hover.as_ref().is_some_and(|h| &h.graph == graph) {
            self.hover = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data::AjaxContext;

    fn add(session: &mut GraphSession, id: &str) -> GraphId {
        let graph = GraphId::from(id);
        let artwork = GraphArtwork::sample(1000.0, 2000.0, 60.0)
            .bind(graph.clone(), AjaxContext::default());
        session.registry.replace(artwork);
        session.mount(graph.clone());
        graph
    }

    #[test]
    fn gate_closes_during_flight_and_cooldown() {
        let mut gate = UpdateGate::default();
        let now = Instant::now();
        assert!(gate.is_open(now));

        gate.begin();
        assert!(!gate.is_open(now));

        gate.finish(now, Duration::from_millis(100));
        assert!(!gate.is_open(now + Duration::from_millis(99)));
        assert!(gate.is_open(now + Duration::from_millis(100)));
    }

    #[test]
    fn render_paints_subgraphs_but_skips_unmounted() {
        let mut session = GraphSession::new(EngineConfig::default());
        let main = add(&mut session, "graph_1");
        let sub = add(&mut session, "graph_1_a");
        let other = add(&mut session, "graph_10");
        session.containers.remove(&other);

        session.render(&main);

        assert_eq!(session.container(&main).unwrap().revision, 1);
        assert_eq!(session.container(&sub).unwrap().revision, 1);
        assert!(session.scene(&other).is_none());
        assert!(session.artwork(&main).unwrap().layout.is_some());
    }

    #[test]
    fn unmount_prunes_registry_and_pointer() {
        let mut session = GraphSession::new(EngineConfig::default());
        let main = add(&mut session, "graph_1");
        add(&mut session, "graph_1_a");
        let kept = add(&mut session, "graph_2");
        session.pointer = PointerState::Dragging {
            graph: main.clone(),
            anchor: (1500.0, 50.0),
        };

        session.unmount(&main);

        assert_eq!(session.registry().ids(), vec![kept]);
        assert_eq!(session.pointer(), &PointerState::Idle);
        assert!(!session.is_mounted(&main));
    }

    #[test]
    fn pending_window_wins_over_rendered_one() {
        let mut session = GraphSession::new(EngineConfig::default());
        let graph = add(&mut session, "graph_1");
        assert_eq!(session.effective_window(&graph), Some((1000.0, 2000.0)));

        session.pending_windows.insert(graph.clone(), (1000.0, 1500.0));
        assert_eq!(session.effective_window(&graph), Some((1000.0, 1500.0)));
    }
}
