//! Refresh requests, their responses and time-range sync across graphs.
//!
//! Nothing here performs I/O. Every operation returns the [`Effect`]s the
//! host has to carry out; responses come back through the `apply_*`
//! functions.

use std::time::{Duration, Instant};

use data::context::{ClickAction, ConsolidationFunction};
use data::{GraphArtwork, GraphId, Timestamp};
use fetch::{AjaxGraph, FetchError, GraphRequest, HoverData, HoverRequest, LoadRequest, TimeWindow};
use iced_core::Point;

use crate::hover::HoverPopup;
use crate::session::{GraphSession, GraphStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Interaction-triggered refresh of one graph.
    Refresh { graph: GraphId, request: GraphRequest },
    /// Replaces every queued sync job with `jobs`.
    Sync { origin: GraphId, jobs: Vec<SyncJob> },
    Hover { graph: GraphId, request: HoverRequest },
    Load(LoadRequest),
    Click {
        graph: GraphId,
        action: ClickAction,
        time: Timestamp,
    },
    /// Hold off periodic page reloads for this long.
    PauseReload(Duration),
    ExportRange { start: Timestamp, end: Timestamp },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncJob {
    pub graph: GraphId,
    pub request: GraphRequest,
}

/// A change to one graph. Only one kind is applied per request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
    Shift {
        time_shift: f64,
        vertical_zoom: Option<f64>,
    },
    Zoom {
        center: Timestamp,
        factor: f64,
    },
    /// `None` removes the pin.
    Pin(Option<Timestamp>),
    Consolidation(ConsolidationFunction),
}

/// Scales `[start, end]` around `center`. A result narrower than `min_span`
/// is widened around the same center, keeping its proportions.
pub fn zoom_window(
    (start, end): (Timestamp, Timestamp),
    center: Timestamp,
    factor: f64,
    min_span: f64,
) -> (Timestamp, Timestamp) {
    let mut start = center - (center - start) * factor;
    let mut end = center + (end - center) * factor;

    let span = end - start;
    if span < min_span {
        if span > 0.0 {
            let widen = min_span / span;
            start = center - (center - start) * widen;
            end = center + (end - center) * widen;
        } else {
            start = center - min_span / 2.0;
            end = center + min_span / 2.0;
        }
    }

    (start, end)
}

/// Widening in [`zoom_window`] may land a rounding error short of the floor.
const SPAN_TOLERANCE: f64 = 1e-3;

pub fn is_valid_window(
    (start, end): (Timestamp, Timestamp),
    min_span: f64,
    max_timestamp: Timestamp,
) -> bool {
    start >= 0.0 && end <= max_timestamp && start < end && end - start + SPAN_TOLERANCE >= min_span
}

/// Two samples per canvas pixel.
pub fn step_for(artwork: &GraphArtwork, (start, end): (Timestamp, Timestamp)) -> f64 {
    (end - start) / artwork.width / 2.0
}

fn time_window(artwork: &GraphArtwork, window: (Timestamp, Timestamp)) -> TimeWindow {
    TimeWindow {
        start: window.0,
        end: window.1,
        step: step_for(artwork, window),
    }
}

/// Requests an authoritative re-render of `graph` with `change` applied.
///
/// Dropped without effect while the gate is closed or when the resulting
/// range would be invalid.
pub fn update_graph(
    session: &mut GraphSession,
    graph: &GraphId,
    change: Change,
    now: Instant,
) -> Vec<Effect> {
    if !session.gate.is_open(now) {
        log::trace!("Update of {graph} suppressed, gate closed");
        return Vec::new();
    }
    let Some(base) = session.effective_window(graph) else {
        return Vec::new();
    };
    let Some(artwork) = session.registry.get(graph) else {
        return Vec::new();
    };
    let context = match artwork.context() {
        Ok(context) => context.clone(),
        Err(err) => {
            log::error!("{err}");
            return Vec::new();
        }
    };
    let config = &session.config;

    let (window, request) = match change {
        Change::Shift {
            time_shift,
            vertical_zoom,
        } => {
            let window = (base.0 + time_shift, base.1 + time_shift);
            let vertical_range = match vertical_zoom {
                Some(zoom) => {
                    let (from, to) = artwork.vertical_axis.range;
                    Some((from / zoom, to / zoom))
                }
                None => artwork.requested_vrange,
            };
            let request =
                GraphRequest::window(context, time_window(artwork, window), vertical_range);
            (window, request)
        }
        Change::Zoom { center, factor } => {
            let window = zoom_window(base, center, factor, config.min_time_span);
            let request = GraphRequest::window(
                context,
                time_window(artwork, window),
                artwork.requested_vrange,
            );
            (window, request)
        }
        Change::Pin(pin) => {
            let pin = pin.map_or(-1, |t| t.trunc() as i64);
            let request = GraphRequest::pin(context, time_window(artwork, base), pin);
            (base, request)
        }
        Change::Consolidation(function) => {
            let request = GraphRequest::consolidation(context, time_window(artwork, base), function);
            (base, request)
        }
    };

    if !is_valid_window(window, config.min_time_span, config.max_timestamp) {
        log::debug!("Rejecting window {window:?} for {graph}");
        return Vec::new();
    }

    let pause = config.reload_pause();
    begin_refresh(session, graph, Some(window));

    vec![
        Effect::Refresh {
            graph: graph.clone(),
            request,
        },
        Effect::PauseReload(pause),
    ]
}

/// Requests a re-render after the container was resized by `(dx, dy)`
/// logical pixels. With `respect_cooldown` unset only an in-flight request
/// holds it back.
pub fn resize_graph(
    session: &mut GraphSession,
    graph: &GraphId,
    (dx, dy): (f64, f64),
    now: Instant,
    respect_cooldown: bool,
) -> Vec<Effect> {
    let blocked = if respect_cooldown {
        !session.gate.is_open(now)
    } else {
        session.gate.in_process()
    };
    if blocked || (dx == 0.0 && dy == 0.0) {
        return Vec::new();
    }
    let Some(context) = session
        .registry
        .get(graph)
        .and_then(|artwork| artwork.context().ok())
        .cloned()
    else {
        return Vec::new();
    };

    let pause = session.config.reload_pause();
    begin_refresh(session, graph, None);

    vec![
        Effect::Refresh {
            graph: graph.clone(),
            request: GraphRequest::resize(context, dx, dy),
        },
        Effect::PauseReload(pause),
    ]
}

fn begin_refresh(
    session: &mut GraphSession,
    graph: &GraphId,
    window: Option<(Timestamp, Timestamp)>,
) {
    session.gate.begin();
    if let Some(window) = window {
        session.pending_windows.insert(graph.clone(), window);
    }
    if let Some(container) = session.containers.get_mut(graph) {
        container.status = GraphStatus::Updating;
    }
}

/// Asks for hover values at `hover_time`, gated like any other interaction.
pub fn hover_graph(
    session: &mut GraphSession,
    graph: &GraphId,
    hover_time: Timestamp,
    now: Instant,
) -> Vec<Effect> {
    if !session.gate.is_open(now) {
        return Vec::new();
    }
    let Some(context) = session
        .registry
        .get(graph)
        .and_then(|artwork| artwork.context().ok())
        .cloned()
    else {
        return Vec::new();
    };

    session.gate.begin();
    vec![Effect::Hover {
        graph: graph.clone(),
        request: HoverRequest {
            context,
            hover_time: hover_time.trunc() as i64,
        },
    }]
}

/// Completes an interaction-triggered refresh.
pub fn apply_refresh(
    session: &mut GraphSession,
    graph: &GraphId,
    result: Result<AjaxGraph, FetchError>,
    now: Instant,
) {
    let cooldown = session.config.cooldown();
    session.gate.finish(now, cooldown);
    session.pending_windows.remove(graph);

    match result {
        Ok(response) => show_graph(session, graph, response),
        Err(err) => fail(session, graph, err),
    }
}

/// Completes one sync job. Sync jobs never touch the interaction gate.
pub fn apply_sync(session: &mut GraphSession, graph: &GraphId, result: Result<AjaxGraph, FetchError>) {
    session.pending_windows.remove(graph);

    match result {
        Ok(response) => show_graph(session, graph, response),
        Err(err) => fail(session, graph, err),
    }
}

pub fn apply_hover(
    session: &mut GraphSession,
    graph: &GraphId,
    result: Result<HoverData, FetchError>,
    now: Instant,
) {
    let cooldown = session.config.cooldown();
    session.gate.finish(now, cooldown);

    let data = match result {
        Ok(data) => data,
        Err(err) => {
            log::warn!("Hover request for {graph} failed: {err}");
            return;
        }
    };

    // the pointer may have left the plot while the request was out
    let Some(indicator) = session.indicator.as_ref().filter(|i| &i.graph == graph) else {
        return;
    };
    let anchor = Point::new(indicator.x, 0.0);
    session.hover = Some(HoverPopup::new(graph.clone(), anchor, data));
}

/// Completes a first load. Returns the id the placeholder's graph got.
pub fn apply_load(
    session: &mut GraphSession,
    placeholder: &str,
    result: Result<AjaxGraph, FetchError>,
) -> Result<GraphId, FetchError> {
    let response = result.inspect_err(|err| {
        log::error!("Loading graph {placeholder} failed: {err}");
    })?;

    let graph = session.registry.resolve_id(&response.context);
    session.mount(graph.clone());
    show_graph(session, &graph, response);

    Ok(graph)
}

/// Registers a response as the new artwork of `graph`, replacing the old one
/// as a whole, and repaints it together with its subgraphs.
pub fn show_graph(session: &mut GraphSession, graph: &GraphId, response: AjaxGraph) {
    let Some(container) = session.containers.get_mut(graph) else {
        log::debug!("Discarding response for unmounted graph {graph}");
        return;
    };

    if let Some(error) = &response.error {
        log::warn!("Graph {graph} rendered with error: {error}");
    }
    container.status = GraphStatus::Rendered;
    container.notice = response.error;
    container.html = response.html;

    let artwork = response.graph.bind(graph.clone(), response.context);
    session.registry.replace(artwork);
    session.render(graph);
}

fn fail(session: &mut GraphSession, graph: &GraphId, err: FetchError) {
    let Some(container) = session.containers.get_mut(graph) else {
        return;
    };

    match err {
        FetchError::Parse(message) => {
            log::error!("Malformed response for {graph}: {message}");
            container.status = if session.registry.contains(graph) {
                GraphStatus::Rendered
            } else {
                GraphStatus::Error(message)
            };
        }
        err => {
            log::warn!("Refresh of {graph} failed: {err}");
            container.status = GraphStatus::Error(err.user_message());
        }
    }
}

/// Brings every other graph without a fixed range to the window of
/// `origin`. With `skip_origin` unset the origin is re-requested as well.
pub fn sync_all_graph_timeranges(
    session: &mut GraphSession,
    origin: &GraphId,
    skip_origin: bool,
) -> Vec<Effect> {
    let Some((start, end)) = session.effective_window(origin) else {
        return Vec::new();
    };
    session.wheel_sync = None;

    let mut jobs = Vec::new();
    for graph in session.registry.ids() {
        if skip_origin && &graph == origin {
            continue;
        }
        if !session.containers.contains_key(&graph) {
            continue;
        }
        let Some(artwork) = session.registry.get(&graph) else {
            continue;
        };
        if artwork.render_config.fixed_timerange {
            continue;
        }
        let Ok(context) = artwork.context() else {
            continue;
        };

        let request = GraphRequest::window(
            context.clone(),
            time_window(artwork, (start, end)),
            artwork.requested_vrange,
        );
        jobs.push(SyncJob {
            graph: graph.clone(),
            request,
        });
    }

    for job in &jobs {
        session.pending_windows.insert(job.graph.clone(), (start, end));
    }
    session.lazy.set_time_range(start, end);
    session.export_range = Some((start, end));

    log::debug!("Syncing {} graph(s) to {start}..{end} from {origin}", jobs.len());

    vec![
        Effect::Sync {
            origin: origin.clone(),
            jobs,
        },
        Effect::ExportRange { start, end },
    ]
}

/// Sets `main` to the last `duration` seconds before `now` and brings every
/// graph, `main` included, to that range.
pub fn change_graph_timerange(
    session: &mut GraphSession,
    main: &GraphId,
    duration: f64,
    now: Timestamp,
) -> Vec<Effect> {
    let window = (now - duration, now);
    let config = &session.config;
    if !session.registry.contains(main)
        || !is_valid_window(window, config.min_time_span, config.max_timestamp)
    {
        log::debug!("Rejecting timerange {window:?} for {main}");
        return Vec::new();
    }

    session.pending_windows.insert(main.clone(), window);

    let mut effects = vec![Effect::PauseReload(session.config.reload_pause())];
    effects.extend(sync_all_graph_timeranges(session, main, false));
    effects
}

/// Fires the debounced sync scheduled by wheel zooming once it is due.
pub fn tick(session: &mut GraphSession, now: Instant) -> Vec<Effect> {
    let due = session
        .wheel_sync
        .as_ref()
        .filter(|(_, due)| now >= *due)
        .map(|(origin, _)| origin.clone());

    match due {
        Some(origin) => sync_all_graph_timeranges(session, &origin, true),
        None => Vec::new(),
    }
}

/// Schedules a sync from `origin` after the wheel delay, replacing any
/// sync scheduled before.
pub(crate) fn schedule_wheel_sync(session: &mut GraphSession, origin: &GraphId, now: Instant) {
    session.wheel_sync = Some((origin.clone(), now + session.config.wheel_sync_delay()));
}
