//! Pointer and wheel handling for all graphs on a page.
//!
//! Events arrive in container coordinates (logical pixels) together with the
//! container's size. They are mapped to canvas pixels and from there into the
//! time and value domain using the layout cached by the last render.

use std::time::Instant;

use data::artwork::PlotLayout;
use data::context::ConsolidationFunction;
use data::{GraphArtwork, GraphId, Timestamp};

use crate::render;
use crate::session::{GraphSession, Indicator, PointerState};
use crate::update::{self, Change, Effect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
    pub client_width: f64,
    pub client_height: f64,
}

impl Pointer {
    pub fn new(x: f64, y: f64, client_width: f64, client_height: f64) -> Self {
        Self {
            x,
            y,
            client_width,
            client_height,
        }
    }
}

/// Part of a graph container an event happened on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Canvas,
    ResizeHandle,
    /// Title, legend or border, anything but the canvas and links.
    Chrome,
    /// Header of a legend column that is not the active consolidation.
    LegendScalar(ConsolidationFunction),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Pressed { target: Target, pointer: Pointer },
    Moved(Pointer),
    Released { target: Target, pointer: Pointer },
    /// Positive deltas zoom out.
    Wheel { delta: f64, pointer: Pointer },
    /// The pointer left the graph.
    Left,
}

/// Canvas pixel under the pointer.
pub fn canvas_position(artwork: &GraphArtwork, pointer: &Pointer) -> (f64, f64) {
    (
        pointer.x * artwork.width / pointer.client_width,
        pointer.y * artwork.height / pointer.client_height,
    )
}

fn layout(artwork: &GraphArtwork) -> PlotLayout {
    artwork
        .layout
        .unwrap_or_else(|| render::plot_layout(artwork))
}

pub fn time_at(artwork: &GraphArtwork, pointer: &Pointer) -> Option<Timestamp> {
    let layout = layout(artwork);
    if layout.pixels_per_second <= 0.0 {
        return None;
    }
    let (x, _) = canvas_position(artwork, pointer);
    Some(artwork.time_axis.range.0 + (x - layout.time_origin) / layout.pixels_per_second)
}

pub fn value_at(artwork: &GraphArtwork, pointer: &Pointer) -> Option<f64> {
    let layout = layout(artwork);
    if layout.pixels_per_unit <= 0.0 {
        return None;
    }
    let (_, y) = canvas_position(artwork, pointer);
    Some(artwork.vertical_axis.range.0 - (y - layout.vertical_origin) / layout.pixels_per_unit)
}

/// Inside the axis margins and inside the container.
pub fn in_plot_area(artwork: &GraphArtwork, pointer: &Pointer) -> bool {
    let layout = layout(artwork);
    let scale_x = pointer.client_width / artwork.width;
    let scale_y = pointer.client_height / artwork.height;

    pointer.x >= layout.vertical_axis_width * scale_x
        && pointer.x <= pointer.client_width
        && pointer.y >= 0.0
        && pointer.y <= pointer.client_height - layout.bottom_border * scale_y
}

pub fn handle(
    session: &mut GraphSession,
    graph: &GraphId,
    event: Event,
    now: Instant,
) -> Vec<Effect> {
    match event {
        Event::Pressed { target, pointer } => {
            press(session, graph, target, pointer, now);
            Vec::new()
        }
        Event::Moved(pointer) => match session.pointer.clone() {
            PointerState::Dragging {
                graph: owner,
                anchor,
            } if &owner == graph => drag(session, graph, anchor, pointer, now),
            PointerState::Resizing {
                graph: owner,
                anchor,
            } if &owner == graph => resize(session, graph, anchor, pointer, now),
            PointerState::Idle => hover(session, graph, pointer, now),
            _ => Vec::new(),
        },
        Event::Released { target, pointer } => match session.pointer.clone() {
            PointerState::Dragging {
                graph: owner,
                anchor,
            } if &owner == graph => finish_drag(session, graph, anchor, pointer, now),
            PointerState::Resizing {
                graph: owner,
                anchor,
            } if &owner == graph => {
                session.pointer = PointerState::Idle;
                let delta = (pointer.x - anchor.0, pointer.y - anchor.1);
                update::resize_graph(session, graph, delta, now, false)
            }
            PointerState::Idle => release(session, graph, target, pointer, now),
            _ => Vec::new(),
        },
        Event::Wheel { delta, pointer } => wheel(session, graph, delta, pointer, now),
        Event::Left => {
            session.clear_hover(graph);
            Vec::new()
        }
    }
}

fn press(
    session: &mut GraphSession,
    graph: &GraphId,
    target: Target,
    pointer: Pointer,
    now: Instant,
) {
    if session.pointer != PointerState::Idle || !session.gate.is_open(now) {
        return;
    }
    let Some(artwork) = session.registry.get(graph) else {
        return;
    };
    let config = &artwork.render_config;

    match target {
        Target::Canvas if config.interaction => {
            if !in_plot_area(artwork, &pointer) {
                return;
            }
            let (Some(t), Some(v)) = (time_at(artwork, &pointer), value_at(artwork, &pointer))
            else {
                return;
            };
            let (t_from, t_to) = artwork.time_axis.range;
            let (v_from, v_to) = artwork.vertical_axis.range;
            if t < t_from || t > t_to || v < v_from || v > v_to {
                return;
            }
            session.pointer = PointerState::Dragging {
                graph: graph.clone(),
                anchor: (t, v),
            };
        }
        Target::ResizeHandle if config.resizable && config.show_controls => {
            session.pointer = PointerState::Resizing {
                graph: graph.clone(),
                anchor: (pointer.x, pointer.y),
            };
        }
        _ => {}
    }
}

fn drag(
    session: &mut GraphSession,
    graph: &GraphId,
    anchor: (Timestamp, f64),
    pointer: Pointer,
    now: Instant,
) -> Vec<Effect> {
    let Some(artwork) = session.registry.get(graph) else {
        return Vec::new();
    };
    let Some(t) = time_at(artwork, &pointer) else {
        return Vec::new();
    };

    let time_shift = anchor.0 - t;
    let vertical_zoom = value_at(artwork, &pointer)
        .map(|v| v / anchor.1)
        .filter(|zoom| zoom.is_finite() && *zoom > 0.0);

    if time_shift == 0.0 && vertical_zoom.is_none_or(|zoom| zoom == 1.0) {
        return Vec::new();
    }

    update::update_graph(
        session,
        graph,
        Change::Shift {
            time_shift,
            vertical_zoom,
        },
        now,
    )
}

fn finish_drag(
    session: &mut GraphSession,
    graph: &GraphId,
    anchor: (Timestamp, f64),
    pointer: Pointer,
    now: Instant,
) -> Vec<Effect> {
    session.pointer = PointerState::Idle;

    let Some(artwork) = session.registry.get(graph) else {
        return Vec::new();
    };
    let Some(t) = time_at(artwork, &pointer) else {
        return Vec::new();
    };
    let config = &artwork.render_config;
    let interaction = config.interaction;
    let pins = interaction && config.show_pin;

    if t != anchor.0 {
        return update::sync_all_graph_timeranges(session, graph, true);
    }

    let mut effects = match config.onclick.clone() {
        Some(action) => vec![Effect::Click {
            graph: graph.clone(),
            action,
            time: t,
        }],
        None if pins => update::update_graph(session, graph, Change::Pin(Some(t)), now),
        None => Vec::new(),
    };
    if interaction {
        effects.extend(update::sync_all_graph_timeranges(session, graph, true));
    }
    effects
}

fn release(
    session: &mut GraphSession,
    graph: &GraphId,
    target: Target,
    pointer: Pointer,
    now: Instant,
) -> Vec<Effect> {
    let Some(artwork) = session.registry.get(graph) else {
        return Vec::new();
    };
    let config = &artwork.render_config;
    if !config.interaction {
        return Vec::new();
    }

    let change = match target {
        Target::Chrome => Change::Pin(None),
        Target::Canvas if !in_plot_area(artwork, &pointer) => Change::Pin(None),
        Target::LegendScalar(function) => Change::Consolidation(function),
        Target::Canvas | Target::ResizeHandle => return Vec::new(),
    };
    // only an existing pin on a graph that shows pins can be removed
    if change == Change::Pin(None) && (!config.show_pin || artwork.pin_time.is_none()) {
        return Vec::new();
    }

    let mut effects = update::update_graph(session, graph, change, now);
    if !effects.is_empty() {
        effects.extend(update::sync_all_graph_timeranges(session, graph, true));
    }
    effects
}

fn resize(
    session: &mut GraphSession,
    graph: &GraphId,
    anchor: (f64, f64),
    pointer: Pointer,
    now: Instant,
) -> Vec<Effect> {
    let delta = (pointer.x - anchor.0, pointer.y - anchor.1);
    let effects = update::resize_graph(session, graph, delta, now, true);

    // deltas keep accumulating against the old anchor until one is sent
    if !effects.is_empty() {
        session.pointer = PointerState::Resizing {
            graph: graph.clone(),
            anchor: (pointer.x, pointer.y),
        };
    }
    effects
}

fn hover(session: &mut GraphSession, graph: &GraphId, pointer: Pointer, now: Instant) -> Vec<Effect> {
    let Some(artwork) = session.registry.get(graph) else {
        return Vec::new();
    };
    if !artwork.render_config.interaction || !in_plot_area(artwork, &pointer) {
        session.clear_hover(graph);
        return Vec::new();
    }
    let Some(t) = time_at(artwork, &pointer) else {
        return Vec::new();
    };
    let (x, _) = canvas_position(artwork, &pointer);

    if session
        .indicator
        .as_ref()
        .is_some_and(|indicator| &indicator.graph != graph)
    {
        session.hover = None;
    }
    session.indicator = Some(Indicator {
        graph: graph.clone(),
        x: x as f32,
    });

    update::hover_graph(session, graph, t, now)
}

fn wheel(
    session: &mut GraphSession,
    graph: &GraphId,
    delta: f64,
    pointer: Pointer,
    now: Instant,
) -> Vec<Effect> {
    if !session.gate.is_open(now) {
        return Vec::new();
    }
    let Some(artwork) = session.registry.get(graph) else {
        return Vec::new();
    };
    if !artwork.render_config.interaction || !in_plot_area(artwork, &pointer) {
        return Vec::new();
    }

    let config = &session.config;
    let factor = if delta > 0.0 {
        config.zoom_step
    } else {
        let too_few = artwork
            .first_curve_points()
            .is_none_or(|points| points <= config.min_zoom_points);
        if too_few {
            log::debug!("Not zooming further into {graph}");
            return Vec::new();
        }
        1.0 / config.zoom_step
    };
    let Some(center) = time_at(artwork, &pointer) else {
        return Vec::new();
    };

    let effects = update::update_graph(session, graph, Change::Zoom { center, factor }, now);
    if !effects.is_empty() {
        update::schedule_wheel_sync(session, graph, now);
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::{apply_load, apply_refresh};
    use data::context::ClickAction;
    use data::{AjaxContext, EngineConfig, GraphRecipe, Points};
    use fetch::AjaxGraph;
    use proptest::prelude::*;
    use std::time::Duration;

    // sample artworks are 800x400 canvas pixels, shown at 400x200
    const CLIENT_W: f64 = 400.0;
    const CLIENT_H: f64 = 200.0;

    fn at(x: f64, y: f64) -> Pointer {
        Pointer::new(x, y, CLIENT_W, CLIENT_H)
    }

    fn response(spec: &str, artwork: GraphArtwork) -> AjaxGraph {
        AjaxGraph {
            html: String::new(),
            graph: artwork,
            context: AjaxContext {
                definition: GraphRecipe(serde_json::json!({"specification": {"id": spec}})),
                ..AjaxContext::default()
            },
            error: None,
        }
    }

    fn page(specs: &[&str]) -> (GraphSession, Vec<GraphId>) {
        let mut session = GraphSession::new(EngineConfig::default());
        let ids = specs
            .iter()
            .map(|spec| {
                let artwork = GraphArtwork::sample(1000.0, 2000.0, 60.0);
                apply_load(&mut session, spec, Ok(response(spec, artwork))).unwrap()
            })
            .collect();
        (session, ids)
    }

    fn sync_targets(effects: &[Effect]) -> Option<Vec<GraphId>> {
        effects.iter().find_map(|effect| match effect {
            Effect::Sync { jobs, .. } => Some(jobs.iter().map(|job| job.graph.clone()).collect()),
            _ => None,
        })
    }

    proptest! {
        #[test]
        fn pixel_round_trip_recovers_time_and_value(
            t in 1000.0f64..2000.0,
            v in 0.0f64..100.0,
            client_w in 100.0f64..2000.0,
            client_h in 50.0f64..1000.0,
        ) {
            let mut artwork = GraphArtwork::sample(1000.0, 2000.0, 60.0);
            render::render(&mut artwork);
            let layout = artwork.layout.unwrap();
            let transform = render::transform(&artwork, &layout);

            let (x, y) = transform.to_pixel(t, v);
            let pointer = Pointer::new(
                x * client_w / artwork.width,
                y * client_h / artwork.height,
                client_w,
                client_h,
            );

            prop_assert!((time_at(&artwork, &pointer).unwrap() - t).abs() < 1e-6);
            prop_assert!((value_at(&artwork, &pointer).unwrap() - v).abs() < 1e-6);
        }
    }

    #[test]
    fn plot_area_excludes_axis_margins() {
        let (session, ids) = page(&["a"]);
        let artwork = session.artwork(&ids[0]).unwrap();

        // axis is 128 canvas px wide, 64 logical
        assert!(!in_plot_area(artwork, &at(63.0, 50.0)));
        assert!(in_plot_area(artwork, &at(65.0, 50.0)));
        assert!(!in_plot_area(artwork, &at(200.0, 195.0)));
    }

    #[test]
    fn zoom_in_is_refused_on_sparse_curves() {
        let mut session = GraphSession::new(EngineConfig::default());
        let mut sparse = GraphArtwork::sample(1000.0, 2000.0, 60.0);
        sparse.curves[0].points = Points::Scalar(vec![Some(1.0); 10]);
        let graph = apply_load(&mut session, "a", Ok(response("a", sparse))).unwrap();
        let now = Instant::now();

        let effects = handle(
            &mut session,
            &graph,
            Event::Wheel {
                delta: -1.0,
                pointer: at(200.0, 100.0),
            },
            now,
        );

        assert!(effects.is_empty());
        assert!(session.gate().is_open(now));
        assert_eq!(session.effective_window(&graph), Some((1000.0, 2000.0)));

        // zooming out still works
        let out = handle(
            &mut session,
            &graph,
            Event::Wheel {
                delta: 1.0,
                pointer: at(200.0, 100.0),
            },
            now,
        );
        assert!(!out.is_empty());
    }

    #[test]
    fn wheel_zoom_then_debounced_sync_of_siblings() {
        let (mut session, ids) = page(&["a", "b", "c"]);
        let now = Instant::now();

        // pointer over t = 1000, the left edge of the plot
        let layout = session.artwork(&ids[0]).unwrap().layout.unwrap();
        let left = layout.time_origin * CLIENT_W / 800.0;

        let effects = handle(
            &mut session,
            &ids[0],
            Event::Wheel {
                delta: -1.0,
                pointer: at(left, 100.0),
            },
            now,
        );
        let Some(Effect::Refresh { request, .. }) = effects.first() else {
            panic!("expected a refresh");
        };
        let window = request.time_window().unwrap();
        assert!((window.start - 1000.0).abs() < 1e-9);
        assert!((window.end - (1000.0 + 1000.0 / 1.1)).abs() < 1e-9);

        assert!(update::tick(&mut session, now + Duration::from_millis(100)).is_empty());
        let synced = update::tick(&mut session, now + Duration::from_millis(500));
        assert_eq!(sync_targets(&synced), Some(vec![ids[1].clone(), ids[2].clone()]));
    }

    #[test]
    fn drag_pans_and_release_syncs_siblings() {
        let (mut session, ids) = page(&["a", "b"]);
        let now = Instant::now();

        handle(
            &mut session,
            &ids[0],
            Event::Pressed {
                target: Target::Canvas,
                pointer: at(200.0, 100.0),
            },
            now,
        );
        assert!(matches!(session.pointer(), PointerState::Dragging { .. }));

        let moved = handle(&mut session, &ids[0], Event::Moved(at(250.0, 100.0)), now);
        let Some(Effect::Refresh { request, .. }) = moved.first() else {
            panic!("expected a refresh");
        };
        let window = request.time_window().unwrap();
        assert!(window.start < 1000.0);
        assert!((window.span() - 1000.0).abs() < 1e-9);

        let released = handle(
            &mut session,
            &ids[0],
            Event::Released {
                target: Target::Canvas,
                pointer: at(250.0, 100.0),
            },
            now,
        );
        assert_eq!(session.pointer(), &PointerState::Idle);
        assert_eq!(sync_targets(&released), Some(vec![ids[1].clone()]));
    }

    #[test]
    fn click_without_movement_sets_the_pin() {
        let (mut session, ids) = page(&["a", "b"]);
        let now = Instant::now();
        let press = Event::Pressed {
            target: Target::Canvas,
            pointer: at(200.0, 100.0),
        };
        let release = Event::Released {
            target: Target::Canvas,
            pointer: at(200.0, 100.0),
        };

        handle(&mut session, &ids[0], press, now);
        let effects = handle(&mut session, &ids[0], release, now);

        let pin = effects.iter().find_map(|effect| match effect {
            Effect::Refresh { request, .. } => request.form().ok(),
            _ => None,
        });
        let pin = pin.and_then(|fields| {
            fields
                .into_iter()
                .find(|(key, _)| *key == "pin")
                .map(|(_, value)| value)
        });
        let artwork = session.artwork(&ids[0]).unwrap();
        let expected = time_at(artwork, &at(200.0, 100.0)).unwrap().trunc() as i64;
        assert_eq!(pin, Some(expected.to_string()));
        assert!(sync_targets(&effects).is_some());
    }

    #[test]
    fn configured_click_action_replaces_the_pin() {
        let mut session = GraphSession::new(EngineConfig::default());
        let mut answer = response("a", GraphArtwork::sample(1000.0, 2000.0, 60.0));
        answer.context.render_config.onclick = Some(ClickAction::Navigate {
            url: "view.py".to_string(),
        });
        let graph = apply_load(&mut session, "a", Ok(answer)).unwrap();
        let now = Instant::now();

        handle(
            &mut session,
            &graph,
            Event::Pressed {
                target: Target::Canvas,
                pointer: at(200.0, 100.0),
            },
            now,
        );
        let effects = handle(
            &mut session,
            &graph,
            Event::Released {
                target: Target::Canvas,
                pointer: at(200.0, 100.0),
            },
            now,
        );

        assert!(matches!(effects.first(), Some(Effect::Click { .. })));
        assert!(!effects.iter().any(|e| matches!(e, Effect::Refresh { .. })));
    }

    #[test]
    fn interaction_is_suppressed_during_cooldown() {
        let (mut session, ids) = page(&["a"]);
        let now = Instant::now();

        let first = handle(
            &mut session,
            &ids[0],
            Event::Wheel {
                delta: 1.0,
                pointer: at(200.0, 100.0),
            },
            now,
        );
        assert!(!first.is_empty());
        apply_refresh(
            &mut session,
            &ids[0],
            Ok(response("a", GraphArtwork::sample(950.0, 2050.0, 60.0))),
            now,
        );

        let during = handle(
            &mut session,
            &ids[0],
            Event::Wheel {
                delta: 1.0,
                pointer: at(200.0, 100.0),
            },
            now + Duration::from_millis(50),
        );
        assert!(during.is_empty());

        let after = handle(
            &mut session,
            &ids[0],
            Event::Wheel {
                delta: 1.0,
                pointer: at(200.0, 100.0),
            },
            now + Duration::from_millis(150),
        );
        assert!(!after.is_empty());
    }

    #[test]
    fn hover_draws_indicator_and_leaving_clears_it() {
        let (mut session, ids) = page(&["a"]);
        let now = Instant::now();

        let effects = handle(&mut session, &ids[0], Event::Moved(at(200.0, 100.0)), now);
        assert!(matches!(effects.as_slice(), [Effect::Hover { .. }]));
        assert_eq!(session.indicator().map(|i| i.x), Some(400.0));
        assert!(session.is_engaged(&ids[0]));

        handle(&mut session, &ids[0], Event::Moved(at(10.0, 100.0)), now);
        assert!(session.indicator().is_none());
    }

    #[test]
    fn releasing_on_chrome_removes_an_existing_pin() {
        let mut session = GraphSession::new(EngineConfig::default());
        let mut pinned = GraphArtwork::sample(1000.0, 2000.0, 60.0);
        pinned.pin_time = Some(1500.0);
        let graph = apply_load(&mut session, "a", Ok(response("a", pinned))).unwrap();

        let effects = handle(
            &mut session,
            &graph,
            Event::Released {
                target: Target::Chrome,
                pointer: at(0.0, 0.0),
            },
            Instant::now(),
        );

        let request = effects.iter().find_map(|effect| match effect {
            Effect::Refresh { request, .. } => Some(request),
            _ => None,
        });
        let fields = request.unwrap().form().unwrap();
        assert!(fields.contains(&("pin", "-1".to_string())));
    }

    #[test]
    fn releases_are_ignored_without_interaction() {
        let mut session = GraphSession::new(EngineConfig::default());
        let mut pinned = GraphArtwork::sample(1000.0, 2000.0, 60.0);
        pinned.pin_time = Some(1500.0);
        let mut answer = response("a", pinned);
        answer.context.render_config.interaction = false;
        let graph = apply_load(&mut session, "a", Ok(answer)).unwrap();
        let now = Instant::now();

        for target in [
            Target::Chrome,
            Target::Canvas,
            Target::LegendScalar(ConsolidationFunction::Max),
        ] {
            let effects = handle(
                &mut session,
                &graph,
                Event::Released {
                    target,
                    pointer: at(0.0, 0.0),
                },
                now,
            );
            assert!(effects.is_empty(), "{target:?} produced {effects:?}");
        }
        assert!(session.gate().is_open(now));
    }

    #[test]
    fn hidden_pins_are_neither_set_nor_removed() {
        let mut session = GraphSession::new(EngineConfig::default());
        let mut pinned = GraphArtwork::sample(1000.0, 2000.0, 60.0);
        pinned.pin_time = Some(1500.0);
        let mut answer = response("a", pinned);
        answer.context.render_config.show_pin = false;
        let graph = apply_load(&mut session, "a", Ok(answer)).unwrap();
        let now = Instant::now();

        let removed = handle(
            &mut session,
            &graph,
            Event::Released {
                target: Target::Chrome,
                pointer: at(0.0, 0.0),
            },
            now,
        );
        assert!(removed.is_empty());

        handle(
            &mut session,
            &graph,
            Event::Pressed {
                target: Target::Canvas,
                pointer: at(200.0, 100.0),
            },
            now,
        );
        let clicked = handle(
            &mut session,
            &graph,
            Event::Released {
                target: Target::Canvas,
                pointer: at(200.0, 100.0),
            },
            now,
        );
        assert!(!clicked.iter().any(|e| matches!(e, Effect::Refresh { .. })));
        assert_eq!(session.pointer(), &PointerState::Idle);
    }

    #[test]
    fn legend_scalar_switches_consolidation() {
        let (mut session, ids) = page(&["a", "b"]);

        let effects = handle(
            &mut session,
            &ids[0],
            Event::Released {
                target: Target::LegendScalar(ConsolidationFunction::Min),
                pointer: at(0.0, 0.0),
            },
            Instant::now(),
        );

        let fields = effects
            .iter()
            .find_map(|effect| match effect {
                Effect::Refresh { request, .. } => request.form().ok(),
                _ => None,
            })
            .unwrap();
        assert!(fields.contains(&("consolidation_function", "min".to_string())));
        assert_eq!(sync_targets(&effects), Some(vec![ids[1].clone()]));
    }

    #[test]
    fn resize_accumulates_while_gated_and_flushes_on_release() {
        let (mut session, ids) = page(&["a"]);
        let now = Instant::now();

        handle(
            &mut session,
            &ids[0],
            Event::Pressed {
                target: Target::ResizeHandle,
                pointer: at(400.0, 200.0),
            },
            now,
        );
        let first = handle(&mut session, &ids[0], Event::Moved(at(410.0, 205.0)), now);
        assert_eq!(first.len(), 2);

        // in flight: nothing is sent, the anchor stays put
        let gated = handle(&mut session, &ids[0], Event::Moved(at(420.0, 210.0)), now);
        assert!(gated.is_empty());

        apply_refresh(
            &mut session,
            &ids[0],
            Ok(response("a", GraphArtwork::sample(1000.0, 2000.0, 60.0))),
            now,
        );
        let flushed = handle(
            &mut session,
            &ids[0],
            Event::Released {
                target: Target::Canvas,
                pointer: at(425.0, 212.0),
            },
            now,
        );
        let Some(Effect::Refresh { request, .. }) = flushed.first() else {
            panic!("expected the pending resize to be flushed");
        };
        let fields = request.form().unwrap();
        assert!(fields.contains(&("resize_x", "15".to_string())));
        assert!(fields.contains(&("resize_y", "7".to_string())));
    }
}
