//! Turns a [`GraphArtwork`] into a [`Scene`].
//!
//! All positions are canvas pixels, which are twice the logical size of the
//! graph on screen.

pub mod curve;
pub mod scene;

pub use scene::{Align, Label, Primitive, Scene};

use data::artwork::{CurveKind, PlotLayout};
use data::color;
use data::context::{RenderConfig, VerticalAxisWidth};
use data::{CoordinateTransform, GraphArtwork};
use iced_core::{Color, Point, Rectangle};

use crate::style::GraphStyle;
use curve::Spacing;

const VERTICAL_LABEL_MARGIN: f64 = 10.0;
const TIME_LABEL_MARGIN: f64 = 10.0;
const PIN_OVERSHOOT: f64 = 5.0;
const PIN_DOT_RADIUS: f32 = 5.0;
const CURVE_WIDTH: f32 = 2.0;
const RULE_WIDTH: f32 = 2.0;
const FORECAST_COLOR: Color = Color {
    r: 0.0,
    g: 1.0,
    b: 0.0,
    a: 1.0,
};
const SECONDARY_GRID: &str = "#8097b19c";
const DISPLAY_SCALE: f64 = 2.0;

pub fn pt_to_px(pt: f64) -> f64 {
    pt / 72.0 * 96.0
}

/// Logical pixels to canvas pixels.
pub fn from_display(px: f64) -> f64 {
    px * DISPLAY_SCALE
}

/// Space reserved below the plot for time labels.
pub fn bottom_border(config: &RenderConfig) -> f64 {
    if config.show_time_axis && !config.preview {
        from_display(pt_to_px(config.font_size)) + TIME_LABEL_MARGIN
    } else {
        0.0
    }
}

pub fn vertical_axis_width(config: &RenderConfig) -> f64 {
    if config.preview || (!config.show_vertical_axis && !config.show_controls) {
        return 0.0;
    }
    match config.vertical_axis_width {
        VerticalAxisWidth::Explicit(pt) => from_display(pt_to_px(pt)),
        VerticalAxisWidth::Fixed => 6.0 * from_display(pt_to_px(config.font_size)),
    }
}

pub fn plot_layout(artwork: &GraphArtwork) -> PlotLayout {
    let config = &artwork.render_config;
    let bottom = bottom_border(config);
    let top = ((bottom - TIME_LABEL_MARGIN) / 2.0).max(0.0);
    let axis_width = vertical_axis_width(config);

    let (t_from, t_to) = artwork.time_axis.range;
    let (v_from, v_to) = artwork.vertical_axis.range;

    PlotLayout {
        time_origin: axis_width,
        vertical_origin: artwork.height - bottom,
        pixels_per_second: per_unit(artwork.width - axis_width, t_to - t_from),
        pixels_per_unit: per_unit(artwork.height - bottom - top, v_to - v_from),
        vertical_axis_width: axis_width,
        bottom_border: bottom,
    }
}

pub fn transform(artwork: &GraphArtwork, layout: &PlotLayout) -> CoordinateTransform {
    CoordinateTransform::new(
        layout.time_origin,
        artwork.time_axis.range.0,
        layout.pixels_per_second,
        layout.vertical_origin,
        artwork.vertical_axis.range.0,
        layout.pixels_per_unit,
    )
}

/// Paints the artwork and caches the computed layout on it, so pointer
/// positions can later be mapped back into the time and value domain.
pub fn render(artwork: &mut GraphArtwork) -> Scene {
    let layout = plot_layout(artwork);
    artwork.layout = Some(layout);

    let artwork = &*artwork;
    let transform = transform(artwork, &layout);
    let style = GraphStyle::from_config(&artwork.render_config);
    let font_px = from_display(pt_to_px(artwork.render_config.font_size)) as f32;

    let mut scene = Scene::new(artwork.width as f32, artwork.height as f32);

    let (t_from, t_to) = artwork.time_axis.range;
    let (v_from, v_to) = artwork.vertical_axis.range;
    let top = ((layout.bottom_border - TIME_LABEL_MARGIN) / 2.0).max(0.0);

    if !artwork.render_config.preview {
        // value labels and horizontal grid
        for label in &artwork.vertical_axis.labels {
            let y = transform.to_pixel_y(label.position);
            if let Some(color) = gridline_color(label.gridline_weight, style.foreground) {
                scene.push(Primitive::Line {
                    from: point(layout.time_origin, y),
                    to: point(artwork.width, y),
                    color,
                    width: 1.0,
                });
            }
            if layout.vertical_axis_width > 0.0 && artwork.render_config.show_vertical_axis {
                scene.push(Primitive::Text(Label {
                    content: label.text.clone(),
                    position: point(layout.time_origin - VERTICAL_LABEL_MARGIN, y),
                    color: style.axis_label,
                    size: font_px,
                    align_x: Align::End,
                    align_y: Align::Center,
                }));
            }
        }

        // vertical grid
        for label in &artwork.time_axis.labels {
            let x = transform.to_pixel_x(label.position);
            if x < layout.time_origin {
                continue;
            }
            if let Some(color) = gridline_color(label.gridline_weight, style.foreground) {
                scene.push(Primitive::Line {
                    from: point(x, top),
                    to: point(x, layout.vertical_origin),
                    color,
                    width: 1.0,
                });
            }
        }
    }

    let clip = Rectangle {
        x: transform.to_pixel_x(t_from) as f32,
        y: transform.to_pixel_y(v_to) as f32,
        width: ((t_to - t_from) * layout.pixels_per_second) as f32,
        height: ((v_to - v_from) * layout.pixels_per_unit) as f32,
    };
    scene.push(Primitive::Clip {
        bounds: clip,
        primitives: curves(artwork, &transform),
    });

    if layout.bottom_border > 0.0 {
        for label in &artwork.time_axis.labels {
            let Some(text) = &label.text else {
                continue;
            };
            let x = transform.to_pixel_x(label.position);
            if x < layout.time_origin {
                continue;
            }
            scene.push(Primitive::Text(Label {
                content: text.clone(),
                position: point(x, layout.vertical_origin + TIME_LABEL_MARGIN),
                color: style.axis_label,
                size: font_px,
                align_x: Align::Center,
                align_y: Align::Start,
            }));
        }
    }

    for rule in &artwork.horizontal_rules {
        if rule.value < v_from || rule.value > v_to {
            continue;
        }
        let Some(color) = parse_or_skip(&rule.color, "rule") else {
            continue;
        };
        let y = transform.to_pixel_y(rule.value);
        scene.push(Primitive::Line {
            from: point(layout.time_origin, y),
            to: point(artwork.width, y),
            color,
            width: RULE_WIDTH,
        });
    }

    if let Some(pin) = artwork.pin_time.filter(|_| artwork.render_config.show_pin) {
        let x = transform.to_pixel_x(pin);
        if x >= layout.time_origin && x <= artwork.width {
            let foot = point(x, layout.vertical_origin + PIN_OVERSHOOT);
            scene.push(Primitive::Line {
                from: foot,
                to: point(x, 0.0),
                color: style.foreground,
                width: 1.0,
            });
            scene.push(Primitive::Dot {
                center: foot,
                radius: PIN_DOT_RADIUS,
                color: style.foreground,
            });
        }
    }

    if artwork.mark_requested_end_time {
        let x = transform.to_pixel_x(artwork.requested_end_time);
        scene.push(Primitive::Line {
            from: point(x, layout.vertical_origin),
            to: point(x, top),
            color: FORECAST_COLOR,
            width: CURVE_WIDTH,
        });
    }

    scene
}

fn curves(artwork: &GraphArtwork, transform: &CoordinateTransform) -> Vec<Primitive> {
    let spacing = Spacing::half_step(artwork.start_time, artwork.step);
    let mut primitives = Vec::new();

    for curve in &artwork.curves {
        let Ok((stroke, fill)) = color::curve_colors(&curve.color) else {
            log::warn!("Skipping curve {:?} with color {}", curve.title, curve.color);
            continue;
        };

        match curve.line_type.kind() {
            CurveKind::Line => {
                let values = match &curve.points {
                    data::Points::Scalar(values) => values.clone(),
                    ranged => curve::outline(&curve::pairs(ranged)),
                };
                primitives.push(Primitive::Polyline {
                    subpaths: curve::line_subpaths(&values, spacing, transform),
                    color: stroke,
                    width: CURVE_WIDTH,
                });
            }
            CurveKind::Area | CurveKind::Stack => {
                let pairs = curve::pairs(&curve.points);
                primitives.extend(
                    curve::area_quads(&pairs, spacing, transform)
                        .into_iter()
                        .map(|quad| Primitive::Polygon {
                            points: quad.to_vec(),
                            color: fill,
                        }),
                );
                primitives.push(Primitive::Polyline {
                    subpaths: curve::line_subpaths(&curve::outline(&pairs), spacing, transform),
                    color: stroke,
                    width: CURVE_WIDTH,
                });
            }
        }
    }

    primitives
}

/// Weight 0 hides the gridline, 1 uses the foreground, heavier ones the
/// secondary grid color.
fn gridline_color(weight: u8, foreground: Color) -> Option<Color> {
    match weight {
        0 => None,
        1 => Some(foreground),
        _ => color::parse_hex(SECONDARY_GRID).ok(),
    }
}

fn parse_or_skip(hex: &str, what: &str) -> Option<Color> {
    match color::parse_hex(hex) {
        Ok(color) => Some(color),
        Err(err) => {
            log::warn!("Skipping {what}: {err}");
            None
        }
    }
}

fn point(x: f64, y: f64) -> Point {
    Point::new(x as f32, y as f32)
}

fn per_unit(pixels: f64, range: f64) -> f64 {
    if range > 0.0 { pixels / range } else { 0.0 }
}
