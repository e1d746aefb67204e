use std::cell::Cell;

use iced::widget::canvas::{self, Cache, Geometry, Path, Stroke};
use iced::{Color, Event, Point, Rectangle, Renderer, Size, Theme, Vector, mouse};

use data::GraphId;

use crate::hover::HoverPopup;
use crate::interaction::{self, Pointer, Target};
use crate::page::Message;
use crate::render::{Label, Primitive, Scene};
use crate::session::{GraphSession, GraphStatus, PointerState};
use crate::style::GraphStyle;

/// Side of the square in the bottom right corner that starts a resize.
const RESIZE_HANDLE: f32 = 12.0;
const STATUS_TEXT_SIZE: f32 = 12.0;
const HOVER_TEXT_SIZE: f32 = 11.0;
const HOVER_ROW_HEIGHT: f32 = 16.0;
const HOVER_PADDING: f32 = 6.0;
const HOVER_WIDTH: f32 = 180.0;
const SWATCH_SIZE: f32 = 8.0;
const INDICATOR_WIDTH: f32 = 1.0;

/// Maps canvas pixels of a [`Scene`] onto the bounds it is drawn in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    x: f32,
    y: f32,
}

impl Scale {
    pub fn fit(scene: &Scene, size: Size) -> Self {
        let ratio = |logical: f32, canvas: f32| {
            if canvas > 0.0 { logical / canvas } else { 1.0 }
        };

        Self {
            x: ratio(size.width, scene.width),
            y: ratio(size.height, scene.height),
        }
    }

    pub fn point(&self, point: Point) -> Point {
        Point::new(point.x * self.x, point.y * self.y)
    }

    pub fn rectangle(&self, rectangle: Rectangle) -> Rectangle {
        Rectangle {
            x: rectangle.x * self.x,
            y: rectangle.y * self.y,
            width: rectangle.width * self.x,
            height: rectangle.height * self.y,
        }
    }

    /// Stroke widths and font sizes follow the smaller axis.
    pub fn length(&self, length: f32) -> f32 {
        length * self.x.min(self.y)
    }
}

/// Part of the graph a logical position falls on.
pub fn target_at(position: Point, size: Size, resizable: bool) -> Target {
    let on_handle = position.x >= size.width - RESIZE_HANDLE
        && position.y >= size.height - RESIZE_HANDLE;

    if resizable && on_handle {
        Target::ResizeHandle
    } else {
        Target::Canvas
    }
}

/// One graph of a [`GraphSession`], drawn from its last rendered scene.
pub struct GraphCanvas<'a> {
    session: &'a GraphSession,
    graph: &'a GraphId,
}

impl<'a> GraphCanvas<'a> {
    pub fn new(session: &'a GraphSession, graph: &'a GraphId) -> Self {
        Self { session, graph }
    }

    fn owns_pointer(&self) -> bool {
        match self.session.pointer() {
            PointerState::Dragging { graph, .. } | PointerState::Resizing { graph, .. } => {
                graph == self.graph
            }
            PointerState::Idle => false,
        }
    }

    fn translate(
        &self,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<(interaction::Event, bool)> {
        let over = cursor.is_over(bounds);
        let position = cursor.position_from(bounds.position());
        let pointer = position.map(|p| {
            Pointer::new(
                f64::from(p.x),
                f64::from(p.y),
                f64::from(bounds.width),
                f64::from(bounds.height),
            )
        });
        let resizable = self
            .session
            .artwork(self.graph)
            .is_some_and(|artwork| artwork.render_config.resizable);

        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) if over => {
                let target = target_at(position?, bounds.size(), resizable);
                Some((
                    interaction::Event::Pressed {
                        target,
                        pointer: pointer?,
                    },
                    true,
                ))
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
                if over || self.owns_pointer() =>
            {
                let target = target_at(position?, bounds.size(), resizable);
                Some((
                    interaction::Event::Released {
                        target,
                        pointer: pointer?,
                    },
                    true,
                ))
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => match pointer {
                Some(pointer) => Some((interaction::Event::Moved(pointer), false)),
                None => Some((interaction::Event::Left, false)),
            },
            Event::Mouse(mouse::Event::CursorLeft) => Some((interaction::Event::Left, false)),
            Event::Mouse(mouse::Event::WheelScrolled { delta }) if over => {
                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } | mouse::ScrollDelta::Pixels { y, .. } => {
                        *y
                    }
                };
                if y == 0.0 {
                    return None;
                }
                // scrolling up zooms in
                Some((
                    interaction::Event::Wheel {
                        delta: -f64::from(y),
                        pointer: pointer?,
                    },
                    true,
                ))
            }
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct State {
    cache: Cache,
    revision: Cell<Option<u64>>,
}

impl canvas::Program<Message> for GraphCanvas<'_> {
    type State = State;

    fn update(
        &self,
        _state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        if !cursor.is_over(bounds) && !self.session.is_engaged(self.graph) {
            return None;
        }

        let (event, capture) = self.translate(event, bounds, cursor)?;
        let action = canvas::Action::publish(Message::Pointer(self.graph.clone(), event));

        Some(if capture { action.and_capture() } else { action })
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let revision = self.session.container(self.graph).map(|c| c.revision);
        if state.revision.get() != revision {
            state.cache.clear();
            state.revision.set(revision);
        }

        let Some(scene) = self.session.scene(self.graph) else {
            let mut frame = canvas::Frame::new(renderer, bounds.size());
            draw_status(&mut frame, self.session.status(self.graph), bounds.size());
            return vec![frame.into_geometry()];
        };
        let scale = Scale::fit(scene, bounds.size());

        let graph = state.cache.draw(renderer, bounds.size(), |frame| {
            for primitive in &scene.primitives {
                paint(frame, primitive, scale);
            }
        });

        let mut overlay = canvas::Frame::new(renderer, bounds.size());
        let style = self
            .session
            .artwork(self.graph)
            .map(|artwork| GraphStyle::from_config(&artwork.render_config));

        if let (Some(indicator), Some(style)) = (self.session.indicator(), &style)
            && &indicator.graph == self.graph
        {
            let bottom = self
                .session
                .artwork(self.graph)
                .and_then(|artwork| artwork.layout)
                .map_or(scene.height, |layout| scene.height - layout.bottom_border as f32);
            let top = scale.point(Point::new(indicator.x, 0.0));
            let foot = scale.point(Point::new(indicator.x, bottom));

            overlay.stroke(
                &Path::line(top, foot),
                Stroke::default()
                    .with_color(style.indicator)
                    .with_width(INDICATOR_WIDTH),
            );
        }

        if let (Some(popup), Some(style)) = (self.session.hover(), &style)
            && &popup.graph == self.graph
        {
            draw_hover(&mut overlay, popup, style, scale, bounds.size());
        }

        draw_status(&mut overlay, self.session.status(self.graph), bounds.size());
        if let Some(notice) = self
            .session
            .container(self.graph)
            .and_then(|c| c.notice.as_ref())
        {
            overlay.fill_text(canvas::Text {
                content: notice.clone(),
                position: Point::new(4.0, 4.0),
                color: Color::from_rgb8(0xd0, 0x30, 0x30),
                size: STATUS_TEXT_SIZE.into(),
                ..Default::default()
            });
        }

        vec![graph, overlay.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        match self.session.pointer() {
            PointerState::Dragging { graph, .. } if graph == self.graph => {
                mouse::Interaction::Grabbing
            }
            PointerState::Resizing { graph, .. } if graph == self.graph => {
                mouse::Interaction::ResizingDiagonallyDown
            }
            _ => {
                let resizable = self.session.artwork(self.graph).is_some_and(|artwork| {
                    artwork.render_config.resizable && artwork.render_config.show_controls
                });
                match cursor.position_in(bounds) {
                    Some(position)
                        if target_at(position, bounds.size(), resizable)
                            == Target::ResizeHandle =>
                    {
                        mouse::Interaction::ResizingDiagonallyDown
                    }
                    _ => mouse::Interaction::default(),
                }
            }
        }
    }
}

fn paint(frame: &mut canvas::Frame, primitive: &Primitive, scale: Scale) {
    match primitive {
        Primitive::Line {
            from,
            to,
            color,
            width,
        } => {
            frame.stroke(
                &Path::line(scale.point(*from), scale.point(*to)),
                Stroke::default()
                    .with_color(*color)
                    .with_width(scale.length(*width)),
            );
        }
        Primitive::Polyline {
            subpaths,
            color,
            width,
        } => {
            let path = Path::new(|builder| {
                for subpath in subpaths {
                    let Some((first, rest)) = subpath.split_first() else {
                        continue;
                    };
                    builder.move_to(scale.point(*first));
                    for point in rest {
                        builder.line_to(scale.point(*point));
                    }
                }
            });
            frame.stroke(
                &path,
                Stroke::default()
                    .with_color(*color)
                    .with_width(scale.length(*width)),
            );
        }
        Primitive::Polygon { points, color } => {
            let Some((first, rest)) = points.split_first() else {
                return;
            };
            let path = Path::new(|builder| {
                builder.move_to(scale.point(*first));
                for point in rest {
                    builder.line_to(scale.point(*point));
                }
                builder.close();
            });
            frame.fill(&path, *color);
        }
        Primitive::Dot {
            center,
            radius,
            color,
        } => {
            frame.fill(
                &Path::circle(scale.point(*center), scale.length(*radius)),
                *color,
            );
        }
        Primitive::Text(label) => fill_label(frame, label, scale),
        Primitive::Clip { bounds, primitives } => {
            let region = scale.rectangle(*bounds);
            frame.with_clip(region, |frame| {
                frame.translate(Vector::new(-region.x, -region.y));
                for primitive in primitives {
                    paint(frame, primitive, scale);
                }
            });
        }
    }
}

fn fill_label(frame: &mut canvas::Frame, label: &Label, scale: Scale) {
    frame.fill_text(canvas::Text {
        content: label.content.clone(),
        position: scale.point(label.position),
        color: label.color,
        size: scale.length(label.size).into(),
        align_x: iced::Alignment::from(label.align_x).into(),
        align_y: iced::Alignment::from(label.align_y).into(),
        ..Default::default()
    });
}

fn draw_hover(
    frame: &mut canvas::Frame,
    popup: &HoverPopup,
    style: &GraphStyle,
    scale: Scale,
    size: Size,
) {
    let height = HOVER_PADDING * 2.0 + HOVER_ROW_HEIGHT * (popup.rows.len() + 1) as f32;
    let anchor = scale.point(popup.anchor);

    // keep the popup inside the graph, flipping it left of the indicator
    let x = if anchor.x + HOVER_PADDING + HOVER_WIDTH > size.width {
        (anchor.x - HOVER_PADDING - HOVER_WIDTH).max(0.0)
    } else {
        anchor.x + HOVER_PADDING
    };
    let origin = Point::new(x, anchor.y.max(0.0));

    let background = style.text_shadow.unwrap_or(Color::WHITE);
    frame.fill_rectangle(
        origin,
        Size::new(HOVER_WIDTH, height),
        Color { a: 0.9, ..background },
    );

    frame.fill_text(canvas::Text {
        content: popup.time.clone(),
        position: origin + Vector::new(HOVER_PADDING, HOVER_PADDING),
        color: style.foreground,
        size: HOVER_TEXT_SIZE.into(),
        ..Default::default()
    });

    for (i, row) in popup.rows.iter().enumerate() {
        let top = origin.y + HOVER_PADDING + HOVER_ROW_HEIGHT * (i + 1) as f32;

        frame.fill_rectangle(
            Point::new(origin.x + HOVER_PADDING, top + 2.0),
            Size::new(SWATCH_SIZE, SWATCH_SIZE),
            row.swatch,
        );
        frame.fill_text(canvas::Text {
            content: row.title.clone(),
            position: Point::new(origin.x + HOVER_PADDING * 2.0 + SWATCH_SIZE, top),
            color: style.foreground,
            size: HOVER_TEXT_SIZE.into(),
            ..Default::default()
        });
        frame.fill_text(canvas::Text {
            content: row.value.clone(),
            position: Point::new(origin.x + HOVER_WIDTH - HOVER_PADDING, top),
            color: style.foreground,
            size: HOVER_TEXT_SIZE.into(),
            align_x: iced::Alignment::End.into(),
            ..Default::default()
        });
    }
}

fn draw_status(frame: &mut canvas::Frame, status: Option<&GraphStatus>, size: Size) {
    let content = match status {
        Some(GraphStatus::Loading) => "Loading graph...".to_string(),
        Some(GraphStatus::Error(message)) => message.clone(),
        Some(GraphStatus::Rendered | GraphStatus::Updating) | None => return,
    };

    frame.fill_text(canvas::Text {
        content,
        position: Point::new(size.width / 2.0, size.height / 2.0),
        color: Color::from_rgb8(0x80, 0x80, 0x80),
        size: STATUS_TEXT_SIZE.into(),
        align_x: iced::Alignment::Center.into(),
        align_y: iced::Alignment::Center.into(),
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_maps_canvas_pixels_to_logical_ones() {
        let scene = Scene::new(800.0, 400.0);
        let scale = Scale::fit(&scene, Size::new(400.0, 200.0));

        assert_eq!(scale.point(Point::new(64.0, 100.0)), Point::new(32.0, 50.0));
        assert_eq!(scale.length(2.0), 1.0);
        assert_eq!(
            scale.rectangle(Rectangle::new(Point::new(10.0, 20.0), Size::new(100.0, 50.0))),
            Rectangle::new(Point::new(5.0, 10.0), Size::new(50.0, 25.0))
        );
    }

    #[test]
    fn empty_scene_keeps_identity_scale() {
        let scale = Scale::fit(&Scene::default(), Size::new(400.0, 200.0));
        assert_eq!(scale.point(Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
    }

    #[test]
    fn resize_handle_sits_in_the_bottom_right_corner() {
        let size = Size::new(400.0, 200.0);

        assert_eq!(
            target_at(Point::new(395.0, 195.0), size, true),
            Target::ResizeHandle
        );
        assert_eq!(target_at(Point::new(395.0, 195.0), size, false), Target::Canvas);
        assert_eq!(target_at(Point::new(200.0, 195.0), size, true), Target::Canvas);
    }
}
