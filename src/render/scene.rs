use iced_core::{Color, Point, Rectangle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

impl From<Align> for iced::Alignment {
    fn from(align: Align) -> Self {
        match align {
            Align::Start => iced::Alignment::Start,
            Align::Center => iced::Alignment::Center,
            Align::End => iced::Alignment::End,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub content: String,
    pub position: Point,
    pub color: Color,
    pub size: f32,
    pub align_x: Align,
    pub align_y: Align,
}

/// One drawing instruction, in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f32,
    },
    /// Disconnected polylines sharing one stroke.
    Polyline {
        subpaths: Vec<Vec<Point>>,
        color: Color,
        width: f32,
    },
    Polygon {
        points: Vec<Point>,
        color: Color,
    },
    Dot {
        center: Point,
        radius: f32,
        color: Color,
    },
    Text(Label),
    Clip {
        bounds: Rectangle,
        primitives: Vec<Primitive>,
    },
}

/// Everything needed to paint one graph, independent of any backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            primitives: Vec::new(),
        }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// All primitives with clip groups flattened, in paint order.
    pub fn flatten(&self) -> Vec<&Primitive> {
        fn walk<'a>(primitives: &'a [Primitive], out: &mut Vec<&'a Primitive>) {
            for primitive in primitives {
                match primitive {
                    Primitive::Clip { primitives, .. } => walk(primitives, out),
                    other => out.push(other),
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.primitives, &mut out);
        out
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.flatten().into_iter().filter_map(|primitive| match primitive {
            Primitive::Text(label) => Some(label),
            _ => None,
        })
    }
}
