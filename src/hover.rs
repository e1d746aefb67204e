use data::GraphId;
use data::color;
use fetch::HoverData;
use iced_core::{Color, Point};

#[derive(Debug, Clone, PartialEq)]
pub struct HoverRow {
    /// Curve color at the default fill alpha.
    pub swatch: Color,
    pub title: String,
    pub value: String,
}

/// Transient tooltip listing every curve's value at the hovered time.
///
/// Lives next to the artwork, never inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverPopup {
    pub graph: GraphId,
    /// Canvas position the popup is anchored to.
    pub anchor: Point,
    pub time: String,
    pub rows: Vec<HoverRow>,
}

impl HoverPopup {
    pub fn new(graph: GraphId, anchor: Point, data: HoverData) -> Self {
        let rows = data
            .curve_values
            .into_iter()
            .map(|value| HoverRow {
                swatch: color::curve_colors(&value.color)
                    .map(|(_, fill)| fill)
                    .unwrap_or(Color::TRANSPARENT),
                title: value.title,
                value: value.rendered_value.1,
            })
            .collect();

        Self {
            graph,
            anchor,
            time: data.rendered_hover_time,
            rows,
        }
    }
}
