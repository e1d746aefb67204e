//! Per-graph styling derived from the render config.
//!
//! Colors are resolved once and shared by the canvas and by the host, which
//! receives them as a stylesheet scoped to the graph container.

use std::fmt::Write as _;

use data::color;
use data::context::{RenderConfig, ShowTitle};
use iced_core::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphStyle {
    pub foreground: Color,
    /// Axis and time labels.
    pub axis_label: Color,
    pub inactive_scalar: Color,
    pub legend_border: Color,
    pub link: Color,
    /// Outline behind titles drawn on top of the plot.
    pub text_shadow: Option<Color>,
    pub indicator: Color,
}

impl GraphStyle {
    pub fn from_config(config: &RenderConfig) -> Self {
        let foreground = color::parse_hex(&config.foreground_color).unwrap_or_else(|err| {
            log::warn!("{err}, falling back to black");
            Color::BLACK
        });

        let text_shadow = (config.preview || config.show_title == ShowTitle::Inline)
            .then(|| color::invert(foreground));

        Self {
            foreground,
            axis_label: foreground.scale_alpha(0.8),
            inactive_scalar: foreground.scale_alpha(0.6),
            legend_border: foreground,
            link: foreground,
            text_shadow,
            indicator: foreground,
        }
    }

    /// Stylesheet whose rules only apply inside the element with id `scope`.
    pub fn to_css(&self, scope: &str) -> String {
        let fg = color::to_hex(self.foreground);
        let mut css = String::new();

        let _ = writeln!(css, "#{scope} .title, #{scope} .legend {{ color: {fg}; }}");
        let _ = writeln!(
            css,
            "#{scope} .time {{ color: {}; }}",
            color::to_css_rgba(self.axis_label, self.axis_label.a)
        );
        let _ = writeln!(
            css,
            "#{scope} .legend th.scalar.inactive {{ color: {}; }}",
            color::to_css_rgba(self.inactive_scalar, self.inactive_scalar.a)
        );
        let _ = writeln!(
            css,
            "#{scope} .legend th, #{scope} .legend td {{ border-color: {}; }}",
            color::to_hex(self.legend_border)
        );
        let _ = writeln!(css, "#{scope} a {{ color: {}; }}", color::to_hex(self.link));
        let _ = writeln!(
            css,
            "#{scope} .indicator {{ border-right: 1px dotted {}; }}",
            color::to_hex(self.indicator)
        );

        if let Some(shadow) = self.text_shadow {
            let shadow = color::to_hex(shadow);
            let _ = writeln!(
                css,
                "#{scope} .title {{ text-shadow: -1px 0 {shadow}, 0 1px {shadow}, 1px 0 {shadow}, 0 -1px {shadow}; }}"
            );
        }

        css
    }
}
