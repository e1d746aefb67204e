//! Defers the first load of graphs that are not on screen yet.

use data::Timestamp;
use fetch::LoadRequest;
use iced_core::{Rectangle, Size};

/// `bounds` are relative to the viewport's top-left corner.
pub fn is_in_viewport(bounds: Rectangle, viewport: Size) -> bool {
    bounds.y <= viewport.height
        && bounds.y + bounds.height >= 0.0
        && bounds.x <= viewport.width
        && bounds.x + bounds.width >= 0.0
}

#[derive(Debug, Clone, PartialEq)]
struct Delayed {
    request: LoadRequest,
    bounds: Rectangle,
}

#[derive(Debug, Default)]
pub struct ViewportLazyLoader {
    delayed: Vec<Delayed>,
}

impl ViewportLazyLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the request right away when the placeholder is visible,
    /// otherwise keeps it until a viewport change reveals it.
    pub fn place(
        &mut self,
        request: LoadRequest,
        bounds: Rectangle,
        viewport: Size,
    ) -> Option<LoadRequest> {
        if is_in_viewport(bounds, viewport) {
            return Some(request);
        }

        log::debug!("Delaying graph {} until visible", request.placeholder);
        self.delayed.retain(|d| d.request.placeholder != request.placeholder);
        self.delayed.push(Delayed { request, bounds });
        None
    }

    /// Records that a delayed placeholder moved, e.g. after a relayout.
    pub fn relocate(&mut self, placeholder: &str, bounds: Rectangle) {
        if let Some(delayed) = self
            .delayed
            .iter_mut()
            .find(|d| d.request.placeholder == placeholder)
        {
            delayed.bounds = bounds;
        }
    }

    /// Called on scroll and resize. Hands out every placeholder that became
    /// visible, in placement order, and forgets about them.
    pub fn reveal(&mut self, viewport: Size, scroll: iced_core::Vector) -> Vec<LoadRequest> {
        let (visible, hidden): (Vec<_>, Vec<_>) = std::mem::take(&mut self.delayed)
            .into_iter()
            .partition(|d| is_in_viewport(d.bounds - scroll, viewport));

        self.delayed = hidden;
        visible.into_iter().map(|d| d.request).collect()
    }

    /// Delayed graphs load with the time range the page was last synced to.
    pub fn set_time_range(&mut self, start: Timestamp, end: Timestamp) {
        for delayed in &mut self.delayed {
            delayed.request.data_range.time_range = (start, end);
        }
    }

    pub fn cancel(&mut self, placeholder: &str) -> bool {
        let before = self.delayed.len();
        self.delayed.retain(|d| d.request.placeholder != placeholder);
        before != self.delayed.len()
    }

    pub fn contains(&self, placeholder: &str) -> bool {
        self.delayed.iter().any(|d| d.request.placeholder == placeholder)
    }

    pub fn len(&self) -> usize {
        self.delayed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delayed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data::context::{GraphDataRange, GraphRecipe, RenderConfig};
    use iced_core::Vector;

    const VIEWPORT: Size = Size {
        width: 1000.0,
        height: 800.0,
    };

    fn request(placeholder: &str) -> LoadRequest {
        LoadRequest {
            placeholder: placeholder.to_string(),
            recipe: GraphRecipe::default(),
            data_range: GraphDataRange::default(),
            render_config: RenderConfig::default(),
            display_id: String::new(),
        }
    }

    fn at(y: f32) -> Rectangle {
        Rectangle {
            x: 0.0,
            y,
            width: 400.0,
            height: 200.0,
        }
    }

    #[test]
    fn viewport_edges_are_inclusive() {
        assert!(is_in_viewport(at(800.0), VIEWPORT));
        assert!(is_in_viewport(at(-200.0), VIEWPORT));
        assert!(!is_in_viewport(at(800.5), VIEWPORT));
        assert!(!is_in_viewport(at(-201.0), VIEWPORT));
    }

    #[test]
    fn visible_placeholders_load_immediately() {
        let mut loader = ViewportLazyLoader::new();

        assert!(loader.place(request("a"), at(10.0), VIEWPORT).is_some());
        assert!(loader.place(request("b"), at(2000.0), VIEWPORT).is_none());
        assert_eq!(loader.len(), 1);
    }

    #[test]
    fn scrolling_reveals_and_dequeues() {
        let mut loader = ViewportLazyLoader::new();
        loader.place(request("b"), at(1200.0), VIEWPORT);
        loader.place(request("c"), at(3000.0), VIEWPORT);

        assert!(loader.reveal(VIEWPORT, Vector::new(0.0, 100.0)).is_empty());

        let revealed = loader.reveal(VIEWPORT, Vector::new(0.0, 500.0));
        assert_eq!(revealed.len(), 1);
        assert_eq!(revealed[0].placeholder, "b");
        assert!(!loader.contains("b"));
        assert!(loader.contains("c"));
    }

    #[test]
    fn synced_range_applies_to_delayed_graphs() {
        let mut loader = ViewportLazyLoader::new();
        loader.place(request("c"), at(3000.0), VIEWPORT);
        loader.set_time_range(1000.0, 1500.0);

        let revealed = loader.reveal(VIEWPORT, Vector::new(0.0, 2500.0));
        assert_eq!(revealed[0].data_range.time_range, (1000.0, 1500.0));
    }
}
