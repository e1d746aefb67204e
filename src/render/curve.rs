//! Geometry of single curves.
//!
//! Samples are spaced half a step apart starting at the artwork's start time.
//! A missing sample is a gap: lines restart after it and area fills skip the
//! segment touching it.

use data::artwork::SeriesValue;
use data::{CoordinateTransform, Points, Timestamp};
use iced_core::Point;

/// Where the samples of a curve sit on the time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub start_time: Timestamp,
    pub interval: f64,
}

impl Spacing {
    pub fn half_step(start_time: Timestamp, step: f64) -> Self {
        Self {
            start_time,
            interval: step / 2.0,
        }
    }

    pub fn time_at(&self, index: usize) -> Timestamp {
        self.start_time + index as f64 * self.interval
    }
}

pub type Pair = (SeriesValue, SeriesValue);

/// Views any point set as `[lower, upper]` pairs. Scalars stand on zero.
pub fn pairs(points: &Points) -> Vec<Pair> {
    match points {
        Points::Scalar(values) => values.iter().map(|value| (Some(0.0), *value)).collect(),
        Points::Ranged(pairs) => pairs.clone(),
    }
}

/// The edge of an area that is drawn as its outline: the upper bound unless
/// it is not above zero, in which case the lower one.
pub fn outline(pairs: &[Pair]) -> Vec<SeriesValue> {
    pairs
        .iter()
        .map(|pair| match *pair {
            (Some(lower), Some(upper)) => Some(if upper <= 0.0 { lower } else { upper }),
            _ => None,
        })
        .collect()
}

pub fn line_subpaths(
    values: &[SeriesValue],
    spacing: Spacing,
    transform: &CoordinateTransform,
) -> Vec<Vec<Point>> {
    let mut subpaths = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for (index, value) in values.iter().enumerate() {
        match value {
            Some(value) => current.push(to_point(transform, spacing.time_at(index), *value)),
            None if !current.is_empty() => subpaths.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        subpaths.push(current);
    }

    subpaths
}

/// One quadrilateral per pair of neighbouring complete samples.
pub fn area_quads(
    pairs: &[Pair],
    spacing: Spacing,
    transform: &CoordinateTransform,
) -> Vec<[Point; 4]> {
    pairs
        .windows(2)
        .enumerate()
        .filter_map(|(index, window)| {
            let (Some(prev_lower), Some(prev_upper)) = window[0] else {
                return None;
            };
            let (Some(lower), Some(upper)) = window[1] else {
                return None;
            };
            let prev_t = spacing.time_at(index);
            let t = spacing.time_at(index + 1);

            Some([
                to_point(transform, prev_t, prev_lower),
                to_point(transform, prev_t, prev_upper),
                to_point(transform, t, upper),
                to_point(transform, t, lower),
            ])
        })
        .collect()
}

fn to_point(transform: &CoordinateTransform, t: Timestamp, v: f64) -> Point {
    let (x, y) = transform.to_pixel(t, v);
    Point::new(x as f32, y as f32)
}
