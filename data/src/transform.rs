use crate::Timestamp;

/// Maps (time, value) to canvas pixels. (0, 0) is the top left corner.
///
/// The mapping is linear and kept in `f64` without rounding, so repeated
/// forward and inverse mappings while dragging do not drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    time_origin: f64,
    time_range_start: Timestamp,
    pixels_per_second: f64,
    value_origin: f64,
    value_axis_origin: f64,
    pixels_per_unit: f64,
}

impl CoordinateTransform {
    pub fn new(
        time_origin: f64,
        time_range_start: Timestamp,
        pixels_per_second: f64,
        value_origin: f64,
        value_axis_origin: f64,
        pixels_per_unit: f64,
    ) -> Self {
        Self {
            time_origin,
            time_range_start,
            pixels_per_second,
            value_origin,
            value_axis_origin,
            pixels_per_unit,
        }
    }

    #[inline]
    pub fn to_pixel_x(&self, t: Timestamp) -> f64 {
        (t - self.time_range_start) * self.pixels_per_second + self.time_origin
    }

    #[inline]
    pub fn to_pixel_y(&self, v: f64) -> f64 {
        self.value_origin - (v - self.value_axis_origin) * self.pixels_per_unit
    }

    #[inline]
    pub fn to_pixel(&self, t: Timestamp, v: f64) -> (f64, f64) {
        (self.to_pixel_x(t), self.to_pixel_y(v))
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second
    }

    pub fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_plot_corner() {
        // 60px vertical axis gutter, 400px tall plot, values from -5
        let t = CoordinateTransform::new(60.0, 1000.0, 0.5, 400.0, -5.0, 4.0);

        assert_eq!(t.to_pixel(1000.0, -5.0), (60.0, 400.0));
        assert_eq!(t.to_pixel_x(1100.0), 110.0);
        assert_eq!(t.to_pixel_y(5.0), 360.0);
    }

    #[test]
    fn larger_values_move_up() {
        let t = CoordinateTransform::new(0.0, 0.0, 1.0, 100.0, 0.0, 2.0);
        assert!(t.to_pixel_y(10.0) < t.to_pixel_y(1.0));
    }
}
