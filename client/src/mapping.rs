//! Conversion between the fixed logical game space and the live viewport.

use macroquad::math::Vec2;
use shared::{LOGICAL_HEIGHT, LOGICAL_WIDTH};

/// Linear per-axis mapping between the 1920x1080 logical rectangle and
/// whatever size the window currently has. The viewport size is passed
/// on every call because it changes asynchronously with respect to
/// render ticks; nothing is cached. No clamping and no aspect-ratio
/// correction: mismatched aspect ratios distort.
pub struct CoordinateMapper {
    logical: Vec2,
}

impl CoordinateMapper {
    pub fn new() -> Self {
        Self {
            logical: Vec2::new(LOGICAL_WIDTH, LOGICAL_HEIGHT),
        }
    }

    pub fn to_viewport(&self, logical: Vec2, viewport: Vec2) -> Vec2 {
        logical * viewport / self.logical
    }

    pub fn to_logical(&self, point: Vec2, viewport: Vec2) -> Vec2 {
        point * self.logical / viewport
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn maps_logical_center_to_viewport_center() {
        let mapper = CoordinateMapper::new();
        let viewport = Vec2::new(800.0, 600.0);

        let center = mapper.to_viewport(Vec2::new(960.0, 540.0), viewport);
        assert_approx_eq!(center.x, 400.0);
        assert_approx_eq!(center.y, 300.0);
    }

    #[test]
    fn inverse_recovers_logical_position() {
        let mapper = CoordinateMapper::new();
        let viewport = Vec2::new(1280.0, 720.0);

        let logical = mapper.to_logical(Vec2::new(640.0, 360.0), viewport);
        assert_approx_eq!(logical.x, 960.0);
        assert_approx_eq!(logical.y, 540.0);
    }

    #[test]
    fn round_trip_is_stable_across_viewport_sizes() {
        let mapper = CoordinateMapper::new();
        let viewports = [
            Vec2::new(1920.0, 1080.0),
            Vec2::new(800.0, 600.0),
            Vec2::new(2560.0, 1440.0),
            Vec2::new(1024.0, 1024.0),
        ];
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(500.0, 500.0),
            Vec2::new(1920.0, 1080.0),
            Vec2::new(123.4, 987.6),
        ];

        for viewport in viewports {
            for point in points {
                let once = mapper.to_viewport(point, viewport);
                let again = mapper.to_viewport(mapper.to_logical(once, viewport), viewport);
                assert_approx_eq!(once.x, again.x, 1e-3);
                assert_approx_eq!(once.y, again.y, 1e-3);
            }
        }
    }

    #[test]
    fn mismatched_aspect_ratio_distorts_without_clamping() {
        let mapper = CoordinateMapper::new();
        // Square viewport against a 16:9 logical space.
        let viewport = Vec2::new(1080.0, 1080.0);

        let mapped = mapper.to_viewport(Vec2::new(1920.0, 1080.0), viewport);
        assert_approx_eq!(mapped.x, 1080.0);
        assert_approx_eq!(mapped.y, 1080.0);

        // Points outside the logical rectangle pass through unclamped.
        let outside = mapper.to_viewport(Vec2::new(3840.0, -1080.0), viewport);
        assert_approx_eq!(outside.x, 2160.0);
        assert_approx_eq!(outside.y, -1080.0);
    }
}
