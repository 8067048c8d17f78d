//! Equal Earth world projection fitted to a capture canvas.
//!
//! A point is captured on a canvas of arbitrary size showing the whole world.
//! The projection is scaled uniformly and centred so the sphere fills the
//! canvas, the same fitting rule d3-geo applies in `fitSize`, and pixel
//! coordinates are inverted back to degrees of longitude and latitude.
//! Screen `y` grows downwards. Pixels in the canvas margins left or right of
//! the outline invert to longitudes past ±180, unwrapped.

use crate::error::PointError;
use std::f64::consts::{FRAC_PI_2, PI};

const A1: f64 = 1.340264;
const A2: f64 = -0.081106;
const A3: f64 = 0.000893;
const A4: f64 = 0.003796;
// sqrt(3) / 2
const M: f64 = 0.866_025_403_784_438_6;
const ITERATIONS: usize = 12;
const EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub long: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualEarth {
    scale: f64,
    translate_x: f64,
    translate_y: f64,
}

impl EqualEarth {
    /// Fits the whole sphere into a `width` x `height` rectangle.
    pub fn fit_size(width: f64, height: f64) -> Result<Self, PointError> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(PointError::Projection(format!(
                "canvas must have positive dimensions, got {}x{}",
                width, height
            )));
        }
        let (max_x, _) = raw_forward(PI, 0.0);
        let (_, max_y) = raw_forward(0.0, FRAC_PI_2);
        let scale = (width / (2.0 * max_x)).min(height / (2.0 * max_y));

        Ok(Self {
            scale,
            translate_x: width / 2.0,
            translate_y: height / 2.0,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Projects degrees to canvas pixels.
    pub fn forward(&self, long: f64, lat: f64) -> (f64, f64) {
        let (x, y) = raw_forward(long.to_radians(), lat.to_radians());
        (
            self.translate_x + self.scale * x,
            self.translate_y - self.scale * y,
        )
    }

    /// Inverts canvas pixels to degrees. Only pixels above or below the poles have no inverse.
    pub fn invert(&self, x: f64, y: f64) -> Result<GeoPoint, PointError> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(PointError::Projection(format!(
                "coordinates must be finite, got ({}, {})",
                x, y
            )));
        }
        let (lambda, phi) = raw_invert(
            (x - self.translate_x) / self.scale,
            (self.translate_y - y) / self.scale,
        );
        if !(lambda.is_finite() && phi.is_finite()) {
            return Err(PointError::Projection(format!(
                "({}, {}) lies beyond the poles",
                x, y
            )));
        }

        Ok(GeoPoint {
            long: lambda.to_degrees(),
            lat: phi.to_degrees(),
        })
    }
}

/// Fits the projection to the canvas and inverts `(x, y)` on it.
pub fn project(width: f64, height: f64, x: f64, y: f64) -> Result<GeoPoint, PointError> {
    EqualEarth::fit_size(width, height)?.invert(x, y)
}

fn raw_forward(lambda: f64, phi: f64) -> (f64, f64) {
    let l = (M * phi.sin()).asin();
    let l2 = l * l;
    let l6 = l2 * l2 * l2;
    (
        lambda * l.cos() / (M * (A1 + 3.0 * A2 * l2 + l6 * (7.0 * A3 + 9.0 * A4 * l2))),
        l * (A1 + A2 * l2 + l6 * (A3 + A4 * l2)),
    )
}

// Newton iteration on the parametric latitude. Returns NaN when y is beyond the poles.
fn raw_invert(x: f64, y: f64) -> (f64, f64) {
    let mut l = y;
    let mut l2 = l * l;
    let mut l6 = l2 * l2 * l2;
    for _ in 0..ITERATIONS {
        let fy = l * (A1 + A2 * l2 + l6 * (A3 + A4 * l2)) - y;
        let fpy = A1 + 3.0 * A2 * l2 + l6 * (7.0 * A3 + 9.0 * A4 * l2);
        let delta = fy / fpy;
        l -= delta;
        l2 = l * l;
        l6 = l2 * l2 * l2;
        if delta.abs() < EPSILON {
            break;
        }
    }
    let lambda = M * x * (A1 + 3.0 * A2 * l2 + l6 * (7.0 * A3 + 9.0 * A4 * l2)) / l.cos();
    let sin_phi = l.sin() / M;
    if sin_phi.abs() > 1.0 {
        return (lambda, f64::NAN);
    }
    (lambda, sin_phi.asin())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn canvas_centre_should_invert_to_origin() {
        for (width, height) in [(500.0, 500.0), (800.0, 400.0), (320.0, 640.0), (1.0, 3.0)] {
            let point = project(width, height, width / 2.0, height / 2.0).unwrap();

            assert!(point.long.abs() < TOLERANCE, "{}x{}", width, height);
            assert!(point.lat.abs() < TOLERANCE, "{}x{}", width, height);
        }
    }

    #[test]
    fn forward_then_invert_should_return_the_same_location() {
        let projection = EqualEarth::fit_size(960.0, 500.0).unwrap();

        for (long, lat) in [(2.35, 48.85), (-74.0, 40.7), (151.2, -33.9), (0.0, -80.0)] {
            let (x, y) = projection.forward(long, lat);
            let point = projection.invert(x, y).unwrap();

            assert!((point.long - long).abs() < TOLERANCE, "long {}", long);
            assert!((point.lat - lat).abs() < TOLERANCE, "lat {}", lat);
        }
    }

    #[test]
    fn sphere_should_touch_the_limiting_canvas_edge() {
        let projection = EqualEarth::fit_size(960.0, 500.0).unwrap();

        let (east, equator) = projection.forward(180.0, 0.0);
        let (west, _) = projection.forward(-180.0, 0.0);

        assert!((east - 960.0).abs() < TOLERANCE);
        assert!(west.abs() < TOLERANCE);
        assert!((equator - 250.0).abs() < TOLERANCE);
    }

    #[test]
    fn northern_points_should_be_above_the_centre() {
        let point = project(500.0, 500.0, 250.0, 200.0).unwrap();

        assert!(point.lat > 0.0);
        assert!(point.long.abs() < TOLERANCE);
    }

    #[test]
    fn degenerate_canvas_should_be_rejected() {
        for (width, height) in [(0.0, 500.0), (500.0, 0.0), (-1.0, 10.0), (f64::NAN, 10.0)] {
            let result = project(width, height, 0.0, 0.0);

            assert!(
                matches!(result, Err(PointError::Projection(_))),
                "{}x{}",
                width,
                height
            );
        }
    }

    #[test]
    fn point_beyond_the_poles_should_be_rejected() {
        let result = project(500.0, 500.0, 1.0, 1.0);

        assert!(matches!(result, Err(PointError::Projection(_))));
    }

    #[test]
    fn corner_of_a_wide_canvas_should_still_invert() {
        let point = project(800.0, 400.0, 30.0, 60.0).unwrap();

        assert!(point.long.is_finite() && point.long < 0.0);
        assert!(point.lat.is_finite() && point.lat > 0.0);
    }

    #[test]
    fn point_beyond_the_antimeridian_should_keep_its_unwrapped_longitude() {
        let point = project(1000.0, 200.0, 10.0, 100.0).unwrap();

        assert!(point.long < -180.0, "{}", point.long);
        assert!(point.lat.abs() < TOLERANCE);
    }
}
