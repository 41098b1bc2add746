use std::f64::consts::TAU;

use geo::{LineString, MultiPolygon, Polygon};

use super::Projector;

/// Number of samples used for every production circle
pub const DEFAULT_STEPS: usize = 64;

/// Approximate a circle as a closed ring of (lng, lat) points
///
/// Samples `steps` equally spaced angles starting due east and repeats the
/// first point at the end, so the ring has `steps + 1` points.
///
/// # Arguments
/// * `center` - (lat, lng) in degrees
/// * `radius_m` - Radius in meters
/// * `steps` - Number of distinct vertices
pub fn circle_to_polygon(center: (f64, f64), radius_m: f64, steps: usize) -> Vec<(f64, f64)> {
    let projector = Projector::new(center);
    let mut ring = Vec::with_capacity(steps + 1);

    for i in 0..steps {
        let angle = TAU * i as f64 / steps as f64;
        let (lat, lng) = projector.unproject(radius_m * angle.cos(), radius_m * angle.sin());
        ring.push((lng, lat));
    }

    if let Some(&first) = ring.first() {
        ring.push(first);
    }

    ring
}

/// Circle approximation wrapped as a single-polygon `MultiPolygon`
pub fn circle_geometry(center: (f64, f64), radius_m: f64, steps: usize) -> MultiPolygon<f64> {
    let exterior = LineString::from(circle_to_polygon(center, radius_m, steps));
    MultiPolygon(vec![Polygon::new(exterior, Vec::new())])
}
