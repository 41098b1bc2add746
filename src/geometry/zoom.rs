use super::projection::METERS_PER_DEGREE;

/// Pixel diameter a circle should occupy on screen
const TARGET_DIAMETER_PX: f64 = 400.0;
const TILE_SIZE_PX: f64 = 256.0;
pub const MIN_ZOOM: i32 = 1;
pub const MAX_ZOOM: i32 = 19;

/// Slippy-map zoom level at which a circle of `radius_m` spans ~400px
///
/// Inverts `meters_per_px = 360 * 111320 / 256 / 2^zoom`, rounds, and clamps
/// to [1, 19]. Non-positive or non-finite radii zoom all the way in.
pub fn zoom_for_radius(radius_m: f64) -> i32 {
    if !(radius_m.is_finite() && radius_m > 0.0) {
        return MAX_ZOOM;
    }

    let meters_per_px_z0 = 360.0 * METERS_PER_DEGREE / TILE_SIZE_PX;
    let target_meters_per_px = 2.0 * radius_m / TARGET_DIAMETER_PX;
    let zoom = (meters_per_px_z0 / target_meters_per_px).log2().round();

    (zoom as i32).clamp(MIN_ZOOM, MAX_ZOOM)
}
