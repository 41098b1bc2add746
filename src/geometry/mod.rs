pub mod circle;
pub mod polygon;
pub mod projection;
pub mod zoom;

pub use circle::{DEFAULT_STEPS, circle_geometry, circle_to_polygon};
pub use polygon::{MIN_OVERLAP_AREA, Rings, from_rings, to_rings, validate_rings};
pub use projection::{METERS_PER_DEGREE, Projector};
pub use zoom::zoom_for_radius;
