pub mod shape;
pub mod shape_set;

pub use shape::{Circle, Marker, Region, Shape};
pub use shape_set::ShapeSet;
