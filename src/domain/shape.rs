use geo::MultiPolygon;

use crate::geometry::circle_geometry;

/// A user-placed circular zone
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub id: u64,
    /// (lat, lng) in degrees
    pub center: (f64, f64),
    /// Radius in meters
    pub radius: f64,
    pub inside: bool,
    pub visible: bool,
}

/// A zone produced by a boolean operation
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: u64,
    /// x = lng, y = lat
    pub geometry: MultiPolygon<f64>,
    pub inside: bool,
    pub visible: bool,
}

/// Operand of the overlay engine
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Region(Region),
}

impl Shape {
    pub fn id(&self) -> u64 {
        match self {
            Shape::Circle(c) => c.id,
            Shape::Region(r) => r.id,
        }
    }

    pub fn inside(&self) -> bool {
        match self {
            Shape::Circle(c) => c.inside,
            Shape::Region(r) => r.inside,
        }
    }

    pub fn visible(&self) -> bool {
        match self {
            Shape::Circle(c) => c.visible,
            Shape::Region(r) => r.visible,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Circle(_) => "circle",
            Shape::Region(_) => "region",
        }
    }

    /// Ring geometry for boolean operations; circles are discretized with `steps`
    pub fn geometry(&self, steps: usize) -> MultiPolygon<f64> {
        match self {
            Shape::Circle(c) => circle_geometry(c.center, c.radius, steps),
            Shape::Region(r) => r.geometry.clone(),
        }
    }

    /// Same shape under a different id
    pub fn with_id(mut self, id: u64) -> Self {
        match &mut self {
            Shape::Circle(c) => c.id = id,
            Shape::Region(r) => r.id = id,
        }
        self
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<Region> for Shape {
    fn from(region: Region) -> Self {
        Shape::Region(region)
    }
}

/// A point annotation; carried through persistence, never merged
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: u64,
    pub lat: f64,
    pub lng: f64,
}
