use thiserror::Error;

/// Errors raised by direct `ShapeSet` mutators
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("radius must be a finite positive number of meters, got {0}")]
    InvalidRadius(f64),
    #[error("coordinate ({lat}, {lng}) is not a valid lat/lng pair")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error("no shape with id {0}")]
    UnknownId(u64),
    #[error("shape {0} is not a circle")]
    NotACircle(u64),
}

/// Degenerate input to a boolean operation.
///
/// Never surfaced past the resolver: a pair that fails validation is
/// treated as not overlapping.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("geometry has no polygons")]
    Empty,
    #[error("ring has {points} points, a closed ring needs at least 4")]
    DegenerateRing { points: usize },
    #[error("geometry contains a NaN or infinite coordinate")]
    NonFinite,
    #[error("polygon has no rings")]
    NoRings,
    #[error("ring does not end where it starts")]
    UnclosedRing,
}

/// Malformed persisted document
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("expected a FeatureCollection, found type {0:?}")]
    NotFeatureCollection(String),
    #[error("feature {index} has type {found:?}, expected \"Feature\"")]
    NotAFeature { index: usize, found: String },
    #[error("feature {index} has unknown property type {found:?}")]
    UnknownFeatureType { index: usize, found: String },
    #[error("feature {id} is missing required property {property:?}")]
    MissingProperty { id: u64, property: &'static str },
    #[error("feature {id} of type {kind} cannot carry {geometry} geometry")]
    GeometryMismatch {
        id: u64,
        kind: &'static str,
        geometry: &'static str,
    },
    #[error("feature {id} has invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate { id: u64, lat: f64, lng: f64 },
    #[error("feature {id} has invalid geometry: {source}")]
    InvalidGeometry { id: u64, source: GeometryError },
    #[error("circle {id} has invalid radius {radius}")]
    InvalidRadius { id: u64, radius: f64 },
    #[error("id {0} appears on more than one feature")]
    DuplicateId(u64),
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
