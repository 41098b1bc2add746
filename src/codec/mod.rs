//! Feature-collection persistence for a `ShapeSet`
//!
//! Circles and markers are stored as `Point` features at their (lng, lat)
//! position, regions as `MultiPolygon` features. Ids, inside flags and
//! visibility survive a round trip unchanged.

pub mod document;
pub mod file;

use std::collections::HashSet;

use log::debug;
use serde_json::Value;

use crate::domain::shape_set::check_coordinate;
use crate::domain::{Circle, Marker, Region, ShapeSet};
use crate::error::DecodeError;
use crate::geometry::{from_rings, to_rings, validate_rings};

pub use document::{Document, FEATURE, FEATURE_COLLECTION, Feature, Geometry, Metadata, Properties};
pub use document::{KIND_CIRCLE, KIND_MARKER, KIND_POLYGON};
pub use file::{load, save};

/// A decoded document: the shapes plus the two metadata scalars
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub shapes: ShapeSet,
    pub circle_count: u64,
    pub earned_reward: bool,
}

/// Serialize a shape set into a persisted document
pub fn encode(set: &ShapeSet, circle_count: u64, earned_reward: bool) -> Document {
    let circles = set.circles().iter().map(|c| {
        let (lat, lng) = c.center;
        feature(
            KIND_CIRCLE,
            c.id,
            Some(c.inside),
            Some(c.radius),
            Some(c.visible),
            Geometry::Point {
                coordinates: (lng, lat),
            },
        )
    });

    let regions = set.regions().iter().map(|r| {
        feature(
            KIND_POLYGON,
            r.id,
            Some(r.inside),
            None,
            Some(r.visible),
            Geometry::MultiPolygon {
                coordinates: to_rings(&r.geometry),
            },
        )
    });

    let markers = set.markers().iter().map(|m| {
        feature(
            KIND_MARKER,
            m.id,
            None,
            None,
            None,
            Geometry::Point {
                coordinates: (m.lng, m.lat),
            },
        )
    });

    Document {
        type_: FEATURE_COLLECTION.to_string(),
        metadata: Metadata {
            circle_count,
            earned_reward,
        },
        features: circles.chain(regions).chain(markers).collect(),
    }
}

fn feature(
    kind: &str,
    id: u64,
    inside: Option<bool>,
    radius: Option<f64>,
    visible: Option<bool>,
    geometry: Geometry,
) -> Feature {
    Feature {
        type_: FEATURE.to_string(),
        properties: Properties {
            kind: kind.to_string(),
            id,
            inside,
            radius,
            visible,
        },
        geometry,
    }
}

/// Reconstruct a shape set from a persisted document
///
/// The id allocator resumes above the largest id found. Missing `visible`
/// defaults to true. Coordinates and rings get the same checks as shapes
/// added through `ShapeSet`, so nothing invalid reaches the resolver.
pub fn decode(doc: &Document) -> Result<Decoded, DecodeError> {
    if doc.type_ != FEATURE_COLLECTION {
        return Err(DecodeError::NotFeatureCollection(doc.type_.clone()));
    }

    let mut circles = Vec::new();
    let mut regions = Vec::new();
    let mut markers = Vec::new();
    let mut seen = HashSet::new();

    for (index, feature) in doc.features.iter().enumerate() {
        if feature.type_ != FEATURE {
            return Err(DecodeError::NotAFeature {
                index,
                found: feature.type_.clone(),
            });
        }

        let props = &feature.properties;
        let id = props.id;
        if !seen.insert(id) {
            return Err(DecodeError::DuplicateId(id));
        }
        let visible = props.visible.unwrap_or(true);

        match (props.kind.as_str(), &feature.geometry) {
            (KIND_CIRCLE, &Geometry::Point { coordinates: (lng, lat) }) => {
                let radius = props.radius.ok_or(DecodeError::MissingProperty {
                    id,
                    property: "radius",
                })?;
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(DecodeError::InvalidRadius { id, radius });
                }
                check_point(id, lat, lng)?;
                circles.push(Circle {
                    id,
                    center: (lat, lng),
                    radius,
                    inside: require_inside(props)?,
                    visible,
                });
            }
            (KIND_POLYGON, Geometry::MultiPolygon { coordinates }) => {
                validate_rings(coordinates)
                    .map_err(|source| DecodeError::InvalidGeometry { id, source })?;
                regions.push(Region {
                    id,
                    geometry: from_rings(coordinates),
                    inside: require_inside(props)?,
                    visible,
                });
            }
            (KIND_MARKER, &Geometry::Point { coordinates: (lng, lat) }) => {
                check_point(id, lat, lng)?;
                markers.push(Marker { id, lat, lng });
            }
            (KIND_CIRCLE, geometry) => return Err(mismatch(id, KIND_CIRCLE, geometry)),
            (KIND_POLYGON, geometry) => return Err(mismatch(id, KIND_POLYGON, geometry)),
            (KIND_MARKER, geometry) => return Err(mismatch(id, KIND_MARKER, geometry)),
            (other, _) => {
                return Err(DecodeError::UnknownFeatureType {
                    index,
                    found: other.to_string(),
                });
            }
        }
    }

    debug!(
        "Decoded {} circles, {} regions, {} markers",
        circles.len(),
        regions.len(),
        markers.len()
    );

    Ok(Decoded {
        shapes: ShapeSet::from_parts(circles, regions, markers),
        circle_count: doc.metadata.circle_count,
        earned_reward: doc.metadata.earned_reward,
    })
}

/// Parse and decode a JSON document, checking the top-level type first
pub fn decode_str(json: &str) -> Result<Decoded, DecodeError> {
    let value: Value = serde_json::from_str(json)?;
    let type_ = value.get("type").and_then(Value::as_str).unwrap_or_default();
    if type_ != FEATURE_COLLECTION {
        return Err(DecodeError::NotFeatureCollection(type_.to_string()));
    }

    let doc: Document = serde_json::from_value(value)?;
    decode(&doc)
}

/// Encode straight to pretty-printed JSON
pub fn encode_string(
    set: &ShapeSet,
    circle_count: u64,
    earned_reward: bool,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&encode(set, circle_count, earned_reward))
}

fn require_inside(props: &Properties) -> Result<bool, DecodeError> {
    props.inside.ok_or(DecodeError::MissingProperty {
        id: props.id,
        property: "inside",
    })
}

fn check_point(id: u64, lat: f64, lng: f64) -> Result<(), DecodeError> {
    check_coordinate(lat, lng).map_err(|_| DecodeError::InvalidCoordinate { id, lat, lng })
}

fn mismatch(id: u64, kind: &'static str, geometry: &Geometry) -> DecodeError {
    DecodeError::GeometryMismatch {
        id,
        kind,
        geometry: geometry.type_name(),
    }
}
