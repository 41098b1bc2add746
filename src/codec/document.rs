use serde::{Deserialize, Serialize};

use crate::geometry::Rings;

/// Top-level `type` of a persisted document
pub const FEATURE_COLLECTION: &str = "FeatureCollection";
/// `type` of every entry in `features`
pub const FEATURE: &str = "Feature";

pub const KIND_CIRCLE: &str = "circle";
pub const KIND_POLYGON: &str = "polygon";
pub const KIND_MARKER: &str = "marker";

/// Persisted shape set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub type_: String,
    pub metadata: Metadata,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub circle_count: u64,
    pub earned_reward: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub type_: String,
    pub properties: Properties,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    /// "circle", "polygon" or "marker"
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inside: Option<bool>,
    /// Meters, circles only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Absent in documents saved before visibility existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// Coordinates are (lng, lat)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: (f64, f64) },
    MultiPolygon { coordinates: Rings },
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
        }
    }
}
