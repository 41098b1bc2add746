use geo::{BooleanOps, BoundingRect, Intersects, MultiPolygon};
use log::{trace, warn};

use crate::domain::{Region, Shape};
use crate::geometry::DEFAULT_STEPS;
use crate::geometry::polygon::{validate, without_slivers};

/// A shape that replaces the two merged operands
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    /// Result of a boolean operation, always created visible
    Region {
        geometry: MultiPolygon<f64>,
        inside: bool,
    },
    /// The outside operand of a mixed pair, re-emitted unchanged
    Carried(Shape),
}

impl Replacement {
    /// Materialize under a freshly allocated id
    pub fn into_shape(self, id: u64) -> Shape {
        match self {
            Replacement::Region { geometry, inside } => Shape::Region(Region {
                id,
                geometry,
                inside,
                visible: true,
            }),
            Replacement::Carried(shape) => shape.with_id(id),
        }
    }
}

/// Outcome of resolving one pair of shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    NoOverlap,
    /// Delete both operands and add these, in id-allocation order
    Replace(Vec<Replacement>),
}

/// Decides how two overlapping zones combine, based on their inside flags
///
/// | a.inside | b.inside | result                                   |
/// |----------|----------|------------------------------------------|
/// | false    | false    | a ∪ b, outside                           |
/// | true     | true     | a ∩ b, inside                            |
/// | true     | false    | a − b, inside (if non-empty), then b     |
/// | false    | true     | b − a, inside (if non-empty), then a     |
#[derive(Debug, Clone)]
pub struct Resolver {
    steps: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
        }
    }
}

impl Resolver {
    /// Resolver discretizing circles with `steps` vertices
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Ring geometry of a shape as seen by this resolver
    pub fn geometry(&self, shape: &Shape) -> MultiPolygon<f64> {
        shape.geometry(self.steps)
    }

    pub fn resolve(&self, a: &Shape, b: &Shape) -> Resolution {
        self.resolve_prepared(a, &self.geometry(a), b, &self.geometry(b))
    }

    /// Resolve with geometries already computed by `geometry`
    pub fn resolve_prepared(
        &self,
        a: &Shape,
        geom_a: &MultiPolygon<f64>,
        b: &Shape,
        geom_b: &MultiPolygon<f64>,
    ) -> Resolution {
        if let Err(e) = validate(geom_a).and_then(|_| validate(geom_b)) {
            warn!(
                "Skipping {} {} / {} {}: {}",
                a.kind(),
                a.id(),
                b.kind(),
                b.id(),
                e
            );
            return Resolution::NoOverlap;
        }

        let disjoint_bounds = match (geom_a.bounding_rect(), geom_b.bounding_rect()) {
            (Some(ra), Some(rb)) => !ra.intersects(&rb),
            _ => true,
        };
        if disjoint_bounds {
            return Resolution::NoOverlap;
        }

        let overlap = without_slivers(geom_a.intersection(geom_b));
        if overlap.0.is_empty() {
            trace!("{} {} and {} {} do not overlap", a.kind(), a.id(), b.kind(), b.id());
            return Resolution::NoOverlap;
        }

        let replacements = match (a.inside(), b.inside()) {
            (false, false) => vec![Replacement::Region {
                geometry: without_slivers(geom_a.union(geom_b)),
                inside: false,
            }],
            (true, true) => vec![Replacement::Region {
                geometry: overlap,
                inside: true,
            }],
            (true, false) => carve(geom_a, geom_b, b),
            (false, true) => carve(geom_b, geom_a, a),
        };

        Resolution::Replace(replacements)
    }
}

/// Cut the outside shape out of the inside one, always keeping the outside shape
fn carve(
    inside: &MultiPolygon<f64>,
    outside: &MultiPolygon<f64>,
    outside_shape: &Shape,
) -> Vec<Replacement> {
    let mut replacements = Vec::with_capacity(2);

    // Empty when the inside zone is fully covered
    let remainder = without_slivers(inside.difference(outside));
    if !remainder.0.is_empty() {
        replacements.push(Replacement::Region {
            geometry: remainder,
            inside: true,
        });
    }
    replacements.push(Replacement::Carried(outside_shape.clone()));

    replacements
}
