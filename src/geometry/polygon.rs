//! Ring-level helpers around `geo::MultiPolygon`
//!
//! Regions are stored as `MultiPolygon<f64>` with x = longitude and
//! y = latitude. These helpers convert to and from the nested
//! polygon → ring → (lng, lat) form used by the persisted document,
//! validate input to boolean operations, and drop slivers left behind by
//! floating-point noise along shared boundaries.

use geo::{Area, LineString, MultiPolygon, Polygon};

use crate::error::GeometryError;

/// Polygons at or below this area (square degrees, ~0.01 m²) count as empty
pub const MIN_OVERLAP_AREA: f64 = 1e-12;

/// Nested ring form: polygons → rings (exterior first) → (lng, lat) points
pub type Rings = Vec<Vec<Vec<(f64, f64)>>>;

/// Convert a `MultiPolygon` to nested rings, exterior ring first
pub fn to_rings(geometry: &MultiPolygon<f64>) -> Rings {
    geometry
        .0
        .iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(|ring| ring.coords().map(|c| (c.x, c.y)).collect())
                .collect()
        })
        .collect()
}

/// Build a `MultiPolygon` from nested rings
///
/// The first ring of each polygon is its exterior, the rest are holes.
/// Polygons with no rings are skipped.
pub fn from_rings(rings: &Rings) -> MultiPolygon<f64> {
    let polygons = rings
        .iter()
        .filter_map(|polygon| {
            let (exterior, holes) = polygon.split_first()?;
            Some(Polygon::new(
                LineString::from(exterior.clone()),
                holes.iter().map(|h| LineString::from(h.clone())).collect(),
            ))
        })
        .collect();

    MultiPolygon(polygons)
}

/// Check that a geometry is usable as a boolean operand
pub fn validate(geometry: &MultiPolygon<f64>) -> Result<(), GeometryError> {
    if geometry.0.is_empty() {
        return Err(GeometryError::Empty);
    }

    for polygon in &geometry.0 {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            if ring.0.len() < 4 {
                return Err(GeometryError::DegenerateRing {
                    points: ring.0.len(),
                });
            }
            if ring.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
                return Err(GeometryError::NonFinite);
            }
        }
    }

    Ok(())
}

/// Check nested rings before conversion, so `from_rings` loses nothing
///
/// Every polygon needs at least one ring, and every ring must be closed,
/// finite, and at least 4 points long.
pub fn validate_rings(rings: &Rings) -> Result<(), GeometryError> {
    if rings.is_empty() {
        return Err(GeometryError::Empty);
    }

    for polygon in rings {
        if polygon.is_empty() {
            return Err(GeometryError::NoRings);
        }
        for ring in polygon {
            if ring.len() < 4 {
                return Err(GeometryError::DegenerateRing { points: ring.len() });
            }
            if ring.iter().any(|&(x, y)| !x.is_finite() || !y.is_finite()) {
                return Err(GeometryError::NonFinite);
            }
            if ring.first() != ring.last() {
                return Err(GeometryError::UnclosedRing);
            }
        }
    }

    Ok(())
}

/// Drop polygons too small to be anything but numerical residue
pub fn without_slivers(geometry: MultiPolygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon(
        geometry
            .0
            .into_iter()
            .filter(|p| p.unsigned_area() > MIN_OVERLAP_AREA)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, size: f64) -> Vec<(f64, f64)> {
        vec![
            (min, min),
            (min + size, min),
            (min + size, min + size),
            (min, min + size),
            (min, min),
        ]
    }

    #[test]
    fn test_rings_round_trip_with_hole() {
        let rings: Rings = vec![vec![square(0.0, 1.0), square(0.25, 0.5)], vec![square(2.0, 1.0)]];
        let geometry = from_rings(&rings);

        assert_eq!(geometry.0.len(), 2);
        assert_eq!(geometry.0[0].interiors().len(), 1);
        assert_eq!(to_rings(&geometry), rings);
    }

    #[test]
    fn test_from_rings_skips_empty_polygon() {
        let rings: Rings = vec![vec![], vec![square(0.0, 1.0)]];
        assert_eq!(from_rings(&rings).0.len(), 1);
    }

    #[test]
    fn test_validate_rejects_degenerate() {
        assert_eq!(validate(&MultiPolygon(vec![])), Err(GeometryError::Empty));

        let short = from_rings(&vec![vec![vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]]]);
        assert_eq!(
            validate(&short),
            Err(GeometryError::DegenerateRing { points: 3 })
        );

        let mut ring = square(0.0, 1.0);
        ring[2] = (f64::NAN, 1.0);
        let nan = from_rings(&vec![vec![ring]]);
        assert_eq!(validate(&nan), Err(GeometryError::NonFinite));

        assert_eq!(validate(&from_rings(&vec![vec![square(0.0, 1.0)]])), Ok(()));
    }

    #[test]
    fn test_validate_rings() {
        assert_eq!(validate_rings(&vec![]), Err(GeometryError::Empty));
        assert_eq!(validate_rings(&vec![vec![]]), Err(GeometryError::NoRings));
        assert_eq!(
            validate_rings(&vec![vec![square(0.0, 1.0)], vec![]]),
            Err(GeometryError::NoRings)
        );
        assert_eq!(
            validate_rings(&vec![vec![vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]]]),
            Err(GeometryError::DegenerateRing { points: 3 })
        );

        let mut open = square(0.0, 1.0);
        open.pop();
        open.push((0.5, 0.0));
        assert_eq!(
            validate_rings(&vec![vec![open]]),
            Err(GeometryError::UnclosedRing)
        );

        let mut nan = square(0.0, 1.0);
        nan[1] = (f64::INFINITY, 0.0);
        assert_eq!(validate_rings(&vec![vec![nan]]), Err(GeometryError::NonFinite));

        let valid = vec![vec![square(0.0, 1.0), square(0.25, 0.5)]];
        assert_eq!(validate_rings(&valid), Ok(()));
        assert_eq!(to_rings(&from_rings(&valid)), valid);
    }

    #[test]
    fn test_without_slivers() {
        let geometry = from_rings(&vec![vec![square(0.0, 1.0)], vec![square(5.0, 1e-7)]]);
        let cleaned = without_slivers(geometry);
        assert_eq!(cleaned.0.len(), 1);
        assert!(without_slivers(from_rings(&vec![vec![square(5.0, 1e-7)]])).0.is_empty());
    }
}
