use geo::MultiPolygon;
use log::debug;

use super::resolver::{Replacement, Resolution, Resolver};
use crate::domain::{Shape, ShapeSet};

/// What a single merge did to the set
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    /// The two operands, in scan order
    pub removed: [u64; 2],
    /// New shapes in allocation order: inside remainder first, carried shape last
    pub created: Vec<u64>,
}

/// Result of one `converge_one_step` call
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Merged(Merge),
    Unchanged,
}

impl Step {
    pub fn changed(&self) -> bool {
        matches!(self, Step::Merged(_))
    }
}

/// Result of looping `converge_one_step` to a fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convergence {
    /// Merges performed
    pub steps: usize,
    /// False when the step cap was reached first
    pub converged: bool,
}

/// Finds the first overlapping pair and merges it
///
/// Stateless between calls: everything lives in the `ShapeSet`. Pairs are
/// scanned circle×circle, then region×region, then circle×region, each in
/// index order, and at most one merge happens per call.
#[derive(Debug, Clone, Default)]
pub struct Driver {
    resolver: Resolver,
}

type Prepared = (Shape, MultiPolygon<f64>);

impl Driver {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn converge_one_step(&self, set: &mut ShapeSet) -> Step {
        match self.find_overlap(set) {
            Some((a, b, replacements)) => Step::Merged(apply(set, a, b, replacements)),
            None => Step::Unchanged,
        }
    }

    /// Repeat single steps until nothing changes or `max_steps` merges are done
    pub fn converge(&self, set: &mut ShapeSet, max_steps: usize) -> Convergence {
        let mut steps = 0;
        while steps < max_steps {
            if !self.converge_one_step(set).changed() {
                return Convergence {
                    steps,
                    converged: true,
                };
            }
            steps += 1;
        }

        // The cap may coincide exactly with the fixed point
        let converged = self.find_overlap(set).is_none();
        Convergence { steps, converged }
    }

    fn find_overlap(&self, set: &ShapeSet) -> Option<(u64, u64, Vec<Replacement>)> {
        let circles = self.prepare(set.circles().iter().cloned().map(Shape::Circle));
        let regions = self.prepare(set.regions().iter().cloned().map(Shape::Region));

        self.scan_within(&circles)
            .or_else(|| self.scan_within(&regions))
            .or_else(|| self.scan_between(&circles, &regions))
    }

    fn prepare(&self, shapes: impl Iterator<Item = Shape>) -> Vec<Prepared> {
        shapes
            .map(|shape| {
                let geometry = self.resolver.geometry(&shape);
                (shape, geometry)
            })
            .collect()
    }

    fn scan_within(&self, shapes: &[Prepared]) -> Option<(u64, u64, Vec<Replacement>)> {
        for (i, a) in shapes.iter().enumerate() {
            for b in &shapes[i + 1..] {
                if let Some(found) = self.try_pair(a, b) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn scan_between(
        &self,
        circles: &[Prepared],
        regions: &[Prepared],
    ) -> Option<(u64, u64, Vec<Replacement>)> {
        circles
            .iter()
            .flat_map(|c| regions.iter().map(move |r| (c, r)))
            .find_map(|(c, r)| self.try_pair(c, r))
    }

    fn try_pair(&self, a: &Prepared, b: &Prepared) -> Option<(u64, u64, Vec<Replacement>)> {
        match self.resolver.resolve_prepared(&a.0, &a.1, &b.0, &b.1) {
            Resolution::Replace(replacements) => Some((a.0.id(), b.0.id(), replacements)),
            Resolution::NoOverlap => None,
        }
    }
}

fn apply(set: &mut ShapeSet, a: u64, b: u64, replacements: Vec<Replacement>) -> Merge {
    // Allocate before removing so new ids sit above both operands
    let ids = set.allocate_ids(replacements.len());
    set.take(a);
    set.take(b);

    for (&id, replacement) in ids.iter().zip(replacements) {
        set.insert(replacement.into_shape(id));
    }

    debug!("Merged {} and {} into {:?}", a, b, ids);

    Merge {
        removed: [a, b],
        created: ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::METERS_PER_DEGREE;

    /// Offset in meters east of (0, 0), as (lat, lng)
    fn east(meters: f64) -> (f64, f64) {
        (0.0, meters / METERS_PER_DEGREE)
    }

    fn overlapping_pairs(driver: &Driver, set: &ShapeSet) -> usize {
        let shapes: Vec<Shape> = set.shapes().collect();
        let mut count = 0;
        for (i, a) in shapes.iter().enumerate() {
            for b in &shapes[i + 1..] {
                if driver.resolver().resolve(a, b) != Resolution::NoOverlap {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_two_inside_circles_merge_once() {
        let driver = Driver::default();
        let mut set = ShapeSet::new();
        set.add_circle(east(0.0), 50.0, true).unwrap();
        set.add_circle(east(10.0), 50.0, true).unwrap();

        let step = driver.converge_one_step(&mut set);
        assert_eq!(
            step,
            Step::Merged(Merge {
                removed: [1, 2],
                created: vec![3],
            })
        );
        assert!(set.circles().is_empty());
        assert_eq!(set.regions().len(), 1);
        assert!(set.regions()[0].inside);

        assert!(!driver.converge_one_step(&mut set).changed());
    }

    #[test]
    fn test_contained_inside_circle_leaves_only_outside() {
        let driver = Driver::default();
        let mut set = ShapeSet::new();
        let a = set.add_circle(east(0.0), 100.0, true).unwrap();
        let b = set.add_circle(east(0.0), 500.0, false).unwrap();
        let original = set.find_by_id(b).unwrap();

        let Step::Merged(merge) = driver.converge_one_step(&mut set) else {
            panic!("expected a merge");
        };
        assert_eq!(merge.removed, [a, b]);
        assert_eq!(merge.created.len(), 1);

        assert!(set.regions().is_empty());
        assert_eq!(set.circles().len(), 1);
        let survivor = Shape::Circle(set.circles()[0].clone());
        assert!(!survivor.inside());
        assert_eq!(survivor, original.with_id(merge.created[0]));
        assert!(set.shapes().all(|s| !s.inside()));
    }

    #[test]
    fn test_mixed_overlap_allocates_remainder_first() {
        let driver = Driver::default();
        let mut set = ShapeSet::new();
        let outside = set.add_circle(east(0.0), 50.0, false).unwrap();
        set.add_circle(east(60.0), 50.0, true).unwrap();

        let Step::Merged(merge) = driver.converge_one_step(&mut set) else {
            panic!("expected a merge");
        };
        assert_eq!(merge.created, vec![3, 4]);

        let remainder = set.find_by_id(3).unwrap();
        assert!(remainder.inside());
        assert_eq!(remainder.kind(), "region");

        let carried = set.find_by_id(4).unwrap();
        assert!(!carried.inside());
        assert_eq!(carried.kind(), "circle");
        assert!(set.find_by_id(outside).is_none());

        assert!(!driver.converge_one_step(&mut set).changed());
    }

    #[test]
    fn test_circle_pairs_scanned_before_regions() {
        let driver = Driver::default();
        let mut set = ShapeSet::new();
        let geometry = driver.resolver().geometry(&Shape::Circle(crate::domain::Circle {
            id: 0,
            center: east(0.0),
            radius: 50.0,
            inside: false,
            visible: true,
        }));
        let r1 = set.add_region(geometry.clone(), false);
        let r2 = set.add_region(geometry, false);
        let c1 = set.add_circle(east(5_000.0), 50.0, false).unwrap();
        let c2 = set.add_circle(east(5_010.0), 50.0, false).unwrap();

        let Step::Merged(first) = driver.converge_one_step(&mut set) else {
            panic!("expected a merge");
        };
        assert_eq!(first.removed, [c1, c2]);

        let Step::Merged(second) = driver.converge_one_step(&mut set) else {
            panic!("expected a merge");
        };
        assert_eq!(second.removed, [r1, r2]);
    }

    #[test]
    fn test_circle_region_pairs_scanned_last() {
        let driver = Driver::default();
        let mut set = ShapeSet::new();
        let c = set.add_circle(east(0.0), 50.0, true).unwrap();
        let r = set.add_region(
            crate::geometry::circle_geometry(east(20.0), 50.0, 64),
            true,
        );

        let Step::Merged(merge) = driver.converge_one_step(&mut set) else {
            panic!("expected a merge");
        };
        assert_eq!(merge.removed, [c, r]);
        assert_eq!(set.regions().len(), 1);
    }

    #[test]
    fn test_new_ids_exceed_previous_max() {
        let driver = Driver::default();
        let mut set = ShapeSet::new();
        set.add_marker(1.0, 1.0).unwrap();
        set.add_circle(east(0.0), 40.0, false).unwrap();
        set.add_circle(east(30.0), 40.0, true).unwrap();
        set.add_circle(east(60.0), 40.0, false).unwrap();

        loop {
            let before = set.max_id().unwrap();
            match driver.converge_one_step(&mut set) {
                Step::Merged(merge) => assert!(merge.created.iter().all(|&id| id > before)),
                Step::Unchanged => break,
            }
        }
    }

    #[test]
    fn test_converge_terminates_without_overlaps() {
        let driver = Driver::default();
        let mut set = ShapeSet::new();
        let layout = [
            (0.0, 80.0, true),
            (50.0, 60.0, false),
            (90.0, 70.0, true),
            (140.0, 40.0, false),
            (400.0, 30.0, true),
            (420.0, 30.0, true),
            (1_000.0, 20.0, false),
        ];
        for (offset, radius, inside) in layout {
            set.add_circle(east(offset), radius, inside).unwrap();
        }

        let initial = overlapping_pairs(&driver, &set);
        let result = driver.converge(&mut set, 100);

        assert!(result.converged);
        assert!(result.steps <= initial);
        assert_eq!(overlapping_pairs(&driver, &set), 0);
        assert!(!driver.converge_one_step(&mut set).changed());
    }

    #[test]
    fn test_converge_respects_cap() {
        let driver = Driver::default();
        let mut set = ShapeSet::new();
        for i in 0..4 {
            set.add_circle(east(i as f64 * 20.0), 50.0, false).unwrap();
        }

        let capped = driver.converge(&mut set, 1);
        assert_eq!(capped.steps, 1);
        assert!(!capped.converged);

        let rest = driver.converge(&mut set, 100);
        assert!(rest.converged);
        assert_eq!(set.regions().len() + set.circles().len(), 1);
    }

    #[test]
    fn test_empty_set_is_unchanged() {
        let mut set = ShapeSet::new();
        assert_eq!(Driver::default().converge_one_step(&mut set), Step::Unchanged);
        assert_eq!(
            Driver::default().converge(&mut set, 10),
            Convergence {
                steps: 0,
                converged: true,
            }
        );
    }
}
