use geo::MultiPolygon;

use super::{Circle, Marker, Region, Shape};
use crate::error::ShapeError;

/// First id handed out by an empty set
const FIRST_ID: u64 = 1;

/// The full collection of zones and markers, plus the id allocator
///
/// Ids are unique across circles, regions and markers, strictly increasing,
/// and never reused: the allocator keeps a high-water mark that survives
/// deletions and `clear`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSet {
    circles: Vec<Circle>,
    regions: Vec<Region>,
    markers: Vec<Marker>,
    next_id: u64,
}

impl Default for ShapeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeSet {
    pub fn new() -> Self {
        Self {
            circles: Vec::new(),
            regions: Vec::new(),
            markers: Vec::new(),
            next_id: FIRST_ID,
        }
    }

    /// Assemble a set from already-identified parts, resuming ids above the maximum
    pub fn from_parts(circles: Vec<Circle>, regions: Vec<Region>, markers: Vec<Marker>) -> Self {
        let mut set = Self {
            circles,
            regions,
            markers,
            next_id: FIRST_ID,
        };
        set.next_id = set.next_id();
        set
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Every circle then every region, as owned `Shape`s
    pub fn shapes(&self) -> impl Iterator<Item = Shape> + '_ {
        self.circles
            .iter()
            .cloned()
            .map(Shape::Circle)
            .chain(self.regions.iter().cloned().map(Shape::Region))
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty() && self.regions.is_empty() && self.markers.is_empty()
    }

    /// Largest id currently present in any collection
    pub fn max_id(&self) -> Option<u64> {
        let circles = self.circles.iter().map(|c| c.id);
        let regions = self.regions.iter().map(|r| r.id);
        let markers = self.markers.iter().map(|m| m.id);
        circles.chain(regions).chain(markers).max()
    }

    /// The id the next allocation will start at, without reserving it
    pub fn next_id(&self) -> u64 {
        let above_max = self.max_id().map_or(FIRST_ID, |id| id + 1);
        self.next_id.max(above_max)
    }

    /// Reserve `n` consecutive ids above everything present or previously handed out
    pub fn allocate_ids(&mut self, n: usize) -> Vec<u64> {
        let start = self.next_id();
        self.next_id = start + n as u64;
        (start..self.next_id).collect()
    }

    fn allocate_id(&mut self) -> u64 {
        let start = self.next_id();
        self.next_id = start + 1;
        start
    }

    /// Place a new circle; `visible` starts out true
    ///
    /// # Arguments
    /// * `center` - (lat, lng) in degrees
    /// * `radius` - Radius in meters, finite and positive
    pub fn add_circle(
        &mut self,
        center: (f64, f64),
        radius: f64,
        inside: bool,
    ) -> Result<u64, ShapeError> {
        check_coordinate(center.0, center.1)?;
        check_radius(radius)?;

        let id = self.allocate_id();
        self.circles.push(Circle {
            id,
            center,
            radius,
            inside,
            visible: true,
        });
        Ok(id)
    }

    pub fn add_region(&mut self, geometry: MultiPolygon<f64>, inside: bool) -> u64 {
        let id = self.allocate_id();
        self.regions.push(Region {
            id,
            geometry,
            inside,
            visible: true,
        });
        id
    }

    pub fn add_marker(&mut self, lat: f64, lng: f64) -> Result<u64, ShapeError> {
        check_coordinate(lat, lng)?;

        let id = self.allocate_id();
        self.markers.push(Marker { id, lat, lng });
        Ok(id)
    }

    /// Delete a circle, region or marker; returns whether anything was removed
    pub fn remove_by_id(&mut self, id: u64) -> bool {
        let before = self.circles.len() + self.regions.len() + self.markers.len();
        self.circles.retain(|c| c.id != id);
        self.regions.retain(|r| r.id != id);
        self.markers.retain(|m| m.id != id);
        before != self.circles.len() + self.regions.len() + self.markers.len()
    }

    pub fn find_by_id(&self, id: u64) -> Option<Shape> {
        if let Some(circle) = self.circles.iter().find(|c| c.id == id) {
            return Some(Shape::Circle(circle.clone()));
        }
        self.regions
            .iter()
            .find(|r| r.id == id)
            .map(|r| Shape::Region(r.clone()))
    }

    pub fn toggle_visible(&mut self, id: u64) -> Result<Shape, ShapeError> {
        self.update(id, |visible, _| *visible = !*visible)
    }

    pub fn toggle_inside(&mut self, id: u64) -> Result<Shape, ShapeError> {
        self.update(id, |_, inside| *inside = !*inside)
    }

    /// Change a circle's radius in place
    pub fn set_radius(&mut self, id: u64, radius: f64) -> Result<Shape, ShapeError> {
        check_radius(radius)?;

        if let Some(circle) = self.circles.iter_mut().find(|c| c.id == id) {
            circle.radius = radius;
            return Ok(Shape::Circle(circle.clone()));
        }
        if self.regions.iter().any(|r| r.id == id) {
            return Err(ShapeError::NotACircle(id));
        }
        Err(ShapeError::UnknownId(id))
    }

    /// Drop every shape and marker; ids already handed out stay retired
    pub fn clear(&mut self) {
        self.next_id = self.next_id();
        self.circles.clear();
        self.regions.clear();
        self.markers.clear();
    }

    /// Take a circle or region out of the set
    pub(crate) fn take(&mut self, id: u64) -> Option<Shape> {
        if let Some(pos) = self.circles.iter().position(|c| c.id == id) {
            return Some(Shape::Circle(self.circles.remove(pos)));
        }
        let pos = self.regions.iter().position(|r| r.id == id)?;
        Some(Shape::Region(self.regions.remove(pos)))
    }

    /// Append a shape carrying an id obtained from `allocate_ids`
    pub(crate) fn insert(&mut self, shape: Shape) {
        match shape {
            Shape::Circle(c) => self.circles.push(c),
            Shape::Region(r) => self.regions.push(r),
        }
    }

    fn update(
        &mut self,
        id: u64,
        apply: impl FnOnce(&mut bool, &mut bool),
    ) -> Result<Shape, ShapeError> {
        if let Some(c) = self.circles.iter_mut().find(|c| c.id == id) {
            apply(&mut c.visible, &mut c.inside);
            return Ok(Shape::Circle(c.clone()));
        }
        if let Some(r) = self.regions.iter_mut().find(|r| r.id == id) {
            apply(&mut r.visible, &mut r.inside);
            return Ok(Shape::Region(r.clone()));
        }
        Err(ShapeError::UnknownId(id))
    }
}

fn check_radius(radius: f64) -> Result<(), ShapeError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(ShapeError::InvalidRadius(radius))
    }
}

// Poles are excluded: longitude scaling divides by cos(lat)
pub(crate) fn check_coordinate(lat: f64, lng: f64) -> Result<(), ShapeError> {
    if lat.is_finite() && lng.is_finite() && lat.abs() < 90.0 && lng.abs() <= 180.0 {
        Ok(())
    } else {
        Err(ShapeError::InvalidCoordinate { lat, lng })
    }
}
