/// Meters per degree of latitude (and of longitude at the equator)
pub const METERS_PER_DEGREE: f64 = 111320.0;

/// Equirectangular projection between WGS84 degrees and local meters
///
/// - x = (lng - center_lng) * cos(center_lat) * 111320
/// - y = (lat - center_lat) * 111320
///
/// Good enough for zone-sized areas; error grows with radius and latitude.
#[derive(Debug, Clone)]
pub struct Projector {
    center_lat: f64,
    center_lng: f64,
    cos_lat: f64,
}

impl Projector {
    /// Create a new projector centered at the given coordinates
    ///
    /// # Arguments
    /// * `center` - (lat, lng) center point in degrees
    pub fn new(center: (f64, f64)) -> Self {
        let (lat, lng) = center;
        Self {
            center_lat: lat,
            center_lng: lng,
            cos_lat: lat.to_radians().cos(),
        }
    }

    /// Project a lat/lng point to local meters
    ///
    /// # Returns
    /// * (x, y) in meters, relative to the projection center
    pub fn project(&self, lat: f64, lng: f64) -> (f64, f64) {
        let x = (lng - self.center_lng) * self.cos_lat * METERS_PER_DEGREE;
        let y = (lat - self.center_lat) * METERS_PER_DEGREE;

        (x, y)
    }

    /// Map a metric offset from the center back to degrees
    ///
    /// # Returns
    /// * (lat, lng) in degrees
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let lat = self.center_lat + y / METERS_PER_DEGREE;
        let lng = self.center_lng + x / (METERS_PER_DEGREE * self.cos_lat);

        (lat, lng)
    }
}
