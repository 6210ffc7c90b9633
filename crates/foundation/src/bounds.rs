/// Latitude limits in degrees (inclusive).
pub const LAT_MIN_DEG: f64 = -90.0;
pub const LAT_MAX_DEG: f64 = 90.0;
/// Longitude limits in degrees (inclusive).
pub const LON_MIN_DEG: f64 = -180.0;
pub const LON_MAX_DEG: f64 = 180.0;

/// Geographic position in degrees, latitude first.
///
/// Construction does not validate; call [`LatLon::validate`] at load boundaries.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLon {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl LatLon {
    pub const fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }

    /// `[lat, lon]` as used by the catalog document and render output.
    pub const fn from_array(a: [f64; 2]) -> Self {
        Self::new(a[0], a[1])
    }

    pub const fn to_array(self) -> [f64; 2] {
        [self.lat_deg, self.lon_deg]
    }

    pub fn validate(self) -> Result<Self, CoordError> {
        if !self.lat_deg.is_finite() || !self.lon_deg.is_finite() {
            return Err(CoordError::NonFinite);
        }
        if !(LAT_MIN_DEG..=LAT_MAX_DEG).contains(&self.lat_deg) {
            return Err(CoordError::LatitudeOutOfRange(self.lat_deg));
        }
        if !(LON_MIN_DEG..=LON_MAX_DEG).contains(&self.lon_deg) {
            return Err(CoordError::LongitudeOutOfRange(self.lon_deg));
        }
        Ok(self)
    }

    pub fn is_valid(self) -> bool {
        self.validate().is_ok()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CoordError {
    NonFinite,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl std::fmt::Display for CoordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordError::NonFinite => write!(f, "coordinate is not a finite number"),
            CoordError::LatitudeOutOfRange(v) => {
                write!(f, "latitude {v} outside [{LAT_MIN_DEG}, {LAT_MAX_DEG}]")
            }
            CoordError::LongitudeOutOfRange(v) => {
                write!(f, "longitude {v} outside [{LON_MIN_DEG}, {LON_MAX_DEG}]")
            }
        }
    }
}

impl std::error::Error for CoordError {}
