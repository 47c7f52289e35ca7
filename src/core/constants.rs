//! Coordinate bounds and precision parameters

/// Scale factor for fixed 7-decimal coordinate precision
pub const COORDINATE_PRECISION_SCALE: f64 = 1e7;

/// Valid latitude range in decimal degrees
pub const LATITUDE_MIN: f64 = -90.0;
pub const LATITUDE_MAX: f64 = 90.0;

/// Valid longitude range in decimal degrees
pub const LONGITUDE_MIN: f64 = -180.0;
pub const LONGITUDE_MAX: f64 = 180.0;
