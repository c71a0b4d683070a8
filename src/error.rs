//! Error types for solar geometry and irradiance calculations.

use thiserror::Error;

use crate::types::PolarRegime;

/// Result type alias for operations in this crate.
pub type Result<T> = std::result::Result<T, SolarError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolarError {
    /// An inverse trigonometric function received an argument outside [-1, 1],
    /// or the azimuth division hit a zero `cos(elevation)`.
    #[error("domain error computing {quantity}: argument {value} is undefined")]
    Domain { quantity: &'static str, value: f64 },

    /// No sunrise or sunset exists for this latitude and day.
    #[error("no sunrise/sunset at latitude {latitude}° on day {day_of_year}: {regime}")]
    PolarDayOrNight {
        latitude: f64,
        day_of_year: i32,
        regime: PolarRegime,
    },

    #[error("invalid {field}: {value}")]
    InvalidInput { field: &'static str, value: f64 },

    #[error("configuration error: {0}")]
    Config(String),
}

impl SolarError {
    pub const fn domain(quantity: &'static str, value: f64) -> Self {
        Self::Domain { quantity, value }
    }

    pub const fn invalid_input(field: &'static str, value: f64) -> Self {
        Self::InvalidInput { field, value }
    }
}

impl From<std::io::Error> for SolarError {
    fn from(e: std::io::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<serde_json::Error> for SolarError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Validates latitude is within -90 to +90 degrees.
pub fn check_latitude(latitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(SolarError::invalid_input("latitude", latitude));
    }
    Ok(())
}

/// Validates longitude is within -180 to +180 degrees.
pub fn check_longitude(longitude: f64) -> Result<()> {
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(SolarError::invalid_input("longitude", longitude));
    }
    Ok(())
}

/// Validates day of year is within 1..=366.
pub fn check_day_of_year(day_of_year: i32) -> Result<()> {
    if !(1..=366).contains(&day_of_year) {
        return Err(SolarError::invalid_input("day_of_year", day_of_year as f64));
    }
    Ok(())
}

pub fn check_finite(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SolarError::invalid_input(field, value));
    }
    Ok(())
}
