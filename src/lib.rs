//! Solar geometry features for energy-yield prediction.
//!
//! A chain of closed-form stages turns a location and a local clock reading
//! into declination, equation of time, hour angle, elevation, azimuth, the
//! sunrise/sunset window and direct-beam irradiance on a tilted panel. Every
//! function is pure; batch helpers in [`features`] evaluate many timestamps.

pub mod angles;
pub mod config;
pub mod daylight;
pub mod error;
pub mod features;
pub mod irradiance;
pub mod types;

pub use angles::{
    deg_to_rad, decimal_hours, equation_of_time, hour_angle, local_solar_time,
    local_standard_time_meridian, normalize_angle, rad_to_deg, resolve_utc_offset, solar_angles,
    solar_azimuth, solar_declination, solar_elevation, time_correction_factor, DEGREES_PER_HOUR,
    EARTH_AXIAL_TILT,
};

pub use config::{AzimuthRange, ElevationFormula, SecondsRounding, SolarModelConfig};

pub use daylight::{daylight_window, decimal_hours_to_clock, sunset_hour_angle};

pub use error::{Result, SolarError};

pub use features::{
    feature_row, feature_rows, feature_table_to_compact, generate_feature_table,
    interpolate_angle, lookup_features,
};

pub use irradiance::{irradiance_on_surface, surface_irradiance};

pub use types::{
    ClockTime, CycleStart, DayData, DaylightWindow, FeatureEntry, FeatureRow, FeatureTable,
    FeatureTableConfig, GeoLocation, IrradianceInput, IrradianceResult, PolarRegime, SolarAngles,
    TableMetadata, TimeContext,
};
