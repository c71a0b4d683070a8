use chrono::{Duration, NaiveTime, Timelike};
use log::{debug, warn};

use crate::config::{AzimuthRange, ElevationFormula, SolarModelConfig};
use crate::error::{Result, SolarError};
use crate::types::{CycleStart, GeoLocation, SolarAngles, TimeContext};

pub const EARTH_AXIAL_TILT: f64 = 23.45;
pub const DEGREES_PER_HOUR: f64 = 15.0;
pub const MINUTES_PER_DEGREE: f64 = 4.0;
pub const DAYS_PER_SOLAR_YEAR: f64 = 365.25;

/// Slack allowed on an `asin` argument before it counts as a domain failure.
const ASIN_TOLERANCE: f64 = 1e-12;
/// Below this `cos(elevation)` the sun is treated as exactly at the zenith.
const ZENITH_COS_EPSILON: f64 = 1e-12;

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * (180.0 / std::f64::consts::PI)
}

pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

pub fn decimal_hours(time: NaiveTime) -> f64 {
    time.hour() as f64 + time.minute() as f64 / 60.0 + time.second() as f64 / 3600.0
}

fn cycle_fraction(day_of_year: i32, cycle: CycleStart) -> f64 {
    (day_of_year + cycle.day_offset()) as f64 / DAYS_PER_SOLAR_YEAR
}

pub fn solar_declination(day_of_year: i32, cycle: CycleStart) -> f64 {
    -EARTH_AXIAL_TILT * deg_to_rad(360.0 * cycle_fraction(day_of_year, cycle)).cos()
}

pub fn equation_of_time(day_of_year: i32, cycle: CycleStart) -> f64 {
    let b = 2.0 * std::f64::consts::PI * cycle_fraction(day_of_year, cycle);
    9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin()
}

/// Ties round to even.
pub fn resolve_utc_offset(longitude: f64, utc_offset: Option<f64>) -> f64 {
    utc_offset.unwrap_or_else(|| (longitude / DEGREES_PER_HOUR).round_ties_even())
}

pub fn local_standard_time_meridian(utc_offset: f64) -> f64 {
    DEGREES_PER_HOUR * utc_offset
}

/// The equation of time always uses the spring cycle here.
pub fn time_correction_factor(day_of_year: i32, longitude: f64, utc_offset: Option<f64>) -> f64 {
    let meridian = local_standard_time_meridian(resolve_utc_offset(longitude, utc_offset));
    MINUTES_PER_DEGREE * (longitude - meridian) + equation_of_time(day_of_year, CycleStart::Spring)
}

pub fn local_solar_time(local_time: NaiveTime, time_correction: f64) -> NaiveTime {
    let shift = Duration::microseconds((time_correction * 60.0 * 1e6).round() as i64);
    local_time.overflowing_add_signed(shift).0
}

pub fn hour_angle(local_solar_time: NaiveTime) -> f64 {
    DEGREES_PER_HOUR * (decimal_hours(local_solar_time) - 12.0)
}

pub fn solar_elevation(
    latitude: f64,
    declination: f64,
    hour_angle: f64,
    formula: ElevationFormula,
) -> Result<f64> {
    let lat_rad = deg_to_rad(latitude);
    let dec_rad = deg_to_rad(declination);
    let ha_rad = deg_to_rad(hour_angle);
    let second_factor = match formula {
        ElevationFormula::Standard => dec_rad.cos(),
        ElevationFormula::LatitudeSquared => lat_rad.cos(),
    };
    let sin_elevation =
        dec_rad.sin() * lat_rad.sin() + lat_rad.cos() * second_factor * ha_rad.cos();

    if !sin_elevation.is_finite() || sin_elevation.abs() > 1.0 + ASIN_TOLERANCE {
        return Err(SolarError::domain("elevation", sin_elevation));
    }
    Ok(rad_to_deg(sin_elevation.clamp(-1.0, 1.0).asin()))
}

pub fn solar_azimuth(
    latitude: f64,
    declination: f64,
    hour_angle: f64,
    elevation: f64,
    range: AzimuthRange,
) -> Result<f64> {
    let lat_rad = deg_to_rad(latitude);
    let dec_rad = deg_to_rad(declination);
    let ha_rad = deg_to_rad(hour_angle);

    let cos_elevation = deg_to_rad(elevation).cos();
    if !cos_elevation.is_finite() || cos_elevation.abs() < ZENITH_COS_EPSILON {
        return Err(SolarError::domain("azimuth", cos_elevation));
    }

    let numerator = dec_rad.sin() * lat_rad.cos() - dec_rad.cos() * lat_rad.sin() * ha_rad.cos();
    let cos_azimuth = numerator / cos_elevation;
    if !cos_azimuth.is_finite() {
        return Err(SolarError::domain("azimuth", cos_azimuth));
    }
    let principal = rad_to_deg(cos_azimuth.clamp(-1.0, 1.0).acos());

    Ok(match range {
        AzimuthRange::Principal => principal,
        AzimuthRange::FullCircle if hour_angle > 0.0 => normalize_angle(360.0 - principal),
        AzimuthRange::FullCircle => principal,
    })
}

pub fn solar_angles(
    location: &GeoLocation,
    time: &TimeContext,
    config: &SolarModelConfig,
) -> Result<SolarAngles> {
    let day = time.day_of_year();
    let declination = solar_declination(day, CycleStart::Default);
    let eot = equation_of_time(day, CycleStart::Spring);
    let correction =
        time_correction_factor(day, location.longitude(), location.supplied_utc_offset());
    let lst = local_solar_time(time.time(), correction);
    let ha = hour_angle(lst);
    debug!(
        "day {day}: declination={declination:.4} tc={correction:.3}min lst={lst} hra={ha:.4}"
    );

    let composed = solar_elevation(location.latitude(), declination, ha, config.elevation_formula)
        .and_then(|elevation| {
            solar_azimuth(
                location.latitude(),
                declination,
                ha,
                elevation,
                config.azimuth_range,
            )
            .map(|azimuth| (elevation, azimuth))
        });

    match composed {
        Ok((elevation, azimuth)) => Ok(SolarAngles {
            declination,
            equation_of_time: eot,
            time_correction: correction,
            local_solar_time: lst,
            hour_angle: ha,
            elevation,
            azimuth,
        }),
        Err(e) => {
            warn!(
                "solar angles undefined at lat={} lon={} day={} time={}: {e}",
                location.latitude(),
                location.longitude(),
                day,
                time.time()
            );
            Err(e)
        }
    }
}
