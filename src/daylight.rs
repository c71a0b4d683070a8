use chrono::NaiveTime;
use log::debug;

use crate::angles::{self, DEGREES_PER_HOUR};
use crate::config::{SecondsRounding, SolarModelConfig};
use crate::error::{check_day_of_year, Result, SolarError};
use crate::types::{ClockTime, CycleStart, DaylightWindow, GeoLocation, PolarRegime};

/// Hour angle of sunset, or the regime when the sun never crosses the horizon.
pub fn sunset_hour_angle(
    latitude: f64,
    declination: f64,
) -> std::result::Result<f64, PolarRegime> {
    let lat_rad = angles::deg_to_rad(latitude);
    let dec_rad = angles::deg_to_rad(declination);
    let cos_h = -lat_rad.sin() * dec_rad.sin() / (lat_rad.cos() * dec_rad.cos());

    if cos_h < -1.0 {
        Err(PolarRegime::PolarDay)
    } else if cos_h > 1.0 {
        Err(PolarRegime::PolarNight)
    } else {
        Ok(angles::rad_to_deg(cos_h.acos()))
    }
}

/// Hours outside [0, 24) land on the previous or next day.
pub fn decimal_hours_to_clock(hours: f64, rounding: SecondsRounding) -> Result<ClockTime> {
    if !hours.is_finite() {
        return Err(SolarError::domain("clock time", hours));
    }
    let mut day_offset = (hours / 24.0).floor();
    let mut within_day = hours - day_offset * 24.0;
    if within_day >= 24.0 {
        day_offset += 1.0;
        within_day -= 24.0;
    }
    let within_day = within_day.max(0.0);

    let hour = within_day.floor();
    let minute_value = (within_day - hour) * 60.0;
    let minute = minute_value.floor();
    let second_value = (minute_value - minute) * 60.0;
    let second = match rounding {
        SecondsRounding::Floor => (second_value.floor() as u32).min(59),
        SecondsRounding::ForceFiftyNine => 59,
    };

    let time = NaiveTime::from_hms_opt((hour as u32).min(23), (minute as u32).min(59), second)
        .ok_or(SolarError::domain("clock time", hours))?;
    Ok(ClockTime {
        day_offset: day_offset as i32,
        time,
    })
}

pub fn daylight_window(
    location: &GeoLocation,
    day_of_year: i32,
    config: &SolarModelConfig,
) -> Result<DaylightWindow> {
    check_day_of_year(day_of_year)?;
    let declination = angles::solar_declination(day_of_year, CycleStart::Default);
    let half_day = sunset_hour_angle(location.latitude(), declination).map_err(|regime| {
        debug!(
            "no daylight window at lat={} on day {day_of_year}: {regime}",
            location.latitude()
        );
        SolarError::PolarDayOrNight {
            latitude: location.latitude(),
            day_of_year,
            regime,
        }
    })?;

    let correction = angles::time_correction_factor(
        day_of_year,
        location.longitude(),
        location.supplied_utc_offset(),
    );
    let noon = 12.0 - correction / 60.0;
    let half_day_hours = half_day / DEGREES_PER_HOUR;
    debug!("day {day_of_year}: half-day arc={half_day:.4}° solar noon={noon:.4}h");

    let rounding = config.seconds_rounding;
    Ok(DaylightWindow {
        sunrise: decimal_hours_to_clock(noon - half_day_hours, rounding)?,
        solar_noon: decimal_hours_to_clock(noon, rounding)?,
        sunset: decimal_hours_to_clock(noon + half_day_hours, rounding)?,
    })
}
