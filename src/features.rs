use chrono::{NaiveTime, Utc};
use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::angles;
use crate::config::SolarModelConfig;
use crate::daylight;
use crate::error::{Result, SolarError};
use crate::irradiance::surface_irradiance;
use crate::types::{
    ClockTime, DayData, DaylightWindow, FeatureEntry, FeatureRow, FeatureTable, FeatureTableConfig,
    GeoLocation, PolarRegime, TableMetadata, TimeContext,
};

const LAST_MINUTE_OF_DAY: i32 = 1439;

pub fn minutes_to_time(total_minutes: i32) -> (i32, i32) {
    (total_minutes / 60, total_minutes % 60)
}

pub fn intervals_per_day(interval_minutes: i32) -> i32 {
    1440 / interval_minutes
}

/// The daylight window, or the polar regime that prevents one.
fn window_or_regime(
    location: &GeoLocation,
    day_of_year: i32,
    config: &SolarModelConfig,
) -> Result<std::result::Result<DaylightWindow, PolarRegime>> {
    match daylight::daylight_window(location, day_of_year, config) {
        Ok(window) => Ok(Ok(window)),
        Err(SolarError::PolarDayOrNight { regime, .. }) => Ok(Err(regime)),
        Err(e) => Err(e),
    }
}

/// Every solar feature for one location and local clock reading.
///
/// Polar days and nights are not failures here: the row carries the regime
/// and no daylight window.
pub fn feature_row(
    location: &GeoLocation,
    time: &TimeContext,
    tilt: f64,
    direct_irradiation: f64,
    config: &SolarModelConfig,
) -> Result<FeatureRow> {
    let solar = angles::solar_angles(location, time, config)?;
    let window = window_or_regime(location, time.day_of_year(), config)?;
    let clock = time.time();

    let (daylight, polar_regime) = match window {
        Ok(w) => (Some(w), None),
        Err(regime) => (None, Some(regime)),
    };
    let is_daylight = match (daylight, polar_regime) {
        (Some(w), _) => w.contains(clock),
        (None, Some(PolarRegime::PolarDay)) => true,
        _ => false,
    };

    Ok(FeatureRow {
        day_of_year: time.day_of_year(),
        angles: solar,
        daylight,
        polar_regime,
        is_daylight,
        minutes_since_sunrise: daylight.map(|w| w.minutes_since_sunrise(clock)),
        minutes_until_sunset: daylight.map(|w| w.minutes_until_sunset(clock)),
        irradiance: surface_irradiance(solar.elevation, tilt, direct_irradiation, 0.0),
    })
}

/// Evaluates each timestamp independently; one failing row does not affect
/// the others. Runs on the rayon pool with the `parallel` feature.
pub fn feature_rows(
    location: &GeoLocation,
    times: &[TimeContext],
    tilt: f64,
    direct_irradiation: f64,
    config: &SolarModelConfig,
) -> Vec<Result<FeatureRow>> {
    #[cfg(not(feature = "parallel"))]
    let aux_iter = times.iter();
    #[cfg(feature = "parallel")]
    let aux_iter = times.par_iter();

    aux_iter
        .map(|time| feature_row(location, time, tilt, direct_irradiation, config))
        .collect()
}

pub fn interpolate_angle(a1: Option<f64>, a2: Option<f64>, fraction: f64) -> Option<f64> {
    let (v1, v2) = (a1?, a2?);
    let diff = v2 - v1;
    let adjusted_diff = if diff > 180.0 {
        diff - 360.0
    } else if diff < -180.0 {
        diff + 360.0
    } else {
        diff
    };
    Some(angles::normalize_angle(v1 + adjusted_diff * fraction))
}

fn interpolate_linear(v1: Option<f64>, v2: Option<f64>, fraction: f64) -> Option<f64> {
    let a = v1?;
    let b = v2?;
    Some(a + fraction * (b - a))
}

fn find_bracketing_entries(
    entries: &[FeatureEntry],
    interval_minutes: i32,
    minutes: i32,
) -> Option<(&FeatureEntry, Option<&FeatureEntry>, f64)> {
    let first_minutes = entries.first()?.minutes;
    let last_minutes = entries.last()?.minutes;
    if minutes < first_minutes || minutes > last_minutes {
        return None;
    }

    let idx_before =
        ((minutes - first_minutes) / interval_minutes).min(entries.len() as i32 - 1) as usize;
    let entry_before = &entries[idx_before];
    let t0 = entry_before.minutes;

    match entries.get(idx_before + 1) {
        Some(after) if minutes != t0 => {
            let fraction = (minutes - t0) as f64 / (after.minutes - t0) as f64;
            Some((entry_before, Some(after), fraction))
        }
        _ => Some((entry_before, None, 0.0)),
    }
}

/// Sunrise or sunset on a neighbouring day pins to that edge of the table.
fn table_minute(clock: ClockTime) -> i32 {
    clock
        .minutes_from_midnight()
        .clamp(0, LAST_MINUTE_OF_DAY as i64) as i32
}

fn day_bounds(window: &std::result::Result<DaylightWindow, PolarRegime>) -> (i32, i32) {
    match window {
        Ok(w) => (table_minute(w.sunrise), table_minute(w.sunset)),
        Err(PolarRegime::PolarDay) => (0, LAST_MINUTE_OF_DAY),
        Err(PolarRegime::PolarNight) => (720, 720),
    }
}

fn day_entries(
    config: &FeatureTableConfig,
    model: &SolarModelConfig,
    location: &GeoLocation,
    doy: i32,
) -> Result<(DayData, usize)> {
    let window = window_or_regime(location, doy, model)?;
    let (sunrise, sunset) = day_bounds(&window);
    let start_minute = (sunrise - config.sunrise_buffer_minutes).max(0);
    let end_minute = (sunset + config.sunset_buffer_minutes).min(LAST_MINUTE_OF_DAY);

    let n_intervals = intervals_per_day(config.interval_minutes);
    let first_interval = start_minute / config.interval_minutes;
    let last_interval = (end_minute / config.interval_minutes).min(n_intervals - 1);

    let mut failed = 0;
    let mut entries = Vec::new();
    for interval in first_interval..=last_interval {
        let mins = interval * config.interval_minutes;
        let (hour, minute) = minutes_to_time(mins);
        let clock = NaiveTime::from_hms_opt(hour as u32, minute as u32, 0)
            .ok_or(SolarError::invalid_input("table minute", mins as f64))?;
        let is_daylight = match window {
            Ok(_) => mins >= sunrise && mins <= sunset,
            Err(regime) => regime == PolarRegime::PolarDay,
        };

        let time = TimeContext::new(doy, clock)?;
        let solar = if is_daylight {
            match angles::solar_angles(location, &time, model) {
                Ok(solar) => Some(solar),
                Err(_) => {
                    failed += 1;
                    None
                }
            }
        } else {
            None
        };

        entries.push(FeatureEntry {
            minutes: mins,
            elevation: solar.map(|s| s.elevation),
            azimuth: solar.map(|s| s.azimuth),
            irradiance: solar.map(|s| {
                surface_irradiance(s.elevation, config.tilt, config.direct_irradiation, config.albedo)
            }),
        });
    }

    let day = DayData {
        day_of_year: doy,
        sunrise_minutes: sunrise,
        sunset_minutes: sunset,
        polar_regime: window.err(),
        entries,
    };
    Ok((day, failed))
}

/// Per-day feature entries at a fixed interval between buffered sunrise and
/// sunset, for days 1 through 365.
pub fn generate_feature_table(
    config: &FeatureTableConfig,
    model: &SolarModelConfig,
) -> Result<FeatureTable> {
    if config.interval_minutes <= 0 {
        return Err(SolarError::invalid_input(
            "interval_minutes",
            config.interval_minutes as f64,
        ));
    }
    let location = GeoLocation::new(config.latitude, config.longitude, config.utc_offset)?;

    let mut days = Vec::with_capacity(365);
    let mut failed_entries = 0;
    for doy in 1..=365 {
        let (day, failed) = day_entries(config, model, &location, doy)?;
        failed_entries += failed;
        days.push(day);
    }

    let total_entries: usize = days.iter().map(|d| d.entries.len()).sum();
    debug!(
        "feature table for ({}, {}): {total_entries} entries, {failed_entries} undefined",
        config.latitude, config.longitude
    );

    Ok(FeatureTable {
        config: *config,
        days,
        metadata: TableMetadata {
            generated_at: Utc::now().to_rfc3339(),
            total_entries,
            failed_entries,
        },
    })
}

/// Interpolated features at `minutes` past midnight, or `None` outside the
/// tabulated range of that day.
pub fn lookup_features(table: &FeatureTable, day_of_year: i32, minutes: i32) -> Option<FeatureEntry> {
    let index = usize::try_from(day_of_year - 1).ok()?;
    let entries = &table.days.get(index)?.entries;
    let interval_minutes = table.config.interval_minutes;
    let (before, after, fraction) = find_bracketing_entries(entries, interval_minutes, minutes)?;
    match after {
        None => Some(FeatureEntry { minutes, ..*before }),
        Some(after) => Some(FeatureEntry {
            minutes,
            elevation: interpolate_linear(before.elevation, after.elevation, fraction),
            azimuth: interpolate_angle(before.azimuth, after.azimuth, fraction),
            irradiance: interpolate_linear(before.irradiance, after.irradiance, fraction),
        }),
    }
}

pub fn feature_table_to_compact(
    table: &FeatureTable,
) -> Vec<Vec<(Option<f64>, Option<f64>, Option<f64>)>> {
    table
        .days
        .iter()
        .map(|day| {
            day.entries
                .iter()
                .map(|e| (e.elevation, e.azimuth, e.irradiance))
                .collect()
        })
        .collect()
}
