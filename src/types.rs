use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{check_day_of_year, check_finite, check_latitude, check_longitude, Result};

/// Aligns day-of-year with the solar year for declination and equation of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStart {
    Spring,
    Autumn,
    #[default]
    Default,
}

impl CycleStart {
    pub fn day_offset(self) -> i32 {
        match self {
            Self::Spring => -81,
            Self::Autumn => 284,
            Self::Default => 10,
        }
    }

    /// Parses a free-form marker; anything other than `"spring"` or `"autumn"`
    /// selects [`CycleStart::Default`].
    pub fn from_marker(marker: Option<&str>) -> Self {
        match marker {
            Some("spring") => Self::Spring,
            Some("autumn") => Self::Autumn,
            _ => Self::Default,
        }
    }
}

/// Observer position. The UTC offset is optional and derived from longitude
/// when absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoLocation {
    latitude: f64,
    longitude: f64,
    utc_offset: Option<f64>,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64, utc_offset: Option<f64>) -> Result<Self> {
        check_latitude(latitude)?;
        check_longitude(longitude)?;
        if let Some(offset) = utc_offset {
            check_finite("utc_offset", offset)?;
        }
        Ok(Self {
            latitude,
            longitude,
            utc_offset,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn supplied_utc_offset(&self) -> Option<f64> {
        self.utc_offset
    }

    /// The supplied offset, or `round(longitude / 15)` when none was given.
    pub fn utc_offset(&self) -> f64 {
        crate::angles::resolve_utc_offset(self.longitude, self.utc_offset)
    }
}

/// Day of year plus local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeContext {
    day_of_year: i32,
    time: NaiveTime,
}

impl TimeContext {
    pub fn new(day_of_year: i32, time: NaiveTime) -> Result<Self> {
        check_day_of_year(day_of_year)?;
        Ok(Self { day_of_year, time })
    }

    pub fn from_hms(day_of_year: i32, hour: u32, minute: u32, second: u32) -> Result<Self> {
        let time = NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or(crate::SolarError::invalid_input("clock time", hour as f64))?;
        Self::new(day_of_year, time)
    }

    /// Uses the wall-clock reading of `dt` in its own zone, not UTC.
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self::from_naive(&dt.naive_local())
    }

    pub fn from_naive(dt: &NaiveDateTime) -> Self {
        Self {
            day_of_year: dt.ordinal() as i32,
            time: dt.time(),
        }
    }

    pub fn day_of_year(&self) -> i32 {
        self.day_of_year
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarAngles {
    pub declination: f64,
    pub equation_of_time: f64,
    pub time_correction: f64,
    pub local_solar_time: NaiveTime,
    pub hour_angle: f64,
    pub elevation: f64,
    pub azimuth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolarRegime {
    /// Sun stays above the horizon all day.
    PolarDay,
    /// Sun stays below the horizon all day.
    PolarNight,
}

impl fmt::Display for PolarRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PolarDay => write!(f, "polar day"),
            Self::PolarNight => write!(f, "polar night"),
        }
    }
}

/// Clock reading on the evaluated day, or on a neighbouring day when
/// `day_offset` is non-zero. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClockTime {
    pub day_offset: i32,
    pub time: NaiveTime,
}

impl ClockTime {
    pub fn on_day(time: NaiveTime) -> Self {
        Self {
            day_offset: 0,
            time,
        }
    }

    /// Signed seconds from the evaluated day's local midnight.
    pub fn seconds_from_midnight(&self) -> i64 {
        self.day_offset as i64 * 86_400 + self.time.num_seconds_from_midnight() as i64
    }

    pub fn minutes_from_midnight(&self) -> i64 {
        self.seconds_from_midnight().div_euclid(60)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.day_offset {
            0 => write!(f, "{}", self.time),
            offset => write!(f, "{} ({offset:+}d)", self.time),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaylightWindow {
    pub sunrise: ClockTime,
    pub solar_noon: ClockTime,
    pub sunset: ClockTime,
}

impl DaylightWindow {
    pub fn day_length(&self) -> Duration {
        Duration::seconds(self.sunset.seconds_from_midnight() - self.sunrise.seconds_from_midnight())
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        let t = ClockTime::on_day(time);
        t >= self.sunrise && t <= self.sunset
    }

    /// Whole minutes, negative before sunrise.
    pub fn minutes_since_sunrise(&self, time: NaiveTime) -> i64 {
        (ClockTime::on_day(time).seconds_from_midnight() - self.sunrise.seconds_from_midnight()) / 60
    }

    pub fn minutes_until_sunset(&self, time: NaiveTime) -> i64 {
        (self.sunset.seconds_from_midnight() - ClockTime::on_day(time).seconds_from_midnight()) / 60
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrradianceInput {
    pub elevation: f64,
    pub tilt: f64,
    pub direct_irradiation: f64,
    #[serde(default)]
    pub albedo: f64,
}

impl IrradianceInput {
    pub fn new(elevation: f64, tilt: f64, direct_irradiation: f64) -> Self {
        Self {
            elevation,
            tilt,
            direct_irradiation,
            albedo: 0.0,
        }
    }

    pub fn with_albedo(mut self, albedo: f64) -> Self {
        self.albedo = albedo;
        self
    }
}

/// Irradiance incident on the tilted surface in W/m².
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IrradianceResult {
    irradiance: f64,
}

impl IrradianceResult {
    pub(crate) fn new(irradiance: f64) -> Self {
        Self { irradiance }
    }

    pub fn irradiance(&self) -> f64 {
        self.irradiance
    }
}

/// All solar features for one (location, timestamp) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRow {
    pub day_of_year: i32,
    pub angles: SolarAngles,
    /// `None` under polar day or polar night.
    pub daylight: Option<DaylightWindow>,
    pub polar_regime: Option<PolarRegime>,
    pub is_daylight: bool,
    pub minutes_since_sunrise: Option<i64>,
    pub minutes_until_sunset: Option<i64>,
    pub irradiance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureEntry {
    pub minutes: i32,
    pub elevation: Option<f64>,
    pub azimuth: Option<f64>,
    pub irradiance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayData {
    pub day_of_year: i32,
    pub sunrise_minutes: i32,
    pub sunset_minutes: i32,
    pub polar_regime: Option<PolarRegime>,
    pub entries: Vec<FeatureEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableMetadata {
    pub generated_at: String,
    pub total_entries: usize,
    pub failed_entries: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureTableConfig {
    pub interval_minutes: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub utc_offset: Option<f64>,
    pub tilt: f64,
    pub direct_irradiation: f64,
    pub albedo: f64,
    pub sunrise_buffer_minutes: i32,
    pub sunset_buffer_minutes: i32,
}

impl Default for FeatureTableConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 5,
            latitude: 39.8,
            longitude: -89.6,
            utc_offset: None,
            tilt: 30.0,
            direct_irradiation: 1000.0,
            albedo: 0.0,
            sunrise_buffer_minutes: 30,
            sunset_buffer_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureTable {
    pub config: FeatureTableConfig,
    pub days: Vec<DayData>,
    pub metadata: TableMetadata,
}
