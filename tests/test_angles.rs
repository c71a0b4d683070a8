use chrono::{NaiveTime, TimeZone, Timelike};

use solar_features::angles::*;
use solar_features::config::{AzimuthRange, ElevationFormula, SolarModelConfig};
use solar_features::daylight::daylight_window;
use solar_features::types::{CycleStart, GeoLocation, SolarAngles, TimeContext};
use solar_features::SolarError;

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

// ── CycleStart ──

#[test]
fn test_cycle_start_offsets() {
    assert_eq!(CycleStart::Spring.day_offset(), -81);
    assert_eq!(CycleStart::Autumn.day_offset(), 284);
    assert_eq!(CycleStart::Default.day_offset(), 10);
}

#[test]
fn test_cycle_start_from_marker() {
    assert_eq!(CycleStart::from_marker(Some("spring")), CycleStart::Spring);
    assert_eq!(CycleStart::from_marker(Some("autumn")), CycleStart::Autumn);
    assert_eq!(CycleStart::from_marker(Some("winter")), CycleStart::Default);
    assert_eq!(CycleStart::from_marker(None), CycleStart::Default);
}

// ── SolarDeclination ──

#[test]
fn test_solar_declination_bounded_all_days() {
    for cycle in [CycleStart::Spring, CycleStart::Autumn, CycleStart::Default] {
        for n in 1..=366 {
            let decl = solar_declination(n, cycle);
            assert!(decl.abs() <= EARTH_AXIAL_TILT, "Day {} ({:?}): {}", n, cycle, decl);
        }
    }
}

#[test]
fn test_solar_declination_solstices() {
    assert_approx!(solar_declination(172, CycleStart::Default), 23.45, 0.01);
    assert_approx!(solar_declination(355, CycleStart::Default), -23.45, 0.01);
    assert_approx!(solar_declination(81, CycleStart::Spring), -23.45, 1e-12);
}

#[test]
fn test_solar_declination_near_equinox() {
    assert_approx!(solar_declination(80, CycleStart::Default), 0.0, 1.0);
    assert_approx!(solar_declination(264, CycleStart::Default), 0.0, 1.0);
}

#[test]
fn test_solar_declination_yearly_period() {
    for n in 1..=365 {
        assert_approx!(
            solar_declination(n, CycleStart::Default),
            solar_declination(n + 365, CycleStart::Default),
            0.11
        );
    }
}

// ── EquationOfTime ──

#[test]
fn test_equation_of_time_cycle_origin() {
    assert_approx!(equation_of_time(81, CycleStart::Spring), -7.53, 1e-12);
    assert_approx!(equation_of_time(80, CycleStart::Spring), -7.8426, 1e-3);
}

#[test]
fn test_equation_of_time_bounded() {
    for n in 1..=366 {
        let eot = equation_of_time(n, CycleStart::Spring);
        assert!(eot.abs() < 9.87 + 7.53 + 1.5, "Day {}: {}", n, eot);
    }
}

// ── Meridian / time correction ──

#[test]
fn test_resolve_utc_offset() {
    assert_eq!(resolve_utc_offset(-89.6, None), -6.0);
    assert_eq!(resolve_utc_offset(15.0, None), 1.0);
    assert_eq!(resolve_utc_offset(7.5, None), 0.0);
    assert_eq!(resolve_utc_offset(22.5, None), 2.0);
    assert_eq!(resolve_utc_offset(-97.5, None), -6.0);
    assert_eq!(resolve_utc_offset(-89.6, Some(-5.0)), -5.0);
}

#[test]
fn test_local_standard_time_meridian() {
    assert_eq!(local_standard_time_meridian(0.0), 0.0);
    assert_eq!(local_standard_time_meridian(-6.0), -90.0);
    assert_eq!(local_standard_time_meridian(5.5), 82.5);
}

#[test]
fn test_time_correction_equals_eot_at_greenwich() {
    for n in [1, 45, 80, 172, 264, 355] {
        assert_eq!(
            time_correction_factor(n, 0.0, Some(0.0)),
            equation_of_time(n, CycleStart::Spring)
        );
    }
}

#[test]
fn test_time_correction_longitude_term() {
    let eot = equation_of_time(80, CycleStart::Spring);
    assert_approx!(time_correction_factor(80, -89.6, Some(-6.0)), 1.6 + eot, 1e-9);
    assert_approx!(time_correction_factor(80, -89.6, None), 1.6 + eot, 1e-9);
    assert_approx!(time_correction_factor(80, -89.6, Some(-5.0)), -58.4 + eot, 1e-9);
}

// ── Local solar time / HourAngle ──

#[test]
fn test_local_solar_time_shift() {
    assert_eq!(local_solar_time(hms(12, 0, 0), 15.0), hms(12, 15, 0));
    assert_eq!(local_solar_time(hms(12, 0, 0), -6.5), hms(11, 53, 30));
}

#[test]
fn test_local_solar_time_wraps_midnight() {
    assert_eq!(local_solar_time(hms(23, 50, 0), 20.0), hms(0, 10, 0));
    assert_eq!(local_solar_time(hms(0, 5, 0), -10.0), hms(23, 55, 0));
}

#[test]
fn test_hour_angle_known_values() {
    assert_approx!(hour_angle(hms(12, 0, 0)), 0.0, 1e-12);
    assert_approx!(hour_angle(hms(13, 0, 0)), 15.0, 1e-12);
    assert_approx!(hour_angle(hms(11, 0, 0)), -15.0, 1e-12);
    assert_approx!(hour_angle(hms(6, 0, 0)), -90.0, 1e-12);
    assert_approx!(hour_angle(hms(0, 0, 0)), -180.0, 1e-12);
}

#[test]
fn test_hour_angle_ignores_subsecond() {
    let t = NaiveTime::from_hms_milli_opt(12, 0, 30, 999).unwrap();
    assert_approx!(hour_angle(t), 15.0 * 30.0 / 3600.0, 1e-12);
}

// ── Elevation ──

#[test]
fn test_elevation_noon_equinox() {
    let elev = solar_elevation(40.0, 0.0, 0.0, ElevationFormula::Standard).unwrap();
    assert_approx!(elev, 50.0, 1e-9);
}

#[test]
fn test_elevation_symmetric_in_hour_angle() {
    for ha in [15.0, 45.0, 90.0, 135.0] {
        let am = solar_elevation(35.0, 10.0, -ha, ElevationFormula::Standard).unwrap();
        let pm = solar_elevation(35.0, 10.0, ha, ElevationFormula::Standard).unwrap();
        assert_approx!(am, pm, 1e-9);
    }
}

#[test]
fn test_elevation_latitude_squared_term() {
    let lat: f64 = 40.0;
    let dec: f64 = 20.0;
    let ha: f64 = 30.0;
    let r = |d: f64| d.to_radians();
    let expected = (r(dec).sin() * r(lat).sin() + r(lat).cos() * r(lat).cos() * r(ha).cos())
        .asin()
        .to_degrees();
    let elev = solar_elevation(lat, dec, ha, ElevationFormula::LatitudeSquared).unwrap();
    assert_approx!(elev, expected, 1e-9);
    let standard = solar_elevation(lat, dec, ha, ElevationFormula::Standard).unwrap();
    assert!((elev - standard).abs() > 0.1);
}

#[test]
fn test_elevation_latitude_squared_domain_error() {
    let err = solar_elevation(10.0, 23.45, 0.0, ElevationFormula::LatitudeSquared).unwrap_err();
    assert!(matches!(err, SolarError::Domain { quantity: "elevation", .. }), "{:?}", err);
    let standard = solar_elevation(10.0, 23.45, 0.0, ElevationFormula::Standard).unwrap();
    assert_approx!(standard, 76.55, 1e-9);
}

#[test]
fn test_elevation_overhead_sun() {
    let elev = solar_elevation(23.45, 23.45, 0.0, ElevationFormula::Standard).unwrap();
    assert_approx!(elev, 90.0, 1e-5);
}

// ── Azimuth ──

#[test]
fn test_azimuth_south_at_noon_northern() {
    let az = solar_azimuth(40.0, 0.0, 0.0, 50.0, AzimuthRange::FullCircle).unwrap();
    assert_approx!(az, 180.0, 1e-5);
}

#[test]
fn test_azimuth_north_at_noon_southern() {
    let az = solar_azimuth(-40.0, 0.0, 0.0, 50.0, AzimuthRange::FullCircle).unwrap();
    assert_approx!(az, 0.0, 1e-5);
}

#[test]
fn test_azimuth_full_circle_morning_afternoon() {
    let elev_am = solar_elevation(40.0, 10.0, -45.0, ElevationFormula::Standard).unwrap();
    let elev_pm = solar_elevation(40.0, 10.0, 45.0, ElevationFormula::Standard).unwrap();
    let am = solar_azimuth(40.0, 10.0, -45.0, elev_am, AzimuthRange::FullCircle).unwrap();
    let pm = solar_azimuth(40.0, 10.0, 45.0, elev_pm, AzimuthRange::FullCircle).unwrap();
    assert!(am > 90.0 && am < 180.0, "am={}", am);
    assert!(pm > 180.0 && pm < 270.0, "pm={}", pm);
    assert_approx!(am + pm, 360.0, 1e-9);
}

#[test]
fn test_azimuth_principal_is_ambiguous() {
    let elev = solar_elevation(40.0, 10.0, 45.0, ElevationFormula::Standard).unwrap();
    let am = solar_azimuth(40.0, 10.0, -45.0, elev, AzimuthRange::Principal).unwrap();
    let pm = solar_azimuth(40.0, 10.0, 45.0, elev, AzimuthRange::Principal).unwrap();
    assert_approx!(am, pm, 1e-12);
    assert!((0.0..=180.0).contains(&pm));
}

#[test]
fn test_azimuth_at_zenith_is_domain_error() {
    let err = solar_azimuth(23.45, 23.45, 0.0, 90.0, AzimuthRange::FullCircle).unwrap_err();
    assert!(matches!(err, SolarError::Domain { quantity: "azimuth", .. }), "{:?}", err);
}

// ── Composed SolarAngles ──

fn springfield() -> GeoLocation {
    GeoLocation::new(39.8, -89.6, Some(-6.0)).unwrap()
}

fn springfield_equinox() -> SolarAngles {
    let time = TimeContext::from_hms(80, 12, 0, 0).unwrap();
    solar_angles(&springfield(), &time, &SolarModelConfig::default()).unwrap()
}

#[test]
fn test_springfield_equinox_time_terms() {
    let pos = springfield_equinox();
    assert_approx!(pos.equation_of_time, -7.8426, 1e-3);
    assert_approx!(pos.time_correction, -6.2426, 1e-3);
    assert_eq!(pos.local_solar_time, hms(11, 53, 45));
    assert_approx!(pos.hour_angle, -1.5625, 1e-9);
}

#[test]
fn test_springfield_equinox_position() {
    let pos = springfield_equinox();
    assert_approx!(pos.declination, -0.5294, 1e-3);
    assert_approx!(pos.elevation, 49.645, 1e-2);
    assert_approx!(pos.azimuth, 177.587, 1e-2);
}

#[test]
fn test_elevation_peaks_at_solar_noon() {
    let config = SolarModelConfig::default();
    for &(lat, lon, offset) in &[(39.8, -89.6, -6.0), (0.0, 0.0, 0.0), (-33.9, 151.2, 10.0)] {
        let location = GeoLocation::new(lat, lon, Some(offset)).unwrap();
        for day in [20, 80, 172, 264, 355] {
            let noon = daylight_window(&location, day, &config).unwrap().solar_noon.time;
            let elevation_at = |t: NaiveTime| {
                let time = TimeContext::new(day, t).unwrap();
                solar_angles(&location, &time, &config).unwrap().elevation
            };
            let at_noon = elevation_at(noon);
            let before = elevation_at(noon - chrono::Duration::hours(1));
            let after = elevation_at(noon + chrono::Duration::hours(1));
            assert!(at_noon > before && at_noon > after, "lat={} day={}", lat, day);
        }
    }
}

#[test]
fn test_direct_and_rederived_elevation_agree() {
    let config = SolarModelConfig::default();
    for lat in [-60.0, -35.0, 0.0, 20.0, 45.0, 65.0] {
        let location = GeoLocation::new(lat, 10.0, None).unwrap();
        for day in (1..=365).step_by(29) {
            for hour in [7, 9, 11, 13, 15, 17] {
                let time = TimeContext::from_hms(day, hour, 20, 0).unwrap();
                let pos = solar_angles(&location, &time, &config).unwrap();
                let (lat_r, dec_r, ha_r) = (
                    lat.to_radians(),
                    pos.declination.to_radians(),
                    pos.hour_angle.to_radians(),
                );
                let (el_r, az_r) = (pos.elevation.to_radians(), pos.azimuth.to_radians());

                let sin_dec = lat_r.sin() * el_r.sin() + lat_r.cos() * el_r.cos() * az_r.cos();
                assert_approx!(sin_dec, dec_r.sin(), 1e-9);

                if az_r.sin().abs() > 0.1 {
                    let cos_el = -dec_r.cos() * ha_r.sin() / az_r.sin();
                    assert_approx!(cos_el, el_r.cos(), 1e-9);
                }
            }
        }
    }
}

#[test]
fn test_legacy_config_reproduces_latitude_squared() {
    let location = GeoLocation::new(39.8, -89.6, Some(-6.0)).unwrap();
    let time = TimeContext::from_hms(80, 12, 0, 0).unwrap();
    let pos = solar_angles(&location, &time, &SolarModelConfig::legacy()).unwrap();
    let expected = solar_elevation(39.8, pos.declination, pos.hour_angle, ElevationFormula::LatitudeSquared)
        .unwrap();
    assert_eq!(pos.elevation, expected);
    assert!(pos.azimuth <= 180.0);
}

#[test]
fn test_legacy_config_domain_failure_propagates() {
    let location = GeoLocation::new(10.0, 0.0, Some(0.0)).unwrap();
    let time = TimeContext::from_hms(172, 12, 0, 0).unwrap();
    let result = solar_angles(&location, &time, &SolarModelConfig::legacy());
    assert!(matches!(result, Err(SolarError::Domain { .. })));
}

// ── Input validation ──

#[test]
fn test_invalid_location_rejected() {
    assert!(matches!(
        GeoLocation::new(91.0, 0.0, None),
        Err(SolarError::InvalidInput { field: "latitude", .. })
    ));
    assert!(matches!(
        GeoLocation::new(0.0, 200.0, None),
        Err(SolarError::InvalidInput { field: "longitude", .. })
    ));
    assert!(GeoLocation::new(0.0, 0.0, Some(f64::NAN)).is_err());
}

#[test]
fn test_invalid_time_rejected() {
    assert!(TimeContext::from_hms(0, 12, 0, 0).is_err());
    assert!(TimeContext::from_hms(367, 12, 0, 0).is_err());
    assert!(TimeContext::from_hms(100, 24, 0, 0).is_err());
    assert!(TimeContext::from_hms(366, 23, 59, 59).is_ok());
}

#[test]
fn test_derived_utc_offset() {
    let location = GeoLocation::new(39.8, -89.6, None).unwrap();
    assert_eq!(location.utc_offset(), -6.0);
    assert_eq!(location.supplied_utc_offset(), None);
}

#[test]
fn test_time_context_from_datetime_uses_wall_clock() {
    use chrono_tz::America::Chicago;

    let dt = Chicago.with_ymd_and_hms(2026, 3, 21, 12, 0, 0).unwrap();
    let time = TimeContext::from_datetime(&dt);
    assert_eq!(time.day_of_year(), 80);
    assert_eq!(time.time().hour(), 12);
}

#[test]
fn test_time_context_leap_year_ordinal() {
    let dt = chrono::NaiveDate::from_ymd_opt(2024, 12, 31)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    assert_eq!(TimeContext::from_naive(&dt).day_of_year(), 366);
}
