use chrono::TimeZone;
use chrono_tz::America::Chicago;

use solar_features::{
    daylight_window, feature_row, solar_angles, GeoLocation, SolarError, SolarModelConfig,
    TimeContext,
};

fn main() -> Result<(), SolarError> {
    let latitude = 39.8;
    let longitude = -89.6;
    let tilt = 30.0;
    let direct_irradiation = 1000.0;

    let location = GeoLocation::new(latitude, longitude, Some(-6.0))?;
    let dt = Chicago.with_ymd_and_hms(2026, 3, 21, 12, 0, 0).unwrap();
    let time = TimeContext::from_datetime(&dt);
    let config = SolarModelConfig::default();

    let pos = solar_angles(&location, &time, &config)?;
    let window = daylight_window(&location, time.day_of_year(), &config)?;
    let row = feature_row(&location, &time, tilt, direct_irradiation, &config)?;

    println!("=== Solar Feature Calculation Example ===");
    println!(
        "Location: Springfield, IL ({:.1}°N, {:.1}°W)",
        latitude, -longitude
    );
    println!("Date/Time: {}", dt);
    println!();
    println!("--- Solar Position ---");
    println!("Day of year: {}", time.day_of_year());
    println!("Declination: {:.2}°", pos.declination);
    println!("Equation of Time: {:.2} minutes", pos.equation_of_time);
    println!("Time Correction: {:.2} minutes", pos.time_correction);
    println!("Local Solar Time: {}", pos.local_solar_time);
    println!("Hour Angle: {:.2}°", pos.hour_angle);
    println!("Elevation: {:.2}°", pos.elevation);
    println!("Azimuth: {:.2}° (0°=N, 90°=E, 180°=S)", pos.azimuth);
    println!();
    println!("--- Daylight ---");
    println!("Sunrise: {}", window.sunrise);
    println!("Solar noon: {}", window.solar_noon);
    println!("Sunset: {}", window.sunset);
    println!("Day length: {} min", window.day_length().num_minutes());
    println!();
    println!("--- Panel ---");
    println!(
        "Irradiance on {:.0}° tilt at {:.0} W/m² direct: {:.1} W/m²",
        tilt, direct_irradiation, row.irradiance
    );
    Ok(())
}
