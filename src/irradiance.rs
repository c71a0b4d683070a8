use crate::angles::deg_to_rad;
use crate::types::{IrradianceInput, IrradianceResult};

/// Direct-beam irradiance on a surface tilted `tilt` degrees from horizontal,
/// in W/m². Zero whenever the sun is at or below the horizon.
///
/// `albedo` is accepted for the ground-reflected component but does not enter
/// the direct-beam term.
pub fn surface_irradiance(elevation: f64, tilt: f64, direct_irradiation: f64, _albedo: f64) -> f64 {
    if elevation <= 0.0 {
        return 0.0;
    }
    let incident = direct_irradiation * deg_to_rad(elevation).sin();
    incident * deg_to_rad(tilt + elevation).sin()
}

pub fn irradiance_on_surface(input: &IrradianceInput) -> IrradianceResult {
    IrradianceResult::new(surface_irradiance(
        input.elevation,
        input.tilt,
        input.direct_irradiation,
        input.albedo,
    ))
}
