use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Second term of the elevation identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationFormula {
    /// `sin(dec)·sin(lat) + cos(lat)·cos(dec)·cos(HRA)`
    #[default]
    Standard,
    /// `sin(dec)·sin(lat) + cos(lat)·cos(lat)·cos(HRA)`, kept for
    /// reproducing features generated by the earlier pipeline.
    LatitudeSquared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AzimuthRange {
    /// 0..360 clockwise from north; afternoon positions are mirrored using
    /// the sign of the hour angle.
    #[default]
    FullCircle,
    /// Raw `acos` output in 0..180, morning and afternoon indistinguishable.
    Principal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondsRounding {
    /// `min(floor(seconds), 59)`
    #[default]
    Floor,
    /// Always 59, matching the earlier pipeline's clock conversion.
    ForceFiftyNine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarModelConfig {
    pub elevation_formula: ElevationFormula,
    pub azimuth_range: AzimuthRange,
    pub seconds_rounding: SecondsRounding,
}

impl SolarModelConfig {
    /// Bit-for-bit behaviour of the earlier feature pipeline.
    pub fn legacy() -> Self {
        Self {
            elevation_formula: ElevationFormula::LatitudeSquared,
            azimuth_range: AzimuthRange::Principal,
            seconds_rounding: SecondsRounding::ForceFiftyNine,
        }
    }

    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config = serde_json::from_str(json)?;
        Ok(config)
    }
}
