//! Pressure-temperature profiles.
//!
//! `Guillot` is the global-average analytic profile of Guillot (2010), eq. 49,
//! with pressures in bar and gravity in cgs.

use crate::domain::{PlatmyError, PlatmyResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuillotParameters {
    /// Infrared opacity, cm^2 g^-1.
    pub kappa_ir: f64,
    /// Ratio of optical to infrared opacity.
    pub gamma: f64,
    /// Internal temperature, K.
    pub t_int: f64,
}

impl Default for GuillotParameters {
    fn default() -> Self {
        Self {
            kappa_ir: 0.01,
            gamma: 0.4,
            t_int: 200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum TemperatureModel {
    Constant,
    Guillot(GuillotParameters),
}

impl Default for TemperatureModel {
    fn default() -> Self {
        Self::Guillot(GuillotParameters::default())
    }
}

impl TemperatureModel {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Guillot(_) => "guillot",
        }
    }

    pub fn evaluate(
        &self,
        equilibrium_temperature: f64,
        pressures: &[f64],
        gravity: f64,
    ) -> TemperatureProfile {
        match *self {
            Self::Constant => TemperatureProfile {
                temperatures: vec![equilibrium_temperature; pressures.len()],
                parameters: TemperatureParameters::Constant {
                    temp: equilibrium_temperature,
                },
            },
            Self::Guillot(parameters) => TemperatureProfile {
                temperatures: pressures
                    .iter()
                    .map(|pressure| {
                        guillot_global(*pressure, parameters, gravity, equilibrium_temperature)
                    })
                    .collect(),
                parameters: TemperatureParameters::Guillot {
                    t_int: parameters.t_int,
                    t_equ: equilibrium_temperature,
                    kappa_ir: parameters.kappa_ir,
                    gamma: parameters.gamma,
                },
            },
        }
    }
}

impl Display for TemperatureModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemperatureModel {
    type Err = PlatmyError;

    fn from_str(selector: &str) -> PlatmyResult<Self> {
        match selector.to_ascii_lowercase().as_str() {
            "constant" => Ok(Self::Constant),
            "guillot" => Ok(Self::default()),
            other => Err(PlatmyError::configuration(
                "CONFIG.TEMPERATURE_MODEL",
                format!(
                    "unknown temperature model '{}'; expected `guillot` or `constant`",
                    other
                ),
            )),
        }
    }
}

/// The parameters a profile was computed with, recorded in output metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum TemperatureParameters {
    Constant {
        temp: f64,
    },
    Guillot {
        t_int: f64,
        t_equ: f64,
        kappa_ir: f64,
        gamma: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureProfile {
    pub temperatures: Vec<f64>,
    pub parameters: TemperatureParameters,
}

pub fn guillot_global(
    pressure: f64,
    parameters: GuillotParameters,
    gravity: f64,
    equilibrium_temperature: f64,
) -> f64 {
    let sqrt3 = 3f64.sqrt();
    let GuillotParameters {
        kappa_ir,
        gamma,
        t_int,
    } = parameters;

    let tau = pressure * 1.0e6 * kappa_ir / gravity;
    let t_irr = equilibrium_temperature * 2f64.sqrt();

    let internal = 0.75 * t_int.powi(4) * (2.0 / 3.0 + tau);
    let irradiated = 0.75 * t_irr.powi(4) / 4.0
        * (2.0 / 3.0
            + 1.0 / (gamma * sqrt3)
            + (gamma / sqrt3 - 1.0 / (gamma * sqrt3)) * (-gamma * tau * sqrt3).exp());

    (internal + irradiated).powf(0.25)
}
