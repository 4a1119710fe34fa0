pub mod temperature;

pub use temperature::{
    GuillotParameters, TemperatureModel, TemperatureParameters, TemperatureProfile,
};

use crate::common::constants::{DEFAULT_BULK_DENSITY, GRAVITATIONAL_CONSTANT, PI};
use serde::Serialize;

pub const PRESSURE_GRID_MIN_EXPONENT: f64 = -6.0;
pub const PRESSURE_GRID_MAX_EXPONENT: f64 = 2.0;
pub const PRESSURE_GRID_LAYERS: usize = 100;

/// `count` values evenly spaced in log10 between `10^start` and `10^stop`,
/// both ends included.
pub fn logspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![10f64.powf(start)],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count)
                .map(|index| 10f64.powf(start + step * index as f64))
                .collect()
        }
    }
}

/// Pressure layers in bar, top of the atmosphere first.
pub fn standard_pressure_grid() -> Vec<f64> {
    logspace(
        PRESSURE_GRID_MIN_EXPONENT,
        PRESSURE_GRID_MAX_EXPONENT,
        PRESSURE_GRID_LAYERS,
    )
}

/// Bulk properties of a planet in cgs units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanetBulk {
    pub radius: f64,
    pub mass: f64,
    pub density: f64,
    pub gravity: f64,
}

impl PlanetBulk {
    /// Uses `mass` when given, otherwise a sphere of the default bulk density.
    pub fn new(radius: f64, mass: Option<f64>) -> Self {
        let volume = 4.0 / 3.0 * PI * radius.powi(3);
        let (mass, density) = match mass {
            Some(mass) => (mass, mass / volume),
            None => (DEFAULT_BULK_DENSITY * volume, DEFAULT_BULK_DENSITY),
        };
        Self {
            radius,
            mass,
            density,
            gravity: GRAVITATIONAL_CONSTANT * mass / radius.powi(2),
        }
    }
}
