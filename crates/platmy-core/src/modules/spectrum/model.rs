use crate::common::constants::EARTH_RADIUS;
use crate::numerics::{TemperatureModel, TemperatureParameters};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Absorbers handed to the radiative transfer engine, in engine order.
pub const SPECTRUM_SPECIES: [&str; 16] = [
    "H2", "He", "C2H2", "CH4", "CO", "CO2", "H2O", "H2S", "HCN", "K", "NH3", "Na", "OH", "PH3",
    "TiO", "VO",
];

pub const DEFAULT_HAZE_FACTOR: f64 = 10.0;
pub const DEFAULT_CLOUD_PRESSURE: f64 = 0.01;
pub const DEFAULT_REFERENCE_PRESSURE: f64 = 0.01;

/// Where per-layer abundances come from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum AbundanceSource {
    /// Mass fractions and mean molecular weight held fixed over all layers.
    Constant {
        #[serde(rename = "massFractions")]
        mass_fractions: BTreeMap<String, f64>,
        mmw: f64,
    },
    /// Abundances and mean molecular weight from the chemistry solver.
    Equilibrium,
}

/// One forward-model run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetModel {
    pub name: String,
    /// Planet radius, cm.
    pub radius: f64,
    /// Equilibrium temperature, K.
    pub temperature: f64,
    pub abundances: AbundanceSource,
    pub haze_factor: f64,
    /// Pressure of the opaque cloud deck, bar.
    pub cloud_pressure: f64,
    pub description: String,
    /// Planet mass in grams; `None` assumes the default bulk density.
    pub mass: Option<f64>,
    /// Pressure in bar at which the radius and gravity are defined.
    pub reference_pressure: f64,
    pub plots: bool,
    pub temperature_model: TemperatureModel,
}

impl PlanetModel {
    pub fn new(
        name: impl Into<String>,
        radius: f64,
        temperature: f64,
        abundances: AbundanceSource,
    ) -> Self {
        Self {
            name: name.into(),
            radius,
            temperature,
            abundances,
            haze_factor: DEFAULT_HAZE_FACTOR,
            cloud_pressure: DEFAULT_CLOUD_PRESSURE,
            description: String::new(),
            mass: None,
            reference_pressure: DEFAULT_REFERENCE_PRESSURE,
            plots: true,
            temperature_model: TemperatureModel::default(),
        }
    }

    pub fn radius_earth(&self) -> f64 {
        self.radius / EARTH_RADIUS
    }

    /// File stem shared by the table and the plot: `{name}{R:.2}_{T:.1}`.
    pub fn output_stem(&self) -> String {
        format!(
            "{}{:.2}_{:.1}",
            self.name,
            self.radius_earth(),
            self.temperature
        )
    }
}

/// Everything the radiative transfer engine needs for one spectrum.
#[derive(Debug, Clone, Copy)]
pub struct TransmissionInput<'a> {
    /// Layer pressures, bar.
    pub pressures: &'a [f64],
    /// Layer temperatures, K.
    pub temperatures: &'a [f64],
    /// Per-layer mass fraction of each species.
    pub abundances: &'a BTreeMap<String, Vec<f64>>,
    /// Surface gravity, cm s^-2.
    pub gravity: f64,
    /// Per-layer mean molecular weight, amu.
    pub mmw: &'a [f64],
    /// Radius at the reference pressure, cm.
    pub reference_radius: f64,
    pub reference_pressure: f64,
    pub haze_factor: f64,
    pub cloud_pressure: f64,
}

/// Engine output in cgs: frequency in Hz and transit radius in cm.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSpectrum {
    pub frequency: Vec<f64>,
    pub transit_radius: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AbundanceMetadata {
    MassFractions(BTreeMap<String, f64>),
    Source(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MmwMetadata {
    Constant(f64),
    Profile(Vec<f64>),
}

/// Table metadata, serialized in this field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumMetadata {
    pub description: String,
    pub abundances: AbundanceMetadata,
    pub r_pl: f64,
    pub temp: f64,
    pub mmw: MmwMetadata,
    pub haze_factor: f64,
    pub pcloud: f64,
    pub cdate: String,
    pub ctime: String,
    pub surf_gravity: f64,
    pub density: f64,
    pub mass_pl: f64,
    pub p0: f64,
    pub temp_model: TemperatureParameters,
    pub pl_name: String,
}

/// Wavelength in micron and transit radius in Earth radii.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumTable {
    pub wavelength: Vec<f64>,
    pub transit_radius: Vec<f64>,
    pub metadata: SpectrumMetadata,
}

pub const PLOT_X_LIMITS: (f64, f64) = (0.59, 5.0);
pub const PLOT_X_LABEL: &str = "Wavelength (microns)";
pub const PLOT_Y_LABEL: &str = r"Transit radius ($\rm R_{Earth}$)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    Log,
}

#[derive(Debug, Clone, Copy)]
pub struct PlotRequest<'a> {
    pub wavelength: &'a [f64],
    pub transit_radius: &'a [f64],
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub x_scale: AxisScale,
    pub x_limits: (f64, f64),
    pub output_path: &'a Path,
}

pub fn plot_title(model: &PlanetModel) -> String {
    format!(
        "{} Param: R={:.2} R_Earth,  T={:.1} K",
        model.name,
        model.radius_earth(),
        model.temperature
    )
}
