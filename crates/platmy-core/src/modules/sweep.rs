//! Grids of planet radii and equilibrium temperatures run one model at a time.

use super::spectrum::{
    AbundanceSource, DEFAULT_CLOUD_PRESSURE, DEFAULT_HAZE_FACTOR, DEFAULT_REFERENCE_PRESSURE,
    ModelBuilder, PlanetModel,
};
use crate::common::constants::EARTH_RADIUS;
use crate::domain::{PlatmyError, PlatmyResult};
use crate::numerics::TemperatureModel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepGrid {
    pub name: String,
    pub radii_earth: Vec<f64>,
    pub temperatures: Vec<f64>,
    pub abundances: AbundanceSource,
    #[serde(default)]
    pub temperature_model: TemperatureModel,
    #[serde(default = "default_haze_factor")]
    pub haze_factor: f64,
    #[serde(default = "default_cloud_pressure")]
    pub cloud_pressure: f64,
    #[serde(default = "default_reference_pressure")]
    pub reference_pressure: f64,
    /// Planet mass in grams, shared by every combination.
    #[serde(default)]
    pub planet_mass: Option<f64>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_plots")]
    pub plots: bool,
}

fn default_haze_factor() -> f64 {
    DEFAULT_HAZE_FACTOR
}

fn default_cloud_pressure() -> f64 {
    DEFAULT_CLOUD_PRESSURE
}

fn default_reference_pressure() -> f64 {
    DEFAULT_REFERENCE_PRESSURE
}

fn default_plots() -> bool {
    true
}

impl SweepGrid {
    pub fn combination_count(&self) -> usize {
        self.radii_earth.len() * self.temperatures.len()
    }

    /// One model per radius and temperature, radius-major.
    pub fn models(&self) -> Vec<PlanetModel> {
        let mut models = Vec::with_capacity(self.combination_count());
        for radius_earth in &self.radii_earth {
            for temperature in &self.temperatures {
                let mut model = PlanetModel::new(
                    self.name.clone(),
                    radius_earth * EARTH_RADIUS,
                    *temperature,
                    self.abundances.clone(),
                );
                model.haze_factor = self.haze_factor;
                model.cloud_pressure = self.cloud_pressure;
                model.reference_pressure = self.reference_pressure;
                model.mass = self.planet_mass;
                model.description = self.description.clone();
                model.plots = self.plots;
                model.temperature_model = self.temperature_model;
                models.push(model);
            }
        }
        models
    }
}

pub fn load_sweep_grid(path: &Path) -> PlatmyResult<SweepGrid> {
    let source = fs::read_to_string(path).map_err(|source| {
        PlatmyError::io(
            "IO.SWEEP_READ",
            format!("failed to read sweep grid '{}': {}", path.display(), source),
        )
    })?;
    serde_json::from_str(&source).map_err(|source| {
        PlatmyError::configuration(
            "CONFIG.SWEEP_PARSE",
            format!("failed to parse sweep grid '{}': {}", path.display(), source),
        )
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepOutcome {
    pub radius_earth: f64,
    pub temperature: f64,
    pub table_path: Option<PathBuf>,
    pub error: Option<String>,
}

impl SweepOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    pub combination_count: usize,
    pub succeeded_count: usize,
    pub failed_count: usize,
    pub outcomes: Vec<SweepOutcome>,
}

impl SweepReport {
    pub fn passed(&self) -> bool {
        self.failed_count == 0
    }
}

/// Runs every combination of `grid` in order.
///
/// A failing combination is logged and recorded; the remaining ones still run.
pub fn run_sweep(builder: &ModelBuilder<'_>, grid: &SweepGrid) -> PlatmyResult<SweepReport> {
    builder.layout().check_folders()?;

    let models = grid.models();
    tracing::info!(
        name = %grid.name,
        combinations = models.len(),
        "starting sweep"
    );

    let mut outcomes = Vec::with_capacity(models.len());
    for model in &models {
        let outcome = match builder.make_model(model) {
            Ok(output) => SweepOutcome {
                radius_earth: model.radius_earth(),
                temperature: model.temperature,
                table_path: Some(output.table_path),
                error: None,
            },
            Err(error) => {
                tracing::error!(
                    radius_earth = model.radius_earth(),
                    t_eq = model.temperature,
                    code = error.code(),
                    "model failed: {}",
                    error.message()
                );
                SweepOutcome {
                    radius_earth: model.radius_earth(),
                    temperature: model.temperature,
                    table_path: None,
                    error: Some(error.to_string()),
                }
            }
        };
        outcomes.push(outcome);
    }

    let combination_count = outcomes.len();
    let succeeded_count = outcomes.iter().filter(|outcome| outcome.succeeded()).count();
    Ok(SweepReport {
        combination_count,
        succeeded_count,
        failed_count: combination_count - succeeded_count,
        outcomes,
    })
}

pub fn render_human_summary(report: &SweepReport) -> String {
    let status = if report.passed() { "PASS" } else { "FAIL" };
    let mut lines = vec![
        format!("Sweep status: {}", status),
        format!(
            "Combinations: {} total ({} succeeded, {} failed)",
            report.combination_count, report.succeeded_count, report.failed_count
        ),
    ];
    for outcome in report.outcomes.iter().filter(|outcome| !outcome.succeeded()) {
        lines.push(format!(
            "  R={:.2} R_Earth, T={:.1} K: {}",
            outcome.radius_earth,
            outcome.temperature,
            outcome.error.as_deref().unwrap_or("unknown failure")
        ));
    }
    lines.join("\n")
}
