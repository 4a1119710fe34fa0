//! Forward model for a single planet: bulk properties, pressure-temperature
//! profile, abundances, then the transmission spectrum written as ECSV.

mod ecsv;
mod model;

pub use ecsv::{ECSV_SIGNATURE, TRANSIT_RADIUS_COLUMN, WAVELENGTH_COLUMN, render_ecsv};
pub use model::{
    AbundanceMetadata, AbundanceSource, AxisScale, DEFAULT_CLOUD_PRESSURE, DEFAULT_HAZE_FACTOR,
    DEFAULT_REFERENCE_PRESSURE, MmwMetadata, PLOT_X_LABEL, PLOT_X_LIMITS, PLOT_Y_LABEL,
    PlanetModel, PlotRequest, RawSpectrum, SPECTRUM_SPECIES, SpectrumMetadata, SpectrumTable,
    TransmissionInput, plot_title,
};

use super::housekeeping::OutputLayout;
use super::serialization::write_text_artifact_atomic;
use super::{EquilibriumChemistry, SpectrumEngine, SpectrumPlotter};
use crate::common::constants::{CM_PER_MICRON, EARTH_RADIUS, SPEED_OF_LIGHT};
use crate::domain::{PlatmyError, PlatmyResult};
use crate::numerics::{PlanetBulk, standard_pressure_grid};
use chrono::Utc;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    pub table_path: PathBuf,
    pub plot_path: Option<PathBuf>,
    pub table: SpectrumTable,
}

struct LayerAbundances {
    species: BTreeMap<String, Vec<f64>>,
    mmw: Vec<f64>,
    metadata: (AbundanceMetadata, MmwMetadata),
}

/// Runs [`PlanetModel`]s against a radiative transfer engine.
pub struct ModelBuilder<'a> {
    engine: &'a dyn SpectrumEngine,
    chemistry: Option<&'a dyn EquilibriumChemistry>,
    plotter: Option<&'a dyn SpectrumPlotter>,
    layout: OutputLayout,
    pressures: Vec<f64>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(engine: &'a dyn SpectrumEngine, layout: OutputLayout) -> Self {
        Self {
            engine,
            chemistry: None,
            plotter: None,
            layout,
            pressures: standard_pressure_grid(),
        }
    }

    pub fn with_chemistry(mut self, chemistry: &'a dyn EquilibriumChemistry) -> Self {
        self.chemistry = Some(chemistry);
        self
    }

    pub fn with_plotter(mut self, plotter: &'a dyn SpectrumPlotter) -> Self {
        self.plotter = Some(plotter);
        self
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn pressures(&self) -> &[f64] {
        &self.pressures
    }

    /// Computes and stores one spectrum.
    ///
    /// Nothing is left in the output folders unless every stage, the plot
    /// included, succeeds.
    pub fn make_model(&self, model: &PlanetModel) -> PlatmyResult<ModelOutput> {
        tracing::info!(
            name = %model.name,
            radius_earth = %format!("{:.2}", model.radius_earth()),
            t_eq = model.temperature,
            temp_model = %model.temperature_model,
            "running model"
        );

        let planet = PlanetBulk::new(model.radius, model.mass);
        let profile = model.temperature_model.evaluate(
            model.temperature,
            &self.pressures,
            planet.gravity,
        );
        let layers = self.layer_abundances(model, &profile.temperatures)?;

        let input = TransmissionInput {
            pressures: &self.pressures,
            temperatures: &profile.temperatures,
            abundances: &layers.species,
            gravity: planet.gravity,
            mmw: &layers.mmw,
            reference_radius: model.radius,
            reference_pressure: model.reference_pressure,
            haze_factor: model.haze_factor,
            cloud_pressure: model.cloud_pressure,
        };
        let spectrum = self.engine.compute_transmission_spectrum(&input)?;
        let (wavelength, transit_radius) = convert_spectrum(&spectrum)?;

        let created = Utc::now();
        let (abundance_metadata, mmw_metadata) = layers.metadata;
        let table = SpectrumTable {
            wavelength,
            transit_radius,
            metadata: SpectrumMetadata {
                description: model.description.clone(),
                abundances: abundance_metadata,
                r_pl: model.radius,
                temp: model.temperature,
                mmw: mmw_metadata,
                haze_factor: model.haze_factor,
                pcloud: model.cloud_pressure,
                cdate: created.format("%Y-%m-%d").to_string(),
                ctime: created.format("%H:%M:%S").to_string(),
                surf_gravity: planet.gravity,
                density: planet.density,
                mass_pl: planet.mass,
                p0: model.reference_pressure,
                temp_model: profile.parameters,
                pl_name: model.name.clone(),
            },
        };

        let rendered = render_ecsv(&table)?;
        let stem = model.output_stem();
        let table_path = self.layout.table_path(&stem);
        write_text_artifact_atomic(&table_path, &rendered).map_err(|source| {
            PlatmyError::io(
                "IO.SPECTRUM_WRITE",
                format!("failed to write '{}': {}", table_path.display(), source),
            )
        })?;
        tracing::info!(
            path = %table_path.display(),
            points = table.wavelength.len(),
            "wrote spectrum"
        );

        let plot_path = if model.plots {
            match self.plot(model, &table, &stem) {
                Ok(plot_path) => plot_path,
                Err(error) => {
                    withdraw_table(&table_path);
                    return Err(error);
                }
            }
        } else {
            None
        };

        Ok(ModelOutput {
            table_path,
            plot_path,
            table,
        })
    }

    fn layer_abundances(
        &self,
        model: &PlanetModel,
        temperatures: &[f64],
    ) -> PlatmyResult<LayerAbundances> {
        let layer_count = self.pressures.len();
        match &model.abundances {
            AbundanceSource::Constant {
                mass_fractions,
                mmw,
            } => {
                let mut species = BTreeMap::new();
                for name in SPECTRUM_SPECIES {
                    let fraction = mass_fractions.get(name).ok_or_else(|| {
                        PlatmyError::configuration(
                            "CONFIG.MASS_FRACTION",
                            format!("no mass fraction given for species '{}'", name),
                        )
                    })?;
                    species.insert(name.to_string(), vec![*fraction; layer_count]);
                }
                Ok(LayerAbundances {
                    species,
                    mmw: vec![*mmw; layer_count],
                    metadata: (
                        AbundanceMetadata::MassFractions(mass_fractions.clone()),
                        MmwMetadata::Constant(*mmw),
                    ),
                })
            }
            AbundanceSource::Equilibrium => {
                let chemistry = self.chemistry.ok_or_else(|| {
                    PlatmyError::configuration(
                        "CONFIG.CHEMISTRY",
                        "equilibrium abundances requested but no chemistry solver is configured",
                    )
                })?;
                let result = chemistry.equilibrium_abundances(&self.pressures, temperatures)?;
                if result.layer_count() != layer_count || result.mmw.len() != layer_count {
                    return Err(PlatmyError::format(
                        "FORMAT.ROW_COUNT",
                        format!(
                            "chemistry returned {} layers and {} mean molecular weights for a {}-layer profile",
                            result.layer_count(),
                            result.mmw.len(),
                            layer_count
                        ),
                    ));
                }

                let mut species = BTreeMap::new();
                for name in SPECTRUM_SPECIES {
                    let profile = result.profile(name).ok_or_else(|| {
                        PlatmyError::format(
                            "FORMAT.SPECIES_MISSING",
                            format!("chemistry output has no abundances for '{}'", name),
                        )
                    })?;
                    species.insert(name.to_string(), profile);
                }
                Ok(LayerAbundances {
                    species,
                    mmw: result.mmw.clone(),
                    metadata: (
                        AbundanceMetadata::Source("equilibrium".to_string()),
                        MmwMetadata::Profile(result.mmw),
                    ),
                })
            }
        }
    }

    fn plot(
        &self,
        model: &PlanetModel,
        table: &SpectrumTable,
        stem: &str,
    ) -> PlatmyResult<Option<PathBuf>> {
        let Some(plotter) = self.plotter else {
            tracing::warn!(name = %model.name, "plot requested but no plotter is configured");
            return Ok(None);
        };

        let output_path = self.layout.plot_path(stem);
        let title = plot_title(model);
        plotter.plot_spectrum(&PlotRequest {
            wavelength: &table.wavelength,
            transit_radius: &table.transit_radius,
            title: &title,
            x_label: PLOT_X_LABEL,
            y_label: PLOT_Y_LABEL,
            x_scale: AxisScale::Log,
            x_limits: PLOT_X_LIMITS,
            output_path: &output_path,
        })?;
        Ok(Some(output_path))
    }
}

/// Removes a table whose run failed after it was written.
fn withdraw_table(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "withdrew spectrum after plot failure"),
        Err(error) if error.kind() == ErrorKind::NotFound => {}
        Err(error) => tracing::warn!(
            path = %path.display(),
            %error,
            "failed to withdraw spectrum after plot failure"
        ),
    }
}

/// Frequency in Hz to wavelength in micron, radius in cm to Earth radii.
fn convert_spectrum(spectrum: &RawSpectrum) -> PlatmyResult<(Vec<f64>, Vec<f64>)> {
    if spectrum.frequency.len() != spectrum.transit_radius.len() {
        return Err(PlatmyError::format(
            "FORMAT.SPECTRUM_LENGTH",
            format!(
                "engine returned {} frequencies but {} transit radii",
                spectrum.frequency.len(),
                spectrum.transit_radius.len()
            ),
        ));
    }
    if let Some(index) = spectrum
        .frequency
        .iter()
        .position(|frequency| !(frequency.is_finite() && *frequency > 0.0))
    {
        return Err(PlatmyError::format(
            "FORMAT.SPECTRUM_FREQUENCY",
            format!(
                "engine frequency {} at index {} is not positive",
                spectrum.frequency[index], index
            ),
        ));
    }

    let wavelength = spectrum
        .frequency
        .iter()
        .map(|frequency| SPEED_OF_LIGHT / frequency / CM_PER_MICRON)
        .collect();
    let transit_radius = spectrum
        .transit_radius
        .iter()
        .map(|radius| radius / EARTH_RADIUS)
        .collect();
    Ok((wavelength, transit_radius))
}
