//! File-based exchange with the external equilibrium chemistry solver.
//!
//! The solver reads `PT_struct.dat` and writes `final_abund_all.dat` and
//! `MMWs.dat` next to it, so it owns one directory and a fixed set of file
//! names. Every exchange holds [`SOLVER_LOCK`] for its whole duration.

mod session;

use super::EquilibriumChemistry;
use super::serialization::{render_numeric_columns, write_text_artifact};
use crate::common::config::{AbundanceTemplate, ChemistryConfig};
use crate::domain::{
    BridgeResult, ChemistryResult, ColumnTable, PlatmyError, PlatmyResult, PRESSURE_COLUMN,
    TEMPERATURE_COLUMN,
};
use crate::parser::{parse_numeric_source, read_text_source};
use session::SolverSession;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Serializes access to solver directories across the whole process.
static SOLVER_LOCK: Mutex<()> = Mutex::new(());

/// Digits after the decimal point in `PT_struct.dat`.
pub const PT_PRECISION: usize = 18;
pub const MMW_COLUMN: usize = 1;

fn lock_solver() -> MutexGuard<'static, ()> {
    // Poisoning is ignored; the panicking exchange's session already removed
    // its working files while unwinding.
    SOLVER_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChemistryBridge {
    config: ChemistryConfig,
}

impl ChemistryBridge {
    pub fn new(config: ChemistryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChemistryConfig {
        &self.config
    }

    /// Runs the solver on one pressure/temperature profile.
    ///
    /// Blocks until the solver exits. A non-zero exit fails before any output
    /// file is read, and the working files are removed on every path.
    pub fn run(&self, pressure: &[f64], temperature: &[f64]) -> BridgeResult<ChemistryResult> {
        if pressure.len() != temperature.len() {
            return Err(PlatmyError::format(
                "FORMAT.PT_LENGTH",
                format!(
                    "pressure has {} layers but temperature has {}",
                    pressure.len(),
                    temperature.len()
                ),
            ));
        }

        let _lock = lock_solver();
        let session = SolverSession::open(&self.config)?;
        tracing::info!(
            solver_dir = %self.config.solver_dir.display(),
            layers = pressure.len(),
            "running equilibrium chemistry"
        );

        session.write_input(pressure, temperature)?;
        session.run_solver()?;
        let result = session.read_outputs()?;

        if result.layer_count() != pressure.len() {
            tracing::warn!(
                requested = pressure.len(),
                returned = result.layer_count(),
                "chemistry solver returned a different number of layers"
            );
        }
        Ok(result)
    }

    /// Stages an abundance template as the solver's active input.
    pub fn set_abundance_file(&self, template: AbundanceTemplate) -> PlatmyResult<PathBuf> {
        let _lock = lock_solver();

        let source = self.config.solver_dir.join(template.file_name());
        let target = self.config.solver_dir.join(&self.config.active_template_file);
        fs::copy(&source, &target).map_err(|error| {
            PlatmyError::io(
                "IO.ABUNDANCE_TEMPLATE",
                format!(
                    "failed to copy abundance template '{}' to '{}': {}",
                    source.display(),
                    target.display(),
                    error
                ),
            )
        })?;

        tracing::info!(
            template = %template,
            target = %target.display(),
            "staged abundance template"
        );
        Ok(target)
    }

    /// Same as [`Self::set_abundance_file`] for a textual selector.
    pub fn set_abundance_file_by_name(&self, selector: &str) -> PlatmyResult<PathBuf> {
        let template = selector.parse::<AbundanceTemplate>()?;
        self.set_abundance_file(template)
    }
}

impl EquilibriumChemistry for ChemistryBridge {
    fn equilibrium_abundances(
        &self,
        pressure: &[f64],
        temperature: &[f64],
    ) -> BridgeResult<ChemistryResult> {
        self.run(pressure, temperature)
    }
}

pub fn write_pt_structure(path: &Path, pressure: &[f64], temperature: &[f64]) -> BridgeResult<()> {
    if pressure.len() != temperature.len() {
        return Err(PlatmyError::format(
            "FORMAT.PT_LENGTH",
            format!(
                "pressure has {} layers but temperature has {}",
                pressure.len(),
                temperature.len()
            ),
        ));
    }

    let content = render_numeric_columns(&[pressure, temperature], PT_PRECISION);
    write_text_artifact(path, &content).map_err(|source| {
        PlatmyError::io(
            "IO.PT_WRITE",
            format!("failed to write '{}': {}", path.display(), source),
        )
    })
}

/// Reads a two-column pressure/temperature file into `P` and `T` columns.
pub fn read_pt_structure(path: &Path) -> BridgeResult<ColumnTable> {
    let source = read_text_source(path)?;
    let matrix = parse_numeric_source(&source, &path.display().to_string())?;
    if matrix.row_count() > 0 && matrix.width() < 2 {
        return Err(PlatmyError::format(
            "FORMAT.PT_COLUMNS",
            format!(
                "'{}' needs pressure and temperature columns, found {}",
                path.display(),
                matrix.width()
            ),
        ));
    }

    ColumnTable::from_columns([
        (PRESSURE_COLUMN, matrix.column(0).unwrap_or_default()),
        (TEMPERATURE_COLUMN, matrix.column(1).unwrap_or_default()),
    ])
}

/// Reads the mean molecular weight column of a solver `MMWs.dat` file.
pub fn read_mmw_file(path: &Path) -> BridgeResult<Vec<f64>> {
    let source = read_text_source(path)?;
    let matrix = parse_numeric_source(&source, &path.display().to_string())?;
    if matrix.row_count() == 0 {
        return Ok(Vec::new());
    }

    matrix.column(MMW_COLUMN).ok_or_else(|| {
        PlatmyError::format(
            "FORMAT.MMW_COLUMNS",
            format!(
                "'{}' has {} columns; the mean molecular weight is column {}",
                path.display(),
                matrix.width(),
                MMW_COLUMN
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::{ChemistryBridge, read_mmw_file, read_pt_structure, write_pt_structure};
    use crate::common::config::{AbundanceTemplate, ChemistryConfig};
    use crate::domain::PlatmyErrorCategory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn pt_structure_round_trips() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("PT_struct.dat");
        let pressure = [1.0e-6, 3.5e-3, 12.0, 100.0];
        let temperature = [812.25, 900.0, 1234.5678, 1500.0];

        write_pt_structure(&path, &pressure, &temperature).expect("write should succeed");
        let table = read_pt_structure(&path).expect("read should succeed");

        for (expected, actual) in pressure.iter().zip(table.column("P").expect("P column")) {
            assert!((expected - actual).abs() <= expected.abs() * 1.0e-15);
        }
        for (expected, actual) in temperature.iter().zip(table.column("T").expect("T column")) {
            assert!((expected - actual).abs() <= expected.abs() * 1.0e-15);
        }
    }

    #[test]
    fn pt_structure_rejects_mismatched_lengths() {
        let temp = TempDir::new().expect("tempdir should be created");
        let error = write_pt_structure(&temp.path().join("PT_struct.dat"), &[1.0, 2.0], &[300.0])
            .expect_err("mismatched profile should fail");
        assert_eq!(error.code(), "FORMAT.PT_LENGTH");
        assert!(!temp.path().join("PT_struct.dat").exists());
    }

    #[test]
    fn mmw_file_reads_second_column() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("MMWs.dat");
        fs::write(&path, "1.0 2.33\n2.0 2.35\n").expect("fixture should be written");

        assert_eq!(read_mmw_file(&path).expect("mmw should parse"), vec![2.33, 2.35]);
    }

    #[test]
    fn single_column_mmw_file_is_a_format_error() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("MMWs.dat");
        fs::write(&path, "2.33\n").expect("fixture should be written");

        let error = read_mmw_file(&path).expect_err("one column should fail");
        assert_eq!(error.code(), "FORMAT.MMW_COLUMNS");
    }

    #[test]
    fn abundance_template_is_copied_to_active_input() {
        let temp = TempDir::new().expect("tempdir should be created");
        fs::write(temp.path().join("Subsolar_abundances.inp"), "C 0.1\n")
            .expect("template should be written");
        let bridge = ChemistryBridge::new(ChemistryConfig::with_solver_dir(temp.path()));

        let target = bridge
            .set_abundance_file(AbundanceTemplate::Subsolar)
            .expect("template should be staged");

        assert_eq!(target, temp.path().join("abundances.inp"));
        assert_eq!(fs::read_to_string(target).expect("active input"), "C 0.1\n");
    }

    #[test]
    fn unknown_template_selector_fails_before_touching_files() {
        let temp = TempDir::new().expect("tempdir should be created");
        let bridge = ChemistryBridge::new(ChemistryConfig::with_solver_dir(temp.path()));

        let error = bridge
            .set_abundance_file_by_name("metal-rich")
            .expect_err("unknown selector should fail");
        assert_eq!(error.category(), PlatmyErrorCategory::ConfigurationError);
        assert!(!temp.path().join("abundances.inp").exists());
    }

    #[test]
    fn missing_template_is_an_io_error() {
        let temp = TempDir::new().expect("tempdir should be created");
        let bridge = ChemistryBridge::new(ChemistryConfig::with_solver_dir(temp.path()));

        let error = bridge
            .set_abundance_file(AbundanceTemplate::Standard)
            .expect_err("missing template should fail");
        assert_eq!(error.category(), PlatmyErrorCategory::IoError);
    }

    #[test]
    fn missing_solver_directory_is_an_io_error() {
        let temp = TempDir::new().expect("tempdir should be created");
        let bridge =
            ChemistryBridge::new(ChemistryConfig::with_solver_dir(temp.path().join("absent")));

        let error = bridge
            .run(&[1.0], &[300.0])
            .expect_err("absent solver dir should fail");
        assert_eq!(error.code(), "IO.SOLVER_DIR");
    }
}
