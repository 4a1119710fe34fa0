use crate::common::config::ChemistryConfig;
use crate::domain::{BridgeResult, ChemistryResult, PlatmyError};
use crate::modules::abundances::read_abundance_records;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{read_mmw_file, write_pt_structure};

/// One write-run-read exchange inside the solver directory.
///
/// Paths are resolved against the canonical solver directory and the solver
/// runs with that directory as its own working directory, so the process
/// working directory is never touched. Dropping the session removes the
/// three working files whatever happened in between.
pub(super) struct SolverSession {
    solver_dir: PathBuf,
    executable: PathBuf,
    pt_input: PathBuf,
    abundance_output: PathBuf,
    mmw_output: PathBuf,
}

impl SolverSession {
    pub(super) fn open(config: &ChemistryConfig) -> BridgeResult<Self> {
        let solver_dir = fs::canonicalize(&config.solver_dir).map_err(|source| {
            PlatmyError::io(
                "IO.SOLVER_DIR",
                format!(
                    "chemistry solver directory '{}' is not accessible: {}",
                    config.solver_dir.display(),
                    source
                ),
            )
        })?;
        if !solver_dir.is_dir() {
            return Err(PlatmyError::io(
                "IO.SOLVER_DIR",
                format!(
                    "chemistry solver path '{}' is not a directory",
                    solver_dir.display()
                ),
            ));
        }

        let resolved = ChemistryConfig {
            solver_dir,
            ..config.clone()
        };
        Ok(Self {
            executable: resolved.executable_path(),
            pt_input: resolved.pt_input_path(),
            abundance_output: resolved.abundance_output_path(),
            mmw_output: resolved.mmw_output_path(),
            solver_dir: resolved.solver_dir,
        })
    }

    pub(super) fn write_input(&self, pressure: &[f64], temperature: &[f64]) -> BridgeResult<()> {
        write_pt_structure(&self.pt_input, pressure, temperature)
    }

    pub(super) fn run_solver(&self) -> BridgeResult<()> {
        tracing::debug!(
            executable = %self.executable.display(),
            solver_dir = %self.solver_dir.display(),
            "invoking chemistry solver"
        );

        let output = Command::new(&self.executable)
            .current_dir(&self.solver_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| {
                PlatmyError::execution(
                    "EXEC.SOLVER_SPAWN",
                    format!(
                        "failed to launch chemistry solver '{}': {}",
                        self.executable.display(),
                        source
                    ),
                )
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!(
                executable = %self.executable.display(),
                stdout = %stdout.trim(),
                "chemistry solver output"
            );
        }

        if output.status.success() {
            return Ok(());
        }

        let status_text = output.status.code().map_or_else(
            || "terminated by signal".to_string(),
            |code| format!("exit code {}", code),
        );
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::error!(
            executable = %self.executable.display(),
            status = %status_text,
            stderr = %stderr.trim(),
            "chemistry solver failed"
        );
        Err(PlatmyError::execution(
            "EXEC.SOLVER_STATUS",
            format!(
                "chemistry solver '{}' failed with {}",
                self.executable.display(),
                status_text
            ),
        ))
    }

    pub(super) fn read_outputs(&self) -> BridgeResult<ChemistryResult> {
        let records = read_abundance_records(&self.abundance_output)?;
        let mmw = read_mmw_file(&self.mmw_output)?;

        if records.len() != mmw.len() {
            return Err(PlatmyError::format(
                "FORMAT.ROW_COUNT",
                format!(
                    "'{}' has {} rows but '{}' has {}",
                    self.abundance_output.display(),
                    records.len(),
                    self.mmw_output.display(),
                    mmw.len()
                ),
            ));
        }

        Ok(ChemistryResult { records, mmw })
    }
}

impl Drop for SolverSession {
    fn drop(&mut self) {
        for path in [&self.pt_input, &self.abundance_output, &self.mmw_output] {
            remove_working_file(path);
        }
    }
}

fn remove_working_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed solver working file"),
        Err(error) if error.kind() == ErrorKind::NotFound => {}
        Err(error) => tracing::warn!(
            path = %path.display(),
            %error,
            "failed to remove solver working file"
        ),
    }
}
