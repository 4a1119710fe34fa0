//! Solver layout and abundance template configuration.
//!
//! The chemistry solver is driven entirely through well-known file names in
//! its own directory. Every name can be overridden from a JSON file; missing
//! keys keep the defaults below.

use crate::domain::{PlatmyError, PlatmyResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_SOLVER_DIR: &str = "easy_chem";
pub const DEFAULT_SOLVER_EXECUTABLE: &str = "./call_easy_chem";
pub const DEFAULT_PT_INPUT_FILE: &str = "PT_struct.dat";
pub const DEFAULT_ABUNDANCE_OUTPUT_FILE: &str = "final_abund_all.dat";
pub const DEFAULT_MMW_OUTPUT_FILE: &str = "MMWs.dat";
pub const DEFAULT_ACTIVE_TEMPLATE_FILE: &str = "abundances.inp";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChemistryConfig {
    pub solver_dir: PathBuf,
    /// Resolved against `solver_dir` when relative.
    pub executable: PathBuf,
    pub pt_input_file: String,
    pub abundance_output_file: String,
    pub mmw_output_file: String,
    pub active_template_file: String,
}

impl Default for ChemistryConfig {
    fn default() -> Self {
        Self {
            solver_dir: PathBuf::from(DEFAULT_SOLVER_DIR),
            executable: PathBuf::from(DEFAULT_SOLVER_EXECUTABLE),
            pt_input_file: DEFAULT_PT_INPUT_FILE.to_string(),
            abundance_output_file: DEFAULT_ABUNDANCE_OUTPUT_FILE.to_string(),
            mmw_output_file: DEFAULT_MMW_OUTPUT_FILE.to_string(),
            active_template_file: DEFAULT_ACTIVE_TEMPLATE_FILE.to_string(),
        }
    }
}

impl ChemistryConfig {
    pub fn with_solver_dir(solver_dir: impl Into<PathBuf>) -> Self {
        Self {
            solver_dir: solver_dir.into(),
            ..Self::default()
        }
    }

    pub fn executable_path(&self) -> PathBuf {
        if self.executable.is_absolute() {
            self.executable.clone()
        } else {
            self.solver_dir.join(&self.executable)
        }
    }

    pub fn pt_input_path(&self) -> PathBuf {
        self.solver_dir.join(&self.pt_input_file)
    }

    pub fn abundance_output_path(&self) -> PathBuf {
        self.solver_dir.join(&self.abundance_output_file)
    }

    pub fn mmw_output_path(&self) -> PathBuf {
        self.solver_dir.join(&self.mmw_output_file)
    }

    /// The three files one solver exchange creates.
    pub fn working_files(&self) -> [PathBuf; 3] {
        [
            self.pt_input_path(),
            self.abundance_output_path(),
            self.mmw_output_path(),
        ]
    }
}

pub fn load_chemistry_config(path: &Path) -> PlatmyResult<ChemistryConfig> {
    let source = fs::read_to_string(path).map_err(|source| {
        PlatmyError::io(
            "IO.CONFIG_READ",
            format!("failed to read config '{}': {}", path.display(), source),
        )
    })?;
    serde_json::from_str(&source).map_err(|source| {
        PlatmyError::configuration(
            "CONFIG.PARSE",
            format!("failed to parse config '{}': {}", path.display(), source),
        )
    })
}

/// Elemental composition preset staged as the solver's active input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AbundanceTemplate {
    #[default]
    #[serde(rename = "std")]
    Standard,
    Subsolar,
}

impl AbundanceTemplate {
    pub const fn selector(self) -> &'static str {
        match self {
            Self::Standard => "std",
            Self::Subsolar => "subsolar",
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Standard => "Standard_abundances.inp",
            Self::Subsolar => "Subsolar_abundances.inp",
        }
    }
}

impl Display for AbundanceTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.selector())
    }
}

impl FromStr for AbundanceTemplate {
    type Err = PlatmyError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        match selector {
            "std" => Ok(Self::Standard),
            "subsolar" => Ok(Self::Subsolar),
            other => Err(PlatmyError::configuration(
                "CONFIG.ABUNDANCE_TEMPLATE",
                format!(
                    "unknown abundance template '{}'; expected `std` or `subsolar`",
                    other
                ),
            )),
        }
    }
}
