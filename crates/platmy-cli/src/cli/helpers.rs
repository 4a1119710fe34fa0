use super::{CliError, GlobalArgs};
use anyhow::Context;
use platmy_core::common::config::{ChemistryConfig, load_chemistry_config};
use platmy_core::modules::housekeeping::OutputLayout;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Solver configuration from `--config`, with `--solver-dir` applied on top.
pub(super) fn chemistry_config(global: &GlobalArgs) -> Result<ChemistryConfig, CliError> {
    let mut config = match &global.config {
        Some(path) => load_chemistry_config(path)?,
        None => ChemistryConfig::default(),
    };
    if let Some(solver_dir) = &global.solver_dir {
        config.solver_dir = solver_dir.clone();
    }
    tracing::debug!(
        solver_dir = %config.solver_dir.display(),
        executable = %config.executable.display(),
        "resolved chemistry configuration"
    );
    Ok(config)
}

pub(super) fn output_layout(global: &GlobalArgs) -> OutputLayout {
    OutputLayout::new(&global.output_root)
}

/// Pretty JSON to `output` when given, stdout otherwise.
pub(super) fn emit_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value).context("failed to serialize JSON output")?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create '{}'", parent.display()))?;
            }
            fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            tracing::info!(path = %path.display(), "wrote JSON output");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
