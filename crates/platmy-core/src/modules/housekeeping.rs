//! Output directory layout for generated spectra and plots.

use crate::domain::{PlatmyError, PlatmyResult};
use globset::{Glob, GlobMatcher};
use std::fs;
use std::path::{Path, PathBuf};

pub const DATA_DIR: &str = "gendata";
pub const PLOT_DIR: &str = "plots";
pub const DATA_PATTERN: &str = "*.ecsv";
pub const PLOT_PATTERN: &str = "*.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new(".")
    }
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    pub fn plot_dir(&self) -> PathBuf {
        self.root.join(PLOT_DIR)
    }

    pub fn table_path(&self, stem: &str) -> PathBuf {
        self.data_dir().join(format!("{stem}.ecsv"))
    }

    pub fn plot_path(&self, stem: &str) -> PathBuf {
        self.plot_dir().join(format!("{stem}.png"))
    }

    /// Creates the data and plot directories when missing.
    pub fn check_folders(&self) -> PlatmyResult<()> {
        for directory in [self.data_dir(), self.plot_dir()] {
            if directory.is_dir() {
                continue;
            }
            fs::create_dir_all(&directory).map_err(|source| {
                PlatmyError::io(
                    "IO.OUTPUT_DIR",
                    format!(
                        "failed to create output directory '{}': {}",
                        directory.display(),
                        source
                    ),
                )
            })?;
            tracing::info!(directory = %directory.display(), "created output directory");
        }
        Ok(())
    }

    /// Removes generated tables and plots from earlier runs.
    ///
    /// Only the top level of each directory is scanned. Missing directories
    /// are skipped.
    pub fn clean_outputs(&self) -> PlatmyResult<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for (directory, pattern) in [
            (self.data_dir(), DATA_PATTERN),
            (self.plot_dir(), PLOT_PATTERN),
        ] {
            if !directory.is_dir() {
                continue;
            }
            let matcher = compile_pattern(pattern)?;
            removed.extend(remove_matching(&directory, &matcher)?);
        }
        tracing::info!(count = removed.len(), "removed previous outputs");
        Ok(removed)
    }
}

fn compile_pattern(pattern: &str) -> PlatmyResult<GlobMatcher> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|source| {
            PlatmyError::internal(
                "INTERNAL.OUTPUT_PATTERN",
                format!("invalid output pattern '{}': {}", pattern, source),
            )
        })
}

fn remove_matching(directory: &Path, matcher: &GlobMatcher) -> PlatmyResult<Vec<PathBuf>> {
    let entries = fs::read_dir(directory).map_err(|source| {
        PlatmyError::io(
            "IO.OUTPUT_LIST",
            format!("failed to list '{}': {}", directory.display(), source),
        )
    })?;

    let mut removed = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| {
                PlatmyError::io(
                    "IO.OUTPUT_LIST",
                    format!("failed to list '{}': {}", directory.display(), source),
                )
            })?
            .path();
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if !path.is_file() || !matcher.is_match(file_name) {
            continue;
        }

        fs::remove_file(&path).map_err(|source| {
            PlatmyError::io(
                "IO.OUTPUT_REMOVE",
                format!("failed to remove '{}': {}", path.display(), source),
            )
        })?;
        tracing::debug!(path = %path.display(), "removed output");
        removed.push(path);
    }
    removed.sort();
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::OutputLayout;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn check_folders_is_idempotent() {
        let temp = TempDir::new().expect("tempdir should be created");
        let layout = OutputLayout::new(temp.path());

        layout.check_folders().expect("first call should succeed");
        layout.check_folders().expect("second call should succeed");

        assert!(layout.data_dir().is_dir());
        assert!(layout.plot_dir().is_dir());
    }

    #[test]
    fn clean_outputs_removes_only_generated_files() {
        let temp = TempDir::new().expect("tempdir should be created");
        let layout = OutputLayout::new(temp.path());
        layout.check_folders().expect("folders should be created");

        fs::write(layout.table_path("a1.00_300.0"), "x").expect("table");
        fs::write(layout.data_dir().join("notes.txt"), "keep").expect("notes");
        fs::write(layout.plot_path("a1.00_300.0"), "x").expect("plot");
        fs::write(layout.plot_dir().join("stray.ecsv"), "keep").expect("stray");

        let removed = layout.clean_outputs().expect("clean should succeed");

        assert_eq!(removed.len(), 2);
        assert!(!layout.table_path("a1.00_300.0").exists());
        assert!(!layout.plot_path("a1.00_300.0").exists());
        assert!(layout.data_dir().join("notes.txt").exists());
        assert!(layout.plot_dir().join("stray.ecsv").exists());
    }

    #[test]
    fn clean_outputs_without_folders_is_a_no_op() {
        let temp = TempDir::new().expect("tempdir should be created");
        let removed = OutputLayout::new(temp.path())
            .clean_outputs()
            .expect("clean should succeed");
        assert!(removed.is_empty());
    }
}
