use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_platmy(args: &[&str], working_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_platmy"))
        .args(args)
        .current_dir(working_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("platmy should launch")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn help_exits_successfully() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_platmy(&["--help"], temp.path());

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    for command in ["chem", "abundances", "temperature", "prepare", "clean"] {
        assert!(text.contains(command), "help should list '{}'", command);
    }
}

#[test]
fn unknown_command_is_a_usage_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_platmy(&["transmogrify"], temp.path());

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("ERROR: [CONFIG.CLI_USAGE]"));
}

#[test]
fn constant_temperature_profile_covers_the_standard_grid() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_platmy(
        &[
            "temperature",
            "--t-eq",
            "500",
            "--gravity",
            "980",
            "--model",
            "constant",
        ],
        temp.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 100);
    assert_eq!(lines[0], "1.000000e-06 5.000000e+02");
    assert_eq!(lines[99], "1.000000e+02 5.000000e+02");
}

#[test]
fn guillot_profile_warms_with_depth() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_platmy(
        &["temperature", "--t-eq", "800", "--gravity", "1000"],
        temp.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let temperatures: Vec<f64> = stdout(&output)
        .lines()
        .map(|line| {
            line.split_whitespace()
                .nth(1)
                .expect("line should have two columns")
                .parse()
                .expect("temperature should parse")
        })
        .collect();
    assert_eq!(temperatures.len(), 100);
    assert!(temperatures.last() > temperatures.first());
}

#[test]
fn unknown_temperature_model_is_a_configuration_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_platmy(
        &["temperature", "--t-eq", "500", "--gravity", "980", "--model", "isothermal"],
        temp.path(),
    );

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("[CONFIG.TEMPERATURE_MODEL]"));
}

#[test]
fn prepare_then_clean_manages_output_folders() {
    let temp = TempDir::new().expect("tempdir should be created");
    let root = temp.path().join("run");
    let root_arg = root.to_str().expect("temp path should be UTF-8");

    let prepared = run_platmy(&["prepare", "--output-root", root_arg], temp.path());
    assert!(prepared.status.success(), "stderr: {}", stderr(&prepared));
    assert!(root.join("gendata").is_dir());
    assert!(root.join("plots").is_dir());

    fs::write(root.join("gendata/demo1.00_300.0.ecsv"), "# %ECSV 1.0\n")
        .expect("table should be written");
    fs::write(root.join("plots/demo1.00_300.0.png"), "png").expect("plot should be written");
    fs::write(root.join("gendata/keep.txt"), "keep").expect("note should be written");

    let cleaned = run_platmy(&["clean", "--output-root", root_arg], temp.path());
    assert!(cleaned.status.success(), "stderr: {}", stderr(&cleaned));
    assert_eq!(stdout(&cleaned).lines().count(), 2);
    assert!(!root.join("gendata/demo1.00_300.0.ecsv").exists());
    assert!(!root.join("plots/demo1.00_300.0.png").exists());
    assert!(root.join("gendata/keep.txt").exists());
}

#[test]
fn abundance_template_is_staged_in_the_solver_directory() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(temp.path().join("Subsolar_abundances.inp"), "Fe 0.1\n")
        .expect("template should be written");
    let solver_dir = temp.path().to_str().expect("temp path should be UTF-8");

    let output = run_platmy(
        &["abundances", "subsolar", "--solver-dir", solver_dir],
        temp.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(temp.path().join("abundances.inp")).expect("active template"),
        "Fe 0.1\n"
    );
}

#[test]
fn unknown_abundance_template_is_rejected() {
    let temp = TempDir::new().expect("tempdir should be created");
    let solver_dir = temp.path().to_str().expect("temp path should be UTF-8");

    let output = run_platmy(&["abundances", "solar", "--solver-dir", solver_dir], temp.path());

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("[CONFIG.ABUNDANCE_TEMPLATE]"));
    assert!(!temp.path().join("abundances.inp").exists());
}

#[test]
fn missing_abundance_template_is_an_io_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let solver_dir = temp.path().to_str().expect("temp path should be UTF-8");

    let output = run_platmy(&["abundances", "std", "--solver-dir", solver_dir], temp.path());

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("[IO.ABUNDANCE_TEMPLATE]"));
}

#[test]
fn unreadable_config_is_an_io_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_platmy(&["clean", "--config", "missing.json"], temp.path());

    // clean never touches the solver, so the config is not loaded
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = run_platmy(&["abundances", "std", "--config", "missing.json"], temp.path());
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("[IO.CONFIG_READ]"));
}

#[cfg(unix)]
mod solver {
    use super::{Value, run_platmy, stderr};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    const ECHO_SOLVER: &str = r#"#!/bin/sh
set -e
printf '%-21s%-22s%-22s%-22s\n' '   P   T   rho' '  3H2' '  2.016' '  4He' > final_abund_all.dat
awk '{ printf "%s %s 1.0e-06 0.75 0.25\n", $1, $2 }' PT_struct.dat >> final_abund_all.dat
awk '{ printf "%s 2.3\n", $1 }' PT_struct.dat > MMWs.dat
"#;

    fn install_solver(solver_dir: &Path, script: &str) {
        let executable = solver_dir.join("call_easy_chem");
        fs::write(&executable, script).expect("solver script should be written");
        let mut permissions = fs::metadata(&executable)
            .expect("solver metadata should be readable")
            .permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&executable, permissions).expect("solver should be made executable");
    }

    #[test]
    fn chem_command_writes_records_and_mmw_as_json() {
        let temp = TempDir::new().expect("tempdir should be created");
        let solver_dir = temp.path().join("easy_chem");
        fs::create_dir(&solver_dir).expect("solver dir should be created");
        install_solver(&solver_dir, ECHO_SOLVER);
        fs::write(temp.path().join("pt.dat"), "1e-3 400\n1e-1 800\n")
            .expect("PT file should be written");

        let output = run_platmy(
            &["chem", "--input", "pt.dat", "--output", "out/result.json"],
            temp.path(),
        );

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let parsed: Value = serde_json::from_str(
            &fs::read_to_string(temp.path().join("out/result.json"))
                .expect("result should be written"),
        )
        .expect("result should be JSON");
        assert_eq!(parsed["mmw"], serde_json::json!([2.3, 2.3]));
        assert_eq!(parsed["records"][1]["T"], 800.0);
        assert_eq!(parsed["records"][0]["He"], 0.25);
        assert!(!solver_dir.join("PT_struct.dat").exists());
    }

    #[test]
    fn failing_solver_maps_to_execution_exit_code() {
        let temp = TempDir::new().expect("tempdir should be created");
        install_solver(temp.path(), "#!/bin/sh\nexit 1\n");
        fs::write(temp.path().join("pt.dat"), "1e-3 400\n").expect("PT file should be written");
        let solver_dir = temp.path().to_str().expect("temp path should be UTF-8");

        let output = run_platmy(
            &["chem", "--input", "pt.dat", "--solver-dir", solver_dir],
            temp.path(),
        );

        assert_eq!(output.status.code(), Some(4));
        assert!(stderr(&output).contains("[EXEC.SOLVER_STATUS]"));
    }
}
