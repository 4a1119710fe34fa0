use super::helpers::{chemistry_config, emit_json, output_layout};
use super::{CliError, GlobalArgs};
use platmy_core::domain::{PRESSURE_COLUMN, TEMPERATURE_COLUMN};
use platmy_core::modules::chemistry::{ChemistryBridge, read_pt_structure};
use platmy_core::modules::serialization::render_numeric_columns;
use platmy_core::numerics::{TemperatureModel, standard_pressure_grid};
use std::path::PathBuf;

/// Digits after the decimal point when printing profiles.
const PROFILE_PRECISION: usize = 6;

#[derive(clap::Args)]
pub(super) struct ChemArgs {
    /// Two-column pressure (bar) / temperature (K) file
    #[arg(long, value_name = "path")]
    input: PathBuf,

    /// Write the JSON result here instead of stdout
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct AbundancesArgs {
    /// Template selector: `std` or `subsolar`
    #[arg(value_name = "template")]
    template: String,
}

#[derive(clap::Args)]
pub(super) struct TemperatureArgs {
    /// Equilibrium temperature in K
    #[arg(long)]
    t_eq: f64,

    /// Surface gravity in cm s^-2
    #[arg(long)]
    gravity: f64,

    /// Profile model: `guillot` or `constant`
    #[arg(long, default_value = "guillot")]
    model: String,
}

pub(super) fn run_chem_command(global: &GlobalArgs, args: ChemArgs) -> Result<i32, CliError> {
    let config = chemistry_config(global)?;
    let profile = read_pt_structure(&args.input)?;
    let pressure = profile.column(PRESSURE_COLUMN).unwrap_or_default();
    let temperature = profile.column(TEMPERATURE_COLUMN).unwrap_or_default();

    let result = ChemistryBridge::new(config).run(pressure, temperature)?;
    emit_json(&result, args.output.as_deref())?;
    Ok(0)
}

pub(super) fn run_abundances_command(
    global: &GlobalArgs,
    args: AbundancesArgs,
) -> Result<i32, CliError> {
    let config = chemistry_config(global)?;
    let target = ChemistryBridge::new(config).set_abundance_file_by_name(&args.template)?;
    println!("{}", target.display());
    Ok(0)
}

pub(super) fn run_temperature_command(args: TemperatureArgs) -> Result<i32, CliError> {
    if !(args.gravity.is_finite() && args.gravity > 0.0) {
        return Err(CliError::Usage(format!(
            "--gravity must be a positive number, got {}",
            args.gravity
        )));
    }
    let model = args.model.parse::<TemperatureModel>()?;

    let pressures = standard_pressure_grid();
    let profile = model.evaluate(args.t_eq, &pressures, args.gravity);
    tracing::debug!(
        model = %model,
        t_eq = args.t_eq,
        "evaluated temperature profile"
    );

    print!(
        "{}",
        render_numeric_columns(
            &[pressures.as_slice(), profile.temperatures.as_slice()],
            PROFILE_PRECISION
        )
    );
    Ok(0)
}

pub(super) fn run_prepare_command(global: &GlobalArgs) -> Result<i32, CliError> {
    let layout = output_layout(global);
    layout.check_folders()?;
    println!("{}", layout.data_dir().display());
    println!("{}", layout.plot_dir().display());
    Ok(0)
}

pub(super) fn run_clean_command(global: &GlobalArgs) -> Result<i32, CliError> {
    let removed = output_layout(global).clean_outputs()?;
    for path in &removed {
        println!("{}", path.display());
    }
    Ok(0)
}
