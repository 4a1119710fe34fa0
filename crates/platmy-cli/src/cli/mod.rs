mod commands;
mod helpers;
mod logging;

use clap::Parser;
use platmy_core::domain::PlatmyError;
use std::path::PathBuf;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let platmy_error = error.as_platmy_error();
            eprintln!("{}", platmy_error.diagnostic_line());
            platmy_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("platmy".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            logging::init_logging(cli.global.verbose);
            dispatch_parsed(&cli.global, cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "platmy",
    version,
    about = "Synthetic transmission spectra and equilibrium chemistry driver"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Args)]
pub(crate) struct GlobalArgs {
    /// Chemistry solver configuration (JSON)
    #[arg(long, global = true, value_name = "path")]
    config: Option<PathBuf>,

    /// Chemistry solver directory, overriding the configuration
    #[arg(long, global = true, value_name = "dir")]
    solver_dir: Option<PathBuf>,

    /// Root holding the gendata and plots directories
    #[arg(long, global = true, default_value = ".", value_name = "dir")]
    output_root: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Run the equilibrium chemistry solver on a pressure/temperature file
    Chem(commands::ChemArgs),
    /// Stage an abundance template as the solver's active input
    Abundances(commands::AbundancesArgs),
    /// Print a pressure/temperature profile on the standard pressure grid
    Temperature(commands::TemperatureArgs),
    /// Create the output directories
    Prepare,
    /// Remove generated tables and plots
    Clean,
}

fn dispatch_parsed(global: &GlobalArgs, command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Chem(args) => commands::run_chem_command(global, args),
        CliCommand::Abundances(args) => commands::run_abundances_command(global, args),
        CliCommand::Temperature(args) => commands::run_temperature_command(args),
        CliCommand::Prepare => commands::run_prepare_command(global),
        CliCommand::Clean => commands::run_clean_command(global),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(PlatmyError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_platmy_error(&self) -> PlatmyError {
        match self {
            Self::Usage(message) => {
                PlatmyError::configuration("CONFIG.CLI_USAGE", message.trim_end().to_string())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => PlatmyError::io("IO.CLI", format!("{error:#}")),
        }
    }
}

impl From<PlatmyError> for CliError {
    fn from(error: PlatmyError) -> Self {
        Self::Compute(error)
    }
}
