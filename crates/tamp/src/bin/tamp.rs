use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tamp::tamp_math::CGS_TO_SI_ENERGY;
use tamp::{SimParams, SimulationDriver, scenario};

#[derive(Parser, Debug)]
#[command(name = "tamp", version, about = "Run a phased granular compression scenario")]
struct Opts {
    /// JSON parameter file
    json_file: PathBuf,
}

fn usage() {
    let name = std::env::args().next().unwrap_or_else(|| "tamp".to_string());
    println!("usage: {name} <json_file>");
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn run(params: SimParams) -> Result<()> {
    let (engine, setup, options) = scenario::build(&params);
    let mut driver =
        SimulationDriver::prepare(engine, setup, options).context("failed to set up the run")?;
    let frames = driver.run().context("simulation failed")?;

    let log_path = params.output_dir.join("frames.json");
    frames
        .to_json_file(&log_path)
        .with_context(|| format!("writing {}", log_path.display()))?;

    let ke = driver.engine().kinetic_energy();
    log::info!("final kinetic energy: {:.6e} J", ke * CGS_TO_SI_ENERGY);
    Ok(())
}

fn main() -> ExitCode {
    let Ok(opts) = Opts::try_parse() else {
        usage();
        return ExitCode::from(1);
    };
    let params = match SimParams::from_file(&opts.json_file) {
        Ok(params) => params,
        Err(err) => {
            eprintln!("{}: {err}", opts.json_file.display());
            usage();
            return ExitCode::from(1);
        }
    };

    init_logging(params.verbose);
    log::info!("scenario {:?} from {}", params.driver.scenario, opts.json_file.display());

    match run(params) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}
