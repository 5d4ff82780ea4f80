//! Fencing competition simulator.
//!
//! Loads or synthesizes a roster, runs it through pools and the tableau with
//! seeded random results, then prints the classification and optionally
//! writes the full report as JSON.

mod config;
mod report;
mod simulate;

use std::path::PathBuf;

use anyhow::Error;
use log::info;
use pico_args::Arguments;
use touche::competition::Competition;

use config::CliConfig;
use report::Report;
use simulate::{Simulator, load_roster};

const HELP: &str = "\
Simulate a fencing competition from check-in to the final classification

USAGE:
  touche_cli [OPTIONS]

OPTIONS:
  --roster     PATH        JSON roster file             [default: synthesized roster]
  --fencers    N           Size of a synthesized roster [default: env FENCER_COUNT or 24]
  --pools      N           Pools in the first round     [default: env POOL_COUNT or size band]
  --seed       N           Simulation RNG seed          [default: env SIMULATION_SEED or 42]
  --output     PATH        Write the full report as JSON

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  DEFAULT_POOL_MAX_SCORE   Touches to win a pool bout, 0 for no cap  [default: 5]
  DEFAULT_TABLE_MAX_SCORE  Touches to win a tableau bout, 0 for no cap [default: 15]
  POOL_ROUNDS              Pool rounds before the tableau  [default: 1]
  HAS_DIRECT_ELIMINATION   Fence a tableau after the pools [default: true]
  THIRD_PLACE_MATCH        Fence for third place           [default: false]
  POOL_MIN_SIZE            Smallest pool                   [default: 5]
  POOL_MAX_SIZE            Largest pool                    [default: 7]
  AVOID_SAME_CLUB          Keep clubmates apart            [default: true]
  AVOID_SAME_LEAGUE        Keep league mates apart         [default: true]
  AVOID_SAME_NATION        Keep compatriots apart          [default: false]
  RUST_LOG                 Log level (e.g., info, debug)
  (A .env file in the working directory is loaded first)
";

struct Args {
    roster: Option<PathBuf>,
    fencers: Option<u32>,
    pools: Option<usize>,
    seed: Option<u64>,
    output: Option<PathBuf>,
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        roster: pargs.opt_value_from_str("--roster")?,
        fencers: pargs.opt_value_from_str("--fencers")?,
        pools: pargs.opt_value_from_str("--pools")?,
        seed: pargs.opt_value_from_str("--seed")?,
        output: pargs.opt_value_from_str("--output")?,
    };

    env_logger::builder().format_target(false).init();

    let config = CliConfig::from_env(args.fencers, args.pools, args.seed)?;
    config.validate()?;
    info!("Simulating with seed {}", config.seed);

    let mut simulator = Simulator::new(config.seed);
    let roster = match &args.roster {
        Some(path) => load_roster(path)?,
        None => simulator.synthesize_roster(config.fencers),
    };

    let mut competition = Competition::new(config.competition, roster)?;
    simulator.run(&mut competition, config.pools)?;

    let report = Report::new(&competition);
    print!("{report}");

    if let Some(path) = &args.output {
        report.write_json(path)?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
