//! A terminal Vegas style slot machine.
//!
//! Press ENTER to spin, type `quit` to leave.

use anyhow::{Result, bail};
use pico_args::Arguments;
use slots_cli::terminal::{SessionEnd, run_session};
use std::io;
use vegas_slots::{
    SlotEngine,
    game::{DEFAULT_STARTING_BALANCE, MAX_STARTING_BALANCE},
};

const DEFAULT_BET: i64 = 5;

const HELP: &str = "\
Play a Vegas style slot machine in the terminal

USAGE:
  slots_cli [OPTIONS]

OPTIONS:
  --balance N           Starting balance  [default: 100]
  --bet N               Bet per spin      [default: 5]

FLAGS:
  -h, --help            Print help information
";

struct Args {
    balance: i64,
    bet: i64,
}

fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        balance: pargs
            .opt_value_from_str("--balance")?
            .unwrap_or(DEFAULT_STARTING_BALANCE),
        bet: pargs.opt_value_from_str("--bet")?.unwrap_or(DEFAULT_BET),
    };

    if args.bet <= 0 {
        bail!("--bet must be greater than 0");
    }

    if args.balance > MAX_STARTING_BALANCE {
        bail!("--balance must be at most {MAX_STARTING_BALANCE}");
    }

    let mut engine = SlotEngine::new(args.balance);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();

    let end = run_session(
        &mut engine,
        args.bet,
        &mut input,
        &mut output,
        &mut rand::rng(),
    )?;

    if let SessionEnd::InputClosed { balance } = end {
        println!("Final Balance: ${balance}");
    }

    Ok(())
}
