// SPDX-License-Identifier: MPL-2.0
use iced_toasts::config;
use iced_toasts::error::Result;
use iced_toasts::scenario::{Replay, Scenario};
use std::path::PathBuf;
use std::process::ExitCode;

const HELP: &str = "\
iced_toasts - toast notification timelines

USAGE:
  iced_toasts simulate <SCENARIO.toml> [OPTIONS]

OPTIONS:
  --config-dir DIR   Read settings.toml from DIR
  --diagnostics      Print the lifecycle event report as JSON
  -h, --help         Print this help
";

struct SimulateArgs {
    scenario: PathBuf,
    config_dir: Option<PathBuf>,
    diagnostics: bool,
}

fn main() -> ExitCode {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{}", HELP);
        return ExitCode::SUCCESS;
    }

    let subcommand = match args.subcommand() {
        Ok(Some(subcommand)) => subcommand,
        Ok(None) => {
            eprint!("{}", HELP);
            return ExitCode::from(2);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    if subcommand != "simulate" {
        eprintln!("error: unknown command '{}'", subcommand);
        eprint!("{}", HELP);
        return ExitCode::from(2);
    }

    let parsed = (|| -> std::result::Result<SimulateArgs, pico_args::Error> {
        let config_dir = args.opt_value_from_str("--config-dir")?;
        let diagnostics = args.contains("--diagnostics");
        let scenario = args.free_from_str()?;
        Ok(SimulateArgs {
            scenario,
            config_dir,
            diagnostics,
        })
    })();

    let simulate_args = match parsed {
        Ok(simulate_args) => simulate_args,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        eprintln!("warning: unused arguments {:?}", remaining);
    }

    match simulate(&simulate_args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn simulate(args: &SimulateArgs) -> Result<()> {
    let (config, warning) = config::load_with_override(args.config_dir.clone());
    if let Some(warning) = warning {
        eprintln!("warning: {}", warning);
    }

    let scenario = Scenario::load(&args.scenario)?;
    let mut replay = Replay::new(config.notifications.display_duration());

    if args.diagnostics {
        replay.enable_diagnostics(config.diagnostics.buffer_capacity());
    }

    for (index, step) in scenario.ordered_steps() {
        println!("{}", replay.apply(index, step));
    }

    let settled_at = replay.settle();
    println!(
        "settled at {} ms, {} notification(s) still visible",
        settled_at,
        replay.store().len()
    );

    if let Some(collector) = replay.diagnostics() {
        println!("{}", collector.export_json()?);
    }

    Ok(())
}
