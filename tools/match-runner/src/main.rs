//! match-runner: run a SKIRMISH scenario headless and print the result report.
//!
//! Usage:
//!   match-runner run gun-duel
//!   match-runner run path/to/scenario.json --seed 7 --events
//!   match-runner list

use std::process;

use skirmish_sim::engine::{HarnessConfig, MatchHarness};
use skirmish_sim::scenario::{self, Scenario};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "list" => cmd_list(),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "match-runner: SKIRMISH headless match runner\n\
         \n\
         Commands:\n\
         \n\
         run <scenario>   Run a match and print the result report\n\
         \n\
           <scenario>     Built-in scenario name or path to a scenario JSON\n\
           --seed <N>     RNG seed for collision damage rolls (default: 42)\n\
           --events       Also print the match event log as JSON lines\n\
         \n\
         list             List built-in scenarios\n\
         \n\
         Examples:\n\
         \n\
           match-runner run head-on-joust\n\
           match-runner run demos/pileup.json --seed 7 --events\n"
    );
}

fn cmd_list() {
    println!("head-on-joust");
    println!("broadside-ram");
    println!("gun-duel");
}

fn cmd_run(args: &[String]) {
    if args.is_empty() {
        eprintln!("run: missing scenario");
        print_usage();
        process::exit(1);
    }

    let mut seed = 42u64;
    let mut print_events = false;
    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                let Some(value) = iter.next() else {
                    eprintln!("--seed needs a value");
                    process::exit(1);
                };
                seed = match value.parse() {
                    Ok(v) => v,
                    Err(_) => {
                        eprintln!("--seed: not a number: {value}");
                        process::exit(1);
                    }
                };
            }
            "--events" => print_events = true,
            other => {
                eprintln!("run: unknown option {other}");
                process::exit(1);
            }
        }
    }

    let scenario = load_scenario(&args[0]);
    let config = HarnessConfig {
        seed,
        ..Default::default()
    };
    let mut harness = match MatchHarness::new(scenario, config) {
        Ok(h) => h,
        Err(err) => {
            eprintln!("Failed to set up match: {err}");
            process::exit(1);
        }
    };

    let report = harness.run();
    for line in &report {
        println!("{line}");
    }

    if print_events {
        for event in harness.events() {
            match serde_json::to_string(event) {
                Ok(json) => eprintln!("{json}"),
                Err(err) => eprintln!("event serialization failed: {err}"),
            }
        }
    }
}

fn load_scenario(name_or_path: &str) -> Scenario {
    if let Some(builtin) = scenario::builtin(name_or_path) {
        return builtin;
    }
    match Scenario::load(name_or_path) {
        Ok(scenario) => scenario,
        Err(err) => {
            eprintln!("Cannot load scenario {name_or_path}: {err}");
            process::exit(1);
        }
    }
}
