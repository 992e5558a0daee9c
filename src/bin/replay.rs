// Standalone replay tool for analyzing agent decision logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all ticks
//   --ticks <tick1,tick2>  Replay specific ticks (comma-separated)
//   --validate             Run validation mode with expected actions
//   --verbose              Show detailed output for each tick
//   --config <path>        Path to Agent.toml (default: Agent.toml)

use std::env;
use std::process;

use scroller_agent::config::Config;
use scroller_agent::replay::ReplayEngine;
use scroller_agent::types::Action;

fn print_usage() {
    eprintln!("Agent Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all search decisions in the log");
    eprintln!("  --ticks <T1,T2,...>     Replay specific ticks (comma-separated)");
    eprintln!("  --validate <T:A,...>    Validate expected actions (format: tick:action,...)");
    eprintln!("  --verbose               Show detailed output for each tick");
    eprintln!("  --config <path>         Path to Agent.toml (default: Agent.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all ticks");
    eprintln!("  replay agent_debug.jsonl --all");
    eprintln!();
    eprintln!("  # Replay specific ticks");
    eprintln!("  replay agent_debug.jsonl --ticks 5,10,15");
    eprintln!();
    eprintln!("  # Validate expected actions (alternatives separated by '|')");
    eprintln!("  replay agent_debug.jsonl --validate 5:right+sprint,10:right+jump|right");
    eprintln!();
    eprintln!("  # Verbose replay of all ticks");
    eprintln!("  replay agent_debug.jsonl --all --verbose");
}

fn parse_ticks(s: &str) -> Result<Vec<u64>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u64>()
                .map_err(|e| format!("Invalid tick number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_actions(s: &str) -> Result<Vec<(u64, Vec<Action>)>, String> {
    s.split(',')
        .map(|pair| {
            let parts: Vec<&str> = pair.trim().split(':').collect();
            if parts.len() != 2 {
                return Err(format!("Invalid format '{}'. Expected 'tick:action'", pair));
            }

            let tick = parts[0]
                .parse::<u64>()
                .map_err(|e| format!("Invalid tick number '{}': {}", parts[0], e))?;

            // Support multiple acceptable actions separated by '|'
            let actions: Result<Vec<Action>, String> =
                parts[1].split('|').map(|a| a.trim().parse::<Action>()).collect();

            Ok((tick, actions?))
        })
        .collect()
}

/// Value following `flag`, or exit with an error
fn flag_value(args: &[String], flag: &str) -> String {
    match args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1)) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    }
}

fn main() {
    // Initialize logger
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Agent.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    // Parse arguments
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => {
                mode = Some("all");
            }
            "--ticks" => {
                flag_value(&args, "--ticks");
                mode = Some("ticks");
                i += 1;
            }
            "--validate" => {
                flag_value(&args, "--validate");
                mode = Some("validate");
                i += 1;
            }
            "--config" => {
                config_path = flag_value(&args, "--config");
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    if mode.is_none() {
        eprintln!("Error: Must specify --all, --ticks, or --validate");
        print_usage();
        process::exit(1);
    }

    // Load configuration
    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Some("all") => {
            println!("Replaying all {} ticks...\n", entries.len());
            match engine.replay_all(&entries) {
                Ok(results) => {
                    engine.print_report(&results);
                }
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Some("ticks") => {
            let ticks = match parse_ticks(&flag_value(&args, "--ticks")) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Error parsing ticks: {}", e);
                    process::exit(1);
                }
            };

            println!("Replaying {} specific tick(s)...\n", ticks.len());
            match engine.replay_ticks(&entries, &ticks) {
                Ok(results) => {
                    engine.print_report(&results);
                }
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Some("validate") => {
            let expected = match parse_expected_actions(&flag_value(&args, "--validate")) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error parsing expected actions: {}", e);
                    process::exit(1);
                }
            };

            println!("Validating {} expected action(s)...\n", expected.len());
            match engine.validate_expected_actions(&entries, &expected) {
                Ok(()) => {
                    println!("✓ All expected actions validated successfully!");
                }
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
        _ => unreachable!(),
    }
}
