// Explains how the search scores each candidate for one logged tick
//
// Usage:
//   cargo run --bin diagnose_decision -- <log.jsonl> <tick>

use std::env;
use std::process;

use scroller_agent::config::Config;
use scroller_agent::node::{danger_heuristic, step_distance};
use scroller_agent::replay::ReplayEngine;
use scroller_agent::search::{candidate_actions, GreedySearch};
use scroller_agent::types::{Percept, Snapshot};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <log.jsonl> <tick>", args[0]);
        process::exit(1);
    }

    let target_tick: u64 = match args[2].parse() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Tick must be a non-negative integer: {}", e);
            process::exit(1);
        }
    };

    let config = Config::load_or_default();
    let replay = ReplayEngine::new(config.clone(), false);
    let entries = match replay.load_log_file(&args[1]) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    let entry = match entries.iter().find(|e| e.tick == target_tick) {
        Some(entry) => entry,
        None => {
            eprintln!("Tick {} not found in {}", target_tick, args[1]);
            process::exit(1);
        }
    };

    let percept = &entry.percept;

    println!("═══════════════════════════════════════════════════════════");
    println!("Decision Diagnosis for Tick {}", entry.tick);
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Agent State:");
    println!("  Ego cell: ({}, {})", percept.ego_row, percept.ego_col);
    println!("  Grid: {}x{}", percept.terrain.rows(), percept.terrain.cols());
    println!("  Can jump: {}", percept.can_jump);
    println!();
    println!("Logged Action: {} (source: {})", entry.action, entry.source.as_str());
    println!();

    print_candidates(percept, &config);

    println!("═══════════════════════════════════════════════════════════");
    println!("Search Outcome");
    println!("═══════════════════════════════════════════════════════════");
    let search = GreedySearch::from_config(&config);
    match search.search(
        &percept.terrain,
        &percept.hazards,
        percept.ego_row,
        percept.ego_col,
        percept.can_jump,
    ) {
        Ok(outcome) => {
            println!("Chosen: {}", outcome.action);
            println!(
                "  First step: h={} f={}",
                outcome.first_step.heuristic,
                outcome.first_step.f_cost()
            );
            println!(
                "  Leaf: depth={} distance={} f={}",
                outcome.leaf.path_cost,
                outcome.leaf.distance_covered,
                outcome.leaf.f_cost()
            );
            println!(
                "  Expansions: {}  Nodes: {}  Frontier peak: {}",
                outcome.expansions, outcome.nodes_created, outcome.frontier_high_water
            );
        }
        Err(e) => println!("Search failed: {}", e),
    }
}

/// Prints the one-step score of every candidate from the root
fn print_candidates(percept: &Percept, config: &Config) {
    println!("═══════════════════════════════════════════════════════════");
    println!("Candidate Breakdown (one step from the root)");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    let snapshot = match Snapshot::new(
        &percept.terrain,
        &percept.hazards,
        percept.ego_row,
        percept.ego_col,
    ) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            println!("Snapshot rejected: {}", e);
            println!();
            return;
        }
    };

    let params = &config.search;
    if let Err(e) = params.validate() {
        println!("Search parameters rejected: {}", e);
        println!();
        return;
    }

    for action in candidate_actions(percept.can_jump, params.generate_left) {
        let distance = step_distance(&action, params);
        let base = params.horizon - distance;
        println!("{}", action.to_string().to_uppercase());
        println!("  Step distance: {}", distance);
        println!("  Probes: {:?}", params.probes.pattern_for(&action));
        match danger_heuristic(&action, distance, &snapshot, params) {
            Ok(h) => {
                let verdict = if h == base { "clear" } else { "DANGER" };
                println!("  Footprint: {}", verdict);
                println!("  h = {}  f = {}", h, 1 + h);
            }
            Err(e) => println!("  Probe failed: {}", e),
        }
        println!();
    }
}
