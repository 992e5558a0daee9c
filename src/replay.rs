// Replay module for analyzing logged decisions and debugging the search
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Re-run the search on logged percepts
// 3. Compare logged vs replayed actions
// 4. Generate detailed analysis reports
//
// Only search-sourced ticks are compared: reflex and cruise ticks depend on the
// agent's jump timer, which the log does not capture.

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::agent::DecisionSource;
use crate::config::Config;
use crate::search::GreedySearch;
use crate::types::{Action, Percept};

/// Represents a single log entry from the debug JSONL file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub episode_id: String,
    pub tick: u64,
    pub percept: Percept,
    pub action: Action,
    pub source: DecisionSource,
    pub timestamp: String,
}

/// Result of replaying a single tick
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub tick: u64,
    pub source: DecisionSource,
    pub original_action: Action,
    /// `None` for ticks that were not decided by the search, or whose replay failed
    pub replayed_action: Option<Action>,
    pub matches: bool,
    pub expansions: u64,
    pub computation_time_us: u128,
    /// Why the replay of a search tick failed
    pub error: Option<String>,
}

impl ReplayResult {
    /// A search tick whose replay could not produce an action
    fn failed(entry: &LogEntry, error: String) -> Self {
        ReplayResult {
            tick: entry.tick,
            source: entry.source,
            original_action: entry.action,
            replayed_action: None,
            matches: false,
            expansions: 0,
            computation_time_us: 0,
            error: Some(error),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.replayed_action.is_none() && self.error.is_none()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Statistics for a complete replay session
#[derive(Debug, Default, PartialEq)]
pub struct ReplayStats {
    pub total_decisions: usize,
    pub matches: usize,
    pub mismatches: usize,
    /// Search ticks whose replay returned an error; counted in `total_decisions`
    pub failed: usize,
    pub skipped: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    search: GreedySearch,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            search: GreedySearch::from_config(&config),
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-runs the search on one logged percept
    /// Returns the chosen action, the expansion count and the time taken in microseconds
    pub fn replay_percept(&self, percept: &Percept) -> Result<(Action, u64, u128), String> {
        let start_time = Instant::now();
        let outcome = self
            .search
            .search(
                &percept.terrain,
                &percept.hazards,
                percept.ego_row,
                percept.ego_col,
                percept.can_jump,
            )
            .map_err(|e| format!("Search failed: {}", e))?;

        Ok((
            outcome.action,
            outcome.expansions,
            start_time.elapsed().as_micros(),
        ))
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if entry.source != DecisionSource::Search {
            return Ok(ReplayResult {
                tick: entry.tick,
                source: entry.source,
                original_action: entry.action,
                replayed_action: None,
                matches: false,
                expansions: 0,
                computation_time_us: 0,
                error: None,
            });
        }

        let (replayed, expansions, computation_time) = self.replay_percept(&entry.percept)?;
        let matches = replayed == entry.action;

        if self.verbose {
            if matches {
                info!(
                    "Tick {}: ✓ MATCH - {} (expansions: {}, time: {}us)",
                    entry.tick, replayed, expansions, computation_time
                );
            } else {
                warn!(
                    "Tick {}: ✗ MISMATCH - Original: {}, Replayed: {} (expansions: {}, time: {}us)",
                    entry.tick, entry.action, replayed, expansions, computation_time
                );
            }
        }

        Ok(ReplayResult {
            tick: entry.tick,
            source: entry.source,
            original_action: entry.action,
            replayed_action: Some(replayed),
            matches,
            expansions,
            computation_time_us: computation_time,
            error: None,
        })
    }

    /// Replays one entry, turning a replay error into a failed result
    fn replay_or_fail(&self, entry: &LogEntry) -> ReplayResult {
        self.replay_entry(entry).unwrap_or_else(|e| {
            warn!("Failed to replay tick {}: {}", entry.tick, e);
            ReplayResult::failed(entry, e)
        })
    }

    /// Replays all entries in a log file
    /// Entries are independent, so they are replayed in parallel; output keeps log order
    pub fn replay_all(&self, entries: &[LogEntry]) -> Result<Vec<ReplayResult>, String> {
        Ok(entries
            .par_iter()
            .map(|entry| self.replay_or_fail(entry))
            .collect())
    }

    /// Replays specific ticks from a log file
    pub fn replay_ticks(
        &self,
        entries: &[LogEntry],
        ticks: &[u64],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for tick in ticks {
            let entry = entries
                .iter()
                .find(|e| e.tick == *tick)
                .ok_or_else(|| format!("Tick {} not found in log file", tick))?;

            results.push(self.replay_or_fail(entry));
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let skipped = results.iter().filter(|r| r.is_skipped()).count();
        let failed = results.iter().filter(|r| r.is_failed()).count();
        let total_decisions = results.len() - skipped;
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_decisions - matches - failed;
        let match_rate = if total_decisions > 0 {
            (matches as f64 / total_decisions as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_decisions,
            matches,
            mismatches,
            failed,
            skipped,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Decisions: {}", stats.total_decisions);
        println!("Matches:         {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:      {}", stats.mismatches);
        println!("Failed:          {}", stats.failed);
        println!("Skipped:         {} (not search-sourced)", stats.skipped);
        println!("═══════════════════════════════════════════════════════════\n");

        let replayed: Vec<&ReplayResult> = results
            .iter()
            .filter(|r| r.replayed_action.is_some())
            .collect();
        if !replayed.is_empty() {
            let count = replayed.len() as f64;
            let avg_time: f64 =
                replayed.iter().map(|r| r.computation_time_us as f64).sum::<f64>() / count;
            let avg_expansions: f64 =
                replayed.iter().map(|r| r.expansions as f64).sum::<f64>() / count;

            println!("Average Expansions:         {:.1}", avg_expansions);
            println!("Average Computation Time:   {:.1}us\n", avg_time);
        }

        let mismatches: Vec<_> = replayed.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                let replayed_action = result
                    .replayed_action
                    .map(|a| a.to_string())
                    .unwrap_or_default();
                println!(
                    "Tick {}: {} → {} (expansions: {}, time: {}us)",
                    result.tick,
                    result.original_action,
                    replayed_action,
                    result.expansions,
                    result.computation_time_us
                );
            }
            println!();
        }

        let failures: Vec<&ReplayResult> = results.iter().filter(|r| r.is_failed()).collect();
        if !failures.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                   FAILED REPLAYS");
            println!("═══════════════════════════════════════════════════════════");

            for result in failures {
                println!(
                    "Tick {}: {} → {}",
                    result.tick,
                    result.original_action,
                    result.error.as_deref().unwrap_or_default()
                );
            }
            println!();
        }
    }

    /// Validates that specific expected actions were logged
    pub fn validate_expected_actions(
        &self,
        entries: &[LogEntry],
        expected: &[(u64, Vec<Action>)], // (tick, acceptable_actions)
    ) -> Result<(), String> {
        for (tick, acceptable) in expected {
            let entry = entries
                .iter()
                .find(|e| e.tick == *tick)
                .ok_or_else(|| format!("Tick {} not found in log", tick))?;

            if !acceptable.contains(&entry.action) {
                return Err(format!(
                    "Tick {}: Expected one of {:?}, but got {}",
                    tick,
                    acceptable.iter().map(|a| a.to_string()).collect::<Vec<_>>(),
                    entry.action
                ));
            }
        }

        Ok(())
    }
}
