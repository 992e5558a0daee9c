// Configuration module for reading Agent.toml
// All tunable search, reflex and logging parameters live here

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::SearchError;
use crate::types::{Action, Key};

/// A probe offset as `[row offset, col offset]` from the agent cell
pub type Offset = [i32; 2];

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub search: SearchConfig,
    pub reflex: ReflexConfig,
    pub debug: DebugConfig,
}

/// Parameters of the greedy lookahead search
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    pub horizon: i32,
    pub danger_penalty: i32,
    pub max_expansions: u64,
    pub mirror_left_distance: bool,
    pub generate_left: bool,
    pub out_of_bounds: OutOfBoundsPolicy,
    pub probes: ProbeConfig,
}

impl SearchConfig {
    /// Largest accepted `horizon` and `|danger_penalty|`
    pub const MAX_SCORE_PARAM: i32 = 1_000_000;
    /// Largest accepted `max_expansions`
    ///
    /// Depth and distance grow by at most 1 and 3 per expansion, so with the
    /// bounds above every f-cost stays well inside `i32`.
    pub const MAX_EXPANSIONS: u64 = 10_000_000;

    /// Rejects parameter sets the search cannot run with
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.horizon <= 0 || self.horizon > Self::MAX_SCORE_PARAM {
            return Err(SearchError::invalid(format!(
                "horizon must be in 1..={}, got {}",
                Self::MAX_SCORE_PARAM,
                self.horizon
            )));
        }
        if self.danger_penalty.unsigned_abs() > Self::MAX_SCORE_PARAM.unsigned_abs() {
            return Err(SearchError::invalid(format!(
                "danger_penalty must be within ±{}, got {}",
                Self::MAX_SCORE_PARAM,
                self.danger_penalty
            )));
        }
        if self.max_expansions == 0 || self.max_expansions > Self::MAX_EXPANSIONS {
            return Err(SearchError::invalid(format!(
                "max_expansions must be in 1..={}, got {}",
                Self::MAX_EXPANSIONS,
                self.max_expansions
            )));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Config::default_hardcoded().search
    }
}

/// What a probe that leaves the grid means
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutOfBoundsPolicy {
    /// Off-grid cells hold no danger
    Clear,
    /// Off-grid probes fail the call with `SearchError::OutOfBounds`
    Error,
}

/// Danger probe footprints, one per movement type
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProbeConfig {
    pub sprint_jump: Vec<Offset>,
    pub jump: Vec<Offset>,
    pub sprint: Vec<Offset>,
    pub walk: Vec<Offset>,
}

impl ProbeConfig {
    /// Selects the footprint matching the action's jump/sprint flags
    pub fn pattern_for(&self, action: &Action) -> &[Offset] {
        match (action.is_pressed(Key::Jump), action.is_pressed(Key::Sprint)) {
            (true, true) => &self.sprint_jump,
            (true, false) => &self.jump,
            (false, true) => &self.sprint,
            (false, false) => &self.walk,
        }
    }
}

/// Per-tick reflex checks run before any search
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReflexConfig {
    pub enemy_probes: Vec<Offset>,
    pub gap_probes: Vec<Offset>,
    pub wall_probes: Vec<Offset>,
    pub jump_hold_ticks: u32,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Agent.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Agent.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Agent.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Agent.toml
    pub fn default_hardcoded() -> Self {
        Config {
            search: SearchConfig {
                horizon: 11,
                danger_penalty: 100,
                max_expansions: 10_000,
                mirror_left_distance: true,
                generate_left: false,
                out_of_bounds: OutOfBoundsPolicy::Clear,
                probes: ProbeConfig {
                    sprint_jump: vec![[1, 1], [2, 1], [3, 1], [4, 1], [4, 2]],
                    jump: vec![[1, 1], [2, 1], [3, 1], [3, 2]],
                    sprint: vec![[0, 1], [0, 2]],
                    walk: vec![[0, 1]],
                },
            },
            reflex: ReflexConfig {
                enemy_probes: vec![[0, 2], [0, 1], [1, 1]],
                gap_probes: vec![[2, 1], [1, 1]],
                wall_probes: vec![[0, 1], [0, 2]],
                jump_hold_ticks: 15,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "agent_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!(
                "Could not load Agent.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}
