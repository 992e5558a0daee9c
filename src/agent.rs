// Per-tick agent wrapped around the greedy search
//
// Cruises right at full speed, jumps on its own over gaps and walls, and only
// asks the search for a decision when a hazard is right ahead. A jump, once
// started, is held for a fixed number of ticks before the agent goes back to
// cruising.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{Config, Offset, ReflexConfig};
use crate::search::GreedySearch;
use crate::types::{Action, Grid, Key, Percept};

/// Which rule produced a tick's action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionSource {
    /// Lookahead search ran and its action was adopted
    Search,
    /// Gap or wall reflex forced a jump
    Reflex,
    /// Nothing triggered; the current action carries on
    Cruise,
    /// Search failed and the agent fell back to cruising
    Fallback,
}

impl DecisionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionSource::Search => "search",
            DecisionSource::Reflex => "reflex",
            DecisionSource::Cruise => "cruise",
            DecisionSource::Fallback => "fallback",
        }
    }
}

/// A tick's action plus the rule that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub source: DecisionSource,
}

/// One agent's control state across ticks
#[derive(Debug, Clone)]
pub struct Agent {
    search: GreedySearch,
    reflex: ReflexConfig,
    action: Action,
    jump_timer: u32,
    is_jumping: bool,
}

impl Agent {
    /// Creates a cruising agent from the given configuration
    pub fn new(config: &Config) -> Self {
        Agent {
            search: GreedySearch::from_config(config),
            reflex: config.reflex.clone(),
            action: Action::cruise(),
            jump_timer: 0,
            is_jumping: false,
        }
    }

    /// Drops any jump in progress and returns to cruising
    pub fn reset(&mut self) {
        self.action = Action::cruise();
        self.jump_timer = 0;
        self.is_jumping = false;
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn jump_timer(&self) -> u32 {
        self.jump_timer
    }

    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    pub fn search(&self) -> &GreedySearch {
        &self.search
    }

    /// Decides this tick's action
    ///
    /// # Arguments
    /// * `percept` - The grids and agent state supplied by the host this tick
    ///
    /// # Returns
    /// * `Decision` - The action to send plus the rule that chose it
    pub fn act(&mut self, percept: &Percept) -> Decision {
        let mut source = if self.hazard_ahead(percept) {
            match self.search.choose_action(
                &percept.terrain,
                &percept.hazards,
                percept.ego_row,
                percept.ego_col,
                percept.can_jump,
            ) {
                Ok(action) => {
                    self.action = action;
                    if action.is_pressed(Key::Jump) {
                        self.is_jumping = true;
                    }
                    DecisionSource::Search
                }
                Err(e) => {
                    warn!("Search failed ({}), falling back to cruise", e);
                    self.action = Action::cruise();
                    DecisionSource::Fallback
                }
            }
        } else if self.obstacle_ahead(percept) {
            // Slow down so the jump clears the obstacle
            self.action.set(Key::Jump, true);
            self.action.set(Key::Sprint, false);
            self.is_jumping = true;
            DecisionSource::Reflex
        } else {
            DecisionSource::Cruise
        };

        if self.is_jumping {
            self.jump_timer += 1;
        }

        if self.jump_timer > self.reflex.jump_hold_ticks {
            debug!("Jump held for {} ticks, back to cruise", self.jump_timer);
            self.reset();
            source = DecisionSource::Cruise;
        }

        Decision {
            action: self.action,
            source,
        }
    }

    fn hazard_ahead(&self, percept: &Percept) -> bool {
        any_cell(&percept.hazards, percept, &self.reflex.enemy_probes, |v| v != 0)
    }

    fn obstacle_ahead(&self, percept: &Percept) -> bool {
        any_cell(&percept.terrain, percept, &self.reflex.gap_probes, |v| v == 0)
            || any_cell(&percept.terrain, percept, &self.reflex.wall_probes, |v| v != 0)
    }
}

/// Whether any probed cell satisfies `test`; off-grid cells read as 0
fn any_cell(grid: &Grid, percept: &Percept, probes: &[Offset], test: impl Fn(i8) -> bool) -> bool {
    probes.iter().any(|&[d_row, d_col]| {
        let row = i64::from(percept.ego_row) + i64::from(d_row);
        let col = i64::from(percept.ego_col) + i64::from(d_col);
        test(grid.cell(row, col).unwrap_or(0))
    })
}
