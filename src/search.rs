//! Greedy best-first lookahead over a single grid snapshot.
//!
//! Every call builds a fresh arena and frontier, expands the best node until
//! the best remaining node has covered the horizon, then commits to the first
//! action on the winning path. Position is never re-simulated between
//! expansions: every child is probed from the one real ego cell, so depth
//! accumulates estimated distance rather than real movement.

use log::debug;

use crate::config::{Config, SearchConfig};
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::node::{ActionNode, NodeArena};
use crate::types::{Action, Grid, Key, Snapshot};

/// Everything a finished search knows about its decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// The action to take this tick
    pub action: Action,
    /// The root's child on the winning path
    pub first_step: ActionNode,
    /// The node that satisfied the horizon
    pub leaf: ActionNode,
    pub expansions: u64,
    pub nodes_created: usize,
    pub frontier_high_water: usize,
}

/// Children generated for every expanded node, in insertion order:
/// right, jump-right, sprint-right, sprint-jump-right (jumps only when
/// `can_jump`), followed by their leftward mirrors when `generate_left`.
#[must_use]
pub fn candidate_actions(can_jump: bool, generate_left: bool) -> Vec<Action> {
    let walk = Action::none().with(Key::Right);
    let sprint = walk.with(Key::Sprint);

    let mut candidates = vec![walk];
    if can_jump {
        candidates.push(walk.with(Key::Jump));
    }
    candidates.push(sprint);
    if can_jump {
        candidates.push(sprint.with(Key::Jump));
    }

    if generate_left {
        let mirrored: Vec<Action> = candidates.iter().map(|a| a.mirrored()).collect();
        candidates.extend(mirrored);
    }
    candidates
}

/// Stateless decision engine; one per agent
#[derive(Debug, Clone)]
pub struct GreedySearch {
    params: SearchConfig,
}

impl GreedySearch {
    pub fn new(params: SearchConfig) -> Self {
        GreedySearch { params }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.search.clone())
    }

    pub fn params(&self) -> &SearchConfig {
        &self.params
    }

    /// Picks the action to take now.
    ///
    /// # Errors
    ///
    /// See [`GreedySearch::search`].
    pub fn choose_action(
        &self,
        terrain: &Grid,
        hazards: &Grid,
        ego_row: i32,
        ego_col: i32,
        can_jump: bool,
    ) -> Result<Action, SearchError> {
        self.search(terrain, hazards, ego_row, ego_col, can_jump)
            .map(|outcome| outcome.action)
    }

    /// Runs the full search and returns the decision with its diagnostics.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidInput`] for malformed grids, a bad ego cell or
    ///   unusable parameters.
    /// - [`SearchError::OutOfBounds`] for an off-grid probe under the `error`
    ///   policy.
    /// - [`SearchError::SearchExhausted`] when `max_expansions` runs out.
    pub fn search(
        &self,
        terrain: &Grid,
        hazards: &Grid,
        ego_row: i32,
        ego_col: i32,
        can_jump: bool,
    ) -> Result<SearchOutcome, SearchError> {
        self.params.validate()?;
        let snapshot = Snapshot::new(terrain, hazards, ego_row, ego_col)?;
        let candidates = candidate_actions(can_jump, self.params.generate_left);

        let mut arena = NodeArena::new();
        let mut frontier = Frontier::new();
        let root = arena.push_root();
        frontier.push(arena.get(root));

        let mut expansions: u64 = 0;
        loop {
            if expansions >= self.params.max_expansions {
                debug!(
                    "search hit the expansion cap ({}) with {} nodes queued",
                    expansions,
                    frontier.len()
                );
                return Err(SearchError::SearchExhausted { expansions });
            }

            let best = frontier
                .pop()
                .ok_or(SearchError::SearchExhausted { expansions })?;
            for &action in &candidates {
                let child = arena.push_child(action, best, &snapshot, &self.params)?;
                frontier.push(arena.get(child));
            }
            expansions += 1;

            let next = frontier
                .peek()
                .ok_or(SearchError::SearchExhausted { expansions })?;
            if arena.get(next).distance_covered >= self.params.horizon {
                break;
            }
        }

        let leaf = frontier
            .pop()
            .ok_or(SearchError::SearchExhausted { expansions })?;
        // The root is expanded before any horizon check, so the leaf always has a parent
        let first = arena
            .first_step(leaf)
            .ok_or(SearchError::SearchExhausted { expansions })?;

        let outcome = SearchOutcome {
            action: arena.get(first).action,
            first_step: arena.get(first).clone(),
            leaf: arena.get(leaf).clone(),
            expansions,
            nodes_created: arena.len(),
            frontier_high_water: frontier.high_water(),
        };

        debug!(
            "chose {} (h={}, leaf depth={}, leaf distance={}, expansions={}, nodes={})",
            outcome.action,
            outcome.first_step.heuristic,
            outcome.leaf.path_cost,
            outcome.leaf.distance_covered,
            outcome.expansions,
            outcome.nodes_created
        );

        Ok(outcome)
    }
}

impl Default for GreedySearch {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}
