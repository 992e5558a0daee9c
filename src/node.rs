//! Search nodes, their arena, and the danger-aware heuristic.
//!
//! Nodes are immutable once built and refer to their parent by [`NodeId`]
//! handle, so a winning leaf can be walked back to the root without the tree
//! ever enumerating children.

use log::trace;

use crate::config::{OutOfBoundsPolicy, SearchConfig};
use crate::error::SearchError;
use crate::types::{Action, Key, Snapshot};

/// Stable handle into a [`NodeArena`]. Handles are issued in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// One candidate action in the lookahead tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionNode {
    pub id: NodeId,
    /// `None` only for the root.
    pub parent: Option<NodeId>,
    pub action: Action,
    /// Edges from the root.
    pub path_cost: i32,
    /// Cumulative estimated forward progress; negative steps are possible.
    pub distance_covered: i32,
    pub heuristic: i32,
}

impl ActionNode {
    /// The synthetic no-op state every search starts from.
    #[must_use]
    pub fn root(id: NodeId) -> Self {
        Self {
            id,
            parent: None,
            action: Action::none(),
            path_cost: 0,
            distance_covered: 0,
            heuristic: 0,
        }
    }

    /// Builds the node reached by taking `action` after `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::OutOfBounds`] when a probe leaves the grid and
    /// the policy is [`OutOfBoundsPolicy::Error`].
    pub fn child(
        id: NodeId,
        action: Action,
        parent: &ActionNode,
        snapshot: &Snapshot<'_>,
        params: &SearchConfig,
    ) -> Result<Self, SearchError> {
        let distance_covered = parent.distance_covered + step_distance(&action, params);
        let heuristic = danger_heuristic(&action, distance_covered, snapshot, params)?;
        Ok(Self {
            id,
            parent: Some(parent.id),
            action,
            path_cost: parent.path_cost + 1,
            distance_covered,
            heuristic,
        })
    }

    /// `f = g + h`, the frontier ordering key.
    #[must_use]
    pub fn f_cost(&self) -> i32 {
        self.path_cost.saturating_add(self.heuristic)
    }
}

/// Estimated cells gained by one action: 1, plus 1 for sprint, plus 1 for
/// jump. Negated for leftward actions when `mirror_left_distance` is set.
#[must_use]
pub fn step_distance(action: &Action, params: &SearchConfig) -> i32 {
    let mut distance = 1;
    if action.is_pressed(Key::Sprint) {
        distance += 1;
    }
    if action.is_pressed(Key::Jump) {
        distance += 1;
    }
    if params.mirror_left_distance && action.is_pressed(Key::Left) {
        distance = -distance;
    }
    distance
}

/// `horizon - distance_covered`, minus `danger_penalty` if any cell in the
/// action's probe footprint holds terrain or a hazard.
///
/// # Errors
///
/// Returns [`SearchError::OutOfBounds`] for an off-grid probe under
/// [`OutOfBoundsPolicy::Error`].
pub fn danger_heuristic(
    action: &Action,
    distance_covered: i32,
    snapshot: &Snapshot<'_>,
    params: &SearchConfig,
) -> Result<i32, SearchError> {
    let base = params.horizon - distance_covered;
    if finds_danger(action, snapshot, params)? {
        return Ok(base - params.danger_penalty);
    }
    Ok(base)
}

/// Walks the probe footprint and stops at the first occupied cell.
fn finds_danger(
    action: &Action,
    snapshot: &Snapshot<'_>,
    params: &SearchConfig,
) -> Result<bool, SearchError> {
    let direction: i64 = if action.is_pressed(Key::Left) { -1 } else { 1 };

    for &[d_row, d_col] in params.probes.pattern_for(action) {
        let d_row = i64::from(d_row) * direction;
        let d_col = i64::from(d_col) * direction;
        match snapshot.occupied(d_row, d_col) {
            Some(true) => return Ok(true),
            Some(false) => {}
            None => match params.out_of_bounds {
                OutOfBoundsPolicy::Clear => {
                    trace!("probe ({d_row}, {d_col}) off grid, treated as clear");
                }
                OutOfBoundsPolicy::Error => {
                    return Err(SearchError::OutOfBounds {
                        row: snapshot.ego_row as i64 + d_row,
                        col: snapshot.ego_col as i64 + d_col,
                    });
                }
            },
        }
    }
    Ok(false)
}

/// Owns every node created during one search call.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<ActionNode>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    pub fn push_root(&mut self) -> NodeId {
        let id = self.next_id();
        self.nodes.push(ActionNode::root(id));
        id
    }

    /// Scores and stores the child of `parent` reached by `action`.
    ///
    /// # Errors
    ///
    /// Propagates probe errors from [`ActionNode::child`].
    pub fn push_child(
        &mut self,
        action: Action,
        parent: NodeId,
        snapshot: &Snapshot<'_>,
        params: &SearchConfig,
    ) -> Result<NodeId, SearchError> {
        let id = self.next_id();
        let node = ActionNode::child(id, action, &self.nodes[parent.0], snapshot, params)?;
        self.nodes.push(node);
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &ActionNode {
        &self.nodes[id.0]
    }

    /// The root's immediate child on the path to `leaf`, or `None` if `leaf`
    /// is the root itself.
    #[must_use]
    pub fn first_step(&self, leaf: NodeId) -> Option<NodeId> {
        let mut current = leaf;
        let mut last_child = None;
        while let Some(parent) = self.get(current).parent {
            last_child = Some(current);
            current = parent;
        }
        last_child
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The frontier ordering key: `(f_cost, path_cost, id)`.
///
/// Lower `f_cost` first, then shallower nodes, then older nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierKey {
    pub f_cost: i32,
    pub path_cost: i32,
    pub id: NodeId,
}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            .then(self.path_cost.cmp(&other.path_cost))
            .then(self.id.cmp(&other.id))
    }
}

impl From<&ActionNode> for FrontierKey {
    fn from(node: &ActionNode) -> Self {
        Self {
            f_cost: node.f_cost(),
            path_cost: node.path_cost,
            id: node.id,
        }
    }
}
