// Observation and control types shared by the search core, the agent and the adapter
//
// Grids arrive row-major with the agent cell supplied separately. Actions are a
// fixed vector of independent key flags; on the wire they travel as a list of
// pressed key names so logs stay readable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

/// Control keys understood by the host runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Down,
    Jump,
    Sprint,
    Up,
}

impl Key {
    /// Number of keys in an action vector
    pub const COUNT: usize = 6;

    /// Returns all keys in flag-vector order
    pub fn all() -> [Key; Key::COUNT] {
        [
            Key::Left,
            Key::Right,
            Key::Down,
            Key::Jump,
            Key::Sprint,
            Key::Up,
        ]
    }

    /// Position of this key in the flag vector
    pub fn index(self) -> usize {
        match self {
            Key::Left => 0,
            Key::Right => 1,
            Key::Down => 2,
            Key::Jump => 3,
            Key::Sprint => 4,
            Key::Up => 5,
        }
    }

    /// Converts key to its wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Left => "left",
            Key::Right => "right",
            Key::Down => "down",
            Key::Jump => "jump",
            Key::Sprint => "sprint",
            Key::Up => "up",
        }
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            "down" => Ok(Key::Down),
            "jump" => Ok(Key::Jump),
            "sprint" | "speed" => Ok(Key::Sprint),
            "up" => Ok(Key::Up),
            _ => Err(format!("Invalid key: {}", s)),
        }
    }
}

/// One tick's worth of key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Key>", from = "Vec<Key>")]
pub struct Action {
    flags: [bool; Key::COUNT],
}

impl Action {
    /// No keys pressed; only the search root carries this
    pub fn none() -> Self {
        Action::default()
    }

    /// Right + sprint, the agent's default gait
    pub fn cruise() -> Self {
        Action::none().with(Key::Right).with(Key::Sprint)
    }

    pub fn from_flags(flags: [bool; Key::COUNT]) -> Self {
        Action { flags }
    }

    /// Returns a copy with `key` pressed
    pub fn with(mut self, key: Key) -> Self {
        self.flags[key.index()] = true;
        self
    }

    /// Returns a copy with `key` released
    pub fn without(mut self, key: Key) -> Self {
        self.flags[key.index()] = false;
        self
    }

    pub fn set(&mut self, key: Key, pressed: bool) {
        self.flags[key.index()] = pressed;
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.flags[key.index()]
    }

    pub fn is_none(&self) -> bool {
        self.flags.iter().all(|&f| !f)
    }

    /// Pressed keys in flag-vector order
    pub fn pressed(&self) -> Vec<Key> {
        Key::all()
            .iter()
            .copied()
            .filter(|&k| self.is_pressed(k))
            .collect()
    }

    pub fn flags(&self) -> [bool; Key::COUNT] {
        self.flags
    }

    /// Mirrors the horizontal direction of this action
    pub fn mirrored(self) -> Self {
        let left = self.is_pressed(Key::Left);
        let right = self.is_pressed(Key::Right);
        let mut out = self;
        out.set(Key::Left, right);
        out.set(Key::Right, left);
        out
    }
}

impl From<Action> for Vec<Key> {
    fn from(action: Action) -> Self {
        action.pressed()
    }
}

impl From<Vec<Key>> for Action {
    fn from(keys: Vec<Key>) -> Self {
        keys.into_iter().fold(Action::none(), |a, k| a.with(k))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self.pressed().iter().map(|k| k.as_str()).collect();
        write!(f, "{}", names.join("+"))
    }
}

impl FromStr for Action {
    type Err = String;

    /// Parses `right+sprint` style strings; `none` is the empty action
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty action".to_string());
        }
        if s.eq_ignore_ascii_case("none") {
            return Ok(Action::none());
        }
        s.split('+')
            .map(Key::from_str)
            .collect::<Result<Vec<Key>, String>>()
            .map(Action::from)
    }
}

/// Row-major grid of small cell codes (0 = empty)
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Grid {
    cells: Vec<Vec<i8>>,
}

impl Grid {
    pub fn new(cells: Vec<Vec<i8>>) -> Self {
        Grid { cells }
    }

    /// All-zero grid
    pub fn empty(rows: usize, cols: usize) -> Self {
        Grid {
            cells: vec![vec![0; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Width of the first row; see `is_rectangular`
    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, |r| r.len())
    }

    pub fn is_rectangular(&self) -> bool {
        let cols = self.cols();
        self.cells.iter().all(|r| r.len() == cols)
    }

    /// Cell value, or `None` when (row, col) lies off the grid
    pub fn cell(&self, row: i64, col: i64) -> Option<i8> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    /// Writes a cell; returns false when (row, col) lies off the grid
    pub fn set(&mut self, row: usize, col: usize, value: i8) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Fills every cell with `value`
    pub fn fill(&mut self, value: i8) {
        for row in &mut self.cells {
            for cell in row.iter_mut() {
                *cell = value;
            }
        }
    }
}

/// What the host hands the agent each tick
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Percept {
    pub terrain: Grid,
    pub hazards: Grid,
    pub ego_row: i32,
    pub ego_col: i32,
    pub can_jump: bool,
}

/// Validated, borrowed view of one tick's grids
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub terrain: &'a Grid,
    pub hazards: &'a Grid,
    pub ego_row: usize,
    pub ego_col: usize,
}

impl<'a> Snapshot<'a> {
    /// Checks shapes and the ego cell before any probing happens
    pub fn new(
        terrain: &'a Grid,
        hazards: &'a Grid,
        ego_row: i32,
        ego_col: i32,
    ) -> Result<Self, SearchError> {
        if terrain.rows() == 0 || terrain.cols() == 0 {
            return Err(SearchError::invalid("terrain grid is empty"));
        }
        if !terrain.is_rectangular() || !hazards.is_rectangular() {
            return Err(SearchError::invalid("grid rows have uneven lengths"));
        }
        if terrain.rows() != hazards.rows() || terrain.cols() != hazards.cols() {
            return Err(SearchError::invalid(format!(
                "terrain is {}x{} but hazards is {}x{}",
                terrain.rows(),
                terrain.cols(),
                hazards.rows(),
                hazards.cols()
            )));
        }
        if ego_row < 0 || ego_col < 0 {
            return Err(SearchError::invalid(format!(
                "negative ego position ({}, {})",
                ego_row, ego_col
            )));
        }
        let (row, col) = (ego_row as usize, ego_col as usize);
        if row >= terrain.rows() || col >= terrain.cols() {
            return Err(SearchError::invalid(format!(
                "ego position ({}, {}) outside {}x{} grid",
                row,
                col,
                terrain.rows(),
                terrain.cols()
            )));
        }

        Ok(Snapshot {
            terrain,
            hazards,
            ego_row: row,
            ego_col: col,
        })
    }

    /// Whether the cell at the given offset from the agent is occupied.
    ///
    /// Returns `None` when the offset leaves the grid.
    pub fn occupied(&self, d_row: i64, d_col: i64) -> Option<bool> {
        let row = self.ego_row as i64 + d_row;
        let col = self.ego_col as i64 + d_col;
        let hazard = self.hazards.cell(row, col)?;
        let terrain = self.terrain.cell(row, col)?;
        Some(hazard != 0 || terrain != 0)
    }
}
