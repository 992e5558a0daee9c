//! Greedy Search Scenario Tests
//!
//! End-to-end checks of the lookahead search through the public API:
//! expected winners on hand-built worlds, bounds handling, the expansion
//! cap, and properties that must hold on arbitrary grids.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use scroller_agent::config::{Config, OutOfBoundsPolicy, SearchConfig};
use scroller_agent::error::SearchError;
use scroller_agent::search::{candidate_actions, GreedySearch};
use scroller_agent::types::{Action, Grid, Key};

const EGO_ROW: i32 = 3;
const EGO_COL: i32 = 2;

fn right() -> Action {
    Action::none().with(Key::Right)
}

fn sprint_right() -> Action {
    right().with(Key::Sprint)
}

fn sprint_jump_right() -> Action {
    sprint_right().with(Key::Jump)
}

fn default_search() -> GreedySearch {
    GreedySearch::from_config(&Config::default_hardcoded())
}

fn search_with(tweak: impl FnOnce(&mut SearchConfig)) -> GreedySearch {
    let mut params = Config::default_hardcoded().search;
    tweak(&mut params);
    GreedySearch::new(params)
}

/// Random world of the given size, roughly `density` of cells occupied
fn random_grid(rng: &mut StdRng, rows: usize, cols: usize, density: f64) -> Grid {
    let mut grid = Grid::empty(rows, cols);
    for row in 0..rows {
        for col in 0..cols {
            if rng.random_bool(density) {
                grid.set(row, col, 1);
            }
        }
    }
    grid
}

#[test]
fn test_open_field_prefers_sprint_jump() {
    let clear = Grid::empty(8, 8);
    let outcome = default_search()
        .search(&clear, &clear, EGO_ROW, EGO_COL, true)
        .expect("search should succeed on an open field");

    assert_eq!(outcome.action, sprint_jump_right());
    assert_eq!(outcome.expansions, 4);
    assert_eq!(outcome.leaf.distance_covered, 12);
    assert_eq!(outcome.leaf.path_cost, 4);
    assert_eq!(outcome.first_step.heuristic, 8);
    assert_eq!(outcome.first_step.f_cost(), 9);
}

#[test]
fn test_grounded_agent_sprints() {
    let clear = Grid::empty(8, 8);
    let outcome = default_search()
        .search(&clear, &clear, EGO_ROW, EGO_COL, false)
        .expect("search should succeed without jumps");

    assert_eq!(outcome.action, sprint_right());
    assert_eq!(outcome.expansions, 6);
    assert_eq!(outcome.nodes_created, 13);
}

#[test]
fn test_hazard_in_stride_is_penalised() {
    let terrain = Grid::empty(8, 8);
    let mut hazards = Grid::empty(8, 8);
    hazards.set(3, 3, 1);

    let outcome = default_search()
        .search(&terrain, &hazards, EGO_ROW, EGO_COL, false)
        .expect("search should succeed");

    // Both grounded candidates probe (0, 1); sprint still wins on distance
    assert_eq!(outcome.action, sprint_right());
    assert_eq!(outcome.first_step.heuristic, 11 - 2 - 100);
}

#[test]
fn test_negative_penalty_steers_away_from_hazard() {
    let terrain = Grid::empty(8, 8);
    let mut hazards = Grid::empty(8, 8);
    hazards.set(3, 4, 1);

    let outcome = search_with(|p| p.danger_penalty = -100)
        .search(&terrain, &hazards, EGO_ROW, EGO_COL, false)
        .expect("search should succeed");

    // Only the sprint footprint reaches (0, 2)
    assert_eq!(outcome.action, right());
    assert_eq!(outcome.first_step.heuristic, 10);
}

#[test]
fn test_uniform_hazards_keep_open_field_choice() {
    let terrain = Grid::empty(8, 8);
    let mut hazards = Grid::empty(8, 8);
    hazards.fill(1);

    let outcome = default_search()
        .search(&terrain, &hazards, EGO_ROW, EGO_COL, true)
        .expect("search should succeed");

    assert_eq!(outcome.action, sprint_jump_right());
    assert_eq!(outcome.first_step.heuristic, 11 - 3 - 100);
}

#[test]
fn test_off_grid_probes_read_clear_by_default() {
    let clear = Grid::empty(5, 5);
    let outcome = default_search()
        .search(&clear, &clear, 2, 2, true)
        .expect("off-grid probes should not fail under the clear policy");

    assert_eq!(outcome.action, sprint_jump_right());
}

#[test]
fn test_off_grid_probes_fail_under_strict_policy() {
    let clear = Grid::empty(5, 5);
    let result = search_with(|p| p.out_of_bounds = OutOfBoundsPolicy::Error)
        .search(&clear, &clear, 2, 2, true);

    // Jump-right's third probe lands one row below the grid
    assert_eq!(result, Err(SearchError::OutOfBounds { row: 5, col: 3 }));
}

#[test]
fn test_expansion_cap_is_reported() {
    let clear = Grid::empty(8, 8);
    let result = search_with(|p| p.max_expansions = 1)
        .search(&clear, &clear, EGO_ROW, EGO_COL, true);

    assert_eq!(result, Err(SearchError::SearchExhausted { expansions: 1 }));
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let search = default_search();
    let clear = Grid::empty(6, 6);

    let negative = search.search(&clear, &clear, -1, 2, true);
    assert!(matches!(negative, Err(SearchError::InvalidInput { .. })));

    let outside = search.search(&clear, &clear, 2, 6, true);
    assert!(matches!(outside, Err(SearchError::InvalidInput { .. })));

    let narrow = Grid::empty(6, 5);
    let mismatched = search.search(&clear, &narrow, 2, 2, true);
    assert!(matches!(mismatched, Err(SearchError::InvalidInput { .. })));

    let ragged = Grid::new(vec![vec![0; 6], vec![0; 4]]);
    let result = search.search(&ragged, &ragged, 0, 0, true);
    assert!(matches!(result, Err(SearchError::InvalidInput { .. })));

    let empty = Grid::new(Vec::new());
    let result = search.search(&empty, &empty, 0, 0, true);
    assert!(matches!(result, Err(SearchError::InvalidInput { .. })));
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let clear = Grid::empty(6, 6);
    let result = search_with(|p| p.horizon = 0).search(&clear, &clear, 2, 2, true);
    assert!(matches!(result, Err(SearchError::InvalidInput { .. })));

    let result = search_with(|p| p.max_expansions = 0).search(&clear, &clear, 2, 2, true);
    assert!(matches!(result, Err(SearchError::InvalidInput { .. })));
}

#[test]
fn test_extreme_penalty_is_reported_not_panicking() {
    let terrain = Grid::empty(6, 6);
    let mut hazards = Grid::empty(6, 6);
    hazards.set(2, 3, 1);

    let result = search_with(|p| p.danger_penalty = i32::MIN)
        .choose_action(&terrain, &hazards, 2, 2, false);
    assert!(matches!(result, Err(SearchError::InvalidInput { .. })));
}

#[test]
fn test_jumping_never_needs_more_expansions() {
    let mut rng = StdRng::seed_from_u64(7);
    let search = default_search();

    for _ in 0..50 {
        let rows = rng.random_range(4..16);
        let cols = rng.random_range(4..16);
        let clear = Grid::empty(rows, cols);
        let row = rng.random_range(0..rows as i32);
        let col = rng.random_range(0..cols as i32);

        let with_jump = search
            .search(&clear, &clear, row, col, true)
            .expect("search should succeed");
        let without_jump = search
            .search(&clear, &clear, row, col, false)
            .expect("search should succeed");

        assert!(
            with_jump.expansions <= without_jump.expansions,
            "jump-enabled search took {} expansions, grounded took {}",
            with_jump.expansions,
            without_jump.expansions
        );
    }
}

#[test]
fn test_random_worlds_yield_consistent_outcomes() {
    let mut rng = StdRng::seed_from_u64(2026);
    let search = default_search();

    for _ in 0..100 {
        let rows = rng.random_range(3..16);
        let cols = rng.random_range(3..16);
        let terrain = random_grid(&mut rng, rows, cols, 0.4);
        let hazards = random_grid(&mut rng, rows, cols, 0.2);
        let row = rng.random_range(0..rows as i32);
        let col = rng.random_range(0..cols as i32);
        let can_jump = rng.random_bool(0.5);

        let first = search
            .search(&terrain, &hazards, row, col, can_jump)
            .expect("search should succeed");
        let second = search
            .search(&terrain, &hazards, row, col, can_jump)
            .expect("search should succeed");

        assert_eq!(first, second, "search must be deterministic");
        assert!(candidate_actions(can_jump, false).contains(&first.action));
        assert!(first.action.is_pressed(Key::Right));
        assert!(can_jump || !first.action.is_pressed(Key::Jump));
        assert_eq!(first.first_step.path_cost, 1);
        assert!(first.leaf.distance_covered >= 11);
        assert!(first.expansions >= 1);
    }
}

#[test]
fn test_choose_action_matches_search() {
    let clear = Grid::empty(8, 8);
    let search = default_search();

    let action = search
        .choose_action(&clear, &clear, EGO_ROW, EGO_COL, true)
        .expect("search should succeed");
    let outcome = search
        .search(&clear, &clear, EGO_ROW, EGO_COL, true)
        .expect("search should succeed");

    assert_eq!(action, outcome.action);
}
