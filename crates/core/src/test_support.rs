//! Shared fixtures for engine, journal, and replay unit tests.
//! Every fixture uses unit-diameter cells and a rate of ten potential per second,
//! so `tick(1.0)` is exactly one orthogonal step.

use crate::config::PerimeterConfig;
use crate::engine::PerimeterEngine;
use crate::grid::WalkableGrid;
use crate::pool::PerimeterPool;
use crate::types::WorldPos;

pub(crate) const NODE_RADIUS: f32 = 0.5;

pub(crate) fn test_config() -> PerimeterConfig {
    PerimeterConfig {
        node_radius: NODE_RADIUS,
        target_radius: NODE_RADIUS,
        target_speed: 10.0,
        seed: 7,
        ..PerimeterConfig::default()
    }
}

pub(crate) fn engine_on(grid: WalkableGrid) -> PerimeterEngine<WalkableGrid> {
    engine_with(test_config(), grid)
}

pub(crate) fn engine_with(
    config: PerimeterConfig,
    grid: WalkableGrid,
) -> PerimeterEngine<WalkableGrid> {
    let pool = PerimeterPool::new(&config.pool);
    PerimeterEngine::new(config, grid, pool).expect("fixture config is valid")
}

/// 9x9 open field with the origin in the middle cell.
pub(crate) fn open_field_fixture() -> (WalkableGrid, WorldPos) {
    let grid = WalkableGrid::open(9, 9, NODE_RADIUS);
    let origin = grid.cell_center(4, 4);
    (grid, origin)
}

/// Started engine on the open field.
pub(crate) fn started_open_field() -> PerimeterEngine<WalkableGrid> {
    let (grid, origin) = open_field_fixture();
    let mut engine = engine_on(grid);
    engine.start(origin).expect("open field origin is walkable");
    engine
}

/// 3x3 walkable room inside a one-cell wall, origin in the middle.
pub(crate) fn walled_room_fixture() -> (WalkableGrid, WorldPos) {
    let grid = WalkableGrid::from_rows(&["#####", "#...#", "#...#", "#...#", "#####"], NODE_RADIUS);
    let origin = grid.cell_center(2, 2);
    (grid, origin)
}

/// Single walkable cell surrounded by walls.
pub(crate) fn sealed_cell_fixture() -> (WalkableGrid, WorldPos) {
    let grid = WalkableGrid::from_rows(&["###", "#.#", "###"], NODE_RADIUS);
    let origin = grid.cell_center(1, 1);
    (grid, origin)
}

/// One-cell-wide corridor running east from the origin.
pub(crate) fn corridor_fixture() -> (WalkableGrid, WorldPos) {
    let grid = WalkableGrid::from_rows(&["#########", "#.......#", "#########"], NODE_RADIUS);
    let origin = grid.cell_center(1, 1);
    (grid, origin)
}

/// Ring of floor around a single pillar, origin in the bottom-left corner.
pub(crate) fn pillar_ring_fixture() -> (WalkableGrid, WorldPos) {
    let grid = WalkableGrid::from_rows(&["#####", "#...#", "#.#.#", "#...#", "#####"], NODE_RADIUS);
    let origin = grid.cell_center(1, 1);
    (grid, origin)
}
