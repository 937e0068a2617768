//! Tests for sensor-driven investigation and frontier pruning.

use super::support::*;

fn sensor(engine: &PerimeterEngine<WalkableGrid>, x: i32, y: i32) -> SensorId {
    engine.sensor_at(Cell { x, y }).expect("cell should carry a sensor")
}

#[test]
fn investigating_a_sealed_origin_leaves_no_sensors() {
    let (grid, origin) = sealed_cell_fixture();
    let mut engine = engine_on(grid);
    engine.start(origin).expect("sealed origin is walkable");
    assert_eq!(engine.sensor_count(), 1);

    assert!(engine.investigate(sensor(&engine, 0, 0)));

    assert_eq!(engine.sensor_count(), 0);
    assert!(engine.is_cleared(origin));
    assert_eq!(
        engine.events().last(),
        Some(&PerimeterEvent::NodeInvestigated { cell: Cell::ORIGIN })
    );
    assert_eq!(engine.verify_invariants(), Ok(()));
}

#[test]
fn a_second_investigation_changes_nothing() {
    let mut engine = started_open_field();
    engine.tick(1.0);
    let east = sensor(&engine, 1, 0);

    assert!(engine.investigate(east));
    let hash = engine.snapshot_hash();
    let events = engine.events().len();

    assert!(!engine.investigate(east));
    assert!(!engine.investigate_cell(Cell { x: 1, y: 0 }));
    assert_eq!(engine.snapshot_hash(), hash);
    assert_eq!(engine.events().len(), events);
}

#[test]
fn investigation_arms_unsearched_neighbors() {
    let mut engine = started_open_field();
    engine.tick(1.0);
    assert!(engine.sensor_at(Cell::ORIGIN).is_none());

    assert!(engine.investigate(sensor(&engine, 1, 0)));

    assert!(engine.sensor_at(Cell { x: 1, y: 0 }).is_none());
    assert!(engine.sensor_at(Cell::ORIGIN).is_some());
    assert_eq!(engine.sensor_count(), 4);
    assert_eq!(engine.verify_invariants(), Ok(()));
}

#[test]
fn pruning_keeps_only_sensors_that_border_searched_ground() {
    let mut engine = started_open_field();
    engine.tick(1.0);
    assert!(engine.investigate(sensor(&engine, 1, 0)));

    engine.tick(1.0);

    // North and south touch the searched east cell; west does not.
    assert!(engine.sensor_at(Cell { x: 0, y: 1 }).is_some());
    assert!(engine.sensor_at(Cell { x: 0, y: -1 }).is_some());
    assert!(engine.sensor_at(Cell { x: -1, y: 0 }).is_none());
    // Fresh frontier cells are always armed.
    assert!(engine.sensor_at(Cell { x: 0, y: 2 }).is_some());
    assert!(engine.sensor_at(Cell { x: 1, y: 1 }).is_some());
    assert_eq!(engine.verify_invariants(), Ok(()));
}

#[test]
fn searched_frontier_cells_block_growth() {
    let (grid, origin) = corridor_fixture();
    let mut engine = engine_on(grid);
    engine.start(origin).expect("corridor origin is walkable");
    engine.tick(1.0);
    assert!(engine.investigate(sensor(&engine, 1, 0)));

    engine.tick(5.0);

    assert_eq!(engine.node_count(), 2);
    assert_eq!(engine.state(), EngineState::Settled);
    assert!(engine.sensor_at(Cell::ORIGIN).is_some());
}

#[test]
fn stale_sensor_after_clear_is_ignored() {
    let mut engine = started_open_field();
    engine.tick(1.0);
    let east = sensor(&engine, 1, 0);

    engine.clear();

    assert!(!engine.investigate(east));
    assert_eq!(engine.node_count(), 0);
}

#[test]
fn sensors_go_stale_when_the_session_stops() {
    let mut engine = started_open_field();
    engine.tick(1.0);
    let north = sensor(&engine, 0, 1);

    engine.stop();

    assert!(!engine.investigate(north));
    assert_eq!(engine.sensor_count(), 0);
}

#[test]
fn sensors_never_sit_on_searched_nodes() {
    let mut engine = started_open_field();
    engine.tick(1.5);
    for cell in Cell::ORIGIN.all_neighbors() {
        engine.investigate_cell(cell);
        engine.tick(0.5);
        for (_, zone) in engine.sensors() {
            let node = engine.node(zone.node).expect("sensor bound to a live node");
            assert!(!node.searched);
            assert_eq!(zone.radius, 1.1);
        }
    }
    assert_eq!(engine.verify_invariants(), Ok(()));
}

#[test]
fn walls_and_searched_ground_retire_a_popped_sensor() {
    let (grid, origin) = pillar_ring_fixture();
    let mut engine = engine_on(grid);
    engine.start(origin).expect("ring origin is walkable");
    engine.tick(1.0);
    engine.tick(1.0);
    engine.tick(0.5);
    assert!(engine.investigate(sensor(&engine, 2, 1)));
    assert!(engine.investigate(sensor(&engine, 1, 0)));
    // The corner's only open neighbours are now searched; the rest is wall.
    assert!(engine.sensor_at(Cell { x: 2, y: 0 }).is_some());

    engine.tick(0.5);

    assert_eq!(engine.movement_potential(), 30.0);
    assert!(engine.sensor_at(Cell { x: 2, y: 0 }).is_none());
    // Popped alongside the corner, but nothing around it has been searched.
    assert!(engine.sensor_at(Cell { x: 0, y: 2 }).is_none());
    assert_eq!(engine.verify_invariants(), Ok(()));
}

#[test]
fn a_cell_ringed_by_eight_searched_nodes_is_enclosed() {
    let mut engine = started_open_field();
    engine.tick(3.0);
    let origin = engine.node_at(Cell::ORIGIN).expect("origin node");
    let last = Cell { x: 1, y: 1 };
    let square: Vec<Cell> = (-2..=2)
        .flat_map(|x| (-2..=2).map(move |y| Cell { x, y }))
        .filter(|cell| *cell != Cell::ORIGIN && *cell != last)
        .collect();

    // Investigation arms neighbours, so sweep until nothing more can be searched.
    while square.iter().any(|cell| engine.investigate_cell(*cell)) {}
    for cell in Cell::ORIGIN.all_neighbors().into_iter().filter(|cell| *cell != last) {
        assert!(engine.is_cleared(engine.origin().shifted(cell.x as f32, cell.y as f32)));
    }
    assert!(engine.sensor_still_needed(origin));

    assert!(engine.investigate_cell(last));

    assert!(!engine.sensor_still_needed(origin));
    assert_eq!(engine.verify_invariants(), Ok(()));
}
