//! Per-tick clock advancement and the fixed-point expansion loop.

use super::*;

impl<O: WalkabilityOracle> PerimeterEngine<O> {
    /// Advances the movement potential by `elapsed` seconds and resolves every expansion
    /// that became due. Ignored unless the engine is expanding.
    pub fn tick(&mut self, elapsed: f32) {
        if self.state != EngineState::Expanding || !elapsed.is_finite() || elapsed <= 0.0 {
            return;
        }
        self.movement_potential += self.config.expansion_rate() * elapsed;

        let outside_due = self.movement_potential >= self.outside_timer;
        let inside_due = self.movement_potential >= self.inside_timer;
        if !outside_due && !inside_due {
            return;
        }
        // Parked until the passes finish so one crossing is handled once.
        self.outside_timer = NO_PENDING_COST;
        self.inside_timer = NO_PENDING_COST;
        self.resolve_due_expansions();
    }

    /// Runs both passes until neither changes anything at the current potential.
    /// Each productive pass pops one entry, so the loop ends once the due entries run out.
    pub(super) fn resolve_due_expansions(&mut self) {
        loop {
            let inside_changed = self.expand_inside();
            let outside_changed = self.expand_outside();
            if !inside_changed && !outside_changed {
                break;
            }
        }

        self.refresh_timers();
        self.refresh_illustration();

        if self.outside.is_empty() && self.inside.is_empty() {
            self.settle();
        }
    }

    fn refresh_timers(&mut self) {
        self.outside_timer = self.outside.next_cost() + ORTHOGONAL_STEP_COST;
        self.inside_timer = self.inside.next_cost() + DIAGONAL_STEP_COST;
    }

    fn settle(&mut self) {
        self.state = EngineState::Settled;
        let node_count = self.registry.len();
        self.events.push(PerimeterEvent::Settled {
            movement_potential: self.movement_potential,
            node_count,
        });
        log::info!(
            "potential area settled with {node_count} cells at potential {}",
            self.movement_potential
        );
    }
}
