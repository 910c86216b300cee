#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state for the arena-warden agent.
//!
//! The world owns everything that survives a turn: the two base records,
//! the match clock, and the patrol ledger. Systems never touch it directly;
//! they emit [`Command`] values and the loop driver routes them through
//! [`apply`], which mutates deterministically and broadcasts [`Event`]s.

use arena_warden_core::{
    BaseSnapshot, BaseStatus, Command, Corner, Event, PatrolAssignment, PatrolRoutes, Point, Role,
    Side,
};

/// Persistent match state owned by the decision loop.
#[derive(Debug)]
pub struct World {
    friendly_base: Base,
    enemy_base: Base,
    clock: u64,
    patrol: PatrolLedger,
}

impl World {
    /// Creates match state anchored at our base position.
    ///
    /// The opposing base always sits at the mirrored corner, so only our
    /// position is read from the engine.
    #[must_use]
    pub fn new(base_position: Point, patrol_routes: PatrolRoutes) -> Self {
        Self {
            friendly_base: Base::new(base_position),
            enemy_base: Base::new(base_position.mirror()),
            clock: 0,
            patrol: PatrolLedger::new(patrol_routes),
        }
    }
}

/// Applies the provided command to the match state, mutating it deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BeginTurn { friendly, enemy } => {
            world.clock = world.clock.saturating_add(1);
            out_events.push(Event::TurnStarted { turn: world.clock });

            world.friendly_base.status_update(friendly);
            out_events.push(Event::BaseStatusChanged {
                side: Side::Friendly,
                status: friendly,
            });

            world.enemy_base.status_update(enemy);
            out_events.push(Event::BaseStatusChanged {
                side: Side::Enemy,
                status: enemy,
            });
        }
        Command::RotatePatrol { role } => {
            let index = world.patrol.rotate(role);
            out_events.push(Event::PatrolRotated { role, index });
        }
    }
}

/// Query functions that provide read-only access to the match state.
pub mod query {
    use super::World;
    use arena_warden_core::{BaseSnapshot, PatrolView, Role};

    /// Current turn number; zero before the first `BeginTurn`.
    #[must_use]
    pub fn turn(world: &World) -> u64 {
        world.clock
    }

    /// Captures a read-only view of our base record.
    #[must_use]
    pub fn friendly_base(world: &World) -> BaseSnapshot {
        world.friendly_base.snapshot()
    }

    /// Captures a read-only view of the opposing base record.
    #[must_use]
    pub fn enemy_base(world: &World) -> BaseSnapshot {
        world.enemy_base.snapshot()
    }

    /// Captures every role's current patrol assignment.
    #[must_use]
    pub fn patrol_view(world: &World) -> PatrolView {
        let assignment = |slot: usize| world.patrol.assignment(Role::from_slot(slot));
        PatrolView::new([assignment(0), assignment(1), assignment(2)])
    }
}

#[derive(Debug)]
struct Base {
    position: Point,
    corner: Corner,
    health: i32,
    mana: i32,
}

impl Base {
    fn new(position: Point) -> Self {
        Self {
            position,
            corner: Corner::of(position),
            health: 0,
            mana: 0,
        }
    }

    fn status_update(&mut self, status: BaseStatus) {
        self.health = status.health;
        self.mana = status.mana;
    }

    fn snapshot(&self) -> BaseSnapshot {
        BaseSnapshot {
            position: self.position,
            health: self.health,
            mana: self.mana,
            corner: self.corner,
        }
    }
}

#[derive(Debug)]
struct PatrolLedger {
    routes: PatrolRoutes,
    indexes: [usize; Role::COUNT],
}

impl PatrolLedger {
    fn new(routes: PatrolRoutes) -> Self {
        Self {
            routes,
            indexes: [0; Role::COUNT],
        }
    }

    fn rotate(&mut self, role: Role) -> usize {
        let slot = role.index();
        self.indexes[slot] = (self.indexes[slot] + 1) % 2;
        self.indexes[slot]
    }

    fn assignment(&self, role: Role) -> PatrolAssignment {
        let slot = role.index();
        let index = self.indexes[slot];
        PatrolAssignment {
            current: self.routes[slot][index],
            alternate: self.routes[slot][1 - index],
        }
    }
}
