#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Unit behavior policy choosing between defend, hunt and patrol each turn.

use arena_warden_core::{
    params, Action, BaseSnapshot, Command, Corner, CreatureSnapshot, Order, PatrolRoutes,
    PatrolView, Point, Role, Side, TurnSnapshot, UnitSnapshot,
};
use arena_warden_system_coverage::optimal_coverage;
use serde::Deserialize;

/// Tunable policy rules; the defaults match the reference behavior.
///
/// The defend rule and the mana gate are independent toggles rather than
/// baked-in conditions, so either can be armed without touching the
/// priority order.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Arms the defend rule; off by default.
    pub defend_enabled: bool,
    /// Distance from our base inside which a friendly threat triggers defend.
    pub defend_radius: i32,
    /// Requires `mana >= SPELL_COST` before any spell cast.
    pub require_spell_mana: bool,
    /// Patrol routes per role, authored in the top-left frame.
    pub patrol_routes: PatrolRoutes,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defend_enabled: false,
            defend_radius: params::BASE_ATTRACTION_RADIUS,
            require_spell_mana: true,
            patrol_routes: params::DEFAULT_PATROL_ROUTES,
        }
    }
}

/// Pure system that decides one order per friendly unit.
///
/// States are mutually exclusive and picked by first matching condition:
/// defend, then the (unarmed) explicit attack move, then hunt, then patrol.
#[derive(Debug)]
pub struct Behavior {
    config: Config,
    hunt_scratch: Vec<CreatureSnapshot>,
    position_scratch: Vec<Point>,
}

impl Behavior {
    /// Creates a new behavior system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            hunt_scratch: Vec::new(),
            position_scratch: Vec::new(),
        }
    }

    /// Walks the squad in input enumeration order, deciding one order per
    /// unit.
    ///
    /// Patrol rotations are emitted as commands rather than applied here,
    /// so the world only advances after the turn's orders are on the wire.
    /// Every code path yields a valid order; the policy never fails.
    pub fn handle(
        &mut self,
        snapshot: &TurnSnapshot,
        friendly_base: BaseSnapshot,
        enemy_base: BaseSnapshot,
        patrol: PatrolView,
        out_orders: &mut Vec<Order>,
        out_commands: &mut Vec<Command>,
    ) {
        out_orders.clear();

        for (slot, unit) in snapshot.squad.iter().enumerate() {
            let role = Role::from_slot(slot);
            let order = self.decide(
                unit,
                role,
                snapshot,
                friendly_base,
                enemy_base,
                patrol,
                out_commands,
            );
            log::debug!("unit {} ({:?}): {:?}", unit.id.get(), role, order.action);
            out_orders.push(order);
        }
    }

    fn decide(
        &mut self,
        unit: &UnitSnapshot,
        role: Role,
        snapshot: &TurnSnapshot,
        friendly_base: BaseSnapshot,
        enemy_base: BaseSnapshot,
        patrol: PatrolView,
        out_commands: &mut Vec<Command>,
    ) -> Order {
        if let Some(order) = self.defend(unit, snapshot, friendly_base, enemy_base) {
            return order;
        }

        // Explicit attack-move slot in the priority list; not armed in this
        // policy.

        if let Some(order) = self.hunt(unit, snapshot) {
            return order;
        }

        self.patrol(unit, role, friendly_base.corner, patrol, out_commands)
    }

    /// Guards our base against creatures already marked as our threat.
    ///
    /// Picks the threat nearest to the base inside the response radius;
    /// winds it toward the opposing corner when the unit is in spell range,
    /// the target is unshielded and the mana gate passes, otherwise moves
    /// to intercept.
    fn defend(
        &self,
        unit: &UnitSnapshot,
        snapshot: &TurnSnapshot,
        friendly_base: BaseSnapshot,
        enemy_base: BaseSnapshot,
    ) -> Option<Order> {
        if !self.config.defend_enabled {
            return None;
        }

        let threat = snapshot
            .creatures
            .iter()
            .filter(|creature| creature.threat_for == Some(Side::Friendly))
            .filter(|creature| {
                friendly_base.position.distance(creature.position) < self.config.defend_radius
            })
            .min_by_key(|creature| {
                (
                    friendly_base.position.distance(creature.position),
                    creature.id,
                )
            })?;

        let wind_ready = unit.position.distance(threat.position) <= params::SPELL_WIND_RADIUS
            && threat.shield_life == 0
            && self.mana_allows(friendly_base.mana);
        if wind_ready {
            log::debug!(
                "unit {} winds creature {} off our base",
                unit.id.get(),
                threat.id.get()
            );
            return Some(Order::noted(
                Action::Wind {
                    direction: enemy_base.position,
                },
                "defend wind",
            ));
        }

        // Intercept where the threat will be, not where it was.
        Some(Order::noted(
            Action::Move {
                destination: threat.position + threat.velocity,
            },
            "defend",
        ))
    }

    /// Chases creatures in view that are not already pressuring the enemy.
    ///
    /// The coverage solver picks the densest strike point; when it reports
    /// no multi-target spot the unit chases the nearest free creature, and
    /// a hunt with nothing left to chase degrades to an idle order instead
    /// of a malformed one.
    fn hunt(&mut self, unit: &UnitSnapshot, snapshot: &TurnSnapshot) -> Option<Order> {
        self.hunt_scratch.clear();
        self.hunt_scratch.extend(
            snapshot
                .creatures
                .iter()
                .filter(|creature| {
                    unit.position.distance(creature.position) <= params::UNIT_VIEW_RADIUS
                })
                .filter(|creature| creature.threat_for != Some(Side::Enemy))
                .copied(),
        );
        if self.hunt_scratch.is_empty() {
            return None;
        }

        for creature in &self.hunt_scratch {
            log::trace!("unit {} huntable: {:?}", unit.id.get(), creature);
        }

        self.position_scratch.clear();
        self.position_scratch
            .extend(self.hunt_scratch.iter().map(|creature| creature.position));
        let spot = optimal_coverage(&self.position_scratch, params::UNIT_ATTACK_RANGE);
        if !spot.is_degenerate() {
            return Some(Order::noted(
                Action::Move {
                    destination: spot.center,
                },
                "hunt",
            ));
        }

        match self
            .hunt_scratch
            .iter()
            .min_by_key(|creature| (unit.position.distance(creature.position), creature.id))
        {
            Some(prey) => Some(Order::noted(
                Action::Move {
                    destination: prey.position,
                },
                "hunt single",
            )),
            None => {
                log::debug!("unit {} chose hunt with nothing to chase", unit.id.get());
                Some(Order::noted(Action::Wait, "hunt idle"))
            }
        }
    }

    /// Walks the role's two-waypoint cycle, mirrored for the far corner.
    ///
    /// The cycle only advances when the unit is strictly closer than one
    /// move to the current waypoint; this turn then already heads for the
    /// alternate.
    fn patrol(
        &self,
        unit: &UnitSnapshot,
        role: Role,
        corner: Corner,
        patrol: PatrolView,
        out_commands: &mut Vec<Command>,
    ) -> Order {
        let assignment = patrol.assignment(role);
        let current = oriented(corner, assignment.current);

        if unit.position.distance(current) < params::UNIT_MOVE_SPEED {
            out_commands.push(Command::RotatePatrol { role });
            return Order::noted(
                Action::Move {
                    destination: oriented(corner, assignment.alternate),
                },
                "patrol turn",
            );
        }

        Order::noted(
            Action::Move {
                destination: current,
            },
            "patrol",
        )
    }

    fn mana_allows(&self, mana: i32) -> bool {
        !self.config.require_spell_mana || mana >= params::SPELL_COST
    }
}

/// Converts a top-left-frame waypoint into the squad's own frame.
fn oriented(corner: Corner, waypoint: Point) -> Point {
    match corner {
        Corner::TopLeft => waypoint,
        Corner::BottomRight => waypoint.mirror(),
    }
}
