#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the arena-warden agent.
//!
//! This crate defines the message surface that connects the protocol
//! adapter, the authoritative match state, and the pure decision systems.
//! The intake system turns one turn's raw wire records into typed snapshot
//! views, systems respond with [`Command`] batches plus per-unit [`Order`]
//! values, and `world::apply` is the only place state mutates.

use serde::{Deserialize, Serialize};

/// Engine parameters fixed by the arena ruleset.
pub mod params {
    use super::{PatrolRoutes, Point};

    /// Board width in world units.
    pub const MAP_WIDTH: i32 = 17_600;
    /// Board height in world units.
    pub const MAP_HEIGHT: i32 = 9_000;

    /// Radius around a base inside which creatures lock onto it.
    pub const BASE_ATTRACTION_RADIUS: i32 = 5_000;
    /// Radius around a base that is always visible to its owner.
    pub const BASE_VIEW_RADIUS: i32 = 6_000;
    /// Health a base starts the match with.
    pub const BASE_MAX_HEALTH: i32 = 3;

    /// Distance a unit travels per turn.
    pub const UNIT_MOVE_SPEED: i32 = 800;
    /// Units fielded by each side.
    pub const UNITS_PER_SQUAD: usize = 3;
    /// Radius inside which a unit sees entities.
    pub const UNIT_VIEW_RADIUS: i32 = 2_200;
    /// Radius of a unit's attack circle.
    pub const UNIT_ATTACK_RANGE: i32 = 800;
    /// Damage dealt each turn to every creature inside the attack circle.
    pub const UNIT_ATTACK_DAMAGE: i32 = 2;

    /// Distance a creature drifts per turn.
    pub const CREATURE_MOVE_SPEED: i32 = 400;

    /// Mana cost shared by every spell.
    pub const SPELL_COST: i32 = 10;
    /// Turns a control spell keeps steering its target.
    pub const SPELL_CONTROL_DURATION: i32 = 12;
    /// Radius inside which a control spell can grab a target.
    pub const SPELL_CONTROL_RADIUS: i32 = 2_200;
    /// Distance a wind spell pushes everything it catches.
    pub const SPELL_WIND_DISTANCE: i32 = 2_200;
    /// Radius of the wind spell around the caster.
    pub const SPELL_WIND_RADIUS: i32 = 1_280;

    /// Default patrol routes per role: striker, near guard, far guard.
    ///
    /// Authored in the top-left ("blue") frame; the policy mirrors them for
    /// a squad anchored at the opposite corner.
    pub const DEFAULT_PATROL_ROUTES: PatrolRoutes = [
        [Point::new(13_400, 2_000), Point::new(9_200, 8_000)],
        [Point::new(6_800, 1_000), Point::new(8_400, 1_000)],
        [Point::new(3_800, 7_000), Point::new(5_400, 7_000)],
    ];
}

/// Absolute board position measured in integer world units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// The board origin, also the solver's degenerate result.
    pub const ORIGIN: Point = Point::new(0, 0);

    /// Creates a new point from board coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the point.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the point.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Euclidean distance to `other`, truncated to integer precision.
    ///
    /// The engine speaks integer coordinates, so the truncation never
    /// accumulates: every emitted coordinate is already whole.
    #[must_use]
    pub fn distance(self, other: Point) -> i32 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt() as i32
    }

    /// Reflects the point across the board center.
    ///
    /// The two sides' halves are point-reflections of each other, so a
    /// decision authored for the top-left corner converts to the
    /// bottom-right corner by mirroring every coordinate. Mirroring twice
    /// returns the original point.
    #[must_use]
    pub const fn mirror(self) -> Point {
        Point::new(params::MAP_WIDTH - self.x, params::MAP_HEIGHT - self.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Unique identifier assigned to a creature by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CreatureId(i32);

impl CreatureId {
    /// Creates a new creature identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

/// Unique identifier assigned to a squad unit by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(i32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

/// Allegiance of a base or a threat relative to this agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Our side of the match.
    Friendly,
    /// The opposing side of the match.
    Enemy,
}

impl Side {
    /// Maps the wire encoding of a threatened side.
    ///
    /// The engine sends 1 for our base and 2 for the opponent's; zero and
    /// any unknown value mean no side is endangered.
    #[must_use]
    pub const fn from_threat_raw(raw: i32) -> Option<Side> {
        match raw {
            1 => Some(Side::Friendly),
            2 => Some(Side::Enemy),
            _ => None,
        }
    }
}

/// Board corner a base anchors to.
///
/// Patrol routes are authored for [`Corner::TopLeft`] and mirrored for a
/// squad playing from the opposite corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    /// The base sits at the board origin.
    TopLeft,
    /// The base sits at the mirrored corner.
    BottomRight,
}

impl Corner {
    /// Derives the corner from a base position, fixed for the match.
    #[must_use]
    pub const fn of(position: Point) -> Corner {
        if position.x() == 0 {
            Corner::TopLeft
        } else {
            Corner::BottomRight
        }
    }
}

/// Long-run drift of a creature as projected by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trajectory {
    /// The creature will never reach a base on its current course.
    Wandering,
    /// The creature will eventually reach our base.
    ToFriendlyBase,
    /// The creature will eventually reach the opposing base.
    ToEnemyBase,
}

impl Trajectory {
    /// Maps the wire tri-state; unknown values fall back to [`Trajectory::Wandering`].
    #[must_use]
    pub const fn from_raw(raw: i32) -> Trajectory {
        match raw {
            1 => Trajectory::ToFriendlyBase,
            2 => Trajectory::ToEnemyBase,
            _ => Trajectory::Wandering,
        }
    }
}

/// One entity record exactly as the engine sends it, eleven integers wide.
///
/// The five trailing fields are creature-specific; for squad units the
/// engine fills them with reserved values that the intake ignores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawEntity {
    /// Engine-assigned entity identifier.
    pub id: i32,
    /// Entity category tag (0 creature, 1 own unit, 2 opposing unit).
    pub kind: i32,
    /// Horizontal board coordinate.
    pub x: i32,
    /// Vertical board coordinate.
    pub y: i32,
    /// Remaining shield turns.
    pub shield_life: i32,
    /// Non-zero while a control spell is steering the entity.
    pub is_controlled: i32,
    /// Creature health.
    pub health: i32,
    /// Creature velocity, horizontal component.
    pub vx: i32,
    /// Creature velocity, vertical component.
    pub vy: i32,
    /// Creature near-base tri-state.
    pub near_base: i32,
    /// Creature threatened-side indicator.
    pub threat_for: i32,
}

/// Health and mana reported for one base at the top of a turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BaseStatus {
    /// Remaining base health; the match ends when it reaches zero.
    pub health: i32,
    /// Current mana pool available for spells.
    pub mana: i32,
}

/// Everything the engine sends for one turn, still untyped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnInput {
    /// Status reported for our base.
    pub friendly: BaseStatus,
    /// Status reported for the opposing base.
    pub enemy: BaseStatus,
    /// Raw entity records in engine enumeration order.
    pub entities: Vec<RawEntity>,
}

/// Immutable representation of one creature's state this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreatureSnapshot {
    /// Unique identifier assigned to the creature.
    pub id: CreatureId,
    /// Board position this turn.
    pub position: Point,
    /// Remaining shield turns; zero means spells can affect it.
    pub shield_life: i32,
    /// True while a control spell is steering the creature.
    pub is_controlled: bool,
    /// Remaining health.
    pub health: i32,
    /// Velocity the engine applies at the end of the turn.
    pub velocity: Point,
    /// Long-run drift projected by the engine.
    pub trajectory: Trajectory,
    /// Side whose base the creature currently endangers, if any.
    ///
    /// Only meaningful while the trajectory is not [`Trajectory::Wandering`].
    pub threat_for: Option<Side>,
}

/// Read-only view of the creatures visible this turn.
#[derive(Clone, Debug, Default)]
pub struct CreatureView {
    snapshots: Vec<CreatureSnapshot>,
}

impl CreatureView {
    /// Creates a new creature view, ordering snapshots by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CreatureSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &CreatureSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CreatureSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of one squad unit's state this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Board position this turn.
    pub position: Point,
    /// Remaining shield turns.
    pub shield_life: i32,
    /// True while an opposing control spell is steering the unit.
    pub is_controlled: bool,
}

/// Read-only view of one squad's units in input enumeration order.
///
/// Order is significant: the engine expects the turn's Nth order line to
/// answer the Nth friendly unit of the entity listing, so this view never
/// re-sorts.
#[derive(Clone, Debug, Default)]
pub struct SquadView {
    snapshots: Vec<UnitSnapshot>,
}

impl SquadView {
    /// Creates a new squad view, preserving the provided enumeration order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<UnitSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Number of units captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Typed result of reading one turn: every visible entity, categorized.
///
/// Rebuilt from scratch each turn; nothing in it survives to the next one.
#[derive(Clone, Debug, Default)]
pub struct TurnSnapshot {
    /// Creatures visible to our side this turn.
    pub creatures: CreatureView,
    /// Our squad, in input enumeration order.
    pub squad: SquadView,
    /// The opposing squad's visible units.
    pub rivals: SquadView,
}

/// Read-only view over one persistent base record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseSnapshot {
    /// Fixed board position of the base.
    pub position: Point,
    /// Remaining health as of the current turn.
    pub health: i32,
    /// Mana pool as of the current turn.
    pub mana: i32,
    /// Board corner the base anchors to, derived once at match start.
    pub corner: Corner,
}

/// Tactical assignment derived from a unit's squad slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// First slot; ranges deep to thin creatures before they commit.
    Striker,
    /// Second slot; holds the inner approach to our base.
    NearGuard,
    /// Third slot; covers the wider flank.
    FarGuard,
}

/// Patrol route table: one waypoint pair per role, in slot order.
pub type PatrolRoutes = [[Point; 2]; Role::COUNT];

impl Role {
    /// Number of roles, equal to the squad size.
    pub const COUNT: usize = 3;

    /// Derives the role from a unit's position in the squad listing.
    #[must_use]
    pub const fn from_slot(slot: usize) -> Role {
        match slot {
            0 => Role::Striker,
            1 => Role::NearGuard,
            _ => Role::FarGuard,
        }
    }

    /// Index of the role within per-role tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Role::Striker => 0,
            Role::NearGuard => 1,
            Role::FarGuard => 2,
        }
    }
}

/// Current and alternate waypoints of one role's two-entry patrol cycle.
///
/// Both waypoints are in the top-left frame; the policy mirrors them when
/// the squad plays from the bottom-right corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatrolAssignment {
    /// Waypoint the role is currently walking toward.
    pub current: Point,
    /// The other waypoint of the pair, next in the cycle.
    pub alternate: Point,
}

/// Read-only view of every role's patrol assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatrolView {
    assignments: [PatrolAssignment; Role::COUNT],
}

impl PatrolView {
    /// Creates a view from per-role assignments in slot order.
    #[must_use]
    pub const fn new(assignments: [PatrolAssignment; Role::COUNT]) -> Self {
        Self { assignments }
    }

    /// Retrieves the assignment patrolled by the provided role.
    #[must_use]
    pub const fn assignment(&self, role: Role) -> PatrolAssignment {
        self.assignments[role.index()]
    }
}

/// Commands that express all permissible match-state mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Opens a new turn with both bases' reported statuses.
    BeginTurn {
        /// Status reported for our base.
        friendly: BaseStatus,
        /// Status reported for the opposing base.
        enemy: BaseStatus,
    },
    /// Advances a role's patrol cycle to its other waypoint.
    RotatePatrol {
        /// Role whose waypoint index rotates.
        role: Role,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The match clock advanced to a new turn.
    TurnStarted {
        /// One-based turn number.
        turn: u64,
    },
    /// A base recorded a new health and mana status.
    BaseStatusChanged {
        /// Side the base belongs to.
        side: Side,
        /// The status written to the record.
        status: BaseStatus,
    },
    /// A patrol cycle moved to its other waypoint.
    PatrolRotated {
        /// Role whose cycle advanced.
        role: Role,
        /// Waypoint index now current for the role.
        index: usize,
    },
}

/// Engine-executable actions a unit can take this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Walk toward the destination at full move speed.
    Move {
        /// Point the unit walks toward.
        destination: Point,
    },
    /// Cast the area wind spell, pushing nearby entities toward a direction.
    Wind {
        /// Point defining the push direction from the caster.
        direction: Point,
    },
    /// Cast the control spell, steering the target toward a destination.
    Control {
        /// Creature the spell grabs.
        target: CreatureId,
        /// Point the target is forced to walk toward.
        destination: Point,
    },
    /// Cast the shield spell on the target.
    Shield {
        /// Creature the shield protects.
        target: CreatureId,
    },
    /// Hold position for the turn.
    Wait,
}

/// A decided action paired with an optional engine-ignored note.
///
/// The policy returns orders as pure data; the protocol adapter renders
/// them, so decisions stay testable without capturing any output stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    /// The action the unit takes this turn.
    pub action: Action,
    /// Free-text diagnostic appended to the rendered line.
    pub note: Option<String>,
}

impl Order {
    /// Creates an order with no note.
    #[must_use]
    pub const fn new(action: Action) -> Self {
        Self { action, note: None }
    }

    /// Creates an order carrying a diagnostic note.
    #[must_use]
    pub fn noted(action: Action, note: impl Into<String>) -> Self {
        Self {
            action,
            note: Some(note.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_is_an_involution() {
        let samples = [
            Point::ORIGIN,
            Point::new(params::MAP_WIDTH, params::MAP_HEIGHT),
            Point::new(13_400, 2_000),
            Point::new(1, 8_999),
        ];
        for point in samples {
            assert_eq!(point.mirror().mirror(), point);
        }
    }

    #[test]
    fn mirror_reflects_across_board_center() {
        assert_eq!(
            Point::ORIGIN.mirror(),
            Point::new(params::MAP_WIDTH, params::MAP_HEIGHT)
        );
        assert_eq!(Point::new(13_400, 2_000).mirror(), Point::new(4_200, 7_000));
    }

    #[test]
    fn distance_is_symmetric_and_non_negative() {
        let a = Point::new(1_000, 1_000);
        let b = Point::new(1_500, 1_400);
        assert_eq!(a.distance(b), b.distance(a));
        assert!(a.distance(b) >= 0);
        assert_eq!(a.distance(a), 0);
    }

    #[test]
    fn distance_truncates_toward_zero() {
        // A 3-4-5 triangle scaled by 100 is exact; an off-axis unit pair truncates.
        assert_eq!(Point::new(0, 0).distance(Point::new(300, 400)), 500);
        assert_eq!(Point::new(0, 0).distance(Point::new(1, 1)), 1);
    }

    #[test]
    fn point_arithmetic_matches_componentwise_expectation() {
        let a = Point::new(3, 7);
        let b = Point::new(10, -2);
        assert_eq!(a + b, Point::new(13, 5));
        assert_eq!(b - a, Point::new(7, -9));
    }

    #[test]
    fn corner_derives_from_base_position() {
        assert_eq!(Corner::of(Point::ORIGIN), Corner::TopLeft);
        assert_eq!(
            Corner::of(Point::new(params::MAP_WIDTH, params::MAP_HEIGHT)),
            Corner::BottomRight
        );
    }

    #[test]
    fn threat_side_mapping_is_defensive() {
        assert_eq!(Side::from_threat_raw(0), None);
        assert_eq!(Side::from_threat_raw(1), Some(Side::Friendly));
        assert_eq!(Side::from_threat_raw(2), Some(Side::Enemy));
        assert_eq!(Side::from_threat_raw(99), None);
    }

    #[test]
    fn trajectory_mapping_is_defensive() {
        assert_eq!(Trajectory::from_raw(0), Trajectory::Wandering);
        assert_eq!(Trajectory::from_raw(1), Trajectory::ToFriendlyBase);
        assert_eq!(Trajectory::from_raw(2), Trajectory::ToEnemyBase);
        assert_eq!(Trajectory::from_raw(-7), Trajectory::Wandering);
    }

    #[test]
    fn creature_view_orders_by_id() {
        let creature = |id: i32| CreatureSnapshot {
            id: CreatureId::new(id),
            position: Point::ORIGIN,
            shield_life: 0,
            is_controlled: false,
            health: 10,
            velocity: Point::ORIGIN,
            trajectory: Trajectory::Wandering,
            threat_for: None,
        };
        let view = CreatureView::from_snapshots(vec![creature(9), creature(2), creature(5)]);
        let ids: Vec<i32> = view.iter().map(|snapshot| snapshot.id.get()).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn squad_view_preserves_enumeration_order() {
        let unit = |id: i32| UnitSnapshot {
            id: UnitId::new(id),
            position: Point::ORIGIN,
            shield_life: 0,
            is_controlled: false,
        };
        let view = SquadView::from_snapshots(vec![unit(7), unit(3), unit(5)]);
        let ids: Vec<i32> = view.iter().map(|snapshot| snapshot.id.get()).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn role_assignment_follows_squad_slots() {
        assert_eq!(Role::from_slot(0), Role::Striker);
        assert_eq!(Role::from_slot(1), Role::NearGuard);
        assert_eq!(Role::from_slot(2), Role::FarGuard);
        assert_eq!(Role::from_slot(7), Role::FarGuard);
    }

    #[test]
    fn point_round_trips_through_json() {
        let point = Point::new(13_400, 2_000);
        let encoded = serde_json::to_string(&point).expect("serialize");
        let decoded: Point = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(decoded, point);
    }
}
