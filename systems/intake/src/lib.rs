#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-state intake that types one turn's raw records into snapshot views.

use arena_warden_core::{
    Command, CreatureId, CreatureSnapshot, CreatureView, Point, RawEntity, Side, SquadView,
    Trajectory, TurnInput, TurnSnapshot, UnitId, UnitSnapshot,
};

const CREATURE_TAG: i32 = 0;
const FRIENDLY_UNIT_TAG: i32 = 1;
const RIVAL_UNIT_TAG: i32 = 2;

/// Pure system that categorizes one turn's entities and stages base updates.
#[derive(Debug, Default)]
pub struct Intake;

impl Intake {
    /// Creates a new intake system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes one turn's input, pushing the base status command and
    /// returning the categorized snapshot.
    ///
    /// An unrecognized entity tag is dropped silently; the intake never
    /// fails. Entity collections are freshly allocated every call, so
    /// nothing from a previous turn can leak into the snapshot.
    pub fn handle(&self, input: &TurnInput, out: &mut Vec<Command>) -> TurnSnapshot {
        out.push(Command::BeginTurn {
            friendly: input.friendly,
            enemy: input.enemy,
        });

        let mut creatures = Vec::new();
        let mut squad = Vec::new();
        let mut rivals = Vec::new();

        for record in &input.entities {
            match record.kind {
                CREATURE_TAG => creatures.push(creature_from(record)),
                FRIENDLY_UNIT_TAG => squad.push(unit_from(record)),
                RIVAL_UNIT_TAG => rivals.push(unit_from(record)),
                unknown => {
                    log::debug!("dropping entity {} with unknown tag {unknown}", record.id);
                }
            }
        }

        TurnSnapshot {
            creatures: CreatureView::from_snapshots(creatures),
            squad: SquadView::from_snapshots(squad),
            rivals: SquadView::from_snapshots(rivals),
        }
    }
}

fn creature_from(record: &RawEntity) -> CreatureSnapshot {
    CreatureSnapshot {
        id: CreatureId::new(record.id),
        position: Point::new(record.x, record.y),
        shield_life: record.shield_life,
        is_controlled: record.is_controlled != 0,
        health: record.health,
        velocity: Point::new(record.vx, record.vy),
        trajectory: Trajectory::from_raw(record.near_base),
        threat_for: Side::from_threat_raw(record.threat_for),
    }
}

fn unit_from(record: &RawEntity) -> UnitSnapshot {
    UnitSnapshot {
        id: UnitId::new(record.id),
        position: Point::new(record.x, record.y),
        shield_life: record.shield_life,
        is_controlled: record.is_controlled != 0,
    }
}
