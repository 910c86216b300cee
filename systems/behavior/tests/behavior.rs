use arena_warden_core::{
    params, Action, BaseStatus, Command, Event, Order, Point, RawEntity, Role, TurnInput,
};
use arena_warden_system_behavior::{Behavior, Config};
use arena_warden_system_intake::Intake;
use arena_warden_world::{self as world, query, World};

fn unit_record(id: i32, position: Point) -> RawEntity {
    RawEntity {
        id,
        kind: 1,
        x: position.x(),
        y: position.y(),
        ..RawEntity::default()
    }
}

fn creature_record(id: i32, position: Point, threat_for: i32) -> RawEntity {
    RawEntity {
        id,
        kind: 0,
        x: position.x(),
        y: position.y(),
        health: 10,
        vy: params::CREATURE_MOVE_SPEED,
        near_base: if threat_for == 0 { 0 } else { 1 },
        threat_for,
        ..RawEntity::default()
    }
}

fn turn_input(entities: Vec<RawEntity>) -> TurnInput {
    TurnInput {
        friendly: BaseStatus {
            health: 3,
            mana: 30,
        },
        enemy: BaseStatus {
            health: 3,
            mana: 30,
        },
        entities,
    }
}

/// Runs one full turn: intake, base update, decisions, deferred commands.
fn run_turn(
    world: &mut World,
    intake: &Intake,
    behavior: &mut Behavior,
    input: &TurnInput,
) -> (Vec<Order>, Vec<Event>) {
    let mut commands: Vec<Command> = Vec::new();
    let mut events = Vec::new();
    let mut orders = Vec::new();

    let snapshot = intake.handle(input, &mut commands);
    for command in commands.drain(..) {
        world::apply(world, command, &mut events);
    }

    behavior.handle(
        &snapshot,
        query::friendly_base(world),
        query::enemy_base(world),
        query::patrol_view(world),
        &mut orders,
        &mut commands,
    );

    for command in commands.drain(..) {
        world::apply(world, command, &mut events);
    }

    (orders, events)
}

#[test]
fn full_turn_emits_one_order_per_unit() {
    let mut world = World::new(Point::ORIGIN, params::DEFAULT_PATROL_ROUTES);
    let intake = Intake::new();
    let mut behavior = Behavior::new(Config::default());

    let input = turn_input(vec![
        unit_record(1, Point::new(16_000, 8_000)),
        unit_record(2, Point::new(16_200, 8_200)),
        unit_record(3, Point::new(16_400, 8_400)),
        creature_record(11, Point::new(500, 500), 2),
        RawEntity {
            id: 99,
            kind: 9,
            ..RawEntity::default()
        },
    ]);

    let (orders, events) = run_turn(&mut world, &intake, &mut behavior, &input);

    assert_eq!(orders.len(), 3);
    assert_eq!(query::turn(&world), 1);
    assert!(events.contains(&Event::TurnStarted { turn: 1 }));
    for order in &orders {
        assert!(matches!(order.action, Action::Move { .. }));
    }
}

#[test]
fn patrol_cycle_advances_across_turns() {
    let mut world = World::new(Point::ORIGIN, params::DEFAULT_PATROL_ROUTES);
    let intake = Intake::new();
    let mut behavior = Behavior::new(Config::default());

    let route = params::DEFAULT_PATROL_ROUTES[0];
    let parked = Point::new(route[0].x() - 100, route[0].y());
    let others = [Point::new(8_400, 4_500), Point::new(8_600, 4_700)];

    let input = turn_input(vec![
        unit_record(1, parked),
        unit_record(2, others[0]),
        unit_record(3, others[1]),
    ]);

    let (orders, events) = run_turn(&mut world, &intake, &mut behavior, &input);

    // The striker reached its waypoint, so this turn already heads for the
    // alternate and the ledger rotates for the next one.
    assert_eq!(orders[0].action, Action::Move { destination: route[1] });
    assert!(events.contains(&Event::PatrolRotated {
        role: Role::Striker,
        index: 1,
    }));
    assert_eq!(
        query::patrol_view(&world).assignment(Role::Striker).current,
        route[1],
    );

    let (orders, _) = run_turn(&mut world, &intake, &mut behavior, &input);
    assert_eq!(orders[0].action, Action::Move { destination: route[1] });
}

#[test]
fn hunting_turn_converges_on_the_coverage_spot() {
    let mut world = World::new(Point::ORIGIN, params::DEFAULT_PATROL_ROUTES);
    let intake = Intake::new();
    let mut behavior = Behavior::new(Config::default());

    let prey = [Point::new(9_000, 4_000), Point::new(9_500, 4_000)];
    let input = turn_input(vec![
        unit_record(1, Point::new(9_200, 4_500)),
        unit_record(2, Point::new(500, 500)),
        unit_record(3, Point::new(700, 700)),
        creature_record(11, prey[0], 0),
        creature_record(12, prey[1], 0),
    ]);

    let (orders, _) = run_turn(&mut world, &intake, &mut behavior, &input);

    let spot = arena_warden_system_coverage::optimal_coverage(&prey, params::UNIT_ATTACK_RANGE);
    assert_eq!(orders[0].action, Action::Move { destination: spot.center });
    assert_eq!(orders[0].note.as_deref(), Some("hunt"));
}
