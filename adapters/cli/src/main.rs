#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the read-decide-print match loop.
//!
//! One iteration per turn, strictly sequential: read the turn block, stage
//! the base update, decide one order per unit, print the orders, then apply
//! the deferred patrol rotations. Orders go to stdout for the engine;
//! everything diagnostic goes to stderr, which the engine never parses.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arena_warden_core::{Action, Command, Event, Order};
use arena_warden_protocol::{self as protocol, ProtocolError};
use arena_warden_system_behavior::{Behavior, Config};
use arena_warden_system_intake::Intake;
use arena_warden_world::{self as world, query, World};
use clap::Parser;

/// Turn-based decision agent for the arena defence engine.
#[derive(Debug, Parser)]
#[command(name = "arena-warden")]
struct Args {
    /// Path to a JSON policy configuration; defaults to the built-in policy.
    #[arg(long)]
    policy: Option<PathBuf>,
    /// Path to a recorded match transcript; defaults to live stdin.
    #[arg(long)]
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.policy.as_deref())?;

    let mut reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path).with_context(|| {
            format!("opening transcript {}", path.display())
        })?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let setup = protocol::read_match_setup(&mut reader).context("reading match setup")?;
    log::info!(
        "match starts: base at {:?}, {} units per squad",
        setup.base_position,
        setup.units_per_squad
    );

    let mut world = World::new(setup.base_position, config.patrol_routes);
    let intake = Intake::new();
    let mut behavior = Behavior::new(config);

    let stdout = io::stdout();
    let mut commands: Vec<Command> = Vec::new();
    let mut events: Vec<Event> = Vec::new();
    let mut orders: Vec<Order> = Vec::new();

    loop {
        let input = match protocol::read_turn(&mut reader) {
            Ok(input) => input,
            Err(ProtocolError::MatchOver) => break,
            Err(error) => return Err(error).context("reading turn input"),
        };

        let snapshot = intake.handle(&input, &mut commands);
        drain_commands(&mut world, &mut commands, &mut events);

        behavior.handle(
            &snapshot,
            query::friendly_base(&world),
            query::enemy_base(&world),
            query::patrol_view(&world),
            &mut orders,
            &mut commands,
        );

        // Every listed unit must receive a line; a missing one forfeits the
        // unit's turn, so pad rather than under-answer.
        if orders.len() < setup.units_per_squad {
            log::warn!(
                "behavior produced {} orders for {} units, padding",
                orders.len(),
                setup.units_per_squad
            );
            while orders.len() < setup.units_per_squad {
                orders.push(Order::noted(Action::Wait, "missing unit"));
            }
        }

        let mut out = stdout.lock();
        for order in &orders {
            writeln!(out, "{}", protocol::render_order(order)).context("writing orders")?;
        }
        out.flush().context("flushing orders")?;

        // Patrol rotations land after the orders they shaped are on the wire.
        drain_commands(&mut world, &mut commands, &mut events);
        report_events(&world, &mut events);
    }

    log::info!("input ended after turn {}", query::turn(&world));
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading policy file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing policy file {}", path.display()))
}

fn drain_commands(world: &mut World, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
    for command in commands.drain(..) {
        world::apply(world, command, events);
    }
}

fn report_events(world: &World, events: &mut Vec<Event>) {
    for event in events.drain(..) {
        log::debug!("turn {}: {:?}", query::turn(world), event);
    }
}
