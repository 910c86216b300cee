#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Engine line protocol: parses match input and renders unit orders.
//!
//! The engine guarantees well-formed input during live play, so the error
//! paths here only fire on truncated or hand-edited replay transcripts.
//! Nothing in this crate decides anything; it moves bytes.

use std::io::BufRead;

use arena_warden_core::{Action, BaseStatus, Order, Point, RawEntity, TurnInput};
use thiserror::Error;

/// Number of integer fields in one entity record.
const ENTITY_FIELD_COUNT: usize = 11;

/// Fixed match parameters announced once before the first turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSetup {
    /// Our base position; the opponent's is its mirror.
    pub base_position: Point,
    /// Number of units in each squad.
    pub units_per_squad: usize,
}

/// Errors raised while decoding the engine's line protocol.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The underlying reader failed.
    #[error("failed to read from the engine stream: {0}")]
    Io(#[from] std::io::Error),
    /// The stream ended cleanly at a turn boundary.
    #[error("input ended at a turn boundary")]
    MatchOver,
    /// The stream ended in the middle of a turn block.
    #[error("input ended inside a turn block")]
    Truncated,
    /// A line carried fewer fields than the protocol requires.
    #[error("line '{line}' is missing the {field} field")]
    MissingField {
        /// The offending input line.
        line: String,
        /// Name of the field that was expected next.
        field: &'static str,
    },
    /// A field could not be parsed as an integer.
    #[error("could not parse '{token}' as the {field} field")]
    InvalidInteger {
        /// The offending token.
        token: String,
        /// Name of the field being parsed.
        field: &'static str,
    },
}

/// Reads the one-time match setup block.
pub fn read_match_setup(reader: &mut impl BufRead) -> Result<MatchSetup, ProtocolError> {
    let line = next_line(reader)?.ok_or(ProtocolError::MatchOver)?;
    let mut fields = Fields::of(&line);
    let base_position = Point::new(fields.take("base x")?, fields.take("base y")?);

    let line = next_line(reader)?.ok_or(ProtocolError::Truncated)?;
    let units = Fields::of(&line).take("units per squad")?;
    let units_per_squad = usize::try_from(units).unwrap_or(0);

    Ok(MatchSetup {
        base_position,
        units_per_squad,
    })
}

/// Reads one turn's input block.
///
/// A clean end of stream before the first status line reports
/// [`ProtocolError::MatchOver`], which is how replay transcripts terminate
/// the decision loop; an end of stream anywhere later in the block is a
/// truncation error.
pub fn read_turn(reader: &mut impl BufRead) -> Result<TurnInput, ProtocolError> {
    let Some(line) = next_line(reader)? else {
        return Err(ProtocolError::MatchOver);
    };
    let friendly = parse_status(&line)?;
    let enemy = parse_status(&required_line(reader)?)?;

    let line = required_line(reader)?;
    let count = Fields::of(&line).take("entity count")?;
    let count = usize::try_from(count).unwrap_or(0);

    let mut entities = Vec::with_capacity(count);
    for _ in 0..count {
        entities.push(parse_entity(&required_line(reader)?)?);
    }

    Ok(TurnInput {
        friendly,
        enemy,
        entities,
    })
}

/// Renders one decided order as an engine command line.
#[must_use]
pub fn render_order(order: &Order) -> String {
    let body = match &order.action {
        Action::Move { destination } => {
            format!("MOVE {} {}", destination.x(), destination.y())
        }
        Action::Wind { direction } => {
            format!("SPELL WIND {} {}", direction.x(), direction.y())
        }
        Action::Control {
            target,
            destination,
        } => format!(
            "SPELL CONTROL {} {} {}",
            target.get(),
            destination.x(),
            destination.y()
        ),
        Action::Shield { target } => format!("SPELL SHIELD {}", target.get()),
        Action::Wait => "WAIT".to_owned(),
    };

    match &order.note {
        Some(note) => format!("{body} {note}"),
        None => body,
    }
}

fn parse_status(line: &str) -> Result<BaseStatus, ProtocolError> {
    let mut fields = Fields::of(line);
    Ok(BaseStatus {
        health: fields.take("base health")?,
        mana: fields.take("base mana")?,
    })
}

fn parse_entity(line: &str) -> Result<RawEntity, ProtocolError> {
    let mut fields = Fields::of(line);
    let names = [
        "entity id",
        "entity type",
        "entity x",
        "entity y",
        "shield life",
        "is controlled",
        "health",
        "velocity x",
        "velocity y",
        "near base",
        "threat for",
    ];
    let mut values = [0_i32; ENTITY_FIELD_COUNT];
    for (value, name) in values.iter_mut().zip(names) {
        *value = fields.take(name)?;
    }

    Ok(RawEntity {
        id: values[0],
        kind: values[1],
        x: values[2],
        y: values[3],
        shield_life: values[4],
        is_controlled: values[5],
        health: values[6],
        vx: values[7],
        vy: values[8],
        near_base: values[9],
        threat_for: values[10],
    })
}

/// Reads the next line, reporting a clean end of stream as `None`.
fn next_line(reader: &mut impl BufRead) -> Result<Option<String>, ProtocolError> {
    let mut line = String::new();
    let bytes = reader.read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn required_line(reader: &mut impl BufRead) -> Result<String, ProtocolError> {
    next_line(reader)?.ok_or(ProtocolError::Truncated)
}

/// Whitespace-separated integer fields of one input line.
struct Fields<'line> {
    line: &'line str,
    tokens: std::str::SplitWhitespace<'line>,
}

impl<'line> Fields<'line> {
    fn of(line: &'line str) -> Self {
        Self {
            line,
            tokens: line.split_whitespace(),
        }
    }

    fn take(&mut self, field: &'static str) -> Result<i32, ProtocolError> {
        let token = self
            .tokens
            .next()
            .ok_or_else(|| ProtocolError::MissingField {
                line: self.line.trim_end().to_owned(),
                field,
            })?;
        token
            .parse()
            .map_err(|_| ProtocolError::InvalidInteger {
                token: token.to_owned(),
                field,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{read_match_setup, read_turn, render_order, ProtocolError};
    use arena_warden_core::{Action, CreatureId, Order, Point};
    use std::io::BufReader;

    fn reader(text: &str) -> BufReader<&[u8]> {
        BufReader::new(text.as_bytes())
    }

    #[test]
    fn renders_every_order_form() {
        let destination = Point::new(1_250, 241);
        let target = CreatureId::new(14);

        assert_eq!(
            render_order(&Order::new(Action::Move { destination })),
            "MOVE 1250 241",
        );
        assert_eq!(
            render_order(&Order::new(Action::Wind {
                direction: destination,
            })),
            "SPELL WIND 1250 241",
        );
        assert_eq!(
            render_order(&Order::new(Action::Control {
                target,
                destination,
            })),
            "SPELL CONTROL 14 1250 241",
        );
        assert_eq!(
            render_order(&Order::new(Action::Shield { target })),
            "SPELL SHIELD 14",
        );
        assert_eq!(render_order(&Order::new(Action::Wait)), "WAIT");
    }

    #[test]
    fn notes_append_after_the_command_body() {
        let order = Order::noted(Action::Wait, "hunt idle");
        assert_eq!(render_order(&order), "WAIT hunt idle");
    }

    #[test]
    fn parses_the_match_setup_block() {
        let mut input = reader("0 0\n3\n");
        let setup = read_match_setup(&mut input).expect("setup parses");
        assert_eq!(setup.base_position, Point::ORIGIN);
        assert_eq!(setup.units_per_squad, 3);
    }

    #[test]
    fn parses_one_turn_block() {
        let mut input = reader(
            "3 40\n\
             2 110\n\
             2\n\
             11 0 8000 4000 0 0 14 -200 346 1 1\n\
             1 1 2500 2500 0 0 0 0 0 0 0\n",
        );

        let turn = read_turn(&mut input).expect("turn parses");

        assert_eq!(turn.friendly.health, 3);
        assert_eq!(turn.friendly.mana, 40);
        assert_eq!(turn.enemy.mana, 110);
        assert_eq!(turn.entities.len(), 2);
        assert_eq!(turn.entities[0].id, 11);
        assert_eq!(turn.entities[0].vy, 346);
        assert_eq!(turn.entities[1].kind, 1);
    }

    #[test]
    fn clean_end_of_stream_reports_match_over() {
        let mut input = reader("");
        assert!(matches!(
            read_turn(&mut input),
            Err(ProtocolError::MatchOver)
        ));
    }

    #[test]
    fn end_of_stream_inside_a_turn_reports_truncation() {
        let mut input = reader("3 40\n2 110\n2\n11 0 8000 4000 0 0 14 -200 346 1 1\n");
        assert!(matches!(
            read_turn(&mut input),
            Err(ProtocolError::Truncated)
        ));
    }

    #[test]
    fn malformed_integers_are_reported_with_their_field() {
        let mut input = reader("3 forty\n");
        match read_turn(&mut input) {
            Err(ProtocolError::InvalidInteger { token, field }) => {
                assert_eq!(token, "forty");
                assert_eq!(field, "base mana");
            }
            other => panic!("expected an invalid integer error, got {other:?}"),
        }
    }

    #[test]
    fn short_entity_lines_are_reported_with_their_field() {
        let mut input = reader("3 40\n2 110\n1\n11 0 8000\n");
        match read_turn(&mut input) {
            Err(ProtocolError::MissingField { field, .. }) => {
                assert_eq!(field, "entity y");
            }
            other => panic!("expected a missing field error, got {other:?}"),
        }
    }
}
