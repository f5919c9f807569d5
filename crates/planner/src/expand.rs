//! Expansion of a [`Path`] into motor instructions.
//!
//! Straight runs and domino-counted pivots are laid out domino by domino: we
//! drop a domino, then step forward until we're one step short of where the
//! next domino goes. Angle-driven pivots instead simulate the distance
//! travelled by the outer wheel, dropping a domino every time it crosses a
//! multiple of the domino spacing, until the requested angle is swept.
//!
//! Distances are computed as (whole number of steps) * (distance per step)
//! rather than accumulated, so that rounding errors don't build up over long
//! runs.

use domino_geom::{Geometry, GeometryError};
use domino_protocol::{Instructions, Token};

use crate::path::{Direction, Path, PathAction, PivotExtent, Side};

/// The largest angle an angle-driven pivot may ask for: ten full turns.
pub const MAX_TURN_DEGREES: f64 = 3600.0;

// Relative slack used when comparing a travelled distance against a domino
// position, so that geometries where the step divides the spacing exactly
// behave as they would with exact arithmetic.
const TOLERANCE: f64 = 1e-9;

fn at_least(x: f64, threshold: f64) -> bool {
    x >= threshold - TOLERANCE * threshold.abs()
}

fn at_most(x: f64, threshold: f64) -> bool {
    x <= threshold + TOLERANCE * threshold.abs()
}

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ExpandError {
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(#[from] GeometryError),
    /// An angle-driven pivot whose angle is not finite, or is larger than
    /// [`MAX_TURN_DEGREES`].
    #[error("action {index} asks for a pivot of {degrees} degrees, more than {max}", max = MAX_TURN_DEGREES)]
    UnboundedTurn { index: usize, degrees: f64 },
}

impl Side {
    /// The instruction that turns us towards this side, by driving the
    /// opposite wheel.
    fn pivot_token(self) -> Token {
        match self {
            Side::Left => Token::RightForward,
            Side::Right => Token::LeftForward,
        }
    }
}

impl Direction {
    fn token(self) -> Token {
        match self {
            Direction::Forward => Token::BothForward,
            Direction::Backward => Token::BothBackward,
        }
    }
}

/// How many single steps fit strictly between two consecutive dominoes.
pub fn steps_between_dominoes(geometry: &Geometry) -> usize {
    let step = geometry.distance_per_step().get();
    let spacing = geometry.domino_spacing().get();

    // The smallest k with k steps reaching the next domino. The ratio can land
    // just above a whole number when the step divides the spacing exactly.
    let mut k = (spacing / step).ceil().max(1.0);
    if k > 1.0 && at_least((k - 1.0) * step, spacing) {
        k -= 1.0;
    }
    k as usize - 1
}

/// Expands the whole path, in order.
///
/// Either every action is expanded or nothing is: all the checks happen
/// before the first instruction is produced.
pub fn expand(geometry: &Geometry, path: &Path) -> Result<Instructions, ExpandError> {
    geometry.derived().validate()?;
    for (index, action) in path.iter().enumerate() {
        if let Some(degrees) = action.turn_degrees() {
            if !(degrees.is_finite() && degrees <= MAX_TURN_DEGREES) {
                return Err(ExpandError::UnboundedTurn { index, degrees });
            }
        }
    }

    let moves = if path.iter().any(|a| a.domino_count().is_some()) {
        steps_between_dominoes(geometry)
    } else {
        0
    };
    let mut out = Instructions::new();
    for action in path {
        match *action {
            PathAction::Straight {
                direction,
                dominoes,
            } => straight(direction, dominoes, moves, &mut out),
            PathAction::Pivot {
                side,
                extent: PivotExtent::Dominoes(dominoes),
            } => pivot_by_dominoes(side, dominoes, moves, &mut out),
            PathAction::Pivot {
                side,
                extent: PivotExtent::Degrees(degrees),
            } => pivot_by_angle(geometry, side, degrees, &mut out),
        }
    }

    log::debug!(
        "expanded {} actions into {} instructions ({} dominoes)",
        path.count(),
        out.len(),
        out.drops()
    );
    Ok(out)
}

fn straight(direction: Direction, dominoes: u32, moves: usize, out: &mut Instructions) {
    for _ in 0..dominoes {
        out.push(Token::DropDomino);
        out.extend(std::iter::repeat(direction.token()).take(moves));
    }
}

// A pivot keeps one wheel planted, so every step forward is paired with a
// turning step.
fn pivot_by_dominoes(side: Side, dominoes: u32, moves: usize, out: &mut Instructions) {
    for _ in 0..dominoes {
        out.push(Token::DropDomino);
        for _ in 0..moves {
            out.push(Token::BothForward);
            out.push(side.pivot_token());
        }
    }
}

fn pivot_by_angle(geometry: &Geometry, side: Side, degrees: f64, out: &mut Instructions) {
    let step = geometry.distance_per_step().get();
    let spacing = geometry.domino_spacing().get();
    let circumference = geometry.turn_circumference().get();

    // Distance travelled, in steps, and the number of dominoes dropped so far.
    let mut steps: u64 = 0;
    let mut dropped: u64 = 0;
    let travelled = |steps: u64| steps as f64 * step;
    let next_drop = |dropped: u64| dropped as f64 * spacing;

    // Each pass drives the outer wheel for two steps, so the distance along
    // the pivot circle is half of what we've counted.
    while travelled(steps) / 2.0 / circumference * 360.0 < degrees {
        if at_least(travelled(steps), next_drop(dropped)) {
            out.push(Token::DropDomino);
            dropped += 1;
        }
        out.push(Token::BothForward);
        out.push(side.pivot_token());
        steps += 2;
    }

    // Roll on to where the next domino would go, without dropping it.
    while at_most(travelled(steps), next_drop(dropped)) {
        out.push(Token::BothForward);
        steps += 1;
    }
}
