use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

/// The side we turn towards. A left pivot drives the right wheel, and vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// How far a pivot goes: either far enough to place a number of dominoes, or
/// through a given angle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PivotExtent {
    Dominoes(u32),
    Degrees(f64),
}

/// The movement tags accepted by [`PathAction::from_parts`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    StraightForward,
    StraightBackward,
    PivotLeft,
    PivotRight,
}

/// One step of the path, as entered by the user.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathAction {
    Straight { direction: Direction, dominoes: u32 },
    Pivot { side: Side, extent: PivotExtent },
}

impl PathAction {
    /// Builds an action from a movement tag and a pair of optional amounts,
    /// where anything negative means "unset".
    ///
    /// Straight runs only look at `domino_count`. Pivots are driven by
    /// `turn_degrees` when it is positive, and by `domino_count` otherwise.
    pub fn from_parts(kind: MoveKind, domino_count: i64, turn_degrees: f64) -> PathAction {
        let dominoes = u32::try_from(domino_count.max(0)).unwrap_or(u32::MAX);
        let pivot = |side| PathAction::Pivot {
            side,
            extent: if turn_degrees > 0.0 {
                PivotExtent::Degrees(turn_degrees)
            } else {
                PivotExtent::Dominoes(dominoes)
            },
        };

        match kind {
            MoveKind::StraightForward => PathAction::Straight {
                direction: Direction::Forward,
                dominoes,
            },
            MoveKind::StraightBackward => PathAction::Straight {
                direction: Direction::Backward,
                dominoes,
            },
            MoveKind::PivotLeft => pivot(Side::Left),
            MoveKind::PivotRight => pivot(Side::Right),
        }
    }

    pub fn kind(&self) -> MoveKind {
        match self {
            PathAction::Straight {
                direction: Direction::Forward,
                ..
            } => MoveKind::StraightForward,
            PathAction::Straight {
                direction: Direction::Backward,
                ..
            } => MoveKind::StraightBackward,
            PathAction::Pivot {
                side: Side::Left, ..
            } => MoveKind::PivotLeft,
            PathAction::Pivot {
                side: Side::Right, ..
            } => MoveKind::PivotRight,
        }
    }

    pub fn domino_count(&self) -> Option<u32> {
        match *self {
            PathAction::Straight { dominoes, .. }
            | PathAction::Pivot {
                extent: PivotExtent::Dominoes(dominoes),
                ..
            } => Some(dominoes),
            PathAction::Pivot { .. } => None,
        }
    }

    pub fn turn_degrees(&self) -> Option<f64> {
        match *self {
            PathAction::Pivot {
                extent: PivotExtent::Degrees(deg),
                ..
            } => Some(deg),
            _ => None,
        }
    }
}

impl fmt::Display for PathAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathAction::Straight {
                direction,
                dominoes,
            } => {
                let dir = match direction {
                    Direction::Forward => "forward",
                    Direction::Backward => "backward",
                };
                write!(f, "straight {dir}, {dominoes} dominoes")
            }
            PathAction::Pivot { side, extent } => {
                let side = match side {
                    Side::Left => "left",
                    Side::Right => "right",
                };
                match extent {
                    PivotExtent::Dominoes(n) => write!(f, "pivot {side}, {n} dominoes"),
                    PivotExtent::Degrees(deg) => write!(f, "pivot {side}, {deg} degrees"),
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("the path is empty")]
    Empty,
}

/// The ordered list of actions making up a path. Actions run in the order
/// they were appended.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Path {
    actions: Vec<PathAction>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, action: PathAction) {
        self.actions.push(action);
    }

    /// Removes and returns the most recently appended action.
    pub fn remove_last(&mut self) -> Result<PathAction, PathError> {
        self.actions.pop().ok_or(PathError::Empty)
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn count(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn last(&self) -> Option<&PathAction> {
        self.actions.last()
    }

    pub fn get(&self, idx: usize) -> Option<&PathAction> {
        self.actions.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathAction> {
        self.actions.iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathAction;
    type IntoIter = std::slice::Iter<'a, PathAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

impl FromIterator<PathAction> for Path {
    fn from_iter<I: IntoIterator<Item = PathAction>>(iter: I) -> Self {
        Path {
            actions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl proptest::arbitrary::Arbitrary for PathAction {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<PathAction>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        let side = || prop_oneof![Just(Side::Left), Just(Side::Right)];
        let direction = prop_oneof![Just(Direction::Forward), Just(Direction::Backward)];
        prop_oneof![
            (direction, 0u32..8).prop_map(|(direction, dominoes)| PathAction::Straight {
                direction,
                dominoes
            }),
            (side(), 0u32..8).prop_map(|(side, n)| PathAction::Pivot {
                side,
                extent: PivotExtent::Dominoes(n)
            }),
            (side(), 0.5..400.0f64).prop_map(|(side, deg)| PathAction::Pivot {
                side,
                extent: PivotExtent::Degrees(deg)
            }),
        ]
        .boxed()
    }
}
