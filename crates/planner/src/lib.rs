//! Path planning for the domino rover.
//!
//! A [`Planner`] owns the rover's geometry and the path the user is building.
//! Actions are appended or removed one at a time, and [`Planner::expand`]
//! turns the path into the instruction stream that gets sent to the motor
//! controller.

use domino_geom::{config::ConfigError, Geometry, GeometryError, Param, Params};
use domino_protocol::Instructions;

pub mod expand;
pub mod path;

pub use expand::{expand, ExpandError};
pub use path::{Direction, MoveKind, Path, PathAction, PathError, PivotExtent, Side};

#[derive(Clone, Debug, Default)]
pub struct Planner {
    geometry: Geometry,
    path: Path,
}

impl Planner {
    pub fn new(geometry: Geometry) -> Self {
        Planner {
            geometry,
            path: Path::new(),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn update_geometry(&mut self, params: Params) -> Result<(), GeometryError> {
        self.geometry.update(params)
    }

    pub fn set_param(&mut self, param: Param, value: f64) -> Result<(), GeometryError> {
        self.geometry.set(param, value)
    }

    /// Applies a `key=value` configuration. Since the existing path was
    /// planned against the old geometry, it gets discarded.
    pub fn load_config(&mut self, text: &str) -> Vec<ConfigError> {
        self.path.clear();
        domino_geom::config::apply_config(&mut self.geometry, text)
    }

    /// Appends an action given in the menu's "negative means unset" form.
    pub fn append(&mut self, kind: MoveKind, domino_count: i64, turn_degrees: f64) -> PathAction {
        let action = PathAction::from_parts(kind, domino_count, turn_degrees);
        self.push(action);
        action
    }

    pub fn push(&mut self, action: PathAction) {
        log::debug!("action #{}: {action}", self.path.count() + 1);
        self.path.append(action);
    }

    pub fn remove_last(&mut self) -> Result<PathAction, PathError> {
        self.path.remove_last()
    }

    pub fn clear(&mut self) {
        self.path.clear();
    }

    pub fn count(&self) -> usize {
        self.path.count()
    }

    pub fn expand(&self) -> Result<Instructions, ExpandError> {
        expand(&self.geometry, &self.path)
    }
}
