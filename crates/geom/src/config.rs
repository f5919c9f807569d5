//! Loading geometry parameters from `key=value` text.
//!
//! ```text
//! # inches, except for the step angle
//! wheel_radius=1.5
//! wheel_distance=10
//! degrees_per_step=1.8
//! distance_between_dominoes=1.2
//! ```
//!
//! Loading is forgiving: a bad line is reported and skipped, and the
//! parameter it was meant to set keeps its previous value.

use alloc::{string::String, vec::Vec};

use crate::{Geometry, GeometryError, Param};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("line {line}: `{value}` is not a valid number for {key}")]
    InvalidValue {
        line: usize,
        key: Param,
        value: String,
    },
    #[error("line {line}: expected `key=value`")]
    MissingSeparator { line: usize },
    #[error("line {line}: {source}")]
    Geometry {
        line: usize,
        #[source]
        source: GeometryError,
    },
}

/// Applies every recognized `key=value` line in `text` to `geometry`.
///
/// Each accepted value takes effect immediately, so the derived constants
/// are always consistent with what has been read so far. Returns the
/// problems that were skipped over, in the order they were found.
pub fn apply_config(geometry: &mut Geometry, text: &str) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }

        let Some((key, value)) = raw.split_once('=') else {
            errors.push(ConfigError::MissingSeparator { line });
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        let Ok(param) = key.parse::<Param>() else {
            log::debug!("line {line}: ignoring unknown key `{key}`");
            continue;
        };

        let Ok(parsed) = value.parse::<f64>() else {
            log::warn!("line {line}: keeping {param}={}", geometry.params().get(param));
            errors.push(ConfigError::InvalidValue {
                line,
                key: param,
                value: value.into(),
            });
            continue;
        };

        if let Err(source) = geometry.set(param, parsed) {
            log::warn!("line {line}: {source}");
            errors.push(ConfigError::Geometry { line, source });
        }
    }
    errors
}
