//! Basic geometry of the domino rover: the physical parameters of the chassis,
//! and the constants we derive from them when expanding a path into motor
//! steps.
//!
//! The rover has two driven wheels. Straight runs drive both wheels together,
//! while turns pivot around one wheel, so that the other wheel traces a circle
//! whose radius is the distance between the wheels (the "track").
//!
//! Lengths are measured in inches. This crate supports `no_std`, so that the
//! same geometry could be shared with a controller.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use core::f64::consts::PI;

pub mod config;

pub type Angle = euclid::Angle<f64>;

pub struct Inch;

pub type Len = euclid::Length<f64, Inch>;

pub trait LenExt {
    fn inches(self) -> Len;
}

impl LenExt for f64 {
    fn inches(self) -> Len {
        Len::new(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct LeftRight<T> {
    pub left: T,
    pub right: T,
}

/// One of the four base parameters of the rover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Param {
    WheelRadius,
    WheelDistance,
    DegreesPerStep,
    DistanceBetweenDominoes,
}

impl Param {
    pub const ALL: [Param; 4] = [
        Param::WheelRadius,
        Param::WheelDistance,
        Param::DegreesPerStep,
        Param::DistanceBetweenDominoes,
    ];

    /// The key used for this parameter in configuration files.
    pub fn key(self) -> &'static str {
        match self {
            Param::WheelRadius => "wheel_radius",
            Param::WheelDistance => "wheel_distance",
            Param::DegreesPerStep => "degrees_per_step",
            Param::DistanceBetweenDominoes => "distance_between_dominoes",
        }
    }
}

impl core::fmt::Display for Param {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown parameter `{0}`")]
pub struct UnknownParam(pub alloc::string::String);

impl core::str::FromStr for Param {
    type Err = UnknownParam;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Param::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| UnknownParam(s.into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("{param} must be positive and finite, got {value}")]
    Degenerate { param: Param, value: f64 },
    #[error("derived {name} must be positive and finite, got {value}")]
    DegenerateDerived { name: &'static str, value: f64 },
}

fn check(param: Param, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::Degenerate { param, value })
    }
}

/// The physical parameters of the rover.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Params {
    /// Radius of the wheels driven by the stepper motors.
    pub wheel_radius: Len,
    /// Distance between the two driven wheels. A pivot turn rotates one wheel
    /// around the other, on a circle of this radius.
    pub wheel_distance: Len,
    /// How far the motor shaft rotates on each step.
    pub degrees_per_step: Angle,
    /// Spacing between consecutive dominoes, measured along the path.
    pub distance_between_dominoes: Len,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            wheel_radius: 1.5.inches(),
            wheel_distance: 10.0.inches(),
            degrees_per_step: Angle::degrees(1.8),
            distance_between_dominoes: 1.2.inches(),
        }
    }
}

impl Params {
    pub fn get(&self, param: Param) -> f64 {
        match param {
            Param::WheelRadius => self.wheel_radius.get(),
            Param::WheelDistance => self.wheel_distance.get(),
            Param::DegreesPerStep => self.degrees_per_step.to_degrees(),
            Param::DistanceBetweenDominoes => self.distance_between_dominoes.get(),
        }
    }

    fn set_unchecked(&mut self, param: Param, value: f64) {
        match param {
            Param::WheelRadius => self.wheel_radius = value.inches(),
            Param::WheelDistance => self.wheel_distance = value.inches(),
            Param::DegreesPerStep => self.degrees_per_step = Angle::degrees(value),
            Param::DistanceBetweenDominoes => self.distance_between_dominoes = value.inches(),
        }
    }

    fn validate(&self) -> Result<(), GeometryError> {
        for param in Param::ALL {
            check(param, self.get(param))?;
        }
        Ok(())
    }
}

/// Renders the parameters in the same `key=value` form that
/// [`config::apply_config`] reads.
impl core::fmt::Display for Params {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for param in Param::ALL {
            writeln!(f, "{}={}", param, self.get(param))?;
        }
        Ok(())
    }
}

/// Constants derived from [`Params`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Derived {
    /// Distance the rim of a wheel travels on each motor step.
    pub distance_per_step: Len,
    /// Circumference of the circle traced by one wheel pivoting about the other.
    pub turn_circumference: Len,
    /// How far around the pivot circle a single step takes us.
    pub step_degree_change: Angle,
    /// Angular spacing between dominoes placed around the pivot circle.
    pub degrees_between_dominoes: Angle,
}

impl Derived {
    fn compute(params: &Params) -> Derived {
        let r = params.wheel_radius.get();
        let w = params.wheel_distance.get();
        let d = params.degrees_per_step.to_degrees();
        let s = params.distance_between_dominoes.get();

        let distance_per_step = 2.0 * PI * r * d / 360.0;
        let turn_circumference = 2.0 * PI * w;
        Derived {
            distance_per_step: distance_per_step.inches(),
            turn_circumference: turn_circumference.inches(),
            step_degree_change: Angle::degrees(distance_per_step / turn_circumference * 360.0),
            degrees_between_dominoes: Angle::degrees(s / turn_circumference * 360.0),
        }
    }

    /// Checks that every derived constant is usable as a loop increment.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let values = [
            ("distance per step", self.distance_per_step.get()),
            ("turn circumference", self.turn_circumference.get()),
            ("step degree change", self.step_degree_change.get()),
            ("degrees between dominoes", self.degrees_between_dominoes.get()),
        ];
        for (name, value) in values {
            if !(value.is_finite() && value > 0.0) {
                return Err(GeometryError::DegenerateDerived { name, value });
            }
        }
        Ok(())
    }
}

/// The geometric configuration of a rover.
///
/// The derived constants are recomputed on every change to the parameters,
/// and a `Geometry` can only hold parameters that produce positive, finite
/// derived constants. Rejected changes leave the geometry untouched.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Geometry {
    params: Params,
    derived: Derived,
}

impl Default for Geometry {
    fn default() -> Self {
        let params = Params::default();
        Geometry {
            params,
            derived: Derived::compute(&params),
        }
    }
}

impl Geometry {
    pub fn new(params: Params) -> Result<Self, GeometryError> {
        params.validate()?;
        let derived = Derived::compute(&params);
        derived.validate()?;
        Ok(Geometry { params, derived })
    }

    /// Replaces all of the parameters at once.
    pub fn update(&mut self, params: Params) -> Result<(), GeometryError> {
        *self = Geometry::new(params)?;
        Ok(())
    }

    pub fn set(&mut self, param: Param, value: f64) -> Result<(), GeometryError> {
        let mut params = self.params;
        params.set_unchecked(param, check(param, value)?);
        self.update(params)
    }

    pub fn set_wheel_radius(&mut self, radius: Len) -> Result<(), GeometryError> {
        self.set(Param::WheelRadius, radius.get())
    }

    pub fn set_wheel_distance(&mut self, distance: Len) -> Result<(), GeometryError> {
        self.set(Param::WheelDistance, distance.get())
    }

    pub fn set_degrees_per_step(&mut self, angle: Angle) -> Result<(), GeometryError> {
        self.set(Param::DegreesPerStep, angle.to_degrees())
    }

    pub fn set_domino_spacing(&mut self, spacing: Len) -> Result<(), GeometryError> {
        self.set(Param::DistanceBetweenDominoes, spacing.get())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn derived(&self) -> &Derived {
        &self.derived
    }

    pub fn wheel_radius(&self) -> Len {
        self.params.wheel_radius
    }

    pub fn wheel_distance(&self) -> Len {
        self.params.wheel_distance
    }

    pub fn degrees_per_step(&self) -> Angle {
        self.params.degrees_per_step
    }

    pub fn domino_spacing(&self) -> Len {
        self.params.distance_between_dominoes
    }

    pub fn distance_per_step(&self) -> Len {
        self.derived.distance_per_step
    }

    pub fn turn_circumference(&self) -> Len {
        self.derived.turn_circumference
    }

    pub fn step_degree_change(&self) -> Angle {
        self.derived.step_degree_change
    }

    pub fn degrees_between_dominoes(&self) -> Angle {
        self.derived.degrees_between_dominoes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    impl Arbitrary for Params {
        type Parameters = ();
        type Strategy = BoxedStrategy<Params>;

        fn arbitrary_with(_: ()) -> Self::Strategy {
            (0.1..10.0f64, 1.0..50.0f64, 0.1..15.0f64, 0.2..5.0f64)
                .prop_map(|(r, w, d, s)| Params {
                    wheel_radius: r.inches(),
                    wheel_distance: w.inches(),
                    degrees_per_step: Angle::degrees(d),
                    distance_between_dominoes: s.inches(),
                })
                .boxed()
        }
    }

    #[test]
    fn defaults() {
        let geom = Geometry::default();
        assert!(close(geom.distance_per_step().get(), 0.047_123_889_803_846_9));
        assert_eq!(geom.turn_circumference().get(), 2.0 * PI * 10.0);
        assert!(close(geom.step_degree_change().to_degrees(), 0.27));
        assert!(close(geom.degrees_between_dominoes().to_degrees(), 1.2 / (20.0 * PI) * 360.0));
        assert_eq!(Geometry::new(Params::default()).unwrap(), geom);
    }

    #[test]
    fn setters_recompute() {
        let mut geom = Geometry::default();
        let before = geom.distance_per_step();
        geom.set_wheel_radius(3.0.inches()).unwrap();
        assert!(close(geom.distance_per_step().get(), 2.0 * before.get()));

        geom.set_wheel_distance(5.0.inches()).unwrap();
        assert_eq!(geom.turn_circumference().get(), 2.0 * PI * 5.0);
        assert!(close(
            geom.step_degree_change().to_degrees(),
            geom.distance_per_step().get() / geom.turn_circumference().get() * 360.0
        ));
    }

    #[test]
    fn rejects_degenerate() {
        let mut geom = Geometry::default();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            for param in Param::ALL {
                let err = geom.set(param, bad).unwrap_err();
                assert!(matches!(err, GeometryError::Degenerate { param: p, .. } if p == param));
            }
        }
        assert_eq!(geom, Geometry::default());

        let huge = Params {
            wheel_radius: f64::MAX.inches(),
            ..Params::default()
        };
        assert!(matches!(
            Geometry::new(huge),
            Err(GeometryError::DegenerateDerived { .. })
        ));
    }

    #[test]
    fn param_keys() {
        for param in Param::ALL {
            assert_eq!(param.key().parse::<Param>().unwrap(), param);
        }
        assert!("wheel".parse::<Param>().is_err());
    }

    proptest! {
        #[test]
        fn derived_constants(params: Params) {
            let geom = Geometry::new(params).unwrap();
            prop_assert!(geom.distance_per_step().get() > 0.0);
            prop_assert_eq!(geom.turn_circumference().get(), 2.0 * PI * params.wheel_distance.get());
            prop_assert!(geom.step_degree_change().get() > 0.0);
        }

        #[test]
        fn domino_degrees_are_linear_in_spacing(params: Params, k in 0.5..4.0f64) {
            let geom = Geometry::new(params).unwrap();
            let mut scaled = geom;
            scaled.set_domino_spacing(params.distance_between_dominoes * k).unwrap();
            prop_assert!(close(
                scaled.degrees_between_dominoes().get(),
                geom.degrees_between_dominoes().get() * k
            ));
        }

        // Every parameter has to stay in sync with its setter.
        #[test]
        fn set_matches_new(params: Params, param in proptest::sample::select(Param::ALL.to_vec()), v in 0.1..10.0f64) {
            let mut geom = Geometry::new(params).unwrap();
            geom.set(param, v).unwrap();
            let mut expected = params;
            expected.set_unchecked(param, v);
            prop_assert_eq!(geom, Geometry::new(expected).unwrap());
        }
    }
}
