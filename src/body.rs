use core::fmt;

use crate::Orbit;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named mass that can be placed in an [`Astrarium`][crate::Astrarium].
///
/// A body carries no position of its own. Where it is at a given time comes
/// from its orbit, evaluated by the hierarchy that owns it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Body {
    /// Display name, also used by [`Astrarium::find_by_name`][crate::Astrarium::find_by_name].
    pub name: String,

    /// Mass in kilograms. Together with the gravitational constant this
    /// gives the `mu` of every orbit around the body.
    pub mass: f64,

    /// Mean radius in meters.
    pub radius: f64,

    /// The trajectory around the parent it names.
    ///
    /// `None` marks the root of a hierarchy, which stays at the origin.
    /// Every other body needs one; [`Astrarium::add_body`][crate::Astrarium::add_body]
    /// rejects it otherwise.
    pub orbit: Option<Orbit>,
}

impl Body {
    /// Creates a body. Pass `None` as the orbit for the root of a system.
    pub fn new(name: impl Into<String>, mass: f64, radius: f64, orbit: Option<Orbit>) -> Self {
        Self {
            name: name.into(),
            mass,
            radius,
            orbit,
        }
    }

    /// `G * mass`, the `mu` of anything orbiting this body.
    pub fn standard_gravitational_parameter(&self, gravitational_constant: f64) -> f64 {
        gravitational_constant * self.mass
    }
}

impl Default for Body {
    /// An Earth-sized root body.
    fn default() -> Self {
        Self {
            name: "Earth".to_string(),
            mass: 5.9736e24,
            radius: 6.371e6,
            orbit: None,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
