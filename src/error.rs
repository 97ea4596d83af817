//! Error types for every fallible operation in the crate.

use thiserror::Error;

use crate::BodyId;

/// An error raised by the vector helpers in [`Vector`][crate::Vector].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VectorError {
    /// A zero-length vector was normalised, or used as a rotation axis.
    #[error("cannot normalise a zero-length vector")]
    ZeroLength,

    /// A planar-only operation was given two vectors off the XY plane.
    #[error("operation is only supported when both vectors lie on the XY plane")]
    NotPlanar,
}

/// An error raised by the Kepler equation solvers.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SolverError {
    /// The eccentricity was negative, which no conic section has.
    #[error("eccentricity must not be negative (got {0})")]
    NegativeEccentricity(f64),

    /// The solver was called with an eccentricity outside the range it handles.
    #[error("eccentricity {0} is not supported by this solver")]
    UnsupportedEccentricity(f64),
}

/// An error raised when building or evaluating an [`Orbit`][crate::Orbit].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OrbitError {
    /// ### Attempt to build an orbit with a negative eccentricity.
    /// Eccentricity partitions orbits into circular, elliptical,
    /// parabolic and hyperbolic. A negative value belongs to none of them.
    #[error("eccentricity should never be negative (got {0})")]
    NegativeEccentricity(f64),

    /// ### Attempt to build an orbit with a non-positive or non-finite semi-major axis.
    #[error("semi-major axis must be positive and finite (got {0})")]
    InvalidSemiMajorAxis(f64),

    /// ### Attempt to build an orbit around a parent with a non-positive or non-finite
    /// gravitational parameter.
    #[error("gravitational parameter must be positive and finite (got {0})")]
    InvalidGravitationalParameter(f64),

    /// ### A quantity only defined for bound orbits was requested from an open one.
    /// The orbital period of a parabolic or hyperbolic trajectory does not exist,
    /// and neither do its sphere of influence or Hill sphere.
    #[error("quantity is only defined for bound (circular or elliptical) orbits")]
    Unbound,

    /// The underlying Kepler solver rejected its input.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// An error raised when deriving an orbit from a position and a velocity.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DeterminationError {
    /// The position coincides with the parent's centre of mass.
    #[error("position must not be at the origin")]
    ZeroPosition,

    /// The velocity is zero or parallel to the position, leaving no orbital plane.
    #[error("state vectors have no angular momentum (radial or stationary trajectory)")]
    DegenerateAngularMomentum,

    /// The parent has no gravitational parameter to orbit around.
    #[error("parent body has no mass")]
    Massless,

    /// The derived elements could not form a valid orbit.
    #[error(transparent)]
    Orbit(#[from] OrbitError),
}

/// An error raised by the [`Astrarium`][crate::Astrarium] aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AstrariumError {
    /// There was no body with the given id.
    #[error("there is no body with id {0}")]
    BodyNotFound(BodyId),

    /// A non-root body was added without an orbit naming its parent.
    #[error("only the root body may be added without an orbit")]
    OrbitRequired,

    /// The orbit's gravitational parameter disagrees with the parent's mass.
    #[error("orbit expects a parent with mu = {found}, but the parent has mu = {expected}")]
    GravitationalParameterMismatch {
        /// `G * mass` of the parent in the hierarchy.
        expected: f64,
        /// The gravitational parameter stored in the orbit.
        found: f64,
    },

    /// A distance from a body's centre was zero, negative or not finite.
    #[error("radius must be positive and finite (got {0})")]
    InvalidRadius(f64),

    /// Building or rendering an orbit failed.
    #[error(transparent)]
    Orbit(#[from] OrbitError),

    /// A position was geometrically degenerate.
    #[error(transparent)]
    Vector(#[from] VectorError),

    /// Deriving an orbit from state vectors failed.
    #[error(transparent)]
    Determination(#[from] DeterminationError),
}
