use core::f64::consts::TAU;
use core::fmt;

use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    clock::millis_to_seconds,
    solvers::{
        solve_eccentric_anomaly, solve_hyperbolic_anomaly, solve_parabolic_anomaly,
        KeplerSolution,
    },
    vector::rotate_about_unit_axis,
    BodyId, OrbitError, Vector as _,
};

/// The number of decimal places the Kepler solvers aim for when an orbit
/// is evaluated at a time.
pub const DEFAULT_PRECISION: f64 = 10.0;

/// The four mutually exclusive conic sections a Keplerian orbit can trace.
///
/// The type is derived on demand from the eccentricity, which stays the
/// single source of truth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrbitType {
    /// Eccentricity of exactly zero.
    Circular,
    /// Eccentricity strictly between zero and one.
    Elliptical,
    /// Eccentricity of exactly one.
    Parabolic,
    /// Eccentricity greater than one.
    Hyperbolic,
}

impl OrbitType {
    /// Classifies an eccentricity.
    ///
    /// # Errors
    /// Returns [`OrbitError::NegativeEccentricity`] for negative (or NaN) values.
    ///
    /// # Example
    /// ```
    /// use astrarium::OrbitType;
    ///
    /// assert_eq!(OrbitType::from_eccentricity(0.0), Ok(OrbitType::Circular));
    /// assert_eq!(OrbitType::from_eccentricity(0.5), Ok(OrbitType::Elliptical));
    /// assert_eq!(OrbitType::from_eccentricity(1.0), Ok(OrbitType::Parabolic));
    /// assert_eq!(OrbitType::from_eccentricity(3.0), Ok(OrbitType::Hyperbolic));
    /// assert!(OrbitType::from_eccentricity(-0.1).is_err());
    /// ```
    pub fn from_eccentricity(eccentricity: f64) -> Result<OrbitType, OrbitError> {
        if eccentricity.is_nan() || eccentricity < 0.0 {
            Err(OrbitError::NegativeEccentricity(eccentricity))
        } else if eccentricity == 0.0 {
            Ok(OrbitType::Circular)
        } else if eccentricity < 1.0 {
            Ok(OrbitType::Elliptical)
        } else if eccentricity == 1.0 {
            Ok(OrbitType::Parabolic)
        } else {
            Ok(OrbitType::Hyperbolic)
        }
    }

    /// Whether a body on this kind of orbit keeps coming back.
    pub fn is_bound(self) -> bool {
        matches!(self, OrbitType::Circular | OrbitType::Elliptical)
    }
}

impl fmt::Display for OrbitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrbitType::Circular => "circular",
            OrbitType::Elliptical => "elliptical",
            OrbitType::Parabolic => "parabolic",
            OrbitType::Hyperbolic => "hyperbolic",
        };
        f.write_str(name)
    }
}

/// The six classical elements describing the shape and orientation of an orbit.
///
/// Angles are in radians and distances in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalElements {
    /// The semi-major axis, in meters.
    ///
    /// Always positive: for hyperbolic orbits this holds the magnitude of the
    /// (negative) semi-major axis, and for parabolic orbits, whose semi-major
    /// axis is infinite, it holds the periapsis distance instead.
    pub semi_major_axis: f64,
    /// The eccentricity.
    pub eccentricity: f64,
    /// The inclination, in radians.
    pub inclination: f64,
    /// The longitude of ascending node, in radians.
    pub longitude_of_ascending_node: f64,
    /// The argument of periapsis, in radians.
    pub argument_of_periapsis: f64,
    /// The mean anomaly at time zero, in radians.
    pub mean_anomaly_at_epoch: f64,
}

impl OrbitalElements {
    /// Elements of an equatorial orbit with every angle set to zero.
    pub fn planar(semi_major_axis: f64, eccentricity: f64) -> OrbitalElements {
        OrbitalElements {
            semi_major_axis,
            eccentricity,
            inclination: 0.0,
            longitude_of_ascending_node: 0.0,
            argument_of_periapsis: 0.0,
            mean_anomaly_at_epoch: 0.0,
        }
    }
}

/// The outcome of evaluating an orbit at one instant.
///
/// This is what [`Orbit::render`] returns; the [`Astrarium`][crate::Astrarium]
/// keeps one per body as its render cache.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderedState {
    /// The time this state was rendered for, in milliseconds.
    pub time: i64,
    /// The eccentric anomaly (hyperbolic or parabolic anomaly for open orbits).
    pub eccentric_anomaly: f64,
    /// The position on the orbital plane, with periapsis along +X.
    pub position_on_orbital_plane: DVec3,
    /// The position relative to the parent body, in the parent's reference frame.
    pub position_from_parent: DVec3,
    /// Whether the Kepler solver reached the requested precision.
    pub converged: bool,
}

/// A Keplerian orbit around a parent body.
///
/// The orbit stores its elements together with the standard gravitational
/// parameter of its parent, which is fixed at construction.
/// The parent itself is only referenced by its [`BodyId`].
///
/// # Example
/// ```
/// use astrarium::{BodyId, Orbit, OrbitalElements, OrbitType};
///
/// let orbit = Orbit::new(
///     BodyId::ROOT,
///     3.986e14,
///     OrbitalElements::planar(7.0e6, 0.1),
/// ).unwrap();
///
/// assert_eq!(orbit.orbit_type(), OrbitType::Elliptical);
/// assert!(orbit.specific_orbital_energy() < 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Orbit {
    /// The body this orbit goes around.
    parent: BodyId,

    /// The gravitational parameter of the parent body, in m^3 s^-2.
    mu: f64,

    /// The semi-major axis, in meters. See [`OrbitalElements::semi_major_axis`].
    semi_major_axis: f64,

    /// The eccentricity of the orbit.
    /// e = 0: circle
    /// e < 1: ellipse
    /// e = 1: parabola
    /// e > 1: hyperbola
    eccentricity: f64,

    inclination: f64,
    long_asc_node: f64,
    arg_pe: f64,
    mean_anomaly_at_epoch: f64,
}

// Construction and raw elements
impl Orbit {
    /// Creates a new orbit around `parent`, whose gravitational parameter is `mu`.
    ///
    /// # Errors
    /// - [`OrbitError::NegativeEccentricity`] if the eccentricity is negative.
    /// - [`OrbitError::InvalidSemiMajorAxis`] if the semi-major axis is not
    ///   positive and finite.
    /// - [`OrbitError::InvalidGravitationalParameter`] if `mu` is not positive
    ///   and finite.
    pub fn new(parent: BodyId, mu: f64, elements: OrbitalElements) -> Result<Orbit, OrbitError> {
        OrbitType::from_eccentricity(elements.eccentricity)?;

        if !(mu > 0.0 && mu.is_finite()) {
            return Err(OrbitError::InvalidGravitationalParameter(mu));
        }

        let semi_major_axis = elements.semi_major_axis;
        if !(semi_major_axis > 0.0 && semi_major_axis.is_finite()) {
            return Err(OrbitError::InvalidSemiMajorAxis(semi_major_axis));
        }

        Ok(Orbit {
            parent,
            mu,
            semi_major_axis,
            eccentricity: elements.eccentricity,
            inclination: elements.inclination,
            long_asc_node: elements.longitude_of_ascending_node,
            arg_pe: elements.argument_of_periapsis,
            mean_anomaly_at_epoch: elements.mean_anomaly_at_epoch,
        })
    }

    /// Computes the eccentricity of an ellipse from its semi-major and
    /// semi-minor axes.
    pub fn eccentricity_from_axes(semi_major_axis: f64, semi_minor_axis: f64) -> f64 {
        (1.0 - (semi_minor_axis * semi_minor_axis) / (semi_major_axis * semi_major_axis)).sqrt()
    }

    /// The body this orbit goes around.
    pub fn parent(&self) -> BodyId {
        self.parent
    }

    /// Gets the gravitational parameter of the parent body.
    ///
    /// The gravitational parameter mu of the parent body equals the
    /// gravitational constant G times the mass of the parent body M.
    #[doc(alias = "get_mu")]
    pub fn gravitational_parameter(&self) -> f64 {
        self.mu
    }

    /// See [`OrbitalElements::semi_major_axis`].
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Gets the eccentricity of the orbit.
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Gets the inclination of the orbit in radians.
    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    /// Gets the longitude of ascending node of the orbit in radians.
    pub fn longitude_of_ascending_node(&self) -> f64 {
        self.long_asc_node
    }

    /// Gets the argument of periapsis of the orbit in radians.
    pub fn argument_of_periapsis(&self) -> f64 {
        self.arg_pe
    }

    /// Gets the mean anomaly of the orbit at time zero, in radians.
    pub fn mean_anomaly_at_epoch(&self) -> f64 {
        self.mean_anomaly_at_epoch
    }

    /// Gets all six elements at once.
    pub fn elements(&self) -> OrbitalElements {
        OrbitalElements {
            semi_major_axis: self.semi_major_axis,
            eccentricity: self.eccentricity,
            inclination: self.inclination,
            longitude_of_ascending_node: self.long_asc_node,
            argument_of_periapsis: self.arg_pe,
            mean_anomaly_at_epoch: self.mean_anomaly_at_epoch,
        }
    }

    pub(crate) fn set_mean_anomaly_at_epoch(&mut self, mean_anomaly: f64) {
        self.mean_anomaly_at_epoch = mean_anomaly;
    }

    /// Classifies the orbit by its eccentricity.
    pub fn orbit_type(&self) -> OrbitType {
        // The constructor rejects negative eccentricities, so only the
        // non-negative branches are reachable here.
        if self.eccentricity == 0.0 {
            OrbitType::Circular
        } else if self.eccentricity < 1.0 {
            OrbitType::Elliptical
        } else if self.eccentricity == 1.0 {
            OrbitType::Parabolic
        } else {
            OrbitType::Hyperbolic
        }
    }
}

// Shape
impl Orbit {
    /// Gets the semi-minor axis of the orbit.
    ///
    /// Returns infinity for parabolic orbits.
    pub fn semi_minor_axis(&self) -> f64 {
        match self.orbit_type() {
            OrbitType::Parabolic => f64::INFINITY,
            _ => (self.semi_major_axis * self.semi_latus_rectum()).sqrt(),
        }
    }

    /// Gets the distance between the centre of the conic and the focus
    /// occupied by the parent body.
    ///
    /// Returns infinity for parabolic orbits, which have no centre.
    #[doc(alias = "linear_eccentricity")]
    pub fn focus_distance(&self) -> f64 {
        match self.orbit_type() {
            OrbitType::Parabolic => f64::INFINITY,
            _ => self.semi_major_axis * self.eccentricity,
        }
    }

    /// Gets the semi-latus rectum of the orbit.
    ///
    /// Learn more: <https://en.wikipedia.org/wiki/Conic_section#Conic_parameters>
    pub fn semi_latus_rectum(&self) -> f64 {
        match self.orbit_type() {
            OrbitType::Circular => self.semi_major_axis,
            OrbitType::Parabolic => 2.0 * self.periapsis(),
            _ => (self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)).abs(),
        }
    }

    /// Gets the periapsis of the orbit, the distance at the closest point
    /// to the parent body.
    pub fn periapsis(&self) -> f64 {
        match self.orbit_type() {
            OrbitType::Parabolic => self.semi_major_axis,
            OrbitType::Hyperbolic => self.semi_major_axis * (self.eccentricity - 1.0),
            _ => self.semi_major_axis * (1.0 - self.eccentricity),
        }
    }

    /// Gets the apoapsis of the orbit.
    /// Returns infinity for parabolic and hyperbolic trajectories.
    pub fn apoapsis(&self) -> f64 {
        if self.orbit_type().is_bound() {
            self.semi_major_axis * (1.0 + self.eccentricity)
        } else {
            f64::INFINITY
        }
    }

    /// Gets the distance to the parent body at a given true anomaly.
    ///
    /// # Angle
    /// The angle is expressed in radians.
    #[doc(alias = "radius_at_angle")]
    pub fn radius_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        match self.orbit_type() {
            OrbitType::Circular => self.semi_major_axis,
            OrbitType::Parabolic => 2.0 * self.periapsis() / (1.0 + true_anomaly.cos()),
            _ => self.semi_latus_rectum() / (1.0 + self.eccentricity * true_anomaly.cos()),
        }
    }
}

// Speeds and energy
impl Orbit {
    /// Gets the speed of an equivalent circular orbit at the semi-major axis.
    pub fn mean_velocity(&self) -> f64 {
        (self.mu / self.semi_major_axis).sqrt()
    }

    /// Gets the speed at a given distance from the parent body, using the
    /// vis-viva equation.
    ///
    /// # Unchecked Operation
    /// This does not check whether the orbit ever reaches `radius`.
    pub fn speed_at_radius(&self, radius: f64) -> f64 {
        match self.orbit_type() {
            OrbitType::Circular => self.mean_velocity(),
            OrbitType::Parabolic => (2.0 * self.mu / radius).sqrt(),
            OrbitType::Elliptical => {
                (self.mu * (2.0 / radius - self.semi_major_axis.recip())).sqrt()
            }
            // The semi-major axis of a hyperbola is negative.
            OrbitType::Hyperbolic => {
                (self.mu * (2.0 / radius + self.semi_major_axis.recip())).sqrt()
            }
        }
    }

    /// Gets the speed at a given true anomaly.
    #[doc(alias = "speed_at_angle")]
    pub fn speed_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        self.speed_at_radius(self.radius_at_true_anomaly(true_anomaly))
    }

    /// Gets the flight path angle at a given true anomaly: the angle between
    /// the velocity and the local horizontal.
    pub fn flight_path_angle(&self, true_anomaly: f64) -> f64 {
        match self.orbit_type() {
            OrbitType::Circular => 0.0,
            OrbitType::Parabolic => true_anomaly / 2.0,
            _ => {
                let (sin, cos) = true_anomaly.sin_cos();
                (self.eccentricity * sin).atan2(1.0 + self.eccentricity * cos)
            }
        }
    }

    /// Gets the specific orbital energy, in J/kg.
    ///
    /// Bound orbits have negative energy, parabolic trajectories exactly zero,
    /// and hyperbolic trajectories positive energy.
    pub fn specific_orbital_energy(&self) -> f64 {
        match self.orbit_type() {
            OrbitType::Parabolic => 0.0,
            OrbitType::Hyperbolic => self.mu / (2.0 * self.semi_major_axis),
            _ => -self.mu / (2.0 * self.semi_major_axis),
        }
    }

    /// Gets the magnitude of the specific angular momentum, `sqrt(mu p)`.
    pub fn specific_angular_momentum(&self) -> f64 {
        (self.mu * self.semi_latus_rectum()).sqrt()
    }

    /// Gets the area swept by the radius vector per second.
    ///
    /// By Kepler's second law this is constant along the orbit.
    pub fn areal_velocity(&self) -> f64 {
        let mu = self.mu;
        let a = self.semi_major_axis;
        let e = self.eccentricity;

        0.5 * match self.orbit_type() {
            OrbitType::Circular => (mu * a).sqrt(),
            OrbitType::Elliptical => (mu * a * (1.0 - e * e)).sqrt(),
            OrbitType::Parabolic => (2.0 * mu * self.periapsis()).sqrt(),
            OrbitType::Hyperbolic => (mu * a * (e * e - 1.0)).sqrt(),
        }
    }

    /// Gets the rate at which the mean anomaly advances, in radians per second.
    ///
    /// For parabolic trajectories this is the rate of Barker's mean anomaly,
    /// `sqrt(mu / (2 q^3))`.
    pub fn mean_motion(&self) -> f64 {
        let a_cubed = self.semi_major_axis.powi(3);

        match self.orbit_type() {
            OrbitType::Parabolic => (self.mu / (2.0 * a_cubed)).sqrt(),
            _ => (self.mu / a_cubed).sqrt(),
        }
    }

    /// Gets the time it takes to complete one revolution of the orbit, in seconds.
    ///
    /// # Errors
    /// Returns [`OrbitError::Unbound`] for parabolic and hyperbolic trajectories.
    pub fn orbital_period(&self) -> Result<f64, OrbitError> {
        if !self.orbit_type().is_bound() {
            return Err(OrbitError::Unbound);
        }

        // T = 2pi * sqrt(a^3 / GM)
        Ok(TAU * (self.semi_major_axis.powi(3) / self.mu).sqrt())
    }

    /// Gets the time elapsed since periapsis when the body is at the given
    /// true anomaly, in seconds.
    ///
    /// Negative values mean the body has yet to reach periapsis.
    pub fn time_from_periapsis(&self, true_anomaly: f64) -> f64 {
        self.mean_anomaly_at_true_anomaly(true_anomaly) / self.mean_motion()
    }
}

// Anomalies
impl Orbit {
    /// Gets the mean anomaly at a given time, in radians.
    ///
    /// # Time
    /// The time is expressed in milliseconds.
    pub fn mean_anomaly_at_time(&self, time: i64) -> f64 {
        self.mean_motion() * millis_to_seconds(time) + self.mean_anomaly_at_epoch
    }

    /// Solves Kepler's equation for this orbit at a given mean anomaly.
    ///
    /// For closed orbits the mean anomaly is first reduced into `[0, tau)`,
    /// so the returned eccentric anomaly lies roughly in that range too.
    ///
    /// Open orbits return the hyperbolic eccentric anomaly, or
    /// `tan(f / 2)` for parabolic trajectories.
    pub fn eccentric_anomaly_at_mean_anomaly(
        &self,
        mean_anomaly: f64,
    ) -> Result<KeplerSolution, OrbitError> {
        let e = self.eccentricity;

        let solution = match self.orbit_type() {
            OrbitType::Circular | OrbitType::Elliptical => {
                solve_eccentric_anomaly(mean_anomaly.rem_euclid(TAU), e, DEFAULT_PRECISION)?
            }
            OrbitType::Parabolic => solve_parabolic_anomaly(mean_anomaly),
            OrbitType::Hyperbolic => solve_hyperbolic_anomaly(mean_anomaly, e, DEFAULT_PRECISION)?,
        };

        Ok(solution)
    }

    /// Gets the eccentric anomaly at a given time in milliseconds.
    ///
    /// See [`eccentric_anomaly_at_mean_anomaly`][Orbit::eccentric_anomaly_at_mean_anomaly].
    pub fn eccentric_anomaly_at_time(&self, time: i64) -> Result<KeplerSolution, OrbitError> {
        self.eccentric_anomaly_at_mean_anomaly(self.mean_anomaly_at_time(time))
    }

    /// Gets the true anomaly at a given eccentric anomaly.
    pub fn true_anomaly_at_eccentric_anomaly(&self, eccentric_anomaly: f64) -> f64 {
        let e = self.eccentricity;

        match self.orbit_type() {
            OrbitType::Circular => eccentric_anomaly,
            OrbitType::Elliptical => {
                // https://en.wikipedia.org/wiki/True_anomaly#From_the_eccentric_anomaly
                let (sin, cos) = (eccentric_anomaly * 0.5).sin_cos();
                2.0 * ((1.0 + e).sqrt() * sin).atan2((1.0 - e).sqrt() * cos)
            }
            OrbitType::Parabolic => 2.0 * eccentric_anomaly.atan(),
            OrbitType::Hyperbolic => {
                // tan(f/2) = sqrt((e+1)/(e-1)) * tanh(H/2)
                2.0 * (((e + 1.0) / (e - 1.0)).sqrt() * (eccentric_anomaly * 0.5).tanh()).atan()
            }
        }
    }

    /// Gets the true anomaly at a given time in milliseconds.
    pub fn true_anomaly_at_time(&self, time: i64) -> Result<f64, OrbitError> {
        let solution = self.eccentric_anomaly_at_time(time)?;
        Ok(self.true_anomaly_at_eccentric_anomaly(solution.anomaly))
    }

    /// Gets the eccentric anomaly at a given true anomaly.
    ///
    /// For hyperbolic orbits, true anomalies beyond the asymptotes have no
    /// corresponding point and produce `NaN`.
    #[doc(alias = "eccentric_anomaly_at_angle")]
    pub fn eccentric_anomaly_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        let e = self.eccentricity;

        match self.orbit_type() {
            OrbitType::Circular => true_anomaly,
            OrbitType::Elliptical => {
                let (sin, cos) = (true_anomaly * 0.5).sin_cos();
                2.0 * ((1.0 - e).sqrt() * sin).atan2((1.0 + e).sqrt() * cos)
            }
            OrbitType::Parabolic => (true_anomaly * 0.5).tan(),
            OrbitType::Hyperbolic => {
                let cos = true_anomaly.cos();
                let cosh = (e + cos) / (1.0 + e * cos);
                cosh.acosh().copysign(true_anomaly.sin())
            }
        }
    }

    /// Gets the mean anomaly at a given eccentric anomaly.
    pub fn mean_anomaly_at_eccentric_anomaly(&self, eccentric_anomaly: f64) -> f64 {
        let e = self.eccentricity;
        let anomaly = eccentric_anomaly;

        match self.orbit_type() {
            OrbitType::Circular => anomaly,
            OrbitType::Elliptical => anomaly - e * anomaly.sin(),
            OrbitType::Parabolic => anomaly + anomaly.powi(3) / 3.0,
            OrbitType::Hyperbolic => e * anomaly.sinh() - anomaly,
        }
    }

    /// Gets the mean anomaly at a given true anomaly.
    #[doc(alias = "mean_anomaly_at_angle")]
    pub fn mean_anomaly_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        self.mean_anomaly_at_eccentric_anomaly(self.eccentric_anomaly_at_true_anomaly(true_anomaly))
    }
}

// Positions
impl Orbit {
    /// Gets the position on the orbital plane at a given eccentric anomaly.
    ///
    /// The parent body sits at the origin, periapsis lies along +X and the
    /// body moves counter-clockwise. Z is always zero.
    pub fn position_on_orbital_plane(&self, eccentric_anomaly: f64) -> DVec3 {
        let a = self.semi_major_axis;
        let e = self.eccentricity;

        match self.orbit_type() {
            OrbitType::Circular | OrbitType::Elliptical => {
                let (sin, cos) = eccentric_anomaly.sin_cos();
                DVec3::new(a * (cos - e), a * (1.0 - e * e).sqrt() * sin, 0.0)
            }
            OrbitType::Parabolic => {
                let d = eccentric_anomaly;
                DVec3::new(a * (1.0 - d * d), 2.0 * a * d, 0.0)
            }
            OrbitType::Hyperbolic => {
                let h = eccentric_anomaly;
                DVec3::new(a * (e - h.cosh()), a * (e * e - 1.0).sqrt() * h.sinh(), 0.0)
            }
        }
    }

    /// Rotates a vector from the orbital plane into the parent's reference frame.
    ///
    /// Equatorial orbits only need a single rotation about Z by the longitude
    /// of ascending node plus the argument of periapsis. Inclined orbits are
    /// then additionally tilted about the ascending-node axis, which amounts
    /// to `Rz(long_asc_node) * Rx(inclination) * Rz(arg_pe)`.
    pub fn rotate_to_reference_frame(&self, vector: DVec3) -> DVec3 {
        let mut rotated = vector;
        rotated.rotate_about_z(self.long_asc_node + self.arg_pe);

        if self.inclination == 0.0 {
            return rotated;
        }

        let (sin, cos) = self.long_asc_node.sin_cos();
        let node_axis = DVec3::new(cos, sin, 0.0);

        rotate_about_unit_axis(rotated, node_axis, self.inclination)
    }

    /// Gets the position relative to the parent at a given true anomaly.
    #[doc(alias = "position_at_angle")]
    pub fn position_at_true_anomaly(&self, true_anomaly: f64) -> DVec3 {
        let radius = self.radius_at_true_anomaly(true_anomaly);
        let (sin, cos) = true_anomaly.sin_cos();

        self.rotate_to_reference_frame(DVec3::new(radius * cos, radius * sin, 0.0))
    }

    /// Gets the position relative to the parent at a given time in milliseconds.
    ///
    /// Nothing is cached; use [`render`][Orbit::render] to keep the
    /// intermediate values as well.
    pub fn position_from_parent_at_time(&self, time: i64) -> Result<DVec3, OrbitError> {
        Ok(self.render(time)?.position_from_parent)
    }

    /// Evaluates the orbit at a given time in milliseconds.
    ///
    /// This runs the whole anomaly pipeline (mean anomaly, Kepler's equation,
    /// orbital-plane position, rotation into the parent's frame) and returns
    /// every intermediate the hierarchy wants to cache.
    ///
    /// If the solver stops before reaching its precision, the best estimate is
    /// used, [`RenderedState::converged`] is `false`, and a warning is logged.
    pub fn render(&self, time: i64) -> Result<RenderedState, OrbitError> {
        let solution = self.eccentric_anomaly_at_time(time)?;
        Ok(self.render_solution(time, solution))
    }

    /// Builds the rendered state at `time` from an already solved anomaly.
    pub(crate) fn render_solution(&self, time: i64, solution: KeplerSolution) -> RenderedState {
        if !solution.converged {
            tracing::warn!(
                time,
                eccentricity = self.eccentricity,
                iterations = solution.iterations,
                "Kepler solver did not converge, using best estimate"
            );
        }

        let position_on_orbital_plane = self.position_on_orbital_plane(solution.anomaly);
        let position_from_parent = self.rotate_to_reference_frame(position_on_orbital_plane);

        RenderedState {
            time,
            eccentric_anomaly: solution.anomaly,
            position_on_orbital_plane,
            position_from_parent,
            converged: solution.converged,
        }
    }
}

impl fmt::Display for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} orbit, semi-major axis {}, eccentricity {}",
            self.orbit_type(),
            self.semi_major_axis,
            self.eccentricity
        )
    }
}
