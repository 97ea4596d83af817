use core::f64::consts::TAU;

use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    clock::millis_to_seconds, BodyId, DeterminationError, Orbit, OrbitError, OrbitType,
    OrbitalElements,
};

/// Below this eccentricity, determined orbits are treated as perfectly circular.
const CIRCULAR_THRESHOLD: f64 = 1e-10;

/// Eccentricities this close to one are snapped to a parabolic trajectory.
const PARABOLIC_THRESHOLD: f64 = 1e-9;

/// Z components smaller than this fraction of their vector's length count
/// as lying on the reference plane.
const EQUATORIAL_THRESHOLD: f64 = 1e-12;

/// A struct representing a position and velocity at a point in the orbit.
///
/// The position and velocity vectors are three-dimensional, relative to the
/// parent body and expressed in its reference frame.
///
/// The position vector is in meters, while the velocity vector is in
/// meters per second.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateVectors {
    /// The 3D position at a point in the orbit, in meters.
    pub position: DVec3,
    /// The 3D velocity at a point in the orbit, in meters per second.
    pub velocity: DVec3,
}

impl Orbit {
    /// Derives an orbit from a position and a velocity relative to the parent.
    ///
    /// # Mu
    /// Mu is the gravitational parameter of the parent body, `G * M`.
    ///
    /// # Time
    /// If `time` (in milliseconds) is given, the mean anomaly at epoch is
    /// solved so that the new orbit passes through `position` at that time.
    /// Otherwise the mean anomaly at epoch is left at zero.
    ///
    /// # Errors
    /// - [`DeterminationError::ZeroPosition`] if the position is at the origin.
    /// - [`DeterminationError::DegenerateAngularMomentum`] if the velocity is
    ///   zero or parallel to the position.
    /// - [`DeterminationError::Massless`] if `mu` is zero.
    /// - [`DeterminationError::Orbit`] if `mu` is negative or not finite, or the
    ///   derived elements do not form a valid orbit.
    ///
    /// # Example
    /// ```
    /// use glam::DVec3;
    /// use astrarium::{BodyId, Orbit};
    ///
    /// let mu = 3.986e14;
    /// let orbit = Orbit::from_position_and_velocity(
    ///     BodyId::ROOT,
    ///     mu,
    ///     DVec3::new(7.0e6, 0.0, 0.0),
    ///     DVec3::new(0.0, 8.0e3, 0.0),
    ///     Some(0),
    /// ).unwrap();
    ///
    /// let position = orbit.position_from_parent_at_time(0).unwrap();
    /// assert!((position - DVec3::new(7.0e6, 0.0, 0.0)).length() < 1e-3);
    /// ```
    pub fn from_position_and_velocity(
        parent: BodyId,
        mu: f64,
        position: DVec3,
        velocity: DVec3,
        time: Option<i64>,
    ) -> Result<Orbit, DeterminationError> {
        // Reference:
        // https://orbital-mechanics.space/classical-orbital-elements/orbital-elements-and-the-state-vector.html

        let distance = position.length();
        if distance == 0.0 {
            return Err(DeterminationError::ZeroPosition);
        }
        if mu == 0.0 {
            return Err(DeterminationError::Massless);
        }
        if !(mu > 0.0 && mu.is_finite()) {
            return Err(OrbitError::InvalidGravitationalParameter(mu).into());
        }

        let speed_squared = velocity.length_squared();

        // Step 1: Orbital angular momentum
        let angular_momentum_vector = position.cross(velocity);
        let angular_momentum = angular_momentum_vector.length();

        if speed_squared == 0.0 || angular_momentum == 0.0 {
            return Err(DeterminationError::DegenerateAngularMomentum);
        }

        // Step 2: Eccentricity
        let eccentricity_vector = (position * (speed_squared - mu / distance)
            - velocity * position.dot(velocity))
            / mu;
        let mut eccentricity = eccentricity_vector.length();

        // Step 3: Semi-major axis, from the specific orbital energy
        let specific_orbital_energy = speed_squared / 2.0 - mu / distance;
        let mut semi_major_axis = (-mu / (2.0 * specific_orbital_energy)).abs();

        if (eccentricity - 1.0).abs() < PARABOLIC_THRESHOLD {
            // The energy is (numerically) zero and the semi-major axis
            // infinite. Store the periapsis distance instead.
            eccentricity = 1.0;
            semi_major_axis = angular_momentum * angular_momentum / (2.0 * mu);
        }

        let is_circular = eccentricity < CIRCULAR_THRESHOLD;
        if is_circular {
            eccentricity = 0.0;
        }

        // Step 4: Inclination
        let inclination = (angular_momentum_vector.z / angular_momentum)
            .clamp(-1.0, 1.0)
            .acos();

        let is_equatorial = position.z.abs() <= EQUATORIAL_THRESHOLD * distance
            && velocity.z.abs() <= EQUATORIAL_THRESHOLD * speed_squared.sqrt();

        let (long_asc_node, arg_pe) = if is_equatorial {
            // No ascending node exists. Measure periapsis straight from +X,
            // flipping the direction for retrograde orbits.
            let arg_pe = if is_circular {
                0.0
            } else {
                let angle = eccentricity_vector.y.atan2(eccentricity_vector.x);
                let angle = if angular_momentum_vector.z < 0.0 {
                    -angle
                } else {
                    angle
                };
                angle.rem_euclid(TAU)
            };

            (0.0, arg_pe)
        } else {
            // Step 5: Longitude of ascending node
            // The node axis is Z cross h, which simplifies to (-h_y, h_x, 0).
            let node_axis = DVec3::new(-angular_momentum_vector.y, angular_momentum_vector.x, 0.0);
            let node_length = node_axis.length();

            let long_asc_node = {
                let tmp = (node_axis.x / node_length).clamp(-1.0, 1.0).acos();
                if node_axis.y >= 0.0 {
                    tmp
                } else {
                    TAU - tmp
                }
            };

            // Step 6: Argument of periapsis
            let arg_pe = if is_circular {
                0.0
            } else {
                let tmp = (node_axis.dot(eccentricity_vector) / (node_length * eccentricity))
                    .clamp(-1.0, 1.0)
                    .acos();
                if eccentricity_vector.z >= 0.0 {
                    tmp
                } else {
                    TAU - tmp
                }
            };

            tracing::debug!(?node_axis, "determined node axis");

            (long_asc_node, arg_pe)
        };

        tracing::debug!(
            long_asc_node,
            arg_pe,
            inclination,
            eccentricity,
            semi_major_axis,
            "determined orbit from state vectors"
        );

        let mut orbit = Orbit::new(
            parent,
            mu,
            OrbitalElements {
                semi_major_axis,
                eccentricity,
                inclination,
                longitude_of_ascending_node: long_asc_node,
                argument_of_periapsis: arg_pe,
                mean_anomaly_at_epoch: 0.0,
            },
        )?;

        if let Some(time) = time {
            // Step 7: Place the body on the new orbit.
            // The true anomaly is measured in the orbital plane from the
            // periapsis direction towards the direction 90 degrees ahead.
            let periapsis_direction = orbit.rotate_to_reference_frame(DVec3::X);
            let ahead_direction = orbit.rotate_to_reference_frame(DVec3::Y);

            let true_anomaly = position
                .dot(ahead_direction)
                .atan2(position.dot(periapsis_direction));

            let mean_anomaly = orbit.mean_anomaly_at_true_anomaly(true_anomaly);
            let mean_anomaly_at_epoch = mean_anomaly - orbit.mean_motion() * millis_to_seconds(time);

            orbit.set_mean_anomaly_at_epoch(match orbit.orbit_type() {
                OrbitType::Circular | OrbitType::Elliptical => mean_anomaly_at_epoch.rem_euclid(TAU),
                OrbitType::Parabolic | OrbitType::Hyperbolic => mean_anomaly_at_epoch,
            });
        }

        Ok(orbit)
    }

    /// Gets the velocity relative to the parent at a given true anomaly.
    pub fn velocity_at_true_anomaly(&self, true_anomaly: f64) -> DVec3 {
        let (sin, cos) = true_anomaly.sin_cos();
        let scale = (self.gravitational_parameter() / self.semi_latus_rectum()).sqrt();

        self.rotate_to_reference_frame(
            DVec3::new(-sin, self.eccentricity() + cos, 0.0) * scale,
        )
    }

    /// Gets the position and velocity relative to the parent at a given
    /// true anomaly.
    #[doc(alias = "state_vectors_at_angle")]
    pub fn state_vectors_at_true_anomaly(&self, true_anomaly: f64) -> StateVectors {
        StateVectors {
            position: self.position_at_true_anomaly(true_anomaly),
            velocity: self.velocity_at_true_anomaly(true_anomaly),
        }
    }

    /// Gets the position and velocity relative to the parent at a given time
    /// in milliseconds.
    pub fn state_vectors_at_time(&self, time: i64) -> Result<StateVectors, OrbitError> {
        let true_anomaly = self.true_anomaly_at_time(time)?;
        Ok(self.state_vectors_at_true_anomaly(true_anomaly))
    }
}
