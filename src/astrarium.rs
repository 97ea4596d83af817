use core::f64::consts::FRAC_PI_2;
use core::fmt;

use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    AstrariumError, Body, Orbit, OrbitError, OrbitalElements, RenderedState, SimulationClock,
    Vector as _,
};

/// Newtonian constant of gravitation, in m^3 kg^-1 s^-2.
pub const G: f64 = 6.67408e-11;

/// Relative difference allowed between an orbit's gravitational parameter and
/// the one its parent's mass gives.
const MU_RELATIVE_TOLERANCE: f64 = 1e-9;

/// A handle to a body stored in an [`Astrarium`].
///
/// Ids are handed out in insertion order and are never reused, since bodies
/// are never removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(usize);

impl BodyId {
    /// The id of the root body of every [`Astrarium`].
    pub const ROOT: BodyId = BodyId(0);

    /// Gets the position of the body in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulation-wide parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AstrariumConfig {
    /// The gravitational constant, in m^3 kg^-1 s^-2.
    pub gravitational_constant: f64,

    /// How far a [`tick`][Astrarium::tick] advances the clock, in milliseconds.
    pub time_step: i64,
}

impl Default for AstrariumConfig {
    /// [`G`] and a one hour step.
    fn default() -> Self {
        AstrariumConfig {
            gravitational_constant: G,
            time_step: 3_600_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Node {
    body: Body,
    parent: Option<BodyId>,
    children: Vec<BodyId>,
    rendered: Option<RenderedState>,
}

/// A hierarchy of celestial bodies sharing one simulation clock.
///
/// Bodies live in an arena and refer to each other through [`BodyId`]s.
/// The root sits at the origin; every other body orbits its parent.
/// Each body keeps the [`RenderedState`] of its orbit at the current time,
/// so [`position`][Astrarium::position] only composes cached values.
///
/// # Example
/// ```
/// use astrarium::{Astrarium, Body, OrbitalElements};
///
/// let mut system = Astrarium::with_defaults(Body::new("Sun", 1.9891e30, 6.957e8, None));
///
/// let orbit = system
///     .orbit_around(system.root(), OrbitalElements::planar(1.496e11, 0.0167))
///     .unwrap();
/// let earth = system
///     .add_body(Body::new("Earth", 5.9736e24, 6.371e6, Some(orbit)))
///     .unwrap();
///
/// system.set_time(86_400_000).unwrap();
///
/// let distance = system.position(earth).unwrap().length();
/// assert!(distance > 1.45e11 && distance < 1.53e11);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Astrarium {
    nodes: Vec<Node>,
    clock: SimulationClock,
    config: AstrariumConfig,
}

// Construction and rendering
impl Astrarium {
    /// Creates a hierarchy holding only `root`.
    ///
    /// The root is fixed at the origin, so any orbit it carries is discarded.
    pub fn new(mut root: Body, config: AstrariumConfig) -> Astrarium {
        if root.orbit.take().is_some() {
            tracing::warn!(body = %root.name, "discarding the orbit of the root body");
        }

        Astrarium {
            nodes: vec![Node {
                body: root,
                parent: None,
                children: Vec::new(),
                rendered: None,
            }],
            clock: SimulationClock::new(config.time_step),
            config,
        }
    }

    /// Creates a hierarchy holding only `root`, with the default configuration.
    pub fn with_defaults(root: Body) -> Astrarium {
        Astrarium::new(root, AstrariumConfig::default())
    }

    /// Adds a body orbiting the parent named by its orbit.
    ///
    /// The new body is rendered at the current time straight away.
    ///
    /// # Errors
    /// - [`AstrariumError::OrbitRequired`] if the body has no orbit.
    /// - [`AstrariumError::BodyNotFound`] if the orbit's parent does not exist.
    /// - [`AstrariumError::GravitationalParameterMismatch`] if the orbit was
    ///   built for a parent of a different mass. Build orbits with
    ///   [`orbit_around`][Astrarium::orbit_around] or
    ///   [`determine_orbit`][Astrarium::determine_orbit] to stay consistent.
    /// - [`AstrariumError::Orbit`] if the orbit cannot be rendered.
    pub fn add_body(&mut self, body: Body) -> Result<BodyId, AstrariumError> {
        let orbit = body.orbit.as_ref().ok_or(AstrariumError::OrbitRequired)?;
        let parent = orbit.parent();

        let expected = self.standard_gravitational_parameter(parent)?;
        let found = orbit.gravitational_parameter();
        if (found - expected).abs() > MU_RELATIVE_TOLERANCE * expected.abs() {
            return Err(AstrariumError::GravitationalParameterMismatch { expected, found });
        }

        let rendered = orbit.render(self.clock.get())?;

        let id = BodyId(self.nodes.len());
        tracing::debug!(%id, %parent, body = %body.name, "adding body");

        self.nodes.push(Node {
            body,
            parent: Some(parent),
            children: Vec::new(),
            rendered: Some(rendered),
        });
        self.nodes[parent.0].children.push(id);

        Ok(id)
    }

    /// Builds an orbit around `parent`, taking the gravitational parameter
    /// from the parent's mass.
    ///
    /// The orbit is not added anywhere; pass it to a [`Body`] and
    /// [`add_body`][Astrarium::add_body].
    pub fn orbit_around(
        &self,
        parent: BodyId,
        elements: OrbitalElements,
    ) -> Result<Orbit, AstrariumError> {
        let mu = self.standard_gravitational_parameter(parent)?;
        Ok(Orbit::new(parent, mu, elements)?)
    }

    /// Derives an orbit around `parent` from a position and velocity
    /// relative to it.
    ///
    /// See [`Orbit::from_position_and_velocity`].
    pub fn determine_orbit(
        &self,
        parent: BodyId,
        position: DVec3,
        velocity: DVec3,
        time: Option<i64>,
    ) -> Result<Orbit, AstrariumError> {
        let mu = self.standard_gravitational_parameter(parent)?;
        Ok(Orbit::from_position_and_velocity(
            parent, mu, position, velocity, time,
        )?)
    }

    /// Renders `id` and all of its descendants at `time`, top-down.
    ///
    /// This does not move the clock. The caches are only written once the
    /// whole subtree has rendered, so on error every body keeps its previous
    /// state.
    pub fn render_at_time(&mut self, id: BodyId, time: i64) -> Result<(), AstrariumError> {
        self.node(id)?;

        let mut pending = vec![id];
        let mut renders = Vec::new();

        while let Some(current) = pending.pop() {
            let node = &self.nodes[current.0];

            let rendered = match &node.body.orbit {
                Some(orbit) => Some(orbit.render(time)?),
                None => None,
            };
            // Reverse so siblings are visited in insertion order.
            pending.extend(node.children.iter().rev().copied());

            renders.push((current, rendered));
        }

        let rendered_count = renders.len();
        for (current, rendered) in renders {
            self.nodes[current.0].rendered = rendered;
        }

        tracing::trace!(%id, time, rendered_count, "rendered subtree");
        Ok(())
    }

    /// Moves the clock to `time` (in milliseconds) and renders every body.
    ///
    /// On error neither the clock nor any cached render changes.
    pub fn set_time(&mut self, time: i64) -> Result<(), AstrariumError> {
        self.render_at_time(BodyId::ROOT, time)?;
        self.clock.set(time);
        Ok(())
    }

    /// Gets the current simulation time, in milliseconds.
    pub fn time(&self) -> i64 {
        self.clock.get()
    }

    /// Advances the clock by one time step and renders every body.
    pub fn tick(&mut self) -> Result<i64, AstrariumError> {
        self.warp(1)
    }

    /// Advances the clock by multiple time steps and renders every body once.
    pub fn warp(&mut self, ticks: u32) -> Result<i64, AstrariumError> {
        let mut clock = self.clock;
        let time = clock.warp(ticks);

        self.render_at_time(BodyId::ROOT, time)?;
        self.clock = clock;
        Ok(time)
    }

    /// Gets the configuration the hierarchy was created with.
    pub fn config(&self) -> &AstrariumConfig {
        &self.config
    }
}

// Tree access
impl Astrarium {
    fn node(&self, id: BodyId) -> Result<&Node, AstrariumError> {
        self.nodes.get(id.0).ok_or(AstrariumError::BodyNotFound(id))
    }

    /// The id of the root body.
    pub fn root(&self) -> BodyId {
        BodyId::ROOT
    }

    /// Gets a body by id.
    pub fn body(&self, id: BodyId) -> Result<&Body, AstrariumError> {
        Ok(&self.node(id)?.body)
    }

    /// Gets the parent of a body, or `None` for the root.
    pub fn parent(&self, id: BodyId) -> Result<Option<BodyId>, AstrariumError> {
        Ok(self.node(id)?.parent)
    }

    /// Gets the direct children of a body, in insertion order.
    pub fn children(&self, id: BodyId) -> Result<&[BodyId], AstrariumError> {
        Ok(&self.node(id)?.children)
    }

    /// Gets the cached render of a body's orbit, or `None` for the root.
    pub fn rendered(&self, id: BodyId) -> Result<Option<&RenderedState>, AstrariumError> {
        Ok(self.node(id)?.rendered.as_ref())
    }

    /// Finds the first body with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<BodyId> {
        self.nodes
            .iter()
            .position(|node| node.body.name == name)
            .map(BodyId)
    }

    /// Gets the number of bodies, root included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over every body in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (BodyId(index), &node.body))
    }
}

// Positions
impl Astrarium {
    /// Gets the absolute position of a body from the cached renders.
    ///
    /// The root is at the origin. Each coordinate is in meters.
    pub fn position(&self, id: BodyId) -> Result<DVec3, AstrariumError> {
        let mut position = DVec3::ZERO;
        let mut current = Some(id);

        while let Some(current_id) = current {
            let node = self.node(current_id)?;
            if let Some(rendered) = &node.rendered {
                position += rendered.position_from_parent;
            }
            current = node.parent;
        }

        Ok(position)
    }

    /// Gets the absolute position of a body at any time, without touching
    /// the cache.
    pub fn position_at_time(&self, id: BodyId, time: i64) -> Result<DVec3, AstrariumError> {
        let mut position = DVec3::ZERO;
        let mut current = Some(id);

        while let Some(current_id) = current {
            position += self.position_from_parent_at_time(current_id, time)?;
            current = self.node(current_id)?.parent;
        }

        Ok(position)
    }

    /// Gets the cached position of a body relative to its parent.
    pub fn position_from_parent(&self, id: BodyId) -> Result<DVec3, AstrariumError> {
        Ok(self
            .node(id)?
            .rendered
            .map_or(DVec3::ZERO, |rendered| rendered.position_from_parent))
    }

    /// Gets the position of a body relative to its parent at any time.
    pub fn position_from_parent_at_time(
        &self,
        id: BodyId,
        time: i64,
    ) -> Result<DVec3, AstrariumError> {
        match &self.node(id)?.body.orbit {
            Some(orbit) => Ok(orbit.position_from_parent_at_time(time)?),
            None => Ok(DVec3::ZERO),
        }
    }

    /// Gets the velocity of a body relative to its parent at any time, in m/s.
    pub fn velocity_from_parent_at_time(
        &self,
        id: BodyId,
        time: i64,
    ) -> Result<DVec3, AstrariumError> {
        match &self.node(id)?.body.orbit {
            Some(orbit) => Ok(orbit.state_vectors_at_time(time)?.velocity),
            None => Ok(DVec3::ZERO),
        }
    }
}

// Body quantities
impl Astrarium {
    /// Gets the standard gravitational parameter `G * mass` of a body.
    pub fn standard_gravitational_parameter(&self, id: BodyId) -> Result<f64, AstrariumError> {
        Ok(self
            .node(id)?
            .body
            .standard_gravitational_parameter(self.config.gravitational_constant))
    }

    /// Gets the escape velocity at `radius` meters from the centre of a body.
    ///
    /// # Errors
    /// [`AstrariumError::InvalidRadius`] unless `radius` is positive and finite.
    pub fn escape_velocity(&self, id: BodyId, radius: f64) -> Result<f64, AstrariumError> {
        let mu = self.standard_gravitational_parameter(id)?;
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(AstrariumError::InvalidRadius(radius));
        }

        Ok((2.0 * mu / radius).sqrt())
    }

    /// Gets the velocity that an object at `position` (relative to the body)
    /// needs for a prograde circular orbit in the XY plane.
    ///
    /// # Errors
    /// [`AstrariumError::Vector`] if `position` is at the body's centre.
    pub fn circular_orbit_velocity(
        &self,
        id: BodyId,
        position: DVec3,
    ) -> Result<DVec3, AstrariumError> {
        let mu = self.standard_gravitational_parameter(id)?;

        let mut direction = position;
        let distance = direction.normalise()?;
        let speed = (mu / distance).sqrt();

        let mut velocity = DVec3::new(speed, 0.0, 0.0);
        velocity.rotate_about_z(direction.longitude() + FRAC_PI_2);

        Ok(velocity)
    }

    /// Gets the radius of a body's sphere of influence, `a (m / M)^(2/5)`.
    ///
    /// The root's sphere of influence is infinite.
    ///
    /// # Errors
    /// [`OrbitError::Unbound`] (wrapped) if the body is on a parabolic or
    /// hyperbolic trajectory.
    pub fn sphere_of_influence(&self, id: BodyId) -> Result<f64, AstrariumError> {
        let Some((orbit, mass, parent_mass)) = self.bound_orbit_and_masses(id)? else {
            return Ok(f64::INFINITY);
        };

        Ok(orbit.semi_major_axis() * (mass / parent_mass).powf(2.0 / 5.0))
    }

    /// Gets the radius of a body's Hill sphere, `a (1 - e) (m / 3M)^(1/3)`.
    ///
    /// The root's Hill sphere is infinite.
    ///
    /// # Errors
    /// [`OrbitError::Unbound`] (wrapped) if the body is on a parabolic or
    /// hyperbolic trajectory.
    pub fn hill_sphere(&self, id: BodyId) -> Result<f64, AstrariumError> {
        let Some((orbit, mass, parent_mass)) = self.bound_orbit_and_masses(id)? else {
            return Ok(f64::INFINITY);
        };

        Ok(orbit.semi_major_axis()
            * (1.0 - orbit.eccentricity())
            * (mass / (3.0 * parent_mass)).cbrt())
    }

    fn bound_orbit_and_masses(
        &self,
        id: BodyId,
    ) -> Result<Option<(&Orbit, f64, f64)>, AstrariumError> {
        let node = self.node(id)?;

        match (&node.body.orbit, node.parent) {
            (Some(orbit), Some(_)) if !orbit.orbit_type().is_bound() => {
                Err(OrbitError::Unbound.into())
            }
            (Some(orbit), Some(parent)) => {
                let parent_mass = self.node(parent)?.body.mass;
                Ok(Some((orbit, node.body.mass, parent_mass)))
            }
            _ => Ok(None),
        }
    }
}

impl fmt::Display for Astrarium {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Astrarium around {} with {} bodies, t={}",
            self.nodes[0].body,
            self.nodes.len(),
            self.clock.get()
        )
    }
}
