//! Ready-made star systems.
//!
//! "A planetary system is a set of gravitationally bound non-stellar bodies
//! in or out of orbit around a star or star system."
//!
//! \- [Wikipedia](https://en.wikipedia.org/wiki/Planetary_system)
//!
//! Every system is built with the default [`AstrariumConfig`] and starts at
//! time zero.

use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::{Astrarium, AstrariumConfig, AstrariumError, Body, BodyId, OrbitalElements};

fn add_satellite(
    system: &mut Astrarium,
    parent: BodyId,
    name: &str,
    mass: f64,
    radius: f64,
    elements: OrbitalElements,
) -> Result<BodyId, AstrariumError> {
    let orbit = system.orbit_around(parent, elements)?;
    system.add_body(Body::new(name, mass, radius, Some(orbit)))
}

fn elements(
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: f64,
    longitude_of_ascending_node: f64,
    argument_of_periapsis: f64,
    mean_anomaly_at_epoch: f64,
) -> OrbitalElements {
    OrbitalElements {
        semi_major_axis,
        eccentricity,
        inclination,
        longitude_of_ascending_node,
        argument_of_periapsis,
        mean_anomaly_at_epoch,
    }
}

/// Returns the Sun with a handful of planets, dwarf planets and a comet.
///
/// The Earth carries a fictional Moon, which in turn carries a fictional
/// Phobos, so the hierarchy is three levels deep.
pub fn solar_system() -> Result<Astrarium, AstrariumError> {
    let mut system = Astrarium::new(
        Body::new("Sun", 1.9891e30, 6.957e8, None),
        AstrariumConfig::default(),
    );
    let sun = system.root();

    let earth = add_satellite(
        &mut system,
        sun,
        "Earth",
        5.9736e24,
        6.371e6,
        elements(
            1.49598261e11,
            0.01671123,
            FRAC_PI_2,
            3.0525809,
            5.02829357,
            6.259047404,
        ),
    )?;
    let moon = add_satellite(
        &mut system,
        earth,
        "Moon",
        1.9736e24,
        6.371e3,
        OrbitalElements::planar(3.84399e8, 0.01671123),
    )?;
    add_satellite(
        &mut system,
        moon,
        "Phobos",
        5.9736e10,
        6.371e3,
        OrbitalElements::planar(0.59598261e5, 0.61671123),
    )?;

    add_satellite(
        &mut system,
        sun,
        "Mars",
        6.4171e23,
        6.371e6,
        OrbitalElements::planar(2.279392e11, 0.0934),
    )?;
    add_satellite(
        &mut system,
        sun,
        "Pluto",
        1.303e22,
        1.187e3,
        elements(5.90638e12, 0.2488, 0.2994985, 0.0, 0.0, 0.0),
    )?;
    add_satellite(
        &mut system,
        sun,
        "Ceres",
        9.393e20,
        473e3,
        elements(414e9, 0.1161977, 0.168379107187, 0.0, 0.0, 0.0),
    )?;
    add_satellite(
        &mut system,
        sun,
        "67P/Churyumov–Gerasimenko",
        9.982e12,
        4e3,
        elements(518e9, 0.64102, 0.122879906, 0.87523026, 0.22305308, 5.30073947),
    )?;

    Ok(system)
}

/// Returns Kerbol with Kerbin and an unusually eccentric Duna.
pub fn kerbol_system() -> Result<Astrarium, AstrariumError> {
    let mut system = Astrarium::new(
        Body::new("Kerbol", 1.756567e28, 2.616e5, None),
        AstrariumConfig::default(),
    );
    let kerbol = system.root();

    add_satellite(
        &mut system,
        kerbol,
        "Kerbin",
        5.2915793e22,
        6e5,
        OrbitalElements::planar(1.3599840256e10, 0.0),
    )?;
    add_satellite(
        &mut system,
        kerbol,
        "Duna",
        4.5154812e21,
        3.2e5,
        elements(2.0726155264e10, 0.751, 0.001, 12.0 / PI, 0.0, 0.0),
    )?;

    Ok(system)
}

/// Returns a small system with one highly eccentric, inclined planet.
pub fn test_system() -> Result<Astrarium, AstrariumError> {
    let mut system = Astrarium::new(
        Body::new("Sun", 1e30, 1e6, None),
        AstrariumConfig::default(),
    );
    let sun = system.root();

    add_satellite(
        &mut system,
        sun,
        "Planet",
        5e9,
        1e4,
        elements(1e8, 0.8, FRAC_PI_4, 0.0, 0.0, 0.0),
    )?;

    Ok(system)
}
