use std::io::{self, StdoutLock, Write};

use astrarium::{presets, Astrarium, AstrariumError};

const SIMULATION_TICKS: u32 = 24 * 365;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut system = presets::solar_system()?;
    describe_system(&system)?;

    let mut lock = io::stdout().lock();
    eprintln!("Simulating {SIMULATION_TICKS} ticks...");
    for _ in 0..SIMULATION_TICKS {
        let time = system.tick()?;
        writeln!(&mut lock, "=== t = {time}ms ===")?;
        print_all_body_positions(&mut lock, &system)?;
    }

    Ok(())
}

fn describe_system(system: &Astrarium) -> Result<(), AstrariumError> {
    println!("{system}");
    for (id, body) in system.iter() {
        println!("    {id}: {:?}", body.name);
        println!("      Mass: {}", body.mass);
        println!("      Radius: {}", body.radius);
        if let Some(orbit) = &body.orbit {
            println!("      Orbit: {orbit}");
            println!("        Parent: {}", system.body(orbit.parent())?);
            println!("        Inclination: {}", orbit.inclination());
            println!("        Argument of periapsis: {}", orbit.argument_of_periapsis());
            println!(
                "        Longitude of ascending node: {}",
                orbit.longitude_of_ascending_node()
            );
            println!(
                "        Mean anomaly at epoch: {}",
                orbit.mean_anomaly_at_epoch()
            );
            match orbit.orbital_period() {
                Ok(period) => println!("        Period: {period}s"),
                Err(err) => println!("        Period: {err}"),
            }
            println!("        Sphere of influence: {}", system.sphere_of_influence(id)?);
        }
    }

    Ok(())
}

fn print_all_body_positions(
    lock: &mut StdoutLock,
    system: &Astrarium,
) -> Result<(), Box<dyn std::error::Error>> {
    for (id, body) in system.iter() {
        let position = system.position(id)?;
        writeln!(lock, "{}: {position}", body.name)?;
    }

    Ok(())
}
