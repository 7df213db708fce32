// A forward-scattering cloud layer over a moderately bright surface.
// Prints the summary and dumps the full result as JSON for external
// plotting or GUI consumers.

use std::time::Instant;

use mc2s::{Atmosphere, ScatteringModel, Settings, Simulation};

fn main() {
    env_logger::init();

    // Water-cloud-like layer: strong forward scattering, little
    // absorption, vegetation-ish surface below.
    let atmosphere = Atmosphere::new(3.0, 0.95, 0.85, 0.2).expect("valid atmosphere");
    let settings = Settings {
        particles: 200_000,
        seed: 7,
        scattering: ScatteringModel::HenyeyGreenstein,
        ..Default::default()
    };

    let start = Instant::now();
    let result = Simulation::new(atmosphere, settings)
        .run()
        .expect("simulation run");
    let elapsed = start.elapsed();

    println!("{}", result);
    println!("Completed in {:.2?}", elapsed);
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&result).expect("serialize result")
    );
}
