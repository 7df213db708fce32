// Pure-absorption validation run: with omega_0 = 0 over a black surface
// the simulated transmittance must approach exp(-tau_max).

use std::time::Instant;

use mc2s::{Atmosphere, ScatteringModel, Settings, Simulation};

fn main() {
    env_logger::init();

    let tau_max = 1.0;
    let atmosphere = Atmosphere::new(tau_max, 0.0, 0.0, 0.0).expect("valid atmosphere");
    let settings = Settings {
        particles: 100_000,
        seed: 1,
        scattering: ScatteringModel::Isotropic,
        ..Default::default()
    };

    let start = Instant::now();
    let result = Simulation::new(atmosphere, settings)
        .run()
        .expect("simulation run");
    let elapsed = start.elapsed();

    println!("{}", result);
    println!();
    println!("Beer-Lambert check at tau_max = {}", tau_max);
    println!("  analytic:  T = exp(-{}) = {:.6}", tau_max, (-tau_max).exp());
    println!("  simulated: T = {:.6}", result.transmittance);
    println!(
        "  difference: {:.6} ({:.1} standard errors)",
        (result.transmittance - (-tau_max).exp()).abs(),
        (result.transmittance - (-tau_max).exp()).abs()
            / result.std_error(result.transmittance)
    );
    println!("Completed in {:.2?}", elapsed);
}
