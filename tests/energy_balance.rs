// Physical checks on the ensemble estimators: Beer-Lambert transmission,
// conservative scattering, and closure of R + T + A.

use mc2s::{AbsorptionModel, Atmosphere, ScatteringModel, Settings, Simulation};

#[test]
fn test_outcome_counts_sum_to_particles() {
    let cases = [
        (0.5, 0.0, 0.0, 0.0),
        (1.0, 0.5, 0.0, 0.0),
        (2.0, 0.9, 0.5, 0.2),
        (3.0, 1.0, 0.85, 0.3),
        (0.1, 0.3, -0.5, 1.0),
    ];
    for (i, &(tau_max, omega_0, g, surface_albedo)) in cases.iter().enumerate() {
        let atm = Atmosphere::new(tau_max, omega_0, g, surface_albedo).unwrap();
        let settings = Settings {
            particles: 5000,
            seed: i as u64 + 1,
            ..Default::default()
        };
        let result = Simulation::new(atm, settings).run().unwrap();
        assert_eq!(
            result.reflected + result.transmitted + result.absorbed,
            5000,
            "case {}",
            i
        );
    }
}

#[test]
fn test_beer_lambert_transmission() {
    // omega_0 = 0 over a black surface: no scattering, so transmittance
    // is exp(-tau_max). At tau_max = 1 and N = 100k the binomial noise
    // is ~0.0015; 0.01 is a wide margin.
    let atm = Atmosphere::new(1.0, 0.0, 0.0, 0.0).unwrap();
    let settings = Settings {
        particles: 100_000,
        seed: 2026,
        scattering: ScatteringModel::Isotropic,
        ..Default::default()
    };
    let result = Simulation::new(atm, settings).run().unwrap();

    let expected = (-1.0f64).exp();
    assert!(
        (result.transmittance - expected).abs() < 0.01,
        "transmittance {} vs Beer-Lambert {}",
        result.transmittance,
        expected
    );

    // Nothing scatters and nothing reflects: every history either
    // crosses on its first flight or absorbs at its first interaction.
    assert_eq!(result.reflected, 0);
    assert_eq!(result.scatter_depth_histogram.total(), 0);
    assert!((result.transmittance + result.absorptance - 1.0).abs() < 1e-12);
}

#[test]
fn test_first_flight_crossings_have_no_events() {
    // With omega_0 = 0 every transmitted history is a first-flight
    // crossing of the layer, so its event record must be empty.
    let atm = Atmosphere::new(1.0, 0.0, 0.0, 0.0).unwrap();
    let settings = Settings {
        particles: 1000,
        seed: 7,
        max_sample_paths: 1000,
        ..Default::default()
    };
    let result = Simulation::new(atm, settings).run().unwrap();

    let mut transmitted_seen = 0;
    for path in &result.sample_paths {
        if path.kind == mc2s::OutcomeKind::Transmitted {
            transmitted_seen += 1;
            assert!(path.event_depths.is_empty());
            assert_eq!(path.steps, 1);
        }
    }
    assert!(transmitted_seen > 0, "expected some first-flight crossings");
}

#[test]
fn test_conservative_scattering_never_absorbs() {
    for (seed, g, surface_albedo) in [(1, 0.0, 0.0), (2, 0.5, 0.3), (3, -0.5, 1.0)] {
        let atm = Atmosphere::new(2.0, 1.0, g, surface_albedo).unwrap();
        let settings = Settings {
            particles: 20_000,
            seed,
            ..Default::default()
        };
        let result = Simulation::new(atm, settings).run().unwrap();

        assert_eq!(result.absorbed, 0);
        assert_eq!(result.absorptance, 0.0);
        assert_eq!(result.absorption_depth_histogram.total(), 0);
        assert!(
            (result.reflectance + result.transmittance - 1.0).abs() < 1e-12,
            "R + T = {}",
            result.reflectance + result.transmittance
        );
    }
}

#[test]
fn test_energy_closure_analog() {
    // Analog bookkeeping is exact: every history carries weight 1.0 into
    // exactly one channel.
    let atm = Atmosphere::new(2.0, 0.9, 0.5, 0.2).unwrap();
    let settings = Settings {
        particles: 50_000,
        seed: 11,
        ..Default::default()
    };
    let result = Simulation::new(atm, settings).run().unwrap();

    let closure = result.reflectance + result.transmittance + result.absorptance;
    assert!((closure - 1.0).abs() < 1e-9, "R + T + A = {}", closure);
}

#[test]
fn test_energy_closure_implicit_capture() {
    // Survival biasing deposits fractional weights, so closure holds to
    // summation rounding rather than exactly.
    let atm = Atmosphere::new(2.0, 0.9, 0.5, 0.2).unwrap();
    let settings = Settings {
        particles: 50_000,
        seed: 13,
        absorption: AbsorptionModel::ImplicitCapture { weight_cutoff: 0.01 },
        ..Default::default()
    };
    let result = Simulation::new(atm, settings).run().unwrap();

    let closure = result.reflectance + result.transmittance + result.absorptance;
    assert!((closure - 1.0).abs() < 1e-6, "R + T + A = {}", closure);
}

#[test]
fn test_bright_surface_raises_reflectance() {
    let settings = Settings {
        particles: 20_000,
        seed: 17,
        ..Default::default()
    };
    let dark = Atmosphere::new(1.0, 0.8, 0.0, 0.0).unwrap();
    let bright = Atmosphere::new(1.0, 0.8, 0.0, 0.9).unwrap();

    let dark_run = Simulation::new(dark, settings.clone()).run().unwrap();
    let bright_run = Simulation::new(bright, settings).run().unwrap();
    assert!(bright_run.reflectance > dark_run.reflectance);
}

#[test]
fn test_thicker_layer_transmits_less() {
    let settings = Settings {
        particles: 20_000,
        seed: 19,
        ..Default::default()
    };
    let thin = Atmosphere::new(0.5, 0.9, 0.0, 0.0).unwrap();
    let thick = Atmosphere::new(4.0, 0.9, 0.0, 0.0).unwrap();

    let thin_run = Simulation::new(thin, settings.clone()).run().unwrap();
    let thick_run = Simulation::new(thick, settings).run().unwrap();
    assert!(thick_run.transmittance < thin_run.transmittance);
}
