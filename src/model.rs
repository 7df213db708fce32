use std::fmt;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::atmosphere::Atmosphere;
use crate::error::{SimulationError, ValidationError};
use crate::physics::ScatteringModel;
use crate::rng::HistoryRng;
use crate::tally::{DepthHistogram, RunTally};
use crate::transport::{self, AbsorptionModel, TrajectoryOutcome};

/// Histories per parallel work unit. Partials are merged in chunk order,
/// so results do not depend on how rayon schedules the chunks.
const CHUNK: usize = 4096;

/// Ensemble controls for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Number of independent photon histories.
    pub particles: usize,
    pub scattering: ScatteringModel,
    pub absorption: AbsorptionModel,
    /// Master seed; history i draws from the stream derived from
    /// (seed, i). Identical settings give bit-identical results.
    pub seed: u64,
    /// Bin count for the depth profiles.
    pub depth_bins: usize,
    /// How many full trajectories to retain for visualization. The first
    /// `max_sample_paths` histories are kept; the rest are dropped after
    /// scoring to bound memory.
    pub max_sample_paths: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particles: 10_000,
            scattering: ScatteringModel::HenyeyGreenstein,
            absorption: AbsorptionModel::Analog,
            seed: 1,
            depth_bins: 30,
            max_sample_paths: 50,
        }
    }
}

impl Settings {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.particles == 0 {
            return Err(ValidationError::NoPhotons);
        }
        if self.depth_bins == 0 {
            return Err(ValidationError::NoBins);
        }
        if let AbsorptionModel::ImplicitCapture { weight_cutoff } = self.absorption {
            if !(weight_cutoff > 0.0 && weight_cutoff < 1.0) {
                return Err(ValidationError::WeightCutoff(weight_cutoff));
            }
        }
        Ok(())
    }
}

/// One simulation run: an atmosphere plus ensemble controls.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub atmosphere: Atmosphere,
    pub settings: Settings,
}

impl Simulation {
    pub fn new(atmosphere: Atmosphere, settings: Settings) -> Self {
        Self {
            atmosphere,
            settings,
        }
    }

    /// Run the ensemble and aggregate it into an immutable result.
    ///
    /// Histories are statistically independent and run in parallel over
    /// fixed-size index chunks; each history draws from its own random
    /// stream derived from the master seed, and per-chunk partials are
    /// merged in index order, so the result is identical for any thread
    /// count. A diverging history aborts the whole run.
    pub fn run(&self) -> Result<EnsembleResult, SimulationError> {
        self.settings.validate()?;
        let settings = &self.settings;
        let atmosphere = &self.atmosphere;

        info!(
            "running {} histories: tau_max={} omega_0={} g={} surface_albedo={}",
            settings.particles,
            atmosphere.tau_max(),
            atmosphere.omega_0(),
            atmosphere.g(),
            atmosphere.surface_albedo(),
        );

        let partials: Vec<Result<RunTally, SimulationError>> = (0..settings.particles)
            .into_par_iter()
            .chunks(CHUNK)
            .map(|indices| {
                let mut tally = RunTally::new(settings.depth_bins, atmosphere.tau_max());
                for i in indices {
                    let mut rng = HistoryRng::for_history(settings.seed, i as u64);
                    let outcome = transport::trace(
                        atmosphere,
                        settings.scattering,
                        settings.absorption,
                        i,
                        &mut rng,
                    )?;
                    tally.score(outcome, i < settings.max_sample_paths);
                }
                Ok(tally)
            })
            .collect();

        let mut total = RunTally::new(settings.depth_bins, atmosphere.tau_max());
        for partial in partials {
            total.merge(partial?);
        }

        debug!(
            "completed {} histories: {} reflected, {} transmitted, {} absorbed",
            total.completed(),
            total.reflected,
            total.transmitted,
            total.absorbed,
        );

        Ok(EnsembleResult::from_tally(total, settings.particles))
    }
}

/// Aggregate statistics over a completed ensemble. Immutable once
/// returned; fractions are energy-weighted and approach R + T + A = 1
/// with Monte Carlo noise proportional to 1/sqrt(particles) (exact in
/// analog mode).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleResult {
    pub particles: usize,
    pub reflected: u64,
    pub transmitted: u64,
    pub absorbed: u64,
    pub reflected_weight: f64,
    pub transmitted_weight: f64,
    pub absorbed_weight: f64,
    pub reflectance: f64,
    pub transmittance: f64,
    pub absorptance: f64,
    pub scatter_depth_histogram: DepthHistogram,
    pub absorption_depth_histogram: DepthHistogram,
    /// Bounded sample of full trajectories for visualization.
    pub sample_paths: Vec<TrajectoryOutcome>,
}

impl EnsembleResult {
    fn from_tally(tally: RunTally, particles: usize) -> Self {
        let n = particles as f64;
        Self {
            particles,
            reflected: tally.reflected,
            transmitted: tally.transmitted,
            absorbed: tally.absorbed,
            reflected_weight: tally.reflected_weight,
            transmitted_weight: tally.transmitted_weight,
            absorbed_weight: tally.absorbed_weight,
            reflectance: tally.reflected_weight / n,
            transmittance: tally.transmitted_weight / n,
            absorptance: tally.absorbed_weight / n,
            scatter_depth_histogram: tally.scatter_depths,
            absorption_depth_histogram: tally.absorption_depths,
            sample_paths: tally.sample_paths,
        }
    }

    /// Binomial standard error of an outcome fraction at this sample
    /// size: sqrt(p (1 - p) / N).
    pub fn std_error(&self, fraction: f64) -> f64 {
        (fraction * (1.0 - fraction) / self.particles as f64).sqrt()
    }
}

impl fmt::Display for EnsembleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ensemble of {} photons", self.particles)?;
        writeln!(
            f,
            "  Reflectance:   {:.6} +/- {:.6} ({} photons)",
            self.reflectance,
            self.std_error(self.reflectance),
            self.reflected
        )?;
        writeln!(
            f,
            "  Transmittance: {:.6} +/- {:.6} ({} photons)",
            self.transmittance,
            self.std_error(self.transmittance),
            self.transmitted
        )?;
        writeln!(
            f,
            "  Absorptance:   {:.6} +/- {:.6} ({} photons)",
            self.absorptance,
            self.std_error(self.absorptance),
            self.absorbed
        )?;
        write!(
            f,
            "  Events: {} scatters, {} absorptions",
            self.scatter_depth_histogram.total(),
            self.absorption_depth_histogram.total()
        )
    }
}
