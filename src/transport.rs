// Photon transport loop: move, check boundaries, resolve interactions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::atmosphere::Atmosphere;
use crate::error::SimulationError;
use crate::photon::{Direction, Photon};
use crate::physics::{self, InteractionKind, ScatteringModel};

/// Hard cap on interaction steps per history. A two-stream walk
/// terminates almost surely long before this; hitting the cap means the
/// path-length sampling or boundary logic is broken, and the run aborts.
pub const MAX_HISTORY_STEPS: usize = 1_000_000;

/// How absorbed energy is booked at interaction sites.
///
/// The two modes book energy differently and must never be mixed within
/// a run; mixing them breaks the R + T + A = 1 invariant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AbsorptionModel {
    /// Discrete termination: an absorption draw ends the history and
    /// deposits the full packet weight at the interaction site. The
    /// packet weight stays 1.0 throughout.
    Analog,
    /// Survival biasing: every interaction deposits
    /// weight * (1 - omega_0) and scatters the remainder; the history
    /// ends as absorbed once its weight falls below the cutoff, with the
    /// residual deposited where the packet died.
    ImplicitCapture { weight_cutoff: f64 },
}

/// A scattering or absorption event recorded along a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Scatter,
    Absorb,
}

/// Terminal state of a photon history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// Escaped through the top of the atmosphere.
    Reflected,
    /// Escaped through the bottom boundary.
    Transmitted,
    /// Deposited in the layer.
    Absorbed,
}

/// Result of one completed photon history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryOutcome {
    pub kind: OutcomeKind,
    /// Energy carried out of the layer; zero for absorbed histories.
    pub exit_weight: f64,
    /// Energy deposited in the layer over the whole history.
    pub absorbed_weight: f64,
    /// Every scattering and absorption event in trajectory order, as
    /// (optical depth, kind) pairs. Surface bounces are boundary events,
    /// not interactions, and are not recorded here.
    pub event_depths: Vec<(f64, EventKind)>,
    /// Interaction steps it took to terminate.
    pub steps: usize,
}

enum StepResult {
    Continue,
    Terminal(OutcomeKind),
}

/// Run one photon from the top of the atmosphere to termination.
///
/// `history` only labels the trajectory in a divergence report.
pub fn trace<R: Rng + ?Sized>(
    atmosphere: &Atmosphere,
    scattering: ScatteringModel,
    absorption: AbsorptionModel,
    history: usize,
    rng: &mut R,
) -> Result<TrajectoryOutcome, SimulationError> {
    let mut photon = Photon::new();
    let mut events = Vec::new();
    let mut absorbed_weight = 0.0;
    let mut steps = 0;

    let kind = loop {
        if steps == MAX_HISTORY_STEPS {
            return Err(SimulationError::Divergence { history, steps });
        }
        steps += 1;

        match step(
            &mut photon,
            atmosphere,
            scattering,
            absorption,
            &mut events,
            &mut absorbed_weight,
            rng,
        ) {
            StepResult::Terminal(kind) => break kind,
            StepResult::Continue => {}
        }
    };

    let exit_weight = match kind {
        OutcomeKind::Reflected | OutcomeKind::Transmitted => photon.weight,
        OutcomeKind::Absorbed => 0.0,
    };

    Ok(TrajectoryOutcome {
        kind,
        exit_weight,
        absorbed_weight,
        event_depths: events,
        steps,
    })
}

/// Advance one path segment: sample a flight distance, resolve a
/// boundary crossing if one occurs, otherwise resolve the interaction at
/// the new position.
fn step<R: Rng + ?Sized>(
    photon: &mut Photon,
    atmosphere: &Atmosphere,
    scattering: ScatteringModel,
    absorption: AbsorptionModel,
    events: &mut Vec<(f64, EventKind)>,
    absorbed_weight: &mut f64,
    rng: &mut R,
) -> StepResult {
    let s = physics::sample_path_length(rng);
    let candidate = photon.position + photon.direction.signum() * s;

    // Boundary crossings resolve before any interaction is applied.
    if candidate <= 0.0 {
        photon.position = 0.0;
        photon.alive = false;
        return StepResult::Terminal(OutcomeKind::Reflected);
    }
    if candidate >= atmosphere.tau_max() {
        // Lambertian surface: re-inject upward with probability
        // surface_albedo, otherwise the photon leaves through the bottom.
        photon.position = atmosphere.tau_max();
        if rng.gen::<f64>() < atmosphere.surface_albedo() {
            photon.direction = Direction::Up;
            return StepResult::Continue;
        }
        photon.alive = false;
        return StepResult::Terminal(OutcomeKind::Transmitted);
    }

    photon.position = candidate;
    match absorption {
        AbsorptionModel::Analog => {
            match physics::sample_interaction(atmosphere.omega_0(), rng) {
                InteractionKind::Absorb => {
                    *absorbed_weight += photon.weight;
                    events.push((photon.position, EventKind::Absorb));
                    photon.alive = false;
                    StepResult::Terminal(OutcomeKind::Absorbed)
                }
                InteractionKind::Scatter => {
                    events.push((photon.position, EventKind::Scatter));
                    photon.direction = scattering.sample(photon.direction, atmosphere.g(), rng);
                    StepResult::Continue
                }
            }
        }
        AbsorptionModel::ImplicitCapture { weight_cutoff } => {
            let deposit = photon.weight * (1.0 - atmosphere.omega_0());
            if deposit > 0.0 {
                *absorbed_weight += deposit;
                events.push((photon.position, EventKind::Absorb));
            }
            photon.weight *= atmosphere.omega_0();

            if photon.weight < weight_cutoff {
                // Residual below cutoff: book the remainder where the
                // packet died.
                *absorbed_weight += photon.weight;
                photon.alive = false;
                return StepResult::Terminal(OutcomeKind::Absorbed);
            }

            events.push((photon.position, EventKind::Scatter));
            photon.direction = scattering.sample(photon.direction, atmosphere.g(), rng);
            StepResult::Continue
        }
    }
}
