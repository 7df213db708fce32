// Two-stream interaction physics.
//
// In the two-stream reduction the phase function collapses to a
// forward/backward choice: "forward" means keeping the current vertical
// sense, not a literal 3D scattering cone.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::photon::Direction;

/// What happens at an interaction site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Scatter,
    Absorb,
}

/// Phase-function choice for an ensemble run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScatteringModel {
    /// Equal probability of either hemisphere, regardless of the
    /// incoming sense.
    Isotropic,
    /// Henyey-Greenstein projected onto two streams: keep the incoming
    /// sense with probability (1 + g) / 2, using the atmosphere's
    /// asymmetry parameter.
    HenyeyGreenstein,
}

impl ScatteringModel {
    /// Sample the outgoing sense for a scatter with asymmetry `g`.
    pub fn sample<R: Rng + ?Sized>(self, current: Direction, g: f64, rng: &mut R) -> Direction {
        match self {
            ScatteringModel::Isotropic => sample_direction_isotropic(rng),
            ScatteringModel::HenyeyGreenstein => {
                sample_direction_henyey_greenstein(current, g, rng)
            }
        }
    }
}

/// Optical depth to the next interaction under exponential extinction:
/// s = -ln(xi). The uniform variate is drawn on the open interval (0, 1),
/// so the result is always positive and finite.
pub fn sample_path_length<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    -open_unit(rng).ln()
}

/// Scatter-or-absorb decision with single-scattering albedo `omega_0`.
/// `omega_0 = 0` always absorbs, `omega_0 = 1` always scatters.
pub fn sample_interaction<R: Rng + ?Sized>(omega_0: f64, rng: &mut R) -> InteractionKind {
    if rng.gen::<f64>() < omega_0 {
        InteractionKind::Scatter
    } else {
        InteractionKind::Absorb
    }
}

/// Isotropic two-stream scattering: 50/50 up or down.
pub fn sample_direction_isotropic<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    if rng.gen::<f64>() < 0.5 {
        Direction::Down
    } else {
        Direction::Up
    }
}

/// Henyey-Greenstein scattering in the two-stream projection.
///
/// P(forward) = (1 + g) / 2, where forward continues the photon's current
/// vertical sense. g = 0 reduces to isotropic, g = +1 always continues,
/// g = -1 always reverses.
pub fn sample_direction_henyey_greenstein<R: Rng + ?Sized>(
    current: Direction,
    g: f64,
    rng: &mut R,
) -> Direction {
    let p_forward = (1.0 + g) / 2.0;
    if rng.gen::<f64>() < p_forward {
        current
    } else {
        current.flip()
    }
}

/// Uniform variate on (0, 1): rejects the 0.0 endpoint so callers can
/// take a logarithm without guarding.
fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let xi = rng.gen::<f64>();
        if xi > 0.0 {
            return xi;
        }
    }
}
