use serde::{Deserialize, Serialize};

/// Vertical sense of travel in the two-stream reduction.
///
/// Optical depth increases downward: `Down` moves toward the surface
/// (tau grows toward `tau_max`), `Up` toward space (tau shrinks toward 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Down,
    Up,
}

impl Direction {
    /// Signed displacement factor used by the transport arithmetic.
    #[inline]
    pub fn signum(self) -> f64 {
        match self {
            Direction::Down => 1.0,
            Direction::Up => -1.0,
        }
    }

    /// The opposite vertical sense.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
        }
    }
}

/// A photon packet in optical-depth coordinates.
///
/// Owned exclusively by one history; mutated in place by the transport
/// step and discarded once its terminal outcome is recorded.
#[derive(Debug, Clone)]
pub struct Photon {
    /// Current optical depth in [0, tau_max].
    pub position: f64,
    pub direction: Direction,
    /// Packet weight in (0, 1]; starts at 1.0 and never increases.
    pub weight: f64,
    pub alive: bool,
}

impl Photon {
    /// A fresh packet at the top of the atmosphere, heading down at full
    /// weight. Every history starts from this state.
    pub fn new() -> Self {
        Self {
            position: 0.0,
            direction: Direction::Down,
            weight: 1.0,
            alive: true,
        }
    }
}

impl Default for Photon {
    fn default() -> Self {
        Self::new()
    }
}
