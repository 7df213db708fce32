//! Two-stream Monte Carlo radiative transfer for a plane-parallel
//! scattering-absorbing atmosphere.
//!
//! Photon packets enter at the top of a homogeneous layer and random-walk
//! through it in optical-depth coordinates, reduced to two streams
//! (up/down). [`Atmosphere`] holds the validated optical parameters,
//! [`Simulation::run`] traces an ensemble of independent histories and
//! aggregates them into an [`EnsembleResult`] with reflectance,
//! transmittance, absorptance, and depth-binned event profiles.

pub mod atmosphere;
pub mod error;
pub mod model;
pub mod photon;
pub mod physics;
pub mod rng;
pub mod tally;
pub mod transport;

pub use atmosphere::Atmosphere;
pub use error::{SimulationError, ValidationError};
pub use model::{EnsembleResult, Settings, Simulation};
pub use photon::{Direction, Photon};
pub use physics::{InteractionKind, ScatteringModel};
pub use rng::HistoryRng;
pub use tally::DepthHistogram;
pub use transport::{AbsorptionModel, EventKind, OutcomeKind, TrajectoryOutcome};
