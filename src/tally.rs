use serde::Serialize;

use crate::transport::{EventKind, OutcomeKind, TrajectoryOutcome};

/// Depth-binned event counts over [0, tau_max].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthHistogram {
    tau_max: f64,
    bins: Vec<u64>,
}

impl DepthHistogram {
    pub fn new(n_bins: usize, tau_max: f64) -> Self {
        Self {
            tau_max,
            bins: vec![0; n_bins],
        }
    }

    /// Count one event at the given optical depth. Depths at or beyond
    /// tau_max land in the last bin.
    pub fn record(&mut self, depth: f64) {
        let idx = ((depth / self.tau_max) * self.bins.len() as f64) as usize;
        let last = self.bins.len() - 1;
        self.bins[idx.min(last)] += 1;
    }

    pub fn bins(&self) -> &[u64] {
        &self.bins
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// Fold another histogram into this one. Bin layouts must match.
    pub fn merge(&mut self, other: &DepthHistogram) {
        debug_assert_eq!(self.bins.len(), other.bins.len());
        for (bin, count) in self.bins.iter_mut().zip(&other.bins) {
            *bin += count;
        }
    }
}

/// Per-worker accumulator for a slice of an ensemble.
///
/// Each parallel worker scores its own tally; partials are merged in a
/// fixed order at the end of the run, never mutated concurrently.
#[derive(Debug, Clone, Serialize)]
pub struct RunTally {
    pub reflected: u64,
    pub transmitted: u64,
    pub absorbed: u64,
    pub reflected_weight: f64,
    pub transmitted_weight: f64,
    pub absorbed_weight: f64,
    pub scatter_depths: DepthHistogram,
    pub absorption_depths: DepthHistogram,
    /// Full trajectories retained for visualization consumers.
    pub sample_paths: Vec<TrajectoryOutcome>,
}

impl RunTally {
    pub fn new(n_bins: usize, tau_max: f64) -> Self {
        Self {
            reflected: 0,
            transmitted: 0,
            absorbed: 0,
            reflected_weight: 0.0,
            transmitted_weight: 0.0,
            absorbed_weight: 0.0,
            scatter_depths: DepthHistogram::new(n_bins, tau_max),
            absorption_depths: DepthHistogram::new(n_bins, tau_max),
            sample_paths: Vec::new(),
        }
    }

    /// Fold one completed history in. `keep_path` retains the full
    /// outcome for visualization.
    pub fn score(&mut self, outcome: TrajectoryOutcome, keep_path: bool) {
        match outcome.kind {
            OutcomeKind::Reflected => {
                self.reflected += 1;
                self.reflected_weight += outcome.exit_weight;
            }
            OutcomeKind::Transmitted => {
                self.transmitted += 1;
                self.transmitted_weight += outcome.exit_weight;
            }
            OutcomeKind::Absorbed => {
                self.absorbed += 1;
            }
        }
        // Escaped histories can still have deposited weight along the
        // way under implicit capture, so this is scored unconditionally.
        self.absorbed_weight += outcome.absorbed_weight;

        for &(depth, kind) in &outcome.event_depths {
            match kind {
                EventKind::Scatter => self.scatter_depths.record(depth),
                EventKind::Absorb => self.absorption_depths.record(depth),
            }
        }

        if keep_path {
            self.sample_paths.push(outcome);
        }
    }

    /// Fold another worker's partial into this one.
    pub fn merge(&mut self, other: RunTally) {
        self.reflected += other.reflected;
        self.transmitted += other.transmitted;
        self.absorbed += other.absorbed;
        self.reflected_weight += other.reflected_weight;
        self.transmitted_weight += other.transmitted_weight;
        self.absorbed_weight += other.absorbed_weight;
        self.scatter_depths.merge(&other.scatter_depths);
        self.absorption_depths.merge(&other.absorption_depths);
        self.sample_paths.extend(other.sample_paths);
    }

    pub fn completed(&self) -> u64 {
        self.reflected + self.transmitted + self.absorbed
    }
}
