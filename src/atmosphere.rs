use serde::Serialize;

use crate::error::ValidationError;

/// Optical properties of the plane-parallel layer.
///
/// All four parameters are range-checked at construction and the fields
/// are never mutated afterwards; one instance is shared read-only by
/// every history in an ensemble.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atmosphere {
    tau_max: f64,
    omega_0: f64,
    g: f64,
    surface_albedo: f64,
}

impl Atmosphere {
    /// Build a validated atmosphere descriptor.
    ///
    /// * `tau_max` - total optical depth of the layer, must be positive
    ///   and finite
    /// * `omega_0` - single-scattering albedo in [0, 1]
    /// * `g` - asymmetry parameter in [-1, 1]
    /// * `surface_albedo` - Lambertian reflectance of the bottom boundary
    ///   in [0, 1]
    ///
    /// Out-of-range values (including NaN) are rejected, never clamped.
    pub fn new(
        tau_max: f64,
        omega_0: f64,
        g: f64,
        surface_albedo: f64,
    ) -> Result<Self, ValidationError> {
        if !(tau_max.is_finite() && tau_max > 0.0) {
            return Err(ValidationError::OpticalDepth(tau_max));
        }
        if !(0.0..=1.0).contains(&omega_0) {
            return Err(ValidationError::SingleScatteringAlbedo(omega_0));
        }
        if !(-1.0..=1.0).contains(&g) {
            return Err(ValidationError::AsymmetryParameter(g));
        }
        if !(0.0..=1.0).contains(&surface_albedo) {
            return Err(ValidationError::SurfaceAlbedo(surface_albedo));
        }
        Ok(Self {
            tau_max,
            omega_0,
            g,
            surface_albedo,
        })
    }

    pub fn tau_max(&self) -> f64 {
        self.tau_max
    }

    pub fn omega_0(&self) -> f64 {
        self.omega_0
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn surface_albedo(&self) -> f64 {
        self.surface_albedo
    }

    /// Every interaction absorbs; transmittance follows Beer-Lambert.
    pub fn is_pure_absorption(&self) -> bool {
        self.omega_0 == 0.0
    }

    /// Every interaction scatters; no energy is deposited in the layer.
    pub fn is_conservative(&self) -> bool {
        self.omega_0 == 1.0
    }
}
