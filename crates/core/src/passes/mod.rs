//! Reference single-pass variants: identity, nearest-neighbor, Lanczos.
//!
//! Each reaches the exact target size in one call, so the convergence loop
//! stops after the first pass. They double as fallback variants and as
//! degenerate cases exercising the driver's stop conditions.

pub mod identity;
pub mod lanczos;
pub mod nearest;

/// Target size for a one-shot resample: `floor(dim × scale)`.
pub(crate) fn scaled_dim(dim: usize, scale: f64) -> usize {
    ((dim as f64) * scale) as usize
}
