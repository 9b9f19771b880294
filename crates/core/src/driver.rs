//! Convergence-loop driver shared by every upscaling variant.
//!
//! Models upscale by their own native factor per pass, which need not equal
//! the caller's requested factor. The driver repeats the model's single pass
//! and decides after each one whether to stop, continue, or give up, from
//! dimension comparisons alone.

use anyhow::{bail, Result};
use ndarray::ArrayD;
use tracing::debug;

use crate::engine::{ScalePass, ScaleRequest};
use crate::tensor;

/// Upper bound on model passes per request. A 2x model asked for 4x needs
/// two productive passes; the third absorbs rounding drift.
pub const MAX_PASSES: usize = 3;

/// Per-axis tolerance in pixels for treating the current size as the target.
/// Successive integer resizes accumulate rounding error, so an exact match
/// is not always reachable.
pub const CONVERGENCE_TOLERANCE_PX: f64 = 20.0;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A pass returned the same dimensions it was given; further iteration
    /// cannot help.
    NoProgress,
    /// Within tolerance of the requested target on both axes.
    Converged,
    /// The pass budget ran out before either stop condition held. A soft
    /// failure: the result is returned at whatever size it reached.
    BudgetExhausted,
}

#[derive(Debug)]
pub struct DriverOutcome {
    /// NHWC u8, same rank as the input.
    pub image: ArrayD<u8>,
    pub iterations: usize,
    pub stop: StopReason,
}

/// Drive `pass` until the image converges near `requested_scale` times its
/// original size.
///
/// `image` is NHWC u8, 3-D (`HWC`) or 4-D (`NHWC`); `requested_scale` must
/// be at least 1. All stop decisions are value-based size comparisons; the
/// only errors out of the loop are errors from the pass itself.
pub fn upscale(
    pass: &mut dyn ScalePass,
    image: &ArrayD<u8>,
    requested_scale: f64,
    model_name: Option<&str>,
) -> Result<DriverOutcome> {
    if !requested_scale.is_finite() || requested_scale < 1.0 {
        bail!("requested scale must be a finite value >= 1, got {requested_scale}");
    }

    let (mut current, squeeze) = tensor::from_nhwc(image)?;
    let dest_w = current.width() as f64 * requested_scale;
    let dest_h = current.height() as f64 * requested_scale;
    let request = ScaleRequest {
        scale: requested_scale,
        model_name,
    };

    let mut iterations = 0;
    let mut stop = StopReason::BudgetExhausted;
    for pass_index in 0..MAX_PASSES {
        let (prev_w, prev_h) = (current.width(), current.height());
        current = pass.upscale_once(&current, &request)?;
        iterations += 1;

        debug!(
            pass = pass_index + 1,
            width = current.width(),
            height = current.height(),
            "upscale pass complete"
        );

        if current.width() == prev_w && current.height() == prev_h {
            stop = StopReason::NoProgress;
            break;
        }

        if (dest_w - current.width() as f64).abs() <= CONVERGENCE_TOLERANCE_PX
            && (dest_h - current.height() as f64).abs() <= CONVERGENCE_TOLERANCE_PX
        {
            stop = StopReason::Converged;
            break;
        }
    }

    Ok(DriverOutcome {
        image: tensor::into_nhwc(current, squeeze),
        iterations,
        stop,
    })
}
