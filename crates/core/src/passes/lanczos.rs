//! Lanczos variant: one-shot smooth resample to the exact target size.
//!
//! Separable Lanczos-3 windowed-sinc filter with per-pixel weight
//! normalization, applied horizontally then vertically.

use std::path::Path;

use anyhow::Result;
use ndarray::Array4;

use crate::config::EngineConfig;
use crate::engine::{ModelHandle, ScalePass, ScaleRequest, UpscalingEngine};
use crate::error::ModelLoadError;
use crate::tensor::TensorImage;
use crate::variant::VariantDescriptor;

use super::scaled_dim;

pub const VARIANT_NAME: &str = "Lanczos";

/// Lobe count of the windowed sinc.
const LANCZOS_A: f64 = 3.0;

pub struct LanczosPass;

impl ScalePass for LanczosPass {
    fn upscale_once(
        &mut self,
        image: &TensorImage,
        request: &ScaleRequest<'_>,
    ) -> Result<TensorImage> {
        let dst_w = scaled_dim(image.width(), request.scale);
        let dst_h = scaled_dim(image.height(), request.scale);
        Ok(resample_lanczos(image, dst_w, dst_h))
    }

    fn load_model(&mut self, _path: &Path) -> Result<ModelHandle, ModelLoadError> {
        Ok(ModelHandle::unit())
    }
}

/// Engine exposing the single Lanczos variant.
pub fn engine() -> UpscalingEngine {
    UpscalingEngine::new(EngineConfig::named(VARIANT_NAME), Box::new(LanczosPass))
        .with_variants(vec![VariantDescriptor::new(VARIANT_NAME, VARIANT_NAME)])
}

fn lanczos_kernel(x: f64) -> f64 {
    let x = x.abs();
    if x < f64::EPSILON {
        return 1.0;
    }
    if x >= LANCZOS_A {
        return 0.0;
    }
    let pix = std::f64::consts::PI * x;
    LANCZOS_A * pix.sin() * (pix / LANCZOS_A).sin() / (pix * pix)
}

/// Filter taps for one output axis: for each destination index, the first
/// contributing source index and the normalized weights from there on.
struct AxisWeights {
    start: usize,
    weights: Vec<f64>,
}

fn axis_weights(src_len: usize, dst_len: usize) -> Vec<AxisWeights> {
    let ratio = src_len as f64 / dst_len as f64;
    // When shrinking, the kernel is stretched by the shrink factor so every
    // source pixel still contributes.
    let filter_scale = ratio.max(1.0);
    let support = LANCZOS_A * filter_scale;

    (0..dst_len)
        .map(|dst| {
            let center = (dst as f64 + 0.5) * ratio - 0.5;
            let lo = (center - support).ceil().max(0.0) as usize;
            let hi = ((center + support).floor()).min(src_len as f64 - 1.0) as usize;

            let mut weights = Vec::with_capacity(hi - lo + 1);
            let mut sum = 0.0;
            for src in lo..=hi {
                let weight = lanczos_kernel((src as f64 - center) / filter_scale);
                sum += weight;
                weights.push(weight);
            }
            if sum != 0.0 {
                for weight in &mut weights {
                    *weight /= sum;
                }
            }

            AxisWeights { start: lo, weights }
        })
        .collect()
}

/// Separable Lanczos resample on the planar float representation. Output
/// values are clamped back into [0,1] since the windowed sinc overshoots at
/// hard edges.
pub(crate) fn resample_lanczos(src: &TensorImage, dst_w: usize, dst_h: usize) -> TensorImage {
    let (n, c, src_h, src_w) = src.dims();
    let data = src.data();
    let x_weights = axis_weights(src_w, dst_w);
    let y_weights = axis_weights(src_h, dst_h);

    // Horizontal pass into an intermediate (src_h x dst_w) plane.
    let mut mid = Array4::<f32>::zeros((n, c, src_h, dst_w));
    for b in 0..n {
        for ch in 0..c {
            for y in 0..src_h {
                for (dst_x, taps) in x_weights.iter().enumerate() {
                    let mut acc = 0.0f64;
                    for (k, weight) in taps.weights.iter().enumerate() {
                        acc += weight * data[[b, ch, y, taps.start + k]] as f64;
                    }
                    mid[[b, ch, y, dst_x]] = acc as f32;
                }
            }
        }
    }

    // Vertical pass.
    let mut dst = Array4::<f32>::zeros((n, c, dst_h, dst_w));
    for b in 0..n {
        for ch in 0..c {
            for (dst_y, taps) in y_weights.iter().enumerate() {
                for x in 0..dst_w {
                    let mut acc = 0.0f64;
                    for (k, weight) in taps.weights.iter().enumerate() {
                        acc += weight * mid[[b, ch, taps.start + k, x]] as f64;
                    }
                    dst[[b, ch, dst_y, x]] = (acc as f32).clamp(0.0, 1.0);
                }
            }
        }
    }

    TensorImage::new(dst)
}
