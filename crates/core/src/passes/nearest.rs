//! Nearest-neighbor variant: one-shot resample to the exact target size.

use std::path::Path;

use anyhow::Result;
use ndarray::Array4;

use crate::config::EngineConfig;
use crate::engine::{ModelHandle, ScalePass, ScaleRequest, UpscalingEngine};
use crate::error::ModelLoadError;
use crate::tensor::TensorImage;
use crate::variant::VariantDescriptor;

use super::scaled_dim;

pub const VARIANT_NAME: &str = "Nearest";

pub struct NearestPass;

impl ScalePass for NearestPass {
    fn upscale_once(
        &mut self,
        image: &TensorImage,
        request: &ScaleRequest<'_>,
    ) -> Result<TensorImage> {
        let dst_w = scaled_dim(image.width(), request.scale);
        let dst_h = scaled_dim(image.height(), request.scale);
        Ok(resample_nearest(image, dst_w, dst_h))
    }

    fn load_model(&mut self, _path: &Path) -> Result<ModelHandle, ModelLoadError> {
        Ok(ModelHandle::unit())
    }
}

/// Engine exposing the single nearest-neighbor variant.
pub fn engine() -> UpscalingEngine {
    UpscalingEngine::new(EngineConfig::named(VARIANT_NAME), Box::new(NearestPass))
        .with_variants(vec![VariantDescriptor::new(VARIANT_NAME, VARIANT_NAME)])
}

/// Nearest-neighbor resample on the planar float representation.
pub(crate) fn resample_nearest(src: &TensorImage, dst_w: usize, dst_h: usize) -> TensorImage {
    let (n, c, src_h, src_w) = src.dims();
    let data = src.data();
    let mut dst = Array4::<f32>::zeros((n, c, dst_h, dst_w));

    for b in 0..n {
        for ch in 0..c {
            for dst_y in 0..dst_h {
                // Map destination pixel center to source coordinates
                let src_y = ((dst_y as f64 + 0.5) * src_h as f64 / dst_h as f64) as usize;
                let src_y = src_y.min(src_h - 1);

                for dst_x in 0..dst_w {
                    let src_x = ((dst_x as f64 + 0.5) * src_w as f64 / dst_w as f64) as usize;
                    let src_x = src_x.min(src_w - 1);

                    dst[[b, ch, dst_y, dst_x]] = data[[b, ch, src_y, src_x]];
                }
            }
        }
    }

    TensorImage::new(dst)
}
