//! The "None" variant: returns frames untouched.
//!
//! Because its output size always equals its input size, the driver's
//! no-progress stop fires after exactly one pass.

use std::path::Path;

use anyhow::Result;

use crate::config::EngineConfig;
use crate::engine::{ModelHandle, ScalePass, ScaleRequest, UpscalingEngine};
use crate::error::ModelLoadError;
use crate::tensor::TensorImage;
use crate::variant::VariantDescriptor;

pub const VARIANT_NAME: &str = "None";

pub struct IdentityPass;

impl ScalePass for IdentityPass {
    fn upscale_once(
        &mut self,
        image: &TensorImage,
        _request: &ScaleRequest<'_>,
    ) -> Result<TensorImage> {
        Ok(image.clone())
    }

    fn load_model(&mut self, _path: &Path) -> Result<ModelHandle, ModelLoadError> {
        Ok(ModelHandle::unit())
    }
}

/// Engine exposing the single identity variant.
pub fn engine() -> UpscalingEngine {
    UpscalingEngine::new(EngineConfig::named(VARIANT_NAME), Box::new(IdentityPass))
        .with_variants(vec![VariantDescriptor::new(VARIANT_NAME, VARIANT_NAME)])
}
