//! Selectable variant records exposed to the host selection surface.

use std::path::PathBuf;

use serde::Serialize;

use crate::engine::ModelHandle;

/// One selectable upscaling option: a named configuration of an engine,
/// usually one checkpoint or one fixed scale.
///
/// Descriptors are created when a registry is populated and are immutable
/// thereafter. The host reads them to build a selection menu; it never
/// mutates them.
#[derive(Debug, Clone, Serialize)]
pub struct VariantDescriptor {
    /// Unique within a registry.
    pub name: String,
    /// Location of the variant's weights; `None` for parameterless variants.
    pub data_path: Option<PathBuf>,
    /// Size multiplier a single native pass of this variant produces.
    pub scale: f64,
    /// Owning engine, by registry name. A non-owning association: the
    /// descriptor never manages the engine's lifetime.
    pub engine: String,
    /// Opaque model state, owned by the engine and loaded lazily.
    #[serde(skip)]
    pub model: Option<ModelHandle>,
}

impl VariantDescriptor {
    pub const DEFAULT_SCALE: f64 = 4.0;

    pub fn new(name: impl Into<String>, engine: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_path: None,
            scale: Self::DEFAULT_SCALE,
            engine: engine.into(),
            model: None,
        }
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        assert!(scale > 0.0, "variant scale must be positive, got {scale}");
        self.scale = scale;
        self
    }

    pub fn with_model(mut self, model: ModelHandle) -> Self {
        self.model = Some(model);
        self
    }
}
