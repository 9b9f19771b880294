//! Engine abstraction: the `ScalePass` interface every variant implements
//! and the `UpscalingEngine` that drives it.

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use ndarray::ArrayD;
use tracing::debug;

use crate::config::EngineConfig;
use crate::discovery::ModelDiscovery;
use crate::driver;
use crate::error::ModelLoadError;
use crate::progress;
use crate::tensor::TensorImage;
use crate::variant::VariantDescriptor;

/// Opaque handle to loaded model state.
///
/// Concrete engines put whatever they loaded behind it and downcast on use.
/// Handles are cheaply clonable and shared read-only once loaded; the base
/// engine performs no caching of its own.
#[derive(Clone)]
pub struct ModelHandle(Arc<dyn Any + Send + Sync>);

impl ModelHandle {
    pub fn new<T: Any + Send + Sync>(model: T) -> Self {
        Self(Arc::new(model))
    }

    /// Handle for variants that have no weights to load.
    pub fn unit() -> Self {
        Self::new(())
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ModelHandle(..)")
    }
}

/// Parameters of the in-flight request, handed to every pass invocation.
#[derive(Debug, Clone, Copy)]
pub struct ScaleRequest<'a> {
    /// The caller's requested scale factor for the whole request — not the
    /// factor an individual pass is expected to produce.
    pub scale: f64,
    pub model_name: Option<&'a str>,
}

/// The two model-specific capabilities a variant provides. Everything else
/// (the convergence loop, layout normalization, discovery, progress) is
/// shared and lives outside the implementor.
pub trait ScalePass: Send {
    /// Perform exactly one model-native upscaling pass.
    ///
    /// The result must either keep the input's dimensions (meaning "cannot
    /// scale further") or be scaled by the model's fixed native factor.
    /// Implementations are deterministic for a fixed model and must not
    /// mutate hidden global state.
    fn upscale_once(&mut self, image: &TensorImage, request: &ScaleRequest<'_>)
        -> Result<TensorImage>;

    /// Load weights from `path`. Caching the handle across calls is the
    /// implementor's responsibility.
    fn load_model(&mut self, path: &Path) -> Result<ModelHandle, ModelLoadError>;
}

/// An upscaling strategy: configuration, a pass implementation, and the
/// variants it exposes to the registry.
///
/// One in-flight `upscale` call per instance: `current_scale` is per-call
/// transient state, so concurrent callers need one engine each or external
/// serialization.
pub struct UpscalingEngine {
    config: EngineConfig,
    pass: Box<dyn ScalePass>,
    variants: Vec<VariantDescriptor>,
    discovery: Option<Arc<dyn ModelDiscovery>>,
    current_scale: f64,
}

impl UpscalingEngine {
    pub fn new(config: EngineConfig, pass: Box<dyn ScalePass>) -> Self {
        Self {
            config,
            pass,
            variants: Vec::new(),
            discovery: None,
            current_scale: 1.0,
        }
    }

    pub fn with_variants(mut self, variants: Vec<VariantDescriptor>) -> Self {
        self.variants = variants;
        self
    }

    pub fn with_discovery(mut self, discovery: Arc<dyn ModelDiscovery>) -> Self {
        self.discovery = Some(discovery);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn variants(&self) -> &[VariantDescriptor] {
        &self.variants
    }

    /// Scale of the request currently (or most recently) being served.
    pub fn current_scale(&self) -> f64 {
        self.current_scale
    }

    /// Upscale `image` (NHWC u8, 3-D or 4-D) toward `scale` times its size.
    ///
    /// Runs the shared convergence loop over this engine's pass. The result
    /// is in the same external layout as the input, at whatever size the
    /// loop converged to — not guaranteed to match the target exactly.
    pub fn upscale(
        &mut self,
        image: &ArrayD<u8>,
        scale: f64,
        model_name: Option<&str>,
    ) -> Result<ArrayD<u8>> {
        self.current_scale = scale;
        debug!(
            engine = %self.config.name,
            scale,
            model = model_name.unwrap_or("-"),
            "starting upscale request"
        );

        let outcome = driver::upscale(self.pass.as_mut(), image, scale, model_name)?;

        debug!(
            engine = %self.config.name,
            iterations = outcome.iterations,
            stop = ?outcome.stop,
            "upscale request finished"
        );
        Ok(outcome.image)
    }

    /// Delegate to the pass's loading hook.
    pub fn load_model(&mut self, path: &Path) -> Result<ModelHandle, ModelLoadError> {
        self.pass.load_model(path)
    }

    /// Candidate model files for this engine, from the discovery
    /// collaborator, optionally filtered by file extension.
    ///
    /// The sequence is lazily produced, finite, and not restartable. With no
    /// collaborator configured the sequence is empty — "no candidates found"
    /// is not an error.
    pub fn find_variants(&self, ext_filter: Option<&[&str]>) -> Box<dyn Iterator<Item = PathBuf>> {
        let Some(discovery) = self.discovery.as_ref() else {
            return Box::new(std::iter::empty());
        };

        let candidates = discovery.find_models(
            self.config.model_dir.as_deref(),
            self.config.model_url.as_deref(),
            self.config.user_dir.as_deref(),
        );

        match ext_filter {
            None => candidates,
            Some(extensions) => {
                let extensions: Vec<String> = extensions
                    .iter()
                    .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                    .collect();
                Box::new(candidates.filter(move |path| {
                    path.extension()
                        .and_then(|ext| ext.to_str())
                        .map(|ext| extensions.iter().any(|f| ext.eq_ignore_ascii_case(f)))
                        .unwrap_or(false)
                }))
            }
        }
    }

    /// Write a status line to the process-wide progress sink. Purely
    /// observational; never affects control flow.
    pub fn report_progress(&self, message: &str) {
        progress::report_progress(message);
    }
}
