//! Registry of selectable upscaling variants and their owning engines.
//!
//! A host pipeline populates one registry at startup, shows the descriptors
//! in its selection surface, and routes each request to the owning engine of
//! whichever variant the user picked.

use anyhow::{anyhow, bail, Result};
use ndarray::ArrayD;

use crate::engine::UpscalingEngine;
use crate::passes::{identity, lanczos, nearest};
use crate::variant::VariantDescriptor;

pub struct VariantRegistry {
    engines: Vec<UpscalingEngine>,
}

impl VariantRegistry {
    pub fn new() -> Self {
        Self {
            engines: Vec::new(),
        }
    }

    /// Registry pre-populated with the reference/fallback variants.
    pub fn with_builtin_engines() -> Self {
        let mut registry = Self::new();
        for engine in [identity::engine(), nearest::engine(), lanczos::engine()] {
            registry
                .register(engine)
                .expect("builtin variant names are unique");
        }
        registry
    }

    /// Append an engine and the variants it exposes.
    ///
    /// Rejects engines whose name, or any of whose variant names, is already
    /// registered, and variants with a non-positive native scale.
    pub fn register(&mut self, engine: UpscalingEngine) -> Result<()> {
        if self.engine(engine.name()).is_some() {
            bail!("duplicate engine name: {}", engine.name());
        }
        for variant in engine.variants() {
            if variant.scale <= 0.0 {
                bail!(
                    "variant '{}' has non-positive native scale {}",
                    variant.name,
                    variant.scale
                );
            }
            if self.descriptor(&variant.name).is_some() {
                bail!("duplicate variant name: {}", variant.name);
            }
        }

        self.engines.push(engine);
        Ok(())
    }

    /// All descriptors in registration order, for the host selection surface.
    pub fn descriptors(&self) -> Vec<&VariantDescriptor> {
        self.engines
            .iter()
            .flat_map(|engine| engine.variants().iter())
            .collect()
    }

    pub fn descriptor(&self, variant_name: &str) -> Option<&VariantDescriptor> {
        self.descriptors()
            .into_iter()
            .find(|descriptor| descriptor.name == variant_name)
    }

    pub fn engine(&self, name: &str) -> Option<&UpscalingEngine> {
        self.engines.iter().find(|engine| engine.name() == name)
    }

    pub fn engine_mut(&mut self, name: &str) -> Option<&mut UpscalingEngine> {
        self.engines
            .iter_mut()
            .find(|engine| engine.name() == name)
    }

    /// The owning engine of a variant, resolved through the descriptor's
    /// engine name.
    pub fn engine_for_variant(&mut self, variant_name: &str) -> Option<&mut UpscalingEngine> {
        let engine_name = self.descriptor(variant_name)?.engine.clone();
        self.engine_mut(&engine_name)
    }

    /// The full selection flow: look up the variant, obtain its owning
    /// engine, and upscale with the variant's name as the model name.
    pub fn upscale_with(
        &mut self,
        variant_name: &str,
        image: &ArrayD<u8>,
        scale: f64,
    ) -> Result<ArrayD<u8>> {
        let engine_name = self
            .descriptor(variant_name)
            .map(|descriptor| descriptor.engine.clone())
            .ok_or_else(|| anyhow!("unknown variant: {variant_name}"))?;

        let engine = self.engine_mut(&engine_name).ok_or_else(|| {
            anyhow!("variant '{variant_name}' references missing engine '{engine_name}'")
        })?;

        engine.upscale(image, scale, Some(variant_name))
    }
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::passes::identity::IdentityPass;
    use ndarray::Array3;

    fn engine_named(name: &str, variant: &str) -> UpscalingEngine {
        UpscalingEngine::new(EngineConfig::named(name), Box::new(IdentityPass))
            .with_variants(vec![VariantDescriptor::new(variant, name)])
    }

    #[test]
    fn test_builtin_listing_is_ordered() {
        let registry = VariantRegistry::with_builtin_engines();
        let names: Vec<&str> = registry
            .descriptors()
            .iter()
            .map(|descriptor| descriptor.name.as_str())
            .collect();
        assert_eq!(names, vec!["None", "Nearest", "Lanczos"]);
    }

    #[test]
    fn test_builtin_descriptors_default_scale() {
        let registry = VariantRegistry::with_builtin_engines();
        for descriptor in registry.descriptors() {
            assert_eq!(descriptor.scale, VariantDescriptor::DEFAULT_SCALE);
            assert_eq!(descriptor.engine, descriptor.name);
        }
    }

    #[test]
    fn test_duplicate_variant_rejected() {
        let mut registry = VariantRegistry::new();
        registry.register(engine_named("a", "Shared")).unwrap();
        let err = registry
            .register(engine_named("b", "Shared"))
            .err()
            .expect("should fail");
        assert!(err.to_string().contains("duplicate variant name: Shared"));
    }

    #[test]
    fn test_duplicate_engine_rejected() {
        let mut registry = VariantRegistry::new();
        registry.register(engine_named("a", "X")).unwrap();
        let err = registry
            .register(engine_named("a", "Y"))
            .err()
            .expect("should fail");
        assert!(err.to_string().contains("duplicate engine name: a"));
    }

    #[test]
    fn test_non_positive_scale_rejected() {
        let mut registry = VariantRegistry::new();
        let mut descriptor = VariantDescriptor::new("Broken", "a");
        descriptor.scale = -2.0;
        let engine = UpscalingEngine::new(EngineConfig::named("a"), Box::new(IdentityPass))
            .with_variants(vec![descriptor]);
        let err = registry.register(engine).err().expect("should fail");
        assert!(err.to_string().contains("non-positive native scale"));
    }

    #[test]
    fn test_engine_for_variant() {
        let mut registry = VariantRegistry::with_builtin_engines();
        let engine = registry.engine_for_variant("Nearest").expect("resolves");
        assert_eq!(engine.name(), "Nearest");
        assert!(registry.engine_for_variant("Missing").is_none());
    }

    #[test]
    fn test_upscale_with_unknown_variant() {
        let mut registry = VariantRegistry::with_builtin_engines();
        let image = Array3::<u8>::zeros((4, 4, 3)).into_dyn();
        let err = registry
            .upscale_with("Missing", &image, 2.0)
            .err()
            .expect("should fail");
        assert!(err.to_string().contains("unknown variant: Missing"));
    }
}
