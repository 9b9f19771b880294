//! Interface boundary to the external model-discovery collaborator.
//!
//! Weight discovery and download live outside this crate. Engines only ever
//! issue a single lookup call through this trait; what scans directories,
//! resolves remote sources, or honors user-supplied search paths is the
//! host's concern.

use std::path::{Path, PathBuf};

/// Produces candidate model file locations for an engine.
///
/// The returned sequence is finite, lazily produced, and not restartable.
/// An empty sequence means "no candidates found" and is never an error.
pub trait ModelDiscovery: Send + Sync {
    fn find_models(
        &self,
        model_dir: Option<&Path>,
        model_url: Option<&str>,
        user_dir: Option<&Path>,
    ) -> Box<dyn Iterator<Item = PathBuf>>;
}

/// Collaborator for deployments with nothing to discover: every lookup
/// yields no candidates.
pub struct NullDiscovery;

impl ModelDiscovery for NullDiscovery {
    fn find_models(
        &self,
        _model_dir: Option<&Path>,
        _model_url: Option<&str>,
        _user_dir: Option<&Path>,
    ) -> Box<dyn Iterator<Item = PathBuf>> {
        Box::new(std::iter::empty())
    }
}
