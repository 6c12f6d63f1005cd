use std::time::Instant;

use anyhow::{Context, Result};

use crate::backend::BackendRegistry;
use crate::config::LaunchConfig;
use crate::context::DrawingContext;
use crate::core::{Processor, Sketch};
use crate::error::StartupError;
use crate::logging::init_logging;

/// Runs a sketch with one of the built-in backends.
///
/// Returns once the backend's main loop ends. Startup failures (unknown
/// backend, failed initializer, missing or failing `setup`) are returned
/// before any frame is scheduled.
pub fn launch(sketch: Sketch, config: LaunchConfig) -> Result<()> {
    launch_with(&BackendRegistry::builtin(), sketch, config)
}

/// Same as `launch`, resolving the backend in `registry`.
pub fn launch_with(registry: &BackendRegistry, sketch: Sketch, config: LaunchConfig) -> Result<()> {
    init_logging(config.logging.clone());

    if sketch.setup.is_none() {
        return Err(StartupError::MissingSetup.into());
    }

    let ctx = DrawingContext::default();
    let loaded = registry.load(&config.backend, &ctx)?;
    let (module, renderer, lease) = loaded.into_parts();

    let mut processor = Processor::new(sketch, ctx, renderer, config.report);
    processor.start(Instant::now())?;

    let result = (module.main_loop)(processor, &config).with_context(|| format!("backend {:?}", module.name));
    drop(lease);
    result
}
