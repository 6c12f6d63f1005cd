//! Backend registry and loader.
//!
//! A backend is a renderer factory plus the main loop that drives a
//! `Processor` with it. Backends are registered by name at compile time and
//! resolved once at startup; at most one is active per process.

pub mod raster;
pub mod recording;

use std::fmt;
use std::sync::Mutex;

use anyhow::Context as _;

use crate::config::LaunchConfig;
use crate::context::DrawingContext;
use crate::core::Processor;
use crate::error::StartupError;
use crate::render::Renderer;

pub use raster::RasterRenderer;
pub use recording::{CommandLog, RecordingRenderer};

/// What an initializer gets: the drawing context the backend will serve.
#[derive(Debug, Clone, Copy)]
pub struct BackendInit<'a> {
    pub context: &'a DrawingContext,
}

pub type InitFn = fn(&BackendInit<'_>) -> anyhow::Result<Box<dyn Renderer>>;
pub type MainLoopFn = fn(Processor, &LaunchConfig) -> anyhow::Result<()>;

/// Named renderer factory plus main-loop entry point.
#[derive(Clone, Copy)]
pub struct BackendModule {
    pub name: &'static str,
    pub init: InitFn,
    pub main_loop: MainLoopFn,
}

impl fmt::Debug for BackendModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendModule").field("name", &self.name).finish_non_exhaustive()
    }
}

fn init_raster(init: &BackendInit<'_>) -> anyhow::Result<Box<dyn Renderer>> {
    let ctx = init.context;
    anyhow::ensure!(
        ctx.width > 0 && ctx.height > 0,
        "canvas {}x{} has no pixels",
        ctx.width,
        ctx.height
    );
    Ok(Box::new(RasterRenderer::new(ctx.width, ctx.height)))
}

fn init_recording(init: &BackendInit<'_>) -> anyhow::Result<Box<dyn Renderer>> {
    Ok(Box::new(RecordingRenderer::new(init.context.width, init.context.height)))
}

fn run_windowed(processor: Processor, config: &LaunchConfig) -> anyhow::Result<()> {
    crate::window::run_windowed(processor, config).context("window main loop failed")
}

fn run_headless(processor: Processor, config: &LaunchConfig) -> anyhow::Result<()> {
    crate::window::run_headless(processor, config).context("headless main loop failed")
}

#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    modules: Vec<BackendModule>,
}

impl BackendRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `window`, `headless` and `recording`.
    pub fn builtin() -> Self {
        let mut reg = Self::empty();
        reg.register(BackendModule {
            name: "window",
            init: init_raster,
            main_loop: run_windowed,
        });
        reg.register(BackendModule {
            name: "headless",
            init: init_raster,
            main_loop: run_headless,
        });
        reg.register(BackendModule {
            name: RecordingRenderer::NAME,
            init: init_recording,
            main_loop: run_headless,
        });
        reg
    }

    /// Adds a module, replacing any module registered under the same name.
    pub fn register(&mut self, module: BackendModule) {
        match self.modules.iter_mut().find(|m| m.name == module.name) {
            Some(slot) => *slot = module,
            None => self.modules.push(module),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name).collect()
    }

    pub fn resolve(&self, name: &str) -> Result<BackendModule, StartupError> {
        self.modules
            .iter()
            .find(|m| m.name == name)
            .copied()
            .ok_or_else(|| StartupError::BackendNotFound {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Resolves `name`, claims the process-wide backend slot and runs the
    /// initializer. Any failure releases the slot again.
    pub fn load(&self, name: &str, context: &DrawingContext) -> Result<LoadedBackend, StartupError> {
        let module = self.resolve(name)?;
        let lease = BackendLease::acquire(module.name)?;

        let renderer = (module.init)(&BackendInit { context }).map_err(|source| StartupError::BackendInit {
            name: module.name.to_string(),
            source,
        })?;

        log::info!("backend {:?} loaded (renderer {:?})", module.name, renderer.name());
        Ok(LoadedBackend {
            module,
            renderer,
            lease,
        })
    }
}

static ACTIVE: Mutex<Option<&'static str>> = Mutex::new(None);

/// Claim on the single backend slot. Dropping it frees the slot.
#[derive(Debug)]
pub struct BackendLease {
    name: &'static str,
}

impl BackendLease {
    fn acquire(name: &'static str) -> Result<Self, StartupError> {
        let mut active = ACTIVE.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(current) = *active {
            return Err(StartupError::BackendAlreadyActive {
                active: current.to_string(),
            });
        }
        *active = Some(name);
        Ok(Self { name })
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for BackendLease {
    fn drop(&mut self) {
        let mut active = ACTIVE.lock().unwrap_or_else(|e| e.into_inner());
        *active = None;
        log::debug!("backend {:?} torn down", self.name);
    }
}

/// An initialized backend holding the process-wide slot.
pub struct LoadedBackend {
    pub module: BackendModule,
    pub renderer: Box<dyn Renderer>,
    lease: BackendLease,
}

impl LoadedBackend {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.module.name
    }

    /// Splits into parts; the slot stays claimed for as long as the lease lives.
    pub fn into_parts(self) -> (BackendModule, Box<dyn Renderer>, BackendLease) {
        (self.module, self.renderer, self.lease)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing_init(_: &BackendInit<'_>) -> anyhow::Result<Box<dyn Renderer>> {
        anyhow::bail!("no device")
    }

    #[test]
    fn builtin_names() {
        let reg = BackendRegistry::builtin();
        assert_eq!(reg.names(), vec!["window", "headless", "recording"]);
    }

    #[test]
    fn unknown_backend_lists_available() {
        let reg = BackendRegistry::builtin();
        match reg.resolve("vulkan") {
            Err(StartupError::BackendNotFound { name, available }) => {
                assert_eq!(name, "vulkan");
                assert_eq!(available, "window, headless, recording");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn register_replaces_same_name() {
        let mut reg = BackendRegistry::builtin();
        reg.register(BackendModule {
            name: "headless",
            init: init_recording,
            main_loop: run_headless,
        });
        assert_eq!(reg.names().len(), 3);
    }

    // The backend slot is process-wide, so every assertion that loads a
    // backend lives in this one test.
    #[test]
    fn load_lifecycle() {
        let ctx = DrawingContext::default();
        let mut reg = BackendRegistry::builtin();
        reg.register(BackendModule {
            name: "broken",
            init: failing_init,
            main_loop: run_headless,
        });

        assert!(matches!(
            reg.load("broken", &ctx),
            Err(StartupError::BackendInit { ref name, .. }) if name == "broken"
        ));

        let first = reg.load("recording", &ctx).unwrap();
        assert_eq!(first.renderer.name(), "recording");
        assert!(matches!(
            reg.load("headless", &ctx),
            Err(StartupError::BackendAlreadyActive { ref active }) if active == "recording"
        ));

        drop(first);
        let second = reg.load("headless", &ctx).unwrap();
        assert_eq!(second.renderer.name(), "raster");
    }
}
