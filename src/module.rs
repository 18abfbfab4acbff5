//! 模块的加载与卸载。
//! Load/unload wiring for the Mario algorithm.
//!
//! Loading creates the shared [`Tunables`] and registers a factory that hands
//! each connection its own [`Mario`] bound to those tunables. Unloading (or
//! dropping the module) removes the factory again.

use crate::config::Config;
use crate::congestion::CongestionOps;
use crate::congestion::mario::{self, Mario};
use crate::error::Result;
use crate::registry::{AlgorithmFactory, Registry};
use crate::tunables::{TUNABLES_PATH, Tunables};
use std::sync::Arc;
use tracing::{info, warn};

/// Builds per-connection [`Mario`] instances sharing one set of tunables.
#[derive(Debug)]
pub struct MarioFactory {
    tunables: Arc<Tunables>,
    config: Config,
}

impl MarioFactory {
    pub fn new(tunables: Arc<Tunables>, config: Config) -> Self {
        Self { tunables, config }
    }
}

impl AlgorithmFactory for MarioFactory {
    fn name(&self) -> &'static str {
        mario::NAME
    }

    fn create(&self) -> Box<dyn CongestionOps> {
        Box::new(Mario::new(Arc::clone(&self.tunables), &self.config))
    }
}

/// A loaded Mario module.
///
/// 已加载的Mario模块。
#[derive(Debug)]
pub struct MarioModule {
    registry: Arc<Registry>,
    tunables: Arc<Tunables>,
    loaded: bool,
}

impl MarioModule {
    /// Registers Mario into `registry`.
    /// 将Mario注册到 `registry` 中。
    pub fn load(registry: Arc<Registry>, config: Config) -> Result<Self> {
        let tunables = Arc::new(Tunables::new(&config.tunables));
        registry.register(Arc::new(MarioFactory::new(Arc::clone(&tunables), config)))?;
        info!(
            algorithm = mario::NAME,
            path = TUNABLES_PATH,
            "Module loaded"
        );
        Ok(Self {
            registry,
            tunables,
            loaded: true,
        })
    }

    /// The operator-facing knobs of this module.
    pub fn tunables(&self) -> &Arc<Tunables> {
        &self.tunables
    }

    pub fn unload(mut self) -> Result<()> {
        self.loaded = false;
        self.registry.unregister(mario::NAME)?;
        info!(algorithm = mario::NAME, "Module unloaded");
        Ok(())
    }
}

impl Drop for MarioModule {
    fn drop(&mut self) {
        if self.loaded {
            if let Err(e) = self.registry.unregister(mario::NAME) {
                warn!("Failed to unregister on drop: {}", e);
            }
        }
    }
}
