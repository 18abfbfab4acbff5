//! 可选拥塞控制算法的注册表。
//! A table of selectable congestion control algorithms, keyed by name.

use crate::congestion::CongestionOps;
use crate::error::{Error, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Creates fresh algorithm instances, one per connection.
///
/// 创建新的算法实例，每个连接一个。
pub trait AlgorithmFactory: fmt::Debug + Send + Sync {
    /// The name the algorithm is selectable under.
    fn name(&self) -> &'static str;

    /// Builds a new, uninitialized instance. The host runs `init` on it.
    fn create(&self) -> Box<dyn CongestionOps>;
}

/// A concurrent registry of algorithm factories.
///
/// 算法工厂的并发注册表。
#[derive(Debug, Default)]
pub struct Registry {
    algorithms: DashMap<&'static str, Arc<dyn AlgorithmFactory>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factory. Fails if the name is taken.
    /// 添加一个工厂。名称已被占用时失败。
    pub fn register(&self, factory: Arc<dyn AlgorithmFactory>) -> Result<()> {
        let name = factory.name();
        match self.algorithms.entry(name) {
            Entry::Occupied(_) => Err(Error::AlgorithmExists(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(factory);
                info!(algorithm = name, "Congestion control registered");
                Ok(())
            }
        }
    }

    /// Removes a factory and hands it back.
    /// 移除一个工厂并将其返回。
    pub fn unregister(&self, name: &str) -> Result<Arc<dyn AlgorithmFactory>> {
        let (_, factory) = self
            .algorithms
            .remove(name)
            .ok_or_else(|| Error::UnknownAlgorithm(name.to_string()))?;
        info!(algorithm = name, "Congestion control unregistered");
        Ok(factory)
    }

    /// Instantiates the algorithm registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn CongestionOps>> {
        let factory = self
            .algorithms
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::UnknownAlgorithm(name.to_string()))?;
        Ok(factory.create())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.algorithms.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.algorithms.iter().map(|entry| *entry.key()).collect();
        names.sort_unstable();
        names
    }
}
