#![deny(clippy::expect_used, clippy::unwrap_used)]

//! The root of the Mario congestion control library.
//! Mario拥塞控制库的根。

pub mod config;
pub mod error;
pub mod tunables;

pub mod congestion;
pub mod connection;
pub mod module;
pub mod registry;

#[cfg(test)]
mod testing;

pub use congestion::mario::{Mario, MarioStats};
pub use congestion::{AckInfo, AlgorithmFlags, CongestionOps};
pub use connection::{Connection, HostStack};
pub use error::{Error, Result};
pub use module::MarioModule;
pub use registry::Registry;
pub use tunables::Tunables;
