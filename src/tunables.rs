//! 运维可调参数。
//! Operator-settable knobs shared by every attached algorithm instance.
//!
//! The knobs are independent, so each lives in its own atomic and is read with
//! relaxed ordering. Writes take effect at the next `init` or completed
//! sampling batch; nothing is recomputed retroactively.

use crate::config::TunableConfig;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::info;

/// Conventional location of the tunable table in a host's configuration tree.
pub const TUNABLES_PATH: &str = "net/ipv4/tcp_mario";

/// A named entry of the tunable table.
///
/// 可调参数表中的命名条目。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Bandwidth,
    Factor,
}

impl Parameter {
    pub const ALL: [Parameter; 2] = [Parameter::Bandwidth, Parameter::Factor];

    pub fn name(self) -> &'static str {
        match self {
            Parameter::Bandwidth => "bandwidth",
            Parameter::Factor => "factor",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Parameter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Parameter::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| Error::UnknownParameter(s.to_string()))
    }
}

/// The shared `bandwidth` and `factor` knobs.
///
/// No range validation is performed: zero or extreme values are accepted and
/// produce degenerate windows. Operators must set `bandwidth` before traffic
/// begins.
///
/// 共享的 `bandwidth` 和 `factor` 参数。不做范围校验。
#[derive(Debug)]
pub struct Tunables {
    bandwidth: AtomicU32,
    factor: AtomicU32,
}

impl Tunables {
    pub fn new(config: &TunableConfig) -> Self {
        Self {
            bandwidth: AtomicU32::new(config.bandwidth),
            factor: AtomicU32::new(config.factor),
        }
    }

    pub fn bandwidth(&self) -> u32 {
        self.bandwidth.load(Ordering::Relaxed)
    }

    pub fn set_bandwidth(&self, bandwidth: u32) {
        self.bandwidth.store(bandwidth, Ordering::Relaxed);
    }

    pub fn factor(&self) -> u32 {
        self.factor.load(Ordering::Relaxed)
    }

    pub fn set_factor(&self, factor: u32) {
        self.factor.store(factor, Ordering::Relaxed);
    }

    fn slot(&self, parameter: Parameter) -> &AtomicU32 {
        match parameter {
            Parameter::Bandwidth => &self.bandwidth,
            Parameter::Factor => &self.factor,
        }
    }

    /// Reads an entry by name.
    /// 按名称读取条目。
    pub fn get(&self, name: &str) -> Result<u32> {
        let parameter: Parameter = name.parse()?;
        Ok(self.slot(parameter).load(Ordering::Relaxed))
    }

    /// Writes an entry by name.
    /// 按名称写入条目。
    pub fn set(&self, name: &str, value: u32) -> Result<()> {
        let parameter: Parameter = name.parse()?;
        self.slot(parameter).store(value, Ordering::Relaxed);
        info!(%parameter, value, "Tunable updated");
        Ok(())
    }

    /// Writes an entry from its textual form, the way an operator would write
    /// to a configuration file. Surrounding whitespace is ignored.
    ///
    /// 以文本形式写入条目，就像运维写配置文件一样。忽略首尾空白。
    pub fn write_str(&self, name: &str, text: &str) -> Result<()> {
        let parameter: Parameter = name.parse()?;
        let value = text
            .trim()
            .parse::<u32>()
            .map_err(|source| Error::InvalidParameterValue {
                name: parameter.name(),
                value: text.to_string(),
                source,
            })?;
        self.set(parameter.name(), value)
    }

    /// Lists every entry with its current value, in table order.
    pub fn entries(&self) -> Vec<(&'static str, u32)> {
        Parameter::ALL
            .into_iter()
            .map(|p| (p.name(), self.slot(p).load(Ordering::Relaxed)))
            .collect()
    }
}

impl Default for Tunables {
    fn default() -> Self {
        Self::new(&TunableConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::INIT_FACTOR;

    #[test]
    fn test_defaults() {
        let tunables = Tunables::default();
        assert_eq!(tunables.bandwidth(), 0);
        assert_eq!(tunables.factor(), INIT_FACTOR);
        assert_eq!(
            tunables.entries(),
            vec![("bandwidth", 0), ("factor", INIT_FACTOR)]
        );
    }

    #[test]
    fn test_named_access() {
        let tunables = Tunables::default();
        tunables.set("bandwidth", 1000).unwrap();
        tunables.set("factor", 0).unwrap();

        assert_eq!(tunables.get("bandwidth").unwrap(), 1000);
        assert_eq!(tunables.bandwidth(), 1000);
        // Zero is accepted without validation.
        assert_eq!(tunables.factor(), 0);
    }

    #[test]
    fn test_write_str_accepts_full_u32_range() {
        let tunables = Tunables::default();
        tunables.write_str("bandwidth", " 4294967295\n").unwrap();
        assert_eq!(tunables.bandwidth(), u32::MAX);
    }

    #[test]
    fn test_write_str_rejects_garbage() {
        let tunables = Tunables::default();
        tunables.set_factor(7);

        let err = tunables.write_str("factor", "-3").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameterValue { name: "factor", .. }
        ));
        assert_eq!(tunables.factor(), 7);
    }

    #[test]
    fn test_unknown_parameter() {
        let tunables = Tunables::default();
        assert!(matches!(
            tunables.get("rtt"),
            Err(Error::UnknownParameter(name)) if name == "rtt"
        ));
        assert!(tunables.set("cwnd", 1).is_err());
    }
}
