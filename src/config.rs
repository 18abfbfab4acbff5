//! 定义了拥塞控制算法的可配置参数。
//! Defines configurable parameters for the congestion control algorithm.

use std::time::Duration;

/// Number of valid RTT samples aggregated into one calibration batch.
pub const SAMPLE_SIZE: u32 = 100;

/// Default divisor used by the calibration formula.
pub const INIT_FACTOR: u32 = 10;

/// A structure containing all configurable parameters for the algorithm.
///
/// 包含算法所有可配置参数的结构体。
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Initial values of the operator knobs.
    /// 运维可调参数的初始值。
    pub tunables: TunableConfig,

    /// RTT sampling parameters.
    /// RTT采样参数。
    pub sampling: SamplingConfig,

    /// Window derivation parameters.
    /// 窗口推导参数。
    pub window: WindowConfig,
}

/// Initial values for the operator-settable knobs.
///
/// 运维可设置参数的初始值。
#[derive(Debug, Clone)]
pub struct TunableConfig {
    /// Link bandwidth as supplied by the operator. Zero until set.
    /// 运维提供的链路带宽。设置前为零。
    pub bandwidth: u32,
    /// Divisor of the calibration formula.
    /// 校准公式的除数。
    pub factor: u32,
}

/// Whether the sampling window reopens after a batch completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMode {
    /// Calibrate once per `init`; later samples are ignored.
    /// 每次 `init` 只校准一次；之后的样本被忽略。
    #[default]
    OneShot,
    /// Reset the accumulator after every batch and keep recalibrating.
    /// 每批次后重置累加器并持续校准。
    Continuous,
}

/// RTT sampling parameters.
///
/// RTT采样参数。
#[derive(Debug, Clone)]
pub struct SamplingConfig {
    /// Number of valid samples per calibration batch.
    /// 每个校准批次的有效样本数。
    pub sample_size: u32,
    /// Samples at or above this value are discarded as outliers.
    /// 大于或等于此值的样本被视为异常值而丢弃。
    pub max_valid_rtt: Duration,
    /// Whether sampling reopens after a completed batch.
    /// 完成一个批次后采样是否重新开启。
    pub mode: SamplingMode,
}

/// Window derivation parameters.
///
/// Both shifts are clamped to 31; larger values are logged and treated as 31.
///
/// 窗口推导参数。两个移位量都被限制在31以内。
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// `init` seeds the window with `bandwidth << init_shift`.
    /// `init` 以 `bandwidth << init_shift` 作为初始窗口。
    pub init_shift: u32,
    /// Calibration scales bandwidth by `bandwidth << recompute_shift`.
    /// 校准时以 `bandwidth << recompute_shift` 缩放带宽。
    pub recompute_shift: u32,
}

impl Default for TunableConfig {
    fn default() -> Self {
        Self {
            bandwidth: 0,
            factor: INIT_FACTOR,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_size: SAMPLE_SIZE,
            max_valid_rtt: Duration::from_millis(300),
            mode: SamplingMode::OneShot,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            init_shift: 7, // x128
            recompute_shift: 10, // x1024
        }
    }
}
