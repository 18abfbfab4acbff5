//! An implementation of Mario, a bandwidth-pinned congestion control algorithm.
//!
//! Mario skips slow start entirely. The window is seeded from the operator's
//! bandwidth figure at `init`, recalibrated once from a batch of RTT samples,
//! and forced back to that value whenever the host tries to shrink it.
//!
//! Mario，一个固定于带宽的拥塞控制算法的实现。

use crate::config::{Config, SamplingConfig, SamplingMode, WindowConfig};
use crate::congestion::{AckInfo, AlgorithmFlags, CongestionOps};
use crate::connection::Connection;
use crate::tunables::Tunables;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// The name Mario is registered under.
pub const NAME: &str = "mario";

/// Per-connection mutable state.
///
/// 每连接的可变状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CongestionState {
    /// The window Mario enforces.
    pub(super) base_window: u32,
    /// Sum of accepted RTT samples, in milliseconds.
    pub(super) rtt_accumulator: u32,
    /// Number of accepted samples since the last reset.
    pub(super) sample_count: u32,
    /// A batch has recalibrated the window since the last `init`.
    pub(super) calibrated: bool,
}

impl CongestionState {
    pub fn base_window(&self) -> u32 {
        self.base_window
    }

    pub fn rtt_accumulator(&self) -> u32 {
        self.rtt_accumulator
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn calibrated(&self) -> bool {
        self.calibrated
    }

    fn reset_samples(&mut self) {
        self.rtt_accumulator = 0;
        self.sample_count = 0;
    }
}

/// What happened to one RTT sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// The sampling window is closed; the sample was ignored.
    Closed,
    /// Outside the validity band; discarded.
    Rejected,
    /// Accumulated; the batch is not yet complete.
    Accepted,
    /// The batch completed and the window was recalibrated.
    Recomputed { base_window: u32 },
    /// The batch completed but `factor` was zero, so the window was left as is.
    SkippedZeroFactor,
}

/// Largest shift honoured by the window formulas; larger values are clamped.
pub const MAX_SHIFT: u32 = 31;

/// Seeds the window from bandwidth alone: `bandwidth << shift`, saturating.
/// `shift` is clamped to [`MAX_SHIFT`].
pub fn initial_window(bandwidth: u32, shift: u32) -> u32 {
    saturate(u64::from(bandwidth) << shift.min(MAX_SHIFT))
}

/// The calibration formula.
///
/// The expression is read shift-first-then-scale:
/// `1 + ((bandwidth << shift) * avg_rtt_ms) / (factor * 1000)`.
/// The intermediate is computed in 64 bits and the result saturates at
/// `u32::MAX`. `shift` is clamped to [`MAX_SHIFT`]. Returns `None` when
/// `factor` is zero.
///
/// 校准公式。先移位再缩放。`factor` 为零时返回 `None`。
pub fn calibrated_window(
    bandwidth: u32,
    avg_rtt_ms: u32,
    factor: u32,
    shift: u32,
) -> Option<u32> {
    let divisor = u64::from(factor) * 1000;
    if divisor == 0 {
        return None;
    }
    let scaled = u64::from(bandwidth) << shift.min(MAX_SHIFT);
    let window = scaled.saturating_mul(u64::from(avg_rtt_ms)) / divisor;
    Some(saturate(window.saturating_add(1)))
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// The Mario congestion controller.
///
/// One instance per connection. The knobs are shared through [`Tunables`].
///
/// Mario拥塞控制器。每个连接一个实例，参数通过 [`Tunables`] 共享。
#[derive(Debug)]
pub struct Mario {
    pub(super) state: CongestionState,
    tunables: Arc<Tunables>,
    sampling: SamplingConfig,
    window: WindowConfig,
}

impl Mario {
    pub fn new(tunables: Arc<Tunables>, config: &Config) -> Self {
        let window = &config.window;
        if window.init_shift > MAX_SHIFT || window.recompute_shift > MAX_SHIFT {
            warn!(
                init_shift = window.init_shift,
                recompute_shift = window.recompute_shift,
                max = MAX_SHIFT,
                "Window shift out of range, clamping"
            );
        }
        Self {
            state: CongestionState::default(),
            tunables,
            sampling: config.sampling.clone(),
            window: config.window.clone(),
        }
    }

    pub fn state(&self) -> &CongestionState {
        &self.state
    }

    pub fn base_window(&self) -> u32 {
        self.state.base_window
    }

    pub fn tunables(&self) -> &Arc<Tunables> {
        &self.tunables
    }

    /// Pins the host's window to the base window.
    fn repair(&self, conn: &mut dyn Connection) {
        let current = conn.congestion_window();
        if current != self.state.base_window {
            trace!(
                from = current,
                to = self.state.base_window,
                "Restoring congestion window"
            );
        }
        conn.set_congestion_window(self.state.base_window);
    }

    /// Feeds one RTT sample (microseconds) into the current batch.
    ///
    /// 将一个RTT样本（微秒）送入当前批次。
    pub fn ingest_rtt(&mut self, rtt_us: i32) -> SampleOutcome {
        let sample_size = self.sampling.sample_size;
        if self.state.sample_count >= sample_size {
            return SampleOutcome::Closed;
        }

        let rtt_ms = rtt_us / 1000;
        let accepted = u32::try_from(rtt_ms)
            .ok()
            .filter(|&ms| ms > 0 && u128::from(ms) < self.sampling.max_valid_rtt.as_millis());
        let Some(rtt_ms) = accepted else {
            trace!(rtt_us, "RTT sample rejected");
            return SampleOutcome::Rejected;
        };

        self.state.sample_count += 1;
        self.state.rtt_accumulator = self.state.rtt_accumulator.saturating_add(rtt_ms);
        trace!(
            rtt_ms,
            count = self.state.sample_count,
            "RTT sample accepted"
        );

        if self.state.sample_count < sample_size {
            return SampleOutcome::Accepted;
        }

        let outcome = self.recalibrate();
        if self.sampling.mode == SamplingMode::Continuous {
            self.state.reset_samples();
        }
        outcome
    }

    fn recalibrate(&mut self) -> SampleOutcome {
        let avg_rtt = self.state.rtt_accumulator / self.state.sample_count;
        let bandwidth = self.tunables.bandwidth();
        let factor = self.tunables.factor();

        match calibrated_window(bandwidth, avg_rtt, factor, self.window.recompute_shift) {
            Some(base_window) => {
                debug!(
                    avg_rtt_ms = avg_rtt,
                    bandwidth,
                    factor,
                    old = self.state.base_window,
                    cwnd = base_window,
                    "Base window recalibrated"
                );
                self.state.base_window = base_window;
                self.state.calibrated = true;
                SampleOutcome::Recomputed { base_window }
            }
            None => {
                warn!(
                    avg_rtt_ms = avg_rtt,
                    cwnd = self.state.base_window,
                    "factor is zero, skipping recalibration"
                );
                SampleOutcome::SkippedZeroFactor
            }
        }
    }

    /// Returns a snapshot of the controller.
    pub fn stats(&self) -> MarioStats {
        let avg_rtt_ms = (self.state.sample_count > 0)
            .then(|| self.state.rtt_accumulator / self.state.sample_count);
        MarioStats {
            base_window: self.state.base_window,
            sample_count: self.state.sample_count,
            rtt_accumulator: self.state.rtt_accumulator,
            avg_rtt_ms,
            bandwidth: self.tunables.bandwidth(),
            factor: self.tunables.factor(),
            calibrated: self.state.calibrated,
        }
    }
}

impl CongestionOps for Mario {
    fn name(&self) -> &'static str {
        NAME
    }

    fn flags(&self) -> AlgorithmFlags {
        AlgorithmFlags { rtt_stamp: true }
    }

    fn init(&mut self, conn: &mut dyn Connection) {
        let bandwidth = self.tunables.bandwidth();
        if bandwidth == 0 {
            warn!("bandwidth is not set, congestion window starts at zero");
        }
        self.state.base_window = initial_window(bandwidth, self.window.init_shift);
        self.state.reset_samples();
        self.state.calibrated = false;
        conn.set_congestion_window(self.state.base_window);
        debug!(bandwidth, cwnd = self.state.base_window, "Mario initialized");
    }

    fn cong_avoid(&mut self, conn: &mut dyn Connection, _ack: AckInfo) {
        self.repair(conn);
    }

    fn ssthresh(&mut self, conn: &mut dyn Connection) -> u32 {
        self.repair(conn);
        self.state.base_window
    }

    fn pkts_acked(&mut self, _conn: &mut dyn Connection, _num_acked: u32, rtt_us: i32) {
        self.ingest_rtt(rtt_us);
    }

    fn undo_cwnd(&mut self, conn: &mut dyn Connection) -> u32 {
        self.repair(conn);
        conn.congestion_window()
    }
}

/// A point-in-time view of a [`Mario`] instance.
///
/// [`Mario`] 实例的时间点快照。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarioStats {
    pub base_window: u32,
    pub sample_count: u32,
    pub rtt_accumulator: u32,
    /// Average of the accepted samples, if any.
    pub avg_rtt_ms: Option<u32>,
    pub bandwidth: u32,
    pub factor: u32,
    /// A batch has recalibrated the window since the last `init`.
    pub calibrated: bool,
}

impl fmt::Display for MarioStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cwnd={} samples={} rtt_sum={}ms",
            self.base_window, self.sample_count, self.rtt_accumulator
        )?;
        if let Some(avg) = self.avg_rtt_ms {
            write!(f, " avg_rtt={avg}ms")?;
        }
        write!(
            f,
            " bandwidth={} factor={}{}",
            self.bandwidth,
            self.factor,
            if self.calibrated { " calibrated" } else { "" }
        )
    }
}
