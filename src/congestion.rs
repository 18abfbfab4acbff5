//! Defines the pluggable congestion control interface.
//! 定义了可插拔的拥塞控制接口。
//!
//! A host transport stack owns the connection and calls into an algorithm at
//! fixed lifecycle moments. The algorithm never calls back into the host except
//! to read or overwrite the connection's congestion window.

use crate::connection::Connection;
use std::fmt;

pub mod mario;


/// Acknowledgement metadata handed to [`CongestionOps::cong_avoid`].
///
/// 传递给 [`CongestionOps::cong_avoid`] 的确认元数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AckInfo {
    /// The cumulative acknowledgement number.
    pub ack: u32,
    /// Number of packets newly acknowledged by this ACK.
    pub acked: u32,
}

/// Capabilities an algorithm requests from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlgorithmFlags {
    /// The host must timestamp packets so RTT samples reach `pkts_acked`.
    /// 主机必须为数据包打时间戳，以便RTT样本到达 `pkts_acked`。
    pub rtt_stamp: bool,
}

/// The hook set a congestion control algorithm implements.
///
/// Hooks for one connection are invoked strictly serially, which `&mut self`
/// already guarantees. Every hook is total over its input.
///
/// 拥塞控制算法实现的钩子集合。
pub trait CongestionOps: fmt::Debug + Send + Sync {
    /// The name under which the algorithm is selectable.
    /// 算法可被选择的名称。
    fn name(&self) -> &'static str;

    /// Capabilities the host must provide. Defaults to none.
    /// 主机必须提供的能力。默认为无。
    fn flags(&self) -> AlgorithmFlags {
        AlgorithmFlags::default()
    }

    /// Called once when a connection adopts this algorithm.
    /// 当连接采用此算法时调用一次。
    fn init(&mut self, conn: &mut dyn Connection);

    /// Called for every ACK processed in congestion avoidance.
    /// 在拥塞避免阶段处理每个ACK时调用。
    fn cong_avoid(&mut self, conn: &mut dyn Connection, ack: AckInfo);

    /// Returns the slow start threshold the host should adopt.
    /// 返回主机应采用的慢启动阈值。
    fn ssthresh(&mut self, conn: &mut dyn Connection) -> u32;

    /// Delivers a fresh RTT sample in microseconds. Non-positive values mean
    /// the host had no usable timestamp.
    ///
    /// 传递一个新的RTT样本（微秒）。非正值表示主机没有可用的时间戳。
    fn pkts_acked(&mut self, conn: &mut dyn Connection, num_acked: u32, rtt_us: i32);

    /// Returns the window to restore after a reduction was judged spurious.
    /// 返回在缩减被判定为虚假后要恢复的窗口。
    fn undo_cwnd(&mut self, conn: &mut dyn Connection) -> u32;

    /// Called when the connection drops the algorithm.
    fn release(&mut self, _conn: &mut dyn Connection) {}
}
