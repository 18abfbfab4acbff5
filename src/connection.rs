//! 定义了主机拥有的连接及其驱动模型。
//! Defines the host-owned connection and a model of the stack that drives it.
//!
//! The congestion algorithm never owns a connection. It is handed a
//! [`Connection`] for the duration of a hook and may only touch the window.

use crate::congestion::{AckInfo, CongestionOps};
use tracing::{debug, trace};

/// The window field a host exposes to congestion control hooks.
///
/// 主机向拥塞控制钩子暴露的窗口字段。
pub trait Connection {
    /// The current congestion window, in host window units.
    /// 当前拥塞窗口（以主机窗口单位计）。
    fn congestion_window(&self) -> u32;

    /// Overwrites the current congestion window.
    /// 覆盖当前拥塞窗口。
    fn set_congestion_window(&mut self, cwnd: u32);
}

/// The congestion-related fields of a TCP connection.
///
/// TCP连接中与拥塞相关的字段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpConnection {
    pub snd_cwnd: u32,
    pub snd_ssthresh: u32,
    /// Window in effect before the last congestion reduction.
    pub prior_cwnd: u32,
    /// Threshold in effect before the last congestion reduction.
    pub prior_ssthresh: u32,
}

impl TcpConnection {
    pub fn new(initial_cwnd: u32) -> Self {
        Self {
            snd_cwnd: initial_cwnd,
            snd_ssthresh: u32::MAX,
            prior_cwnd: initial_cwnd,
            prior_ssthresh: u32::MAX,
        }
    }
}

impl Default for TcpConnection {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Connection for TcpConnection {
    fn congestion_window(&self) -> u32 {
        self.snd_cwnd
    }

    fn set_congestion_window(&mut self, cwnd: u32) {
        self.snd_cwnd = cwnd;
    }
}

/// A congestion signal seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CongestionSignal {
    /// Loss detected through duplicate acknowledgements.
    FastRetransmit,
    /// An ECN-echo from the peer.
    Ecn,
    /// The retransmission timer fired.
    Timeout,
}

/// A minimal model of the host transport stack.
///
/// It owns one connection and one attached algorithm, and invokes the hooks at
/// the same moments a TCP stack would. After consulting `ssthresh` it applies
/// its own generic window reduction, regardless of which algorithm is attached.
///
/// 主机传输栈的最小模型。
///
/// 它拥有一个连接和一个已附加的算法，并在TCP栈会调用钩子的相同时机调用它们。
#[derive(Debug)]
pub struct HostStack {
    conn: TcpConnection,
    ops: Box<dyn CongestionOps>,
}

impl HostStack {
    /// Attaches `ops` to a fresh connection and runs its `init` hook.
    /// 将 `ops` 附加到一个新连接并运行其 `init` 钩子。
    pub fn attach(mut ops: Box<dyn CongestionOps>, initial_cwnd: u32) -> Self {
        let mut conn = TcpConnection::new(initial_cwnd);
        ops.init(&mut conn);
        debug!(
            algorithm = ops.name(),
            cwnd = conn.snd_cwnd,
            "Congestion control attached"
        );
        Self { conn, ops }
    }

    pub fn connection(&self) -> &TcpConnection {
        &self.conn
    }

    pub fn algorithm(&self) -> &dyn CongestionOps {
        self.ops.as_ref()
    }

    /// Processes one acknowledgement carrying an optional RTT sample.
    ///
    /// The RTT sample is only delivered when the algorithm asked for RTT stamps.
    pub fn on_ack(&mut self, ack: AckInfo, rtt_us: i32) {
        if self.ops.flags().rtt_stamp {
            self.ops.pkts_acked(&mut self.conn, ack.acked, rtt_us);
        }
        self.ops.cong_avoid(&mut self.conn, ack);
        trace!(ack = ack.ack, cwnd = self.conn.snd_cwnd, "ACK processed");
    }

    /// Reacts to a congestion signal: records the prior state, asks the
    /// algorithm for a threshold, then applies the host's own reduction.
    ///
    /// 响应拥塞信号：记录先前状态，向算法查询阈值，然后应用主机自身的缩减。
    pub fn on_congestion(&mut self, signal: CongestionSignal) {
        self.conn.prior_cwnd = self.conn.snd_cwnd;
        self.conn.prior_ssthresh = self.conn.snd_ssthresh;
        self.conn.snd_ssthresh = self.ops.ssthresh(&mut self.conn);
        self.conn.snd_cwnd = match signal {
            CongestionSignal::FastRetransmit | CongestionSignal::Ecn => {
                (self.conn.snd_cwnd / 2).max(1)
            }
            CongestionSignal::Timeout => 1,
        };
        debug!(
            ?signal,
            ssthresh = self.conn.snd_ssthresh,
            cwnd = self.conn.snd_cwnd,
            "Host reduced congestion window"
        );
    }

    /// Reverts the last reduction after it was judged spurious.
    /// Returns the window now in effect.
    pub fn undo(&mut self) -> u32 {
        self.conn.snd_cwnd = self.ops.undo_cwnd(&mut self.conn);
        self.conn.snd_ssthresh = self.conn.snd_ssthresh.max(self.conn.prior_ssthresh);
        debug!(cwnd = self.conn.snd_cwnd, "Congestion window reduction undone");
        self.conn.snd_cwnd
    }

    /// Detaches the algorithm, running its `release` hook.
    pub fn detach(mut self) -> TcpConnection {
        self.ops.release(&mut self.conn);
        self.conn
    }
}
