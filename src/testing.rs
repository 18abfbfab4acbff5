//! 测试辅助工具模块
//! Test utilities module

#![cfg(test)]

use crate::connection::Connection;

/// A host connection that records every window write it receives.
///
/// 记录收到的每次窗口写入的主机连接。
#[derive(Debug, Default)]
pub struct RecordingConnection {
    cwnd: u32,
    writes: Vec<u32>,
}

impl RecordingConnection {
    pub fn new(initial_cwnd: u32) -> Self {
        Self {
            cwnd: initial_cwnd,
            writes: Vec::new(),
        }
    }

    /// Every value passed to `set_congestion_window`, in order.
    pub fn writes(&self) -> &[u32] {
        &self.writes
    }

    /// Returns the recorded writes and starts a fresh log.
    pub fn take_writes(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.writes)
    }

    /// Changes the window the way a host would, without logging a hook write.
    pub fn host_reduce(&mut self, cwnd: u32) {
        self.cwnd = cwnd;
    }
}

impl Connection for RecordingConnection {
    fn congestion_window(&self) -> u32 {
        self.cwnd
    }

    fn set_congestion_window(&mut self, cwnd: u32) {
        self.cwnd = cwnd;
        self.writes.push(cwnd);
    }
}
