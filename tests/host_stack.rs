//! Drives Mario through the host stack model, as a transport would.

mod common;

use common::init_tracing;
use std::sync::Arc;
use tcp_mario::config::Config;
use tcp_mario::connection::CongestionSignal;
use tcp_mario::tunables::TUNABLES_PATH;
use tcp_mario::{AckInfo, Error, HostStack, MarioModule, Registry};

fn ack(n: u32) -> AckInfo {
    AckInfo { ack: n, acked: 1 }
}

#[test]
fn test_window_survives_host_reductions() {
    init_tracing();
    let registry = Arc::new(Registry::new());
    let module = MarioModule::load(registry.clone(), Config::default()).unwrap();
    module.tunables().write_str("bandwidth", "100").unwrap();

    let mut host = HostStack::attach(registry.create("mario").unwrap(), 10);
    assert_eq!(host.connection().snd_cwnd, 12800);
    assert!(host.algorithm().flags().rtt_stamp);

    // Fast retransmit: the host halves the window after asking for ssthresh.
    host.on_congestion(CongestionSignal::FastRetransmit);
    assert_eq!(host.connection().snd_ssthresh, 12800);
    assert_eq!(host.connection().snd_cwnd, 6400);
    host.on_ack(ack(1), 0);
    assert_eq!(host.connection().snd_cwnd, 12800);

    // A timeout collapses the window; the next ACK restores it.
    host.on_congestion(CongestionSignal::Timeout);
    assert_eq!(host.connection().snd_cwnd, 1);
    assert_eq!(host.undo(), 12800);

    host.on_congestion(CongestionSignal::Ecn);
    assert_eq!(host.connection().prior_cwnd, 12800);
    host.on_ack(ack(2), -1);
    assert_eq!(host.connection().snd_cwnd, 12800);
}

#[test]
fn test_calibration_through_acks() {
    init_tracing();
    let registry = Arc::new(Registry::new());
    let module = MarioModule::load(registry.clone(), Config::default()).unwrap();
    module.tunables().set_bandwidth(100);

    let mut host = HostStack::attach(registry.create("mario").unwrap(), 10);
    for n in 0..100 {
        // Interleave unusable timestamps; they must not count.
        host.on_ack(ack(2 * n), 0);
        host.on_ack(ack(2 * n + 1), 50_000);
    }
    assert_eq!(host.connection().snd_cwnd, 513);

    host.on_congestion(CongestionSignal::Timeout);
    assert_eq!(host.undo(), 513);

    let conn = host.detach();
    assert_eq!(conn.snd_cwnd, 513);
}

#[test]
fn test_tunables_apply_to_new_connections_only() {
    init_tracing();
    let registry = Arc::new(Registry::new());
    let module = MarioModule::load(registry.clone(), Config::default()).unwrap();
    module.tunables().set_bandwidth(10);

    let mut first = HostStack::attach(registry.create("mario").unwrap(), 10);
    module.tunables().set_bandwidth(20);
    let second = HostStack::attach(registry.create("mario").unwrap(), 10);

    first.on_ack(ack(1), 0);
    assert_eq!(first.connection().snd_cwnd, 1280);
    assert_eq!(second.connection().snd_cwnd, 2560);
}

#[test]
fn test_module_lifecycle() {
    init_tracing();
    let registry = Arc::new(Registry::new());
    assert_eq!(TUNABLES_PATH, "net/ipv4/tcp_mario");

    let module = MarioModule::load(registry.clone(), Config::default()).unwrap();
    assert_eq!(registry.names(), vec!["mario"]);
    assert!(matches!(
        MarioModule::load(registry.clone(), Config::default()),
        Err(Error::AlgorithmExists(_))
    ));
    // The failed load must not have unregistered the live module.
    assert!(registry.contains("mario"));

    module.unload().unwrap();
    assert!(!registry.contains("mario"));

    {
        let _module = MarioModule::load(registry.clone(), Config::default()).unwrap();
        assert!(registry.contains("mario"));
    }
    assert!(!registry.contains("mario"));
}
