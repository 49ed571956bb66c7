use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::snapshot::{InterfaceDelta, NetworkActivity};

/// Cumulative counters for one interface, as reported by the OS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub packets_sent: u64,
    pub packets_received: u64,
    pub is_virtual: bool,
}

/// One raw network reading: cumulative counters per interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkCounters {
    pub taken_at: Instant,
    pub interfaces: BTreeMap<String, InterfaceCounters>,
}

impl NetworkCounters {
    pub fn new(interfaces: BTreeMap<String, InterfaceCounters>) -> Self {
        Self {
            taken_at: Instant::now(),
            interfaces,
        }
    }
}

/// Difference between two cumulative readings, clamped at zero when a counter
/// went backwards (wrap or interface reset).
pub fn counter_delta(previous: u64, current: u64) -> u64 {
    current.saturating_sub(previous)
}

/// Activity since `previous`. Interfaces with no previous reading (including
/// the very first sample) report zero.
pub fn activity_since(
    previous: Option<&NetworkCounters>,
    current: &NetworkCounters,
) -> NetworkActivity {
    let interfaces = current
        .interfaces
        .iter()
        .map(|(name, now)| {
            let before = previous.and_then(|p| p.interfaces.get(name));
            let (sent, received, packets_sent, packets_received) = match before {
                Some(before) => (
                    counter_delta(before.bytes_sent, now.bytes_sent),
                    counter_delta(before.bytes_received, now.bytes_received),
                    counter_delta(before.packets_sent, now.packets_sent),
                    counter_delta(before.packets_received, now.packets_received),
                ),
                None => (0, 0, 0, 0),
            };
            InterfaceDelta {
                name: name.clone(),
                is_virtual: now.is_virtual,
                bytes_sent: sent,
                bytes_received: received,
                packets_sent,
                packets_received,
            }
        })
        .collect();

    let window = previous.map(|p| window_between(p.taken_at, current.taken_at));

    NetworkActivity { interfaces, window }
}

fn window_between(earlier: Instant, later: Instant) -> Duration {
    later.saturating_duration_since(earlier)
}
