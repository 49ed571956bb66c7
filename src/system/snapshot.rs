use std::time::Duration;

use serde::Serialize;

use crate::config::{Panel, PanelSet};
use crate::error::MetricUnavailable;

pub type Reading<T> = Result<T, MetricUnavailable>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuUsage {
    pub aggregate_percent: f32,
    pub per_core_percent: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub swap_total: u64,
    pub swap_used: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskUsage {
    pub mount_point: String,
    pub file_system: String,
    pub total: u64,
    pub available: u64,
}

impl DiskUsage {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.available)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserUsage {
    pub name: String,
    /// Share of the whole machine, already divided by the core count.
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub processes: usize,
}

/// Activity of one interface since the previous sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDelta {
    pub name: String,
    pub is_virtual: bool,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub packets_sent: u64,
    pub packets_received: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkActivity {
    pub interfaces: Vec<InterfaceDelta>,
    /// Time between the two counter readings; `None` on the first sample.
    pub window: Option<Duration>,
}

impl NetworkActivity {
    pub fn total_sent(&self) -> u64 {
        self.interfaces.iter().map(|i| i.bytes_sent).sum()
    }

    pub fn total_received(&self) -> u64 {
        self.interfaces.iter().map(|i| i.bytes_received).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub runnable: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
    pub tasks: Option<TaskCounts>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub hostname: Option<String>,
    pub os_version: Option<String>,
    pub kernel_version: Option<String>,
    pub uptime_secs: u64,
}

/// Everything captured in one tick. A `None` field means the panel is disabled
/// and was never queried.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub cpu: Option<Reading<CpuUsage>>,
    pub memory: Option<Reading<MemoryUsage>>,
    pub disk: Option<Reading<Vec<DiskUsage>>>,
    pub users: Option<Reading<Vec<UserUsage>>>,
    pub network: Option<Reading<NetworkActivity>>,
    pub load: Option<Reading<LoadAverage>>,
    pub system: Option<Reading<SystemInfo>>,
}

impl Snapshot {
    /// Panels that carry a reading (available or not).
    pub fn sampled_panels(&self) -> PanelSet {
        Panel::ALL
            .into_iter()
            .filter(|&panel| self.is_sampled(panel))
            .collect()
    }

    /// The failure for `panel`, if it was sampled and could not be read.
    pub fn unavailable(&self, panel: Panel) -> Option<&MetricUnavailable> {
        match panel {
            Panel::Cpu => err_of(&self.cpu),
            Panel::Memory => err_of(&self.memory),
            Panel::Disk => err_of(&self.disk),
            Panel::Users => err_of(&self.users),
            Panel::Network => err_of(&self.network),
            Panel::Load => err_of(&self.load),
            Panel::System => err_of(&self.system),
        }
    }

    pub fn is_sampled(&self, panel: Panel) -> bool {
        match panel {
            Panel::Cpu => self.cpu.is_some(),
            Panel::Memory => self.memory.is_some(),
            Panel::Disk => self.disk.is_some(),
            Panel::Users => self.users.is_some(),
            Panel::Network => self.network.is_some(),
            Panel::Load => self.load.is_some(),
            Panel::System => self.system.is_some(),
        }
    }
}

fn err_of<T>(reading: &Option<Reading<T>>) -> Option<&MetricUnavailable> {
    match reading {
        Some(Err(err)) => Some(err),
        _ => None,
    }
}
