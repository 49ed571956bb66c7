use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use sysinfo::{
    CpuRefreshKind, Disks, Networks, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind,
    Users,
};

use super::network::{InterfaceCounters, NetworkCounters};
use super::platform;
use super::snapshot::{
    CpuUsage, DiskUsage, LoadAverage, MemoryUsage, Reading, SystemInfo, UserUsage,
};
use super::users::{ProcessSample, aggregate_by_user};
use crate::config::{Panel, PanelSet};
use crate::error::MetricUnavailable;

/// One query per metric family.
///
/// Implementations may block; the sampler runs them off the loop and bounds
/// them with a timeout. Families must not share state that a stuck query
/// could hold, so one hung family never stalls the others.
pub trait MetricSource: Send + Sync + 'static {
    fn cpu(&self) -> Reading<CpuUsage>;
    fn memory(&self) -> Reading<MemoryUsage>;
    fn network(&self) -> Reading<NetworkCounters>;
    fn load(&self) -> Reading<LoadAverage>;
    fn system(&self) -> Reading<SystemInfo>;
    fn disk(&self) -> Reading<Vec<DiskUsage>>;
    fn users(&self) -> Reading<Vec<UserUsage>>;

    /// Host name for the header; read once at startup.
    fn host_name(&self) -> Option<String> {
        None
    }
}

/// Process table used by the users panel.
struct ProcessTable {
    sys: System,
    users: Option<Users>,
}

/// Production source backed by `sysinfo`. Every family has its own handle
/// behind its own lock and is refreshed only when queried.
pub struct SysinfoSource {
    cpu: Mutex<System>,
    memory: Mutex<System>,
    processes: Mutex<ProcessTable>,
    networks: Mutex<Option<Networks>>,
    disks: Mutex<Option<Disks>>,
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSource {
    pub fn new() -> Self {
        Self::for_panels(&PanelSet::new())
    }

    /// Takes the first reading of every family whose usage is a difference
    /// between two refreshes, so the first tick reports real numbers.
    pub fn for_panels(panels: &PanelSet) -> Self {
        let mut cpu = System::new();
        cpu.refresh_cpu_all();

        let mut process_sys = System::new();
        process_sys.refresh_cpu_list(CpuRefreshKind::nothing());
        if panels.contains(&Panel::Users) {
            refresh_process_table(&mut process_sys);
        }

        SysinfoSource {
            cpu: Mutex::new(cpu),
            memory: Mutex::new(System::new()),
            processes: Mutex::new(ProcessTable {
                sys: process_sys,
                users: None,
            }),
            networks: Mutex::new(None),
            disks: Mutex::new(None),
        }
    }
}

/// A panic in one query is already fatal for the loop; the data behind the
/// lock is still usable for a final read.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn refresh_process_table(sys: &mut System) {
    sys.refresh_memory();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing()
            .with_memory()
            .with_cpu()
            .with_user(UpdateKind::OnlyIfNotSet),
    );
}

impl MetricSource for SysinfoSource {
    fn cpu(&self) -> Reading<CpuUsage> {
        let mut sys = lock(&self.cpu);
        sys.refresh_cpu_all();
        let per_core_percent: Vec<f32> = sys.cpus().iter().map(|c| c.cpu_usage()).collect();
        if per_core_percent.is_empty() {
            return Err(MetricUnavailable::Empty);
        }
        Ok(CpuUsage {
            aggregate_percent: sys.global_cpu_usage(),
            per_core_percent,
        })
    }

    fn memory(&self) -> Reading<MemoryUsage> {
        let mut sys = lock(&self.memory);
        sys.refresh_memory();
        let total = sys.total_memory();
        if total == 0 {
            return Err(MetricUnavailable::Empty);
        }
        Ok(MemoryUsage {
            total,
            used: sys.used_memory(),
            available: sys.available_memory(),
            swap_total: sys.total_swap(),
            swap_used: sys.used_swap(),
        })
    }

    fn network(&self) -> Reading<NetworkCounters> {
        let mut slot = lock(&self.networks);
        match slot.as_mut() {
            Some(networks) => networks.refresh(true),
            None => *slot = Some(Networks::new_with_refreshed_list()),
        }
        let Some(networks) = slot.as_ref().filter(|n| !n.list().is_empty()) else {
            return Err(MetricUnavailable::Empty);
        };
        let interfaces: BTreeMap<String, InterfaceCounters> = networks
            .list()
            .iter()
            .map(|(name, data)| {
                (
                    name.clone(),
                    InterfaceCounters {
                        bytes_sent: data.total_transmitted(),
                        bytes_received: data.total_received(),
                        packets_sent: data.total_packets_transmitted(),
                        packets_received: data.total_packets_received(),
                        is_virtual: platform::is_virtual_interface(name),
                    },
                )
            })
            .collect();
        Ok(NetworkCounters::new(interfaces))
    }

    fn load(&self) -> Reading<LoadAverage> {
        platform::load_average()
    }

    fn system(&self) -> Reading<SystemInfo> {
        let info = SystemInfo {
            hostname: System::host_name(),
            os_version: System::long_os_version(),
            kernel_version: System::kernel_version(),
            uptime_secs: System::uptime(),
        };
        if info.hostname.is_none() && info.os_version.is_none() && info.kernel_version.is_none() {
            return Err(MetricUnavailable::Empty);
        }
        Ok(info)
    }

    fn disk(&self) -> Reading<Vec<DiskUsage>> {
        let mut slot = lock(&self.disks);
        match slot.as_mut() {
            Some(disks) => disks.refresh(true),
            None => *slot = Some(Disks::new_with_refreshed_list()),
        }
        let Some(disks) = slot.as_ref() else {
            return Err(MetricUnavailable::Empty);
        };

        let mut seen = HashSet::new();
        let mut usage: Vec<DiskUsage> = disks
            .list()
            .iter()
            .filter(|disk| disk.total_space() > 0)
            .map(|disk| DiskUsage {
                mount_point: disk.mount_point().to_string_lossy().to_string(),
                file_system: disk.file_system().to_string_lossy().to_string(),
                total: disk.total_space(),
                available: disk.available_space(),
            })
            .filter(|disk| seen.insert(disk.mount_point.clone()))
            .collect();
        if usage.is_empty() {
            return Err(MetricUnavailable::Empty);
        }
        usage.sort_by(|a, b| a.mount_point.cmp(&b.mount_point));
        Ok(usage)
    }

    fn users(&self) -> Reading<Vec<UserUsage>> {
        let mut guard = lock(&self.processes);
        let table = &mut *guard;
        refresh_process_table(&mut table.sys);
        let users = table.users.get_or_insert_with(Users::new_with_refreshed_list);

        let samples: Vec<ProcessSample> = table
            .sys
            .processes()
            .values()
            .filter_map(|process| {
                let uid = process.user_id()?;
                let user = users
                    .get_user_by_id(uid)
                    .map(|u| u.name().to_string())
                    .unwrap_or_else(|| format!("{uid:?}"));
                Some(ProcessSample {
                    user,
                    cpu_percent: process.cpu_usage(),
                    memory_bytes: process.memory(),
                })
            })
            .collect();
        if samples.is_empty() {
            return Err(MetricUnavailable::Empty);
        }

        Ok(aggregate_by_user(
            samples,
            table.sys.cpus().len(),
            table.sys.total_memory(),
        ))
    }

    fn host_name(&self) -> Option<String> {
        System::host_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_reports_a_total() {
        let source = SysinfoSource::new();
        if let Ok(memory) = source.memory() {
            assert!(memory.total > 0);
            assert!(memory.used <= memory.total);
        }
    }

    #[test]
    fn queries_never_panic() {
        let source = SysinfoSource::new();
        let _ = source.cpu();
        let _ = source.network();
        let _ = source.network();
        let _ = source.load();
        let _ = source.system();
        let _ = source.disk();
    }

    #[test]
    fn first_users_sample_sees_process_cpu() {
        let source = SysinfoSource::for_panels(&PanelSet::from([Panel::Users]));

        let stop = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let spinner = {
            let stop = std::sync::Arc::clone(&stop);
            std::thread::spawn(move || {
                let mut n = 0u64;
                while !stop.load(std::sync::atomic::Ordering::Relaxed) {
                    n = std::hint::black_box(n.wrapping_add(1));
                }
            })
        };
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL * 2);
        let reading = source.users();
        stop.store(true, std::sync::atomic::Ordering::Relaxed);
        spinner.join().unwrap();

        if let Ok(users) = reading {
            assert!(
                users.iter().any(|u| u.cpu_percent > 0.0),
                "no user shows CPU: {users:?}"
            );
        }
    }
}
