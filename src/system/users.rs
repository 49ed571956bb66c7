use std::collections::HashMap;

use super::snapshot::UserUsage;

const CPU_THRESHOLD: f32 = 0.01;
const MEMORY_THRESHOLD: f32 = 0.01;

/// Per-process numbers fed into the per-user rollup.
#[derive(Debug, Clone)]
pub struct ProcessSample {
    pub user: String,
    pub cpu_percent: f32,
    pub memory_bytes: u64,
}

/// Sums processes by user. CPU is divided by `cores` so a fully loaded machine
/// reads 100%; users under both thresholds are dropped. Sorted by CPU, then
/// memory, descending.
pub fn aggregate_by_user<I>(processes: I, cores: usize, total_memory: u64) -> Vec<UserUsage>
where
    I: IntoIterator<Item = ProcessSample>,
{
    let mut by_user: HashMap<String, (f32, u64, usize)> = HashMap::new();
    for process in processes {
        let entry = by_user.entry(process.user).or_default();
        entry.0 += process.cpu_percent;
        entry.1 += process.memory_bytes;
        entry.2 += 1;
    }

    let cores = cores.max(1) as f32;
    let mut users: Vec<UserUsage> = by_user
        .into_iter()
        .map(|(name, (cpu, memory, processes))| UserUsage {
            name,
            cpu_percent: cpu / cores,
            memory_percent: if total_memory == 0 {
                0.0
            } else {
                (memory as f64 * 100.0 / total_memory as f64) as f32
            },
            processes,
        })
        .filter(|u| u.cpu_percent > CPU_THRESHOLD || u.memory_percent > MEMORY_THRESHOLD)
        .collect();

    users.sort_by(|a, b| {
        b.cpu_percent
            .total_cmp(&a.cpu_percent)
            .then(b.memory_percent.total_cmp(&a.memory_percent))
            .then_with(|| a.name.cmp(&b.name))
    });
    users
}
