use std::path::Path;

use super::PlatformExtensions;
use crate::error::MetricUnavailable;
use crate::system::snapshot::{LoadAverage, Reading, TaskCounts};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn load_average() -> Reading<LoadAverage> {
        let contents = std::fs::read_to_string("/proc/loadavg")
            .map_err(|e| MetricUnavailable::Failed(format!("/proc/loadavg: {e}")))?;
        parse_loadavg(&contents)
            .ok_or_else(|| MetricUnavailable::Failed("malformed /proc/loadavg".to_string()))
    }

    fn is_virtual_interface(name: &str) -> bool {
        // Physical NICs have a backing device link in sysfs
        if name.is_empty() || name.contains('/') {
            return true;
        }
        !Path::new("/sys/class/net").join(name).join("device").exists()
    }
}

/// Parses `0.52 0.58 0.59 2/1234 5678`.
fn parse_loadavg(contents: &str) -> Option<LoadAverage> {
    let fields: Vec<&str> = contents.split_whitespace().collect();
    let one = fields.first()?.parse().ok()?;
    let five = fields.get(1)?.parse().ok()?;
    let fifteen = fields.get(2)?.parse().ok()?;
    let tasks = fields.get(3).and_then(|field| {
        let (runnable, total) = field.split_once('/')?;
        Some(TaskCounts {
            runnable: runnable.parse().ok()?,
            total: total.parse().ok()?,
        })
    });
    Some(LoadAverage {
        one,
        five,
        fifteen,
        tasks,
    })
}
