use sysinfo::System;

use super::PlatformExtensions;
use crate::error::MetricUnavailable;
use crate::system::snapshot::{LoadAverage, Reading};

pub struct Platform;

const VIRTUAL_PREFIXES: [&str; 8] = [
    "lo", "utun", "bridge", "awdl", "llw", "gif", "stf", "anpi",
];

impl PlatformExtensions for Platform {
    fn load_average() -> Reading<LoadAverage> {
        let load = System::load_average();
        if ![load.one, load.five, load.fifteen].iter().all(|v| v.is_finite() && *v >= 0.0) {
            return Err(MetricUnavailable::Failed("load average out of range".to_string()));
        }
        Ok(LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
            tasks: None,
        })
    }

    fn is_virtual_interface(name: &str) -> bool {
        VIRTUAL_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
    }
}
