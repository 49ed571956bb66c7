use super::PlatformExtensions;
use crate::error::MetricUnavailable;
use crate::system::snapshot::{LoadAverage, Reading};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn load_average() -> Reading<LoadAverage> {
        // Windows has no run-queue load average
        Err(MetricUnavailable::Unsupported)
    }

    fn is_virtual_interface(name: &str) -> bool {
        let lower = name.to_lowercase();
        lower.contains("loopback") || lower.starts_with("vethernet") || lower.contains("virtual")
    }
}
