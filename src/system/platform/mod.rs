use crate::system::snapshot::{LoadAverage, Reading};

/// Facilities sysinfo does not cover uniformly across platforms.
pub trait PlatformExtensions {
    fn load_average() -> Reading<LoadAverage>;
    fn is_virtual_interface(name: &str) -> bool;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn load_average() -> Reading<LoadAverage> {
    platform_impl::Platform::load_average()
}

pub fn is_virtual_interface(name: &str) -> bool {
    platform_impl::Platform::is_virtual_interface(name)
}
