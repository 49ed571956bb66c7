use std::future::Future;
use std::io;

use tokio::runtime::{Builder, Runtime};

pub fn current_thread() -> io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}

/// Runs `future` to completion on a fresh current-thread runtime, then shuts
/// the runtime down without joining blocking queries that timed out and are
/// still running. Those threads die with the process.
pub fn block_on_detached<F: Future>(future: F) -> io::Result<F::Output> {
    let runtime = current_thread()?;
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    tracing::debug!("runtime shut down");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::config::{Panel, PanelSet};
    use crate::error::MetricUnavailable;
    use crate::system::network::NetworkCounters;
    use crate::system::sampler::Sampler;
    use crate::system::snapshot::{
        CpuUsage, DiskUsage, LoadAverage, MemoryUsage, Reading, SystemInfo, UserUsage,
    };
    use crate::system::source::MetricSource;

    /// Every query blocks far longer than the sampler waits.
    struct HungDisk;

    impl MetricSource for HungDisk {
        fn cpu(&self) -> Reading<CpuUsage> {
            Err(MetricUnavailable::Unsupported)
        }

        fn memory(&self) -> Reading<MemoryUsage> {
            Err(MetricUnavailable::Unsupported)
        }

        fn network(&self) -> Reading<NetworkCounters> {
            Err(MetricUnavailable::Unsupported)
        }

        fn load(&self) -> Reading<LoadAverage> {
            Err(MetricUnavailable::Unsupported)
        }

        fn system(&self) -> Reading<SystemInfo> {
            Err(MetricUnavailable::Unsupported)
        }

        fn disk(&self) -> Reading<Vec<DiskUsage>> {
            std::thread::sleep(Duration::from_secs(4));
            Ok(Vec::new())
        }

        fn users(&self) -> Reading<Vec<UserUsage>> {
            Err(MetricUnavailable::Unsupported)
        }
    }

    #[test]
    fn shutdown_does_not_wait_for_abandoned_query() {
        let started = Instant::now();
        let disk = block_on_detached(async {
            let mut sampler = Sampler::new(HungDisk, Duration::from_millis(30));
            let snapshot = sampler
                .sample(&PanelSet::from([Panel::Disk]))
                .await
                .unwrap();
            snapshot.disk
        })
        .unwrap();

        assert_eq!(
            disk,
            Some(Err(MetricUnavailable::TimedOut(Duration::from_millis(30))))
        );
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "shutdown took {:?}",
            started.elapsed()
        );
    }
}
