use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::network::{NetworkCounters, activity_since};
use super::snapshot::{NetworkActivity, Reading, Snapshot};
use super::source::MetricSource;
use crate::config::{Panel, PanelSet};
use crate::error::{MetricUnavailable, SourceError};

/// Builds one [`Snapshot`] per tick from the enabled panels only.
///
/// Owns the previous network counters, so two samplers never share delta
/// state. Each family has its own in-flight flag: a query that outlived its
/// timeout makes only that family `Busy` until it returns.
pub struct Sampler<S> {
    source: Arc<S>,
    query_timeout: Duration,
    in_flight: [Arc<AtomicBool>; Panel::ALL.len()],
    previous_network: Option<NetworkCounters>,
}

/// Clears the in-flight flag when the query ends, panics included.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: MetricSource> Sampler<S> {
    pub fn new(source: S, query_timeout: Duration) -> Self {
        Sampler {
            source: Arc::new(source),
            query_timeout,
            in_flight: std::array::from_fn(|_| Arc::new(AtomicBool::new(false))),
            previous_network: None,
        }
    }

    pub fn previous_network(&self) -> Option<&NetworkCounters> {
        self.previous_network.as_ref()
    }

    pub async fn sample(&mut self, panels: &PanelSet) -> Result<Snapshot, SourceError> {
        let mut snapshot = Snapshot::default();

        for &panel in panels {
            match panel {
                Panel::Cpu => snapshot.cpu = Some(self.query(panel, S::cpu).await?),
                Panel::Memory => snapshot.memory = Some(self.query(panel, S::memory).await?),
                Panel::Disk => snapshot.disk = Some(self.query(panel, S::disk).await?),
                Panel::Users => snapshot.users = Some(self.query(panel, S::users).await?),
                Panel::Load => snapshot.load = Some(self.query(panel, S::load).await?),
                Panel::System => snapshot.system = Some(self.query(panel, S::system).await?),
                Panel::Network => {
                    let counters = self.query(panel, S::network).await?;
                    snapshot.network = Some(self.advance_network(counters));
                }
            }
        }

        tracing::debug!(panels = panels.len(), "tick sampled");
        Ok(snapshot)
    }

    /// Turns raw counters into deltas and keeps them as the next baseline.
    /// A failed read leaves the baseline untouched.
    fn advance_network(
        &mut self,
        counters: Reading<NetworkCounters>,
    ) -> Reading<NetworkActivity> {
        let counters = counters?;
        let activity = activity_since(self.previous_network.as_ref(), &counters);
        self.previous_network = Some(counters);
        Ok(activity)
    }

    async fn query<T, F>(&self, panel: Panel, read: F) -> Result<Reading<T>, SourceError>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Reading<T> + Send + 'static,
    {
        let flag = &self.in_flight[panel as usize];
        if flag.swap(true, Ordering::AcqRel) {
            tracing::warn!(%panel, "previous query still running");
            return Ok(Err(MetricUnavailable::Busy));
        }
        let guard = InFlight(Arc::clone(flag));

        let source = Arc::clone(&self.source);
        let task = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            read(source.as_ref())
        });

        let reading = match tokio::time::timeout(self.query_timeout, task).await {
            Ok(Ok(reading)) => reading,
            Ok(Err(join_err)) => {
                tracing::error!(%panel, error = %join_err, "metric query failed");
                return Err(SourceError::Panicked(panel));
            }
            // The blocking task keeps running; this family reports `Busy` until it ends.
            Err(_) => Err(MetricUnavailable::TimedOut(self.query_timeout)),
        };

        if let Err(reason) = &reading {
            tracing::warn!(%panel, %reason, "metric unavailable");
        }
        Ok(reading)
    }
}
