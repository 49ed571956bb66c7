use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::action::Action;
use crate::config::{Panel, PanelSet, Settings};
use crate::error::{LoopError, SourceError, TerminalError};
use crate::event::{Event, EventHandler};
use crate::schedule::TickSchedule;
use crate::system::sampler::Sampler;
use crate::system::snapshot::Snapshot;
use crate::system::source::MetricSource;
use crate::terminal::TerminalGuard;
use crate::ui::{self, View, theme::Theme};

/// CPU usage needs two refreshes at least this far apart, so the first tick
/// waits that long.
pub const FIRST_TICK_DELAY: Duration = sysinfo::MINIMUM_CPU_UPDATE_INTERVAL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Starting,
    Running,
    Stopping,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    QuitKey,
    Signal(&'static str),
    /// The event channel closed.
    InputClosed,
}

pub struct App<S> {
    settings: Settings,
    sampler: Sampler<S>,
    theme: Theme,
    host_name: Option<String>,
    snapshot: Option<Snapshot>,
    state: LoopState,
    ticks: u64,
}

impl<S: MetricSource> App<S> {
    pub fn new(settings: Settings, source: S) -> Self {
        let host_name = source.host_name();
        let sampler = Sampler::new(source, settings.query_timeout);
        let theme = Theme::from_name(settings.theme);
        Self {
            settings,
            sampler,
            theme,
            host_name,
            snapshot: None,
            state: LoopState::Starting,
            ticks: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('r') => Action::Redraw,
            _ => Action::None,
        }
    }

    pub fn view(&self) -> View<'_> {
        View {
            snapshot: self.snapshot.as_ref(),
            host_name: self.host_name.as_deref(),
            panels: &self.settings.panels,
            interval: self.settings.interval,
            theme: &self.theme,
        }
    }

    /// Samples the enabled panels and keeps the result as the current frame.
    pub async fn tick(&mut self) -> Result<(), SourceError> {
        let snapshot = self.sampler.sample(&self.settings.panels).await?;
        self.snapshot = Some(snapshot);
        self.ticks += 1;
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), TerminalError> {
        terminal
            .draw(|frame| ui::draw(frame, self.view()))
            .map(|_| ())
            .map_err(|err| TerminalError::Draw(err.to_string()))
    }

    fn transition(&mut self, next: LoopState) {
        if self.state != next {
            tracing::info!(from = ?self.state, to = ?next, "loop state");
            self.state = next;
        }
    }

    /// Sleeps until each deadline on the tick grid starting at `origin`,
    /// samples, draws. Keys, resizes and signals interrupt the sleep.
    ///
    /// Leaves the app in `Stopping`; the owner of the terminal calls
    /// [`App::finish`] once it has been restored.
    pub async fn run_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventHandler,
        origin: Instant,
    ) -> Result<StopReason, LoopError> {
        self.transition(LoopState::Running);
        let result = self.drive(terminal, events, origin).await;
        self.transition(LoopState::Stopping);
        match &result {
            Ok(reason) => tracing::info!(?reason, ticks = self.ticks, "refresh loop ended"),
            Err(err) => tracing::error!(error = %err, "refresh loop failed"),
        }
        result
    }

    async fn drive<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventHandler,
        origin: Instant,
    ) -> Result<StopReason, LoopError> {
        self.draw(terminal)?;

        let mut schedule = TickSchedule::new(origin, self.settings.interval);
        let mut deadline = schedule.next_deadline(Instant::now());

        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline.into()) => {
                    self.tick().await?;
                    self.draw(terminal)?;
                    deadline = schedule.next_deadline(Instant::now());
                }
                event = events.next() => match event {
                    Some(Event::Key(key)) => match self.map_key(key) {
                        Action::Quit => return Ok(StopReason::QuitKey),
                        Action::Redraw => self.draw(terminal)?,
                        Action::None => {}
                    },
                    Some(Event::Resize) => self.draw(terminal)?,
                    Some(Event::Shutdown(signal)) => return Ok(StopReason::Signal(signal)),
                    None => return Ok(StopReason::InputClosed),
                },
            }
        }
    }

    pub fn finish(&mut self) {
        self.transition(LoopState::Stopped);
    }
}

/// Runs the dashboard on the real terminal until a quit key, a signal, or a
/// fatal error. The terminal is restored on every path.
pub async fn run<S: MetricSource>(settings: Settings, source: S) -> Result<StopReason, LoopError> {
    let mut app = App::new(settings, source);
    let mut guard = TerminalGuard::acquire()?;
    let mut events = EventHandler::new();

    let origin = Instant::now() + FIRST_TICK_DELAY;
    let result = app.run_loop(guard.terminal(), &mut events, origin).await;

    drop(events);
    let released = guard.release();
    app.finish();

    let reason = result?;
    released?;
    Ok(reason)
}

/// Headless single sample for `--once`.
///
/// Network deltas need a baseline, so counters are read once before the
/// wait when that panel is enabled.
pub async fn sample_once<S: MetricSource>(
    settings: &Settings,
    source: S,
) -> Result<Snapshot, SourceError> {
    let mut sampler = Sampler::new(source, settings.query_timeout);
    if settings.panels.contains(&Panel::Network) {
        sampler.sample(&PanelSet::from([Panel::Network])).await?;
    }
    tokio::time::sleep(FIRST_TICK_DELAY).await;
    sampler.sample(&settings.panels).await
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    use ratatui::backend::TestBackend;

    use super::*;
    use crate::error::MetricUnavailable;
    use crate::system::network::{InterfaceCounters, NetworkCounters};
    use crate::system::snapshot::{
        CpuUsage, DiskUsage, LoadAverage, MemoryUsage, Reading, SystemInfo, UserUsage,
    };

    #[derive(Default)]
    struct CountingSource {
        cpu_calls: Arc<Mutex<usize>>,
        sent: AtomicU64,
    }

    impl MetricSource for CountingSource {
        fn cpu(&self) -> Reading<CpuUsage> {
            *self.cpu_calls.lock().unwrap() += 1;
            Ok(CpuUsage {
                aggregate_percent: 20.0,
                per_core_percent: vec![20.0; 4],
            })
        }

        fn memory(&self) -> Reading<MemoryUsage> {
            Ok(MemoryUsage {
                total: 8 << 30,
                used: 2 << 30,
                available: 6 << 30,
                swap_total: 0,
                swap_used: 0,
            })
        }

        fn network(&self) -> Reading<NetworkCounters> {
            let sent = self.sent.fetch_add(1_000, Ordering::SeqCst) + 1_000;
            let mut interfaces = BTreeMap::new();
            interfaces.insert(
                "eth0".to_string(),
                InterfaceCounters {
                    bytes_sent: sent,
                    ..InterfaceCounters::default()
                },
            );
            Ok(NetworkCounters::new(interfaces))
        }

        fn load(&self) -> Reading<LoadAverage> {
            Err(MetricUnavailable::Unsupported)
        }

        fn system(&self) -> Reading<SystemInfo> {
            Err(MetricUnavailable::Unsupported)
        }

        fn disk(&self) -> Reading<Vec<DiskUsage>> {
            Ok(Vec::new())
        }

        fn users(&self) -> Reading<Vec<UserUsage>> {
            Ok(Vec::new())
        }

        fn host_name(&self) -> Option<String> {
            Some("testbox".to_string())
        }
    }

    fn settings(interval: Duration) -> Settings {
        Settings {
            interval,
            ..Settings::default()
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_keys() {
        let app = App::new(Settings::default(), CountingSource::default());
        assert_eq!(app.map_key(press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.map_key(press(KeyCode::Esc)), Action::Quit);
        assert_eq!(
            app.map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(app.map_key(press(KeyCode::Char('c'))), Action::None);
        assert_eq!(app.map_key(press(KeyCode::Char('r'))), Action::Redraw);
    }

    #[test]
    fn key_release_is_ignored() {
        let app = App::new(Settings::default(), CountingSource::default());
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(app.map_key(key), Action::None);
    }

    #[tokio::test]
    async fn shutdown_during_sleep_stops_cleanly() {
        let mut app = App::new(settings(Duration::from_secs(60)), CountingSource::default());
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let (mut events, tx) = EventHandler::channel();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let _ = tx.send(Event::Shutdown("SIGTERM"));
        });

        let started = Instant::now();
        let reason = app
            .run_loop(&mut terminal, &mut events, Instant::now() + Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(reason, StopReason::Signal("SIGTERM"));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(app.state(), LoopState::Stopping);
        assert_eq!(app.ticks(), 0);

        app.finish();
        assert_eq!(app.state(), LoopState::Stopped);
    }

    #[tokio::test]
    async fn quit_key_after_ticks() {
        let mut app = App::new(settings(Duration::from_millis(10)), CountingSource::default());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let (mut events, tx) = EventHandler::channel();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(80)).await;
            let _ = tx.send(Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        });

        let reason = app
            .run_loop(&mut terminal, &mut events, Instant::now())
            .await
            .unwrap();
        assert_eq!(reason, StopReason::QuitKey);
        assert!(app.ticks() >= 1);

        let text = ui::buffer_to_string(terminal.backend().buffer());
        assert!(text.contains(" CPU "));
        assert!(text.contains(" Memory "));
        assert!(text.contains("testbox"), "{text}");
    }

    #[tokio::test]
    async fn resize_redraws_without_sampling() {
        let calls = Arc::new(Mutex::new(0));
        let mut app = App::new(
            settings(Duration::from_secs(60)),
            CountingSource {
                cpu_calls: Arc::clone(&calls),
                ..CountingSource::default()
            },
        );
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let (mut events, tx) = EventHandler::channel();
        tx.send(Event::Resize).unwrap();
        tx.send(Event::Resize).unwrap();
        drop(tx);

        let reason = app
            .run_loop(&mut terminal, &mut events, Instant::now() + Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(reason, StopReason::InputClosed);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn once_sample_has_network_window() {
        let mut settings = Settings::default();
        settings.panels.insert(Panel::Network);

        let snapshot = sample_once(&settings, CountingSource::default())
            .await
            .unwrap();

        let activity = snapshot.network.unwrap().unwrap();
        assert_eq!(activity.interfaces[0].bytes_sent, 1_000);
        assert!(activity.window.is_some());
        assert!(matches!(snapshot.cpu, Some(Ok(_))));
    }
}
