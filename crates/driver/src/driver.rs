use crate::config::GameConfig;
use crate::error::DriverError;
use crate::host::FrameHost;
use crate::timing::DeltaTimer;
use canvaswalk_input::{BoundInput, InputLatch, KeyBindings};
use canvaswalk_kernel::{EntityStore, StepOutcome, Tuning, update};
use canvaswalk_render::{SpriteSheet, Surface, render};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Lifecycle of a driver. A driver runs at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Stopped,
}

/// Why a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The update step halted on the abort action.
    Halted,
    /// The host stopped delivering frames.
    HostClosed,
    /// A `StopHandle` was triggered.
    Stopped,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Frames updated and rendered.
    pub frames: u64,
    pub outcome: RunOutcome,
    /// Store as of the last rendered frame.
    pub store: EntityStore,
}

/// Cooperative stop request, honoured at the next frame boundary.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Runs update then render once per host frame until halted, stopped or the
/// host closes.
pub struct FrameDriver {
    interval: Duration,
    bindings: KeyBindings,
    tuning: Tuning,
    stop: StopHandle,
    state: DriverState,
}

impl FrameDriver {
    pub fn new(interval: Duration, bindings: KeyBindings, tuning: Tuning) -> Self {
        Self {
            interval,
            bindings,
            tuning,
            stop: StopHandle::default(),
            state: DriverState::Idle,
        }
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, DriverError> {
        Ok(Self::new(
            config.frame_interval()?,
            config.bindings.clone(),
            config.tuning.clone(),
        ))
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run the loop from `store` until it ends.
    ///
    /// Input is attached for the duration of the run and detached on every
    /// exit, including a fatal update error.
    pub fn run<H, S>(
        &mut self,
        host: &mut H,
        surface: &mut S,
        sheet: Option<&SpriteSheet>,
        store: EntityStore,
    ) -> Result<RunSummary, DriverError>
    where
        H: FrameHost + ?Sized,
        S: Surface + ?Sized,
    {
        if self.state != DriverState::Idle {
            return Err(DriverError::AlreadyStarted);
        }
        self.state = DriverState::Running;
        tracing::info!(
            interval_ms = self.interval.as_secs_f64() * 1000.0,
            entities = store.len(),
            "frame driver starting"
        );

        if let Err(e) = host.attach_input() {
            self.state = DriverState::Stopped;
            return Err(e.into());
        }
        let result = self.frame_loop(host, surface, sheet, store);
        let detached = host.detach_input();
        self.state = DriverState::Stopped;

        match &result {
            Ok(summary) => tracing::info!(
                frames = summary.frames,
                outcome = ?summary.outcome,
                "frame driver stopped"
            ),
            Err(e) => tracing::error!(error = %e, "frame driver failed"),
        }
        let summary = result?;
        detached?;
        Ok(summary)
    }

    fn frame_loop<H, S>(
        &self,
        host: &mut H,
        surface: &mut S,
        sheet: Option<&SpriteSheet>,
        mut store: EntityStore,
    ) -> Result<RunSummary, DriverError>
    where
        H: FrameHost + ?Sized,
        S: Surface + ?Sized,
    {
        let mut timer = DeltaTimer::new(self.interval, host.now());
        let mut latch = InputLatch::new();
        let mut frames = 0;

        let outcome = loop {
            if self.stop.is_stopped() {
                break RunOutcome::Stopped;
            }
            let Some(now) = host.next_frame()? else {
                break RunOutcome::HostClosed;
            };
            host.pump_input(&mut latch)?;
            let elapsed = timer.tick(now);

            let input = BoundInput::new(&latch, &self.bindings);
            store = match update(&store, &input, elapsed, &self.tuning)? {
                StepOutcome::Halted => break RunOutcome::Halted,
                StepOutcome::Running(next) => next,
            };

            let stats = render(surface, &store, sheet);
            frames += 1;
            tracing::debug!(
                frame = frames,
                elapsed,
                drawn = stats.drawn,
                skipped = stats.skipped,
                "frame complete"
            );
        };

        Ok(RunSummary {
            frames,
            outcome,
            store,
        })
    }
}
