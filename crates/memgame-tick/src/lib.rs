//! Periodic game timer for Memgame.
//!
//! A [`GameTimer`] is an explicit start/stop state machine around one
//! tokio task. While running, the task adds one tick's worth of
//! milliseconds to the elapsed counter on every tick; stopped, the counter
//! is frozen.
//!
//! ```text
//!   Stopped ──start()──→ Running ──stop()──→ Stopped
//!                          │  ↑
//!                          └──┘ start(): previous task cancelled first
//! ```
//!
//! # Stop-before-start
//!
//! Starting a running timer cancels its task before spawning the next
//! one. Each task is stamped with an epoch and the counter only accepts
//! ticks from the current epoch, so a cancelled task that is mid-poll on
//! another worker can never add a late tick.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when the runtime was too busy to deliver ticks on time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPolicy {
    /// Deliver every missed tick immediately. The counter catches up with
    /// wall-clock time.
    #[default]
    CatchUp,
    /// Drop missed ticks and resume on the original cadence. The counter
    /// falls behind by the missed ticks.
    Skip,
    /// Deliver one late tick and restart the cadence from there.
    Delay,
}

impl From<TickPolicy> for MissedTickBehavior {
    fn from(policy: TickPolicy) -> Self {
        match policy {
            TickPolicy::CatchUp => MissedTickBehavior::Burst,
            TickPolicy::Skip => MissedTickBehavior::Skip,
            TickPolicy::Delay => MissedTickBehavior::Delay,
        }
    }
}

/// Timer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    /// Tick period. Each tick adds this many whole milliseconds.
    pub tick: Duration,
    /// Missed-tick handling.
    pub policy: TickPolicy,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(10),
            policy: TickPolicy::default(),
        }
    }
}

impl TimerConfig {
    /// Shortest supported tick.
    pub const MIN_TICK: Duration = Duration::from_millis(1);
    /// Longest supported tick.
    pub const MAX_TICK: Duration = Duration::from_secs(1);

    /// Create a config for a specific tick period with the default policy.
    pub fn with_tick(tick: Duration) -> Self {
        Self {
            tick,
            ..Default::default()
        }
    }

    /// Clamp the tick into `MIN_TICK..=MAX_TICK` and truncate it to whole
    /// milliseconds.
    ///
    /// Called automatically by [`GameTimer::new`].
    pub fn validated(mut self) -> Self {
        let clamped = self.tick.clamp(Self::MIN_TICK, Self::MAX_TICK);
        if clamped != self.tick {
            warn!(
                tick_ms = self.tick.as_secs_f64() * 1000.0,
                "timer tick out of range, clamping"
            );
        }
        self.tick = Duration::from_millis(clamped.as_millis() as u64);
        self
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the timer.
#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    /// `start` was called outside a tokio runtime, so there is nothing to
    /// drive the tick task.
    #[error("game timer needs a tokio runtime to start")]
    NoRuntime,
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Clock {
    elapsed_ms: u64,
    /// Bumped on every start/stop; ticks from older epochs are ignored.
    epoch: u64,
}

/// Elapsed-time counter driven by a periodic tokio task.
#[derive(Debug)]
pub struct GameTimer {
    config: TimerConfig,
    clock: Arc<Mutex<Clock>>,
    handle: Option<JoinHandle<()>>,
}

impl GameTimer {
    /// Create a stopped timer at zero.
    pub fn new(config: TimerConfig) -> Self {
        let config = config.validated();
        debug!(tick_ms = config.tick.as_millis() as u64, policy = ?config.policy, "game timer created");
        Self {
            config,
            clock: Arc::new(Mutex::new(Clock::default())),
            handle: None,
        }
    }

    /// Create a timer with a specific tick and default policy.
    pub fn with_tick(tick: Duration) -> Self {
        Self::new(TimerConfig::with_tick(tick))
    }

    /// Start ticking from the current elapsed value.
    ///
    /// Precondition handled here: a running timer is stopped first, so
    /// there is never more than one tick task per timer.
    ///
    /// # Errors
    /// [`TimerError::NoRuntime`] when called outside a tokio runtime.
    pub fn start(&mut self) -> Result<(), TimerError> {
        let runtime = Handle::try_current().map_err(|_| TimerError::NoRuntime)?;
        self.stop();

        let epoch = {
            let mut clock = lock(&self.clock);
            clock.epoch += 1;
            clock.epoch
        };
        let clock = Arc::clone(&self.clock);
        let tick = self.config.tick;
        let policy = self.config.policy;

        self.handle = Some(runtime.spawn(run_ticks(clock, epoch, tick, policy)));
        debug!(epoch, "game timer started");
        Ok(())
    }

    /// Stop ticking. The elapsed value freezes. Idempotent.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let elapsed_ms = {
            let mut clock = lock(&self.clock);
            clock.epoch += 1;
            clock.elapsed_ms
        };
        handle.abort();
        debug!(elapsed_ms, "game timer stopped");
    }

    /// Stop and zero the timer.
    pub fn reset(&mut self) {
        self.stop();
        lock(&self.clock).elapsed_ms = 0;
    }

    /// Overwrite the elapsed value (e.g. when restoring a session).
    /// A running timer keeps ticking from the new value.
    pub fn set_elapsed_millis(&mut self, millis: u64) {
        lock(&self.clock).elapsed_ms = millis;
    }

    /// Elapsed time in whole milliseconds.
    pub fn elapsed_millis(&self) -> u64 {
        lock(&self.clock).elapsed_ms
    }

    /// Elapsed time as a `Duration`.
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_millis())
    }

    /// Whether a tick task is live.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// The validated tick period.
    pub fn tick(&self) -> Duration {
        self.config.tick
    }
}

impl Default for GameTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

impl Drop for GameTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

fn lock(clock: &Mutex<Clock>) -> MutexGuard<'_, Clock> {
    clock.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run_ticks(clock: Arc<Mutex<Clock>>, epoch: u64, tick: Duration, policy: TickPolicy) {
    let step = tick.as_millis() as u64;
    let mut interval = time::interval_at(Instant::now() + tick, tick);
    interval.set_missed_tick_behavior(policy.into());

    loop {
        interval.tick().await;
        let mut clock = lock(&clock);
        if clock.epoch != epoch {
            return;
        }
        clock.elapsed_ms += step;
        trace!(elapsed_ms = clock.elapsed_ms, "timer tick");
    }
}
