//! Valve state machine and command intake.
//!
//! A valve is either idle or running one irrigation cycle. External actors
//! never call into the state machine directly: they write into the pending
//! [`CommandBuffer`], and the reconciliation tick drains it exactly once via
//! [`Valve::process_commands`]. The countdown is recomputed from wall-clock
//! elapsed time on every tick, so irregular tick intervals do not accumulate
//! drift.

use core::fmt;

use chrono::{DateTime, TimeDelta, Utc};

/// Operating mode of a valve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Idle; no cycle active.
    #[default]
    Off,
    /// Running from a direct start command.
    Manual,
    /// Running from a scheduled start time.
    Scheduled,
}

impl Mode {
    /// String form used on the boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Off => "Off",
            Mode::Manual => "Manual",
            Mode::Scheduled => "Scheduled",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pending command intake fields.
///
/// Written by the reconciliation read phase (latched from the boundary) and
/// consumed exactly once per tick. These are not irrigation state: a latched
/// command survives ticks where the master switch is off, and is cleared only
/// when consumed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandBuffer {
    /// Requested run duration in seconds; consumed together with `start`.
    pub duration_s: u32,
    /// Edge-triggered start request.
    pub start: bool,
    /// Edge-triggered stop request.
    pub stop: bool,
    /// Requested future start time; consumed together with `duration_s`.
    pub schedule_at: Option<DateTime<Utc>>,
}

/// The persisted fields of one valve.
///
/// Invariant: `is_irrigating` ⇔ `mode != Off` ∧ `remaining_time_s > 0` ∧
/// `start_time` is set. When idle, `remaining_time_s == 0` and `mode == Off`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValveState {
    /// Stable identifier, unique within the system (`<StationId>_<ValveId>`).
    pub id: String,
    /// Human-readable label, immutable after construction.
    pub description: String,
    pub mode: Mode,
    /// True exactly while actively dispensing.
    pub is_irrigating: bool,
    /// Seconds left in the current run; 0 when idle.
    pub remaining_time_s: u32,
    /// Total seconds requested for the current/last run.
    pub duration_s: u32,
    /// Start of the active run, or `None` when idle.
    pub start_time: Option<DateTime<Utc>>,
    /// Armed future start time, if any.
    pub next_scheduled_start: Option<DateTime<Utc>>,
    /// Duration the armed schedule will run for.
    pub scheduled_duration_s: u32,
    /// Pending command intake.
    pub commands: CommandBuffer,
}

/// One controllable irrigation valve.
#[derive(Debug, Clone, PartialEq)]
pub struct Valve {
    state: ValveState,
}

impl Valve {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            state: ValveState {
                id: id.into(),
                description: description.into(),
                mode: Mode::Off,
                is_irrigating: false,
                remaining_time_s: 0,
                duration_s: 0,
                start_time: None,
                next_scheduled_start: None,
                scheduled_duration_s: 0,
                commands: CommandBuffer::default(),
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.state.id
    }

    pub fn state(&self) -> &ValveState {
        &self.state
    }

    /// Start a manual run.
    ///
    /// Returns `false` with no state change when the valve is already
    /// irrigating or the duration is not positive. A rejected start does not
    /// queue, extend or override the running cycle: at most one run per valve.
    pub fn start_manual_irrigation(&mut self, duration_s: u32, now: DateTime<Utc>) -> bool {
        if self.state.is_irrigating || duration_s == 0 {
            return false;
        }
        self.begin_run(Mode::Manual, duration_s, now);
        true
    }

    /// Stop the current run.
    ///
    /// Always succeeds and returns `true`; stopping an idle valve is a no-op
    /// that still resets `mode` and cancels any armed schedule.
    pub fn stop_irrigation(&mut self) -> bool {
        self.state.is_irrigating = false;
        self.state.remaining_time_s = 0;
        self.state.mode = Mode::Off;
        self.state.start_time = None;
        self.state.next_scheduled_start = None;
        self.state.scheduled_duration_s = 0;
        true
    }

    /// Arm a future run at `at` for `duration_s` seconds.
    ///
    /// Returns `false` with no state change unless `at` is strictly in the
    /// future and the duration is positive. Re-arming overwrites a previously
    /// armed schedule. The run itself begins during the first tick at or
    /// after `at` on which the valve is idle.
    pub fn schedule_irrigation(
        &mut self,
        at: DateTime<Utc>,
        duration_s: u32,
        now: DateTime<Utc>,
    ) -> bool {
        if duration_s == 0 || at <= now {
            return false;
        }
        self.state.next_scheduled_start = Some(at);
        self.state.scheduled_duration_s = duration_s;
        true
    }

    /// Latch an edge-triggered start request with its duration.
    pub fn latch_start_command(&mut self, duration_s: u32) {
        self.state.commands.start = true;
        self.state.commands.duration_s = duration_s;
    }

    /// Latch an edge-triggered stop request.
    pub fn latch_stop_command(&mut self) {
        self.state.commands.stop = true;
    }

    /// Latch a schedule request with its duration.
    pub fn latch_schedule_command(&mut self, at: DateTime<Utc>, duration_s: u32) {
        self.state.commands.schedule_at = Some(at);
        self.state.commands.duration_s = duration_s;
    }

    /// Consume the pending command buffer exactly once.
    ///
    /// Start intake runs before stop intake, so simultaneous start and stop
    /// requests net to a stopped valve. A start request is consumed whether
    /// or not it was honored, so a stale request cannot fire on a later tick
    /// once the valve becomes idle.
    pub fn process_commands(&mut self, now: DateTime<Utc>) {
        if let Some(at) = self.state.commands.schedule_at.take() {
            let duration_s = self.state.commands.duration_s;
            let _ = self.schedule_irrigation(at, duration_s, now);
        }

        if self.state.commands.start {
            if self.state.commands.duration_s > 0 {
                let _ = self.start_manual_irrigation(self.state.commands.duration_s, now);
            }
            self.state.commands.start = false;
            self.state.commands.duration_s = 0;
        }

        if self.state.commands.stop {
            self.stop_irrigation();
            self.state.commands.stop = false;
        }
    }

    /// Advance the valve by one tick.
    ///
    /// Drains the command buffer, fires an armed schedule whose start time
    /// has passed, then recomputes the countdown from wall-clock elapsed
    /// seconds (truncated toward zero). The transition to idle happens in the
    /// same tick that detects the countdown reaching 0.
    pub fn update(&mut self, now: DateTime<Utc>) {
        self.process_commands(now);

        if !self.state.is_irrigating
            && self.state.scheduled_duration_s > 0
            && self.state.next_scheduled_start.is_some_and(|at| at <= now)
        {
            let duration_s = self.state.scheduled_duration_s;
            self.state.next_scheduled_start = None;
            self.state.scheduled_duration_s = 0;
            self.begin_run(Mode::Scheduled, duration_s, now);
        }

        if self.state.is_irrigating {
            if let Some(started) = self.state.start_time {
                let elapsed = (now - started).num_seconds().max(0);
                let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
                self.state.remaining_time_s = self.state.duration_s.saturating_sub(elapsed);
                if self.state.remaining_time_s == 0 {
                    self.complete_run();
                }
            }
        }
    }

    /// Shift an active run's start forward by `by`.
    ///
    /// Used by the system gate when resuming from a suspension, so that only
    /// active elapsed time counts against the run.
    pub(crate) fn shift_start_time(&mut self, by: TimeDelta) {
        if self.state.is_irrigating {
            if let Some(t) = self.state.start_time {
                self.state.start_time = Some(t + by);
            }
        }
    }

    fn begin_run(&mut self, mode: Mode, duration_s: u32, now: DateTime<Utc>) {
        self.state.mode = mode;
        self.state.is_irrigating = true;
        self.state.duration_s = duration_s;
        self.state.remaining_time_s = duration_s;
        self.state.start_time = Some(now);
    }

    /// Natural expiry: end the run but keep an armed schedule, unlike an
    /// explicit stop which cancels it.
    fn complete_run(&mut self) {
        self.state.is_irrigating = false;
        self.state.remaining_time_s = 0;
        self.state.mode = Mode::Off;
        self.state.start_time = None;
    }
}
