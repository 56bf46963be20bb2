//! The reconciliation loop.
//!
//! Once per tick: read the master switch and every valve's command variables
//! from the address space, latch them into the model, advance the model, and
//! mirror the resulting status back. No other component touches the boundary.
//!
//! Commands are *latched*, not copied: a `true` boundary flag sets the
//! valve's buffer flag (capturing the duration at that instant), a `false`
//! flag leaves the buffer alone. The flag is acknowledged — written back to
//! `false` — on the tick it was latched, whether or not the command was
//! honored, while a request deferred by the master switch stays buffered in
//! the model until the system is re-enabled.
//!
//! A failed read or write for one valve is logged and skips that valve for
//! the tick; it never aborts the tick.

use std::time::Duration;

use chrono::{DateTime, Utc};
use irr_boundary::paths::{self, command, status};
use irr_boundary::Value;
use irr_core::{IrrigationSystem, Station};
use tracing::{debug, info, warn};

use crate::addrspace::{AddressSpace, BoundaryError, SharedAddressSpace};

/// One read → apply → write cycle over the whole installation.
///
/// The caller holds the address-space write half for the duration, so the
/// tick is a single critical section: clients never observe one valve's new
/// status next to another valve's old status.
pub fn tick(system: &mut IrrigationSystem, space: &mut AddressSpace, now: DateTime<Utc>) {
    // Step 1: master switch.
    match space.read(paths::SYSTEM_STATE) {
        Ok((value, _)) => {
            if let Some(on) = value.as_bool() {
                if on != system.system_on() {
                    info!(on, "master switch changed");
                }
                system.set_system_on(on);
            }
        }
        Err(e) => warn!(error = %e, "master switch unreadable this tick"),
    }

    let valve_refs: Vec<(String, String)> = system
        .stations()
        .iter()
        .flat_map(|s| {
            let sid = s.id().to_string();
            (0..s.valve_count()).map(move |i| (sid.clone(), Station::local_valve_id(i)))
        })
        .collect();

    // Step 2: latch commands, remembering which flags to acknowledge.
    let mut acks: Vec<(String, Value)> = Vec::new();
    for (sid, vid) in &valve_refs {
        if let Err(e) = latch_valve_commands(system, space, sid, vid, &mut acks) {
            warn!(station = %sid, valve = %vid, error = %e, "command variables unreadable this tick");
        }
    }

    // Step 3: advance the model.
    let was_irrigating: Vec<bool> = valve_refs
        .iter()
        .map(|(sid, vid)| {
            system
                .valve(sid, vid)
                .is_some_and(|v| v.state().is_irrigating)
        })
        .collect();
    system.update(now);

    // Step 4: mirror status back.
    for ((sid, vid), was) in valve_refs.iter().zip(was_irrigating) {
        let Some(valve) = system.valve(sid, vid) else {
            continue;
        };
        let state = valve.state();

        if state.is_irrigating != was {
            if state.is_irrigating {
                info!(valve = %state.id, mode = %state.mode, duration_s = state.duration_s, "irrigation started");
            } else {
                info!(valve = %state.id, "irrigation ended");
            }
        }

        let writes = [
            (
                paths::valve_status_path(sid, vid, status::IS_IRRIGATING),
                Value::Bool(state.is_irrigating),
            ),
            (
                paths::valve_status_path(sid, vid, status::MODE),
                Value::Text(state.mode.as_str().to_string()),
            ),
            (
                paths::valve_status_path(sid, vid, status::REMAINING_TIME),
                Value::Int(i64::from(state.remaining_time_s)),
            ),
            (
                paths::valve_status_path(sid, vid, status::NEXT_SCHEDULED_START),
                Value::DateTime(state.next_scheduled_start),
            ),
        ];
        for (path, value) in writes {
            if let Err(e) = space.write_server(&path, value) {
                warn!(station = %sid, valve = %vid, error = %e, "status write failed this tick");
            }
        }
    }

    // Step 5: acknowledge every command flag that was set at step 2.
    for (path, value) in acks {
        if let Err(e) = space.write_server(&path, value) {
            warn!(path = %path, error = %e, "command acknowledge failed this tick");
        }
    }
}

fn latch_valve_commands(
    system: &mut IrrigationSystem,
    space: &AddressSpace,
    sid: &str,
    vid: &str,
    acks: &mut Vec<(String, Value)>,
) -> Result<(), BoundaryError> {
    let duration_path = paths::valve_command_path(sid, vid, command::DURATION);
    let start_path = paths::valve_command_path(sid, vid, command::START);
    let stop_path = paths::valve_command_path(sid, vid, command::STOP);
    let schedule_path = paths::valve_command_path(sid, vid, command::SCHEDULE_AT);

    let (duration, _) = space.read(&duration_path)?;
    let (start, _) = space.read(&start_path)?;
    let (stop, _) = space.read(&stop_path)?;
    let (schedule_at, _) = space.read(&schedule_path)?;

    let duration_s = duration
        .as_int()
        .unwrap_or(0)
        .clamp(0, i64::from(u32::MAX)) as u32;
    let start = start.as_bool().unwrap_or(false);
    let stop = stop.as_bool().unwrap_or(false);
    let schedule_at = schedule_at.as_datetime().flatten();

    let Some(valve) = system.valve_mut(sid, vid) else {
        return Ok(());
    };

    if let Some(at) = schedule_at {
        debug!(valve = %valve.id(), at = %at, duration_s, "schedule command latched");
        valve.latch_schedule_command(at, duration_s);
        acks.push((schedule_path, Value::DateTime(None)));
    }
    if start {
        debug!(valve = %valve.id(), duration_s, "start command latched");
        valve.latch_start_command(duration_s);
        acks.push((start_path, Value::Bool(false)));
    }
    if stop {
        debug!(valve = %valve.id(), "stop command latched");
        valve.latch_stop_command();
        acks.push((stop_path, Value::Bool(false)));
    }

    Ok(())
}

/// Drive the loop at a fixed interval until process shutdown.
///
/// Intended to be `tokio::spawn`-ed from the daemon. The reconciliation task
/// is the single writer of the model; the address space is the only state it
/// shares with the API.
pub async fn run(mut system: IrrigationSystem, space: SharedAddressSpace, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    info!(interval_s = interval.as_secs_f64(), "reconciliation loop started");
    loop {
        ticker.tick().await;
        let now = Utc::now();
        let mut guard = space.write().await;
        tick(&mut system, &mut guard, now);
    }
}
