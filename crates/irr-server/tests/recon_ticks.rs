//! Reconciliation loop behavior, driven tick by tick with fabricated times.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use irr_boundary::paths::{self, command, status};
use irr_boundary::Value;
use irr_core::IrrigationSystem;
use irr_project::Installation;
use irr_server::{compile_installation, recon, AddressSpace};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap()
}

fn secs(s: i64) -> TimeDelta {
    TimeDelta::seconds(s)
}

fn rig() -> (IrrigationSystem, AddressSpace) {
    let runtime = compile_installation(&Installation::demo()).unwrap();
    (runtime.system, runtime.space)
}

fn client_write(space: &mut AddressSpace, path: &str, value: Value) {
    space.write_client(path, value).unwrap();
}

fn read(space: &AddressSpace, path: &str) -> Value {
    space.read(path).unwrap().0
}

fn v1_status(space: &AddressSpace, name: &str) -> Value {
    read(space, &paths::valve_status_path("Station1", "Valve1", name))
}

#[test]
fn command_issued_before_a_tick_is_visible_in_that_ticks_write_phase() {
    let (mut system, mut space) = rig();

    client_write(
        &mut space,
        &paths::valve_command_path("Station1", "Valve1", command::DURATION),
        Value::Int(10),
    );
    client_write(
        &mut space,
        &paths::valve_command_path("Station1", "Valve1", command::START),
        Value::Bool(true),
    );

    recon::tick(&mut system, &mut space, t0());

    assert_eq!(v1_status(&space, status::IS_IRRIGATING), Value::Bool(true));
    assert_eq!(v1_status(&space, status::MODE), Value::Text("Manual".into()));
    assert_eq!(v1_status(&space, status::REMAINING_TIME), Value::Int(10));

    // The flag is acknowledged on the same tick.
    assert_eq!(
        read(
            &space,
            &paths::valve_command_path("Station1", "Valve1", command::START)
        ),
        Value::Bool(false)
    );

    // Sibling valve untouched.
    assert_eq!(
        read(
            &space,
            &paths::valve_status_path("Station1", "Valve2", status::IS_IRRIGATING)
        ),
        Value::Bool(false)
    );
    assert_eq!(
        read(
            &space,
            &paths::valve_status_path("Station1", "Valve2", status::MODE)
        ),
        Value::Text("Off".into())
    );

    // Ticks past the duration bring the valve back to idle.
    for i in 1..=11 {
        recon::tick(&mut system, &mut space, t0() + secs(i));
    }
    assert_eq!(v1_status(&space, status::IS_IRRIGATING), Value::Bool(false));
    assert_eq!(v1_status(&space, status::MODE), Value::Text("Off".into()));
    assert_eq!(v1_status(&space, status::REMAINING_TIME), Value::Int(0));
}

#[test]
fn start_while_running_is_consumed_and_never_fires_later() {
    let (mut system, mut space) = rig();

    client_write(
        &mut space,
        &paths::valve_command_path("Station1", "Valve1", command::DURATION),
        Value::Int(60),
    );
    client_write(
        &mut space,
        &paths::valve_command_path("Station1", "Valve1", command::START),
        Value::Bool(true),
    );
    recon::tick(&mut system, &mut space, t0());

    // Second start against the running valve: rejected but acknowledged.
    client_write(
        &mut space,
        &paths::valve_command_path("Station1", "Valve1", command::DURATION),
        Value::Int(30),
    );
    client_write(
        &mut space,
        &paths::valve_command_path("Station1", "Valve1", command::START),
        Value::Bool(true),
    );
    recon::tick(&mut system, &mut space, t0() + secs(1));

    assert_eq!(v1_status(&space, status::REMAINING_TIME), Value::Int(59));
    assert_eq!(
        read(
            &space,
            &paths::valve_command_path("Station1", "Valve1", command::START)
        ),
        Value::Bool(false)
    );

    // Stop, then keep ticking: the stale 30-second request must not fire.
    client_write(
        &mut space,
        &paths::valve_command_path("Station1", "Valve1", command::STOP),
        Value::Bool(true),
    );
    recon::tick(&mut system, &mut space, t0() + secs(2));
    assert_eq!(v1_status(&space, status::IS_IRRIGATING), Value::Bool(false));

    recon::tick(&mut system, &mut space, t0() + secs(3));
    assert_eq!(v1_status(&space, status::IS_IRRIGATING), Value::Bool(false));
}

#[test]
fn simultaneous_start_and_stop_in_one_tick_nets_to_off() {
    let (mut system, mut space) = rig();

    client_write(
        &mut space,
        &paths::valve_command_path("Station2", "Valve1", command::DURATION),
        Value::Int(10),
    );
    client_write(
        &mut space,
        &paths::valve_command_path("Station2", "Valve1", command::START),
        Value::Bool(true),
    );
    client_write(
        &mut space,
        &paths::valve_command_path("Station2", "Valve1", command::STOP),
        Value::Bool(true),
    );
    recon::tick(&mut system, &mut space, t0());

    assert_eq!(
        read(
            &space,
            &paths::valve_status_path("Station2", "Valve1", status::IS_IRRIGATING)
        ),
        Value::Bool(false)
    );
    assert_eq!(
        read(
            &space,
            &paths::valve_command_path("Station2", "Valve1", command::START)
        ),
        Value::Bool(false)
    );
    assert_eq!(
        read(
            &space,
            &paths::valve_command_path("Station2", "Valve1", command::STOP)
        ),
        Value::Bool(false)
    );
}

#[test]
fn master_switch_off_defers_commands_and_freezes_timers() {
    let (mut system, mut space) = rig();

    // Start a run, let it count down a bit.
    client_write(
        &mut space,
        &paths::valve_command_path("Station1", "Valve1", command::DURATION),
        Value::Int(60),
    );
    client_write(
        &mut space,
        &paths::valve_command_path("Station1", "Valve1", command::START),
        Value::Bool(true),
    );
    recon::tick(&mut system, &mut space, t0());
    recon::tick(&mut system, &mut space, t0() + secs(10));
    assert_eq!(v1_status(&space, status::REMAINING_TIME), Value::Int(50));

    // Master off: the countdown must not move across ticks.
    client_write(&mut space, paths::SYSTEM_STATE, Value::Bool(false));
    recon::tick(&mut system, &mut space, t0() + secs(11));
    recon::tick(&mut system, &mut space, t0() + secs(40));
    assert_eq!(v1_status(&space, status::REMAINING_TIME), Value::Int(50));

    // A command issued while off is acknowledged but deferred.
    client_write(
        &mut space,
        &paths::valve_command_path("Station3", "Valve1", command::DURATION),
        Value::Int(20),
    );
    client_write(
        &mut space,
        &paths::valve_command_path("Station3", "Valve1", command::START),
        Value::Bool(true),
    );
    recon::tick(&mut system, &mut space, t0() + secs(41));
    assert_eq!(
        read(
            &space,
            &paths::valve_command_path("Station3", "Valve1", command::START)
        ),
        Value::Bool(false)
    );
    assert_eq!(
        read(
            &space,
            &paths::valve_status_path("Station3", "Valve1", status::IS_IRRIGATING)
        ),
        Value::Bool(false)
    );

    // Back on: the deferred start fires and the frozen run resumes with only
    // active time counted. One active second (tick 10 -> 11) elapsed before
    // the off period was first observed, so the countdown resumes at 49.
    client_write(&mut space, paths::SYSTEM_STATE, Value::Bool(true));
    recon::tick(&mut system, &mut space, t0() + secs(41));

    assert_eq!(
        read(
            &space,
            &paths::valve_status_path("Station3", "Valve1", status::IS_IRRIGATING)
        ),
        Value::Bool(true)
    );
    assert_eq!(v1_status(&space, status::REMAINING_TIME), Value::Int(49));

    recon::tick(&mut system, &mut space, t0() + secs(46));
    assert_eq!(v1_status(&space, status::REMAINING_TIME), Value::Int(44));
}

#[test]
fn schedule_command_arms_and_fires_through_the_boundary() {
    let (mut system, mut space) = rig();

    client_write(
        &mut space,
        &paths::valve_command_path("Station3", "Valve2", command::DURATION),
        Value::Int(15),
    );
    client_write(
        &mut space,
        &paths::valve_command_path("Station3", "Valve2", command::SCHEDULE_AT),
        Value::DateTime(Some(t0() + secs(20))),
    );
    recon::tick(&mut system, &mut space, t0());

    // Armed, acknowledged, and mirrored as status.
    assert_eq!(
        read(
            &space,
            &paths::valve_command_path("Station3", "Valve2", command::SCHEDULE_AT)
        ),
        Value::DateTime(None)
    );
    assert_eq!(
        read(
            &space,
            &paths::valve_status_path("Station3", "Valve2", status::NEXT_SCHEDULED_START)
        ),
        Value::DateTime(Some(t0() + secs(20)))
    );

    recon::tick(&mut system, &mut space, t0() + secs(19));
    assert_eq!(
        read(
            &space,
            &paths::valve_status_path("Station3", "Valve2", status::IS_IRRIGATING)
        ),
        Value::Bool(false)
    );

    recon::tick(&mut system, &mut space, t0() + secs(21));
    assert_eq!(
        read(
            &space,
            &paths::valve_status_path("Station3", "Valve2", status::IS_IRRIGATING)
        ),
        Value::Bool(true)
    );
    assert_eq!(
        read(
            &space,
            &paths::valve_status_path("Station3", "Valve2", status::MODE)
        ),
        Value::Text("Scheduled".into())
    );
    assert_eq!(
        read(
            &space,
            &paths::valve_status_path("Station3", "Valve2", status::NEXT_SCHEDULED_START)
        ),
        Value::DateTime(None)
    );
}
