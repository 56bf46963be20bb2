//! Cross-module scenarios driving the whole model through latched commands,
//! the way the reconciliation loop does.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use irr_core::{IrrigationSystem, Mode, Station};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap()
}

fn secs(s: i64) -> TimeDelta {
    TimeDelta::seconds(s)
}

fn installation() -> IrrigationSystem {
    IrrigationSystem::new(vec![
        Station::new("Station1", "Front Garden", 2).unwrap(),
        Station::new("Station2", "Side Beds", 1).unwrap(),
        Station::new("Station3", "Back Garden", 2).unwrap(),
    ])
    .unwrap()
}

#[test]
fn one_valve_runs_to_completion_while_siblings_stay_idle() {
    let mut sys = installation();

    sys.valve_mut("Station1", "Valve1").unwrap().latch_start_command(10);

    // First tick: the command is consumed and the run begins.
    sys.update(t0());
    {
        let v1 = sys.valve("Station1", "Valve1").unwrap().state();
        assert!(v1.is_irrigating);
        assert_eq!(v1.mode, Mode::Manual);
        assert!(v1.remaining_time_s <= 10);

        let v2 = sys.valve("Station1", "Valve2").unwrap().state();
        assert!(!v2.is_irrigating);
        assert_eq!(v2.mode, Mode::Off);
    }

    // Tick once per second until past the requested duration.
    for i in 1..=11 {
        sys.update(t0() + secs(i));
    }

    let v1 = sys.valve("Station1", "Valve1").unwrap().state();
    assert!(!v1.is_irrigating);
    assert_eq!(v1.remaining_time_s, 0);
    assert_eq!(v1.mode, Mode::Off);
    let v2 = sys.valve("Station1", "Valve2").unwrap().state();
    assert!(!v2.is_irrigating);
}

#[test]
fn concurrent_runs_on_different_stations_are_independent() {
    let mut sys = installation();

    sys.valve_mut("Station1", "Valve2").unwrap().latch_start_command(30);
    sys.valve_mut("Station3", "Valve1").unwrap().latch_start_command(60);
    sys.update(t0());

    sys.valve_mut("Station1", "Valve2").unwrap().latch_stop_command();
    sys.update(t0() + secs(10));

    assert!(!sys.valve("Station1", "Valve2").unwrap().state().is_irrigating);
    let s3 = sys.valve("Station3", "Valve1").unwrap().state();
    assert!(s3.is_irrigating);
    assert_eq!(s3.remaining_time_s, 50);
}

#[test]
fn scheduled_run_survives_master_switch_gap() {
    let mut sys = installation();

    sys.valve_mut("Station2", "Valve1")
        .unwrap()
        .latch_schedule_command(t0() + secs(20), 15);
    sys.update(t0());
    assert_eq!(
        sys.valve("Station2", "Valve1").unwrap().state().next_scheduled_start,
        Some(t0() + secs(20))
    );

    // System goes dark across the scheduled start time.
    sys.set_system_on(false);
    sys.update(t0() + secs(5));
    sys.update(t0() + secs(30));
    assert!(!sys.valve("Station2", "Valve1").unwrap().state().is_irrigating);

    // The appointment is wall-clock: it fires on the first tick after resume.
    sys.set_system_on(true);
    sys.update(t0() + secs(40));
    let state = sys.valve("Station2", "Valve1").unwrap().state();
    assert!(state.is_irrigating);
    assert_eq!(state.mode, Mode::Scheduled);
    assert_eq!(state.remaining_time_s, 15);
}
