//! System root: the master switch gating the reconciliation tick.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{CoreError, CoreResult};
use crate::station::Station;
use crate::valve::Valve;

/// The whole installation: an ordered set of stations behind a master switch.
///
/// Built once at startup from static configuration and owned by the
/// reconciliation driver; the boundary layer only mirrors values in and out.
///
/// While the master switch is off nothing advances: timers freeze, command
/// buffers keep their latched requests, and on re-enable each active run's
/// start time is shifted forward by the suspended span so that only active
/// elapsed time counts against the countdown.
#[derive(Debug, Clone)]
pub struct IrrigationSystem {
    system_on: bool,
    suspended_at: Option<DateTime<Utc>>,
    stations: Vec<Station>,
}

impl IrrigationSystem {
    /// Build the system from its stations, in configuration order.
    pub fn new(stations: Vec<Station>) -> CoreResult<Self> {
        for (i, station) in stations.iter().enumerate() {
            if stations[..i].iter().any(|s| s.id() == station.id()) {
                return Err(CoreError::DuplicateStation {
                    id: station.id().to_string(),
                });
            }
        }
        Ok(Self {
            system_on: true,
            suspended_at: None,
            stations,
        })
    }

    pub fn system_on(&self) -> bool {
        self.system_on
    }

    pub fn set_system_on(&mut self, on: bool) {
        self.system_on = on;
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station(&self, station_id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id() == station_id)
    }

    pub fn station_mut(&mut self, station_id: &str) -> Option<&mut Station> {
        self.stations.iter_mut().find(|s| s.id() == station_id)
    }

    /// Mutable valve lookup by station id and local valve id.
    pub fn valve_mut(&mut self, station_id: &str, valve_id: &str) -> Option<&mut Valve> {
        self.station_mut(station_id)?.valve_mut(valve_id)
    }

    pub fn valve(&self, station_id: &str, valve_id: &str) -> Option<&Valve> {
        self.station(station_id)?.valve(valve_id)
    }

    /// Advance the whole system by one tick, honoring the master switch.
    pub fn update(&mut self, now: DateTime<Utc>) {
        if !self.system_on {
            if self.suspended_at.is_none() {
                self.suspended_at = Some(now);
            }
            return;
        }

        if let Some(since) = self.suspended_at.take() {
            let gap = now - since;
            if gap > TimeDelta::zero() {
                for station in &mut self.stations {
                    for valve in station.valves_mut() {
                        valve.shift_start_time(gap);
                    }
                }
            }
        }

        for station in &mut self.stations {
            station.update(now);
        }
    }
}
