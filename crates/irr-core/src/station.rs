//! Station: an ordered group of valves sharing a location.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::valve::Valve;

/// Station classification derived from the valve count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationType {
    SingleValve,
    DoubleValve,
}

impl StationType {
    pub fn as_str(self) -> &'static str {
        match self {
            StationType::SingleValve => "SingleValve",
            StationType::DoubleValve => "DoubleValve",
        }
    }
}

/// A named group of one or more valves.
///
/// Pure composition: `update` fans out to each valve in index order with no
/// coordination between siblings, and cannot fail.
#[derive(Debug, Clone)]
pub struct Station {
    id: String,
    description: String,
    station_type: StationType,
    valves: Vec<Valve>,
}

impl Station {
    /// Build a station with valves `Valve1..ValveN`.
    ///
    /// Valve descriptions derive from the station description, and the
    /// system-wide valve id is `<StationId>_<ValveId>`.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        valve_count: usize,
    ) -> CoreResult<Self> {
        let id = id.into();
        let description = description.into();
        if id.is_empty() {
            return Err(CoreError::InvalidArg {
                what: "station id must not be empty",
            });
        }
        if valve_count == 0 {
            return Err(CoreError::InvalidArg {
                what: "valve_count must be at least 1",
            });
        }

        let valves = (1..=valve_count)
            .map(|i| {
                Valve::new(
                    format!("{id}_Valve{i}"),
                    format!("{description} - Valve {i}"),
                )
            })
            .collect();

        Ok(Self {
            id,
            description,
            station_type: if valve_count > 1 {
                StationType::DoubleValve
            } else {
                StationType::SingleValve
            },
            valves,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn station_type(&self) -> StationType {
        self.station_type
    }

    pub fn valve_count(&self) -> usize {
        self.valves.len()
    }

    pub fn valves(&self) -> &[Valve] {
        &self.valves
    }

    pub fn valves_mut(&mut self) -> &mut [Valve] {
        &mut self.valves
    }

    /// Look up a valve by its local id (`Valve1`, `Valve2`, …).
    pub fn valve(&self, valve_id: &str) -> Option<&Valve> {
        let idx = Self::valve_index(valve_id)?;
        self.valves.get(idx)
    }

    /// Mutable lookup by local valve id.
    pub fn valve_mut(&mut self, valve_id: &str) -> Option<&mut Valve> {
        let idx = Self::valve_index(valve_id)?;
        self.valves.get_mut(idx)
    }

    /// Local valve id for a 0-based index.
    pub fn local_valve_id(index: usize) -> String {
        format!("Valve{}", index + 1)
    }

    fn valve_index(valve_id: &str) -> Option<usize> {
        let n: usize = valve_id.strip_prefix("Valve")?.parse().ok()?;
        n.checked_sub(1)
    }

    /// Advance every valve by one tick.
    pub fn update(&mut self, now: DateTime<Utc>) {
        for valve in &mut self.valves {
            valve.update(now);
        }
    }
}
