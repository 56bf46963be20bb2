//! Wire DTOs shared by the server API and the client library.

use chrono::{DateTime, Utc};
use irr_project::Installation;
use serde::{Deserialize, Serialize};

use crate::value::{AccessClass, Value};

/// One variable as returned by a boundary read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDto {
    pub path: String,
    pub value: Value,
    pub access: AccessClass,
}

/// Body of a boundary write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteRequest {
    pub value: Value,
}

/// Static topology, fixed after startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryDoc {
    pub namespace_uri: String,
    pub stations: Vec<StationInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    pub id: String,
    pub description: String,
    pub station_type: String,
    pub valve_count: usize,
    pub valves: Vec<ValveInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveInfo {
    /// Local valve id within the station (`Valve1`, `Valve2`, …).
    pub id: String,
    pub description: String,
}

/// One-shot status snapshot of the whole installation (what the monitor polls).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub system_on: bool,
    pub stations: Vec<StationSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSnapshot {
    pub id: String,
    pub description: String,
    pub station_type: String,
    pub valves: Vec<ValveSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveSnapshot {
    pub id: String,
    pub description: String,
    pub is_irrigating: bool,
    pub mode: String,
    pub remaining_time_s: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_scheduled_start: Option<DateTime<Utc>>,
}

/// Derive the discovery document from an installation config.
///
/// Station type and valve naming follow the same rules the control core
/// applies, so discovery and model agree without consulting the model.
pub fn discovery_from_installation(installation: &Installation) -> DiscoveryDoc {
    DiscoveryDoc {
        namespace_uri: installation.server.namespace_uri.clone(),
        stations: installation
            .stations
            .iter()
            .map(|station| StationInfo {
                id: station.id.clone(),
                description: station.description.clone(),
                station_type: if station.valve_count > 1 {
                    "DoubleValve".to_string()
                } else {
                    "SingleValve".to_string()
                },
                valve_count: station.valve_count,
                valves: (1..=station.valve_count)
                    .map(|i| ValveInfo {
                        id: format!("Valve{i}"),
                        description: format!("{} - Valve {}", station.description, i),
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Explicit per-path result of checking a discovered topology against an
/// expected installation. Missing stations or valves are reported, never
/// silently skipped; callers continue with what was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyReport {
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

impl TopologyReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Compare a discovery document against the installation a client expects.
pub fn check_expected(discovery: &DiscoveryDoc, expected: &Installation) -> TopologyReport {
    let mut found = Vec::new();
    let mut missing = Vec::new();

    for station in &expected.stations {
        let Some(discovered) = discovery.stations.iter().find(|s| s.id == station.id) else {
            missing.push(format!("Stations/{}", station.id));
            continue;
        };
        found.push(format!("Stations/{}", station.id));

        for i in 1..=station.valve_count {
            let valve_id = format!("Valve{i}");
            let path = format!("Stations/{}/{}", station.id, valve_id);
            if discovered.valves.iter().any(|v| v.id == valve_id) {
                found.push(path);
            } else {
                missing.push(path);
            }
        }
    }

    TopologyReport { found, missing }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_mirrors_the_demo_installation() {
        let doc = discovery_from_installation(&Installation::demo());
        assert_eq!(doc.namespace_uri, "urn:irriflow:irrigation");
        assert_eq!(doc.stations.len(), 3);

        let s1 = &doc.stations[0];
        assert_eq!(s1.id, "Station1");
        assert_eq!(s1.station_type, "DoubleValve");
        assert_eq!(s1.valves.len(), 2);
        assert_eq!(s1.valves[1].id, "Valve2");
        assert_eq!(s1.valves[1].description, "Front Garden - Valve 2");

        let s2 = &doc.stations[1];
        assert_eq!(s2.station_type, "SingleValve");
    }

    #[test]
    fn topology_check_reports_missing_paths_explicitly() {
        let expected = Installation::demo();
        let mut discovery = discovery_from_installation(&expected);

        // Complete topology: everything found.
        let report = check_expected(&discovery, &expected);
        assert!(report.is_complete());
        assert_eq!(report.found.len(), 3 + 5);

        // Drop one valve and a whole station.
        discovery.stations[0].valves.pop();
        discovery.stations.retain(|s| s.id != "Station2");

        let report = check_expected(&discovery, &expected);
        assert!(!report.is_complete());
        assert!(report.missing.contains(&"Stations/Station1/Valve2".to_string()));
        assert!(report.missing.contains(&"Stations/Station2".to_string()));
        // Station2's valves are not double-reported once the station is gone.
        assert!(!report.missing.contains(&"Stations/Station2/Valve1".to_string()));
    }
}
