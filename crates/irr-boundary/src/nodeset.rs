//! Nodeset export: a serializable description of the address space.
//!
//! Replaces the original modeling-tool export: object type definitions
//! (system, station, valve) with their variable declarations, plus the
//! instance tree generated from a concrete installation. Serialized to YAML
//! or JSON by the CLI.

use serde::{Deserialize, Serialize};

use crate::dto::DiscoveryDoc;
use crate::paths::{command, station_info, status};
use crate::value::{AccessClass, ValueKind};

pub const SYSTEM_TYPE: &str = "IrrigationSystemType";
pub const STATION_TYPE: &str = "IrrigationStationType";
pub const VALVE_TYPE: &str = "IrrigationValveType";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSetDocument {
    pub namespace_uri: String,
    pub object_types: Vec<ObjectTypeDef>,
    pub instances: Vec<InstanceNode>,
}

/// An object type with its variable declarations.
///
/// Folder structure is encoded in the declaration names
/// (`Status/IsIrrigating`, `Commands/CommandStart`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeDef {
    pub name: String,
    pub variables: Vec<VariableDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDecl {
    pub name: String,
    pub kind: ValueKind,
    pub access: AccessClass,
}

/// One typed instance in the address space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceNode {
    pub path: String,
    pub object_type: String,
}

impl NodeSetDocument {
    /// Build the export document for a discovered (or configured) topology.
    pub fn from_discovery(doc: &DiscoveryDoc) -> Self {
        let mut instances = vec![InstanceNode {
            path: "IrrigationSystem".to_string(),
            object_type: SYSTEM_TYPE.to_string(),
        }];
        for station in &doc.stations {
            instances.push(InstanceNode {
                path: format!("Stations/{}", station.id),
                object_type: STATION_TYPE.to_string(),
            });
            for valve in &station.valves {
                instances.push(InstanceNode {
                    path: format!("Stations/{}/{}", station.id, valve.id),
                    object_type: VALVE_TYPE.to_string(),
                });
            }
        }

        Self {
            namespace_uri: doc.namespace_uri.clone(),
            object_types: vec![system_type(), station_type(), valve_type()],
            instances,
        }
    }
}

fn decl(name: impl Into<String>, kind: ValueKind, access: AccessClass) -> VariableDecl {
    VariableDecl {
        name: name.into(),
        kind,
        access,
    }
}

fn system_type() -> ObjectTypeDef {
    ObjectTypeDef {
        name: SYSTEM_TYPE.to_string(),
        variables: vec![decl(
            "Controller/SystemState",
            ValueKind::Bool,
            AccessClass::Command,
        )],
    }
}

fn station_type() -> ObjectTypeDef {
    ObjectTypeDef {
        name: STATION_TYPE.to_string(),
        variables: vec![
            decl(
                format!("StationInfo/{}", station_info::STATION_ID),
                ValueKind::Text,
                AccessClass::Static,
            ),
            decl(
                format!("StationInfo/{}", station_info::DESCRIPTION),
                ValueKind::Text,
                AccessClass::Static,
            ),
            decl(
                format!("StationInfo/{}", station_info::STATION_TYPE),
                ValueKind::Text,
                AccessClass::Static,
            ),
            decl(
                format!("StationInfo/{}", station_info::VALVE_COUNT),
                ValueKind::Int,
                AccessClass::Static,
            ),
        ],
    }
}

fn valve_type() -> ObjectTypeDef {
    ObjectTypeDef {
        name: VALVE_TYPE.to_string(),
        variables: vec![
            decl("Description", ValueKind::Text, AccessClass::Static),
            decl(
                format!("Status/{}", status::IS_IRRIGATING),
                ValueKind::Bool,
                AccessClass::Status,
            ),
            decl(
                format!("Status/{}", status::MODE),
                ValueKind::Text,
                AccessClass::Status,
            ),
            decl(
                format!("Status/{}", status::REMAINING_TIME),
                ValueKind::Int,
                AccessClass::Status,
            ),
            decl(
                format!("Status/{}", status::NEXT_SCHEDULED_START),
                ValueKind::DateTime,
                AccessClass::Status,
            ),
            decl(
                format!("Commands/{}", command::DURATION),
                ValueKind::Int,
                AccessClass::Command,
            ),
            decl(
                format!("Commands/{}", command::START),
                ValueKind::Bool,
                AccessClass::Command,
            ),
            decl(
                format!("Commands/{}", command::STOP),
                ValueKind::Bool,
                AccessClass::Command,
            ),
            decl(
                format!("Commands/{}", command::SCHEDULE_AT),
                ValueKind::DateTime,
                AccessClass::Command,
            ),
        ],
    }
}
