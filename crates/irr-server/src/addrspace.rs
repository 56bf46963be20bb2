//! Server-side address space: the variable store remote clients poll.

use std::collections::HashMap;
use std::sync::Arc;

use irr_boundary::paths::{self, command, station_info, status};
use irr_boundary::{AccessClass, Value, ValueKind};
use irr_project::Installation;
use thiserror::Error;
use tokio::sync::RwLock;

/// Address space shared between the API handlers and the reconciliation
/// loop. The loop takes the write half for a whole tick, so clients never
/// observe a half-written tick.
pub type SharedAddressSpace = Arc<RwLock<AddressSpace>>;

/// Failures when reading or writing a boundary variable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoundaryError {
    #[error("No such variable: {path}")]
    NotFound { path: String },

    #[error("Variable is not client-writable: {path}")]
    AccessDenied { path: String },

    #[error("Type mismatch on {path}: expected {expected:?}, got {got:?}")]
    TypeMismatch {
        path: String,
        expected: ValueKind,
        got: ValueKind,
    },
}

#[derive(Debug, Clone)]
struct Variable {
    value: Value,
    access: AccessClass,
}

/// The variable tree, keyed by slash-separated path.
///
/// The value type of each variable is fixed at construction; writes from
/// either side must match it.
#[derive(Debug, Default)]
pub struct AddressSpace {
    vars: HashMap<String, Variable>,
}

impl AddressSpace {
    /// Populate the tree for an installation, all valves idle.
    pub fn for_installation(installation: &Installation) -> Self {
        let mut space = Self::default();

        space.insert(paths::SYSTEM_STATE, Value::Bool(true), AccessClass::Command);

        for station in &installation.stations {
            let sid = &station.id;
            let station_type = if station.valve_count > 1 {
                "DoubleValve"
            } else {
                "SingleValve"
            };

            space.insert(
                paths::station_info_path(sid, station_info::STATION_ID),
                Value::Text(sid.clone()),
                AccessClass::Static,
            );
            space.insert(
                paths::station_info_path(sid, station_info::DESCRIPTION),
                Value::Text(station.description.clone()),
                AccessClass::Static,
            );
            space.insert(
                paths::station_info_path(sid, station_info::STATION_TYPE),
                Value::Text(station_type.to_string()),
                AccessClass::Static,
            );
            space.insert(
                paths::station_info_path(sid, station_info::VALVE_COUNT),
                Value::Int(station.valve_count as i64),
                AccessClass::Static,
            );

            for i in 1..=station.valve_count {
                let vid = format!("Valve{i}");
                space.insert(
                    paths::valve_description_path(sid, &vid),
                    Value::Text(format!("{} - Valve {}", station.description, i)),
                    AccessClass::Static,
                );

                space.insert(
                    paths::valve_status_path(sid, &vid, status::IS_IRRIGATING),
                    Value::Bool(false),
                    AccessClass::Status,
                );
                space.insert(
                    paths::valve_status_path(sid, &vid, status::MODE),
                    Value::Text("Off".to_string()),
                    AccessClass::Status,
                );
                space.insert(
                    paths::valve_status_path(sid, &vid, status::REMAINING_TIME),
                    Value::Int(0),
                    AccessClass::Status,
                );
                space.insert(
                    paths::valve_status_path(sid, &vid, status::NEXT_SCHEDULED_START),
                    Value::DateTime(None),
                    AccessClass::Status,
                );

                space.insert(
                    paths::valve_command_path(sid, &vid, command::DURATION),
                    Value::Int(0),
                    AccessClass::Command,
                );
                space.insert(
                    paths::valve_command_path(sid, &vid, command::START),
                    Value::Bool(false),
                    AccessClass::Command,
                );
                space.insert(
                    paths::valve_command_path(sid, &vid, command::STOP),
                    Value::Bool(false),
                    AccessClass::Command,
                );
                space.insert(
                    paths::valve_command_path(sid, &vid, command::SCHEDULE_AT),
                    Value::DateTime(None),
                    AccessClass::Command,
                );
            }
        }

        space
    }

    fn insert(&mut self, path: impl Into<String>, value: Value, access: AccessClass) {
        self.vars.insert(path.into(), Variable { value, access });
    }

    /// Read a variable's current value and access class.
    pub fn read(&self, path: &str) -> Result<(Value, AccessClass), BoundaryError> {
        let var = self.vars.get(path).ok_or_else(|| BoundaryError::NotFound {
            path: path.to_string(),
        })?;
        Ok((var.value.clone(), var.access))
    }

    /// Write on behalf of a remote client: enforces access class and type.
    pub fn write_client(&mut self, path: &str, value: Value) -> Result<(), BoundaryError> {
        let access = self
            .vars
            .get(path)
            .ok_or_else(|| BoundaryError::NotFound {
                path: path.to_string(),
            })?
            .access;
        if !access.client_writable() {
            return Err(BoundaryError::AccessDenied {
                path: path.to_string(),
            });
        }
        self.write_checked(path, value)
    }

    /// Write on behalf of the server's own mirror phase: type-checked only.
    pub fn write_server(&mut self, path: &str, value: Value) -> Result<(), BoundaryError> {
        self.write_checked(path, value)
    }

    fn write_checked(&mut self, path: &str, value: Value) -> Result<(), BoundaryError> {
        let var = self
            .vars
            .get_mut(path)
            .ok_or_else(|| BoundaryError::NotFound {
                path: path.to_string(),
            })?;
        if var.value.kind() != value.kind() {
            return Err(BoundaryError::TypeMismatch {
                path: path.to_string(),
                expected: var.value.kind(),
                got: value.kind(),
            });
        }
        var.value = value;
        Ok(())
    }
}
