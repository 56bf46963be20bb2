//! HTTP boundary: thin wrappers around the address space.
//!
//! The API carries no control logic. Reads return the variable's current
//! value; writes land in client-writable variables and take effect when the
//! next reconciliation tick latches them.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use irr_boundary::paths::{self, status};
use irr_boundary::{
    DiscoveryDoc, NodeSetDocument, StationSnapshot, SystemSnapshot, ValveSnapshot, VariableDto,
    WriteRequest,
};
use tracing::warn;

use crate::addrspace::{BoundaryError, SharedAddressSpace};

#[derive(Clone)]
pub struct ApiState {
    pub space: SharedAddressSpace,
    pub discovery: Arc<DiscoveryDoc>,
    pub nodeset: Arc<NodeSetDocument>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/v1/discovery", get(get_discovery))
        .route("/v1/system", get(get_system))
        .route("/v1/nodeset", get(get_nodeset))
        .route("/v1/vars/{*path}", get(get_var).put(put_var))
        .with_state(state)
}

fn reject(e: BoundaryError) -> (StatusCode, String) {
    let code = match e {
        BoundaryError::NotFound { .. } => StatusCode::NOT_FOUND,
        BoundaryError::AccessDenied { .. } => StatusCode::FORBIDDEN,
        BoundaryError::TypeMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (code, e.to_string())
}

async fn get_discovery(State(state): State<ApiState>) -> Json<DiscoveryDoc> {
    Json(state.discovery.as_ref().clone())
}

async fn get_nodeset(State(state): State<ApiState>) -> Json<NodeSetDocument> {
    Json(state.nodeset.as_ref().clone())
}

async fn get_var(
    State(state): State<ApiState>,
    Path(path): Path<String>,
) -> Result<Json<VariableDto>, (StatusCode, String)> {
    let space = state.space.read().await;
    let (value, access) = space.read(&path).map_err(reject)?;
    Ok(Json(VariableDto {
        path,
        value,
        access,
    }))
}

async fn put_var(
    State(state): State<ApiState>,
    Path(path): Path<String>,
    Json(req): Json<WriteRequest>,
) -> Result<Json<VariableDto>, (StatusCode, String)> {
    let mut space = state.space.write().await;
    space.write_client(&path, req.value).map_err(reject)?;
    let (value, access) = space.read(&path).map_err(reject)?;
    Ok(Json(VariableDto {
        path,
        value,
        access,
    }))
}

/// Whole-installation snapshot, assembled from the address space in one lock
/// so it reflects a single tick's write phase.
async fn get_system(State(state): State<ApiState>) -> Json<SystemSnapshot> {
    let space = state.space.read().await;

    let system_on = space
        .read(paths::SYSTEM_STATE)
        .ok()
        .and_then(|(value, _)| value.as_bool())
        .unwrap_or(false);

    let mut stations = Vec::with_capacity(state.discovery.stations.len());
    for station in &state.discovery.stations {
        let mut valves = Vec::with_capacity(station.valves.len());
        for valve in &station.valves {
            match read_valve_snapshot(&space, &station.id, &valve.id, &valve.description) {
                Ok(snapshot) => valves.push(snapshot),
                Err(e) => {
                    warn!(station = %station.id, valve = %valve.id, error = %e, "valve status unreadable");
                }
            }
        }
        stations.push(StationSnapshot {
            id: station.id.clone(),
            description: station.description.clone(),
            station_type: station.station_type.clone(),
            valves,
        });
    }

    Json(SystemSnapshot {
        system_on,
        stations,
    })
}

fn read_valve_snapshot(
    space: &crate::addrspace::AddressSpace,
    station_id: &str,
    valve_id: &str,
    description: &str,
) -> Result<ValveSnapshot, BoundaryError> {
    let (irrigating, _) =
        space.read(&paths::valve_status_path(station_id, valve_id, status::IS_IRRIGATING))?;
    let (mode, _) = space.read(&paths::valve_status_path(station_id, valve_id, status::MODE))?;
    let (remaining, _) =
        space.read(&paths::valve_status_path(station_id, valve_id, status::REMAINING_TIME))?;
    let (next_start, _) = space.read(&paths::valve_status_path(
        station_id,
        valve_id,
        status::NEXT_SCHEDULED_START,
    ))?;

    Ok(ValveSnapshot {
        id: valve_id.to_string(),
        description: description.to_string(),
        is_irrigating: irrigating.as_bool().unwrap_or(false),
        mode: mode.as_text().unwrap_or("Off").to_string(),
        remaining_time_s: remaining.as_int().unwrap_or(0).max(0) as u32,
        next_scheduled_start: next_start.as_datetime().flatten(),
    })
}
