//! The boundary client.

use chrono::{DateTime, Utc};
use irr_boundary::paths::{self, command, status};
use irr_boundary::{
    check_expected, DiscoveryDoc, NodeSetDocument, SystemSnapshot, TopologyReport, Value,
    ValveSnapshot, VariableDto, WriteRequest,
};
use irr_project::Installation;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Client handle for one server, with the discovered topology cached.
pub struct BoundaryClient {
    http: reqwest::Client,
    base_url: String,
    discovery: DiscoveryDoc,
}

impl BoundaryClient {
    /// Connect to a server and fetch its discovery document.
    ///
    /// Connection failures and malformed discovery responses are fatal here;
    /// per-variable problems later are returned per call.
    pub async fn connect(base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::new();
        let discovery: DiscoveryDoc = http
            .get(format!("{base_url}/v1/discovery"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(namespace = %discovery.namespace_uri, stations = discovery.stations.len(), "connected");
        Ok(Self {
            http,
            base_url,
            discovery,
        })
    }

    pub fn discovery(&self) -> &DiscoveryDoc {
        &self.discovery
    }

    /// Check the discovered topology against an expected installation,
    /// reporting every found and missing path explicitly.
    pub fn check_topology(&self, expected: &Installation) -> TopologyReport {
        check_expected(&self.discovery, expected)
    }

    /// Read one boundary variable.
    pub async fn read_var(&self, path: &str) -> ClientResult<VariableDto> {
        let resp = self
            .http
            .get(format!("{}/v1/vars/{}", self.base_url, path))
            .send()
            .await?;
        Self::check_status(path, &resp)?;
        Ok(resp.json().await?)
    }

    /// Write one client-writable boundary variable.
    pub async fn write_var(&self, path: &str, value: Value) -> ClientResult<()> {
        let resp = self
            .http
            .put(format!("{}/v1/vars/{}", self.base_url, path))
            .json(&WriteRequest { value })
            .send()
            .await?;
        Self::check_status(path, &resp)?;
        Ok(())
    }

    pub async fn system_state(&self) -> ClientResult<bool> {
        let var = self.read_var(paths::SYSTEM_STATE).await?;
        var.value
            .as_bool()
            .ok_or_else(|| ClientError::UnexpectedType {
                path: paths::SYSTEM_STATE.to_string(),
            })
    }

    pub async fn set_system_state(&self, on: bool) -> ClientResult<()> {
        self.write_var(paths::SYSTEM_STATE, Value::Bool(on)).await
    }

    /// Request a manual run: write the duration, then flip the start flag.
    ///
    /// The server consumes the request on its next tick; a valve already
    /// running drops it silently, observable only through `IsIrrigating`.
    pub async fn start_irrigation(&self, valve: &str, duration_s: u32) -> ClientResult<()> {
        let (sid, vid) = self.resolve(valve)?;
        self.write_var(
            &paths::valve_command_path(&sid, &vid, command::DURATION),
            Value::Int(i64::from(duration_s)),
        )
        .await?;
        self.write_var(
            &paths::valve_command_path(&sid, &vid, command::START),
            Value::Bool(true),
        )
        .await
    }

    /// Request a stop by flipping the stop flag.
    pub async fn stop_irrigation(&self, valve: &str) -> ClientResult<()> {
        let (sid, vid) = self.resolve(valve)?;
        self.write_var(
            &paths::valve_command_path(&sid, &vid, command::STOP),
            Value::Bool(true),
        )
        .await
    }

    /// Arm a scheduled run: write the duration, then the start time.
    pub async fn schedule_irrigation(
        &self,
        valve: &str,
        at: DateTime<Utc>,
        duration_s: u32,
    ) -> ClientResult<()> {
        let (sid, vid) = self.resolve(valve)?;
        self.write_var(
            &paths::valve_command_path(&sid, &vid, command::DURATION),
            Value::Int(i64::from(duration_s)),
        )
        .await?;
        self.write_var(
            &paths::valve_command_path(&sid, &vid, command::SCHEDULE_AT),
            Value::DateTime(Some(at)),
        )
        .await
    }

    /// Read one valve's status block.
    pub async fn valve_status(&self, valve: &str) -> ClientResult<ValveSnapshot> {
        let (sid, vid) = self.resolve(valve)?;
        let description = self
            .discovery
            .stations
            .iter()
            .find(|s| s.id == sid)
            .and_then(|s| s.valves.iter().find(|v| v.id == vid))
            .map(|v| v.description.clone())
            .unwrap_or_default();

        let irrigating = self
            .read_var(&paths::valve_status_path(&sid, &vid, status::IS_IRRIGATING))
            .await?;
        let mode = self
            .read_var(&paths::valve_status_path(&sid, &vid, status::MODE))
            .await?;
        let remaining = self
            .read_var(&paths::valve_status_path(&sid, &vid, status::REMAINING_TIME))
            .await?;
        let next_start = self
            .read_var(&paths::valve_status_path(
                &sid,
                &vid,
                status::NEXT_SCHEDULED_START,
            ))
            .await?;

        Ok(ValveSnapshot {
            id: vid,
            description,
            is_irrigating: irrigating.value.as_bool().unwrap_or(false),
            mode: mode.value.as_text().unwrap_or("Off").to_string(),
            remaining_time_s: remaining.value.as_int().unwrap_or(0).max(0) as u32,
            next_scheduled_start: next_start.value.as_datetime().flatten(),
        })
    }

    /// One-shot snapshot of the whole installation.
    pub async fn snapshot(&self) -> ClientResult<SystemSnapshot> {
        Ok(self
            .http
            .get(format!("{}/v1/system", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    /// Fetch the server's nodeset export document.
    pub async fn nodeset(&self) -> ClientResult<NodeSetDocument> {
        Ok(self
            .http
            .get(format!("{}/v1/nodeset", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    /// Split a qualified `Station1_Valve2` id and check it against discovery.
    fn resolve(&self, valve: &str) -> ClientResult<(String, String)> {
        let (sid, vid) = valve
            .split_once('_')
            .ok_or_else(|| ClientError::ValveNotFound(valve.to_string()))?;
        let known = self
            .discovery
            .stations
            .iter()
            .find(|s| s.id == sid)
            .is_some_and(|s| s.valves.iter().any(|v| v.id == vid));
        if !known {
            return Err(ClientError::ValveNotFound(valve.to_string()));
        }
        Ok((sid.to_string(), vid.to_string()))
    }

    fn check_status(path: &str, resp: &reqwest::Response) -> ClientResult<()> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ClientError::Rejected {
                path: path.to_string(),
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("").to_string(),
            })
        }
    }
}
