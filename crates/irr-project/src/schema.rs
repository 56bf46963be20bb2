//! Installation schema definitions.

use serde::{Deserialize, Serialize};

/// Latest supported installation file version.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Installation {
    pub version: u32,
    #[serde(default)]
    pub server: ServerDef,
    #[serde(default)]
    pub stations: Vec<StationDef>,
}

/// Server runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerDef {
    /// Socket address the HTTP boundary listens on.
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Namespace URI advertised in discovery and nodeset export.
    #[serde(default = "default_namespace_uri")]
    pub namespace_uri: String,
    /// Reconciliation interval in seconds.
    #[serde(default = "default_update_interval_s")]
    pub update_interval_s: u64,
}

impl Default for ServerDef {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            namespace_uri: default_namespace_uri(),
            update_interval_s: default_update_interval_s(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationDef {
    pub id: String,
    pub description: String,
    pub valve_count: usize,
}

fn default_listen() -> String {
    "127.0.0.1:4840".to_string()
}

fn default_namespace_uri() -> String {
    "urn:irriflow:irrigation".to_string()
}

fn default_update_interval_s() -> u64 {
    1
}

impl Installation {
    /// The default three-station demo installation.
    pub fn demo() -> Self {
        Self {
            version: LATEST_VERSION,
            server: ServerDef::default(),
            stations: vec![
                StationDef {
                    id: "Station1".into(),
                    description: "Front Garden".into(),
                    valve_count: 2,
                },
                StationDef {
                    id: "Station2".into(),
                    description: "Side Beds".into(),
                    valve_count: 1,
                },
                StationDef {
                    id: "Station3".into(),
                    description: "Back Garden".into(),
                    valve_count: 2,
                },
            ],
        }
    }
}
