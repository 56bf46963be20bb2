//! Installation validation logic.

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::schema::{Installation, LATEST_VERSION};

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Duplicate station id: {id}")]
    DuplicateStationId { id: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Installation must define at least one station")]
    NoStations,
}

pub fn validate_installation(installation: &Installation) -> Result<(), ValidationError> {
    if installation.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: installation.version,
        });
    }

    if installation.stations.is_empty() {
        return Err(ValidationError::NoStations);
    }

    let mut ids = HashSet::new();
    for station in &installation.stations {
        if station.id.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "station.id".into(),
                value: String::new(),
                reason: "must not be empty".into(),
            });
        }
        if !ids.insert(&station.id) {
            return Err(ValidationError::DuplicateStationId {
                id: station.id.clone(),
            });
        }
        if station.valve_count == 0 {
            return Err(ValidationError::InvalidValue {
                field: format!("station '{}' valve_count", station.id),
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
    }

    if installation.server.update_interval_s == 0 {
        return Err(ValidationError::InvalidValue {
            field: "server.update_interval_s".into(),
            value: "0".into(),
            reason: "must be at least 1".into(),
        });
    }

    if installation.server.listen.parse::<SocketAddr>().is_err() {
        return Err(ValidationError::InvalidValue {
            field: "server.listen".into(),
            value: installation.server.listen.clone(),
            reason: "must be a socket address".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ServerDef, StationDef};

    fn demo() -> Installation {
        Installation::demo()
    }

    #[test]
    fn demo_installation_is_valid() {
        assert!(validate_installation(&demo()).is_ok());
    }

    #[test]
    fn rejects_future_version() {
        let mut installation = demo();
        installation.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_installation(&installation),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_station_ids() {
        let mut installation = demo();
        installation.stations.push(StationDef {
            id: "Station1".into(),
            description: "dup".into(),
            valve_count: 1,
        });
        assert!(matches!(
            validate_installation(&installation),
            Err(ValidationError::DuplicateStationId { .. })
        ));
    }

    #[test]
    fn rejects_zero_valve_count() {
        let mut installation = demo();
        installation.stations[0].valve_count = 0;
        assert!(matches!(
            validate_installation(&installation),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_empty_station_list() {
        let mut installation = demo();
        installation.stations.clear();
        assert!(matches!(
            validate_installation(&installation),
            Err(ValidationError::NoStations)
        ));
    }

    #[test]
    fn rejects_bad_listen_address_and_interval() {
        let mut installation = demo();
        installation.server = ServerDef {
            listen: "not-an-address".into(),
            ..ServerDef::default()
        };
        assert!(matches!(
            validate_installation(&installation),
            Err(ValidationError::InvalidValue { .. })
        ));

        let mut installation = demo();
        installation.server.update_interval_s = 0;
        assert!(matches!(
            validate_installation(&installation),
            Err(ValidationError::InvalidValue { .. })
        ));
    }
}
