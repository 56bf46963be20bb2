//! Variable names and path construction.
//!
//! Paths are slash-separated, rooted at the system object:
//! `Controller/SystemState`, `Stations/Station1/StationInfo/ValveCount`,
//! `Stations/Station1/Valve2/Status/Mode`.

/// Master switch variable.
pub const SYSTEM_STATE: &str = "Controller/SystemState";

/// Per-valve status variable names (server-authoritative).
pub mod status {
    pub const IS_IRRIGATING: &str = "IsIrrigating";
    pub const MODE: &str = "Mode";
    pub const REMAINING_TIME: &str = "RemainingTime";
    pub const NEXT_SCHEDULED_START: &str = "NextScheduledStart";
}

/// Per-valve command variable names (client-writable, edge-triggered flags).
pub mod command {
    pub const DURATION: &str = "CommandDuration";
    pub const START: &str = "CommandStart";
    pub const STOP: &str = "CommandStop";
    pub const SCHEDULE_AT: &str = "CommandScheduleAt";
}

/// Station metadata variable names (static).
pub mod station_info {
    pub const STATION_ID: &str = "StationId";
    pub const DESCRIPTION: &str = "Description";
    pub const STATION_TYPE: &str = "StationType";
    pub const VALVE_COUNT: &str = "ValveCount";
}

pub fn station_info_path(station_id: &str, name: &str) -> String {
    format!("Stations/{station_id}/StationInfo/{name}")
}

pub fn valve_description_path(station_id: &str, valve_id: &str) -> String {
    format!("Stations/{station_id}/{valve_id}/Description")
}

pub fn valve_status_path(station_id: &str, valve_id: &str, name: &str) -> String {
    format!("Stations/{station_id}/{valve_id}/Status/{name}")
}

pub fn valve_command_path(station_id: &str, valve_id: &str, name: &str) -> String {
    format!("Stations/{station_id}/{valve_id}/Commands/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_match_the_documented_layout() {
        assert_eq!(SYSTEM_STATE, "Controller/SystemState");
        assert_eq!(
            valve_status_path("Station1", "Valve2", status::MODE),
            "Stations/Station1/Valve2/Status/Mode"
        );
        assert_eq!(
            valve_command_path("Station3", "Valve1", command::START),
            "Stations/Station3/Valve1/Commands/CommandStart"
        );
        assert_eq!(
            station_info_path("Station2", station_info::VALVE_COUNT),
            "Stations/Station2/StationInfo/ValveCount"
        );
    }
}
