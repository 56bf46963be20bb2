//! Console status board rendering for the monitor command.

use std::io::{self, Write};

use irr_boundary::SystemSnapshot;

const BLUE: &str = "\x1b[94m";
const YELLOW: &str = "\x1b[93m";
const GREY: &str = "\x1b[90m";
const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

pub fn clear_screen() {
    print!("\x1b[2J\x1b[1;1H");
    let _ = io::stdout().flush();
}

/// Seconds as mm:ss.
pub fn format_mmss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Render the whole installation as a colored board.
pub fn render(snapshot: &SystemSnapshot) -> String {
    let mut out = String::new();
    let rule = "=".repeat(72);

    out.push_str(&rule);
    out.push_str("\n                    IRRIFLOW IRRIGATION SYSTEM\n");
    out.push_str(&rule);
    out.push('\n');

    let system = if snapshot.system_on {
        format!("{GREEN}ON{RESET}")
    } else {
        format!("{RED}OFF{RESET}")
    };
    out.push_str(&format!("System: {system}\n\n"));

    for station in &snapshot.stations {
        out.push_str(&format!(
            "{} - {} ({}, {} valves)\n",
            station.id,
            station.description,
            station.station_type,
            station.valves.len()
        ));
        out.push_str(&format!("{}\n", "-".repeat(64)));

        for valve in &station.valves {
            let (color, state) = if valve.is_irrigating {
                (BLUE, "RUNNING")
            } else if valve.next_scheduled_start.is_some() {
                (YELLOW, "SCHEDULED")
            } else {
                (GREY, "IDLE")
            };

            out.push_str(&format!(
                "  {color}{}: {state}{RESET}  {}\n",
                valve.id, valve.description
            ));
            out.push_str(&format!("      Mode: {}\n", valve.mode));
            if valve.is_irrigating {
                out.push_str(&format!(
                    "      Remaining: {}\n",
                    format_mmss(valve.remaining_time_s)
                ));
            }
            if let Some(at) = valve.next_scheduled_start {
                out.push_str(&format!(
                    "      Next start: {}\n",
                    at.format("%Y-%m-%d %H:%M:%S UTC")
                ));
            }
        }
        out.push('\n');
    }

    out.push_str(&rule);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use irr_boundary::{StationSnapshot, ValveSnapshot};

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(61), "01:01");
        assert_eq!(format_mmss(3600), "60:00");
    }

    #[test]
    fn render_shows_states_and_countdown() {
        let snapshot = SystemSnapshot {
            system_on: true,
            stations: vec![StationSnapshot {
                id: "Station1".into(),
                description: "Front Garden".into(),
                station_type: "DoubleValve".into(),
                valves: vec![
                    ValveSnapshot {
                        id: "Valve1".into(),
                        description: "Front Garden - Valve 1".into(),
                        is_irrigating: true,
                        mode: "Manual".into(),
                        remaining_time_s: 75,
                        next_scheduled_start: None,
                    },
                    ValveSnapshot {
                        id: "Valve2".into(),
                        description: "Front Garden - Valve 2".into(),
                        is_irrigating: false,
                        mode: "Off".into(),
                        remaining_time_s: 0,
                        next_scheduled_start: None,
                    },
                ],
            }],
        };

        let board = render(&snapshot);
        assert!(board.contains("RUNNING"));
        assert!(board.contains("01:15"));
        assert!(board.contains("IDLE"));
        assert!(board.contains("Front Garden - Valve 2"));
    }
}
