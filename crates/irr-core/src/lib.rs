//! irr-core: the valve/station control core.
//!
//! Contains:
//! - valve (irrigation state machine + command intake buffer)
//! - station (ordered valve composition)
//! - system (master switch gating the tick)
//! - error (shared error types)
//!
//! The core is deliberately free of I/O: every operation takes the current
//! time as an argument, and the boundary layer mirrors state in and out of
//! the command buffers once per reconciliation tick.

pub mod error;
pub mod station;
pub mod system;
pub mod valve;

pub use error::{CoreError, CoreResult};
pub use station::{Station, StationType};
pub use system::IrrigationSystem;
pub use valve::{CommandBuffer, Mode, Valve, ValveState};
