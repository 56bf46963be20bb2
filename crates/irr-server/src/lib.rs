//! irr-server: the boundary host.
//!
//! Owns the server-side address space (the variable tree remote clients read
//! and write), the reconciliation loop that is the only component moving
//! values between the boundary and the control core, and the HTTP API that
//! exposes the variables, discovery metadata and the nodeset export.

pub mod addrspace;
pub mod api;
pub mod compile;
pub mod config;
pub mod error;
pub mod recon;

pub use addrspace::{AddressSpace, BoundaryError, SharedAddressSpace};
pub use api::{router, ApiState};
pub use compile::{compile_installation, SystemRuntime};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
