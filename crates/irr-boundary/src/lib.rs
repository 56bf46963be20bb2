//! irr-boundary: the shared boundary contract between server and clients.
//!
//! The boundary is a tree of named, typed variables. Clients request state
//! transitions by writing command variables and flipping an edge-triggered
//! flag; the server mirrors status back and clears the flag once the command
//! has been taken in. This polled variable protocol is the documented
//! external interface — not an implementation accident — so the paths,
//! variable names, value types and access classes all live here, shared by
//! the server's address space and the client library.

pub mod dto;
pub mod nodeset;
pub mod paths;
pub mod value;

pub use dto::{
    check_expected, discovery_from_installation, DiscoveryDoc, StationInfo, StationSnapshot,
    SystemSnapshot, TopologyReport, ValveInfo, ValveSnapshot, VariableDto, WriteRequest,
};
pub use nodeset::{InstanceNode, NodeSetDocument, ObjectTypeDef, VariableDecl};
pub use value::{AccessClass, Value, ValueKind};
