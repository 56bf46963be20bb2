//! Turn a validated installation into the server's runtime pieces.

use irr_boundary::{discovery_from_installation, DiscoveryDoc, NodeSetDocument};
use irr_core::{IrrigationSystem, Station};
use irr_project::Installation;

use crate::addrspace::AddressSpace;
use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Everything the daemon needs, built once at startup.
///
/// The model is handed to the reconciliation task; the address space and the
/// static documents go to the API state. There is no process-wide instance:
/// tests build as many runtimes as they like.
pub struct SystemRuntime {
    pub config: ServerConfig,
    pub system: IrrigationSystem,
    pub space: AddressSpace,
    pub discovery: DiscoveryDoc,
    pub nodeset: NodeSetDocument,
}

/// Build the control model, address space and static documents.
pub fn compile_installation(installation: &Installation) -> ServerResult<SystemRuntime> {
    let config = ServerConfig::from_installation(installation)?;

    let stations = installation
        .stations
        .iter()
        .map(|def| Station::new(def.id.clone(), def.description.clone(), def.valve_count))
        .collect::<Result<Vec<_>, _>>()?;
    let system = IrrigationSystem::new(stations)?;

    let space = AddressSpace::for_installation(installation);
    let discovery = discovery_from_installation(installation);
    let nodeset = NodeSetDocument::from_discovery(&discovery);

    Ok(SystemRuntime {
        config,
        system,
        space,
        discovery,
        nodeset,
    })
}
