//! Fleet database tools exposed to the model.
//!
//! Six tools over the fleet store: three for mowers, three for work
//! orders. Domain failures (bad status values, missing rows) come back as
//! JSON payloads the model can read and recover from; only storage faults
//! surface as tool errors.

mod mowers;
mod work_orders;

pub use mowers::{GetMowerTool, ListMowersTool, UpdateMowerStatusTool};
pub use work_orders::{CreateWorkOrderTool, ListWorkOrdersTool, UpdateWorkOrderStatusTool};

use greenmow_core::ToolRegistry;
use greenmow_store::FleetStore;
use std::sync::Arc;

/// Build the registry with all six fleet tools wired to `store`.
pub fn fleet_registry(store: Arc<FleetStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(ListMowersTool::new(store.clone())));
    registry.register(Box::new(GetMowerTool::new(store.clone())));
    registry.register(Box::new(UpdateMowerStatusTool::new(store.clone())));
    registry.register(Box::new(ListWorkOrdersTool::new(store.clone())));
    registry.register(Box::new(CreateWorkOrderTool::new(store.clone())));
    registry.register(Box::new(UpdateWorkOrderStatusTool::new(store)));
    registry
}
