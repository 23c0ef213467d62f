//! Work order tools: list, create, update status.

use async_trait::async_trait;
use greenmow_core::{Tool, ToolError};
use greenmow_store::{
    FleetStore, NewWorkOrder, WorkOrderFilter, WorkOrderPriority, WorkOrderStatus,
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

fn domain_or_fail(
    tool_name: &str,
    err: greenmow_core::StoreError,
) -> Result<serde_json::Value, ToolError> {
    if err.is_domain() {
        Ok(serde_json::json!({ "ok": false, "error": err.to_string() }))
    } else {
        Err(ToolError::ExecutionFailed {
            tool_name: tool_name.into(),
            reason: err.to_string(),
        })
    }
}

pub struct ListWorkOrdersTool {
    store: Arc<FleetStore>,
}

impl ListWorkOrdersTool {
    pub fn new(store: Arc<FleetStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct ListWorkOrdersArgs {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    mower_id: Option<String>,
    #[serde(default)]
    limit: Option<i64>,
}

#[async_trait]
impl Tool for ListWorkOrdersTool {
    fn name(&self) -> &str {
        "list_work_orders"
    }

    fn description(&self) -> &str {
        "List work orders from the internal SQLite database. Optional filters: status, priority, mower_id."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "status": {"type": "string", "description": "Optional. One of: OPEN, IN_PROGRESS, DONE, CANCELLED"},
                "priority": {"type": "string", "description": "Optional. One of: LOW, MEDIUM, HIGH, CRITICAL"},
                "mower_id": {"type": "string", "description": "Optional. Mower id, e.g. GM-A-001"},
                "limit": {"type": "integer", "description": "Optional. Max results (1..200). Default 50."}
            },
            "required": []
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let args: ListWorkOrdersArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let status = match args.status.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => match WorkOrderStatus::from_str(raw) {
                Ok(status) => Some(status),
                Err(e) => return Ok(serde_json::json!({ "error": e.to_string() })),
            },
            None => None,
        };
        let priority = match args.priority.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => match WorkOrderPriority::from_str(raw) {
                Ok(priority) => Some(priority),
                Err(e) => return Ok(serde_json::json!({ "error": e.to_string() })),
            },
            None => None,
        };

        let filter = WorkOrderFilter {
            status,
            priority,
            mower_id: args.mower_id.filter(|s| !s.is_empty()),
            limit: args.limit,
        };

        match self.store.list_work_orders(&filter).await {
            Ok(work_orders) => Ok(serde_json::json!({ "work_orders": work_orders })),
            Err(e) => domain_or_fail(self.name(), e),
        }
    }
}

pub struct CreateWorkOrderTool {
    store: Arc<FleetStore>,
}

impl CreateWorkOrderTool {
    pub fn new(store: Arc<FleetStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct CreateWorkOrderArgs {
    #[serde(default)]
    mower_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    owner: Option<String>,
}

#[async_trait]
impl Tool for CreateWorkOrderTool {
    fn name(&self) -> &str {
        "create_work_order"
    }

    fn description(&self) -> &str {
        "Create a new work order for a mower."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "mower_id": {"type": "string", "description": "Mower id, e.g. GM-A-001"},
                "title": {"type": "string", "description": "Short title of the work order"},
                "priority": {"type": "string", "description": "LOW, MEDIUM, HIGH, CRITICAL (default MEDIUM)"},
                "status": {"type": "string", "description": "OPEN, IN_PROGRESS, DONE, CANCELLED (default OPEN)"},
                "owner": {"type": "string", "description": "Optional owner / assignee"}
            },
            "required": ["mower_id", "title"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let args: CreateWorkOrderArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let priority = match args.priority.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => match WorkOrderPriority::from_str(raw) {
                Ok(priority) => Some(priority),
                Err(e) => {
                    return Ok(serde_json::json!({ "ok": false, "error": e.to_string() }));
                }
            },
            None => None,
        };
        let status = match args.status.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => match WorkOrderStatus::from_str(raw) {
                Ok(status) => Some(status),
                Err(e) => {
                    return Ok(serde_json::json!({ "ok": false, "error": e.to_string() }));
                }
            },
            None => None,
        };

        let new = NewWorkOrder {
            mower_id: args.mower_id,
            title: args.title,
            priority,
            status,
            owner: args.owner,
        };

        debug!(mower_id = %new.mower_id, title = %new.title, "creating work order");
        match self.store.create_work_order(&new).await {
            Ok(wo) => Ok(serde_json::json!({ "ok": true, "work_order": wo })),
            Err(e) => domain_or_fail(self.name(), e),
        }
    }
}

pub struct UpdateWorkOrderStatusTool {
    store: Arc<FleetStore>,
}

impl UpdateWorkOrderStatusTool {
    pub fn new(store: Arc<FleetStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct UpdateWorkOrderStatusArgs {
    work_order_id: i64,
    status: String,
}

#[async_trait]
impl Tool for UpdateWorkOrderStatusTool {
    fn name(&self) -> &str {
        "update_work_order_status"
    }

    fn description(&self) -> &str {
        "Update the status of an existing work order."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "work_order_id": {"type": "integer", "description": "Work order id (integer)"},
                "status": {"type": "string", "description": "OPEN, IN_PROGRESS, DONE, CANCELLED"}
            },
            "required": ["work_order_id", "status"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let args: UpdateWorkOrderStatusArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let status = match WorkOrderStatus::from_str(&args.status) {
            Ok(status) => status,
            Err(e) => {
                return Ok(serde_json::json!({ "ok": false, "error": e.to_string() }));
            }
        };

        debug!(
            work_order_id = args.work_order_id,
            status = status.as_str(),
            "updating work order status"
        );
        match self
            .store
            .update_work_order_status(args.work_order_id, status)
            .await
        {
            Ok(wo) => Ok(serde_json::json!({ "ok": true, "work_order": wo })),
            Err(e) => domain_or_fail(self.name(), e),
        }
    }
}
