//! Mower tools: list, get, update status.

use async_trait::async_trait;
use greenmow_core::{Tool, ToolError};
use greenmow_store::{FleetStore, MowerStatus};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Map a store failure to a tool outcome.
///
/// Domain failures become an `{"ok": false, "error": ...}` payload the
/// model can read; storage faults abort the tool.
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

pub struct ListMowersTool {
    store: Arc<FleetStore>,
}

impl ListMowersTool {
    pub fn new(store: Arc<FleetStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct ListMowersArgs {
    #[serde(default)]
    status: Option<String>,
}

#[async_trait]
impl Tool for ListMowersTool {
    fn name(&self) -> &str {
        "list_mowers"
    }

    fn description(&self) -> &str {
        "List mowers from the internal SQLite database. Optionally filter by status."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "status": {
                    "type": "string",
                    "description": "Optional. One of: AVAILABLE, IN_SERVICE, MAINTENANCE, OUT_OF_ORDER"
                }
            },
            "required": []
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let args: ListMowersArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let status = match args.status.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => match MowerStatus::from_str(raw) {
                Ok(status) => Some(status),
                Err(e) => return Ok(serde_json::json!({ "error": e.to_string() })),
            },
            None => None,
        };

        match self.store.list_mowers(status).await {
            Ok(mowers) => Ok(serde_json::json!({ "mowers": mowers })),
            Err(e) => domain_or_fail(self.name(), e),
        }
    }
}

pub struct GetMowerTool {
    store: Arc<FleetStore>,
}

impl GetMowerTool {
    pub fn new(store: Arc<FleetStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct GetMowerArgs {
    mower_id: String,
}

#[async_trait]
impl Tool for GetMowerTool {
    fn name(&self) -> &str {
        "get_mower"
    }

    fn description(&self) -> &str {
        "Get details for a mower by id from the internal SQLite database."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "mower_id": {"type": "string", "description": "Mower id, e.g. GM-A-001"}
            },
            "required": ["mower_id"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let args: GetMowerArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        match self.store.get_mower(&args.mower_id).await {
            Ok(mower) => {
                let found = mower.is_some();
                Ok(serde_json::json!({ "mower": mower, "found": found }))
            }
            Err(e) => domain_or_fail(self.name(), e),
        }
    }
}

pub struct UpdateMowerStatusTool {
    store: Arc<FleetStore>,
}

impl UpdateMowerStatusTool {
    pub fn new(store: Arc<FleetStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct UpdateMowerStatusArgs {
    mower_id: String,
    status: String,
}

#[async_trait]
impl Tool for UpdateMowerStatusTool {
    fn name(&self) -> &str {
        "update_mower_status"
    }

    fn description(&self) -> &str {
        "Update a mower status in the internal SQLite database."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "mower_id": {"type": "string", "description": "Mower id, e.g. GM-A-001"},
                "status": {
                    "type": "string",
                    "description": "New status: AVAILABLE, IN_SERVICE, MAINTENANCE, OUT_OF_ORDER"
                }
            },
            "required": ["mower_id", "status"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let args: UpdateMowerStatusArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let status = match MowerStatus::from_str(&args.status) {
            Ok(status) => status,
            Err(e) => {
                return Ok(serde_json::json!({ "ok": false, "error": e.to_string() }));
            }
        };

        debug!(mower_id = %args.mower_id, status = status.as_str(), "updating mower status");
        match self.store.update_mower_status(&args.mower_id, status).await {
            Ok(mower) => Ok(serde_json::json!({ "ok": true, "mower": mower })),
            Err(e) => domain_or_fail(self.name(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_store() -> Arc<FleetStore> {
        let store = FleetStore::connect(":memory:").await.unwrap();
        store.seed_demo_data().await.unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn list_mowers_returns_all() {
        let tool = ListMowersTool::new(seeded_store().await);
        let out = tool.execute(serde_json::json!({})).await.unwrap();
        assert_eq!(out["mowers"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn list_mowers_filters_by_status() {
        let tool = ListMowersTool::new(seeded_store().await);
        let out = tool
            .execute(serde_json::json!({"status": "AVAILABLE"}))
            .await
            .unwrap();
        let mowers = out["mowers"].as_array().unwrap();
        assert_eq!(mowers.len(), 2);
        assert!(mowers.iter().all(|m| m["status"] == "AVAILABLE"));
    }

    #[tokio::test]
    async fn list_mowers_invalid_status_is_payload_error() {
        let tool = ListMowersTool::new(seeded_store().await);
        let out = tool
            .execute(serde_json::json!({"status": "BROKEN"}))
            .await
            .unwrap();
        assert!(out["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid status"));
    }

    #[tokio::test]
    async fn get_mower_found_and_missing() {
        let tool = GetMowerTool::new(seeded_store().await);

        let out = tool
            .execute(serde_json::json!({"mower_id": "GM-A-001"}))
            .await
            .unwrap();
        assert_eq!(out["found"], true);
        assert_eq!(out["mower"]["id"], "GM-A-001");

        let out = tool
            .execute(serde_json::json!({"mower_id": "GM-Z-999"}))
            .await
            .unwrap();
        assert_eq!(out["found"], false);
        assert!(out["mower"].is_null());
    }

    #[tokio::test]
    async fn get_mower_missing_argument_is_invalid() {
        let tool = GetMowerTool::new(seeded_store().await);
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn update_mower_status_success() {
        let store = seeded_store().await;
        let tool = UpdateMowerStatusTool::new(store.clone());
        let out = tool
            .execute(serde_json::json!({"mower_id": "GM-A-001", "status": "MAINTENANCE"}))
            .await
            .unwrap();
        assert_eq!(out["ok"], true);
        assert_eq!(out["mower"]["status"], "MAINTENANCE");

        let mower = store.get_mower("GM-A-001").await.unwrap().unwrap();
        assert_eq!(mower.status, MowerStatus::Maintenance);
    }

    #[tokio::test]
    async fn update_mower_status_invalid_and_missing() {
        let tool = UpdateMowerStatusTool::new(seeded_store().await);

        let out = tool
            .execute(serde_json::json!({"mower_id": "GM-A-001", "status": "EXPLODED"}))
            .await
            .unwrap();
        assert_eq!(out["ok"], false);
        assert!(out["error"].as_str().unwrap().starts_with("Invalid status"));

        let out = tool
            .execute(serde_json::json!({"mower_id": "GM-Z-999", "status": "AVAILABLE"}))
            .await
            .unwrap();
        assert_eq!(out["ok"], false);
        assert_eq!(out["error"], "Mower not found");
    }
}
