//! Fleet domain types: mowers, work orders, and their status vocabularies.
//!
//! The status enums are the single source of truth for allowed values;
//! parsing a caller-supplied string produces the model-facing validation
//! message listing what is allowed.

use greenmow_core::StoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Operational status of a mower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MowerStatus {
    Available,
    InService,
    Maintenance,
    OutOfOrder,
}

impl MowerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MowerStatus::Available => "AVAILABLE",
            MowerStatus::InService => "IN_SERVICE",
            MowerStatus::Maintenance => "MAINTENANCE",
            MowerStatus::OutOfOrder => "OUT_OF_ORDER",
        }
    }
}

impl FromStr for MowerStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(MowerStatus::Available),
            "IN_SERVICE" => Ok(MowerStatus::InService),
            "MAINTENANCE" => Ok(MowerStatus::Maintenance),
            "OUT_OF_ORDER" => Ok(MowerStatus::OutOfOrder),
            _ => Err(StoreError::Validation(
                "Invalid status. Allowed: AVAILABLE, IN_SERVICE, MAINTENANCE, OUT_OF_ORDER"
                    .into(),
            )),
        }
    }
}

/// Priority of a work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkOrderPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl WorkOrderPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderPriority::Low => "LOW",
            WorkOrderPriority::Medium => "MEDIUM",
            WorkOrderPriority::High => "HIGH",
            WorkOrderPriority::Critical => "CRITICAL",
        }
    }
}

impl FromStr for WorkOrderPriority {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(WorkOrderPriority::Low),
            "MEDIUM" => Ok(WorkOrderPriority::Medium),
            "HIGH" => Ok(WorkOrderPriority::High),
            "CRITICAL" => Ok(WorkOrderPriority::Critical),
            _ => Err(StoreError::Validation(
                "Invalid work order priority. Allowed: CRITICAL, HIGH, LOW, MEDIUM".into(),
            )),
        }
    }
}

/// Lifecycle status of a work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkOrderStatus {
    Open,
    InProgress,
    Done,
    Cancelled,
}

impl WorkOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::Open => "OPEN",
            WorkOrderStatus::InProgress => "IN_PROGRESS",
            WorkOrderStatus::Done => "DONE",
            WorkOrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for WorkOrderStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(WorkOrderStatus::Open),
            "IN_PROGRESS" => Ok(WorkOrderStatus::InProgress),
            "DONE" => Ok(WorkOrderStatus::Done),
            "CANCELLED" => Ok(WorkOrderStatus::Cancelled),
            _ => Err(StoreError::Validation(
                "Invalid work order status. Allowed: CANCELLED, DONE, IN_PROGRESS, OPEN".into(),
            )),
        }
    }
}

/// A mower in the fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mower {
    pub id: String,
    pub model: String,
    pub site: String,
    pub status: MowerStatus,
    pub last_service_date: Option<String>,
}

/// A maintenance work order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: i64,
    pub mower_id: String,
    pub title: String,
    pub priority: WorkOrderPriority,
    pub status: WorkOrderStatus,
    pub owner: Option<String>,
    pub created_at: String,
}

/// Filters for listing work orders.
#[derive(Debug, Clone, Default)]
pub struct WorkOrderFilter {
    pub status: Option<WorkOrderStatus>,
    pub priority: Option<WorkOrderPriority>,
    pub mower_id: Option<String>,
    pub limit: Option<i64>,
}

/// Input for creating a work order. Priority and status fall back to
/// MEDIUM / OPEN when unset.
#[derive(Debug, Clone)]
pub struct NewWorkOrder {
    pub mower_id: String,
    pub title: String,
    pub priority: Option<WorkOrderPriority>,
    pub status: Option<WorkOrderStatus>,
    pub owner: Option<String>,
}
