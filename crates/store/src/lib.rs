//! SQLite-backed fleet store: mowers and maintenance work orders.
//!
//! One database file with two tables, `mowers` and `work_orders`. All
//! writes re-read the affected row so callers always get the persisted
//! state back.

pub mod types;

pub use types::{
    Mower, MowerStatus, NewWorkOrder, WorkOrder, WorkOrderFilter, WorkOrderPriority,
    WorkOrderStatus,
};

use chrono::Utc;
use greenmow_core::StoreError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

const DEFAULT_WO_LIMIT: i64 = 50;
const MAX_WO_LIMIT: i64 = 200;

/// The fleet backing store.
pub struct FleetStore {
    pool: SqlitePool,
}

impl FleetStore {
    /// Open (or create) the database at `path` and run migrations.
    ///
    /// Pass `":memory:"` for an in-process ephemeral database (useful for
    /// tests).
    pub async fn connect(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("fleet store initialized at {path}");
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS mowers (
                id                TEXT PRIMARY KEY,
                model             TEXT NOT NULL,
                site              TEXT NOT NULL,
                status            TEXT NOT NULL,
                last_service_date TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("mowers table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS work_orders (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                mower_id   TEXT NOT NULL,
                title      TEXT NOT NULL,
                priority   TEXT NOT NULL,
                status     TEXT NOT NULL,
                owner      TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("work_orders table: {e}")))?;

        debug!("fleet store migrations complete");
        Ok(())
    }

    // ---- Mowers ----

    /// List mowers, optionally filtered by status, ordered by id.
    pub async fn list_mowers(
        &self,
        status: Option<MowerStatus>,
    ) -> Result<Vec<Mower>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, model, site, status, last_service_date
            FROM mowers
            WHERE (?1 IS NULL OR status = ?1)
            ORDER BY id
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("list mowers: {e}")))?;

        rows.iter().map(Self::row_to_mower).collect()
    }

    /// Look up a single mower by id.
    pub async fn get_mower(&self, mower_id: &str) -> Result<Option<Mower>, StoreError> {
        let row = sqlx::query(
            "SELECT id, model, site, status, last_service_date FROM mowers WHERE id = ?1",
        )
        .bind(mower_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("get mower: {e}")))?;

        row.as_ref().map(Self::row_to_mower).transpose()
    }

    /// Update a mower's status and return the updated row.
    pub async fn update_mower_status(
        &self,
        mower_id: &str,
        status: MowerStatus,
    ) -> Result<Mower, StoreError> {
        let result = sqlx::query("UPDATE mowers SET status = ?1 WHERE id = ?2")
            .bind(status.as_str())
            .bind(mower_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("update mower: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Mower"));
        }

        self.get_mower(mower_id)
            .await?
            .ok_or(StoreError::NotFound("Mower"))
    }

    /// Insert a mower. Used by seeding and tests.
    pub async fn insert_mower(&self, mower: &Mower) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO mowers (id, model, site, status, last_service_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&mower.id)
        .bind(&mower.model)
        .bind(&mower.site)
        .bind(mower.status.as_str())
        .bind(&mower.last_service_date)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("insert mower: {e}")))?;
        Ok(())
    }

    // ---- Work orders ----

    /// List work orders, newest first. The limit is clamped to 1..=200 and
    /// defaults to 50.
    pub async fn list_work_orders(
        &self,
        filter: &WorkOrderFilter,
    ) -> Result<Vec<WorkOrder>, StoreError> {
        let limit = filter.limit.unwrap_or(DEFAULT_WO_LIMIT).clamp(1, MAX_WO_LIMIT);

        let rows = sqlx::query(
            r#"
            SELECT id, mower_id, title, priority, status, owner, created_at
            FROM work_orders
            WHERE (?1 IS NULL OR status = ?1)
              AND (?2 IS NULL OR priority = ?2)
              AND (?3 IS NULL OR mower_id = ?3)
            ORDER BY id DESC
            LIMIT ?4
            "#,
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.priority.map(|p| p.as_str()))
        .bind(filter.mower_id.as_deref())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("list work orders: {e}")))?;

        rows.iter().map(Self::row_to_work_order).collect()
    }

    /// Create a work order and return the persisted row.
    ///
    /// `mower_id` and `title` must be non-blank and the mower must exist.
    pub async fn create_work_order(&self, new: &NewWorkOrder) -> Result<WorkOrder, StoreError> {
        if new.mower_id.trim().is_empty() {
            return Err(StoreError::Validation("mower_id is required".into()));
        }
        if new.title.trim().is_empty() {
            return Err(StoreError::Validation("title is required".into()));
        }
        if self.get_mower(&new.mower_id).await?.is_none() {
            return Err(StoreError::Validation(format!(
                "Mower not found: {}",
                new.mower_id
            )));
        }

        let priority = new.priority.unwrap_or(WorkOrderPriority::Medium);
        let status = new.status.unwrap_or(WorkOrderStatus::Open);
        let created_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO work_orders (mower_id, title, priority, status, owner, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&new.mower_id)
        .bind(new.title.trim())
        .bind(priority.as_str())
        .bind(status.as_str())
        .bind(&new.owner)
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("create work order: {e}")))?;

        let id = result.last_insert_rowid();
        self.get_work_order(id)
            .await?
            .ok_or(StoreError::NotFound("Work order"))
    }

    /// Look up a single work order by id.
    pub async fn get_work_order(&self, id: i64) -> Result<Option<WorkOrder>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, mower_id, title, priority, status, owner, created_at
            FROM work_orders WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("get work order: {e}")))?;

        row.as_ref().map(Self::row_to_work_order).transpose()
    }

    /// Update a work order's status and return the updated row.
    pub async fn update_work_order_status(
        &self,
        id: i64,
        status: WorkOrderStatus,
    ) -> Result<WorkOrder, StoreError> {
        let result = sqlx::query("UPDATE work_orders SET status = ?1 WHERE id = ?2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("update work order: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Work order"));
        }

        self.get_work_order(id)
            .await?
            .ok_or(StoreError::NotFound("Work order"))
    }

    /// Seed demo fleet data. Idempotent: existing rows are left alone.
    pub async fn seed_demo_data(&self) -> Result<(), StoreError> {
        let mowers = [
            ("GM-A-001", "GreenMow Alpha", "North Campus", MowerStatus::Available, Some("2025-06-12")),
            ("GM-A-002", "GreenMow Alpha", "North Campus", MowerStatus::InService, Some("2025-05-30")),
            ("GM-B-001", "GreenMow Beta", "South Park", MowerStatus::Maintenance, Some("2025-04-18")),
            ("GM-B-002", "GreenMow Beta", "South Park", MowerStatus::Available, None),
            ("GM-C-001", "GreenMow Compact", "City Hall", MowerStatus::OutOfOrder, Some("2025-02-07")),
        ];

        for (id, model, site, status, last_service) in mowers {
            self.insert_mower(&Mower {
                id: id.into(),
                model: model.into(),
                site: site.into(),
                status,
                last_service_date: last_service.map(String::from),
            })
            .await?;
        }
        info!("demo fleet data seeded");
        Ok(())
    }

    // ---- Row mapping ----

    fn row_to_mower(row: &sqlx::sqlite::SqliteRow) -> Result<Mower, StoreError> {
        let status_raw: String = row
            .try_get("status")
            .map_err(|e| StoreError::Storage(format!("status column: {e}")))?;
        Ok(Mower {
            id: row
                .try_get("id")
                .map_err(|e| StoreError::Storage(format!("id column: {e}")))?,
            model: row
                .try_get("model")
                .map_err(|e| StoreError::Storage(format!("model column: {e}")))?,
            site: row
                .try_get("site")
                .map_err(|e| StoreError::Storage(format!("site column: {e}")))?,
            status: MowerStatus::from_str(&status_raw)
                .map_err(|_| StoreError::Storage(format!("bad mower status: {status_raw}")))?,
            last_service_date: row
                .try_get("last_service_date")
                .map_err(|e| StoreError::Storage(format!("last_service_date column: {e}")))?,
        })
    }

    fn row_to_work_order(row: &sqlx::sqlite::SqliteRow) -> Result<WorkOrder, StoreError> {
        let priority_raw: String = row
            .try_get("priority")
            .map_err(|e| StoreError::Storage(format!("priority column: {e}")))?;
        let status_raw: String = row
            .try_get("status")
            .map_err(|e| StoreError::Storage(format!("status column: {e}")))?;
        Ok(WorkOrder {
            id: row
                .try_get("id")
                .map_err(|e| StoreError::Storage(format!("id column: {e}")))?,
            mower_id: row
                .try_get("mower_id")
                .map_err(|e| StoreError::Storage(format!("mower_id column: {e}")))?,
            title: row
                .try_get("title")
                .map_err(|e| StoreError::Storage(format!("title column: {e}")))?,
            priority: WorkOrderPriority::from_str(&priority_raw)
                .map_err(|_| StoreError::Storage(format!("bad priority: {priority_raw}")))?,
            status: WorkOrderStatus::from_str(&status_raw)
                .map_err(|_| StoreError::Storage(format!("bad status: {status_raw}")))?,
            owner: row
                .try_get("owner")
                .map_err(|e| StoreError::Storage(format!("owner column: {e}")))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| StoreError::Storage(format!("created_at column: {e}")))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> FleetStore {
        let store = FleetStore::connect(":memory:").await.unwrap();
        store.seed_demo_data().await.unwrap();
        store
    }

    #[tokio::test]
    async fn list_all_mowers_ordered_by_id() {
        let store = test_store().await;
        let mowers = store.list_mowers(None).await.unwrap();
        assert_eq!(mowers.len(), 5);
        assert_eq!(mowers[0].id, "GM-A-001");
        assert_eq!(mowers[4].id, "GM-C-001");
    }

    #[tokio::test]
    async fn list_mowers_filtered_by_status() {
        let store = test_store().await;
        let available = store
            .list_mowers(Some(MowerStatus::Available))
            .await
            .unwrap();
        assert_eq!(available.len(), 2);
        assert!(available
            .iter()
            .all(|m| m.status == MowerStatus::Available));
    }

    #[tokio::test]
    async fn get_mower_hit_and_miss() {
        let store = test_store().await;
        let mower = store.get_mower("GM-A-001").await.unwrap();
        assert!(mower.is_some());
        assert_eq!(mower.unwrap().model, "GreenMow Alpha");

        assert!(store.get_mower("GM-Z-999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_mower_status_persists() {
        let store = test_store().await;
        let updated = store
            .update_mower_status("GM-A-001", MowerStatus::Maintenance)
            .await
            .unwrap();
        assert_eq!(updated.status, MowerStatus::Maintenance);

        let reread = store.get_mower("GM-A-001").await.unwrap().unwrap();
        assert_eq!(reread.status, MowerStatus::Maintenance);
    }

    #[tokio::test]
    async fn update_missing_mower_is_not_found() {
        let store = test_store().await;
        let err = store
            .update_mower_status("GM-Z-999", MowerStatus::Available)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Mower not found");
    }

    #[tokio::test]
    async fn create_work_order_with_defaults() {
        let store = test_store().await;
        let wo = store
            .create_work_order(&NewWorkOrder {
                mower_id: "GM-A-001".into(),
                title: "  Replace blade  ".into(),
                priority: None,
                status: None,
                owner: None,
            })
            .await
            .unwrap();
        assert_eq!(wo.title, "Replace blade");
        assert_eq!(wo.priority, WorkOrderPriority::Medium);
        assert_eq!(wo.status, WorkOrderStatus::Open);
        assert!(wo.owner.is_none());
        assert!(!wo.created_at.is_empty());
    }

    #[tokio::test]
    async fn create_work_order_requires_fields() {
        let store = test_store().await;
        let err = store
            .create_work_order(&NewWorkOrder {
                mower_id: "  ".into(),
                title: "x".into(),
                priority: None,
                status: None,
                owner: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "mower_id is required");

        let err = store
            .create_work_order(&NewWorkOrder {
                mower_id: "GM-A-001".into(),
                title: "".into(),
                priority: None,
                status: None,
                owner: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "title is required");
    }

    #[tokio::test]
    async fn create_work_order_checks_mower_exists() {
        let store = test_store().await;
        let err = store
            .create_work_order(&NewWorkOrder {
                mower_id: "GM-Z-999".into(),
                title: "Phantom job".into(),
                priority: None,
                status: None,
                owner: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Mower not found: GM-Z-999");
    }

    #[tokio::test]
    async fn list_work_orders_newest_first_with_filters() {
        let store = test_store().await;
        for (mower, title, priority) in [
            ("GM-A-001", "Blade", WorkOrderPriority::High),
            ("GM-A-002", "Battery", WorkOrderPriority::Low),
            ("GM-A-001", "Wheels", WorkOrderPriority::High),
        ] {
            store
                .create_work_order(&NewWorkOrder {
                    mower_id: mower.into(),
                    title: title.into(),
                    priority: Some(priority),
                    status: None,
                    owner: None,
                })
                .await
                .unwrap();
        }

        let all = store
            .list_work_orders(&WorkOrderFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].title, "Wheels");

        let high = store
            .list_work_orders(&WorkOrderFilter {
                priority: Some(WorkOrderPriority::High),
                ..WorkOrderFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(high.len(), 2);

        let for_mower = store
            .list_work_orders(&WorkOrderFilter {
                mower_id: Some("GM-A-002".into()),
                ..WorkOrderFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(for_mower.len(), 1);
        assert_eq!(for_mower[0].title, "Battery");
    }

    #[tokio::test]
    async fn work_order_limit_is_clamped() {
        let store = test_store().await;
        for i in 0..3 {
            store
                .create_work_order(&NewWorkOrder {
                    mower_id: "GM-A-001".into(),
                    title: format!("job {i}"),
                    priority: None,
                    status: None,
                    owner: None,
                })
                .await
                .unwrap();
        }

        let limited = store
            .list_work_orders(&WorkOrderFilter {
                limit: Some(0),
                ..WorkOrderFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);

        let limited = store
            .list_work_orders(&WorkOrderFilter {
                limit: Some(100_000),
                ..WorkOrderFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 3);
    }

    #[tokio::test]
    async fn update_work_order_status_roundtrip() {
        let store = test_store().await;
        let wo = store
            .create_work_order(&NewWorkOrder {
                mower_id: "GM-A-001".into(),
                title: "Blade".into(),
                priority: None,
                status: None,
                owner: Some("karin".into()),
            })
            .await
            .unwrap();

        let updated = store
            .update_work_order_status(wo.id, WorkOrderStatus::Done)
            .await
            .unwrap();
        assert_eq!(updated.status, WorkOrderStatus::Done);
        assert_eq!(updated.owner.as_deref(), Some("karin"));

        let err = store
            .update_work_order_status(99_999, WorkOrderStatus::Done)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Work order not found");
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = test_store().await;
        store.seed_demo_data().await.unwrap();
        assert_eq!(store.list_mowers(None).await.unwrap().len(), 5);
    }
}
