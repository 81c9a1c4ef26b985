//! Storage traits and their implementations.
//!
//! Handlers depend on these traits only. The gate supplies a
//! [`VisibilityScope`](assetforge_auth::VisibilityScope) decision; the store
//! executes the correspondingly filtered query, never the other way around.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use assetforge_auth::VisibilityScope;
use assetforge_core::{AssetId, CategoryId, DepartmentId, UserId};

use crate::error::StoreError;
use crate::records::{
    AssetChanges, AssetRecord, CategoryChanges, CategoryRecord, Credentials, DashboardStats,
    DepartmentChanges, DepartmentRecord, NewAsset, NewUser, OwnerAssetStats, UserChanges,
    UserRecord,
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, new: NewUser) -> Result<UserRecord, StoreError>;
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError>;
    async fn get(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;
    /// Lookup for login. `email` is expected pre-normalized (trimmed,
    /// lowercased).
    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, StoreError>;
    async fn update(&self, id: UserId, changes: UserChanges)
    -> Result<Option<UserRecord>, StoreError>;
    async fn delete(&self, id: UserId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Create an asset owned by `created_by`. The owner always comes from the
    /// requester's claims; any client-supplied owner value was discarded
    /// upstream.
    async fn create(&self, new: NewAsset, created_by: UserId) -> Result<AssetRecord, StoreError>;
    async fn list(&self, scope: &VisibilityScope) -> Result<Vec<AssetRecord>, StoreError>;
    async fn get(&self, id: AssetId) -> Result<Option<AssetRecord>, StoreError>;
    async fn update(&self, id: AssetId, changes: AssetChanges)
    -> Result<Option<AssetRecord>, StoreError>;
    async fn delete(&self, id: AssetId) -> Result<bool, StoreError>;
    async fn stats_for_owner(&self, owner: UserId) -> Result<OwnerAssetStats, StoreError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn create(&self, changes: CategoryChanges) -> Result<CategoryRecord, StoreError>;
    async fn list(&self) -> Result<Vec<CategoryRecord>, StoreError>;
    async fn get(&self, id: CategoryId) -> Result<Option<CategoryRecord>, StoreError>;
    async fn update(
        &self,
        id: CategoryId,
        changes: CategoryChanges,
    ) -> Result<Option<CategoryRecord>, StoreError>;
    async fn delete(&self, id: CategoryId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait DepartmentStore: Send + Sync {
    async fn create(&self, changes: DepartmentChanges) -> Result<DepartmentRecord, StoreError>;
    async fn list(&self) -> Result<Vec<DepartmentRecord>, StoreError>;
    async fn get(&self, id: DepartmentId) -> Result<Option<DepartmentRecord>, StoreError>;
    async fn update(
        &self,
        id: DepartmentId,
        changes: DepartmentChanges,
    ) -> Result<Option<DepartmentRecord>, StoreError>;
    async fn delete(&self, id: DepartmentId) -> Result<bool, StoreError>;
}

/// Cross-resource aggregates for the admin dashboard.
#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn dashboard_stats(&self) -> Result<DashboardStats, StoreError>;
}

/// Liveness of the backing store, reported by the health endpoint.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<DateTime<Utc>, StoreError>;
}
