//! `assetforge-infra` — collaborator implementations behind storage traits.
//!
//! The API crate only ever sees the traits in [`store`]; the PostgreSQL and
//! in-memory implementations are interchangeable (production vs. dev/tests).

pub mod error;
pub mod password;
pub mod records;
pub mod seed;
pub mod store;

pub use error::StoreError;
pub use password::{hash_password, verify_password};
pub use records::{
    AssetChanges, AssetRecord, CategoryChanges, CategoryRecord, Credentials, DashboardStats,
    DepartmentChanges, DepartmentRecord, NewAsset, NewUser, OwnerAssetStats, UserChanges,
    UserRecord, UserStatus,
};
pub use seed::seed_default_admins;
pub use store::{
    AssetStore, CategoryStore, DepartmentStore, HealthProbe, InMemoryStore, PostgresStore,
    StatsStore, UserStore,
};
