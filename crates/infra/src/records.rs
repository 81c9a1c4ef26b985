//! Stored record shapes shared by every store implementation.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use assetforge_auth::Role;
use assetforge_core::{AssetId, CategoryId, DepartmentId, UserId};

/// Account status. Inactive users cannot log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown user status: {0}")]
pub struct UnknownStatus(String);

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }
}

impl core::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// One user row. Password hashes never appear here; they stay inside the
/// store and only surface through [`Credentials`] for login verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub department: Option<String>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for creating a user. The password is hashed before it gets here.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub department: Option<String>,
    pub password_hash: String,
}

/// Full-row update for a user. `status` is optional: `None` keeps the
/// current value.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub department: Option<String>,
    pub status: Option<UserStatus>,
}

/// Login lookup result: the user row plus its password hash.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: UserRecord,
    pub password_hash: String,
}

/// One asset row, joined with its category/department/creator display names.
/// `created_by` is the sole field the authorization gate inspects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetRecord {
    pub id: AssetId,
    pub name: String,
    pub category_id: CategoryId,
    pub category_name: String,
    pub department_id: DepartmentId,
    pub department_name: String,
    pub date_purchased: NaiveDate,
    pub cost: Decimal,
    pub created_by: UserId,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an asset. The owner is supplied separately by the
/// caller's claims, never by the client payload.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub name: String,
    pub category_id: CategoryId,
    pub department_id: DepartmentId,
    pub date_purchased: NaiveDate,
    pub cost: Decimal,
}

/// Full-row update for an asset. Ownership is immutable.
#[derive(Debug, Clone)]
pub struct AssetChanges {
    pub name: String,
    pub category_id: CategoryId,
    pub department_id: DepartmentId,
    pub date_purchased: NaiveDate,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CategoryChanges {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentRecord {
    pub id: DepartmentId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DepartmentChanges {
    pub name: String,
    pub description: Option<String>,
}

/// Per-caller asset statistics, keyed by display names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerAssetStats {
    pub total_assets: i64,
    pub total_cost: Decimal,
    pub assets_by_category: BTreeMap<String, i64>,
    pub assets_by_department: BTreeMap<String, i64>,
}

/// Admin dashboard aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub active_users: i64,
    pub inactive_users: i64,
    pub total_assets: i64,
    pub total_departments: i64,
    pub total_categories: i64,
    pub assets_per_department: BTreeMap<String, i64>,
    pub assets_per_category: BTreeMap<String, i64>,
    pub recent_assets: Vec<AssetRecord>,
}
