//! PostgreSQL-backed store implementations.
//!
//! One connection pool, constructed at startup and shared immutably across
//! requests. Every trait below maps to plain SQL with manual row mapping.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use assetforge_auth::{Role, VisibilityScope};
use assetforge_core::{AssetId, CategoryId, DepartmentId, UserId};

use crate::error::StoreError;
use crate::records::{
    AssetChanges, AssetRecord, CategoryChanges, CategoryRecord, Credentials, DashboardStats,
    DepartmentChanges, DepartmentRecord, NewAsset, NewUser, OwnerAssetStats, UserChanges,
    UserRecord, UserStatus,
};
use crate::store::{
    AssetStore, CategoryStore, DepartmentStore, HealthProbe, StatsStore, UserStore,
};

/// Joined asset projection used by every asset read.
const ASSET_SELECT: &str = "\
    SELECT a.id, a.name, a.category_id, COALESCE(c.name, 'Unknown') AS category_name, \
           a.department_id, COALESCE(d.name, 'Unknown') AS department_name, \
           a.date_purchased, a.cost, a.created_by, \
           COALESCE(u.first_name || ' ' || u.last_name, 'Unknown') AS created_by_name, \
           a.created_at \
    FROM assets a \
    LEFT JOIN asset_categories c ON c.id = a.category_id \
    LEFT JOIN departments d ON d.id = a.department_id \
    LEFT JOIN users u ON u.id = a.created_by";

const USER_SELECT: &str = "\
    SELECT id, first_name, last_name, email, phone, role, department, status, created_at \
    FROM users";

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, StoreError> {
    let role: String = row.try_get("role")?;
    let status: String = row.try_get("status")?;
    Ok(UserRecord {
        id: UserId::from_uuid(row.try_get("id")?),
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        role: role
            .parse::<Role>()
            .map_err(|e| StoreError::Decode(e.to_string()))?,
        department: row.try_get("department")?,
        status: status
            .parse::<UserStatus>()
            .map_err(|e| StoreError::Decode(e.to_string()))?,
        created_at: row.try_get("created_at")?,
    })
}

fn asset_from_row(row: &PgRow) -> Result<AssetRecord, StoreError> {
    Ok(AssetRecord {
        id: AssetId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        category_id: CategoryId::from_uuid(row.try_get("category_id")?),
        category_name: row.try_get("category_name")?,
        department_id: DepartmentId::from_uuid(row.try_get("department_id")?),
        department_name: row.try_get("department_name")?,
        date_purchased: row.try_get("date_purchased")?,
        cost: row.try_get("cost")?,
        created_by: UserId::from_uuid(row.try_get("created_by")?),
        created_by_name: row.try_get("created_by_name")?,
        created_at: row.try_get("created_at")?,
    })
}

fn category_from_row(row: &PgRow) -> Result<CategoryRecord, StoreError> {
    Ok(CategoryRecord {
        id: CategoryId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

fn department_from_row(row: &PgRow) -> Result<DepartmentRecord, StoreError> {
    Ok(DepartmentRecord {
        id: DepartmentId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

fn name_counts(rows: &[PgRow]) -> Result<BTreeMap<String, i64>, StoreError> {
    let mut counts = BTreeMap::new();
    for row in rows {
        let name: String = row.try_get("name")?;
        let count: i64 = row.try_get("count")?;
        counts.insert(name, count);
    }
    Ok(counts)
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn create(&self, new: NewUser) -> Result<UserRecord, StoreError> {
        let id = UserId::new();
        sqlx::query(
            "INSERT INTO users (id, first_name, last_name, email, phone, role, department, status, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', $8)",
        )
        .bind(id.as_uuid())
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.role.as_str())
        .bind(&new.department)
        .bind(&new.password_hash)
        .execute(&self.pool)
        .await?;

        UserStore::get(self, id)
            .await?
            .ok_or_else(|| StoreError::Unavailable("inserted user not readable".to_string()))
    }

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let rows = sqlx::query(&format!("{USER_SELECT} ORDER BY created_at DESC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn get(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(&format!("{USER_SELECT} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, StoreError> {
        let row = sqlx::query(
            "SELECT id, first_name, last_name, email, phone, role, department, status, \
             created_at, password_hash \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(Credentials {
            user: user_from_row(&row)?,
            password_hash: row.try_get("password_hash")?,
        }))
    }

    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<UserRecord>, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET first_name = $2, last_name = $3, email = $4, phone = $5, \
             role = $6, department = $7, status = COALESCE($8, status) \
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(changes.role.as_str())
        .bind(&changes.department)
        .bind(changes.status.map(|s| s.as_str()))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        UserStore::get(self, id).await
    }

    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        // Assets created by the user are removed by `ON DELETE CASCADE`.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AssetStore for PostgresStore {
    async fn create(&self, new: NewAsset, created_by: UserId) -> Result<AssetRecord, StoreError> {
        let id = AssetId::new();
        sqlx::query(
            "INSERT INTO assets (id, name, category_id, department_id, date_purchased, cost, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id.as_uuid())
        .bind(&new.name)
        .bind(new.category_id.as_uuid())
        .bind(new.department_id.as_uuid())
        .bind(new.date_purchased)
        .bind(new.cost)
        .bind(created_by.as_uuid())
        .execute(&self.pool)
        .await?;

        AssetStore::get(self, id)
            .await?
            .ok_or_else(|| StoreError::Unavailable("inserted asset not readable".to_string()))
    }

    async fn list(&self, scope: &VisibilityScope) -> Result<Vec<AssetRecord>, StoreError> {
        let rows = match scope {
            VisibilityScope::All => {
                sqlx::query(&format!("{ASSET_SELECT} ORDER BY a.created_at DESC"))
                    .fetch_all(&self.pool)
                    .await?
            }
            VisibilityScope::OwnedOnly(owner) => {
                sqlx::query(&format!(
                    "{ASSET_SELECT} WHERE a.created_by = $1 ORDER BY a.created_at DESC"
                ))
                .bind(owner.as_uuid())
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.iter().map(asset_from_row).collect()
    }

    async fn get(&self, id: AssetId) -> Result<Option<AssetRecord>, StoreError> {
        let row = sqlx::query(&format!("{ASSET_SELECT} WHERE a.id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(asset_from_row).transpose()
    }

    async fn update(
        &self,
        id: AssetId,
        changes: AssetChanges,
    ) -> Result<Option<AssetRecord>, StoreError> {
        let result = sqlx::query(
            "UPDATE assets SET name = $2, category_id = $3, department_id = $4, \
             date_purchased = $5, cost = $6 \
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(&changes.name)
        .bind(changes.category_id.as_uuid())
        .bind(changes.department_id.as_uuid())
        .bind(changes.date_purchased)
        .bind(changes.cost)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        AssetStore::get(self, id).await
    }

    async fn delete(&self, id: AssetId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn stats_for_owner(&self, owner: UserId) -> Result<OwnerAssetStats, StoreError> {
        let totals = sqlx::query(
            "SELECT COUNT(*) AS total_assets, COALESCE(SUM(cost), 0::NUMERIC) AS total_cost \
             FROM assets WHERE created_by = $1",
        )
        .bind(owner.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        let by_category = sqlx::query(
            "SELECT COALESCE(c.name, 'Unknown') AS name, COUNT(*) AS count \
             FROM assets a LEFT JOIN asset_categories c ON c.id = a.category_id \
             WHERE a.created_by = $1 GROUP BY 1",
        )
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let by_department = sqlx::query(
            "SELECT COALESCE(d.name, 'Unknown') AS name, COUNT(*) AS count \
             FROM assets a LEFT JOIN departments d ON d.id = a.department_id \
             WHERE a.created_by = $1 GROUP BY 1",
        )
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(OwnerAssetStats {
            total_assets: totals.try_get("total_assets")?,
            total_cost: totals.try_get::<Decimal, _>("total_cost")?,
            assets_by_category: name_counts(&by_category)?,
            assets_by_department: name_counts(&by_department)?,
        })
    }
}

#[async_trait]
impl CategoryStore for PostgresStore {
    async fn create(&self, changes: CategoryChanges) -> Result<CategoryRecord, StoreError> {
        let id = CategoryId::new();
        let row = sqlx::query(
            "INSERT INTO asset_categories (id, name, description) VALUES ($1, $2, $3) \
             RETURNING id, name, description, created_at",
        )
        .bind(id.as_uuid())
        .bind(&changes.name)
        .bind(&changes.description)
        .fetch_one(&self.pool)
        .await?;
        category_from_row(&row)
    }

    async fn list(&self) -> Result<Vec<CategoryRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, description, created_at FROM asset_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(category_from_row).collect()
    }

    async fn get(&self, id: CategoryId) -> Result<Option<CategoryRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at FROM asset_categories WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(category_from_row).transpose()
    }

    async fn update(
        &self,
        id: CategoryId,
        changes: CategoryChanges,
    ) -> Result<Option<CategoryRecord>, StoreError> {
        let row = sqlx::query(
            "UPDATE asset_categories SET name = $2, description = $3 WHERE id = $1 \
             RETURNING id, name, description, created_at",
        )
        .bind(id.as_uuid())
        .bind(&changes.name)
        .bind(&changes.description)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(category_from_row).transpose()
    }

    async fn delete(&self, id: CategoryId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM asset_categories WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DepartmentStore for PostgresStore {
    async fn create(&self, changes: DepartmentChanges) -> Result<DepartmentRecord, StoreError> {
        let id = DepartmentId::new();
        let row = sqlx::query(
            "INSERT INTO departments (id, name, description) VALUES ($1, $2, $3) \
             RETURNING id, name, description, created_at",
        )
        .bind(id.as_uuid())
        .bind(&changes.name)
        .bind(&changes.description)
        .fetch_one(&self.pool)
        .await?;
        department_from_row(&row)
    }

    async fn list(&self) -> Result<Vec<DepartmentRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, description, created_at FROM departments ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(department_from_row).collect()
    }

    async fn get(&self, id: DepartmentId) -> Result<Option<DepartmentRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at FROM departments WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(department_from_row).transpose()
    }

    async fn update(
        &self,
        id: DepartmentId,
        changes: DepartmentChanges,
    ) -> Result<Option<DepartmentRecord>, StoreError> {
        let row = sqlx::query(
            "UPDATE departments SET name = $2, description = $3 WHERE id = $1 \
             RETURNING id, name, description, created_at",
        )
        .bind(id.as_uuid())
        .bind(&changes.name)
        .bind(&changes.description)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(department_from_row).transpose()
    }

    async fn delete(&self, id: DepartmentId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl StatsStore for PostgresStore {
    async fn dashboard_stats(&self) -> Result<DashboardStats, StoreError> {
        let totals = sqlx::query(
            "SELECT \
               (SELECT COUNT(*) FROM users) AS total_users, \
               (SELECT COUNT(*) FROM users WHERE status = 'active') AS active_users, \
               (SELECT COUNT(*) FROM users WHERE status = 'inactive') AS inactive_users, \
               (SELECT COUNT(*) FROM assets) AS total_assets, \
               (SELECT COUNT(*) FROM departments) AS total_departments, \
               (SELECT COUNT(*) FROM asset_categories) AS total_categories",
        )
        .fetch_one(&self.pool)
        .await?;

        let per_department = sqlx::query(
            "SELECT COALESCE(d.name, 'Unknown') AS name, COUNT(*) AS count \
             FROM assets a LEFT JOIN departments d ON d.id = a.department_id GROUP BY 1",
        )
        .fetch_all(&self.pool)
        .await?;

        let per_category = sqlx::query(
            "SELECT COALESCE(c.name, 'Unknown') AS name, COUNT(*) AS count \
             FROM assets a LEFT JOIN asset_categories c ON c.id = a.category_id GROUP BY 1",
        )
        .fetch_all(&self.pool)
        .await?;

        let recent = sqlx::query(&format!(
            "{ASSET_SELECT} WHERE a.created_at >= now() - INTERVAL '7 days' \
             ORDER BY a.created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_users: totals.try_get("total_users")?,
            active_users: totals.try_get("active_users")?,
            inactive_users: totals.try_get("inactive_users")?,
            total_assets: totals.try_get("total_assets")?,
            total_departments: totals.try_get("total_departments")?,
            total_categories: totals.try_get("total_categories")?,
            assets_per_department: name_counts(&per_department)?,
            assets_per_category: name_counts(&per_category)?,
            recent_assets: recent
                .iter()
                .map(asset_from_row)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[async_trait]
impl HealthProbe for PostgresStore {
    async fn ping(&self) -> Result<DateTime<Utc>, StoreError> {
        let row = sqlx::query("SELECT now() AS current_time")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("current_time")?)
    }
}
