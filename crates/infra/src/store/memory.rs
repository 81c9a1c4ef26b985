//! In-memory store for dev mode and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use assetforge_auth::VisibilityScope;
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

const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone)]
struct StoredUser {
    record: UserRecord,
    password_hash: String,
}

#[derive(Debug, Clone)]
struct StoredAsset {
    id: AssetId,
    name: String,
    category_id: CategoryId,
    department_id: DepartmentId,
    date_purchased: NaiveDate,
    cost: Decimal,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

/// In-memory implementation of every store trait.
///
/// Backed by plain `RwLock<HashMap>` tables; joins are resolved at read time
/// the same way the SQL implementation resolves them (missing referents read
/// as "Unknown").
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, StoredUser>>,
    assets: RwLock<HashMap<AssetId, StoredAsset>>,
    categories: RwLock<HashMap<CategoryId, CategoryRecord>>,
    departments: RwLock<HashMap<DepartmentId, DepartmentRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn asset_record(&self, stored: &StoredAsset) -> Result<AssetRecord, StoreError> {
        let category_name = self
            .categories
            .read()
            .map_err(|_| poisoned())?
            .get(&stored.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());
        let department_name = self
            .departments
            .read()
            .map_err(|_| poisoned())?
            .get(&stored.department_id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());
        let created_by_name = self
            .users
            .read()
            .map_err(|_| poisoned())?
            .get(&stored.created_by)
            .map(|u| u.record.full_name())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        Ok(AssetRecord {
            id: stored.id,
            name: stored.name.clone(),
            category_id: stored.category_id,
            category_name,
            department_id: stored.department_id,
            department_name,
            date_purchased: stored.date_purchased,
            cost: stored.cost,
            created_by: stored.created_by,
            created_by_name,
            created_at: stored.created_at,
        })
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("store lock poisoned".to_string())
}

fn newest_first<T, F: Fn(&T) -> DateTime<Utc>>(items: &mut [T], created_at: F) {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create(&self, new: NewUser) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;

        if users
            .values()
            .any(|u| u.record.email == new.email)
        {
            return Err(StoreError::Conflict("Email already in use".to_string()));
        }

        let record = UserRecord {
            id: UserId::new(),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            role: new.role,
            department: new.department,
            status: UserStatus::Active,
            created_at: Utc::now(),
        };
        users.insert(
            record.id,
            StoredUser {
                record: record.clone(),
                password_hash: new.password_hash,
            },
        );
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        let mut records: Vec<UserRecord> = users.values().map(|u| u.record.clone()).collect();
        newest_first(&mut records, |u| u.created_at);
        Ok(records)
    }

    async fn get(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(&id).map(|u| u.record.clone()))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.values().find(|u| u.record.email == email).map(|u| {
            Credentials {
                user: u.record.clone(),
                password_hash: u.password_hash.clone(),
            }
        }))
    }

    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<UserRecord>, StoreError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;

        if !users.contains_key(&id) {
            return Ok(None);
        }
        if users
            .values()
            .any(|u| u.record.id != id && u.record.email == changes.email)
        {
            return Err(StoreError::Conflict("Email already in use".to_string()));
        }

        let Some(stored) = users.get_mut(&id) else {
            return Ok(None);
        };
        stored.record.first_name = changes.first_name;
        stored.record.last_name = changes.last_name;
        stored.record.email = changes.email;
        stored.record.phone = changes.phone;
        stored.record.role = changes.role;
        stored.record.department = changes.department;
        if let Some(status) = changes.status {
            stored.record.status = status;
        }
        Ok(Some(stored.record.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        let removed = users.remove(&id).is_some();
        drop(users);

        if removed {
            // Mirrors the SQL `ON DELETE CASCADE` on assets.created_by.
            let mut assets = self.assets.write().map_err(|_| poisoned())?;
            assets.retain(|_, a| a.created_by != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl AssetStore for InMemoryStore {
    async fn create(&self, new: NewAsset, created_by: UserId) -> Result<AssetRecord, StoreError> {
        let stored = StoredAsset {
            id: AssetId::new(),
            name: new.name,
            category_id: new.category_id,
            department_id: new.department_id,
            date_purchased: new.date_purchased,
            cost: new.cost,
            created_by,
            created_at: Utc::now(),
        };
        let record = self.asset_record(&stored)?;

        let mut assets = self.assets.write().map_err(|_| poisoned())?;
        assets.insert(stored.id, stored);
        Ok(record)
    }

    async fn list(&self, scope: &VisibilityScope) -> Result<Vec<AssetRecord>, StoreError> {
        let stored: Vec<StoredAsset> = {
            let assets = self.assets.read().map_err(|_| poisoned())?;
            assets
                .values()
                .filter(|a| scope.permits(a.created_by))
                .cloned()
                .collect()
        };

        let mut records = stored
            .iter()
            .map(|a| self.asset_record(a))
            .collect::<Result<Vec<_>, _>>()?;
        newest_first(&mut records, |a| a.created_at);
        Ok(records)
    }

    async fn get(&self, id: AssetId) -> Result<Option<AssetRecord>, StoreError> {
        let stored = {
            let assets = self.assets.read().map_err(|_| poisoned())?;
            assets.get(&id).cloned()
        };
        stored.map(|a| self.asset_record(&a)).transpose()
    }

    async fn update(
        &self,
        id: AssetId,
        changes: AssetChanges,
    ) -> Result<Option<AssetRecord>, StoreError> {
        let stored = {
            let mut assets = self.assets.write().map_err(|_| poisoned())?;
            let Some(stored) = assets.get_mut(&id) else {
                return Ok(None);
            };
            stored.name = changes.name;
            stored.category_id = changes.category_id;
            stored.department_id = changes.department_id;
            stored.date_purchased = changes.date_purchased;
            stored.cost = changes.cost;
            stored.clone()
        };
        Ok(Some(self.asset_record(&stored)?))
    }

    async fn delete(&self, id: AssetId) -> Result<bool, StoreError> {
        let mut assets = self.assets.write().map_err(|_| poisoned())?;
        Ok(assets.remove(&id).is_some())
    }

    async fn stats_for_owner(&self, owner: UserId) -> Result<OwnerAssetStats, StoreError> {
        let owned: Vec<StoredAsset> = {
            let assets = self.assets.read().map_err(|_| poisoned())?;
            assets
                .values()
                .filter(|a| a.created_by == owner)
                .cloned()
                .collect()
        };

        let mut assets_by_category: BTreeMap<String, i64> = BTreeMap::new();
        let mut assets_by_department: BTreeMap<String, i64> = BTreeMap::new();
        let mut total_cost = Decimal::ZERO;

        for stored in &owned {
            let record = self.asset_record(stored)?;
            *assets_by_category.entry(record.category_name).or_insert(0) += 1;
            *assets_by_department
                .entry(record.department_name)
                .or_insert(0) += 1;
            total_cost += stored.cost;
        }

        Ok(OwnerAssetStats {
            total_assets: owned.len() as i64,
            total_cost,
            assets_by_category,
            assets_by_department,
        })
    }
}

#[async_trait]
impl CategoryStore for InMemoryStore {
    async fn create(&self, changes: CategoryChanges) -> Result<CategoryRecord, StoreError> {
        let record = CategoryRecord {
            id: CategoryId::new(),
            name: changes.name,
            description: changes.description,
            created_at: Utc::now(),
        };
        let mut categories = self.categories.write().map_err(|_| poisoned())?;
        categories.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<CategoryRecord>, StoreError> {
        let categories = self.categories.read().map_err(|_| poisoned())?;
        let mut records: Vec<CategoryRecord> = categories.values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    async fn get(&self, id: CategoryId) -> Result<Option<CategoryRecord>, StoreError> {
        let categories = self.categories.read().map_err(|_| poisoned())?;
        Ok(categories.get(&id).cloned())
    }

    async fn update(
        &self,
        id: CategoryId,
        changes: CategoryChanges,
    ) -> Result<Option<CategoryRecord>, StoreError> {
        let mut categories = self.categories.write().map_err(|_| poisoned())?;
        let Some(record) = categories.get_mut(&id) else {
            return Ok(None);
        };
        record.name = changes.name;
        record.description = changes.description;
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: CategoryId) -> Result<bool, StoreError> {
        {
            let assets = self.assets.read().map_err(|_| poisoned())?;
            if assets.values().any(|a| a.category_id == id) {
                // Mirrors the SQL foreign-key restriction.
                return Err(StoreError::Conflict(
                    "Record is still referenced by other records".to_string(),
                ));
            }
        }
        let mut categories = self.categories.write().map_err(|_| poisoned())?;
        Ok(categories.remove(&id).is_some())
    }
}

#[async_trait]
impl DepartmentStore for InMemoryStore {
    async fn create(&self, changes: DepartmentChanges) -> Result<DepartmentRecord, StoreError> {
        let record = DepartmentRecord {
            id: DepartmentId::new(),
            name: changes.name,
            description: changes.description,
            created_at: Utc::now(),
        };
        let mut departments = self.departments.write().map_err(|_| poisoned())?;
        departments.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<DepartmentRecord>, StoreError> {
        let departments = self.departments.read().map_err(|_| poisoned())?;
        let mut records: Vec<DepartmentRecord> = departments.values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    async fn get(&self, id: DepartmentId) -> Result<Option<DepartmentRecord>, StoreError> {
        let departments = self.departments.read().map_err(|_| poisoned())?;
        Ok(departments.get(&id).cloned())
    }

    async fn update(
        &self,
        id: DepartmentId,
        changes: DepartmentChanges,
    ) -> Result<Option<DepartmentRecord>, StoreError> {
        let mut departments = self.departments.write().map_err(|_| poisoned())?;
        let Some(record) = departments.get_mut(&id) else {
            return Ok(None);
        };
        record.name = changes.name;
        record.description = changes.description;
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: DepartmentId) -> Result<bool, StoreError> {
        {
            let assets = self.assets.read().map_err(|_| poisoned())?;
            if assets.values().any(|a| a.department_id == id) {
                return Err(StoreError::Conflict(
                    "Record is still referenced by other records".to_string(),
                ));
            }
        }
        let mut departments = self.departments.write().map_err(|_| poisoned())?;
        Ok(departments.remove(&id).is_some())
    }
}

#[async_trait]
impl StatsStore for InMemoryStore {
    async fn dashboard_stats(&self) -> Result<DashboardStats, StoreError> {
        let (total_users, active_users, inactive_users) = {
            let users = self.users.read().map_err(|_| poisoned())?;
            let active = users
                .values()
                .filter(|u| u.record.status == UserStatus::Active)
                .count() as i64;
            let total = users.len() as i64;
            (total, active, total - active)
        };

        let all_assets: Vec<StoredAsset> = {
            let assets = self.assets.read().map_err(|_| poisoned())?;
            assets.values().cloned().collect()
        };

        let mut assets_per_category: BTreeMap<String, i64> = BTreeMap::new();
        let mut assets_per_department: BTreeMap<String, i64> = BTreeMap::new();
        let cutoff = Utc::now() - Duration::days(7);
        let mut recent_assets = Vec::new();

        for stored in &all_assets {
            let record = self.asset_record(stored)?;
            *assets_per_category
                .entry(record.category_name.clone())
                .or_insert(0) += 1;
            *assets_per_department
                .entry(record.department_name.clone())
                .or_insert(0) += 1;
            if record.created_at >= cutoff {
                recent_assets.push(record);
            }
        }
        newest_first(&mut recent_assets, |a| a.created_at);

        let (total_categories, total_departments) = {
            let categories = self.categories.read().map_err(|_| poisoned())?;
            let departments = self.departments.read().map_err(|_| poisoned())?;
            (categories.len() as i64, departments.len() as i64)
        };

        Ok(DashboardStats {
            total_users,
            active_users,
            inactive_users,
            total_assets: all_assets.len() as i64,
            total_departments,
            total_categories,
            assets_per_department,
            assets_per_category,
            recent_assets,
        })
    }
}

#[async_trait]
impl HealthProbe for InMemoryStore {
    async fn ping(&self) -> Result<DateTime<Utc>, StoreError> {
        Ok(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use assetforge_auth::Role;

    use super::*;

    fn store() -> InMemoryStore {
        InMemoryStore::new()
    }

    async fn seed_user(store: &InMemoryStore, email: &str, role: Role) -> UserRecord {
        UserStore::create(
            store,
            NewUser {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: email.to_string(),
                phone: None,
                role,
                department: Some("IT".to_string()),
                password_hash: "x".to_string(),
            })
            .await
            .unwrap()
    }

    async fn seed_refs(store: &InMemoryStore) -> (CategoryRecord, DepartmentRecord) {
        let category = CategoryStore::create(
            store,
            CategoryChanges {
                name: "Laptops".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        let department = DepartmentStore::create(
            store,
            DepartmentChanges {
                name: "Engineering".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        (category, department)
    }

    fn new_asset(category: CategoryId, department: DepartmentId) -> NewAsset {
        NewAsset {
            name: "ThinkPad".to_string(),
            category_id: category,
            department_id: department,
            date_purchased: NaiveDate::from_str("2024-03-01").unwrap(),
            cost: Decimal::new(129999, 2),
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = store();
        seed_user(&store, "a@example.com", Role::User).await;

        let err = UserStore::create(
            &store,
            NewUser {
                first_name: "Other".to_string(),
                last_name: "User".to_string(),
                email: "a@example.com".to_string(),
                phone: None,
                role: Role::User,
                department: None,
                password_hash: "x".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn asset_create_records_owner_and_joined_names() {
        let store = store();
        let owner = seed_user(&store, "owner@example.com", Role::User).await;
        let (category, department) = seed_refs(&store).await;

        let record = AssetStore::create(&store, new_asset(category.id, department.id), owner.id)
            .await
            .unwrap();

        assert_eq!(record.created_by, owner.id);
        assert_eq!(record.category_name, "Laptops");
        assert_eq!(record.department_name, "Engineering");
        assert_eq!(record.created_by_name, "Test User");
    }

    #[tokio::test]
    async fn list_respects_visibility_scope() {
        let store = store();
        let alice = seed_user(&store, "alice@example.com", Role::User).await;
        let bob = seed_user(&store, "bob@example.com", Role::User).await;
        let (category, department) = seed_refs(&store).await;

        AssetStore::create(&store, new_asset(category.id, department.id), alice.id)
            .await
            .unwrap();
        AssetStore::create(&store, new_asset(category.id, department.id), bob.id)
            .await
            .unwrap();

        let all = AssetStore::list(&store, &VisibilityScope::All).await.unwrap();
        assert_eq!(all.len(), 2);

        let own = AssetStore::list(&store, &VisibilityScope::OwnedOnly(alice.id))
            .await
            .unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].created_by, alice.id);
    }

    #[tokio::test]
    async fn owner_stats_cover_only_owned_assets() {
        let store = store();
        let alice = seed_user(&store, "alice@example.com", Role::User).await;
        let bob = seed_user(&store, "bob@example.com", Role::User).await;
        let (category, department) = seed_refs(&store).await;

        for _ in 0..2 {
            AssetStore::create(&store, new_asset(category.id, department.id), alice.id)
                .await
                .unwrap();
        }
        AssetStore::create(&store, new_asset(category.id, department.id), bob.id)
            .await
            .unwrap();

        let stats = store.stats_for_owner(alice.id).await.unwrap();
        assert_eq!(stats.total_assets, 2);
        assert_eq!(stats.total_cost, Decimal::new(259998, 2));
        assert_eq!(stats.assets_by_category.get("Laptops"), Some(&2));
        assert_eq!(stats.assets_by_department.get("Engineering"), Some(&2));
    }

    #[tokio::test]
    async fn referenced_category_cannot_be_deleted() {
        let store = store();
        let owner = seed_user(&store, "owner@example.com", Role::User).await;
        let (category, department) = seed_refs(&store).await;
        AssetStore::create(&store, new_asset(category.id, department.id), owner.id)
            .await
            .unwrap();

        let err = CategoryStore::delete(&store, category.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_user_cascades_to_their_assets() {
        let store = store();
        let owner = seed_user(&store, "owner@example.com", Role::User).await;
        let (category, department) = seed_refs(&store).await;
        AssetStore::create(&store, new_asset(category.id, department.id), owner.id)
            .await
            .unwrap();

        assert!(UserStore::delete(&store, owner.id).await.unwrap());
        let remaining = AssetStore::list(&store, &VisibilityScope::All).await.unwrap();
        assert!(remaining.is_empty());
    }
}
