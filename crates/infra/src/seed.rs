//! Default admin provisioning for fresh deployments.

use tracing::info;

use assetforge_auth::Role;

use crate::error::StoreError;
use crate::password::hash_password;
use crate::records::{NewUser, UserRecord};
use crate::store::UserStore;

struct DefaultAdmin {
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    department: &'static str,
}

const DEFAULT_ADMINS: &[DefaultAdmin] = &[
    DefaultAdmin {
        first_name: "Admin",
        last_name: "One",
        email: "admin1@example.com",
        department: "IT",
    },
    DefaultAdmin {
        first_name: "Admin",
        last_name: "Two",
        email: "admin2@example.com",
        department: "Finance",
    },
];

/// Create the default admin accounts, skipping any email that already exists.
///
/// Returns the records that were actually created.
pub async fn seed_default_admins(
    users: &dyn UserStore,
    password: &str,
) -> Result<Vec<UserRecord>, StoreError> {
    let mut created = Vec::new();

    for admin in DEFAULT_ADMINS {
        if users.find_credentials(admin.email).await?.is_some() {
            info!(email = admin.email, "admin user already exists, skipping");
            continue;
        }

        let record = users
            .create(NewUser {
                first_name: admin.first_name.to_string(),
                last_name: admin.last_name.to_string(),
                email: admin.email.to_string(),
                phone: None,
                role: Role::Admin,
                department: Some(admin.department.to_string()),
                password_hash: hash_password(password)?,
            })
            .await?;
        info!(email = admin.email, "seeded admin user");
        created.push(record);
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::verify_password;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = InMemoryStore::new();

        let first = seed_default_admins(&store, "Admin123!").await.unwrap();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|u| u.role == Role::Admin));

        let second = seed_default_admins(&store, "Admin123!").await.unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn seeded_admin_password_verifies() {
        let store = InMemoryStore::new();
        seed_default_admins(&store, "s3cret-enough").await.unwrap();

        let creds = store
            .find_credentials("admin1@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("s3cret-enough", &creds.password_hash));
    }
}
