use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

use assetforge_api::app::{build_app_with_services, services::build_services_in_memory};
use assetforge_auth::{ClaimSet, Role};
use assetforge_core::UserId;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, wired over the in-memory stores, bound to an
        // ephemeral port.
        let services = Arc::new(build_services_in_memory(
            JWT_SECRET,
            ChronoDuration::hours(1),
        ));
        let app = build_app_with_services(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_token_with_secret(secret: &str, subject_id: UserId, role: Role) -> String {
    let now = Utc::now();
    let claims = ClaimSet {
        subject_id,
        email: format!("{}@example.com", role.as_str()),
        role,
        department: None,
        full_name: None,
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn mint_token(subject_id: UserId, role: Role) -> String {
    mint_token_with_secret(JWT_SECRET, subject_id, role)
}

fn mint_expired_token(subject_id: UserId, role: Role) -> String {
    let now = Utc::now();
    let claims = ClaimSet {
        subject_id,
        email: "expired@example.com".to_string(),
        role,
        department: None,
        full_name: None,
        issued_at: now - ChronoDuration::hours(2),
        expires_at: now - ChronoDuration::hours(1),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

/// Create a category and a department through the API, returning their ids.
async fn seed_refs(client: &reqwest::Client, base_url: &str, admin_token: &str) -> (String, String) {
    let res = client
        .post(format!("{}/categories", base_url))
        .bearer_auth(admin_token)
        .json(&json!({ "name": "Laptops" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let category: Value = res.json().await.unwrap();

    let res = client
        .post(format!("{}/departments", base_url))
        .bearer_auth(admin_token)
        .json(&json!({ "name": "Engineering" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let department: Value = res.json().await.unwrap();

    (
        category["category"]["id"].as_str().unwrap().to_string(),
        department["department"]["id"].as_str().unwrap().to_string(),
    )
}

async fn create_asset(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    category_id: &str,
    department_id: &str,
    cost: &str,
) -> Value {
    let res = client
        .post(format!("{}/assets", base_url))
        .bearer_auth(token)
        .json(&json!({
            "name": "ThinkPad",
            "category_id": category_id,
            "department_id": department_id,
            "date_purchased": "2024-03-01",
            "cost": cost,
            // Spoofed owner: the server must ignore this field entirely.
            "created_by": UserId::new().to_string(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn missing_token_is_identical_401_on_every_protected_route() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in ["/whoami", "/assets", "/categories", "/departments", "/admin/users", "/admin/stats", "/profile"] {
        let res = client
            .get(format!("{}{}", srv.base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{path}");

        let body: Value = res.json().await.unwrap();
        assert_eq!(body["success"], json!(false), "{path}");
        assert_eq!(body["message"], json!("Missing token"), "{path}");
    }
}

#[tokio::test]
async fn malformed_and_invalid_tokens_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Malformed scheme counts as a missing credential.
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .header("Authorization", "Token abc")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], json!("Missing token"));

    // Garbage, wrong key, and expired tokens all read as "Invalid token".
    let wrong_key = mint_token_with_secret("other-secret", UserId::new(), Role::Admin);
    let expired = mint_expired_token(UserId::new(), Role::User);
    for token in ["not.a.token", wrong_key.as_str(), expired.as_str()] {
        let res = client
            .get(format!("{}/whoami", srv.base_url))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: Value = res.json().await.unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Invalid token"));
    }
}

#[tokio::test]
async fn whoami_reflects_token_claims() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let subject = UserId::new();
    let token = mint_token(subject, Role::Admin);

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["subject_id"].as_str().unwrap(), subject.to_string());
    assert_eq!(body["role"], json!("admin"));
}

#[tokio::test]
async fn category_mutations_are_admin_only() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let user_token = mint_token(UserId::new(), Role::User);
    let admin_token = mint_token(UserId::new(), Role::Admin);

    // Regular users cannot create.
    let res = client
        .post(format!("{}/categories", srv.base_url))
        .bearer_auth(&user_token)
        .json(&json!({ "name": "Monitors" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], json!("Access denied. Admins only."));

    // Admin creates, updates, deletes.
    let res = client
        .post(format!("{}/categories", srv.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({ "name": "Monitors", "description": "Displays" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    let id = created["category"]["id"].as_str().unwrap().to_string();

    // Any authenticated role can read the lookup list.
    let res = client
        .get(format!("{}/categories", srv.base_url))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: Value = res.json().await.unwrap();
    assert_eq!(listed["categories"].as_array().unwrap().len(), 1);

    let res = client
        .put(format!("{}/categories/{}", srv.base_url, id))
        .bearer_auth(&admin_token)
        .json(&json!({ "name": "External monitors" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(format!("{}/categories/{}", srv.base_url, id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/categories/{}", srv.base_url, id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn asset_visibility_is_scoped_by_ownership() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let alice = UserId::new();
    let bob = UserId::new();
    let alice_token = mint_token(alice, Role::User);
    let bob_token = mint_token(bob, Role::User);
    let admin_token = mint_token(UserId::new(), Role::Admin);

    let (category_id, department_id) = seed_refs(&client, &srv.base_url, &admin_token).await;

    // Creation stamps the requester as owner, ignoring the spoofed field.
    let created = create_asset(
        &client,
        &srv.base_url,
        &alice_token,
        &category_id,
        &department_id,
        "1299.99",
    )
    .await;
    let asset_id = created["asset"]["id"].as_str().unwrap().to_string();
    assert_eq!(
        created["asset"]["created_by"].as_str().unwrap(),
        alice.to_string()
    );
    assert_eq!(created["asset"]["category_name"], json!("Laptops"));

    // Owner sees it; another user sees an empty list; admin sees everything.
    let res = client
        .get(format!("{}/assets", srv.base_url))
        .bearer_auth(&alice_token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["assets"].as_array().unwrap().len(), 1);

    let res = client
        .get(format!("{}/assets", srv.base_url))
        .bearer_auth(&bob_token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["assets"].as_array().unwrap().len(), 0);

    let res = client
        .get(format!("{}/assets", srv.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["assets"].as_array().unwrap().len(), 1);

    // Direct fetch: exists-but-not-yours is 403, missing is 404.
    let res = client
        .get(format!("{}/assets/{}", srv.base_url, asset_id))
        .bearer_auth(&bob_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], json!("Access denied."));

    let res = client
        .get(format!("{}/assets/{}", srv.base_url, UserId::new()))
        .bearer_auth(&bob_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Mutations stay admin-only, even for the owner.
    let res = client
        .delete(format!("{}/assets/{}", srv.base_url, asset_id))
        .bearer_auth(&alice_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .put(format!("{}/assets/{}", srv.base_url, asset_id))
        .bearer_auth(&admin_token)
        .json(&json!({
            "name": "ThinkPad X1",
            "category_id": category_id,
            "department_id": department_id,
            "date_purchased": "2024-03-01",
            "cost": "999.00",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["asset"]["name"], json!("ThinkPad X1"));

    let res = client
        .delete(format!("{}/assets/{}", srv.base_url, asset_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn owner_stats_cover_only_the_callers_assets() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let alice_token = mint_token(UserId::new(), Role::User);
    let bob_token = mint_token(UserId::new(), Role::User);
    let admin_token = mint_token(UserId::new(), Role::Admin);

    let (category_id, department_id) = seed_refs(&client, &srv.base_url, &admin_token).await;

    create_asset(&client, &srv.base_url, &alice_token, &category_id, &department_id, "100.00").await;
    create_asset(&client, &srv.base_url, &alice_token, &category_id, &department_id, "50.50").await;
    create_asset(&client, &srv.base_url, &bob_token, &category_id, &department_id, "999.99").await;

    let res = client
        .get(format!("{}/assets/stats", srv.base_url))
        .bearer_auth(&alice_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let stats = &body["stats"];
    assert_eq!(stats["total_assets"], json!(2));
    assert_eq!(stats["total_cost"], json!("150.50"));
    assert_eq!(stats["assets_by_category"]["Laptops"], json!(2));
    assert_eq!(stats["assets_by_department"]["Engineering"], json!(2));
}

#[tokio::test]
async fn login_round_trip_and_account_status() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let admin_token = mint_token(UserId::new(), Role::Admin);

    // Admin provisions a user.
    let res = client
        .post(format!("{}/admin/users", srv.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({
            "first_name": "Carol",
            "last_name": "Jones",
            "email": "Carol.Jones@Example.com",
            "role": "user",
            "department": "Engineering",
            "password": "correct-horse",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    let user_id = created["user"]["id"].as_str().unwrap().to_string();
    // Email is stored normalized.
    assert_eq!(created["user"]["email"], json!("carol.jones@example.com"));

    // Unknown email and wrong password are indistinguishable.
    for (email, password) in [
        ("nobody@example.com", "correct-horse"),
        ("carol.jones@example.com", "wrong"),
    ] {
        let res = client
            .post(format!("{}/auth/login", srv.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], json!("Invalid email or password"));
    }

    // Successful login returns a usable token.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": " Carol.Jones@example.com ", "password": "correct-horse" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["full_name"], json!("Carol Jones"));
    let token = body["access_token"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/profile", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let profile: Value = res.json().await.unwrap();
    assert_eq!(profile["user"]["email"], json!("carol.jones@example.com"));

    // Deactivated accounts cannot log in.
    let res = client
        .put(format!("{}/admin/users/{}", srv.base_url, user_id))
        .bearer_auth(&admin_token)
        .json(&json!({
            "first_name": "Carol",
            "last_name": "Jones",
            "email": "carol.jones@example.com",
            "role": "user",
            "department": "Engineering",
            "status": "inactive",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "carol.jones@example.com", "password": "correct-horse" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn user_administration_requires_admin_role() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let user_token = mint_token(UserId::new(), Role::User);

    let res = client
        .get(format!("{}/admin/users", srv.base_url))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], json!("Access denied. Admins only."));
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let admin_token = mint_token(UserId::new(), Role::Admin);
    let payload = json!({
        "first_name": "Dave",
        "last_name": "Miller",
        "email": "dave@example.com",
        "role": "user",
        "department": "IT",
        "password": "some-password",
    });

    let res = client
        .post(format!("{}/admin/users", srv.base_url))
        .bearer_auth(&admin_token)
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/admin/users", srv.base_url))
        .bearer_auth(&admin_token)
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], json!("Email already in use"));
}

#[tokio::test]
async fn dashboard_stats_are_admin_only_and_aggregate() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let user_token = mint_token(UserId::new(), Role::User);
    let admin_token = mint_token(UserId::new(), Role::Admin);

    let res = client
        .get(format!("{}/admin/stats", srv.base_url))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let (category_id, department_id) = seed_refs(&client, &srv.base_url, &admin_token).await;
    create_asset(&client, &srv.base_url, &user_token, &category_id, &department_id, "10.00").await;

    let res = client
        .get(format!("{}/admin/stats", srv.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let stats = &body["stats"];
    assert_eq!(stats["total_assets"], json!(1));
    assert_eq!(stats["total_categories"], json!(1));
    assert_eq!(stats["total_departments"], json!(1));
    assert_eq!(stats["assets_per_category"]["Laptops"], json!(1));
    assert_eq!(stats["recent_assets"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], json!("OK"));
    assert!(body["db_time"].is_string());
}
