//! Request DTOs, validation helpers, and JSON response mapping.

use axum::http::StatusCode;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use assetforge_auth::Role;
use assetforge_infra::{
    AssetRecord, CategoryRecord, DashboardStats, DepartmentRecord, OwnerAssetStats, UserRecord,
    UserStatus,
};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssetRequest {
    pub name: String,
    pub category_id: Uuid,
    pub department_id: Uuid,
    pub date_purchased: NaiveDate,
    pub cost: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub department: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub department: String,
    pub status: Option<String>,
}

// -------------------------
// Validation helpers
// -------------------------

/// Normalize an email the way it is stored: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn require_non_empty(
    fields: &[&str],
) -> Result<(), axum::response::Response> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "Missing required fields",
        ));
    }
    Ok(())
}

pub fn parse_role(s: &str) -> Result<Role, axum::response::Response> {
    s.parse::<Role>().map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "role must be one of: admin, user",
        )
    })
}

pub fn parse_status(s: &str) -> Result<UserStatus, axum::response::Response> {
    s.parse::<UserStatus>().map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "status must be one of: active, inactive",
        )
    })
}

// -------------------------
// Response mapping
// -------------------------

pub fn user_json(user: &UserRecord) -> Value {
    json!({
        "id": user.id,
        "first_name": user.first_name,
        "last_name": user.last_name,
        "full_name": user.full_name(),
        "email": user.email,
        "phone": user.phone,
        "role": user.role,
        "department": user.department,
        "status": user.status,
        "created_at": user.created_at,
    })
}

pub fn asset_json(asset: &AssetRecord) -> Value {
    json!({
        "id": asset.id,
        "name": asset.name,
        "category_id": asset.category_id,
        "category_name": asset.category_name,
        "department_id": asset.department_id,
        "department_name": asset.department_name,
        "date_purchased": asset.date_purchased,
        "cost": asset.cost,
        "created_by": asset.created_by,
        "created_by_name": asset.created_by_name,
        "created_at": asset.created_at,
    })
}

pub fn category_json(category: &CategoryRecord) -> Value {
    json!({
        "id": category.id,
        "name": category.name,
        "description": category.description,
        "created_at": category.created_at,
    })
}

pub fn department_json(department: &DepartmentRecord) -> Value {
    json!({
        "id": department.id,
        "name": department.name,
        "description": department.description,
        "created_at": department.created_at,
    })
}

pub fn owner_stats_json(stats: &OwnerAssetStats) -> Value {
    json!({
        "total_assets": stats.total_assets,
        "total_cost": stats.total_cost,
        "assets_by_category": stats.assets_by_category,
        "assets_by_department": stats.assets_by_department,
    })
}

pub fn dashboard_json(stats: &DashboardStats) -> Value {
    json!({
        "total_users": stats.total_users,
        "active_users": stats.active_users,
        "inactive_users": stats.inactive_users,
        "total_assets": stats.total_assets,
        "total_departments": stats.total_departments,
        "total_categories": stats.total_categories,
        "assets_per_department": stats.assets_per_department,
        "assets_per_category": stats.assets_per_category,
        "recent_assets": stats.recent_assets.iter().map(asset_json).collect::<Vec<_>>(),
    })
}
