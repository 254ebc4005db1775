use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use sales_auth::Role;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A user as stored and as returned by the API. The password hash is never
/// serialized.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roles: BTreeSet<Role>,
    #[serde(skip)]
    pub password_hash: String,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "roles must name at least one role"))]
    pub roles: Vec<Role>,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "password_confirm must match password"))]
    pub password_confirm: String,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "roles must name at least one role"))]
    pub roles: Option<Vec<Role>>,
    pub password: Option<String>,
    #[validate(must_match(other = "password", message = "password_confirm must match password"))]
    pub password_confirm: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_validation() {
        let user = NewUser {
            name: "Bill Kennedy".into(),
            email: "bill@example.com".into(),
            roles: vec![Role::Admin],
            password: "gophers".into(),
            password_confirm: "gophers".into(),
        };
        assert!(user.validate().is_ok());

        let bad = NewUser {
            email: "bill".into(),
            roles: vec![],
            password_confirm: "rustaceans".into(),
            ..user
        };
        let fields = sales_core::validate::check(&bad).unwrap_err();
        let names: Vec<_> = fields.0.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["email", "password_confirm", "roles"]);
    }

    #[test]
    fn test_user_hides_password_hash() {
        let now = Utc::now();
        let user = User {
            id: "1".into(),
            name: "Bill".into(),
            email: "bill@example.com".into(),
            roles: BTreeSet::from([Role::User]),
            password_hash: "secret".into(),
            date_created: now,
            date_updated: now,
        };

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["roles"], serde_json::json!(["USER"]));
    }
}
