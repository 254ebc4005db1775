//! The persistence contract the user handlers depend on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sales_auth::Claims;
use thiserror::Error;

use super::model::{NewUser, UpdateUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("authentication failed")]
    AuthenticationFailure,

    #[error("attempted action is not allowed")]
    Forbidden,

    #[error("ID is not in its proper form")]
    InvalidId,

    #[error("email {0} is already in use")]
    Duplicate(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// User persistence.
///
/// Operations taking `claims` act on behalf of that principal: a caller
/// without the `ADMIN` role may only see or change their own record.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, new: NewUser, now: DateTime<Utc>) -> Result<User, StoreError>;

    async fn update(
        &self,
        claims: &Claims,
        id: &str,
        update: UpdateUser,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn delete(&self, claims: &Claims, id: &str) -> Result<(), StoreError>;

    /// One page of users ordered by email. `page` starts at 1.
    async fn query(&self, page: usize, rows: usize) -> Result<Vec<User>, StoreError>;

    async fn query_by_id(&self, claims: &Claims, id: &str) -> Result<User, StoreError>;

    /// Checks `password` for `email` and returns claims for a new token.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<Claims, StoreError>;

    /// Reports whether the store can serve requests.
    async fn status_check(&self) -> Result<(), StoreError>;
}
