//! In-process [`UserStore`].

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use sales_auth::{Claims, Role};
use sales_core::validate::{check_id, generate_id};
use sales_core::{hash_password, verify_password};
use tracing::info;

use super::model::{NewUser, UpdateUser, User};
use super::store::{StoreError, UserStore};

/// Users seeded by [`InMemoryStore::seeded`], all with password `gophers`.
pub const SEED_USERS: [(&str, &str, &[Role]); 2] = [
    ("Admin Gopher", "admin@example.com", &[Role::Admin, Role::User]),
    ("User Gopher", "user@example.com", &[Role::User]),
];
pub const SEED_PASSWORD: &str = "gophers";

/// A [`UserStore`] backed by a map, keyed by user id.
pub struct InMemoryStore {
    users: RwLock<HashMap<String, User>>,
    issuer: String,
    token_ttl: TimeDelta,
}

impl InMemoryStore {
    /// An empty store. `issuer` and `token_ttl` shape the claims
    /// [`UserStore::authenticate`] returns.
    pub fn new(issuer: impl Into<String>, token_ttl: TimeDelta) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            issuer: issuer.into(),
            token_ttl,
        }
    }

    /// A store holding [`SEED_USERS`].
    pub fn seeded(issuer: impl Into<String>, token_ttl: TimeDelta) -> anyhow::Result<Self> {
        let store = Self::new(issuer, token_ttl);
        let now = Utc::now();
        let password_hash = hash_password(SEED_PASSWORD)?;

        {
            let mut users = store.users.write().unwrap_or_else(PoisonError::into_inner);
            for (name, email, roles) in SEED_USERS {
                let id = generate_id();
                users.insert(
                    id.clone(),
                    User {
                        id,
                        name: name.to_string(),
                        email: email.to_string(),
                        roles: roles.iter().copied().collect(),
                        password_hash: password_hash.clone(),
                        date_created: now,
                        date_updated: now,
                    },
                );
            }
        }

        info!(users = SEED_USERS.len(), "seeded user store");
        Ok(store)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, User>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, User>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        self.read().values().find(|u| u.email == email).cloned()
    }
}

/// Non-admins may only act on their own record.
fn ensure_access(claims: &Claims, id: &str) -> Result<(), StoreError> {
    if claims.has_role(Role::Admin) || claims.subject == id {
        Ok(())
    } else {
        Err(StoreError::Forbidden)
    }
}

async fn hash(password: String) -> Result<String, StoreError> {
    let hashed = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("hashing task")??;
    Ok(hashed)
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create(&self, new: NewUser, now: DateTime<Utc>) -> Result<User, StoreError> {
        if self.find_by_email(&new.email).is_some() {
            return Err(StoreError::Duplicate(new.email));
        }

        let password_hash = hash(new.password).await?;
        let user = User {
            id: generate_id(),
            name: new.name,
            email: new.email,
            roles: new.roles.into_iter().collect(),
            password_hash,
            date_created: now,
            date_updated: now,
        };

        let mut users = self.write();
        // Re-check under the write lock; hashing happened unlocked.
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(user.email));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        claims: &Claims,
        id: &str,
        update: UpdateUser,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        check_id(id).map_err(|_| StoreError::InvalidId)?;
        ensure_access(claims, id)?;
        if update.roles.is_some() && !claims.has_role(Role::Admin) {
            return Err(StoreError::Forbidden);
        }

        let password_hash = match update.password {
            Some(password) => Some(hash(password).await?),
            None => None,
        };

        let mut users = self.write();
        if let Some(email) = &update.email {
            if users.values().any(|u| &u.email == email && u.id != id) {
                return Err(StoreError::Duplicate(email.clone()));
            }
        }

        let user = users.get_mut(id).ok_or(StoreError::NotFound)?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(roles) = update.roles {
            user.roles = roles.into_iter().collect::<BTreeSet<_>>();
        }
        if let Some(password_hash) = password_hash {
            user.password_hash = password_hash;
        }
        user.date_updated = now;

        Ok(())
    }

    async fn delete(&self, claims: &Claims, id: &str) -> Result<(), StoreError> {
        check_id(id).map_err(|_| StoreError::InvalidId)?;
        ensure_access(claims, id)?;

        self.write().remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn query(&self, page: usize, rows: usize) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.read().values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));

        let skip = page.saturating_sub(1).saturating_mul(rows);
        Ok(users.into_iter().skip(skip).take(rows).collect())
    }

    async fn query_by_id(&self, claims: &Claims, id: &str) -> Result<User, StoreError> {
        check_id(id).map_err(|_| StoreError::InvalidId)?;
        ensure_access(claims, id)?;

        self.read().get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<Claims, StoreError> {
        let user = self.find_by_email(email).ok_or(StoreError::NotFound)?;

        let password = password.to_string();
        let hashed = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hashed))
            .await
            .context("password verification task")??;
        if !matches {
            return Err(StoreError::AuthenticationFailure);
        }

        Ok(Claims::new(
            user.id,
            user.roles,
            self.issuer.clone(),
            self.token_ttl,
            now,
        ))
    }

    async fn status_check(&self) -> Result<(), StoreError> {
        // Nothing external to reach; the map is always ready.
        Ok(())
    }
}
