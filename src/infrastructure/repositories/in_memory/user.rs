//! In-memory User Repository

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{User, UserRepository};
use crate::shared::error::AppError;

struct UserStore {
    users: Vec<User>,
    next_id: i32,
}

impl UserStore {
    fn conflict_with(&self, user: &User) -> Option<AppError> {
        self.users
            .iter()
            .filter(|u| u.id() != user.id())
            .find_map(|u| {
                if u.username() == user.username() {
                    Some(AppError::Conflict(format!(
                        "Username '{}' is already taken",
                        user.username()
                    )))
                } else if u.email() == user.email() {
                    Some(AppError::Conflict(format!(
                        "Email '{}' is already registered",
                        user.email()
                    )))
                } else {
                    None
                }
            })
    }
}

/// In-memory implementation of [`UserRepository`].
pub struct InMemoryUserRepository {
    store: RwLock<UserStore>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(UserStore {
                users: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.store.read().users.iter().find(|u| u.id() == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .store
            .read()
            .users
            .iter()
            .find(|u| u.username() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .store
            .read()
            .users
            .iter()
            .find(|u| u.email() == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut store = self.store.write();
        if let Some(conflict) = store.conflict_with(user) {
            return Err(conflict);
        }

        let mut stored = user.clone();
        stored.assign_id(store.next_id);
        store.next_id += 1;
        store.users.push(stored.clone());

        Ok(stored)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let mut store = self.store.write();
        if let Some(conflict) = store.conflict_with(user) {
            return Err(conflict);
        }

        let slot = store
            .users
            .iter_mut()
            .find(|u| u.id() == user.id())
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user.id())))?;
        *slot = user.clone();

        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut store = self.store.write();
        let before = store.users.len();
        store.users.retain(|u| u.id() != id);
        Ok(store.users.len() != before)
    }
}
