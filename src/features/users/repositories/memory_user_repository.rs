use async_trait::async_trait;
use tokio::sync::RwLock;

use super::UserRepository;
use crate::core::error::Result;
use crate::features::users::models::{NewUser, User};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>> {
        let mut users = self.users.read().await.clone();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.user_id.cmp(&b.user_id)));
        Ok(users)
    }

    async fn find(&self, user_id: i64) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        let next_id = users.iter().map(|u| u.user_id).max().unwrap_or(0) + 1;
        let user = user.into_user(next_id);
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.user_id == user.user_id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, user_id: i64) -> Result<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.user_id != user_id);
        Ok(users.len() != before)
    }
}
