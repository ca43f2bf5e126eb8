mod memory_user_repository;
mod pg_user_repository;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::users::models::{NewUser, User};

pub use memory_user_repository::InMemoryUserRepository;
pub use pg_user_repository::PgUserRepository;

/// Storage port for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users ordered by name
    async fn list(&self) -> Result<Vec<User>>;

    async fn find(&self, user_id: i64) -> Result<Option<User>>;

    async fn insert(&self, user: NewUser) -> Result<User>;

    /// Returns `None` when the id is unknown
    async fn update(&self, user: User) -> Result<Option<User>>;

    async fn delete(&self, user_id: i64) -> Result<bool>;
}
