mod memory_defect_repository;
mod pg_defect_repository;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::defects::models::{Defect, NewDefect};

pub use memory_defect_repository::InMemoryDefectRepository;
pub use pg_defect_repository::PgDefectRepository;

/// Storage port for defects.
///
/// `list` returns every stored defect; ordering is left to the filter engine.
#[async_trait]
pub trait DefectRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Defect>>;

    async fn find(&self, defect_id: i64) -> Result<Option<Defect>>;

    /// Persist a new defect and return it with its assigned id
    async fn insert(&self, defect: NewDefect) -> Result<Defect>;

    /// Replace a stored defect. Returns `None` when the id is unknown.
    async fn update(&self, defect: Defect) -> Result<Option<Defect>>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, defect_id: i64) -> Result<bool>;
}
