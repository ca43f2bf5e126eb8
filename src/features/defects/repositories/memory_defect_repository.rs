use async_trait::async_trait;
use tokio::sync::RwLock;

use super::DefectRepository;
use crate::core::error::Result;
use crate::features::defects::models::{Defect, NewDefect};

/// Process-local defect store, newest first
#[derive(Default)]
pub struct InMemoryDefectRepository {
    defects: RwLock<Vec<Defect>>,
}

impl InMemoryDefectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records
    pub fn with_defects(defects: Vec<Defect>) -> Self {
        Self {
            defects: RwLock::new(defects),
        }
    }
}

#[async_trait]
impl DefectRepository for InMemoryDefectRepository {
    async fn list(&self) -> Result<Vec<Defect>> {
        Ok(self.defects.read().await.clone())
    }

    async fn find(&self, defect_id: i64) -> Result<Option<Defect>> {
        let defects = self.defects.read().await;
        Ok(defects.iter().find(|d| d.defect_id == defect_id).cloned())
    }

    async fn insert(&self, defect: NewDefect) -> Result<Defect> {
        let mut defects = self.defects.write().await;
        // Ids stay unique even when records were deleted or seeded out of order
        let next_id = defects.iter().map(|d| d.defect_id).max().unwrap_or(0) + 1;
        let defect = defect.into_defect(next_id);
        defects.insert(0, defect.clone());
        Ok(defect)
    }

    async fn update(&self, defect: Defect) -> Result<Option<Defect>> {
        let mut defects = self.defects.write().await;
        match defects.iter_mut().find(|d| d.defect_id == defect.defect_id) {
            Some(slot) => {
                *slot = defect.clone();
                Ok(Some(defect))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, defect_id: i64) -> Result<bool> {
        let mut defects = self.defects.write().await;
        let before = defects.len();
        defects.retain(|d| d.defect_id != defect_id);
        Ok(defects.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{defect, new_defect};

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids_newest_first() {
        let repo = InMemoryDefectRepository::with_defects(vec![defect(7, "2026-02-01T00:00:00Z")]);

        let first = repo.insert(new_defect("Login button misaligned")).await.unwrap();
        let second = repo.insert(new_defect("Chart resize issue")).await.unwrap();

        assert_eq!(first.defect_id, 8);
        assert_eq!(second.defect_id, 9);

        let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|d| d.defect_id).collect();
        assert_eq!(ids, vec![9, 8, 7]);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let repo = InMemoryDefectRepository::new();
        assert!(repo
            .update(defect(42, "2026-02-01T00:00:00Z"))
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete(42).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let repo = InMemoryDefectRepository::with_defects(vec![defect(1, "2026-02-01T00:00:00Z")]);
        let mut changed = repo.find(1).await.unwrap().unwrap();
        changed.title = "Renamed".to_string();

        repo.update(changed).await.unwrap();
        assert_eq!(repo.find(1).await.unwrap().unwrap().title, "Renamed");

        assert!(repo.delete(1).await.unwrap());
        assert!(repo.find(1).await.unwrap().is_none());
    }
}
