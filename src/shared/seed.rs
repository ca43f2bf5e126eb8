//! Sample records for the in-memory backend, loaded when `MEMORY_SEED=true`.

use crate::features::defects::models::Defect;
use crate::features::users::models::User;

const SAMPLE_DEFECTS: &str = include_str!("../../seed/sample_defects.json");
const SAMPLE_USERS: &str = include_str!("../../seed/sample_users.json");

/// Bundled defects, newest first as the store keeps them
pub fn sample_defects() -> serde_json::Result<Vec<Defect>> {
    serde_json::from_str(SAMPLE_DEFECTS)
}

pub fn sample_users() -> serde_json::Result<Vec<User>> {
    serde_json::from_str(SAMPLE_USERS)
}
