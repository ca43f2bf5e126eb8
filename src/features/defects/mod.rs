//! Defect tracking.
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/api/defects` | filtered, paginated list |
//! | POST | `/api/defects` | register |
//! | GET / PUT / DELETE | `/api/defects/{id}` | read, edit, remove |
//! | PATCH | `/api/defects/{id}/action` | record remediation |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{DefectRepository, InMemoryDefectRepository, PgDefectRepository};
pub use routes::routes;
pub use services::DefectService;
