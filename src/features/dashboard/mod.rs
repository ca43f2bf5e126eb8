//! Defect statistics for the dashboard.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/dashboard/summary` | Counters and histograms; `?toggle=a,b` flips categories against the configured set |
//! | GET | `/api/dashboard/recent` | Newest defects, `?limit=` overrides the configured count |
//! | GET | `/api/dashboard/categories` | Test-type categories with enabled flag and defect count |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::DashboardService;
