//! Testers, fixers and administrators.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users` | All users ordered by name |
//! | POST | `/api/users` | Register a user (status defaults to Active) |
//! | GET | `/api/users/assignees` | Active fixers, for the assignee picker |
//! | GET | `/api/users/{id}` | Single user |
//! | PUT | `/api/users/{id}` | Edit a user |
//! | DELETE | `/api/users/{id}` | Remove a user |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{InMemoryUserRepository, PgUserRepository, UserRepository};
pub use routes::routes;
pub use services::UserService;
