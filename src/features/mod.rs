pub mod dashboard;
pub mod defects;
pub mod users;
