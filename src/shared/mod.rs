pub mod constants;
pub mod pagination;
pub mod seed;
pub mod test_helpers;
pub mod text_enum;
pub mod time;
pub mod types;
pub mod validation;
