use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::validation::blank_or_email;

/// Request DTO for registering a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    /// Tester, QA, Fixer or Admin (Korean labels accepted)
    #[schema(example = "Fixer")]
    pub role: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 100, message = "Department must not exceed 100 characters"))]
    pub department: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Defaults to Active
    pub status: Option<String>,
}

/// Request DTO for editing a user; omitted fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    pub role: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Department must not exceed 100 characters"))]
    pub department: Option<String>,

    /// A blank value clears the stored address
    #[validate(custom(function = "blank_or_email"))]
    pub email: Option<String>,

    pub status: Option<String>,
}
