use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::defects::models::Defect;

// ============================================================================
// Query parameters
// ============================================================================

/// Categories flipped against the configured enabled set
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CategoryToggleParams {
    /// Comma separated test types to toggle for this request
    pub toggle: Option<String>,
}

impl CategoryToggleParams {
    pub fn toggled_categories(&self) -> Vec<String> {
        self.toggle
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RecentParams {
    /// Number of defects to return
    #[param(minimum = 1)]
    pub limit: Option<usize>,
}

// ============================================================================
// Responses
// ============================================================================

/// Newest defects for the dashboard table
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardRecentDto {
    pub defects: Vec<Defect>,
    /// Size of the whole collection
    pub total: i64,
}

/// A test-type category and whether it counts towards the statistics
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryStatusDto {
    pub name: String,
    pub enabled: bool,
    pub defect_count: i64,
}
