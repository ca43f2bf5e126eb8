use std::sync::Arc;

use crate::core::config::DefectPolicyConfig;
use crate::core::error::Result;
use crate::features::dashboard::dtos::{CategoryStatusDto, DashboardRecentDto};
use crate::features::dashboard::services::stats_aggregator::{
    compute_stats, DefectStats, EnabledCategories,
};
use crate::features::defects::repositories::DefectRepository;
use crate::features::defects::services::filter_engine::{filter_defects, DefectFilter};

/// Read-only views over the defect collection
pub struct DashboardService {
    defects: Arc<dyn DefectRepository>,
    policy: Arc<DefectPolicyConfig>,
}

impl DashboardService {
    pub fn new(defects: Arc<dyn DefectRepository>, policy: Arc<DefectPolicyConfig>) -> Self {
        Self { defects, policy }
    }

    /// Configured enabled set with the caller's toggles applied on top
    fn enabled_categories(&self, toggled: &[String]) -> EnabledCategories {
        let mut enabled = EnabledCategories::with_disabled(self.policy.disabled_test_types.clone());
        for category in toggled {
            let now_enabled = enabled.toggle(category);
            tracing::debug!("Category {} toggled, enabled={}", category, now_enabled);
        }
        enabled
    }

    // ========================================================================
    // Summary
    // ========================================================================

    pub async fn get_summary(&self, toggled: &[String]) -> Result<DefectStats> {
        let defects = self.defects.list().await?;
        let enabled = self.enabled_categories(toggled);
        Ok(compute_stats(&defects, &enabled, &self.policy))
    }

    // ========================================================================
    // Recent
    // ========================================================================

    /// Newest defects first; `limit` falls back to the configured size
    pub async fn get_recent(&self, limit: Option<usize>) -> Result<DashboardRecentDto> {
        let limit = limit.unwrap_or(self.policy.recent_limit);
        let defects = self.defects.list().await?;
        let total = defects.len() as i64;

        let mut sorted = filter_defects(&defects, &DefectFilter::default(), &self.policy);
        sorted.truncate(limit);

        Ok(DashboardRecentDto {
            defects: sorted,
            total,
        })
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// Configured test types with their enabled flag and defect count.
    /// Categories found only in stored data are appended after the configured ones.
    pub async fn get_categories(&self, toggled: &[String]) -> Result<Vec<CategoryStatusDto>> {
        let defects = self.defects.list().await?;
        let enabled = self.enabled_categories(toggled);

        let mut names = self.policy.test_types.clone();
        for defect in &defects {
            let name = defect.test_type_or(&self.policy.default_test_type);
            if !names.iter().any(|known| known == name) {
                names.push(name.to_string());
            }
        }

        Ok(names
            .into_iter()
            .map(|name| {
                let defect_count = defects
                    .iter()
                    .filter(|d| d.test_type_or(&self.policy.default_test_type) == name)
                    .count() as i64;
                CategoryStatusDto {
                    enabled: enabled.is_enabled(&name),
                    name,
                    defect_count,
                }
            })
            .collect())
    }
}
