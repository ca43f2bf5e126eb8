//! Dashboard statistics over a defect collection.

use std::collections::HashSet;

use serde::Serialize;
use utoipa::ToSchema;

use crate::core::config::DefectPolicyConfig;
use crate::features::defects::models::{Defect, DefectStatus, Severity};

/// Test-type categories included in the statistics.
///
/// Stored as the set of switched-off names, so a category nobody configured
/// is enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledCategories {
    disabled: HashSet<String>,
}

impl EnabledCategories {
    #[cfg(test)]
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_disabled<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            disabled: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_enabled(&self, category: &str) -> bool {
        !self.disabled.contains(category)
    }

    pub fn enable(&mut self, category: &str) {
        self.disabled.remove(category);
    }

    pub fn disable(&mut self, category: &str) {
        self.disabled.insert(category.to_string());
    }

    /// Flip a category and return whether it is now enabled
    pub fn toggle(&mut self, category: &str) -> bool {
        if self.is_enabled(category) {
            self.disable(category);
            false
        } else {
            self.enable(category);
            true
        }
    }
}

/// One histogram bar
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HistogramBucket {
    pub label: String,
    pub count: i64,
    /// Share of `total` in percent, one decimal
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DefectStats {
    pub total: i64,
    pub open: i64,
    pub resolved: i64,
    pub critical: i64,
    /// One bucket per known status, in workflow order
    pub status_histogram: Vec<HistogramBucket>,
    /// One bucket per known severity, most severe first
    pub severity_histogram: Vec<HistogramBucket>,
}

/// Percentage rounded to one decimal; 0 when there is nothing to divide by
pub fn percentage(count: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (count as f64 * 1000.0 / total as f64).round() / 10.0
}

fn histogram<T: std::fmt::Display>(variants: &[T], counts: &[i64], total: i64) -> Vec<HistogramBucket> {
    variants
        .iter()
        .zip(counts)
        .map(|(variant, &count)| HistogramBucket {
            label: variant.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

/// Count the defects of enabled categories in a single pass.
///
/// Unknown statuses count towards `total` but no status bucket; unknown
/// severities fall into the `Minor` bucket.
pub fn compute_stats(
    defects: &[Defect],
    enabled: &EnabledCategories,
    policy: &DefectPolicyConfig,
) -> DefectStats {
    let statuses = DefectStatus::known();
    let severities = Severity::known();
    let mut status_counts = vec![0i64; statuses.len()];
    let mut severity_counts = vec![0i64; severities.len()];
    let (mut total, mut open, mut resolved, mut critical) = (0i64, 0i64, 0i64, 0i64);

    for defect in defects
        .iter()
        .filter(|d| enabled.is_enabled(d.test_type_or(&policy.default_test_type)))
    {
        total += 1;
        if defect.status.is_open() {
            open += 1;
        }
        if defect.status.is_resolved() {
            resolved += 1;
        }
        if defect.severity == Severity::Critical {
            critical += 1;
        }

        if let Some(slot) = defect.status.ordinal() {
            status_counts[slot] += 1;
        }
        if let Some(slot) = defect.severity.histogram_bucket().ordinal() {
            severity_counts[slot] += 1;
        }
    }

    DefectStats {
        total,
        open,
        resolved,
        critical,
        status_histogram: histogram(&statuses, &status_counts, total),
        severity_histogram: histogram(&severities, &severity_counts, total),
    }
}
