//! Defect list filtering.
//!
//! A pure transform: the input collection is never modified and the result
//! is always sorted newest first.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};

use crate::core::config::DefectPolicyConfig;
use crate::features::defects::models::Defect;
use crate::shared::time::{end_of_day, parse_day, start_of_day};

/// Criteria for the defect list. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefectFilter {
    /// Exact severity label
    pub severity: Option<String>,
    /// Exact status label
    pub status: Option<String>,
    /// Case-sensitive substring of the creator name
    pub creator: Option<String>,
    /// Case-sensitive substring of the assignee name
    pub assignee: Option<String>,
    /// Exact test type; defects without one use the default category
    pub test_type: Option<String>,
    /// First day included, `YYYY-MM-DD`
    pub date_start: Option<String>,
    /// Last day included, `YYYY-MM-DD`
    pub date_end: Option<String>,
}

fn non_empty(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().filter(|value| !value.is_empty())
}

/// Criteria resolved once per call: labels borrowed, dates turned into instants
struct Predicate<'a> {
    severity: Option<&'a str>,
    status: Option<&'a str>,
    creator: Option<&'a str>,
    assignee: Option<&'a str>,
    test_type: Option<&'a str>,
    default_test_type: &'a str,
    from: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
}

impl<'a> Predicate<'a> {
    fn new(filter: &'a DefectFilter, policy: &'a DefectPolicyConfig) -> Self {
        let offset = policy.reporting_offset;
        let from = non_empty(&filter.date_start).and_then(|raw| {
            let bound = parse_day(raw).and_then(|day| start_of_day(day, offset));
            if bound.is_none() {
                tracing::debug!("Ignoring unparseable date_start filter: {:?}", raw);
            }
            bound
        });
        let until = non_empty(&filter.date_end).and_then(|raw| {
            let bound = parse_day(raw).and_then(|day| end_of_day(day, offset));
            if bound.is_none() {
                tracing::debug!("Ignoring unparseable date_end filter: {:?}", raw);
            }
            bound
        });

        Self {
            severity: non_empty(&filter.severity),
            status: non_empty(&filter.status),
            creator: non_empty(&filter.creator),
            assignee: non_empty(&filter.assignee),
            test_type: non_empty(&filter.test_type),
            default_test_type: &policy.default_test_type,
            from,
            until,
        }
    }

    fn matches(&self, defect: &Defect) -> bool {
        if self.severity.is_some_and(|s| defect.severity.as_str() != s) {
            return false;
        }
        if self.status.is_some_and(|s| defect.status.as_str() != s) {
            return false;
        }
        if self.creator.is_some_and(|c| !defect.creator.contains(c)) {
            return false;
        }
        if let Some(assignee) = self.assignee {
            match defect.assignee.as_deref() {
                Some(name) if name.contains(assignee) => {}
                _ => return false,
            }
        }
        if self
            .test_type
            .is_some_and(|t| defect.test_type_or(self.default_test_type) != t)
        {
            return false;
        }

        let created = defect.created_at_millis();
        if self.from.is_some_and(|from| created < from.timestamp_millis()) {
            return false;
        }
        if self
            .until
            .is_some_and(|until| created > until.timestamp_millis())
        {
            return false;
        }

        true
    }
}

/// Keep the defects matching every non-empty criterion, newest first.
///
/// Ties on `created_at` keep their input order. Missing or unparseable
/// creation times count as epoch 0, both for sorting and for date bounds.
pub fn filter_defects(
    defects: &[Defect],
    filter: &DefectFilter,
    policy: &DefectPolicyConfig,
) -> Vec<Defect> {
    let predicate = Predicate::new(filter, policy);

    let mut matched: Vec<Defect> = defects
        .iter()
        .filter(|defect| predicate.matches(defect))
        .cloned()
        .collect();

    // sort_by_key is stable
    matched.sort_by_key(|defect| Reverse(defect.created_at_millis()));
    matched
}
