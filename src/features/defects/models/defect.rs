use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::text_enum::text_enum;
use crate::shared::time::{lenient_day, lenient_timestamp};

text_enum! {
    /// Business impact of a defect (Critical > Major > Minor > Simple)
    pub enum Severity {
        Critical => "Critical"; "critical",
        Major => "Major"; "major",
        Minor => "Minor"; "minor",
        Simple => "Simple"; "simple",
    }
}

impl Severity {
    /// Bucket used by the severity histogram; unknown labels count as Minor
    pub fn histogram_bucket(&self) -> Severity {
        if self.is_recognized() {
            self.clone()
        } else {
            Severity::Minor
        }
    }
}

text_enum! {
    /// Scheduling urgency, P1 highest
    pub enum Priority {
        P1 => "P1"; "p1",
        P2 => "P2"; "p2",
        P3 => "P3"; "p3",
        P4 => "P4"; "p4",
    }
}

text_enum! {
    /// Workflow state. Any status may follow any other.
    pub enum DefectStatus {
        New => "New",
        Open => "Open",
        InProgress => "In Progress",
        Resolved => "Resolved",
        Verified => "Verified",
        Closed => "Closed",
        Reopened => "Reopened",
    }
}

impl DefectStatus {
    /// Still waiting on a fix
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            DefectStatus::New
                | DefectStatus::Open
                | DefectStatus::InProgress
                | DefectStatus::Reopened
        )
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, DefectStatus::Resolved | DefectStatus::Closed)
    }
}

/// A tracked defect as stored by the repository.
///
/// Deserialization is lenient: enum fields keep unknown labels and a missing or
/// malformed timestamp becomes `None`, so a damaged record never aborts a
/// listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Defect {
    pub defect_id: i64,
    #[serde(default)]
    pub test_type: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    #[schema(value_type = String, example = "Major")]
    pub severity: Severity,
    #[serde(default)]
    #[schema(value_type = String, example = "P2")]
    pub priority: Priority,
    #[serde(default)]
    #[schema(value_type = String, example = "In Progress")]
    pub status: DefectStatus,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub menu_name: Option<String>,
    #[serde(default)]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub screen_url: Option<String>,
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub env_info: Option<String>,
    #[serde(default)]
    pub steps_to_repro: Option<String>,
    #[serde(default)]
    pub action_comment: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_day")]
    pub action_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_day")]
    pub action_end: Option<NaiveDate>,
}

impl Defect {
    /// Test type with the configured default applied when absent
    pub fn test_type_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.test_type.as_deref() {
            Some(test_type) if !test_type.trim().is_empty() => test_type,
            _ => default,
        }
    }

    /// Creation time in epoch milliseconds; records without one sort as epoch 0
    pub fn created_at_millis(&self) -> i64 {
        self.created_at
            .map(|created_at| created_at.timestamp_millis())
            .unwrap_or(0)
    }
}

/// Data for creating a new defect. Defaults are already resolved.
#[derive(Debug, Clone)]
pub struct NewDefect {
    pub test_type: String,
    pub title: String,
    pub severity: Severity,
    pub priority: Priority,
    pub status: DefectStatus,
    pub creator: String,
    pub assignee: Option<String>,
    pub menu_name: Option<String>,
    pub screen_name: Option<String>,
    pub screen_url: Option<String>,
    pub screenshot: Option<String>,
    pub env_info: Option<String>,
    pub steps_to_repro: Option<String>,
    pub action_comment: Option<String>,
    pub action_start: Option<NaiveDate>,
    pub action_end: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl NewDefect {
    pub fn into_defect(self, defect_id: i64) -> Defect {
        Defect {
            defect_id,
            test_type: Some(self.test_type),
            title: self.title,
            severity: self.severity,
            priority: self.priority,
            status: self.status,
            creator: self.creator,
            assignee: self.assignee,
            menu_name: self.menu_name,
            screen_name: self.screen_name,
            screen_url: self.screen_url,
            screenshot: self.screenshot,
            env_info: self.env_info,
            steps_to_repro: self.steps_to_repro,
            action_comment: self.action_comment,
            created_at: Some(self.created_at),
            updated_at: None,
            action_start: self.action_start,
            action_end: self.action_end,
        }
    }
}

/// Partial update of a defect; `None` leaves the stored value untouched and
/// `Some(None)` clears an optional text field
#[derive(Debug, Clone, Default)]
pub struct DefectChanges {
    pub test_type: Option<Option<String>>,
    pub title: Option<String>,
    pub severity: Option<Severity>,
    pub priority: Option<Priority>,
    pub status: Option<DefectStatus>,
    pub creator: Option<String>,
    pub assignee: Option<Option<String>>,
    pub menu_name: Option<Option<String>>,
    pub screen_name: Option<Option<String>>,
    pub screen_url: Option<Option<String>>,
    pub screenshot: Option<Option<String>>,
    pub env_info: Option<Option<String>>,
    pub steps_to_repro: Option<Option<String>>,
    pub action_comment: Option<Option<String>>,
    pub action_start: Option<NaiveDate>,
    pub action_end: Option<NaiveDate>,
}

impl DefectChanges {
    /// Merge into `defect` and stamp `updated_at`. Identity and creation time never change.
    pub fn apply_to(self, defect: &mut Defect, now: DateTime<Utc>) {
        merge(&mut defect.title, self.title);
        merge(&mut defect.severity, self.severity);
        merge(&mut defect.priority, self.priority);
        merge(&mut defect.status, self.status);
        merge(&mut defect.creator, self.creator);
        merge(&mut defect.test_type, self.test_type);
        merge(&mut defect.assignee, self.assignee);
        merge(&mut defect.menu_name, self.menu_name);
        merge(&mut defect.screen_name, self.screen_name);
        merge(&mut defect.screen_url, self.screen_url);
        merge(&mut defect.screenshot, self.screenshot);
        merge(&mut defect.env_info, self.env_info);
        merge(&mut defect.steps_to_repro, self.steps_to_repro);
        merge(&mut defect.action_comment, self.action_comment);
        merge_optional(&mut defect.action_start, self.action_start);
        merge_optional(&mut defect.action_end, self.action_end);

        // Clock skew must not produce updated_at < created_at
        defect.updated_at = Some(match defect.created_at {
            Some(created_at) if created_at > now => created_at,
            _ => now,
        });
    }
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn merge_optional<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}
