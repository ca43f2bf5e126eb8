/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Page sizes offered by the defect list when none are configured
pub const DEFAULT_PAGE_SIZES: [i64; 3] = [20, 50, 100];

/// Number of defects shown in the dashboard "recent" table
pub const DEFAULT_RECENT_LIMIT: usize = 20;

// =============================================================================
// DEFECT DEFAULTS
// =============================================================================

/// Test types offered when `TEST_TYPES` is not configured
pub const DEFAULT_TEST_TYPES: [&str; 3] = ["unit", "integration", "pre-release"];

/// Reporting timezone used for day boundaries when none is configured (Asia/Seoul)
pub const DEFAULT_REPORTING_UTC_OFFSET: &str = "+09:00";

// =============================================================================
// HEADERS
// =============================================================================

/// Header carrying the role of the person performing a write
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";
