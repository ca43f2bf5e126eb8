use std::env;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};

use crate::shared::constants::{
    DEFAULT_PAGE_SIZES, DEFAULT_RECENT_LIMIT, DEFAULT_REPORTING_UTC_OFFSET, DEFAULT_TEST_TYPES,
};
use crate::shared::time::parse_utc_offset;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    /// Present only when the PostgreSQL backend is selected
    pub database: Option<DatabaseConfig>,
    pub defects: DefectPolicyConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "Invalid STORAGE_BACKEND '{}': expected 'postgres' or 'memory'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Load the bundled sample defects and users into the in-memory store
    pub seed_sample_data: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Categories, page sizes and reporting timezone shared by the list and
/// dashboard views
#[derive(Debug, Clone, PartialEq)]
pub struct DefectPolicyConfig {
    /// Known test types, in display order
    pub test_types: Vec<String>,
    /// Applied to defects stored without a test type
    pub default_test_type: String,
    /// Test types switched off in the dashboard statistics
    pub disabled_test_types: Vec<String>,
    pub page_sizes: Vec<i64>,
    pub default_page_size: i64,
    /// Timezone whose calendar days bound the date filters
    pub reporting_offset: FixedOffset,
    pub recent_limit: usize,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                tracing::warn!("Error loading .env file: {}", e);
            }
        }

        let storage = StorageConfig::from_env()?;
        let database = match storage.backend {
            StorageBackend::Postgres => Some(DatabaseConfig::from_env()?),
            StorageBackend::Memory => None,
        };

        Ok(Config {
            app: AppConfig::from_env()?,
            storage,
            database,
            defects: DefectPolicyConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins =
            parse_list(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse::<StorageBackend>()?;
        let seed_sample_data = env::var("MEMORY_SEED")
            .unwrap_or_else(|_| "false".to_string())
            .trim()
            .parse::<bool>()
            .map_err(|e| format!("Invalid MEMORY_SEED: {}", e))?;

        Ok(Self {
            backend,
            seed_sample_data,
        })
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl DefectPolicyConfig {
    pub fn from_env() -> Result<Self, String> {
        let test_types = env::var("TEST_TYPES")
            .map(|raw| parse_list(&raw))
            .ok()
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| DEFAULT_TEST_TYPES.iter().map(|t| t.to_string()).collect());

        let default_test_type = env::var("DEFAULT_TEST_TYPE")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| test_types[0].clone());

        let disabled_test_types = parse_list(&env::var("DISABLED_TEST_TYPES").unwrap_or_default());

        let page_sizes = match env::var("PAGE_SIZES") {
            Ok(raw) => parse_list(&raw)
                .iter()
                .map(|size| size.parse::<i64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| "PAGE_SIZES must be a comma separated list of numbers".to_string())?,
            Err(_) => DEFAULT_PAGE_SIZES.to_vec(),
        };
        if page_sizes.is_empty() || page_sizes.iter().any(|size| *size < 1) {
            return Err("PAGE_SIZES must list at least one positive size".to_string());
        }

        let default_page_size = match env::var("DEFAULT_PAGE_SIZE") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| "DEFAULT_PAGE_SIZE must be a valid number".to_string())?,
            Err(_) => page_sizes[0],
        };
        if !page_sizes.contains(&default_page_size) {
            return Err(format!(
                "DEFAULT_PAGE_SIZE {} is not one of PAGE_SIZES {:?}",
                default_page_size, page_sizes
            ));
        }

        let raw_offset = env::var("REPORTING_UTC_OFFSET")
            .unwrap_or_else(|_| DEFAULT_REPORTING_UTC_OFFSET.to_string());
        let reporting_offset = parse_utc_offset(&raw_offset).ok_or_else(|| {
            format!(
                "REPORTING_UTC_OFFSET '{}' must look like +09:00 or -05:30",
                raw_offset
            )
        })?;

        let recent_limit = env::var("RECENT_DEFECTS_LIMIT")
            .unwrap_or_else(|_| DEFAULT_RECENT_LIMIT.to_string())
            .parse::<usize>()
            .map_err(|_| "RECENT_DEFECTS_LIMIT must be a valid number".to_string())?;

        Ok(Self {
            test_types,
            default_test_type,
            disabled_test_types,
            page_sizes,
            default_page_size,
            reporting_offset,
            recent_limit,
        })
    }

    /// Requested page size if it is one of the offered sizes, otherwise the default
    pub fn resolve_page_size(&self, requested: Option<i64>) -> i64 {
        match requested {
            Some(size) if self.page_sizes.contains(&size) => size,
            _ => self.default_page_size,
        }
    }
}

impl Default for DefectPolicyConfig {
    fn default() -> Self {
        let test_types: Vec<String> = DEFAULT_TEST_TYPES.iter().map(|t| t.to_string()).collect();
        Self {
            default_test_type: test_types[0].clone(),
            test_types,
            disabled_test_types: Vec::new(),
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            default_page_size: DEFAULT_PAGE_SIZES[0],
            reporting_offset: parse_utc_offset(DEFAULT_REPORTING_UTC_OFFSET)
                .unwrap_or_else(|| Utc.fix()),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "DefectFlow API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for DefectFlow".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

/// Split a comma separated setting, dropping blanks
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_drops_blanks() {
        assert_eq!(
            parse_list(" unit, ,integration ,"),
            vec!["unit".to_string(), "integration".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("Postgres".parse(), Ok(StorageBackend::Postgres));
        assert_eq!("memory".parse(), Ok(StorageBackend::Memory));
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_resolve_page_size() {
        let policy = DefectPolicyConfig::default();
        assert_eq!(policy.resolve_page_size(Some(50)), 50);
        assert_eq!(policy.resolve_page_size(Some(100)), 100);
        assert_eq!(policy.resolve_page_size(Some(33)), 20);
        assert_eq!(policy.resolve_page_size(Some(0)), 20);
        assert_eq!(policy.resolve_page_size(None), 20);
    }

    #[test]
    fn test_default_policy() {
        let policy = DefectPolicyConfig::default();
        assert_eq!(policy.default_test_type, "unit");
        assert_eq!(policy.test_types.len(), 3);
        assert_eq!(policy.reporting_offset.local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_swagger_credentials_require_both_parts() {
        let mut swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(swagger.credentials(), None);

        swagger.password = Some("secret".to_string());
        assert_eq!(swagger.credentials(), Some("admin:secret".to_string()));
    }
}
