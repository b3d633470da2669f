use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Variable lookup used while building the configuration.
///
/// Empty values are treated as unset.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    /// Delay between startup connection attempts
    pub connect_retry_delay: Duration,
    /// Upper bound on startup connection attempts, 0 retries forever
    pub connect_max_attempts: u32,
}

/// S3 storage configuration for uploaded objects
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket receiving uploaded objects
    pub bucket: String,
    /// AWS region the bucket lives in
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, Ceph, ...)
    pub endpoint: Option<String>,
    /// Time budget for a single object upload
    pub upload_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    fn from_lookup(vars: Lookup) -> Result<Self, String> {
        Ok(Config {
            app: AppConfig::from_lookup(vars)?,
            database: DatabaseConfig::from_lookup(vars)?,
            storage: StorageConfig::from_lookup(vars)?,
            swagger: SwaggerConfig::from_lookup(vars),
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_UPLOAD_SIZE: usize = 32 * 1024 * 1024; // 32MB

    fn from_lookup(vars: Lookup) -> Result<Self, String> {
        let host = string_var(vars, "HOST", "0.0.0.0");
        let port = parse_var(vars, "SERVER_PORT", 8080u16)?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = string_var(vars, "CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size = parse_var(vars, "MAX_UPLOAD_SIZE", Self::DEFAULT_MAX_UPLOAD_SIZE)?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_upload_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 25;
    const DEFAULT_MIN_CONNECTIONS: u32 = 5;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes
    const DEFAULT_CONNECT_RETRY_DELAY_SECS: u64 = 5;

    fn from_lookup(vars: Lookup) -> Result<Self, String> {
        let connect_retry_delay_secs = parse_var(
            vars,
            "DB_CONNECT_RETRY_DELAY_SECS",
            Self::DEFAULT_CONNECT_RETRY_DELAY_SECS,
        )?;

        Ok(Self {
            host: string_var(vars, "DB_HOST", "localhost"),
            port: parse_var(vars, "DB_PORT", 5432u16)?,
            user: string_var(vars, "DB_USER", "postgres"),
            password: string_var(vars, "DB_PASSWORD", "postgres"),
            name: string_var(vars, "DB_NAME", "cloud_traveler"),
            ssl_mode: string_var(vars, "DB_SSLMODE", "disable"),
            max_connections: parse_var(vars, "DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_var(vars, "DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_var(
                vars,
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_var(
                vars,
                "DB_IDLE_TIMEOUT_SECS",
                Self::DEFAULT_IDLE_TIMEOUT_SECS,
            )?,
            max_lifetime_secs: parse_var(
                vars,
                "DB_MAX_LIFETIME_SECS",
                Self::DEFAULT_MAX_LIFETIME_SECS,
            )?,
            connect_retry_delay: Duration::from_secs(connect_retry_delay_secs),
            connect_max_attempts: parse_var(vars, "DB_CONNECT_MAX_ATTEMPTS", 0u32)?,
        })
    }
}

impl StorageConfig {
    const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;

    fn from_lookup(vars: Lookup) -> Result<Self, String> {
        let bucket = lookup(vars, "S3_BUCKET_NAME")
            .ok_or_else(|| "S3_BUCKET_NAME environment variable is required".to_string())?;

        let upload_timeout_secs = parse_var(
            vars,
            "UPLOAD_TIMEOUT_SECS",
            Self::DEFAULT_UPLOAD_TIMEOUT_SECS,
        )?;

        Ok(Self {
            bucket,
            region: string_var(vars, "AWS_REGION", "us-east-1"),
            endpoint: lookup(vars, "S3_ENDPOINT"),
            upload_timeout: Duration::from_secs(upload_timeout_secs),
        })
    }
}

impl SwaggerConfig {
    fn from_lookup(vars: Lookup) -> Self {
        Self {
            title: string_var(vars, "SWAGGER_TITLE", "Cloud Traveler API"),
            version: string_var(vars, "SWAGGER_VERSION", env!("CARGO_PKG_VERSION")),
            description: string_var(
                vars,
                "SWAGGER_DESCRIPTION",
                "File upload service backed by S3 and PostgreSQL",
            ),
        }
    }
}

fn lookup(vars: Lookup, key: &str) -> Option<String> {
    vars(key).filter(|v| !v.is_empty())
}

fn string_var(vars: Lookup, key: &str, default: &str) -> String {
    lookup(vars, key).unwrap_or_else(|| default.to_string())
}

fn parse_var<T: FromStr>(vars: Lookup, key: &str, default: T) -> Result<T, String> {
    match lookup(vars, key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}
