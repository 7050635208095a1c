use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub session_secret: String,
}

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            session_secret: env::var("SESSION_SECRET").unwrap_or_else(|_| {
                "healthhub-development-session-secret-change-in-production".to_string()
            }),
        })
    }

    /// Get server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Create database configuration from environment
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:healthhub.db".to_string()),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
        })
    }

    /// Create database connection pool
    pub async fn create_pool(&self) -> Result<SqlitePool> {
        let options = SqliteConnectOptions::from_str(&self.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await?;

        Ok(pool)
    }
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Location of the pre-trained classifier artifact
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub path: PathBuf,
}

impl ModelConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "model.json".to_string())
                .into(),
        })
    }
}

/// Chart output directory and optional object-store bucket
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub static_dir: PathBuf,
    pub bucket: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "static".to_string())
                .into(),
            bucket: env::var("S3_BUCKET").ok().filter(|b| !b.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::Key;

    #[test]
    fn test_development_session_secret_derives_a_signing_key() {
        // The development default is shorter than the 64 bytes a raw key
        // needs, so it must go through key derivation rather than Key::from.
        let secret = "healthhub-development-session-secret-change-in-production";
        assert!(secret.len() < 64);
        let _key = Key::derive_from(secret.as_bytes());
    }
}
