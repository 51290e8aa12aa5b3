use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub jwt_secret: String,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Allowed CORS origin. Any origin is accepted when unset.
    #[serde(default)]
    pub frontend_url: Option<String>,

    /// Base used to build public image URLs.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,

    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    #[serde(default = "default_password_hash_cost")]
    pub password_hash_cost: u32,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    database_url: Option<String>,
    jwt_secret: Option<String>,
    bind_address: Option<String>,
    frontend_url: Option<String>,
    public_base_url: Option<String>,
    data_dir: Option<String>,
    log_dir: Option<String>,
    max_image_bytes: Option<usize>,
    token_ttl_hours: Option<i64>,
    password_hash_cost: Option<u32>,
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_max_image_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_password_hash_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl ServerConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config: PartialServerConfig = if let Some(path_str) = config_path {
            let path = Path::new(path_str);
            if path.exists() {
                let contents = fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
                toml::from_str(&contents)
                    .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))?
            } else {
                PartialServerConfig::default()
            }
        } else {
            PartialServerConfig::default()
        };

        // 2. Load from environment variables
        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        // 3. Merge: environment overrides file
        Self::merge(env_config, file_config)
    }

    fn merge(env_config: PartialServerConfig, file_config: PartialServerConfig) -> Result<Self, String> {
        let final_config = ServerConfig {
            database_url: env_config.database_url.or(file_config.database_url)
                .ok_or("DATABASE_URL is required")?,
            jwt_secret: env_config.jwt_secret.or(file_config.jwt_secret)
                .ok_or("JWT_SECRET is required")?,
            bind_address: env_config.bind_address.or(file_config.bind_address)
                .unwrap_or_else(default_bind_address),
            frontend_url: env_config.frontend_url.or(file_config.frontend_url),
            public_base_url: env_config.public_base_url.or(file_config.public_base_url)
                .unwrap_or_else(default_public_base_url),
            data_dir: env_config.data_dir.or(file_config.data_dir)
                .unwrap_or_else(default_data_dir),
            log_dir: env_config.log_dir.or(file_config.log_dir)
                .unwrap_or_else(default_log_dir),
            max_image_bytes: env_config.max_image_bytes.or(file_config.max_image_bytes)
                .unwrap_or_else(default_max_image_bytes),
            token_ttl_hours: env_config.token_ttl_hours.or(file_config.token_ttl_hours)
                .unwrap_or_else(default_token_ttl_hours),
            password_hash_cost: env_config.password_hash_cost.or(file_config.password_hash_cost)
                .unwrap_or_else(default_password_hash_cost),
        };

        if final_config.jwt_secret.is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }

        Ok(final_config)
    }

    /// Root directory of the image bucket.
    pub fn image_bucket_dir(&self) -> PathBuf {
        Path::new(&self.data_dir).join(crate::services::image_storage::BUCKET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required() -> PartialServerConfig {
        PartialServerConfig {
            database_url: Some("postgres://localhost/omou".to_string()),
            jwt_secret: Some("secret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = ServerConfig::merge(PartialServerConfig::default(), required()).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.public_base_url, "http://localhost:8080");
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.max_image_bytes, 5 * 1024 * 1024);
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.password_hash_cost, bcrypt::DEFAULT_COST);
        assert!(config.frontend_url.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let file = PartialServerConfig {
            data_dir: Some("/srv/file".to_string()),
            log_dir: Some("/var/log/file".to_string()),
            ..required()
        };
        let env = PartialServerConfig {
            data_dir: Some("/srv/env".to_string()),
            ..Default::default()
        };

        let config = ServerConfig::merge(env, file).unwrap();
        assert_eq!(config.data_dir, "/srv/env");
        assert_eq!(config.log_dir, "/var/log/file");
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let file = PartialServerConfig {
            jwt_secret: None,
            ..required()
        };
        let err = ServerConfig::merge(PartialServerConfig::default(), file).unwrap_err();
        assert_eq!(err, "JWT_SECRET is required");
    }

    #[test]
    fn test_bucket_dir_is_under_data_dir() {
        let config = ServerConfig::merge(PartialServerConfig::default(), required()).unwrap();
        assert_eq!(config.image_bucket_dir(), Path::new("data").join("flashcard-images"));
    }
}
