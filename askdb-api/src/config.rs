use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub executor: ExecutorConfig,
    pub cors: Option<CorsConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    /// Path of the bundled demo database, seeded on first run.
    pub demo_path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExecutorConfig {
    /// Row budget for query results returned to the UI.
    pub max_rows: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                demo_path: get_default_demo_path(),
            },
            llm: LlmConfig {
                model: askdb_llm::models::groq::DEFAULT_MODEL.to_string(),
                max_tokens: 1024,
            },
            executor: ExecutorConfig { max_rows: 500 },
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
        }
    }
}

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            let default_demo_path = get_default_demo_path();
            let default_config = format!(
                r#"
[server]
host = "127.0.0.1"
port = 8080

[database]
demo_path = "{}"

[llm]
model = "{}"
max_tokens = 1024

[executor]
max_rows = 500

[cors]
allowed_origins = ["http://localhost:3000"]

# The Groq API key is never stored here; set the GROQ_API_KEY
# environment variable instead.
"#,
                default_demo_path.display(),
                askdb_llm::models::groq::DEFAULT_MODEL,
            );
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let mut config: ApiConfig = builder.try_deserialize()?;

        // Expand tilde in the demo database path
        if config.database.demo_path.starts_with("~") {
            if let Some(home) = home::home_dir() {
                let path_str = config.database.demo_path.to_string_lossy();
                let expanded = path_str.replacen("~", &home.to_string_lossy(), 1);
                config.database.demo_path = PathBuf::from(expanded);
            }
        }

        Ok((config, config_path))
    }
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("askdb/api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

fn get_default_demo_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("askdb/demo.sqlite")
    } else {
        PathBuf::from("demo.sqlite")
    }
}
