use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    pub environment: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Path of the JSON array holding every token record.
    pub data_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegistryConfig {
    pub runtime: RuntimeConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

impl RegistryConfig {
    pub fn from_env() -> Result<Self> {
        // Built-in defaults, then `config/default.(toml|yaml|json)` relative to the current
        // working directory, then `REGISTRY__...` environment variables.
        let settings = config::Config::builder()
            .set_default("runtime.environment", "development")?
            .set_default("api.bind_addr", "0.0.0.0:3001")?
            .set_default("storage.data_file", "data/tokens.json")?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("REGISTRY").separator("__"))
            .build()?;

        settings.try_deserialize().map_err(Into::into)
    }
}
