use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub service_name: String,
    pub listen_port: String,
    pub store_backend: StoreBackend,
    pub database_url: String,
    pub database_pool_max_connections: u32,
    // used by the command line client
    pub api_base_url: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_env(Environment::default())
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .set_default("service_name", "apptrack")?
            .set_default("listen_port", "3000")?
            .set_default("store_backend", "postgres")?
            .set_default("database_url", "")?
            .set_default("database_pool_max_connections", 5)?
            .set_default("api_base_url", "http://localhost:3000")?
            .add_source(env)
            .build()?;
        let mut s: Settings = conf.try_deserialize()?;
        s.api_base_url = s.api_base_url.trim_end_matches('/').to_string();
        Ok(s)
    }
}
