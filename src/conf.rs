use config::{Config, ConfigError, Environment};
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub service_name: String,
    pub listen_port: String,
    pub database_url: String,
    pub database_pool_max_connections: u32,
    pub database_acquire_timeout_secs: u64,
    //auth
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .set_default("service_name", "careers-api")?
            .set_default("listen_port", "4000")?
            .set_default("database_pool_max_connections", 5)?
            .set_default("database_acquire_timeout_secs", 30)?
            .set_default("jwt_secret", "your-secret-key")?
            .set_default("token_ttl_hours", 24)?
            .add_source(Environment::default())
            .build()?;
        let s: Settings = conf.try_deserialize()?;
        if s.jwt_secret == "your-secret-key" {
            tracing::warn!("JWT_SECRET not set, signing tokens with the development secret");
        }
        Ok(s)
    }
}

lazy_static! {
    pub static ref settings: Settings = Settings::new().expect("improperly configured");
}
