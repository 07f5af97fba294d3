pub mod database;

use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_page_size: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT value: {}", e))?,

            max_page_size: env::var("MAX_PAGE_SIZE")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid MAX_PAGE_SIZE value: {}", e))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn missing_database_url_is_an_error() {
        env::remove_var("DATABASE_URL");
        let result = Config::from_env();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn bad_port_is_an_error_not_a_panic() {
        env::set_var("DATABASE_URL", "postgres://localhost/sisciac");
        env::set_var("PORT", "not-a-port");
        let result = Config::from_env();
        assert!(result.is_err());
        env::remove_var("PORT");
        env::remove_var("DATABASE_URL");
    }
}
