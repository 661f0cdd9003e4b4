use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 =
            var("PORT").unwrap_or_else(|| "8080".to_string()).parse().context("PORT")?;

        let max_body_bytes: usize =
            var("MAX_BODY_BYTES").and_then(|s| s.parse().ok()).unwrap_or(64 * 1024);

        Ok(Self { addr: format!("{host}:{port}").parse().context("HOST/PORT")?, max_body_bytes })
    }
}
