use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Allowed browser origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
    pub room_ttl: Duration,
    pub sweep_interval: Duration,
    /// Pause between a turn-ending guess and the automatic turn change.
    pub turn_advance_delay: Duration,
    pub rng_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_origins: Vec::new(),
            room_ttl: Duration::from_secs(24 * 60 * 60),
            sweep_interval: Duration::from_secs(5 * 60),
            turn_advance_delay: Duration::from_millis(500),
            rng_seed: None,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.room_ttl.is_zero() {
            return Err(anyhow!("room TTL must be greater than zero"));
        }
        if self.sweep_interval.is_zero() {
            return Err(anyhow!("sweep interval must be greater than zero"));
        }
        Ok(())
    }

    pub fn cors_layer(&self) -> Result<CorsLayer> {
        let origins: Vec<&str> = self
            .cors_origins
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .collect();

        if origins.is_empty() || origins.contains(&"*") {
            return Ok(CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any));
        }

        let origins = origins
            .into_iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {:?}", o))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, DEFAULT_BIND.parse().unwrap());
        assert_eq!(config.turn_advance_delay, Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let config = ServerConfig {
            sweep_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cors_origins() {
        let mut config = ServerConfig::default();
        assert!(config.cors_layer().is_ok());

        config.cors_origins = vec!["http://localhost:5173".into(), " https://duet.example ".into()];
        assert!(config.cors_layer().is_ok());

        config.cors_origins = vec!["bad\norigin".into()];
        assert!(config.cors_layer().is_err());
    }
}
