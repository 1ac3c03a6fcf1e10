//! Server configuration.
//!
//! Defaults overridable through `CARTA_`-prefixed environment variables
//! (`CARTA_PORT=9000`, `CARTA_TABLE_PATH=/var/lib/carta/menu.table`, ...).

use serde::Deserialize;
use std::net::SocketAddr;

/// Configuracion del servidor, cargada al arranque.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interfaz de escucha (default: 0.0.0.0)
    pub host: String,
    /// Puerto HTTP (default: 8000)
    pub port: u16,
    /// TTL de cache en segundos (default: 3600)
    pub cache_ttl_seconds: u64,
    /// Periodo del sync de tabla en segundos (default: 15)
    pub sync_interval_seconds: u64,
    /// Ruta de la tabla de admin; sin ella el sync queda deshabilitado
    pub table_path: Option<String>,
}

impl ServerConfig {
    /// Loads defaults plus environment overrides.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("cache_ttl_seconds", 3600)?
            .set_default("sync_interval_seconds", 15)?
            .add_source(config::Environment::with_prefix("CARTA"))
            .build()?
            .try_deserialize()
    }

    /// Returns the socket address to bind.
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.cache_ttl_seconds, 3600);
        assert_eq!(config.sync_interval_seconds, 15);
        assert!(config.table_path.is_none());
    }

    #[test]
    fn test_addr_is_parseable() {
        let config = ServerConfig::load().unwrap();
        let addr = config.addr().unwrap();
        assert_eq!(addr.port(), 8000);
    }
}
