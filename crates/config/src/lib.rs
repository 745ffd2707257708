//! sfera-config - carregamento de configuração

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// Configuração do banco de dados
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    // Produção: 50, demais ambientes: 10
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 50,
        _ => 10,
    }
}

/// Configuração de JWT
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    // 24h, como o painel sempre usou
    86400
}

/// Configuração do servidor
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Configuração de telemetria
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuração de upload de planilhas (módulo IAF)
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Tamanho máximo do arquivo em bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
    /// Fração máxima do inventário que um upload pode remover sem `forcar`
    #[serde(default = "default_max_removal_ratio")]
    pub max_removal_ratio: f64,
}

fn default_max_file_size() -> usize {
    10 * 1024 * 1024
}

fn default_max_removal_ratio() -> f64 {
    0.5
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            max_removal_ratio: default_max_removal_ratio(),
        }
    }
}

/// Configuração da aplicação
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    pub app_env: String,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

impl AppConfig {
    /// Carrega a configuração de arquivos TOML e variáveis de ambiente
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config: Self = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("").split("_"))
            .extract()?;

        Ok(config)
    }

    /// Ambiente de produção?
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// Ambiente de desenvolvimento?
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

#[cfg(test)]
mod tests;
