// ============================================================================
// Configuration
// ============================================================================
// Lue depuis les variables d'environnement, avec des valeurs par défaut :
//
//   ETF_SNAPSHOT_OUTPUT            chemin du JSON  (public/etf_data.json)
//   ETF_SNAPSHOT_EXCHANGE_RATE     KRW pour 1 USD  (1450)
//   ETF_SNAPSHOT_REQUEST_DELAY_MS  pause entre deux symboles (500)
//   ETF_SNAPSHOT_LOG_DIR           répertoire des logs (./logs)
//
// La watchlist est la liste par défaut, passée explicitement au builder.
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::models::{default_watchlist, SymbolDescriptor};

pub const ENV_OUTPUT: &str = "ETF_SNAPSHOT_OUTPUT";
pub const ENV_EXCHANGE_RATE: &str = "ETF_SNAPSHOT_EXCHANGE_RATE";
pub const ENV_REQUEST_DELAY_MS: &str = "ETF_SNAPSHOT_REQUEST_DELAY_MS";
pub const ENV_LOG_DIR: &str = "ETF_SNAPSHOT_LOG_DIR";

pub const DEFAULT_OUTPUT: &str = "public/etf_data.json";
/// Taux fixe : 1 USD = 1450 KRW
pub const DEFAULT_EXCHANGE_RATE: f64 = 1450.0;
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;
pub const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Debug, Clone)]
pub struct Config {
    pub output_path: PathBuf,
    pub exchange_rate: f64,
    pub request_delay: Duration,
    pub log_dir: PathBuf,
    pub symbols: Vec<SymbolDescriptor>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la configuration depuis une fonction de lecture
    ///
    /// CONCEPT RUST : impl Fn
    /// - Les tests passent une HashMap au lieu de modifier l'environnement
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Une variable vide est traitée comme absente
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let output_path = get(ENV_OUTPUT)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let exchange_rate = match get(ENV_EXCHANGE_RATE) {
            Some(raw) => raw
                .parse::<f64>()
                .with_context(|| format!("{} invalide : {:?}", ENV_EXCHANGE_RATE, raw))?,
            None => DEFAULT_EXCHANGE_RATE,
        };
        if !exchange_rate.is_finite() || exchange_rate <= 0.0 {
            anyhow::bail!("{} doit être un nombre positif (reçu {})", ENV_EXCHANGE_RATE, exchange_rate);
        }

        let delay_ms = match get(ENV_REQUEST_DELAY_MS) {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("{} invalide : {:?}", ENV_REQUEST_DELAY_MS, raw))?,
            None => DEFAULT_REQUEST_DELAY_MS,
        };

        let log_dir = get(ENV_LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        Ok(Self {
            output_path,
            exchange_rate,
            request_delay: Duration::from_millis(delay_ms),
            log_dir,
            symbols: default_watchlist(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.output_path, PathBuf::from("public/etf_data.json"));
        assert_eq!(config.exchange_rate, 1450.0);
        assert_eq!(config.request_delay, Duration::from_millis(500));
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
        assert_eq!(config.symbols.len(), 10);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            (ENV_OUTPUT, "/srv/frontend/public/etf_data.json"),
            (ENV_EXCHANGE_RATE, "1380.5"),
            (ENV_REQUEST_DELAY_MS, "0"),
            (ENV_LOG_DIR, "/var/log/etf"),
        ])
        .unwrap();

        assert_eq!(config.output_path, PathBuf::from("/srv/frontend/public/etf_data.json"));
        assert_eq!(config.exchange_rate, 1380.5);
        assert!(config.request_delay.is_zero());
        assert_eq!(config.log_dir, PathBuf::from("/var/log/etf"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config(&[(ENV_OUTPUT, "  "), (ENV_EXCHANGE_RATE, "")]).unwrap();
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.exchange_rate, DEFAULT_EXCHANGE_RATE);
    }

    #[test]
    fn test_invalid_exchange_rate() {
        assert!(config(&[(ENV_EXCHANGE_RATE, "abc")]).is_err());
        assert!(config(&[(ENV_EXCHANGE_RATE, "0")]).is_err());
        assert!(config(&[(ENV_EXCHANGE_RATE, "-3")]).is_err());
        assert!(config(&[(ENV_EXCHANGE_RATE, "NaN")]).is_err());
    }

    #[test]
    fn test_invalid_delay() {
        assert!(config(&[(ENV_REQUEST_DELAY_MS, "-1")]).is_err());
    }
}
