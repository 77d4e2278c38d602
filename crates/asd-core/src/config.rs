//! Configuración explícita de una corrida.
//!
//! Nada se lee de estado ambiente aquí: el runner construye estos valores y
//! los pasa por parámetro, de modo que una corrida sea reproducible y
//! testeable en aislamiento. La carga desde variables de entorno vive en el
//! binario.

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONFIRMATIONS, DEFAULT_TX_TIMEOUT_SECS};
use crate::errors::ConfigError;
use crate::gateway::Address;

/// Anclaje de estado: la red arranca con el estado de otra cadena a una
/// altura histórica fija. Consumido sólo por el cliente de cadena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkConfig {
    pub url: String,
    pub block_number: Option<u64>,
}

/// Un endpoint de cadena con nombre, con fork opcional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub url: String,
    pub fork: Option<ForkConfig>,
}

/// Tabla de redes conocidas, en orden de declaración.
#[derive(Debug, Clone, Default)]
pub struct Networks {
    inner: IndexMap<String, NetworkConfig>,
}

impl Networks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, network: NetworkConfig) {
        self.inner.insert(network.name.clone(), network);
    }

    /// Resuelve una red por nombre; desconocida es error de configuración.
    pub fn resolve(&self, name: &str) -> Result<&NetworkConfig, ConfigError> {
        self.inner
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(|k| k.as_str())
    }
}

/// Contexto de ejecución de una corrida: red objetivo, firmante y política
/// de confirmación. Se construye una vez y se enhebra por el engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    pub network: String,
    pub signer: Address,
    pub confirmations: u64,
    pub tx_timeout: Duration,
}

impl ExecutionConfig {
    pub fn new(network: impl Into<String>, signer: impl Into<Address>) -> Self {
        Self { network: network.into(),
               signer: signer.into(),
               confirmations: DEFAULT_CONFIRMATIONS,
               tx_timeout: Duration::from_secs(DEFAULT_TX_TIMEOUT_SECS) }
    }

    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }

    pub fn with_tx_timeout(mut self, timeout: Duration) -> Self {
        self.tx_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_network_is_a_config_error() {
        let mut networks = Networks::new();
        networks.insert(NetworkConfig { name: "mainnet".into(),
                                        url: "http://localhost:8545".into(),
                                        fork: None });
        assert!(networks.resolve("mainnet").is_ok());
        assert_eq!(networks.resolve("goerli").unwrap_err(),
                   ConfigError::UnknownNetwork("goerli".into()));
    }

    #[test]
    fn execution_config_defaults() {
        let cfg = ExecutionConfig::new("hardhat", "0xdeployer");
        assert_eq!(cfg.confirmations, DEFAULT_CONFIRMATIONS);
        assert_eq!(cfg.tx_timeout, Duration::from_secs(DEFAULT_TX_TIMEOUT_SECS));
    }
}
