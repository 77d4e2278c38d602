//! Artifact Registry: resolución de nombres lógicos de contratos.
//!
//! Un pipeline nombra sus contratos de forma lógica ("PoolConfigurator",
//! "AsdToken"); el registro devuelve el handle resuelto (dirección +
//! interfaz) para la red objetivo. Un `NotFound` es un error de
//! configuración fatal para el Step que lo necesita, distinto de un fallo
//! de transacción.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::gateway::Address;

/// Handle resuelto de un contrato desplegado. Inmutable durante una corrida.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractHandle {
    /// Nombre lógico bajo el cual fue registrado.
    pub name: String,
    pub address: Address,
    /// Interfaz de llamada (ABI u otra descripción) tal como la entrega el
    /// toolchain de compilación. El core no la interpreta.
    pub interface: Value,
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum RegistryError {
    #[error("artifact '{0}' not registered")] NotFound(String),
}

/// Servicio de resolución nombre lógico → handle desplegado.
pub trait ArtifactRegistry: Send + Sync {
    fn resolve(&self, logical_name: &str) -> Result<ContractHandle, RegistryError>;
}

/// Registro en memoria, poblado desde un archivo de deployments o a mano en
/// tests.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    inner: HashMap<String, ContractHandle>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, address: impl Into<Address>, interface: Value) {
        let name = name.into();
        self.inner.insert(name.clone(),
                          ContractHandle { name,
                                           address: address.into(),
                                           interface });
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl ArtifactRegistry for InMemoryRegistry {
    fn resolve(&self, logical_name: &str) -> Result<ContractHandle, RegistryError> {
        self.inner
            .get(logical_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(logical_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_registered_handles() {
        let mut reg = InMemoryRegistry::new();
        reg.register("AsdToken", "0x01", json!([]));
        let handle = reg.resolve("AsdToken").unwrap();
        assert_eq!(handle.address, "0x01");
        assert_eq!(handle.name, "AsdToken");
    }

    #[test]
    fn missing_name_is_not_found() {
        let reg = InMemoryRegistry::new();
        assert_eq!(reg.resolve("Pool").unwrap_err(), RegistryError::NotFound("Pool".into()));
    }
}
