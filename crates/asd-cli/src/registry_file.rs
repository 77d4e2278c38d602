//! Carga de artefactos desplegados desde disco.
//!
//! El toolchain de contratos deja por red un JSON `deployments/<red>.json`
//! con `{ "Nombre": { "address": "0x..", "abi": [...] } }`. Acá se vuelca a
//! un `InMemoryRegistry` para la corrida; también se puede sembrar el estado
//! de lectura del gateway desde un archivo `[{ target, method, value }]`
//! para ensayar corridas sin cadena.

use std::fs;
use std::path::Path;

use serde_json::Value;

use asd_core::{ConfigError, InMemoryGateway, InMemoryRegistry};

fn bad(path: &Path, reason: impl Into<String>) -> ConfigError {
    ConfigError::Deployments { path:   path.display().to_string(),
                               reason: reason.into() }
}

pub fn load_registry(path: &Path) -> Result<InMemoryRegistry, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| bad(path, e.to_string()))?;
    let doc: Value = serde_json::from_str(&text).map_err(|e| bad(path, e.to_string()))?;
    let entries = doc.as_object()
                     .ok_or_else(|| bad(path, "se esperaba un objeto JSON de contratos"))?;

    let mut registry = InMemoryRegistry::new();
    for (name, entry) in entries {
        let address = entry.get("address")
                           .and_then(Value::as_str)
                           .ok_or_else(|| bad(path, format!("contrato '{name}' sin address")))?;
        let interface = entry.get("abi").cloned().unwrap_or(Value::Null);
        registry.register(name.as_str(), address, interface);
    }
    Ok(registry)
}

/// Siembra lecturas `(target, method) -> value` en el gateway en memoria.
pub fn seed_gateway(gateway: &InMemoryGateway, path: &Path) -> Result<usize, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| bad(path, e.to_string()))?;
    let doc: Value = serde_json::from_str(&text).map_err(|e| bad(path, e.to_string()))?;
    let rows = doc.as_array()
                  .ok_or_else(|| bad(path, "se esperaba un arreglo de lecturas"))?;

    for (i, row) in rows.iter().enumerate() {
        let target = row.get("target").and_then(Value::as_str);
        let method = row.get("method").and_then(Value::as_str);
        let value = row.get("value");
        match (target, method, value) {
            (Some(target), Some(method), Some(value)) => {
                gateway.seed_state(target, method, value.clone());
            }
            _ => return Err(bad(path, format!("fila {i}: faltan target/method/value"))),
        }
    }
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use asd_core::ArtifactRegistry;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn registry_loads_addresses_and_abi() {
        let path = write_temp("asd-deployments-ok.json",
                              r#"{ "AsdToken": { "address": "0xa5d0", "abi": [] } }"#);
        let registry = load_registry(&path).unwrap();
        let handle = registry.resolve("AsdToken").unwrap();
        assert_eq!(handle.address, "0xa5d0");
    }

    #[test]
    fn missing_address_is_a_deployments_error() {
        let path = write_temp("asd-deployments-bad.json", r#"{ "AsdToken": { "abi": [] } }"#);
        let err = load_registry(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Deployments { .. }), "{err}");
    }

    #[test]
    fn seed_file_populates_gateway_reads() {
        let path = write_temp("asd-state.json",
                              r#"[{ "target": "0xa5d0", "method": "isInitialized", "value": true }]"#);
        let gateway = InMemoryGateway::new();
        assert_eq!(seed_gateway(&gateway, &path).unwrap(), 1);
    }
}
