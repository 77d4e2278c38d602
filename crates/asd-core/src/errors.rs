//! Errores del core: taxonomía separada por fase (construcción del pipeline,
//! configuración de la corrida, fallo terminal de un step).
//!
//! `StepError` es serializable porque viaja dentro de eventos y reportes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gateway::GatewayError;
use crate::registry::RegistryError;

/// Fallo terminal de un Step dentro de una corrida.
///
/// Las variantes separan las tres razones que el reporte debe distinguir:
/// dependencia de artefacto sin resolver, transacción fallida y confirmación
/// vencida (el efecto on-chain puede seguir pendiente; la siguiente corrida
/// debe re-consultar el probe antes de reenviar).
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum StepError {
    #[error("contract '{0}' not found in registry")] UnresolvedContract(String),
    #[error("transaction reverted: {0}")] Reverted(String),
    #[error("gateway: {0}")] Gateway(String),
    #[error("confirmation timed out for tx {0}")] Unconfirmed(String),
    #[error("internal: {0}")] Internal(String),
}

impl From<GatewayError> for StepError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Reverted(reason) => StepError::Reverted(reason),
            other => StepError::Gateway(other.to_string()),
        }
    }
}

impl From<RegistryError> for StepError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(name) => StepError::UnresolvedContract(name),
        }
    }
}

/// Errores de construcción de una definición de pipeline. Se detectan todos
/// antes de tocar la cadena: una definición inválida nunca llega a ejecutarse.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum PipelineError {
    #[error("duplicate step id '{0}'")] DuplicateStep(String),
    #[error("step '{step}' depends on unknown step '{dependency}'")]
    UnknownDependency { step: String, dependency: String },
    #[error("dependency cycle among steps {0:?}")] DependencyCycle(Vec<String>),
    #[error("pipeline definition has no steps")] EmptyDefinition,
    #[error("unknown step '{0}'")] UnknownStep(String),
    #[error("unknown pipeline '{0}'")] UnknownPipeline(String),
}

/// Errores de configuración del runner, previos a cualquier interacción con
/// la cadena (red desconocida, firmante ausente, archivo de deployments).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("unknown network '{0}'")] UnknownNetwork(String),
    #[error("no signer configured (use --signer or DEPLOYER_ADDRESS)")] MissingSigner,
    #[error("deployments file {path}: {reason}")] Deployments { path: String, reason: String },
}
