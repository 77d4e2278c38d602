//! Chain Gateway: interfaz hacia el cliente de cadena (colaborador externo).
//!
//! El core nunca habla JSON-RPC directamente: firma y envío de transacciones,
//! lecturas `eth_call` y espera de confirmaciones pasan por este trait. La
//! implementación real vive fuera del workspace; aquí se provee
//! `InMemoryGateway`, una cadena simulada para tests y corridas en seco
//! contra estado forkeado.

pub mod memory;
pub mod types;

pub use memory::InMemoryGateway;
pub use types::{Address, CallRequest, PendingTx, TxReceipt, TxRequest};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Fallos reportados por el cliente de cadena. Serializable porque puede
/// terminar embebido en `StepError` dentro de eventos y reportes.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum GatewayError {
    #[error("execution reverted: {0}")] Reverted(String),
    #[error("out of gas")] OutOfGas,
    #[error("nonce conflict for signer {0}")] NonceConflict(String),
    #[error("unknown transaction {0}")] UnknownTransaction(String),
    #[error("transport: {0}")] Transport(String),
}

/// Puerta de acceso a la cadena. Envía transacciones firmadas, ejecuta
/// lecturas puras y espera confirmaciones.
///
/// Contrato: `call` jamás altera estado; `submit` no garantiza inclusión (eso
/// lo decide `wait_for_confirmation`); el core no asume ninguna cantidad de
/// confirmaciones suficiente más allá de la que indica el contexto.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Envía una transacción firmada y devuelve su hash pendiente.
    async fn submit(&self, tx: TxRequest) -> Result<PendingTx, GatewayError>;

    /// Lectura pura contra el estado actual de la cadena.
    async fn call(&self, req: CallRequest) -> Result<Value, GatewayError>;

    /// Espera a que `tx_hash` alcance `confirmations` confirmaciones.
    async fn wait_for_confirmation(&self, tx_hash: &str, confirmations: u64) -> Result<TxReceipt, GatewayError>;
}
