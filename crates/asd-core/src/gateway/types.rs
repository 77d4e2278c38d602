//! Tipos neutrales del gateway: requests, hash pendiente y recibo.
//!
//! El core no interpreta ABI ni calldata: `method` + `args` JSON son la
//! representación lógica de la llamada; el colaborador externo los codifica
//! contra la interfaz del contrato.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dirección on-chain en formato hex (`0x…`). Alias simple: el core no
/// valida checksums, eso es tarea del cliente de cadena.
pub type Address = String;

/// Lectura pura contra un contrato desplegado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    pub target: Address,
    pub method: String,
    pub args: Value,
}

impl CallRequest {
    pub fn new(target: impl Into<Address>, method: impl Into<String>, args: Value) -> Self {
        Self { target: target.into(),
               method: method.into(),
               args }
    }
}

/// Transacción administrativa a enviar. `from` es el firmante del contexto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRequest {
    pub target: Address,
    pub method: String,
    pub args: Value,
    pub from: Address,
}

/// Hash devuelto por `submit`; la inclusión aún no está garantizada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTx {
    pub tx_hash: String,
}

/// Recibo de una transacción confirmada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub block_number: u64,
    pub confirmations: u64,
}
