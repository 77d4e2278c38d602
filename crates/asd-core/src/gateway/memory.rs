//! Cadena simulada en memoria.
//!
//! Cumple el mismo rol que las stores in-memory del motor: permitir ejecutar
//! pipelines completos sin red. El estado legible se indexa por
//! `(target, method)`; al confirmarse una transacción se aplica
//! `state[(target, method)] = args` más los efectos declarados con
//! `effect_on_confirm`, de modo que los probes de idempotencia puedan
//! observar el resultado de una acción previa.
//!
//! Fallos guionados por método: `reject_on` falla el `submit`, `revert_on`
//! falla la confirmación y `lose_confirmation` hace que la espera no resuelva
//! nunca (para ejercitar el timeout del contexto).

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Address, CallRequest, ChainGateway, GatewayError, PendingTx, TxReceipt, TxRequest};

#[derive(Default)]
struct Inner {
    state: HashMap<(Address, String), Value>,
    submitted: Vec<TxRequest>,
    pending: HashMap<String, TxRequest>,
    reject_on: HashMap<String, GatewayError>,
    revert_on: HashMap<String, String>,
    lost: HashSet<String>,
    effects: HashMap<String, Vec<(Address, String, Value)>>,
    next_block: u64,
}

#[derive(Default)]
pub struct InMemoryGateway {
    inner: Mutex<Inner>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Siembra un valor legible vía `call` para `(target, method)`.
    pub fn seed_state(&self, target: impl Into<Address>, method: impl Into<String>, value: Value) {
        let mut inner = self.inner.lock().unwrap();
        inner.state.insert((target.into(), method.into()), value);
    }

    /// Hace fallar el `submit` de cualquier transacción con este método.
    pub fn reject_on(&self, method: impl Into<String>, error: GatewayError) {
        self.inner.lock().unwrap().reject_on.insert(method.into(), error);
    }

    /// Hace que la confirmación de este método termine en revert.
    pub fn revert_on(&self, method: impl Into<String>, reason: impl Into<String>) {
        self.inner.lock().unwrap().revert_on.insert(method.into(), reason.into());
    }

    /// La confirmación de este método no llega nunca.
    pub fn lose_confirmation(&self, method: impl Into<String>) {
        self.inner.lock().unwrap().lost.insert(method.into());
    }

    /// Olvida todos los fallos guionados (la "siguiente corrida" del operador).
    pub fn clear_failures(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.reject_on.clear();
        inner.revert_on.clear();
        inner.lost.clear();
    }

    /// Al confirmarse `method`, escribe `value` en `(target, read_method)`.
    /// Así una acción deja observable su efecto ante el probe que lo consulta.
    pub fn effect_on_confirm(&self,
                             method: impl Into<String>,
                             target: impl Into<Address>,
                             read_method: impl Into<String>,
                             value: Value) {
        let mut inner = self.inner.lock().unwrap();
        inner.effects
             .entry(method.into())
             .or_default()
             .push((target.into(), read_method.into(), value));
    }

    /// Transacciones enviadas hasta el momento, en orden de envío.
    pub fn submitted(&self) -> Vec<TxRequest> {
        self.inner.lock().unwrap().submitted.clone()
    }

    pub fn submitted_count(&self) -> usize {
        self.inner.lock().unwrap().submitted.len()
    }

    /// Métodos enviados, en orden. Útil para asertar el orden de ejecución.
    pub fn submitted_methods(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .submitted
            .iter()
            .map(|tx| tx.method.clone())
            .collect()
    }
}

#[async_trait]
impl ChainGateway for InMemoryGateway {
    async fn submit(&self, tx: TxRequest) -> Result<PendingTx, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(err) = inner.reject_on.get(&tx.method) {
            return Err(err.clone());
        }
        let tx_hash = format!("0x{:064x}", inner.submitted.len() + 1);
        inner.submitted.push(tx.clone());
        inner.pending.insert(tx_hash.clone(), tx);
        Ok(PendingTx { tx_hash })
    }

    async fn call(&self, req: CallRequest) -> Result<Value, GatewayError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.state
                .get(&(req.target, req.method))
                .cloned()
                .unwrap_or(Value::Null))
    }

    async fn wait_for_confirmation(&self, tx_hash: &str, confirmations: u64) -> Result<TxReceipt, GatewayError> {
        let lost = {
            let inner = self.inner.lock().unwrap();
            match inner.pending.get(tx_hash) {
                Some(tx) => inner.lost.contains(&tx.method),
                None => return Err(GatewayError::UnknownTransaction(tx_hash.to_string())),
            }
        };
        if lost {
            // Nunca resuelve: el timeout del contexto corta la espera.
            let () = std::future::pending().await;
        }

        let mut inner = self.inner.lock().unwrap();
        let tx = inner.pending
                      .remove(tx_hash)
                      .ok_or_else(|| GatewayError::UnknownTransaction(tx_hash.to_string()))?;
        if let Some(reason) = inner.revert_on.get(&tx.method) {
            return Err(GatewayError::Reverted(reason.clone()));
        }

        inner.next_block += 1;
        let block_number = inner.next_block;
        inner.state
             .insert((tx.target.clone(), tx.method.clone()), tx.args.clone());
        if let Some(effects) = inner.effects.get(&tx.method).cloned() {
            for (target, read_method, value) in effects {
                inner.state.insert((target, read_method), value);
            }
        }

        Ok(TxReceipt { tx_hash: tx_hash.to_string(),
                       block_number,
                       confirmations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tx(method: &str) -> TxRequest {
        TxRequest { target: "0xpool".into(),
                    method: method.into(),
                    args: json!(["0xasd"]),
                    from: "0xdeployer".into() }
    }

    #[tokio::test]
    async fn confirmed_tx_leaves_its_args_readable() {
        let gw = InMemoryGateway::new();
        let pending = gw.submit(tx("setThing")).await.unwrap();
        let receipt = gw.wait_for_confirmation(&pending.tx_hash, 1).await.unwrap();
        assert_eq!(receipt.block_number, 1);

        let value = gw.call(CallRequest::new("0xpool", "setThing", json!(null))).await.unwrap();
        assert_eq!(value, json!(["0xasd"]));
    }

    #[tokio::test]
    async fn scripted_revert_fails_confirmation() {
        let gw = InMemoryGateway::new();
        gw.revert_on("setThing", "CALLER_NOT_ADMIN");
        let pending = gw.submit(tx("setThing")).await.unwrap();
        let err = gw.wait_for_confirmation(&pending.tx_hash, 1).await.unwrap_err();
        assert_eq!(err, GatewayError::Reverted("CALLER_NOT_ADMIN".into()));
    }

    #[tokio::test]
    async fn scripted_reject_fails_submit() {
        let gw = InMemoryGateway::new();
        gw.reject_on("setThing", GatewayError::NonceConflict("0xdeployer".into()));
        let err = gw.submit(tx("setThing")).await.unwrap_err();
        assert!(matches!(err, GatewayError::NonceConflict(_)));
        assert_eq!(gw.submitted_count(), 0);
    }

    #[tokio::test]
    async fn effects_become_visible_after_confirmation() {
        let gw = InMemoryGateway::new();
        gw.effect_on_confirm("setThing", "0xpool", "getThing", json!("0xasd"));
        let before = gw.call(CallRequest::new("0xpool", "getThing", json!(null))).await.unwrap();
        assert_eq!(before, Value::Null);

        let pending = gw.submit(tx("setThing")).await.unwrap();
        gw.wait_for_confirmation(&pending.tx_hash, 1).await.unwrap();
        let after = gw.call(CallRequest::new("0xpool", "getThing", json!(null))).await.unwrap();
        assert_eq!(after, json!("0xasd"));
    }

    #[tokio::test]
    async fn unknown_hash_is_reported() {
        let gw = InMemoryGateway::new();
        let err = gw.wait_for_confirmation("0xdead", 1).await.unwrap_err();
        assert!(matches!(err, GatewayError::UnknownTransaction(_)));
    }
}
