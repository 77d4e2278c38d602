//! Interfaz de Step y su contexto de ejecución.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::timeout;

use crate::config::ExecutionConfig;
use crate::errors::StepError;
use crate::gateway::{CallRequest, ChainGateway, TxReceipt, TxRequest};
use crate::registry::ContractHandle;

/// Resultado de ejecutar la acción de un Step: los recibos de todas las
/// transacciones confirmadas. Un probe positivo produce un outcome vacío.
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub transactions: Vec<TxReceipt>,
}

impl StepOutcome {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(receipt: TxReceipt) -> Self {
        Self { transactions: vec![receipt] }
    }
}

/// Contexto entregado a `already_applied` y `run`: el gateway, los handles
/// resueltos que el Step declaró en `contracts()` y la configuración de la
/// corrida. Inmutable durante la ejecución del paso.
pub struct StepContext<'a> {
    gateway: &'a dyn ChainGateway,
    handles: &'a HashMap<String, ContractHandle>,
    config: &'a ExecutionConfig,
}

impl<'a> StepContext<'a> {
    pub fn new(gateway: &'a dyn ChainGateway,
               handles: &'a HashMap<String, ContractHandle>,
               config: &'a ExecutionConfig)
               -> Self {
        Self { gateway,
               handles,
               config }
    }

    pub fn config(&self) -> &ExecutionConfig {
        self.config
    }

    /// Handle resuelto por nombre lógico. Un nombre que el Step no declaró
    /// en `contracts()` se reporta como contrato sin resolver.
    pub fn handle(&self, logical_name: &str) -> Result<&ContractHandle, StepError> {
        self.handles
            .get(logical_name)
            .ok_or_else(|| StepError::UnresolvedContract(logical_name.to_string()))
    }

    /// Lectura pura contra un contrato. Los probes deben usar únicamente
    /// esta vía: jamás envían transacciones.
    pub async fn read(&self, target: &ContractHandle, method: &str, args: Value) -> Result<Value, StepError> {
        self.gateway
            .call(CallRequest::new(target.address.clone(), method, args))
            .await
            .map_err(StepError::from)
    }

    /// Envía una transacción y espera su confirmación bajo el timeout del
    /// contexto. Un timeout vencido se reporta como `Unconfirmed`: el efecto
    /// on-chain puede seguir pendiente y la próxima corrida debe consultar el
    /// probe antes de reenviar.
    pub async fn execute(&self, target: &ContractHandle, method: &str, args: Value) -> Result<TxReceipt, StepError> {
        let tx = TxRequest { target: target.address.clone(),
                             method: method.to_string(),
                             args,
                             from: self.config.signer.clone() };
        let pending = self.gateway.submit(tx).await.map_err(StepError::from)?;

        match timeout(self.config.tx_timeout,
                      self.gateway.wait_for_confirmation(&pending.tx_hash, self.config.confirmations)).await
        {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(err)) => Err(StepError::from(err)),
            Err(_elapsed) => Err(StepError::Unconfirmed(pending.tx_hash)),
        }
    }
}

/// Una acción de configuración atómica contra el sistema de contratos.
///
/// Contrato de implementación:
/// - `already_applied` es una lectura pura y devuelve `true` exactamente
///   cuando el efecto de `run` ya está completo on-chain. Un falso positivo
///   saltea trabajo necesario en silencio; un falso negativo provoca un
///   reenvío que `run` debe tolerar (la llamada on-chain es naturalmente
///   idempotente o el propio `run` sondea antes de actuar).
/// - `run` envía sus transacciones vía `StepContext::execute` y propaga los
///   fallos del gateway como `StepError` tipado, nunca con pánico.
#[async_trait]
pub trait StepDefinition: Send + Sync {
    /// Identificador estable y único dentro del pipeline.
    fn id(&self) -> &str;

    /// Nombre amigable opcional.
    fn name(&self) -> &str {
        self.id()
    }

    /// Ids de los Steps que deben estar `Completed` antes de correr éste.
    fn depends_on(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Nombres lógicos de los contratos que el engine debe resolver y poner
    /// en el contexto antes de ejecutar.
    fn contracts(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Probe de idempotencia: lectura pura del estado de la cadena.
    async fn already_applied(&self, ctx: &StepContext<'_>) -> Result<bool, StepError>;

    /// La acción: una o más transacciones administrativas.
    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepOutcome, StepError>;
}
