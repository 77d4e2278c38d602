//! Paso inicial: inicialización del token ASD sobre el fork.
//!
//! Deja el token listo para que el resto del bootstrap opere sobre él:
//! tesorería y administrador de facilitadores quedan fijados en una sola
//! transacción. Todo lo demás depende (directa o transitivamente) de este
//! paso.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use asd_core::{StepContext, StepDefinition, StepError, StepOutcome};

use crate::contracts::{ASD_TOKEN, TREASURY};
use crate::steps::id;

pub struct SetupProtocolStep;

#[async_trait]
impl StepDefinition for SetupProtocolStep {
    fn id(&self) -> &str {
        id::SETUP_PROTOCOL
    }

    fn name(&self) -> &str {
        "Initialize the ASD token"
    }

    fn contracts(&self) -> Vec<&str> {
        vec![ASD_TOKEN, TREASURY]
    }

    async fn already_applied(&self, ctx: &StepContext<'_>) -> Result<bool, StepError> {
        let asd = ctx.handle(ASD_TOKEN)?;
        Ok(ctx.read(asd, "isInitialized", json!(null)).await? == json!(true))
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepOutcome, StepError> {
        let asd = ctx.handle(ASD_TOKEN)?;
        let treasury = ctx.handle(TREASURY)?;
        info!(token = %asd.address, treasury = %treasury.address, "initializing the ASD token");
        let receipt = ctx.execute(asd,
                                  "initialize",
                                  json!({
                                      "treasury": treasury.address,
                                      "facilitatorManager": ctx.config().signer,
                                  }))
                         .await?;
        Ok(StepOutcome::single(receipt))
    }
}
