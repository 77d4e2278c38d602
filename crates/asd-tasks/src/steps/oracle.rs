//! Cableado del oráculo de precios de ASD en el oráculo agregador del
//! protocolo. Fijar dos veces la misma fuente es inocuo on-chain.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use asd_core::{StepContext, StepDefinition, StepError, StepOutcome};

use crate::contracts::{AAVE_ORACLE, ASD_ORACLE, ASD_TOKEN};
use crate::steps::id;

pub struct SetOracleStep;

#[async_trait]
impl StepDefinition for SetOracleStep {
    fn id(&self) -> &str {
        id::SET_ASD_ORACLE
    }

    fn name(&self) -> &str {
        "Set the ASD price oracle"
    }

    fn depends_on(&self) -> Vec<&str> {
        vec![id::INITIALIZE_ASD_RESERVE]
    }

    fn contracts(&self) -> Vec<&str> {
        vec![AAVE_ORACLE, ASD_TOKEN, ASD_ORACLE]
    }

    async fn already_applied(&self, ctx: &StepContext<'_>) -> Result<bool, StepError> {
        let aggregator = ctx.handle(AAVE_ORACLE)?;
        let asd = ctx.handle(ASD_TOKEN)?;
        let source = ctx.handle(ASD_ORACLE)?;
        let current = ctx.read(aggregator, "getSourceOfAsset", json!([asd.address])).await?;
        Ok(current == json!(source.address))
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepOutcome, StepError> {
        let aggregator = ctx.handle(AAVE_ORACLE)?;
        let asd = ctx.handle(ASD_TOKEN)?;
        let source = ctx.handle(ASD_ORACLE)?;
        info!(asset = %asd.address, source = %source.address, "wiring the ASD price source");
        let receipt = ctx.execute(aggregator,
                                  "setAssetSources",
                                  json!({
                                      "assets": [asd.address],
                                      "sources": [source.address],
                                  }))
                         .await?;
        Ok(StepOutcome::single(receipt))
    }
}
