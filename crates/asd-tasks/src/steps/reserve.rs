//! Reserva de ASD: alta en el pool y habilitación de borrowing.
//!
//! `initReserve` es la operación pivote del bootstrap: hasta que la reserva
//! existe, ni el oráculo ni el borrowing ni el cableado de direcciones
//! tienen contra qué operar.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use asd_core::{StepContext, StepDefinition, StepError, StepOutcome};

use crate::contracts::{ASD_ATOKEN, ASD_INTEREST_RATE_STRATEGY, ASD_TOKEN, ASD_VARIABLE_DEBT_TOKEN, POOL,
                       POOL_CONFIGURATOR, TREASURY};
use crate::steps::id;

/// Da de alta la reserva de ASD en el pool vía el PoolConfigurator.
pub struct InitializeReserveStep;

#[async_trait]
impl StepDefinition for InitializeReserveStep {
    fn id(&self) -> &str {
        id::INITIALIZE_ASD_RESERVE
    }

    fn name(&self) -> &str {
        "Initialize the ASD reserve"
    }

    fn depends_on(&self) -> Vec<&str> {
        vec![id::SETUP_PROTOCOL]
    }

    fn contracts(&self) -> Vec<&str> {
        vec![POOL,
             POOL_CONFIGURATOR,
             ASD_TOKEN,
             ASD_ATOKEN,
             ASD_VARIABLE_DEBT_TOKEN,
             ASD_INTEREST_RATE_STRATEGY,
             TREASURY]
    }

    async fn already_applied(&self, ctx: &StepContext<'_>) -> Result<bool, StepError> {
        let pool = ctx.handle(POOL)?;
        let asd = ctx.handle(ASD_TOKEN)?;
        let data = ctx.read(pool, "getReserveData", json!([asd.address])).await?;
        // La reserva existe cuando el pool ya conoce un aToken para el activo.
        Ok(reserve_exists(&data))
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepOutcome, StepError> {
        let configurator = ctx.handle(POOL_CONFIGURATOR)?;
        let asd = ctx.handle(ASD_TOKEN)?;
        info!(asset = %asd.address, "registering the ASD reserve");
        let receipt = ctx.execute(configurator,
                                  "initReserve",
                                  json!({
                                      "asset": asd.address,
                                      "aTokenImpl": ctx.handle(ASD_ATOKEN)?.address,
                                      "variableDebtTokenImpl": ctx.handle(ASD_VARIABLE_DEBT_TOKEN)?.address,
                                      "interestRateStrategy": ctx.handle(ASD_INTEREST_RATE_STRATEGY)?.address,
                                      "treasury": ctx.handle(TREASURY)?.address,
                                      "underlyingAssetDecimals": 18,
                                  }))
                         .await?;
        Ok(StepOutcome::single(receipt))
    }
}

/// Habilita el borrowing de ASD (sin tasa estable) sobre la reserva ya
/// inicializada. La llamada on-chain es naturalmente idempotente.
pub struct EnableBorrowingStep;

#[async_trait]
impl StepDefinition for EnableBorrowingStep {
    fn id(&self) -> &str {
        id::ENABLE_ASD_BORROWING
    }

    fn name(&self) -> &str {
        "Enable ASD borrowing"
    }

    fn depends_on(&self) -> Vec<&str> {
        vec![id::INITIALIZE_ASD_RESERVE]
    }

    fn contracts(&self) -> Vec<&str> {
        vec![POOL, POOL_CONFIGURATOR, ASD_TOKEN]
    }

    async fn already_applied(&self, ctx: &StepContext<'_>) -> Result<bool, StepError> {
        let pool = ctx.handle(POOL)?;
        let asd = ctx.handle(ASD_TOKEN)?;
        let cfg = ctx.read(pool, "getConfiguration", json!([asd.address])).await?;
        Ok(cfg.get("borrowingEnabled") == Some(&json!(true)))
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepOutcome, StepError> {
        let configurator = ctx.handle(POOL_CONFIGURATOR)?;
        let asd = ctx.handle(ASD_TOKEN)?;
        info!(asset = %asd.address, "enabling ASD borrowing");
        let receipt = ctx.execute(configurator,
                                  "enableBorrowingOnReserve",
                                  json!({
                                      "asset": asd.address,
                                      "stableBorrowRateEnabled": false,
                                  }))
                         .await?;
        Ok(StepOutcome::single(receipt))
    }
}

fn reserve_exists(data: &Value) -> bool {
    match data.get("aTokenAddress") {
        Some(Value::String(addr)) => !addr.is_empty() && !is_zero_address(addr),
        _ => false,
    }
}

fn is_zero_address(addr: &str) -> bool {
    addr.trim_start_matches("0x").chars().all(|c| c == '0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_exists_requires_a_real_atoken() {
        assert!(!reserve_exists(&json!(null)));
        assert!(!reserve_exists(&json!({})));
        assert!(!reserve_exists(&json!({"aTokenAddress": "0x0000000000000000000000000000000000000000"})));
        assert!(reserve_exists(&json!({"aTokenAddress": "0x00000000000000000000000000000000000000b1"})));
    }
}
