//! Cableado cruzado aToken ↔ variable debt token.
//!
//! Es el único Step con más de una transacción: cada contrato aprende la
//! dirección del otro. `run` re-sondea cada dirección antes de enviarla, por
//! si una corrida anterior quedó a mitad de camino (primera escrita, segunda
//! no).

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use asd_core::{StepContext, StepDefinition, StepError, StepOutcome};

use crate::contracts::{ASD_ATOKEN, ASD_VARIABLE_DEBT_TOKEN};
use crate::steps::id;

pub struct SetAddressesStep;

impl SetAddressesStep {
    async fn atoken_wired(ctx: &StepContext<'_>) -> Result<bool, StepError> {
        let atoken = ctx.handle(ASD_ATOKEN)?;
        let debt = ctx.handle(ASD_VARIABLE_DEBT_TOKEN)?;
        let current = ctx.read(atoken, "getVariableDebtToken", json!(null)).await?;
        Ok(current == json!(debt.address))
    }

    async fn debt_wired(ctx: &StepContext<'_>) -> Result<bool, StepError> {
        let atoken = ctx.handle(ASD_ATOKEN)?;
        let debt = ctx.handle(ASD_VARIABLE_DEBT_TOKEN)?;
        let current = ctx.read(debt, "getAToken", json!(null)).await?;
        Ok(current == json!(atoken.address))
    }
}

#[async_trait]
impl StepDefinition for SetAddressesStep {
    fn id(&self) -> &str {
        id::SET_ASD_ADDRESSES
    }

    fn name(&self) -> &str {
        "Wire ASD token addresses"
    }

    fn depends_on(&self) -> Vec<&str> {
        vec![id::INITIALIZE_ASD_RESERVE]
    }

    fn contracts(&self) -> Vec<&str> {
        vec![ASD_ATOKEN, ASD_VARIABLE_DEBT_TOKEN]
    }

    async fn already_applied(&self, ctx: &StepContext<'_>) -> Result<bool, StepError> {
        Ok(Self::atoken_wired(ctx).await? && Self::debt_wired(ctx).await?)
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepOutcome, StepError> {
        let atoken = ctx.handle(ASD_ATOKEN)?;
        let debt = ctx.handle(ASD_VARIABLE_DEBT_TOKEN)?;
        let mut outcome = StepOutcome::empty();

        if !Self::atoken_wired(ctx).await? {
            info!(atoken = %atoken.address, debt = %debt.address, "wiring debt token into aToken");
            let receipt = ctx.execute(atoken, "setVariableDebtToken", json!([debt.address])).await?;
            outcome.transactions.push(receipt);
        }
        if !Self::debt_wired(ctx).await? {
            info!(atoken = %atoken.address, debt = %debt.address, "wiring aToken into debt token");
            let receipt = ctx.execute(debt, "setAToken", json!([atoken.address])).await?;
            outcome.transactions.push(receipt);
        }
        Ok(outcome)
    }
}
