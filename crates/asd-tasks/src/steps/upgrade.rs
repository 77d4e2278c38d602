//! Upgrades de proxy: Pool y módulo de staking.
//!
//! Ambos probes comparan la revisión expuesta por el proxy contra la
//! revisión esperada de la nueva implementación; repetir el upgrade con la
//! misma implementación es inocuo, pero el probe evita la transacción.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use asd_core::{StepContext, StepDefinition, StepError, StepOutcome};

use crate::contracts::{ASD_POOL_REVISION, POOL, POOL_ADDRESSES_PROVIDER, POOL_IMPL, STAKED_AAVE,
                       STAKED_AAVE_IMPL, STAKED_AAVE_REVISION};
use crate::steps::id;

/// Sube la implementación del Pool con soporte de ASD vía el addresses
/// provider. Corre al final: necesita el borrowing habilitado y las
/// direcciones cableadas.
pub struct UpgradePoolStep;

#[async_trait]
impl StepDefinition for UpgradePoolStep {
    fn id(&self) -> &str {
        id::UPGRADE_POOL
    }

    fn name(&self) -> &str {
        "Upgrade the Pool implementation"
    }

    fn depends_on(&self) -> Vec<&str> {
        vec![id::ENABLE_ASD_BORROWING, id::SET_ASD_ADDRESSES]
    }

    fn contracts(&self) -> Vec<&str> {
        vec![POOL, POOL_ADDRESSES_PROVIDER, POOL_IMPL]
    }

    async fn already_applied(&self, ctx: &StepContext<'_>) -> Result<bool, StepError> {
        let pool = ctx.handle(POOL)?;
        let revision = ctx.read(pool, "POOL_REVISION", json!(null)).await?;
        Ok(revision == json!(ASD_POOL_REVISION))
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepOutcome, StepError> {
        let provider = ctx.handle(POOL_ADDRESSES_PROVIDER)?;
        let new_impl = ctx.handle(POOL_IMPL)?;
        info!(implementation = %new_impl.address, "upgrading the Pool implementation");
        let receipt = ctx.execute(provider, "setPoolImpl", json!([new_impl.address])).await?;
        Ok(StepOutcome::single(receipt))
    }
}

/// Sube la implementación del módulo de staking. Sólo requiere el token
/// inicializado, no la reserva.
pub struct UpgradeStakingStep;

#[async_trait]
impl StepDefinition for UpgradeStakingStep {
    fn id(&self) -> &str {
        id::UPGRADE_STAKING
    }

    fn name(&self) -> &str {
        "Upgrade the staking module"
    }

    fn depends_on(&self) -> Vec<&str> {
        vec![id::SETUP_PROTOCOL]
    }

    fn contracts(&self) -> Vec<&str> {
        vec![STAKED_AAVE, STAKED_AAVE_IMPL]
    }

    async fn already_applied(&self, ctx: &StepContext<'_>) -> Result<bool, StepError> {
        let staking = ctx.handle(STAKED_AAVE)?;
        let revision = ctx.read(staking, "REVISION", json!(null)).await?;
        Ok(revision == json!(STAKED_AAVE_REVISION))
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepOutcome, StepError> {
        let staking = ctx.handle(STAKED_AAVE)?;
        let new_impl = ctx.handle(STAKED_AAVE_IMPL)?;
        info!(implementation = %new_impl.address, "upgrading the staking module");
        let receipt = ctx.execute(staking, "upgradeTo", json!([new_impl.address])).await?;
        Ok(StepOutcome::single(receipt))
    }
}
