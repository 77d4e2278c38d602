//! Alta del aToken de ASD como entidad facilitadora del token.
//!
//! El facilitador es quien puede acuñar ASD contra su bucket; en este
//! bootstrap esa entidad es el propio aToken.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use asd_core::{StepContext, StepDefinition, StepError, StepOutcome};

use crate::contracts::{ASD_ATOKEN, ASD_FACILITATOR_CAPACITY, ASD_FACILITATOR_LABEL, ASD_TOKEN};
use crate::steps::id;

pub struct AddEntityStep;

#[async_trait]
impl StepDefinition for AddEntityStep {
    fn id(&self) -> &str {
        id::ADD_ASD_AS_ENTITY
    }

    fn name(&self) -> &str {
        "List the ASD aToken as facilitator"
    }

    fn depends_on(&self) -> Vec<&str> {
        vec![id::INITIALIZE_ASD_RESERVE]
    }

    fn contracts(&self) -> Vec<&str> {
        vec![ASD_TOKEN, ASD_ATOKEN]
    }

    async fn already_applied(&self, ctx: &StepContext<'_>) -> Result<bool, StepError> {
        let asd = ctx.handle(ASD_TOKEN)?;
        let atoken = ctx.handle(ASD_ATOKEN)?;
        let facilitator = ctx.read(asd, "getFacilitator", json!([atoken.address])).await?;
        Ok(has_label(&facilitator))
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepOutcome, StepError> {
        let asd = ctx.handle(ASD_TOKEN)?;
        let atoken = ctx.handle(ASD_ATOKEN)?;
        info!(facilitator = %atoken.address, "listing the aToken as ASD facilitator");
        let receipt = ctx.execute(asd,
                                  "addFacilitator",
                                  json!({
                                      "facilitator": atoken.address,
                                      "label": ASD_FACILITATOR_LABEL,
                                      "bucketCapacity": ASD_FACILITATOR_CAPACITY,
                                  }))
                         .await?;
        Ok(StepOutcome::single(receipt))
    }
}

/// Un facilitador inexistente vuelve con label vacío (o null).
fn has_label(facilitator: &Value) -> bool {
    matches!(facilitator.get("label"), Some(Value::String(label)) if !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_facilitator_has_no_label() {
        assert!(!has_label(&json!(null)));
        assert!(!has_label(&json!({"label": ""})));
        assert!(has_label(&json!({"label": "AsdAToken"})));
    }
}
