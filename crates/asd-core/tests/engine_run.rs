//! Tests de integración del engine: propagación de saltos, idempotencia,
//! convergencia entre corridas, timeout y cancelación, todo contra la cadena
//! simulada en memoria.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use asd_core::{ExecutionConfig, GatewayError, InMemoryGateway, InMemoryRegistry, PipelineDefinition,
               PipelineEngine, SkipReason, StepContext, StepDefinition, StepError, StepOutcome, StepStatus};

const TARGET: &str = "Target";
const TARGET_ADDR: &str = "0x00000000000000000000000000000000000000aa";

/// Step de prueba: el probe lee `is-<id>` y la acción envía `apply-<id>`.
struct TestStep {
    id: &'static str,
    deps: Vec<&'static str>,
}

impl TestStep {
    fn boxed(id: &'static str, deps: &[&'static str]) -> Box<dyn StepDefinition> {
        Box::new(TestStep { id, deps: deps.to_vec() })
    }
}

#[async_trait]
impl StepDefinition for TestStep {
    fn id(&self) -> &str {
        self.id
    }

    fn depends_on(&self) -> Vec<&str> {
        self.deps.clone()
    }

    fn contracts(&self) -> Vec<&str> {
        vec![TARGET]
    }

    async fn already_applied(&self, ctx: &StepContext<'_>) -> Result<bool, StepError> {
        let target = ctx.handle(TARGET)?;
        let seen = ctx.read(target, &format!("is-{}", self.id), json!(null)).await?;
        Ok(seen == json!(true))
    }

    async fn run(&self, ctx: &StepContext<'_>) -> Result<StepOutcome, StepError> {
        let target = ctx.handle(TARGET)?;
        let receipt = ctx.execute(target, &format!("apply-{}", self.id), json!([self.id])).await?;
        Ok(StepOutcome::single(receipt))
    }
}

fn registry_with_target() -> InMemoryRegistry {
    let mut reg = InMemoryRegistry::new();
    reg.register(TARGET, TARGET_ADDR, json!([]));
    reg
}

fn config() -> ExecutionConfig {
    ExecutionConfig::new("hardhat", "0xdeployer").with_tx_timeout(Duration::from_millis(200))
}

/// Registra el efecto acción → probe para `id`, para que una corrida
/// posterior observe el trabajo ya hecho.
fn wire_probe(gateway: &InMemoryGateway, id: &str) {
    gateway.effect_on_confirm(format!("apply-{id}"), TARGET_ADDR, format!("is-{id}"), json!(true));
}

#[tokio::test]
async fn failed_dependency_skips_dependents_and_run_continues() {
    let gateway = InMemoryGateway::new();
    gateway.revert_on("apply-a", "SETUP_REVERTED");

    let def = PipelineDefinition::new("p",
                                     vec![TestStep::boxed("a", &[]),
                                          TestStep::boxed("b", &["a"]),
                                          TestStep::boxed("c", &["a"])]).unwrap();
    let mut engine = PipelineEngine::new(gateway, registry_with_target(), config());
    let report = engine.run(&def).await;

    // Exactamente {a: Failed, b: Skipped, c: Skipped}: nunca Failed en cascada.
    assert_eq!(report.steps["a"].status, StepStatus::Failed);
    assert_eq!(report.steps["a"].error,
               Some(StepError::Reverted("SETUP_REVERTED".into())));
    assert_eq!(report.steps["b"].status, StepStatus::Skipped);
    assert_eq!(report.steps["c"].status, StepStatus::Skipped);
    assert_eq!(report.steps["b"].skip_reason.as_deref(),
               Some("dependency 'a' not completed"));
    assert!(!report.succeeded());
    assert_eq!(report.failed_steps().len(), 1);
}

#[tokio::test]
async fn probe_true_completes_with_zero_transactions() {
    let gateway = InMemoryGateway::new();
    gateway.seed_state(TARGET_ADDR, "is-a", json!(true));

    let def = PipelineDefinition::new("p", vec![TestStep::boxed("a", &[])]).unwrap();
    let mut engine = PipelineEngine::new(gateway, registry_with_target(), config());
    let report = engine.run(&def).await;

    let slot = &report.steps["a"];
    assert_eq!(slot.status, StepStatus::Completed);
    assert_eq!(slot.transactions, 0);
    assert!(slot.already_applied);
    // La acción jamás se invocó: nada fue enviado al gateway.
    assert_eq!(engine.gateway().submitted_count(), 0);
    assert!(report.succeeded());
    // Pending -> Completed directo: sin transición por Running ni StepStarted.
    assert!(slot.started_at.is_none());
    assert_eq!(engine.event_variants(), vec!["P", "C", "F"]);
}

#[tokio::test]
async fn rerun_after_fixing_the_failure_converges_without_replaying_actions() {
    let gateway = InMemoryGateway::new();
    wire_probe(&gateway, "a");
    wire_probe(&gateway, "b");
    gateway.revert_on("apply-b", "NOT_YET_ALLOWED");

    let def = PipelineDefinition::new("p",
                                     vec![TestStep::boxed("a", &[]),
                                          TestStep::boxed("b", &["a"])]).unwrap();
    let mut engine = PipelineEngine::new(gateway, registry_with_target(), config());

    let first = engine.run(&def).await;
    assert_eq!(first.steps["a"].status, StepStatus::Completed);
    assert_eq!(first.steps["a"].transactions, 1);
    assert_eq!(first.steps["b"].status, StepStatus::Failed);

    // El operador corrige la causa y relanza: a completa por probe, b corre.
    engine.gateway().clear_failures();
    let second = engine.run(&def).await;
    assert_eq!(second.steps["a"].status, StepStatus::Completed);
    assert_eq!(second.steps["a"].transactions, 0);
    assert!(second.steps["a"].already_applied);
    assert_eq!(second.steps["b"].status, StepStatus::Completed);
    assert!(second.succeeded());

    // apply-a se envió una sola vez en total; apply-b una por intento.
    assert_eq!(engine.gateway().submitted_methods(),
               vec!["apply-a", "apply-b", "apply-b"]);
}

#[tokio::test]
async fn lost_confirmation_times_out_as_unconfirmed() {
    let gateway = InMemoryGateway::new();
    gateway.lose_confirmation("apply-a");

    let def = PipelineDefinition::new("p", vec![TestStep::boxed("a", &[])]).unwrap();
    let cfg = config().with_tx_timeout(Duration::from_millis(50));
    let mut engine = PipelineEngine::new(gateway, registry_with_target(), cfg);
    let report = engine.run(&def).await;

    match &report.steps["a"].error {
        Some(StepError::Unconfirmed(_)) => {}
        other => panic!("expected Unconfirmed, got {other:?}"),
    }
    assert_eq!(report.steps["a"].status, StepStatus::Failed);
}

#[tokio::test]
async fn unresolved_contract_is_a_distinct_failure_reason() {
    let def = PipelineDefinition::new("p", vec![TestStep::boxed("a", &[])]).unwrap();
    // Registro vacío: "Target" no resuelve.
    let mut engine = PipelineEngine::new(InMemoryGateway::new(), InMemoryRegistry::new(), config());
    let report = engine.run(&def).await;

    assert_eq!(report.steps["a"].status, StepStatus::Failed);
    assert_eq!(report.steps["a"].error,
               Some(StepError::UnresolvedContract(TARGET.into())));
    assert_eq!(engine.gateway().submitted_count(), 0);
}

#[tokio::test]
async fn nonce_conflict_surfaces_as_gateway_failure() {
    let gateway = InMemoryGateway::new();
    gateway.reject_on("apply-a", GatewayError::NonceConflict("0xdeployer".into()));

    let def = PipelineDefinition::new("p", vec![TestStep::boxed("a", &[])]).unwrap();
    let mut engine = PipelineEngine::new(gateway, registry_with_target(), config());
    let report = engine.run(&def).await;

    match &report.steps["a"].error {
        Some(StepError::Gateway(msg)) => assert!(msg.contains("nonce conflict")),
        other => panic!("expected Gateway error, got {other:?}"),
    }
}

#[tokio::test]
async fn cancellation_stops_scheduling_new_steps() {
    let def = PipelineDefinition::new("p",
                                     vec![TestStep::boxed("a", &[]),
                                          TestStep::boxed("b", &["a"])]).unwrap();
    let mut engine = PipelineEngine::new(InMemoryGateway::new(), registry_with_target(), config());
    engine.cancel_flag().cancel();
    let report = engine.run(&def).await;

    assert!(report.cancelled);
    for slot in report.steps.values() {
        assert_eq!(slot.status, StepStatus::Skipped);
        assert_eq!(slot.skip_reason.as_deref(), Some(SkipReason::Cancelled.to_string().as_str()));
    }
    assert_eq!(engine.gateway().submitted_count(), 0);
}

#[tokio::test]
async fn event_sequence_follows_execution_order() {
    let gateway = InMemoryGateway::new();
    let def = PipelineDefinition::new("p",
                                     vec![TestStep::boxed("a", &[]),
                                          TestStep::boxed("b", &["a"])]).unwrap();
    let mut engine = PipelineEngine::new(gateway, registry_with_target(), config());
    let report = engine.run(&def).await;

    assert!(report.succeeded());
    assert_eq!(engine.event_variants(), vec!["P", "S", "C", "S", "C", "F"]);
}
