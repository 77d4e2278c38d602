//! Bootstrap completo de ASD contra la cadena simulada: orden de ejecución,
//! convergencia al relanzar y aislamiento de fallos por rama del DAG.

use std::time::Duration;

use serde_json::json;

use asd_core::{ExecutionConfig, InMemoryGateway, InMemoryRegistry, PipelineEngine, StepError, StepStatus};
use asd_tasks::{catalog, contracts, steps::id};

const ASD: &str = "0x000000000000000000000000000000000000a5d0";
const TREASURY: &str = "0x00000000000000000000000000000000000000t0";
const POOL: &str = "0x00000000000000000000000000000000000000p0";
const CONFIGURATOR: &str = "0x00000000000000000000000000000000000000c0";
const PROVIDER: &str = "0x00000000000000000000000000000000000000d0";
const POOL_IMPL: &str = "0x00000000000000000000000000000000000000p1";
const AAVE_ORACLE: &str = "0x00000000000000000000000000000000000000e0";
const ASD_ORACLE: &str = "0x00000000000000000000000000000000000000e1";
const ATOKEN: &str = "0x00000000000000000000000000000000000000a1";
const DEBT: &str = "0x00000000000000000000000000000000000000a2";
const STRATEGY: &str = "0x00000000000000000000000000000000000000a3";
const STAKED: &str = "0x00000000000000000000000000000000000000s0";
const STAKED_IMPL: &str = "0x00000000000000000000000000000000000000s1";

fn registry() -> InMemoryRegistry {
    let mut reg = InMemoryRegistry::new();
    for (name, addr) in [(contracts::ASD_TOKEN, ASD),
                         (contracts::TREASURY, TREASURY),
                         (contracts::POOL, POOL),
                         (contracts::POOL_CONFIGURATOR, CONFIGURATOR),
                         (contracts::POOL_ADDRESSES_PROVIDER, PROVIDER),
                         (contracts::POOL_IMPL, POOL_IMPL),
                         (contracts::AAVE_ORACLE, AAVE_ORACLE),
                         (contracts::ASD_ORACLE, ASD_ORACLE),
                         (contracts::ASD_ATOKEN, ATOKEN),
                         (contracts::ASD_VARIABLE_DEBT_TOKEN, DEBT),
                         (contracts::ASD_INTEREST_RATE_STRATEGY, STRATEGY),
                         (contracts::STAKED_AAVE, STAKED),
                         (contracts::STAKED_AAVE_IMPL, STAKED_IMPL)]
    {
        reg.register(name, addr, json!([]));
    }
    reg
}

/// Cablea el efecto observable de cada acción hacia su probe, como lo haría
/// la cadena real.
fn gateway() -> InMemoryGateway {
    let gw = InMemoryGateway::new();
    gw.effect_on_confirm("initialize", ASD, "isInitialized", json!(true));
    gw.effect_on_confirm("initReserve", POOL, "getReserveData", json!({"aTokenAddress": ATOKEN}));
    gw.effect_on_confirm("setAssetSources", AAVE_ORACLE, "getSourceOfAsset", json!(ASD_ORACLE));
    gw.effect_on_confirm("enableBorrowingOnReserve",
                         POOL,
                         "getConfiguration",
                         json!({"borrowingEnabled": true}));
    gw.effect_on_confirm("addFacilitator",
                         ASD,
                         "getFacilitator",
                         json!({"label": contracts::ASD_FACILITATOR_LABEL}));
    gw.effect_on_confirm("setVariableDebtToken", ATOKEN, "getVariableDebtToken", json!(DEBT));
    gw.effect_on_confirm("setAToken", DEBT, "getAToken", json!(ATOKEN));
    gw.effect_on_confirm("setPoolImpl", POOL, "POOL_REVISION", json!(contracts::ASD_POOL_REVISION));
    gw.effect_on_confirm("upgradeTo", STAKED, "REVISION", json!(contracts::STAKED_AAVE_REVISION));
    gw
}

fn config() -> ExecutionConfig {
    ExecutionConfig::new("hardhat", "0xdeployer").with_tx_timeout(Duration::from_millis(500))
}

#[tokio::test]
async fn full_setup_runs_every_step_in_dag_order() {
    let def = catalog::pipeline(catalog::ASD_SETUP).unwrap();
    let mut engine = PipelineEngine::new(gateway(), registry(), config());
    let report = engine.run(&def).await;

    assert!(report.succeeded(), "failed: {:?}", report.failed_steps());
    for slot in report.steps.values() {
        assert_eq!(slot.status, StepStatus::Completed, "step {}", slot.step_id);
        assert!(!slot.already_applied);
    }
    // set-asd-addresses envía dos transacciones; el resto, una.
    assert_eq!(report.total_transactions(), 9);
    assert_eq!(engine.gateway().submitted_methods(),
               vec!["initialize",
                    "initReserve",
                    "setAssetSources",
                    "enableBorrowingOnReserve",
                    "addFacilitator",
                    "setVariableDebtToken",
                    "setAToken",
                    "setPoolImpl",
                    "upgradeTo"]);
}

#[tokio::test]
async fn second_run_is_a_no_op() {
    let def = catalog::pipeline(catalog::ASD_SETUP).unwrap();
    let mut engine = PipelineEngine::new(gateway(), registry(), config());

    let first = engine.run(&def).await;
    assert!(first.succeeded());
    let sent = engine.gateway().submitted_count();

    let second = engine.run(&def).await;
    assert!(second.succeeded());
    for slot in second.steps.values() {
        assert_eq!(slot.status, StepStatus::Completed);
        assert!(slot.already_applied, "step {} should complete via probe", slot.step_id);
        assert_eq!(slot.transactions, 0);
    }
    assert_eq!(engine.gateway().submitted_count(), sent);
}

#[tokio::test]
async fn oracle_failure_leaves_independent_branches_running() {
    let gw = gateway();
    gw.revert_on("setAssetSources", "ORACLE_NOT_WHITELISTED");

    let def = catalog::pipeline(catalog::ASD_SETUP).unwrap();
    let mut engine = PipelineEngine::new(gw, registry(), config());
    let report = engine.run(&def).await;

    assert!(!report.succeeded());
    assert_eq!(report.steps[id::SET_ASD_ORACLE].status, StepStatus::Failed);
    // Ningún otro Step depende del oráculo: el resto del DAG completa.
    for slot in report.steps.values() {
        if slot.step_id != id::SET_ASD_ORACLE {
            assert_eq!(slot.status, StepStatus::Completed, "step {}", slot.step_id);
        }
    }
}

#[tokio::test]
async fn missing_artifact_fails_only_the_step_that_needs_it() {
    let mut reg = InMemoryRegistry::new();
    // Igual que registry() pero sin el oráculo de ASD.
    for (name, addr) in [(contracts::ASD_TOKEN, ASD),
                         (contracts::TREASURY, TREASURY),
                         (contracts::POOL, POOL),
                         (contracts::POOL_CONFIGURATOR, CONFIGURATOR),
                         (contracts::POOL_ADDRESSES_PROVIDER, PROVIDER),
                         (contracts::POOL_IMPL, POOL_IMPL),
                         (contracts::AAVE_ORACLE, AAVE_ORACLE),
                         (contracts::ASD_ATOKEN, ATOKEN),
                         (contracts::ASD_VARIABLE_DEBT_TOKEN, DEBT),
                         (contracts::ASD_INTEREST_RATE_STRATEGY, STRATEGY),
                         (contracts::STAKED_AAVE, STAKED),
                         (contracts::STAKED_AAVE_IMPL, STAKED_IMPL)]
    {
        reg.register(name, addr, json!([]));
    }

    let def = catalog::pipeline(catalog::ASD_SETUP).unwrap();
    let mut engine = PipelineEngine::new(gateway(), reg, config());
    let report = engine.run(&def).await;

    assert_eq!(report.steps[id::SET_ASD_ORACLE].status, StepStatus::Failed);
    assert_eq!(report.steps[id::SET_ASD_ORACLE].error,
               Some(StepError::UnresolvedContract(contracts::ASD_ORACLE.into())));
    for slot in report.steps.values() {
        if slot.step_id != id::SET_ASD_ORACLE {
            assert_eq!(slot.status, StepStatus::Completed, "step {}", slot.step_id);
        }
    }
}

#[tokio::test]
async fn single_task_on_a_prepared_chain_costs_one_transaction() {
    // Cadena donde todo salvo el oráculo ya está aplicado.
    let gw = gateway();
    gw.seed_state(ASD, "isInitialized", json!(true));
    gw.seed_state(POOL, "getReserveData", json!({"aTokenAddress": ATOKEN}));

    let def = catalog::pipeline(id::SET_ASD_ORACLE).unwrap();
    let mut engine = PipelineEngine::new(gw, registry(), config());
    let report = engine.run(&def).await;

    assert!(report.succeeded());
    assert!(report.steps[id::SETUP_PROTOCOL].already_applied);
    assert!(report.steps[id::INITIALIZE_ASD_RESERVE].already_applied);
    assert_eq!(report.steps[id::SET_ASD_ORACLE].transactions, 1);
    assert_eq!(engine.gateway().submitted_methods(), vec!["setAssetSources"]);
}
