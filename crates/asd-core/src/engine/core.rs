//! Ejecución de pipelines.
//!
//! El engine recorre el orden topológico estable de la definición y aplica,
//! por Step: compuerta de dependencias, resolución de contratos, probe de
//! idempotencia y recién entonces la acción. Un fallo no aborta la corrida:
//! los Steps dependientes quedan `Skipped` y los independientes siguen, para
//! maximizar el diagnóstico de una sola pasada.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ExecutionConfig;
use crate::engine::CancelFlag;
use crate::event::{EventLog, RunEvent, RunEventKind, SkipReason};
use crate::gateway::ChainGateway;
use crate::pipeline::{PipelineDefinition, RunReport};
use crate::registry::{ArtifactRegistry, ContractHandle};
use crate::step::{StepContext, StepDefinition, StepStatus};
use crate::errors::StepError;

/// Motor de ejecución de pipelines de despliegue.
///
/// Genérico sobre sus dos colaboradores externos: el gateway de cadena y el
/// registro de artefactos. El estado mutable de una corrida vive en el
/// reporte; el engine sólo acumula su log de eventos.
pub struct PipelineEngine<G, R>
    where G: ChainGateway,
          R: ArtifactRegistry
{
    gateway: G,
    registry: R,
    config: ExecutionConfig,
    log: EventLog,
    cancel: CancelFlag,
}

impl<G, R> PipelineEngine<G, R>
    where G: ChainGateway,
          R: ArtifactRegistry
{
    pub fn new(gateway: G, registry: R, config: ExecutionConfig) -> Self {
        Self { gateway,
               registry,
               config,
               log: EventLog::new(),
               cancel: CancelFlag::new() }
    }

    /// Copia de la señal de cancelación, para engancharla a un handler de
    /// interrupción del operador.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Eventos acumulados por todas las corridas de este engine.
    pub fn events(&self) -> &[RunEvent] {
        self.log.list()
    }

    /// Variante compacta de eventos (una letra por evento), para asserts.
    pub fn event_variants(&self) -> Vec<&'static str> {
        self.log.variants()
    }

    /// Ejecuta la definición completa y devuelve el reporte por Step.
    ///
    /// Nunca entra en pánico por el fallo de un Step: colecciona todos los
    /// resultados y deja la decisión del código de salida al runner.
    pub async fn run(&mut self, definition: &PipelineDefinition) -> RunReport {
        let run_id = Uuid::new_v4();
        let mut report = RunReport::new(run_id, definition, self.config.network.clone());

        info!(pipeline = definition.name(),
              network = %self.config.network,
              steps = definition.len(),
              "pipeline run started");
        self.log.append_kind(run_id,
                             RunEventKind::PipelineStarted { pipeline: definition.name().to_string(),
                                                             plan_hash: definition.definition_hash().to_string(),
                                                             step_count: definition.len() });

        for &idx in definition.order() {
            let step = definition.step_at(idx);

            if self.cancel.is_cancelled() {
                self.skip(run_id, &mut report, idx, step, SkipReason::Cancelled);
                continue;
            }

            // Compuerta de dependencias: todas deben estar Completed. Por el
            // orden topológico, a esta altura ya son terminales.
            let unmet = step.depends_on()
                            .into_iter()
                            .find(|dep| {
                                report.steps
                                      .get(*dep)
                                      .map(|s| s.status != StepStatus::Completed)
                                      .unwrap_or(true)
                            });
            if let Some(dep) = unmet {
                self.skip(run_id,
                          &mut report,
                          idx,
                          step,
                          SkipReason::DependencyNotCompleted { dependency: dep.to_string() });
                continue;
            }

            // Resolución de contratos: un NotFound es fallo de configuración
            // del Step, con razón distinta a un fallo de transacción.
            let mut handles: HashMap<String, ContractHandle> = HashMap::new();
            let mut unresolved: Option<StepError> = None;
            for name in step.contracts() {
                match self.registry.resolve(name) {
                    Ok(handle) => {
                        handles.insert(name.to_string(), handle);
                    }
                    Err(err) => {
                        unresolved = Some(err.into());
                        break;
                    }
                }
            }
            if let Some(error) = unresolved {
                self.fail(run_id, &mut report, idx, step, error);
                continue;
            }

            let ctx = StepContext::new(&self.gateway, &handles, &self.config);

            // Probe primero: si el efecto ya está presente, el Step pasa de
            // `Pending` a `Completed` sin transicionar por `Running` ni
            // emitir `StepStarted`, con cero transacciones.
            match step.already_applied(&ctx).await {
                Ok(true) => {
                    self.complete(run_id, &mut report, idx, step, 0, true);
                    continue;
                }
                Ok(false) => {}
                Err(error) => {
                    // Sin probe confiable no se puede garantizar que la
                    // acción no duplique trabajo: fallo, no reintento ciego.
                    self.fail(run_id, &mut report, idx, step, error);
                    continue;
                }
            }

            {
                let slot = report.steps.get_mut(step.id()).unwrap();
                slot.status = StepStatus::Running;
                slot.started_at = Some(Utc::now());
            }
            self.log.append_kind(run_id,
                                 RunEventKind::StepStarted { step_index: idx,
                                                             step_id: step.id().to_string() });
            info!(step = step.id(), "step started");

            match step.run(&ctx).await {
                Ok(outcome) => {
                    self.complete(run_id, &mut report, idx, step, outcome.transactions.len(), false);
                }
                Err(error) => {
                    self.fail(run_id, &mut report, idx, step, error);
                }
            }
        }

        report.cancelled = self.cancel.is_cancelled();
        report.finished_at = Some(Utc::now());
        self.log.append_kind(run_id,
                             RunEventKind::PipelineFinished { succeeded: report.succeeded(),
                                                              cancelled: report.cancelled });
        info!(pipeline = definition.name(),
              succeeded = report.succeeded(),
              transactions = report.total_transactions(),
              "pipeline run finished");
        report
    }

    fn complete(&mut self,
                run_id: Uuid,
                report: &mut RunReport,
                idx: usize,
                step: &dyn StepDefinition,
                transactions: usize,
                already_applied: bool) {
        let slot = report.steps.get_mut(step.id()).unwrap();
        slot.status = StepStatus::Completed;
        slot.transactions = transactions;
        slot.already_applied = already_applied;
        slot.finished_at = Some(Utc::now());
        self.log.append_kind(run_id,
                             RunEventKind::StepCompleted { step_index: idx,
                                                           step_id: step.id().to_string(),
                                                           transactions,
                                                           already_applied });
        info!(step = step.id(), transactions, already_applied, "step completed");
    }

    fn fail(&mut self,
            run_id: Uuid,
            report: &mut RunReport,
            idx: usize,
            step: &dyn StepDefinition,
            error: StepError) {
        let slot = report.steps.get_mut(step.id()).unwrap();
        slot.status = StepStatus::Failed;
        slot.error = Some(error.clone());
        slot.finished_at = Some(Utc::now());
        warn!(step = step.id(), %error, "step failed");
        self.log.append_kind(run_id,
                             RunEventKind::StepFailed { step_index: idx,
                                                        step_id: step.id().to_string(),
                                                        error });
    }

    fn skip(&mut self,
            run_id: Uuid,
            report: &mut RunReport,
            idx: usize,
            step: &dyn StepDefinition,
            reason: SkipReason) {
        let slot = report.steps.get_mut(step.id()).unwrap();
        slot.status = StepStatus::Skipped;
        slot.skip_reason = Some(reason.to_string());
        warn!(step = step.id(), reason = %reason, "step skipped");
        self.log.append_kind(run_id,
                             RunEventKind::StepSkipped { step_index: idx,
                                                         step_id: step.id().to_string(),
                                                         reason });
    }
}
