//! Reporte de corrida: un slot de estado por Step, en orden de declaración.
//!
//! El reporte es el único estado que la corrida deja tras de sí; no se
//! persiste nada entre corridas (los probes de idempotencia reemplazan al
//! progreso persistido).

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StepError;
use crate::pipeline::PipelineDefinition;
use crate::step::StepStatus;

/// Estado final de un Step dentro del reporte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub step_id: String,
    pub status: StepStatus,
    /// Transacciones confirmadas por la acción. Cero si completó por probe.
    pub transactions: usize,
    /// `true` si el probe observó el efecto ya presente y la acción no corrió.
    pub already_applied: bool,
    pub error: Option<StepError>,
    /// Motivo de salto, cuando `status == Skipped`.
    pub skip_reason: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl StepReport {
    pub fn pending(step_id: impl Into<String>) -> Self {
        Self { step_id: step_id.into(),
               status: StepStatus::Pending,
               transactions: 0,
               already_applied: false,
               error: None,
               skip_reason: None,
               started_at: None,
               finished_at: None }
    }
}

/// Resultado completo de una corrida de pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub pipeline: String,
    pub network: String,
    /// Hash del plan ejecutado (definición + versión del motor).
    pub plan_hash: String,
    pub steps: IndexMap<String, StepReport>,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunReport {
    pub fn new(run_id: Uuid, definition: &PipelineDefinition, network: impl Into<String>) -> Self {
        let steps = definition.steps()
                              .map(|s| (s.id().to_string(), StepReport::pending(s.id())))
                              .collect();
        Self { run_id,
               pipeline: definition.name().to_string(),
               network: network.into(),
               plan_hash: definition.definition_hash().to_string(),
               steps,
               cancelled: false,
               started_at: Utc::now(),
               finished_at: None }
    }

    /// La corrida es exitosa si y sólo si ningún Step quedó `Failed`.
    pub fn succeeded(&self) -> bool {
        self.steps.values().all(|s| s.status != StepStatus::Failed)
    }

    pub fn failed_steps(&self) -> Vec<&StepReport> {
        self.steps
            .values()
            .filter(|s| s.status == StepStatus::Failed)
            .collect()
    }

    /// Total de transacciones confirmadas en la corrida.
    pub fn total_transactions(&self) -> usize {
        self.steps.values().map(|s| s.transactions).sum()
    }
}
