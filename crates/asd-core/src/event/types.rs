//! Tipos de evento de una corrida y estructura `RunEvent`.
//!
//! El engine emite un evento por transición observable. El log permite
//! reconstruir qué pasó en una corrida (orden, saltos, fallos) sin depender
//! del reporte final; se descarta junto con la corrida.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::StepError;

/// Por qué un Step quedó `Skipped`. El reporte nunca lo omite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Una dependencia no alcanzó `Completed`.
    DependencyNotCompleted { dependency: String },
    /// El operador canceló la corrida antes de agendar este Step.
    Cancelled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DependencyNotCompleted { dependency } => {
                write!(f, "dependency '{}' not completed", dependency)
            }
            SkipReason::Cancelled => write!(f, "run cancelled"),
        }
    }
}

/// Tipos de evento soportados.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Primer evento de toda corrida: fija el plan y la cantidad de steps.
    PipelineStarted {
        pipeline: String,
        plan_hash: String,
        step_count: usize,
    },
    /// Un step comenzó su ejecución. No implica éxito.
    StepStarted { step_index: usize, step_id: String },
    /// Un step alcanzó `Completed`, por acción o por probe
    /// (`already_applied` con cero transacciones).
    StepCompleted {
        step_index: usize,
        step_id: String,
        transactions: usize,
        already_applied: bool,
    },
    /// Un step falló; la corrida continúa con los steps independientes.
    StepFailed {
        step_index: usize,
        step_id: String,
        error: StepError,
    },
    /// Un step no corrió en esta corrida.
    StepSkipped {
        step_index: usize,
        step_id: String,
        reason: SkipReason,
    },
    /// Evento de cierre con el resultado agregado.
    PipelineFinished { succeeded: bool, cancelled: bool },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // orden de append dentro del log
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>, // metadato, no participa de ningún hash
}
