//! Engine module: ejecución de una definición de pipeline contra un gateway
//! y un registry, con propagación de saltos, probes de idempotencia y
//! cancelación cooperativa.

pub mod cancel;
pub mod core;

pub use cancel::CancelFlag;
pub use core::PipelineEngine;

pub use crate::event::{EventLog, RunEvent, RunEventKind, SkipReason};
pub use crate::pipeline::{PipelineDefinition, RunReport, StepReport};
pub use crate::step::StepStatus;
