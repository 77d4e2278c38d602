//! Definición de pipeline (DAG de Steps) y reporte de corrida.

pub mod definition;
pub mod report;

pub use definition::PipelineDefinition;
pub use report::{RunReport, StepReport};
