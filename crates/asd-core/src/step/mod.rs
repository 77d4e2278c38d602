//! Definiciones relacionadas a Steps.
//!
//! Un Step es una acción administrativa atómica contra contratos ya
//! desplegados, más su propio probe de seguridad. Este módulo define:
//! - `StepDefinition`: la interfaz que ejecuta el engine.
//! - `StepContext`: handles resueltos + gateway + configuración.
//! - `StepOutcome`: recibos de las transacciones enviadas.
//! - `StepStatus`: estados en tiempo de ejecución.

pub mod definition;
mod status;

pub use definition::{StepContext, StepDefinition, StepOutcome};
pub use status::StepStatus;
