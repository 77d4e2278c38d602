use serde::{Deserialize, Serialize};

/// Estado de un Step en tiempo de ejecución.
///
/// Las transiciones válidas son:
/// - `Pending` -> `Running` | `Completed` | `Failed` | `Skipped`
/// - `Running` -> `Completed` | `Failed`
///
/// `Pending` -> `Completed` ocurre cuando el probe de idempotencia observa
/// el efecto ya presente: la acción no se invoca y el paso nunca pasa por
/// `Running`. `Pending` -> `Failed` cubre el probe que falla y el contrato
/// sin resolver. No se permiten reversiones ni saltos arbitrarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// El paso está pendiente de ejecución.
    Pending,
    /// El paso está en ejecución.
    Running,
    /// El efecto del paso está presente on-chain (por acción o por probe).
    Completed,
    /// El paso falló; la razón queda registrada en el reporte.
    Failed,
    /// El paso no corrió: dependencia no completada o corrida cancelada.
    Skipped,
}

impl StepStatus {
    /// Estado terminal: el engine no volverá a tocar este paso en la corrida.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed | StepStatus::Skipped)
    }
}
