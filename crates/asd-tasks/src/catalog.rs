//! Catálogo de pipelines por nombre, reemplazo del registro por orden de
//! require del sistema original: el DAG es explícito y verificable en tests.
//!
//! `asd-setup` es el bootstrap completo. Cada tarea individual produce la
//! clausura de dependencias de su Step: sobre una cadena donde los
//! prerequisitos ya están aplicados, esos pasos completan por probe sin
//! enviar transacciones.

use asd_core::{PipelineDefinition, PipelineError, StepDefinition};

use crate::steps::{id, AddEntityStep, EnableBorrowingStep, InitializeReserveStep, SetAddressesStep,
                   SetOracleStep, SetupProtocolStep, UpgradePoolStep, UpgradeStakingStep};

/// Nombre del pipeline de bootstrap completo.
pub const ASD_SETUP: &str = "asd-setup";

/// Todos los Steps, en el orden de registro del despliegue original.
fn all_steps() -> Vec<Box<dyn StepDefinition>> {
    vec![Box::new(SetupProtocolStep),
         Box::new(InitializeReserveStep),
         Box::new(SetOracleStep),
         Box::new(EnableBorrowingStep),
         Box::new(AddEntityStep),
         Box::new(SetAddressesStep),
         Box::new(UpgradePoolStep),
         Box::new(UpgradeStakingStep)]
}

/// Nombres aceptados por `pipeline`, en orden de presentación.
pub fn pipeline_names() -> Vec<&'static str> {
    vec![ASD_SETUP,
         id::SETUP_PROTOCOL,
         id::INITIALIZE_ASD_RESERVE,
         id::SET_ASD_ORACLE,
         id::ENABLE_ASD_BORROWING,
         id::ADD_ASD_AS_ENTITY,
         id::SET_ASD_ADDRESSES,
         id::UPGRADE_POOL,
         id::UPGRADE_STAKING]
}

/// Resuelve un nombre de tarea a su definición validada.
pub fn pipeline(name: &str) -> Result<PipelineDefinition, PipelineError> {
    if name == ASD_SETUP {
        return PipelineDefinition::new(ASD_SETUP, all_steps());
    }
    if !pipeline_names().contains(&name) {
        return Err(PipelineError::UnknownPipeline(name.to_string()));
    }
    PipelineDefinition::new(name, all_steps())?.restricted_to(name)
}
