//! asd-tasks: Steps concretos del bootstrap de ASD y catálogo de pipelines.
//!
//! Este crate conecta el motor neutral (`asd-core`) con las llamadas
//! administrativas reales del protocolo: inicializar la reserva, cablear el
//! oráculo, habilitar el borrowing, listar el facilitador, cablear
//! direcciones y subir las implementaciones de Pool y staking. Cada Step
//! trae su propio probe de idempotencia, de modo que cualquier pipeline del
//! catálogo sea seguro de relanzar tras un fallo parcial.

pub mod catalog;
pub mod contracts;
pub mod steps;

pub use catalog::{pipeline, pipeline_names, ASD_SETUP};
pub use steps::{AddEntityStep, EnableBorrowingStep, InitializeReserveStep, SetAddressesStep, SetOracleStep,
                SetupProtocolStep, UpgradePoolStep, UpgradeStakingStep};
