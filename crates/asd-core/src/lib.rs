//! asd-core: motor de pipelines de despliegue on-chain.
//!
//! Modela el bootstrap de un activo nuevo ("ASD") dentro de un protocolo de
//! préstamos ya desplegado como un DAG de Steps administrativos idempotentes.
//! El cliente de cadena y la resolución de artefactos son colaboradores
//! externos detrás de los traits `ChainGateway` y `ArtifactRegistry`; el
//! core sólo secuencia, consulta probes y registra resultados.

pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod gateway;
pub mod hashing;
pub mod pipeline;
pub mod registry;
pub mod step;

pub use config::{ExecutionConfig, ForkConfig, NetworkConfig, Networks};
pub use engine::{CancelFlag, PipelineEngine};
pub use errors::{ConfigError, PipelineError, StepError};
pub use event::{EventLog, RunEvent, RunEventKind, SkipReason};
pub use gateway::{Address, CallRequest, ChainGateway, GatewayError, InMemoryGateway, PendingTx, TxReceipt,
                  TxRequest};
pub use pipeline::{PipelineDefinition, RunReport, StepReport};
pub use registry::{ArtifactRegistry, ContractHandle, InMemoryRegistry, RegistryError};
pub use step::{StepContext, StepDefinition, StepOutcome, StepStatus};
