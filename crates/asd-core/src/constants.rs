//! Constantes del motor de despliegue.
//!
//! Valores estáticos que participan en el cálculo del `definition_hash` y en
//! los valores por defecto del contexto de ejecución. Un cambio de
//! `PIPELINE_VERSION` invalida los hashes de plan aunque la definición no
//! cambie, para distinguir corridas entre versiones incompatibles del motor.

/// Versión lógica del motor de pipelines. Entra al hash del plan.
pub const PIPELINE_VERSION: &str = "ASD-1";

/// Confirmaciones esperadas por transacción si el contexto no indica otra cosa.
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// Tiempo máximo de espera de confirmación por transacción (segundos).
pub const DEFAULT_TX_TIMEOUT_SECS: u64 = 120;

/// Altura de bloque a la que se ancla el fork de mainnet para pruebas locales.
pub const MAINNET_FORK_BLOCK: u64 = 14_781_440;
