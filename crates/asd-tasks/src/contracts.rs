//! Nombres lógicos de los contratos que los Steps resuelven vía el registry,
//! y constantes de las versiones esperadas tras los upgrades.
//!
//! Los nombres son las claves del archivo de deployments de la red objetivo;
//! las direcciones concretas nunca se escriben en los Steps.

pub const ASD_TOKEN: &str = "AsdToken";
pub const ASD_ORACLE: &str = "AsdOracle";
pub const ASD_ATOKEN: &str = "AsdAToken";
pub const ASD_VARIABLE_DEBT_TOKEN: &str = "AsdVariableDebtToken";
pub const ASD_INTEREST_RATE_STRATEGY: &str = "AsdInterestRateStrategy";
pub const TREASURY: &str = "Treasury";

pub const POOL: &str = "Pool";
pub const POOL_CONFIGURATOR: &str = "PoolConfigurator";
pub const POOL_ADDRESSES_PROVIDER: &str = "PoolAddressesProvider";
pub const POOL_IMPL: &str = "PoolImpl";
pub const AAVE_ORACLE: &str = "AaveOracle";
pub const STAKED_AAVE: &str = "StakedAave";
pub const STAKED_AAVE_IMPL: &str = "StakedAaveImpl";

/// Revisión que expone el Pool una vez subida la implementación con soporte
/// de ASD.
pub const ASD_POOL_REVISION: u64 = 3;

/// Revisión esperada del módulo de staking tras su upgrade.
pub const STAKED_AAVE_REVISION: u64 = 4;

/// Capacidad inicial del bucket del facilitador (wei, como string decimal
/// para no perder precisión en JSON).
pub const ASD_FACILITATOR_CAPACITY: &str = "100000000000000000000000000";

/// Etiqueta con la que se lista el facilitador del aToken.
pub const ASD_FACILITATOR_LABEL: &str = "AsdAToken";
