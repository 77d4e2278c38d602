//! Steps del bootstrap, un archivo por preocupación.

pub mod addresses;
pub mod entity;
pub mod oracle;
pub mod reserve;
pub mod setup;
pub mod upgrade;

pub use addresses::SetAddressesStep;
pub use entity::AddEntityStep;
pub use oracle::SetOracleStep;
pub use reserve::{EnableBorrowingStep, InitializeReserveStep};
pub use setup::SetupProtocolStep;
pub use upgrade::{UpgradePoolStep, UpgradeStakingStep};

/// Ids estables de los Steps; también son los nombres de tarea del runner.
pub mod id {
    pub const SETUP_PROTOCOL: &str = "setup-protocol";
    pub const INITIALIZE_ASD_RESERVE: &str = "initialize-asd-reserve";
    pub const SET_ASD_ORACLE: &str = "set-asd-oracle";
    pub const ENABLE_ASD_BORROWING: &str = "enable-asd-borrowing";
    pub const ADD_ASD_AS_ENTITY: &str = "add-asd-as-entity";
    pub const SET_ASD_ADDRESSES: &str = "set-asd-addresses";
    pub const UPGRADE_POOL: &str = "upgrade-pool";
    pub const UPGRADE_STAKING: &str = "upgrade-staking";
}
