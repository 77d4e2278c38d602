//! Tabla de redes conocidas por el binario.
//!
//! `mainnet` apunta al endpoint de Alchemy (requiere `ALCHEMY_KEY` en el
//! entorno o en `.env`); `hardhat` es la red local forkeada del estado de
//! mainnet a la altura fijada, que es donde corre el bootstrap de ASD.

use asd_core::constants::MAINNET_FORK_BLOCK;
use asd_core::{ForkConfig, NetworkConfig, Networks};
use once_cell::sync::Lazy;

pub static NETWORKS: Lazy<Networks> = Lazy::new(|| {
                          let key = std::env::var("ALCHEMY_KEY").unwrap_or_default();
                          build(&key)
                      });

fn mainnet_url(alchemy_key: &str) -> String {
    format!("https://eth-mainnet.alchemyapi.io/v2/{alchemy_key}")
}

fn build(alchemy_key: &str) -> Networks {
    let mut networks = Networks::new();
    networks.insert(NetworkConfig { name: "mainnet".into(),
                                    url:  mainnet_url(alchemy_key),
                                    fork: None });
    networks.insert(NetworkConfig { name: "hardhat".into(),
                                    url:  "http://127.0.0.1:8545".into(),
                                    fork: Some(ForkConfig { url:          mainnet_url(alchemy_key),
                                                            block_number: Some(MAINNET_FORK_BLOCK) }) });
    networks.insert(NetworkConfig { name: "localhost".into(),
                                    url:  "http://127.0.0.1:8545".into(),
                                    fork: None });
    networks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardhat_forks_mainnet_at_the_pinned_block() {
        let networks = build("test-key");
        let hardhat = networks.resolve("hardhat").unwrap();
        let fork = hardhat.fork.as_ref().unwrap();
        assert_eq!(fork.block_number, Some(MAINNET_FORK_BLOCK));
        assert!(fork.url.ends_with("test-key"));
    }

    #[test]
    fn mainnet_is_not_a_fork() {
        let networks = build("k");
        assert!(networks.resolve("mainnet").unwrap().fork.is_none());
    }
}
