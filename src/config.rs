use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// On-chain swap-contract address for the active EVM network
    pub swap_contract_address: String,
    /// Watchdog budget once a swap enters settlement, in ticks (1 tick/second)
    pub swap_timeout_ticks: u32,
    pub network: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Ok(Self {
            swap_contract_address: std::env::var("LEDGERFUSE_SWAP_CONTRACT")
                .unwrap_or_else(|_| "0x0000000000000000000000000000000000000000".to_string()),
            swap_timeout_ticks: std::env::var("LEDGERFUSE_SWAP_TIMEOUT_TICKS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(crate::swap::DEFAULT_SWAP_TIMEOUT_TICKS),
            network: std::env::var("LEDGERFUSE_NETWORK").unwrap_or_else(|_| "mainnet".to_string()),
        })
    }
}
