//! Genesis configuration for the auction engine.
//!
//! The host loads this at startup, validates it, and builds the initial
//! [`EngineState`] from it. Everything here is static configuration; no
//! auctions exist at genesis.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use auction_types::{Address, AuctionConfig};

use crate::state::EngineState;

/// Initial engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionGenesisConfig {
    /// Identity allowed to use the admin surface
    pub admin: Address,
    /// Recipient of protocol fees
    pub treasury: Address,
    /// Initial set of accepted authorizer identities
    pub authorizers: Vec<Address>,
    /// Global bounds applied to every auction started from here on
    pub config: AuctionConfig,
    /// Engine clock at genesis (Unix seconds)
    pub genesis_time: u64,
}

/// Errors from genesis validation.
#[derive(Debug, Error)]
pub enum GenesisValidationError {
    #[error("Invalid admin: {0}")]
    InvalidAdmin(String),

    #[error("Invalid treasury: {0}")]
    InvalidTreasury(String),

    #[error("No authorizers configured")]
    NoAuthorizers,

    #[error("Invalid auction config: {0}")]
    InvalidConfig(String),
}

/// Check a global config. Shared between genesis validation and the
/// runtime config update, so both enforce the same rules.
pub fn check_config(config: &AuctionConfig) -> Result<(), String> {
    if config.min_bid_amount == 0 {
        return Err("minimum bid amount cannot be zero".into());
    }
    if config.min_auction_duration == 0 {
        return Err("minimum auction duration cannot be zero".into());
    }
    if config.min_auction_duration > config.max_auction_duration {
        return Err("minimum auction duration exceeds maximum".into());
    }
    if config.max_extension == 0 {
        return Err("maximum extension cannot be zero".into());
    }
    Ok(())
}

impl AuctionGenesisConfig {
    /// Validate the genesis configuration.
    pub fn validate(&self) -> Result<(), GenesisValidationError> {
        if self.admin == [0u8; 32] {
            return Err(GenesisValidationError::InvalidAdmin(
                "admin cannot be zero".into(),
            ));
        }
        if self.treasury == [0u8; 32] {
            return Err(GenesisValidationError::InvalidTreasury(
                "treasury cannot be zero".into(),
            ));
        }
        if self.authorizers.is_empty() {
            return Err(GenesisValidationError::NoAuthorizers);
        }
        check_config(&self.config).map_err(GenesisValidationError::InvalidConfig)?;
        Ok(())
    }

    /// Validate and build the initial engine state.
    pub fn into_state(self) -> Result<EngineState, GenesisValidationError> {
        self.validate()?;
        Ok(EngineState::new(
            self.admin,
            self.treasury,
            self.config,
            self.authorizers,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_genesis() -> AuctionGenesisConfig {
        AuctionGenesisConfig {
            admin: [100u8; 32],
            treasury: [101u8; 32],
            authorizers: vec![[9u8; 32]],
            config: AuctionConfig {
                min_bid_amount: 1_000_000,
                min_auction_duration: 3600,
                max_auction_duration: 2_592_000,
                max_extension: 86_400,
            },
            genesis_time: 0,
        }
    }

    #[test]
    fn test_valid_genesis_builds_state() {
        let state = valid_genesis().into_state().unwrap();
        assert_eq!(state.admin, [100u8; 32]);
        assert_eq!(state.treasury, [101u8; 32]);
        assert!(state.is_authorizer(&[9u8; 32]));
        assert_eq!(state.config_version, 1);
        assert!(!state.paused);
        assert!(state.auctions.is_empty());
    }

    #[test]
    fn test_genesis_rejects_zero_addresses() {
        let mut genesis = valid_genesis();
        genesis.admin = [0u8; 32];
        assert!(matches!(
            genesis.validate(),
            Err(GenesisValidationError::InvalidAdmin(_))
        ));

        let mut genesis = valid_genesis();
        genesis.treasury = [0u8; 32];
        assert!(matches!(
            genesis.validate(),
            Err(GenesisValidationError::InvalidTreasury(_))
        ));
    }

    #[test]
    fn test_genesis_requires_an_authorizer() {
        let mut genesis = valid_genesis();
        genesis.authorizers.clear();
        assert!(matches!(
            genesis.validate(),
            Err(GenesisValidationError::NoAuthorizers)
        ));
    }

    #[test]
    fn test_check_config_rules() {
        let good = valid_genesis().config;
        assert!(check_config(&good).is_ok());

        let mut config = good.clone();
        config.min_bid_amount = 0;
        assert!(check_config(&config).is_err());

        let mut config = good.clone();
        config.min_auction_duration = 0;
        assert!(check_config(&config).is_err());

        let mut config = good.clone();
        config.min_auction_duration = config.max_auction_duration + 1;
        assert!(check_config(&config).is_err());

        let mut config = good;
        config.max_extension = 0;
        assert!(check_config(&config).is_err());
    }

    #[test]
    fn test_genesis_config_json_round_trip() {
        let genesis = valid_genesis();
        let json = serde_json::to_string(&genesis).unwrap();
        let decoded: AuctionGenesisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.admin, genesis.admin);
        assert_eq!(decoded.config, genesis.config);
        assert_eq!(decoded.authorizers, genesis.authorizers);
    }
}
