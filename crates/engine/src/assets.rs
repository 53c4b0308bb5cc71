//! External collaborators: the custodied stable asset and the collectible
//! minter.
//!
//! The engine never touches balances directly. It drives an abstract
//! [`StableAsset`] that custodies escrowed funds, and a
//! [`CollectibleMinter`] that records ownership of the minted token. Both
//! are traits so the host decides what backs them; the in-memory
//! [`LedgerAsset`] and [`MintBook`] implementations back the service and
//! the tests.

use std::collections::HashMap;

use thiserror::Error;

use auction_types::{Address, ContentId};

/// Errors from the stable-asset ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("Insufficient balance: need {required}, got {got}")]
    InsufficientBalance { required: u64, got: u64 },

    #[error("Insufficient allowance: need {required}, got {got}")]
    InsufficientAllowance { required: u64, got: u64 },

    #[error("Insufficient custody balance: need {required}, got {got}")]
    InsufficientCustody { required: u64, got: u64 },
}

/// Errors from the collectible minter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MintError {
    #[error("Collectible already minted for content {}", hex::encode(.0))]
    AlreadyMinted(ContentId),
}

/// The fungible stable-value asset the engine custodies bids in.
///
/// `pull` draws funds from a bidder into custody against a previously
/// granted allowance; `push` disburses from custody for refunds and
/// settlement payouts. Either failing aborts the enclosing action.
pub trait StableAsset {
    fn pull(&mut self, from: &Address, amount: u64) -> Result<(), AssetError>;
    fn push(&mut self, to: &Address, amount: u64) -> Result<(), AssetError>;
}

/// Mints the unique collectible to the auction winner.
///
/// The engine only calls this once per content id (the Settled phase check
/// makes a second settlement impossible); the minter rejects duplicates
/// anyway.
pub trait CollectibleMinter {
    fn mint(
        &mut self,
        to: &Address,
        content_id: &ContentId,
        creator_id: u64,
        creator: &Address,
    ) -> Result<(), MintError>;
}

/// In-memory stable-asset ledger: per-account balances, per-account
/// allowances granted to the custodian, and one custody balance.
#[derive(Debug, Default, Clone)]
pub struct LedgerAsset {
    balances: HashMap<Address, u64>,
    allowances: HashMap<Address, u64>,
    custody: u64,
}

impl LedgerAsset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account out of thin air. Dev faucet and test setup only.
    pub fn credit(&mut self, owner: Address, amount: u64) {
        *self.balances.entry(owner).or_insert(0) += amount;
    }

    /// Grant the custodian permission to pull up to `amount` from `owner`.
    /// Stands in for the permit-style delegated approval of the real asset.
    pub fn approve(&mut self, owner: Address, amount: u64) {
        self.allowances.insert(owner, amount);
    }

    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    pub fn allowance_of(&self, owner: &Address) -> u64 {
        self.allowances.get(owner).copied().unwrap_or(0)
    }

    /// Total funds currently held in custody.
    pub fn custody(&self) -> u64 {
        self.custody
    }
}

impl StableAsset for LedgerAsset {
    fn pull(&mut self, from: &Address, amount: u64) -> Result<(), AssetError> {
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(AssetError::InsufficientBalance {
                required: amount,
                got: balance,
            });
        }
        let allowance = self.allowance_of(from);
        if allowance < amount {
            return Err(AssetError::InsufficientAllowance {
                required: amount,
                got: allowance,
            });
        }

        self.balances.insert(*from, balance - amount);
        self.allowances.insert(*from, allowance - amount);
        self.custody += amount;
        Ok(())
    }

    fn push(&mut self, to: &Address, amount: u64) -> Result<(), AssetError> {
        if self.custody < amount {
            return Err(AssetError::InsufficientCustody {
                required: amount,
                got: self.custody,
            });
        }
        self.custody -= amount;
        *self.balances.entry(*to).or_insert(0) += amount;
        Ok(())
    }
}

/// In-memory collectible ownership book: one owner per content id, ever.
#[derive(Debug, Default, Clone)]
pub struct MintBook {
    owners: HashMap<ContentId, Address>,
}

impl MintBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner_of(&self, content_id: &ContentId) -> Option<&Address> {
        self.owners.get(content_id)
    }

    pub fn minted_count(&self) -> usize {
        self.owners.len()
    }
}

impl CollectibleMinter for MintBook {
    fn mint(
        &mut self,
        to: &Address,
        content_id: &ContentId,
        _creator_id: u64,
        _creator: &Address,
    ) -> Result<(), MintError> {
        if self.owners.contains_key(content_id) {
            return Err(MintError::AlreadyMinted(*content_id));
        }
        self.owners.insert(*content_id, *to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_requires_balance_and_allowance() {
        let mut asset = LedgerAsset::new();
        let owner = [1u8; 32];

        assert!(matches!(
            asset.pull(&owner, 100),
            Err(AssetError::InsufficientBalance { required: 100, got: 0 })
        ));

        asset.credit(owner, 500);
        assert!(matches!(
            asset.pull(&owner, 100),
            Err(AssetError::InsufficientAllowance { required: 100, got: 0 })
        ));

        asset.approve(owner, 100);
        assert!(asset.pull(&owner, 100).is_ok());
        assert_eq!(asset.balance_of(&owner), 400);
        assert_eq!(asset.allowance_of(&owner), 0);
        assert_eq!(asset.custody(), 100);
    }

    #[test]
    fn test_push_bounded_by_custody() {
        let mut asset = LedgerAsset::new();
        let owner = [1u8; 32];
        let recipient = [2u8; 32];

        asset.credit(owner, 100);
        asset.approve(owner, 100);
        asset.pull(&owner, 100).unwrap();

        assert!(matches!(
            asset.push(&recipient, 101),
            Err(AssetError::InsufficientCustody { required: 101, got: 100 })
        ));

        assert!(asset.push(&recipient, 100).is_ok());
        assert_eq!(asset.balance_of(&recipient), 100);
        assert_eq!(asset.custody(), 0);
    }

    #[test]
    fn test_mint_rejects_duplicates() {
        let mut book = MintBook::new();
        let content_id = [7u8; 32];
        let winner = [1u8; 32];
        let creator = [2u8; 32];

        assert!(book.mint(&winner, &content_id, 42, &creator).is_ok());
        assert_eq!(book.owner_of(&content_id), Some(&winner));

        let other = [3u8; 32];
        assert!(matches!(
            book.mint(&other, &content_id, 42, &creator),
            Err(MintError::AlreadyMinted(_))
        ));
        assert_eq!(book.owner_of(&content_id), Some(&winner));
    }
}
