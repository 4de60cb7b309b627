//! Purchase tokens, at most one per product.

use chrono::{DateTime, Utc};

use crate::guarded::GuardedStore;
use crate::keys;
use crate::kv::StorageResult;
use crate::records::{PurchaseToken, PurchaseTokenStorage};

#[derive(Debug, Clone)]
pub struct PurchaseTokenRepository {
    store: GuardedStore,
}

impl PurchaseTokenRepository {
    pub fn new(store: GuardedStore) -> Self {
        Self { store }
    }

    pub fn all(&self) -> Vec<PurchaseToken> {
        self.store
            .read_json::<PurchaseTokenStorage>(keys::PURCHASE_TOKENS)
            .map(|s| s.tokens)
            .unwrap_or_default()
    }

    pub fn for_product(&self, product: &str) -> Option<PurchaseToken> {
        self.all().into_iter().find(|t| t.product == product)
    }

    /// Store `token`, replacing any token for the same product.
    pub fn add(&self, token: PurchaseToken, now: DateTime<Utc>) -> StorageResult<()> {
        let mut tokens = self.all();
        tokens.retain(|t| t.product != token.product);
        tokens.push(token);
        self.persist(tokens, now)
    }

    /// Returns whether a token for `product` existed.
    pub fn remove(&self, product: &str, now: DateTime<Utc>) -> StorageResult<bool> {
        let mut tokens = self.all();
        let before = tokens.len();
        tokens.retain(|t| t.product != product);
        if tokens.len() == before {
            return Ok(false);
        }
        self.persist(tokens, now)?;
        Ok(true)
    }

    fn persist(&self, tokens: Vec<PurchaseToken>, now: DateTime<Utc>) -> StorageResult<()> {
        self.store.try_write_json(
            keys::PURCHASE_TOKENS,
            &PurchaseTokenStorage {
                tokens,
                last_updated: now,
            },
        )
    }
}
